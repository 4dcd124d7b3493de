use crate::users::repo_types::User;
use sqlx::PgPool;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, email, password_hash, profile, documents, created_at, updated_at";

impl User {
    /// Find a user by email. The match is case-sensitive, as supplied.
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(user)
    }

    /// Create a new user with hashed password and empty documents.
    pub async fn create(
        db: &PgPool,
        email: &str,
        password_hash: &str,
        profile: serde_json::Value,
    ) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (email, password_hash, profile)
            VALUES ($1, $2, $3)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(email)
        .bind(password_hash)
        .bind(profile)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// Append a download URL to the user's documents and return the updated row.
    pub async fn append_document(db: &PgPool, id: Uuid, url: &str) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            r#"
            UPDATE users
            SET documents = array_append(documents, $2), updated_at = now()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(url)
        .fetch_one(db)
        .await?;
        Ok(user)
    }

    /// All registered emails, no pagination. Internal API, not routed.
    pub async fn all_emails(db: &PgPool) -> anyhow::Result<Vec<String>> {
        let emails = sqlx::query_scalar::<_, String>("SELECT email FROM users")
            .fetch_all(db)
            .await?;
        Ok(emails)
    }
}
