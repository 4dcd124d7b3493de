use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
///
/// Serialization is the public projection: the password hash and the
/// bookkeeping timestamps are never written to JSON.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Opaque extra signup fields, stored as given.
    pub profile: serde_json::Value,
    /// Download URLs, append-only.
    pub documents: Vec<String>,
    #[serde(skip_serializing)]
    pub created_at: OffsetDateTime,
    #[serde(skip_serializing)]
    pub updated_at: OffsetDateTime,
}
