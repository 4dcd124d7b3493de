use std::time::Duration;

use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use time::{Duration as TimeDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::state::AppState;

/// Holds JWT signing and verification keys.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let jwt = &state.config.jwt;
        Self::from_secret(&jwt.secret, Duration::from_secs((jwt.ttl_minutes as u64) * 60))
    }
}

impl JwtKeys {
    pub fn from_secret(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn sign(&self, user_id: Uuid, email: &str) -> anyhow::Result<String> {
        let now = OffsetDateTime::now_utc();
        let exp = now + TimeDuration::seconds(self.ttl.as_secs() as i64);
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.unix_timestamp() as usize,
            exp: exp.unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        // Expiry is exact: a token one second past exp is rejected.
        validation.leeway = 0;
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_keys() -> JwtKeys {
        JwtKeys::from_secret("dev-secret", Duration::from_secs(3600))
    }

    #[test]
    fn sign_and_verify_round_trips_email_and_id() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign(user_id, "a@x.com").expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.exp, claims.iat + 3600);
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let keys = make_keys();
        let other = JwtKeys::from_secret("other-secret", Duration::from_secs(3600));
        let token = keys.sign(Uuid::new_v4(), "a@x.com").expect("sign");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_accepts_token_just_before_expiry() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".into(),
            iat: now - 3599,
            exp: now + 1,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .expect("encode");
        assert!(keys.verify(&token).is_ok());
    }

    #[test]
    fn verify_rejects_token_just_after_expiry() {
        let keys = make_keys();
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "a@x.com".into(),
            iat: now - 3601,
            exp: now - 1,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"dev-secret"),
        )
        .expect("encode");
        let err = keys.verify(&token).unwrap_err();
        assert!(err.to_string().to_lowercase().contains("expired"));
    }
}
