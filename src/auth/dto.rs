use serde::{Deserialize, Serialize};

/// Request body for signup. Fields beyond email/password are kept as an
/// opaque profile and stored as given.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

/// Request body for signin.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

/// Plain confirmation payload.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signup_request_captures_extra_fields_as_profile() {
        let req: SignupRequest = serde_json::from_str(
            r#"{"email":"a@x.com","password":"pw1","name":"Ada","age":36}"#,
        )
        .unwrap();
        assert_eq!(req.email, "a@x.com");
        assert_eq!(req.password, "pw1");
        assert_eq!(req.profile.get("name").and_then(|v| v.as_str()), Some("Ada"));
        assert_eq!(req.profile.get("age").and_then(|v| v.as_i64()), Some(36));
    }

    #[test]
    fn signup_request_profile_may_be_empty() {
        let req: SignupRequest =
            serde_json::from_str(r#"{"email":"a@x.com","password":"pw1"}"#).unwrap();
        assert!(req.profile.is_empty());
    }
}
