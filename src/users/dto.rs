use serde::Deserialize;

/// Request body for user lookup. The email rides in the body, not the path.
#[derive(Debug, Deserialize)]
pub struct LookupRequest {
    pub email: String,
}
