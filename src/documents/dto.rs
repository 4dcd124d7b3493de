use serde::Serialize;

use crate::users::User;

/// Response for a standalone upload: no user record involved.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
}

/// Response for upload-and-record: the URL plus the updated user.
#[derive(Debug, Serialize)]
pub struct RecordResponse {
    pub message: String,
    #[serde(rename = "downloadURL")]
    pub download_url: String,
    pub user: User,
}
