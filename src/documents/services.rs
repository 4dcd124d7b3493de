use anyhow::Context;
use bytes::Bytes;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::storage::StorageClient;

/// One file pulled out of a multipart request.
pub struct UploadItem {
    pub body: Bytes,
    pub content_type: String,
    pub original_name: String,
}

// ISO-8601 with colons swapped for hyphens; colons are not storage-key safe.
const KEY_TIMESTAMP: &[FormatItem<'static>] = format_description!(
    "[year]-[month]-[day]T[hour]-[minute]-[second].[subsecond digits:3]Z"
);

/// Storage key for an uploaded document: the original name up to its `.pdf`
/// suffix, a millisecond timestamp, and `.pdf` back on. Repeated uploads of
/// the same filename land on distinct keys unless they share the exact same
/// millisecond, a collision this scheme knowingly does not resolve.
pub fn derive_storage_key(original_name: &str, now: OffsetDateTime) -> anyhow::Result<String> {
    let stem = original_name.split(".pdf").next().unwrap_or_default();
    let ts = now.format(&KEY_TIMESTAMP).context("format storage key timestamp")?;
    Ok(format!("docs/{stem}_{ts}.pdf"))
}

/// Upload one document and return its durable download URL. One suspend
/// point; no retries, no timeout.
pub async fn store_document(
    storage: &dyn StorageClient,
    item: &UploadItem,
) -> anyhow::Result<String> {
    let key = derive_storage_key(&item.original_name, OffsetDateTime::now_utc())?;
    storage
        .put_object(&key, item.body.clone(), &item.content_type)
        .await
        .with_context(|| format!("put_object {key}"))?;
    Ok(storage.download_url(&key))
}
