use thiserror::Error;

/// Failures at the sync channel seam. The channel itself is best-effort and
/// fire-and-forget; these cover the local edges of it.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to encode state payload for '{path}': {source}")]
    Encode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to decode state payload on '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
