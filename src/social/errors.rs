//! Error types for the social platform API client.

#[derive(Debug, thiserror::Error)]
pub enum SocialApiError {
    #[error("authentication with the upstream API failed: {0}")]
    AuthFailed(String),
    #[error("Failed to parse response")]
    ParseFailed {
        status: u16,
        url: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    RequestFailed(#[from] anyhow::Error),
}
