use thiserror::Error;

/// Errors returned by itinerary remotes.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// No itinerary has been saved for this user yet.
    #[error("no saved itinerary for user {user_id}")]
    NotFound { user_id: String },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl RemoteError {
    /// `true` for the "nothing saved yet" case, which callers treat as empty.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, RemoteError::NotFound { .. })
    }
}
