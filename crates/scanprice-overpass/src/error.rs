use thiserror::Error;

/// Errors returned by the Overpass API client.
#[derive(Debug, Error)]
pub enum OverpassError {
    /// Network or TLS failure, timeout, or non-2xx status.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered 200 but reported a runtime error in `remark`.
    #[error("Overpass runtime error: {0}")]
    Remark(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },
}
