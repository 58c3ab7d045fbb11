use thiserror::Error;

/// Workspace-wide error type for Mycel.
#[derive(Debug, Error)]
pub enum MycelError {
    /// Malformed or missing configuration, detected before any network call.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Transport failure talking to the collaboration source.
    #[error("Network error: {0}")]
    Network(String),

    /// The collaboration source rejected our credentials.
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The collaboration source answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// An argument violated an engine precondition.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for MycelError {
    fn from(e: serde_json::Error) -> Self {
        MycelError::Serialization(e.to_string())
    }
}
