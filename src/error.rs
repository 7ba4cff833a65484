//! Error types for the editor session controller.

use thiserror::Error;

/// Result type alias using our error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the editor session controller.
#[derive(Error, Debug)]
pub enum Error {
    /// A send or a request on one of the message channels failed.
    #[error("Transport error: {channel}: {message}")]
    Transport { channel: String, message: String },

    /// No record was ever persisted for this tab.
    #[error("No stored session data for tab: {tab_id}")]
    TabDataNotFound { tab_id: String },

    /// An operation that needs a populated session record ran before the
    /// session finished initializing.
    #[error("Editor session not initialized")]
    NotReady,

    /// Session state errors
    #[error("Session error: {0}")]
    Session(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] Box<std::io::Error>),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(#[from] Box<serde_json::Error>),
}

impl Error {
    /// Create a transport error.
    pub fn transport(channel: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            channel: channel.into(),
            message: message.into(),
        }
    }

    /// Create a session error.
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(Box::new(value))
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(Box::new(value))
    }
}
