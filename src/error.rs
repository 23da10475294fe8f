use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    /// Non-2xx response or transport failure.
    #[error("{message}")]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error("invalid record: {0}")]
    SchemaInvalid(String),

    /// The owning request was superseded or its view was torn down.
    #[error("request cancelled")]
    Cancelled,

    #[error("{0}")]
    Validation(String),

    #[error("record '{0}' not found")]
    NotFound(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl FolioError {
    pub fn network(status: Option<u16>, message: impl Into<String>) -> Self {
        FolioError::Network {
            status,
            message: message.into(),
        }
    }

    /// Cancellations are never surfaced to the user.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FolioError::Cancelled)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            FolioError::Network { status, .. } => *status,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
