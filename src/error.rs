use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogSearchError {
    /// Non-success status from the backend
    #[error("{message}")]
    Api { status: StatusCode, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Body could not be understood as any known reply shape
    #[error("Unexpected response from agent: {0}")]
    Protocol(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{message}: {source}")]
    Context {
        message: String,
        #[source]
        source: Box<LogSearchError>,
    },
}

impl LogSearchError {
    /// Connection failures and non-success statuses
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(_) | Self::Api { .. } => true,
            Self::Context { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    pub fn is_protocol(&self) -> bool {
        match self {
            Self::Protocol(_) => true,
            Self::Context { source, .. } => source.is_protocol(),
            _ => false,
        }
    }

    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Http(e) if e.is_connect() => {
                Some("Is the log search backend running? Check --url or LOGSEARCH_URL.")
            }
            Self::Http(e) if e.is_timeout() => {
                Some("The agent took too long to answer. Try --timeout with a larger value.")
            }
            Self::Api { status, .. } if status.is_server_error() => {
                Some("The backend failed while handling the request. Check its logs.")
            }
            Self::Toml(_) => Some("Check .logsearch/config.local.toml or ~/.logsearch/config.toml"),
            Self::Context { source, .. } => source.hint(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, LogSearchError>;
