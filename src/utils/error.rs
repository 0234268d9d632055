use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unexpected status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Malformed catalog response: {message}")]
    MalformedResponse { message: String },

    #[error("Notification via {channel} failed: {message}")]
    NotificationError { channel: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl TrackerError {
    /// 401 通常代表 token 過期
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, TrackerError::UnexpectedStatus { status: 401, .. })
    }

    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            TrackerError::ConfigError { .. }
                | TrackerError::InvalidConfigValueError { .. }
        )
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            TrackerError::UnexpectedStatus { status: 401, .. } => {
                "Refresh the class search page and copy a new bearer token into ASU_TOKEN"
            }
            TrackerError::UnexpectedStatus { .. } | TrackerError::HttpError(_) => {
                "The catalog may be temporarily unavailable; the tracker will try again"
            }
            TrackerError::MalformedResponse { .. } | TrackerError::SerializationError(_) => {
                "Check that the catalog URL still points at the class search API"
            }
            TrackerError::NotificationError { .. } => {
                "Check the ntfy topic and webhook URL"
            }
            TrackerError::IoError(_) => "Check the file path and its permissions",
            TrackerError::ConfigError { .. }
            | TrackerError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid setting `{}`: {}", field, reason)
            }
            TrackerError::UnexpectedStatus { status: 401, .. } => {
                "The catalog rejected the token (401 Unauthorized)".to_string()
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
