/// Errors raised while building or editing configuration (color schemes,
/// labels, fuzzy color tokens). These surface immediately to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Unknown subject: '{0}'")]
    UnknownSubject(String),

    #[error("No color or style matches '{0}'")]
    UnknownColor(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::InvalidConfig(err.to_string())
    }
}

/// Errors raised while dispatching or rendering log records.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("Format error: {0}")]
    Format(String),

    #[error("No channel found matching '{0}'")]
    ChannelNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
