use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    /// Transport or network failure talking to the platform.
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// The platform answered with `ok = false`; carries its description.
    #[error("API error: {0}")]
    Api(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid message: {0}")]
    InvalidMessage(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BotError>;
