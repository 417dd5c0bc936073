use thiserror::Error;

#[derive(Debug, Error)]
pub enum BedrockError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Response error: {0}")]
    ResponseError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
    #[error("AWS error: {0}")]
    AwsError(String),
    #[error("AWS service error: {0}")]
    AwsServiceError(String),
}

impl From<serde_json::Error> for BedrockError {
    fn from(e: serde_json::Error) -> Self {
        BedrockError::SerializationError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BedrockError>;
