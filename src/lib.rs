pub mod bedrock;
pub mod config;
pub mod error;
pub mod handler;
pub mod logger;
pub mod models;

pub use bedrock::{BedrockClient, ImageClient, ImageService};
pub use config::{BedrockConfig, Config};
pub use error::{BedrockError, Result};
pub use handler::{RequestHandler, ValidationError};
pub use models::{GenerationRequest, GenerationResponse, InboundRequest, OutboundResponse};
