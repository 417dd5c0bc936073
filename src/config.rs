use crate::logger::LoggerConfig;
use std::env;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_IMAGE_MODEL: &str = "amazon.titan-image-generator-v1";

#[derive(Debug, Clone)]
pub struct BedrockConfig {
    pub region: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub session_token: Option<String>,
    pub model_id: Option<String>,
    pub endpoint_url: Option<String>,
}

impl Default for BedrockConfig {
    fn default() -> Self {
        BedrockConfig {
            region: None,
            access_key: None,
            secret_key: None,
            session_token: None,
            model_id: None,
            endpoint_url: None,
        }
    }
}

impl BedrockConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads `BEDROCK_REGION`, `BEDROCK_IMAGE_MODEL_ID` and
    /// `BEDROCK_ENDPOINT_URL`. Credentials are never taken from here; the
    /// SDK default chain resolves them (including the execution role's
    /// session token).
    pub fn from_env() -> Self {
        let region = env::var("BEDROCK_REGION").ok();
        let model_id = env::var("BEDROCK_IMAGE_MODEL_ID").ok();
        let endpoint_url = env::var("BEDROCK_ENDPOINT_URL").ok();

        BedrockConfig {
            region,
            model_id,
            endpoint_url,
            ..Default::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn with_credentials(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Only meaningful together with `with_credentials`.
    pub fn with_session_token(mut self, session_token: impl Into<String>) -> Self {
        self.session_token = Some(session_token.into());
        self
    }

    pub fn with_endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    pub fn with_model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = Some(model_id.into());
        self
    }

    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn model_id(&self) -> &str {
        self.model_id.as_deref().unwrap_or(DEFAULT_IMAGE_MODEL)
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bedrock: BedrockConfig,
    pub logger: LoggerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bedrock: BedrockConfig::default(),
            logger: LoggerConfig::production(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            bedrock: BedrockConfig::from_env(),
            logger: LoggerConfig::from_env(),
        }
    }
}
