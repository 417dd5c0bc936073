pub mod image_client;
pub mod traits;

use crate::{config::BedrockConfig, error::Result};
use aws_config::{BehaviorVersion, SdkConfig};
use aws_sdk_bedrockruntime::{
    config::{Credentials, Region},
    Client,
};

pub use image_client::ImageClient;
pub use traits::ImageService;

/// Process-wide Bedrock handle. Built once at cold start and shared
/// read-only by every invocation.
#[derive(Clone)]
pub struct BedrockClient {
    image_client: ImageClient,
}

/// Resolves the shared AWS config. Without explicit keys the SDK default
/// chain supplies credentials, which on Lambda are the role's temporary
/// keys plus `AWS_SESSION_TOKEN`.
pub async fn load_sdk_config(bedrock_config: &BedrockConfig) -> SdkConfig {
    let region = Region::new(bedrock_config.region().to_string());
    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);

    if let (Some(access_key), Some(secret_key)) =
        (&bedrock_config.access_key, &bedrock_config.secret_key)
    {
        loader = loader.credentials_provider(Credentials::new(
            access_key,
            secret_key,
            bedrock_config.session_token.clone(),
            None,
            "titan-image-lambda",
        ));
    }

    if let Some(endpoint_url) = &bedrock_config.endpoint_url {
        log::info!("Using Bedrock endpoint override {}", endpoint_url);
        loader = loader.endpoint_url(endpoint_url);
    }

    loader.load().await
}

impl BedrockClient {
    pub async fn new(bedrock_config: BedrockConfig) -> Result<Self> {
        let aws_config = load_sdk_config(&bedrock_config).await;
        log::info!(
            "Bedrock client configured for region {}",
            bedrock_config.region()
        );

        let client = Client::new(&aws_config);
        let image_client = ImageClient::with_model(client, bedrock_config.model_id())?;

        Ok(Self { image_client })
    }

    pub fn image(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn into_image_client(self) -> ImageClient {
        self.image_client
    }
}
