use crate::{
    bedrock::ImageService,
    config::DEFAULT_IMAGE_MODEL,
    error::{BedrockError, Result},
    logger,
    models::{GenerationRequest, GenerationResponse},
};
use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use base64::{engine::general_purpose::STANDARD, Engine as _};

const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    model_id: String,
}

impl ImageClient {
    pub fn with_model(client: Client, model_id: &str) -> Result<Self> {
        if !Self::is_supported(model_id) {
            return Err(BedrockError::ConfigError(format!(
                "Unsupported image model: {}",
                model_id
            )));
        }
        Ok(Self {
            client,
            model_id: model_id.to_string(),
        })
    }

    /// (model id, display name, provider)
    pub fn supported_models() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![(DEFAULT_IMAGE_MODEL, "Titan Image Generator G1", "Amazon")]
    }

    pub fn is_supported(model_id: &str) -> bool {
        Self::supported_models()
            .iter()
            .any(|(id, _, _)| *id == model_id)
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn build_payload(prompt: &str) -> Result<String> {
        let request = GenerationRequest::text_to_image(prompt);
        Ok(serde_json::to_string(&request)?)
    }

    pub fn parse_response(body: &[u8]) -> Result<String> {
        let response: GenerationResponse = serde_json::from_slice(body)
            .map_err(|e| BedrockError::ResponseError(e.to_string()))?;

        if let Some(error) = &response.error {
            log::warn!("Titan reported an error alongside its output: {}", error);
        }

        let image = response
            .first_image()
            .ok_or_else(|| BedrockError::ResponseError("No images generated".into()))?;

        if log::log_enabled!(log::Level::Debug) {
            match STANDARD.decode(image) {
                Ok(bytes) => log::debug!("Decoded image payload: {} bytes", bytes.len()),
                Err(e) => log::warn!("Image payload is not valid base64: {}", e),
            }
        }

        Ok(image.to_string())
    }
}

#[async_trait]
impl ImageService for ImageClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let request_json = Self::build_payload(prompt)?;

        log::info!("Generating image with model: {}", self.model_id);
        log::debug!("Image generation request payload: {}", request_json);

        let _timer = logger::timer("bedrock invoke_model");
        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type(CONTENT_TYPE_JSON)
            .accept(CONTENT_TYPE_JSON)
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                log::error!("Couldn't invoke {}: {:?}", self.model_id, e);

                if let Some(service_error) = e.as_service_error() {
                    BedrockError::AwsServiceError(format!(
                        "{} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    BedrockError::AwsError(e.to_string())
                }
            })?;

        Self::parse_response(response.body.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_bedrockruntime::config::{BehaviorVersion, Region};

    #[test]
    fn test_payload_for_prompt() {
        let payload = ImageClient::build_payload("a red fox").unwrap();
        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["taskType"], "TEXT_IMAGE");
        assert_eq!(value["textToImageParams"]["text"], "a red fox");
        assert_eq!(value["imageGenerationConfig"]["numberOfImages"], 1);
        assert_eq!(value["imageGenerationConfig"]["quality"], "premium");
        assert_eq!(value["imageGenerationConfig"]["height"], 768);
        assert_eq!(value["imageGenerationConfig"]["width"], 1280);
        assert_eq!(value["imageGenerationConfig"]["cfgScale"], 7.5);
        assert_eq!(value["imageGenerationConfig"]["seed"], 42);
    }

    #[test]
    fn test_parse_response_takes_first_image() {
        let body = br#"{"images":["iVBORw0KGgo=","c2Vjb25k"],"error":null}"#;
        assert_eq!(ImageClient::parse_response(body).unwrap(), "iVBORw0KGgo=");
    }

    #[test]
    fn test_parse_response_without_images() {
        let err = ImageClient::parse_response(br#"{"images":[]}"#).unwrap_err();
        assert!(matches!(
            err,
            BedrockError::ResponseError(ref msg) if msg == "No images generated"
        ));
    }

    #[test]
    fn test_parse_response_malformed_body() {
        let err = ImageClient::parse_response(b"<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, BedrockError::ResponseError(_)));
    }

    fn offline_client() -> Client {
        let config = aws_sdk_bedrockruntime::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        Client::from_conf(config)
    }

    #[test]
    fn test_with_model_rejects_unknown_model() {
        match ImageClient::with_model(offline_client(), "stability.stable-diffusion-xl-v1") {
            Err(BedrockError::ConfigError(msg)) => {
                assert_eq!(msg, "Unsupported image model: stability.stable-diffusion-xl-v1")
            }
            Err(other) => panic!("unexpected error: {:?}", other),
            Ok(_) => panic!("unsupported model was accepted"),
        }

        let client = ImageClient::with_model(offline_client(), DEFAULT_IMAGE_MODEL).unwrap();
        assert_eq!(client.model_id(), "amazon.titan-image-generator-v1");
    }

    #[test]
    fn test_supported_models() {
        assert!(ImageClient::is_supported("amazon.titan-image-generator-v1"));
        assert!(!ImageClient::is_supported("stability.stable-diffusion-xl-v1"));
    }
}
