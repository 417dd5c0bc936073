use crate::{
    bedrock::ImageService,
    error::Result,
    models::{InboundRequest, OutboundResponse},
};
use thiserror::Error;

pub const PROMPT_PARAM: &str = "prompt";

/// Rejections answered with a 400 and a plain-text body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("No query string parameters passed in")]
    MissingQueryString,
    #[error("Prompt needs to be passed in the query string parameters")]
    MissingPrompt,
}

impl From<ValidationError> for OutboundResponse {
    fn from(err: ValidationError) -> Self {
        OutboundResponse::text(400, err.to_string())
    }
}

pub fn extract_prompt(request: &InboundRequest) -> std::result::Result<&str, ValidationError> {
    let params = request
        .query_string_parameters
        .as_ref()
        .ok_or(ValidationError::MissingQueryString)?;

    params
        .get(PROMPT_PARAM)
        .map(String::as_str)
        .ok_or(ValidationError::MissingPrompt)
}

pub fn render_html(image_data: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>Amazon Bedrock - Titan Image Generator</title>
</head>
<body>
    <img src="data:image/png;base64,{}" alt="Base64 Image">
</body>
</html>
"#,
        image_data
    )
}

pub struct RequestHandler<S> {
    service: S,
}

impl<S: ImageService> RequestHandler<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Validation failures become 400 responses; service failures are
    /// returned untouched.
    pub async fn handle(&self, request: InboundRequest) -> Result<OutboundResponse> {
        let prompt = match extract_prompt(&request) {
            Ok(prompt) => prompt,
            Err(err) => {
                log::warn!("Rejecting request: {}", err);
                return Ok(err.into());
            }
        };

        log::info!("Generating image for prompt ({} chars)", prompt.chars().count());

        let image_data = self.service.generate(prompt).await.map_err(|e| {
            log::error!("Image generation failed: {}", e);
            e
        })?;

        log::debug!("Received {} base64 chars from image service", image_data.len());
        Ok(OutboundResponse::html(render_html(&image_data)))
    }
}
