use serde::{Deserialize, Serialize};

pub const TASK_TYPE_TEXT_IMAGE: &str = "TEXT_IMAGE";

pub const NUMBER_OF_IMAGES: u32 = 1;
pub const QUALITY: &str = "premium";
pub const HEIGHT: u32 = 768;
pub const WIDTH: u32 = 1280;
pub const CFG_SCALE: f32 = 7.5;
pub const SEED: u32 = 42;

/// Titan `TEXT_IMAGE` invocation body. Only the prompt varies per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub task_type: String,
    pub text_to_image_params: TextToImageParams,
    pub image_generation_config: ImageGenerationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextToImageParams {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageGenerationConfig {
    pub number_of_images: u32,
    pub quality: String,
    pub height: u32,
    pub width: u32,
    pub cfg_scale: f32,
    pub seed: u32,
}

impl Default for ImageGenerationConfig {
    fn default() -> Self {
        Self {
            number_of_images: NUMBER_OF_IMAGES,
            quality: QUALITY.to_string(),
            height: HEIGHT,
            width: WIDTH,
            cfg_scale: CFG_SCALE,
            seed: SEED,
        }
    }
}

impl GenerationRequest {
    pub fn text_to_image(prompt: impl Into<String>) -> Self {
        Self {
            task_type: TASK_TYPE_TEXT_IMAGE.to_string(),
            text_to_image_params: TextToImageParams {
                text: prompt.into(),
            },
            image_generation_config: ImageGenerationConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResponse {
    pub images: Vec<String>, // Base64 encoded
    #[serde(default)]
    pub error: Option<String>,
}

impl GenerationResponse {
    pub fn first_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_constants() {
        let request = GenerationRequest::text_to_image("a red fox");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "taskType": "TEXT_IMAGE",
                "textToImageParams": { "text": "a red fox" },
                "imageGenerationConfig": {
                    "numberOfImages": 1,
                    "quality": "premium",
                    "height": 768,
                    "width": 1280,
                    "cfgScale": 7.5,
                    "seed": 42
                }
            })
        );
    }

    #[test]
    fn test_request_prompt_passed_through_verbatim() {
        let request = GenerationRequest::text_to_image("");
        assert_eq!(request.text_to_image_params.text, "");
        assert_eq!(request.image_generation_config, ImageGenerationConfig::default());
    }

    #[test]
    fn test_response_parsing() {
        let response: GenerationResponse =
            serde_json::from_str(r#"{"images":["AAA","BBB"],"error":null}"#).unwrap();
        assert_eq!(response.first_image(), Some("AAA"));
        assert!(response.error.is_none());

        let empty: GenerationResponse = serde_json::from_str(r#"{"images":[]}"#).unwrap();
        assert_eq!(empty.first_image(), None);
    }
}
