use crate::config::Config;
use crate::error::{AppError, Result};
use crate::generation::{GenerationRequest, ImageGenerator};
use async_trait::async_trait;
use gemini_rust::{Blob, Content, Gemini, GenerationConfig, Message, Part, Role};

const IMAGE_MODALITY: &str = "IMAGE";

pub struct GeminiClient {
    client: Gemini,
    model_name: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        // Initialize the client with the API key and model, explicitly setting the base URL to avoid BadScheme error
        let base_url = url::Url::parse("https://generativelanguage.googleapis.com/v1beta/")
            .map_err(|e| AppError::Config(format!("Invalid base URL: {}", e)))?;

        let model_name = if config.model_name.starts_with("models/") {
            config.model_name.clone()
        } else {
            format!("models/{}", config.model_name)
        };
        let model_url = format!("https://generativelanguage.googleapis.com/v1beta/{}", model_name);

        let client = Gemini::with_model_and_base_url(&config.gemini_api_key, model_url, base_url)
            .map_err(|e| AppError::Config(format!("Failed to create Gemini client: {}", e)))?;

        Ok(Self { client, model_name })
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    /// Sends the source image and instructions, returns the edited image as Base64
    async fn edit_image(&self, request: &GenerationRequest) -> Result<String> {
        let message = build_message(request);

        tracing::debug!(
            model = %self.model_name,
            media_type = %request.media_type,
            payload_len = request.payload.len(),
            "Sending image edit request"
        );

        let response = self
            .client
            .generate_content()
            .with_messages(vec![message])
            .with_generation_config(image_output())
            .execute()
            .await
            .map_err(|e| classify_failure(e.to_string()))?;

        let parts = response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.as_deref())
            .unwrap_or_default();

        extract_image_payload(parts)
    }
}

/// One user turn: the source image first, then the instructions.
pub fn build_message(request: &GenerationRequest) -> Message {
    let image_part = Part::InlineData {
        inline_data: Blob {
            mime_type: request.media_type.clone(),
            data: request.payload.clone(),
        },
        media_resolution: None,
    };

    let text_part = Part::Text {
        text: request.instructions.clone(),
        thought: None,
        thought_signature: None,
    };

    Message {
        role: Role::User,
        content: Content {
            role: Some(Role::User),
            parts: Some(vec![image_part, text_part]),
        },
    }
}

/// Asks the model to answer with an image.
fn image_output() -> GenerationConfig {
    GenerationConfig {
        response_modalities: Some(vec![IMAGE_MODALITY.to_string()]),
        ..Default::default()
    }
}

/// Returns the first non-empty inline image among a candidate's parts.
pub fn extract_image_payload(parts: &[Part]) -> Result<String> {
    parts
        .iter()
        .find_map(|part| match part {
            Part::InlineData { inline_data, .. } if !inline_data.data.is_empty() => {
                Some(inline_data.data.clone())
            }
            _ => None,
        })
        .ok_or(AppError::NoImageData)
}

fn classify_failure(message: String) -> AppError {
    if message.contains("429") || message.contains("RESOURCE_EXHAUSTED") {
        AppError::RateLimited
    } else {
        AppError::gemini(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Part {
        Part::Text {
            text: s.to_string(),
            thought: None,
            thought_signature: None,
        }
    }

    fn inline(data: &str) -> Part {
        Part::InlineData {
            inline_data: Blob {
                mime_type: "image/png".to_string(),
                data: data.to_string(),
            },
            media_resolution: None,
        }
    }

    #[test]
    fn finds_image_after_text() {
        let parts = vec![text("Here is your headshot"), inline("Zm9v")];
        assert_eq!(extract_image_payload(&parts).unwrap(), "Zm9v");
    }

    #[test]
    fn missing_or_empty_image_is_an_error() {
        assert!(matches!(extract_image_payload(&[]), Err(AppError::NoImageData)));
        assert!(matches!(
            extract_image_payload(&[text("sorry"), inline("")]),
            Err(AppError::NoImageData)
        ));
    }

    fn request() -> GenerationRequest {
        GenerationRequest {
            ticket: 3,
            payload: "/9j/4AAQ".to_string(),
            media_type: "image/jpeg".to_string(),
            instructions: "Studio lighting. Additional instructions: Smile".to_string(),
        }
    }

    #[test]
    fn message_sends_image_then_instructions() {
        let message = build_message(&request());
        assert!(matches!(message.role, Role::User));

        let parts = message.content.parts.expect("message should carry parts");
        assert_eq!(parts.len(), 2);

        match &parts[0] {
            Part::InlineData { inline_data, .. } => {
                assert_eq!(inline_data.mime_type, "image/jpeg");
                assert_eq!(inline_data.data, "/9j/4AAQ");
            }
            other => panic!("expected the image first, got {other:?}"),
        }
        match &parts[1] {
            Part::Text { text, .. } => {
                assert_eq!(text, "Studio lighting. Additional instructions: Smile");
            }
            other => panic!("expected the instructions second, got {other:?}"),
        }
    }

    #[test]
    fn requests_image_output() {
        let config = image_output();
        assert_eq!(config.response_modalities, Some(vec!["IMAGE".to_string()]));
        assert!(config.temperature.is_none());
    }

    #[test]
    fn rate_limits_are_recognised() {
        assert!(matches!(
            classify_failure("status 429 Too Many Requests".into()),
            AppError::RateLimited
        ));
        assert!(matches!(
            classify_failure("connection reset".into()),
            AppError::GeminiApi(_)
        ));
    }
}
