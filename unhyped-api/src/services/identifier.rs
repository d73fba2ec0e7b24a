//! Identification step: image → title/year/type/confidence
//!
//! Unparsable model output becomes an empty identification
//! rather than an error; only transport failures propagate.

use serde_json::Value;
use std::sync::Arc;

use super::json_extractor::extract_json_object;
use super::openai_client::{
    ContentPart, InputMessage, OpenAIError, ResponseRequest, ResponsesApi,
};
use super::prompts;
use crate::models::Identification;

/// Token limit for the identification call
pub const IDENTIFY_MAX_OUTPUT_TOKENS: u32 = 250;

/// Image to identify, already base64-encoded
#[derive(Debug, Clone)]
pub struct ImageInput {
    pub base64: String,
    pub mime_type: String,
}

/// Vision-model title identifier
pub struct TitleIdentifier {
    api: Arc<dyn ResponsesApi>,
    model: String,
}

impl TitleIdentifier {
    pub fn new(api: Arc<dyn ResponsesApi>, model: String) -> Self {
        Self { api, model }
    }

    /// Request body for one identification call
    pub fn build_request(&self, image: &ImageInput) -> ResponseRequest {
        ResponseRequest {
            model: self.model.clone(),
            input: vec![
                InputMessage::system(prompts::IDENTIFY_SYSTEM),
                InputMessage::user(vec![
                    ContentPart::text(prompts::IDENTIFY_USER),
                    ContentPart::image(&image.mime_type, &image.base64),
                ]),
            ],
            max_output_tokens: IDENTIFY_MAX_OUTPUT_TOKENS,
            tools: Vec::new(),
            include: Vec::new(),
        }
    }

    /// Identify the title shown in `image`
    pub async fn identify(&self, image: &ImageInput) -> Result<Identification, OpenAIError> {
        let response = self.api.create_response(&self.build_request(image)).await?;

        let identified = match extract_json_object(&response.output_text) {
            Ok(map) => Identification::from_value(&Value::Object(map)),
            Err(e) => {
                tracing::warn!(error = %e, "Identification output unparsable, treating as unknown");
                Identification::default()
            }
        };

        tracing::info!(
            title = %identified.title,
            year = ?identified.year,
            kind = identified.kind.as_str(),
            confidence = ?identified.confidence,
            "Identification complete"
        );

        Ok(identified)
    }
}
