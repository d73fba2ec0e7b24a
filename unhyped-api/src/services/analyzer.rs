//! Analysis step: identified title → web-search-backed verdict
//!
//! Returns the model's JSON (or a typed extraction failure) together with the
//! web-search citations the API surfaced, so the caller can fall back to those
//! sources whatever the model wrote.

use serde_json::{Map, Value};
use std::sync::Arc;

use super::json_extractor::{extract_json_object, JsonExtractError};
use super::openai_client::{
    ContentPart, InputMessage, OpenAIError, ResponseRequest, ResponsesApi, Tool,
};
use super::prompts;
use crate::models::{Identification, Source};

/// Token limit for the analysis call
pub const ANALYSIS_MAX_OUTPUT_TOKENS: u32 = 1100;

/// Ask the API to return web-search sources alongside the text
pub const INCLUDE_WEB_SOURCES: &str = "web_search_call.action.sources";

/// Raw outcome of one analysis call
#[derive(Debug)]
pub struct AnalysisOutcome {
    /// Model JSON, or why it could not be read
    pub parsed: Result<Map<String, Value>, JsonExtractError>,
    /// Citations from the web-search side channel
    pub web_sources: Vec<Source>,
}

/// Web-search analysis of an identified title
pub struct TitleAnalyzer {
    api: Arc<dyn ResponsesApi>,
    model: String,
}

impl TitleAnalyzer {
    pub fn new(api: Arc<dyn ResponsesApi>, model: String) -> Self {
        Self { api, model }
    }

    /// Request body for one analysis call
    pub fn build_request(&self, identified: &Identification) -> ResponseRequest {
        ResponseRequest {
            model: self.model.clone(),
            input: vec![
                InputMessage::system(prompts::ANALYSIS_SYSTEM),
                InputMessage::user(vec![ContentPart::text(prompts::analysis_user_prompt(
                    identified,
                ))]),
            ],
            max_output_tokens: ANALYSIS_MAX_OUTPUT_TOKENS,
            tools: vec![Tool::WebSearch],
            include: vec![INCLUDE_WEB_SOURCES.to_string()],
        }
    }

    /// Analyze `identified`; the title must be non-empty
    pub async fn analyze(&self, identified: &Identification) -> Result<AnalysisOutcome, OpenAIError> {
        let response = self.api.create_response(&self.build_request(identified)).await?;

        let parsed = extract_json_object(&response.output_text);
        if let Err(e) = &parsed {
            tracing::warn!(title = %identified.title, error = %e, "Analysis output unparsable");
        }

        Ok(AnalysisOutcome {
            parsed,
            web_sources: response.web_sources,
        })
    }
}
