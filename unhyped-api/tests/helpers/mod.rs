//! Shared test utilities
//!
//! A scripted stand-in for the Responses API plus canned model outputs.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use unhyped_api::config::ModelSelection;
use unhyped_api::models::Source;
use unhyped_api::services::{
    AnalysisPipeline, ImageInput, ModelResponse, OpenAIError, ResponseRequest, ResponsesApi,
    ResultCache,
};
use unhyped_common::ManualClock;

/// Replies in the order they were queued and records every request
#[derive(Default)]
pub struct ScriptedApi {
    replies: Mutex<VecDeque<Result<ModelResponse, OpenAIError>>>,
    requests: Mutex<Vec<ResponseRequest>>,
}

impl ScriptedApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push_text(&self, text: &str) {
        self.push(Ok(ModelResponse::from_text(text)));
    }

    pub fn push_with_sources(&self, text: &str, sources: Vec<Source>) {
        self.push(Ok(ModelResponse {
            output_text: text.to_string(),
            web_sources: sources,
        }));
    }

    pub fn push_error(&self, error: OpenAIError) {
        self.push(Err(error));
    }

    fn push(&self, reply: Result<ModelResponse, OpenAIError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<ResponseRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ResponsesApi for ScriptedApi {
    async fn create_response(&self, request: &ResponseRequest) -> Result<ModelResponse, OpenAIError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(OpenAIError::NetworkError("no scripted reply".to_string())))
    }
}

pub fn test_models() -> ModelSelection {
    ModelSelection {
        vision: "vision-test".to_string(),
        analysis: "analysis-test".to_string(),
    }
}

pub fn test_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new(Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()))
}

/// Pipeline over `api` with a 7-day, 250-entry cache
pub fn test_pipeline(api: Arc<ScriptedApi>, clock: Arc<ManualClock>) -> AnalysisPipeline {
    let cache = ResultCache::new(clock, chrono::Duration::days(7), 250);
    AnalysisPipeline::new(api, &test_models(), cache)
}

pub fn test_image() -> ImageInput {
    ImageInput {
        base64: "/9j/AAAA".to_string(),
        mime_type: "image/jpeg".to_string(),
    }
}

pub fn source(title: &str, url: &str) -> Source {
    Source {
        title: title.to_string(),
        url: url.to_string(),
    }
}

pub const DUNE_IDENTIFICATION: &str =
    r#"{"title":"Dune","year":2021,"type":"movie","confidence":"high"}"#;

pub const UNKNOWN_IDENTIFICATION: &str =
    r#"{"title":"","year":null,"type":"unknown","confidence":"low"}"#;

/// Analysis output for Dune, wrapped in prose the way models often do
pub const DUNE_ANALYSIS: &str = r#"Hier is de analyse:
```json
{
  "identified": {"title": "Dune: Part One", "year": 2021, "type": "movie", "confidence": "medium"},
  "filmSummary": "Een trage, visueel overweldigende woestijnsaga.",
  "verdict": {
    "line": "Leuk als je spektakel zoekt — maar verwacht geen actiefilm",
    "bullets": ["• Prachtig beeld", "- Traag tempo", "Open einde"]
  },
  "dashboard": {
    "mismatch": {"score": 73, "level": "high", "shortWhy": "Trailer belooft actie", "labels": ["traag"]},
    "hype": {"score": 60, "level": "medium", "shortWhy": "Grote campagne"},
    "influencers": {"score": 50, "level": "medium", "shortWhy": "Veel reacties"}
  },
  "worksFor": ["Sci-fi fans"],
  "skipIf": ["Je wilt snelle actie"],
  "expectationGap": {"promise": "Epische actie", "reality": "Langzame opbouw", "why": "Boekverfilming in delen"},
  "sources": []
}
```"#;
