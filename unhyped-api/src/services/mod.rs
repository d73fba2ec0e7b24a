//! Pipeline components
//!
//! Leaf-first: JSON extraction, score calibration and the result cache are
//! pure; the identifier and analyzer each make one upstream call through
//! [`ResponsesApi`]; the pipeline sequences them.

pub mod analyzer;
pub mod identifier;
pub mod json_extractor;
pub mod openai_client;
pub mod pipeline;
pub mod prompts;
pub mod result_cache;
pub mod score_calibrator;

pub use analyzer::{AnalysisOutcome, TitleAnalyzer};
pub use identifier::{ImageInput, TitleIdentifier};
pub use json_extractor::{extract_json_object, JsonExtractError};
pub use openai_client::{ModelResponse, OpenAIClient, OpenAIError, ResponseRequest, ResponsesApi};
pub use pipeline::{AnalysisOutput, AnalysisPath, AnalysisPipeline, PipelineError};
pub use result_cache::{CacheEntry, ResultCache};
