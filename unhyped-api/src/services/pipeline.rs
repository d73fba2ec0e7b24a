//! Identification-and-analysis pipeline
//!
//! **Flow:**
//! 1. Identify the title in the image.
//! 2. No usable title → fixed generic result. No analysis call, no cache access.
//! 3. Cache hit on the identity key → cached result with the fresh
//!    identification overlaid.
//! 4. Cache miss → analysis call.
//!    - Unparsable output → degraded result (identification and web sources
//!      kept). Not cached, so the next request tries again.
//!    - Otherwise calibrate the meter scores, coerce into a valid result,
//!      merge identification and sources, cache, return.
//!
//! Transport failures from either call propagate as [`PipelineError`]; there
//! are no retries. The cache lock is never held across an upstream call, so two
//! concurrent misses for the same title both analyze and the last write wins.

use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

use super::analyzer::TitleAnalyzer;
use super::identifier::{ImageInput, TitleIdentifier};
use super::openai_client::{OpenAIError, ResponsesApi};
use super::result_cache::ResultCache;
use super::score_calibrator;
use crate::config::ModelSelection;
use crate::models::{AnalysisResult, Identification, Source};

/// Pipeline failure (upstream transport or HTTP error)
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Upstream model call failed: {0}")]
    Upstream(#[from] OpenAIError),
}

/// Which terminal branch produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPath {
    /// No usable title; fixed generic result
    Generic,
    /// Served from the result cache
    CacheHit,
    /// Analysis output unparsable; minimal result
    Degraded,
    /// Fresh analysis, now cached
    Analyzed,
}

impl AnalysisPath {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisPath::Generic => "generic",
            AnalysisPath::CacheHit => "cache_hit",
            AnalysisPath::Degraded => "degraded",
            AnalysisPath::Analyzed => "analyzed",
        }
    }
}

/// Result plus the branch that produced it
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub result: AnalysisResult,
    pub path: AnalysisPath,
}

/// Orchestrates identification, caching, analysis and calibration
pub struct AnalysisPipeline {
    identifier: TitleIdentifier,
    analyzer: TitleAnalyzer,
    cache: Mutex<ResultCache>,
}

impl AnalysisPipeline {
    pub fn new(api: Arc<dyn ResponsesApi>, models: &ModelSelection, cache: ResultCache) -> Self {
        Self {
            identifier: TitleIdentifier::new(api.clone(), models.vision.clone()),
            analyzer: TitleAnalyzer::new(api, models.analysis.clone()),
            cache: Mutex::new(cache),
        }
    }

    /// Run the full pipeline for one image
    pub async fn analyze_image(&self, image: &ImageInput) -> Result<AnalysisOutput, PipelineError> {
        let identified = self.identifier.identify(image).await?;

        if !identified.has_title() {
            tracing::info!("No usable title identified, returning generic result");
            return Ok(AnalysisOutput {
                result: AnalysisResult::unidentified(),
                path: AnalysisPath::Generic,
            });
        }

        let key = identified.identity_key();

        let cached = self.cache.lock().await.get(&key);
        if let Some(cached) = cached {
            tracing::info!(key = %key, "Cache hit");
            return Ok(AnalysisOutput {
                result: overlay_identification(cached, identified),
                path: AnalysisPath::CacheHit,
            });
        }

        tracing::info!(key = %key, "Cache miss, running analysis");
        let outcome = self.analyzer.analyze(&identified).await?;

        let mut analysis = match outcome.parsed {
            Ok(map) => map,
            Err(_) => {
                return Ok(AnalysisOutput {
                    result: AnalysisResult::degraded(identified, &outcome.web_sources),
                    path: AnalysisPath::Degraded,
                });
            }
        };

        score_calibrator::calibrate_dashboard(&key, &mut analysis);
        let result = finalize_analysis(
            AnalysisResult::from_value(&Value::Object(analysis)),
            &identified,
            &outcome.web_sources,
        );

        self.cache.lock().await.set(&key, result.clone());
        tracing::info!(
            key = %key,
            mismatch = result.dashboard.mismatch.score,
            hype = result.dashboard.hype.score,
            influencers = result.dashboard.influencers.score,
            sources = result.sources.len(),
            "Analysis complete and cached"
        );

        Ok(AnalysisOutput {
            result,
            path: AnalysisPath::Analyzed,
        })
    }

    /// Entries currently held by the result cache
    pub async fn cache_len(&self) -> usize {
        self.cache.lock().await.len()
    }
}

/// Cached result with the freshly recognised identification in place
pub fn overlay_identification(mut cached: AnalysisResult, fresh: Identification) -> AnalysisResult {
    cached.identified = fresh;
    cached
}

/// Merge identification (original wins) and fall back to web sources
pub fn finalize_analysis(
    coerced: AnalysisResult,
    original: &Identification,
    web_sources: &[Source],
) -> AnalysisResult {
    let identified = original.merged_with(&coerced.identified);
    AnalysisResult {
        identified,
        ..coerced
    }
    .with_fallback_sources(web_sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, TitleType};

    fn dune(confidence: Confidence) -> Identification {
        Identification {
            title: "Dune".to_string(),
            year: Some(2021),
            kind: TitleType::Movie,
            confidence,
        }
    }

    #[test]
    fn test_overlay_replaces_identification_only() {
        let cached = AnalysisResult {
            identified: dune(Confidence::Low),
            film_summary: "cached".to_string(),
            ..Default::default()
        };

        let out = overlay_identification(cached, dune(Confidence::High));
        assert_eq!(out.identified.confidence, Confidence::High);
        assert_eq!(out.film_summary, "cached");
    }

    #[test]
    fn test_finalize_keeps_original_identification() {
        let coerced = AnalysisResult {
            identified: Identification {
                title: "Dune: Part One".to_string(),
                year: Some(2020),
                kind: TitleType::Tv,
                confidence: Confidence::High,
            },
            ..Default::default()
        };
        let web = vec![Source {
            title: "web".to_string(),
            url: "https://web.example".to_string(),
        }];

        let out = finalize_analysis(coerced, &dune(Confidence::Medium), &web);
        assert_eq!(out.identified, dune(Confidence::Medium));
        assert_eq!(out.sources, web);
    }

    #[test]
    fn test_path_names() {
        assert_eq!(AnalysisPath::Generic.as_str(), "generic");
        assert_eq!(AnalysisPath::CacheHit.as_str(), "cache_hit");
        assert_eq!(AnalysisPath::Degraded.as_str(), "degraded");
        assert_eq!(AnalysisPath::Analyzed.as_str(), "analyzed");
    }
}
