//! The analysis result returned to clients and stored in the result cache
//!
//! `AnalysisResult::from_value` is the validator/coercer: it accepts any JSON
//! (typically the model's partially-correct output) and always produces a
//! fully-formed result, defaulting or clamping whatever is missing or invalid.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce;
use super::identification::{Identification, TitleType};

/// Cap for audience lists (`worksFor`, `skipIf`)
pub const MAX_AUDIENCE_ITEMS: usize = 8;
/// Cap for provenance records
pub const MAX_SOURCES: usize = 8;
/// Cap for other free-form lists (verdict bullets, meter labels)
pub const MAX_LIST_ITEMS: usize = 12;

/// Explanation used on every meter when the analysis output was unusable
pub const ANALYSIS_FAILED_WHY: &str = "Analyse mislukt";

/// Coarse bucket for a meter score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
    #[default]
    Unknown,
}

impl Level {
    /// Case-insensitive parse (Dutch synonyms accepted), fallback `Unknown`
    pub fn from_value(value: Option<&Value>) -> Self {
        match coerce::token(value).as_str() {
            "low" | "laag" => Level::Low,
            "medium" | "middel" => Level::Medium,
            "high" | "hoog" => Level::High,
            _ => Level::Unknown,
        }
    }
}

/// One 0-100 scored dimension of the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meter {
    pub score: u8,
    pub level: Level,
    pub short_why: String,
    pub labels: Vec<String>,
}

impl Meter {
    pub fn from_value(value: Option<&Value>) -> Self {
        Self {
            score: coerce::clamped_int(coerce::field(value, "score"), 0, 100).unwrap_or(0) as u8,
            level: Level::from_value(coerce::field(value, "level")),
            short_why: coerce::string(coerce::field(value, "shortWhy")),
            labels: coerce::string_list(coerce::field(value, "labels"), MAX_LIST_ITEMS),
        }
    }

    /// Score 0, level unknown, with an explanation
    pub fn unknown(short_why: &str) -> Self {
        Self {
            short_why: short_why.to_string(),
            ..Default::default()
        }
    }
}

/// Named meters of an analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterName {
    Mismatch,
    Hype,
    Influencers,
}

impl MeterName {
    pub const ALL: [MeterName; 3] = [MeterName::Mismatch, MeterName::Hype, MeterName::Influencers];

    /// JSON field name, also part of the calibration seed
    pub fn as_str(&self) -> &'static str {
        match self {
            MeterName::Mismatch => "mismatch",
            MeterName::Hype => "hype",
            MeterName::Influencers => "influencers",
        }
    }
}

/// The three meters
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Dashboard {
    pub mismatch: Meter,
    pub hype: Meter,
    pub influencers: Meter,
}

impl Dashboard {
    pub fn meter(&self, name: MeterName) -> &Meter {
        match name {
            MeterName::Mismatch => &self.mismatch,
            MeterName::Hype => &self.hype,
            MeterName::Influencers => &self.influencers,
        }
    }

    fn all_unknown(mismatch: &str, hype: &str, influencers: &str) -> Self {
        Self {
            mismatch: Meter::unknown(mismatch),
            hype: Meter::unknown(hype),
            influencers: Meter::unknown(influencers),
        }
    }
}

/// One-line verdict plus supporting bullets
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Verdict {
    pub line: String,
    pub bullets: Vec<String>,
}

/// Public promise vs. viewer experience
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExpectationGap {
    pub promise: String,
    pub reality: String,
    pub why: String,
}

/// Provenance for web-search evidence
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Source {
    pub title: String,
    pub url: String,
}

impl Source {
    /// Source from an object with a non-empty `url`
    pub fn from_value(value: &Value) -> Option<Self> {
        let value = Some(value);
        let url = coerce::string(coerce::field(value, "url")).trim().to_string();
        if url.is_empty() {
            return None;
        }
        Some(Self {
            title: coerce::string(coerce::field(value, "title")),
            url,
        })
    }
}

/// Full analysis of one identified title
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub identified: Identification,
    pub film_summary: String,
    pub verdict: Verdict,
    pub dashboard: Dashboard,
    pub works_for: Vec<String>,
    pub skip_if: Vec<String>,
    pub expectation_gap: ExpectationGap,
    pub sources: Vec<Source>,
}

impl AnalysisResult {
    /// Coerce arbitrary JSON into a conforming result
    pub fn from_value(value: &Value) -> Self {
        let root = Some(value);
        let verdict = coerce::field(root, "verdict");
        let dashboard = coerce::field(root, "dashboard");
        let gap = coerce::field(root, "expectationGap");

        let sources = match coerce::field(root, "sources") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Source::from_value)
                .take(MAX_SOURCES)
                .collect(),
            _ => Vec::new(),
        };

        Self {
            identified: coerce::field(root, "identified")
                .map(Identification::from_value)
                .unwrap_or_default(),
            film_summary: coerce::string(coerce::field(root, "filmSummary")),
            verdict: Verdict {
                line: coerce::string(coerce::field(verdict, "line")),
                bullets: coerce::string_list(coerce::field(verdict, "bullets"), MAX_LIST_ITEMS),
            },
            dashboard: Dashboard {
                mismatch: Meter::from_value(coerce::field(dashboard, MeterName::Mismatch.as_str())),
                hype: Meter::from_value(coerce::field(dashboard, MeterName::Hype.as_str())),
                influencers: Meter::from_value(coerce::field(
                    dashboard,
                    MeterName::Influencers.as_str(),
                )),
            },
            works_for: coerce::string_list(coerce::field(root, "worksFor"), MAX_AUDIENCE_ITEMS),
            skip_if: coerce::string_list(coerce::field(root, "skipIf"), MAX_AUDIENCE_ITEMS),
            expectation_gap: ExpectationGap {
                promise: coerce::string(coerce::field(gap, "promise")),
                reality: coerce::string(coerce::field(gap, "reality")),
                why: coerce::string(coerce::field(gap, "why")),
            },
            sources,
        }
    }

    /// Conservative result for an image whose title could not be read
    pub fn unidentified() -> Self {
        Self {
            identified: Identification::default(),
            film_summary: "Onbekend welke film dit precies is. Het ziet eruit als een \
                film/posterbeeld, maar ik kan de titel niet betrouwbaar lezen."
                .to_string(),
            verdict: Verdict {
                line: "Leuk als je iets in deze sfeer zoekt — maar verwacht geen precieze match"
                    .to_string(),
                bullets: vec![
                    "Maak een close-up van de titel voor betere herkenning.".to_string(),
                    "Zonder titel kan ik geen echte kijkerservaringen ophalen.".to_string(),
                    "De analyse hieronder is daarom algemeen en voorzichtig.".to_string(),
                ],
            },
            dashboard: Dashboard::all_unknown(
                "Titel onbekend: geen betrouwbare reviews gevonden.",
                "Titel onbekend: geen betrouwbare hype-signalen te koppelen.",
                "Titel onbekend: geen betrouwbare influencer-signalen te koppelen.",
            ),
            ..Default::default()
        }
    }

    /// Minimal result for a recognised title whose analysis was unparsable
    pub fn degraded(identified: Identification, sources: &[Source]) -> Self {
        let kind = match identified.kind {
            TitleType::Tv => "tv",
            _ => "movie",
        };
        Self {
            film_summary: format!(
                "{} lijkt een {}. Ik kon geen nette JSON-analyse terugkrijgen, \
                 maar de titel is wel herkend.",
                identified.title, kind
            ),
            verdict: Verdict {
                line: format!(
                    "Leuk als je {} zoekt — maar verwacht geen perfecte analyse",
                    identified.title
                ),
                bullets: Vec::new(),
            },
            dashboard: Dashboard::all_unknown(
                ANALYSIS_FAILED_WHY,
                ANALYSIS_FAILED_WHY,
                ANALYSIS_FAILED_WHY,
            ),
            sources: sources.iter().take(MAX_SOURCES).cloned().collect(),
            identified,
            ..Default::default()
        }
    }

    /// Replace `sources` with `extracted` when the model supplied none
    pub fn with_fallback_sources(mut self, extracted: &[Source]) -> Self {
        if self.sources.is_empty() {
            self.sources = extracted.iter().take(MAX_SOURCES).cloned().collect();
        }
        self
    }
}
