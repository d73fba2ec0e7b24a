//! Film/TV identification extracted from an image

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::coerce;

/// Earliest accepted release year
pub const MIN_YEAR: i64 = 1800;
/// Latest accepted release year
pub const MAX_YEAR: i64 = 2100;

/// Kind of title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleType {
    Movie,
    Tv,
    #[default]
    Unknown,
}

impl TitleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleType::Movie => "movie",
            TitleType::Tv => "tv",
            TitleType::Unknown => "unknown",
        }
    }

    /// Case-insensitive parse, anything unrecognised is `Unknown`
    pub fn from_value(value: Option<&Value>) -> Self {
        match coerce::token(value).as_str() {
            "movie" => TitleType::Movie,
            "tv" => TitleType::Tv,
            _ => TitleType::Unknown,
        }
    }
}

/// How sure the vision model is about the title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    #[default]
    Low,
    Medium,
    High,
}

impl Confidence {
    /// Case-insensitive parse (Dutch synonyms accepted), fallback `Low`
    pub fn from_value(value: Option<&Value>) -> Self {
        match coerce::token(value).as_str() {
            "medium" | "middel" => Confidence::Medium,
            "high" | "hoog" => Confidence::High,
            _ => Confidence::Low,
        }
    }
}

/// Title, year, type and confidence recognised in an image
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identification {
    pub title: String,
    pub year: Option<u16>,
    #[serde(rename = "type")]
    pub kind: TitleType,
    pub confidence: Confidence,
}

impl Identification {
    /// Coerce arbitrary JSON into an identification, defaulting bad fields
    pub fn from_value(value: &Value) -> Self {
        let value = Some(value);
        Self {
            title: coerce::string(coerce::field(value, "title")).trim().to_string(),
            year: coerce::bounded_int(coerce::field(value, "year"), MIN_YEAR, MAX_YEAR)
                .map(|y| y as u16),
            kind: TitleType::from_value(coerce::field(value, "type")),
            confidence: Confidence::from_value(coerce::field(value, "confidence")),
        }
    }

    /// Whether a usable title was recognised
    pub fn has_title(&self) -> bool {
        !self.title.trim().is_empty()
    }

    /// Canonical identity key: `normalized title|year|type`
    ///
    /// Used both as the cache key and as the calibration seed, so two photos
    /// of the same film map to the same entry and the same score offsets.
    pub fn identity_key(&self) -> String {
        format!(
            "{}|{}|{}",
            normalize_title(&self.title),
            self.year.map(|y| y.to_string()).unwrap_or_default(),
            self.kind.as_str()
        )
    }

    /// Fill gaps in `self` from an identification echoed by a later step
    ///
    /// `self` wins every conflict; the echo only supplies a title when ours is
    /// empty, a year when ours is absent and a type when ours is unknown.
    pub fn merged_with(&self, echoed: &Identification) -> Identification {
        Identification {
            title: if self.has_title() {
                self.title.clone()
            } else {
                echoed.title.clone()
            },
            year: self.year.or(echoed.year),
            kind: match self.kind {
                TitleType::Unknown => echoed.kind,
                kind => kind,
            },
            confidence: self.confidence,
        }
    }
}

/// Lowercase, trim and collapse internal whitespace runs
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
