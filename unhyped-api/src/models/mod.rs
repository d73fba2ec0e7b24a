//! Data model for the identification-and-analysis pipeline
//!
//! Every type here can be built from loosely-shaped JSON without failing; see
//! [`coerce`] for the shared lenient readers.

pub mod analysis_result;
pub mod coerce;
pub mod identification;

pub use analysis_result::{
    AnalysisResult, Dashboard, ExpectationGap, Level, Meter, MeterName, Source, Verdict,
    ANALYSIS_FAILED_WHY,
};
pub use identification::{normalize_title, Confidence, Identification, TitleType};
