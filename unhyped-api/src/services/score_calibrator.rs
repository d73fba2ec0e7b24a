//! Deterministic score calibration
//!
//! Each (identity key, meter) pair gets a fixed offset in `[-4, +4]` derived
//! from a 32-bit FNV-1a hash of `"{key}|{meter}"`. Repeated analyses of the
//! same title therefore shift the model's raw score by the same amount every
//! time, across process restarts. Large swings in the raw score still show.

use serde_json::{Map, Value};

use crate::models::{coerce, MeterName};

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

/// Offsets span `-MAX_OFFSET..=MAX_OFFSET`
const MAX_OFFSET: i64 = 4;

/// 32-bit FNV-1a over the UTF-8 bytes of `input`
pub fn fnv1a_32(input: &str) -> u32 {
    input.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Stable offset for a key/meter pair
pub fn calibration_offset(key: &str, meter: MeterName) -> i64 {
    let hash = fnv1a_32(&format!("{}|{}", key, meter.as_str()));
    i64::from(hash % (2 * MAX_OFFSET as u32 + 1)) - MAX_OFFSET
}

/// Calibrated score: `round(clamp(raw + offset, 0, 100))`
///
/// Non-finite raw scores count as 0.
pub fn calibrate(key: &str, raw_score: f64, meter: MeterName) -> u8 {
    let raw = if raw_score.is_finite() { raw_score } else { 0.0 };
    let shifted = raw + calibration_offset(key, meter) as f64;
    shifted.clamp(0.0, 100.0).round() as u8
}

/// Calibrate every meter present in a raw `dashboard` object, in place
///
/// Meters missing from the object are left alone (they default to 0 later).
/// A present meter with an unreadable score is calibrated from 0.
pub fn calibrate_dashboard(key: &str, analysis: &mut Map<String, Value>) {
    let Some(Value::Object(dashboard)) = analysis.get_mut("dashboard") else {
        return;
    };

    for meter in MeterName::ALL {
        if let Some(Value::Object(fields)) = dashboard.get_mut(meter.as_str()) {
            let raw = coerce::number(fields.get("score")).unwrap_or(0.0);
            let score = calibrate(key, raw, meter);
            tracing::debug!(
                meter = meter.as_str(),
                raw,
                calibrated = score,
                "Calibrated meter score"
            );
            fields.insert("score".to_string(), Value::from(score));
        }
    }
}
