//! Lenient readers for loosely-shaped model output
//!
//! Every reader takes an optional JSON value and returns a well-typed value,
//! falling back to a default instead of failing.

use serde_json::Value;

/// Characters the model likes to prefix list items with
const BULLET_CHARS: &[char] = &['•', '-', '–', '—'];

/// Look up `key` when `value` is an object
pub fn field<'a>(value: Option<&'a Value>, key: &str) -> Option<&'a Value> {
    value.and_then(|v| v.as_object()).and_then(|o| o.get(key))
}

/// String value or empty string
pub fn string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Number from a JSON number or a numeric string
pub fn number(value: Option<&Value>) -> Option<f64> {
    let n = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Rounded integer clamped into `[min, max]`
pub fn clamped_int(value: Option<&Value>, min: i64, max: i64) -> Option<i64> {
    number(value).map(|n| (n.round() as i64).clamp(min, max))
}

/// Rounded integer, absent when outside `[min, max]`
pub fn bounded_int(value: Option<&Value>, min: i64, max: i64) -> Option<i64> {
    number(value)
        .map(|n| n.round() as i64)
        .filter(|n| (min..=max).contains(n))
}

/// Lowercased, trimmed string for enum matching
pub fn token(value: Option<&Value>) -> String {
    string(value).trim().to_lowercase()
}

/// Strip a leading bullet run and surrounding whitespace
pub fn clean_item(item: &str) -> String {
    item.trim()
        .trim_start_matches(|c: char| BULLET_CHARS.contains(&c))
        .trim()
        .to_string()
}

/// Cleaned, non-empty string items, at most `max`
pub fn string_list(value: Option<&Value>, max: usize) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| item.as_str())
        .map(clean_item)
        .filter(|item| !item.is_empty())
        .take(max)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_rejects_non_strings() {
        assert_eq!(string(Some(&json!("abc"))), "abc");
        assert_eq!(string(Some(&json!(12))), "");
        assert_eq!(string(None), "");
    }

    #[test]
    fn test_number_accepts_numeric_strings() {
        assert_eq!(number(Some(&json!(73))), Some(73.0));
        assert_eq!(number(Some(&json!(" 41.5 "))), Some(41.5));
        assert_eq!(number(Some(&json!("high"))), None);
        assert_eq!(number(Some(&json!(null))), None);
    }

    #[test]
    fn test_clamped_int() {
        assert_eq!(clamped_int(Some(&json!(140)), 0, 100), Some(100));
        assert_eq!(clamped_int(Some(&json!(-3)), 0, 100), Some(0));
        assert_eq!(clamped_int(Some(&json!("72.6")), 0, 100), Some(73));
    }

    #[test]
    fn test_bounded_int_drops_out_of_range() {
        assert_eq!(bounded_int(Some(&json!(2021)), 1800, 2100), Some(2021));
        assert_eq!(bounded_int(Some(&json!(1700)), 1800, 2100), None);
        assert_eq!(bounded_int(Some(&json!("1999")), 1800, 2100), Some(1999));
    }

    #[test]
    fn test_clean_item_strips_bullets() {
        assert_eq!(clean_item("• Fans van sci-fi"), "Fans van sci-fi");
        assert_eq!(clean_item("-- dubbel"), "dubbel");
        assert_eq!(clean_item("— lang streepje "), "lang streepje");
        assert_eq!(clean_item("half-time show"), "half-time show");
    }

    #[test]
    fn test_string_list_filters_and_caps() {
        let value = json!(["• a", "", "  ", 5, "b", "c", "d"]);
        assert_eq!(string_list(Some(&value), 2), vec!["a", "b"]);
        assert!(string_list(Some(&json!("not a list")), 8).is_empty());
    }
}
