//! Normalization of logged reps and weights.
//!
//! Values arrive as user-typed text or as loosely typed JSON. Anything that is
//! not a usable non-negative finite number is read as absent, never as zero.

use serde::{Deserialize, Deserializer};

/// Parse a rep count; fractional, negative or non-numeric input is absent
pub fn parse_reps(raw: &str) -> Option<u32> {
    let value: f64 = raw.trim().parse().ok()?;
    reps_from_f64(value)
}

/// Parse a weight; negative, non-finite or non-numeric input is absent
pub fn parse_weight(raw: &str) -> Option<f64> {
    let value: f64 = raw.trim().parse().ok()?;
    normalize_weight(value)
}

pub fn normalize_weight(value: f64) -> Option<f64> {
    (value.is_finite() && value >= 0.0).then_some(value)
}

fn reps_from_f64(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// JSON shapes accepted for a numeric field
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Number(f64),
    Text(String),
    Other(serde_json::Value),
}

/// Lenient deserializer for `SetRecord::actual_reps`
pub fn deserialize_reps<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw {
        RawNumber::Number(n) => reps_from_f64(n),
        RawNumber::Text(s) => parse_reps(&s),
        RawNumber::Other(_) => None,
    }))
}

/// Lenient deserializer for `SetRecord::actual_weight`
pub fn deserialize_weight<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<RawNumber>::deserialize(deserializer)?;
    Ok(raw.and_then(|raw| match raw {
        RawNumber::Number(n) => normalize_weight(n),
        RawNumber::Text(s) => parse_weight(&s),
        RawNumber::Other(_) => None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SetRecord;

    #[test]
    fn test_parse_reps() {
        assert_eq!(parse_reps("12"), Some(12));
        assert_eq!(parse_reps(" 8 "), Some(8));
        assert_eq!(parse_reps("0"), Some(0));
        assert_eq!(parse_reps("10.0"), Some(10));
        assert_eq!(parse_reps("7.5"), None);
        assert_eq!(parse_reps("-3"), None);
        assert_eq!(parse_reps("abc"), None);
        assert_eq!(parse_reps(""), None);
    }

    #[test]
    fn test_parse_weight() {
        assert_eq!(parse_weight("135"), Some(135.0));
        assert_eq!(parse_weight("62.5"), Some(62.5));
        assert_eq!(parse_weight("-5"), None);
        assert_eq!(parse_weight("NaN"), None);
        assert_eq!(parse_weight("inf"), None);
        assert_eq!(parse_weight("heavy"), None);
    }

    #[test]
    fn test_lenient_set_record_json() {
        let json = r#"[
            {"set_number": 1, "actual_reps": 10, "actual_weight": 135},
            {"set_number": 2, "actual_reps": "9", "actual_weight": "135.5"},
            {"set_number": 3, "actual_reps": "lots", "actual_weight": 135},
            {"set_number": 4, "actual_reps": null},
            {"set_number": 5, "actual_reps": true, "actual_weight": [1]}
        ]"#;

        let sets: Vec<SetRecord> = serde_json::from_str(json).unwrap();

        assert_eq!(sets[0].values(), Some((10, 135.0)));
        assert_eq!(sets[1].values(), Some((9, 135.5)));
        assert_eq!(sets[2].actual_reps, None);
        assert_eq!(sets[2].actual_weight, Some(135.0));
        assert!(!sets[2].is_valid());
        assert!(!sets[3].is_valid());
        assert!(!sets[4].is_valid());
    }

    #[test]
    fn test_from_raw_treats_garbage_as_unlogged() {
        let set = SetRecord::from_raw(1, Some("twelve"), Some("135"));
        assert!(!set.is_valid());
        assert_eq!(set.actual_weight, Some(135.0));

        let set = SetRecord::from_raw(2, Some("12"), Some("135"));
        assert_eq!(set.values(), Some((12, 135.0)));
    }
}
