//! Lenient value coercion for the game CSV
//!
//! Numbers that fail to parse become 0 and dates that fail to parse make the
//! row invalid. Only the spellings listed in [`CoercionConfig::missing`] are
//! treated as absent.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date layouts seen in the Steam exports, tried in order
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%b %d, %Y",
    "%B %d, %Y",
    "%d %b, %Y",
    "%d %b %Y",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// Month-only layouts ("Oct 2008"), anchored to the first of the month
const MONTH_FORMATS: &[&str] = &["%b %Y", "%B %Y"];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoercionConfig {
    /// Spellings treated as a missing value
    pub missing: Vec<String>,

    /// Case sensitive matching of `missing`
    pub case_sensitive: bool,

    /// Label used when the publisher field is empty
    pub unknown_publisher: String,
}

impl Default for CoercionConfig {
    fn default() -> Self {
        Self {
            missing: vec![
                String::new(),
                "-".to_string(),
                "N/A".to_string(),
                "NaN".to_string(),
                "null".to_string(),
                "None".to_string(),
            ],
            case_sensitive: false,
            unknown_publisher: "Unknown".to_string(),
        }
    }
}

impl CoercionConfig {
    /// Check if a value should be treated as missing
    pub fn is_missing(&self, value: &str) -> bool {
        let value = value.trim();
        self.missing.iter().any(|pattern| {
            if self.case_sensitive {
                value == pattern
            } else {
                value.eq_ignore_ascii_case(pattern)
            }
        })
    }

    /// Parse a number, yielding `None` for missing or malformed input.
    pub fn number(&self, value: Option<&str>) -> Option<f64> {
        let value = value?.trim();
        if self.is_missing(value) {
            return None;
        }
        value.parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Parse a number, falling back to 0.
    pub fn number_or_zero(&self, value: Option<&str>) -> f64 {
        self.number(value).unwrap_or(0.0)
    }

    /// Non-empty text, or `None`.
    pub fn text(&self, value: Option<&str>) -> Option<String> {
        let value = value?.trim();
        (!self.is_missing(value)).then(|| value.to_string())
    }

    pub fn date(&self, value: Option<&str>) -> Option<NaiveDate> {
        let value = value?.trim();
        if self.is_missing(value) {
            return None;
        }
        parse_date(value)
    }
}

/// Parse a calendar date in any of the supported layouts.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Some(date);
        }
    }

    for format in MONTH_FORMATS {
        let anchored = format!("1 {value}");
        let format = format!("%d {format}");
        if let Ok(date) = NaiveDate::parse_from_str(&anchored, &format) {
            return Some(date);
        }
    }

    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(datetime.date());
    }
    None
}

/// Convert epoch milliseconds to a UTC calendar day.
pub fn date_from_millis(millis: f64) -> Option<NaiveDate> {
    if !millis.is_finite() {
        return None;
    }
    DateTime::from_timestamp_millis(millis as i64).map(|dt| dt.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_numbers_coerce_to_zero() {
        let config = CoercionConfig::default();
        assert_eq!(config.number_or_zero(Some("1234.5")), 1234.5);
        assert_eq!(config.number_or_zero(Some(" 42 ")), 42.0);
        assert_eq!(config.number_or_zero(Some("abc")), 0.0);
        assert_eq!(config.number_or_zero(Some("n/a")), 0.0);
        assert_eq!(config.number_or_zero(Some("inf")), 0.0);
        assert_eq!(config.number_or_zero(None), 0.0);
        assert_eq!(config.number(Some("")), None);
    }

    #[test]
    fn test_date_layouts() {
        assert_eq!(parse_date("2008-10-21"), Some(d(2008, 10, 21)));
        assert_eq!(parse_date("Oct 21, 2008"), Some(d(2008, 10, 21)));
        assert_eq!(parse_date("21 Oct, 2008"), Some(d(2008, 10, 21)));
        assert_eq!(parse_date("Oct 2008"), Some(d(2008, 10, 1)));
        assert_eq!(parse_date("2008-10-21T00:00:00.000Z"), Some(d(2008, 10, 21)));
        assert_eq!(parse_date("coming soon"), None);
    }

    #[test]
    fn test_missing_text() {
        let config = CoercionConfig::default();
        assert_eq!(config.text(Some("  ")), None);
        assert_eq!(config.text(Some("NULL")), None);
        assert_eq!(config.text(Some(" Valve ")), Some("Valve".to_string()));
    }

    #[test]
    fn test_date_from_millis() {
        assert_eq!(date_from_millis(1_224_547_200_000.0), Some(d(2008, 10, 21)));
        assert_eq!(date_from_millis(f64::NAN), None);
    }
}
