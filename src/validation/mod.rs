//! Schemas that turn untrusted JSON into typed params.
//!
//! Every parser collects all field-level problems it finds instead of
//! stopping at the first one, so a form can highlight each bad field.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use crate::core::ValidationIssue;

pub mod employee;
pub mod performance_review;

pub use employee::EmployeeSchema;
pub use performance_review::PerformanceReviewSchema;

pub type Validated<T> = std::result::Result<T, Vec<ValidationIssue>>;

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+'-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}$")
            .expect("email pattern compiles");
}

/// Insert/update schemas for one entity kind.
pub trait EntitySchema {
    type Insert;
    type Update;

    fn insert(value: &Value) -> Validated<Self::Insert>;
    fn update(id: &str, value: &Value) -> Validated<Self::Update>;
}

pub fn parse_json(bytes: &[u8]) -> Validated<Value> {
    serde_json::from_slice(bytes)
        .map_err(|err| vec![ValidationIssue::new("invalid_json", "", err.to_string())])
}

/// `{ id }` schema: a present, non-blank id.
pub fn parse_id(raw: Option<&str>) -> Validated<String> {
    match raw.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        Some(_) => Err(vec![ValidationIssue::new(
            "too_small",
            "id",
            "String must contain at least 1 character(s)",
        )]),
        None => Err(vec![ValidationIssue::required("id")]),
    }
}

pub fn is_valid_email(value: &str) -> bool {
    value.len() <= 320 && EMAIL_REGEX.is_match(value)
}

/// Field reader over one JSON object that accumulates issues.
pub(crate) struct ObjectReader<'a> {
    object: &'a Map<String, Value>,
    issues: Vec<ValidationIssue>,
}

impl<'a> ObjectReader<'a> {
    pub(crate) fn new(value: &'a Value) -> Validated<Self> {
        match value {
            Value::Object(object) => Ok(Self {
                object,
                issues: Vec::new(),
            }),
            _ => Err(vec![ValidationIssue::invalid_type("", "object")]),
        }
    }

    pub(crate) fn push(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    fn field(&self, name: &str) -> Option<&'a Value> {
        self.object.get(name)
    }

    /// Required non-blank string, trimmed.
    pub(crate) fn required_string(&mut self, name: &str) -> Option<String> {
        match self.field(name) {
            None | Some(Value::Null) => {
                self.push(ValidationIssue::required(name));
                None
            }
            Some(Value::String(raw)) => self.non_blank(name, raw),
            Some(_) => {
                self.push(ValidationIssue::invalid_type(name, "string"));
                None
            }
        }
    }

    /// Like `required_string`, but numbers and booleans are coerced to text.
    pub(crate) fn coerced_string(&mut self, name: &str) -> Option<String> {
        match self.field(name) {
            Some(Value::Number(number)) => Some(number.to_string()),
            Some(Value::Bool(flag)) => Some(flag.to_string()),
            _ => self.required_string(name),
        }
    }

    /// Tri-state nullable string: absent, explicit null, or a value.
    pub(crate) fn nullable_string(&mut self, name: &str) -> Option<Option<String>> {
        match self.field(name) {
            None => None,
            Some(Value::Null) => Some(None),
            Some(Value::String(raw)) => Some(Some(raw.clone())),
            Some(_) => {
                self.push(ValidationIssue::invalid_type(name, "string"));
                None
            }
        }
    }

    /// Tri-state nullable timestamp, coercing RFC 3339 text, plain dates and
    /// epoch milliseconds.
    pub(crate) fn nullable_date(&mut self, name: &str) -> Option<Option<DateTime<Utc>>> {
        match self.field(name) {
            None => None,
            Some(Value::Null) => Some(None),
            Some(value) => match coerce_date(value) {
                Some(ts) => Some(Some(ts)),
                None => {
                    self.push(ValidationIssue::new("invalid_date", name, "Invalid date"));
                    None
                }
            },
        }
    }

    fn non_blank(&mut self, name: &str, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.push(ValidationIssue::new(
                "too_small",
                name,
                "String must contain at least 1 character(s)",
            ));
            return None;
        }
        Some(trimmed.to_string())
    }

    pub(crate) fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Validated<T> {
        if !self.issues.is_empty() {
            return Err(self.issues);
        }
        build().ok_or_else(|| vec![ValidationIssue::new("custom", "", "Invalid input")])
    }
}

pub(crate) fn coerce_date(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(raw) => {
            let raw = raw.trim();
            if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
                return Some(ts.with_timezone(&Utc));
            }
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| Utc.from_utc_datetime(&naive))
        }
        Value::Number(number) => number
            .as_i64()
            .or_else(|| whole_millis(number.as_f64()?))
            .and_then(|millis| Utc.timestamp_millis_opt(millis).single()),
        _ => None,
    }
}

/// Float-encoded epoch millis such as `1.7e12`, rejected when fractional.
fn whole_millis(value: f64) -> Option<i64> {
    let in_range = value.is_finite() && value.abs() <= i64::MAX as f64;
    (in_range && value.fract() == 0.0).then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_schema_rejects_missing_and_blank_ids() {
        assert_eq!(parse_id(Some(" r1 ")).unwrap(), "r1");
        assert_eq!(parse_id(None).unwrap_err()[0].path, vec!["id"]);
        assert_eq!(parse_id(Some("  ")).unwrap_err()[0].code, "too_small");
    }

    #[test]
    fn test_email_pattern_accepts_common_addresses() {
        assert!(is_valid_email("jdoe@example.com"));
        assert!(is_valid_email("jane.o'neil+reviews@corp.example.co"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("spaced out@example.com"));
    }

    #[test]
    fn test_dates_are_coerced_from_text_and_millis() {
        let from_text = coerce_date(&json!("2024-12-23T14:57:39.518Z")).unwrap();
        let from_millis = coerce_date(&json!(from_text.timestamp_millis())).unwrap();
        assert_eq!(from_text, from_millis);

        let day = coerce_date(&json!("2024-12-23")).unwrap();
        assert_eq!(day.to_rfc3339(), "2024-12-23T00:00:00+00:00");

        assert!(coerce_date(&json!("yesterday")).is_none());
        assert!(coerce_date(&json!(true)).is_none());
    }

    #[test]
    fn test_float_encoded_millis_are_accepted_when_whole() {
        let from_float = coerce_date(&json!(1.7e12)).unwrap();
        let from_int = coerce_date(&json!(1_700_000_000_000_i64)).unwrap();
        assert_eq!(from_float, from_int);

        assert!(coerce_date(&json!(1.7e12 + 0.5)).is_none());
    }

    #[test]
    fn test_malformed_json_is_reported_as_single_issue() {
        let issues = parse_json(b"{not json").unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "invalid_json");
    }
}
