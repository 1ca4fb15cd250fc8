// models/src/schema.rs
//! Building blocks for validating untyped JSON payloads into typed insert and
//! update shapes. Every entity validator walks its fields through a
//! `PayloadReader`, which keeps going after a failure so the caller receives
//! the full list of violations.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};

use crate::errors::{ValidationErrors, ValidationResult};

/// A closed set of string literals backing an enum column.
pub trait Literal: Sized + Copy + 'static {
    const ALL: &'static [Self];

    fn as_str(&self) -> &'static str;

    fn parse_literal(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|v| v.as_str() == s)
    }

    fn expected() -> String {
        let names: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
        format!("must be one of: {}", names.join(", "))
    }
}

enum Slot<'a> {
    Missing,
    Null,
    Present(&'a Value),
}

pub struct PayloadReader<'a> {
    fields: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> PayloadReader<'a> {
    /// Fails immediately when the payload is not a JSON object.
    pub fn new(payload: &'a Value) -> ValidationResult<Self> {
        match payload.as_object() {
            Some(fields) => Ok(Self { fields, errors: ValidationErrors::default() }),
            None => {
                let mut errors = ValidationErrors::default();
                errors.push("body", "must be a JSON object");
                Err(errors)
            }
        }
    }

    fn slot(&self, field: &str) -> Slot<'a> {
        match self.fields.get(field) {
            None => Slot::Missing,
            Some(Value::Null) => Slot::Null,
            Some(v) => Slot::Present(v),
        }
    }

    fn convert<T>(&mut self, field: &str, value: &Value, conv: impl Fn(&Value) -> Result<T, String>) -> Option<T> {
        match conv(value) {
            Ok(v) => Some(v),
            Err(message) => {
                self.errors.push(field, message);
                None
            }
        }
    }

    /// Missing or null is a violation.
    pub fn required<T>(&mut self, field: &str, conv: impl Fn(&Value) -> Result<T, String>) -> Option<T> {
        match self.slot(field) {
            Slot::Missing | Slot::Null => {
                self.errors.push(field, "is required");
                None
            }
            Slot::Present(v) => self.convert(field, v, conv),
        }
    }

    /// Missing or null yields `None`.
    pub fn optional<T>(&mut self, field: &str, conv: impl Fn(&Value) -> Result<T, String>) -> Option<T> {
        match self.slot(field) {
            Slot::Missing | Slot::Null => None,
            Slot::Present(v) => self.convert(field, v, conv),
        }
    }

    /// Update semantics for a nullable column: missing leaves the column alone,
    /// null clears it.
    pub fn patch<T>(&mut self, field: &str, conv: impl Fn(&Value) -> Result<T, String>) -> Option<Option<T>> {
        match self.slot(field) {
            Slot::Missing => None,
            Slot::Null => Some(None),
            Slot::Present(v) => self.convert(field, v, conv).map(Some),
        }
    }

    /// Update semantics for a non-nullable column.
    pub fn patch_required<T>(&mut self, field: &str, conv: impl Fn(&Value) -> Result<T, String>) -> Option<T> {
        match self.slot(field) {
            Slot::Missing => None,
            Slot::Null => {
                self.errors.push(field, "cannot be null");
                None
            }
            Slot::Present(v) => self.convert(field, v, conv),
        }
    }

    /// Records a violation for each system-assigned field the client tried to set.
    pub fn read_only(&mut self, fields: &[&str]) {
        for field in fields {
            if self.fields.contains_key(*field) {
                self.errors.push(field, "is assigned by the server and cannot be set");
            }
        }
    }

    pub fn finish<T>(self, value: impl FnOnce() -> T) -> ValidationResult<T> {
        self.errors.finish(value)
    }
}

pub fn string(v: &Value) -> Result<String, String> {
    v.as_str().map(str::to_string).ok_or_else(|| "must be a string".to_string())
}

pub fn non_empty_string(v: &Value) -> Result<String, String> {
    let s = string(v)?;
    if s.trim().is_empty() {
        return Err("must not be empty".to_string());
    }
    Ok(s)
}

pub fn boolean(v: &Value) -> Result<bool, String> {
    v.as_bool().ok_or_else(|| "must be a boolean".to_string())
}

pub fn integer_in(min: i64, max: i64) -> impl Fn(&Value) -> Result<i64, String> {
    move |v: &Value| {
        let n = match v {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
            _ => None,
        }
        .ok_or_else(|| "must be an integer".to_string())?;
        if n < min || n > max {
            return Err(format!("must be between {} and {}", min, max));
        }
        Ok(n)
    }
}

pub fn literal<T: Literal>(v: &Value) -> Result<T, String> {
    v.as_str().and_then(T::parse_literal).ok_or_else(T::expected)
}

/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM[:SS]` local forms (read as UTC)
/// and plain `YYYY-MM-DD` dates (midnight UTC).
pub fn timestamp(v: &Value) -> Result<DateTime<Utc>, String> {
    let s = v.as_str().ok_or_else(|| "must be a date string".to_string())?;
    parse_timestamp(s).ok_or_else(|| "must be an RFC 3339 timestamp or YYYY-MM-DD date".to_string())
}

pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn rejects_non_object_payload() {
        let payload = json!(["not", "an", "object"]);
        let errors = PayloadReader::new(&payload).err().unwrap();
        assert!(errors.contains_field("body"));
    }

    #[test]
    fn collects_all_violations() {
        let payload = json!({ "age": "forty", "name": null });
        let mut reader = PayloadReader::new(&payload).unwrap();
        let name = reader.required("name", non_empty_string);
        let age = reader.required("age", integer_in(0, 150));
        let district = reader.required("district", non_empty_string);
        assert!(name.is_none() && age.is_none() && district.is_none());
        let errors = reader.finish(|| ()).unwrap_err();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["name", "age", "district"]);
    }

    #[test]
    fn patch_distinguishes_missing_from_null() {
        let payload = json!({ "employer": null, "workplace": "Port" });
        let mut reader = PayloadReader::new(&payload).unwrap();
        assert_eq!(reader.patch("employer", string), Some(None));
        assert_eq!(reader.patch("workplace", string), Some(Some("Port".to_string())));
        assert_eq!(reader.patch("phone", string), None);
    }

    #[test]
    fn integer_accepts_whole_floats_and_checks_range() {
        let check = integer_in(0, 150);
        assert_eq!(check(&json!(42.0)), Ok(42));
        assert!(check(&json!(42.5)).is_err());
        assert!(check(&json!(151)).is_err());
        assert!(check(&json!(-1)).is_err());
    }

    #[test]
    fn parses_plain_dates_and_rfc3339() {
        let d = parse_timestamp("2024-03-05").unwrap();
        assert_eq!((d.year(), d.month(), d.day(), d.hour()), (2024, 3, 5, 0));

        let t = parse_timestamp("2024-03-05T10:30:00+02:00").unwrap();
        assert_eq!(t.hour(), 8);

        let local = parse_timestamp("2024-03-05T10:30").unwrap();
        assert_eq!(local.minute(), 30);

        assert!(parse_timestamp("05/03/2024").is_none());
    }

    #[test]
    fn read_only_fields_are_reported() {
        let payload = json!({ "id": "abc", "name": "x" });
        let mut reader = PayloadReader::new(&payload).unwrap();
        reader.read_only(&["id", "createdAt"]);
        let errors = reader.finish(|| ()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains_field("id"));
    }
}
