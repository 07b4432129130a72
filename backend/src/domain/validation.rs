//! Field validators and the machinery that turns loosely shaped input into
//! typed domain values.
//!
//! Scalar validators inspect a single JSON value. Composite validation walks
//! every field of an entity through a [`FieldCollector`], which records a
//! [`FieldFailure`] per malformed field and, in [`FieldMode::Optional`],
//! tolerates fields that were never supplied.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Value, json};

use crate::domain::{Error, ValidationRules};

/// Message for malformed or blank text fields.
pub const INVALID_STRING_MESSAGE: &str = "Must be a non-empty string";
/// Message for malformed numeric fields.
pub const INVALID_NUMBER_MESSAGE: &str = "Must be a valid number";
/// Message for malformed email fields.
pub const INVALID_EMAIL_MESSAGE: &str = "Must be a valid email address";
/// Message for malformed date fields.
pub const INVALID_DATE_MESSAGE: &str = "Must be a valid ISO 8601 date";

/// A request field as received: either never supplied or supplied with some
/// JSON value (including `null`).
///
/// Used with `#[serde(default)]` so omission and explicit values stay
/// distinguishable after deserialisation.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RawField {
    /// The key was not present in the payload.
    #[default]
    Absent,
    /// The key was present with this value.
    Present(Value),
}

impl RawField {
    /// Wrap a supplied value.
    pub fn present(value: impl Into<Value>) -> Self {
        Self::Present(value.into())
    }

    /// Whether the key was supplied at all.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// Borrow the supplied value.
    pub fn value(&self) -> Option<&Value> {
        match self {
            Self::Absent => None,
            Self::Present(value) => Some(value),
        }
    }
}

impl<'de> Deserialize<'de> for RawField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::Present)
    }
}

impl Serialize for RawField {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Absent => serializer.serialize_none(),
            Self::Present(value) => value.serialize(serializer),
        }
    }
}

impl<T: Into<Value>> From<Option<T>> for RawField {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Absent, Self::present)
    }
}

/// Whether omitted fields count as failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Creation: every field must be supplied and valid.
    Required,
    /// Partial update: only supplied fields are validated.
    Optional,
}

/// A closed set of fields belonging to one entity.
pub trait EntityField: Copy + Eq + fmt::Debug + Send + Sync + 'static {
    /// Wire name of the field.
    fn name(self) -> &'static str;

    /// Human readable explanation of what a valid value looks like.
    fn message(self, rules: &ValidationRules) -> String;
}

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldFailure<F> {
    /// The rejected field.
    pub field: F,
    /// Why it was rejected.
    pub message: String,
}

/// Every failure found while validating an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFields<F> {
    summary: &'static str,
    failures: Vec<FieldFailure<F>>,
}

impl<F: EntityField> InvalidFields<F> {
    /// Summary message describing the rejected entity.
    pub fn summary(&self) -> &'static str {
        self.summary
    }

    /// The individual failures, in field declaration order.
    pub fn failures(&self) -> &[FieldFailure<F>] {
        &self.failures
    }

    /// Rejected fields without their messages.
    pub fn fields(&self) -> Vec<F> {
        self.failures.iter().map(|failure| failure.field).collect()
    }

    /// Whether `field` was rejected.
    pub fn contains(&self, field: F) -> bool {
        self.failures.iter().any(|failure| failure.field == field)
    }
}

impl<F: EntityField> From<InvalidFields<F>> for Error {
    fn from(value: InvalidFields<F>) -> Self {
        let invalid_fields: Vec<Value> = value
            .failures
            .iter()
            .map(|failure| json!({ "field": failure.field.name(), "message": failure.message }))
            .collect();
        Error::invalid_request(value.summary).with_details(json!({
            "code": "invalid_fields",
            "invalid_fields": invalid_fields,
        }))
    }
}

/// Accumulates field failures while converting raw input.
pub struct FieldCollector<'a, F> {
    mode: FieldMode,
    rules: &'a ValidationRules,
    failures: Vec<FieldFailure<F>>,
}

impl<'a, F: EntityField> FieldCollector<'a, F> {
    /// Start collecting failures in `mode`.
    pub fn new(mode: FieldMode, rules: &'a ValidationRules) -> Self {
        Self {
            mode,
            rules,
            failures: Vec::new(),
        }
    }

    /// Active rules.
    pub fn rules(&self) -> &'a ValidationRules {
        self.rules
    }

    /// Validate a field whose omission is an error in [`FieldMode::Required`].
    pub fn field<T>(
        &mut self,
        field: F,
        raw: &RawField,
        parse: impl FnOnce(&Value) -> Option<T>,
    ) -> Option<T> {
        match raw {
            RawField::Absent => {
                if self.mode == FieldMode::Required {
                    self.reject(field);
                }
                None
            }
            RawField::Present(value) => {
                let parsed = parse(value);
                if parsed.is_none() {
                    self.reject(field);
                }
                parsed
            }
        }
    }

    /// Record a failure for `field` using its standard message.
    pub fn reject(&mut self, field: F) {
        self.reject_with(field, field.message(self.rules));
    }

    /// Record a failure for `field` with a custom message, replacing any
    /// earlier failure for the same field.
    pub fn reject_with(&mut self, field: F, message: impl Into<String>) {
        let message = message.into();
        if let Some(existing) = self.failures.iter_mut().find(|f| f.field == field) {
            existing.message = message;
        } else {
            self.failures.push(FieldFailure { field, message });
        }
    }

    /// Whether any failure was recorded so far.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Finish validation, yielding `value` when no failure was recorded.
    pub fn finish<T>(self, summary: &'static str, value: impl FnOnce() -> Option<T>) -> Result<T, InvalidFields<F>> {
        if !self.failures.is_empty() {
            return Err(InvalidFields {
                summary,
                failures: self.failures,
            });
        }
        value().ok_or(InvalidFields {
            summary,
            failures: Vec::new(),
        })
    }
}

/// A JSON string that is not blank once trimmed.
pub fn is_valid_string(value: &Value) -> bool {
    value.as_str().is_some_and(|text| !text.trim().is_empty())
}

/// A finite JSON number.
pub fn is_valid_number(value: &Value) -> bool {
    value.as_f64().is_some_and(f64::is_finite)
}

/// A string parsing as an ISO 8601 date or date-time.
pub fn is_valid_date(value: &Value) -> bool {
    parse_date(value).is_some()
}

/// A valid string shaped like `local@domain.tld`.
pub fn is_valid_email(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|text| is_valid_string(value) && email_regex().is_match(text) && !text.contains(".."))
}

/// A valid string of at least `min_length` characters.
pub fn is_valid_password(value: &Value, min_length: usize) -> bool {
    value
        .as_str()
        .is_some_and(|text| is_valid_string(value) && text.chars().count() >= min_length)
}

/// A value naming a member of the closed enumeration `E`.
pub fn is_valid_enum<E: DeserializeOwned>(value: &Value) -> bool {
    parse_enum::<E>(value).is_some()
}

/// A number inside the configured rating bounds.
pub fn is_valid_event_rating(value: &Value, rules: &ValidationRules) -> bool {
    parse_rating(value, rules).is_some()
}

/// Extract a non-blank string.
pub fn parse_string(value: &Value) -> Option<String> {
    is_valid_string(value)
        .then(|| value.as_str().map(str::to_owned))
        .flatten()
}

/// Extract a finite number.
pub fn parse_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|number| number.is_finite())
}

/// Extract a non-negative whole number that fits in an `i32`. Whole-valued
/// floats such as `50.0` are accepted.
pub fn parse_count(value: &Value) -> Option<i32> {
    if let Some(count) = value.as_i64() {
        return i32::try_from(count).ok().filter(|count| *count >= 0);
    }
    value
        .as_f64()
        .filter(|count| count.fract() == 0.0)
        .filter(|count| (0.0..=f64::from(i32::MAX)).contains(count))
        .map(|count| count as i32)
}

/// Extract a positive identifier that fits in an `i32`.
pub fn parse_id(value: &Value) -> Option<i32> {
    value
        .as_i64()
        .filter(|id| *id > 0)
        .and_then(|id| i32::try_from(id).ok())
}

/// Extract an email address.
pub fn parse_email(value: &Value) -> Option<String> {
    is_valid_email(value)
        .then(|| value.as_str().map(str::to_owned))
        .flatten()
}

/// Extract a password meeting the minimum length.
pub fn parse_password(value: &Value, min_length: usize) -> Option<String> {
    is_valid_password(value, min_length)
        .then(|| value.as_str().map(str::to_owned))
        .flatten()
}

/// Extract a member of the closed enumeration `E`.
pub fn parse_enum<E: DeserializeOwned>(value: &Value) -> Option<E> {
    E::deserialize(value).ok()
}

/// Extract a rating inside the configured bounds.
pub fn parse_rating(value: &Value, rules: &ValidationRules) -> Option<f64> {
    parse_number(value).filter(|rating| rules.rating().contains(*rating))
}

/// Extract a UTC timestamp from RFC 3339, a naive date-time (assumed UTC) or
/// a bare calendar date (midnight UTC).
pub fn parse_date(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Some(timestamp.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        let pattern = concat!(
            r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
            r"@([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$",
        );
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}
