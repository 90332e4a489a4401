//! Field rule, error kind and rule registry types.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::{Validate, ValidationError};

use super::skip::SkipValidationRule;
use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Field type
// ---------------------------------------------------------------------------

/// The value type a rule expects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    #[default]
    String,
    Number,
    Boolean,
}

// ---------------------------------------------------------------------------
// Field error
// ---------------------------------------------------------------------------

/// Why a field failed validation.
///
/// A passing field has no error at all; there is no `ok` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldError {
    Empty,
    MaxLengthExceeded,
    MinLengthExceeded,
    PatternMismatch,
    NotANumber,
    TooLow,
    TooLarge,
}

impl FieldError {
    /// Symbolic name as exposed to the UI layer.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::MaxLengthExceeded => "max-length-exceeded",
            Self::MinLengthExceeded => "min-length-exceeded",
            Self::PatternMismatch => "pattern-mismatch",
            Self::NotANumber => "not-a-number",
            Self::TooLow => "too-low",
            Self::TooLarge => "too-large",
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Field rule
// ---------------------------------------------------------------------------

/// Constraints for the value at one path.
///
/// Bounds are `None` when unset; a bound of zero is a real bound.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_bounds"))]
pub struct FieldRule {
    #[serde(default)]
    pub required: bool,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", with = "pattern_serde")]
    pub pattern: Option<Regex>,
}

impl FieldRule {
    pub fn new(field_type: FieldType) -> Self {
        Self {
            field_type,
            ..Self::default()
        }
    }

    pub fn string() -> Self {
        Self::new(FieldType::String)
    }

    pub fn number() -> Self {
        Self::new(FieldType::Number)
    }

    pub fn boolean() -> Self {
        Self::new(FieldType::Boolean)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Attach a regular expression that string values must match.
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }
}

fn validate_bounds(rule: &FieldRule) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (rule.min_length, rule.max_length) {
        if min > max {
            return Err(ValidationError::new("min_length_above_max_length"));
        }
    }
    if rule.min.is_some_and(|v| !v.is_finite()) || rule.max.is_some_and(|v| !v.is_finite()) {
        return Err(ValidationError::new("bound_not_finite"));
    }
    if let (Some(min), Some(max)) = (rule.min, rule.max) {
        if min > max {
            return Err(ValidationError::new("min_above_max"));
        }
    }
    Ok(())
}

mod pattern_serde {
    use regex::Regex;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(pattern: &Option<Regex>, s: S) -> Result<S::Ok, S::Error> {
        match pattern {
            Some(re) => s.serialize_some(re.as_str()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Regex>, D::Error> {
        Option::<String>::deserialize(d)?
            .map(|raw| Regex::new(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

// ---------------------------------------------------------------------------
// Rule registry
// ---------------------------------------------------------------------------

/// Field rules plus skip rules for one form.
///
/// Field rules keep their declaration order; that order is the order in
/// which whole-form validation visits them.
#[derive(Debug, Clone, Default)]
pub struct FormRules {
    field_level: Vec<(String, FieldRule)>,
    skip_validation: Vec<SkipValidationRule>,
}

impl FormRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` for `path`. A path declared twice keeps its first
    /// position and the latest rule.
    pub fn with_field(mut self, path: impl Into<String>, rule: FieldRule) -> Self {
        let path = path.into();
        match self.field_level.iter_mut().find(|(p, _)| *p == path) {
            Some(slot) => slot.1 = rule,
            None => self.field_level.push((path, rule)),
        }
        self
    }

    pub fn with_skip(mut self, rule: SkipValidationRule) -> Self {
        self.skip_validation.push(rule);
        self
    }

    /// Load field rules declared as a JSON object keyed by path. Rules keep
    /// the order they are written in.
    ///
    /// ```json
    /// { "name": { "required": true, "type": "string", "maxLength": 40 } }
    /// ```
    pub fn from_json(declared: Value) -> Result<Self, CoreError> {
        let Value::Object(entries) = declared else {
            return Err(CoreError::InvalidRuleSet(
                "rules must be a JSON object keyed by path".to_string(),
            ));
        };
        Self::from_entries(entries)
    }

    fn from_entries(entries: Map<String, Value>) -> Result<Self, CoreError> {
        entries
            .into_iter()
            .try_fold(Self::new(), |rules, (path, raw)| {
                let rule: FieldRule =
                    serde_json::from_value(raw).map_err(|e| CoreError::InvalidRule {
                        path: path.clone(),
                        reason: e.to_string(),
                    })?;
                rule.validate().map_err(|e| CoreError::InvalidRule {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
                Ok(rules.with_field(path, rule))
            })
    }

    /// The rule registered for exactly this path string.
    pub fn field_rule(&self, path: &str) -> Option<&FieldRule> {
        self.field_level
            .iter()
            .find(|(p, _)| p == path)
            .map(|(_, rule)| rule)
    }

    /// Registered paths and rules in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldRule)> {
        self.field_level.iter().map(|(p, rule)| (p.as_str(), rule))
    }

    pub fn skip_rules(&self) -> &[SkipValidationRule] {
        &self.skip_validation
    }

    pub fn len(&self) -> usize {
        self.field_level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.field_level.is_empty()
    }
}
