//! Form state and its pure transitions.
//!
//! A [`Form`] is an immutable snapshot of `{watch, errors, rules}`. Every
//! transition borrows the current form and returns a new one; the old value
//! stays valid and unchanged, so callers may keep it for history.
//!
//! Values and rules are reference counted, so transitions that leave them
//! untouched share them with the previous state.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::path;
use crate::validation::evaluator::validate_field;
use crate::validation::rules::{FieldError, FormRules};
use crate::validation::skip::should_skip;

/// Failing paths and why. Passing paths have no entry.
pub type FieldErrors = BTreeMap<String, FieldError>;

// ---------------------------------------------------------------------------
// Form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Form {
    watch: Arc<Value>,
    errors: FieldErrors,
    rules: Arc<FormRules>,
}

impl Form {
    /// Create a form holding `initial` with no errors.
    pub fn new(initial: Value, rules: impl Into<Arc<FormRules>>) -> Self {
        Self {
            watch: Arc::new(initial),
            errors: FieldErrors::new(),
            rules: rules.into(),
        }
    }

    /// Create a form from any serializable record.
    pub fn from_record<T: Serialize>(
        initial: &T,
        rules: impl Into<Arc<FormRules>>,
    ) -> Result<Self, CoreError> {
        Ok(Self::new(serde_json::to_value(initial)?, rules))
    }

    pub fn watch(&self) -> &Value {
        &self.watch
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn rules(&self) -> &FormRules {
        &self.rules
    }

    /// Current value at `path`.
    pub fn value(&self, path: &str) -> Option<&Value> {
        path::get(&self.watch, path)
    }

    pub fn error(&self, path: &str) -> Option<FieldError> {
        self.errors.get(path).copied()
    }

    /// Read the current values back into a typed record.
    pub fn values<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        Ok(T::deserialize(self.watch.as_ref())?)
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Write `value` at `path`. Errors are carried over; nothing is validated.
    pub fn on_change(&self, path: &str, value: impl Into<Value>) -> Self {
        Self {
            watch: Arc::new(path::set(&self.watch, path, value.into())),
            errors: self.errors.clone(),
            rules: Arc::clone(&self.rules),
        }
    }

    /// Validate the single field at `path`.
    ///
    /// Paths without a rule, and paths whose skip rule currently holds, leave
    /// the form untouched (a stale error for a skipped path stays).
    pub fn on_blur(&self, path: &str) -> Self {
        let Some(rule) = self.rules.field_rule(path) else {
            return self.clone();
        };

        if should_skip(path, &self.rules, self) {
            return self.clone();
        }

        let mut errors = self.errors.clone();
        match validate_field(self.value(path), rule) {
            Some(error) => {
                errors.insert(path.to_string(), error);
            }
            None => {
                errors.remove(path);
            }
        }

        self.with_errors(errors)
    }

    /// Rebuild the error map from scratch over every registered path.
    pub fn validate_all(&self) -> Self {
        let errors = self
            .rules
            .fields()
            .filter(|(path, _)| !should_skip(path, &self.rules, self))
            .filter_map(|(path, rule)| {
                validate_field(self.value(path), rule).map(|error| (path.to_string(), error))
            })
            .collect();

        self.with_errors(errors)
    }

    /// Replace all values and clear every error.
    pub fn fill(&self, values: Value) -> Self {
        Self {
            watch: Arc::new(values),
            errors: FieldErrors::new(),
            rules: Arc::clone(&self.rules),
        }
    }

    /// Apply one transition request.
    pub fn apply(&self, event: FormEvent) -> Self {
        match event {
            FormEvent::FieldChanged { path, value } => self.on_change(&path, value),
            FormEvent::FieldBlurred { path } => self.on_blur(&path),
            FormEvent::Fill { values } => self.fill(values),
            FormEvent::Submit => self.validate_all(),
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            watch: self.watch.as_ref().clone(),
            errors: self.errors.clone(),
            is_valid: self.is_valid(),
        }
    }

    fn with_errors(&self, errors: FieldErrors) -> Self {
        Self {
            watch: Arc::clone(&self.watch),
            errors,
            rules: Arc::clone(&self.rules),
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// A transition request coming from the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormEvent {
    FieldChanged { path: String, value: Value },
    FieldBlurred { path: String },
    Fill { values: Value },
    Submit,
}

impl FormEvent {
    pub fn changed(path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::FieldChanged {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn blurred(path: impl Into<String>) -> Self {
        Self::FieldBlurred { path: path.into() }
    }

    /// Event name for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::FieldChanged { .. } => "field_changed",
            Self::FieldBlurred { .. } => "field_blurred",
            Self::Fill { .. } => "fill",
            Self::Submit => "submit",
        }
    }
}

/// Serializable view of a form for the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub watch: Value,
    pub errors: FieldErrors,
    pub is_valid: bool,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
