//! In-memory form state engine.
//!
//! - [`path`] — dotted / bracketed get and copy-on-write set over
//!   `serde_json::Value` records.
//! - [`validation`] — field rules, skip predicates and the rule evaluator.
//! - [`form`] — the immutable [`Form`] state and its transitions
//!   (change, blur, validate all, fill).
//!
//! Nothing here performs I/O or logging; every transition is a pure function
//! from one form state to the next.

pub mod error;
pub mod form;
pub mod path;
pub mod validation;

pub use error::CoreError;
pub use form::{FieldErrors, Form, FormEvent, FormSnapshot};
pub use validation::evaluator::validate_field;
pub use validation::rules::{FieldError, FieldRule, FieldType, FormRules};
pub use validation::skip::{should_skip, SkipPredicate, SkipValidationRule};
