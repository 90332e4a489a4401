//! Conditional suppression of field validation.

use std::fmt;
use std::sync::Arc;

use super::rules::FormRules;
use crate::form::Form;

/// Predicate over the current form deciding whether validation is skipped.
pub type SkipPredicate = Arc<dyn Fn(&Form) -> bool + Send + Sync>;

/// Suppresses validation of `paths` whenever `when` holds for the form.
#[derive(Clone)]
pub struct SkipValidationRule {
    paths: Vec<String>,
    when: SkipPredicate,
}

impl SkipValidationRule {
    pub fn new<I, S, F>(paths: I, when: F) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        F: Fn(&Form) -> bool + Send + Sync + 'static,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            when: Arc::new(when),
        }
    }

    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    pub fn applies_to(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p == path)
    }

    pub fn holds(&self, form: &Form) -> bool {
        (self.when)(form)
    }
}

impl fmt::Debug for SkipValidationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SkipValidationRule")
            .field("paths", &self.paths)
            .finish_non_exhaustive()
    }
}

/// Whether validation of `path` is bypassed for `form`.
///
/// Only the first skip rule listing `path` is consulted; later rules for the
/// same path never run.
pub fn should_skip(path: &str, rules: &FormRules, form: &Form) -> bool {
    rules
        .skip_rules()
        .iter()
        .find(|rule| rule.applies_to(path))
        .is_some_and(|rule| rule.holds(form))
}
