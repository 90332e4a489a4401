//! Field validation engine.
//!
//! Provides rule types, the rule registry with skip predicates, and a
//! pure-logic evaluator for one rule against one value.

pub mod evaluator;
pub mod rules;
pub mod skip;
