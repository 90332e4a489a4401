//! End-to-end behaviour of the form engine: path addressing, single-field
//! and whole-form validation, skip rules and fill.

use formstate_core::{path, FieldError, FieldRule, Form, FormEvent, FormRules, SkipValidationRule};
use serde_json::json;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn signup_rules() -> FormRules {
    FormRules::from_json(json!({
        "name": { "required": true, "type": "string", "maxLength": 20 },
        "age": { "type": "number", "min": 18, "max": 120 },
        "address.city": { "required": true, "type": "string" },
        "company.vat": { "required": true, "type": "string", "pattern": "^[A-Z]{2}[0-9]+$" }
    }))
    .expect("rules should load")
    .with_skip(SkipValidationRule::new(["company.vat"], |form: &Form| {
        form.value("kind") != Some(&json!("company"))
    }))
}

fn signup_form() -> Form {
    Form::new(
        json!({
            "kind": "person",
            "name": "",
            "age": "",
            "address": { "city": "", "zip": "0" },
            "company": { "vat": "" }
        }),
        signup_rules(),
    )
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn blur_on_empty_required_name_reports_empty() {
    let rules = FormRules::new().with_field("name", FieldRule::string().required());
    let form = Form::new(json!({ "name": "" }), rules).on_blur("name");
    assert_eq!(form.error("name"), Some(FieldError::Empty));
}

#[test]
fn submit_with_age_over_max_reports_too_large() {
    let rules = FormRules::new().with_field("age", FieldRule::number().with_max(10.0));
    let form = Form::new(json!({ "age": "15" }), rules).validate_all();
    assert_eq!(form.error("age"), Some(FieldError::TooLarge));
}

#[test]
fn non_numeric_age_is_not_a_number() {
    assert_eq!(
        formstate_core::validate_field(Some(&json!("abc")), &FieldRule::number()),
        Some(FieldError::NotANumber)
    );
}

#[test]
fn nested_change_keeps_sibling_values() {
    let form = signup_form().on_change("address.city", "Paris");
    assert_eq!(form.value("address.city"), Some(&json!("Paris")));
    assert_eq!(form.value("address.zip"), Some(&json!("0")));
}

#[test]
fn fill_resets_errors_and_sets_values_exactly() {
    let form = signup_form().validate_all();
    assert!(!form.is_valid());

    let values = json!({ "kind": "person", "name": "Ada" });
    let filled = form.fill(values.clone());
    assert!(filled.errors().is_empty());
    assert_eq!(filled.watch(), &values);
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[test]
fn validate_all_is_idempotent() {
    let once = signup_form().validate_all();
    let twice = once.validate_all();
    assert_eq!(once.errors(), twice.errors());
}

#[test]
fn always_true_skip_never_reports_required_field() {
    let rules = FormRules::new()
        .with_field("x", FieldRule::string().required())
        .with_skip(SkipValidationRule::new(["x"], |_| true));
    for value in [json!({}), json!({ "x": "" }), json!({ "x": null }), json!({ "x": "ok" })] {
        let form = Form::new(value, rules.clone()).validate_all();
        assert_eq!(form.error("x"), None);
        assert!(form.is_valid());
    }
}

#[test]
fn skip_rule_follows_current_values() {
    let form = signup_form().validate_all();
    assert_eq!(form.error("company.vat"), None);
    assert_eq!(form.error("name"), Some(FieldError::Empty));
    assert_eq!(form.error("address.city"), Some(FieldError::Empty));
    assert_eq!(form.error("age"), Some(FieldError::TooLow));

    let form = form.on_change("kind", "company").validate_all();
    assert_eq!(form.error("company.vat"), Some(FieldError::Empty));

    let form = form
        .on_change("company['vat']", "fr123")
        .on_blur("company.vat");
    assert_eq!(form.error("company.vat"), Some(FieldError::PatternMismatch));

    let form = form
        .on_change("company[\"vat\"]", "FR123")
        .on_blur("company.vat");
    assert_eq!(form.error("company.vat"), None);
}

#[test]
fn full_event_sequence_reaches_valid_state() {
    let events = vec![
        FormEvent::changed("name", "Ada"),
        FormEvent::blurred("name"),
        FormEvent::changed("age", "36"),
        FormEvent::changed("address.city", "Paris"),
        FormEvent::Submit,
    ];
    let form = events
        .into_iter()
        .fold(signup_form(), |form, event| form.apply(event));
    assert!(form.is_valid(), "unexpected errors: {:?}", form.errors());
}

#[test]
fn earlier_states_are_untouched_by_transitions() {
    let initial = signup_form();
    let snapshot = initial.watch().clone();

    let later = initial
        .on_change("address.city", "Paris")
        .validate_all()
        .fill(json!({}));

    assert_eq!(initial.watch(), &snapshot);
    assert!(initial.errors().is_empty());
    assert_eq!(later.watch(), &json!({}));
}

#[test]
fn decorated_paths_read_the_same_value() {
    let record = json!({ "a": { "b": [10, 20] } });
    let plain = path::get(&record, "a.b");
    assert_eq!(path::get(&record, "a['b']"), plain);
    assert_eq!(path::get(&record, "a[\"b\"]"), plain);
    assert_eq!(path::get(&record, "a.b[1]"), Some(&json!(20)));
}
