//! Dotted / bracketed path access into nested JSON records.
//!
//! Paths look like `address.city`, `items[0].name` or `meta['key']`. Reads
//! never fail: anything that cannot be resolved is `None`. Writes never touch
//! their input and always return a fresh record.

use std::sync::LazyLock;

use serde_json::{Map, Value};

/// A path made only of word characters is used as a single key as-is.
static KEY_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"^[A-Za-z0-9_]*$").expect("valid regex"));

/// Characters removed before splitting a decorated path.
static DECORATION_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r#"["'\]]"#).expect("valid regex"));

static SEPARATOR_RE: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"[.\[]").expect("valid regex"));

/// Returns `true` if `path` is used verbatim as one top-level key.
pub fn is_key(path: &str) -> bool {
    KEY_RE.is_match(path)
}

/// Normalize a path string into its key sequence.
///
/// Quotes and closing brackets are stripped, the rest is split on `.` and
/// `[`, and empty segments are dropped, so `a.b`, `a['b']` and `a..b.` all
/// yield `["a", "b"]`.
pub fn parse(path: &str) -> Vec<String> {
    if is_key(path) {
        return vec![path.to_string()];
    }

    let stripped = DECORATION_RE.replace_all(path, "");
    SEPARATOR_RE
        .split(&stripped)
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the value at `path`, or `None` if any level is missing.
pub fn get<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    parse(path)
        .iter()
        .try_fold(record, |node, key| child(node, key))
}

/// Write `value` at `path`, returning a new record.
///
/// Missing intermediate levels are created as empty objects.
pub fn set(record: &Value, path: &str, value: Value) -> Value {
    assoc(Some(record), &parse(path), value)
}

/// A key addresses an array slot only in canonical decimal form, so `+1`
/// and `01` are plain keys.
fn array_index(key: &str) -> Option<usize> {
    let canonical = !key.is_empty()
        && key.bytes().all(|b| b.is_ascii_digit())
        && (key == "0" || !key.starts_with('0'));
    if canonical {
        key.parse().ok()
    } else {
        None
    }
}

fn child<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => array_index(key).and_then(|i| items.get(i)),
        _ => None,
    }
}

fn assoc(node: Option<&Value>, keys: &[String], value: Value) -> Value {
    let Some((head, rest)) = keys.split_first() else {
        return value;
    };

    match node {
        Some(Value::Object(map)) => {
            let next = assoc(map.get(head), rest, value);
            Value::Object(replace_entry(map.iter(), head, next))
        }
        Some(Value::Array(items)) => match array_index(head) {
            Some(index) if index <= items.len() => {
                let mut next = Some(assoc(items.get(index), rest, value));
                let mut replaced: Vec<Value> = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| {
                        if i == index {
                            next.take().unwrap_or(Value::Null)
                        } else {
                            item.clone()
                        }
                    })
                    .collect();
                replaced.extend(next);
                Value::Array(replaced)
            }
            // Anything else turns the array into an index-keyed object.
            _ => {
                let keys: Vec<String> = (0..items.len()).map(|i| i.to_string()).collect();
                let next = assoc(None, rest, value);
                Value::Object(replace_entry(keys.iter().zip(items), head, next))
            }
        },
        _ => {
            let mut map = Map::new();
            map.insert(head.clone(), assoc(None, rest, value));
            Value::Object(map)
        }
    }
}

/// Copy `entries` into a new map with `key` bound to `next`, cloning only the
/// siblings and keeping the key's position when it already exists.
fn replace_entry<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Value)>,
    key: &str,
    next: Value,
) -> Map<String, Value> {
    let mut next = Some(next);
    let mut map: Map<String, Value> = entries
        .map(|(k, v)| {
            if k == key {
                (k.clone(), next.take().unwrap_or(Value::Null))
            } else {
                (k.clone(), v.clone())
            }
        })
        .collect();
    if let Some(next) = next {
        map.insert(key.to_string(), next);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn word_paths_are_single_keys() {
        assert!(is_key("name"));
        assert!(is_key("first_name2"));
        assert!(is_key(""));
        assert!(!is_key("a.b"));
        assert!(!is_key("a[0]"));
        assert_eq!(parse("name"), vec!["name"]);
        assert_eq!(parse(""), vec![""]);
    }

    #[test]
    fn decorated_paths_normalize_to_the_same_keys() {
        let expected = vec!["a".to_string(), "b".to_string()];
        assert_eq!(parse("a.b"), expected);
        assert_eq!(parse("a['b']"), expected);
        assert_eq!(parse("a[\"b\"]"), expected);
        assert_eq!(parse("a..b"), expected);
        assert_eq!(parse(".a.b."), expected);
        assert_eq!(parse("a[b]"), expected);
    }

    #[test]
    fn bracket_indices_become_keys() {
        assert_eq!(parse("items[2].name"), vec!["items", "2", "name"]);
    }

    #[test]
    fn separators_only_parse_to_nothing() {
        assert!(parse("..").is_empty());
        assert!(parse("['']").is_empty());
    }

    #[test]
    fn get_reads_nested_objects_and_arrays() {
        let record = json!({
            "address": { "city": "Lyon" },
            "tags": ["x", "y"],
            "rows": [{ "id": 7 }],
        });
        assert_eq!(get(&record, "address.city"), Some(&json!("Lyon")));
        assert_eq!(get(&record, "tags[1]"), Some(&json!("y")));
        assert_eq!(get(&record, "rows[0].id"), Some(&json!(7)));
        assert_eq!(get(&record, "rows.0.id"), Some(&json!(7)));
    }

    #[test]
    fn get_missing_levels_is_none() {
        let record = json!({ "address": { "city": "Lyon" }, "n": 3 });
        assert_eq!(get(&record, "address.zip"), None);
        assert_eq!(get(&record, "nope.deeper.still"), None);
        assert_eq!(get(&record, "n.inner"), None);
        assert_eq!(get(&record, "address[5]"), None);
    }

    #[test]
    fn get_with_empty_key_list_returns_record() {
        let record = json!({ "a": 1 });
        assert_eq!(get(&record, "."), Some(&record));
    }

    #[test]
    fn set_writes_leaf_and_keeps_siblings() {
        let record = json!({ "address": { "city": "", "zip": "0" } });
        let updated = set(&record, "address.city", json!("Paris"));
        assert_eq!(updated, json!({ "address": { "city": "Paris", "zip": "0" } }));
    }

    #[test]
    fn set_does_not_mutate_input() {
        let record = json!({ "a": { "b": 1 } });
        let snapshot = record.clone();
        let _ = set(&record, "a.b", json!(2));
        assert_eq!(record, snapshot);
    }

    #[test]
    fn set_creates_missing_intermediate_objects() {
        let updated = set(&json!({}), "a.b.c", json!(true));
        assert_eq!(updated, json!({ "a": { "b": { "c": true } } }));
    }

    #[test]
    fn set_replaces_scalars_on_the_way() {
        let updated = set(&json!({ "a": 5 }), "a.b", json!(1));
        assert_eq!(updated, json!({ "a": { "b": 1 } }));
    }

    #[test]
    fn set_updates_array_elements_by_index() {
        let record = json!({ "tags": ["x", "y"] });
        assert_eq!(set(&record, "tags[1]", json!("z")), json!({ "tags": ["x", "z"] }));
        assert_eq!(set(&record, "tags[2]", json!("w")), json!({ "tags": ["x", "y", "w"] }));
    }

    #[test]
    fn set_past_array_end_converts_to_object() {
        let record = json!({ "tags": ["x", "y"] });
        assert_eq!(
            set(&record, "tags[3]", json!("w")),
            json!({ "tags": { "0": "x", "1": "y", "3": "w" } })
        );
    }

    #[test]
    fn set_with_huge_index_does_not_panic() {
        let record = json!({ "t": [] });
        assert_eq!(
            set(&record, "t[18446744073709551615]", json!(1)),
            json!({ "t": { "18446744073709551615": 1 } })
        );
        assert_eq!(
            set(&record, "t[10000000000]", json!(1)),
            json!({ "t": { "10000000000": 1 } })
        );
        assert_eq!(
            set(&record, "t[99999999999999999999999]", json!(1)),
            json!({ "t": { "99999999999999999999999": 1 } })
        );
    }

    #[test]
    fn non_canonical_indices_are_plain_keys() {
        let record = json!({ "t": ["a", "b"] });
        assert_eq!(get(&record, "t[1]"), Some(&json!("b")));
        assert_eq!(get(&record, "t[+1]"), None);
        assert_eq!(get(&record, "t[01]"), None);
        assert_eq!(get(&record, "t[0]"), Some(&json!("a")));
        assert_eq!(
            set(&record, "t[01]", json!("z")),
            json!({ "t": { "0": "a", "1": "b", "01": "z" } })
        );
    }

    #[test]
    fn set_keeps_key_position_of_replaced_entry() {
        let record = json!({ "z": 1, "a": { "b": 2 }, "m": 3 });
        let updated = set(&record, "a.b", json!(9));
        let keys: Vec<_> = updated.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
        assert_eq!(updated["a"]["b"], 9);
    }

    #[test]
    fn set_named_key_on_array_converts_to_object() {
        let updated = set(&json!({ "tags": ["x"] }), "tags.kind", json!("k"));
        assert_eq!(updated, json!({ "tags": { "0": "x", "kind": "k" } }));
    }

    #[test]
    fn set_with_empty_key_list_replaces_record() {
        assert_eq!(set(&json!({ "a": 1 }), "..", json!(9)), json!(9));
    }

    #[test]
    fn decorated_writes_are_structurally_equal() {
        let record = json!({ "a": { "b": 0, "c": 1 } });
        let plain = set(&record, "a.b", json!(5));
        assert_eq!(set(&record, "a['b']", json!(5)), plain);
        assert_eq!(set(&record, "a[\"b\"]", json!(5)), plain);
    }

    #[test]
    fn word_path_get_after_set_round_trips() {
        for record in [json!({}), json!({ "k": [1, 2] }), json!(null), json!(3)] {
            let updated = set(&record, "k", json!({ "nested": true }));
            assert_eq!(get(&updated, "k"), Some(&json!({ "nested": true })));
        }
    }
}
