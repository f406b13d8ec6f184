//! Structural equality and list membership for field values.
//!
//! Selection-style fields (radio, checklist, select) identify list members
//! by deep equality, optionally restricted to one sub-field of both
//! operands so that `{"id": 1, "title": "A"}` matches `{"id": 1}`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;


/// Sub-field used to compare two values instead of full structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompareKey {
    /// Position within an array operand.
    Index(usize),
    /// Key within a mapping operand.
    Field(String),
}

impl CompareKey {
    fn project<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        match self {
            CompareKey::Field(name) => value.get(name.as_str()),
            CompareKey::Index(i) => value.get(*i),
        }
    }
}

impl From<&str> for CompareKey {
    fn from(name: &str) -> Self {
        CompareKey::Field(name.to_string())
    }
}

impl From<String> for CompareKey {
    fn from(name: String) -> Self {
        CompareKey::Field(name)
    }
}

impl From<usize> for CompareKey {
    fn from(index: usize) -> Self {
        CompareKey::Index(index)
    }
}

impl fmt::Display for CompareKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompareKey::Index(i) => write!(f, "{}", i),
            CompareKey::Field(name) => f.write_str(name),
        }
    }
}


/// Deep structural equality. Numbers compare by value, so `1` equals `1.0`.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            if let (Some(x), Some(y)) = (x.as_i64(), y.as_i64()) {
                x == y
            } else if let (Some(x), Some(y)) = (x.as_u64(), y.as_u64()) {
                x == y
            } else {
                x.as_f64() == y.as_f64()
            }
        }
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| deep_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| deep_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Key-aware equality. With a key and two non-null operands only the keyed
/// sub-field of each is compared (two missing sub-fields are equal);
/// otherwise falls back to [`deep_equal`].
pub fn is_equal(a: &Value, b: &Value, key: Option<&CompareKey>) -> bool {
    match key {
        Some(key) if !a.is_null() && !b.is_null() => {
            match (key.project(a), key.project(b)) {
                (Some(x), Some(y)) => deep_equal(x, y),
                (None, None) => true,
                _ => false,
            }
        }
        _ => deep_equal(a, b),
    }
}

/// Index of the last list member equal to `value` under `key`.
pub fn find_index(list: &[Value], value: &Value, key: Option<&CompareKey>) -> Option<usize> {
    list.iter().rposition(|item| is_equal(item, value, key))
}

pub fn contains(list: &[Value], value: &Value, key: Option<&CompareKey>) -> bool {
    find_index(list, value, key).is_some()
}

/// Missing, `null` and `""` count as empty input.
pub fn is_empty(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Truthiness used by checkbox fields: `null`, `false`, `0` and `""` are
/// false, everything else (including empty containers) is true.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_compare_by_value() {
        assert!(deep_equal(&json!(10), &json!(10.0)));
        assert!(!deep_equal(&json!(10), &json!(10.5)));
        assert!(deep_equal(&json!({"a": [1, 2.0]}), &json!({"a": [1.0, 2]})));
    }

    #[test]
    fn mappings_compare_structurally() {
        assert!(deep_equal(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!deep_equal(&json!({"a": 1}), &json!({"a": 1, "b": null})));
    }

    #[test]
    fn keyed_equality_ignores_other_fields() {
        let key = CompareKey::from("id");
        let full = json!({"id": 2, "title": "Hooks"});
        let reference = json!({"id": 2});
        assert!(is_equal(&full, &reference, Some(&key)));
        assert!(!is_equal(&full, &json!({"id": 3}), Some(&key)));
        assert!(!is_equal(&full, &reference, None));
    }

    #[test]
    fn keyed_equality_with_null_falls_back() {
        let key = CompareKey::from("id");
        assert!(!is_equal(&Value::Null, &json!({"id": 1}), Some(&key)));
        assert!(is_equal(&Value::Null, &Value::Null, Some(&key)));
    }

    #[test]
    fn index_key_compares_array_positions() {
        let key = CompareKey::from(0);
        assert!(is_equal(&json!([1, "a"]), &json!([1, "b"]), Some(&key)));
    }

    #[test]
    fn find_index_by_key() {
        let list = vec![json!({"id": 1}), json!({"id": 2}), json!({"id": 3})];
        let key = CompareKey::from("id");
        assert_eq!(find_index(&list, &json!({"id": 3, "x": true}), Some(&key)), Some(2));
        assert_eq!(find_index(&list, &json!({"id": 9}), Some(&key)), None);
        assert!(contains(&list, &json!({"id": 1}), None));
    }

    #[test]
    fn find_index_prefers_last_duplicate() {
        let list = vec![json!({"id": 1, "n": "a"}), json!({"id": 2}), json!({"id": 1, "n": "b"})];
        let key = CompareKey::from("id");
        assert_eq!(find_index(&list, &json!({"id": 1}), Some(&key)), Some(2));
        assert_eq!(find_index(&[json!(1), json!(1.0)], &json!(1), None), Some(1));
    }

    #[test]
    fn emptiness() {
        assert!(is_empty(None));
        assert!(is_empty(Some(&Value::Null)));
        assert!(is_empty(Some(&json!(""))));
        assert!(!is_empty(Some(&json!(0))));
        assert!(!is_empty(Some(&json!([]))));
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("no")));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn compare_key_deserializes_untagged() {
        let key: CompareKey = serde_json::from_str("\"id\"").unwrap();
        assert_eq!(key, CompareKey::Field("id".into()));
        let key: CompareKey = serde_json::from_str("1").unwrap();
        assert_eq!(key, CompareKey::Index(1));
    }
}
