//! Value-to-key search over documents
//!
//! `keys_for_value` is a serialize-then-scan heuristic: the document is
//! rendered to compact JSON and every textual occurrence of the target is
//! traced back to the key that precedes it. Because the scan is textual,
//! a target that occurs as a substring of an unrelated string value, or a
//! scalar that repeats at several locations, produces extra entries.
//!
//! `keys_for_value_exact` walks the tree instead and compares decoded
//! scalars against the target, which eliminates substring false positives
//! at the cost of diverging from the historical output.

use regex::Regex;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

// Thread-local cache for compiled target patterns. Compilation cost
// matters when the same value is searched across many documents; the
// compiled Regex is cheap to clone (Arc-based).
thread_local! {
    static TARGET_CACHE: RefCell<HashMap<String, Regex>> = RefCell::new(HashMap::new());
}

/// Get a cached literal pattern for `target` or compile and cache one.
/// Returns None if the escaped target does not compile (size limits).
fn get_or_compile_target(target: &str) -> Option<Regex> {
    TARGET_CACHE.with(|cache| {
        let mut cache = cache.borrow_mut();
        if let Some(re) = cache.get(target) {
            return Some(re.clone());
        }
        match Regex::new(&regex::escape(target)) {
            Ok(re) => {
                cache.insert(target.to_string(), re.clone());
                Some(re)
            }
            Err(_) => None,
        }
    })
}

/// Error type for locate operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    /// The document could not be rendered to its serialized form
    Serialize(String),
    /// The target text did not compile into a searchable pattern
    Pattern(String),
}

impl std::fmt::Display for LocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LocateError::Serialize(message) => {
                write!(f, "failed to serialize document: {message}")
            }
            LocateError::Pattern(target) => {
                write!(f, "target is not searchable: {target:?}")
            }
        }
    }
}

impl std::error::Error for LocateError {}

/// Find the keys that textually precede each occurrence of `target` in
/// the serialized document. Duplicates are preserved; order follows the
/// serialized text.
pub fn keys_for_value(document: &Value, target: &str) -> Result<Vec<String>, LocateError> {
    if target.is_empty() {
        // An empty pattern matches at every char boundary; nothing useful
        // can be traced back from that.
        return Ok(Vec::new());
    }

    let serialized = serde_json::to_string(document)
        .map_err(|source| LocateError::Serialize(source.to_string()))?;
    let pattern =
        get_or_compile_target(target).ok_or_else(|| LocateError::Pattern(target.to_string()))?;

    let mut keys = Vec::new();
    for occurrence in pattern.find_iter(&serialized) {
        if let Some(key) = preceding_key(&serialized, occurrence.start()) {
            keys.push(key);
        }
    }
    Ok(keys)
}

/// Scan left from `start` to the nearest `,`, `{` or `[` (or the start of
/// text) and extract the key from the context in between, if a `:` marks
/// one.
fn preceding_key(serialized: &str, start: usize) -> Option<String> {
    let bytes = serialized.as_bytes();
    let mut begin = start;
    while begin > 0 {
        match bytes[begin - 1] {
            b',' | b'{' | b'[' => break,
            _ => begin -= 1,
        }
    }

    // `begin` sits at the text start or just after an ASCII delimiter, so
    // the slice stays on char boundaries.
    let context = &serialized[begin..start];
    let (key_part, _) = context.split_once(':')?;
    let trimmed = key_part.trim();
    let key = trimmed
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(trimmed);
    Some(key.to_string())
}

/// Find the mapping keys whose decoded scalar values equal `target`.
///
/// The target is interpreted in the type of each scalar it is compared
/// against: `"30"` matches the number `30` (and `30.0`), `"true"` the
/// boolean, `"null"` the null value. Scalars with no enclosing mapping
/// key (elements of a root sequence) produce no entry.
pub fn keys_for_value_exact(document: &Value, target: &str) -> Vec<String> {
    let mut keys = Vec::new();
    collect_exact(document, target, None, &mut keys);
    keys
}

fn collect_exact(value: &Value, target: &str, owner: Option<&str>, keys: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                collect_exact(child, target, Some(key), keys);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_exact(item, target, owner, keys);
            }
        }
        scalar => {
            if scalar_matches(scalar, target)
                && let Some(owner) = owner
            {
                keys.push(owner.to_string());
            }
        }
    }
}

fn scalar_matches(value: &Value, target: &str) -> bool {
    match value {
        Value::String(s) => s == target,
        Value::Number(n) => match (target.parse::<f64>(), n.as_f64()) {
            (Ok(t), Some(v)) => t == v,
            _ => false,
        },
        Value::Bool(b) => target.parse::<bool>() == Ok(*b),
        Value::Null => target == "null",
        Value::Array(_) | Value::Object(_) => false,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_match() {
        let doc = json!({"name": "Alice"});
        assert_eq!(keys_for_value(&doc, "Alice").unwrap(), vec!["name"]);
    }

    #[test]
    fn test_matches_in_serialization_order() {
        let doc = json!({"a": {"b": "v"}, "c": "v"});
        assert_eq!(keys_for_value(&doc, "v").unwrap(), vec!["b", "c"]);
    }

    // The scan is textual: "bar" inside "foobar" also matches and is
    // traced back to key "a". Documented heuristic, not a defect to fix.
    #[test]
    fn test_substring_of_other_value_matches() {
        let doc = json!({"a": "foobar", "b": "bar"});
        assert_eq!(keys_for_value(&doc, "bar").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_absent_target() {
        let doc = json!({"a": 1});
        assert_eq!(keys_for_value(&doc, "zzz").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_duplicates_within_one_value_preserved() {
        let doc = json!({"x": "barbar"});
        assert_eq!(keys_for_value(&doc, "bar").unwrap(), vec!["x", "x"]);
    }

    #[test]
    fn test_number_target() {
        let doc = json!({"age": 30});
        assert_eq!(keys_for_value(&doc, "30").unwrap(), vec!["age"]);
    }

    #[test]
    fn test_match_inside_key_name_yields_nothing() {
        // The occurrence inside the quoted key has no ':' in its
        // preceding context
        let doc = json!({"bar": 1});
        assert_eq!(keys_for_value(&doc, "bar").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_empty_target() {
        let doc = json!({"a": 1});
        assert_eq!(keys_for_value(&doc, "").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_list_elements_have_no_preceding_key() {
        // '[' and ',' delimit the backtrack context before any ':' is
        // seen, so sequence elements are invisible to the textual scan
        let doc = json!({"tags": ["x", "y"]});
        assert_eq!(keys_for_value(&doc, "x").unwrap(), Vec::<String>::new());
        assert_eq!(keys_for_value(&doc, "y").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_exact_rejects_substring_match() {
        let doc = json!({"a": "foobar", "b": "bar"});
        assert_eq!(keys_for_value_exact(&doc, "bar"), vec!["b"]);
    }

    #[test]
    fn test_exact_order_and_duplicates() {
        let doc = json!({"a": {"b": "v"}, "c": "v"});
        assert_eq!(keys_for_value_exact(&doc, "v"), vec!["b", "c"]);
    }

    #[test]
    fn test_exact_number_compares_numerically() {
        let doc = json!({"n": 1.0});
        assert_eq!(keys_for_value_exact(&doc, "1"), vec!["n"]);
    }

    #[test]
    fn test_exact_array_elements_use_enclosing_key() {
        let doc = json!({"tags": ["x", "y"]});
        assert_eq!(keys_for_value_exact(&doc, "y"), vec!["tags"]);
    }

    #[test]
    fn test_exact_root_sequence_has_no_owner() {
        let doc = json!(["v", {"k": "v"}]);
        assert_eq!(keys_for_value_exact(&doc, "v"), vec!["k"]);
    }

    #[test]
    fn test_exact_bool_and_null() {
        let doc = json!({"ok": true, "gone": null});
        assert_eq!(keys_for_value_exact(&doc, "true"), vec!["ok"]);
        assert_eq!(keys_for_value_exact(&doc, "null"), vec!["gone"]);
    }
}
