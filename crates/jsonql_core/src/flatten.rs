//! Flattening of documents into `path=value` assignment lines
//!
//! The walk is depth-first pre-order: mapping keys in insertion order,
//! sequence elements by index. Every container visit emits a header line
//! (path only); every leaf emits an assignment line. Headers are dropped
//! before output, then the surviving assignments are filtered against the
//! selected keys and joined with newlines.
//!
//! Recursion depth is bounded by document nesting depth.

use crate::path::{Accessor, render};
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Accessor chain depth kept inline before spilling to the heap
type AccessorStack = SmallVec<[Accessor; 8]>;

/// Error type for flatten operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlattenError {
    /// The root must be a mapping so every emitted line can be attributed
    /// to a top-level key
    NonObjectRoot {
        /// JSON type name of the rejected root
        found: &'static str,
    },
}

impl std::fmt::Display for FlattenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlattenError::NonObjectRoot { found } => {
                write!(f, "document root must be an object, got {found}")
            }
        }
    }
}

impl std::error::Error for FlattenError {}

/// Options controlling which assignment lines survive filtering
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Keys to filter by. `None` or empty means every top-level key of
    /// the document.
    pub selected_keys: Option<Vec<String>>,
    /// Filter by the top-level key a line's subtree originated from,
    /// instead of matching the key's bracket form anywhere in the path
    /// text. The textual mode is the historical behavior: a key like
    /// `"b"` also matches `payload['a']['b']`, a path from another
    /// branch.
    pub exact_key_ownership: bool,
}

/// One emitted traversal line. Headers carry no value and are dropped
/// before output; `owner` is the top-level key the line originated under.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Line {
    path: String,
    value: Option<String>,
    owner: String,
}

/// Flatten a document into newline-joined assignment lines, filtered by
/// the document's own top-level keys
pub fn flatten(document: &Value, base_name: &str) -> Result<String, FlattenError> {
    flatten_with(document, base_name, &FlattenOptions::default())
}

/// Flatten a document with explicit filtering options
pub fn flatten_with(
    document: &Value,
    base_name: &str,
    options: &FlattenOptions,
) -> Result<String, FlattenError> {
    let Value::Object(map) = document else {
        return Err(FlattenError::NonObjectRoot {
            found: type_name(document),
        });
    };

    let lines = collect_lines(map, base_name);

    let filter_keys: Vec<&str> = match options.selected_keys.as_deref() {
        Some(selected) if !selected.is_empty() => selected.iter().map(String::as_str).collect(),
        _ => map.keys().map(String::as_str).collect(),
    };
    let needles: Vec<String> = filter_keys.iter().map(|key| format!("['{key}']")).collect();

    let mut kept = Vec::new();
    for line in lines {
        let Some(value) = line.value else {
            continue;
        };
        let keep = if options.exact_key_ownership {
            filter_keys.contains(&line.owner.as_str())
        } else {
            needles.iter().any(|needle| line.path.contains(needle))
        };
        if keep {
            kept.push(format!("{}={value}", line.path));
        }
    }

    Ok(kept.join("\n"))
}

/// Emit header and assignment lines for every node under the root mapping
fn collect_lines(map: &Map<String, Value>, base_name: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut accessors = AccessorStack::new();

    for (key, value) in map {
        accessors.push(Accessor::Key(key.clone()));
        lines.push(Line {
            path: render(base_name, &accessors),
            value: None,
            owner: key.clone(),
        });
        walk(value, base_name, key, &mut accessors, &mut lines);
        accessors.pop();
    }

    lines
}

fn walk(
    value: &Value,
    base_name: &str,
    owner: &str,
    accessors: &mut AccessorStack,
    lines: &mut Vec<Line>,
) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                accessors.push(Accessor::Key(key.clone()));
                lines.push(Line {
                    path: render(base_name, accessors),
                    value: None,
                    owner: owner.to_string(),
                });
                walk(child, base_name, owner, accessors, lines);
                accessors.pop();
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                accessors.push(Accessor::Index(index));
                let path = render(base_name, accessors);
                if item.is_object() || item.is_array() {
                    lines.push(Line {
                        path,
                        value: None,
                        owner: owner.to_string(),
                    });
                    walk(item, base_name, owner, accessors, lines);
                } else {
                    // Sequence leaves are recorded at the element itself,
                    // not deferred through another recursion step
                    lines.push(Line {
                        path: path.clone(),
                        value: None,
                        owner: owner.to_string(),
                    });
                    lines.push(Line {
                        path,
                        value: Some(render_scalar(item)),
                        owner: owner.to_string(),
                    });
                }
                accessors.pop();
            }
        }
        scalar => {
            lines.push(Line {
                path: render(base_name, accessors),
                value: Some(render_scalar(scalar)),
                owner: owner.to_string(),
            });
        }
    }
}

/// Render a leaf scalar for the right-hand side of an assignment line.
/// Strings are single-quoted verbatim; embedded quotes are not escaped.
fn render_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => format!("'{s}'"),
        other => other.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_mapping() {
        let doc = json!({"a": 1, "b": "x"});
        let out = flatten(&doc, "payload").unwrap();
        assert_eq!(out, "payload['a']=1\npayload['b']='x'");
    }

    #[test]
    fn test_nested_mapping() {
        let doc = json!({"info": {"age": 30}});
        let out = flatten(&doc, "payload").unwrap();
        assert_eq!(out, "payload['info']['age']=30");
    }

    #[test]
    fn test_list_of_scalars() {
        let doc = json!({"tags": ["x", "y"]});
        let out = flatten(&doc, "payload").unwrap();
        assert_eq!(out, "payload['tags'][0]='x'\npayload['tags'][1]='y'");
    }

    #[test]
    fn test_list_of_objects() {
        let doc = json!({"items": [{"x": 1}, "s"]});
        let out = flatten(&doc, "payload").unwrap();
        assert_eq!(out, "payload['items'][0]['x']=1\npayload['items'][1]='s'");
    }

    #[test]
    fn test_bool_and_null_rendering() {
        let doc = json!({"ok": true, "missing": null});
        let out = flatten(&doc, "payload").unwrap();
        assert_eq!(out, "payload['ok']=true\npayload['missing']=null");
    }

    #[test]
    fn test_custom_base_name() {
        let doc = json!({"a": 1});
        let out = flatten(&doc, "event").unwrap();
        assert_eq!(out, "event['a']=1");
    }

    #[test]
    fn test_empty_mapping() {
        let doc = json!({});
        let out = flatten(&doc, "payload").unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_non_object_root() {
        let err = flatten(&json!([1, 2]), "payload").unwrap_err();
        assert_eq!(err, FlattenError::NonObjectRoot { found: "array" });

        let err = flatten(&json!("scalar"), "payload").unwrap_err();
        assert_eq!(err, FlattenError::NonObjectRoot { found: "string" });
    }

    #[test]
    fn test_selected_keys() {
        let doc = json!({"a": {"x": 1}, "b": 2});
        let options = FlattenOptions {
            selected_keys: Some(vec!["b".to_string()]),
            ..FlattenOptions::default()
        };
        let out = flatten_with(&doc, "payload", &options).unwrap();
        assert_eq!(out, "payload['b']=2");
    }

    #[test]
    fn test_empty_selection_means_all_keys() {
        let doc = json!({"a": 1, "b": 2});
        let options = FlattenOptions {
            selected_keys: Some(vec![]),
            ..FlattenOptions::default()
        };
        let out = flatten_with(&doc, "payload", &options).unwrap();
        assert_eq!(out, "payload['a']=1\npayload['b']=2");
    }

    // The textual filter matches a key's bracket form anywhere in the
    // path, so a selected top-level key also pulls in same-named keys
    // from other branches. Asserted here as the documented behavior.
    #[test]
    fn test_selected_key_matches_across_branches() {
        let doc = json!({"a": {"b": 1}, "b": 2});
        let options = FlattenOptions {
            selected_keys: Some(vec!["b".to_string()]),
            ..FlattenOptions::default()
        };
        let out = flatten_with(&doc, "payload", &options).unwrap();
        assert_eq!(out, "payload['a']['b']=1\npayload['b']=2");
    }

    #[test]
    fn test_exact_ownership_filters_by_subtree() {
        let doc = json!({"a": {"b": 1}, "b": 2});
        let options = FlattenOptions {
            selected_keys: Some(vec!["b".to_string()]),
            exact_key_ownership: true,
        };
        let out = flatten_with(&doc, "payload", &options).unwrap();
        assert_eq!(out, "payload['b']=2");
    }

    #[test]
    fn test_line_matched_once_despite_multiple_keys() {
        // payload['a']['b']=1 matches both top-level key filters; it must
        // still appear once
        let doc = json!({"a": {"b": 1}, "b": 2});
        let out = flatten(&doc, "payload").unwrap();
        assert_eq!(out, "payload['a']['b']=1\npayload['b']=2");
    }

    #[test]
    fn test_candidate_count_equals_leaf_count() {
        let doc = json!({
            "a": 1,
            "b": {"c": "x", "d": [true, null, {"e": 2.5}]},
            "f": []
        });
        let map = doc.as_object().unwrap();
        let candidates = collect_lines(map, "payload")
            .into_iter()
            .filter(|line| line.value.is_some())
            .count();
        // leaves: 1, "x", true, null, 2.5
        assert_eq!(candidates, 5);
    }

    #[test]
    fn test_deeply_nested() {
        let doc = json!({"a": {"b": {"c": {"d": [0]}}}});
        let out = flatten(&doc, "payload").unwrap();
        assert_eq!(out, "payload['a']['b']['c']['d'][0]=0");
    }

    #[test]
    fn test_string_with_embedded_quote_kept_verbatim() {
        let doc = json!({"a": "it's"});
        let out = flatten(&doc, "payload").unwrap();
        assert_eq!(out, "payload['a']='it's'");
    }
}
