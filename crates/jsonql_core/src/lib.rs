//! jsonql_core - JSON document introspection library
//!
//! This library flattens parsed JSON documents into textual
//! `path=value` assignment lines and locates the keys associated with a
//! scalar value. It operates on already-parsed [`serde_json::Value`]
//! documents; decoding raw JSON text is the caller's responsibility.

pub mod flatten;
pub mod locate;
pub mod path;

pub use flatten::{FlattenError, FlattenOptions};
pub use locate::LocateError;

use serde_json::Value;

/// Error type for introspection operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    message: String,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

impl From<flatten::FlattenError> for Error {
    fn from(e: flatten::FlattenError) -> Self {
        Self {
            message: format!("flatten error: {e}"),
        }
    }
}

impl From<locate::LocateError> for Error {
    fn from(e: locate::LocateError) -> Self {
        Self {
            message: format!("locate error: {e}"),
        }
    }
}

/// Flatten a document into newline-joined `path=value` assignment lines
///
/// # Arguments
/// * `document` - The parsed JSON document (root must be an object)
/// * `base_name` - Base identifier for every emitted path
///
/// # Returns
/// The assignment lines joined with `\n` (empty string when the document
/// has no leaves), or an error for a non-object root
///
/// # Example
/// ```
/// use serde_json::json;
/// use jsonql_core::flatten;
///
/// let doc = json!({"info": {"age": 30}});
/// let out = flatten(&doc, "payload").unwrap();
/// assert_eq!(out, "payload['info']['age']=30");
/// ```
pub fn flatten(document: &Value, base_name: &str) -> Result<String, Error> {
    Ok(flatten::flatten(document, base_name)?)
}

/// Flatten a document with explicit key filtering options
///
/// # Example
/// ```
/// use jsonql_core::{FlattenOptions, flatten_with};
/// use serde_json::json;
///
/// let doc = json!({"a": {"b": 1}, "b": 2});
/// let options = FlattenOptions {
///     selected_keys: Some(vec!["b".to_string()]),
///     exact_key_ownership: true,
/// };
/// let out = flatten_with(&doc, "payload", &options).unwrap();
/// assert_eq!(out, "payload['b']=2");
/// ```
pub fn flatten_with(
    document: &Value,
    base_name: &str,
    options: &FlattenOptions,
) -> Result<String, Error> {
    Ok(flatten::flatten_with(document, base_name, options)?)
}

/// Find the keys that textually precede each occurrence of `target` in
/// the serialized document
///
/// The search is a heuristic over the serialized text: a target occurring
/// as a substring of an unrelated string value also matches. See
/// [`keys_for_value_exact`] for a structural alternative.
///
/// # Example
/// ```
/// use jsonql_core::keys_for_value;
/// use serde_json::json;
///
/// let doc = json!({"name": "Alice"});
/// let keys = keys_for_value(&doc, "Alice").unwrap();
/// assert_eq!(keys, vec!["name"]);
/// ```
pub fn keys_for_value(document: &Value, target: &str) -> Result<Vec<String>, Error> {
    Ok(locate::keys_for_value(document, target)?)
}

/// Find the mapping keys whose decoded scalar values equal `target`
///
/// Structural counterpart of [`keys_for_value`]: no serialization, no
/// substring false positives.
///
/// # Example
/// ```
/// use jsonql_core::keys_for_value_exact;
/// use serde_json::json;
///
/// let doc = json!({"a": "foobar", "b": "bar"});
/// assert_eq!(keys_for_value_exact(&doc, "bar"), vec!["b"]);
/// ```
pub fn keys_for_value_exact(document: &Value, target: &str) -> Vec<String> {
    locate::keys_for_value_exact(document, target)
}
