//! Path expression model for flattened documents
//!
//! A path is a base identifier followed by bracketed accessors, e.g.
//! `payload['info']['age']` or `payload['tags'][0]`. Paths are kept as
//! accessor chains during traversal and rendered to text only at the
//! emission boundary.

use std::fmt;

/// A single accessor in a path expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// Mapping key accessor: `['key']`
    Key(String),
    /// Sequence index accessor: `[0]`
    Index(usize),
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Key(key) => write!(f, "['{key}']"),
            Accessor::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// Render a base identifier plus accessor chain to path text
pub fn render(base_name: &str, accessors: &[Accessor]) -> String {
    use fmt::Write;

    let mut path = String::with_capacity(base_name.len() + accessors.len() * 8);
    path.push_str(base_name);
    for accessor in accessors {
        // Writing into a String cannot fail
        let _ = write!(path, "{accessor}");
    }
    path
}
