//! Dotted path addressing for JSON documents
//!
//! A path such as `content.sections.0.text` is split on `.` into segments.
//! Each segment is applied against the node it lands on: mappings are
//! indexed by key, sequences by a non-negative integer. A segment that looks
//! like an integer still addresses a key when the current node is a mapping.

use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Path resolution errors
///
/// Every variant carries the offending segment and the prefix that had
/// already been walked when resolution stopped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("path is empty")]
    Empty,

    #[error("empty segment at position {position} in '{path}'")]
    EmptySegment { path: String, position: usize },

    #[error("key '{segment}' not found at '{at}'")]
    MissingKey { segment: String, at: String },

    #[error("segment '{segment}' at '{at}' is not a valid array index")]
    InvalidIndex { segment: String, at: String },

    #[error("index '{segment}' out of range at '{at}' (length {len})")]
    IndexOutOfRange {
        segment: String,
        index: usize,
        len: usize,
        at: String,
    },

    #[error("cannot apply segment '{segment}' to {kind} value at '{at}'")]
    NotAContainer {
        segment: String,
        kind: &'static str,
        at: String,
    },
}

impl PathError {
    /// Segment that caused the failure, when there is one
    pub fn segment(&self) -> Option<&str> {
        match self {
            PathError::Empty | PathError::EmptySegment { .. } => None,
            PathError::MissingKey { segment, .. }
            | PathError::InvalidIndex { segment, .. }
            | PathError::IndexOutOfRange { segment, .. }
            | PathError::NotAContainer { segment, .. } => Some(segment),
        }
    }
}

/// Parsed dotted path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: Vec<String>,
}

impl FieldPath {
    /// Parse a dotted path, rejecting empty input and empty segments
    pub fn parse(input: &str) -> Result<Self, PathError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PathError::Empty);
        }

        let mut segments = Vec::new();
        for (position, segment) in trimmed.split('.').enumerate() {
            if segment.is_empty() {
                return Err(PathError::EmptySegment {
                    path: trimmed.to_string(),
                    position,
                });
            }
            segments.push(segment.to_string());
        }

        Ok(Self { segments })
    }

    /// Build a path from already-split segments
    pub fn from_segments<I, S>(segments: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        if let Some(position) = segments.iter().position(|s| s.is_empty()) {
            return Err(PathError::EmptySegment {
                path: segments.join("."),
                position,
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn prefix(&self, end: usize) -> String {
        if end == 0 {
            "<root>".to_string()
        } else {
            self.segments[..end].join(".")
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Only plain decimal digits without leading zeros name an index
fn parse_index(segment: &str, at: String) -> Result<usize, PathError> {
    let canonical = segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    canonical
        .then(|| segment.parse::<usize>().ok())
        .flatten()
        .ok_or_else(|| PathError::InvalidIndex {
            segment: segment.to_string(),
            at,
        })
}

fn out_of_range(segment: &str, index: usize, len: usize, at: String) -> PathError {
    PathError::IndexOutOfRange {
        segment: segment.to_string(),
        index,
        len,
        at,
    }
}

fn step<'a>(node: &'a Value, path: &FieldPath, depth: usize) -> Result<&'a Value, PathError> {
    let segment = &path.segments[depth];
    match node {
        Value::Object(map) => map.get(segment).ok_or_else(|| PathError::MissingKey {
            segment: segment.clone(),
            at: path.prefix(depth),
        }),
        Value::Array(items) => {
            let index = parse_index(segment, path.prefix(depth))?;
            items
                .get(index)
                .ok_or_else(|| out_of_range(segment, index, items.len(), path.prefix(depth)))
        }
        other => Err(PathError::NotAContainer {
            segment: segment.clone(),
            kind: kind_of(other),
            at: path.prefix(depth),
        }),
    }
}

fn step_mut<'a>(
    node: &'a mut Value,
    path: &FieldPath,
    depth: usize,
) -> Result<&'a mut Value, PathError> {
    let segment = &path.segments[depth];
    match node {
        Value::Object(map) => map.get_mut(segment).ok_or_else(|| PathError::MissingKey {
            segment: segment.clone(),
            at: path.prefix(depth),
        }),
        Value::Array(items) => {
            let index = parse_index(segment, path.prefix(depth))?;
            let len = items.len();
            items
                .get_mut(index)
                .ok_or_else(|| out_of_range(segment, index, len, path.prefix(depth)))
        }
        other => Err(PathError::NotAContainer {
            segment: segment.clone(),
            kind: kind_of(other),
            at: path.prefix(depth),
        }),
    }
}

/// Resolve `path` against `root`
pub fn resolve<'a>(root: &'a Value, path: &FieldPath) -> Result<&'a Value, PathError> {
    let mut current = root;
    for depth in 0..path.len() {
        current = step(current, path, depth)?;
    }
    Ok(current)
}

/// Mutable counterpart of [`resolve`]
pub fn resolve_mut<'a>(root: &'a mut Value, path: &FieldPath) -> Result<&'a mut Value, PathError> {
    let mut current = root;
    for depth in 0..path.len() {
        current = step_mut(current, path, depth)?;
    }
    Ok(current)
}

/// Replace the value at `path`, returning what was there before.
///
/// The parent of the final segment must exist. A missing final key on a
/// mapping is inserted and `Value::Null` is returned; sequences are never
/// grown.
pub fn set(root: &mut Value, path: &FieldPath, value: Value) -> Result<Value, PathError> {
    let last = path.len() - 1;
    let mut parent = root;
    for depth in 0..last {
        parent = step_mut(parent, path, depth)?;
    }

    let segment = &path.segments[last];
    match parent {
        Value::Object(map) => Ok(map.insert(segment.clone(), value).unwrap_or(Value::Null)),
        Value::Array(items) => {
            let index = parse_index(segment, path.prefix(last))?;
            let len = items.len();
            let slot = items
                .get_mut(index)
                .ok_or_else(|| out_of_range(segment, index, len, path.prefix(last)))?;
            Ok(std::mem::replace(slot, value))
        }
        other => Err(PathError::NotAContainer {
            segment: segment.clone(),
            kind: kind_of(other),
            at: path.prefix(last),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "name": "Getting Started",
            "content": {
                "sections": [
                    { "title": "Intro", "text": "Hello" },
                    { "title": "Setup", "text": "Install it" }
                ],
                "404": "numeric key"
            },
            "published": true
        })
    }

    fn path(s: &str) -> FieldPath {
        FieldPath::parse(s).unwrap()
    }

    #[test]
    fn test_parse_segments() {
        let p = path("content.sections.0.text");
        assert_eq!(p.segments(), &["content", "sections", "0", "text"]);
        assert_eq!(p.to_string(), "content.sections.0.text");
        assert_eq!("a.b".parse::<FieldPath>().unwrap().len(), 2);
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(FieldPath::parse(""), Err(PathError::Empty));
        assert_eq!(FieldPath::parse("   "), Err(PathError::Empty));
        assert!(matches!(
            FieldPath::parse("content..text"),
            Err(PathError::EmptySegment { position: 1, .. })
        ));
        assert!(matches!(
            FieldPath::parse(".content"),
            Err(PathError::EmptySegment { position: 0, .. })
        ));
        assert!(FieldPath::from_segments(Vec::<String>::new()).is_err());
    }

    #[test]
    fn test_resolve_nested_values() {
        let doc = document();
        assert_eq!(resolve(&doc, &path("content.sections.0.text")).unwrap(), "Hello");
        assert_eq!(resolve(&doc, &path("content.sections.1.title")).unwrap(), "Setup");
        assert_eq!(resolve(&doc, &path("published")).unwrap(), &json!(true));
        assert_eq!(
            resolve(&doc, &path("content.404")).unwrap(),
            "numeric key",
            "integer-looking segments address keys on objects"
        );
    }

    #[test]
    fn test_resolve_missing_key() {
        let doc = document();
        let err = resolve(&doc, &path("content.missing.text")).unwrap_err();
        assert_eq!(
            err,
            PathError::MissingKey {
                segment: "missing".to_string(),
                at: "content".to_string()
            }
        );
        assert_eq!(err.segment(), Some("missing"));
        assert!(err.to_string().contains("'missing'"));
    }

    #[test]
    fn test_resolve_index_errors() {
        let doc = document();
        assert_eq!(
            resolve(&doc, &path("content.sections.5")).unwrap_err(),
            PathError::IndexOutOfRange {
                segment: "5".to_string(),
                index: 5,
                len: 2,
                at: "content.sections".to_string()
            }
        );
        let err = resolve(&doc, &path("content.sections.7.text")).unwrap_err();
        assert_eq!(err.segment(), Some("7"));
        assert!(err.to_string().contains("'7'"));
        assert!(matches!(
            resolve(&doc, &path("content.sections.first")),
            Err(PathError::InvalidIndex { .. })
        ));
        assert!(matches!(
            resolve(&doc, &path("content.sections.-1")),
            Err(PathError::InvalidIndex { .. })
        ));
    }

    #[test]
    fn test_index_spelling_must_be_canonical() {
        let doc = document();
        for segment in ["+1", "01", "00", " 1", "1e0"] {
            let err = resolve(&doc, &path(&format!("content.sections.{segment}"))).unwrap_err();
            assert!(
                matches!(err, PathError::InvalidIndex { .. }),
                "'{segment}' should not name an index"
            );
            assert_eq!(err.segment(), Some(segment));
        }

        let mut doc = document();
        assert!(matches!(
            set(&mut doc, &path("content.sections.+1"), json!("x")),
            Err(PathError::InvalidIndex { .. })
        ));
        assert_eq!(resolve(&doc, &path("content.sections.0.title")).unwrap(), "Intro");
    }

    #[test]
    fn test_resolve_through_scalar() {
        let doc = document();
        let err = resolve(&doc, &path("name.first")).unwrap_err();
        assert_eq!(
            err,
            PathError::NotAContainer {
                segment: "first".to_string(),
                kind: "string",
                at: "name".to_string()
            }
        );
    }

    #[test]
    fn test_resolve_mut_edits_in_place() {
        let mut doc = document();
        *resolve_mut(&mut doc, &path("content.sections.1.text")).unwrap() = json!("Run it");
        assert_eq!(doc["content"]["sections"][1]["text"], "Run it");
    }

    #[test]
    fn test_set_replaces_and_returns_previous() {
        let mut doc = document();
        let previous = set(&mut doc, &path("content.sections.0.text"), json!({"md": "Hi"})).unwrap();
        assert_eq!(previous, "Hello");
        assert_eq!(doc["content"]["sections"][0]["text"]["md"], "Hi");
    }

    #[test]
    fn test_set_inserts_missing_object_key() {
        let mut doc = document();
        let previous = set(&mut doc, &path("content.summary"), json!("short")).unwrap();
        assert_eq!(previous, Value::Null);
        assert_eq!(doc["content"]["summary"], "short");
    }

    #[test]
    fn test_set_does_not_grow_arrays() {
        let mut doc = document();
        let before = doc.clone();
        assert!(matches!(
            set(&mut doc, &path("content.sections.2"), json!({})),
            Err(PathError::IndexOutOfRange { index: 2, len: 2, .. })
        ));
        assert_eq!(doc, before);
    }

    #[test]
    fn test_set_requires_parent() {
        let mut doc = document();
        assert!(matches!(
            set(&mut doc, &path("content.absent.text"), json!(1)),
            Err(PathError::MissingKey { .. })
        ));
        assert!(matches!(
            set(&mut doc, &path("published.flag"), json!(1)),
            Err(PathError::NotAContainer { kind: "boolean", .. })
        ));
    }

    fn arb_json() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(|n| json!(n)),
            "[a-z ]{0,8}".prop_map(Value::String),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 1..4).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 1..4)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn leaf_paths(value: &Value, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
        if !prefix.is_empty() {
            out.push(prefix.clone());
        }
        match value {
            Value::Object(map) => {
                for (key, child) in map {
                    prefix.push(key.clone());
                    leaf_paths(child, prefix, out);
                    prefix.pop();
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    prefix.push(index.to_string());
                    leaf_paths(child, prefix, out);
                    prefix.pop();
                }
            }
            _ => {}
        }
    }

    proptest! {
        #[test]
        fn extract_then_reembed_is_identity(doc in arb_json()) {
            let mut paths = Vec::new();
            leaf_paths(&doc, &mut Vec::new(), &mut paths);
            for segments in paths {
                let p = FieldPath::from_segments(segments).unwrap();
                let extracted = resolve(&doc, &p).unwrap().clone();
                let mut copy = doc.clone();
                set(&mut copy, &p, extracted).unwrap();
                prop_assert_eq!(&copy, &doc);
            }
        }
    }
}
