//! Deep-path updates over the site content document.
//!
//! A path such as `footer.navLinks.2.label` parses into segments that are
//! either record keys or sequence indices. Updates never touch the input:
//! the document is deep-copied and only the addressed leaf is replaced.

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use crate::models::SiteContent;

/// One step of a field path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Named field of a record.
    Key(String),
    /// Position in an ordered sequence.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A parsed, non-empty path into the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    /// Parse a dot-separated path. All-digit segments become indices.
    pub fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.is_empty() {
            return Err(PathError::invalid(raw, "path is empty"));
        }

        let segments = raw
            .split('.')
            .map(|part| {
                if part.is_empty() {
                    return Err(PathError::invalid(raw, "path contains an empty segment"));
                }
                if part.bytes().all(|b| b.is_ascii_digit()) {
                    part.parse::<usize>()
                        .map(Segment::Index)
                        .map_err(|_| PathError::invalid(raw, "index out of range"))
                } else {
                    Ok(Segment::Key(part.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(segments))
    }

    /// Path to a single top-level key.
    pub fn root(key: impl Into<String>) -> Self {
        Self(vec![Segment::Key(key.into())])
    }

    /// Extend the path with a record key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.0.push(Segment::Key(key.into()));
        self
    }

    /// Extend the path with a sequence index.
    pub fn index(mut self, index: usize) -> Self {
        self.0.push(Segment::Index(index));
        self
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

/// Deep-path update failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path does not resolve through the document's containers.
    InvalidPath { path: String, reason: String },
    /// The new value cannot be represented at the addressed field.
    TypeMismatch { path: String, reason: String },
}

impl PathError {
    fn invalid(path: impl fmt::Display, reason: impl Into<String>) -> Self {
        PathError::InvalidPath {
            path: path.to_string(),
            reason: reason.into(),
        }
    }

    fn mismatch(path: impl fmt::Display, reason: impl Into<String>) -> Self {
        PathError::TypeMismatch {
            path: path.to_string(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for PathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathError::InvalidPath { path, reason } => {
                write!(f, "invalid path '{}': {}", path, reason)
            }
            PathError::TypeMismatch { path, reason } => {
                write!(f, "type mismatch at '{}': {}", path, reason)
            }
        }
    }
}

impl std::error::Error for PathError {}

/// Resolve a path to the value it addresses.
pub fn get<'a>(document: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(document, |current, segment| child(current, segment))
}

/// Return a copy of `document` with the value at `path` replaced.
///
/// A terminal key is inserted if absent; a terminal index may address an
/// existing element or append at the sequence length.
pub fn update_value(document: &Value, path: &FieldPath, value: Value) -> Result<Value, PathError> {
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(PathError::invalid(path, "path is empty"));
    };

    let mut root = document.clone();
    let mut current = &mut root;
    for (depth, segment) in parents.iter().enumerate() {
        current = child_mut(current, segment).ok_or_else(|| {
            PathError::invalid(
                path,
                format!("segment {} ('{}') does not resolve to a container", depth, segment),
            )
        })?;
    }

    match (last, current) {
        (Segment::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
        }
        (Segment::Index(index), Value::Array(items)) if *index < items.len() => {
            items[*index] = value;
        }
        (Segment::Index(index), Value::Array(items)) if *index == items.len() => {
            items.push(value);
        }
        (Segment::Index(index), Value::Array(items)) => {
            return Err(PathError::invalid(
                path,
                format!("index {} is past the end of a sequence of {}", index, items.len()),
            ));
        }
        (segment, _) => {
            return Err(PathError::invalid(
                path,
                format!("parent of '{}' is not a matching container", segment),
            ));
        }
    }

    Ok(root)
}

/// Typed deep-path update of the site content document.
///
/// The result must still fit the schema: values of the wrong shape and
/// fields the schema does not know are rejected rather than dropped.
pub fn update(content: &SiteContent, path: &FieldPath, value: Value) -> Result<SiteContent, PathError> {
    let document = serde_json::to_value(content).map_err(|e| PathError::mismatch(path, e.to_string()))?;
    let updated = update_value(&document, path, value.clone())?;

    let typed: SiteContent =
        serde_json::from_value(updated).map_err(|e| PathError::mismatch(path, e.to_string()))?;

    let stored = serde_json::to_value(&typed).map_err(|e| PathError::mismatch(path, e.to_string()))?;
    match get(&stored, path) {
        Some(found) if *found == value => Ok(typed),
        // Optional fields cleared with null are omitted on the wire.
        None if value.is_null() && get(&document, path).is_some() => Ok(typed),
        None => Err(PathError::invalid(path, "no such field in site content")),
        Some(_) => Err(PathError::mismatch(path, "value was coerced by the schema")),
    }
}

fn child<'a>(current: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (segment, current) {
        (Segment::Key(key), Value::Object(map)) => map.get(key),
        (Segment::Index(index), Value::Array(items)) => items.get(*index),
        _ => None,
    }
}

fn child_mut<'a>(current: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (segment, current) {
        (Segment::Key(key), Value::Object(map)) => map.get_mut(key),
        (Segment::Index(index), Value::Array(items)) => items.get_mut(*index),
        _ => None,
    }
}
