//! Change record types produced by the differ.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.

use crate::model::SnapshotStamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Classification of one detected difference.
///
/// Variant order is the canonical order of records within one resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "Added",
            ChangeKind::Removed => "Removed",
            ChangeKind::Modified => "Modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural path inside a resource definition, e.g. `data.LOG_LEVEL`.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse the dotted form (`metadata.resourceVersion`). Bracket-quoted
    /// segments (`data["app.properties"]`) are accepted for keys that contain
    /// dots. Empty input is rejected; the root is not addressable by text.
    pub fn parse(text: &str) -> Option<Self> {
        if text.is_empty() {
            return None;
        }
        let mut segments = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            if let Some(quoted) = rest.strip_prefix("[\"") {
                let end = quoted.find("\"]")?;
                segments.push(quoted[..end].to_string());
                rest = &quoted[end + 2..];
            } else {
                let end = rest.find(['.', '[']).unwrap_or(rest.len());
                if end == 0 {
                    return None;
                }
                segments.push(rest[..end].to_string());
                rest = &rest[end..];
            }
            if let Some(after_dot) = rest.strip_prefix('.') {
                if after_dot.is_empty() || after_dot.starts_with('[') {
                    return None;
                }
                rest = after_dot;
            } else if !rest.is_empty() && !rest.starts_with('[') {
                return None;
            }
        }
        Some(Self(segments))
    }
}

fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if is_plain_segment(segment) {
                if i > 0 {
                    f.write_str(".")?;
                }
                f.write_str(segment)?;
            } else {
                write!(f, "[\"{}\"]", segment)?;
            }
        }
        Ok(())
    }
}

/// Where inside a resource a change was found.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ChangeKey {
    /// The change concerns the resource as a whole.
    WholeResource,
    Path(KeyPath),
}

impl ChangeKey {
    pub const WHOLE_RESOURCE_LABEL: &'static str = "*";
}

impl fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeKey::WholeResource => f.write_str(Self::WHOLE_RESOURCE_LABEL),
            ChangeKey::Path(path) => path.fmt(f),
        }
    }
}

/// One side of a change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ChangeValue {
    Present(Value),
    /// Nothing at this key on this side.
    Absent,
    /// The stored resource could not be read; carries the reason.
    Unreadable(String),
}

impl ChangeValue {
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            ChangeValue::Present(value) => Some(value),
            _ => None,
        }
    }

    /// Single-line text for tabular output. Strings are shown unquoted.
    pub fn display_text(&self) -> String {
        match self {
            ChangeValue::Present(Value::String(s)) => s.clone(),
            ChangeValue::Present(value) => value.to_string(),
            ChangeValue::Absent => String::new(),
            ChangeValue::Unreadable(reason) => format!("<unreadable: {}>", reason),
        }
    }
}

/// One classified difference between two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub resource_name: String,
    pub key: ChangeKey,
    pub before: ChangeValue,
    pub after: ChangeValue,
    pub kind: ChangeKind,
    pub before_stamp: SnapshotStamp,
    pub after_stamp: SnapshotStamp,
}

/// Options controlling what the differ compares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DiffOptions {
    /// Subtrees excluded from comparison on both sides.
    pub ignore: Vec<KeyPath>,
}

impl DiffOptions {
    pub fn ignoring(paths: impl IntoIterator<Item = KeyPath>) -> Self {
        Self {
            ignore: paths.into_iter().collect(),
        }
    }

    pub(crate) fn is_ignored(&self, path: &KeyPath) -> bool {
        self.ignore.iter().any(|ignored| ignored == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_path_display() {
        let path = KeyPath::root().child("data").child("LOG_LEVEL");
        assert_eq!(path.to_string(), "data.LOG_LEVEL");

        let dotted = KeyPath::root().child("data").child("app.properties");
        assert_eq!(dotted.to_string(), "data[\"app.properties\"]");
    }

    #[test]
    fn test_key_path_parse() {
        assert_eq!(
            KeyPath::parse("metadata.resourceVersion"),
            Some(KeyPath::root().child("metadata").child("resourceVersion"))
        );
        assert_eq!(
            KeyPath::parse("data[\"app.properties\"]"),
            Some(KeyPath::root().child("data").child("app.properties"))
        );
        assert_eq!(KeyPath::parse("a..b"), None);
        assert_eq!(KeyPath::parse("a."), None);
        assert_eq!(KeyPath::parse(""), None);
    }

    #[test]
    fn test_whole_resource_sentinel() {
        assert_eq!(ChangeKey::WholeResource.to_string(), "*");
    }

    #[test]
    fn test_change_value_text() {
        assert_eq!(ChangeValue::Present(json!("v")).display_text(), "v");
        assert_eq!(ChangeValue::Present(json!(3)).display_text(), "3");
        assert_eq!(ChangeValue::Absent.display_text(), "");
        assert!(ChangeValue::Unreadable("bad".into())
            .display_text()
            .contains("bad"));
    }

    #[test]
    fn test_kind_order_is_canonical() {
        assert!(ChangeKind::Added < ChangeKind::Removed);
        assert!(ChangeKind::Removed < ChangeKind::Modified);
    }
}
