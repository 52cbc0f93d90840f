//! Resources, snapshots and their sortable stamps.

use crate::errors::{invalid_input, Result};
use crate::model::scope::{validate_component, Label, Scope};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

const STAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
const STAMP_BASE_LEN: usize = 15;

/// Highest collision suffix a stamp may carry.
pub const MAX_STAMP_SUFFIX: u32 = 99;

/// Sortable snapshot identifier: `YYYYMMDD-HHMMSS` in UTC, optionally
/// followed by `-NN` when several captures land in the same second.
///
/// Lexicographic order of stamps equals chronological capture order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SnapshotStamp(String);

impl SnapshotStamp {
    /// Stamp for `instant` without a collision suffix.
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(instant.format(STAMP_FORMAT).to_string())
    }

    /// Same second, disambiguated by `suffix` (1..=99).
    pub fn with_suffix(&self, suffix: u32) -> Result<Self> {
        if suffix == 0 || suffix > MAX_STAMP_SUFFIX {
            return Err(invalid_input(
                "stamp_with_suffix",
                format!("suffix must be in 1..={}, got {}", MAX_STAMP_SUFFIX, suffix),
            ));
        }
        Ok(Self(format!("{}-{:02}", self.base(), suffix)))
    }

    /// Parse a stamp previously produced by [`SnapshotStamp::from_instant`]
    /// or [`SnapshotStamp::with_suffix`].
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || invalid_input("parse_stamp", format!("not a snapshot stamp: {:?}", value));

        if value.len() < STAMP_BASE_LEN || !value.is_ascii() {
            return Err(invalid());
        }
        let (base, rest) = value.split_at(STAMP_BASE_LEN);
        NaiveDateTime::parse_from_str(base, STAMP_FORMAT).map_err(|_| invalid())?;
        match rest.as_bytes() {
            [] => {}
            [b'-', a, b] if a.is_ascii_digit() && b.is_ascii_digit() && rest != "-00" => {}
            _ => return Err(invalid()),
        }
        Ok(Self(value.to_string()))
    }

    /// The `YYYYMMDD-HHMMSS` part.
    pub fn base(&self) -> &str {
        &self.0[..STAMP_BASE_LEN]
    }

    /// The second this stamp was taken in.
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        NaiveDateTime::parse_from_str(self.base(), STAMP_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SnapshotStamp {
    type Error = crate::errors::SnapError;

    fn try_from(value: String) -> Result<Self> {
        SnapshotStamp::parse(&value)
    }
}

impl From<SnapshotStamp> for String {
    fn from(stamp: SnapshotStamp) -> Self {
        stamp.0
    }
}

impl fmt::Display for SnapshotStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check that a resource name can be stored as `<name>.json`.
///
/// Names starting with `_` are reserved for store bookkeeping files.
pub fn validate_resource_name(name: &str) -> Result<()> {
    validate_component("resource name", name)?;
    if name.starts_with('_') {
        return Err(invalid_input(
            "validate_resource_name",
            format!("resource name must not start with '_': {:?}", name),
        ));
    }
    Ok(())
}

/// A named structured configuration object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub name: String,
    pub definition: Value,
}

/// An immutable capture of all resources of one scope.
///
/// Resources whose stored definition could not be read are kept apart in
/// `unreadable` (name → reason) so that the differ can report them instead of
/// dropping them.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    scope: Scope,
    label: Label,
    stamp: SnapshotStamp,
    captured_at: DateTime<Utc>,
    resources: BTreeMap<String, Resource>,
    unreadable: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn new(
        scope: Scope,
        label: Label,
        stamp: SnapshotStamp,
        captured_at: DateTime<Utc>,
        definitions: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let resources = definitions
            .into_iter()
            .map(|(name, definition)| (name.clone(), Resource { name, definition }))
            .collect();
        Self {
            scope,
            label,
            stamp,
            captured_at,
            resources,
            unreadable: BTreeMap::new(),
        }
    }

    /// Attach resources that exist in storage but could not be read.
    pub fn with_unreadable(mut self, unreadable: BTreeMap<String, String>) -> Self {
        for name in unreadable.keys() {
            self.resources.remove(name);
        }
        self.unreadable = unreadable;
        self
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn stamp(&self) -> &SnapshotStamp {
        &self.stamp
    }

    pub fn captured_at(&self) -> DateTime<Utc> {
        self.captured_at
    }

    pub fn resources(&self) -> &BTreeMap<String, Resource> {
        &self.resources
    }

    pub fn get(&self, name: &str) -> Option<&Resource> {
        self.resources.get(name)
    }

    pub fn unreadable(&self) -> &BTreeMap<String, String> {
        &self.unreadable
    }

    /// Every resource name in the snapshot, readable or not.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.resources
            .keys()
            .chain(self.unreadable.keys())
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.resources.len() + self.unreadable.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
