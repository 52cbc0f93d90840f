//! Scope and label identifiers.
//!
//! Both end up as directory names in the snapshot store, so every part must
//! be a single, non-hidden path component.

use crate::errors::{invalid_input, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Check that `value` can be used as one path component.
pub(crate) fn validate_component(what: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(invalid_input(
            "validate_component",
            format!("{} must not be empty", what),
        ));
    }
    if value.starts_with('.') {
        return Err(invalid_input(
            "validate_component",
            format!("{} must not start with '.': {:?}", what, value),
        ));
    }
    if value.contains(['/', '\\', '\0']) {
        return Err(invalid_input(
            "validate_component",
            format!("{} must not contain path separators: {:?}", what, value),
        ));
    }
    Ok(())
}

/// The (profile, application) pair identifying which resource set is captured.
///
/// `profile` selects the platform context (account, cluster or region) and
/// `application` the project or namespace within it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Scope {
    profile: String,
    application: String,
}

impl Scope {
    pub fn new(profile: impl Into<String>, application: impl Into<String>) -> Result<Self> {
        let profile = profile.into();
        let application = application.into();
        validate_component("profile", &profile)?;
        validate_component("application", &application)?;
        Ok(Self {
            profile,
            application,
        })
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn application(&self) -> &str {
        &self.application
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.profile, self.application)
    }
}

/// Logical slot of a snapshot within a scope.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label(String);

impl Label {
    pub const BEFORE: &'static str = "before";
    pub const AFTER: &'static str = "after";

    pub fn new(label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        validate_component("label", &label)?;
        Ok(Self(label))
    }

    pub fn before() -> Self {
        Self(Self::BEFORE.to_string())
    }

    pub fn after() -> Self {
        Self(Self::AFTER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Label {
    type Error = crate::errors::SnapError;

    fn try_from(value: String) -> Result<Self> {
        Label::new(value)
    }
}

impl From<Label> for String {
    fn from(label: Label) -> Self {
        label.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
