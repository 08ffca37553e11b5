//! Module: model::tag
//! Responsibility: validated, stable entity identifiers.
//!
//! Invariants:
//! - Tags are ASCII, non-empty, and at most `MAX_ENTITY_TAG_LEN` bytes.
//! - All construction paths validate invariants.

use crate::MAX_ENTITY_TAG_LEN;
use serde::{Deserialize, Deserializer, Serialize};
use std::{
    borrow::{Borrow, Cow},
    fmt::{self, Display},
};
use thiserror::Error as ThisError;

///
/// EntityTagError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EntityTagError {
    #[error("entity tag is empty")]
    Empty,

    #[error("entity tag length {len} exceeds max {max}")]
    TooLong { len: usize, max: usize },

    #[error("entity tag must be ASCII")]
    NonAscii,
}

///
/// EntityTag
///
/// Opaque identifier for one registered row shape.
/// Used as a map key for models, filters, and sources.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct EntityTag(Cow<'static, str>);

impl EntityTag {
    /// Build a tag from a static name, validating at compile time when used in
    /// a const context.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        let bytes = name.as_bytes();
        assert!(!bytes.is_empty(), "entity tag is empty");
        assert!(bytes.len() <= MAX_ENTITY_TAG_LEN, "entity tag too long");
        assert!(bytes.is_ascii(), "entity tag must be ASCII");

        Self(Cow::Borrowed(name))
    }

    /// Validate and construct a tag from a runtime name.
    pub fn try_new(name: impl Into<Cow<'static, str>>) -> Result<Self, EntityTagError> {
        let name = name.into();
        let len = name.len();

        if len == 0 {
            return Err(EntityTagError::Empty);
        }
        if len > MAX_ENTITY_TAG_LEN {
            return Err(EntityTagError::TooLong {
                len,
                max: MAX_ENTITY_TAG_LEN,
            });
        }
        if !name.is_ascii() {
            return Err(EntityTagError::NonAscii);
        }

        Ok(Self(name))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for EntityTag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for EntityTag {
    type Error = EntityTagError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::try_new(name.to_string())
    }
}

impl TryFrom<String> for EntityTag {
    type Error = EntityTagError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::try_new(name)
    }
}

impl<'de> Deserialize<'de> for EntityTag {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;

        Self::try_new(name).map_err(serde::de::Error::custom)
    }
}
