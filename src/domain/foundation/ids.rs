//! Strongly-typed identifier value objects.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Stable identifier of a case tree element.
///
/// Case exports carry element ids either as JSON numbers or strings; both
/// are normalised to their string form so comparisons are uniform.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Creates an ElementId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ElementId {
    fn from(value: u64) -> Self {
        Self(value.to_string())
    }
}

impl From<i64> for ElementId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl From<i32> for ElementId {
    fn from(value: i32) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ElementId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ElementId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

struct ElementIdVisitor;

impl<'de> Visitor<'de> for ElementIdVisitor {
    type Value = ElementId;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an element id as a string or integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(ElementId::new(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(ElementId(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(ElementId(v.to_string()))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(ElementId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for ElementId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ElementIdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_id_deserializes_from_number() {
        let id: ElementId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }

    #[test]
    fn element_id_deserializes_from_string() {
        let id: ElementId = serde_json::from_str("\"G-1\"").unwrap();
        assert_eq!(id, ElementId::from("G-1"));
    }

    #[test]
    fn element_id_rejects_other_json_types() {
        assert!(serde_json::from_str::<ElementId>("true").is_err());
        assert!(serde_json::from_str::<ElementId>("[1]").is_err());
    }

    #[test]
    fn element_id_serializes_as_string() {
        assert_eq!(serde_json::to_string(&ElementId::from(7)).unwrap(), "\"7\"");
    }
}
