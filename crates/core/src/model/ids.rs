use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Identifier of a catalog question, unique within the catalog.
///
/// Catalog ids are free-form strings (`"phy-001"`, `"q1"`), so unlike a
/// numeric id this wraps the raw string and serializes transparently.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(String);

impl QuestionId {
    /// Creates a new `QuestionId`
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string value
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for QuestionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for QuestionId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionId({})", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_question_id_display() {
        let id = QuestionId::new("phy-042");
        assert_eq!(id.to_string(), "phy-042");
        assert_eq!(format!("{id:?}"), "QuestionId(phy-042)");
    }

    #[test]
    fn test_question_id_serializes_as_plain_string() {
        let id = QuestionId::from("q1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"q1\"");
        let back: QuestionId = serde_json::from_str("\"q1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_question_id_map_lookup_by_str() {
        let mut map = BTreeMap::new();
        map.insert(QuestionId::from("q7"), 7);
        assert_eq!(map.get("q7"), Some(&7));
    }
}
