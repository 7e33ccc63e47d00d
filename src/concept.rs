//! Core concepts and identity management.
//!
//! The concept layer is the prerequisite for everything in imi.
//! Without stable concept IDs, relations cannot be linked, expression
//! links have nothing to anchor to, and queries are meaningless.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Globally unique, stable concept identifier.
///
/// Concept IDs are opaque strings minted by the knowledge-base curation
/// process (e.g. `core:knife-001`). Once loaded, a `ConceptId` never
/// changes; it is the identity anchor that relations and expression
/// links reference.
///
/// # Examples
///
/// ```
/// use imi::ConceptId;
///
/// let id = ConceptId::new("core:knife-001");
/// assert_eq!(id.as_str(), "core:knife-001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConceptId(String);

impl ConceptId {
    /// Creates a concept ID from a raw identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConceptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ConceptId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ConceptId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Lifecycle status of a concept, relation, or expression link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Status {
    /// The record is current and participates in queries.
    Active,
    /// The record is retained for history but should not be extended.
    Deprecated,
    /// A status tag the core does not interpret.
    Other(String),
}

impl Default for Status {
    fn default() -> Self {
        Self::Active
    }
}

impl TryFrom<String> for Status {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim();
        if value.is_empty() {
            return Err("status cannot be empty".to_string());
        }
        Ok(if value.eq_ignore_ascii_case("active") {
            Self::Active
        } else if value.eq_ignore_ascii_case("deprecated") {
            Self::Deprecated
        } else {
            Self::Other(value.to_string())
        })
    }
}

impl From<Status> for String {
    fn from(value: Status) -> Self {
        match value {
            Status::Active => "active".to_string(),
            Status::Deprecated => "deprecated".to_string(),
            Status::Other(tag) => tag,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Deprecated => write!(f, "deprecated"),
            Self::Other(tag) => write!(f, "{tag}"),
        }
    }
}

/// The anchor of identity in imi.
///
/// A concept is an opaque identifier plus lifecycle metadata. Concepts
/// never reference other concepts directly; every connection between
/// them is expressed as a [`Relation`](crate::Relation). A concept with
/// `can_be_relation` set may itself serve as a relation type, which is
/// how relations about relations are expressed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    /// Globally unique identifier.
    pub id: ConceptId,

    /// Whether this concept may be used as a relation type.
    #[serde(default)]
    pub can_be_relation: bool,

    /// Lifecycle status.
    #[serde(default)]
    pub status: Status,

    /// When the concept was first created, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Concept {
    /// Creates an active concept with the given identifier.
    #[must_use]
    pub fn new(id: impl Into<ConceptId>) -> Self {
        Self {
            id: id.into(),
            can_be_relation: false,
            status: Status::Active,
            created_at: None,
        }
    }

    /// Marks this concept as usable as a relation type.
    #[must_use]
    pub fn relational(mut self) -> Self {
        self.can_be_relation = true;
        self
    }

    /// Sets the lifecycle status.
    #[must_use]
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = Some(at);
        self
    }
}

impl PartialEq for Concept {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Concept {}

impl std::hash::Hash for Concept {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
