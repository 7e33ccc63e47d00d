//! Directed, typed, conditioned relations between concepts.
//!
//! A relation ("triple") is an edge `(src, rel, dst)` between core
//! concepts where the relation type `rel` is itself a concept ID. At the
//! data layer that keeps the vocabulary open; at the traversal layer the
//! known relation types collapse into the closed [`RelationKind`]
//! enumeration with an explicit `Unknown` fallback, so query logic gets
//! compile-time exhaustiveness without rejecting unrecognized data.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::concept::{ConceptId, Status};
use crate::condition::ConditionSet;

/// Well-known relation-type concept identifiers.
///
/// These are the fixed identifiers the query primitives dispatch on.
pub mod rel_type {
    /// `src` is a tool used for the action `dst`.
    pub const USED_FOR: &str = "core:use-purpose-001";
    /// Auto-generated inverse of [`USED_FOR`].
    pub const USED_FOR_REVERSE: &str = "core:use-purpose-for-001";
    /// `dst` is a material `src` is made of.
    pub const MATERIAL_OF: &str = "core:material-001";
    /// Auto-generated inverse of [`MATERIAL_OF`].
    pub const MATERIAL_OF_REVERSE: &str = "core:material-for-001";
    /// `dst` is a category `src` belongs to.
    pub const CATEGORY_OF: &str = "core:category-001";
    /// Auto-generated inverse of [`CATEGORY_OF`].
    pub const CATEGORY_OF_REVERSE: &str = "core:category-of-001";
    /// `dst` is a discipline/domain `src` belongs to.
    pub const DOMAIN_OF: &str = "core:domain-001";
    /// Auto-generated inverse of [`DOMAIN_OF`].
    pub const DOMAIN_OF_REVERSE: &str = "core:domain-of-001";
}

/// Unique identifier for a relation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationId(String);

impl RelationId {
    /// Creates a relation ID from a raw identifier string.
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

impl fmt::Display for RelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RelationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Assertion polarity of a relation.
///
/// A negated relation asserts that the edge does *not* hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    /// The edge holds.
    Positive,
    /// The edge is asserted not to hold.
    Negated,
}

impl Default for Polarity {
    fn default() -> Self {
        Self::Positive
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Positive => write!(f, "positive"),
            Self::Negated => write!(f, "negated"),
        }
    }
}

/// Closed enumeration of the relation types the traversal layer knows.
///
/// Relation types are open at the data layer (any concept with
/// `can_be_relation` may appear as `rel`); this enum is derived from the
/// `rel` concept ID when a relation is inspected, with [`Unknown`]
/// covering types the core does not recognize. Unknown relations are
/// carried through storage untouched and simply never match a typed
/// traversal.
///
/// [`Unknown`]: RelationKind::Unknown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// Tool-to-action purpose edge.
    UsedFor,
    /// Inverse purpose edge (action to tool).
    UsedForReverse,
    /// Object-to-material edge.
    MaterialOf,
    /// Inverse material edge.
    MaterialOfReverse,
    /// Object-to-category edge.
    CategoryOf,
    /// Inverse category edge.
    CategoryOfReverse,
    /// Object-to-discipline edge.
    DomainOf,
    /// Inverse discipline edge.
    DomainOfReverse,
    /// A relation type the core does not recognize.
    Unknown,
}

impl RelationKind {
    /// Classifies a relation-type concept ID.
    #[must_use]
    pub fn from_concept(rel: &ConceptId) -> Self {
        match rel.as_str() {
            rel_type::USED_FOR => Self::UsedFor,
            rel_type::USED_FOR_REVERSE => Self::UsedForReverse,
            rel_type::MATERIAL_OF => Self::MaterialOf,
            rel_type::MATERIAL_OF_REVERSE => Self::MaterialOfReverse,
            rel_type::CATEGORY_OF => Self::CategoryOf,
            rel_type::CATEGORY_OF_REVERSE => Self::CategoryOfReverse,
            rel_type::DOMAIN_OF => Self::DomainOf,
            rel_type::DOMAIN_OF_REVERSE => Self::DomainOfReverse,
            _ => Self::Unknown,
        }
    }

    /// The canonical concept identifier for a known kind.
    #[must_use]
    pub const fn concept_id(self) -> Option<&'static str> {
        match self {
            Self::UsedFor => Some(rel_type::USED_FOR),
            Self::UsedForReverse => Some(rel_type::USED_FOR_REVERSE),
            Self::MaterialOf => Some(rel_type::MATERIAL_OF),
            Self::MaterialOfReverse => Some(rel_type::MATERIAL_OF_REVERSE),
            Self::CategoryOf => Some(rel_type::CATEGORY_OF),
            Self::CategoryOfReverse => Some(rel_type::CATEGORY_OF_REVERSE),
            Self::DomainOf => Some(rel_type::DOMAIN_OF),
            Self::DomainOfReverse => Some(rel_type::DOMAIN_OF_REVERSE),
            Self::Unknown => None,
        }
    }
}

/// A directed, typed, conditioned edge between two concepts.
///
/// Relations are immutable once loaded. The same `(src, rel, dst)`
/// combination may recur with different conditions: the same relation
/// type can hold under different contexts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relation {
    /// Unique relation identifier.
    pub id: RelationId,

    /// Source concept.
    pub src: ConceptId,

    /// Relation-type concept.
    pub rel: ConceptId,

    /// Destination concept.
    pub dst: ConceptId,

    /// Contextual attributes under which the edge holds.
    #[serde(default)]
    pub conditions: ConditionSet,

    /// Assertion polarity.
    #[serde(default)]
    pub polarity: Polarity,

    /// Lifecycle status.
    #[serde(default)]
    pub status: Status,

    /// Whether this relation is an auto-generated inverse.
    #[serde(default)]
    pub is_reverse: bool,

    /// The relation this one inverts, when `is_reverse` is set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reverse_of: Option<RelationId>,

    /// Free-text annotation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,

    /// When the relation was recorded, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Relation {
    /// Creates a positive, active relation with no conditions.
    #[must_use]
    pub fn new(
        id: impl Into<RelationId>,
        src: impl Into<ConceptId>,
        rel: impl Into<ConceptId>,
        dst: impl Into<ConceptId>,
    ) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            rel: rel.into(),
            dst: dst.into(),
            conditions: ConditionSet::new(),
            polarity: Polarity::Positive,
            status: Status::Active,
            is_reverse: false,
            reverse_of: None,
            note: String::new(),
            created_at: None,
        }
    }

    /// Attaches a condition set.
    #[must_use]
    pub fn with_conditions(mut self, conditions: ConditionSet) -> Self {
        self.conditions = conditions;
        self
    }

    /// Marks the relation as negated.
    #[must_use]
    pub fn negated(mut self) -> Self {
        self.polarity = Polarity::Negated;
        self
    }

    /// Marks the relation as the auto-generated inverse of another.
    #[must_use]
    pub fn reversing(mut self, original: impl Into<RelationId>) -> Self {
        self.is_reverse = true;
        self.reverse_of = Some(original.into());
        self
    }

    /// Attaches a free-text annotation.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    /// The traversal-layer classification of this relation's type.
    #[must_use]
    pub fn kind(&self) -> RelationKind {
        RelationKind::from_concept(&self.rel)
    }
}
