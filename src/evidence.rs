//! Evidence records supporting or contesting relations.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::relation::RelationId;

/// Unique identifier for an evidence record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EvidenceId(String);

impl EvidenceId {
    /// Creates an evidence ID from a raw identifier string.
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

impl fmt::Display for EvidenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EvidenceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Whether a piece of evidence supports or opposes its relation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    /// The evidence supports the relation.
    Supporting,
    /// The evidence contests the relation.
    Opposing,
}

impl Default for Stance {
    fn default() -> Self {
        Self::Supporting
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Supporting => write!(f, "supporting"),
            Self::Opposing => write!(f, "opposing"),
        }
    }
}

/// A weighted, stance-tagged record attached to one relation.
///
/// A relation may carry any number of evidence records, including none;
/// absence of evidence is a normal state, never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Unique identifier.
    pub id: EvidenceId,

    /// The relation this record is about.
    pub relation: RelationId,

    /// Category of evidence (e.g. "observation", "citation").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub evidence_type: String,

    /// Provenance category.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_kind: String,

    /// Supporting or opposing.
    #[serde(default)]
    pub stance: Stance,

    /// Relative strength of the record.
    pub weight: f64,

    /// Provenance detail.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_detail: String,

    /// Free-text annotation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,

    /// When the record was created, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Evidence {
    /// Creates a supporting evidence record with the given weight.
    #[must_use]
    pub fn supporting(
        id: impl Into<EvidenceId>,
        relation: impl Into<RelationId>,
        weight: f64,
    ) -> Self {
        Self {
            id: id.into(),
            relation: relation.into(),
            evidence_type: String::new(),
            source_kind: String::new(),
            stance: Stance::Supporting,
            weight,
            source_detail: String::new(),
            note: String::new(),
            created_at: None,
        }
    }

    /// Creates an opposing evidence record with the given weight.
    #[must_use]
    pub fn opposing(
        id: impl Into<EvidenceId>,
        relation: impl Into<RelationId>,
        weight: f64,
    ) -> Self {
        Self {
            stance: Stance::Opposing,
            ..Self::supporting(id, relation, weight)
        }
    }

    /// Sets the evidence category.
    #[must_use]
    pub fn with_type(mut self, evidence_type: impl Into<String>) -> Self {
        self.evidence_type = evidence_type.into();
        self
    }

    /// Sets provenance.
    #[must_use]
    pub fn with_source(mut self, kind: impl Into<String>, detail: impl Into<String>) -> Self {
        self.source_kind = kind.into();
        self.source_detail = detail.into();
        self
    }
}
