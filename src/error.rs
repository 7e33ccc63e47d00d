//! Error types for imi.
//!
//! All errors are strongly typed using thiserror. Absence of data at
//! query time (an unresolved subject, an unmatched question pattern,
//! a relation with no evidence) is never an error; it is representable
//! in the result schema. The only fatal conditions are structural: a
//! collection handed to [`Engine::load`](crate::Engine::load) that
//! references records which do not exist, or that repeats an identifier.

use thiserror::Error;

use crate::anchor::AnchorId;
use crate::concept::ConceptId;
use crate::evidence::EvidenceId;
use crate::relation::RelationId;

/// Structural validation errors raised while loading a knowledge base.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Duplicate concept id: {id}")]
    DuplicateConcept {
        /// The repeated identifier.
        id: ConceptId,
    },

    #[error("Duplicate relation id: {id}")]
    DuplicateRelation {
        /// The repeated identifier.
        id: RelationId,
    },

    #[error("Duplicate anchor id: {id}")]
    DuplicateAnchor {
        /// The repeated identifier.
        id: AnchorId,
    },

    #[error("Duplicate evidence id: {id}")]
    DuplicateEvidence {
        /// The repeated identifier.
        id: EvidenceId,
    },

    #[error("Relation {relation} references undefined concept {concept} as {role}")]
    UnknownConceptInRelation {
        /// The referencing relation.
        relation: RelationId,
        /// The missing concept.
        concept: ConceptId,
        /// Which field referenced it (src/rel/dst).
        role: &'static str,
    },

    #[error("Anchor {anchor} (label '{label}') references undefined concept {concept}")]
    UnknownConceptInAnchor {
        /// The referencing anchor.
        anchor: AnchorId,
        /// The anchor's label, for diagnostics.
        label: String,
        /// The missing concept.
        concept: ConceptId,
    },

    #[error("Evidence {evidence} references undefined relation {relation}")]
    UnknownRelationInEvidence {
        /// The referencing evidence record.
        evidence: EvidenceId,
        /// The missing relation.
        relation: RelationId,
    },

    #[error("Anchor {anchor} has an empty label")]
    EmptyAnchorLabel {
        /// The offending anchor.
        anchor: AnchorId,
    },
}

/// Top-level error type for imi.
#[derive(Debug, Error)]
pub enum ImiError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl ImiError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

/// Result type alias for imi operations.
pub type ImiResult<T> = Result<T, ImiError>;
