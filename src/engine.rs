//! The query engine: an explicit, load-then-freeze context value.
//!
//! [`Engine::load`] consumes the four already-parsed collections the
//! ingestion collaborator produces, validates cross-references, builds
//! the derived indexes, and freezes. Every query operation is a pure,
//! blocking, in-memory computation over the frozen stores; nothing
//! writes back into the knowledge base. A fully loaded engine may be
//! shared read-only across threads.

use tracing::{debug, warn};

use crate::anchor::Anchor;
use crate::answer::{self, Answer};
use crate::concept::{Concept, ConceptId};
use crate::error::{ImiResult, ValidationError};
use crate::evidence::Evidence;
use crate::question::parse_question;
use crate::relation::{Relation, RelationId, RelationKind};
use crate::storage::{AnchorIndex, ConceptStore, EvidenceIndex, RelationStore, DEFAULT_TOP_K};

/// The in-memory retrieval/query engine over one knowledge base.
///
/// # Examples
///
/// ```
/// use imi::{Anchor, Concept, ConditionSet, Engine, Relation};
/// use serde_json::json;
///
/// let engine = Engine::load(
///     vec![
///         Concept::new("core:knife-001"),
///         Concept::new("core:cut-001"),
///         Concept::new("core:use-purpose-001").relational(),
///     ],
///     vec![Relation::new("t-001", "core:knife-001", "core:use-purpose-001", "core:cut-001")
///         .with_conditions(ConditionSet::new().with("domain", json!(["cooking"])))],
///     vec![
///         Anchor::new("x-001", "包丁", "core:knife-001").with_lang("ja"),
///         Anchor::new("x-002", "切る", "core:cut-001").with_lang("ja"),
///     ],
///     vec![],
/// )?;
///
/// let answer = engine.ask("包丁の用途は？", "ja");
/// assert_eq!(answer.results.len(), 1);
/// # Ok::<(), imi::ImiError>(())
/// ```
#[derive(Debug)]
pub struct Engine {
    concepts: ConceptStore,
    relations: RelationStore,
    anchors: AnchorIndex,
    evidence: EvidenceIndex,
}

impl Engine {
    /// Loads a knowledge base and freezes it.
    ///
    /// Load policy: structurally invalid collections are rejected here
    /// rather than treated as silently unmatched at query time. A
    /// relation whose `src`, `rel` or `dst` is not a defined concept, an
    /// anchor pointing at an undefined concept, an evidence record
    /// pointing at an undefined relation, or any repeated identifier
    /// fails the load.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] describing the first offending
    /// record.
    pub fn load(
        concepts: Vec<Concept>,
        relations: Vec<Relation>,
        anchors: Vec<Anchor>,
        evidence: Vec<Evidence>,
    ) -> ImiResult<Self> {
        let concepts = ConceptStore::build(concepts)?;
        let relations = RelationStore::build(relations)?;
        let anchors = AnchorIndex::build(anchors)?;
        let evidence = EvidenceIndex::build(evidence)?;

        for relation in relations.iter() {
            for (role, concept) in [
                ("src", &relation.src),
                ("rel", &relation.rel),
                ("dst", &relation.dst),
            ] {
                if !concepts.contains(concept) {
                    return Err(ValidationError::UnknownConceptInRelation {
                        relation: relation.id.clone(),
                        concept: concept.clone(),
                        role,
                    }
                    .into());
                }
            }
            if relation.kind() == RelationKind::Unknown {
                debug!(relation = %relation.id, rel = %relation.rel, "unrecognized relation type");
            }
        }

        for anchor in anchors.iter() {
            if !concepts.contains(&anchor.concept) {
                return Err(ValidationError::UnknownConceptInAnchor {
                    anchor: anchor.id.clone(),
                    label: anchor.label.clone(),
                    concept: anchor.concept.clone(),
                }
                .into());
            }
        }

        for record in evidence.iter() {
            if !relations.contains(&record.relation) {
                return Err(ValidationError::UnknownRelationInEvidence {
                    evidence: record.id.clone(),
                    relation: record.relation.clone(),
                }
                .into());
            }
        }

        debug!(
            concepts = concepts.len(),
            relations = relations.len(),
            anchors = anchors.len(),
            evidence = evidence.len(),
            "knowledge base loaded"
        );

        Ok(Self {
            concepts,
            relations,
            anchors,
            evidence,
        })
    }

    /// The concept store.
    #[must_use]
    pub fn concepts(&self) -> &ConceptStore {
        &self.concepts
    }

    /// The relation store.
    #[must_use]
    pub fn relations(&self) -> &RelationStore {
        &self.relations
    }

    /// The anchor index.
    #[must_use]
    pub fn anchors(&self) -> &AnchorIndex {
        &self.anchors
    }

    /// The evidence index.
    #[must_use]
    pub fn evidence(&self) -> &EvidenceIndex {
        &self.evidence
    }

    /// All concepts anchored by `label` in `lang`, sorted.
    #[must_use]
    pub fn resolve_concepts(&self, label: &str, lang: Option<&str>) -> Vec<ConceptId> {
        self.anchors.resolve_concepts(label, lang)
    }

    /// Ranked labels for one concept. See [`AnchorIndex::rank_labels`].
    #[must_use]
    pub fn rank_labels(&self, concept: &ConceptId, lang: Option<&str>, top_k: usize) -> Vec<String> {
        self.anchors.rank_labels(concept, lang, top_k)
    }

    /// Display labels with the fallback-language cascade.
    #[must_use]
    pub fn display_labels(&self, concept: &ConceptId, lang: Option<&str>) -> Vec<String> {
        self.anchors.display_labels(concept, lang)
    }

    /// Evidence records for one relation, cloned for result assembly.
    ///
    /// A relation with no evidence yields an empty list.
    #[must_use]
    pub fn evidence_for(&self, relation: &RelationId) -> Vec<Evidence> {
        self.evidence
            .for_relation(relation)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Resolves a subject label to its first (lowest-sorted) concept.
    ///
    /// An unresolved subject is an expected zero-result outcome (typos,
    /// missing vocabulary), reported as `None` and logged, never an
    /// error.
    #[must_use]
    pub(crate) fn subject_concept(&self, label: &str, lang: &str) -> Option<ConceptId> {
        let mut resolved = self.anchors.resolve_concepts(label, Some(lang));
        if resolved.is_empty() {
            warn!(label, lang, "no concept anchored by subject label");
            return None;
        }
        Some(resolved.remove(0))
    }

    /// Labels of `label`'s concept in `target_lang`.
    ///
    /// Resolves the subject in `source_lang` and re-resolves its labels
    /// in the target language; an unresolved subject or an untranslated
    /// concept yields an empty list.
    #[must_use]
    pub fn translations(&self, label: &str, source_lang: &str, target_lang: &str) -> Vec<String> {
        let Some(concept) = self.subject_concept(label, source_lang) else {
            return Vec::new();
        };
        self.anchors
            .rank_labels(&concept, Some(target_lang), DEFAULT_TOP_K)
    }

    /// Answers a free-text question.
    ///
    /// The single entry point the presentation collaborator consumes:
    /// classifies `text` with the rule list for `lang`, dispatches the
    /// resulting descriptor to the matching query operation, and
    /// assembles the uniform answer record. Unsupported question shapes
    /// and unresolved subjects produce empty results, not errors.
    #[must_use]
    pub fn ask(&self, text: &str, lang: &str) -> Answer {
        let descriptor = parse_question(text, lang);
        answer::compose(self, descriptor)
    }
}
