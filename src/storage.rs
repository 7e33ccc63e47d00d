//! Read-only stores and derived indexes over the knowledge base.
//!
//! All four collections are built once by [`Engine::load`](crate::Engine::load)
//! and never mutated afterwards, so none of them carries a lock: a fully
//! constructed store set may be shared read-only across threads.
//!
//! The [`AnchorIndex`] and [`EvidenceIndex`] own their underlying record
//! vectors and index them by non-owning positions, so a record indexed
//! under two keys exists exactly once.

use std::collections::{BTreeSet, HashMap};

use crate::anchor::{Anchor, AnchorId, LOCAL_LANG};
use crate::concept::{Concept, ConceptId};
use crate::error::ValidationError;
use crate::evidence::{Evidence, EvidenceId};
use crate::relation::{Relation, RelationId};

/// Default number of labels returned by ranked-label lookups.
pub const DEFAULT_TOP_K: usize = 3;

/// The set of core concepts, keyed by identifier.
#[derive(Debug, Default)]
pub struct ConceptStore {
    by_id: HashMap<ConceptId, Concept>,
}

impl ConceptStore {
    /// Builds the store, rejecting duplicate identifiers.
    pub fn build(concepts: Vec<Concept>) -> Result<Self, ValidationError> {
        let mut by_id = HashMap::with_capacity(concepts.len());
        for concept in concepts {
            let id = concept.id.clone();
            if by_id.insert(id.clone(), concept).is_some() {
                return Err(ValidationError::DuplicateConcept { id });
            }
        }
        Ok(Self { by_id })
    }

    /// Looks up a concept by identifier.
    #[must_use]
    pub fn get(&self, id: &ConceptId) -> Option<&Concept> {
        self.by_id.get(id)
    }

    /// Returns true if the identifier is defined.
    #[must_use]
    pub fn contains(&self, id: &ConceptId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of concepts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

/// The set of relations, held in storage (insertion) order.
///
/// Queries scan relations linearly and yield matches in storage order;
/// the store never reorders.
#[derive(Debug, Default)]
pub struct RelationStore {
    relations: Vec<Relation>,
    by_id: HashMap<RelationId, usize>,
}

impl RelationStore {
    /// Builds the store, rejecting duplicate identifiers.
    pub fn build(relations: Vec<Relation>) -> Result<Self, ValidationError> {
        let mut by_id = HashMap::with_capacity(relations.len());
        for (pos, relation) in relations.iter().enumerate() {
            if by_id.insert(relation.id.clone(), pos).is_some() {
                return Err(ValidationError::DuplicateRelation {
                    id: relation.id.clone(),
                });
            }
        }
        Ok(Self { relations, by_id })
    }

    /// Iterates relations in storage order.
    pub fn iter(&self) -> impl Iterator<Item = &Relation> {
        self.relations.iter()
    }

    /// Looks up a relation by identifier.
    #[must_use]
    pub fn get(&self, id: &RelationId) -> Option<&Relation> {
        self.by_id.get(id).map(|&pos| &self.relations[pos])
    }

    /// Returns true if the identifier is defined.
    #[must_use]
    pub fn contains(&self, id: &RelationId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Number of relations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Returns true if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

/// Bidirectional index between surface-form labels and concepts.
///
/// Two derived lookup structures are built once from the expression-link
/// collection: label to links sharing that label, and concept to links
/// anchored to it, both in insertion order.
#[derive(Debug, Default)]
pub struct AnchorIndex {
    anchors: Vec<Anchor>,
    by_label: HashMap<String, Vec<usize>>,
    by_concept: HashMap<ConceptId, Vec<usize>>,
}

impl AnchorIndex {
    /// Builds the index, rejecting duplicate identifiers and empty labels.
    pub fn build(anchors: Vec<Anchor>) -> Result<Self, ValidationError> {
        let mut seen: HashMap<AnchorId, ()> = HashMap::with_capacity(anchors.len());
        let mut by_label: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_concept: HashMap<ConceptId, Vec<usize>> = HashMap::new();

        for (pos, anchor) in anchors.iter().enumerate() {
            if seen.insert(anchor.id.clone(), ()).is_some() {
                return Err(ValidationError::DuplicateAnchor {
                    id: anchor.id.clone(),
                });
            }
            if anchor.label.is_empty() {
                return Err(ValidationError::EmptyAnchorLabel {
                    anchor: anchor.id.clone(),
                });
            }
            by_label.entry(anchor.label.clone()).or_default().push(pos);
            by_concept
                .entry(anchor.concept.clone())
                .or_default()
                .push(pos);
        }

        Ok(Self {
            anchors,
            by_label,
            by_concept,
        })
    }

    /// Iterates all anchors in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Anchor> {
        self.anchors.iter()
    }

    /// Number of anchors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns true if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// All concepts anchored by `label`, optionally filtered by
    /// language, deduplicated and returned in a stable sorted order.
    ///
    /// Sorting is for deterministic, testable output, not ranking.
    #[must_use]
    pub fn resolve_concepts(&self, label: &str, lang: Option<&str>) -> Vec<ConceptId> {
        let Some(positions) = self.by_label.get(label) else {
            return Vec::new();
        };

        let mut out: BTreeSet<&ConceptId> = BTreeSet::new();
        for &pos in positions {
            let anchor = &self.anchors[pos];
            if let Some(lang) = lang {
                if anchor.lang() != Some(lang) {
                    continue;
                }
            }
            out.insert(&anchor.concept);
        }
        out.into_iter().cloned().collect()
    }

    /// Labels for `concept`, optionally language-filtered, scored by the
    /// `freq` condition (descending, ties by insertion order) and
    /// truncated to `top_k`.
    #[must_use]
    pub fn rank_labels(&self, concept: &ConceptId, lang: Option<&str>, top_k: usize) -> Vec<String> {
        let Some(positions) = self.by_concept.get(concept) else {
            return Vec::new();
        };

        let mut scored: Vec<(f64, &str)> = Vec::new();
        for &pos in positions {
            let anchor = &self.anchors[pos];
            if let Some(lang) = lang {
                if anchor.lang() != Some(lang) {
                    continue;
                }
            }
            scored.push((anchor.freq(), anchor.label.as_str()));
        }

        // Stable sort: equal frequencies keep insertion order.
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        scored
            .into_iter()
            .take(top_k)
            .map(|(_, label)| label.to_string())
            .collect()
    }

    /// Display labels with the fallback-language cascade.
    ///
    /// Tries the preferred language, then the default language, then any
    /// language, then falls back to the raw concept identifier, so the
    /// result is never empty for an entity that exists.
    #[must_use]
    pub fn display_labels(&self, concept: &ConceptId, lang: Option<&str>) -> Vec<String> {
        let mut labels = self.rank_labels(concept, lang, DEFAULT_TOP_K);
        if labels.is_empty() && lang != Some(LOCAL_LANG) {
            labels = self.rank_labels(concept, Some(LOCAL_LANG), DEFAULT_TOP_K);
        }
        if labels.is_empty() {
            labels = self.rank_labels(concept, None, DEFAULT_TOP_K);
        }
        if labels.is_empty() {
            labels = vec![concept.to_string()];
        }
        labels
    }
}

/// Non-owning grouping of evidence records by relation identifier.
#[derive(Debug, Default)]
pub struct EvidenceIndex {
    evidence: Vec<Evidence>,
    by_relation: HashMap<RelationId, Vec<usize>>,
}

impl EvidenceIndex {
    /// Builds the index, rejecting duplicate identifiers.
    pub fn build(evidence: Vec<Evidence>) -> Result<Self, ValidationError> {
        let mut seen: HashMap<EvidenceId, ()> = HashMap::with_capacity(evidence.len());
        let mut by_relation: HashMap<RelationId, Vec<usize>> = HashMap::new();

        for (pos, record) in evidence.iter().enumerate() {
            if seen.insert(record.id.clone(), ()).is_some() {
                return Err(ValidationError::DuplicateEvidence {
                    id: record.id.clone(),
                });
            }
            by_relation
                .entry(record.relation.clone())
                .or_default()
                .push(pos);
        }

        Ok(Self {
            evidence,
            by_relation,
        })
    }

    /// Iterates all evidence records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Evidence> {
        self.evidence.iter()
    }

    /// Evidence records for one relation, in insertion order.
    ///
    /// A relation with no evidence yields an empty slice, never an error.
    #[must_use]
    pub fn for_relation(&self, relation: &RelationId) -> Vec<&Evidence> {
        self.by_relation
            .get(relation)
            .map(|positions| positions.iter().map(|&pos| &self.evidence[pos]).collect())
            .unwrap_or_default()
    }

    /// Number of evidence records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.evidence.len()
    }

    /// Returns true if the index is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.evidence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relation::rel_type;

    fn knife_anchors() -> Vec<Anchor> {
        vec![
            Anchor::new("x-001", "包丁", "core:knife-001")
                .with_lang("ja")
                .with_freq(0.9),
            Anchor::new("x-002", "ナイフ", "core:knife-001")
                .with_lang("ja")
                .with_freq(0.5),
            Anchor::new("x-003", "knife", "core:knife-001").with_lang("en"),
            Anchor::new("x-004", "包丁", "core:blade-001").with_lang("ja"),
        ]
    }

    #[test]
    fn test_concept_store_rejects_duplicates() {
        let err = ConceptStore::build(vec![
            Concept::new("core:a-001"),
            Concept::new("core:a-001"),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateConcept { .. }));
    }

    #[test]
    fn test_relation_store_preserves_insertion_order() {
        let store = RelationStore::build(vec![
            Relation::new("t-002", "core:b-001", rel_type::USED_FOR, "core:c-001"),
            Relation::new("t-001", "core:a-001", rel_type::USED_FOR, "core:c-001"),
        ])
        .unwrap();

        let ids: Vec<&str> = store.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["t-002", "t-001"]);
        assert!(store.contains(&RelationId::new("t-001")));
        assert!(store.get(&RelationId::new("t-003")).is_none());
    }

    #[test]
    fn test_resolve_concepts_dedupes_and_sorts() {
        let mut anchors = knife_anchors();
        // Second link from the same label to the same concept.
        anchors.push(Anchor::new("x-005", "包丁", "core:knife-001").with_lang("ja"));
        let index = AnchorIndex::build(anchors).unwrap();

        let resolved = index.resolve_concepts("包丁", Some("ja"));
        assert_eq!(
            resolved,
            vec![ConceptId::new("core:blade-001"), ConceptId::new("core:knife-001")]
        );
        // Idempotent: asking twice gives the identical answer.
        assert_eq!(resolved, index.resolve_concepts("包丁", Some("ja")));
    }

    #[test]
    fn test_resolve_concepts_applies_language_filter() {
        let index = AnchorIndex::build(knife_anchors()).unwrap();
        assert!(index.resolve_concepts("包丁", Some("en")).is_empty());
        assert_eq!(index.resolve_concepts("knife", Some("en")).len(), 1);
        // No filter: both languages count.
        assert_eq!(index.resolve_concepts("包丁", None).len(), 2);
    }

    #[test]
    fn test_rank_labels_sorts_by_freq_then_insertion() {
        let index = AnchorIndex::build(vec![
            Anchor::new("x-001", "first-tie", "core:k-001")
                .with_lang("ja")
                .with_freq(0.5),
            Anchor::new("x-002", "top", "core:k-001")
                .with_lang("ja")
                .with_freq(0.9),
            Anchor::new("x-003", "second-tie", "core:k-001")
                .with_lang("ja")
                .with_freq(0.5),
        ])
        .unwrap();

        let labels = index.rank_labels(&ConceptId::new("core:k-001"), Some("ja"), 10);
        assert_eq!(labels, vec!["top", "first-tie", "second-tie"]);
    }

    #[test]
    fn test_rank_labels_truncates_to_top_k() {
        let index = AnchorIndex::build(knife_anchors()).unwrap();
        let labels = index.rank_labels(&ConceptId::new("core:knife-001"), Some("ja"), 1);
        assert_eq!(labels, vec!["包丁"]);
        assert!(index
            .rank_labels(&ConceptId::new("core:knife-001"), Some("ja"), 0)
            .is_empty());
    }

    #[test]
    fn test_display_labels_cascades_to_default_then_any_then_id() {
        let index = AnchorIndex::build(vec![
            Anchor::new("x-001", "包丁", "core:knife-001").with_lang("ja"),
            Anchor::new("x-002", "cuchillo", "core:blade-001").with_lang("es"),
        ])
        .unwrap();

        // Preferred language missing, default language present.
        assert_eq!(
            index.display_labels(&ConceptId::new("core:knife-001"), Some("en")),
            vec!["包丁"]
        );
        // Neither preferred nor default: any language.
        assert_eq!(
            index.display_labels(&ConceptId::new("core:blade-001"), Some("en")),
            vec!["cuchillo"]
        );
        // No anchors at all: the raw identifier.
        assert_eq!(
            index.display_labels(&ConceptId::new("core:ghost-001"), Some("en")),
            vec!["core:ghost-001"]
        );
    }

    #[test]
    fn test_anchor_index_rejects_empty_labels_and_duplicates() {
        let err = AnchorIndex::build(vec![Anchor::new("x-001", "", "core:a-001")]).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyAnchorLabel { .. }));

        let err = AnchorIndex::build(vec![
            Anchor::new("x-001", "a", "core:a-001"),
            Anchor::new("x-001", "b", "core:a-001"),
        ])
        .unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateAnchor { .. }));
    }

    #[test]
    fn test_evidence_index_groups_by_relation() {
        let index = EvidenceIndex::build(vec![
            Evidence::supporting("ev-001", "t-001", 0.8),
            Evidence::opposing("ev-002", "t-001", 0.2),
            Evidence::supporting("ev-003", "t-002", 1.0),
        ])
        .unwrap();

        let for_t1 = index.for_relation(&RelationId::new("t-001"));
        assert_eq!(for_t1.len(), 2);
        assert_eq!(for_t1[0].id.as_str(), "ev-001");

        // Absent relation degrades to an empty list.
        assert!(index.for_relation(&RelationId::new("t-999")).is_empty());
    }
}
