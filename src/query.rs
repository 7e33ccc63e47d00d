//! Relation-traversal query primitives.
//!
//! Four domain queries share one shape: resolve the subject label to
//! its first matching concept, scan the relation store through
//! [`RelationFilter`], and re-resolve the result concepts to display
//! labels. Every result row keeps the originating relation identifier
//! so evidence can be joined by the caller.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::concept::ConceptId;
use crate::condition::{ConditionSet, DOMAIN_KEY};
use crate::engine::Engine;
use crate::relation::{Polarity, Relation, RelationId, RelationKind};

/// The domain tag the built-in query primitives filter on.
pub const COOKING_DOMAIN: &str = "cooking";

/// Filter for a linear scan over the relation store.
///
/// Unset fields are wildcards. Relations are yielded in storage order,
/// never reordered.
#[derive(Debug, Clone, Default)]
pub struct RelationFilter<'a> {
    /// Required source concept.
    pub src: Option<&'a ConceptId>,
    /// Required relation kind.
    pub kind: Option<RelationKind>,
    /// Required destination concept.
    pub dst: Option<&'a ConceptId>,
    /// Required member of the relation's `domain` condition.
    pub domain: Option<&'a str>,
    /// Required polarity; `None` matches both polarities.
    pub polarity: Option<Polarity>,
}

impl<'a> RelationFilter<'a> {
    /// A filter matching positive relations only, everything else open.
    #[must_use]
    pub fn positive() -> Self {
        Self {
            polarity: Some(Polarity::Positive),
            ..Self::default()
        }
    }

    /// Requires the source concept.
    #[must_use]
    pub fn src(mut self, src: &'a ConceptId) -> Self {
        self.src = Some(src);
        self
    }

    /// Requires the relation kind.
    #[must_use]
    pub fn kind(mut self, kind: RelationKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Requires the destination concept.
    #[must_use]
    pub fn dst(mut self, dst: &'a ConceptId) -> Self {
        self.dst = Some(dst);
        self
    }

    /// Requires the domain condition to contain `domain`.
    #[must_use]
    pub fn domain(mut self, domain: &'a str) -> Self {
        self.domain = Some(domain);
        self
    }

    fn matches(&self, relation: &Relation) -> bool {
        if let Some(polarity) = self.polarity {
            if relation.polarity != polarity {
                return false;
            }
        }
        if let Some(src) = self.src {
            if relation.src != *src {
                return false;
            }
        }
        if let Some(kind) = self.kind {
            if relation.kind() != kind {
                return false;
            }
        }
        if let Some(dst) = self.dst {
            if relation.dst != *dst {
                return false;
            }
        }
        if let Some(domain) = self.domain {
            let wanted = ConditionSet::new().with(DOMAIN_KEY, json!([domain]));
            if !relation.conditions.satisfies(&wanted) {
                return false;
            }
        }
        true
    }
}

/// One row of a relation-traversal query result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationHit {
    /// The originating relation, for evidence joins.
    pub relation: RelationId,
    /// The relation-type concept of the originating relation.
    pub from_relation: ConceptId,
    /// The traversal-layer kind of the originating relation.
    pub kind: RelationKind,
    /// The concept reached by the traversal.
    pub concept: ConceptId,
    /// Best display label for the reached concept.
    pub value: String,
    /// All display labels for the reached concept.
    pub labels: Vec<String>,
    /// The originating relation's conditions.
    pub conditions: ConditionSet,
}

impl Engine {
    /// Linear scan over the relation store.
    ///
    /// Applies exact equality on the set fields of `filter`; the domain
    /// filter goes through the condition matcher, requiring the
    /// relation's `domain` condition to contain the value. Matches are
    /// yielded in storage order.
    #[must_use]
    pub fn find_relations(&self, filter: &RelationFilter<'_>) -> Vec<&Relation> {
        self.relations()
            .iter()
            .filter(|relation| filter.matches(relation))
            .collect()
    }

    /// What the subject is used for.
    #[must_use]
    pub fn purpose_of(&self, label: &str, lang: &str) -> Vec<RelationHit> {
        self.forward_hits(label, lang, RelationKind::UsedFor)
    }

    /// What the subject is made of.
    #[must_use]
    pub fn materials_of(&self, label: &str, lang: &str) -> Vec<RelationHit> {
        self.forward_hits(label, lang, RelationKind::MaterialOf)
    }

    /// What the subject is classified as.
    #[must_use]
    pub fn categories_of(&self, label: &str, lang: &str) -> Vec<RelationHit> {
        self.forward_hits(label, lang, RelationKind::CategoryOf)
    }

    /// Tools used for the subject action.
    ///
    /// Union of two traversals: relations where the action is the `dst`
    /// of a purpose edge (their `src` is the tool), and relations where
    /// the action is the `src` of a reverse-purpose edge (their `dst` is
    /// the tool). The two result lists are concatenated, not
    /// deduplicated; duplicate tool entries are tolerated by design in
    /// this layer.
    #[must_use]
    pub fn tools_for_action(&self, label: &str, lang: &str) -> Vec<RelationHit> {
        let Some(action) = self.subject_concept(label, lang) else {
            return Vec::new();
        };

        let mut hits: Vec<RelationHit> = self
            .find_relations(
                &RelationFilter::positive()
                    .dst(&action)
                    .kind(RelationKind::UsedFor)
                    .domain(COOKING_DOMAIN),
            )
            .into_iter()
            .map(|relation| self.hit(relation, &relation.src, lang))
            .collect();

        hits.extend(
            self.find_relations(
                &RelationFilter::positive()
                    .src(&action)
                    .kind(RelationKind::UsedForReverse)
                    .domain(COOKING_DOMAIN),
            )
            .into_iter()
            .map(|relation| self.hit(relation, &relation.dst, lang)),
        );

        hits
    }

    /// The shared shape of the three forward (src-side) primitives.
    fn forward_hits(&self, label: &str, lang: &str, kind: RelationKind) -> Vec<RelationHit> {
        let Some(subject) = self.subject_concept(label, lang) else {
            return Vec::new();
        };

        self.find_relations(
            &RelationFilter::positive()
                .src(&subject)
                .kind(kind)
                .domain(COOKING_DOMAIN),
        )
        .into_iter()
        .map(|relation| self.hit(relation, &relation.dst, lang))
        .collect()
    }

    /// Builds a result row for one matched relation.
    fn hit(&self, relation: &Relation, reached: &ConceptId, lang: &str) -> RelationHit {
        let labels = self.display_labels(reached, Some(lang));
        let value = labels
            .first()
            .cloned()
            .unwrap_or_else(|| reached.to_string());
        RelationHit {
            relation: relation.id.clone(),
            from_relation: relation.rel.clone(),
            kind: relation.kind(),
            concept: reached.clone(),
            value,
            labels,
            conditions: relation.conditions.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::Anchor;
    use crate::concept::Concept;
    use crate::relation::rel_type;

    fn cooking() -> ConditionSet {
        ConditionSet::new().with(DOMAIN_KEY, json!([COOKING_DOMAIN]))
    }

    fn kitchen_engine() -> Engine {
        let concepts = vec![
            Concept::new("core:knife-001"),
            Concept::new("core:cut-001"),
            Concept::new("core:steel-001"),
            Concept::new("core:tool-001"),
            Concept::new("core:scissors-001"),
            Concept::new(rel_type::USED_FOR).relational(),
            Concept::new(rel_type::USED_FOR_REVERSE).relational(),
            Concept::new(rel_type::MATERIAL_OF).relational(),
            Concept::new(rel_type::CATEGORY_OF).relational(),
        ];
        let relations = vec![
            Relation::new("t-001", "core:knife-001", rel_type::USED_FOR, "core:cut-001")
                .with_conditions(cooking()),
            Relation::new("t-002", "core:knife-001", rel_type::MATERIAL_OF, "core:steel-001")
                .with_conditions(cooking()),
            Relation::new("t-003", "core:knife-001", rel_type::CATEGORY_OF, "core:tool-001")
                .with_conditions(cooking()),
            Relation::new("t-004", "core:scissors-001", rel_type::USED_FOR, "core:cut-001")
                .with_conditions(cooking()),
            Relation::new("t-005", "core:cut-001", rel_type::USED_FOR_REVERSE, "core:knife-001")
                .with_conditions(cooking())
                .reversing("t-001"),
            // Out-of-domain relation that must never surface.
            Relation::new("t-006", "core:knife-001", rel_type::USED_FOR, "core:tool-001"),
            // Negated relation that must never surface.
            Relation::new("t-007", "core:knife-001", rel_type::USED_FOR, "core:steel-001")
                .with_conditions(cooking())
                .negated(),
        ];
        let anchors = vec![
            Anchor::new("x-001", "包丁", "core:knife-001").with_lang("ja"),
            Anchor::new("x-002", "knife", "core:knife-001").with_lang("en"),
            Anchor::new("x-003", "切る", "core:cut-001").with_lang("ja"),
            Anchor::new("x-004", "鋼", "core:steel-001").with_lang("ja"),
            Anchor::new("x-005", "道具", "core:tool-001").with_lang("ja"),
            Anchor::new("x-006", "はさみ", "core:scissors-001").with_lang("ja"),
        ];
        Engine::load(concepts, relations, anchors, vec![]).unwrap()
    }

    #[test]
    fn test_find_relations_yields_storage_order() {
        let engine = kitchen_engine();
        let knife = ConceptId::new("core:knife-001");
        let found = engine.find_relations(&RelationFilter::positive().src(&knife));
        let ids: Vec<&str> = found.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["t-001", "t-002", "t-003", "t-006"]);
    }

    #[test]
    fn test_find_relations_domain_filter_uses_condition_matcher() {
        let engine = kitchen_engine();
        let knife = ConceptId::new("core:knife-001");
        let found = engine.find_relations(
            &RelationFilter::positive()
                .src(&knife)
                .kind(RelationKind::UsedFor)
                .domain(COOKING_DOMAIN),
        );
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id.as_str(), "t-001");
    }

    #[test]
    fn test_find_relations_polarity_default_and_override() {
        let engine = kitchen_engine();
        let knife = ConceptId::new("core:knife-001");

        let positive = engine.find_relations(
            &RelationFilter::positive()
                .src(&knife)
                .domain(COOKING_DOMAIN),
        );
        assert!(positive.iter().all(|r| r.polarity == Polarity::Positive));

        let any = engine.find_relations(&RelationFilter {
            src: Some(&knife),
            domain: Some(COOKING_DOMAIN),
            polarity: None,
            ..RelationFilter::default()
        });
        assert!(any.iter().any(|r| r.polarity == Polarity::Negated));
    }

    #[test]
    fn test_purpose_of_resolves_labels_and_keeps_relation_id() {
        let engine = kitchen_engine();
        let hits = engine.purpose_of("包丁", "ja");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, "切る");
        assert_eq!(hits[0].relation, RelationId::new("t-001"));
        assert_eq!(hits[0].from_relation, ConceptId::new(rel_type::USED_FOR));
        assert_eq!(hits[0].kind, RelationKind::UsedFor);
    }

    #[test]
    fn test_materials_and_categories_traverse_their_kinds() {
        let engine = kitchen_engine();
        let materials = engine.materials_of("包丁", "ja");
        assert_eq!(materials.len(), 1);
        assert_eq!(materials[0].value, "鋼");

        let categories = engine.categories_of("包丁", "ja");
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].value, "道具");
    }

    #[test]
    fn test_unresolved_subject_yields_empty_results() {
        let engine = kitchen_engine();
        assert!(engine.purpose_of("存在しない", "ja").is_empty());
        assert!(engine.materials_of("包丁", "en").is_empty()); // label is ja-only
        assert!(engine.tools_for_action("存在しない", "ja").is_empty());
    }

    #[test]
    fn test_anchored_subject_without_relations_yields_empty_results() {
        let engine = kitchen_engine();
        // 鋼 is anchored but has no src-side purpose relations.
        assert!(engine.purpose_of("鋼", "ja").is_empty());
    }

    #[test]
    fn test_tools_for_action_concatenates_both_traversals() {
        let engine = kitchen_engine();
        let tools = engine.tools_for_action("切る", "ja");

        // Two forward hits (knife, scissors) plus one reverse hit (knife):
        // the union is a concatenation; the duplicate knife survives.
        assert_eq!(tools.len(), 3);
        let values: Vec<&str> = tools.iter().map(|h| h.value.as_str()).collect();
        assert_eq!(values, vec!["包丁", "はさみ", "包丁"]);

        let forward = engine.find_relations(
            &RelationFilter::positive()
                .dst(&ConceptId::new("core:cut-001"))
                .kind(RelationKind::UsedFor)
                .domain(COOKING_DOMAIN),
        );
        let reverse = engine.find_relations(
            &RelationFilter::positive()
                .src(&ConceptId::new("core:cut-001"))
                .kind(RelationKind::UsedForReverse)
                .domain(COOKING_DOMAIN),
        );
        assert_eq!(tools.len(), forward.len() + reverse.len());
    }

    #[test]
    fn test_hit_value_falls_back_through_display_cascade() {
        let concepts = vec![
            Concept::new("core:knife-001"),
            Concept::new("core:cut-001"),
            Concept::new(rel_type::USED_FOR).relational(),
        ];
        let relations = vec![Relation::new(
            "t-001",
            "core:knife-001",
            rel_type::USED_FOR,
            "core:cut-001",
        )
        .with_conditions(cooking())];
        // The destination has no anchors at all.
        let anchors = vec![Anchor::new("x-001", "包丁", "core:knife-001").with_lang("ja")];
        let engine = Engine::load(concepts, relations, anchors, vec![]).unwrap();

        let hits = engine.purpose_of("包丁", "ja");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, "core:cut-001");
        assert_eq!(hits[0].labels, vec!["core:cut-001"]);
    }
}
