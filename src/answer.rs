//! Answer composition.
//!
//! [`compose`] turns a classified [`QueryDescriptor`] into a uniform
//! [`Answer`] envelope regardless of which query family ran: the
//! original text and pattern tag are echoed back, the extracted subject
//! rides along, and the results carry family-specific payloads.

use serde::Serialize;
use serde_json::Value;

use crate::concept::ConceptId;
use crate::condition::ConditionSet;
use crate::diff::MeaningDiff;
use crate::engine::Engine;
use crate::evidence::Evidence;
use crate::profile::{Profile, Slot};
use crate::query::RelationHit;
use crate::question::{PatternTag, QueryDescriptor, QueryRequest};
use crate::relation::RelationId;

/// One relation-backed answer row.
#[derive(Debug, Clone, Serialize)]
pub struct RelationAnswer {
    /// Display label for the answer concept.
    pub value: String,
    /// Every label carried by the answer concept in the query language.
    pub labels: Vec<String>,
    /// The answer concept itself.
    pub concept: ConceptId,
    /// The profile slot this row fills, for slot-style queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot: Option<Slot>,
    /// The relation-type concept the row came from.
    pub from_relation: ConceptId,
    /// Conditions attached to the underlying relation.
    pub conditions: ConditionSet,
    /// Identifier of the underlying relation.
    pub relation_id: RelationId,
    /// Evidence records attached to the underlying relation.
    pub evidence: Vec<Evidence>,
}

/// One translation answer row.
#[derive(Debug, Clone, Serialize)]
pub struct TranslationAnswer {
    /// A label in the target language.
    pub value: String,
    /// The language the label belongs to.
    pub target_lang: String,
}

/// One entry in an answer's result list.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnswerItem {
    /// A relation-backed row.
    Relation(RelationAnswer),
    /// A rendered concept profile.
    Profile(Profile),
    /// A meaning comparison.
    Diff(MeaningDiff),
    /// A cross-language label.
    Translation(TranslationAnswer),
}

/// The uniform answer envelope returned by [`Engine::ask`].
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// The original question text.
    pub query: String,
    /// The pattern that classified the question.
    pub tag: PatternTag,
    /// The extracted subject, when the query family has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Family-specific result rows; empty when nothing was found.
    pub results: Vec<AnswerItem>,
    /// Free-form remark, set when the question was not understood.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Answer {
    /// Serializes the answer to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns the underlying serializer error; with the types used
    /// here that only happens for non-finite evidence weights.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Runs the query a descriptor asks for and wraps the outcome.
pub(crate) fn compose(engine: &Engine, descriptor: QueryDescriptor) -> Answer {
    let subject = descriptor.request.subject().map(str::to_string);
    let slot = descriptor.request.slot();
    let lang = descriptor.lang.as_str();

    let (results, note) = match &descriptor.request {
        QueryRequest::Purpose { subject } => {
            (relation_items(engine, engine.purpose_of(subject, lang), slot), None)
        }
        QueryRequest::Material { subject } => {
            (relation_items(engine, engine.materials_of(subject, lang), slot), None)
        }
        QueryRequest::Category { subject } => {
            (relation_items(engine, engine.categories_of(subject, lang), slot), None)
        }
        QueryRequest::Tools { subject } => {
            (relation_items(engine, engine.tools_for_action(subject, lang), None), None)
        }
        QueryRequest::Profile { subject } => {
            let items = engine
                .render_profile(subject, lang)
                .map(AnswerItem::Profile)
                .into_iter()
                .collect();
            (items, None)
        }
        QueryRequest::Diff { left, right } => {
            (vec![AnswerItem::Diff(engine.diff_meanings(left, right))], None)
        }
        QueryRequest::Translation {
            subject,
            target_lang,
        } => {
            let items = engine
                .translations(subject, lang, target_lang)
                .into_iter()
                .map(|value| {
                    AnswerItem::Translation(TranslationAnswer {
                        value,
                        target_lang: target_lang.clone(),
                    })
                })
                .collect();
            (items, None)
        }
        QueryRequest::Unknown { .. } => (
            Vec::new(),
            Some("この質問パターンはまだ理解できません。".to_string()),
        ),
    };

    Answer {
        query: descriptor.text,
        tag: descriptor.tag,
        subject,
        results,
        note,
    }
}

fn relation_items(engine: &Engine, hits: Vec<RelationHit>, slot: Option<Slot>) -> Vec<AnswerItem> {
    hits.into_iter()
        .map(|hit| {
            let evidence = engine.evidence_for(&hit.relation);
            AnswerItem::Relation(RelationAnswer {
                value: hit.value,
                labels: hit.labels,
                concept: hit.concept,
                slot,
                from_relation: hit.from_relation,
                conditions: hit.conditions,
                relation_id: hit.relation,
                evidence,
            })
        })
        .collect()
}
