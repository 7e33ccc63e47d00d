//! The 9-slot semantic-frame profile renderer.
//!
//! A profile projects every positive relation touching one focus
//! concept into nine fixed semantic roles. A static table maps each
//! relation kind to an optional forward slot (focus is `src`) and an
//! optional backward slot (focus is `dst`); kinds absent from the table
//! populate nothing and raise nothing.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::anchor::{LOCAL_LANG, WESTERN_LANG};
use crate::concept::ConceptId;
use crate::engine::Engine;
use crate::relation::{Polarity, RelationKind};
use crate::storage::DEFAULT_TOP_K;

/// The nine fixed semantic roles of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    /// Who acts.
    Actor,
    /// What kind of thing the focus is.
    ObjectType,
    /// Why.
    Reason,
    /// By what means or material.
    Method,
    /// Where.
    Location,
    /// When.
    Time,
    /// What results.
    Outcome,
    /// In what state.
    State,
    /// In which discipline or domain.
    Discipline,
}

impl Slot {
    /// All nine slots, in presentation order.
    pub const ALL: [Self; 9] = [
        Self::Actor,
        Self::ObjectType,
        Self::Reason,
        Self::Method,
        Self::Location,
        Self::Time,
        Self::Outcome,
        Self::State,
        Self::Discipline,
    ];
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Actor => "actor",
            Self::ObjectType => "object_type",
            Self::Reason => "reason",
            Self::Method => "method",
            Self::Location => "location",
            Self::Time => "time",
            Self::Outcome => "outcome",
            Self::State => "state",
            Self::Discipline => "discipline",
        };
        write!(f, "{name}")
    }
}

/// The static relation-kind-to-slot table.
///
/// Returns `(forward, backward)`: the slot populated when the focus is
/// the relation's `src`, and the slot populated when the focus is its
/// `dst`. Either may be absent, meaning that traversal direction does
/// not contribute for that kind.
#[must_use]
pub const fn slot_pair(kind: RelationKind) -> (Option<Slot>, Option<Slot>) {
    match kind {
        RelationKind::UsedFor => (Some(Slot::Outcome), Some(Slot::ObjectType)),
        RelationKind::UsedForReverse => (Some(Slot::ObjectType), Some(Slot::Outcome)),
        RelationKind::MaterialOf => (Some(Slot::Method), None),
        RelationKind::MaterialOfReverse => (None, Some(Slot::Method)),
        RelationKind::CategoryOf => (Some(Slot::ObjectType), None),
        RelationKind::CategoryOfReverse => (None, Some(Slot::ObjectType)),
        RelationKind::DomainOf => (Some(Slot::Discipline), None),
        RelationKind::DomainOfReverse => (None, Some(Slot::Discipline)),
        RelationKind::Unknown => (None, None),
    }
}

/// The full 9-slot frame for one focus concept.
///
/// Every slot is a deduplicated, insertion-ordered sequence of display
/// labels; a slot with one entry is still a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// The focus concept.
    pub focus: ConceptId,
    /// Who acts.
    pub actor: Vec<String>,
    /// What kind of thing the focus is.
    pub object_type: Vec<String>,
    /// Why.
    pub reason: Vec<String>,
    /// By what means or material.
    pub method: Vec<String>,
    /// Where.
    pub location: Vec<String>,
    /// When.
    pub time: Vec<String>,
    /// What results.
    pub outcome: Vec<String>,
    /// In what state.
    pub state: Vec<String>,
    /// In which discipline or domain.
    pub discipline: Vec<String>,
    /// The focus's best labels in the local reference language.
    pub labels_local: Vec<String>,
    /// The focus's best labels in the western reference language.
    pub labels_western: Vec<String>,
}

impl Profile {
    fn new(focus: ConceptId, labels_local: Vec<String>, labels_western: Vec<String>) -> Self {
        Self {
            focus,
            actor: Vec::new(),
            object_type: Vec::new(),
            reason: Vec::new(),
            method: Vec::new(),
            location: Vec::new(),
            time: Vec::new(),
            outcome: Vec::new(),
            state: Vec::new(),
            discipline: Vec::new(),
            labels_local,
            labels_western,
        }
    }

    /// The labels currently in one slot.
    #[must_use]
    pub fn slot(&self, slot: Slot) -> &[String] {
        match slot {
            Slot::Actor => &self.actor,
            Slot::ObjectType => &self.object_type,
            Slot::Reason => &self.reason,
            Slot::Method => &self.method,
            Slot::Location => &self.location,
            Slot::Time => &self.time,
            Slot::Outcome => &self.outcome,
            Slot::State => &self.state,
            Slot::Discipline => &self.discipline,
        }
    }

    /// Appends a label to a slot unless it is already present.
    fn push(&mut self, slot: Slot, label: String) {
        let target = match slot {
            Slot::Actor => &mut self.actor,
            Slot::ObjectType => &mut self.object_type,
            Slot::Reason => &mut self.reason,
            Slot::Method => &mut self.method,
            Slot::Location => &mut self.location,
            Slot::Time => &mut self.time,
            Slot::Outcome => &mut self.outcome,
            Slot::State => &mut self.state,
            Slot::Discipline => &mut self.discipline,
        };
        if !target.contains(&label) {
            target.push(label);
        }
    }
}

impl Engine {
    /// Renders the 9-slot profile of the subject label.
    ///
    /// Resolves the subject exactly as the traversal primitives do, then
    /// scans every positive relation once: forward slots collect the
    /// `dst` labels of relations leaving the focus, backward slots the
    /// `src` labels of relations entering it. Display labels use the
    /// fallback-language cascade. Returns `None` when the subject does
    /// not resolve.
    #[must_use]
    pub fn render_profile(&self, label: &str, lang: &str) -> Option<Profile> {
        let focus = self.subject_concept(label, lang)?;

        let mut profile = Profile::new(
            focus.clone(),
            self.rank_labels(&focus, Some(LOCAL_LANG), DEFAULT_TOP_K),
            self.rank_labels(&focus, Some(WESTERN_LANG), DEFAULT_TOP_K),
        );

        for relation in self.relations().iter() {
            if relation.polarity != Polarity::Positive {
                continue;
            }

            let (forward, backward) = slot_pair(relation.kind());
            let (slot, reached) = if relation.src == focus {
                (forward, &relation.dst)
            } else if relation.dst == focus {
                (backward, &relation.src)
            } else {
                continue;
            };
            let Some(slot) = slot else {
                continue;
            };

            for display in self.display_labels(reached, Some(lang)) {
                profile.push(slot, display);
            }
        }

        Some(profile)
    }
}
