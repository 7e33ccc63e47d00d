//! Expression links: surface-form anchors into the concept space.
//!
//! An anchor associates one literal label in one natural language with
//! exactly one concept. The association is many-to-many in aggregate:
//! one label may anchor several concepts under different conditions
//! (ambiguity) and one concept may carry many labels (synonymy and
//! multilingual variants).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::concept::{ConceptId, Status};
use crate::condition::ConditionSet;

/// The default language consulted first by label-fallback cascades.
pub const LOCAL_LANG: &str = "ja";

/// The secondary reference language.
pub const WESTERN_LANG: &str = "en";

/// Unique identifier for an expression link.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnchorId(String);

impl AnchorId {
    /// Creates an anchor ID from a raw identifier string.
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

impl fmt::Display for AnchorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AnchorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A language-tagged surface-form label bound to one concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    /// Unique identifier.
    pub id: AnchorId,

    /// The literal surface form.
    pub label: String,

    /// The concept this label anchors to.
    pub concept: ConceptId,

    /// Language tag, usage frequency, and other context.
    #[serde(default)]
    pub conditions: ConditionSet,

    /// Provenance category (e.g. "manual", "import").
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_kind: String,

    /// Provenance detail.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub source_detail: String,

    /// Lifecycle status.
    #[serde(default)]
    pub status: Status,

    /// When the link was created, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    /// When the link was last updated, if recorded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    /// Free-text annotation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub note: String,
}

impl Anchor {
    /// Creates an active anchor with no conditions.
    #[must_use]
    pub fn new(
        id: impl Into<AnchorId>,
        label: impl Into<String>,
        concept: impl Into<ConceptId>,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            concept: concept.into(),
            conditions: ConditionSet::new(),
            source_kind: String::new(),
            source_detail: String::new(),
            status: Status::Active,
            created_at: None,
            updated_at: None,
            note: String::new(),
        }
    }

    /// Attaches a condition set.
    #[must_use]
    pub fn with_conditions(mut self, conditions: ConditionSet) -> Self {
        self.conditions = conditions;
        self
    }

    /// Sets the language condition.
    #[must_use]
    pub fn with_lang(mut self, lang: &str) -> Self {
        self.conditions = self.conditions.with(crate::condition::LANG_KEY, json!(lang));
        self
    }

    /// Sets the usage-frequency condition.
    #[must_use]
    pub fn with_freq(mut self, freq: f64) -> Self {
        self.conditions = self.conditions.with(crate::condition::FREQ_KEY, json!(freq));
        self
    }

    /// Sets provenance.
    #[must_use]
    pub fn with_source(mut self, kind: impl Into<String>, detail: impl Into<String>) -> Self {
        self.source_kind = kind.into();
        self.source_detail = detail.into();
        self
    }

    /// The language tag of this anchor, if set.
    #[must_use]
    pub fn lang(&self) -> Option<&str> {
        self.conditions.lang()
    }

    /// The usage frequency of this anchor (1.0 when unset).
    #[must_use]
    pub fn freq(&self) -> f64 {
        self.conditions.freq()
    }
}
