//! Cross-language meaning comparison.
//!
//! Compares the concept sets reachable from two surface forms, possibly
//! in different languages, and reports overlap and difference. This
//! operates purely on the anchor index; no relations are traversed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::anchor::{LOCAL_LANG, WESTERN_LANG};
use crate::concept::ConceptId;
use crate::engine::Engine;

/// Guesses the language of an expression.
///
/// An expression consisting entirely of 7-bit characters is classified
/// as the western language, anything else as the local language. This is
/// a deliberately coarse, byte-exact heuristic, not a language detector;
/// downstream behavior (which anchor subset is consulted) depends on it,
/// so it must not be refined silently.
#[must_use]
pub fn infer_lang(expr: &str) -> &'static str {
    if expr.is_ascii() {
        WESTERN_LANG
    } else {
        LOCAL_LANG
    }
}

/// The result of comparing two expressions' meanings.
///
/// All concept lists are sorted for deterministic output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeaningDiff {
    /// The left input expression.
    pub expr_left: String,
    /// The language inferred for the left expression.
    pub lang_left: String,
    /// Concepts anchored by the left expression.
    pub concepts_left: Vec<ConceptId>,
    /// The right input expression.
    pub expr_right: String,
    /// The language inferred for the right expression.
    pub lang_right: String,
    /// Concepts anchored by the right expression.
    pub concepts_right: Vec<ConceptId>,
    /// Concepts anchored by both.
    pub shared: Vec<ConceptId>,
    /// Concepts anchored only by the left expression.
    pub only_left: Vec<ConceptId>,
    /// Concepts anchored only by the right expression.
    pub only_right: Vec<ConceptId>,
}

impl Engine {
    /// Compares the full anchored concept sets of two expressions.
    ///
    /// Each expression's language is inferred with [`infer_lang`] and
    /// its complete concept set (not just the first match) is resolved
    /// in that language.
    #[must_use]
    pub fn diff_meanings(&self, left: &str, right: &str) -> MeaningDiff {
        let lang_left = infer_lang(left);
        let lang_right = infer_lang(right);

        let concepts_left: BTreeSet<ConceptId> = self
            .resolve_concepts(left, Some(lang_left))
            .into_iter()
            .collect();
        let concepts_right: BTreeSet<ConceptId> = self
            .resolve_concepts(right, Some(lang_right))
            .into_iter()
            .collect();

        MeaningDiff {
            expr_left: left.to_string(),
            lang_left: lang_left.to_string(),
            concepts_left: concepts_left.iter().cloned().collect(),
            expr_right: right.to_string(),
            lang_right: lang_right.to_string(),
            concepts_right: concepts_right.iter().cloned().collect(),
            shared: concepts_left.intersection(&concepts_right).cloned().collect(),
            only_left: concepts_left.difference(&concepts_right).cloned().collect(),
            only_right: concepts_right.difference(&concepts_left).cloned().collect(),
        }
    }
}
