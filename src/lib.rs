//! # imi - A Tiny Semantic Knowledge Engine
//!
//! imi answers natural-language questions from an in-memory knowledge
//! base of language-independent concepts connected by conditioned,
//! evidence-backed relations and anchored to surface expressions in
//! multiple languages.
//!
//! ## Core Concepts
//!
//! - **Concept**: A language-independent unit of meaning, identified by a stable id
//! - **Relation**: A conditioned, polarized triple whose relation slot is itself a concept
//! - **Anchor**: A surface expression (a label in some language) bound to a concept
//! - **Evidence**: A weighted supporting or opposing record attached to a relation
//!
//! ## Usage
//!
//! ```rust
//! use imi::{Anchor, Concept, ConditionSet, Engine, Relation};
//! use imi::relation::rel_type;
//! use serde_json::json;
//!
//! let engine = Engine::load(
//!     vec![
//!         Concept::new("core:knife-001"),
//!         Concept::new("core:cut-001"),
//!         Concept::new(rel_type::USED_FOR).relational(),
//!     ],
//!     vec![Relation::new(
//!         "rel:knife-cut",
//!         "core:knife-001",
//!         rel_type::USED_FOR,
//!         "core:cut-001",
//!     )
//!     .with_conditions(ConditionSet::new().with("domain", json!(["cooking"])))],
//!     vec![
//!         Anchor::new("anc:knife-ja", "包丁", "core:knife-001").with_lang("ja"),
//!         Anchor::new("anc:cut-ja", "切る", "core:cut-001").with_lang("ja"),
//!     ],
//!     vec![],
//! )?;
//!
//! let answer = engine.ask("包丁の用途は？", "ja");
//! assert_eq!(answer.results.len(), 1);
//! # Ok::<(), imi::ImiError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core records
pub mod anchor;
pub mod concept;
pub mod condition;
pub mod error;
pub mod evidence;
pub mod relation;

// Storage and the loaded engine
pub mod engine;
pub mod storage;

// Query families
pub mod diff;
pub mod profile;
pub mod query;

// Question-in, answer-out surface
pub mod answer;
pub mod question;

// Re-export primary types at crate root for convenience
pub use anchor::{Anchor, AnchorId, LOCAL_LANG, WESTERN_LANG};
pub use answer::{Answer, AnswerItem, RelationAnswer, TranslationAnswer};
pub use concept::{Concept, ConceptId, Status};
pub use condition::ConditionSet;
pub use diff::{infer_lang, MeaningDiff};
pub use engine::Engine;
pub use error::{ImiError, ImiResult, ValidationError};
pub use evidence::{Evidence, EvidenceId, Stance};
pub use profile::{Profile, Slot};
pub use query::{RelationFilter, RelationHit, COOKING_DOMAIN};
pub use question::{parse_question, PatternTag, QueryDescriptor, QueryRequest};
pub use relation::{rel_type, Polarity, Relation, RelationId, RelationKind};
pub use storage::DEFAULT_TOP_K;
