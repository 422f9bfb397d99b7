//! # vigil-knowledge
//!
//! The TOML-driven drug knowledge base for the VIGIL safety engine, plus
//! the pure string-matching primitives built on top of it.
//!
//! ## Overview
//!
//! Static reference data — the pairwise interaction table, drug-class
//! synonyms, the elderly-risk list, and the formulary of dosing records —
//! is configuration, not code. [`KnowledgeBase`] loads it from a TOML
//! document (an embedded default ships with the crate) and exposes the
//! lookups the generators need.
//!
//! ## Matching semantics
//!
//! All matching is case-insensitive and heuristic: substring containment
//! for allergens and interaction tokens, exact equality for formulary and
//! class-name lookup, and whole-word prefix/suffix boundaries for
//! duplicate detection. The unit tables below pin these boundaries so a
//! knowledge-base edit cannot silently change them.

pub mod base;
pub mod matching;
pub mod tables;

pub use base::KnowledgeBase;
pub use matching::{allergy_matches, is_duplicate_medication};
pub use tables::{
    AdultDosing, DrugClassEntry, DrugRecord, InteractionRow, KnowledgeConfig, PediatricDosing,
};

// ── Tests ─────────────────────────────────────────────────────────────────────
