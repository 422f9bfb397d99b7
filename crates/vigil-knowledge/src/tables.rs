//! Knowledge-base configuration schema.
//!
//! A `KnowledgeConfig` is deserialized from TOML and holds the four static
//! reference tables: pairwise drug interactions, drug-class synonyms, the
//! elderly-risk list, and the formulary of per-drug dosing records. The
//! tables are pure data; all matching behavior lives in
//! [`crate::base::KnowledgeBase`] and [`crate::matching`].
//!
//! Interaction rows are consulted in declaration order — when more than
//! one row could match the same medication pair, the first row wins, so
//! tables should list the most specific entries first.

use serde::{Deserialize, Serialize};

use vigil_contracts::alert::AlertSeverity;

/// One pairwise interaction table row.
///
/// The pair is unordered: a lookup for (B, A) matches a row declared as
/// (A, B). Drug tokens are matched as substrings of a medication's name
/// or generic name, so `drug_a = "warfarin"` matches an order named
/// "Warfarin Sodium".
///
/// Example in TOML:
/// ```toml
/// [[interactions]]
/// drug_a = "warfarin"
/// drug_b = "aspirin"
/// severity = "high"
/// description = "Concurrent use markedly increases bleeding risk."
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRow {
    pub drug_a: String,
    pub drug_b: String,
    pub severity: AlertSeverity,
    pub description: String,
}

/// A drug class and its member drugs, used to generalize a recorded
/// allergy ("Penicillin") beyond one exact drug name.
///
/// The class `name` (and any `aliases`) are matched against the allergen
/// by exact case-insensitive equality; `members` are matched against the
/// medication's name/generic name as substrings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugClassEntry {
    pub name: String,
    /// Alternate spellings of the class name ("nsaids" for "nsaid").
    #[serde(default)]
    pub aliases: Vec<String>,
    pub members: Vec<String>,
}

/// One formulary record: reference dosing and contraindication knowledge
/// for a single drug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrugRecord {
    /// Canonical name.
    pub name: String,
    pub generic_name: String,
    #[serde(default)]
    pub brand_names: Vec<String>,
    /// Whether dosing scales with patient weight.
    #[serde(default)]
    pub weight_based: bool,
    pub pediatric_dosing: Option<PediatricDosing>,
    pub adult_dosing: Option<AdultDosing>,
    /// Free-text contraindication phrases, matched by substring keyword
    /// heuristics ("pregnancy", "children under 12", "sulfonamide allergy").
    #[serde(default)]
    pub contraindications: Vec<String>,
}

/// Weight-based pediatric dosing parameters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PediatricDosing {
    /// Ages (fractional years) this dosing applies to, inclusive.
    pub min_age: f64,
    pub max_age: f64,
    /// mg per kg of body weight per dose.
    pub dose_per_kg: f64,
    /// Absolute per-dose ceiling, when one exists.
    pub max_dose: Option<f64>,
}

/// Flat adult dosing range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AdultDosing {
    pub min_dose: f64,
    pub max_dose: f64,
    /// The usual starting dose; also the basis for per-kg scaling of
    /// weight-based adult drugs (interpreted as the dose for a 70 kg
    /// reference patient).
    pub common_dose: f64,
}

/// The top-level structure deserialized from a TOML formulary file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnowledgeConfig {
    /// Ordered interaction table. First match wins.
    #[serde(default)]
    pub interactions: Vec<InteractionRow>,
    #[serde(default)]
    pub drug_classes: Vec<DrugClassEntry>,
    /// Drug name tokens flagged for patients 65 and older.
    #[serde(default)]
    pub elderly_risk: Vec<String>,
    #[serde(default)]
    pub drugs: Vec<DrugRecord>,
}
