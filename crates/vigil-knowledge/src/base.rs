//! The drug knowledge base: loading and lookup.
//!
//! `KnowledgeBase` wraps a [`KnowledgeConfig`] loaded from a TOML document
//! and exposes the lookup operations the alert generators and dosage
//! calculator need. Lookups never fail — a miss returns `None`/false.
//!
//! Lookup semantics:
//!
//! 1. Interaction rows are scanned in declaration order; the first row
//!    matching the unordered medication pair wins.
//! 2. "Matches" for an interaction token means the token is a substring
//!    of the medication's lowercased name or generic name.
//! 3. Formulary records match by exact case-insensitive equality on
//!    name, generic name, or any brand name.

use std::path::Path;

use tracing::debug;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    medication::Medication,
};

use crate::tables::{DrugRecord, InteractionRow, KnowledgeConfig};

/// Default formulary shipped with the engine.
const BUILTIN_FORMULARY: &str = include_str!("../data/formulary.toml");

/// The static clinical reference data, ready for lookup.
///
/// Construct via `builtin`, `from_toml_str`, or `from_file`, then share
/// one instance across the alert engine and the dosage calculator.
///
/// ```rust,ignore
/// use vigil_knowledge::KnowledgeBase;
///
/// let kb = KnowledgeBase::from_file(Path::new("formulary.toml"))?;
/// ```
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    config: KnowledgeConfig,
}

impl KnowledgeBase {
    /// Load the formulary embedded in this crate.
    pub fn builtin() -> Self {
        // The embedded document is validated by the crate's test suite,
        // so a parse failure here is unreachable in a released build.
        Self::from_toml_str(BUILTIN_FORMULARY)
            .unwrap_or_else(|e| panic!("builtin formulary is malformed: {e}"))
    }

    /// Parse `s` as TOML and build a `KnowledgeBase`.
    ///
    /// Returns `VigilError::ConfigError` if the TOML is malformed or does
    /// not match the expected `KnowledgeConfig` schema.
    pub fn from_toml_str(s: &str) -> VigilResult<Self> {
        let config: KnowledgeConfig = toml::from_str(s).map_err(|e| VigilError::ConfigError {
            reason: format!("failed to parse formulary TOML: {}", e),
        })?;
        Ok(Self { config })
    }

    /// Read the file at `path` and parse it as a TOML formulary.
    pub fn from_file(path: &Path) -> VigilResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| VigilError::ConfigError {
            reason: format!("failed to read formulary file '{}': {}", path.display(), e),
        })?;
        Self::from_toml_str(&contents)
    }

    /// Build a knowledge base directly from an in-memory config.
    pub fn from_config(config: KnowledgeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KnowledgeConfig {
        &self.config
    }

    // ── Formulary lookup ──────────────────────────────────────────────────────

    /// Find the formulary record for a drug name.
    ///
    /// Matches by exact case-insensitive equality against the record's
    /// canonical name, generic name, or any brand name.
    pub fn find_drug(&self, name: &str) -> Option<&DrugRecord> {
        let needle = name.to_lowercase();
        self.config.drugs.iter().find(|record| {
            record.name.to_lowercase() == needle
                || record.generic_name.to_lowercase() == needle
                || record
                    .brand_names
                    .iter()
                    .any(|brand| brand.to_lowercase() == needle)
        })
    }

    /// Find the formulary record for a medication order, trying the
    /// order's name first and its generic name second.
    pub fn find_drug_for(&self, medication: &Medication) -> Option<&DrugRecord> {
        self.find_drug(&medication.name).or_else(|| {
            medication
                .generic_name
                .as_deref()
                .and_then(|generic| self.find_drug(generic))
        })
    }

    // ── Interaction lookup ────────────────────────────────────────────────────

    /// Find a known interaction between two medication orders.
    ///
    /// Scans the table in declaration order and returns the first row
    /// where one order matches `drug_a` and the other matches `drug_b`,
    /// in either assignment. A medication matches a token when the token
    /// is a substring of its lowercased name or generic name.
    pub fn find_interaction(&self, a: &Medication, b: &Medication) -> Option<&InteractionRow> {
        let name_a = a.name.to_lowercase();
        let generic_a = a.generic_name.as_deref().map(str::to_lowercase);
        let name_b = b.name.to_lowercase();
        let generic_b = b.generic_name.as_deref().map(str::to_lowercase);

        let matches = |token: &str, name: &str, generic: Option<&str>| {
            name.contains(token) || generic.is_some_and(|g| g.contains(token))
        };

        let row = self.config.interactions.iter().find(|row| {
            let token_a = row.drug_a.to_lowercase();
            let token_b = row.drug_b.to_lowercase();

            (matches(&token_a, &name_a, generic_a.as_deref())
                && matches(&token_b, &name_b, generic_b.as_deref()))
                || (matches(&token_b, &name_a, generic_a.as_deref())
                    && matches(&token_a, &name_b, generic_b.as_deref()))
        });

        if let Some(row) = row {
            debug!(
                drug_a = %row.drug_a,
                drug_b = %row.drug_b,
                severity = ?row.severity,
                "interaction table hit"
            );
        }

        row
    }

    // ── Class and risk-list lookup ────────────────────────────────────────────

    /// Members of the drug class whose name (or alias) equals `allergen`,
    /// case-insensitively.
    pub fn class_members(&self, allergen: &str) -> Option<&[String]> {
        let needle = allergen.to_lowercase();
        self.config
            .drug_classes
            .iter()
            .find(|class| {
                class.name.to_lowercase() == needle
                    || class.aliases.iter().any(|a| a.to_lowercase() == needle)
            })
            .map(|class| class.members.as_slice())
    }

    /// Whether the order names a drug on the elderly-risk list.
    ///
    /// Tokens match as substrings of the order's name or generic name, so
    /// "morphine" flags "Morphine Sulfate ER".
    pub fn is_elderly_risk(&self, medication: &Medication) -> bool {
        let name = medication.name.to_lowercase();
        let generic = medication.generic_name.as_deref().map(str::to_lowercase);

        self.config.elderly_risk.iter().any(|token| {
            let token = token.to_lowercase();
            name.contains(&token) || generic.as_deref().is_some_and(|g| g.contains(&token))
        })
    }
}

impl Default for KnowledgeBase {
    fn default() -> Self {
        Self::builtin()
    }
}
