//! Dosage calculation results and the shared formatting contract.
//!
//! `DosageCalculation` is always renderable: absent weight or missing
//! dosing guidelines produce a degenerate result carrying a warning
//! string, never an error (the caller gets something to display either
//! way). `DosageSummary` / `WarningLevel` are the severity/formatting
//! contract shared between the dosage calculator and the alert UI.

use serde::{Deserialize, Serialize};

/// The result of a weight-based dose computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosageCalculation {
    /// Patient weight used, in kg (0.0 in the missing-weight degenerate case).
    pub patient_weight: f64,
    /// Per-kilogram rate applied, or 0.0 for flat dosing.
    pub dose_per_kg: f64,
    /// The raw weight-scaled amount before any cap is applied.
    pub calculated_amount: f64,
    /// The dose the engine recommends after capping and clamping.
    pub recommended_dose: f64,
    /// Human-readable derivation ("25 mg/kg × 50 kg = 1250 mg").
    pub formula: String,
    pub warnings: Vec<String>,
    /// False when any hard-fail warning (exceeds / below / significantly)
    /// was appended during validation.
    pub is_within_normal_range: bool,
}

/// Display-ready digest of a `DosageCalculation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosageSummary {
    pub summary: String,
    pub details: Vec<String>,
    pub warning_level: WarningLevel,
}

/// How loudly the UI should present a dosage result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WarningLevel {
    None,
    Info,
    Warning,
    Error,
}
