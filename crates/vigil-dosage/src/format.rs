//! Display formatting for dosage calculations.

use vigil_contracts::dosage::{DosageCalculation, DosageSummary, WarningLevel};

/// Warnings carrying any of these mean the calculation must be presented
/// as an error.
const ERROR_KEYWORDS: [&str; 4] = ["ALLERGY", "CONTRAINDICATION", "exceeds maximum", "significantly"];

/// Lowercased caution verbs that elevate a result to warning level.
const CAUTION_KEYWORDS: [&str; 3] = ["verify", "monitor", "consider"];

/// Digest a calculation into a one-line summary, detail lines, and a
/// warning level for the UI.
///
/// Level policy: `error` when any warning carries an error keyword;
/// otherwise `warning` when any warning carries a caution verb or the
/// dose is out of range; otherwise `info` when any warnings exist at all;
/// otherwise `none`.
pub fn format_dosage_calculation(calc: &DosageCalculation) -> DosageSummary {
    let has_error = calc
        .warnings
        .iter()
        .any(|w| ERROR_KEYWORDS.iter().any(|k| w.contains(k)));
    let has_caution = calc.warnings.iter().any(|w| {
        let lower = w.to_lowercase();
        CAUTION_KEYWORDS.iter().any(|k| lower.contains(k))
    });

    let warning_level = if has_error {
        WarningLevel::Error
    } else if has_caution || !calc.is_within_normal_range {
        WarningLevel::Warning
    } else if !calc.warnings.is_empty() {
        WarningLevel::Info
    } else {
        WarningLevel::None
    };

    let summary = if calc.dose_per_kg > 0.0 {
        format!(
            "Recommended dose {} mg ({} mg/kg at {} kg)",
            calc.recommended_dose, calc.dose_per_kg, calc.patient_weight
        )
    } else {
        format!("Recommended dose {} mg", calc.recommended_dose)
    };

    let mut details = vec![calc.formula.clone()];
    details.extend(calc.warnings.iter().cloned());

    DosageSummary {
        summary,
        details,
        warning_level,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
