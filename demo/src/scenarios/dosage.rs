//! Scenario 3: Weight-Based Dosage Calculation
//!
//! Computes a pediatric weight-based dose that hits the per-dose ceiling,
//! shows the derivation and capping warning, converts to a total daily
//! dose, and screens the drug against the patient record.

use vigil_contracts::error::VigilResult;
use vigil_contracts::medication::FrequencyPeriod;
use vigil_dosage::{
    calculate_total_daily_dose, calculate_weight_based_dose, format_dosage_calculation,
    validate_medication_for_patient,
};
use vigil_knowledge::KnowledgeBase;

use crate::sample_data::pediatric_patient;

/// Run Scenario 3: the pediatric dosage walkthrough.
pub fn run_scenario(kb: &KnowledgeBase) -> VigilResult<()> {
    println!("=== Scenario 3: Weight-Based Dosage ===");
    println!();

    let patient = pediatric_patient();
    let amoxicillin = kb
        .find_drug("Amoxicillin")
        .expect("builtin formulary includes amoxicillin");

    println!(
        "  Patient: {} ({} years, {} kg)",
        patient.name,
        patient.age,
        patient.weight.unwrap_or_default()
    );
    println!("  Drug:    {} (weight-based pediatric dosing)", amoxicillin.name);
    println!();

    // ── Recommended dose ─────────────────────────────────────────────────────
    let calc = calculate_weight_based_dose(&patient, amoxicillin, None);

    println!("  Formula:          {}", calc.formula);
    println!("  Calculated:       {} mg", calc.calculated_amount);
    println!("  Recommended:      {} mg", calc.recommended_dose);
    println!("  Within range:     {}", calc.is_within_normal_range);
    for warning in &calc.warnings {
        println!("  Warning:          {}", warning);
    }
    println!();

    // ── Total daily dose at three-times-daily dosing ─────────────────────────
    let daily = calculate_total_daily_dose(calc.recommended_dose, 3, FrequencyPeriod::Daily);
    println!("  Total daily dose at 3×/day: {} mg", daily);
    println!();

    // ── Screening and display digest ─────────────────────────────────────────
    let screen = validate_medication_for_patient(&patient, amoxicillin, calc.recommended_dose);
    println!("  Screening notes: {}", screen.len());
    for note in &screen {
        println!("    - {}", note);
    }

    let summary = format_dosage_calculation(&calc);
    println!("  Summary:       {}", summary.summary);
    println!("  Warning level: {:?}", summary.warning_level);

    println!();
    println!("  Scenario 3 complete.");
    println!();

    Ok(())
}
