//! Scenario 2: Live Order Preview
//!
//! Demonstrates the focused evaluation the ordering sidebar uses:
//!
//!   1. An edit-in-place draft (sentinel preview id) of an existing order
//!      does NOT collide with its own saved version in duplicate checks.
//!   2. A genuinely new order is still screened against the full list —
//!      pairwise checks always scan every current medication.

use std::collections::HashSet;

use vigil_alerts::{AlertEngine, AlertFocus};
use vigil_contracts::{
    error::VigilResult,
    medication::{Medication, PREVIEW_MEDICATION_ID},
};
use vigil_knowledge::KnowledgeBase;

use crate::sample_data::{adult_patient, order};

/// Run Scenario 2: editing preview vs. new-order screening.
pub fn run_scenario(kb: &KnowledgeBase) -> VigilResult<()> {
    println!("=== Scenario 2: Live Order Preview ===");
    println!();

    let engine = AlertEngine::new(kb.clone());
    let patient = adult_patient();
    let current = vec![
        order("m-301", &patient.id, "Warfarin", Some("warfarin"), 5.0, 1),
        order("m-302", &patient.id, "Lisinopril", Some("lisinopril"), 10.0, 1),
    ];
    let no_acks: HashSet<String> = HashSet::new();

    // ── Editing the lisinopril dose in place ─────────────────────────────────
    let mut draft: Medication = order(
        PREVIEW_MEDICATION_ID,
        &patient.id,
        "Lisinopril",
        Some("lisinopril"),
        20.0,
        1,
    );

    println!("  Editing existing order: Lisinopril 10 mg → 20 mg (draft id '{}')", draft.id);
    let alerts = engine.generate(
        &patient,
        &current,
        Some(&draft),
        AlertFocus::NewMedicationOnly,
        &no_acks,
    );
    println!(
        "  Draft alerts: {} (no self-duplicate against the saved order)",
        alerts.len()
    );
    println!();

    // ── Composing a genuinely new aspirin order ──────────────────────────────
    draft = order("m-303", &patient.id, "Aspirin", Some("aspirin"), 325.0, 1);

    println!("  New order: Aspirin 325 mg, screened against the current list");
    let alerts = engine.generate(
        &patient,
        &current,
        Some(&draft),
        AlertFocus::NewMedicationOnly,
        &no_acks,
    );
    for alert in &alerts {
        println!("  [{:?}] {} — {}", alert.severity, alert.title, alert.message);
    }

    println!();
    println!("  Scenario 2 complete.");
    println!();

    Ok(())
}
