//! Scenario 1: Full Medication Safety Sweep
//!
//! Runs the alert engine over an elderly inpatient's medication list and
//! walks the acknowledgment round trip:
//!
//!   1. Engine evaluates the full order list → ranked alerts
//!   2. Critical banner counts unacknowledged critical/high alerts
//!   3. The clinician acknowledges the top alert → persisted via AckLedger
//!   4. Re-evaluation joins the acknowledgment; the banner count drops

use vigil_alerts::{critical_banner_count, AckLedger, AlertEngine, AlertFocus, InMemoryKvStore};
use vigil_contracts::{alert::MedicationAlert, error::VigilResult};
use vigil_knowledge::KnowledgeBase;

use crate::sample_data::{elderly_inpatient, elderly_inpatient_orders};

fn print_alert(alert: &MedicationAlert) {
    let ack = if alert.acknowledged {
        " [acknowledged]"
    } else if alert.requires_acknowledgment {
        " [requires acknowledgment]"
    } else {
        ""
    };
    println!("  [{:?}] {}{}", alert.severity, alert.title, ack);
    println!("      {}", alert.message);
    if let Some(recommendation) = &alert.recommendation {
        println!("      → {}", recommendation);
    }
}

/// Run Scenario 1: the full safety sweep with acknowledgment round trip.
pub fn run_scenario(kb: &KnowledgeBase) -> VigilResult<()> {
    println!("=== Scenario 1: Medication Safety Sweep ===");
    println!();

    let engine = AlertEngine::new(kb.clone());
    let ledger = AckLedger::new(Box::new(InMemoryKvStore::new()));

    let patient = elderly_inpatient();
    let orders = elderly_inpatient_orders();

    println!("  Patient: {} ({} years, {:?})", patient.name, patient.age, patient.gender);
    for allergy in &patient.allergies {
        println!(
            "  Allergy: {} ({:?}, reaction: {})",
            allergy.allergen, allergy.severity, allergy.reaction
        );
    }
    println!("  Orders:  {}", orders
        .iter()
        .map(|m| m.name.as_str())
        .collect::<Vec<_>>()
        .join(", "));
    println!();

    // ── First evaluation: nothing acknowledged yet ────────────────────────────
    let acked = ledger.acknowledged_ids(&patient.id)?;
    let alerts = engine.generate(&patient, &orders, None, AlertFocus::AllMedications, &acked);

    println!("  {} alert(s), ranked by severity:", alerts.len());
    for alert in &alerts {
        print_alert(alert);
    }
    println!();
    println!(
        "  Critical banner: {} unacknowledged critical/high alert(s)",
        critical_banner_count(&alerts)
    );
    println!();

    // ── Acknowledge the most urgent alert ─────────────────────────────────────
    let top = alerts.first().expect("sweep produced alerts");
    println!("  Acknowledging: {} ({})", top.title, top.id);
    ledger.acknowledge(&patient.id, &top.id)?;

    // ── Second evaluation: the acknowledgment is joined back in ───────────────
    let acked = ledger.acknowledged_ids(&patient.id)?;
    let alerts = engine.generate(&patient, &orders, None, AlertFocus::AllMedications, &acked);

    println!(
        "  After acknowledgment, critical banner: {} alert(s)",
        critical_banner_count(&alerts)
    );
    let timestamps = ledger.timestamps(&patient.id)?;
    if let Some(at) = timestamps.get(&top.id) {
        println!("  Acknowledged at: {}", at.to_rfc3339());
    }

    println!();
    println!("  Scenario 1 complete.");
    println!();

    Ok(())
}
