//! The alert aggregation engine.
//!
//! One evaluation pass:
//!
//!   Preview exclusion → working set → subject selection →
//!   six generators per subject → severity sort → acknowledgment join
//!
//! The engine is stateless per call: everything it returns is derived
//! from its arguments, and the only external state — which alert ids the
//! clinician has acknowledged — is passed in as a set and joined onto the
//! output. Pairwise checks (interaction, duplicate) always scan the full
//! working set even when the subject set is restricted to a draft order.

use std::collections::HashSet;

use tracing::debug;

use vigil_contracts::{
    alert::MedicationAlert,
    medication::Medication,
    patient::Patient,
};
use vigil_knowledge::KnowledgeBase;

use crate::generators::{
    age_alert, allergy_alerts, contraindication_alert, dosage_alert, duplicate_alerts,
    interaction_alerts,
};

/// Which medications to evaluate as alert subjects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertFocus {
    /// Evaluate every medication in the working set.
    AllMedications,
    /// Evaluate only the draft order (live preview sidebar). Pairwise
    /// checks still scan the full working set.
    NewMedicationOnly,
}

/// The medication safety-alert engine.
///
/// Holds the knowledge base; construct once and reuse across evaluations.
pub struct AlertEngine {
    kb: KnowledgeBase,
}

impl AlertEngine {
    pub fn new(kb: KnowledgeBase) -> Self {
        Self { kb }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// Evaluate a patient's medication set and return ranked alerts.
    ///
    /// `new_medication` is an optional draft order being composed in the
    /// UI. When its id is the preview sentinel, the saved original it is
    /// editing (matched by name + route + patient id) is excluded from
    /// the working set so the draft does not collide with its own prior
    /// version in duplicate/interaction checks.
    ///
    /// The result is sorted by severity (critical first; stable within
    /// equal severity) with each alert's `acknowledged` flag joined from
    /// `acknowledged`.
    pub fn generate(
        &self,
        patient: &Patient,
        current_medications: &[Medication],
        new_medication: Option<&Medication>,
        focus: AlertFocus,
        acknowledged: &HashSet<String>,
    ) -> Vec<MedicationAlert> {
        // ── Step 1: preview-edit exclusion ───────────────────────────────────
        let excluded_original = new_medication.filter(|draft| draft.is_preview()).and_then(
            |draft| {
                current_medications.iter().position(|m| {
                    m.name == draft.name
                        && m.route == draft.route
                        && m.patient_id == draft.patient_id
                })
            },
        );

        // ── Step 2: working set ──────────────────────────────────────────────
        let mut working: Vec<Medication> = current_medications
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != excluded_original)
            .map(|(_, m)| m.clone())
            .collect();
        if let Some(draft) = new_medication {
            working.push(draft.clone());
        }

        // ── Step 3: subject selection ────────────────────────────────────────
        let subjects: Vec<&Medication> = match (focus, new_medication) {
            // The draft was pushed last, so it is the tail of the set.
            (AlertFocus::NewMedicationOnly, Some(_)) => {
                working.last().into_iter().collect()
            }
            _ => working.iter().collect(),
        };

        debug!(
            patient_id = %patient.id,
            working_set = working.len(),
            subjects = subjects.len(),
            excluded = excluded_original.is_some(),
            "generating medication alerts"
        );

        // ── Step 4: run the generators ───────────────────────────────────────
        let mut alerts: Vec<MedicationAlert> = Vec::new();
        let mut seen_interactions: HashSet<String> = HashSet::new();
        let mut seen_duplicates: HashSet<String> = HashSet::new();

        for subject in &subjects {
            alerts.extend(allergy_alerts(subject, patient, &self.kb));
            alerts.extend(interaction_alerts(
                subject,
                &working,
                &self.kb,
                &mut seen_interactions,
            ));
            alerts.extend(duplicate_alerts(subject, &working, &mut seen_duplicates));
            alerts.extend(dosage_alert(subject, patient, &self.kb));
            alerts.extend(age_alert(subject, patient, &self.kb));
            alerts.extend(contraindication_alert(subject, patient, &self.kb));
        }

        // ── Step 5: severity sort (stable; insertion order within ties) ──────
        alerts.sort_by_key(|alert| alert.severity.rank());

        // ── Step 6: acknowledgment join ──────────────────────────────────────
        for alert in &mut alerts {
            alert.acknowledged = acknowledged.contains(&alert.id);
        }

        alerts
    }
}

/// Unacknowledged critical/high alerts that require acknowledgment — the
/// count behind the chart's red banner.
pub fn critical_banner_count(alerts: &[MedicationAlert]) -> usize {
    alerts
        .iter()
        .filter(|a| a.requires_acknowledgment && !a.acknowledged && a.severity.is_interruptive())
        .count()
}

// ── Tests ─────────────────────────────────────────────────────────────────────
