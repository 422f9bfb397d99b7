//! Per-category alert rule evaluators.
//!
//! Each generator consumes a subject medication plus patient context and
//! emits zero or more alerts. "No applicable rule" is simply "no alert" —
//! generators never fail. Every generator skips discontinued subjects,
//! and the pairwise generators (interaction, duplicate) also skip
//! discontinued counterparties.
//!
//! Pairwise generators take a shared `seen_pairs` set so that an unordered
//! pair is reported exactly once per evaluation, no matter which of the
//! two orders is visited first.

use std::collections::HashSet;

use tracing::warn;

use vigil_contracts::{
    alert::{
        allergy_alert_id, pair_alert_id, subject_alert_id, AlertKind, AlertSeverity,
        MedicationAlert,
    },
    medication::Medication,
    patient::{AllergyKind, AllergySeverity, Gender, Patient},
};
use vigil_knowledge::{allergy_matches, is_duplicate_medication, KnowledgeBase};

// ── Allergy ───────────────────────────────────────────────────────────────────

/// One alert per documented drug allergy that matches the order.
///
/// Severity comes from the allergy record (severe → critical, moderate →
/// high, mild → moderate) and every allergy alert requires acknowledgment.
pub fn allergy_alerts(
    medication: &Medication,
    patient: &Patient,
    kb: &KnowledgeBase,
) -> Vec<MedicationAlert> {
    if medication.is_discontinued() {
        return Vec::new();
    }

    patient
        .allergies
        .iter()
        .filter(|allergy| allergy.kind == AllergyKind::Drug)
        .filter(|allergy| allergy_matches(medication, allergy, kb))
        .map(|allergy| {
            let severity = allergy.severity.to_alert_severity();
            let recommendation = match allergy.severity {
                AllergySeverity::Severe => {
                    "Do not administer. Contact the prescriber for an alternative."
                }
                _ => "Use with caution and monitor for allergic reaction.",
            };

            warn!(
                medication = %medication.name,
                allergen = %allergy.allergen,
                severity = ?severity,
                "allergy alert"
            );

            MedicationAlert {
                id: allergy_alert_id(&medication.id, &allergy.allergen),
                kind: AlertKind::Allergy,
                severity,
                title: "Allergy Alert".to_string(),
                message: format!(
                    "{} matches the patient's documented {} allergy (reaction: {}).",
                    medication.name, allergy.allergen, allergy.reaction
                ),
                medication_id: Some(medication.id.clone()),
                medication_name: Some(medication.name.clone()),
                related_medication_id: None,
                related_medication_name: None,
                allergen: Some(allergy.allergen.clone()),
                recommendation: Some(recommendation.to_string()),
                requires_acknowledgment: true,
                acknowledged: false,
            }
        })
        .collect()
}

// ── Interaction ───────────────────────────────────────────────────────────────

/// One alert per known interaction between the subject and any other
/// non-discontinued order in the working set.
///
/// Acknowledgment is required only for high/critical interactions;
/// moderate and low rows are informational.
pub fn interaction_alerts(
    medication: &Medication,
    all_medications: &[Medication],
    kb: &KnowledgeBase,
    seen_pairs: &mut HashSet<String>,
) -> Vec<MedicationAlert> {
    if medication.is_discontinued() {
        return Vec::new();
    }

    let mut alerts = Vec::new();

    for other in all_medications {
        if other.id == medication.id || other.is_discontinued() {
            continue;
        }
        let Some(row) = kb.find_interaction(medication, other) else {
            continue;
        };

        let id = pair_alert_id(AlertKind::Interaction, &medication.id, &other.id);
        if !seen_pairs.insert(id.clone()) {
            continue;
        }

        warn!(
            medication = %medication.name,
            other = %other.name,
            severity = ?row.severity,
            "drug interaction alert"
        );

        let recommendation = if row.severity.is_interruptive() {
            "Avoid concurrent use unless clinically necessary; review with pharmacy."
        } else {
            "Monitor for additive effects."
        };

        alerts.push(MedicationAlert {
            id,
            kind: AlertKind::Interaction,
            severity: row.severity,
            title: "Drug Interaction".to_string(),
            message: format!(
                "{} interacts with {}: {}",
                medication.name, other.name, row.description
            ),
            medication_id: Some(medication.id.clone()),
            medication_name: Some(medication.name.clone()),
            related_medication_id: Some(other.id.clone()),
            related_medication_name: Some(other.name.clone()),
            allergen: None,
            recommendation: Some(recommendation.to_string()),
            requires_acknowledgment: row.severity.is_interruptive(),
            acknowledged: false,
        });
    }

    alerts
}

// ── Duplicate ─────────────────────────────────────────────────────────────────

/// One alert per duplicate-therapy pair. Always high severity, always
/// requires acknowledgment.
pub fn duplicate_alerts(
    medication: &Medication,
    all_medications: &[Medication],
    seen_pairs: &mut HashSet<String>,
) -> Vec<MedicationAlert> {
    if medication.is_discontinued() {
        return Vec::new();
    }

    let mut alerts = Vec::new();

    for other in all_medications {
        if other.id == medication.id || other.is_discontinued() {
            continue;
        }
        if !is_duplicate_medication(medication, other) {
            continue;
        }

        let id = pair_alert_id(AlertKind::Duplicate, &medication.id, &other.id);
        if !seen_pairs.insert(id.clone()) {
            continue;
        }

        warn!(
            medication = %medication.name,
            other = %other.name,
            "duplicate medication alert"
        );

        alerts.push(MedicationAlert {
            id,
            kind: AlertKind::Duplicate,
            severity: AlertSeverity::High,
            title: "Duplicate Medication".to_string(),
            message: format!(
                "{} and {} appear to be the same medication prescribed twice.",
                medication.name, other.name
            ),
            medication_id: Some(medication.id.clone()),
            medication_name: Some(medication.name.clone()),
            related_medication_id: Some(other.id.clone()),
            related_medication_name: Some(other.name.clone()),
            allergen: None,
            recommendation: Some(
                "Verify with the prescriber whether both orders are intended.".to_string(),
            ),
            requires_acknowledgment: true,
            acknowledged: false,
        });
    }

    alerts
}

// ── Dosage ────────────────────────────────────────────────────────────────────

/// At most one alert comparing the ordered amount to the reference range.
///
/// Pediatric patients with pediatric dosing on record are checked against
/// the pediatric per-dose ceiling only. Everyone else falls through to
/// the adult range: over max escalates to high past 1.5× the ceiling,
/// under min is a low informational alert. No formulary record, no alert.
pub fn dosage_alert(
    medication: &Medication,
    patient: &Patient,
    kb: &KnowledgeBase,
) -> Option<MedicationAlert> {
    if medication.is_discontinued() {
        return None;
    }
    let record = kb.find_drug_for(medication)?;
    let amount = medication.dosage.amount;
    let unit = &medication.dosage.unit;

    if patient.is_pediatric() {
        if let Some(ped) = record.pediatric_dosing {
            let max = ped.max_dose.unwrap_or(f64::INFINITY);
            if amount > max {
                return Some(build_dosage_alert(
                    medication,
                    AlertSeverity::High,
                    format!(
                        "Ordered dose {} {} exceeds the maximum pediatric dose of {} {}.",
                        amount, unit, max, unit
                    ),
                    "Recalculate against weight-based pediatric dosing.",
                ));
            }
            return None;
        }
    }

    let adult = record.adult_dosing?;
    if amount > adult.max_dose {
        let severity = if amount > adult.max_dose * 1.5 {
            AlertSeverity::High
        } else {
            AlertSeverity::Moderate
        };
        return Some(build_dosage_alert(
            medication,
            severity,
            format!(
                "Ordered dose {} {} exceeds the maximum recommended dose of {} {}.",
                amount, unit, adult.max_dose, unit
            ),
            "Confirm the intended dose with the prescriber.",
        ));
    }
    if amount < adult.min_dose {
        return Some(build_dosage_alert(
            medication,
            AlertSeverity::Low,
            format!(
                "Ordered dose {} {} is below the usual minimum of {} {}.",
                amount, unit, adult.min_dose, unit
            ),
            "Confirm the low dose is intentional.",
        ));
    }

    None
}

fn build_dosage_alert(
    medication: &Medication,
    severity: AlertSeverity,
    message: String,
    recommendation: &str,
) -> MedicationAlert {
    warn!(medication = %medication.name, severity = ?severity, "dosage alert");

    MedicationAlert {
        id: subject_alert_id(AlertKind::Dosage, &medication.id),
        kind: AlertKind::Dosage,
        severity,
        title: "Dosage Concern".to_string(),
        message,
        medication_id: Some(medication.id.clone()),
        medication_name: Some(medication.name.clone()),
        related_medication_id: None,
        related_medication_name: None,
        allergen: None,
        recommendation: Some(recommendation.to_string()),
        requires_acknowledgment: severity.is_interruptive(),
        acknowledged: false,
    }
}

// ── Age ───────────────────────────────────────────────────────────────────────

/// At most one age-appropriateness alert. Four checks, first match wins:
///
/// 1. Pediatric patient below the drug's pediatric minimum age — high.
/// 2. Pediatric patient above the pediatric dosing range — moderate,
///    informational.
/// 3. Patient 65+ on an elderly-risk drug — moderate, informational.
/// 4. Infant under 2 on a drug with no pediatric dosing — critical.
///
/// The checks are not cumulative; a later concern is suppressed when an
/// earlier one fires. This mirrors the charting system this engine
/// replaces, and the alert-id scheme depends on it staying single-alert.
pub fn age_alert(
    medication: &Medication,
    patient: &Patient,
    kb: &KnowledgeBase,
) -> Option<MedicationAlert> {
    if medication.is_discontinued() {
        return None;
    }
    let record = kb.find_drug_for(medication);

    if patient.is_pediatric() {
        if let Some(ped) = record.and_then(|r| r.pediatric_dosing) {
            if patient.age < ped.min_age {
                return Some(build_age_alert(
                    medication,
                    AlertSeverity::High,
                    format!(
                        "Patient is below the minimum age ({} years) for {}.",
                        ped.min_age, medication.name
                    ),
                    "Confirm age-appropriate therapy with the prescriber.",
                    true,
                ));
            }
            if patient.age > ped.max_age {
                return Some(build_age_alert(
                    medication,
                    AlertSeverity::Moderate,
                    format!(
                        "Patient is above the pediatric dosing range for {}.",
                        medication.name
                    ),
                    "Consider adult dosing guidance.",
                    false,
                ));
            }
        }
    }

    if patient.is_elderly() && kb.is_elderly_risk(medication) {
        return Some(build_age_alert(
            medication,
            AlertSeverity::Moderate,
            format!(
                "{} carries elevated risk in patients 65 and older.",
                medication.name
            ),
            "Consider a reduced dose or a safer alternative.",
            false,
        ));
    }

    if patient.age < 2.0 && record.map_or(true, |r| r.pediatric_dosing.is_none()) {
        return Some(build_age_alert(
            medication,
            AlertSeverity::Critical,
            format!(
                "{} has no established pediatric dosing for an infant under 2.",
                medication.name
            ),
            "Do not administer without specialist guidance.",
            true,
        ));
    }

    None
}

fn build_age_alert(
    medication: &Medication,
    severity: AlertSeverity,
    message: String,
    recommendation: &str,
    requires_acknowledgment: bool,
) -> MedicationAlert {
    warn!(medication = %medication.name, severity = ?severity, "age alert");

    MedicationAlert {
        id: subject_alert_id(AlertKind::Age, &medication.id),
        kind: AlertKind::Age,
        severity,
        title: "Age Warning".to_string(),
        message,
        medication_id: Some(medication.id.clone()),
        medication_name: Some(medication.name.clone()),
        related_medication_id: None,
        related_medication_name: None,
        allergen: None,
        recommendation: Some(recommendation.to_string()),
        requires_acknowledgment,
        acknowledged: false,
    }
}

// ── Contraindication ──────────────────────────────────────────────────────────

/// Severity escalation keyword sets for contraindication phrases.
const CRITICAL_KEYWORDS: [&str; 4] = ["pregnancy", "anaphylaxis", "severe", "life-threatening"];
const HIGH_KEYWORDS: [&str; 3] = ["children", "pediatric", "allergy"];

/// At most one alert aggregating every contraindication phrase that
/// applies to this patient.
///
/// Phrase applicability is keyword-heuristic: children/pediatric phrases
/// apply under 18, elderly phrases at 65+, pregnancy phrases to female
/// patients of childbearing age (annotated for verification, not
/// asserted), and phrases naming a documented allergen apply with a note
/// referencing the specific allergy. The sulfa/sulfonamide spelling gap
/// is bridged explicitly.
pub fn contraindication_alert(
    medication: &Medication,
    patient: &Patient,
    kb: &KnowledgeBase,
) -> Option<MedicationAlert> {
    if medication.is_discontinued() {
        return None;
    }
    let record = kb.find_drug_for(medication)?;
    if record.contraindications.is_empty() {
        return None;
    }

    let mut notes: Vec<String> = Vec::new();
    let mut matched: Vec<String> = Vec::new();

    for phrase in &record.contraindications {
        let lower = phrase.to_lowercase();
        let mut applies = false;
        let mut note = phrase.clone();

        if (lower.contains("children") || lower.contains("pediatric")) && patient.is_pediatric() {
            applies = true;
        }
        if lower.contains("elderly") && patient.is_elderly() {
            applies = true;
        }
        if lower.contains("pregnancy")
            && patient.gender == Gender::Female
            && (12.0..=50.0).contains(&patient.age)
        {
            applies = true;
            note = format!("{} (verify pregnancy status)", phrase);
        }

        for allergy in patient
            .allergies
            .iter()
            .filter(|a| a.kind == AllergyKind::Drug)
        {
            let allergen = allergy.allergen.to_lowercase();
            let sulfa_cross = (lower.contains("sulfonamide") && allergen.contains("sulfa"))
                || (lower.contains("sulfa") && allergen.contains("sulfonamide"));
            if lower.contains(&allergen) || sulfa_cross {
                applies = true;
                note = format!(
                    "{} — patient has a documented {} allergy ({})",
                    phrase, allergy.allergen, allergy.reaction
                );
                break;
            }
        }

        if applies {
            notes.push(note);
            matched.push(lower);
        }
    }

    if notes.is_empty() {
        return None;
    }

    let severity = if matched
        .iter()
        .any(|p| CRITICAL_KEYWORDS.iter().any(|k| p.contains(k)))
    {
        AlertSeverity::Critical
    } else if matched
        .iter()
        .any(|p| HIGH_KEYWORDS.iter().any(|k| p.contains(k)))
    {
        AlertSeverity::High
    } else {
        AlertSeverity::Moderate
    };

    warn!(
        medication = %medication.name,
        severity = ?severity,
        phrases = notes.len(),
        "contraindication alert"
    );

    Some(MedicationAlert {
        id: subject_alert_id(AlertKind::Contraindication, &medication.id),
        kind: AlertKind::Contraindication,
        severity,
        title: "Contraindication".to_string(),
        message: format!(
            "{} is contraindicated for this patient: {}",
            medication.name,
            notes.join("; ")
        ),
        medication_id: Some(medication.id.clone()),
        medication_name: Some(medication.name.clone()),
        related_medication_id: None,
        related_medication_name: None,
        allergen: None,
        recommendation: Some("Discuss an alternative with the prescriber.".to_string()),
        requires_acknowledgment: severity.is_interruptive(),
        acknowledged: false,
    })
}
