//! Patient-specific medication screening for the ordering form.
//!
//! Unlike the alert generators, these checks return plain warning strings
//! for inline display next to a dose field. The keyword conventions
//! (ALLERGY ALERT / CONTRAINDICATION prefixes) feed the warning-level
//! policy in [`crate::format`].

use tracing::warn;

use vigil_contracts::patient::{AllergyKind, Gender, Patient};
use vigil_knowledge::DrugRecord;

/// Screen a drug and proposed dose against a patient's record.
///
/// Checks, in order: documented drug allergies against every name the
/// drug is known by (canonical, generic, brands; substring containment in
/// both directions), contraindication keyword heuristics
/// (pregnancy / children / elderly), a caution note for pediatric orders
/// without pediatric dosing guidance, and the proposed dose against the
/// adult ceiling.
pub fn validate_medication_for_patient(
    patient: &Patient,
    record: &DrugRecord,
    dose: f64,
) -> Vec<String> {
    let mut warnings: Vec<String> = Vec::new();

    // ── Allergy cross-match ──────────────────────────────────────────────────
    for allergy in patient
        .allergies
        .iter()
        .filter(|a| a.kind == AllergyKind::Drug)
    {
        let allergen = allergy.allergen.to_lowercase();
        let known_names = std::iter::once(&record.name)
            .chain(std::iter::once(&record.generic_name))
            .chain(record.brand_names.iter());

        let hit = known_names.map(|n| n.to_lowercase()).any(|name| {
            name.contains(&allergen) || allergen.contains(&name)
        });

        if hit {
            warn!(
                drug = %record.name,
                allergen = %allergy.allergen,
                "allergy match during dose validation"
            );
            warnings.push(format!(
                "ALLERGY ALERT: patient has a documented {} allergy ({}).",
                allergy.allergen, allergy.reaction
            ));
        }
    }

    // ── Contraindication heuristics ──────────────────────────────────────────
    for phrase in &record.contraindications {
        let lower = phrase.to_lowercase();

        if lower.contains("pregnancy")
            && patient.gender == Gender::Female
            && (12.0..=50.0).contains(&patient.age)
        {
            warnings.push(format!(
                "CONTRAINDICATION: {} (verify pregnancy status).",
                phrase
            ));
        }
        if (lower.contains("children") || lower.contains("pediatric")) && patient.is_pediatric() {
            warnings.push(format!("CONTRAINDICATION: {}.", phrase));
        }
        if lower.contains("elderly") && patient.is_elderly() {
            warnings.push(format!("CONTRAINDICATION: {}.", phrase));
        }
    }

    // ── Pediatric order without pediatric guidance ───────────────────────────
    if patient.is_pediatric() && record.pediatric_dosing.is_none() {
        warnings.push(format!(
            "{} has no pediatric dosing guidelines; verify appropriateness for a pediatric patient.",
            record.name
        ));
    }

    // ── Proposed dose against the adult ceiling ──────────────────────────────
    if let Some(adult) = record.adult_dosing {
        if dose > adult.max_dose {
            warnings.push(format!(
                "Dose {} mg exceeds maximum recommended dose of {} mg.",
                dose, adult.max_dose
            ));
        }
    }

    warnings
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vigil_contracts::patient::{
        AllergyKind, AllergySeverity, Gender, Patient, PatientAllergy,
    };
    use vigil_knowledge::KnowledgeBase;

    use super::validate_medication_for_patient;

    fn patient(age: f64, gender: Gender) -> Patient {
        Patient {
            id: "pt-1".to_string(),
            name: "Test Patient".to_string(),
            age,
            weight: Some(70.0),
            gender,
            allergies: vec![],
        }
    }

    fn allergy(allergen: &str) -> PatientAllergy {
        PatientAllergy {
            kind: AllergyKind::Drug,
            allergen: allergen.to_string(),
            reaction: "hives".to_string(),
            severity: AllergySeverity::Moderate,
        }
    }

    /// An allergy recorded under a brand name still matches the record.
    #[test]
    fn brand_name_allergy_matches() {
        let kb = KnowledgeBase::builtin();
        let ibuprofen = kb.find_drug("Ibuprofen").unwrap();

        let mut p = patient(40.0, Gender::Male);
        p.allergies.push(allergy("Advil"));

        let warnings = validate_medication_for_patient(&p, ibuprofen, 400.0);
        assert!(warnings.iter().any(|w| w.starts_with("ALLERGY ALERT")));
    }

    #[test]
    fn food_allergies_are_ignored() {
        let kb = KnowledgeBase::builtin();
        let ibuprofen = kb.find_drug("Ibuprofen").unwrap();

        let mut p = patient(40.0, Gender::Male);
        p.allergies.push(PatientAllergy {
            kind: AllergyKind::Food,
            allergen: "Ibuprofen".to_string(), // perverse, but non-drug
            reaction: "nausea".to_string(),
            severity: AllergySeverity::Mild,
        });

        let warnings = validate_medication_for_patient(&p, ibuprofen, 400.0);
        assert!(warnings.is_empty());
    }

    #[test]
    fn pregnancy_contraindication_flags_childbearing_age_women_only() {
        let kb = KnowledgeBase::builtin();
        let warfarin = kb.find_drug("Warfarin").unwrap();

        let flagged = validate_medication_for_patient(&patient(28.0, Gender::Female), warfarin, 5.0);
        assert!(flagged
            .iter()
            .any(|w| w.contains("CONTRAINDICATION") && w.contains("verify pregnancy status")));

        let not_flagged =
            validate_medication_for_patient(&patient(28.0, Gender::Male), warfarin, 5.0);
        assert!(not_flagged.iter().all(|w| !w.contains("pregnancy")));

        let past_range =
            validate_medication_for_patient(&patient(64.0, Gender::Female), warfarin, 5.0);
        assert!(past_range.iter().all(|w| !w.contains("pregnancy")));
    }

    #[test]
    fn pediatric_order_without_pediatric_dosing_gets_caution() {
        let kb = KnowledgeBase::builtin();
        let warfarin = kb.find_drug("Warfarin").unwrap();

        let warnings = validate_medication_for_patient(&patient(9.0, Gender::Male), warfarin, 2.0);
        assert!(warnings
            .iter()
            .any(|w| w.contains("no pediatric dosing guidelines")));
    }

    #[test]
    fn dose_over_adult_ceiling_is_flagged() {
        let kb = KnowledgeBase::builtin();
        let ibuprofen = kb.find_drug("Ibuprofen").unwrap();

        let warnings =
            validate_medication_for_patient(&patient(40.0, Gender::Male), ibuprofen, 1000.0);
        assert!(warnings
            .iter()
            .any(|w| w.contains("exceeds maximum recommended dose of 800")));
    }
}
