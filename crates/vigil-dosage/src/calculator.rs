//! Weight-based dose computation.
//!
//! The calculator always returns a renderable [`DosageCalculation`]:
//! missing weight and missing reference data produce degenerate results
//! carrying a warning string, never an error. Validation accumulates
//! every applicable warning before deciding `is_within_normal_range`, so
//! the caller sees the full picture in one pass.
//!
//! Dosing paths, in order:
//!
//! 1. Pediatric patient with an applicable pediatric dosing range:
//!    per-kg dose capped at the pediatric ceiling (the uncapped amount is
//!    preserved in `calculated_amount` and in the formula).
//! 2. Adult dosing fallback (warned when taken for a pediatric patient):
//!    weight-based drugs scale the common dose as a per-kg rate for a
//!    70 kg reference patient, clamped to the adult range; flat drugs
//!    recommend the common dose.
//! 3. No dosing data at all: degenerate result.

use tracing::debug;

use vigil_contracts::{dosage::DosageCalculation, medication::FrequencyPeriod, patient::Patient};
use vigil_knowledge::DrugRecord;

/// Reference weight for interpreting an adult common dose as a per-kg rate.
const ADULT_REFERENCE_WEIGHT_KG: f64 = 70.0;

/// Truncate to 3 decimal places.
fn floor_to_milli(x: f64) -> f64 {
    (x * 1000.0).floor() / 1000.0
}

/// Compute the recommended dose of `record` for `patient` and validate
/// `requested_dose` (when given) against it.
pub fn calculate_weight_based_dose(
    patient: &Patient,
    record: &DrugRecord,
    requested_dose: Option<f64>,
) -> DosageCalculation {
    // ── Degenerate path: no usable weight ────────────────────────────────────
    let Some(weight) = patient.weight.filter(|w| *w > 0.0) else {
        let fallback = requested_dose.unwrap_or(0.0);
        return DosageCalculation {
            patient_weight: 0.0,
            dose_per_kg: 0.0,
            calculated_amount: fallback,
            recommended_dose: fallback,
            formula: "Weight unavailable".to_string(),
            warnings: vec![
                "Patient weight is not on record; weight-based dosing cannot be calculated."
                    .to_string(),
            ],
            is_within_normal_range: false,
        };
    };

    let mut warnings: Vec<String> = Vec::new();
    let mut dose_per_kg = 0.0;
    let recommended_dose;
    let formula;

    // Pediatric dosing applies only when the patient's age falls inside
    // the record's pediatric range.
    let pediatric = record.pediatric_dosing.filter(|p| {
        patient.is_pediatric() && patient.age >= p.min_age && patient.age <= p.max_age
    });

    if let Some(ped) = pediatric {
        // ── Pediatric weight-based path ──────────────────────────────────────
        dose_per_kg = ped.dose_per_kg;
        let raw = ped.dose_per_kg * weight;
        let cap = ped.max_dose.unwrap_or(f64::INFINITY);

        recommended_dose = floor_to_milli(raw.min(cap));
        formula = format!("{} mg/kg × {} kg = {} mg", ped.dose_per_kg, weight, raw);

        if raw > cap {
            warnings.push(format!(
                "Calculated dose {} mg exceeds maximum pediatric dose of {} mg; recommendation capped.",
                raw, cap
            ));
        }
    } else if let Some(adult) = record.adult_dosing {
        // ── Adult fallback ───────────────────────────────────────────────────
        if patient.is_pediatric() {
            warnings.push(
                "No applicable pediatric dosing; adult dosing applied to a pediatric patient. Verify with pharmacy."
                    .to_string(),
            );
        }

        if record.weight_based {
            let per_kg = adult.common_dose / ADULT_REFERENCE_WEIGHT_KG;
            dose_per_kg = per_kg;
            let scaled = per_kg * weight;
            recommended_dose = floor_to_milli(scaled.clamp(adult.min_dose, adult.max_dose));
            formula = format!(
                "{:.3} mg/kg ({} mg ÷ {} kg reference) × {} kg = {:.3} mg",
                per_kg, adult.common_dose, ADULT_REFERENCE_WEIGHT_KG, weight, scaled
            );
        } else {
            recommended_dose = adult.common_dose;
            formula = format!("Standard dose: {} mg", adult.common_dose);
        }
    } else {
        // ── Degenerate path: nothing to dose from ────────────────────────────
        let fallback = requested_dose.unwrap_or(0.0);
        return DosageCalculation {
            patient_weight: weight,
            dose_per_kg: 0.0,
            calculated_amount: fallback,
            recommended_dose: fallback,
            formula: format!("No dosing reference for {}", record.name),
            warnings: vec![format!("No dosing guidelines available for {}.", record.name)],
            is_within_normal_range: false,
        };
    }

    // ── Age-band warnings ────────────────────────────────────────────────────
    if patient.is_neonate() {
        warnings.push(
            "Neonatal patient: dosing requires special consideration; consult pharmacy."
                .to_string(),
        );
    }
    if patient.is_elderly() {
        warnings.push("Elderly patient: consider dose reduction.".to_string());
    }

    let calculated_amount = if dose_per_kg > 0.0 {
        dose_per_kg * weight
    } else {
        requested_dose.unwrap_or(recommended_dose)
    };

    // ── Validate the actual dose, not just the recommendation ────────────────
    let actual = requested_dose.unwrap_or(recommended_dose);

    if let Some(ped) = pediatric {
        if let Some(max) = ped.max_dose {
            if actual > max {
                warnings.push(format!(
                    "Dose {} mg exceeds maximum pediatric dose of {} mg.",
                    actual, max
                ));
            }
        }
    } else if let Some(adult) = record.adult_dosing {
        if actual > adult.max_dose {
            warnings.push(format!(
                "Dose {} mg exceeds maximum recommended dose of {} mg.",
                actual, adult.max_dose
            ));
        } else if actual < adult.min_dose {
            warnings.push(format!(
                "Dose {} mg is below minimum recommended dose of {} mg.",
                actual, adult.min_dose
            ));
        }
    }

    if recommended_dose > 0.0 {
        let ratio = actual / recommended_dose;
        if ratio < 0.5 {
            warnings.push("Requested dose is significantly lower than the recommended dose.".to_string());
        } else if ratio < 0.75 {
            warnings.push("Requested dose is lower than the recommended dose.".to_string());
        }
        if ratio > 2.0 {
            warnings.push("Requested dose is significantly higher than the recommended dose.".to_string());
        } else if ratio > 1.5 {
            warnings.push("Requested dose is higher than the recommended dose.".to_string());
        }
    }

    // Hard-fail warnings decide the range flag.
    let is_within_normal_range = !warnings
        .iter()
        .any(|w| w.contains("exceeds") || w.contains("below") || w.contains("significantly"));

    debug!(
        drug = %record.name,
        weight,
        recommended_dose,
        within_range = is_within_normal_range,
        "dose calculated"
    );

    DosageCalculation {
        patient_weight: weight,
        dose_per_kg,
        calculated_amount,
        recommended_dose,
        formula,
        warnings,
        is_within_normal_range,
    }
}

/// Convert a single-dose amount and frequency into a total daily dose.
pub fn calculate_total_daily_dose(single_dose: f64, times: u32, period: FrequencyPeriod) -> f64 {
    let per_period = single_dose * f64::from(times);
    let daily = match period {
        FrequencyPeriod::Daily => per_period,
        FrequencyPeriod::Weekly => per_period / 7.0,
        FrequencyPeriod::Monthly => per_period / 30.0,
    };
    floor_to_milli(daily)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use vigil_contracts::{
        medication::FrequencyPeriod,
        patient::{Gender, Patient},
    };
    use vigil_knowledge::KnowledgeBase;

    use super::{calculate_total_daily_dose, calculate_weight_based_dose};

    fn patient(age: f64, weight: Option<f64>) -> Patient {
        Patient {
            id: "pt-1".to_string(),
            name: "Test Patient".to_string(),
            age,
            weight,
            gender: Gender::Male,
            allergies: vec![],
        }
    }

    fn kb() -> KnowledgeBase {
        KnowledgeBase::builtin()
    }

    // ── 1. pediatric capping ──────────────────────────────────────────────────

    /// 25 mg/kg × 50 kg = 1250 mg, capped at the 1000 mg pediatric
    /// ceiling. The uncapped amount survives in `calculated_amount`.
    #[test]
    fn pediatric_dose_is_capped_at_ceiling() {
        let kb = kb();
        let amoxicillin = kb.find_drug("Amoxicillin").unwrap();
        let calc = calculate_weight_based_dose(&patient(11.0, Some(50.0)), amoxicillin, None);

        assert_eq!(calc.calculated_amount, 1250.0);
        assert_eq!(calc.recommended_dose, 1000.0);
        assert!(calc
            .warnings
            .iter()
            .any(|w| w.contains("exceeds maximum pediatric dose of 1000")));
        assert!(!calc.is_within_normal_range);
    }

    /// In-range pediatric calculation: no warnings, flag true.
    #[test]
    fn pediatric_dose_within_ceiling_is_clean() {
        let kb = kb();
        let amoxicillin = kb.find_drug("Amoxicillin").unwrap();
        let calc = calculate_weight_based_dose(&patient(6.0, Some(20.0)), amoxicillin, None);

        assert_eq!(calc.recommended_dose, 500.0);
        assert_eq!(calc.dose_per_kg, 25.0);
        assert!(calc.warnings.is_empty(), "unexpected: {:?}", calc.warnings);
        assert!(calc.is_within_normal_range);
        assert!(calc.formula.contains("25 mg/kg × 20 kg"));
    }

    // ── 2. degenerate paths ───────────────────────────────────────────────────

    #[test]
    fn missing_weight_yields_degenerate_result() {
        let kb = kb();
        let amoxicillin = kb.find_drug("Amoxicillin").unwrap();
        let calc = calculate_weight_based_dose(&patient(30.0, None), amoxicillin, Some(500.0));

        assert!(!calc.is_within_normal_range);
        assert_eq!(calc.recommended_dose, 500.0);
        assert_eq!(calc.patient_weight, 0.0);
        assert_eq!(calc.warnings.len(), 1);
        assert!(calc.warnings[0].contains("weight is not on record"));
    }

    #[test]
    fn zero_weight_is_treated_as_missing() {
        let kb = kb();
        let amoxicillin = kb.find_drug("Amoxicillin").unwrap();
        let calc = calculate_weight_based_dose(&patient(30.0, Some(0.0)), amoxicillin, None);

        assert!(!calc.is_within_normal_range);
        assert_eq!(calc.recommended_dose, 0.0);
    }

    #[test]
    fn no_dosing_data_yields_degenerate_result() {
        let record = vigil_knowledge::DrugRecord {
            name: "Investigational-X".to_string(),
            generic_name: "investigational-x".to_string(),
            brand_names: vec![],
            weight_based: false,
            pediatric_dosing: None,
            adult_dosing: None,
            contraindications: vec![],
        };
        let calc = calculate_weight_based_dose(&patient(30.0, Some(70.0)), &record, Some(100.0));

        assert!(!calc.is_within_normal_range);
        assert_eq!(calc.recommended_dose, 100.0);
        assert!(calc.warnings[0].contains("No dosing guidelines available"));
    }

    // ── 3. adult fallback ─────────────────────────────────────────────────────

    /// Weight-based adult dosing scales the common dose per kg against a
    /// 70 kg reference and clamps to the adult range.
    #[test]
    fn adult_weight_based_dose_scales_and_clamps() {
        let kb = kb();
        let morphine = kb.find_drug("Morphine").unwrap();

        // 10 mg ÷ 70 kg × 100 kg ≈ 14.285 mg, inside [2, 30].
        let calc = calculate_weight_based_dose(&patient(40.0, Some(100.0)), morphine, None);
        assert_eq!(calc.recommended_dose, 14.285);

        // A very heavy patient clamps to the 30 mg ceiling.
        let calc = calculate_weight_based_dose(&patient(40.0, Some(250.0)), morphine, None);
        assert_eq!(calc.recommended_dose, 30.0);
    }

    #[test]
    fn flat_adult_dose_uses_common_dose() {
        let kb = kb();
        let warfarin = kb.find_drug("Warfarin").unwrap();
        let calc = calculate_weight_based_dose(&patient(40.0, Some(80.0)), warfarin, None);

        assert_eq!(calc.recommended_dose, 5.0);
        assert_eq!(calc.dose_per_kg, 0.0);
        assert!(calc.formula.contains("Standard dose"));
    }

    /// A pediatric patient outside the pediatric range falls back to
    /// adult dosing with a warning.
    #[test]
    fn pediatric_fallback_to_adult_dosing_warns() {
        let kb = kb();
        let warfarin = kb.find_drug("Warfarin").unwrap(); // no pediatric dosing
        let calc = calculate_weight_based_dose(&patient(10.0, Some(35.0)), warfarin, None);

        assert!(calc
            .warnings
            .iter()
            .any(|w| w.contains("adult dosing applied to a pediatric patient")));
    }

    // ── 4. requested-dose validation ──────────────────────────────────────────

    /// Over the adult maximum and over 2× the recommendation: two hard
    /// failures.
    #[test]
    fn requested_dose_far_above_range_fails() {
        let kb = kb();
        let warfarin = kb.find_drug("Warfarin").unwrap(); // [1, 10], common 5
        let calc = calculate_weight_based_dose(&patient(40.0, Some(80.0)), warfarin, Some(12.0));

        assert!(!calc.is_within_normal_range);
        assert!(calc
            .warnings
            .iter()
            .any(|w| w.contains("exceeds maximum recommended dose of 10")));
        assert!(calc
            .warnings
            .iter()
            .any(|w| w.contains("significantly higher")));
    }

    /// Under half the recommendation is a hard failure even inside the
    /// published range.
    #[test]
    fn requested_dose_significantly_low_fails() {
        let kb = kb();
        let warfarin = kb.find_drug("Warfarin").unwrap();
        let calc = calculate_weight_based_dose(&patient(40.0, Some(80.0)), warfarin, Some(2.0));

        assert!(!calc.is_within_normal_range);
        assert!(calc
            .warnings
            .iter()
            .any(|w| w.contains("significantly lower")));
    }

    /// Mildly low (0.5×–0.75×) and mildly high (1.5×–2.0×) doses warn
    /// informationally but still pass.
    #[test]
    fn mildly_off_doses_warn_but_pass() {
        let kb = kb();
        let warfarin = kb.find_drug("Warfarin").unwrap();

        let low = calculate_weight_based_dose(&patient(40.0, Some(80.0)), warfarin, Some(3.0));
        assert!(low.is_within_normal_range);
        assert!(low.warnings.iter().any(|w| w.contains("lower than the recommended")));

        let high = calculate_weight_based_dose(&patient(40.0, Some(80.0)), warfarin, Some(8.5));
        assert!(high.is_within_normal_range);
        assert!(high.warnings.iter().any(|w| w.contains("higher than the recommended")));
    }

    // ── 5. age-band warnings ──────────────────────────────────────────────────

    #[test]
    fn neonate_and_elderly_warnings_are_appended() {
        let kb = kb();
        let acetaminophen = kb.find_drug("Acetaminophen").unwrap();

        let neonate = calculate_weight_based_dose(&patient(0.02, Some(3.5)), acetaminophen, None);
        assert!(neonate
            .warnings
            .iter()
            .any(|w| w.contains("special consideration")));

        let warfarin = kb.find_drug("Warfarin").unwrap();
        let elderly = calculate_weight_based_dose(&patient(78.0, Some(70.0)), warfarin, None);
        assert!(elderly
            .warnings
            .iter()
            .any(|w| w.contains("consider dose reduction")));
    }

    // ── 6. daily-dose conversion ──────────────────────────────────────────────

    #[test]
    fn total_daily_dose_conversions() {
        assert_eq!(
            calculate_total_daily_dose(10.0, 2, FrequencyPeriod::Daily),
            20.0
        );
        assert_eq!(
            calculate_total_daily_dose(70.0, 1, FrequencyPeriod::Weekly),
            10.0
        );
        assert_eq!(
            calculate_total_daily_dose(300.0, 1, FrequencyPeriod::Monthly),
            10.0
        );
    }
}
