//! Simulated clinical data for the VIGIL demo.
//!
//! All data in this module is hardcoded and fictional. No real patient
//! identifiers are present. This module stands in for the charting
//! application that would normally supply patients and medication orders.

use chrono::NaiveDate;

use vigil_contracts::{
    medication::{Dosage, Frequency, FrequencyPeriod, Medication, MedicationStatus},
    patient::{AllergyKind, AllergySeverity, Gender, Patient, PatientAllergy},
};

/// An elderly inpatient with drug allergies and a busy medication list.
pub fn elderly_inpatient() -> Patient {
    Patient {
        id: "pt-1001".to_string(),
        name: "Rosa Delgado".to_string(),
        age: 74.0,
        weight: Some(58.0),
        gender: Gender::Female,
        allergies: vec![
            PatientAllergy {
                kind: AllergyKind::Drug,
                allergen: "Penicillin".to_string(),
                reaction: "anaphylaxis".to_string(),
                severity: AllergySeverity::Severe,
            },
            PatientAllergy {
                kind: AllergyKind::Drug,
                allergen: "Sulfa".to_string(),
                reaction: "rash".to_string(),
                severity: AllergySeverity::Moderate,
            },
        ],
    }
}

/// Rosa's active orders: an anticoagulant/antiplatelet pair, an
/// antibiotic colliding with her penicillin allergy, and an elderly-risk
/// analgesic.
pub fn elderly_inpatient_orders() -> Vec<Medication> {
    vec![
        order("m-101", "pt-1001", "Warfarin", Some("warfarin"), 5.0, 1),
        order("m-102", "pt-1001", "Aspirin", Some("aspirin"), 325.0, 1),
        order("m-103", "pt-1001", "Amoxicillin", Some("amoxicillin"), 500.0, 3),
        order("m-104", "pt-1001", "Tramadol", Some("tramadol"), 100.0, 2),
    ]
}

/// A school-age child heavy enough to hit weight-based dose ceilings.
pub fn pediatric_patient() -> Patient {
    Patient {
        id: "pt-2002".to_string(),
        name: "Noah Kim".to_string(),
        age: 11.0,
        weight: Some(50.0),
        gender: Gender::Male,
        allergies: vec![],
    }
}

/// A healthy adult used for the editing-preview walkthrough.
pub fn adult_patient() -> Patient {
    Patient {
        id: "pt-3003".to_string(),
        name: "James Okafor".to_string(),
        age: 40.0,
        weight: Some(82.0),
        gender: Gender::Male,
        allergies: vec![],
    }
}

/// Build one active oral order.
pub fn order(
    id: &str,
    patient_id: &str,
    name: &str,
    generic: Option<&str>,
    amount: f64,
    times_daily: u32,
) -> Medication {
    Medication {
        id: id.to_string(),
        patient_id: patient_id.to_string(),
        name: name.to_string(),
        generic_name: generic.map(str::to_string),
        dosage: Dosage {
            amount,
            unit: "mg".to_string(),
        },
        frequency: Frequency {
            times: times_daily,
            period: FrequencyPeriod::Daily,
            schedule: None,
        },
        route: "oral".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 7, 28).expect("valid date"),
        status: MedicationStatus::Active,
        prescribed_by: "Dr. A. Rivera".to_string(),
    }
}
