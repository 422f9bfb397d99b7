//! Patient demographics and allergy history.
//!
//! A `Patient` is read-only input to the engine: the surrounding chart
//! application owns the record, VIGIL only evaluates it. Age is expressed
//! in fractional years so neonates can be represented (0.02 ≈ one week).

use serde::{Deserialize, Serialize};

use crate::alert::AlertSeverity;

/// A patient as seen by the safety engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    /// Caller-owned stable identifier.
    pub id: String,
    /// Display name. Never used in matching logic.
    pub name: String,
    /// Age in fractional years (0.02 for a one-week-old neonate).
    pub age: f64,
    /// Weight in kilograms, when a current weight is on record.
    pub weight: Option<f64>,
    pub gender: Gender,
    /// Recorded allergies. Only `AllergyKind::Drug` entries participate
    /// in alerting.
    pub allergies: Vec<PatientAllergy>,
}

impl Patient {
    /// Under 18 years.
    pub fn is_pediatric(&self) -> bool {
        self.age < 18.0
    }

    /// 65 years or older.
    pub fn is_elderly(&self) -> bool {
        self.age >= 65.0
    }

    /// Under one month of age.
    pub fn is_neonate(&self) -> bool {
        self.age < 1.0 / 12.0
    }
}

/// Administrative gender as recorded on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
    Other,
    Unknown,
}

/// One recorded allergy or intolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientAllergy {
    /// What kind of allergen this is. Only drug allergies are evaluated.
    #[serde(rename = "type")]
    pub kind: AllergyKind,
    /// Free-text allergen: a drug name ("Amoxicillin") or a drug-class
    /// name ("Penicillin", "Sulfa").
    pub allergen: String,
    /// Free-text reaction description ("hives", "anaphylaxis").
    pub reaction: String,
    pub severity: AllergySeverity,
}

/// Allergen category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergyKind {
    Drug,
    Food,
    Environmental,
}

/// Clinical severity of a recorded allergy.
///
/// Maps deterministically onto alert severity wherever an allergy produces
/// an alert: severe → critical, moderate → high, mild → moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergySeverity {
    Severe,
    Moderate,
    Mild,
}

impl AllergySeverity {
    /// The alert severity an allergy of this severity produces.
    pub fn to_alert_severity(self) -> AlertSeverity {
        match self {
            AllergySeverity::Severe => AlertSeverity::Critical,
            AllergySeverity::Moderate => AlertSeverity::High,
            AllergySeverity::Mild => AlertSeverity::Moderate,
        }
    }
}
