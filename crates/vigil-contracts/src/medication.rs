//! Medication orders as the charting layer hands them to the engine.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sentinel id carried by a not-yet-saved draft order.
///
/// When the chart UI recomputes alerts while a clinician edits an existing
/// order in place, the draft is passed with this id so the engine can
/// exclude the saved original from duplicate/interaction checks. The
/// match is by name + route + patient id, since the draft has no real id
/// of its own yet.
pub const PREVIEW_MEDICATION_ID: &str = "preview-medication";

/// A medication order on a patient's chart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medication {
    /// Caller-owned stable identifier. Alert ids are derived from this,
    /// so it must not change across recomputations of the same order.
    pub id: String,
    pub patient_id: String,
    /// Orderable name, typically the brand name ("Advil").
    pub name: String,
    /// Generic name when distinct from `name` ("Ibuprofen").
    pub generic_name: Option<String>,
    pub dosage: Dosage,
    pub frequency: Frequency,
    /// Administration route ("oral", "IV").
    pub route: String,
    pub start_date: NaiveDate,
    pub status: MedicationStatus,
    pub prescribed_by: String,
}

impl Medication {
    /// Discontinued orders are invisible to the safety engine, both as
    /// alert subjects and as counterparties in pairwise checks.
    pub fn is_discontinued(&self) -> bool {
        self.status == MedicationStatus::Discontinued
    }

    /// True for the editing-in-place draft sentinel.
    pub fn is_preview(&self) -> bool {
        self.id == PREVIEW_MEDICATION_ID
    }
}

/// A single administered amount.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dosage {
    pub amount: f64,
    /// Unit string ("mg", "mcg", "mL"). The engine compares amounts
    /// without converting units; the knowledge base is expressed in the
    /// same unit as the orders it describes.
    pub unit: String,
}

/// How often the dose is given.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frequency {
    /// Administrations per period.
    pub times: u32,
    pub period: FrequencyPeriod,
    /// Optional free-text schedule ("08:00, 20:00").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyPeriod {
    Daily,
    Weekly,
    Monthly,
}

/// Lifecycle status of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MedicationStatus {
    Active,
    /// Temporarily held; still participates in alerting since the order
    /// is expected to resume.
    OnHold,
    Discontinued,
}
