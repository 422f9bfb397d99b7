//! Clinical alert records and their deterministic identity scheme.
//!
//! Alert ids are part of the public contract: the chart layer persists
//! acknowledged ids across recomputations, so the same logical alert must
//! produce the same id on every run. Single-subject alerts derive their id
//! from the category and the medication id; pairwise alerts sort the two
//! participant ids first so both orderings of a pair collapse to one id.

use serde::{Deserialize, Serialize};

/// Ranked clinical urgency. Declaration order is the sort order:
/// critical(0) < high(1) < moderate(2) < low(3) < info(4), so sorting a
/// mixed alert set ascending puts critical alerts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Critical,
    High,
    Moderate,
    Low,
    Info,
}

impl AlertSeverity {
    /// Numeric rank used for ordering; lower is more urgent.
    pub fn rank(self) -> u8 {
        match self {
            AlertSeverity::Critical => 0,
            AlertSeverity::High => 1,
            AlertSeverity::Moderate => 2,
            AlertSeverity::Low => 3,
            AlertSeverity::Info => 4,
        }
    }

    /// True for the severities that interrupt the ordering workflow.
    pub fn is_interruptive(self) -> bool {
        matches!(self, AlertSeverity::Critical | AlertSeverity::High)
    }
}

/// The rule category that produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Allergy,
    Interaction,
    Duplicate,
    Dosage,
    Age,
    Contraindication,
}

impl AlertKind {
    /// Stable lowercase token used in alert ids.
    pub fn as_str(self) -> &'static str {
        match self {
            AlertKind::Allergy => "allergy",
            AlertKind::Interaction => "interaction",
            AlertKind::Duplicate => "duplicate",
            AlertKind::Dosage => "dosage",
            AlertKind::Age => "age",
            AlertKind::Contraindication => "contraindication",
        }
    }
}

/// One alert produced by the safety engine.
///
/// Alerts are derived fresh on every evaluation; only the `acknowledged`
/// flag reflects external state, joined in from the caller's persisted
/// acknowledgment set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationAlert {
    /// Deterministic id, stable across recomputations (see module docs).
    pub id: String,
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub title: String,
    pub message: String,
    /// The subject medication, when the alert concerns a specific order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medication_name: Option<String>,
    /// The counterparty in pairwise (interaction/duplicate) alerts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_medication_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_medication_name: Option<String>,
    /// The matched allergen, for allergy alerts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergen: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendation: Option<String>,
    /// Whether the clinician must explicitly acknowledge this alert
    /// before proceeding.
    pub requires_acknowledgment: bool,
    /// Joined from the externally persisted acknowledged-id set.
    pub acknowledged: bool,
}

// ── Deterministic id construction ─────────────────────────────────────────────

/// Id for an alert about a single medication order.
pub fn subject_alert_id(kind: AlertKind, medication_id: &str) -> String {
    format!("{}-{}", kind.as_str(), medication_id)
}

/// Id for a pairwise alert. The participant ids are sorted so that
/// (A, B) and (B, A) produce the same id — one unordered pair, one alert.
pub fn pair_alert_id(kind: AlertKind, id_a: &str, id_b: &str) -> String {
    let (lo, hi) = if id_a <= id_b { (id_a, id_b) } else { (id_b, id_a) };
    format!("{}-{}-{}", kind.as_str(), lo, hi)
}

/// Id for an allergy alert: one per (order, allergen) combination.
pub fn allergy_alert_id(medication_id: &str, allergen: &str) -> String {
    format!("allergy-{}-{}", medication_id, allergen.to_lowercase())
}
