//! # vigil-dosage
//!
//! Weight- and age-based dosage decision support: the dose calculator,
//! patient-specific medication screening, and display formatting.
//!
//! Everything here is a deterministic pure function over the shared
//! contract types. Failure is modeled as degenerate-but-renderable
//! results carrying warning strings, so a charting UI always has
//! something to show next to the dose field.

pub mod calculator;
pub mod format;
pub mod validate;

pub use calculator::{calculate_total_daily_dose, calculate_weight_based_dose};
pub use format::format_dosage_calculation;
pub use validate::validate_medication_for_patient;
