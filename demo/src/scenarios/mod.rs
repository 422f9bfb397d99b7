//! The three VIGIL demo scenarios.
//!
//! Each scenario wires real engine components over the fictional data in
//! `sample_data` and narrates every pipeline stage to stdout.

pub mod dosage;
pub mod preview;
pub mod safety_check;
