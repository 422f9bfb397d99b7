//! # vigil-contracts
//!
//! Shared types and contracts for the VIGIL medication safety engine.
//!
//! All crates in the workspace import from here. No business logic lives
//! in this crate — only data definitions, the deterministic alert-id
//! scheme, and error types.

pub mod alert;
pub mod dosage;
pub mod error;
pub mod medication;
pub mod patient;
