//! # vigil-alerts
//!
//! The medication safety-alert subsystem: six per-category rule
//! evaluators, the aggregation engine that runs them over a patient's
//! medication set, and the acknowledgment ledger that persists which
//! alerts a clinician has already seen.
//!
//! ## Evaluation model
//!
//! Every call to [`AlertEngine::generate`] is a pure function of its
//! arguments: the patient, the medication set, an optional draft order,
//! and the set of already-acknowledged alert ids. Alerts come back sorted
//! critical-first, with deterministic ids so acknowledgments survive
//! recomputation.
//!
//! ## Persistence boundary
//!
//! The engine never touches storage. [`AckLedger`] owns the two
//! per-patient keys (`medication-alerts-{id}`,
//! `medication-alerts-timestamps-{id}`) and writes them through the
//! [`KvStore`] port, so any host application storage — browser local
//! storage, a file, a database — can back it.

pub mod ack;
pub mod engine;
pub mod generators;

pub use ack::{AckLedger, InMemoryKvStore, KvStore};
pub use engine::{critical_banner_count, AlertEngine, AlertFocus};
