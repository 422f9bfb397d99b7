//! Acknowledgment persistence behind a key-value port.
//!
//! The engine itself is stateless: which alerts a clinician has
//! acknowledged lives outside every evaluation, keyed per patient.
//! `KvStore` is the small JSON-by-key port the ledger writes through, so
//! the core tests against [`InMemoryKvStore`] and deploys against any
//! persistent store the host application provides.
//!
//! Writes are read-modify-write with a single-writer assumption; callers
//! are responsible for serializing concurrent acknowledgments for the
//! same patient.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tracing::debug;

use vigil_contracts::error::{VigilError, VigilResult};

// ── The port ──────────────────────────────────────────────────────────────────

/// A minimal JSON-value-by-key store.
///
/// Implementations must treat values as opaque strings; the ledger owns
/// the JSON shapes it reads and writes.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> VigilResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> VigilResult<()>;
    fn remove(&self, key: &str) -> VigilResult<()>;
}

// ── In-memory reference implementation ────────────────────────────────────────

/// A `Mutex`-protected in-memory `KvStore`.
///
/// The reference implementation used by tests and the demo. Safe to share
/// across threads; each operation acquires the lock independently.
#[derive(Default)]
pub struct InMemoryKvStore {
    entries: Mutex<HashMap<String, String>>,
}

impl InMemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for InMemoryKvStore {
    fn get(&self, key: &str) -> VigilResult<Option<String>> {
        let entries = self.entries.lock().map_err(|e| VigilError::StoreError {
            reason: format!("store lock poisoned: {}", e),
        })?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> VigilResult<()> {
        let mut entries = self.entries.lock().map_err(|e| VigilError::StoreError {
            reason: format!("store lock poisoned: {}", e),
        })?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> VigilResult<()> {
        let mut entries = self.entries.lock().map_err(|e| VigilError::StoreError {
            reason: format!("store lock poisoned: {}", e),
        })?;
        entries.remove(key);
        Ok(())
    }
}

// ── The ledger ────────────────────────────────────────────────────────────────

/// Per-patient acknowledgment state over a `KvStore`.
///
/// Two keys per patient:
/// - `medication-alerts-{patient_id}` — JSON array of acknowledged alert ids
/// - `medication-alerts-timestamps-{patient_id}` — JSON map of alert id to
///   acknowledgment time (RFC 3339)
///
/// Alert ids are deterministic, so an id acknowledged today still matches
/// the same logical alert after every future recomputation.
pub struct AckLedger {
    store: Box<dyn KvStore>,
}

impl AckLedger {
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self { store }
    }

    fn ids_key(patient_id: &str) -> String {
        format!("medication-alerts-{}", patient_id)
    }

    fn timestamps_key(patient_id: &str) -> String {
        format!("medication-alerts-timestamps-{}", patient_id)
    }

    /// The set of acknowledged alert ids for a patient, for joining into
    /// an evaluation. Missing key means nothing acknowledged yet.
    pub fn acknowledged_ids(&self, patient_id: &str) -> VigilResult<HashSet<String>> {
        let ids = self.read_ids(patient_id)?;
        Ok(ids.into_iter().collect())
    }

    /// When each alert id was acknowledged.
    pub fn timestamps(&self, patient_id: &str) -> VigilResult<HashMap<String, DateTime<Utc>>> {
        match self.store.get(&Self::timestamps_key(patient_id))? {
            Some(json) => serde_json::from_str(&json).map_err(|e| VigilError::StoreError {
                reason: format!("corrupt acknowledgment timestamps: {}", e),
            }),
            None => Ok(HashMap::new()),
        }
    }

    /// Record an acknowledgment: add the id to the persisted set and
    /// stamp the current time. Acknowledging twice is idempotent (the
    /// original timestamp is kept).
    pub fn acknowledge(&self, patient_id: &str, alert_id: &str) -> VigilResult<()> {
        let mut ids = self.read_ids(patient_id)?;
        if !ids.iter().any(|id| id == alert_id) {
            ids.push(alert_id.to_string());
            self.write_ids(patient_id, &ids)?;
        }

        let mut timestamps = self.timestamps(patient_id)?;
        timestamps
            .entry(alert_id.to_string())
            .or_insert_with(Utc::now);
        self.write_timestamps(patient_id, &timestamps)?;

        debug!(patient_id = %patient_id, alert_id = %alert_id, "alert acknowledged");
        Ok(())
    }

    /// Remove an acknowledgment and its timestamp.
    pub fn clear(&self, patient_id: &str, alert_id: &str) -> VigilResult<()> {
        let mut ids = self.read_ids(patient_id)?;
        ids.retain(|id| id != alert_id);
        self.write_ids(patient_id, &ids)?;

        let mut timestamps = self.timestamps(patient_id)?;
        timestamps.remove(alert_id);
        self.write_timestamps(patient_id, &timestamps)?;

        debug!(patient_id = %patient_id, alert_id = %alert_id, "acknowledgment cleared");
        Ok(())
    }

    /// Drop all acknowledgment state for a patient.
    pub fn clear_all(&self, patient_id: &str) -> VigilResult<()> {
        self.store.remove(&Self::ids_key(patient_id))?;
        self.store.remove(&Self::timestamps_key(patient_id))?;
        Ok(())
    }

    // Stored as a Vec to keep acknowledgment order stable in the
    // persisted JSON.
    fn read_ids(&self, patient_id: &str) -> VigilResult<Vec<String>> {
        match self.store.get(&Self::ids_key(patient_id))? {
            Some(json) => serde_json::from_str(&json).map_err(|e| VigilError::StoreError {
                reason: format!("corrupt acknowledgment list: {}", e),
            }),
            None => Ok(Vec::new()),
        }
    }

    fn write_ids(&self, patient_id: &str, ids: &[String]) -> VigilResult<()> {
        let json = serde_json::to_string(ids).map_err(|e| VigilError::StoreError {
            reason: format!("failed to encode acknowledgment list: {}", e),
        })?;
        self.store.set(&Self::ids_key(patient_id), &json)
    }

    fn write_timestamps(
        &self,
        patient_id: &str,
        timestamps: &HashMap<String, DateTime<Utc>>,
    ) -> VigilResult<()> {
        let json = serde_json::to_string(timestamps).map_err(|e| VigilError::StoreError {
            reason: format!("failed to encode acknowledgment timestamps: {}", e),
        })?;
        self.store.set(&Self::timestamps_key(patient_id), &json)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use vigil_contracts::error::VigilResult;

    use super::{AckLedger, InMemoryKvStore, KvStore};

    fn ledger() -> AckLedger {
        AckLedger::new(Box::new(InMemoryKvStore::new()))
    }

    /// Thin newtype allowing an `Arc<InMemoryKvStore>` to be used as
    /// `Box<dyn KvStore>`, so a test can keep an inspectable handle after
    /// the ledger takes ownership of the Box.
    struct SharedStore(Arc<InMemoryKvStore>);

    impl KvStore for SharedStore {
        fn get(&self, key: &str) -> VigilResult<Option<String>> {
            self.0.get(key)
        }
        fn set(&self, key: &str, value: &str) -> VigilResult<()> {
            self.0.set(key, value)
        }
        fn remove(&self, key: &str) -> VigilResult<()> {
            self.0.remove(key)
        }
    }

    #[test]
    fn empty_store_has_no_acknowledgments() {
        let ledger = ledger();
        assert!(ledger.acknowledged_ids("pt-1").unwrap().is_empty());
        assert!(ledger.timestamps("pt-1").unwrap().is_empty());
    }

    #[test]
    fn acknowledge_round_trips_through_the_store() {
        let ledger = ledger();
        ledger.acknowledge("pt-1", "interaction-m1-m2").unwrap();
        ledger.acknowledge("pt-1", "allergy-m3-penicillin").unwrap();

        let ids = ledger.acknowledged_ids("pt-1").unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("interaction-m1-m2"));

        let timestamps = ledger.timestamps("pt-1").unwrap();
        assert!(timestamps.contains_key("interaction-m1-m2"));
        assert!(timestamps.contains_key("allergy-m3-penicillin"));
    }

    #[test]
    fn acknowledging_twice_keeps_the_original_timestamp() {
        let ledger = ledger();
        ledger.acknowledge("pt-1", "duplicate-m1-m2").unwrap();
        let first = ledger.timestamps("pt-1").unwrap()["duplicate-m1-m2"];

        ledger.acknowledge("pt-1", "duplicate-m1-m2").unwrap();
        let second = ledger.timestamps("pt-1").unwrap()["duplicate-m1-m2"];

        assert_eq!(first, second);
        assert_eq!(ledger.acknowledged_ids("pt-1").unwrap().len(), 1);
    }

    #[test]
    fn clear_removes_id_and_timestamp() {
        let ledger = ledger();
        ledger.acknowledge("pt-1", "interaction-m1-m2").unwrap();
        ledger.clear("pt-1", "interaction-m1-m2").unwrap();

        assert!(ledger.acknowledged_ids("pt-1").unwrap().is_empty());
        assert!(ledger.timestamps("pt-1").unwrap().is_empty());
    }

    #[test]
    fn patients_are_isolated() {
        let ledger = ledger();
        ledger.acknowledge("pt-1", "age-m1").unwrap();

        assert!(ledger.acknowledged_ids("pt-2").unwrap().is_empty());
    }

    #[test]
    fn keys_follow_the_published_shape() {
        let store = Arc::new(InMemoryKvStore::new());
        let ledger = AckLedger::new(Box::new(SharedStore(Arc::clone(&store))));
        ledger.acknowledge("pt-9", "dosage-m4").unwrap();

        let raw = store.get("medication-alerts-pt-9").unwrap().unwrap();
        assert!(raw.contains("dosage-m4"));
        assert!(store
            .get("medication-alerts-timestamps-pt-9")
            .unwrap()
            .is_some());
    }

    #[test]
    fn corrupt_json_is_a_store_error() {
        let store = InMemoryKvStore::new();
        store.set("medication-alerts-pt-1", "not json").unwrap();
        let ledger = AckLedger::new(Box::new(store));

        assert!(ledger.acknowledged_ids("pt-1").is_err());
    }
}
