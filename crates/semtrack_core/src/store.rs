//! Discipline store: ordered record list plus all mutation operations.
//!
//! # Responsibility
//! - Own the in-memory record sequence and its id allocator.
//! - Apply every mutation, then hand the serialized result to the
//!   persistence gateway.
//!
//! # Invariants
//! - Ids stay unique across the sequence at all times.
//! - Mutations are total: an unknown id is a no-op, never an error.
//! - Gateway failures are absorbed; the in-memory sequence stays
//!   authoritative for the session.

use crate::codec::{self, ExportError, ImportError};
use crate::model::discipline::{default_semester, Discipline, DisciplineId};
use crate::model::normalize::{normalize_list, normalize_record, IdAllocator};
use crate::storage::StorageGateway;
use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use serde_json::Value;

/// Aggregate counters for the summary panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Summary {
    /// Number of tracked disciplines.
    pub disciplines: usize,
    /// Disciplines with at least one recorded submission.
    pub with_submission: usize,
    /// Sum of required labs across all disciplines.
    pub labs_total: i64,
    /// Sum of completed labs across all disciplines.
    pub labs_done: i64,
}

/// Ordered collection of discipline records with persistence on mutation.
///
/// Newest records sit at the front. The store is the only writer of its
/// gateway for the session.
pub struct DisciplineStore<G: StorageGateway> {
    items: Vec<Discipline>,
    ids: IdAllocator,
    gateway: G,
}

impl<G: StorageGateway> DisciplineStore<G> {
    /// Opens the store: loads persisted state through the gateway, or falls
    /// back to the default semester dataset when nothing valid is stored.
    ///
    /// Load failures and corrupt documents are absorbed; they never
    /// propagate past this boundary. On a fresh start the defaults are
    /// persisted immediately so the next session finds them.
    pub fn open(gateway: G) -> Self {
        let mut ids = IdAllocator::new();
        let loaded = load_items(&gateway, &mut ids);
        let fresh_start = loaded.is_none();
        let items = loaded.unwrap_or_else(default_semester);
        let ids = IdAllocator::seeded(&items);

        let store = Self {
            items,
            ids,
            gateway,
        };
        if fresh_start {
            store.persist();
        }
        info!(
            "event=store_open module=store status=ok records={} fresh_start={fresh_start}",
            store.items.len()
        );
        store
    }

    /// Read view of the record sequence, newest first.
    pub fn items(&self) -> &[Discipline] {
        &self.items
    }

    /// Looks up one record by id.
    pub fn get(&self, id: DisciplineId) -> Option<&Discipline> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Aggregate counters over the whole sequence.
    pub fn summary(&self) -> Summary {
        let mut summary = Summary {
            disciplines: self.items.len(),
            ..Summary::default()
        };
        for item in &self.items {
            if item.last_sent.is_some() {
                summary.with_submission += 1;
            }
            // Imported records may carry counts near the integer ceiling;
            // the aggregate saturates rather than overflows.
            summary.labs_total = summary.labs_total.saturating_add(item.labs_total);
            summary.labs_done = summary.labs_done.saturating_add(item.labs_done);
        }
        summary
    }

    /// Normalizes `payload` into a new record with a fresh id and prepends
    /// it. Any id carried by the payload is ignored. Returns the new id.
    pub fn create(&mut self, payload: &Value) -> DisciplineId {
        let mut record = normalize_record(payload, &mut self.ids);
        record.id = self.ids.fresh();
        let id = record.id;
        self.items.insert(0, record);
        self.persist();
        id
    }

    /// Merges `payload` into the record with `id`, keeping its position and
    /// identity; normalization re-derives the clamped lab counter. When the
    /// id is unknown this behaves as [`create`](Self::create).
    pub fn update(&mut self, id: DisciplineId, payload: &Value) -> DisciplineId {
        let Some(position) = self.items.iter().position(|item| item.id == id) else {
            return self.create(payload);
        };

        let mut merged = serde_json::to_value(&self.items[position]).unwrap_or(Value::Null);
        if let (Some(target), Some(overlay)) = (merged.as_object_mut(), payload.as_object()) {
            for (key, value) in overlay {
                target.insert(key.clone(), value.clone());
            }
        }

        let mut record = normalize_record(&merged, &mut self.ids);
        // Identity is immutable; a payload cannot reassign it.
        record.id = id;
        self.items[position] = record;
        self.persist();
        id
    }

    /// Removes the record with `id` unconditionally. No-op when absent;
    /// any confirmation step belongs to the caller.
    pub fn delete(&mut self, id: DisciplineId) {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        if self.items.len() != before {
            self.persist();
        }
    }

    /// Advances the lab counter of `id` by one, clamped at its total.
    pub fn increment_labs(&mut self, id: DisciplineId) {
        self.adjust(id, Discipline::increment_labs);
    }

    /// Rewinds the lab counter of `id` by one, clamped at 0.
    pub fn decrement_labs(&mut self, id: DisciplineId) {
        self.adjust(id, Discipline::decrement_labs);
    }

    /// Stamps the record with `id` as submitted now.
    pub fn mark_submitted(&mut self, id: DisciplineId) {
        let now = now_rfc3339();
        self.adjust(id, |item| item.mark_submitted(now));
    }

    /// Stamps every record with outstanding labs as submitted now and
    /// returns how many were affected. Zero means there was nothing to do.
    pub fn mark_all_pending_submitted(&mut self) -> usize {
        let now = now_rfc3339();
        let mut affected = 0;
        for item in &mut self.items {
            if item.has_outstanding_labs() {
                item.mark_submitted(now.clone());
                affected += 1;
            }
        }
        if affected > 0 {
            self.persist();
        }
        affected
    }

    /// Replaces the whole sequence with the default semester dataset and
    /// clears persisted storage.
    pub fn reset(&mut self) {
        self.items = default_semester();
        self.ids = IdAllocator::seeded(&self.items);
        if let Err(err) = self.gateway.clear() {
            warn!("event=store_reset module=store status=error stage=clear error={err}");
        }
        info!(
            "event=store_reset module=store status=ok records={}",
            self.items.len()
        );
    }

    /// Serializes the full sequence as the export document.
    pub fn export(&self) -> Result<String, ExportError> {
        codec::export_document(&self.items)
    }

    /// Parses an import document and replaces the whole sequence with its
    /// normalized records. On any error the store is left unchanged.
    /// Returns the number of imported records.
    pub fn import(&mut self, text: &str) -> Result<usize, ImportError> {
        let mut ids = IdAllocator::new();
        let records = codec::import_document(text, &mut ids)?;
        self.items = records;
        self.ids = IdAllocator::seeded(&self.items);
        self.persist();
        info!(
            "event=store_import module=store status=ok records={}",
            self.items.len()
        );
        Ok(self.items.len())
    }

    fn adjust(&mut self, id: DisciplineId, mutate: impl FnOnce(&mut Discipline)) {
        if let Some(item) = self.items.iter_mut().find(|item| item.id == id) {
            mutate(item);
            self.persist();
        }
    }

    /// Hands the serialized sequence to the gateway. Failures are logged
    /// and absorbed per the persistence contract.
    fn persist(&self) {
        let document = match serde_json::to_string(&self.items) {
            Ok(document) => document,
            Err(err) => {
                warn!("event=store_persist module=store status=error stage=serialize error={err}");
                return;
            }
        };
        if let Err(err) = self.gateway.save(&document) {
            warn!("event=store_persist module=store status=error stage=save error={err}");
        }
    }
}

fn load_items(gateway: &impl StorageGateway, ids: &mut IdAllocator) -> Option<Vec<Discipline>> {
    let document = match gateway.load() {
        Ok(Some(document)) => document,
        Ok(None) => return None,
        Err(err) => {
            warn!("event=store_load module=store status=error stage=load error={err}");
            return None;
        }
    };

    let value: Value = match serde_json::from_str(&document) {
        Ok(value) => value,
        Err(err) => {
            warn!("event=store_load module=store status=error stage=parse error={err}");
            return None;
        }
    };

    let records = normalize_list(&value, ids);
    if records.is_none() {
        warn!("event=store_load module=store status=error stage=shape error=top-level value is not an array");
    }
    records
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
