use semtrack_core::{
    default_semester, DisciplineStore, MemoryStorageGateway, StorageError, StorageGateway,
    StorageResult,
};
use serde_json::json;
use std::rc::Rc;

/// Cloneable handle over one in-memory gateway, so tests can inspect what
/// the store persisted.
#[derive(Clone, Default)]
struct SharedGateway(Rc<MemoryStorageGateway>);

impl StorageGateway for SharedGateway {
    fn load(&self) -> StorageResult<Option<String>> {
        self.0.load()
    }

    fn save(&self, document: &str) -> StorageResult<()> {
        self.0.save(document)
    }

    fn clear(&self) -> StorageResult<()> {
        self.0.clear()
    }
}

/// Gateway whose every operation fails, for the absorb-and-continue
/// contract.
struct FailingGateway;

impl StorageGateway for FailingGateway {
    fn load(&self) -> StorageResult<Option<String>> {
        Err(StorageError::Backend("load unavailable".to_string()))
    }

    fn save(&self, _document: &str) -> StorageResult<()> {
        Err(StorageError::Backend("save unavailable".to_string()))
    }

    fn clear(&self) -> StorageResult<()> {
        Err(StorageError::Backend("clear unavailable".to_string()))
    }
}

fn empty_store() -> DisciplineStore<MemoryStorageGateway> {
    DisciplineStore::open(MemoryStorageGateway::with_document("[]"))
}

#[test]
fn open_without_persisted_state_loads_default_dataset() {
    let store = DisciplineStore::open(MemoryStorageGateway::new());

    assert_eq!(store.items(), default_semester().as_slice());
}

#[test]
fn open_with_corrupt_document_falls_back_to_defaults() {
    let store = DisciplineStore::open(MemoryStorageGateway::with_document("not json"));
    assert_eq!(store.items(), default_semester().as_slice());

    let non_array = DisciplineStore::open(MemoryStorageGateway::with_document("{}"));
    assert_eq!(non_array.items(), default_semester().as_slice());
}

#[test]
fn open_with_failing_gateway_still_yields_a_working_store() {
    let mut store = DisciplineStore::open(FailingGateway);
    assert_eq!(store.items(), default_semester().as_slice());

    let id = store.create(&json!({"name": "Физика", "labsTotal": 2}));
    assert_eq!(store.items()[0].id, id);
    store.increment_labs(id);
    assert_eq!(store.get(id).unwrap().labs_done, 1);
}

#[test]
fn create_normalizes_prepends_and_assigns_fresh_id() {
    let mut store = empty_store();

    let first = store.create(&json!({"name": "Физика", "labsTotal": 4, "labsDone": 0}));
    let second = store.create(&json!({"name": "Право"}));

    assert_ne!(first, second);
    assert_eq!(store.items().len(), 2);
    assert_eq!(store.items()[0].id, second, "new records are prepended");

    let physics = store.get(first).unwrap();
    assert_eq!(physics.labs_total, 4);
    assert_eq!(physics.labs_done, 0);
    assert_eq!(physics.kind, "General");
}

#[test]
fn create_ignores_an_id_carried_by_the_payload() {
    let mut store = empty_store();

    let first = store.create(&json!({"id": 7, "name": "a"}));
    let second = store.create(&json!({"id": 7, "name": "b"}));

    assert_ne!(first, second);
}

#[test]
fn update_merges_payload_and_reclamps_in_place() {
    let mut store = empty_store();
    let bottom = store.create(&json!({"name": "Право"}));
    let id = store.create(&json!({"name": "Физика", "labsTotal": 4, "labsDone": 1, "note": "вариант 5"}));

    store.update(id, &json!({"labsDone": 9}));

    let updated = store.get(id).unwrap();
    assert_eq!(updated.labs_done, 4, "merged counter reclamps to the total");
    assert_eq!(updated.name, "Физика", "untouched fields survive the merge");
    assert_eq!(updated.note, "вариант 5");
    assert_eq!(store.items()[0].id, id, "position is preserved");
    assert_eq!(store.items()[1].id, bottom);
}

#[test]
fn update_cannot_reassign_identity() {
    let mut store = empty_store();
    let id = store.create(&json!({"name": "Физика"}));

    store.update(id, &json!({"id": 999, "name": "Физика 2"}));

    assert_eq!(store.items().len(), 1);
    assert_eq!(store.get(id).unwrap().name, "Физика 2");
    assert!(store.get(999).is_none());
}

#[test]
fn update_with_unknown_id_behaves_as_create() {
    let mut store = empty_store();

    let id = store.update(42, &json!({"name": "новая"}));

    assert_eq!(store.items().len(), 1);
    assert_eq!(store.items()[0].id, id);
    assert_eq!(store.items()[0].name, "новая");
}

#[test]
fn delete_removes_the_record_and_ignores_unknown_ids() {
    let mut store = empty_store();
    let id = store.create(&json!({"name": "Физика"}));

    store.delete(9000);
    assert_eq!(store.items().len(), 1);

    store.delete(id);
    assert!(store.items().is_empty());

    store.delete(id);
    assert!(store.items().is_empty());
}

#[test]
fn lab_counter_is_bounded_by_the_total() {
    let mut store = empty_store();
    let id = store.create(&json!({"name": "Физика", "labsTotal": 2, "labsDone": 2}));

    store.increment_labs(id);
    assert_eq!(store.get(id).unwrap().labs_done, 2);

    store.decrement_labs(id);
    store.decrement_labs(id);
    store.decrement_labs(id);
    assert_eq!(store.get(id).unwrap().labs_done, 0);
}

#[test]
fn lab_counter_without_requirement_has_no_upper_bound() {
    let mut store = empty_store();
    let id = store.create(&json!({"name": "Алгебра", "labsTotal": 0}));

    store.increment_labs(id);
    store.increment_labs(id);
    assert_eq!(store.get(id).unwrap().labs_done, 2);

    store.decrement_labs(id);
    store.decrement_labs(id);
    store.decrement_labs(id);
    assert_eq!(store.get(id).unwrap().labs_done, 0);
}

#[test]
fn counter_operations_ignore_unknown_ids() {
    let mut store = empty_store();
    store.increment_labs(5);
    store.decrement_labs(5);
    store.mark_submitted(5);
    assert!(store.items().is_empty());
}

#[test]
fn mark_submitted_stamps_the_record() {
    let mut store = empty_store();
    let id = store.create(&json!({"name": "Физика", "labsTotal": 3}));
    assert_eq!(store.get(id).unwrap().last_sent, None);

    store.mark_submitted(id);

    let stamp = store.get(id).unwrap().last_sent.clone().unwrap();
    assert!(stamp.ends_with('Z'), "timestamp is RFC 3339 UTC: {stamp}");
}

#[test]
fn bulk_mark_submitted_targets_only_outstanding_labs() {
    let mut store = empty_store();
    let done = store.create(&json!({"name": "done", "labsTotal": 2, "labsDone": 2}));
    let pending_a = store.create(&json!({"name": "a", "labsTotal": 3, "labsDone": 1}));
    let pending_b = store.create(&json!({"name": "b", "labsTotal": 4}));
    let no_labs = store.create(&json!({"name": "essay", "labsTotal": 0}));

    let affected = store.mark_all_pending_submitted();

    assert_eq!(affected, 2);
    assert!(store.get(pending_a).unwrap().last_sent.is_some());
    assert!(store.get(pending_b).unwrap().last_sent.is_some());
    assert_eq!(store.get(done).unwrap().last_sent, None);
    assert_eq!(store.get(no_labs).unwrap().last_sent, None);
}

#[test]
fn bulk_mark_submitted_returns_zero_when_nothing_is_pending() {
    let mut store = empty_store();
    store.create(&json!({"name": "done", "labsTotal": 1, "labsDone": 1}));

    assert_eq!(store.mark_all_pending_submitted(), 0);
}

#[test]
fn every_mutation_persists_the_full_sequence() {
    let gateway = SharedGateway::default();
    let mut store = DisciplineStore::open(gateway.clone());
    store.import("[]").unwrap();

    let id = store.create(&json!({"name": "Физика", "labsTotal": 3}));
    store.increment_labs(id);

    let reopened = DisciplineStore::open(gateway);
    assert_eq!(reopened.items().len(), 1);
    assert_eq!(reopened.items()[0].name, "Физика");
    assert_eq!(reopened.items()[0].labs_done, 1);
}

#[test]
fn reset_restores_defaults_and_clears_the_gateway() {
    let gateway = SharedGateway::default();
    let mut store = DisciplineStore::open(gateway.clone());
    store.create(&json!({"name": "extra"}));

    store.reset();

    assert_eq!(store.items(), default_semester().as_slice());
    assert_eq!(gateway.load().unwrap(), None, "persisted state is cleared");
}

#[test]
fn ids_stay_unique_after_delete_and_create_cycles() {
    let mut store = empty_store();
    let a = store.create(&json!({"name": "a"}));
    let b = store.create(&json!({"name": "b"}));
    store.delete(a);
    let c = store.create(&json!({"name": "c"}));

    assert_ne!(c, b);
    assert_ne!(c, a, "ids are never reused within a session");
}

#[test]
fn create_after_importing_the_maximum_id_keeps_ids_unique() {
    let mut store = empty_store();
    store
        .import(&format!(r#"[{{"id": {}, "name": "край"}}]"#, i64::MAX))
        .unwrap();

    let id = store.create(&json!({"name": "новая"}));

    assert_eq!(store.items().len(), 2);
    assert_ne!(id, i64::MAX);
    assert_eq!(store.get(i64::MAX).unwrap().name, "край");
    assert_eq!(store.get(id).unwrap().name, "новая");
}

#[test]
fn unbounded_counter_saturates_at_the_integer_ceiling() {
    let mut store = empty_store();
    store
        .import(&format!(
            r#"[{{"id": 1, "name": "край", "labsTotal": 0, "labsDone": {}}}]"#,
            i64::MAX
        ))
        .unwrap();

    store.increment_labs(1);
    assert_eq!(store.get(1).unwrap().labs_done, i64::MAX);

    store.decrement_labs(1);
    assert_eq!(store.get(1).unwrap().labs_done, i64::MAX - 1);
}

#[test]
fn summary_saturates_on_extreme_lab_totals() {
    let mut store = empty_store();
    let document = format!(
        r#"[{{"id": 1, "name": "a", "labsTotal": {max}}}, {{"id": 2, "name": "b", "labsTotal": {max}}}]"#,
        max = i64::MAX
    );
    store.import(&document).unwrap();

    let summary = store.summary();
    assert_eq!(summary.disciplines, 2);
    assert_eq!(summary.labs_total, i64::MAX);
}

#[test]
fn summary_counts_records_submissions_and_labs() {
    let mut store = empty_store();
    let a = store.create(&json!({"name": "a", "labsTotal": 3, "labsDone": 1}));
    store.create(&json!({"name": "b", "labsTotal": 2, "labsDone": 2}));
    store.create(&json!({"name": "c"}));
    store.mark_submitted(a);

    let summary = store.summary();
    assert_eq!(summary.disciplines, 3);
    assert_eq!(summary.with_submission, 1);
    assert_eq!(summary.labs_total, 5);
    assert_eq!(summary.labs_done, 3);
}
