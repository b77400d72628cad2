//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `semtrack_core` wiring.
//! - Keep output deterministic for quick local sanity checks.

use semtrack_core::{DisciplineStore, MemoryStorageGateway};

fn main() {
    // An in-memory gateway keeps the probe side-effect free: the store
    // opens on the default semester dataset every run.
    let store = DisciplineStore::open(MemoryStorageGateway::new());
    let summary = store.summary();

    println!("semtrack_core version={}", semtrack_core::core_version());
    println!(
        "disciplines={} with_submission={} labs={}/{}",
        summary.disciplines, summary.with_submission, summary.labs_done, summary.labs_total
    );
    for item in store.items() {
        println!(
            "id={} name={} kind={} labs={}/{} control={} exam={}",
            item.id, item.name, item.kind, item.labs_done, item.labs_total, item.control, item.exam
        );
    }
}
