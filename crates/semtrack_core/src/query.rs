//! Pure view derivation over the record list.
//!
//! # Responsibility
//! - Derive the filtered, search-matched display view without mutating the
//!   store.
//!
//! # Invariants
//! - Input order is preserved in every returned view.
//! - A blank query matches everything; predicates AND-compose.

use crate::model::discipline::Discipline;

/// Completion filter applied before free-text matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every record.
    #[default]
    All,
    /// Excludes records whose lab requirement is fully met. Records with no
    /// lab requirement stay visible.
    Pending,
}

/// Returns the records matching `filter` and the free-text `query`.
///
/// Matching is a case-insensitive substring test over name, note and
/// category. Whitespace-only queries match everything.
pub fn view<'a>(items: &'a [Discipline], query: &str, filter: Filter) -> Vec<&'a Discipline> {
    let needle = query.trim().to_lowercase();

    items
        .iter()
        .filter(|item| match filter {
            Filter::All => true,
            Filter::Pending => !item.labs_complete(),
        })
        .filter(|item| needle.is_empty() || matches_query(item, &needle))
        .collect()
}

/// Returns the records with outstanding labs, in store order.
pub fn pending(items: &[Discipline]) -> Vec<&Discipline> {
    items
        .iter()
        .filter(|item| item.has_outstanding_labs())
        .collect()
}

fn matches_query(item: &Discipline, needle: &str) -> bool {
    item.name.to_lowercase().contains(needle)
        || item.note.to_lowercase().contains(needle)
        || item.kind.to_lowercase().contains(needle)
}
