//! Discipline domain model.
//!
//! # Responsibility
//! - Define the canonical record for one tracked course.
//! - Provide lab-counter helpers that keep the done/total clamp intact.
//!
//! # Invariants
//! - `id` is unique within one store and never changes after assignment.
//! - `0 <= labs_done <= labs_total` whenever `labs_total > 0`; with no lab
//!   requirement (`labs_total == 0`) the counter is only clamped at 0.
//! - `name`, `kind` and `note` are plain strings, never absent.

use serde::{Deserialize, Serialize};

/// Stable numeric identifier for a discipline record.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type DisciplineId = i64;

/// Category label used when input carries none.
pub const DEFAULT_KIND: &str = "General";

/// One tracked course within the semester.
///
/// Wire names follow the persisted JSON document (`labsTotal`, `lastSent`,
/// `type`), so persisted state, import files and export files all share one
/// shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discipline {
    /// Stable id used for every targeted store operation.
    pub id: DisciplineId,
    /// Course title, trimmed.
    pub name: String,
    /// Free-form category label. Serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Total lab assignments required. Never negative.
    pub labs_total: i64,
    /// Completed lab assignments, clamped against `labs_total`.
    pub labs_done: i64,
    /// Whether a control exam is required.
    pub control: bool,
    /// Whether a final exam is required.
    pub exam: bool,
    /// RFC 3339 timestamp of the last submission, if any.
    pub last_sent: Option<String>,
    /// Free-form annotation.
    pub note: String,
}

impl Discipline {
    /// Returns whether every required lab is done.
    ///
    /// A discipline without a lab requirement is never "complete" in this
    /// sense; the pending filter keeps it visible.
    pub fn labs_complete(&self) -> bool {
        self.labs_total > 0 && self.labs_done >= self.labs_total
    }

    /// Returns whether labs are required and some are still outstanding.
    pub fn has_outstanding_labs(&self) -> bool {
        self.labs_total > 0 && self.labs_done < self.labs_total
    }

    /// Advances the lab counter by one, clamped at `labs_total`.
    ///
    /// An unbounded counter (`labs_total == 0`) saturates at the integer
    /// ceiling instead of overflowing.
    pub fn increment_labs(&mut self) {
        self.labs_done = clamp_labs_done(self.labs_done.saturating_add(1), self.labs_total);
    }

    /// Rewinds the lab counter by one, clamped at 0.
    pub fn decrement_labs(&mut self) {
        self.labs_done = clamp_labs_done(self.labs_done.saturating_sub(1), self.labs_total);
    }

    /// Records a submission at the given RFC 3339 timestamp.
    pub fn mark_submitted(&mut self, now: impl Into<String>) {
        self.last_sent = Some(now.into());
    }
}

/// Clamps a lab counter into the valid range for the given total.
///
/// With `labs_total == 0` there is no upper bound; only the floor at 0
/// applies.
pub(crate) fn clamp_labs_done(value: i64, labs_total: i64) -> i64 {
    let floored = value.max(0);
    if labs_total > 0 {
        floored.min(labs_total)
    } else {
        floored
    }
}

/// Builds the built-in semester dataset used on first run, on corrupt
/// persisted state and on reset.
pub fn default_semester() -> Vec<Discipline> {
    fn record(
        id: DisciplineId,
        name: &str,
        kind: &str,
        labs_total: i64,
        control: bool,
        exam: bool,
        note: &str,
    ) -> Discipline {
        Discipline {
            id,
            name: name.to_string(),
            kind: kind.to_string(),
            labs_total,
            labs_done: 0,
            control,
            exam,
            last_sent: None,
            note: note.to_string(),
        }
    }

    vec![
        record(
            1,
            "Программирование (часть 2)",
            "Programming",
            3,
            true,
            true,
            "вариант 5 (по паролю)",
        ),
        record(
            2,
            "Информатика",
            "Informatics",
            3,
            true,
            false,
            "Excel: расчёты, графики",
        ),
        record(
            3,
            "Алгебра и геометрия",
            "Math",
            0,
            true,
            true,
            "решать задачи, контрольная",
        ),
        record(
            4,
            "История России (ч.2)",
            "History",
            0,
            true,
            false,
            "эссе 5-6 стр.",
        ),
        record(
            5,
            "Основы российской государственности",
            "Civics",
            0,
            true,
            false,
            "эссе/рефлексия",
        ),
        record(6, "Право", "Law", 0, true, false, "контрольная + задачи"),
    ]
}
