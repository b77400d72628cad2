//! Total normalization of untrusted JSON into valid discipline records.
//!
//! # Responsibility
//! - Turn arbitrary parsed JSON (persisted state, import files, form
//!   payloads) into records that satisfy every model invariant.
//! - Own fresh-id allocation so ids stay unique store-wide.
//!
//! # Invariants
//! - `normalize_record` never fails: every input, however malformed, yields
//!   a structurally valid record. Corrupt data must degrade, not crash.
//! - A list normalized in one pass never contains duplicate ids, even when
//!   the input does.

use crate::model::discipline::{clamp_labs_done, Discipline, DisciplineId, DEFAULT_KIND};
use serde_json::Value;
use std::collections::HashSet;

/// Hands out fresh record ids that never collide with any id it has seen.
///
/// Fresh ids normally grow past the highest claimed id; when that counter
/// cannot grow any further (a claimed id at the top of the integer range)
/// the allocator wraps around and scans for a free id instead. Uniqueness
/// holds either way.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: DisciplineId,
    taken: HashSet<DisciplineId>,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next: 1,
            taken: HashSet::new(),
        }
    }

    /// Creates an allocator that will never collide with `items`.
    pub fn seeded(items: &[Discipline]) -> Self {
        let mut ids = Self::new();
        for item in items {
            ids.claim(item.id);
        }
        ids
    }

    /// Registers an id carried by existing data. Returns `false` when the
    /// id is already taken within this allocator's scope.
    pub fn claim(&mut self, id: DisciplineId) -> bool {
        let free = self.taken.insert(id);
        if free {
            if let Some(above) = id.checked_add(1) {
                if above > self.next {
                    self.next = above;
                }
            }
        }
        free
    }

    /// Issues a fresh unique id.
    pub fn fresh(&mut self) -> DisciplineId {
        loop {
            let candidate = self.next;
            self.next = match self.next.checked_add(1) {
                Some(next) => next,
                None => 1,
            };
            if candidate >= 1 && self.taken.insert(candidate) {
                return candidate;
            }
        }
    }
}

/// Normalizes one arbitrary JSON value into a valid record.
///
/// Coercion rules per field:
/// - `labsTotal`: number-coerced, non-finite defaults to 0, clamped at >= 0;
/// - `labsDone`: number-coerced, clamped into `[0, labsTotal]` (floor-only
///   when `labsTotal` is 0);
/// - `id`: preserved when numeric, otherwise freshly issued;
/// - `name`/`type`/`note`: string-coerced with falsy inputs replaced by the
///   field default, `name` trimmed, `type` defaulting to `"General"`;
/// - `control`/`exam`: truthiness of the raw value;
/// - `lastSent`: kept (stringified) when present and truthy, else absent.
pub fn normalize_record(raw: &Value, ids: &mut IdAllocator) -> Discipline {
    let labs_total = coerce_number(raw.get("labsTotal")).max(0);
    let labs_done = clamp_labs_done(coerce_number(raw.get("labsDone")), labs_total);

    let id = match raw.get("id").and_then(Value::as_i64) {
        // A preserved id that is already taken gets re-issued, so one
        // normalization scope never yields duplicates.
        Some(id) if ids.claim(id) => id,
        _ => ids.fresh(),
    };

    Discipline {
        id,
        name: coerce_text(raw.get("name"), "").trim().to_string(),
        kind: coerce_text(raw.get("type"), DEFAULT_KIND),
        labs_total,
        labs_done,
        control: truthy(raw.get("control")),
        exam: truthy(raw.get("exam")),
        last_sent: coerce_timestamp(raw.get("lastSent")),
        note: coerce_text(raw.get("note"), ""),
    }
}

/// Normalizes a whole JSON document into an ordered record list.
///
/// Returns `None` when the top-level value is not an array; import and
/// load paths translate that into their own rejection. Input order is
/// preserved. When two entries carry the same preserved id, the later one
/// is re-issued a fresh id by the allocator.
pub fn normalize_list(raw: &Value, ids: &mut IdAllocator) -> Option<Vec<Discipline>> {
    let entries = raw.as_array()?;
    Some(
        entries
            .iter()
            .map(|entry| normalize_record(entry, ids))
            .collect(),
    )
}

/// Coerces a JSON value to an integer count. Non-finite and unparsable
/// inputs become 0; fractions truncate toward zero.
fn coerce_number(value: Option<&Value>) -> i64 {
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(flag)) => Some(if *flag { 1.0 } else { 0.0 }),
        Some(Value::Null) | None => Some(0.0),
        Some(Value::Array(_)) | Some(Value::Object(_)) => None,
    };

    match number {
        // `as` saturates at the i64 range and truncates toward zero.
        Some(n) if n.is_finite() => n as i64,
        _ => 0,
    }
}

/// Coerces a JSON value to text, substituting `default` for falsy input.
fn coerce_text(value: Option<&Value>, default: &str) -> String {
    if !truthy(value) {
        return default.to_string();
    }
    stringify(value)
}

/// Keeps a submission timestamp only when the raw value is truthy.
fn coerce_timestamp(value: Option<&Value>) -> Option<String> {
    if truthy(value) {
        Some(stringify(value))
    } else {
        None
    }
}

fn stringify(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        // Display on `Value` renders compact JSON, which doubles as a
        // reasonable string form for numbers and booleans.
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Truthiness of a JSON value: absent, null, false, 0, NaN and the empty
/// string are falsy; everything else is truthy.
fn truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
