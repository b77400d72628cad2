//! Domain model for tracked disciplines.
//!
//! # Responsibility
//! - Define the canonical record shape shared by store, codec and storage.
//! - Keep all input coercion in one total normalization routine.
//!
//! # Invariants
//! - Every record that leaves this module satisfies the clamp and string
//!   invariants documented on [`discipline::Discipline`].

pub mod discipline;
pub mod normalize;
