//! Domain model for the phone book.
//!
//! # Invariants
//! - A contact always carries a resolved `Color`, never a bare color id.
//! - Trash is a soft-delete flag; hard delete removes the record entirely.

pub mod color;
pub mod contact;
