//! View-state services sitting between presentation and the repository.
//!
//! # Responsibility
//! - Hold transient UI state (draft, selection, dialogs, screen).
//! - Forward user intents to `PhoneBookRepository` without touching SQL.

pub mod dialog;
pub mod view_state;
