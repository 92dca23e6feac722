//! Core domain logic for the phone book: storage, mapping, trash state and
//! view state. UI layers consume this crate through the repository snapshots
//! and the controller intents.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::color::{Color, ColorId, InvalidHexColor, DEFAULT_COLOR_ID};
pub use model::contact::{Contact, ContactField, ContactId, ContactInputError, NEW_CONTACT_ID};
pub use repo::phone_repo::{PhoneBookRepository, SeedReport};
pub use repo::{ReferentialIntegrityError, RepoError, RepoResult};
pub use service::dialog::TrashDialog;
pub use service::view_state::{PhoneBookController, Screen, TrashTab};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
