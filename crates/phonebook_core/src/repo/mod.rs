//! Repository layer: row access, mapping and the observable contact store.
//!
//! # Responsibility
//! - Keep SQL inside `dao`; keep row/domain translation inside `mapper`.
//! - Expose one repository that owns the connection and publishes snapshots.
//!
//! # Invariants
//! - Only `PhoneBookRepository` writes to the database.
//! - Every mutation republishes both active and trashed snapshots.
//! - A mutation whose snapshots cannot be rebuilt is rolled back.

use crate::db::DbError;
use crate::model::contact::ContactId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod dao;
pub mod mapper;
pub mod phone_repo;
pub mod seed;

pub use mapper::ReferentialIntegrityError;

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for phone book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(ContactId),
    ReferentialIntegrity(ReferentialIntegrityError),
    InvalidData(String),
    StorePoisoned,
    Background(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "contact not found: {id}"),
            Self::ReferentialIntegrity(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted contact data: {message}"),
            Self::StorePoisoned => write!(f, "phone book store lock is poisoned"),
            Self::Background(message) => write!(f, "background task failed: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::ReferentialIntegrity(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ReferentialIntegrityError> for RepoError {
    fn from(value: ReferentialIntegrityError) -> Self {
        Self::ReferentialIntegrity(value)
    }
}
