//! SQLite storage for the phone book.
//!
//! # Responsibility
//! - Open and configure connections (`open`).
//! - Own the schema: apply it (`migrations`) and verify it (`schema`).
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A connection handed to the repository has passed `ensure_schema_ready`.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
pub mod schema;

pub use open::{open_db, open_db_in_memory};
pub use schema::ensure_schema_ready;

/// File name used by entry points that keep the database in a directory.
pub const DB_FILE_NAME: &str = "phone_book.sqlite3";

pub type DbResult<T> = Result<T, DbError>;

/// Connection and schema failures.
#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// The connection was not opened through [`open_db`] / [`open_db_in_memory`].
    SchemaNotApplied { expected: u32, found: u32 },
    MissingTable(&'static str),
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "sqlite: {err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "phone book schema v{found} is newer than this build (v{supported})"
            ),
            Self::SchemaNotApplied { expected, found } => write!(
                f,
                "phone book schema is v{found}, expected v{expected}; open it with db::open_db"
            ),
            Self::MissingTable(table) => write!(f, "phone book table `{table}` is missing"),
            Self::MissingColumn { table, column } => {
                write!(f, "phone book column `{table}.{column}` is missing")
            }
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        if let Self::Sqlite(err) = self {
            Some(err)
        } else {
            None
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
