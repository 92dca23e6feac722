//! Schema readiness checks for connections built outside `open_db`.

use super::migrations::{current_user_version, latest_version};
use super::{DbError, DbResult};
use rusqlite::{Connection, OptionalExtension};

/// Tables the repository reads, with the columns it needs. Colors first,
/// because contacts reference them.
pub const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    ("colors", &["id", "name", "hex"]),
    (
        "contacts",
        &[
            "id",
            "first_name",
            "middle_name",
            "last_name",
            "contact",
            "tag",
            "can_be_checked_off",
            "is_checked_off",
            "color_id",
            "is_in_trash",
        ],
    ),
];

/// Fails unless `conn` is at the current schema version and carries every
/// table and column in [`REQUIRED_COLUMNS`].
pub fn ensure_schema_ready(conn: &Connection) -> DbResult<()> {
    let expected = latest_version();
    let found = current_user_version(conn)?;
    if found != expected {
        return Err(DbError::SchemaNotApplied { expected, found });
    }

    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(DbError::MissingTable(table));
        }
        let present = table_columns(conn, table)?;
        if let Some(column) = columns
            .iter()
            .copied()
            .find(|column| !present.iter().any(|name| name == column))
        {
            return Err(DbError::MissingColumn { table, column });
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1;",
            [table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let columns = stmt.query_map([], |row| row.get::<_, String>("name"))?;
    Ok(columns.collect::<Result<Vec<_>, _>>()?)
}

#[cfg(test)]
mod tests {
    use super::{ensure_schema_ready, table_columns, table_exists};
    use crate::db::open_db_in_memory;

    #[test]
    fn migrated_connection_is_ready() {
        let conn = open_db_in_memory().unwrap();
        ensure_schema_ready(&conn).unwrap();
    }

    #[test]
    fn introspection_sees_migrated_tables() {
        let conn = open_db_in_memory().unwrap();
        assert!(table_exists(&conn, "contacts").unwrap());
        assert!(table_exists(&conn, "colors").unwrap());
        assert!(!table_exists(&conn, "contacts_backup").unwrap());
        assert_eq!(
            table_columns(&conn, "colors").unwrap(),
            vec!["id", "name", "hex"]
        );
    }
}
