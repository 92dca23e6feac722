//! Row-level SQLite access for `contacts` and `colors`.
//!
//! # Responsibility
//! - Read and write storage rows; no joins, no domain types.
//!
//! # Invariants
//! - `upsert` replaces on id conflict; a row without id gets a generated one.
//! - Boolean columns hold exactly 0 or 1; anything else is `InvalidData`.

use crate::model::color::ColorId;
use crate::model::contact::ContactId;
use crate::repo::{RepoError, RepoResult};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const CONTACT_SELECT_SQL: &str = "SELECT
    id,
    first_name,
    middle_name,
    last_name,
    contact,
    tag,
    can_be_checked_off,
    is_checked_off,
    color_id,
    is_in_trash
FROM contacts";

/// Storage shape of a contact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactRow {
    /// `None` until the store assigns one on insert.
    pub id: Option<ContactId>,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub contact: String,
    pub tag: String,
    pub can_be_checked_off: bool,
    pub is_checked_off: bool,
    pub color_id: ColorId,
    pub is_in_trash: bool,
}

/// Storage shape of a color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRow {
    pub id: ColorId,
    pub name: String,
    pub hex: String,
}

/// Row access for the `contacts` table.
pub trait ContactDao {
    fn all(&self) -> RepoResult<Vec<ContactRow>>;
    fn find_by_id(&self, id: ContactId) -> RepoResult<Option<ContactRow>>;
    fn find_by_ids(&self, ids: &[ContactId]) -> RepoResult<Vec<ContactRow>>;
    /// Inserts or replaces by id; returns the stored id.
    fn upsert(&self, row: &ContactRow) -> RepoResult<ContactId>;
    fn insert_all(&self, rows: &[ContactRow]) -> RepoResult<()>;
    /// Returns the number of rows removed.
    fn delete_by_ids(&self, ids: &[ContactId]) -> RepoResult<usize>;
    fn count(&self) -> RepoResult<u64>;
}

/// Row access for the `colors` table.
pub trait ColorDao {
    fn all(&self) -> RepoResult<Vec<ColorRow>>;
    fn find_by_id(&self, id: ColorId) -> RepoResult<Option<ColorRow>>;
    fn insert_all(&self, rows: &[ColorRow]) -> RepoResult<()>;
    fn count(&self) -> RepoResult<u64>;
}

/// SQLite-backed contact rows.
pub struct SqliteContactDao<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteContactDao<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ContactDao for SqliteContactDao<'_> {
    fn all(&self) -> RepoResult<Vec<ContactRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn find_by_id(&self, id: ContactId) -> RepoResult<Option<ContactRow>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CONTACT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_contact_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_by_ids(&self, ids: &[ContactId]) -> RepoResult<Vec<ContactRow>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let sql = format!(
            "{CONTACT_SELECT_SQL} WHERE id IN ({}) ORDER BY id ASC;",
            placeholders(ids.len())
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(ids.iter()))?;
        let mut contacts = Vec::new();
        while let Some(row) = rows.next()? {
            contacts.push(parse_contact_row(row)?);
        }
        Ok(contacts)
    }

    fn upsert(&self, row: &ContactRow) -> RepoResult<ContactId> {
        self.conn.execute(
            "INSERT OR REPLACE INTO contacts (
                id,
                first_name,
                middle_name,
                last_name,
                contact,
                tag,
                can_be_checked_off,
                is_checked_off,
                color_id,
                is_in_trash
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                row.id,
                row.first_name.as_str(),
                row.middle_name.as_str(),
                row.last_name.as_str(),
                row.contact.as_str(),
                row.tag.as_str(),
                bool_to_int(row.can_be_checked_off),
                bool_to_int(row.is_checked_off),
                row.color_id,
                bool_to_int(row.is_in_trash),
            ],
        )?;

        Ok(row.id.unwrap_or_else(|| self.conn.last_insert_rowid()))
    }

    fn insert_all(&self, rows: &[ContactRow]) -> RepoResult<()> {
        let mut stmt = self.conn.prepare(
            "INSERT INTO contacts (
                id,
                first_name,
                middle_name,
                last_name,
                contact,
                tag,
                can_be_checked_off,
                is_checked_off,
                color_id,
                is_in_trash
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
        )?;
        for row in rows {
            stmt.execute(params![
                row.id,
                row.first_name.as_str(),
                row.middle_name.as_str(),
                row.last_name.as_str(),
                row.contact.as_str(),
                row.tag.as_str(),
                bool_to_int(row.can_be_checked_off),
                bool_to_int(row.is_checked_off),
                row.color_id,
                bool_to_int(row.is_in_trash),
            ])?;
        }
        Ok(())
    }

    fn delete_by_ids(&self, ids: &[ContactId]) -> RepoResult<usize> {
        if ids.is_empty() {
            return Ok(0);
        }

        let sql = format!(
            "DELETE FROM contacts WHERE id IN ({});",
            placeholders(ids.len())
        );
        let removed = self.conn.execute(&sql, params_from_iter(ids.iter()))?;
        Ok(removed)
    }

    fn count(&self) -> RepoResult<u64> {
        count_rows(self.conn, "contacts")
    }
}

/// SQLite-backed color rows.
pub struct SqliteColorDao<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteColorDao<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ColorDao for SqliteColorDao<'_> {
    fn all(&self) -> RepoResult<Vec<ColorRow>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, hex FROM colors ORDER BY id ASC;")?;
        let rows = stmt.query_map([], parse_color_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn find_by_id(&self, id: ColorId) -> RepoResult<Option<ColorRow>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, hex FROM colors WHERE id = ?1;",
                [id],
                parse_color_row,
            )
            .optional()?;
        Ok(row)
    }

    fn insert_all(&self, rows: &[ColorRow]) -> RepoResult<()> {
        let mut stmt = self
            .conn
            .prepare("INSERT INTO colors (id, name, hex) VALUES (?1, ?2, ?3);")?;
        for row in rows {
            stmt.execute(params![row.id, row.name.as_str(), row.hex.as_str()])?;
        }
        Ok(())
    }

    fn count(&self) -> RepoResult<u64> {
        count_rows(self.conn, "colors")
    }
}

fn count_rows(conn: &Connection, table: &str) -> RepoResult<u64> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })?;
    u64::try_from(count)
        .map_err(|_| RepoError::InvalidData(format!("negative row count {count} in {table}")))
}

fn parse_contact_row(row: &Row<'_>) -> RepoResult<ContactRow> {
    Ok(ContactRow {
        id: Some(row.get("id")?),
        first_name: row.get("first_name")?,
        middle_name: row.get("middle_name")?,
        last_name: row.get("last_name")?,
        contact: row.get("contact")?,
        tag: row.get("tag")?,
        can_be_checked_off: parse_flag(row, "can_be_checked_off")?,
        is_checked_off: parse_flag(row, "is_checked_off")?,
        color_id: row.get("color_id")?,
        is_in_trash: parse_flag(row, "is_in_trash")?,
    })
}

fn parse_color_row(row: &Row<'_>) -> rusqlite::Result<ColorRow> {
    Ok(ColorRow {
        id: row.get("id")?,
        name: row.get("name")?,
        hex: row.get("hex")?,
    })
}

fn parse_flag(row: &Row<'_>, column: &'static str) -> RepoResult<bool> {
    match row.get::<_, i64>(column)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid {column} value `{other}` in contacts.{column}"
        ))),
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}
