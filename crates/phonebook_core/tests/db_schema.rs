use phonebook_core::db::migrations::{apply_migrations, current_user_version, latest_version};
use phonebook_core::db::{ensure_schema_ready, open_db, open_db_in_memory, DbError};
use phonebook_core::{PhoneBookRepository, RepoError};
use rusqlite::Connection;

#[test]
fn open_applies_latest_schema() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());

    let tables: Vec<String> = conn
        .prepare("SELECT name FROM sqlite_master WHERE type = 'table' AND name IN ('contacts', 'colors') ORDER BY name;")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(tables, vec!["colors", "contacts"]);
}

#[test]
fn migrations_are_idempotent() {
    let mut conn = open_db_in_memory().unwrap();
    apply_migrations(&mut conn).unwrap();
    assert_eq!(current_user_version(&conn).unwrap(), latest_version());
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");
    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version() + 1))
            .unwrap();
    }

    let err = open_db(&path).unwrap_err();
    assert!(matches!(
        err,
        DbError::SchemaTooNew { found, supported }
            if found == latest_version() + 1 && supported == latest_version()
    ));
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    match PhoneBookRepository::try_new(conn) {
        Err(RepoError::Db(DbError::SchemaNotApplied { expected, found: 0 })) => {
            assert_eq!(expected, latest_version())
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn schema_check_reports_missing_table_message() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    let err = ensure_schema_ready(&conn).unwrap_err();
    assert_eq!(err.to_string(), "phone book table `colors` is missing");
}

#[test]
fn repository_rejects_missing_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        PhoneBookRepository::try_new(conn),
        Err(RepoError::Db(DbError::MissingTable("colors")))
    ));
}

#[test]
fn repository_rejects_missing_column() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE colors (id INTEGER PRIMARY KEY, name TEXT NOT NULL, hex TEXT NOT NULL);
         CREATE TABLE contacts (
            id INTEGER PRIMARY KEY,
            first_name TEXT NOT NULL,
            middle_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            contact TEXT NOT NULL,
            tag TEXT NOT NULL,
            color_id INTEGER NOT NULL,
            is_in_trash INTEGER NOT NULL
         );",
    )
    .unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        PhoneBookRepository::try_new(conn),
        Err(RepoError::Db(DbError::MissingColumn {
            table: "contacts",
            column: "can_be_checked_off"
        }))
    ));
}
