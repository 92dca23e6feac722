//! Observable contact store over one SQLite connection.
//!
//! # Responsibility
//! - Own the connection and serialize every access behind one mutex.
//! - Seed default colors and sample contacts into an empty store.
//! - Publish active, trashed and color snapshots through `watch` channels.
//!
//! # Invariants
//! - A mutation and the rebuild of both contact snapshots share one
//!   transaction; if the rebuild fails the write is rolled back and nothing
//!   is published.
//! - `save` never stores a contact whose color id has no color row.
//! - Snapshots are sorted by first name (stable; ties keep id order).
//! - `move_to_trash` fails on unknown ids; `restore_from_trash` skips them.

use crate::db::ensure_schema_ready;
use crate::model::color::Color;
use crate::model::contact::{Contact, ContactId};
use crate::repo::dao::{ColorDao, ContactDao, ContactRow, SqliteColorDao, SqliteContactDao};
use crate::repo::mapper::{
    colors_by_id, to_domain, to_domain_color_list, to_domain_list, to_storage,
    ReferentialIntegrityError,
};
use crate::repo::seed::{default_color_rows, default_contact_rows};
use crate::repo::{RepoError, RepoResult};
use log::{debug, error, info, warn};
use rusqlite::Connection;
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Which tables `initialize` filled with defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub colors_seeded: bool,
    pub contacts_seeded: bool,
}

/// Single writer of the phone book store.
///
/// Construct one per connection; share it through `Arc`.
pub struct PhoneBookRepository {
    conn: Mutex<Connection>,
    active: watch::Sender<Vec<Contact>>,
    trashed: watch::Sender<Vec<Contact>>,
    colors: watch::Sender<Vec<Color>>,
}

impl PhoneBookRepository {
    /// Wraps a migrated connection. Snapshots start empty until [`initialize`].
    ///
    /// # Errors
    /// - `Db(SchemaNotApplied)` when the schema version is not current.
    /// - `Db(MissingTable)` / `Db(MissingColumn)` for a foreign schema.
    ///
    /// [`initialize`]: Self::initialize
    pub fn try_new(conn: Connection) -> RepoResult<Self> {
        ensure_schema_ready(&conn)?;
        let (active, _) = watch::channel(Vec::new());
        let (trashed, _) = watch::channel(Vec::new());
        let (colors, _) = watch::channel(Vec::new());
        Ok(Self {
            conn: Mutex::new(conn),
            active,
            trashed,
            colors,
        })
    }

    /// Builds the repository, runs initialization on a blocking task and
    /// waits for it before handing the repository out.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn bootstrap(conn: Connection) -> RepoResult<Arc<Self>> {
        let repo = Arc::new(Self::try_new(conn)?);
        repo.spawn_initialize()
            .await
            .map_err(|err| RepoError::Background(err.to_string()))??;
        Ok(repo)
    }

    /// Runs [`initialize`](Self::initialize) on tokio's blocking pool.
    ///
    /// The returned handle is the only completion signal besides the
    /// snapshot update itself. Must be called inside a tokio runtime.
    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<RepoResult<SeedReport>> {
        let repo = Arc::clone(self);
        tokio::task::spawn_blocking(move || repo.initialize())
    }

    /// Seeds empty tables with defaults and publishes every snapshot.
    ///
    /// Colors and contacts are checked separately; a table that already has
    /// rows is left alone, so calling this again is harmless.
    pub fn initialize(&self) -> RepoResult<SeedReport> {
        let started_at = Instant::now();
        info!("event=repo_initialize module=repo status=start");

        let result = self.lock().and_then(|mut conn| {
            let tx = conn.transaction()?;
            let report = seed_if_empty(&tx)?;
            let colors = to_domain_color_list(&SqliteColorDao::new(&tx).all()?);
            let views = load_views(&tx)?;
            tx.commit()?;

            self.colors.send_replace(colors);
            self.publish(views);
            Ok(report)
        });

        match &result {
            Ok(report) => info!(
                "event=repo_initialize module=repo status=ok duration_ms={} colors_seeded={} contacts_seeded={}",
                started_at.elapsed().as_millis(),
                report.colors_seeded,
                report.contacts_seeded
            ),
            Err(err) => error!(
                "event=repo_initialize module=repo status=error duration_ms={} error={}",
                started_at.elapsed().as_millis(),
                err
            ),
        }
        result
    }

    /// Inserts a new contact or replaces an existing one by id.
    ///
    /// Returns the stored id, generated when `contact` is new.
    ///
    /// # Errors
    /// - `ReferentialIntegrity` when `contact.color.id` has no color row;
    ///   nothing is written.
    pub fn save(&self, contact: &Contact) -> RepoResult<ContactId> {
        let id = self.mutate(|conn| {
            let color_id = contact.color.id;
            if SqliteColorDao::new(conn).find_by_id(color_id)?.is_none() {
                warn!(
                    "event=contact_save module=repo status=error contact_id={} color_id={} error_code=unknown_color",
                    contact.id, color_id
                );
                return Err(ReferentialIntegrityError {
                    contact_id: contact.id,
                    color_id,
                }
                .into());
            }
            SqliteContactDao::new(conn).upsert(&to_storage(contact))
        })?;

        info!(
            "event=contact_save module=repo status=ok contact_id={} created={}",
            id,
            contact.is_new()
        );
        Ok(id)
    }

    /// Flags `id` as trashed, keeping every other field.
    ///
    /// # Errors
    /// - `NotFound` when no row has this id.
    pub fn move_to_trash(&self, id: ContactId) -> RepoResult<()> {
        self.mutate(|conn| {
            let dao = SqliteContactDao::new(conn);
            let Some(mut row) = dao.find_by_id(id)? else {
                warn!(
                    "event=contact_trash module=repo status=error contact_id={id} error_code=not_found"
                );
                return Err(RepoError::NotFound(id));
            };
            row.is_in_trash = true;
            dao.upsert(&row)?;
            Ok(())
        })?;

        info!("event=contact_trash module=repo status=ok contact_id={id}");
        Ok(())
    }

    /// Clears the trash flag of every existing id in `ids`.
    ///
    /// Unknown and repeated ids are skipped. Returns how many contacts were
    /// restored.
    pub fn restore_from_trash(&self, ids: &[ContactId]) -> RepoResult<usize> {
        let unique: Vec<ContactId> = ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let restored = self.mutate(|conn| {
            let dao = SqliteContactDao::new(conn);
            let rows = dao.find_by_ids(&unique)?;
            for row in &rows {
                dao.upsert(&ContactRow {
                    is_in_trash: false,
                    ..row.clone()
                })?;
            }
            Ok(rows.len())
        })?;

        if restored < unique.len() {
            debug!(
                "event=contact_restore module=repo status=skip requested={} missing={}",
                unique.len(),
                unique.len() - restored
            );
        }
        info!("event=contact_restore module=repo status=ok restored={restored}");
        Ok(restored)
    }

    /// Hard-deletes every id in `ids`. Returns how many rows were removed.
    pub fn delete_permanently(&self, ids: &[ContactId]) -> RepoResult<usize> {
        let removed = self.mutate(|conn| SqliteContactDao::new(conn).delete_by_ids(ids))?;

        info!(
            "event=contact_delete module=repo status=ok requested={} removed={}",
            ids.len(),
            removed
        );
        Ok(removed)
    }

    /// Reads one contact, trashed or not.
    pub fn get_contact(&self, id: ContactId) -> RepoResult<Option<Contact>> {
        let conn = self.lock()?;
        let Some(row) = SqliteContactDao::new(&conn).find_by_id(id)? else {
            return Ok(None);
        };
        let colors = colors_by_id(SqliteColorDao::new(&conn).all()?);
        Ok(Some(to_domain(&row, &colors)?))
    }

    /// Live color list.
    pub fn list_colors(&self) -> watch::Receiver<Vec<Color>> {
        self.colors.subscribe()
    }

    /// Live list of contacts not in trash.
    pub fn subscribe_active(&self) -> watch::Receiver<Vec<Contact>> {
        self.active.subscribe()
    }

    /// Live list of trashed contacts.
    pub fn subscribe_trashed(&self) -> watch::Receiver<Vec<Contact>> {
        self.trashed.subscribe()
    }

    pub fn active_contacts(&self) -> Vec<Contact> {
        self.active.borrow().clone()
    }

    pub fn trashed_contacts(&self) -> Vec<Contact> {
        self.trashed.borrow().clone()
    }

    pub fn colors(&self) -> Vec<Color> {
        self.colors.borrow().clone()
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepoError::StorePoisoned)
    }

    // Runs `write` and rebuilds both contact views in one transaction, then
    // publishes. Any error rolls the write back.
    fn mutate<T>(&self, write: impl FnOnce(&Connection) -> RepoResult<T>) -> RepoResult<T> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        let value = write(&tx)?;
        let views = load_views(&tx)?;
        tx.commit()?;
        self.publish(views);
        Ok(value)
    }

    fn publish(&self, (active, trashed): (Vec<Contact>, Vec<Contact>)) {
        debug!(
            "event=snapshot_publish module=repo active={} trashed={}",
            active.len(),
            trashed.len()
        );
        self.active.send_replace(active);
        self.trashed.send_replace(trashed);
    }
}

fn load_views(conn: &Connection) -> RepoResult<(Vec<Contact>, Vec<Contact>)> {
    Ok((load_contacts(conn, false)?, load_contacts(conn, true)?))
}

// Full scan per view: colors lookup, every contact row, filter, sort, map.
fn load_contacts(conn: &Connection, in_trash: bool) -> RepoResult<Vec<Contact>> {
    let colors = colors_by_id(SqliteColorDao::new(conn).all()?);
    let mut rows: Vec<ContactRow> = SqliteContactDao::new(conn)
        .all()?
        .into_iter()
        .filter(|row| row.is_in_trash == in_trash)
        .collect();
    rows.sort_by(|a, b| a.first_name.cmp(&b.first_name));
    Ok(to_domain_list(&rows, &colors)?)
}

fn seed_if_empty(conn: &Connection) -> RepoResult<SeedReport> {
    let mut report = SeedReport::default();

    let colors = SqliteColorDao::new(conn);
    if colors.count()? == 0 {
        colors.insert_all(&default_color_rows())?;
        report.colors_seeded = true;
    }

    let contacts = SqliteContactDao::new(conn);
    if contacts.count()? == 0 {
        contacts.insert_all(&default_contact_rows())?;
        report.contacts_seeded = true;
    }

    Ok(report)
}
