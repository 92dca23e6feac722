//! FFI use-case API for the Flutter phone book UI.
//!
//! # Responsibility
//! - Expose contact list, save and trash commands as flat sync calls.
//! - Own the process-wide repository opened by `phonebook_open`.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Failures are reported in response envelopes, never as panics.

use log::{error, info};
use phonebook_core::db::{open_db, DB_FILE_NAME};
use phonebook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    Color, Contact, PhoneBookRepository, RepoResult,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

struct OpenStore {
    db_path: PathBuf,
    repo: PhoneBookRepository,
}

static STORE: OnceLock<OpenStore> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// One contact row for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub id: i64,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub tag: String,
    /// Whether the row shows a checkbox.
    pub checkable: bool,
    /// Meaningful only when `checkable` is true.
    pub checked: bool,
    pub color_id: i64,
    pub color_hex: String,
    pub in_trash: bool,
}

/// One palette entry for the color picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorItem {
    pub id: i64,
    pub name: String,
    pub hex: String,
}

/// Edit-screen input for `contact_save` and `contact_validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactInput {
    /// `-1` for a new contact.
    pub id: i64,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub tag: String,
    pub checkable: bool,
    pub checked: bool,
    pub color_id: i64,
    /// Keeps a trashed contact in trash when it is re-saved.
    pub in_trash: bool,
}

/// List response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    pub items: Vec<ContactItem>,
    pub message: String,
}

/// Command response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    /// Saved contact id, for `contact_save`.
    pub contact_id: Option<i64>,
    /// Number of contacts the command touched.
    pub affected: u32,
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: Option<i64>, affected: usize) -> Self {
        Self {
            ok: true,
            contact_id,
            affected: u32::try_from(affected).unwrap_or(u32::MAX),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            contact_id: None,
            affected: 0,
            message: message.into(),
        }
    }
}

/// Opens `<db_dir>/phone_book.sqlite3`, seeds defaults and keeps the
/// repository for later calls.
///
/// Repeated calls with the same directory are no-ops; another directory is
/// rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn phonebook_open(db_dir: String) -> ContactActionResponse {
    let db_path = PathBuf::from(db_dir.trim()).join(DB_FILE_NAME);
    if let Some(store) = STORE.get() {
        return already_open_response(Some(store), &db_path);
    }

    let opened = open_db(&db_path)
        .map_err(|err| err.to_string())
        .and_then(|conn| PhoneBookRepository::try_new(conn).map_err(|err| err.to_string()))
        .and_then(|repo| {
            repo.initialize()
                .map(|report| (repo, report))
                .map_err(|err| err.to_string())
        });

    match opened {
        Ok((repo, report)) => {
            info!(
                "event=ffi_open module=ffi status=ok colors_seeded={} contacts_seeded={}",
                report.colors_seeded, report.contacts_seeded
            );
            match STORE.set(OpenStore {
                db_path: db_path.clone(),
                repo,
            }) {
                Ok(()) => ContactActionResponse::success("Phone book opened.", None, 0),
                // A concurrent open won; answer as the fast path would.
                Err(_) => already_open_response(STORE.get(), &db_path),
            }
        }
        Err(err) => {
            error!("event=ffi_open module=ffi status=error error={err}");
            ContactActionResponse::failure(format!("phonebook_open failed: {err}"))
        }
    }
}

/// Lists active (`in_trash = false`) or trashed contacts, sorted by first name.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list(in_trash: bool) -> ContactListResponse {
    let Some(repo) = opened_repo() else {
        return ContactListResponse {
            ok: false,
            items: Vec::new(),
            message: not_open_message("contacts_list"),
        };
    };

    let contacts = if in_trash {
        repo.trashed_contacts()
    } else {
        repo.active_contacts()
    };
    let items = contacts.iter().map(to_contact_item).collect::<Vec<_>>();
    ContactListResponse {
        ok: true,
        message: format!("Found {} contact(s).", items.len()),
        items,
    }
}

/// Lists the color palette; empty when the store is not open.
#[flutter_rust_bridge::frb(sync)]
pub fn colors_list() -> Vec<ColorItem> {
    opened_repo()
        .map(|repo| repo.colors().iter().map(to_color_item).collect())
        .unwrap_or_default()
}

/// Checks edit-screen input. Returns an empty string when it is valid,
/// otherwise the message to show in the invalid-input dialog.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_validate(input: ContactInput) -> String {
    let contact = to_contact(&input, Color::default());
    match contact.validate_input() {
        Ok(()) => String::new(),
        Err(err) => err.user_message().to_string(),
    }
}

/// Inserts or replaces a contact. Does not validate input.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_save(input: ContactInput) -> ContactActionResponse {
    let Some(repo) = opened_repo() else {
        return ContactActionResponse::failure(not_open_message("contact_save"));
    };
    let Some(color) = repo
        .colors()
        .into_iter()
        .find(|color| color.id == input.color_id)
    else {
        return ContactActionResponse::failure(format!(
            "contact_save failed: unknown color {}",
            input.color_id
        ));
    };

    respond("contact_save", repo.save(&to_contact(&input, color)), |id| {
        ContactActionResponse::success("Contact saved.", Some(id), 1)
    })
}

/// Moves one contact to trash.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_move_to_trash(contact_id: i64) -> ContactActionResponse {
    let Some(repo) = opened_repo() else {
        return ContactActionResponse::failure(not_open_message("contact_move_to_trash"));
    };
    respond("contact_move_to_trash", repo.move_to_trash(contact_id), |()| {
        ContactActionResponse::success("Contact moved to trash.", Some(contact_id), 1)
    })
}

/// Restores contacts from trash; unknown ids are skipped.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_restore(contact_ids: Vec<i64>) -> ContactActionResponse {
    let Some(repo) = opened_repo() else {
        return ContactActionResponse::failure(not_open_message("contacts_restore"));
    };
    respond(
        "contacts_restore",
        repo.restore_from_trash(&contact_ids),
        |restored| ContactActionResponse::success("Contacts restored.", None, restored),
    )
}

/// Deletes contacts forever.
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_delete_permanently(contact_ids: Vec<i64>) -> ContactActionResponse {
    let Some(repo) = opened_repo() else {
        return ContactActionResponse::failure(not_open_message("contacts_delete_permanently"));
    };
    respond(
        "contacts_delete_permanently",
        repo.delete_permanently(&contact_ids),
        |removed| ContactActionResponse::success("Contacts deleted.", None, removed),
    )
}

fn already_open_response(store: Option<&OpenStore>, db_path: &Path) -> ContactActionResponse {
    match store {
        Some(store) if store.db_path.as_path() == db_path => {
            ContactActionResponse::success("Phone book already open.", None, 0)
        }
        Some(store) => ContactActionResponse::failure(format!(
            "phonebook_open failed: already open at `{}`",
            store.db_path.display()
        )),
        None => ContactActionResponse::failure("phonebook_open failed: store was not set"),
    }
}

fn opened_repo() -> Option<&'static PhoneBookRepository> {
    STORE.get().map(|store| &store.repo)
}

fn not_open_message(operation: &str) -> String {
    format!("{operation} failed: phone book is not open; call phonebook_open first")
}

fn respond<T>(
    operation: &str,
    result: RepoResult<T>,
    on_ok: impl FnOnce(T) -> ContactActionResponse,
) -> ContactActionResponse {
    match result {
        Ok(value) => on_ok(value),
        Err(err) => {
            error!("event=ffi_call module=ffi status=error op={operation} error={err}");
            ContactActionResponse::failure(format!("{operation} failed: {err}"))
        }
    }
}

fn to_contact(input: &ContactInput, color: Color) -> Contact {
    Contact {
        id: input.id,
        first_name: input.first_name.clone(),
        middle_name: input.middle_name.clone(),
        last_name: input.last_name.clone(),
        phone_number: input.phone_number.clone(),
        tag: input.tag.clone(),
        checked_off: input.checkable.then_some(input.checked),
        color,
        in_trash: input.in_trash,
    }
}

fn to_contact_item(contact: &Contact) -> ContactItem {
    ContactItem {
        id: contact.id,
        first_name: contact.first_name.clone(),
        middle_name: contact.middle_name.clone(),
        last_name: contact.last_name.clone(),
        phone_number: contact.phone_number.clone(),
        tag: contact.tag.clone(),
        checkable: contact.is_checkable(),
        checked: contact.checked_off.unwrap_or(false),
        color_id: contact.color.id,
        color_hex: contact.color.hex.clone(),
        in_trash: contact.in_trash,
    }
}

fn to_color_item(color: &Color) -> ColorItem {
    ColorItem {
        id: color.id,
        name: color.name.clone(),
        hex: color.hex.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        already_open_response, contact_validate, to_contact, to_contact_item, ContactInput,
        OpenStore,
    };
    use phonebook_core::db::open_db_in_memory;
    use phonebook_core::{Color, PhoneBookRepository};
    use std::path::{Path, PathBuf};

    fn input() -> ContactInput {
        ContactInput {
            id: -1,
            first_name: "Keanu".to_string(),
            middle_name: String::new(),
            last_name: "Reeves".to_string(),
            phone_number: "7778889999".to_string(),
            tag: "Friend".to_string(),
            checkable: false,
            checked: true,
            color_id: 1,
            in_trash: false,
        }
    }

    #[test]
    fn unchecked_input_maps_to_non_checkable_contact() {
        let contact = to_contact(&input(), Color::default());
        assert!(contact.is_new());
        assert_eq!(contact.checked_off, None);

        let item = to_contact_item(&contact);
        assert!(!item.checkable);
        assert!(!item.checked);
    }

    #[test]
    fn validate_returns_dialog_message() {
        assert_eq!(contact_validate(input()), "");

        let mut bad = input();
        bad.phone_number = "777-888".to_string();
        assert_eq!(
            contact_validate(bad),
            "Phone number should contains only digits"
        );
    }

    #[test]
    fn commands_fail_cleanly_before_open() {
        let response = super::contact_move_to_trash(1);
        assert!(!response.ok);
        assert!(response.message.contains("phonebook_open"));
    }

    #[test]
    fn open_in_another_directory_is_rejected() {
        let store = OpenStore {
            db_path: PathBuf::from("/data/a/phone_book.sqlite3"),
            repo: PhoneBookRepository::try_new(open_db_in_memory().unwrap()).unwrap(),
        };

        let same = already_open_response(Some(&store), Path::new("/data/a/phone_book.sqlite3"));
        assert!(same.ok);

        let other = already_open_response(Some(&store), Path::new("/data/b/phone_book.sqlite3"));
        assert!(!other.ok);
        assert!(other.message.contains("/data/a"));
    }
}
