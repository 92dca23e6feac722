//! View-state controller for the contacts, edit and trash screens.
//!
//! # Responsibility
//! - Own the edit draft, trash selection, trash tab, open dialog and screen.
//! - Translate user intents into repository calls.
//!
//! # Invariants
//! - Never writes storage directly; every write goes through the repository.
//! - The selection is cleared only after a batch operation succeeds.
//! - Setting the draft performs no validation.

use crate::model::color::Color;
use crate::model::contact::{Contact, ContactId, ContactInputError};
use crate::repo::phone_repo::PhoneBookRepository;
use crate::repo::{RepoError, RepoResult};
use crate::service::dialog::TrashDialog;
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::watch;

/// Screen the presentation layer should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Contacts,
    SaveContact,
    Trash,
}

/// Trash screen tabs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrashTab {
    /// Contacts without a checkbox.
    #[default]
    Regular,
    /// Contacts with a checkbox.
    Checkable,
}

impl TrashTab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Regular => "REGULAR",
            Self::Checkable => "CHECKABLE",
        }
    }

    fn includes(self, contact: &Contact) -> bool {
        match self {
            Self::Regular => !contact.is_checkable(),
            Self::Checkable => contact.is_checkable(),
        }
    }
}

pub struct PhoneBookController {
    repo: Arc<PhoneBookRepository>,
    draft: Contact,
    selection: BTreeSet<ContactId>,
    trash_tab: TrashTab,
    dialog: TrashDialog,
    screen: Screen,
}

impl PhoneBookController {
    pub fn new(repo: Arc<PhoneBookRepository>) -> Self {
        Self {
            repo,
            draft: Contact::default(),
            selection: BTreeSet::new(),
            trash_tab: TrashTab::default(),
            dialog: TrashDialog::default(),
            screen: Screen::default(),
        }
    }

    pub fn active_contacts(&self) -> watch::Receiver<Vec<Contact>> {
        self.repo.subscribe_active()
    }

    pub fn trashed_contacts(&self) -> watch::Receiver<Vec<Contact>> {
        self.repo.subscribe_trashed()
    }

    pub fn colors(&self) -> watch::Receiver<Vec<Color>> {
        self.repo.list_colors()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn draft(&self) -> &Contact {
        &self.draft
    }

    /// Whether the draft edits an already saved contact.
    pub fn is_editing(&self) -> bool {
        !self.draft.is_new()
    }

    /// Replaces the draft as typed by the user.
    pub fn set_draft(&mut self, contact: Contact) {
        self.draft = contact;
    }

    /// Input check the edit screen runs before [`commit_draft`](Self::commit_draft).
    pub fn validate_draft(&self) -> Result<(), ContactInputError> {
        self.draft.validate_input()
    }

    /// Saves `contact`, resets the draft and returns to the contact list.
    pub fn commit_draft(&mut self, contact: Contact) -> RepoResult<ContactId> {
        let id = self.repo.save(&contact)?;
        self.draft = Contact::default();
        self.screen = Screen::Contacts;
        Ok(id)
    }

    /// Starts a new entry and moves to the edit screen.
    pub fn request_new_draft(&mut self) -> Screen {
        self.draft = Contact::default();
        self.screen = Screen::SaveContact;
        self.screen
    }

    /// Opens an existing contact for editing.
    pub fn open_contact(&mut self, contact: Contact) -> Screen {
        self.draft = contact;
        self.screen = Screen::SaveContact;
        self.screen
    }

    /// Flips the checkbox of a checkable contact and saves it.
    ///
    /// Returns `false` without writing when the contact has no checkbox.
    pub fn toggle_checked_off(&mut self, contact: &Contact) -> RepoResult<bool> {
        let mut updated = contact.clone();
        if !updated.toggle_checked_off() {
            return Ok(false);
        }
        self.repo.save(&updated)?;
        Ok(true)
    }

    /// Trashes the contact being edited and returns to the contact list.
    ///
    /// # Errors
    /// - `NotFound` when the draft was never saved.
    pub fn move_draft_to_trash(&mut self) -> RepoResult<()> {
        if self.draft.is_new() {
            return Err(RepoError::NotFound(self.draft.id));
        }
        self.repo.move_to_trash(self.draft.id)?;
        self.draft = Contact::default();
        self.screen = Screen::Contacts;
        Ok(())
    }

    pub fn open_trash(&mut self) -> Screen {
        self.screen = Screen::Trash;
        self.screen
    }

    /// Back navigation: edit and trash both lead to the contact list.
    pub fn navigate_back(&mut self) -> Screen {
        self.dialog = TrashDialog::None;
        self.screen = Screen::Contacts;
        self.screen
    }

    pub fn trash_tab(&self) -> TrashTab {
        self.trash_tab
    }

    pub fn select_trash_tab(&mut self, tab: TrashTab) {
        self.trash_tab = tab;
    }

    /// Trashed contacts belonging to the current tab, in snapshot order.
    pub fn visible_trash(&self) -> Vec<Contact> {
        self.repo
            .trashed_contacts()
            .into_iter()
            .filter(|contact| self.trash_tab.includes(contact))
            .collect()
    }

    /// Adds `contact` to the selection, or removes it if already selected.
    pub fn toggle_selection(&mut self, contact: &Contact) {
        if !self.selection.remove(&contact.id) {
            self.selection.insert(contact.id);
        }
    }

    pub fn is_selected(&self, id: ContactId) -> bool {
        self.selection.contains(&id)
    }

    pub fn selection(&self) -> &BTreeSet<ContactId> {
        &self.selection
    }

    /// Restores the selected contacts and clears the selection.
    pub fn restore_selected(&mut self) -> RepoResult<usize> {
        let ids = self.selected_ids();
        let restored = self.repo.restore_from_trash(&ids)?;
        self.selection.clear();
        Ok(restored)
    }

    /// Hard-deletes the selected contacts and clears the selection.
    pub fn delete_selected_permanently(&mut self) -> RepoResult<usize> {
        let ids = self.selected_ids();
        let removed = self.repo.delete_permanently(&ids)?;
        self.selection.clear();
        Ok(removed)
    }

    pub fn dialog(&self) -> TrashDialog {
        self.dialog
    }

    pub fn open_dialog(&mut self, dialog: TrashDialog) {
        self.dialog = dialog;
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = TrashDialog::None;
    }

    /// Closes the open dialog and runs its action.
    ///
    /// Returns the affected contact count, `0` when no dialog was open.
    pub fn confirm_dialog(&mut self) -> RepoResult<usize> {
        let dialog = std::mem::take(&mut self.dialog);
        match dialog.confirm_action() {
            Some(action) => action(self),
            None => Ok(0),
        }
    }

    fn selected_ids(&self) -> Vec<ContactId> {
        self.selection.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{PhoneBookController, Screen, TrashTab};
    use crate::db::open_db_in_memory;
    use crate::model::contact::Contact;
    use crate::repo::phone_repo::PhoneBookRepository;
    use crate::service::dialog::TrashDialog;
    use std::sync::Arc;

    fn controller() -> PhoneBookController {
        let repo = PhoneBookRepository::try_new(open_db_in_memory().unwrap()).unwrap();
        repo.initialize().unwrap();
        PhoneBookController::new(Arc::new(repo))
    }

    #[test]
    fn new_draft_resets_and_navigates_to_edit() {
        let mut controller = controller();
        let mut edited = Contact::default();
        edited.first_name = "half typed".to_string();
        controller.set_draft(edited);

        assert_eq!(controller.request_new_draft(), Screen::SaveContact);
        assert_eq!(controller.draft(), &Contact::default());
        assert!(!controller.is_editing());
    }

    #[test]
    fn selection_toggles_membership() {
        let mut controller = controller();
        let contact = Contact {
            id: 3,
            ..Contact::default()
        };

        controller.toggle_selection(&contact);
        assert!(controller.is_selected(3));
        controller.toggle_selection(&contact);
        assert!(!controller.is_selected(3));
        assert!(controller.selection().is_empty());
    }

    #[test]
    fn trash_tabs_split_by_checkable_flag() {
        let mut controller = controller();
        let mut checkable = controller.active_contacts().borrow()[0].clone();
        checkable.checked_off = Some(false);
        controller.commit_draft(checkable.clone()).unwrap();
        controller.repo.move_to_trash(checkable.id).unwrap();
        controller.repo.move_to_trash(2).unwrap();

        controller.open_trash();
        assert_eq!(controller.trash_tab().label(), "REGULAR");
        let regular: Vec<_> = controller.visible_trash().iter().map(|c| c.id).collect();
        assert_eq!(regular, vec![2]);

        controller.select_trash_tab(TrashTab::Checkable);
        let checkable_ids: Vec<_> = controller.visible_trash().iter().map(|c| c.id).collect();
        assert_eq!(checkable_ids, vec![checkable.id]);
    }

    #[test]
    fn dismissing_dialog_runs_nothing() {
        let mut controller = controller();
        controller.repo.move_to_trash(1).unwrap();
        controller.toggle_selection(&Contact {
            id: 1,
            ..Contact::default()
        });

        controller.open_dialog(TrashDialog::ConfirmPermanentDelete);
        controller.dismiss_dialog();
        assert_eq!(controller.confirm_dialog().unwrap(), 0);
        assert_eq!(controller.repo.trashed_contacts().len(), 1);
        assert!(controller.is_selected(1));
    }
}
