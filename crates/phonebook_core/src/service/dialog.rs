//! Trash-screen confirmation dialogs.

use crate::repo::RepoResult;
use crate::service::view_state::PhoneBookController;

/// Action run when a dialog is confirmed; returns the affected contact count.
pub type ConfirmAction = fn(&mut PhoneBookController) -> RepoResult<usize>;

/// Dialog currently shown on the trash screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TrashDialog {
    #[default]
    None,
    ConfirmRestore,
    ConfirmPermanentDelete,
}

impl TrashDialog {
    pub fn is_open(self) -> bool {
        self != Self::None
    }

    pub fn title(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::ConfirmRestore => Some("Restore contacts"),
            Self::ConfirmPermanentDelete => Some("Delete contacts forever"),
        }
    }

    pub fn text(self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::ConfirmRestore => Some("Are you sure you want to restore selected contacts?"),
            Self::ConfirmPermanentDelete => {
                Some("Are you sure you want to delete selected contacts permanently?")
            }
        }
    }

    pub fn confirm_action(self) -> Option<ConfirmAction> {
        match self {
            Self::None => None,
            Self::ConfirmRestore => Some(PhoneBookController::restore_selected),
            Self::ConfirmPermanentDelete => Some(PhoneBookController::delete_selected_permanently),
        }
    }
}
