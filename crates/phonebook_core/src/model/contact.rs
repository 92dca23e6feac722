//! Contact domain model.
//!
//! # Responsibility
//! - Define the phone-book entry shared by list, edit and trash views.
//! - Provide soft-delete helpers and input checks used before saving.
//!
//! # Invariants
//! - `id == NEW_CONTACT_ID` means the contact has never been persisted.
//! - `checked_off == None` means the contact is not checkable at all.
//! - `in_trash` is the only source of truth for trash state.

use crate::model::color::Color;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static DIGITS_ONLY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits regex"));

/// Storage identifier of a contact.
pub type ContactId = i64;

/// Sentinel id of a contact that has not been saved yet.
pub const NEW_CONTACT_ID: ContactId = -1;

/// One phone-book entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub first_name: String,
    /// May be empty.
    pub middle_name: String,
    pub last_name: String,
    /// Free text; digits-only is enforced by [`Contact::validate_input`], not storage.
    pub phone_number: String,
    pub tag: String,
    /// `None`: no checkbox. `Some(checked)`: checkable, currently `checked`.
    pub checked_off: Option<bool>,
    pub color: Color,
    pub in_trash: bool,
}

impl Default for Contact {
    /// A fresh, unsaved draft with the default color.
    fn default() -> Self {
        Self {
            id: NEW_CONTACT_ID,
            first_name: String::new(),
            middle_name: String::new(),
            last_name: String::new(),
            phone_number: String::new(),
            tag: String::new(),
            checked_off: None,
            color: Color::default(),
            in_trash: false,
        }
    }
}

/// Field names reported by [`ContactInputError::EmptyRequiredField`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    FirstName,
    PhoneNumber,
    Tag,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FirstName => "first_name",
            Self::PhoneNumber => "phone_number",
            Self::Tag => "tag",
        }
    }
}

/// User-facing input problems detected before a save is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactInputError {
    EmptyRequiredField(ContactField),
    NonNumericPhoneNumber,
}

impl ContactInputError {
    /// Message shown to the user in the invalid-input dialog.
    pub fn user_message(self) -> &'static str {
        match self {
            Self::EmptyRequiredField(_) => "Please provide data (Data can't be empty)",
            Self::NonNumericPhoneNumber => "Phone number should contains only digits",
        }
    }
}

impl Display for ContactInputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyRequiredField(field) => {
                write!(f, "required field `{}` is empty", field.as_str())
            }
            Self::NonNumericPhoneNumber => write!(f, "phone number must contain only digits"),
        }
    }
}

impl Error for ContactInputError {}

impl Contact {
    /// Whether this contact has never been saved.
    pub fn is_new(&self) -> bool {
        self.id == NEW_CONTACT_ID
    }

    /// Whether the contact shows a checkbox.
    pub fn is_checkable(&self) -> bool {
        self.checked_off.is_some()
    }

    /// First, middle and last name joined by single spaces, skipping empty parts.
    pub fn display_name(&self) -> String {
        [
            self.first_name.as_str(),
            self.middle_name.as_str(),
            self.last_name.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(" ")
    }

    /// Marks the contact as trashed.
    pub fn move_to_trash(&mut self) {
        self.in_trash = true;
    }

    /// Clears the trash flag.
    pub fn restore(&mut self) {
        self.in_trash = false;
    }

    /// Flips the checked state of a checkable contact.
    ///
    /// Returns `false` and leaves the contact untouched when it is not checkable.
    pub fn toggle_checked_off(&mut self) -> bool {
        match self.checked_off {
            Some(checked) => {
                self.checked_off = Some(!checked);
                true
            }
            None => false,
        }
    }

    /// Checks the fields the edit screen requires before saving.
    ///
    /// # Errors
    /// - `EmptyRequiredField` for an empty first name, phone number or tag,
    ///   checked in that order.
    /// - `NonNumericPhoneNumber` when the phone number has non-digit characters.
    pub fn validate_input(&self) -> Result<(), ContactInputError> {
        let required = [
            (ContactField::FirstName, &self.first_name),
            (ContactField::PhoneNumber, &self.phone_number),
            (ContactField::Tag, &self.tag),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
            return Err(ContactInputError::EmptyRequiredField(*field));
        }
        if !DIGITS_ONLY_RE.is_match(&self.phone_number) {
            return Err(ContactInputError::NonNumericPhoneNumber);
        }
        Ok(())
    }
}
