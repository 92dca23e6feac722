//! Translation between storage rows and domain objects.
//!
//! # Invariants
//! - Pure: no I/O, no logging.
//! - A contact row whose color id has no matching color row is an integrity
//!   fault; no substitute color is ever chosen.
//! - `can_be_checked_off = false` maps to `checked_off = None` regardless of
//!   the stored `is_checked_off` value.

use crate::model::color::{Color, ColorId};
use crate::model::contact::{Contact, ContactId, NEW_CONTACT_ID};
use crate::repo::dao::{ColorRow, ContactRow};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A contact row references a color id with no color row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferentialIntegrityError {
    pub contact_id: ContactId,
    pub color_id: ColorId,
}

impl Display for ReferentialIntegrityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "color {} referenced by contact {} was not found",
            self.color_id, self.contact_id
        )
    }
}

impl Error for ReferentialIntegrityError {}

/// Builds the id lookup used by [`to_domain`].
pub fn colors_by_id(rows: Vec<ColorRow>) -> HashMap<ColorId, ColorRow> {
    rows.into_iter().map(|row| (row.id, row)).collect()
}

/// Joins `row` with its color.
pub fn to_domain(
    row: &ContactRow,
    colors: &HashMap<ColorId, ColorRow>,
) -> Result<Contact, ReferentialIntegrityError> {
    let id = row.id.unwrap_or(NEW_CONTACT_ID);
    let color = colors
        .get(&row.color_id)
        .map(to_domain_color)
        .ok_or(ReferentialIntegrityError {
            contact_id: id,
            color_id: row.color_id,
        })?;

    Ok(Contact {
        id,
        first_name: row.first_name.clone(),
        middle_name: row.middle_name.clone(),
        last_name: row.last_name.clone(),
        phone_number: row.contact.clone(),
        tag: row.tag.clone(),
        checked_off: row.can_be_checked_off.then_some(row.is_checked_off),
        color,
        in_trash: row.is_in_trash,
    })
}

/// Maps every row, failing on the first unresolved color.
pub fn to_domain_list(
    rows: &[ContactRow],
    colors: &HashMap<ColorId, ColorRow>,
) -> Result<Vec<Contact>, ReferentialIntegrityError> {
    rows.iter().map(|row| to_domain(row, colors)).collect()
}

/// Produces the row to upsert for `contact`.
pub fn to_storage(contact: &Contact) -> ContactRow {
    ContactRow {
        id: (contact.id != NEW_CONTACT_ID).then_some(contact.id),
        first_name: contact.first_name.clone(),
        middle_name: contact.middle_name.clone(),
        last_name: contact.last_name.clone(),
        contact: contact.phone_number.clone(),
        tag: contact.tag.clone(),
        can_be_checked_off: contact.checked_off.is_some(),
        is_checked_off: contact.checked_off.unwrap_or(false),
        color_id: contact.color.id,
        is_in_trash: contact.in_trash,
    }
}

pub fn to_domain_color(row: &ColorRow) -> Color {
    Color {
        id: row.id,
        name: row.name.clone(),
        hex: row.hex.clone(),
    }
}

pub fn to_domain_color_list(rows: &[ColorRow]) -> Vec<Color> {
    rows.iter().map(to_domain_color).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn palette() -> HashMap<ColorId, ColorRow> {
        colors_by_id(vec![
            ColorRow {
                id: 1,
                name: "White".to_string(),
                hex: "#FFFFFF".to_string(),
            },
            ColorRow {
                id: 2,
                name: "Red".to_string(),
                hex: "#E57373".to_string(),
            },
        ])
    }

    fn row(id: ContactId, color_id: ColorId) -> ContactRow {
        ContactRow {
            id: Some(id),
            first_name: "Johnny".to_string(),
            middle_name: String::new(),
            last_name: "Depp".to_string(),
            contact: "3334445555".to_string(),
            tag: "Work".to_string(),
            can_be_checked_off: false,
            is_checked_off: false,
            color_id,
            is_in_trash: false,
        }
    }

    fn contact(checked_off: Option<bool>) -> Contact {
        Contact {
            id: 7,
            first_name: "Brat".to_string(),
            last_name: "Pitt".to_string(),
            phone_number: "4445556666".to_string(),
            tag: "Other".to_string(),
            checked_off,
            color: Color::new(2, "Red", "#E57373"),
            ..Contact::default()
        }
    }

    #[test]
    fn to_domain_joins_color() {
        let mapped = to_domain(&row(3, 2), &palette()).unwrap();
        assert_eq!(mapped.id, 3);
        assert_eq!(mapped.phone_number, "3334445555");
        assert_eq!(mapped.color, Color::new(2, "Red", "#E57373"));
        assert_eq!(mapped.checked_off, None);
    }

    #[test]
    fn to_domain_rejects_unknown_color() {
        let err = to_domain(&row(3, 42), &palette()).unwrap_err();
        assert_eq!(
            err,
            ReferentialIntegrityError {
                contact_id: 3,
                color_id: 42
            }
        );
    }

    #[test]
    fn to_domain_list_fails_without_partial_result() {
        let rows = vec![row(1, 1), row(2, 99), row(3, 2)];
        let err = to_domain_list(&rows, &palette()).unwrap_err();
        assert_eq!(err.contact_id, 2);
    }

    #[test]
    fn unsupported_checked_value_is_ignored() {
        let mut stored = row(4, 1);
        stored.can_be_checked_off = false;
        stored.is_checked_off = true;
        assert_eq!(to_domain(&stored, &palette()).unwrap().checked_off, None);

        stored.can_be_checked_off = true;
        assert_eq!(to_domain(&stored, &palette()).unwrap().checked_off, Some(true));
    }

    #[test]
    fn to_storage_derives_checkable_columns() {
        let absent = to_storage(&contact(None));
        assert!(!absent.can_be_checked_off);
        assert!(!absent.is_checked_off);

        let checked = to_storage(&contact(Some(true)));
        assert!(checked.can_be_checked_off);
        assert!(checked.is_checked_off);

        let unchecked = to_storage(&contact(Some(false)));
        assert!(unchecked.can_be_checked_off);
        assert!(!unchecked.is_checked_off);
    }

    #[test]
    fn to_storage_leaves_id_unset_for_new_contacts() {
        assert_eq!(to_storage(&Contact::default()).id, None);
        assert_eq!(to_storage(&contact(None)).id, Some(7));
    }

    #[test]
    fn storage_round_trip_preserves_contact() {
        let colors = palette();
        for checked_off in [None, Some(false), Some(true)] {
            for in_trash in [false, true] {
                let mut original = contact(checked_off);
                original.in_trash = in_trash;
                let back = to_domain(&to_storage(&original), &colors).unwrap();
                assert_eq!(back, original);
            }
        }

        let draft = Contact::default();
        assert_eq!(to_domain(&to_storage(&draft), &colors).unwrap(), draft);
    }

    #[test]
    fn color_list_is_copied_in_order() {
        let rows = vec![
            ColorRow {
                id: 5,
                name: "Blue".to_string(),
                hex: "#64B5F6".to_string(),
            },
            ColorRow {
                id: 1,
                name: "White".to_string(),
                hex: "#FFFFFF".to_string(),
            },
        ];
        let colors = to_domain_color_list(&rows);
        assert_eq!(colors.iter().map(|c| c.id).collect::<Vec<_>>(), vec![5, 1]);
        assert_eq!(colors[0].name, "Blue");
    }
}
