//! Default rows written into an empty store.

use crate::model::color::ColorId;
use crate::model::contact::ContactId;
use crate::repo::dao::{ColorRow, ContactRow};

struct SeedColor {
    id: ColorId,
    name: &'static str,
    hex: &'static str,
}

struct SeedContact {
    id: ContactId,
    first_name: &'static str,
    middle_name: &'static str,
    last_name: &'static str,
    contact: &'static str,
    tag: &'static str,
    color_id: ColorId,
}

const DEFAULT_COLORS: &[SeedColor] = &[
    SeedColor {
        id: 1,
        name: "White",
        hex: "#FFFFFF",
    },
    SeedColor {
        id: 2,
        name: "Red",
        hex: "#E57373",
    },
    SeedColor {
        id: 3,
        name: "Pink",
        hex: "#F06292",
    },
    SeedColor {
        id: 4,
        name: "Purple",
        hex: "#BA68C8",
    },
    SeedColor {
        id: 5,
        name: "Blue",
        hex: "#64B5F6",
    },
    SeedColor {
        id: 6,
        name: "Green",
        hex: "#81C784",
    },
    SeedColor {
        id: 7,
        name: "Yellow",
        hex: "#FFF176",
    },
];

const DEFAULT_CONTACTS: &[SeedContact] = &[
    SeedContact {
        id: 1,
        first_name: "Robert",
        middle_name: "Downey",
        last_name: "Jr",
        contact: "0001112222",
        tag: "Mobile",
        color_id: 1,
    },
    SeedContact {
        id: 2,
        first_name: "Dwayne",
        middle_name: "",
        last_name: "Johnson",
        contact: "1112223333",
        tag: "Home",
        color_id: 2,
    },
    SeedContact {
        id: 3,
        first_name: "Johnny",
        middle_name: "",
        last_name: "Depp",
        contact: "3334445555",
        tag: "Work",
        color_id: 3,
    },
    SeedContact {
        id: 4,
        first_name: "Brat",
        middle_name: "",
        last_name: "Pitt",
        contact: "4445556666",
        tag: "Other",
        color_id: 4,
    },
];

/// Palette written when the color table is empty.
pub fn default_color_rows() -> Vec<ColorRow> {
    DEFAULT_COLORS
        .iter()
        .map(|seed| ColorRow {
            id: seed.id,
            name: seed.name.to_string(),
            hex: seed.hex.to_string(),
        })
        .collect()
}

/// Sample contacts written when the contact table is empty.
///
/// None are checkable, none are trashed.
pub fn default_contact_rows() -> Vec<ContactRow> {
    DEFAULT_CONTACTS
        .iter()
        .map(|seed| ContactRow {
            id: Some(seed.id),
            first_name: seed.first_name.to_string(),
            middle_name: seed.middle_name.to_string(),
            last_name: seed.last_name.to_string(),
            contact: seed.contact.to_string(),
            tag: seed.tag.to_string(),
            can_be_checked_off: false,
            is_checked_off: false,
            color_id: seed.color_id,
            is_in_trash: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{default_color_rows, default_contact_rows};
    use crate::model::color::Color;
    use std::collections::HashSet;

    #[test]
    fn palette_ids_are_unique_and_hex_is_valid() {
        let rows = default_color_rows();
        let ids: HashSet<_> = rows.iter().map(|row| row.id).collect();
        assert_eq!(ids.len(), rows.len());
        for row in &rows {
            Color::new(row.id, row.name.clone(), row.hex.clone())
                .validate()
                .unwrap();
        }
    }

    #[test]
    fn every_seed_contact_references_a_seed_color() {
        let color_ids: HashSet<_> = default_color_rows().iter().map(|row| row.id).collect();
        let contacts = default_contact_rows();
        assert_eq!(contacts.len(), 4);
        for (index, contact) in contacts.iter().enumerate() {
            assert_eq!(contact.color_id, index as i64 + 1);
            assert!(color_ids.contains(&contact.color_id));
        }
    }
}
