//! Color tag model.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("valid hex color regex"));

/// Storage identifier of a color.
pub type ColorId = i64;

/// Id of the color assigned to fresh drafts.
pub const DEFAULT_COLOR_ID: ColorId = 1;

/// Named color tag attached to contacts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub id: ColorId,
    pub name: String,
    /// `#RRGGBB`.
    pub hex: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidHexColor(pub String);

impl Display for InvalidHexColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid color hex `{}`; expected #RRGGBB", self.0)
    }
}

impl Error for InvalidHexColor {}

impl Color {
    pub fn new(id: ColorId, name: impl Into<String>, hex: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hex: hex.into(),
        }
    }

    /// Checks that `hex` is a `#RRGGBB` code.
    pub fn validate(&self) -> Result<(), InvalidHexColor> {
        if HEX_COLOR_RE.is_match(&self.hex) {
            Ok(())
        } else {
            Err(InvalidHexColor(self.hex.clone()))
        }
    }

    /// Parses `hex` into `(r, g, b)` components.
    pub fn rgb(&self) -> Result<(u8, u8, u8), InvalidHexColor> {
        self.validate()?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&self.hex[range], 16).map_err(|_| InvalidHexColor(self.hex.clone()))
        };
        Ok((channel(1..3)?, channel(3..5)?, channel(5..7)?))
    }
}

impl Default for Color {
    /// The first seeded palette entry.
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_ID, "White", "#FFFFFF")
    }
}
