//! Core pipeline constants and the row-highlight color tags.
//!
//! This module pins down the fixed 13-column base layout of a parsed
//! CanView log and the closed set of color tags a filter rule may assign.

use std::str::FromStr;

use strum::{AsRefStr, EnumString};

// ============================================================================
// Constants
// ============================================================================

/// Column indices of the fixed base layout
pub const COL_TIME: usize = 0;
pub const COL_DELTA: usize = 1;
pub const COL_DESCRIPTION: usize = 2;
pub const COL_ID: usize = 3;
pub const COL_D0: usize = 4;
pub const COL_COLOUR: usize = 12;

/// Number of data-byte columns (D0..D7)
pub const DATA_BYTE_COUNT: usize = 8;

/// Width of one rendered data byte in the fixed-width log, in characters
pub const DATA_BYTE_WIDTH: usize = 2;

/// Base column count of a freshly parsed log (Time..Colour)
pub const BASE_COLUMN_COUNT: usize = 13;

/// Ordered base column names of a parsed CanView log
pub fn base_column_names() -> Vec<String> {
    [
        "Time",
        "Delta",
        "Description",
        "ID",
        "D0",
        "D1",
        "D2",
        "D3",
        "D4",
        "D5",
        "D6",
        "D7",
        "Colour",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

// ============================================================================
// Color tags
// ============================================================================

/// Row-highlight colors a filter rule may carry, matching the CanView tag set
#[derive(AsRefStr, Clone, Copy, Debug, EnumString, PartialEq, Eq)]
pub enum ColorTag {
    #[strum(serialize = "RED")]
    Red,
    #[strum(serialize = "GREEN")]
    Green,
    #[strum(serialize = "BLUE")]
    Blue,
    #[strum(serialize = "YELLOW")]
    Yellow,
    #[strum(serialize = "GREY")]
    Grey,
    #[strum(serialize = "PURPLE")]
    Purple,
    #[strum(serialize = "ORANGE")]
    Orange,
    #[strum(serialize = "PINK")]
    Pink,
    #[strum(serialize = "LIGHT_RED")]
    LightRed,
    #[strum(serialize = "LIGHT_GREEN")]
    LightGreen,
    #[strum(serialize = "LIGHT_BLUE")]
    LightBlue,
    #[strum(serialize = "LIGHT_YELLOW")]
    LightYellow,
    #[strum(serialize = "LIGHT_GREY")]
    LightGrey,
    #[strum(serialize = "LIGHT_PURPLE")]
    LightPurple,
    #[strum(serialize = "LIGHT_ORANGE")]
    LightOrange,
    #[strum(serialize = "LIGHT_PINK")]
    LightPink,
}

impl ColorTag {
    /// RGB used when a display layer paints a row carrying this tag
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            ColorTag::Red => [220, 0, 0],
            ColorTag::Green => [0, 220, 0],
            ColorTag::Blue => [0, 128, 255],
            ColorTag::Yellow => [255, 255, 0],
            ColorTag::Grey => [190, 190, 190],
            ColorTag::Purple => [255, 0, 255],
            ColorTag::Orange => [255, 128, 64],
            ColorTag::Pink => [255, 100, 177],
            ColorTag::LightRed => [255, 125, 125],
            ColorTag::LightGreen => [213, 255, 213],
            ColorTag::LightBlue => [170, 213, 255],
            ColorTag::LightYellow => [255, 255, 190],
            ColorTag::LightGrey => [223, 223, 223],
            ColorTag::LightPurple => [255, 150, 255],
            ColorTag::LightOrange => [255, 165, 121],
            ColorTag::LightPink => [255, 170, 213],
        }
    }

    /// Map a raw tag string from a filter rule to an RGB value.
    ///
    /// Unknown or empty tags render as white; the raw string is still kept
    /// in the table so unrecognized tags round-trip untouched.
    pub fn rgb_for_tag(tag: &str) -> [u8; 3] {
        match ColorTag::from_str(tag) {
            Ok(color) => color.rgb(),
            Err(_) => [255, 255, 255],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_parsing() {
        assert_eq!(ColorTag::from_str("RED"), Ok(ColorTag::Red));
        assert_eq!(ColorTag::from_str("LIGHT_BLUE"), Ok(ColorTag::LightBlue));
        assert!(ColorTag::from_str("MAROON").is_err());
        assert!(ColorTag::from_str("").is_err());
    }

    #[test]
    fn test_rgb_for_tag_defaults_to_white() {
        assert_eq!(ColorTag::rgb_for_tag("GREEN"), [0, 220, 0]);
        assert_eq!(ColorTag::rgb_for_tag(""), [255, 255, 255]);
        assert_eq!(ColorTag::rgb_for_tag("NO_SUCH_TAG"), [255, 255, 255]);
    }

    #[test]
    fn test_tag_round_trips_through_strum() {
        assert_eq!(ColorTag::LightOrange.as_ref(), "LIGHT_ORANGE");
        assert_eq!(
            ColorTag::from_str(ColorTag::Grey.as_ref()),
            Ok(ColorTag::Grey)
        );
    }

    #[test]
    fn test_base_columns() {
        let names = base_column_names();
        assert_eq!(names.len(), BASE_COLUMN_COUNT);
        assert_eq!(names[COL_TIME], "Time");
        assert_eq!(names[COL_ID], "ID");
        assert_eq!(names[COL_D0], "D0");
        assert_eq!(names[COL_COLOUR], "Colour");
    }
}
