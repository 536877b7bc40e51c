//! The 16-entry tileset palette. Indices 0..6 and 15 are defined colors;
//! every other index (7..14) renders as black, matching the source's
//! fallback arm in `simple-game/system.rs`'s `color()` (everything past its
//! last named case collapses to a single fallback color).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const BLACK: Rgb = Rgb(0x00, 0x00, 0x00);
pub const WHITE: Rgb = Rgb(0xFF, 0xFF, 0xFF);
pub const GREY: Rgb = Rgb(0x80, 0x80, 0x80);
pub const DARK_BLUE: Rgb = Rgb(0x1D, 0x2B, 0x53);
pub const LIGHT_BLUE: Rgb = Rgb(0x29, 0xAD, 0xFF);
pub const DARK_GREEN: Rgb = Rgb(0x00, 0x7F, 0x2A);
pub const LIGHT_GREEN: Rgb = Rgb(0x00, 0xE4, 0x36);
/// Entry 15: the transparent key. Rendered here for completeness, but a
/// renderer compositing sprites over a background should skip drawing a
/// pixel at this index rather than painting magenta.
pub const TRANSPARENT_KEY: Rgb = Rgb(0xFF, 0x00, 0xFF);

/// Maps a 4-bit tileset pixel value (0..15) to its display color. Indices
/// outside the defined set (7..14) render as black rather than erroring —
/// an undefined palette slot is a content bug, not a VM fault.
pub fn color_for_index(index: u8) -> Rgb {
    match index & 0x0F {
        0 => BLACK,
        1 => WHITE,
        2 => GREY,
        3 => DARK_BLUE,
        4 => LIGHT_BLUE,
        5 => DARK_GREEN,
        6 => LIGHT_GREEN,
        15 => TRANSPARENT_KEY,
        _ => BLACK,
    }
}

/// Splits a tileset byte into its two 4-bit pixels, high nibble first
/// (matching the tileset's "two 4-bit pixels per byte" layout).
pub fn unpack_pixels(byte: u8) -> (u8, u8) {
    (byte >> 4, byte & 0x0F)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_defined_indices_are_distinct() {
        let colors = [
            color_for_index(0),
            color_for_index(1),
            color_for_index(2),
            color_for_index(3),
            color_for_index(4),
            color_for_index(5),
            color_for_index(6),
            color_for_index(15),
        ];
        for (i, a) in colors.iter().enumerate() {
            for (j, b) in colors.iter().enumerate() {
                if i != j {
                    assert_ne!(a, b, "palette indices {i} and {j} collide");
                }
            }
        }
    }

    #[test]
    fn test_undefined_indices_render_black() {
        for index in 7..=14 {
            assert_eq!(color_for_index(index), BLACK);
        }
    }

    #[test]
    fn test_unpack_pixels_splits_nibbles_high_first() {
        assert_eq!(unpack_pixels(0xAB), (0xA, 0xB));
    }
}
