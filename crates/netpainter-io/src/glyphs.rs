//! 8x8 bitmap glyphs from `font8x8` used for all text on the raster surface.
//!
//! Characters outside basic ASCII render as `?`.

use font8x8::legacy::BASIC_LEGACY;

pub const GLYPH_COLUMNS: u32 = 8;
pub const GLYPH_ROWS: u32 = 8;
/// Rows above the baseline; the last row holds descenders.
pub const ASCENT_ROWS: u32 = 7;
/// Horizontal pen advance per character, in glyph cells.
pub const ADVANCE_COLUMNS: u32 = 8;

/// Glyph cell edge length for a font size.
pub fn cell_size(font_size: f64) -> f64 {
    font_size / 10.0
}

/// Row bitmaps, top row first; bit 0 is the leftmost column.
pub fn glyph(c: char) -> [u8; 8] {
    let index = c as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

/// Top-left corners (in cell units, relative to the glyph's top-left) of
/// every lit cell of `c`.
pub fn lit_cells(c: char) -> impl Iterator<Item = (u32, u32)> {
    let rows = glyph(c);
    (0..GLYPH_ROWS).flat_map(move |row| {
        (0..GLYPH_COLUMNS)
            .filter(move |&col| (rows[row as usize] >> col) & 0x01 != 0)
            .map(move |col| (col, row))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_is_preserved() {
        assert_ne!(glyph('r'), glyph('R'));
        assert_ne!(glyph('a'), glyph('A'));
        assert_eq!(lit_cells(' ').count(), 0);
    }

    #[test]
    fn test_symbols_have_shapes() {
        for c in ['%', '#', ',', '=', '[', '*', '0', '9'] {
            assert!(lit_cells(c).count() > 0, "{c:?} has no lit cells");
        }
    }

    #[test]
    fn test_non_ascii_falls_back() {
        assert_eq!(glyph('é'), glyph('?'));
        assert_eq!(glyph('→'), BASIC_LEGACY[b'?' as usize]);
    }

    #[test]
    fn test_lit_cells_follow_bits() {
        let rows = glyph('-');
        let cells: Vec<(u32, u32)> = lit_cells('-').collect();
        assert!(!cells.is_empty());
        for (col, row) in cells {
            assert!(col < GLYPH_COLUMNS && row < GLYPH_ROWS);
            assert_ne!((rows[row as usize] >> col) & 1, 0);
        }
    }
}
