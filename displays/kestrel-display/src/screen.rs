//! Character screen buffer

use heapless::String;

/// Character rows on a 128×64 panel with an 8 px font
pub const SCREEN_ROWS: usize = 8;

/// Character columns on a 128×64 panel with a 6 px cell
pub const SCREEN_COLS: usize = 21;

/// Text-mode screen contents
///
/// Composed in memory, then painted onto a `DisplayBackend` in one pass.
#[derive(Clone)]
pub struct Screen {
    lines: [String<SCREEN_COLS>; SCREEN_ROWS],
    /// Inverted column range per row (start, end exclusive)
    highlights: [Option<(u8, u8)>; SCREEN_ROWS],
    dirty: bool,
}

impl Default for Screen {
    fn default() -> Self {
        Self::new()
    }
}

impl Screen {
    pub fn new() -> Self {
        Self {
            lines: core::array::from_fn(|_| String::new()),
            highlights: [None; SCREEN_ROWS],
            dirty: true,
        }
    }

    pub fn clear(&mut self) {
        self.lines.iter_mut().for_each(String::clear);
        self.highlights = [None; SCREEN_ROWS];
        self.dirty = true;
    }

    /// Replace a row, clipping at `SCREEN_COLS` characters
    pub fn set_line(&mut self, row: usize, text: &str) {
        let Some(line) = self.lines.get_mut(row) else {
            return;
        };
        line.clear();
        for ch in text.chars() {
            if line.push(ch).is_err() {
                break;
            }
        }
        self.dirty = true;
    }

    pub fn line(&self, row: usize) -> Option<&str> {
        self.lines.get(row).map(String::as_str)
    }

    /// Invert `start_col..end_col` of a row
    pub fn set_highlight(&mut self, row: usize, start_col: u8, end_col: u8) {
        if let Some(highlight) = self.highlights.get_mut(row) {
            *highlight = Some((start_col, end_col.min(SCREEN_COLS as u8)));
            self.dirty = true;
        }
    }

    pub fn highlight(&self, row: usize) -> Option<(u8, u8)> {
        self.highlights.get(row).copied().flatten()
    }

    /// First highlighted row
    pub fn highlighted_row(&self) -> Option<usize> {
        self.highlights.iter().position(Option::is_some)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Screen {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Screen[");
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                defmt::write!(f, " | ");
            }
            defmt::write!(f, "{}", line.as_str());
        }
        defmt::write!(f, "]");
    }
}
