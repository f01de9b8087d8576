//! Menu renderer
//!
//! Layout on the 8-row screen:
//! - Row 0: title
//! - Rows 1-7: list window, scrolled so the selection stays visible
//!
//! The selected row is drawn as `> label` and inverted across the full
//! width; other rows are indented by two spaces to line up.

use heapless::String;
use kestrel_core::traits::{RenderError, RenderGateway};

use crate::backend::{DisplayBackend, DisplayError};
use crate::screen::{Screen, SCREEN_COLS, SCREEN_ROWS};

/// Rows available for list items
pub const LIST_ROWS: usize = SCREEN_ROWS - 1;

const EMPTY_TEXT: &str = "(empty)";

/// `RenderGateway` that paints titled lists through a `DisplayBackend`
pub struct MenuRenderer<B> {
    backend: B,
    screen: Screen,
}

impl<B: DisplayBackend> MenuRenderer<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            screen: Screen::new(),
        }
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// Lay out a titled list on the screen buffer
    pub fn compose(&mut self, title: &str, items: &[&str], selected: Option<usize>) {
        self.screen.clear();
        self.screen.set_line(0, title);

        if items.is_empty() {
            self.screen.set_line(1, EMPTY_TEXT);
            return;
        }

        let first = window_start(items.len(), selected);
        for (offset, label) in items.iter().skip(first).take(LIST_ROWS).enumerate() {
            let row = offset + 1;
            let index = first + offset;
            let marker = if selected == Some(index) { "> " } else { "  " };

            let mut line: String<SCREEN_COLS> = String::new();
            let _ = line.push_str(marker);
            for ch in label.chars() {
                if line.push(ch).is_err() {
                    break;
                }
            }
            self.screen.set_line(row, &line);

            if selected == Some(index) {
                self.screen.set_highlight(row, 0, SCREEN_COLS as u8);
            }
        }
    }

    /// Push the screen buffer to the backend
    pub fn paint(&mut self) -> Result<(), DisplayError> {
        if !self.backend.is_ready() {
            return Err(DisplayError::NotInitialized);
        }

        self.backend.clear()?;
        for (row, line) in self.screen.lines().enumerate() {
            if !line.is_empty() {
                self.backend.draw_text(row as u8, 0, line)?;
            }
        }
        for row in 0..SCREEN_ROWS {
            if let Some((start, end)) = self.screen.highlight(row) {
                self.backend.invert_region(row as u8, start, end)?;
            }
        }
        self.backend.flush()?;

        self.screen.mark_clean();
        Ok(())
    }
}

impl<B: DisplayBackend> RenderGateway for MenuRenderer<B> {
    fn render(
        &mut self,
        title: &str,
        items: &[&str],
        selected: Option<usize>,
    ) -> Result<(), RenderError> {
        self.compose(title, items, selected);
        self.paint()?;
        Ok(())
    }
}

/// First item shown so that `selected` lands inside the window
fn window_start(count: usize, selected: Option<usize>) -> usize {
    match selected {
        Some(index) if index < count && index >= LIST_ROWS => index + 1 - LIST_ROWS,
        _ => 0,
    }
}
