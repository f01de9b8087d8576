//! Display backend trait

use kestrel_core::traits::RenderError;

/// Display backend errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Bus transfer to the panel failed
    Communication,
    /// Row or column outside the panel
    InvalidCoordinates,
    /// Panel not initialized
    NotInitialized,
}

impl From<DisplayError> for RenderError {
    fn from(err: DisplayError) -> Self {
        match err {
            DisplayError::NotInitialized => RenderError::Unavailable,
            DisplayError::Communication | DisplayError::InvalidCoordinates => RenderError::Bus,
        }
    }
}

/// Character-addressed display
///
/// Drawing calls may be buffered; nothing is guaranteed visible until
/// `flush` returns.
pub trait DisplayBackend {
    /// Clear the entire display
    fn clear(&mut self) -> Result<(), DisplayError>;

    /// Draw text at the specified row and column
    ///
    /// - `row`: Row number (0-based)
    /// - `col`: Column number in characters (0-based)
    /// - `text`: Text to display; clipped at the right edge
    fn draw_text(&mut self, row: u8, col: u8, text: &str) -> Result<(), DisplayError>;

    /// Invert columns `start_col..end_col` of a row
    fn invert_region(&mut self, row: u8, start_col: u8, end_col: u8) -> Result<(), DisplayError>;

    /// Send buffered content to the panel
    fn flush(&mut self) -> Result<(), DisplayError>;

    /// (columns, rows) in character units
    fn dimensions(&self) -> (u8, u8);

    fn is_ready(&self) -> bool;
}
