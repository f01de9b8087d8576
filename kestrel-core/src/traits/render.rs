//! Render capability trait

/// Errors reported by a renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RenderError {
    /// Display not present or not initialized
    Unavailable,
    /// Bus transfer failed
    Bus,
}

/// Trait for drawing the current screen
///
/// Called once per state change, never on idle polls.
pub trait RenderGateway {
    /// Draw a titled list
    ///
    /// - `title`: Screen heading
    /// - `items`: Item labels in display order
    /// - `selected`: Index of the highlighted item, `None` on screens
    ///   without a cursor
    fn render(
        &mut self,
        title: &str,
        items: &[&str],
        selected: Option<usize>,
    ) -> Result<(), RenderError>;
}
