//! Layout configuration
//!
//! Presentation parameters only. Changing them rescales geometry but
//! never affects column assignment, which is the correctness-carrying
//! part of the layout.

/// Presentation parameters for the time grid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    /// Pixels per hour on the vertical axis
    pub row_height: f64,
    /// Minimum rendered item height in pixels
    ///
    /// Applied to zero-duration (and near-zero) items so they stay
    /// visible and clickable.
    pub min_item_height: f64,
}

impl LayoutConfig {
    /// Default grid: 96 px/hour, 12 px minimum item height
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            row_height: 96.0,
            min_item_height: 12.0,
        }
    }

    /// Set pixels per hour
    #[inline]
    #[must_use]
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Set the minimum rendered item height
    #[inline]
    #[must_use]
    pub fn with_min_item_height(mut self, min_item_height: f64) -> Self {
        self.min_item_height = min_item_height;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new()
    }
}
