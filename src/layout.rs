//! Footer placement

/// Page dimensions in points (1/72 inch)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageDimensions {
    pub width: f32,
    pub height: f32,
}

impl PageDimensions {
    /// US Letter size (8.5" × 11")
    pub fn letter() -> Self {
        Self {
            width: 612.0,
            height: 792.0,
        }
    }
}

/// Where and how the footer line is drawn
///
/// Coordinates are in points from the lower-left corner of the page, which
/// is the PDF default user space.
#[derive(Debug, Clone, PartialEq)]
pub struct FooterLayout {
    /// Horizontal position of the text baseline start
    pub x: f32,
    /// Vertical position of the text baseline
    pub y: f32,
    /// Font size in points
    pub font_size: f32,
    /// One of the 14 standard PDF fonts
    pub base_font: String,
    /// Media box of the generated overlay page
    pub page: PageDimensions,
}

impl Default for FooterLayout {
    fn default() -> Self {
        Self {
            x: 5.0,
            y: 5.0,
            font_size: 12.0,
            base_font: "Helvetica".to_string(),
            page: PageDimensions::letter(),
        }
    }
}
