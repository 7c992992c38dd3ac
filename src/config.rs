use egui::Color32;

use crate::tool::ToolKind;

pub const MIN_STROKE_WIDTH: u32 = 1;
pub const MAX_STROKE_WIDTH: u32 = 20;
pub const DEFAULT_STROKE_WIDTH: u32 = 6;
pub const DEFAULT_COLOR: Color32 = Color32::from_rgb(255, 0, 0);

/// Window opacity while pointer events pass through to the desktop.
/// Must stay above zero or some platforms drop the surface entirely.
pub const CLICK_THROUGH_OPACITY: f32 = 0.01;
pub const DRAWING_OPACITY: f32 = 1.0;

/// Clamp a requested stroke width into the supported range.
pub fn clamp_width(width: u32) -> u32 {
    width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH)
}

/// Fixed settings for the overlay and its auxiliary windows.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayConfig {
    pub click_through_opacity: f32,
    pub drawing_opacity: f32,
    /// Control panel outer size in points.
    pub panel_size: egui::Vec2,
    /// Gap between the control panel and the right screen edge.
    pub panel_margin: f32,
    /// Delay of the one-shot mode re-assertion after startup, in seconds.
    pub reassert_delay: f64,
    /// How long both windows stay hidden before a snapshot is taken, in seconds.
    pub capture_hide_delay: f64,
    /// Surface size used when the primary display cannot be measured.
    pub fallback_surface_size: [u32; 2],
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            click_through_opacity: CLICK_THROUGH_OPACITY,
            drawing_opacity: DRAWING_OPACITY,
            panel_size: egui::vec2(96.0, 430.0),
            panel_margin: 20.0,
            reassert_delay: 0.5,
            capture_hide_delay: 0.25,
            fallback_surface_size: [1920, 1080],
        }
    }
}

/// The active drawing configuration: which tool, which color, how wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingConfig {
    pub tool: ToolKind,
    pub color: Color32,
    width: u32,
}

impl Default for DrawingConfig {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: DEFAULT_COLOR,
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl DrawingConfig {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn set_width(&mut self, width: u32) {
        self.width = clamp_width(width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DrawingConfig::default();
        assert_eq!(config.tool, ToolKind::Freehand);
        assert_eq!(config.color, Color32::from_rgb(255, 0, 0));
        assert_eq!(config.width(), 6);
    }

    #[test]
    fn test_width_is_clamped() {
        let mut config = DrawingConfig::default();
        config.set_width(0);
        assert_eq!(config.width(), MIN_STROKE_WIDTH);
        config.set_width(64);
        assert_eq!(config.width(), MAX_STROKE_WIDTH);
        config.set_width(15);
        assert_eq!(config.width(), 15);
    }

    #[test]
    fn test_click_through_opacity_is_not_zero() {
        let config = OverlayConfig::default();
        assert!(config.click_through_opacity > 0.0);
        assert!(config.click_through_opacity < config.drawing_opacity);
    }
}
