use egui::Color32;

use crate::tool::ToolKind;

/// Requests emitted by the control panel and keyboard shortcuts.
///
/// The overlay owns all drawing state; panels and key handlers only describe
/// what should change and hand these to the app for execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Flip between click-through and drawing.
    ToggleMode,
    SelectTool(ToolKind),
    SetColor(Color32),
    SetWidth(u32),
    Clear,
    /// Hide both windows, snapshot the screen and offer to save it.
    Capture,
    Quit,
}
