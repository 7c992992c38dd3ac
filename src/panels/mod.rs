mod control_panel;

pub use control_panel::{control_panel, panel_position, toggle_appearance};
