use eframe::egui::{self, Color32, Pos2, Rect, RichText, Vec2};

use crate::command::Command;
use crate::config::{MAX_STROKE_WIDTH, MIN_STROKE_WIDTH};
use crate::overlay::{Mode, Overlay};
use crate::tool::ToolKind;

const DRAW_ON_FILL: Color32 = Color32::from_rgb(0x5c, 0xb8, 0x5c);
const DRAW_OFF_FILL: Color32 = Color32::from_rgb(0xd9, 0x53, 0x4f);

/// Top-left corner that docks a panel of `panel` size to the right edge of
/// `screen`, vertically centered.
pub fn panel_position(screen: Rect, panel: Vec2, margin: f32) -> Pos2 {
    egui::pos2(
        screen.max.x - panel.x - margin,
        screen.min.y + (screen.height() - panel.y) / 2.0,
    )
}

/// Label and fill of the mode toggle for the given mode.
pub fn toggle_appearance(mode: Mode) -> (&'static str, Color32) {
    match mode {
        Mode::ClickThrough => ("Start drawing", DRAW_ON_FILL),
        Mode::Drawing => ("Stop drawing", DRAW_OFF_FILL),
    }
}

/// Shows the floating tools window. Reads the overlay for display only and
/// reports every interaction as a `Command`.
pub fn control_panel(ctx: &egui::Context, overlay: &Overlay, screen: Rect) -> Vec<Command> {
    let size = overlay.config().panel_size;
    let position = panel_position(screen, size, overlay.config().panel_margin);

    ctx.show_viewport_immediate(
        egui::ViewportId::from_hash_of("control_panel"),
        egui::ViewportBuilder::default()
            .with_title("Tools")
            .with_inner_size(size)
            .with_position(position)
            .with_resizable(false)
            .with_always_on_top()
            .with_taskbar(false),
        |ctx, _class| {
            let mut commands = egui::CentralPanel::default()
                .show(ctx, |ui| panel_ui(ui, overlay))
                .inner;
            if ctx.input(|i| i.viewport().close_requested()) {
                commands.push(Command::Quit);
            }
            commands
        },
    )
}

fn panel_ui(ui: &mut egui::Ui, overlay: &Overlay) -> Vec<Command> {
    let mut commands = Vec::new();
    let config = overlay.drawing_config();
    let full_width = ui.available_width();

    let (label, fill) = toggle_appearance(overlay.mode());
    let toggle = egui::Button::new(RichText::new(label).color(Color32::WHITE).strong())
        .fill(fill)
        .min_size(egui::vec2(full_width, 30.0));
    if ui.add(toggle).clicked() {
        commands.push(Command::ToggleMode);
    }
    ui.separator();

    ui.vertical_centered(|ui| ui.strong("Tool:"));
    let mut tool = config.tool;
    egui::ComboBox::from_id_salt("tool_selector")
        .width(full_width)
        .selected_text(tool.label())
        .show_ui(ui, |ui| {
            for kind in ToolKind::ALL {
                ui.selectable_value(&mut tool, kind, kind.label());
            }
        });
    if tool != config.tool {
        commands.push(Command::SelectTool(tool));
    }
    ui.separator();

    ui.vertical_centered(|ui| ui.strong("Color:"));
    let [r, g, b, _] = config.color.to_array();
    let mut rgb = [r, g, b];
    ui.vertical_centered(|ui| {
        if egui::color_picker::color_edit_button_srgb(ui, &mut rgb).changed() {
            commands.push(Command::SetColor(Color32::from_rgb(rgb[0], rgb[1], rgb[2])));
        }
    });
    let (swatch, _) = ui.allocate_exact_size(egui::vec2(full_width, 20.0), egui::Sense::hover());
    ui.painter().rect_filled(swatch, 2.0, config.color);
    ui.painter()
        .rect_stroke(swatch, 2.0, egui::Stroke::new(1.0, Color32::from_gray(0x99)));
    ui.separator();

    ui.vertical_centered(|ui| ui.strong("Width:"));
    let mut width = config.width();
    let slider = egui::Slider::new(&mut width, MIN_STROKE_WIDTH..=MAX_STROKE_WIDTH).show_value(false);
    if ui.add(slider).changed() {
        commands.push(Command::SetWidth(width));
    }
    ui.vertical_centered(|ui| ui.label(width.to_string()));
    ui.separator();

    let button_size = egui::vec2(full_width, 32.0);
    if ui.add(egui::Button::new("Clear").min_size(button_size)).clicked() {
        commands.push(Command::Clear);
    }
    if ui.add(egui::Button::new("Quit").min_size(button_size)).clicked() {
        commands.push(Command::Quit);
    }

    commands
}
