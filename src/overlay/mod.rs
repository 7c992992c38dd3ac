//! The overlay surface: owns the persistent canvas, the drawing configuration
//! and the draw/click-through mode, and turns pointer input into strokes.

mod reassert;
mod viewport;

pub use reassert::OneShot;
pub use viewport::ViewportCtx;

use egui::{Color32, PointerButton, ViewportCommand};

use crate::canvas::{Canvas, Damage};
use crate::command::Command;
use crate::config::{DrawingConfig, OverlayConfig};
use crate::input::PointerEvent;
use crate::tool::{Point, Shape, StrokeStyle, ToolKind};

/// Whether the overlay consumes pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Nearly invisible; the OS delivers pointer events to whatever is beneath.
    #[default]
    ClickThrough,
    /// Opaque; pointer events build strokes.
    Drawing,
}

impl Mode {
    pub fn toggled(self) -> Self {
        match self {
            Self::ClickThrough => Self::Drawing,
            Self::Drawing => Self::ClickThrough,
        }
    }

    pub fn is_drawing(self) -> bool {
        self == Self::Drawing
    }
}

pub struct Overlay {
    config: OverlayConfig,
    drawing: DrawingConfig,
    mode: Mode,
    canvas: Canvas,
    /// The shape under the pointer. `Some` means a drag is in progress.
    current: Option<Shape>,
    last_point: Point,
    reassert: OneShot,
    was_focused: Option<bool>,
}

impl Overlay {
    pub fn new(config: OverlayConfig, canvas_size: [u32; 2]) -> Self {
        Self {
            config,
            drawing: DrawingConfig::default(),
            mode: Mode::default(),
            canvas: Canvas::new(canvas_size[0], canvas_size[1]),
            current: None,
            last_point: Point::default(),
            reassert: OneShot::default(),
            was_focused: None,
        }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn drawing_config(&self) -> &DrawingConfig {
        &self.drawing
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Hand the region changed since the last call to the renderer.
    pub fn take_canvas_damage(&mut self) -> Option<Damage> {
        self.canvas.take_damage()
    }

    pub fn is_drawing_in_progress(&self) -> bool {
        self.current.is_some()
    }

    /// Window opacity for the current mode.
    pub fn opacity(&self) -> f32 {
        match self.mode {
            Mode::ClickThrough => self.config.click_through_opacity,
            Mode::Drawing => self.config.drawing_opacity,
        }
    }

    /// The in-progress shape to composite over the canvas, with the style it
    /// will be rasterised with. Incremental tools are already in the canvas.
    pub fn transient(&self) -> Option<(Shape, StrokeStyle)> {
        self.current
            .filter(|shape| !shape.kind().is_incremental())
            .map(|shape| (shape, self.style_for(shape.kind())))
    }

    fn style_for(&self, kind: ToolKind) -> StrokeStyle {
        StrokeStyle {
            mode: kind.paint_mode(),
            ..StrokeStyle::from_config(&self.drawing)
        }
    }

    // --- mode -------------------------------------------------------------

    pub fn set_mode(&mut self, mode: Mode, ctx: &impl ViewportCtx) {
        if self.mode != mode {
            self.mode = mode;
            if !mode.is_drawing() {
                self.current = None;
            }
            match mode {
                Mode::Drawing => log::info!("Switched to drawing mode"),
                Mode::ClickThrough => log::info!("Switched to click-through mode"),
            }
        }
        self.apply_mode(ctx);
    }

    pub fn toggle_mode(&mut self, ctx: &impl ViewportCtx) {
        self.set_mode(self.mode.toggled(), ctx);
    }

    /// Push the current mode to the window. Safe to repeat.
    pub fn apply_mode(&self, ctx: &impl ViewportCtx) {
        ctx.send_viewport_cmd(ViewportCommand::MousePassthrough(!self.mode.is_drawing()));
        ctx.request_repaint();
    }

    /// Schedule one re-application of the mode after startup.
    pub fn arm_reassert(&mut self, now: f64) {
        self.reassert.arm(now, self.config.reassert_delay);
    }

    /// Seconds until the pending re-assertion, for scheduling a repaint.
    pub fn reassert_pending(&self, now: f64) -> Option<f64> {
        self.reassert.remaining(now)
    }

    pub fn poll_reassert(&mut self, now: f64, ctx: &impl ViewportCtx) -> bool {
        let fired = self.reassert.fire(now);
        if fired {
            log::debug!("Re-asserting {:?} mode", self.mode);
            self.apply_mode(ctx);
        }
        fired
    }

    /// Window shown/activated hook: re-apply the mode on the first
    /// observation and whenever the window regains focus.
    pub fn observe_focus(&mut self, focused: bool, ctx: &impl ViewportCtx) -> bool {
        let activated = match self.was_focused {
            None => true,
            Some(was) => focused && !was,
        };
        self.was_focused = Some(focused);
        if activated {
            self.apply_mode(ctx);
        }
        activated
    }

    // --- configuration ----------------------------------------------------

    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.drawing.tool != tool {
            log::debug!("Tool changed to {}", tool.label());
            self.drawing.tool = tool;
        }
    }

    pub fn set_color(&mut self, color: Color32) {
        log::debug!("Color changed to {:?}", color);
        self.drawing.color = color;
    }

    pub fn set_width(&mut self, width: u32) {
        self.drawing.set_width(width);
        log::debug!("Width changed to {}", self.drawing.width());
    }

    pub fn clear(&mut self, ctx: &impl ViewportCtx) {
        if self.canvas.clear() {
            log::info!("Canvas cleared");
        }
        ctx.request_repaint();
    }

    /// Execute an overlay-local command. Returns `false` for commands the
    /// overlay cannot handle on its own (capture, quit).
    pub fn execute(&mut self, command: Command, ctx: &impl ViewportCtx) -> bool {
        match command {
            Command::ToggleMode => self.toggle_mode(ctx),
            Command::SelectTool(tool) => self.set_tool(tool),
            Command::SetColor(color) => self.set_color(color),
            Command::SetWidth(width) => self.set_width(width),
            Command::Clear => self.clear(ctx),
            Command::Capture | Command::Quit => return false,
        }
        true
    }

    // --- pointer protocol -------------------------------------------------

    /// Feed one pointer event. Returns `true` if the event was consumed, in
    /// which case a repaint is due. In click-through mode nothing is consumed.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        if !self.mode.is_drawing() {
            return false;
        }
        match event {
            PointerEvent::Down {
                pos,
                button: PointerButton::Primary,
            } => {
                self.current = Some(Shape::new(self.drawing.tool, pos));
                self.last_point = pos;
                true
            }
            PointerEvent::Move {
                pos,
                primary_held: true,
            } => self.drag_to(pos),
            PointerEvent::Up {
                pos,
                button: PointerButton::Primary,
            } => self.release_at(pos),
            _ => false,
        }
    }

    fn drag_to(&mut self, pos: Point) -> bool {
        let Some(shape) = self.current.as_mut() else {
            return false;
        };
        shape.update(self.last_point, pos);
        let shape = *shape;
        if shape.kind().is_incremental() {
            let style = self.style_for(shape.kind());
            shape.draw(&mut self.canvas, &style);
            self.last_point = pos;
        }
        true
    }

    fn release_at(&mut self, pos: Point) -> bool {
        let Some(mut shape) = self.current.take() else {
            return false;
        };
        if !shape.kind().is_incremental() {
            shape.update(self.last_point, pos);
            let style = self.style_for(shape.kind());
            shape.draw(&mut self.canvas, &style);
        }
        true
    }
}
