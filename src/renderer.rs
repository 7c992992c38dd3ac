// src/renderer.rs
use eframe::egui::{self, Color32, Pos2, Rect, Stroke, TextureHandle, TextureOptions};

use crate::canvas::{Canvas, Damage};
use crate::input::SurfaceMapping;
use crate::overlay::Overlay;
use crate::tool::{PaintMode, Shape, StrokeStyle, ToolKind};

/// Fill with the smallest non-zero alpha so the whole window stays hit-testable
/// even where nothing has been drawn.
pub const HIT_TEST_FILL: Color32 = Color32::from_rgba_premultiplied(0, 0, 0, 1);

/// Screen-space outline of an in-progress shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outline {
    Segment([Pos2; 2]),
    Rect(Rect),
    Ellipse { center: Pos2, radius: egui::Vec2 },
}

impl Outline {
    pub fn of(shape: &Shape, mapping: &SurfaceMapping) -> Self {
        match shape.kind() {
            ToolKind::Freehand | ToolKind::Eraser | ToolKind::Line => Self::Segment([
                mapping.to_screen(shape.start_point()),
                mapping.to_screen(shape.end_point()),
            ]),
            ToolKind::Rectangle | ToolKind::Ellipse => {
                let bounds = shape.bounds();
                let rect = Rect::from_min_max(
                    mapping.to_screen(bounds.top_left()),
                    mapping.to_screen(bounds.bottom_right()),
                );
                if shape.kind() == ToolKind::Rectangle {
                    Self::Rect(rect)
                } else {
                    Self::Ellipse {
                        center: rect.center(),
                        radius: rect.size() * 0.5,
                    }
                }
            }
        }
    }
}

/// Composites the overlay each frame: hit-test fill, persistent canvas, then
/// the transient shape on top.
#[derive(Default)]
pub struct Renderer {
    texture: Option<TextureHandle>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the canvas has changed since it was last uploaded.
    pub fn is_stale(&self, canvas: &Canvas) -> bool {
        self.texture.is_none() || canvas.damage().is_some()
    }

    #[cfg(test)]
    fn texture_id(&self) -> Option<egui::TextureId> {
        self.texture.as_ref().map(TextureHandle::id)
    }

    pub fn render(
        &mut self,
        ctx: &egui::Context,
        painter: &egui::Painter,
        mapping: &SurfaceMapping,
        overlay: &mut Overlay,
    ) {
        let opacity = overlay.opacity();
        let rect = mapping.rect();

        painter.rect_filled(rect, 0.0, HIT_TEST_FILL);

        let damage = overlay.take_canvas_damage();
        let texture = self.sync_texture(ctx, overlay.canvas(), damage);
        painter.image(
            texture.id(),
            rect,
            Rect::from_min_max(Pos2::ZERO, egui::pos2(1.0, 1.0)),
            Color32::WHITE.gamma_multiply(opacity),
        );

        if let Some((shape, style)) = overlay.transient() {
            paint_transient(painter, &shape, &style, mapping, opacity);
        }
    }

    /// Upload the whole canvas once, then only the damaged region.
    fn sync_texture(
        &mut self,
        ctx: &egui::Context,
        canvas: &Canvas,
        damage: Option<Damage>,
    ) -> &TextureHandle {
        if let (Some(texture), Some(damage)) = (self.texture.as_mut(), damage) {
            texture.set_partial(
                [damage.x as usize, damage.y as usize],
                canvas.region_image(damage),
                TextureOptions::LINEAR,
            );
        }
        self.texture.get_or_insert_with(|| {
            ctx.load_texture("overlay_canvas", canvas.to_color_image(), TextureOptions::LINEAR)
        })
    }
}

fn paint_transient(
    painter: &egui::Painter,
    shape: &Shape,
    style: &StrokeStyle,
    mapping: &SurfaceMapping,
    opacity: f32,
) {
    // Clearing strokes go straight into the canvas; there is nothing to preview.
    if style.mode == PaintMode::Clear {
        return;
    }
    let stroke = Stroke::new(
        style.width as f32 * mapping.points_per_pixel(),
        style.color.gamma_multiply(opacity),
    );
    match Outline::of(shape, mapping) {
        Outline::Segment(points) => {
            painter.line_segment(points, stroke);
        }
        Outline::Rect(rect) => {
            painter.rect_stroke(rect, 0.0, stroke);
        }
        Outline::Ellipse { center, radius } => {
            painter.add(egui::Shape::ellipse_stroke(center, radius, stroke));
        }
    }
}
