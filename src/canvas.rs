use image::{Rgba, RgbaImage};

use crate::tool::{PaintMode, Point, ShapeRect, StrokeStyle};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Pixel region changed since the GPU copy was last synced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Damage {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// The persistent drawing: one RGBA pixel buffer sized once at startup.
///
/// Every mutation grows the damaged region, so the renderer only re-uploads
/// what a stroke touched.
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
    // Inclusive pixel bounds: min x, min y, max x, max y.
    damage: Option<[u32; 4]>,
}

impl Canvas {
    /// Creates a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), TRANSPARENT),
            damage: None,
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width() as usize, self.height() as usize]
    }

    /// Region changed since the last `take_damage`.
    pub fn damage(&self) -> Option<Damage> {
        self.damage.map(|[x0, y0, x1, y1]| Damage {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        })
    }

    pub fn take_damage(&mut self) -> Option<Damage> {
        let damage = self.damage();
        self.damage = None;
        damage
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width() && y < self.height()).then(|| self.image.get_pixel(x, y).0)
    }

    pub fn is_blank(&self) -> bool {
        self.image.pixels().all(|px| px.0[3] == 0)
    }

    /// Reset every pixel to full transparency. Returns whether anything changed.
    pub fn clear(&mut self) -> bool {
        if self.is_blank() {
            return false;
        }
        for px in self.image.pixels_mut() {
            *px = TRANSPARENT;
        }
        self.mark(0, 0, self.width() - 1, self.height() - 1);
        true
    }

    pub fn draw_segment(&mut self, start: Point, end: Point, style: &StrokeStyle) {
        self.segment(start, end, style);
    }

    pub fn draw_rect(&mut self, rect: ShapeRect, style: &StrokeStyle) {
        let corners = [
            rect.top_left(),
            Point::new(rect.right, rect.top),
            rect.bottom_right(),
            Point::new(rect.left, rect.bottom),
        ];
        for i in 0..corners.len() {
            self.segment(corners[i], corners[(i + 1) % corners.len()], style);
        }
    }

    /// Ellipse outline inscribed in `rect`.
    pub fn draw_ellipse(&mut self, rect: ShapeRect, style: &StrokeStyle) {
        let rx = rect.width() as f32 * 0.5;
        let ry = rect.height() as f32 * 0.5;
        let cx = (rect.left + rect.right) as f32 * 0.5;
        let cy = (rect.top + rect.bottom) as f32 * 0.5;

        let circumference = std::f32::consts::TAU * rx.max(ry);
        let steps = (circumference as usize).max(12);

        let mut previous: Option<Point> = None;
        for step in 0..=steps {
            let t = (step as f32 / steps as f32) * std::f32::consts::TAU;
            let point = Point::new(
                (cx + rx * t.cos()).round() as i32,
                (cy + ry * t.sin()).round() as i32,
            );
            match previous {
                Some(prev) => self.segment(prev, point, style),
                None => self.stamp(point, style),
            }
            previous = Some(point);
        }
    }

    pub fn to_color_image(&self) -> egui::ColorImage {
        egui::ColorImage::from_rgba_unmultiplied(self.size(), self.image.as_raw())
    }

    /// The pixels inside `damage`, for a partial texture update.
    pub fn region_image(&self, damage: Damage) -> egui::ColorImage {
        let region =
            image::imageops::crop_imm(&self.image, damage.x, damage.y, damage.width, damage.height)
                .to_image();
        egui::ColorImage::from_rgba_unmultiplied(
            [region.width() as usize, region.height() as usize],
            region.as_raw(),
        )
    }

    fn mark(&mut self, x0: u32, y0: u32, x1: u32, y1: u32) {
        self.damage = Some(match self.damage {
            Some([a0, b0, a1, b1]) => [a0.min(x0), b0.min(y0), a1.max(x1), b1.max(y1)],
            None => [x0, y0, x1, y1],
        });
    }

    // Bresenham walk, stamping the round brush at every step.
    fn segment(&mut self, start: Point, end: Point, style: &StrokeStyle) {
        let (mut x, mut y) = (start.x, start.y);
        let dx = (end.x - x).abs();
        let sx = if x < end.x { 1 } else { -1 };
        let dy = -(end.y - y).abs();
        let sy = if y < end.y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(Point::new(x, y), style);
            if x == end.x && y == end.y {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    fn stamp(&mut self, center: Point, style: &StrokeStyle) {
        let value = match style.mode {
            PaintMode::Color => {
                let [r, g, b, _] = style.color.to_array();
                Rgba([r, g, b, 255])
            }
            PaintMode::Clear => TRANSPARENT,
        };

        let radius = style.width.max(1) as f32 * 0.5;
        let reach = radius.ceil() as i32;
        let x0 = (center.x - reach).max(0);
        let y0 = (center.y - reach).max(0);
        let x1 = (center.x + reach).min(self.width() as i32 - 1);
        let y1 = (center.y + reach).min(self.height() as i32 - 1);
        if x0 > x1 || y0 > y1 {
            return;
        }

        for y in y0..=y1 {
            let dy = y - center.y;
            for x in x0..=x1 {
                let dx = x - center.x;
                if ((dx * dx + dy * dy) as f32) <= radius * radius {
                    self.image.put_pixel(x as u32, y as u32, value);
                }
            }
        }
        self.mark(x0 as u32, y0 as u32, x1 as u32, y1 as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Color32;

    fn red(width: u32) -> StrokeStyle {
        StrokeStyle {
            color: Color32::from_rgb(255, 0, 0),
            width,
            mode: PaintMode::Color,
        }
    }

    fn eraser(width: u32) -> StrokeStyle {
        StrokeStyle {
            color: Color32::TRANSPARENT,
            width,
            mode: PaintMode::Clear,
        }
    }

    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = Canvas::new(32, 16);
        assert_eq!(canvas.size(), [32, 16]);
        assert!(canvas.is_blank());
        assert_eq!(canvas.damage(), None);
    }

    #[test]
    fn test_segment_covers_endpoints() {
        let mut canvas = Canvas::new(64, 64);
        canvas.draw_segment(Point::new(5, 5), Point::new(40, 20), &red(1));
        assert_eq!(canvas.pixel(5, 5), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(40, 20), Some([255, 0, 0, 255]));
        assert_eq!(canvas.pixel(5, 40), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_width_controls_brush_extent() {
        let mut canvas = Canvas::new(64, 64);
        canvas.draw_segment(Point::new(10, 32), Point::new(50, 32), &red(15));
        // radius 7.5 around the horizontal line
        assert_eq!(canvas.pixel(30, 39).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(30, 41).map(|p| p[3]), Some(0));

        let mut thin = Canvas::new(64, 64);
        thin.draw_segment(Point::new(10, 32), Point::new(50, 32), &red(1));
        assert_eq!(thin.pixel(30, 33).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_eraser_writes_transparency() {
        let mut canvas = Canvas::new(64, 64);
        canvas.draw_segment(Point::new(0, 10), Point::new(63, 10), &red(6));
        assert!(!canvas.is_blank());
        canvas.draw_segment(Point::new(0, 10), Point::new(63, 10), &eraser(12));
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_rect_outline_leaves_interior_empty() {
        let mut canvas = Canvas::new(128, 128);
        let rect = ShapeRect::from_corners(Point::new(100, 100), Point::new(50, 50));
        canvas.draw_rect(rect, &red(2));
        assert_eq!(canvas.pixel(50, 50).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(100, 100).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(75, 50).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(75, 75).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_ellipse_touches_bounding_box_midpoints() {
        let mut canvas = Canvas::new(128, 128);
        let rect = ShapeRect::from_corners(Point::new(20, 40), Point::new(100, 80));
        canvas.draw_ellipse(rect, &red(1));
        assert_eq!(canvas.pixel(100, 60).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(20, 60).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(60, 40).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(60, 80).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(60, 60).map(|p| p[3]), Some(0));
        // corners of the box are outside the ellipse
        assert_eq!(canvas.pixel(20, 40).map(|p| p[3]), Some(0));
    }

    #[test]
    fn test_drawing_off_canvas_is_clipped() {
        let mut canvas = Canvas::new(16, 16);
        canvas.draw_segment(Point::new(-50, -50), Point::new(-10, -20), &red(4));
        assert!(canvas.is_blank());
        canvas.draw_segment(Point::new(-5, 8), Point::new(30, 8), &red(1));
        assert_eq!(canvas.pixel(0, 8).map(|p| p[3]), Some(255));
        assert_eq!(canvas.pixel(15, 8).map(|p| p[3]), Some(255));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut canvas = Canvas::new(32, 32);
        canvas.draw_segment(Point::new(1, 1), Point::new(20, 20), &red(3));
        assert!(canvas.clear());
        assert!(canvas.is_blank());
        canvas.take_damage();
        let before = canvas.to_color_image();

        assert!(!canvas.clear());
        assert_eq!(canvas.damage(), None);
        assert_eq!(canvas.to_color_image(), before);
    }

    #[test]
    fn test_damage_covers_touched_pixels_only() {
        let mut canvas = Canvas::new(64, 64);
        assert_eq!(canvas.damage(), None);

        canvas.draw_segment(Point::new(5, 5), Point::new(10, 5), &red(1));
        // brush reach of one pixel around the segment
        assert_eq!(
            canvas.take_damage(),
            Some(Damage {
                x: 4,
                y: 4,
                width: 8,
                height: 3,
            })
        );
        assert_eq!(canvas.take_damage(), None);

        canvas.draw_segment(Point::new(-20, 0), Point::new(-10, 0), &red(4));
        assert_eq!(canvas.damage(), None);

        canvas.draw_segment(Point::new(60, 60), Point::new(70, 70), &red(1));
        canvas.draw_segment(Point::new(0, 30), Point::new(0, 30), &red(1));
        let damage = canvas.take_damage().expect("damaged");
        assert_eq!((damage.x, damage.y), (0, 29));
        assert_eq!((damage.width, damage.height), (64, 35));

        assert!(canvas.clear());
        assert_eq!(
            canvas.take_damage(),
            Some(Damage {
                x: 0,
                y: 0,
                width: 64,
                height: 64,
            })
        );
    }

    #[test]
    fn test_region_image_matches_buffer() {
        let mut canvas = Canvas::new(16, 16);
        canvas.draw_segment(Point::new(6, 6), Point::new(6, 6), &red(1));
        let damage = canvas.take_damage().expect("damaged");
        let region = canvas.region_image(damage);
        assert_eq!(region.size, [3, 3]);
        assert_eq!(region.pixels[4], Color32::from_rgb(255, 0, 0));
        assert_eq!(region.pixels[0], Color32::TRANSPARENT);
    }

    #[test]
    fn test_color_image_matches_buffer() {
        let mut canvas = Canvas::new(8, 4);
        canvas.draw_segment(Point::new(0, 0), Point::new(0, 0), &red(1));
        let image = canvas.to_color_image();
        assert_eq!(image.size, [8, 4]);
        assert_eq!(image.pixels[0], Color32::from_rgb(255, 0, 0));
        assert_eq!(image.pixels[1], Color32::TRANSPARENT);
    }
}
