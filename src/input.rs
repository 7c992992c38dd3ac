use egui::{Event, Key, PointerButton, Pos2, Rect};

use crate::command::Command;
use crate::tool::{Point, ToolKind};

/// Pointer input in canvas pixel space, in the order it arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down { pos: Point, button: PointerButton },
    Move { pos: Point, primary_held: bool },
    Up { pos: Point, button: PointerButton },
}

/// Maps between the overlay's screen rect (egui points) and canvas pixels.
///
/// The canvas is sized once from the display, so the mapping is proportional
/// rather than assuming a particular pixels-per-point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMapping {
    rect: Rect,
    canvas_size: [u32; 2],
}

impl SurfaceMapping {
    pub fn new(rect: Rect, canvas_size: [u32; 2]) -> Self {
        Self { rect, canvas_size }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    fn factor(&self) -> egui::Vec2 {
        let size = self.rect.size();
        egui::vec2(
            self.canvas_size[0] as f32 / size.x.max(1.0),
            self.canvas_size[1] as f32 / size.y.max(1.0),
        )
    }

    pub fn to_canvas(&self, pos: Pos2) -> Point {
        let factor = self.factor();
        let offset = pos - self.rect.min;
        Point::new(
            (offset.x * factor.x).round() as i32,
            (offset.y * factor.y).round() as i32,
        )
    }

    pub fn to_screen(&self, point: Point) -> Pos2 {
        let factor = self.factor();
        self.rect.min + egui::vec2(point.x as f32 / factor.x, point.y as f32 / factor.y)
    }

    /// Length in points of one canvas pixel, for scaling stroke widths.
    pub fn points_per_pixel(&self) -> f32 {
        1.0 / self.factor().x
    }
}

/// Converts raw egui events into `PointerEvent`s.
#[derive(Debug, Default)]
pub struct InputHandler {
    primary_held: bool,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn this frame's raw events into pointer events in canvas pixels.
    pub fn translate(&mut self, events: &[Event], mapping: &SurfaceMapping) -> Vec<PointerEvent> {
        let mut out = Vec::new();
        for event in events {
            match event {
                Event::PointerButton {
                    pos,
                    button,
                    pressed,
                    ..
                } => {
                    let pos = mapping.to_canvas(*pos);
                    if *button == PointerButton::Primary {
                        self.primary_held = *pressed;
                    }
                    out.push(if *pressed {
                        PointerEvent::Down {
                            pos,
                            button: *button,
                        }
                    } else {
                        PointerEvent::Up {
                            pos,
                            button: *button,
                        }
                    });
                }
                Event::PointerMoved(pos) => out.push(PointerEvent::Move {
                    pos: mapping.to_canvas(*pos),
                    primary_held: self.primary_held,
                }),
                _ => {}
            }
        }
        out
    }
}

/// The command bound to an unmodified key press, if any.
pub fn shortcut_command(key: Key) -> Option<Command> {
    let command = match key {
        Key::Escape => Command::Quit,
        Key::C => Command::Clear,
        Key::S => Command::Capture,
        Key::Space => Command::ToggleMode,
        Key::Num1 => Command::SelectTool(ToolKind::Freehand),
        Key::Num2 => Command::SelectTool(ToolKind::Line),
        Key::Num3 => Command::SelectTool(ToolKind::Rectangle),
        Key::Num4 => Command::SelectTool(ToolKind::Ellipse),
        Key::Num5 => Command::SelectTool(ToolKind::Eraser),
        _ => return None,
    };
    Some(command)
}

/// Shortcut commands for every fresh, unmodified key press in `events`.
pub fn shortcut_commands(events: &[Event]) -> Vec<Command> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Key {
                key,
                pressed: true,
                repeat: false,
                modifiers,
                ..
            } if !modifiers.any() => shortcut_command(*key),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{Modifiers, pos2, vec2};

    fn mapping() -> SurfaceMapping {
        SurfaceMapping::new(Rect::from_min_size(Pos2::ZERO, vec2(800.0, 600.0)), [1600, 1200])
    }

    fn key(key: Key, modifiers: Modifiers) -> Event {
        Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        }
    }

    #[test]
    fn test_mapping_scales_to_canvas() {
        let mapping = mapping();
        assert_eq!(mapping.to_canvas(pos2(100.0, 50.0)), Point::new(200, 100));
        assert_eq!(mapping.to_screen(Point::new(200, 100)), pos2(100.0, 50.0));
        assert!((mapping.points_per_pixel() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_translate_tracks_primary_button() {
        let mut handler = InputHandler::new();
        let events = vec![
            Event::PointerMoved(pos2(1.0, 1.0)),
            Event::PointerButton {
                pos: pos2(1.0, 1.0),
                button: PointerButton::Primary,
                pressed: true,
                modifiers: Modifiers::NONE,
            },
            Event::PointerMoved(pos2(2.0, 3.0)),
            Event::PointerButton {
                pos: pos2(2.0, 3.0),
                button: PointerButton::Primary,
                pressed: false,
                modifiers: Modifiers::NONE,
            },
        ];
        let out = handler.translate(&events, &mapping());
        assert_eq!(
            out,
            vec![
                PointerEvent::Move {
                    pos: Point::new(2, 2),
                    primary_held: false
                },
                PointerEvent::Down {
                    pos: Point::new(2, 2),
                    button: PointerButton::Primary
                },
                PointerEvent::Move {
                    pos: Point::new(4, 6),
                    primary_held: true
                },
                PointerEvent::Up {
                    pos: Point::new(4, 6),
                    button: PointerButton::Primary
                },
            ]
        );
        let after = handler.translate(&[Event::PointerMoved(pos2(8.0, 8.0))], &mapping());
        assert!(matches!(
            after[..],
            [PointerEvent::Move {
                primary_held: false,
                ..
            }]
        ));
    }

    #[test]
    fn test_shortcuts() {
        let events = vec![
            key(Key::Space, Modifiers::NONE),
            key(Key::Num3, Modifiers::NONE),
            key(Key::C, Modifiers::COMMAND),
            key(Key::Escape, Modifiers::NONE),
            key(Key::Q, Modifiers::NONE),
        ];
        assert_eq!(
            shortcut_commands(&events),
            vec![
                Command::ToggleMode,
                Command::SelectTool(ToolKind::Rectangle),
                Command::Quit,
            ]
        );
    }

    #[test]
    fn test_every_tool_has_a_digit() {
        let digits = [Key::Num1, Key::Num2, Key::Num3, Key::Num4, Key::Num5];
        for (digit, tool) in digits.into_iter().zip(ToolKind::ALL) {
            assert_eq!(shortcut_command(digit), Some(Command::SelectTool(tool)));
        }
        assert_eq!(shortcut_command(Key::S), Some(Command::Capture));
    }
}
