//! Full-screen snapshots: the startup permission probe and the manual
//! capture-and-save action.

use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::error::{PenError, PenResult};

pub const DEFAULT_FILE_NAME: &str = "screenshot.png";

/// Grabs the primary display as an RGBA image.
pub trait ScreenCapturer {
    fn capture(&self) -> PenResult<RgbaImage>;
}

/// Position and size of the primary display, in logical points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayGeometry {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub scale_factor: f32,
}

impl DisplayGeometry {
    /// Size of a pixel buffer covering the whole display.
    pub fn pixel_size(&self) -> [u32; 2] {
        let scale = if self.scale_factor > 0.0 {
            self.scale_factor
        } else {
            1.0
        };
        [
            (self.width as f32 * scale).round() as u32,
            (self.height as f32 * scale).round() as u32,
        ]
    }
}

/// Captures through the OS compositor via the `screenshots` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCapturer;

impl SystemCapturer {
    fn primary_screen() -> PenResult<screenshots::Screen> {
        let screens =
            screenshots::Screen::all().map_err(|e| PenError::Capture(e.to_string()))?;
        screens
            .iter()
            .find(|screen| screen.display_info.is_primary)
            .or_else(|| screens.first())
            .cloned()
            .ok_or(PenError::NoDisplay)
    }

    pub fn primary_display() -> PenResult<DisplayGeometry> {
        let info = Self::primary_screen()?.display_info;
        Ok(DisplayGeometry {
            x: info.x,
            y: info.y,
            width: info.width,
            height: info.height,
            scale_factor: info.scale_factor,
        })
    }
}

impl ScreenCapturer for SystemCapturer {
    fn capture(&self) -> PenResult<RgbaImage> {
        let shot = Self::primary_screen()?
            .capture()
            .map_err(|e| PenError::Capture(e.to_string()))?;
        let (width, height) = (shot.width(), shot.height());
        RgbaImage::from_raw(width, height, shot.into_raw())
            .ok_or(PenError::MalformedImage { width, height })
    }
}

/// A capture that succeeds means screen-recording permission is granted.
pub fn probe_permission(capturer: &impl ScreenCapturer) -> bool {
    match capturer.capture() {
        Ok(image) => {
            log::info!(
                "Screen capture permission probe succeeded ({}x{})",
                image.width(),
                image.height()
            );
            true
        }
        Err(e) => {
            log::warn!("Screen capture permission probe failed: {e}");
            false
        }
    }
}

/// `screenshot.png` on the desktop, falling back to the home directory.
pub fn default_save_path() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_default()
        .join(DEFAULT_FILE_NAME)
}

pub fn save_png(image: &RgbaImage, path: &Path) -> PenResult<()> {
    image
        .save_with_format(path, image::ImageFormat::Png)
        .map_err(|source| PenError::Save {
            path: path.to_path_buf(),
            source,
        })?;
    log::info!("Screenshot saved to {}", path.display());
    Ok(())
}

/// Sequences a manual capture across frames: the windows are hidden first,
/// and the snapshot is taken once the compositor has had time to remove them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum CaptureFlow {
    #[default]
    Idle,
    Hiding {
        ready_at: f64,
    },
}

impl CaptureFlow {
    /// Start hiding. Ignored while a capture is already pending.
    pub fn begin(&mut self, now: f64, hide_delay: f64) -> bool {
        if self.is_hiding() {
            return false;
        }
        log::info!("Hiding windows for screen capture");
        *self = Self::Hiding {
            ready_at: now + hide_delay,
        };
        true
    }

    pub fn is_hiding(&self) -> bool {
        matches!(self, Self::Hiding { .. })
    }

    pub fn remaining(&self, now: f64) -> Option<f64> {
        match self {
            Self::Hiding { ready_at } => Some((ready_at - now).max(0.0)),
            Self::Idle => None,
        }
    }

    /// Once the hide delay has elapsed, return to `Idle` (windows visible
    /// again) and run `capturer`. The flow is restored before the capture
    /// result is inspected, so failures never leave the windows hidden.
    pub fn poll(
        &mut self,
        now: f64,
        capturer: &impl ScreenCapturer,
    ) -> Option<PenResult<RgbaImage>> {
        match *self {
            Self::Hiding { ready_at } if now >= ready_at => {
                *self = Self::Idle;
                Some(capturer.capture())
            }
            _ => None,
        }
    }
}
