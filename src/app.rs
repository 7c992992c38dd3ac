use std::time::Duration;

use eframe::egui::{self, Rect, ViewportCommand};
use image::RgbaImage;

use crate::capture::{self, CaptureFlow, DisplayGeometry, ScreenCapturer, SystemCapturer};
use crate::command::Command;
use crate::config::OverlayConfig;
use crate::input::{InputHandler, SurfaceMapping, shortcut_commands};
use crate::onboarding::{Onboarding, OnboardingOutcome};
use crate::error::PenResult;
use crate::overlay::{Overlay, ViewportCtx};
use crate::panels::control_panel;
use crate::platform;
use crate::renderer::Renderer;

/// What `main` learns about the machine before the event loop starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Launch {
    pub permission_granted: bool,
    pub display: Option<DisplayGeometry>,
}

impl Launch {
    /// Probe capture permission and measure the primary display.
    pub fn detect() -> Self {
        let display = SystemCapturer::primary_display()
            .map_err(|e| log::warn!("Could not measure primary display: {e}"))
            .ok();
        Self::probe(&SystemCapturer, display)
    }

    pub fn probe(capturer: &impl ScreenCapturer, display: Option<DisplayGeometry>) -> Self {
        Self {
            permission_granted: capture::probe_permission(capturer),
            display,
        }
    }

    pub fn canvas_size(&self, config: &OverlayConfig) -> [u32; 2] {
        self.display
            .map(|display| display.pixel_size())
            .unwrap_or(config.fallback_surface_size)
    }

    /// The full-screen, borderless, always-on-top, transparent overlay window.
    pub fn viewport(&self) -> egui::ViewportBuilder {
        let builder = egui::ViewportBuilder::default()
            .with_title("Screen Pen")
            .with_transparent(true)
            .with_decorations(false)
            .with_always_on_top()
            .with_taskbar(false)
            .with_mouse_passthrough(true);
        match self.display {
            Some(display) => builder
                .with_position([display.x as f32, display.y as f32])
                .with_inner_size([display.width as f32, display.height as f32]),
            None => builder.with_maximized(true),
        }
    }
}

/// Whether the permission gate is still in front of the overlay.
#[derive(Debug)]
pub enum Stage {
    Onboarding(Onboarding),
    Annotating,
}

impl Stage {
    /// A failed permission probe puts the onboarding gate before the overlay.
    pub fn for_launch(launch: &Launch) -> Self {
        if launch.permission_granted {
            Self::Annotating
        } else {
            log::info!("Showing permission onboarding");
            Self::Onboarding(Onboarding::default())
        }
    }

    pub fn is_onboarding(&self) -> bool {
        matches!(self, Self::Onboarding(_))
    }
}

pub struct ScreenPenApp {
    stage: Stage,
    overlay: Overlay,
    renderer: Renderer,
    input: InputHandler,
    capture: CaptureFlow,
    capturer: SystemCapturer,
    pending_save: Option<RgbaImage>,
}

impl ScreenPenApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: OverlayConfig, launch: Launch) -> Self {
        Self::with_launch(config, &launch, cc.egui_ctx.input(|i| i.time))
    }

    pub fn with_launch(config: OverlayConfig, launch: &Launch, now: f64) -> Self {
        let canvas_size = launch.canvas_size(&config);
        log::info!("Canvas size {}x{}", canvas_size[0], canvas_size[1]);

        let mut overlay = Overlay::new(config, canvas_size);
        let stage = Stage::for_launch(launch);
        if !stage.is_onboarding() {
            overlay.arm_reassert(now);
        }

        Self {
            stage,
            overlay,
            renderer: Renderer::new(),
            input: InputHandler::new(),
            capture: CaptureFlow::default(),
            capturer: SystemCapturer,
            pending_save: None,
        }
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    fn execute(&mut self, ctx: &egui::Context, command: Command) {
        if self.overlay.execute(command, ctx) {
            return;
        }
        match command {
            Command::Capture => {
                let now = ctx.input(|i| i.time);
                if self.capture.begin(now, self.overlay.config().capture_hide_delay) {
                    ctx.send_viewport_cmd(ViewportCommand::MousePassthrough(true));
                    ctx.request_repaint();
                }
            }
            Command::Quit => {
                log::info!("Quitting");
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
            _ => {}
        }
    }

    /// Drive the onboarding gate. The overlay stays transparent and
    /// click-through until the user decides.
    fn update_onboarding(&mut self, ctx: &egui::Context) {
        let Stage::Onboarding(onboarding) = &mut self.stage else {
            return;
        };
        let Some(outcome) = onboarding.show(ctx) else {
            return;
        };
        let now = ctx.input(|i| i.time);
        let relaunch = || platform::relaunch().map(drop);
        if let Err(e) = self.finish_onboarding(outcome, now, ctx, relaunch) {
            log::error!("{e}");
            show_message(rfd::MessageLevel::Error, "Restart failed", &e.to_string());
        }
    }

    /// Act on the user's onboarding decision. `relaunch` starts the new
    /// process; the root viewport is closed only once it succeeded.
    pub fn finish_onboarding(
        &mut self,
        outcome: OnboardingOutcome,
        now: f64,
        ctx: &impl ViewportCtx,
        relaunch: impl FnOnce() -> PenResult<()>,
    ) -> PenResult<()> {
        match outcome {
            OnboardingOutcome::Continue => {
                self.stage = Stage::Annotating;
                self.overlay.arm_reassert(now);
                self.overlay.apply_mode(ctx);
            }
            OnboardingOutcome::Restart => {
                relaunch()?;
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
            OnboardingOutcome::Exit => {
                log::info!("Exiting for permission setup");
                ctx.send_viewport_cmd(ViewportCommand::Close);
            }
        }
        Ok(())
    }

    /// Returns `true` while the windows are hidden for a capture.
    fn update_capture(&mut self, ctx: &egui::Context, now: f64) -> bool {
        if !self.capture.is_hiding() {
            return false;
        }
        match self.capture.poll(now, &self.capturer) {
            Some(result) => {
                self.overlay.apply_mode(ctx);
                match result {
                    Ok(image) => self.pending_save = Some(image),
                    Err(e) => {
                        log::error!("{e}");
                        show_message(rfd::MessageLevel::Error, "Capture failed", &e.to_string());
                    }
                }
                false
            }
            None => {
                if let Some(remaining) = self.capture.remaining(now) {
                    ctx.request_repaint_after(Duration::from_secs_f64(remaining));
                }
                true
            }
        }
    }

    fn prompt_save(&mut self, image: RgbaImage) {
        let default_path = capture::default_save_path();
        let mut dialog = rfd::FileDialog::new()
            .set_title("Save screenshot")
            .add_filter("PNG image", &["png"]);
        if let Some(dir) = default_path.parent() {
            dialog = dialog.set_directory(dir);
        }
        if let Some(name) = default_path.file_name() {
            dialog = dialog.set_file_name(name.to_string_lossy());
        }

        let Some(path) = dialog.save_file() else {
            log::info!("Screenshot save cancelled");
            return;
        };
        match capture::save_png(&image, &path) {
            Ok(()) => show_message(
                rfd::MessageLevel::Info,
                "Saved",
                &format!("Screenshot saved to: {}", path.display()),
            ),
            Err(e) => {
                log::error!("{e}");
                show_message(rfd::MessageLevel::Error, "Save failed", &e.to_string());
            }
        }
    }

    fn screen_rect(ctx: &egui::Context) -> Rect {
        ctx.input(|i| i.viewport().monitor_size)
            .map(|size| Rect::from_min_size(egui::Pos2::ZERO, size))
            .unwrap_or_else(|| ctx.screen_rect())
    }
}

fn show_message(level: rfd::MessageLevel, title: &str, description: &str) {
    rfd::MessageDialog::new()
        .set_level(level)
        .set_title(title)
        .set_description(description)
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}

impl eframe::App for ScreenPenApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        [0.0; 4]
    }

    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.stage.is_onboarding() {
            self.update_onboarding(ctx);
            return;
        }

        let now = ctx.input(|i| i.time);
        let focused = ctx.input(|i| i.viewport().focused.unwrap_or(false));
        self.overlay.observe_focus(focused, ctx);
        self.overlay.poll_reassert(now, ctx);
        if let Some(remaining) = self.overlay.reassert_pending(now) {
            ctx.request_repaint_after(Duration::from_secs_f64(remaining));
        }

        // Both windows stay hidden until the snapshot has been taken.
        if self.update_capture(ctx, now) {
            return;
        }
        if let Some(image) = self.pending_save.take() {
            self.prompt_save(image);
        }

        let events = ctx.input(|i| i.events.clone());
        for command in shortcut_commands(&events) {
            self.execute(ctx, command);
        }

        for command in control_panel(ctx, &self.overlay, Self::screen_rect(ctx)) {
            self.execute(ctx, command);
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                let canvas = self.overlay.canvas();
                let canvas_size = [canvas.width(), canvas.height()];
                let mapping = SurfaceMapping::new(ui.max_rect(), canvas_size);

                let mut consumed = false;
                for event in self.input.translate(&events, &mapping) {
                    consumed |= self.overlay.handle_pointer(event);
                }
                if consumed {
                    ctx.request_repaint();
                }

                self.renderer
                    .render(ctx, ui.painter(), &mapping, &mut self.overlay);
            });
    }
}
