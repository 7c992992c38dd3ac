//! Permission onboarding, shown before the overlay when the capture probe fails.

use eframe::egui;

use crate::error::PenResult;
use crate::platform;

const SETUP_STEPS: [&str; 5] = [
    "1. Click \"Open privacy settings\" below",
    "2. Select \"Screen Recording\" under Privacy & Security",
    "3. Unlock with Touch ID or your password if asked",
    "4. Enable this application (or the terminal you launched it from)",
    "5. Come back here and restart Screen Pen",
];

const NAVIGATION_HINT: &str = "In the settings window go to Privacy & Security → Screen Recording \
and allow this application and the terminal you started it from.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnboardingStep {
    /// Ask whether to set up permission now.
    #[default]
    Prompt,
    /// Walk through granting permission.
    Instructions,
}

/// How the onboarding gate ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingOutcome {
    /// Show the overlay without capture permission.
    Continue,
    /// Relaunch so the new permission takes effect.
    Restart,
    /// Leave the application (the user went to set up permission).
    Exit,
}

#[derive(Debug)]
pub struct Onboarding {
    step: OnboardingStep,
    settings_opened: bool,
    settings_error: Option<String>,
    executable: String,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self::new(platform::executable_path())
    }
}

impl Onboarding {
    pub fn new(executable: String) -> Self {
        Self {
            step: OnboardingStep::Prompt,
            settings_opened: false,
            settings_error: None,
            executable,
        }
    }

    pub fn step(&self) -> OnboardingStep {
        self.step
    }

    pub fn settings_opened(&self) -> bool {
        self.settings_opened
    }

    pub fn settings_error(&self) -> Option<&str> {
        self.settings_error.as_deref()
    }

    pub fn accept_setup(&mut self) {
        log::info!("Starting permission setup");
        self.step = OnboardingStep::Instructions;
    }

    /// What closing the window means at the current step.
    pub fn on_close(&self) -> OnboardingOutcome {
        match self.step {
            OnboardingStep::Prompt => OnboardingOutcome::Continue,
            OnboardingStep::Instructions => OnboardingOutcome::Exit,
        }
    }

    pub fn open_settings_with(&mut self, opener: impl FnOnce() -> PenResult<()>) {
        match opener() {
            Ok(()) => {
                self.settings_opened = true;
                self.settings_error = None;
            }
            Err(e) => {
                log::error!("{e}");
                self.settings_error = Some(e.to_string());
            }
        }
    }

    /// Show the onboarding window. Returns an outcome once the user decides.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<OnboardingOutcome> {
        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("permission_onboarding"),
            egui::ViewportBuilder::default()
                .with_title("Screen Pen permission setup")
                .with_inner_size([520.0, 380.0])
                .with_resizable(false)
                .with_always_on_top(),
            |ctx, _class| {
                let outcome = egui::CentralPanel::default()
                    .show(ctx, |ui| self.ui(ui))
                    .inner;
                if ctx.input(|i| i.viewport().close_requested()) {
                    return Some(outcome.unwrap_or_else(|| self.on_close()));
                }
                outcome
            },
        )
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) -> Option<OnboardingOutcome> {
        match self.step {
            OnboardingStep::Prompt => self.prompt_ui(ui),
            OnboardingStep::Instructions => self.instructions_ui(ui),
        }
    }

    fn prompt_ui(&mut self, ui: &mut egui::Ui) -> Option<OnboardingOutcome> {
        ui.heading("Permission required");
        ui.label(
            "Screen Pen needs screen recording permission to work properly.\n\
             Set up the permission now?",
        );
        ui.add_space(12.0);

        let mut outcome = None;
        ui.horizontal(|ui| {
            if ui.button("Set up now").clicked() {
                self.accept_setup();
            }
            if ui.button("Not now").clicked() {
                log::info!("Permission setup skipped");
                outcome = Some(OnboardingOutcome::Continue);
            }
        });
        outcome
    }

    fn instructions_ui(&mut self, ui: &mut egui::Ui) -> Option<OnboardingOutcome> {
        ui.label("Screen Pen needs screen recording permission. Follow these steps:");
        ui.add_space(6.0);
        for step in SETUP_STEPS {
            ui.label(step);
        }
        ui.add_space(8.0);

        if ui.button("Open privacy settings").clicked() {
            self.open_settings_with(platform::open_privacy_settings);
        }
        if self.settings_opened {
            ui.colored_label(ui.visuals().warn_fg_color, NAVIGATION_HINT);
        }
        if let Some(error) = &self.settings_error {
            ui.colored_label(ui.visuals().error_fg_color, error);
        }

        ui.separator();
        ui.label("Executable path:");
        ui.add(egui::Label::new(egui::RichText::new(&self.executable).monospace()).selectable(true));
        ui.label("If you start Screen Pen from a terminal, that terminal needs permission too.");
        ui.add_space(8.0);

        if ui.button("Done, restart Screen Pen").clicked() {
            return Some(OnboardingOutcome::Restart);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PenError;

    #[test]
    fn test_close_meaning_depends_on_step() {
        let mut onboarding = Onboarding::new("/usr/bin/screen_pen".to_owned());
        assert_eq!(onboarding.step(), OnboardingStep::Prompt);
        assert_eq!(onboarding.on_close(), OnboardingOutcome::Continue);

        onboarding.accept_setup();
        assert_eq!(onboarding.step(), OnboardingStep::Instructions);
        assert_eq!(onboarding.on_close(), OnboardingOutcome::Exit);
    }

    #[test]
    fn test_settings_outcome_is_recorded() {
        let mut onboarding = Onboarding::new(String::new());
        onboarding.open_settings_with(|| Err(PenError::SettingsUnavailable));
        assert!(!onboarding.settings_opened());
        assert!(onboarding.settings_error().is_some());

        onboarding.open_settings_with(|| Ok(()));
        assert!(onboarding.settings_opened());
        assert!(onboarding.settings_error().is_none());
    }
}
