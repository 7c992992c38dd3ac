//! OS integration for the permission onboarding: the privacy settings panel
//! and relaunching the application.

use std::process::{Child, Command};

use crate::error::{PenError, PenResult};

#[cfg(target_os = "macos")]
const PRIVACY_SETTINGS_URL: Option<&str> =
    Some("x-apple.systempreferences:com.apple.preference.security?Privacy_ScreenCapture");
#[cfg(target_os = "windows")]
const PRIVACY_SETTINGS_URL: Option<&str> = Some("ms-settings:privacy");
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const PRIVACY_SETTINGS_URL: Option<&str> = None;

/// Programs tried in order when the URL scheme cannot be opened.
#[cfg(target_os = "macos")]
const SETTINGS_FALLBACKS: &[(&str, &[&str])] = &[
    ("open", &["/System/Applications/System Settings.app"]),
    ("open", &["/System/Applications/System Preferences.app"]),
];
#[cfg(target_os = "windows")]
const SETTINGS_FALLBACKS: &[(&str, &[&str])] = &[("control.exe", &[])];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const SETTINGS_FALLBACKS: &[(&str, &[&str])] = &[
    ("gnome-control-center", &["privacy"]),
    ("systemsettings", &[]),
];

/// Open the platform's screen-recording privacy panel.
pub fn open_privacy_settings() -> PenResult<()> {
    open_settings_with(PRIVACY_SETTINGS_URL, SETTINGS_FALLBACKS, |url| {
        open::that(url).is_ok()
    })
}

fn open_settings_with(
    url: Option<&str>,
    fallbacks: &[(&str, &[&str])],
    open_url: impl FnOnce(&str) -> bool,
) -> PenResult<()> {
    if let Some(url) = url {
        if open_url(url) {
            log::info!("Opened privacy settings via {url}");
            return Ok(());
        }
        log::warn!("Could not open {url}, trying settings application");
    }
    for (program, args) in fallbacks {
        match Command::new(program).args(*args).spawn() {
            Ok(_) => {
                log::info!("Launched {program} for privacy settings");
                return Ok(());
            }
            Err(e) => log::debug!("Failed to launch {program}: {e}"),
        }
    }
    Err(PenError::SettingsUnavailable)
}

/// Start a fresh copy of this executable with the same arguments.
pub fn relaunch() -> PenResult<Child> {
    let exe = std::env::current_exe()?;
    log::info!("Relaunching {}", exe.display());
    let child = Command::new(exe).args(std::env::args_os().skip(1)).spawn()?;
    Ok(child)
}

/// Path of the running executable, shown so the user knows what to grant.
pub fn executable_path() -> String {
    std::env::current_exe()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|_| "<unknown>".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_success_skips_fallbacks() {
        let fallbacks: &[(&str, &[&str])] = &[("/definitely/not/a/program", &[])];
        assert!(open_settings_with(Some("settings:privacy"), fallbacks, |_| true).is_ok());
    }

    #[test]
    fn test_all_strategies_failing_is_reported() {
        let fallbacks: &[(&str, &[&str])] = &[("/definitely/not/a/program", &[])];
        let result = open_settings_with(Some("settings:privacy"), fallbacks, |_| false);
        assert!(matches!(result, Err(PenError::SettingsUnavailable)));

        let result = open_settings_with(None, &[], |_| true);
        assert!(matches!(result, Err(PenError::SettingsUnavailable)));
    }

    #[test]
    fn test_executable_path_is_known() {
        assert!(!executable_path().is_empty());
    }
}
