use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the capture, save and OS integration paths.
///
/// None of these are fatal: callers log them or show them in a message dialog
/// and carry on with the previous state.
#[derive(Error, Debug)]
pub enum PenError {
    #[error("screen capture failed: {0}")]
    Capture(String),
    #[error("no display available for capture")]
    NoDisplay,
    #[error("captured pixel buffer does not match {width}x{height}")]
    MalformedImage { width: u32, height: u32 },
    #[error("failed to save image to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("privacy settings could not be opened on this platform")]
    SettingsUnavailable,
    #[error("failed to relaunch application: {0}")]
    Relaunch(#[from] std::io::Error),
}

pub type PenResult<T> = Result<T, PenError>;
