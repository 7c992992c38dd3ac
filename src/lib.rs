#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod canvas;
pub mod capture;
pub mod command;
pub mod config;
pub mod error;
pub mod input;
pub mod onboarding;
pub mod overlay;
pub mod panels;
pub mod platform;
pub mod renderer;
pub mod tool;

pub use app::{Launch, ScreenPenApp};
pub use canvas::Canvas;
pub use command::Command;
pub use config::{DrawingConfig, OverlayConfig};
pub use error::{PenError, PenResult};
pub use overlay::{Mode, Overlay};
pub use renderer::Renderer;
pub use tool::{Shape, ToolKind};
