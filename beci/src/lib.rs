#![doc = include_str!("../README.md")]
#![deny(clippy::unwrap_used, rustdoc::broken_intra_doc_links)]

mod app;
pub mod config;
pub mod controls;
pub mod data;
pub mod encoding;
pub mod generator;
mod hit;
pub mod layers;
mod plugin;
pub mod popup;
pub mod renderer;
pub mod validation;
mod windows;

pub use app::{AppState, BeciApp, HELP_TIMEOUT, NARROW_SCREEN};
pub use config::MapConfig;
pub use controls::{Command, Controls};
pub use layers::{LayerId, Layers, Surface};
pub use plugin::DataLayers;
pub use renderer::{MapView, RenderSurfaceError, add_data_layers, initialize, toggle_layer};
pub use windows::ErrorScreen;
