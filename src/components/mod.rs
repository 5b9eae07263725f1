//! The components module contains all shared components for our app.

mod app;
pub mod audio_manager;
mod icons;
mod player;
mod queue;
mod visualizer;

pub use app::*;
pub use audio_manager::*;
pub use icons::*;
pub use player::*;
pub use queue::*;
pub use visualizer::*;
