//! Analog clock face.
//!
//! A rim, a face and three hands drawn with wgpu, with hand angles taken from
//! the local wall clock every frame.

pub mod app;
pub mod config;
pub mod frame;
pub mod geometry;
pub mod render;
pub mod time;

pub use app::{run, ClockApp};
pub use config::ClockConfig;
