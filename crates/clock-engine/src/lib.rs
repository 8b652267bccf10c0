//! Clock engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the clock app:
//! window and event loop, wgpu device/surface, per-frame context and logging.

pub mod core;
pub mod device;
pub mod window;

pub mod logging;
pub mod paint;
pub mod render;
