//! Paint model shared between the app and renderers.
//!
//! Scope: flat colors only. Geometry is owned by the app.

pub mod color;

pub use color::Color;
