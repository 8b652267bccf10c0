//! GPU rendering subsystem.
//!
//! Renderers own their GPU resources (pipelines, buffers) and record into the
//! frame's encoder through a [`RenderTarget`].
//!
//! Convention:
//! - CPU geometry is already in normalized device coordinates (+Y up).
//! - Passes load the cleared target; draw order is paint order.

mod ctx;

pub use ctx::{RenderCtx, RenderTarget};
