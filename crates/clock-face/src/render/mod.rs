//! GPU side of the clock: resource setup and frame execution.

mod renderer;
mod resources;
mod shader;

pub use renderer::ClockRenderer;
pub use resources::{
    aligned_stride, draw_spec, pack_slots, ClockResources, DrawSpec, Mesh, UniformSlots,
};
pub use shader::{check_wgsl, DrawUniform, CLOCK_WGSL};
