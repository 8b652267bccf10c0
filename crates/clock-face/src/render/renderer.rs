use anyhow::Result;

use clock_engine::device::Gpu;
use clock_engine::render::{RenderCtx, RenderTarget};

use crate::frame::{FramePlan, MeshId};
use crate::geometry::ClockGeometry;

use super::resources::ClockResources;
use super::shader::DrawUniform;

/// Executes a [`FramePlan`] against the clock's GPU resources.
///
/// All draws go into one pass that loads the cleared target, so later draws
/// paint over earlier ones. Each draw selects its uniform slot by dynamic
/// offset; mesh buffers are rebound only when the mesh changes.
pub struct ClockRenderer {
    resources: ClockResources,
    uniforms: Vec<DrawUniform>,
    scratch: Vec<u8>,
}

impl ClockRenderer {
    /// Creates every GPU resource the clock needs. Called once at startup.
    pub fn new(gpu: &Gpu<'_>, geometry: ClockGeometry) -> Result<Self> {
        let resources = ClockResources::new(
            gpu.device(),
            gpu.surface_format(),
            geometry,
            FramePlan::DRAW_COUNT,
        )?;

        Ok(Self {
            resources,
            uniforms: Vec::with_capacity(FramePlan::DRAW_COUNT),
            scratch: Vec::new(),
        })
    }

    pub fn render(&mut self, ctx: &RenderCtx<'_>, target: &mut RenderTarget<'_>, plan: &FramePlan) {
        self.uniforms.clear();
        self.uniforms
            .extend(plan.draws.iter().map(|d| DrawUniform::new(d.model, d.color)));

        let slots = self.resources.uniforms();
        slots.write(ctx.queue, &self.uniforms, &mut self.scratch);

        let mut rpass = target.begin_load_pass("clock pass");
        rpass.set_pipeline(self.resources.pipeline());

        let mut bound: Option<MeshId> = None;
        for (slot, draw) in plan.draws.iter().enumerate() {
            let mesh = self.resources.mesh(draw.mesh);
            if bound != Some(draw.mesh) {
                mesh.bind(&mut rpass);
                bound = Some(draw.mesh);
            }

            rpass.set_bind_group(0, slots.bind_group(), &[slots.offset(slot)]);
            mesh.draw(&mut rpass);
        }
    }
}
