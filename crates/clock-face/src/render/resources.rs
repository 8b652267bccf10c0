use anyhow::{Context, Result};
use wgpu::util::DeviceExt;

use crate::frame::MeshId;
use crate::geometry::{fan_indices, ClockGeometry, Topology, Vertex, VertexSet};

use super::shader::{check_wgsl, DrawUniform, CLOCK_WGSL, FS_ENTRY, VS_ENTRY};

/// How a vertex set is drawn: an optional index list and the element count
/// passed to the draw call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawSpec {
    pub indices: Option<Vec<u16>>,
    pub count: u32,
}

/// Derives the draw for `set` from the set itself.
///
/// Fans become an indexed triangle list; plain lists draw every vertex.
pub fn draw_spec(set: &VertexSet) -> DrawSpec {
    match set.topology() {
        Topology::TriangleFan => {
            let indices = fan_indices(set.len());
            DrawSpec {
                count: indices.len() as u32,
                indices: Some(indices),
            }
        }
        Topology::TriangleList => DrawSpec {
            indices: None,
            count: set.len() as u32,
        },
    }
}

/// A vertex set resident on the GPU.
///
/// Fans carry an index buffer that expands them to a triangle list; lists are
/// drawn straight from the vertex buffer. Never refilled after upload.
pub struct Mesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: Option<wgpu::Buffer>,
    draw_count: u32,
}

impl Mesh {
    /// Uploads `set` into a buffer sized to its byte length.
    pub fn upload(device: &wgpu::Device, label: &str, set: &VertexSet) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(label),
            contents: bytemuck::cast_slice(set.vertices()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let DrawSpec { indices, count } = draw_spec(set);
        let index_buffer = indices.map(|indices| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} indices")),
                contents: bytemuck::cast_slice(&indices),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        log::debug!(
            "uploaded {label}: {} vertices, {} bytes, {count} draw elements",
            set.len(),
            set.byte_len()
        );

        Self {
            vertex_buffer,
            index_buffer,
            draw_count: count,
        }
    }

    /// Binds the mesh's buffers to slot 0 of `rpass`.
    pub fn bind(&self, rpass: &mut wgpu::RenderPass<'_>) {
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        if let Some(ibo) = self.index_buffer.as_ref() {
            rpass.set_index_buffer(ibo.slice(..), wgpu::IndexFormat::Uint16);
        }
    }

    /// Draws the whole mesh. The mesh must be the one last bound.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass<'_>) {
        if self.index_buffer.is_some() {
            rpass.draw_indexed(0..self.draw_count, 0, 0..1);
        } else {
            rpass.draw(0..self.draw_count, 0..1);
        }
    }
}

/// Rounds `size` up to a multiple of `alignment` (a power of two).
pub fn aligned_stride(size: u64, alignment: u64) -> u64 {
    debug_assert!(alignment.is_power_of_two());
    (size + alignment - 1) & !(alignment - 1)
}

/// Uniform buffer with one [`DrawUniform`] per draw, addressed by dynamic offset.
pub struct UniformSlots {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    stride: u64,
    capacity: usize,
}

impl UniformSlots {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, capacity: usize) -> Self {
        let alignment = device.limits().min_uniform_buffer_offset_alignment as u64;
        let stride = aligned_stride(std::mem::size_of::<DrawUniform>() as u64, alignment);

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("clock draw uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("clock draw bind group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: Some(DrawUniform::min_binding_size()),
                }),
            }],
        });

        Self {
            buffer,
            bind_group,
            stride,
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    /// Dynamic offset of `slot`.
    pub fn offset(&self, slot: usize) -> u32 {
        (self.stride * slot as u64) as u32
    }

    /// Writes `uniforms` into consecutive slots starting at 0.
    ///
    /// `scratch` is reused across frames to avoid reallocating.
    pub fn write(&self, queue: &wgpu::Queue, uniforms: &[DrawUniform], scratch: &mut Vec<u8>) {
        debug_assert!(uniforms.len() <= self.capacity);
        pack_slots(uniforms, self.stride as usize, scratch);
        if !scratch.is_empty() {
            queue.write_buffer(&self.buffer, 0, scratch);
        }
    }
}

/// Lays `uniforms` out `stride` bytes apart, zero-filling the gaps.
pub fn pack_slots(uniforms: &[DrawUniform], stride: usize, out: &mut Vec<u8>) {
    out.clear();
    out.resize(stride * uniforms.len(), 0);
    for (slot, u) in uniforms.iter().enumerate() {
        let start = slot * stride;
        let bytes = bytemuck::bytes_of(u);
        out[start..start + bytes.len()].copy_from_slice(bytes);
    }
}

/// GPU resources for the whole run: pipeline, uniform slots and the three meshes.
pub struct ClockResources {
    pipeline: wgpu::RenderPipeline,
    uniforms: UniformSlots,
    outer: Mesh,
    inner: Mesh,
    hand: Mesh,
}

impl ClockResources {
    /// Checks the shader, uploads `geometry` and builds the pipeline.
    ///
    /// `draw_slots` is the number of draws per frame.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        geometry: ClockGeometry,
        draw_slots: usize,
    ) -> Result<Self> {
        check_wgsl("clock shader", CLOCK_WGSL).context("clock shader rejected")?;

        let ClockGeometry { outer, inner, hand } = geometry;

        let outer = Mesh::upload(device, "clock outer disc", &outer);
        let inner = Mesh::upload(device, "clock inner disc", &inner);
        let hand = Mesh::upload(device, "clock hand", &hand);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("clock shader"),
            source: wgpu::ShaderSource::Wgsl(CLOCK_WGSL.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("clock bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: Some(DrawUniform::min_binding_size()),
                },
                count: None,
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("clock pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("clock pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some(VS_ENTRY),
                compilation_options: Default::default(),
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some(FS_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        let uniforms = UniformSlots::new(device, &bind_group_layout, draw_slots);

        log::info!(
            "clock resources ready ({} draw slots, {}-byte stride, format {surface_format:?})",
            uniforms.capacity(),
            uniforms.stride
        );

        Ok(Self {
            pipeline,
            uniforms,
            outer,
            inner,
            hand,
        })
    }

    pub fn pipeline(&self) -> &wgpu::RenderPipeline {
        &self.pipeline
    }

    pub fn uniforms(&self) -> &UniformSlots {
        &self.uniforms
    }

    pub fn mesh(&self, id: MeshId) -> &Mesh {
        match id {
            MeshId::OuterDisc => &self.outer,
            MeshId::InnerDisc => &self.inner,
            MeshId::Hand => &self.hand,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{disc_fan, hand_polygon};
    use clock_engine::paint::Color;
    use glam::Mat4;

    // ── draw counts ───────────────────────────────────────────────────────

    #[test]
    fn forty_sided_fan_draws_120_indices() {
        let spec = draw_spec(&disc_fan(40, 1.0));
        let indices = spec.indices.as_ref().expect("fans are indexed");
        assert_eq!(indices.len(), 120);
        assert_eq!(spec.count, 120);
        assert!(indices.iter().all(|&i| (i as usize) < 42));
    }

    #[test]
    fn hand_draws_nine_vertices_unindexed() {
        let spec = draw_spec(&hand_polygon());
        assert_eq!(spec, DrawSpec { indices: None, count: 9 });
    }

    #[test]
    fn draw_count_follows_side_count() {
        for sides in [3, 12, 40, 360] {
            assert_eq!(draw_spec(&disc_fan(sides, 0.8)).count, 3 * sides);
        }
    }

    // ── uniform slots ─────────────────────────────────────────────────────

    #[test]
    fn stride_rounds_up_to_alignment() {
        assert_eq!(aligned_stride(80, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(257, 256), 512);
        assert_eq!(aligned_stride(80, 16), 80);
    }

    #[test]
    fn pack_slots_places_each_uniform_at_its_stride() {
        let a = DrawUniform::new(Mat4::IDENTITY, Color::RED);
        let b = DrawUniform::new(Mat4::from_scale(glam::Vec3::splat(2.0)), Color::BLUE);
        let mut out = Vec::new();
        pack_slots(&[a, b], 256, &mut out);

        assert_eq!(out.len(), 512);
        assert_eq!(&out[..80], bytemuck::bytes_of(&a));
        assert!(out[80..256].iter().all(|&byte| byte == 0));
        assert_eq!(&out[256..336], bytemuck::bytes_of(&b));
    }

    #[test]
    fn pack_slots_reuses_scratch() {
        let u = DrawUniform::new(Mat4::IDENTITY, Color::GREEN);
        let mut out = vec![0xff; 1024];
        pack_slots(&[u], 128, &mut out);
        assert_eq!(out.len(), 128);
        assert!(out[80..].iter().all(|&byte| byte == 0));
    }

    #[test]
    fn pack_slots_empty_input() {
        let mut out = vec![1, 2, 3];
        pack_slots(&[], 256, &mut out);
        assert!(out.is_empty());
    }
}
