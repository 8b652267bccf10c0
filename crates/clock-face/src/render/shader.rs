use anyhow::{bail, Context, Result};
use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use clock_engine::paint::Color;

/// WGSL source of the clock pipeline.
pub const CLOCK_WGSL: &str = include_str!("shaders/clock.wgsl");

pub const VS_ENTRY: &str = "vs_main";
pub const FS_ENTRY: &str = "fs_main";

/// Per-draw uniform block (80 bytes):
///
///  offset  0  model   mat4x4<f32>
///  offset 64  color   vec3<f32>
///  offset 76  _pad    (vec3 rounds the struct up to 16-byte alignment)
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: Mat4,
    pub color: [f32; 3],
    pub _pad: f32,
}

const _: [(); 80] = [(); std::mem::size_of::<DrawUniform>()];

impl DrawUniform {
    pub fn new(model: Mat4, color: Color) -> Self {
        Self {
            model,
            color: color.to_rgb_array(),
            _pad: 0.0,
        }
    }

    pub fn min_binding_size() -> std::num::NonZeroU64 {
        std::num::NonZeroU64::new(std::mem::size_of::<Self>() as u64)
            .expect("DrawUniform has non-zero size by construction")
    }
}

/// Parses and validates WGSL, then checks the interface the pipeline relies on.
///
/// Runs before any GPU module is created so that errors surface as a readable
/// diagnostic instead of a device validation panic:
/// - compile: WGSL parse + naga validation
/// - link: both entry points exist and the uniform block at `@group(0)
///   @binding(0)` matches [`DrawUniform`]
pub fn check_wgsl(label: &str, source: &str) -> Result<naga::Module> {
    let module = match naga::front::wgsl::parse_str(source) {
        Ok(m) => m,
        Err(e) => bail!("{label}: compilation failed\n{}", e.emit_to_string(source)),
    };

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    if let Err(e) = validator.validate(&module) {
        bail!("{label}: validation failed\n{}", e.emit_to_string(source));
    }

    check_entry_point(&module, VS_ENTRY, naga::ShaderStage::Vertex)
        .with_context(|| format!("{label}: link failed"))?;
    check_entry_point(&module, FS_ENTRY, naga::ShaderStage::Fragment)
        .with_context(|| format!("{label}: link failed"))?;
    check_draw_uniform(&module).with_context(|| format!("{label}: link failed"))?;

    log::debug!("{label}: shader checks passed");
    Ok(module)
}

fn check_entry_point(module: &naga::Module, name: &str, stage: naga::ShaderStage) -> Result<()> {
    let found = module
        .entry_points
        .iter()
        .any(|ep| ep.name == name && ep.stage == stage);
    anyhow::ensure!(found, "missing {stage:?} entry point `{name}`");
    Ok(())
}

fn check_draw_uniform(module: &naga::Module) -> Result<()> {
    let Some((_, global)) = module.global_variables.iter().find(|(_, g)| {
        g.space == naga::AddressSpace::Uniform
            && g.binding
                .as_ref()
                .is_some_and(|b| b.group == 0 && b.binding == 0)
    }) else {
        bail!("no uniform bound at @group(0) @binding(0)");
    };

    let naga::TypeInner::Struct { members, span } = &module.types[global.ty].inner else {
        bail!("uniform at @group(0) @binding(0) is not a struct");
    };

    let expected_size = std::mem::size_of::<DrawUniform>() as u32;
    anyhow::ensure!(
        *span == expected_size,
        "uniform block is {span} bytes, expected {expected_size}"
    );

    for (name, offset) in [("model", 0u32), ("color", 64)] {
        let member = members.iter().find(|m| m.name.as_deref() == Some(name));
        match member {
            Some(m) if m.offset == offset => {}
            Some(m) => bail!("uniform member `{name}` at offset {}, expected {offset}", m.offset),
            None => bail!("uniform member `{name}` is missing"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_shader_passes_checks() {
        let module = check_wgsl("clock shader", CLOCK_WGSL).unwrap();
        assert_eq!(module.entry_points.len(), 2);
    }

    #[test]
    fn syntax_error_reports_diagnostic() {
        let err = check_wgsl("broken", "fn vs_main( {").unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("broken: compilation failed"), "{msg}");
    }

    #[test]
    fn missing_fragment_stage_fails_link() {
        let src = r#"
            struct DrawUniform { model: mat4x4<f32>, color: vec3<f32> };
            @group(0) @binding(0) var<uniform> u_draw: DrawUniform;
            @vertex
            fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
                return u_draw.model * vec4<f32>(p, 1.0);
            }
        "#;
        let msg = format!("{:#}", check_wgsl("no fs", src).unwrap_err());
        assert!(msg.contains("link failed") && msg.contains("fs_main"), "{msg}");
    }

    #[test]
    fn mismatched_uniform_layout_fails_link() {
        let src = r#"
            struct DrawUniform { color: vec3<f32>, model: mat4x4<f32> };
            @group(0) @binding(0) var<uniform> u_draw: DrawUniform;
            @vertex
            fn vs_main(@location(0) p: vec3<f32>) -> @builtin(position) vec4<f32> {
                return u_draw.model * vec4<f32>(p, 1.0);
            }
            @fragment
            fn fs_main() -> @location(0) vec4<f32> {
                return vec4<f32>(u_draw.color, 1.0);
            }
        "#;
        let msg = format!("{:#}", check_wgsl("swapped", src).unwrap_err());
        assert!(msg.contains("offset"), "{msg}");
    }

    #[test]
    fn draw_uniform_packs_color_after_matrix() {
        let u = DrawUniform::new(Mat4::IDENTITY, Color::rgb(0.9, 0.5, 0.5));
        let floats: &[f32; 20] = bytemuck::cast_ref(&u);
        assert_eq!(floats[0], 1.0);
        assert_eq!(floats[5], 1.0);
        assert_eq!(&floats[16..20], &[0.9, 0.5, 0.5, 0.0]);
    }
}
