//! WGSL source for the particle sprites.
//!
//! Each particle is an instanced six-vertex quad. The quad offset is applied
//! in clip space before the perspective divide, so sprites shrink with
//! distance: a sprite at view depth `d` spans `point_size / (2 * d)` of the
//! viewport height.

use bytemuck::{Pod, Zeroable};

/// Uniform block shared by both stages. Layout matches `Uniforms` in
/// [`PARTICLE_SHADER`].
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub aspect: f32,
    pub point_size: f32,
    pub _padding: [f32; 2],
}

pub const PARTICLE_SHADER: &str = r#"struct Uniforms {
    view_proj: mat4x4<f32>,
    aspect: f32,
    point_size: f32,
};

@group(0) @binding(0)
var<uniform> uniforms: Uniforms;

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

@vertex
fn vs_main(
    @builtin(vertex_index) vertex_index: u32,
    @location(0) particle_pos: vec3<f32>,
    @location(1) particle_color: vec3<f32>,
) -> VertexOutput {
    var quad_vertices = array<vec2<f32>, 6>(
        vec2<f32>(-1.0, -1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>(-1.0,  1.0),
        vec2<f32>( 1.0, -1.0),
        vec2<f32>( 1.0,  1.0),
    );

    let quad_pos = quad_vertices[vertex_index];
    let half_size = uniforms.point_size * 0.5;

    var clip_pos = uniforms.view_proj * vec4<f32>(particle_pos, 1.0);
    clip_pos.x += quad_pos.x * half_size / uniforms.aspect;
    clip_pos.y += quad_pos.y * half_size;

    var out: VertexOutput;
    out.clip_position = clip_pos;
    out.color = particle_color;
    out.uv = quad_pos;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let dist = length(in.uv);
    if dist > 1.0 {
        discard;
    }
    let alpha = 1.0 - smoothstep(0.5, 1.0, dist);
    return vec4<f32>(in.color, alpha);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    /// Validates WGSL code using naga.
    fn validate_wgsl(code: &str) -> Result<(), String> {
        let module = naga::front::wgsl::parse_str(code)
            .map_err(|e| format!("WGSL parse error: {:?}", e))?;

        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        );
        validator
            .validate(&module)
            .map_err(|e| format!("WGSL validation error: {:?}", e))?;

        Ok(())
    }

    #[test]
    fn test_particle_shader_is_valid_wgsl() {
        if let Err(e) = validate_wgsl(PARTICLE_SHADER) {
            panic!("{}", e);
        }
    }

    #[test]
    fn test_entry_points_present() {
        let module = naga::front::wgsl::parse_str(PARTICLE_SHADER).unwrap();
        let names: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }

    #[test]
    fn test_sprite_height_attenuates_with_depth() {
        use crate::gpu::Camera;
        use glam::{Vec3, Vec4};

        // Same clip-space offset as vs_main, applied to the field center
        let camera = Camera::new();
        let point_size = 0.05;
        let half_size = point_size * 0.5;
        let clip = camera.model_view_proj(1.5, Vec3::ZERO) * Vec4::new(0.0, 0.0, 0.0, 1.0);
        let depth = clip.w;

        let top = (clip.y + half_size) / clip.w;
        let bottom = (clip.y - half_size) / clip.w;
        // NDC spans 2 units of height
        let fraction = (top - bottom) / 2.0;

        assert!((depth - camera.distance).abs() < 1e-4);
        assert!((fraction - point_size / (2.0 * depth)).abs() < 1e-7);
    }

    #[test]
    fn test_uniform_size_is_16_byte_aligned() {
        assert_eq!(std::mem::size_of::<Uniforms>(), 80);
        assert_eq!(std::mem::size_of::<Uniforms>() % 16, 0);
    }
}
