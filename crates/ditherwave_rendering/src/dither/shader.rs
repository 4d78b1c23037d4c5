//! GPU dither pass: WGSL source and its uniform block.
//!
//! ## Bind Group 0
//!
//! ```text
//! binding 0: texture_2d<f32>        rendered frame
//! binding 1: sampler                 nearest, clamp-to-edge
//! binding 2: uniform DitherUniforms  288 bytes
//! ```
//!
//! Drawn as a single fullscreen triangle (3 vertices, no vertex buffer).

use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use ditherwave_shared::MAX_PALETTE_SIZE;

use super::params::DitherSettings;

/// Uniform block read by [`DITHER_SHADER_WGSL`].
///
/// Palette entries are padded to vec4 to satisfy uniform array stride rules.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DitherUniforms {
    /// Display-space palette, xyz = rgb, w unused.
    pub palette: [[f32; 4]; MAX_PALETTE_SIZE],
    /// Frame size in pixels.
    pub resolution: [f32; 2],
    /// Matrix width.
    pub matrix_width: u32,
    /// Matrix height.
    pub matrix_height: u32,
    /// Active palette size.
    pub palette_size: u32,
    /// Centering constant.
    pub dither_offset: f32,
    /// Perturbation strength.
    pub noise_scale: f32,
    /// Seconds since start, 0 disables jitter.
    pub time: f32,
    /// Jitter angular speed.
    pub jitter_speed: f32,
    /// Jitter spatial frequency.
    pub jitter_frequency: f32,
    /// Jitter amplitude.
    pub jitter_intensity: f32,
    /// Padding to 16-byte multiple.
    pub _pad: f32,
}

impl DitherUniforms {
    /// Builds the block for one frame.
    #[must_use]
    pub fn new(settings: &DitherSettings, width: u32, height: u32, time: f32) -> Self {
        let view = settings.palette.view();
        let mut palette = [[0.0; 4]; MAX_PALETTE_SIZE];
        for (slot, color) in palette.iter_mut().zip(view.slots()) {
            *slot = color.to_padded();
        }

        let params = &settings.params;
        Self {
            palette,
            resolution: [width as f32, height as f32],
            matrix_width: params.matrix_width(),
            matrix_height: params.matrix_height(),
            palette_size: view.len() as u32,
            dither_offset: params.dither_offset(),
            noise_scale: params.noise_scale(),
            time,
            jitter_speed: params.jitter_speed(),
            jitter_frequency: params.jitter_frequency(),
            jitter_intensity: params.jitter_intensity(),
            _pad: 0.0,
        }
    }

    /// Raw bytes for `queue.write_buffer`.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Shader module descriptor for the dither pass.
#[must_use]
pub fn shader_module_descriptor() -> wgpu::ShaderModuleDescriptor<'static> {
    wgpu::ShaderModuleDescriptor {
        label: Some("Dither Pass Shader"),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(DITHER_SHADER_WGSL)),
    }
}

/// WGSL source. Entry points `vs_main` and `fs_main`.
pub const DITHER_SHADER_WGSL: &str = r#"
// =============================================================================
// Ordered Dither Pass
// =============================================================================

struct DitherUniforms {
    palette: array<vec4<f32>, 15>,
    resolution: vec2<f32>,
    matrix_width: u32,
    matrix_height: u32,
    palette_size: u32,
    dither_offset: f32,
    noise_scale: f32,
    time: f32,
    jitter_speed: f32,
    jitter_frequency: f32,
    jitter_intensity: f32,
    _pad: f32,
}

@group(0) @binding(0) var frame_texture: texture_2d<f32>;
@group(0) @binding(1) var frame_sampler: sampler;
@group(0) @binding(2) var<uniform> u: DitherUniforms;

var<private> BAYER_2: array<u32, 4> = array<u32, 4>(0u, 2u, 3u, 1u);

var<private> BAYER_3: array<u32, 9> = array<u32, 9>(0u, 7u, 3u, 6u, 5u, 2u, 4u, 1u, 8u);

var<private> BAYER_4: array<u32, 16> = array<u32, 16>(
    0u, 8u, 2u, 10u, 12u, 4u, 14u, 6u, 3u, 11u, 1u, 9u, 15u, 7u, 13u, 5u
);

var<private> BAYER_8: array<u32, 64> = array<u32, 64>(
    0u, 32u, 8u, 40u, 2u, 34u, 10u, 42u,
    48u, 16u, 56u, 24u, 50u, 18u, 58u, 26u,
    12u, 44u, 4u, 36u, 14u, 46u, 6u, 38u,
    60u, 28u, 52u, 20u, 62u, 30u, 54u, 22u,
    3u, 35u, 11u, 43u, 1u, 33u, 9u, 41u,
    51u, 19u, 59u, 27u, 49u, 17u, 57u, 25u,
    15u, 47u, 7u, 39u, 13u, 45u, 5u, 37u,
    63u, 31u, 55u, 23u, 61u, 29u, 53u, 21u
);

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
}

@vertex
fn vs_main(@builtin(vertex_index) index: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((index << 1u) & 2u), f32(index & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv.x * 2.0 - 1.0, 1.0 - uv.y * 2.0, 0.0, 1.0);
    out.uv = uv;
    return out;
}

fn bayer_threshold(x: u32, y: u32, size: u32) -> f32 {
    switch size {
        case 2u: { return f32(BAYER_2[(y % 2u) * 2u + (x % 2u)]) / 4.0; }
        case 3u: { return f32(BAYER_3[(y % 3u) * 3u + (x % 3u)]) / 9.0; }
        case 4u: { return f32(BAYER_4[(y % 4u) * 4u + (x % 4u)]) / 16.0; }
        case 8u: { return f32(BAYER_8[(y % 8u) * 8u + (x % 8u)]) / 64.0; }
        default: { return 0.5; }
    }
}

fn nearest_color(color: vec3<f32>) -> vec3<f32> {
    let count = clamp(u.palette_size, 1u, 15u);
    var best = u.palette[0].xyz;
    var best_distance = 1e30;
    for (var i = 0u; i < count; i = i + 1u) {
        let candidate = u.palette[i].xyz;
        let d = distance(color, candidate);
        if (d < best_distance) {
            best_distance = d;
            best = candidate;
        }
    }
    return best;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let input = textureSample(frame_texture, frame_sampler, in.uv);
    let pixel = vec2<u32>(in.uv * u.resolution);

    let w = max(u.matrix_width, 1u);
    let h = max(u.matrix_height, 1u);
    var threshold = bayer_threshold(pixel.x % w, pixel.y % h, max(w, h));

    let luma = dot(input.rgb, vec3<f32>(0.299, 0.587, 0.114));
    if (u.time > 0.0) {
        let phase = u.time * u.jitter_speed + (in.uv.x + in.uv.y) * u.jitter_frequency;
        threshold = threshold + sin(phase) * u.jitter_intensity * luma;
    }

    let perturbed = input.rgb + vec3<f32>((threshold - u.dither_offset) * u.noise_scale);
    return vec4<f32>(nearest_color(perturbed), input.a);
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bayer::threshold;
    use crate::palette::Preset;

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<DitherUniforms>(), 288);
        assert_eq!(std::mem::size_of::<DitherUniforms>() % 16, 0);
    }

    #[test]
    fn test_uniforms_from_settings() {
        let mut settings = DitherSettings::new();
        settings.apply_preset(Preset::Vaporwave).unwrap();
        let uniforms = DitherUniforms::new(&settings, 640, 480, 1.5);

        assert_eq!(uniforms.palette_size, 5);
        assert_eq!(uniforms.matrix_width, 1);
        assert_eq!(uniforms.matrix_height, 4);
        assert_eq!(uniforms.resolution, [640.0, 480.0]);
        assert_eq!(uniforms.time, 1.5);
        assert_eq!(uniforms.noise_scale, 0.6);
        assert!(uniforms.palette[5..].iter().all(|c| *c == [0.0; 4]));
        assert_eq!(uniforms.as_bytes().len(), 288);
    }

    #[test]
    fn test_shader_bayer_8_matches_cpu_table() {
        let start = DITHER_SHADER_WGSL
            .find("BAYER_8: array<u32, 64> = array<u32, 64>(")
            .unwrap();
        let body = &DITHER_SHADER_WGSL[start..];
        let open = body.find('(').unwrap();
        let close = body.find(')').unwrap();

        let values: Vec<u32> = body[open + 1..close]
            .split(',')
            .map(|v| v.trim().trim_end_matches('u').parse().unwrap())
            .collect();
        assert_eq!(values.len(), 64);

        for (i, value) in values.iter().enumerate() {
            let (x, y) = ((i % 8) as u32, (i / 8) as u32);
            assert_eq!(*value as f32 / 64.0, threshold(x, y, 8));
        }
    }

    #[test]
    fn test_shader_entry_points() {
        assert!(DITHER_SHADER_WGSL.contains("fn vs_main"));
        assert!(DITHER_SHADER_WGSL.contains("fn fs_main"));
        assert!(DITHER_SHADER_WGSL.contains("array<vec4<f32>, 15>"));
        let descriptor = shader_module_descriptor();
        assert_eq!(descriptor.label, Some("Dither Pass Shader"));
    }
}
