//! Ordered-dither pass.
//!
//! Per pixel, input color `c` at pixel `p` with texture coordinate `(u, v)`:
//!
//! ```text
//! t  = bayer(p.x mod w, p.y mod h, max(w, h))
//! L  = 0.299 r + 0.587 g + 0.114 b
//! t' = t + sin(time * speed + (u + v) * freq) * intensity * L   (time > 0)
//! c' = c + (t' - offset) * noise
//! out = (nearest_palette(c'), c.a)
//! ```
//!
//! [`DitherCompositor`] is the CPU reference; [`DITHER_SHADER_WGSL`] runs the
//! same steps on the GPU, fed by [`DitherUniforms`].

mod compositor;
mod params;
mod shader;

pub use compositor::DitherCompositor;
pub use params::{DitherParams, DitherSettings};
pub use shader::{shader_module_descriptor, DitherUniforms, DITHER_SHADER_WGSL};
