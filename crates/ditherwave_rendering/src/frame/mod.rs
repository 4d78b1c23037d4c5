//! CPU-side frame storage.

mod buffer;

pub use buffer::FrameBuffer;
pub(crate) use buffer::uv_of;
