//! Row-major RGBA frame buffer.

use ditherwave_shared::Rgba;

/// A `width x height` image of linear-float pixels, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl FrameBuffer {
    /// Creates a transparent black frame.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    /// Creates a frame with every pixel set to `value`.
    #[must_use]
    pub fn filled(width: u32, height: u32, value: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width as usize * height as usize],
        }
    }

    /// Wraps existing pixels. Returns `None` if the length does not match.
    #[must_use]
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        (pixels.len() == width as usize * height as usize).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Width in pixels.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns true if the frame has no pixels.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    /// Pixel at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    /// Writes the pixel at `(x, y)`. Returns false if out of bounds.
    pub fn set(&mut self, x: u32, y: u32, value: Rgba) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels[i] = value;
                true
            }
            None => false,
        }
    }

    /// One row of pixels.
    #[must_use]
    pub fn row(&self, y: u32) -> Option<&[Rgba]> {
        if y >= self.height {
            return None;
        }
        let start = y as usize * self.width as usize;
        Some(&self.pixels[start..start + self.width as usize])
    }

    /// All pixels, row-major.
    #[inline]
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// All pixels, row-major, mutable.
    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// Resizes to match `width x height`, clearing to transparent black.
    ///
    /// Keeps the allocation when the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width == width && self.height == height {
            return;
        }
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels
            .resize(width as usize * height as usize, Rgba::TRANSPARENT);
    }

    /// Copies `other` into this frame, resizing if needed.
    pub fn copy_from(&mut self, other: &Self) {
        self.width = other.width;
        self.height = other.height;
        self.pixels.clear();
        self.pixels.extend_from_slice(&other.pixels);
    }

    /// Texture coordinate of the center of pixel `(x, y)`.
    #[inline]
    #[must_use]
    pub fn uv(&self, x: u32, y: u32) -> [f32; 2] {
        uv_of(x, y, self.width, self.height)
    }

    /// Quantizes to 8-bit RGBA, row-major.
    #[must_use]
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| p.to_rgba8()).collect()
    }
}

/// Texture coordinate of the center of pixel `(x, y)` in a `width x height` frame.
#[inline]
#[must_use]
pub(crate) fn uv_of(x: u32, y: u32, width: u32, height: u32) -> [f32; 2] {
    [
        (x as f32 + 0.5) / width.max(1) as f32,
        (y as f32 + 0.5) / height.max(1) as f32,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixels_checks_length() {
        assert!(FrameBuffer::from_pixels(2, 2, vec![Rgba::TRANSPARENT; 4]).is_some());
        assert!(FrameBuffer::from_pixels(2, 2, vec![Rgba::TRANSPARENT; 3]).is_none());
    }

    #[test]
    fn test_get_set_bounds() {
        let mut frame = FrameBuffer::new(3, 2);
        let red = Rgba::new(1.0, 0.0, 0.0, 1.0);

        assert!(frame.set(2, 1, red));
        assert!(!frame.set(3, 0, red));
        assert_eq!(frame.get(2, 1), Some(red));
        assert_eq!(frame.get(0, 2), None);
        assert_eq!(frame.row(1).unwrap()[2], red);
    }

    #[test]
    fn test_uv_is_pixel_center() {
        let frame = FrameBuffer::new(4, 2);
        assert_eq!(frame.uv(0, 0), [0.125, 0.25]);
        assert_eq!(frame.uv(3, 1), [0.875, 0.75]);
    }

    #[test]
    fn test_rgba8_export() {
        let frame = FrameBuffer::filled(2, 1, Rgba::new(1.0, 0.0, 0.5, 1.0));
        assert_eq!(frame.to_rgba8(), vec![255, 0, 128, 255, 255, 0, 128, 255]);
    }

    #[test]
    fn test_resize_clears() {
        let mut frame = FrameBuffer::filled(2, 2, Rgba::new(1.0, 1.0, 1.0, 1.0));
        frame.resize(3, 1);
        assert_eq!(frame.pixels().len(), 3);
        assert!(frame.pixels().iter().all(|p| *p == Rgba::TRANSPARENT));
    }
}
