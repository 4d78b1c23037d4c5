//! Bounded palette storage and its shading-visible view.

use bytemuck::{Pod, Zeroable};
use ditherwave_core::{DitherError, DitherResult};
use ditherwave_shared::{Color, MAX_PALETTE_SIZE};

/// Ordered, bounded list of display-space colors.
///
/// Invariant: `1 <= size <= MAX_PALETTE_SIZE` and every slot at or beyond
/// `size` is black.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteStore {
    colors: [Color; MAX_PALETTE_SIZE],
    size: usize,
}

impl Default for PaletteStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PaletteStore {
    /// Creates the default two-color black/white palette.
    #[must_use]
    pub fn new() -> Self {
        let mut colors = [Color::BLACK; MAX_PALETTE_SIZE];
        colors[1] = Color::WHITE;
        Self { colors, size: 2 }
    }

    /// Creates a palette from linear colors.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::EmptyPalette`] if `colors` is empty.
    pub fn from_colors(colors: &[Color]) -> DitherResult<Self> {
        let mut store = Self::new();
        store.reset(colors)?;
        Ok(store)
    }

    /// Replaces the whole palette.
    ///
    /// Input is linear and is converted to display space. Short input is
    /// padded with black, long input keeps the first `MAX_PALETTE_SIZE`
    /// colors.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::EmptyPalette`] if `colors` is empty. The store is
    /// left unchanged.
    pub fn reset(&mut self, colors: &[Color]) -> DitherResult<()> {
        if colors.is_empty() {
            return Err(DitherError::EmptyPalette);
        }

        let size = colors.len().min(MAX_PALETTE_SIZE);
        let mut slots = [Color::BLACK; MAX_PALETTE_SIZE];
        for (slot, color) in slots.iter_mut().zip(&colors[..size]) {
            *slot = color.to_srgb();
        }

        self.colors = slots;
        self.size = size;
        Ok(())
    }

    /// Replaces the color at `index` with a linear color.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::OutOfRange`] if `index >= size`.
    pub fn set_at(&mut self, index: usize, color: Color) -> DitherResult<()> {
        if index >= self.size {
            return Err(DitherError::OutOfRange {
                index,
                size: self.size,
            });
        }

        self.colors[index] = color.to_srgb();
        Ok(())
    }

    /// Appends a linear color, returning the slot it landed in.
    ///
    /// # Errors
    ///
    /// Returns [`DitherError::PaletteFull`] at capacity. The store is left
    /// unchanged.
    pub fn append(&mut self, color: Color) -> DitherResult<usize> {
        if self.is_full() {
            return Err(DitherError::PaletteFull {
                capacity: MAX_PALETTE_SIZE,
            });
        }

        let index = self.size;
        self.colors[index] = color.to_srgb();
        self.size += 1;
        Ok(index)
    }

    /// Number of active colors.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Returns true if no more colors can be appended.
    #[inline]
    #[must_use]
    pub const fn is_full(&self) -> bool {
        self.size >= MAX_PALETTE_SIZE
    }

    /// Display-space color at `index`, `None` outside the active range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Color> {
        self.active().get(index).copied()
    }

    /// Active display-space colors.
    #[must_use]
    pub fn active(&self) -> &[Color] {
        &self.colors[..self.size]
    }

    /// Read-only snapshot of all slots plus the active size.
    #[must_use]
    pub fn view(&self) -> PaletteView {
        PaletteView {
            colors: self.colors,
            size: self.size as u32,
        }
    }
}

/// Fixed-capacity palette snapshot, laid out for direct GPU upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PaletteView {
    colors: [Color; MAX_PALETTE_SIZE],
    size: u32,
}

impl PaletteView {
    /// Every slot, including black padding.
    #[inline]
    #[must_use]
    pub const fn slots(&self) -> &[Color; MAX_PALETTE_SIZE] {
        &self.colors
    }

    /// Active slot count, clamped to `1..=MAX_PALETTE_SIZE`.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        (self.size as usize).clamp(1, MAX_PALETTE_SIZE)
    }

    /// Always false: a palette has at least one color.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Active colors.
    #[must_use]
    pub fn active(&self) -> &[Color] {
        &self.colors[..self.len()]
    }

    /// Index of the active color closest to `color` (Euclidean RGB).
    ///
    /// Ties go to the lower index.
    #[must_use]
    pub fn nearest_index(&self, color: Color) -> usize {
        let mut best = 0;
        let mut best_distance = f32::INFINITY;

        for (index, candidate) in self.active().iter().enumerate() {
            let distance = color.distance(*candidate);
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }

        best
    }

    /// Active color closest to `color`.
    #[inline]
    #[must_use]
    pub fn nearest(&self, color: Color) -> Color {
        self.colors[self.nearest_index(color)]
    }

    /// Raw bytes for uploading.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}
