/// Fixed-format ARGB pixel buffer
///
/// The buffer holds 32-bit pixels in `A R G B` byte order with rows padded
/// to a 64-byte stride, so the same memory can be handed to a software
/// rasterizer or uploaded as a GPU texture without repacking. Alpha is
/// ignored on draw and stored opaque.
use image::{imageops::FilterType, DynamicImage};

/// Bytes per ARGB pixel
pub const BYTES_PER_PIXEL: usize = 4;

/// Row stride alignment in bytes
const ROW_ALIGNMENT: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    bytes_per_row: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a zeroed buffer.
    ///
    /// Returns `None` for zero dimensions, when the size overflows, or when
    /// the allocator refuses the request.
    pub fn new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let bytes_per_row = width
            .checked_mul(BYTES_PER_PIXEL)?
            .checked_next_multiple_of(ROW_ALIGNMENT)?;
        let len = bytes_per_row.checked_mul(height)?;

        let mut data = Vec::new();
        data.try_reserve_exact(len).ok()?;
        data.resize(len, 0);

        Some(Self {
            width,
            height,
            bytes_per_row,
            data,
        })
    }

    /// Render `image` into a new `width` x `height` buffer.
    ///
    /// The image is scaled to exactly the requested size (aspect ratio is not
    /// preserved).
    pub fn from_image(image: &DynamicImage, width: u32, height: u32) -> Option<Self> {
        let mut buffer = Self::new(width as usize, height as usize)?;
        buffer.draw(image);
        Some(buffer)
    }

    fn draw(&mut self, image: &DynamicImage) {
        let scaled = image
            .resize_exact(self.width as u32, self.height as u32, FilterType::Triangle)
            .to_rgb8();

        // Rows are stored top-down: row 0 is the top edge of the image.
        for (x, y, pixel) in scaled.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            let offset = y as usize * self.bytes_per_row + x as usize * BYTES_PER_PIXEL;
            self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&[0xFF, r, g, b]);
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Stride in bytes, including padding
    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// Raw backing memory, padding included
    #[cfg(test)]
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Visible pixels of row `y` (padding excluded)
    pub fn row(&self, y: usize) -> &[u8] {
        let start = y * self.bytes_per_row;
        &self.data[start..start + self.width * BYTES_PER_PIXEL]
    }

    /// `[a, r, g, b]` at `(x, y)`, with `y = 0` the top row
    #[cfg(test)]
    pub(crate) fn pixel(&self, x: usize, y: usize) -> [u8; 4] {
        let offset = y * self.bytes_per_row + x * BYTES_PER_PIXEL;
        let mut px = [0u8; 4];
        px.copy_from_slice(&self.data[offset..offset + BYTES_PER_PIXEL]);
        px
    }
}
