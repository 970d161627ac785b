//! Output color buffer.
//!
//! A dense, row-major RGBA8 pixel array with a fixed pitch. This is the only
//! thing the tracer hands to a presentation layer; the layout matches what a
//! streaming display texture expects (`R, G, B, A` bytes per pixel).

/// One RGBA8 pixel.
pub type Rgba = [u8; 4];

/// Bytes per pixel in a [`ColorBuffer`].
pub const BYTES_PER_PIXEL: usize = 4;

/// Row-major RGBA8 frame buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorBuffer {
    width: u32,
    height: u32,
    /// Bytes per row (`width * BYTES_PER_PIXEL`)
    pitch: usize,
    data: Vec<u8>,
}

impl ColorBuffer {
    /// Create a buffer cleared to transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        let pitch = width as usize * BYTES_PER_PIXEL;
        Self {
            width,
            height,
            pitch,
            data: vec![0; pitch * height as usize],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Bytes per row.
    pub fn pitch(&self) -> usize {
        self.pitch
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba) {
        for pixel in self.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            pixel.copy_from_slice(&color);
        }
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return None;
        }
        Some(y as usize * self.pitch + x as usize * BYTES_PER_PIXEL)
    }

    /// Write a pixel. Coordinates outside the buffer are silently skipped.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(offset) = self.offset(x, y) {
            self.data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&color);
        }
    }

    /// Read a pixel, or `None` outside the buffer.
    pub fn get_pixel(&self, x: i64, y: i64) -> Option<Rgba> {
        let offset = self.offset(x, y)?;
        let mut color = [0; BYTES_PER_PIXEL];
        color.copy_from_slice(&self.data[offset..offset + BYTES_PER_PIXEL]);
        Some(color)
    }

    /// Copy a `block_width`-wide row-major block of pixels with its top-left
    /// corner at `(x, y)`. Parts falling outside the buffer are clipped.
    pub fn write_block(&mut self, x: i64, y: i64, block_width: u32, pixels: &[Rgba]) {
        if block_width == 0 {
            return;
        }
        for (row, chunk) in pixels.chunks(block_width as usize).enumerate() {
            for (col, color) in chunk.iter().enumerate() {
                self.set_pixel(x + col as i64, y + row as i64, *color);
            }
        }
    }

    /// Raw bytes, `pitch * height` long.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_layout() {
        let buffer = ColorBuffer::new(8, 4);
        assert_eq!(buffer.pitch(), 32);
        assert_eq!(buffer.as_bytes().len(), 32 * 4);
        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_clear() {
        let mut buffer = ColorBuffer::new(3, 2);
        buffer.clear([1, 2, 3, 255]);
        assert_eq!(buffer.get_pixel(2, 1), Some([1, 2, 3, 255]));
        assert_eq!(buffer.get_pixel(0, 0), Some([1, 2, 3, 255]));
    }

    #[test]
    fn test_set_pixel_row_major() {
        let mut buffer = ColorBuffer::new(4, 4);
        buffer.set_pixel(1, 2, [9, 8, 7, 6]);

        let offset = 2 * buffer.pitch() + BYTES_PER_PIXEL;
        assert_eq!(&buffer.as_bytes()[offset..offset + 4], &[9, 8, 7, 6]);
    }

    #[test]
    fn test_out_of_range_writes_are_clipped() {
        let mut buffer = ColorBuffer::new(2, 2);
        buffer.set_pixel(-1, 0, [255; 4]);
        buffer.set_pixel(0, 2, [255; 4]);
        buffer.set_pixel(2, 0, [255; 4]);

        assert!(buffer.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buffer.get_pixel(5, 5), None);
    }

    #[test]
    fn test_write_block_clips_at_edge() {
        let mut buffer = ColorBuffer::new(3, 3);
        let block = vec![[7, 7, 7, 255]; 4];
        buffer.write_block(2, 2, 2, &block);

        assert_eq!(buffer.get_pixel(2, 2), Some([7, 7, 7, 255]));
        assert_eq!(buffer.get_pixel(1, 2), Some([0, 0, 0, 0]));
    }
}
