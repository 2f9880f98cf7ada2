use crate::error::RenderError;

/// An RGBA pixel buffer representing a rendered image.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order, top row first.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a new buffer filled with black (opaque).
    pub fn new(width: u32, height: u32) -> Self {
        let mut pixels = vec![0u8; width as usize * height as usize * 4];
        for chunk in pixels.chunks_exact_mut(4) {
            chunk[3] = 255;
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Wrap pixels read back bottom row first (GL convention), flipping them
    /// so row 0 is the top of the image.
    pub fn from_bottom_up(width: u32, height: u32, pixels: Vec<u8>) -> crate::Result<Self> {
        if pixels.len() != width as usize * height as usize * 4 {
            return Err(RenderError::InvalidDimensions { width, height });
        }
        let mut buffer = Self {
            width,
            height,
            pixels,
        };
        buffer.flip_vertical();
        Ok(buffer)
    }

    /// Reverse the row order in place.
    pub fn flip_vertical(&mut self) {
        let stride = self.width as usize * 4;
        let h = self.height as usize;
        for row in 0..h / 2 {
            let (top, bottom) = self.pixels.split_at_mut((h - 1 - row) * stride);
            top[row * stride..(row + 1) * stride].swap_with_slice(&mut bottom[..stride]);
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_black_opaque() {
        let buf = RenderBuffer::new(4, 4);
        assert_eq!(buf.pixels.len(), 4 * 4 * 4);
        for chunk in buf.pixels.chunks_exact(4) {
            assert_eq!(chunk, &[0, 0, 0, 255]);
        }
    }

    #[test]
    fn bottom_up_rows_are_flipped() {
        // 1×3 image: rows tagged 0, 1, 2 in read-back order.
        let pixels = vec![0, 0, 0, 255, 1, 1, 1, 255, 2, 2, 2, 255];
        let buf = RenderBuffer::from_bottom_up(1, 3, pixels).unwrap();
        assert_eq!(buf.pixel(0, 0), [2, 2, 2, 255]);
        assert_eq!(buf.pixel(0, 1), [1, 1, 1, 255]);
        assert_eq!(buf.pixel(0, 2), [0, 0, 0, 255]);
    }

    #[test]
    fn flip_twice_is_identity() {
        let mut buf = RenderBuffer::new(3, 4);
        for (i, b) in buf.pixels.iter_mut().enumerate() {
            *b = i as u8;
        }
        let original = buf.pixels.clone();
        buf.flip_vertical();
        assert_ne!(buf.pixels, original);
        buf.flip_vertical();
        assert_eq!(buf.pixels, original);
    }

    #[test]
    fn bottom_up_rejects_wrong_length() {
        assert!(matches!(
            RenderBuffer::from_bottom_up(2, 2, vec![0; 15]),
            Err(RenderError::InvalidDimensions { .. })
        ));
    }
}
