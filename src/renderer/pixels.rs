//! Pixel Buffer
//!
//! An RGBA8 buffer in CPU memory. It is both the offscreen surface behind
//! owner-draw layers and the window the compositor presents onto.

use std::io::{self, Write};

use crate::gui::{GuiError, GuiResult};

/// A single RGBA pixel
pub type Rgba = [u8; 4];

/// Fully transparent black
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

/// Simple software surface that renders to a pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Pixel data (RGBA, row-major)
    buffer: Vec<u8>,
    /// Buffer width
    width: u32,
    /// Buffer height
    height: u32,
}

fn byte_len(width: u32, height: u32) -> GuiResult<usize> {
    if width == 0 || height == 0 {
        return Err(GuiError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(4))
        .ok_or_else(|| GuiError::SurfaceAllocation {
            width,
            height,
            reason: "size overflows address space".to_string(),
        })
}

/// Allocate a zeroed buffer, reporting allocation failure instead of aborting
fn alloc_zeroed(width: u32, height: u32) -> GuiResult<Vec<u8>> {
    let len = byte_len(width, height)?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(len)
        .map_err(|e| GuiError::SurfaceAllocation {
            width,
            height,
            reason: e.to_string(),
        })?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Source-over blend of a straight-alpha pixel
fn blend(dst: &mut [u8], src: Rgba) {
    let a = src[3] as u32;
    if a == 255 {
        dst.copy_from_slice(&src);
        return;
    }
    if a == 0 {
        return;
    }
    let inv = 255 - a;
    for i in 0..3 {
        dst[i] = ((src[i] as u32 * a + dst[i] as u32 * inv + 127) / 255) as u8;
    }
    dst[3] = (a + (dst[3] as u32 * inv + 127) / 255) as u8;
}

/// Intersect a span starting at `start` of length `len` with `0..limit`
fn clip_span(start: i32, len: u32, limit: u32) -> Option<(u32, u32)> {
    let lo = (start as i64).max(0);
    let hi = (start as i64 + len as i64).min(limit as i64);
    if lo >= hi {
        None
    } else {
        Some((lo as u32, hi as u32))
    }
}

impl PixelBuffer {
    /// Create a transparent buffer
    pub fn new(width: u32, height: u32) -> GuiResult<Self> {
        Ok(Self {
            buffer: alloc_zeroed(width, height)?,
            width,
            height,
        })
    }

    /// Resize the buffer. Contents are discarded and reset to transparent.
    /// On failure the buffer keeps its old size and contents.
    pub fn resize(&mut self, width: u32, height: u32) -> GuiResult<()> {
        self.buffer = alloc_zeroed(width, height)?;
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Clear the buffer with a color
    pub fn clear(&mut self, color: Rgba) {
        for pixel in self.buffer.chunks_exact_mut(4) {
            pixel.copy_from_slice(&color);
        }
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        ((y as usize * self.width as usize) + x as usize) * 4
    }

    /// Get the pixel at (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = self.offset(x, y);
        let p = &self.buffer[idx..idx + 4];
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Overwrite a rectangle with a color, clipped to the buffer
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
        let (Some((x0, x1)), Some((y0, y1))) =
            (clip_span(x, w, self.width), clip_span(y, h, self.height))
        else {
            return;
        };

        for row in y0..y1 {
            let start = self.offset(x0, row);
            let end = self.offset(x1, row);
            for pixel in self.buffer[start..end].chunks_exact_mut(4) {
                pixel.copy_from_slice(&color);
            }
        }
    }

    /// Draw a glyph coverage bitmap at position, blending the foreground
    /// color over what is already there
    pub fn draw_glyph(
        &mut self,
        bitmap: &[u8],
        glyph_width: u32,
        glyph_height: u32,
        x: i32,
        y: i32,
        fg: (u8, u8, u8),
    ) {
        for gy in 0..glyph_height {
            let py = y + gy as i32;
            if py < 0 || py >= self.height as i32 {
                continue;
            }

            for gx in 0..glyph_width {
                let px = x + gx as i32;
                if px < 0 || px >= self.width as i32 {
                    continue;
                }

                let glyph_idx = (gy * glyph_width + gx) as usize;
                let alpha = bitmap.get(glyph_idx).copied().unwrap_or(0);
                let idx = self.offset(px as u32, py as u32);
                blend(&mut self.buffer[idx..idx + 4], [fg.0, fg.1, fg.2, alpha]);
            }
        }
    }

    /// Composite another buffer onto this one with its top-left corner at
    /// (x, y). Source alpha is respected; anything outside is clipped.
    pub fn blit(&mut self, src: &PixelBuffer, x: i32, y: i32) {
        let (Some((x0, x1)), Some((y0, y1))) = (
            clip_span(x, src.width, self.width),
            clip_span(y, src.height, self.height),
        ) else {
            return;
        };

        for row in y0..y1 {
            let src_row = (row as i64 - y as i64) as u32;
            for col in x0..x1 {
                let src_col = (col as i64 - x as i64) as u32;
                let s = src.offset(src_col, src_row);
                let pixel = [
                    src.buffer[s],
                    src.buffer[s + 1],
                    src.buffer[s + 2],
                    src.buffer[s + 3],
                ];
                let d = self.offset(col, row);
                blend(&mut self.buffer[d..d + 4], pixel);
            }
        }
    }

    /// Get the pixel buffer
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Get buffer dimensions
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Write the buffer as a binary PPM (alpha is dropped)
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut rgb = Vec::with_capacity(self.buffer.len() / 4 * 3);
        for pixel in self.buffer.chunks_exact(4) {
            rgb.extend_from_slice(&pixel[..3]);
        }
        out.write_all(&rgb)?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba = [255, 0, 0, 255];
    const GREEN: Rgba = [0, 255, 0, 255];

    #[test]
    fn test_new_rejects_zero() {
        assert!(matches!(
            PixelBuffer::new(0, 5),
            Err(GuiError::InvalidDimensions { width: 0, height: 5 })
        ));
    }

    #[test]
    fn test_unallocatable_size_is_an_error() {
        const HUGE: u32 = 1 << 30;
        assert!(matches!(
            PixelBuffer::new(HUGE, HUGE),
            Err(GuiError::SurfaceAllocation { width: HUGE, height: HUGE, .. })
        ));

        let mut buf = PixelBuffer::new(3, 3).unwrap();
        buf.clear(RED);
        assert!(matches!(
            buf.resize(HUGE, HUGE),
            Err(GuiError::SurfaceAllocation { .. })
        ));
        // Old size and contents survive the failed resize
        assert_eq!(buf.dimensions(), (3, 3));
        assert_eq!(buf.pixel(2, 2), Some(RED));
    }

    #[test]
    fn test_clear() {
        let mut buf = PixelBuffer::new(10, 10).unwrap();
        assert_eq!(buf.pixel(0, 0), Some(TRANSPARENT));
        buf.clear(RED);
        assert_eq!(buf.pixel(9, 9), Some(RED));
        assert_eq!(buf.pixel(10, 0), None);
    }

    #[test]
    fn test_fill_rect_clipped() {
        let mut buf = PixelBuffer::new(10, 10).unwrap();
        buf.fill_rect(-2, 8, 5, 5, GREEN);

        assert_eq!(buf.pixel(0, 8), Some(GREEN));
        assert_eq!(buf.pixel(2, 9), Some(GREEN));
        assert_eq!(buf.pixel(3, 9), Some(TRANSPARENT));
        assert_eq!(buf.pixel(0, 7), Some(TRANSPARENT));

        // Entirely outside
        buf.fill_rect(20, 20, 5, 5, RED);
        assert!(buf.buffer().chunks_exact(4).all(|p| p != RED));
    }

    #[test]
    fn test_resize_discards_content() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        buf.clear(RED);
        buf.resize(8, 2).unwrap();
        assert_eq!(buf.dimensions(), (8, 2));
        assert_eq!(buf.buffer().len(), 8 * 2 * 4);
        assert_eq!(buf.pixel(7, 1), Some(TRANSPARENT));
        assert!(buf.resize(0, 2).is_err());
        assert_eq!(buf.dimensions(), (8, 2));
    }

    #[test]
    fn test_blit_offset_and_clip() {
        let mut window = PixelBuffer::new(10, 10).unwrap();
        let mut src = PixelBuffer::new(4, 4).unwrap();
        src.clear(RED);

        window.blit(&src, 8, -2);
        assert_eq!(window.pixel(8, 0), Some(RED));
        assert_eq!(window.pixel(9, 1), Some(RED));
        assert_eq!(window.pixel(9, 2), Some(TRANSPARENT));
        assert_eq!(window.pixel(7, 0), Some(TRANSPARENT));
    }

    #[test]
    fn test_blit_respects_alpha() {
        let mut window = PixelBuffer::new(2, 1).unwrap();
        window.clear(GREEN);

        let mut src = PixelBuffer::new(2, 1).unwrap();
        src.fill_rect(0, 0, 1, 1, RED);
        // (1, 0) stays transparent

        window.blit(&src, 0, 0);
        assert_eq!(window.pixel(0, 0), Some(RED));
        assert_eq!(window.pixel(1, 0), Some(GREEN));
    }

    #[test]
    fn test_blend_half_alpha() {
        let mut dst = [0u8, 0, 0, 255];
        blend(&mut dst, [255, 255, 255, 128]);
        assert_eq!(dst[0], 128);
        assert_eq!(dst[3], 255);
    }

    #[test]
    fn test_draw_glyph() {
        let mut buf = PixelBuffer::new(4, 4).unwrap();
        buf.clear([0, 0, 0, 255]);
        let bitmap = [255u8, 0, 0, 255];
        buf.draw_glyph(&bitmap, 2, 2, 1, 1, (255, 255, 255));

        assert_eq!(buf.pixel(1, 1), Some([255, 255, 255, 255]));
        assert_eq!(buf.pixel(2, 1), Some([0, 0, 0, 255]));
        assert_eq!(buf.pixel(2, 2), Some([255, 255, 255, 255]));
    }

    #[test]
    fn test_write_ppm() {
        let mut buf = PixelBuffer::new(2, 1).unwrap();
        buf.clear(RED);
        let mut out = Vec::new();
        buf.write_ppm(&mut out).unwrap();

        let header = b"P6\n2 1\n255\n";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &[255, 0, 0, 255, 0, 0]);
    }
}
