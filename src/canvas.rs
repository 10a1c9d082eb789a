//! Fixed-size 8-bit raster representing the print bed seen from above.
//!
//! The buffer is row-major: pixel `(x, y)` lives at `y * width + x`.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CanvasError {
    #[error("Pixel ({x}, {y}) is outside the {width}x{height} canvas")]
    OutOfRange {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },
    #[error("Raw buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Owned grayscale pixel buffer.
///
/// `Clone` is derived so a canvas can be copied explicitly (e.g. to keep a
/// snapshot of a captured layer); nothing in the simulator copies one
/// implicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterCanvas {
    width: usize,
    height: usize,
    buffer: Vec<u8>,
}

impl RasterCanvas {
    /// Create a zero-filled canvas.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            buffer: vec![0; width * height],
        }
    }

    /// Wrap an existing row-major buffer.
    pub fn from_raw(width: usize, height: usize, buffer: Vec<u8>) -> Result<Self, CanvasError> {
        let expected = width * height;
        if buffer.len() != expected {
            return Err(CanvasError::BufferSize {
                expected,
                actual: buffer.len(),
            });
        }
        Ok(Self {
            width,
            height,
            buffer,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.buffer
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    fn checked_index(&self, x: i64, y: i64) -> Result<usize, CanvasError> {
        if !self.contains(x, y) {
            return Err(CanvasError::OutOfRange {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    /// Bounds-checked read.
    pub fn get(&self, x: i64, y: i64) -> Result<u8, CanvasError> {
        let idx = self.checked_index(x, y)?;
        Ok(self.buffer[idx])
    }

    /// Bounds-checked write.
    pub fn set(&mut self, x: i64, y: i64, value: u8) -> Result<(), CanvasError> {
        let idx = self.checked_index(x, y)?;
        self.buffer[idx] = value;
        Ok(())
    }

    /// Number of non-zero pixels.
    pub fn lit_pixels(&self) -> usize {
        self.buffer.iter().filter(|&&v| v != 0).count()
    }

    pub fn is_blank(&self) -> bool {
        self.buffer.iter().all(|&v| v == 0)
    }

    /// Reset every pixel to 0.
    pub fn clear(&mut self) {
        self.buffer.fill(0);
    }

    #[inline]
    fn plot(&mut self, x: i64, y: i64, value: u8) {
        let idx = y as usize * self.width + x as usize;
        self.buffer[idx] = value;
    }

    /// Draw a connected path from `(x0, y0)` to `(x1, y1)` inclusive.
    ///
    /// Both endpoints must lie on the canvas; the routine does no per-pixel
    /// bounds logic and panics on an index past the end of the buffer.
    ///
    /// Exactly `max(|x1 - x0|, |y1 - y0|) + 1` pixels are written. The error
    /// accumulator steps the minor axis as soon as it turns positive, so the
    /// pixel set for `a -> b` is not in general the same as for `b -> a`.
    pub fn draw_line(&mut self, x0: i64, y0: i64, x1: i64, y1: i64, value: u8) {
        let a = y1 - y0;
        let b = x0 - x1;
        let sign_a = if a < 0 { -1 } else { 1 };
        let sign_b = if b < 0 { -1 } else { 1 };
        let (abs_a, abs_b) = (a.abs(), b.abs());

        let (mut x, mut y) = (x0, y0);
        self.plot(x, y, value);
        let mut f = 0i64;

        if abs_a > abs_b {
            // Y is the major axis.
            while x != x1 || y != y1 {
                f += abs_b;
                if f > 0 {
                    f -= abs_a;
                    x -= sign_b;
                }
                y += sign_a;
                self.plot(x, y, value);
            }
        } else {
            while x != x1 || y != y1 {
                f += abs_a;
                if f > 0 {
                    f -= abs_b;
                    y += sign_a;
                }
                x -= sign_b;
                self.plot(x, y, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(canvas: &RasterCanvas) -> Vec<(i64, i64)> {
        let mut out = Vec::new();
        for y in 0..canvas.height() as i64 {
            for x in 0..canvas.width() as i64 {
                if canvas.get(x, y).unwrap() != 0 {
                    out.push((x, y));
                }
            }
        }
        out
    }

    #[test]
    fn test_new_canvas_is_blank() {
        let canvas = RasterCanvas::new(4, 3);
        assert_eq!(canvas.as_raw().len(), 12);
        assert!(canvas.is_blank());
    }

    #[test]
    fn test_degenerate_line_plots_single_pixel() {
        let mut canvas = RasterCanvas::new(5, 5);
        canvas.draw_line(2, 3, 2, 3, 9);
        assert_eq!(lit(&canvas), vec![(2, 3)]);
        assert_eq!(canvas.get(2, 3).unwrap(), 9);
    }

    #[test]
    fn test_shallow_line_steps_minor_axis_eagerly() {
        let mut canvas = RasterCanvas::new(5, 3);
        canvas.draw_line(0, 0, 4, 2, 255);
        assert_eq!(lit(&canvas), vec![(0, 0), (1, 1), (2, 1), (3, 2), (4, 2)]);
    }

    #[test]
    fn test_reversed_line_differs() {
        let mut canvas = RasterCanvas::new(5, 3);
        canvas.draw_line(4, 2, 0, 0, 255);
        assert_eq!(lit(&canvas), vec![(0, 0), (1, 0), (2, 1), (3, 1), (4, 2)]);
    }

    #[test]
    fn test_steep_line() {
        let mut canvas = RasterCanvas::new(2, 4);
        canvas.draw_line(0, 0, 1, 3, 1);
        assert_eq!(lit(&canvas), vec![(0, 0), (1, 1), (1, 2), (1, 3)]);
    }

    #[test]
    fn test_diagonal_uses_x_major_branch() {
        let mut canvas = RasterCanvas::new(4, 4);
        canvas.draw_line(3, 0, 0, 3, 1);
        assert_eq!(canvas.lit_pixels(), 4);
        for i in 0..4 {
            assert_eq!(canvas.get(3 - i, i).unwrap(), 1);
        }
    }

    #[test]
    fn test_checked_accessors() {
        let mut canvas = RasterCanvas::new(3, 2);
        canvas.set(2, 1, 7).unwrap();
        assert_eq!(canvas.as_raw()[5], 7);
        assert_eq!(
            canvas.get(3, 0),
            Err(CanvasError::OutOfRange { x: 3, y: 0, width: 3, height: 2 })
        );
        assert!(canvas.set(-1, 0, 1).is_err());
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(RasterCanvas::from_raw(2, 2, vec![0; 4]).is_ok());
        assert_eq!(
            RasterCanvas::from_raw(2, 2, vec![0; 3]),
            Err(CanvasError::BufferSize { expected: 4, actual: 3 })
        );
    }

    #[test]
    fn test_clear() {
        let mut canvas = RasterCanvas::new(6, 6);
        canvas.draw_line(0, 0, 5, 5, 200);
        canvas.clear();
        assert!(canvas.is_blank());
        canvas.clear();
        assert!(canvas.is_blank());
    }
}
