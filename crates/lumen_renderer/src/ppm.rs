//! Plain-text PPM (`P3`) output.
//!
//! Linear colors are gamma corrected (gamma 2), clamped to `[0, 0.999]` and
//! scaled by 256, so a channel never rounds up to 256.

use crate::renderer::{ImageBuffer, RenderError};
use crate::Color;
use lumen_math::Interval;
use std::io::Write;

/// Channel range before quantization. Stops short of 1 so `256 * x < 256`.
const INTENSITY: Interval = Interval::new(0.0, 0.999);

/// Apply gamma correction (gamma = 2.0).
#[inline]
pub fn linear_to_gamma(linear: f64) -> f64 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGB.
pub fn color_to_bytes(color: Color) -> [u8; 3] {
    let quantize = |c: f64| (256.0 * INTENSITY.clamp(linear_to_gamma(c))) as u8;
    [quantize(color.x), quantize(color.y), quantize(color.z)]
}

/// Streaming PPM writer.
///
/// The header goes out on construction; pixels are expected row-major,
/// top-to-bottom and left-to-right.
pub struct PpmWriter<W: Write> {
    out: W,
    width: u32,
    height: u32,
    written: u64,
}

impl<W: Write> PpmWriter<W> {
    /// Write the `P3` header and return a writer ready for pixel data.
    pub fn new(mut out: W, width: u32, height: u32) -> Result<Self, RenderError> {
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", width, height)?;
        writeln!(out, "255")?;
        Ok(Self {
            out,
            width,
            height,
            written: 0,
        })
    }

    /// Write one pixel as an `R G B` line.
    pub fn write_pixel(&mut self, color: Color) -> Result<(), RenderError> {
        let [r, g, b] = color_to_bytes(color);
        writeln!(self.out, "{} {} {}", r, g, b)?;
        self.written += 1;
        Ok(())
    }

    /// Number of pixels written so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Flush and hand back the sink.
    ///
    /// Fails if the pixel count does not match the header.
    pub fn finish(mut self) -> Result<W, RenderError> {
        let expected = self.width as u64 * self.height as u64;
        if self.written != expected {
            return Err(RenderError::PixelCountMismatch {
                expected,
                written: self.written,
            });
        }
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Write a finished image as PPM.
pub fn write_ppm<W: Write>(image: &ImageBuffer, out: W) -> Result<W, RenderError> {
    let mut writer = PpmWriter::new(out, image.width, image.height)?;
    for color in &image.pixels {
        writer.write_pixel(*color)?;
    }
    writer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(1.0) - 1.0).abs() < 1e-12);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_color_to_bytes_extremes() {
        assert_eq!(color_to_bytes(Color::ONE), [255, 255, 255]);
        assert_eq!(color_to_bytes(Color::ZERO), [0, 0, 0]);
        assert_eq!(color_to_bytes(Color::splat(-3.0)), [0, 0, 0]);
    }

    #[test]
    fn test_color_to_bytes_never_overflows() {
        for c in [0.999, 0.9999, 1.0, 2.0, 1e9, f64::INFINITY] {
            assert_eq!(color_to_bytes(Color::splat(c)), [255, 255, 255]);
        }
    }

    #[test]
    fn test_color_to_bytes_gamma() {
        // 0.25 linear -> 0.5 gamma -> 128
        assert_eq!(color_to_bytes(Color::new(0.25, 0.0, 1.0)), [128, 0, 255]);
    }

    #[test]
    fn test_ppm_layout() {
        let mut image = ImageBuffer::new(2, 1);
        image.set(0, 0, Color::ONE);
        image.set(1, 0, Color::new(0.0, 0.25, 1.0));

        let bytes = write_ppm(&image, Vec::new()).expect("write to memory");
        let text = String::from_utf8(bytes).expect("ascii output");
        assert_eq!(text, "P3\n2 1\n255\n255 255 255\n0 128 255\n");
    }

    #[test]
    fn test_finish_rejects_short_image() {
        let mut writer = PpmWriter::new(Vec::new(), 2, 2).expect("header");
        writer.write_pixel(Color::ZERO).expect("pixel");
        assert_eq!(writer.written(), 1);

        match writer.finish() {
            Err(RenderError::PixelCountMismatch { expected, written }) => {
                assert_eq!(expected, 4);
                assert_eq!(written, 1);
            }
            other => panic!("expected pixel count mismatch, got {:?}", other.map(|_| ())),
        }
    }
}
