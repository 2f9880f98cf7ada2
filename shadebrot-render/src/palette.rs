use rayon::prelude::*;

use shadebrot_core::{OddAnchorPadding, Preset, RemainderPolicy, Rgb, BLACK};

use crate::buffer::RenderBuffer;
use crate::error::RenderError;
use crate::iteration_buffer::IterationBuffer;

// ---------------------------------------------------------------------------
// Color ramp
// ---------------------------------------------------------------------------

/// A fixed-length color lookup table built from a few anchor colors.
///
/// The anchors are spread over equal-sized spans of `len / (anchors - 1)`
/// entries with linear interpolation inside each span. Entries left over by
/// the integer division are filled according to a [`RemainderPolicy`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    entries: Vec<Rgb>,
}

impl ColorRamp {
    pub fn build(
        anchors: &[Rgb],
        len: usize,
        padding: OddAnchorPadding,
        remainder: RemainderPolicy,
    ) -> crate::Result<Self> {
        if anchors.len() < 2 {
            return Err(RenderError::TooFewAnchors(anchors.len()));
        }
        if len == 0 {
            return Err(RenderError::InvalidRampLength(len));
        }

        let mut anchors = anchors.to_vec();
        if padding == OddAnchorPadding::AppendBlack && anchors.len() % 2 == 1 {
            anchors.push(BLACK);
        }

        let spans = anchors.len() - 1;
        let section = len / spans;
        if section == 0 {
            return Err(RenderError::TooManyAnchors {
                anchors: anchors.len(),
                len,
            });
        }

        let mut entries = Vec::with_capacity(len);
        for pair in anchors.windows(2) {
            for j in 0..section {
                let t = if section == 1 {
                    0.0
                } else {
                    j as f64 / (section - 1) as f64
                };
                entries.push(lerp_rgb(pair[0], pair[1], t));
            }
        }

        let fill = match remainder {
            RemainderPolicy::Black => BLACK,
            RemainderPolicy::LastAnchor => anchors[spans],
        };
        entries.resize(len, fill);

        Ok(Self { entries })
    }

    /// The ramp described by a preset's anchors and policies.
    pub fn from_preset(preset: &Preset) -> crate::Result<Self> {
        Self::build(
            &preset.anchors,
            preset.ramp_length,
            preset.odd_padding,
            preset.remainder,
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Rgb] {
        &self.entries
    }

    /// Color for an escape count, scaled onto the ramp.
    ///
    /// Counts at or above `max_iterations` (never escaped) clamp to entry 0.
    #[inline]
    pub fn color_for(&self, iterations: u32, max_iterations: u32) -> Rgb {
        if iterations >= max_iterations {
            return self.entries[0];
        }
        let len = self.entries.len();
        let idx = (iterations as f64 / max_iterations as f64 * len as f64).floor() as usize;
        self.entries[idx.min(len - 1)]
    }

    /// The ramp as an `len × 1` RGBA row, ready for texture upload.
    pub fn rgba_bytes(&self) -> Vec<u8> {
        self.entries
            .iter()
            .flat_map(|&[r, g, b]| [r, g, b, 255])
            .collect()
    }

    /// Colorize an entire iteration buffer into an RGBA pixel buffer.
    pub fn colorize(&self, iter_buf: &IterationBuffer) -> RenderBuffer {
        let max = iter_buf.max_iterations;
        let mut pixels = vec![0u8; iter_buf.data.len() * 4];
        pixels
            .par_chunks_mut(4)
            .zip(iter_buf.data.par_iter())
            .for_each(|(pixel, &n)| {
                let [r, g, b] = self.color_for(n, max);
                pixel[0] = r;
                pixel[1] = g;
                pixel[2] = b;
                pixel[3] = 255;
            });
        RenderBuffer {
            width: iter_buf.width,
            height: iter_buf.height,
            pixels,
        }
    }
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let inv = 1.0 - t;
    [
        (a[0] as f64 * inv + b[0] as f64 * t) as u8,
        (a[1] as f64 * inv + b[1] as f64 * t) as u8,
        (a[2] as f64 * inv + b[2] as f64 * t) as u8,
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = [255, 0, 0];
    const WHITE: Rgb = [255, 255, 255];

    fn plain(anchors: &[Rgb], len: usize) -> ColorRamp {
        ColorRamp::build(anchors, len, OddAnchorPadding::None, RemainderPolicy::LastAnchor).unwrap()
    }

    #[test]
    fn black_to_red_ramp() {
        let ramp = plain(&[BLACK, RED], 256);
        assert_eq!(ramp.len(), 256);
        assert_eq!(ramp.entries()[0], BLACK);
        assert_eq!(ramp.entries()[255], RED);
        for w in ramp.entries().windows(2) {
            assert!(w[1][0] >= w[0][0], "red channel must not decrease");
            assert_eq!(w[1][1], 0);
            assert_eq!(w[1][2], 0);
        }
    }

    #[test]
    fn spans_start_and_end_on_anchors() {
        // 3 anchors, 256 entries: two spans of 128, no remainder.
        let ramp = plain(&[BLACK, WHITE, RED], 256);
        let e = ramp.entries();
        assert_eq!(e[0], BLACK);
        assert_eq!(e[127], WHITE);
        assert_eq!(e[128], WHITE);
        assert_eq!(e[255], RED);
    }

    #[test]
    fn remainder_policies() {
        // 4 anchors over 256 entries: spans of 85, one leftover entry.
        let anchors = [BLACK, RED, WHITE, [0, 0, 255]];
        let black = ColorRamp::build(&anchors, 256, OddAnchorPadding::None, RemainderPolicy::Black)
            .unwrap();
        assert_eq!(black.entries()[254], [0, 0, 255]);
        assert_eq!(black.entries()[255], BLACK);

        let last = plain(&anchors, 256);
        assert_eq!(last.entries()[255], [0, 0, 255]);
    }

    #[test]
    fn odd_padding_shifts_spans() {
        let anchors = [BLACK, RED, WHITE];
        let unpadded = plain(&anchors, 256);
        let padded =
            ColorRamp::build(&anchors, 256, OddAnchorPadding::AppendBlack, RemainderPolicy::Black)
                .unwrap();
        assert_ne!(unpadded, padded);
        // Three spans of 85: white lands at the end of the second span.
        assert_eq!(padded.entries()[169], WHITE);
        assert_eq!(padded.entries()[254], BLACK);

        // Even anchor counts are left alone.
        let even = ColorRamp::build(
            &[BLACK, RED],
            256,
            OddAnchorPadding::AppendBlack,
            RemainderPolicy::LastAnchor,
        )
        .unwrap();
        assert_eq!(even, plain(&[BLACK, RED], 256));
    }

    #[test]
    fn single_entry_spans() {
        let ramp = plain(&[BLACK, RED, WHITE], 2);
        assert_eq!(ramp.entries(), &[BLACK, RED]);
    }

    #[test]
    fn build_errors() {
        assert!(matches!(
            ColorRamp::build(&[RED], 256, OddAnchorPadding::None, RemainderPolicy::Black),
            Err(RenderError::TooFewAnchors(1))
        ));
        assert!(matches!(
            ColorRamp::build(&[BLACK, RED], 0, OddAnchorPadding::None, RemainderPolicy::Black),
            Err(RenderError::InvalidRampLength(0))
        ));
        assert!(matches!(
            ColorRamp::build(&[BLACK, RED, WHITE], 1, OddAnchorPadding::None, RemainderPolicy::Black),
            Err(RenderError::TooManyAnchors { anchors: 3, len: 1 })
        ));
    }

    #[test]
    fn lookup_clamps_interior_to_first_entry() {
        let ramp = plain(&[RED, WHITE], 256);
        assert_eq!(ramp.color_for(100, 100), RED);
        assert_eq!(ramp.color_for(500, 100), RED);
        assert_eq!(ramp.color_for(0, 0), RED);
    }

    #[test]
    fn lookup_scales_onto_ramp() {
        let ramp = plain(&[BLACK, RED], 256);
        assert_eq!(ramp.color_for(0, 100), ramp.entries()[0]);
        assert_eq!(ramp.color_for(50, 100), ramp.entries()[128]);
        assert_eq!(ramp.color_for(99, 100), ramp.entries()[253]);
        for n in 0..1000 {
            // Never indexes past the end.
            ramp.color_for(n, 1000);
        }
    }

    #[test]
    fn texture_bytes_are_opaque_rgba() {
        let ramp = plain(&[BLACK, RED], 16);
        let bytes = ramp.rgba_bytes();
        assert_eq!(bytes.len(), 16 * 4);
        assert_eq!(&bytes[60..64], &[255, 0, 0, 255]);
        assert!(bytes.chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn builtin_presets_build() {
        for preset in Preset::builtins() {
            let ramp = ColorRamp::from_preset(&preset).unwrap();
            assert_eq!(ramp.len(), preset.ramp_length);
        }
    }

    #[test]
    fn colorize_produces_correct_size() {
        let ramp = plain(&[BLACK, RED], 256);
        let mut buf = IterationBuffer::new(64, 48, 256);
        buf.data[0] = 128;
        let rb = ramp.colorize(&buf);
        assert_eq!(rb.width, 64);
        assert_eq!(rb.height, 48);
        assert_eq!(rb.pixels.len(), 64 * 48 * 4);
        let [r, g, b] = ramp.entries()[128];
        assert_eq!(rb.pixel(0, 0), [r, g, b, 255]);
        assert!(r > 100);
        assert_eq!(rb.pixel(1, 0), [0, 0, 0, 255]);
    }
}
