use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::debug;

use shadebrot_core::FrameParams;

use crate::error::RenderError;
use crate::iteration_buffer::IterationBuffer;

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// The result of a full-frame render.
///
/// Contains raw escape counts (no coloring); the caller applies a
/// [`ColorRamp`](crate::ColorRamp) to produce displayable pixels.
#[derive(Debug, Clone)]
pub struct RenderResult {
    pub iterations: IterationBuffer,
    pub elapsed: Duration,
    pub escaped: usize,
    pub interior: usize,
}

// ---------------------------------------------------------------------------
// Full-frame render
// ---------------------------------------------------------------------------

/// Evaluate every pixel center of a frame.
///
/// Rows are independent units of work handed to Rayon; each pixel is a pure
/// function of its coordinates, so the output does not depend on how rows
/// were scheduled.
pub fn render(frame: &FrameParams) -> crate::Result<RenderResult> {
    if frame.width == 0 || frame.height == 0 {
        return Err(RenderError::InvalidDimensions {
            width: frame.width,
            height: frame.height,
        });
    }

    let start = Instant::now();
    let max_iterations = frame.escape.max_iterations();
    let mut iterations = IterationBuffer::new(frame.width, frame.height, max_iterations);

    iterations
        .data
        .par_chunks_mut(frame.width as usize)
        .enumerate()
        .for_each(|(py, row)| {
            for (px, out) in row.iter_mut().enumerate() {
                *out = frame
                    .escape
                    .evaluate(frame.pixel_to_plane(px as u32, py as u32));
            }
        });

    let interior = iterations
        .data
        .par_iter()
        .filter(|&&n| n >= max_iterations)
        .count();
    let escaped = iterations.data.len() - interior;
    let elapsed = start.elapsed();
    debug!(
        elapsed_ms = elapsed.as_millis(),
        width = frame.width,
        height = frame.height,
        max_iterations,
        escaped,
        interior,
        "Render complete"
    );

    Ok(RenderResult {
        iterations,
        elapsed,
        escaped,
        interior,
    })
}
