/// Per-pixel escape counts for a full frame, row-major, row 0 at the top.
///
/// This is the raw output of the renderer before coloring. Keeping the counts
/// separate from colored pixels lets a palette change recolor the frame
/// without evaluating it again.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationBuffer {
    pub width: u32,
    pub height: u32,
    pub max_iterations: u32,
    pub data: Vec<u32>,
}

impl IterationBuffer {
    /// A buffer with every pixel marked as non-escaping.
    pub fn new(width: u32, height: u32, max_iterations: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            max_iterations,
            data: vec![max_iterations; size],
        }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.data[(y * self.width + x) as usize]
    }

    /// Pixels whose orbit never escaped within the cap.
    pub fn interior_count(&self) -> usize {
        self.data.iter().filter(|&&n| n >= self.max_iterations).count()
    }

    pub fn escaped_count(&self) -> usize {
        self.data.len() - self.interior_count()
    }
}
