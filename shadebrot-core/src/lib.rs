pub mod complex;
pub mod error;
pub mod escape;
pub mod preset;
pub mod session;
pub mod viewport;
pub mod zoom;

// Re-export primary types for convenience.
pub use complex::{Complex, Real};
pub use error::CoreError;
pub use escape::{escape_time, EscapeTime, Precision, ZStart, ESCAPE_RADIUS_SQ};
pub use preset::{OddAnchorPadding, Preset, RemainderPolicy, Rgb, BLACK, DEFAULT_RAMP_LENGTH};
pub use session::{FrameParams, Session};
pub use viewport::{pixel_to_sample, CoordinateMapping, Viewport};
pub use zoom::{ZoomConfig, ZoomOutcome};

/// Convenience result type for the core crate.
pub type Result<T> = std::result::Result<T, CoreError>;
