//! inkstroke: pointer samples → variable-width ink polygons.
//!
//! Turns timestamped pointer input into filled outlines whose width
//! follows drawing speed (or pen heading), and recognizes hand-drawn
//! shapes so they can be replaced by clean geometry.
//!
//! # Example
//!
//! ```
//! use inkstroke::{replay, Sample, StrokeConfig};
//!
//! let samples: Vec<Sample> = (0..50)
//!     .map(|i| Sample::new(i as f64 * 3.0, 0.0, i as f64 * 0.01))
//!     .collect();
//! let stroke = replay(&samples, &StrokeConfig::pen()).unwrap();
//! assert!(!stroke.polygons.is_empty());
//! ```

#![forbid(unsafe_code)]

mod config;
pub mod geom;

pub mod classify;
pub mod controller;
pub mod error;
pub mod filter;
pub mod flatten;
pub mod sample;
pub mod session;
pub mod speed;
pub mod svg;
pub mod taper;
pub mod trajectory;
pub mod width;

// Re-export kurbo so callers build points and paths with the same version.
pub use kurbo;

pub use classify::{
    ClassifierWorker, ImageClassifier, ShapeCandidate, ShapeCategory, ShapeClassifier,
    ShapeSuggester, StrokeClassifier, Suggestion, TemplateClassifier,
};
pub use config::{ClassifierConfig, StrokeConfig};
pub use controller::StrokeController;
pub use error::InkError;
pub use filter::{lag_distance, PointFilter};
pub use flatten::{flatten_stroke, outline, FlattenParams};
pub use geom::Polygon;
pub use sample::{parse_samples, Sample};
pub use session::{FinishedStroke, StrokeFrame, StrokeSession};
pub use speed::StrokePoint;
pub use taper::{apply_taper, TaperAnimation};
pub use trajectory::{BezierSegment, Trajectory, TrajectoryNode};
pub use width::{CapStyle, WidthStrategy};

/// Run a whole recorded stroke through a session.
///
/// Returns `None` for an empty recording.
pub fn replay(samples: &[Sample], config: &StrokeConfig) -> Option<FinishedStroke> {
    let (&first, rest) = samples.split_first()?;
    let mut session = StrokeSession::begin(config.clone(), first);
    for &sample in rest {
        session.extend(sample);
    }
    Some(session.end(None))
}
