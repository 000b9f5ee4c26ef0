//! Hand-drawn shape recognition.
//!
//! Pipeline: reject short or line-like strokes, accept near-perfect
//! closed circles from moments alone, look for an arrow on the simplified
//! polyline, drop strokes whose ends stay apart, then gate on convexity
//! and hand a normalized bitmap to an [`ImageClassifier`]. The category
//! it reports is turned into a clean shape filling the stroke's bounding
//! box.

pub mod arrow;
pub mod hull;
pub mod moments;
pub mod raster;
pub mod shapes;
pub mod template;
pub mod worker;

use geo::{LineString, Simplify};
use kurbo::Point;
use tracing::{debug, warn};

use crate::config::ClassifierConfig;
use crate::geom::{bounding_box, closed_perimeter, polygon_signed_area};

pub use moments::Moments;
pub use shapes::{ShapeCandidate, Suggestion};
pub use template::{ImageClassifier, ShapeCategory, TemplateClassifier};
pub use worker::{CancelToken, ClassifierWorker, ShapeSuggester};

/// Anything that can turn a stroke's points into an optional shape.
///
/// Implemented by [`ShapeClassifier`]; the background worker accepts any
/// implementation.
pub trait StrokeClassifier: Send + Sync + 'static {
    fn classify(&self, points: &[Point]) -> Option<ShapeCandidate>;
}

pub struct ShapeClassifier {
    config: ClassifierConfig,
    image: Box<dyn ImageClassifier>,
}

impl ShapeClassifier {
    /// Classifier backed by the built-in template matcher.
    pub fn new(config: ClassifierConfig) -> Self {
        let image = TemplateClassifier::from_config(&config);
        Self::with_image_classifier(config, image)
    }

    pub fn with_image_classifier(config: ClassifierConfig, image: impl ImageClassifier + 'static) -> Self {
        Self {
            config,
            image: Box::new(image),
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify the stroke drawn through `points`. Area measures treat the
    /// stroke as closed back to its first point.
    pub fn classify(&self, points: &[Point]) -> Option<ShapeCandidate> {
        let points = clean(points);
        if points.len() < self.config.min_points {
            return None;
        }
        let bbox = bounding_box(&points)?;
        let (short, long) = (bbox.width().min(bbox.height()), bbox.width().max(bbox.height()));
        if !(long > 1e-9) {
            return None;
        }
        let aspect_ratio = short / long;
        let diagonal = long.hypot(short);

        // Spirals and open arcs would otherwise close up into ellipses.
        let gap = points[0].distance(points[points.len() - 1]) / diagonal;
        let closed = gap <= self.config.max_closure_gap;

        let moments = Moments::from_polygon(&points);
        let circularity = moments.circularity(closed_perimeter(&points));
        if closed && circularity > self.config.circularity_threshold {
            debug!(circularity, "accepted as ellipse");
            return Some(ShapeCandidate::Ellipse {
                center: bbox.center(),
                size: bbox.size(),
            });
        }

        let epsilon = self.config.simplify_ratio * diagonal;
        let simplified = simplify(&points, epsilon);
        if let Some((start, end)) = arrow::detect(&simplified, epsilon) {
            debug!(?start, ?end, "accepted as arrow");
            return Some(ShapeCandidate::Arrow { start, end });
        }
        if !closed {
            debug!(gap, "open stroke");
            return None;
        }

        if aspect_ratio < self.config.min_aspect_ratio {
            debug!(aspect_ratio, "line-like stroke");
            return None;
        }

        let hull = hull::convex_hull(&points)?;
        let hull_area = polygon_signed_area(&hull).abs();
        if !(hull_area > 1e-9) {
            return None;
        }
        let convexity = moments.area().abs() / hull_area;
        if convexity < self.config.min_convexity {
            debug!(convexity, "too concave");
            return None;
        }

        let bitmap = raster::rasterize(
            &points,
            self.config.raster_size,
            self.config.raster_stroke_width,
            true,
        );
        let category = match self.image.classify(&bitmap) {
            Ok(category) => category?,
            Err(err) => {
                warn!("image classification failed: {err}");
                return None;
            }
        };
        if category.is_convex() && convexity < self.config.convex_category_convexity {
            debug!(?category, convexity, "convex category rejected");
            return None;
        }
        Some(category.candidate(bbox.center(), bbox.size()))
    }
}

impl StrokeClassifier for ShapeClassifier {
    fn classify(&self, points: &[Point]) -> Option<ShapeCandidate> {
        ShapeClassifier::classify(self, points)
    }
}

/// Finite points with consecutive duplicates removed.
fn clean(points: &[Point]) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if !(p.x.is_finite() && p.y.is_finite()) {
            continue;
        }
        if out.last() != Some(&p) {
            out.push(p);
        }
    }
    out
}

/// Ramer-Douglas-Peucker simplification.
fn simplify(points: &[Point], epsilon: f64) -> Vec<Point> {
    let line: LineString<f64> = points.iter().map(|p| (p.x, p.y)).collect();
    line.simplify(&epsilon)
        .coords()
        .map(|c| Point::new(c.x, c.y))
        .collect()
}
