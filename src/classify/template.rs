//! Pluggable bitmap classification and the built-in template matcher.

use image::GrayImage;
use imageproc::distance_transform::{distance_transform, Norm};
use kurbo::{Point, Size};
use rayon::prelude::*;

use super::raster::rasterize;
use super::shapes::ShapeCandidate;
use crate::config::ClassifierConfig;
use crate::error::InkError;

/// Shape families an image classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeCategory {
    Ellipse,
    Rectangle,
    Rhombus,
    Star,
    Triangle,
}

impl ShapeCategory {
    pub const ALL: [ShapeCategory; 5] = [
        ShapeCategory::Ellipse,
        ShapeCategory::Rectangle,
        ShapeCategory::Rhombus,
        ShapeCategory::Star,
        ShapeCategory::Triangle,
    ];

    /// Categories that only make sense for convex drawings.
    pub fn is_convex(self) -> bool {
        !matches!(self, ShapeCategory::Star)
    }

    /// The clean shape of this category filling `bounds`.
    pub fn candidate(self, center: Point, size: Size) -> ShapeCandidate {
        match self {
            ShapeCategory::Ellipse => ShapeCandidate::Ellipse { center, size },
            ShapeCategory::Rectangle => ShapeCandidate::Rectangle { center, size },
            ShapeCategory::Rhombus => ShapeCandidate::Rhombus { center, size },
            ShapeCategory::Star => ShapeCandidate::Star { center, size },
            ShapeCategory::Triangle => ShapeCandidate::Triangle { center, size },
        }
    }
}

/// Bitmap → category. `Ok(None)` means nothing was recognized; errors are
/// inference failures and never abort drawing.
pub trait ImageClassifier: Send + Sync {
    fn classify(&self, bitmap: &GrayImage) -> Result<Option<ShapeCategory>, InkError>;
}

struct Template {
    category: ShapeCategory,
    ink: Vec<(u32, u32)>,
    distance: GrayImage,
}

impl Template {
    fn new(category: ShapeCategory, size: u32, stroke_width: f32) -> Self {
        let outline = category
            .candidate(Point::new(0.5, 0.5), Size::new(1.0, 1.0))
            .outline_points();
        let bitmap = rasterize(&outline, size, stroke_width, true);
        Self {
            category,
            ink: ink_pixels(&bitmap),
            distance: distance_transform(&bitmap, Norm::LInf),
        }
    }
}

fn ink_pixels(bitmap: &GrayImage) -> Vec<(u32, u32)> {
    bitmap
        .enumerate_pixels()
        .filter(|(_, _, p)| p.0[0] > 0)
        .map(|(x, y, _)| (x, y))
        .collect()
}

/// Mean distance from each ink pixel to the nearest ink of the other image.
fn chamfer(ink: &[(u32, u32)], distance: &GrayImage) -> f64 {
    if ink.is_empty() {
        return f64::INFINITY;
    }
    let total: u64 = ink
        .iter()
        .map(|&(x, y)| distance.get_pixel(x, y).0[0] as u64)
        .sum();
    total as f64 / ink.len() as f64
}

/// Symmetric chamfer matching against rasterized ideal shapes.
pub struct TemplateClassifier {
    size: u32,
    max_score: f64,
    min_margin: f64,
    templates: Vec<Template>,
}

impl TemplateClassifier {
    pub fn new(size: u32, stroke_width: f32, max_score: f64) -> Self {
        let templates = ShapeCategory::ALL
            .par_iter()
            .map(|&category| Template::new(category, size, stroke_width))
            .collect();
        Self {
            size,
            max_score,
            min_margin: 0.0,
            templates,
        }
    }

    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self::new(
            config.raster_size,
            config.raster_stroke_width,
            config.max_template_score,
        )
        .with_min_margin(config.min_template_margin)
    }

    /// Reject matches whose runner-up scores within `margin` of the best.
    pub fn with_min_margin(mut self, margin: f64) -> Self {
        self.min_margin = margin.max(0.0);
        self
    }

    /// Score against every template, best (lowest) first.
    pub fn scores(&self, bitmap: &GrayImage) -> Result<Vec<(ShapeCategory, f64)>, InkError> {
        if bitmap.dimensions() != (self.size, self.size) {
            let (w, h) = bitmap.dimensions();
            return Err(InkError::Inference(format!(
                "expected a {0}x{0} bitmap, got {w}x{h}",
                self.size
            )));
        }
        let ink = ink_pixels(bitmap);
        if ink.is_empty() {
            return Ok(Vec::new());
        }
        let distance = distance_transform(bitmap, Norm::LInf);

        let mut scores: Vec<(ShapeCategory, f64)> = self
            .templates
            .par_iter()
            .map(|t| {
                let score = 0.5 * (chamfer(&t.ink, &distance) + chamfer(&ink, &t.distance));
                (t.category, score)
            })
            .collect();
        scores.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(scores)
    }
}

impl ImageClassifier for TemplateClassifier {
    fn classify(&self, bitmap: &GrayImage) -> Result<Option<ShapeCategory>, InkError> {
        let scores = self.scores(bitmap)?;
        let Some(&(category, score)) = scores.first() else {
            return Ok(None);
        };
        let margin = scores.get(1).map_or(f64::INFINITY, |&(_, next)| next - score);
        tracing::debug!(?category, score, margin, "best template match");
        Ok((score <= self.max_score && margin >= self.min_margin).then_some(category))
    }
}
