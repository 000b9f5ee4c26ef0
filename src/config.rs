use crate::error::InkError;
use crate::width::WidthStrategy;

/// All per-tool stroke parameters in one struct.
/// Adjustable at runtime (for tool pickers and width sliders); lengths
/// are in content units unless noted, times in seconds.
#[derive(Debug, Clone)]
pub struct StrokeConfig {
    // -- Input filter --
    /// Multiplier on the filter's lag distance. 0 tracks the raw input
    /// exactly, larger values trade latency for smoother strokes.
    pub smoothing_multiplier: f64,
    /// Zoom factor of the content (screen pixels per content unit).
    /// Distances measured on screen are divided by this.
    pub content_scale: f64,
    /// Length of the trailing window used for the filter's speed estimate.
    pub filter_window: f64,
    /// Emitted points closer than this (in screen pixels) to the previous
    /// emitted point are suppressed.
    pub min_point_distance: f64,

    // -- Speed smoothing --
    /// Arc-length window of the Gaussian speed smoother.
    /// Values <= 1 disable smoothing.
    pub smoothing_window: f64,

    // -- Width --
    /// Nominal (maximum) stroke width.
    pub base_width: f64,
    /// Thinnest width as a fraction of `base_width`.
    pub min_width_multiplier: f64,
    /// At or below this speed the stroke has full width.
    pub min_speed: f64,
    /// At or above this speed the stroke has the minimum width.
    pub max_speed: f64,
    /// How speed and heading map to width, and which cap the stroke gets.
    pub width_strategy: WidthStrategy,

    // -- Taper --
    /// Number of trailing points narrowed at the end of a stroke. 0 = off.
    pub taper_length: usize,
    /// Width percentage (0 = thinnest, 1 = full) reached at the stroke end.
    pub taper_end_percent: f64,
    /// Frames in the finishing taper animation.
    pub taper_frames: usize,

    // -- Flattening --
    /// Maximum distance (pixels) between the true offset curve and its
    /// polygon approximation.
    pub max_error: f64,
    /// Cosine below which adjacent chords count as a sharp bend and are
    /// subdivided unconditionally.
    pub curvature_threshold: f64,
    /// Hard cap on parameter samples per bezier segment.
    pub max_subdivision_points: usize,

    // -- Segmentation --
    /// Live point count that triggers freezing a chunk.
    pub freeze_threshold: usize,
    /// Number of points flattened into each frozen polygon.
    pub freeze_chunk: usize,
    /// Points of a frozen chunk retained at the head of the next one.
    pub freeze_overlap: usize,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            smoothing_multiplier: 1.0,
            content_scale: 1.0,
            filter_window: 0.1,
            min_point_distance: 1.0,
            smoothing_window: 30.0,
            base_width: 6.0,
            min_width_multiplier: 0.35,
            min_speed: 50.0,
            max_speed: 2000.0,
            width_strategy: WidthStrategy::Speed,
            taper_length: 12,
            taper_end_percent: 0.0,
            taper_frames: 8,
            max_error: 0.2,
            curvature_threshold: 0.8,
            max_subdivision_points: 200,
            freeze_threshold: 150,
            freeze_chunk: 100,
            freeze_overlap: 3,
        }
    }
}

impl StrokeConfig {
    /// Pen preset: speed-driven width with round caps.
    pub fn pen() -> Self {
        Self::default()
    }

    /// Marker preset: chisel nib at 45°, flat caps, no taper.
    pub fn marker() -> Self {
        Self {
            base_width: 16.0,
            min_width_multiplier: 0.2,
            width_strategy: WidthStrategy::Nib {
                angle: std::f64::consts::FRAC_PI_4,
                min_percent: 0.25,
            },
            taper_length: 0,
            ..Self::default()
        }
    }

    /// Builder method for setting the nominal width.
    pub fn with_base_width(mut self, width: f64) -> Self {
        self.base_width = width;
        self
    }

    /// Builder method for setting the content zoom factor.
    pub fn with_content_scale(mut self, scale: f64) -> Self {
        self.content_scale = scale;
        self
    }

    /// Thinnest width the stroke can reach.
    pub fn min_width(&self) -> f64 {
        self.base_width * self.min_width_multiplier
    }

    /// Content scale with non-finite or non-positive values replaced by 1.
    pub(crate) fn effective_scale(&self) -> f64 {
        if self.content_scale.is_finite() && self.content_scale > 0.0 {
            self.content_scale
        } else {
            1.0
        }
    }

    /// Check that every value is finite and within its usable range.
    pub fn validate(&self) -> Result<(), InkError> {
        fn check(ok: bool, what: &str) -> Result<(), InkError> {
            if ok {
                Ok(())
            } else {
                Err(InkError::InvalidConfig(what.to_string()))
            }
        }
        check(
            self.base_width.is_finite() && self.base_width > 0.0,
            "base_width must be positive",
        )?;
        check(
            (0.0..=1.0).contains(&self.min_width_multiplier),
            "min_width_multiplier must be in [0, 1]",
        )?;
        check(
            self.min_speed.is_finite() && self.max_speed.is_finite() && self.min_speed <= self.max_speed,
            "min_speed must not exceed max_speed",
        )?;
        check(
            self.smoothing_multiplier.is_finite() && self.smoothing_multiplier >= 0.0,
            "smoothing_multiplier must be non-negative",
        )?;
        check(
            self.content_scale.is_finite() && self.content_scale > 0.0,
            "content_scale must be positive",
        )?;
        check(
            self.filter_window.is_finite() && self.filter_window > 0.0,
            "filter_window must be positive",
        )?;
        check(self.smoothing_window.is_finite(), "smoothing_window must be finite")?;
        check(
            (0.0..=1.0).contains(&self.taper_end_percent),
            "taper_end_percent must be in [0, 1]",
        )?;
        check(
            self.max_error.is_finite() && self.max_error > 0.0,
            "max_error must be positive",
        )?;
        check(
            (-1.0..=1.0).contains(&self.curvature_threshold),
            "curvature_threshold must be a cosine in [-1, 1]",
        )?;
        check(
            self.max_subdivision_points >= 2,
            "max_subdivision_points must be at least 2",
        )?;
        check(
            self.freeze_chunk > self.freeze_overlap && self.freeze_threshold > self.freeze_chunk,
            "freeze thresholds must satisfy overlap < chunk < threshold",
        )?;
        if let WidthStrategy::Nib { angle, min_percent } = self.width_strategy {
            check(angle.is_finite(), "nib angle must be finite")?;
            check((0.0..=1.0).contains(&min_percent), "nib min_percent must be in [0, 1]")?;
        }
        Ok(())
    }
}

/// Thresholds of the shape classifier and its suggestion timer.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Strokes with fewer points are never classified.
    pub min_points: usize,
    /// Circularity above which a closed stroke is an ellipse outright.
    pub circularity_threshold: f64,
    /// Area / hull area below which nothing is recognized.
    pub min_convexity: f64,
    /// Area / hull area required for convex categories
    /// (ellipse, rectangle, rhombus, triangle).
    pub convex_category_convexity: f64,
    /// Short / long bounding box side below which the stroke is line-like.
    pub min_aspect_ratio: f64,
    /// RDP tolerance before arrow detection, as a fraction of the
    /// bounding box diagonal.
    pub simplify_ratio: f64,
    /// Side of the square bitmap handed to the image classifier.
    pub raster_size: u32,
    /// Stroke width (pixels) used when rasterizing.
    pub raster_stroke_width: f32,
    /// Worst template chamfer score (pixels) still accepted as a match.
    pub max_template_score: f64,
    /// The best template must beat the runner-up by this many pixels.
    pub min_template_margin: f64,
    /// Endpoint gap, as a fraction of the bounding box diagonal, above
    /// which a stroke is open and only an arrow can match.
    pub max_closure_gap: f64,
    /// Seconds without a large movement before a suggestion is requested.
    pub quiescence_delay: f64,
    /// Screen-pixel movement that counts as large and restarts the timer.
    pub large_movement: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_points: 5,
            circularity_threshold: 0.94,
            min_convexity: 0.4,
            convex_category_convexity: 0.8,
            min_aspect_ratio: 0.1,
            simplify_ratio: 0.02,
            raster_size: 48,
            raster_stroke_width: 2.0,
            max_template_score: 2.0,
            min_template_margin: 0.25,
            max_closure_gap: 0.25,
            quiescence_delay: 0.6,
            large_movement: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_validate() {
        StrokeConfig::pen().validate().unwrap();
        StrokeConfig::marker().validate().unwrap();
    }

    #[test]
    fn rejects_inverted_speed_range() {
        let config = StrokeConfig {
            min_speed: 100.0,
            max_speed: 10.0,
            ..StrokeConfig::default()
        };
        assert!(matches!(config.validate(), Err(InkError::InvalidConfig(_))));
    }

    #[test]
    fn rejects_overlap_larger_than_chunk() {
        let config = StrokeConfig {
            freeze_chunk: 3,
            freeze_overlap: 3,
            ..StrokeConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_scale_falls_back_to_one() {
        let config = StrokeConfig::default().with_content_scale(0.0);
        assert_eq!(config.effective_scale(), 1.0);
        let config = StrokeConfig::default().with_content_scale(f64::NAN);
        assert_eq!(config.effective_scale(), 1.0);
    }
}
