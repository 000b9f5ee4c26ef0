//! Trailing-width taper ("plume") for finished strokes.

use crate::config::StrokeConfig;
use crate::flatten::outline;
use crate::geom::Polygon;
use crate::speed::StrokePoint;
use crate::width::width_for_percent;

/// Narrow the last `taper_length` points toward the width of `end_percent`.
///
/// The target width runs linearly from the width at the taper start to
/// the end width. A point only ever gets thinner, and each point is at
/// most as wide as the one before it, so the tail narrows monotonically.
pub fn apply_taper(
    points: &mut [StrokePoint],
    taper_length: usize,
    end_percent: f64,
    config: &StrokeConfig,
) {
    let n = points.len();
    if n < 2 || taper_length == 0 {
        return;
    }
    let len = taper_length.min(n - 1);
    let start = n - 1 - len;
    let start_width = points[start].width;
    let end_width = width_for_percent(end_percent, config);

    let mut running = start_width;
    for k in 0..=len {
        let frac = k as f64 / len as f64;
        let target = start_width + (end_width - start_width) * frac;
        let point = &mut points[start + k];
        let width = point.width.min(target).min(running);
        point.width = width;
        running = width;
    }
}

/// Frames of the finishing taper, re-flattening only the open tail.
///
/// Frame `f` of `n` uses a taper length shrinking from twice the
/// configured length to the configured length while the end percentage
/// blends from full width to its final value. The last frame matches
/// the finalized tail.
#[derive(Debug, Clone)]
pub struct TaperAnimation {
    tail: Vec<StrokePoint>,
    config: StrokeConfig,
    protected: usize,
    frame: usize,
}

impl TaperAnimation {
    pub fn new(tail: Vec<StrokePoint>, config: StrokeConfig) -> Self {
        Self {
            tail,
            config,
            protected: 0,
            frame: 0,
        }
    }

    /// Keep the first `protected` points (shared with a frozen chunk)
    /// out of the taper.
    pub fn with_protected_prefix(mut self, protected: usize) -> Self {
        self.protected = protected;
        self
    }

    pub fn tail(&self) -> &[StrokePoint] {
        &self.tail
    }

    pub fn frames(&self) -> usize {
        self.config.taper_frames
    }

    /// Tail points as they look at `progress` in `[0, 1]`.
    pub fn points_at(&self, progress: f64) -> Vec<StrokePoint> {
        let progress = progress.clamp(0.0, 1.0);
        let full = self.config.taper_length as f64;
        let length = (2.0 * full + (full - 2.0 * full) * progress).round() as usize;
        // The taper start point itself is never modified, so it may be the
        // last protected point.
        let length = length.min(self.tail.len().saturating_sub(self.protected.max(1)));
        let percent = 1.0 + (self.config.taper_end_percent - 1.0) * progress;
        let mut points = self.tail.clone();
        apply_taper(&mut points, length, percent, &self.config);
        points
    }
}

impl Iterator for TaperAnimation {
    type Item = Polygon;

    fn next(&mut self) -> Option<Polygon> {
        let frames = self.config.taper_frames;
        if self.frame >= frames {
            return None;
        }
        self.frame += 1;
        let points = self.points_at(self.frame as f64 / frames as f64);
        Some(outline(&points, &self.config))
    }
}
