//! A single stroke in progress.
//!
//! Raw samples go through the point filter; every accepted point triggers
//! speed estimation, smoothing and width resolution for the live (not yet
//! frozen) points, and the live run is re-flattened into one polygon.
//! Once the live run grows past `freeze_threshold`, its head is flattened
//! one last time into a frozen polygon and dropped, keeping
//! `freeze_overlap` points whose speed and width can no longer change.

use tracing::debug;

use crate::config::StrokeConfig;
use crate::filter::PointFilter;
use crate::flatten::outline;
use crate::geom::Polygon;
use crate::sample::Sample;
use crate::speed::{estimate_speeds, gaussian_smooth, StrokePoint};
use crate::taper::TaperAnimation;
use crate::width::resolve_widths;

/// Geometry after one input event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeFrame {
    /// Polygons frozen by this event, in stroke order.
    pub frozen: Vec<Polygon>,
    /// Outline of the live tail.
    pub live: Polygon,
}

#[derive(Debug, Clone)]
pub struct FinishedStroke {
    /// Every polygon of the stroke; the last one is the tapered tail.
    pub polygons: Vec<Polygon>,
    /// The tail as drawn, before the taper.
    pub untapered_tail: Polygon,
    /// Frames morphing `untapered_tail` into the last of `polygons`.
    pub animation: TaperAnimation,
    /// Raw input, for shape classification.
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone)]
pub struct StrokeSession {
    config: StrokeConfig,
    filter: PointFilter,
    raw: Vec<Sample>,
    live: Vec<StrokePoint>,
    protected: usize,
    frozen: Vec<Polygon>,
}

impl StrokeSession {
    pub fn begin(config: StrokeConfig, first: Sample) -> Self {
        let filter = PointFilter::new(&config);
        let mut session = Self {
            config,
            filter,
            raw: Vec::new(),
            live: Vec::new(),
            protected: 0,
            frozen: Vec::new(),
        };
        session.accept(first);
        session
    }

    pub fn config(&self) -> &StrokeConfig {
        &self.config
    }

    /// Apply a new zoom factor to subsequent points. Invalid values are ignored.
    pub fn set_content_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.config.content_scale = scale;
            self.filter.set_content_scale(scale);
        }
    }

    pub fn extend(&mut self, sample: Sample) -> StrokeFrame {
        self.accept(sample);
        let frozen = self.freeze();
        StrokeFrame {
            frozen,
            live: self.live_outline(),
        }
    }

    /// Finish the stroke, optionally with a final sample at pointer-up.
    pub fn end(mut self, last: Option<Sample>) -> FinishedStroke {
        if let Some(sample) = last {
            self.accept(sample);
        }
        if let Some(point) = self.filter.finish() {
            self.push_point(point);
        }
        self.freeze();

        let untapered_tail = self.live_outline();
        let animation = TaperAnimation::new(self.live.clone(), self.config.clone())
            .with_protected_prefix(self.protected);
        let tapered = outline(&animation.points_at(1.0), &self.config);

        let mut polygons = self.frozen;
        polygons.push(tapered);
        debug!(
            samples = self.raw.len(),
            polygons = polygons.len(),
            "stroke finished"
        );
        FinishedStroke {
            polygons,
            untapered_tail,
            animation,
            samples: self.raw,
        }
    }

    /// Abandon the stroke. Nothing is committed.
    pub fn cancel(self) {
        debug!(samples = self.raw.len(), "stroke cancelled");
    }

    pub fn frozen(&self) -> &[Polygon] {
        &self.frozen
    }

    pub fn live_points(&self) -> &[StrokePoint] {
        &self.live
    }

    pub fn raw_samples(&self) -> &[Sample] {
        &self.raw
    }

    pub fn live_outline(&self) -> Polygon {
        outline(&self.live, &self.config)
    }

    /// Frozen polygons followed by the live outline.
    pub fn polygons(&self) -> Vec<Polygon> {
        let mut polygons = self.frozen.clone();
        polygons.push(self.live_outline());
        polygons
    }

    fn accept(&mut self, sample: Sample) {
        self.raw.push(sample);
        if let Some(point) = self.filter.push(sample) {
            self.push_point(point);
        }
    }

    fn push_point(&mut self, sample: Sample) {
        self.live.push(StrokePoint::from_sample(sample));
        estimate_speeds(&mut self.live, self.protected);
        gaussian_smooth(&mut self.live, self.config.smoothing_window, self.protected);
        resolve_widths(&mut self.live, self.protected, &self.config);
    }

    fn freeze(&mut self) -> Vec<Polygon> {
        let mut frozen = Vec::new();
        while self.live.len() > self.config.freeze_threshold {
            let chunk = self.config.freeze_chunk.min(self.live.len());
            let keep = self.config.freeze_overlap.min(chunk.saturating_sub(1));
            let dropped = chunk - keep;
            if dropped == 0 {
                break;
            }
            let polygon = outline(&self.live[..chunk], &self.config);
            self.live.drain(..dropped);
            self.protected = keep;
            debug!(points = chunk, vertices = polygon.len(), "froze stroke chunk");
            self.frozen.push(polygon.clone());
            frozen.push(polygon);
        }
        frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight(n: usize) -> Vec<Sample> {
        (0..n)
            .map(|i| Sample::new(i as f64 * 2.0, 50.0, i as f64 * 0.01))
            .collect()
    }

    fn draw(samples: &[Sample]) -> StrokeSession {
        let mut session = StrokeSession::begin(StrokeConfig::default(), samples[0]);
        for &s in &samples[1..] {
            session.extend(s);
        }
        session
    }

    #[test]
    fn single_sample_is_a_dot() {
        let session = StrokeSession::begin(StrokeConfig::default(), Sample::new(5.0, 5.0, 0.0));
        let dot = session.live_outline();
        assert!(!dot.is_empty());
        let bbox = dot.bounding_box().unwrap();
        assert!((bbox.width() - 6.0).abs() < 0.5);
        assert!((bbox.center().x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn long_stroke_freezes_chunks() {
        let config = StrokeConfig::default();
        let session = draw(&straight(500));
        assert!(!session.frozen().is_empty());
        assert!(session.live_points().len() <= config.freeze_threshold);

        // Chunks overlap their successors so the stroke has no gaps.
        let polygons = session.polygons();
        for pair in polygons.windows(2) {
            let a = pair[0].bounding_box().unwrap();
            let b = pair[1].bounding_box().unwrap();
            assert!(a.x1 > b.x0);
            assert!(a.x0 < b.x0);
        }
        let first = polygons[0].bounding_box().unwrap();
        assert!(first.x0 < 0.0);
    }

    #[test]
    fn freezing_reports_new_polygons_once() {
        let samples = straight(400);
        let mut session = StrokeSession::begin(StrokeConfig::default(), samples[0]);
        let mut reported = 0;
        for &s in &samples[1..] {
            reported += session.extend(s).frozen.len();
        }
        assert_eq!(reported, session.frozen().len());
    }

    #[test]
    fn protected_points_keep_their_width() {
        let samples = straight(300);
        let mut session = StrokeSession::begin(StrokeConfig::default(), samples[0]);
        let mut held: Option<Vec<StrokePoint>> = None;
        for &s in &samples[1..] {
            let frame = session.extend(s);
            if !frame.frozen.is_empty() {
                held = Some(session.live_points()[..3].to_vec());
            } else if let Some(held) = &held {
                assert_eq!(&session.live_points()[..3], &held[..]);
            }
        }
        assert!(held.is_some());
    }

    #[test]
    fn end_tapers_the_tail() {
        let finished = draw(&straight(60)).end(None);
        assert_eq!(finished.samples.len(), 60);
        assert_eq!(finished.animation.frames(), StrokeConfig::default().taper_frames);
        let tail = finished.polygons.last().unwrap();
        assert_eq!(Some(tail), finished.animation.clone().last().as_ref());
        // The tapered end is thinner than the untapered one.
        let end_height = |p: &Polygon| {
            let right = p.bounding_box().unwrap().x1;
            let near: Vec<f64> = p
                .points
                .iter()
                .filter(|q| q.x > right - 6.0)
                .map(|q| q.y)
                .collect();
            near.iter().cloned().fold(f64::MIN, f64::max) - near.iter().cloned().fold(f64::MAX, f64::min)
        };
        assert!(end_height(tail) < end_height(&finished.untapered_tail));
    }

    #[test]
    fn end_reaches_the_last_raw_position() {
        let samples = straight(40);
        let finished = draw(&samples).end(None);
        let bbox = finished.polygons.last().unwrap().bounding_box().unwrap();
        let last_x = samples.last().unwrap().pos.x;
        assert!(bbox.x1 >= last_x - 1e-6);
    }
}
