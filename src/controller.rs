//! Pointer events → stroke sessions and shape suggestions.
//!
//! The controller owns at most one [`StrokeSession`]. While the pointer is
//! down it watches for the pointer to settle: once no large movement has
//! happened for `quiescence_delay` seconds, the current stroke is sent to
//! the classifier. A later large movement cancels that request.

use kurbo::Point;
use tracing::{debug, warn};

use crate::classify::{ShapeSuggester, Suggestion};
use crate::config::{ClassifierConfig, StrokeConfig};
use crate::sample::Sample;
use crate::session::{FinishedStroke, StrokeFrame, StrokeSession};

#[derive(Debug, Clone, Copy)]
struct Anchor {
    pos: Point,
    time: f64,
}

pub struct StrokeController {
    config: StrokeConfig,
    classifier: ClassifierConfig,
    session: Option<StrokeSession>,
    suggester: Option<ShapeSuggester>,
    anchor: Option<Anchor>,
    requested: bool,
}

impl StrokeController {
    pub fn new(config: StrokeConfig, classifier: ClassifierConfig) -> Self {
        Self {
            config,
            classifier,
            session: None,
            suggester: None,
            anchor: None,
            requested: false,
        }
    }

    /// Enable shape suggestions.
    pub fn with_suggester(mut self, suggester: ShapeSuggester) -> Self {
        self.suggester = Some(suggester);
        self
    }

    /// Tool parameters for the next stroke.
    pub fn set_config(&mut self, config: StrokeConfig) {
        self.config = config;
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&StrokeSession> {
        self.session.as_ref()
    }

    pub fn pointer_down(&mut self, pos: Point, time: f64, content_scale: f64) -> StrokeFrame {
        if let Some(previous) = self.session.take() {
            previous.cancel();
        }
        self.cancel_suggestion();
        let config = self.config.clone().with_content_scale(content_scale);
        let session = StrokeSession::begin(config, Sample { pos, time });
        let frame = StrokeFrame {
            frozen: Vec::new(),
            live: session.live_outline(),
        };
        self.session = Some(session);
        self.anchor = Some(Anchor { pos, time });
        frame
    }

    /// `None` when no stroke is in progress.
    pub fn pointer_move(&mut self, pos: Point, time: f64, content_scale: f64) -> Option<StrokeFrame> {
        let session = self.session.as_mut()?;
        session.set_content_scale(content_scale);
        let frame = session.extend(Sample { pos, time });
        self.track_movement(pos, time, content_scale);
        Some(frame)
    }

    /// Finish the stroke. A suggestion already requested stays pollable.
    pub fn pointer_up(&mut self, pos: Point, time: f64, content_scale: f64) -> Option<FinishedStroke> {
        let mut session = self.session.take()?;
        session.set_content_scale(content_scale);
        self.anchor = None;
        Some(session.end(Some(Sample { pos, time })))
    }

    pub fn pointer_cancel(&mut self) {
        if let Some(session) = self.session.take() {
            session.cancel();
        }
        self.anchor = None;
        self.cancel_suggestion();
    }

    /// Advance the quiescence timer. Returns true when a classification
    /// request was issued.
    pub fn tick(&mut self, now: f64) -> bool {
        if self.requested || self.suggester.is_none() {
            return false;
        }
        let (Some(session), Some(anchor)) = (&self.session, self.anchor) else {
            return false;
        };
        if now - anchor.time < self.classifier.quiescence_delay {
            return false;
        }
        let points: Vec<Point> = session.raw_samples().iter().map(|s| s.pos).collect();
        let Some(suggester) = self.suggester.as_mut() else {
            return false;
        };
        self.requested = true;
        match suggester.request(points) {
            Ok(()) => {
                debug!(now, "requested shape suggestion");
                true
            }
            Err(err) => {
                warn!("shape suggestion unavailable: {err}");
                false
            }
        }
    }

    pub fn poll_suggestion(&mut self) -> Option<Suggestion> {
        self.suggester.as_mut()?.poll()
    }

    /// Block until the outstanding suggestion resolves.
    pub fn wait_suggestion(&mut self) -> Option<Suggestion> {
        self.suggester.as_mut()?.wait()
    }

    fn track_movement(&mut self, pos: Point, time: f64, content_scale: f64) {
        let scale = if content_scale.is_finite() && content_scale > 0.0 {
            content_scale
        } else {
            1.0
        };
        let Some(anchor) = self.anchor else {
            self.anchor = Some(Anchor { pos, time });
            return;
        };
        if anchor.pos.distance(pos) * scale > self.classifier.large_movement {
            self.anchor = Some(Anchor { pos, time });
            if self.requested {
                debug!("large movement, dropping shape suggestion");
            }
            self.cancel_suggestion();
        }
    }

    fn cancel_suggestion(&mut self) {
        if let Some(suggester) = self.suggester.as_mut() {
            suggester.cancel();
        }
        self.requested = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ClassifierWorker, ShapeCandidate, StrokeClassifier};
    use kurbo::Size;

    struct AlwaysEllipse;

    impl StrokeClassifier for AlwaysEllipse {
        fn classify(&self, points: &[Point]) -> Option<ShapeCandidate> {
            points.first().map(|&center| ShapeCandidate::Ellipse {
                center,
                size: Size::new(1.0, 1.0),
            })
        }
    }

    fn controller() -> StrokeController {
        let worker = ClassifierWorker::spawn(AlwaysEllipse).unwrap();
        StrokeController::new(StrokeConfig::default(), ClassifierConfig::default())
            .with_suggester(ShapeSuggester::new(worker))
    }

    #[test]
    fn settling_requests_a_suggestion() {
        let mut c = controller();
        c.pointer_down(Point::new(0.0, 0.0), 0.0, 1.0);
        c.pointer_move(Point::new(50.0, 0.0), 0.1, 1.0);
        c.pointer_move(Point::new(50.5, 0.0), 0.3, 1.0);
        assert!(!c.tick(0.5));
        assert!(c.tick(0.8));
        // Only one request per settle.
        assert!(!c.tick(0.9));
        assert!(matches!(
            c.wait_suggestion(),
            Some(Suggestion::Shape(ShapeCandidate::Ellipse { .. }))
        ));
    }

    #[test]
    fn large_movement_cancels_request() {
        let mut c = controller();
        c.pointer_down(Point::new(0.0, 0.0), 0.0, 1.0);
        assert!(c.tick(1.0));
        c.pointer_move(Point::new(30.0, 0.0), 1.1, 1.0);
        assert_eq!(c.wait_suggestion(), None);
        // The timer restarts from the large movement.
        assert!(!c.tick(1.5));
        assert!(c.tick(1.8));
    }

    #[test]
    fn movement_is_measured_on_screen() {
        let mut c = controller();
        c.pointer_down(Point::new(0.0, 0.0), 0.0, 4.0);
        assert!(c.tick(1.0));
        // 3 content units at 4x zoom is 12 screen pixels.
        c.pointer_move(Point::new(3.0, 0.0), 1.1, 4.0);
        assert_eq!(c.wait_suggestion(), None);
    }

    #[test]
    fn cancel_discards_everything() {
        let mut c = controller();
        c.pointer_down(Point::new(0.0, 0.0), 0.0, 1.0);
        c.pointer_move(Point::new(5.0, 0.0), 0.05, 1.0);
        c.tick(1.0);
        c.pointer_cancel();
        assert!(!c.is_drawing());
        assert_eq!(c.poll_suggestion(), None);
        assert!(c.pointer_move(Point::new(6.0, 0.0), 0.1, 1.0).is_none());
        assert!(c.pointer_up(Point::new(6.0, 0.0), 0.1, 1.0).is_none());
    }

    #[test]
    fn pointer_up_finishes_the_stroke() {
        let mut c = StrokeController::new(StrokeConfig::default(), ClassifierConfig::default());
        c.pointer_down(Point::new(0.0, 0.0), 0.0, 1.0);
        for i in 1..20 {
            c.pointer_move(Point::new(i as f64 * 3.0, 0.0), i as f64 * 0.01, 1.0);
        }
        let finished = c.pointer_up(Point::new(60.0, 0.0), 0.2, 1.0).unwrap();
        assert_eq!(finished.samples.len(), 21);
        assert!(!c.is_drawing());
        assert!(!c.tick(5.0));
    }
}
