//! Per-point speed estimation and arc-length Gaussian smoothing.

use kurbo::Point;

use crate::sample::Sample;

/// Speed assigned when two samples arrive (nearly) at the same instant.
pub const INSTANTANEOUS_SPEED: f64 = 10_000.0;

/// Elapsed time below which a pair of samples counts as instantaneous.
const MIN_ELAPSED: f64 = 1e-6;

/// A filtered point with its (smoothed) speed and resolved width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePoint {
    pub pos: Point,
    pub time: f64,
    pub speed: f64,
    pub width: f64,
}

impl StrokePoint {
    pub fn from_sample(sample: Sample) -> Self {
        Self {
            pos: sample.pos,
            time: sample.time,
            speed: 0.0,
            width: 0.0,
        }
    }
}

/// Chord speed between two points, with the sentinel for zero elapsed time.
pub fn chord_speed(a: &StrokePoint, b: &StrokePoint) -> f64 {
    let elapsed = (b.time - a.time).abs();
    if !(elapsed >= MIN_ELAPSED) {
        return INSTANTANEOUS_SPEED;
    }
    let speed = a.pos.distance(b.pos) / elapsed;
    if speed.is_finite() {
        speed
    } else {
        INSTANTANEOUS_SPEED
    }
}

/// Overwrite `speed` with the instantaneous chord speed for every point
/// from `protected` on. Each point uses its predecessor; the first point
/// uses its successor. A lone point has speed 0.
pub fn estimate_speeds(points: &mut [StrokePoint], protected: usize) {
    let n = points.len();
    for i in protected..n {
        points[i].speed = if i > 0 {
            chord_speed(&points[i - 1], &points[i])
        } else if n > 1 {
            chord_speed(&points[0], &points[1])
        } else {
            0.0
        };
    }
}

/// Replace each speed with a Gaussian-weighted mean of its neighbors,
/// where distance is measured along the path rather than in time.
///
/// `window` is the full arc-length window; `sigma = (window - 1) / 6`
/// keeps almost all of the kernel's mass inside it. Points before
/// `protected` contribute to their neighbors but are never overwritten.
pub fn gaussian_smooth(points: &mut [StrokePoint], window: f64, protected: usize) {
    let n = points.len();
    let sigma = (window - 1.0) / 6.0;
    if n < 2 || !(sigma > 1e-9) || !sigma.is_finite() {
        return;
    }
    let half = window / 2.0;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut arc = Vec::with_capacity(n);
    let mut total = 0.0;
    arc.push(0.0);
    for w in points.windows(2) {
        total += w[0].pos.distance(w[1].pos);
        arc.push(total);
    }
    let speeds: Vec<f64> = points.iter().map(|p| p.speed).collect();

    for i in protected..n {
        let mut lo = i;
        while lo > 0 && arc[i] - arc[lo - 1] < half {
            lo -= 1;
        }
        let mut hi = i;
        while hi + 1 < n && arc[hi + 1] - arc[i] < half {
            hi += 1;
        }
        let mut weighted = 0.0;
        let mut weights = 0.0;
        for j in lo..=hi {
            let d = arc[j] - arc[i];
            let w = (-(d * d) / two_sigma_sq).exp();
            weighted += w * speeds[j];
            weights += w;
        }
        if weights > 0.0 {
            points[i].speed = weighted / weights;
        }
    }
}
