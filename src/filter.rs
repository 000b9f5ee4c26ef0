//! Speed-adaptive lag filter for raw pointer samples.
//!
//! The filter trails the pointer like a string pulled behind it: the
//! emitted point only moves once the pointer gets farther away than a
//! lag distance, and then moves just enough to stay exactly that far
//! behind. Fast movement gets a longer lag (smoother lines), slow
//! movement a shorter one (precise detail).

use std::collections::VecDeque;

use kurbo::Point;

use crate::config::StrokeConfig;
use crate::geom::polyline_length;
use crate::sample::Sample;

/// Screen speed (px/s) at which the lag curve bends.
const LAG_SPEED_KNEE: f64 = 200.0;
/// Lag growth per log-unit of speed, in screen pixels.
const LAG_SLOPE: f64 = 1.5;
/// Lag at zero speed, in screen pixels.
const LAG_BASE: f64 = 0.5;
/// Tool width at which the size factor is 1.
const REFERENCE_TOOL_WIDTH: f64 = 4.0;
/// Time offset of the synthetic sample that catches the path up to
/// the true final position.
const CATCH_UP_DT: f64 = 1.0 / 60.0;

/// Maximum lag in screen pixels for a given screen speed (px/s).
pub fn lag_distance(speed: f64) -> f64 {
    let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    (speed / LAG_SPEED_KNEE + 1.0).ln() * LAG_SLOPE + LAG_BASE
}

/// Thinner tools track the pointer more tightly.
fn size_factor(tool_width: f64) -> f64 {
    if tool_width.is_finite() && tool_width > 0.0 {
        2.0 / (1.0 + REFERENCE_TOOL_WIDTH / tool_width)
    } else {
        1.0
    }
}

#[derive(Debug, Clone)]
pub struct PointFilter {
    window: f64,
    min_distance_px: f64,
    tool_width: f64,
    multiplier: f64,
    scale: f64,
    buffer: VecDeque<Sample>,
    last_raw: Option<Sample>,
    last_emitted: Option<Sample>,
}

impl PointFilter {
    pub fn new(config: &StrokeConfig) -> Self {
        Self {
            window: config.filter_window.max(1e-3),
            min_distance_px: config.min_point_distance.max(0.0),
            tool_width: config.base_width,
            multiplier: config.smoothing_multiplier.max(0.0),
            scale: config.effective_scale(),
            buffer: VecDeque::new(),
            last_raw: None,
            last_emitted: None,
        }
    }

    /// Update the zoom factor; lag and minimum distance are screen-space.
    pub fn set_content_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        }
    }

    /// Feed one raw sample; returns the filtered point, if one is emitted.
    pub fn push(&mut self, sample: Sample) -> Option<Sample> {
        let sample = self.sanitize(sample)?;
        self.last_raw = Some(sample);
        self.buffer.push_back(sample);
        while self.buffer.len() > 2
            && self.buffer.front().is_some_and(|s| s.time < sample.time - self.window)
        {
            self.buffer.pop_front();
        }

        let Some(last) = self.last_emitted else {
            self.last_emitted = Some(sample);
            return Some(sample);
        };

        let lag = self.max_lag();
        let delta = sample.pos - last.pos;
        let dist = delta.hypot();
        if !dist.is_finite() {
            // The distance overflowed; pulling back along it would give NaN.
            self.last_emitted = Some(sample);
            return Some(sample);
        }
        if dist <= lag {
            return None;
        }
        let pos = sample.pos - delta * (lag / dist);
        if pos.distance(last.pos) < self.min_distance_px / self.scale {
            return None;
        }
        let emitted = Sample {
            pos,
            time: sample.time,
        };
        self.last_emitted = Some(emitted);
        Some(emitted)
    }

    /// Emit a synthetic sample at the last raw position, slightly later
    /// in time, so the filtered path ends where the pointer ended.
    pub fn finish(&mut self) -> Option<Sample> {
        let raw = self.last_raw?;
        let last = self.last_emitted?;
        if raw.pos.distance(last.pos) < 1e-9 {
            return None;
        }
        let catch_up = Sample {
            pos: raw.pos,
            time: raw.time.max(last.time) + CATCH_UP_DT,
        };
        self.last_emitted = Some(catch_up);
        Some(catch_up)
    }

    /// Speed (content units / s) over the trailing window.
    pub fn speed(&self) -> f64 {
        let (Some(first), Some(last)) = (self.buffer.front(), self.buffer.back()) else {
            return 0.0;
        };
        let elapsed = last.time - first.time;
        if !(elapsed > 1e-9) {
            return 0.0;
        }
        let points: Vec<Point> = self.buffer.iter().map(|s| s.pos).collect();
        let speed = polyline_length(&points) / elapsed;
        if speed.is_finite() {
            speed
        } else {
            0.0
        }
    }

    /// Current maximum lag in content units.
    pub fn max_lag(&self) -> f64 {
        let screen_speed = self.speed() * self.scale;
        lag_distance(screen_speed) * size_factor(self.tool_width) * self.multiplier / self.scale
    }

    pub fn last_emitted(&self) -> Option<Sample> {
        self.last_emitted
    }

    /// Drop non-finite positions; clamp timestamps so they never decrease.
    fn sanitize(&self, sample: Sample) -> Option<Sample> {
        if !(sample.pos.x.is_finite() && sample.pos.y.is_finite()) {
            return None;
        }
        let previous = self.last_raw.map(|s| s.time);
        let time = match previous {
            Some(prev) if !(sample.time >= prev) => prev,
            None if !sample.time.is_finite() => 0.0,
            _ => sample.time,
        };
        Some(Sample {
            pos: sample.pos,
            time,
        })
    }
}
