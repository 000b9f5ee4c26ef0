//! Speed / heading → stroke width.

use kurbo::Vec2;

use crate::config::StrokeConfig;
use crate::speed::StrokePoint;

/// How a tool turns speed and heading into width, and how its ends look.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidthStrategy {
    /// Pen family: faster strokes are thinner.
    Speed,
    /// Marker family: a chisel nib held at `angle` (radians). Width is
    /// full when moving across the nib and `min_percent` along it.
    Nib { angle: f64, min_percent: f64 },
}

/// End cap emitted at both ends of a stroke silhouette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapStyle {
    /// Half circle with the end width as diameter.
    Round,
    /// Straight edge across the end.
    Flat,
}

impl WidthStrategy {
    pub fn cap(&self) -> CapStyle {
        match self {
            WidthStrategy::Speed => CapStyle::Round,
            WidthStrategy::Nib { .. } => CapStyle::Flat,
        }
    }

    /// Width percentage in `[0, 1]` for a point moving at `speed` along
    /// `direction`.
    pub fn percent(&self, speed: f64, direction: Vec2, config: &StrokeConfig) -> f64 {
        let percent = match *self {
            WidthStrategy::Speed => speed_percent(speed, config.min_speed, config.max_speed),
            WidthStrategy::Nib { angle, min_percent } => {
                let len = direction.hypot();
                if len > 1e-12 && len.is_finite() {
                    let heading = direction.y.atan2(direction.x);
                    (heading - angle).sin().abs().max(min_percent)
                } else {
                    1.0
                }
            }
        };
        if percent.is_finite() {
            percent.clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Normalize speed between `max_speed` (0) and `min_speed` (1).
pub fn speed_percent(speed: f64, min_speed: f64, max_speed: f64) -> f64 {
    let range = max_speed - min_speed;
    if !(range > 1e-12) {
        return if speed <= min_speed { 1.0 } else { 0.0 };
    }
    ((max_speed - speed) / range).clamp(0.0, 1.0)
}

/// Width for a percentage, always within `[min_width, base_width]`.
pub fn width_for_percent(percent: f64, config: &StrokeConfig) -> f64 {
    let min = config.min_width();
    let max = config.base_width;
    let percent = if percent.is_finite() { percent.clamp(0.0, 1.0) } else { 0.0 };
    (max * percent + min * (1.0 - percent)).max(min).min(max)
}

/// Full stroke width for one point.
pub fn map_width(speed: f64, direction: Vec2, config: &StrokeConfig) -> f64 {
    width_for_percent(config.width_strategy.percent(speed, direction, config), config)
}

/// Resolve `width` for every point from `protected` on.
pub fn resolve_widths(points: &mut [StrokePoint], protected: usize, config: &StrokeConfig) {
    let n = points.len();
    for i in protected..n {
        let direction = if i > 0 {
            points[i].pos - points[i - 1].pos
        } else if n > 1 {
            points[1].pos - points[0].pos
        } else {
            Vec2::ZERO
        };
        points[i].width = map_width(points[i].speed, direction, config);
    }
}
