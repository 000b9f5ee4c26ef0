//! Adaptive offset flattening: bezier centerline + widths → closed silhouette.
//!
//! Each segment is sampled in parameter space. A pair of adjacent samples
//! is split when the centerline bends sharply at its far end (sharp bends
//! need guaranteed density) or when the true offset curve strays from the
//! straight chord by more than the error bound. Every loop is capped so
//! pathological curvature yields best-effort output instead of hanging.

use std::f64::consts::PI;

use kurbo::{ParamCurve, ParamCurveDeriv, Point, Vec2};

use crate::config::StrokeConfig;
use crate::geom::{cosine, line_distance_sq, perpendicular, unit, Polygon};
use crate::speed::StrokePoint;
use crate::trajectory::{self, BezierSegment, Trajectory};
use crate::width::CapStyle;

/// Parameter gap below which a pair is never split further.
const MIN_PARAM_STEP: f64 = 1e-6;
/// Upper bound on points in one half-circle cap.
const MAX_ARC_STEPS: usize = 64;

/// Which side of the centerline an offset lies on, looking along travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Right,
    Left,
}

impl Side {
    fn sign(self) -> f64 {
        match self {
            Side::Right => 1.0,
            Side::Left => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FlattenParams {
    /// Squared maximum deviation, in content units.
    pub error_sq: f64,
    pub curvature_threshold: f64,
    pub max_samples: usize,
}

impl FlattenParams {
    pub fn from_config(config: &StrokeConfig) -> Self {
        let error = config.max_error / config.effective_scale();
        Self {
            error_sq: error * error,
            curvature_threshold: config.curvature_threshold,
            max_samples: config.max_subdivision_points.max(2),
        }
    }

    fn error(&self) -> f64 {
        self.error_sq.sqrt()
    }
}

/// Unit tangent from the analytic derivative, falling back to the chord
/// direction where the derivative vanishes.
pub fn tangent_at(seg: &BezierSegment, t: f64) -> Vec2 {
    let derivative = seg.quad().deriv().eval(t).to_vec2();
    unit(derivative)
        .or_else(|| unit(seg.to - seg.from))
        .unwrap_or(Vec2::new(1.0, 0.0))
}

/// Right-hand unit normal at `t`.
pub fn normal_at(seg: &BezierSegment, t: f64) -> Vec2 {
    perpendicular(tangent_at(seg, t))
}

/// Centerline point pushed out by half the interpolated width.
pub fn offset_point(seg: &BezierSegment, t: f64, side: Side) -> Point {
    let half = 0.5 * seg.width_at(t).max(0.0);
    seg.point_at(t) + normal_at(seg, t) * (half * side.sign())
}

fn exceeds_error(seg: &BezierSegment, t1: f64, mid: f64, t2: f64, error_sq: f64) -> bool {
    [Side::Right, Side::Left].into_iter().any(|side| {
        let o1 = offset_point(seg, t1, side);
        let om = offset_point(seg, mid, side);
        let o2 = offset_point(seg, t2, side);
        line_distance_sq(om, o1, o2) > error_sq
    })
}

/// Parameter samples for one segment, shared by both sides.
///
/// Always starts at 0, ends at 1, and never holds more than
/// `max_samples` values.
pub fn sample_segment(seg: &BezierSegment, params: &FlattenParams) -> Vec<f64> {
    let cap = params.max_samples.max(2);
    let mut ts = vec![0.0, 1.0];
    let mut i = 0;
    while i + 1 < ts.len() {
        let (t1, t2) = (ts[i], ts[i + 1]);
        if t2 - t1 < MIN_PARAM_STEP {
            i += 1;
            continue;
        }
        let mid = 0.5 * (t1 + t2);

        if let Some(&t3) = ts.get(i + 2) {
            let p1 = seg.point_at(t1);
            let p2 = seg.point_at(t2);
            let p3 = seg.point_at(t3);
            if cosine(p2 - p1, p3 - p2) < params.curvature_threshold {
                if ts.len() + 2 > cap {
                    tracing::debug!(samples = ts.len(), "subdivision cap reached at sharp bend");
                    break;
                }
                ts.insert(i + 2, 0.5 * (t2 + t3));
                ts.insert(i + 1, mid);
                continue;
            }
        }

        if exceeds_error(seg, t1, mid, t2, params.error_sq) {
            if ts.len() + 1 > cap {
                tracing::debug!(samples = ts.len(), "subdivision cap reached");
                break;
            }
            ts.insert(i + 1, mid);
            continue;
        }
        i += 1;
    }
    ts
}

/// Offset polyline of one segment on one side, in travel order.
pub fn flatten_segment(seg: &BezierSegment, side: Side, params: &FlattenParams) -> Vec<Point> {
    sample_segment(seg, params)
        .into_iter()
        .map(|t| offset_point(seg, t, side))
        .collect()
}

/// Number of chords approximating a half circle within `error`.
fn arc_steps(radius: f64, error: f64) -> usize {
    if !(radius > error) {
        return 2;
    }
    let step = 2.0 * (1.0 - error / radius).acos();
    if !(step > 0.0) {
        return MAX_ARC_STEPS;
    }
    ((PI / step).ceil() as usize).clamp(2, MAX_ARC_STEPS)
}

/// Interior points of a half circle around `center`, starting next to
/// `center + from * radius` and sweeping through `center + via * radius`.
fn half_circle(out: &mut Vec<Point>, center: Point, from: Vec2, via: Vec2, radius: f64, error: f64) {
    let steps = arc_steps(radius, error);
    for k in 1..steps {
        let theta = PI * k as f64 / steps as f64;
        push_distinct(out, center + (from * theta.cos() + via * theta.sin()) * radius);
    }
}

fn push_distinct(out: &mut Vec<Point>, p: Point) {
    if out.last().map_or(true, |last| last.distance(p) > 1e-9) {
        out.push(p);
    }
}

/// Full circle for single-point strokes.
pub fn dot_polygon(center: Point, width: f64, params: &FlattenParams) -> Polygon {
    let radius = 0.5 * width.max(0.0);
    if !(radius > 0.0) || !radius.is_finite() {
        return Polygon::new(vec![center]);
    }
    let steps = 2 * arc_steps(radius, params.error());
    let points = (0..steps)
        .map(|k| {
            let theta = 2.0 * PI * k as f64 / steps as f64;
            center + Vec2::new(theta.cos(), theta.sin()) * radius
        })
        .collect();
    Polygon::new(points)
}

/// Stitch every segment into one closed silhouette: right side forward,
/// end cap, left side backward, start cap.
pub fn flatten_stroke(trajectory: &Trajectory, cap: CapStyle, params: &FlattenParams) -> Polygon {
    let nodes = match trajectory {
        Trajectory::Empty => return Polygon::default(),
        Trajectory::Dot { center, width } => return dot_polygon(*center, *width, params),
        Trajectory::Path(nodes) => nodes,
    };
    let segments: Vec<BezierSegment> = trajectory
        .segments()
        .into_iter()
        .filter(|seg| !seg.is_degenerate())
        .collect();
    let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
        return match nodes.first() {
            Some(node) => dot_polygon(node.point, node.width, params),
            None => Polygon::default(),
        };
    };

    let samples: Vec<Vec<f64>> = segments
        .iter()
        .map(|seg| sample_segment(seg, params))
        .collect();
    let error = params.error();
    let mut out = Vec::new();

    for (seg, ts) in segments.iter().zip(&samples) {
        for &t in ts {
            push_distinct(&mut out, offset_point(seg, t, Side::Right));
        }
    }

    if cap == CapStyle::Round {
        let tangent = tangent_at(last, 1.0);
        let radius = 0.5 * last.to_width.max(0.0);
        half_circle(&mut out, last.to, perpendicular(tangent), tangent, radius, error);
    }

    for (seg, ts) in segments.iter().zip(&samples).rev() {
        for &t in ts.iter().rev() {
            push_distinct(&mut out, offset_point(seg, t, Side::Left));
        }
    }

    if cap == CapStyle::Round {
        let tangent = tangent_at(first, 0.0);
        let radius = 0.5 * first.from_width.max(0.0);
        half_circle(&mut out, first.from, -perpendicular(tangent), -tangent, radius, error);
    }

    if out.len() > 1 && out[0].distance(out[out.len() - 1]) <= 1e-9 {
        out.pop();
    }
    Polygon::new(out)
}

/// Trajectory + flattening for width-resolved points, using the tool's cap.
pub fn outline(points: &[StrokePoint], config: &StrokeConfig) -> Polygon {
    flatten_stroke(
        &trajectory::build(points),
        config.width_strategy.cap(),
        &FlattenParams::from_config(config),
    )
}
