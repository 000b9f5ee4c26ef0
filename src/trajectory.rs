//! Smoothed points → chain of quadratic bezier centerline segments.
//!
//! Interior nodes sit on the midpoints between consecutive input points
//! and each input point becomes the control point of the segment that
//! passes it, so the chain is continuous in position and tangent while
//! staying close to the raw polyline.

use kurbo::{ParamCurve, Point, QuadBez};

use crate::speed::StrokePoint;

/// Centerline anchor with the control point of the segment it starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryNode {
    pub point: Point,
    pub control: Option<Point>,
    pub width: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Trajectory {
    Empty,
    /// A single point: rendered as a circle of `width` diameter.
    Dot { center: Point, width: f64 },
    Path(Vec<TrajectoryNode>),
}

/// One centerline piece between two nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierSegment {
    pub from: Point,
    pub to: Point,
    pub control: Option<Point>,
    pub from_width: f64,
    pub to_width: f64,
}

impl BezierSegment {
    /// The segment as a quadratic; straight segments get their chord
    /// midpoint as control so the parameterization stays uniform.
    pub fn quad(&self) -> QuadBez {
        let control = self.control.unwrap_or_else(|| self.from.midpoint(self.to));
        QuadBez::new(self.from, control, self.to)
    }

    pub fn point_at(&self, t: f64) -> Point {
        self.quad().eval(t)
    }

    pub fn width_at(&self, t: f64) -> f64 {
        self.from_width + (self.to_width - self.from_width) * t
    }

    /// True when all defining points coincide, leaving no direction.
    pub fn is_degenerate(&self) -> bool {
        let control = self.control.unwrap_or(self.from);
        self.from.distance(self.to) < 1e-9 && self.from.distance(control) < 1e-9
    }
}

impl Trajectory {
    pub fn nodes(&self) -> &[TrajectoryNode] {
        match self {
            Trajectory::Path(nodes) => nodes,
            _ => &[],
        }
    }

    /// Consecutive node pairs as bezier segments.
    pub fn segments(&self) -> Vec<BezierSegment> {
        self.nodes()
            .windows(2)
            .map(|pair| BezierSegment {
                from: pair[0].point,
                to: pair[1].point,
                control: pair[0].control,
                from_width: pair[0].width,
                to_width: pair[1].width,
            })
            .collect()
    }
}

/// Build the centerline for a run of smoothed, width-resolved points.
///
/// N >= 2 points give N + 1 nodes: the raw first point, N - 1 midpoint
/// nodes carrying the next input point as control, and the raw last point.
pub fn build(points: &[StrokePoint]) -> Trajectory {
    match points {
        [] => Trajectory::Empty,
        [only] => Trajectory::Dot {
            center: only.pos,
            width: only.width,
        },
        _ => {
            let n = points.len();
            let mut nodes = Vec::with_capacity(n + 1);
            nodes.push(TrajectoryNode {
                point: points[0].pos,
                control: None,
                width: 0.0,
            });
            for i in 1..n {
                nodes.push(TrajectoryNode {
                    point: points[i - 1].pos.midpoint(points[i].pos),
                    control: Some(points[i].pos),
                    width: points[i - 1].width,
                });
            }
            nodes.push(TrajectoryNode {
                point: points[n - 1].pos,
                control: None,
                width: 0.0,
            });
            nodes[0].width = nodes[1].width;
            nodes[n].width = nodes[n - 1].width;
            Trajectory::Path(nodes)
        }
    }
}
