//! Shared geometry utilities and the closed polygon type.

use kurbo::{BezPath, PathEl, Point, Rect, Vec2};

/// A closed ring of boundary points. The last point connects back to the
/// first; the closing point is not repeated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Straight-connected closed path for the renderer.
    pub fn to_bezpath(&self) -> BezPath {
        let mut path = BezPath::new();
        if let Some((&first, rest)) = self.points.split_first() {
            path.move_to(first);
            for &p in rest {
                path.line_to(p);
            }
            path.push(PathEl::ClosePath);
        }
        path
    }

    pub fn signed_area(&self) -> f64 {
        polygon_signed_area(&self.points)
    }

    /// Length of the closed boundary.
    pub fn perimeter(&self) -> f64 {
        closed_perimeter(&self.points)
    }

    pub fn bounding_box(&self) -> Option<Rect> {
        bounding_box(&self.points)
    }
}

/// Signed area of a closed point ring. Positive = CCW, negative = CW.
pub fn polygon_signed_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            points[i].x * points[j].y - points[j].x * points[i].y
        })
        .sum::<f64>()
        / 2.0
}

/// Length of an open polyline.
pub fn polyline_length(points: &[Point]) -> f64 {
    points.windows(2).map(|w| w[0].distance(w[1])).sum()
}

/// Length of a polyline including the closing edge.
pub fn closed_perimeter(points: &[Point]) -> f64 {
    match (points.first(), points.last()) {
        (Some(&first), Some(&last)) if points.len() > 1 => {
            polyline_length(points) + last.distance(first)
        }
        _ => 0.0,
    }
}

pub fn bounding_box(points: &[Point]) -> Option<Rect> {
    let (&first, rest) = points.split_first()?;
    let mut rect = Rect::from_points(first, first);
    for &p in rest {
        rect = rect.union_pt(p);
    }
    Some(rect)
}

/// Cosine of the angle between two vectors.
///
/// Degenerate (near-zero) vectors have no direction; they count as
/// perfectly aligned so they never trigger a bend.
pub fn cosine(a: Vec2, b: Vec2) -> f64 {
    let len = a.hypot() * b.hypot();
    if len < 1e-12 || !len.is_finite() {
        return 1.0;
    }
    (a.dot(b) / len).clamp(-1.0, 1.0)
}

/// Squared perpendicular distance from `p` to the infinite line through
/// `a` and `b`. Falls back to the squared point distance when `a == b`.
pub fn line_distance_sq(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len_sq = ab.hypot2();
    if len_sq < 1e-18 {
        return (p - a).hypot2();
    }
    let cross = ab.cross(p - a);
    cross * cross / len_sq
}

/// Unit vector along `v`, or `None` when `v` is (nearly) zero.
pub fn unit(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    if len > 1e-12 && len.is_finite() {
        Some(v / len)
    } else {
        None
    }
}

/// Right-hand perpendicular of a direction (rotated -90° in y-up space).
pub fn perpendicular(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}
