//! Recognized shapes and their clean replacement geometry.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_6, PI};

use kurbo::{BezPath, Ellipse, Point, Rect, Shape, Size, Vec2};

use crate::geom::unit;

/// Inner / outer radius of the generated five-pointed star.
pub const STAR_INNER_RATIO: f64 = 0.382;
/// Arrowhead barbs are this fraction of the shaft, capped at [`MAX_BARB`].
const BARB_RATIO: f64 = 0.2;
const MAX_BARB: f64 = 40.0;
/// Vertices used when an ellipse is needed as a polygon.
const ELLIPSE_VERTICES: usize = 64;

/// Path flattening tolerance for curved shapes.
const PATH_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeCandidate {
    Ellipse { center: Point, size: Size },
    Rectangle { center: Point, size: Size },
    Rhombus { center: Point, size: Size },
    Star { center: Point, size: Size },
    Triangle { center: Point, size: Size },
    Arrow { start: Point, end: Point },
}

/// Result of a classification request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Suggestion {
    NoShape,
    Shape(ShapeCandidate),
}

impl From<Option<ShapeCandidate>> for Suggestion {
    fn from(candidate: Option<ShapeCandidate>) -> Self {
        match candidate {
            Some(shape) => Suggestion::Shape(shape),
            None => Suggestion::NoShape,
        }
    }
}

impl Suggestion {
    pub fn shape(&self) -> Option<&ShapeCandidate> {
        match self {
            Suggestion::Shape(shape) => Some(shape),
            Suggestion::NoShape => None,
        }
    }
}

impl ShapeCandidate {
    pub fn name(&self) -> &'static str {
        match self {
            ShapeCandidate::Ellipse { .. } => "ellipse",
            ShapeCandidate::Rectangle { .. } => "rectangle",
            ShapeCandidate::Rhombus { .. } => "rhombus",
            ShapeCandidate::Star { .. } => "star",
            ShapeCandidate::Triangle { .. } => "triangle",
            ShapeCandidate::Arrow { .. } => "arrow",
        }
    }

    /// Everything but arrows is a closed outline.
    pub fn is_closed(&self) -> bool {
        !matches!(self, ShapeCandidate::Arrow { .. })
    }

    pub fn bounding_box(&self) -> Rect {
        match *self {
            ShapeCandidate::Ellipse { center, size }
            | ShapeCandidate::Rectangle { center, size }
            | ShapeCandidate::Rhombus { center, size }
            | ShapeCandidate::Star { center, size }
            | ShapeCandidate::Triangle { center, size } => Rect::from_center_size(center, size),
            ShapeCandidate::Arrow { .. } => {
                let points = self.outline_points();
                crate::geom::bounding_box(&points).unwrap_or_default()
            }
        }
    }

    /// Vertices of the shape inside its bounding box (y grows downward,
    /// so the triangle apex and the first star point are at the top).
    ///
    /// Arrows yield the shaft followed by the head drawn as one polyline:
    /// start, tip, first barb, tip, second barb.
    pub fn outline_points(&self) -> Vec<Point> {
        match *self {
            ShapeCandidate::Ellipse { center, size } => (0..ELLIPSE_VERTICES)
                .map(|i| {
                    let a = 2.0 * PI * i as f64 / ELLIPSE_VERTICES as f64;
                    center + Vec2::new(0.5 * size.width * a.cos(), 0.5 * size.height * a.sin())
                })
                .collect(),
            ShapeCandidate::Rectangle { center, size } => {
                let r = Rect::from_center_size(center, size);
                vec![
                    Point::new(r.x0, r.y0),
                    Point::new(r.x1, r.y0),
                    Point::new(r.x1, r.y1),
                    Point::new(r.x0, r.y1),
                ]
            }
            ShapeCandidate::Rhombus { center, size } => {
                let (hw, hh) = (0.5 * size.width, 0.5 * size.height);
                vec![
                    center + Vec2::new(0.0, -hh),
                    center + Vec2::new(hw, 0.0),
                    center + Vec2::new(0.0, hh),
                    center + Vec2::new(-hw, 0.0),
                ]
            }
            ShapeCandidate::Triangle { center, size } => {
                let r = Rect::from_center_size(center, size);
                vec![
                    Point::new(center.x, r.y0),
                    Point::new(r.x1, r.y1),
                    Point::new(r.x0, r.y1),
                ]
            }
            ShapeCandidate::Star { center, size } => star_points(center, size),
            ShapeCandidate::Arrow { start, end } => {
                let (left, right) = arrow_barbs(start, end);
                vec![start, end, left, end, right]
            }
        }
    }

    /// Clean replacement geometry.
    pub fn to_path(&self) -> BezPath {
        match *self {
            ShapeCandidate::Ellipse { center, size } => {
                Ellipse::new(center, (0.5 * size.width, 0.5 * size.height), 0.0).to_path(PATH_TOLERANCE)
            }
            ShapeCandidate::Rectangle { center, size } => {
                Rect::from_center_size(center, size).to_path(PATH_TOLERANCE)
            }
            ShapeCandidate::Arrow { start, end } => {
                let (left, right) = arrow_barbs(start, end);
                let mut path = BezPath::new();
                path.move_to(start);
                path.line_to(end);
                path.move_to(left);
                path.line_to(end);
                path.line_to(right);
                path
            }
            _ => {
                let points = self.outline_points();
                let mut path = BezPath::new();
                if let Some((&first, rest)) = points.split_first() {
                    path.move_to(first);
                    for &p in rest {
                        path.line_to(p);
                    }
                    path.close_path();
                }
                path
            }
        }
    }
}

/// Ten alternating outer and inner vertices, first outer point on top.
fn star_points(center: Point, size: Size) -> Vec<Point> {
    let (rx, ry) = (0.5 * size.width, 0.5 * size.height);
    (0..10)
        .map(|i| {
            let a = -FRAC_PI_2 + i as f64 * PI / 5.0;
            let r = if i % 2 == 0 { 1.0 } else { STAR_INNER_RATIO };
            center + Vec2::new(rx * r * a.cos(), ry * r * a.sin())
        })
        .collect()
}

/// Barb endpoints: the reversed shaft direction rotated ±30°.
fn arrow_barbs(start: Point, end: Point) -> (Point, Point) {
    let shaft = end - start;
    let Some(back) = unit(-shaft) else {
        return (end, end);
    };
    let len = (BARB_RATIO * shaft.hypot()).min(MAX_BARB);
    let rotate = |v: Vec2, a: f64| Vec2::new(v.x * a.cos() - v.y * a.sin(), v.x * a.sin() + v.y * a.cos());
    (
        end + rotate(back, FRAC_PI_6) * len,
        end + rotate(back, -FRAC_PI_6) * len,
    )
}
