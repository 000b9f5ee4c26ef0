//! Arrow recognition on a simplified polyline.
//!
//! An arrow is a straight-ish shaft followed by a sharp turn back into a
//! head: every point after the tip lies near the tip, behind it, within a
//! cone around the shaft, and on both sides of the shaft line. Returns
//! to the tip are allowed to land within a small radius of it.

use kurbo::Point;

use crate::geom::cosine;

/// Consecutive segments turning more sharply than this end the shaft.
const TURN_COSINE: f64 = 0.5;
/// The first head segment must point back against the shaft at least this much.
const FORK_COSINE: f64 = -0.2;
/// Head points project onto the shaft within this fraction range.
const HEAD_MIN_T: f64 = 0.6;
const HEAD_MAX_T: f64 = 1.0;
/// cos(70°): head points deviate from the shaft by at most this angle,
/// seen from the tip.
const MIN_BARB_COSINE: f64 = 0.342;
/// Points within this many tolerances of the tip count as revisits of it.
const TIP_RADIUS: f64 = 2.0;

/// Detect an arrow drawn shaft-first in either direction.
///
/// `tolerance` is the drawing noise in input units, typically the
/// simplification epsilon. Returns `(start, tip)` taken from the input
/// points.
pub fn detect(points: &[Point], tolerance: f64) -> Option<(Point, Point)> {
    let tolerance = if tolerance.is_finite() { tolerance.max(0.0) } else { 0.0 };
    detect_forward(points, tolerance).or_else(|| {
        let reversed: Vec<Point> = points.iter().rev().copied().collect();
        detect_forward(&reversed, tolerance)
    })
}

fn detect_forward(points: &[Point], tolerance: f64) -> Option<(Point, Point)> {
    let n = points.len();
    if n < 4 {
        return None;
    }
    let start = points[0];

    let mut k = 1;
    while k + 1 < n && cosine(points[k] - points[k - 1], points[k + 1] - points[k]) >= TURN_COSINE {
        k += 1;
    }
    if k + 1 >= n {
        return None;
    }

    let tip = points[k];
    let shaft = tip - start;
    let len = shaft.hypot();
    if !(len > 1e-9) {
        return None;
    }
    let near_tip = (TIP_RADIUS * tolerance).max(1e-9 * len);
    let head = &points[k + 1..];

    let fork = head.iter().find(|&&p| p.distance(tip) > near_tip)?;
    if cosine(*fork - tip, shaft) > FORK_COSINE {
        return None;
    }

    let dir = shaft / len;
    let max_t = HEAD_MAX_T + near_tip / len;
    let (mut left, mut right) = (false, false);
    for &p in head {
        let t = (p - start).dot(dir) / len;
        if !(HEAD_MIN_T - 1e-9..=max_t).contains(&t) {
            return None;
        }
        let back = tip - p;
        if back.hypot() <= near_tip {
            continue;
        }
        if cosine(back, shaft) < MIN_BARB_COSINE {
            return None;
        }
        let side = dir.cross(p - start);
        if side > near_tip {
            left = true;
        } else if side < -near_tip {
            right = true;
        }
    }
    (left && right).then_some((start, tip))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arrow() -> Vec<Point> {
        let barb = 20.0 * std::f64::consts::FRAC_1_SQRT_2;
        vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0 - barb, barb),
            Point::new(100.0, 0.0),
            Point::new(100.0 - barb, -barb),
        ]
    }

    #[test]
    fn symmetric_head() {
        assert_eq!(detect(&arrow(), 0.0), Some((Point::new(0.0, 0.0), Point::new(100.0, 0.0))));
    }

    #[test]
    fn drawn_head_first() {
        let mut points = arrow();
        points.reverse();
        // Reversed, the drawing starts on a barb; the forward reading fails
        // and the reversed reading finds the shaft as drawn.
        assert_eq!(detect(&points, 0.0), Some((Point::new(0.0, 0.0), Point::new(100.0, 0.0))));
    }

    #[test]
    fn one_sided_head_is_not_an_arrow() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(85.0, 15.0),
            Point::new(100.0, 0.0),
            Point::new(80.0, 10.0),
        ];
        assert_eq!(detect(&points, 0.0), None);
    }

    #[test]
    fn straight_line_and_zigzag() {
        let line: Vec<Point> = (0..10).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
        assert_eq!(detect(&line, 0.0), None);
        let zigzag = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 30.0),
            Point::new(20.0, 0.0),
            Point::new(30.0, 30.0),
            Point::new(40.0, 0.0),
        ];
        assert_eq!(detect(&zigzag, 0.0), None);
    }

    #[test]
    fn head_too_far_back() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(40.0, 20.0),
            Point::new(100.0, 0.0),
            Point::new(40.0, -20.0),
        ];
        assert_eq!(detect(&points, 0.0), None);
    }

    #[test]
    fn second_tip_visit_may_overshoot() {
        let barb = 20.0 * std::f64::consts::FRAC_1_SQRT_2;
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
            Point::new(100.0 - barb, barb),
            Point::new(100.5, 0.0),
            Point::new(100.0 - barb, -barb),
        ];
        assert_eq!(detect(&points, 0.0), None);
        assert_eq!(detect(&points, 2.0), Some((Point::new(0.0, 0.0), Point::new(100.0, 0.0))));
    }
}
