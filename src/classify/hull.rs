//! Convex hull by divide and conquer (quickhull).

use kurbo::Point;

/// Points closer than this to a dividing chord count as on it.
const ON_LINE_EPS: f64 = 1e-9;

fn cross(a: Point, b: Point, p: Point) -> f64 {
    (b - a).cross(p - a)
}

/// Points strictly to the right of the directed chord `a → b`.
fn right_of(points: &[Point], a: Point, b: Point) -> Vec<Point> {
    points
        .iter()
        .copied()
        .filter(|&p| cross(a, b, p) < -ON_LINE_EPS)
        .collect()
}

/// Append the hull vertices strictly between `a` and `b`, given the
/// points outside the chord `a → b`.
fn expand(outside: &[Point], a: Point, b: Point, hull: &mut Vec<Point>) {
    let Some(&far) = outside
        .iter()
        .max_by(|p, q| cross(a, b, **q).total_cmp(&cross(a, b, **p)))
    else {
        return;
    };
    expand(&right_of(outside, a, far), a, far, hull);
    hull.push(far);
    expand(&right_of(outside, far, b), far, b, hull);
}

/// Counter-clockwise (y-up) convex hull, or `None` when the points are
/// fewer than three or all collinear.
pub fn convex_hull(points: &[Point]) -> Option<Vec<Point>> {
    let finite: Vec<Point> = points
        .iter()
        .copied()
        .filter(|p| p.x.is_finite() && p.y.is_finite())
        .collect();
    if finite.len() < 3 {
        return None;
    }
    let by_xy = |p: &&Point, q: &&Point| p.x.total_cmp(&q.x).then(p.y.total_cmp(&q.y));
    let left = *finite.iter().min_by(by_xy)?;
    let right = *finite.iter().max_by(by_xy)?;
    if left == right {
        return None;
    }

    let mut hull = vec![left];
    expand(&right_of(&finite, left, right), left, right, &mut hull);
    hull.push(right);
    expand(&right_of(&finite, right, left), right, left, &mut hull);

    if hull.len() < 3 {
        None
    } else {
        Some(hull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::polygon_signed_area;

    #[test]
    fn square_with_interior_points() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(5.0, 5.0),
            Point::new(10.0, 0.0),
            Point::new(3.0, 7.0),
            Point::new(10.0, 10.0),
            Point::new(5.0, 0.0),
            Point::new(0.0, 10.0),
        ];
        let hull = convex_hull(&points).unwrap();
        assert_eq!(hull.len(), 4);
        assert_eq!(polygon_signed_area(&hull), 100.0);
        assert_eq!(hull[0], Point::new(0.0, 0.0));
    }

    #[test]
    fn hull_is_convex_and_contains_everything() {
        let points: Vec<Point> = (0..200)
            .map(|i| {
                let a = i as f64 * 0.731;
                let r = 20.0 + 15.0 * (i as f64 * 1.37).sin();
                Point::new(r * a.cos(), r * a.sin())
            })
            .collect();
        let hull = convex_hull(&points).unwrap();
        let n = hull.len();
        for i in 0..n {
            let (a, b) = (hull[i], hull[(i + 1) % n]);
            for &p in &points {
                assert!(cross(a, b, p) >= -1e-6);
            }
        }
    }

    #[test]
    fn degenerate_inputs() {
        assert!(convex_hull(&[Point::ZERO, Point::new(1.0, 1.0)]).is_none());
        let line: Vec<Point> = (0..10).map(|i| Point::new(i as f64, 2.0 * i as f64)).collect();
        assert!(convex_hull(&line).is_none());
        assert!(convex_hull(&[Point::ZERO; 5]).is_none());
    }
}
