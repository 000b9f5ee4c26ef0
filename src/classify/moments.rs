//! Polygon moments through third order via the discrete Green's theorem.
//!
//! Each edge contributes a closed-form term, so the moments of the filled
//! region come from the vertices alone. Values are normalized to
//! counter-clockwise orientation: a clockwise ring yields the same moments
//! as its reverse.

use std::f64::consts::PI;

use kurbo::Point;

/// Raw spatial moments `m_pq = ∫∫ x^p y^q dA`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
    pub m20: f64,
    pub m11: f64,
    pub m02: f64,
    pub m30: f64,
    pub m21: f64,
    pub m12: f64,
    pub m03: f64,
}

/// Moments about the centroid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CentralMoments {
    pub mu20: f64,
    pub mu11: f64,
    pub mu02: f64,
    pub mu30: f64,
    pub mu21: f64,
    pub mu12: f64,
    pub mu03: f64,
}

impl Moments {
    /// Moments of the region bounded by the closed ring `points`.
    pub fn from_polygon(points: &[Point]) -> Self {
        let n = points.len();
        let mut m = Moments::default();
        if n < 3 {
            return m;
        }
        for i in 0..n {
            let (xi, yi) = (points[i].x, points[i].y);
            let (xj, yj) = (points[(i + 1) % n].x, points[(i + 1) % n].y);
            let a = xi * yj - xj * yi;
            m.m00 += a;
            m.m10 += a * (xi + xj);
            m.m01 += a * (yi + yj);
            m.m20 += a * (xi * xi + xi * xj + xj * xj);
            m.m02 += a * (yi * yi + yi * yj + yj * yj);
            m.m11 += a * (xi * (2.0 * yi + yj) + xj * (yi + 2.0 * yj));
            m.m30 += a * (xi + xj) * (xi * xi + xj * xj);
            m.m03 += a * (yi + yj) * (yi * yi + yj * yj);
            m.m21 += a * (xi * xi * (3.0 * yi + yj) + 2.0 * xi * xj * (yi + yj) + xj * xj * (yi + 3.0 * yj));
            m.m12 += a * (yi * yi * (3.0 * xi + xj) + 2.0 * yi * yj * (xi + xj) + yj * yj * (xi + 3.0 * xj));
        }
        m.m00 /= 2.0;
        m.m10 /= 6.0;
        m.m01 /= 6.0;
        m.m20 /= 12.0;
        m.m02 /= 12.0;
        m.m11 /= 24.0;
        m.m30 /= 20.0;
        m.m03 /= 20.0;
        m.m21 /= 60.0;
        m.m12 /= 60.0;

        if m.m00 < 0.0 {
            m = m.negated();
        }
        m
    }

    fn negated(self) -> Self {
        Self {
            m00: -self.m00,
            m10: -self.m10,
            m01: -self.m01,
            m20: -self.m20,
            m11: -self.m11,
            m02: -self.m02,
            m30: -self.m30,
            m21: -self.m21,
            m12: -self.m12,
            m03: -self.m03,
        }
    }

    /// Enclosed area. Self-overlapping rings count lobes by winding.
    pub fn area(&self) -> f64 {
        self.m00
    }

    pub fn centroid(&self) -> Option<Point> {
        if self.m00.abs() < 1e-12 {
            return None;
        }
        Some(Point::new(self.m10 / self.m00, self.m01 / self.m00))
    }

    pub fn central(&self) -> Option<CentralMoments> {
        let c = self.centroid()?;
        let (cx, cy) = (c.x, c.y);
        let mu20 = self.m20 - cx * self.m10;
        let mu11 = self.m11 - cx * self.m01;
        let mu02 = self.m02 - cy * self.m01;
        Some(CentralMoments {
            mu20,
            mu11,
            mu02,
            mu30: self.m30 - cx * (3.0 * mu20 + cx * self.m10),
            mu21: self.m21 - cx * (2.0 * mu11 + cx * self.m01) - cy * mu20,
            mu12: self.m12 - cy * (2.0 * mu11 + cy * self.m10) - cx * mu02,
            mu03: self.m03 - cy * (3.0 * mu02 + cy * self.m01),
        })
    }

    /// Angle of the principal axis, in radians.
    pub fn orientation(&self) -> Option<f64> {
        let mu = self.central()?;
        Some(0.5 * (2.0 * mu.mu11).atan2(mu.mu20 - mu.mu02))
    }

    /// `4π · area / perimeter²`: 1 for a circle, smaller for anything else.
    pub fn circularity(&self, perimeter: f64) -> f64 {
        if !(perimeter > 1e-12) {
            return 0.0;
        }
        4.0 * PI * self.m00 / (perimeter * perimeter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::closed_perimeter;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn rect(w: f64, h: f64) -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
    }

    #[test]
    fn rectangle_moments() {
        let m = Moments::from_polygon(&rect(2.0, 1.0));
        assert!(close(m.m00, 2.0));
        assert!(close(m.m10, 2.0) && close(m.m01, 1.0));
        assert!(close(m.m20, 8.0 / 3.0) && close(m.m02, 2.0 / 3.0) && close(m.m11, 1.0));
        assert!(close(m.m30, 4.0) && close(m.m03, 0.5));
        assert!(close(m.m21, 4.0 / 3.0) && close(m.m12, 2.0 / 3.0));

        let mu = m.central().unwrap();
        assert!(close(mu.mu20, 2.0 / 3.0));
        assert!(close(mu.mu02, 1.0 / 6.0));
        assert!(close(mu.mu11, 0.0));
        for third in [mu.mu30, mu.mu21, mu.mu12, mu.mu03] {
            assert!(close(third, 0.0));
        }
        assert!(close(m.orientation().unwrap(), 0.0));
    }

    #[test]
    fn orientation_independent() {
        let mut cw = rect(3.0, 5.0);
        cw.reverse();
        assert_eq!(Moments::from_polygon(&cw), Moments::from_polygon(&rect(3.0, 5.0)));
    }

    #[test]
    fn circle_is_nearly_perfectly_circular() {
        let points: Vec<Point> = (0..64)
            .map(|i| {
                let a = 2.0 * PI * i as f64 / 64.0;
                Point::new(10.0 + 50.0 * a.cos(), -4.0 + 50.0 * a.sin())
            })
            .collect();
        let m = Moments::from_polygon(&points);
        let circularity = m.circularity(closed_perimeter(&points));
        assert!(circularity > 0.99 && circularity <= 1.0);
        let c = m.centroid().unwrap();
        assert!((c.x - 10.0).abs() < 1e-9 && (c.y + 4.0).abs() < 1e-9);
    }

    #[test]
    fn square_is_less_circular_than_circle() {
        let square = rect(10.0, 10.0);
        let m = Moments::from_polygon(&square);
        assert!(close(m.circularity(closed_perimeter(&square)), PI / 4.0));
    }

    #[test]
    fn degenerate_rings() {
        assert_eq!(Moments::from_polygon(&[Point::ZERO, Point::new(1.0, 1.0)]), Moments::default());
        let line = [Point::ZERO, Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
        let m = Moments::from_polygon(&line);
        assert!(m.centroid().is_none());
        assert_eq!(m.circularity(0.0), 0.0);
    }
}
