//! Rasterize stroke polylines into square bitmaps for image classifiers.
//!
//! The polyline's bounding box is stretched onto a padded square so the
//! bitmap captures shape, not proportions or position.

use image::{GrayImage, Luma};
use kurbo::{Affine, BezPath, PathEl, Point};

use crate::geom::bounding_box;

/// Pixels kept clear around the drawing.
const PADDING: f64 = 3.0;

/// Convert a kurbo `BezPath` to a `tiny_skia::Path`.
fn kurbo_to_tinyskia(bezpath: &BezPath) -> Option<tiny_skia::Path> {
    let mut pb = tiny_skia::PathBuilder::new();
    for el in bezpath.elements() {
        match *el {
            PathEl::MoveTo(p) => pb.move_to(p.x as f32, p.y as f32),
            PathEl::LineTo(p) => pb.line_to(p.x as f32, p.y as f32),
            PathEl::QuadTo(c, p) => pb.quad_to(c.x as f32, c.y as f32, p.x as f32, p.y as f32),
            PathEl::CurveTo(c1, c2, p) => pb.cubic_to(
                c1.x as f32,
                c1.y as f32,
                c2.x as f32,
                c2.y as f32,
                p.x as f32,
                p.y as f32,
            ),
            PathEl::ClosePath => pb.close(),
        }
    }
    pb.finish()
}

/// Affine mapping the points' bounding box onto `[PADDING, size - PADDING]²`.
/// A flat axis is centered instead of stretched.
fn fit_transform(points: &[Point], size: u32) -> Option<Affine> {
    let bbox = bounding_box(points)?;
    let span = (size as f64 - 2.0 * PADDING).max(1.0);
    let axis = |extent: f64| if extent > 1e-9 { span / extent } else { 0.0 };
    let (sx, sy) = (axis(bbox.width()), axis(bbox.height()));
    let center = size as f64 / 2.0;
    Some(
        Affine::translate((center, center))
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate(-bbox.center().to_vec2()),
    )
}

/// Draw `points` as a polyline into a `size × size` bitmap.
///
/// Foreground pixels are 255 on a 0 background. Empty input, or input
/// that collapses to nothing drawable, yields a blank bitmap.
pub fn rasterize(points: &[Point], size: u32, stroke_width: f32, closed: bool) -> GrayImage {
    let mut bitmap = GrayImage::new(size, size);
    let Some(transform) = fit_transform(points, size) else {
        return bitmap;
    };

    let mut path = BezPath::new();
    for (i, &p) in points.iter().enumerate() {
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    if points.len() == 1 {
        // Zero-length segment so round caps still paint a dot.
        path.line_to(points[0]);
    }
    if closed {
        path.close_path();
    }
    path.apply_affine(transform);

    let Some(sk_path) = kurbo_to_tinyskia(&path) else {
        return bitmap;
    };
    let Some(mut pixmap) = tiny_skia::Pixmap::new(size, size) else {
        return bitmap;
    };

    let mut paint = tiny_skia::Paint::default();
    paint.set_color(tiny_skia::Color::BLACK);
    paint.anti_alias = false;
    let stroke = tiny_skia::Stroke {
        width: stroke_width,
        line_cap: tiny_skia::LineCap::Round,
        line_join: tiny_skia::LineJoin::Round,
        ..Default::default()
    };
    pixmap.stroke_path(&sk_path, &paint, &stroke, tiny_skia::Transform::identity(), None);

    for (i, px) in pixmap.pixels().iter().enumerate() {
        if px.alpha() > 127 {
            let i = i as u32;
            bitmap.put_pixel(i % size, i / size, Luma([255]));
        }
    }
    bitmap
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ink_count(bitmap: &GrayImage) -> usize {
        bitmap.pixels().filter(|p| p.0[0] > 0).count()
    }

    #[test]
    fn square_fills_padded_frame() {
        let points = vec![
            Point::new(100.0, 100.0),
            Point::new(300.0, 100.0),
            Point::new(300.0, 150.0),
            Point::new(100.0, 150.0),
        ];
        let bitmap = rasterize(&points, 48, 2.0, true);
        assert_eq!(bitmap.dimensions(), (48, 48));
        // Corners of the stretched box are inked, the middle is not.
        assert_eq!(bitmap.get_pixel(3, 3).0[0], 255);
        assert_eq!(bitmap.get_pixel(44, 44).0[0], 255);
        assert_eq!(bitmap.get_pixel(24, 24).0[0], 0);
        // Padding stays clear.
        assert_eq!(bitmap.get_pixel(0, 24).0[0], 0);
    }

    #[test]
    fn open_polyline_leaves_gap() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        let open = rasterize(&points, 48, 2.0, false);
        let closed = rasterize(&points, 48, 2.0, true);
        assert!(ink_count(&closed) > ink_count(&open));
        assert_eq!(open.get_pixel(3, 24).0[0], 0);
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(ink_count(&rasterize(&[], 48, 2.0, false)), 0);
        let dot = rasterize(&[Point::new(5.0, 5.0)], 48, 3.0, false);
        assert_eq!(dot.dimensions(), (48, 48));
        // A flat stroke is centered on the collapsed axis.
        let line = rasterize(&[Point::new(0.0, 7.0), Point::new(50.0, 7.0)], 48, 2.0, false);
        assert_eq!(line.get_pixel(24, 24).0[0], 255);
        assert_eq!(line.get_pixel(24, 10).0[0], 0);
    }
}
