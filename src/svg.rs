//! Minimal SVG output for finished strokes and recognized shapes.

use std::fmt::Write;

use kurbo::{BezPath, Rect, Shape};

use crate::classify::ShapeCandidate;
use crate::geom::Polygon;

/// Blank space around the drawing, in content units.
const MARGIN: f64 = 10.0;

/// SVG document with every polygon filled, and the suggested shape (if
/// any) stroked on top.
pub fn to_document(polygons: &[Polygon], shape: Option<&ShapeCandidate>) -> String {
    let ink: Vec<BezPath> = polygons
        .iter()
        .filter(|p| !p.is_empty())
        .map(Polygon::to_bezpath)
        .collect();
    let shape_path = shape.map(ShapeCandidate::to_path);

    let bounds = ink
        .iter()
        .chain(shape_path.iter())
        .map(|path| path.bounding_box())
        .reduce(|a, b| a.union(b))
        .unwrap_or(Rect::ZERO)
        .inflate(MARGIN, MARGIN);

    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="{:.2} {:.2} {:.2} {:.2}">"#,
        bounds.x0,
        bounds.y0,
        bounds.width(),
        bounds.height()
    );
    for path in &ink {
        let _ = writeln!(out, r#"  <path d="{}" fill="black"/>"#, path.to_svg());
    }
    if let Some(path) = &shape_path {
        let _ = writeln!(
            out,
            r#"  <path d="{}" fill="none" stroke="tomato" stroke-width="2"/>"#,
            path.to_svg()
        );
    }
    out.push_str("</svg>\n");
    out
}
