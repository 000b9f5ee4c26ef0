use std::f64::consts::PI;

use image::GrayImage;
use inkstroke::kurbo::Point;
use inkstroke::{
    ClassifierConfig, ImageClassifier, InkError, ShapeCandidate, ShapeCategory, ShapeClassifier,
};

/// Always reports the same category, whatever the bitmap shows.
struct Stubborn(ShapeCategory);

impl ImageClassifier for Stubborn {
    fn classify(&self, _: &GrayImage) -> Result<Option<ShapeCategory>, InkError> {
        Ok(Some(self.0))
    }
}

fn circle(center: Point, r: f64, n: usize) -> Vec<Point> {
    (0..n)
        .map(|i| {
            let a = 2.0 * PI * i as f64 / n as f64;
            Point::new(center.x + r * a.cos(), center.y + r * a.sin())
        })
        .collect()
}

#[test]
fn regular_polygon_is_an_ellipse() {
    let classifier = ShapeClassifier::new(ClassifierConfig::default());
    let r = 40.0;
    match classifier.classify(&circle(Point::new(100.0, 80.0), r, 64)) {
        Some(ShapeCandidate::Ellipse { center, size }) => {
            assert!(center.distance(Point::new(100.0, 80.0)) < 1e-6);
            assert!((size.width - 2.0 * r).abs() < 1e-6);
            assert!((size.height - 2.0 * r).abs() < 1e-6);
        }
        other => panic!("expected an ellipse, got {other:?}"),
    }
}

#[test]
fn arrow_endpoints_are_raw_shaft_points() {
    let barb = 20.0 * std::f64::consts::FRAC_1_SQRT_2;
    let mut points: Vec<Point> = (0..=10).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
    points.extend([
        Point::new(100.0 - barb, barb),
        Point::new(100.0, 0.0),
        Point::new(100.0 - barb, -barb),
    ]);
    let classifier = ShapeClassifier::new(ClassifierConfig::default());
    assert_eq!(
        classifier.classify(&points),
        Some(ShapeCandidate::Arrow {
            start: Point::new(0.0, 0.0),
            end: Point::new(100.0, 0.0),
        })
    );
}

#[test]
fn densely_drawn_arrow_with_jitter() {
    let barb = 20.0 * std::f64::consts::FRAC_1_SQRT_2;
    let tip = Point::new(100.0, 0.0);
    let corners = [
        Point::new(0.0, 0.0),
        tip,
        Point::new(100.0 - barb, barb),
        tip,
        Point::new(100.0 - barb, -barb),
    ];
    let mut points = Vec::new();
    for edge in corners.windows(2) {
        for i in 0..10 {
            points.push(edge[0].lerp(edge[1], i as f64 / 10.0));
        }
    }
    points.push(corners[4]);
    for (i, p) in points.iter_mut().enumerate() {
        p.x += (i as f64 * 2.7).sin() * 0.7;
        p.y += (i as f64 * 1.9).cos() * 0.7;
    }

    let classifier = ShapeClassifier::new(ClassifierConfig::default());
    match classifier.classify(&points) {
        Some(ShapeCandidate::Arrow { start, end }) => {
            assert_eq!(start, points[0]);
            assert!(end.distance(tip) < 2.0, "tip at {end:?}");
        }
        other => panic!("expected an arrow, got {other:?}"),
    }
}

#[test]
fn open_spiral_is_nothing() {
    let spiral: Vec<Point> = (0..120)
        .map(|i| {
            let a = i as f64 * 0.13;
            let r = 5.0 + 6.0 * a;
            Point::new(200.0 + r * a.cos(), 200.0 + r * a.sin())
        })
        .collect();
    assert_eq!(ShapeClassifier::new(ClassifierConfig::default()).classify(&spiral), None);
    let classifier = ShapeClassifier::with_image_classifier(
        ClassifierConfig::default(),
        Stubborn(ShapeCategory::Ellipse),
    );
    assert_eq!(classifier.classify(&spiral), None);
}

#[test]
fn open_arc_is_not_an_ellipse() {
    // Three quarters of a circle: round enough for the moments, but open.
    let arc: Vec<Point> = (0..=60)
        .map(|i| {
            let a = 1.5 * PI * i as f64 / 60.0;
            Point::new(50.0 * a.cos(), 50.0 * a.sin())
        })
        .collect();
    assert_eq!(ShapeClassifier::new(ClassifierConfig::default()).classify(&arc), None);
}

#[test]
fn straight_line_is_nothing() {
    let points: Vec<Point> = (0..=14).map(|i| Point::new(i as f64 * 10.0, 0.0)).collect();
    let classifier = ShapeClassifier::with_image_classifier(
        ClassifierConfig::default(),
        Stubborn(ShapeCategory::Rectangle),
    );
    assert_eq!(classifier.classify(&points), None);
}

#[test]
fn zigzag_never_becomes_a_convex_shape() {
    let zigzag = vec![
        Point::new(0.0, 0.0),
        Point::new(25.0, 100.0),
        Point::new(50.0, 0.0),
        Point::new(75.0, 100.0),
        Point::new(100.0, 0.0),
    ];
    for category in [
        ShapeCategory::Ellipse,
        ShapeCategory::Rectangle,
        ShapeCategory::Rhombus,
        ShapeCategory::Triangle,
    ] {
        let classifier =
            ShapeClassifier::with_image_classifier(ClassifierConfig::default(), Stubborn(category));
        assert_eq!(classifier.classify(&zigzag), None, "{category:?}");
    }
}

#[test]
fn drawn_triangle_matches_template() {
    // Hand-drawn-ish triangle: corners joined by sampled edges with jitter.
    let corners = [
        Point::new(150.0, 20.0),
        Point::new(260.0, 210.0),
        Point::new(40.0, 210.0),
    ];
    let mut points = Vec::new();
    for k in 0..3 {
        let (a, b) = (corners[k], corners[(k + 1) % 3]);
        for i in 0..20 {
            let p = a.lerp(b, i as f64 / 20.0);
            let jitter = (points.len() as f64 * 1.3).sin() * 1.5;
            points.push(Point::new(p.x + jitter, p.y - jitter));
        }
    }
    let classifier = ShapeClassifier::new(ClassifierConfig::default());
    match classifier.classify(&points) {
        Some(ShapeCandidate::Triangle { size, .. }) => {
            assert!((size.width - 220.0).abs() < 5.0);
            assert!((size.height - 190.0).abs() < 5.0);
        }
        other => panic!("expected a triangle, got {other:?}"),
    }
}

#[test]
fn shape_preview_paths() {
    let classifier = ShapeClassifier::new(ClassifierConfig::default());
    let shape = classifier
        .classify(&circle(Point::new(0.0, 0.0), 25.0, 64))
        .expect("circle");
    let bbox = inkstroke::kurbo::Shape::bounding_box(&shape.to_path());
    assert!((bbox.width() - 50.0).abs() < 0.5);
    assert!(shape.is_closed());
}
