use hough_detector::{Point, State};
use std::collections::BTreeSet;

/// Adds the one-pixel outline of an axis-aligned rectangle with corners
/// `(x0, y0)` and `(x1, y1)`, both inclusive.
pub fn rect_outline(points: &mut BTreeSet<Point>, x0: i64, y0: i64, x1: i64, y1: i64) {
    for x in x0..=x1 {
        points.insert(Point::new(x, y0));
        points.insert(Point::new(x, y1));
    }
    for y in y0..=y1 {
        points.insert(Point::new(x0, y));
        points.insert(Point::new(x1, y));
    }
}

/// Adds a one-pixel Bresenham line from `a` to `b`, endpoints inclusive.
pub fn line(points: &mut BTreeSet<Point>, a: Point, b: Point) {
    let dx = (b.x - a.x).abs();
    let dy = -(b.y - a.y).abs();
    let sx = (b.x - a.x).signum();
    let sy = (b.y - a.y).signum();

    let mut err = dx + dy;
    let mut p = a;
    loop {
        points.insert(p);
        if p == b {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            p.x += sx;
        }
        if e2 <= dx {
            err += dx;
            p.y += sy;
        }
    }
}

/// Marks every collected point pending in the state.
pub fn populate(state: &mut State, points: &BTreeSet<Point>) {
    for &p in points {
        state.mark_pending(p);
    }
}
