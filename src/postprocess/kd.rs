//! In-place k-d disc search over keyed slices.

use crate::types::{Axis, Point};

/// Items searchable by a point key.
pub(crate) trait Keyed {
    fn key(&self) -> Point;
}

/// Collect every item whose key lies in the closed disc around `query`.
///
/// The slice is partitioned in place with `select_nth_unstable_by` on
/// alternating axes — membership is preserved but order is not, so callers
/// must not rely on slice order across calls. Output order is unspecified.
pub(crate) fn kd_search<T: Keyed + Copy>(
    items: &mut [T],
    query: Point,
    radius: i64,
    out: &mut Vec<T>,
) {
    search(items, query, radius, Axis::X, out);
}

fn search<T: Keyed + Copy>(
    items: &mut [T],
    query: Point,
    radius: i64,
    axis: Axis,
    out: &mut Vec<T>,
) {
    if items.is_empty() {
        return;
    }

    // Split on the median along the current axis. Items equal to the
    // median's coordinate may land on either side.
    let median = items.len() / 2;
    let (before, pivot, after) =
        items.select_nth_unstable_by(median, |a, b| axis.of(a.key()).cmp(&axis.of(b.key())));

    let midpoint = pivot.key();
    if (query - midpoint).length_squared() <= radius * radius {
        out.push(*pivot);
    }

    // The signed distance to the splitting line decides which halves the
    // query disc can reach.
    let d_plane = axis.of(query) - axis.of(midpoint);

    if d_plane <= radius {
        search(before, query, radius, axis.other(), out);
    }
    if d_plane >= -radius {
        search(after, query, radius, axis.other(), out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl Keyed for Point {
        fn key(&self) -> Point {
            *self
        }
    }

    #[test]
    fn finds_exactly_the_disc_members() {
        let mut points: Vec<Point> = (0..20)
            .flat_map(|x| (0..20).map(move |y| Point::new(x, y)))
            .collect();

        let query = Point::new(7, 11);
        let radius = 4;

        let mut found = Vec::new();
        kd_search(&mut points, query, radius, &mut found);
        found.sort();

        let mut expected: Vec<Point> = (0..20)
            .flat_map(|x| (0..20).map(move |y| Point::new(x, y)))
            .filter(|p| (*p - query).length_squared() <= radius * radius)
            .collect();
        expected.sort();

        assert_eq!(found, expected);
    }

    #[test]
    fn membership_survives_reordering() {
        let mut points = vec![
            Point::new(5, 5),
            Point::new(1, 9),
            Point::new(9, 1),
            Point::new(3, 3),
            Point::new(7, 7),
        ];
        let mut original = points.clone();

        let mut found = Vec::new();
        kd_search(&mut points, Point::new(0, 0), 100, &mut found);

        original.sort();
        points.sort();
        assert_eq!(points, original);
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn empty_slice_yields_nothing() {
        let mut points: Vec<Point> = Vec::new();
        let mut found = Vec::new();
        kd_search(&mut points, Point::new(0, 0), 3, &mut found);
        assert!(found.is_empty());
    }
}
