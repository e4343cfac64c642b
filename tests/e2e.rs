mod common;

use common::synthetic_image::{line, populate, rect_outline};
use hough_detector::{find_segments, Point, Segment, State};
use std::collections::BTreeSet;

fn within(p: Point, q: Point) -> bool {
    (p - q).length_squared() <= 25
}

fn similar(s1: Segment, s2: Segment) -> bool {
    (within(s1.a, s2.a) && within(s1.b, s2.b)) || (within(s1.a, s2.b) && within(s1.b, s2.a))
}

/// Greedily discards matching pairs; whatever survives on either side is a
/// detection failure.
fn remove_pairs(actual: &mut Vec<Segment>, expected: &mut Vec<Segment>) {
    'restart: loop {
        for i in 0..actual.len() {
            for j in 0..expected.len() {
                if similar(actual[i], expected[j]) {
                    actual.swap_remove(i);
                    expected.swap_remove(j);
                    continue 'restart;
                }
            }
        }
        break;
    }
}

fn seg(ax: i64, ay: i64, bx: i64, by: i64) -> Segment {
    Segment::new(Point::new(ax, ay), Point::new(bx, by))
}

#[test]
fn three_squares_yield_their_twelve_sides() {
    let mut points = BTreeSet::new();
    for x0 in [20i64, 120, 220] {
        rect_outline(&mut points, x0, 20, x0 + 80, 100);
    }

    let mut state = State::new(120, 320, 696408486);
    populate(&mut state, &points);

    let mut actual = find_segments(&mut state, 3, 3, 10, 696408486).expect("run completes");

    let mut expected = vec![
        seg(20, 20, 100, 20),
        seg(20, 20, 20, 100),
        seg(100, 20, 100, 100),
        seg(20, 100, 100, 100),
        seg(120, 20, 200, 20),
        seg(120, 20, 120, 100),
        seg(200, 20, 200, 100),
        seg(120, 100, 200, 100),
        seg(220, 20, 300, 20),
        seg(220, 20, 220, 100),
        seg(300, 20, 300, 100),
        seg(220, 100, 300, 100),
    ];

    remove_pairs(&mut actual, &mut expected);

    assert!(expected.is_empty(), "sides not detected: {expected:?}");
    assert!(actual.is_empty(), "unexpected segments: {actual:?}");
}

#[test]
fn trapezoid_with_a_diagonal_side_is_detected() {
    let mut points = BTreeSet::new();
    // Three axis-aligned sides plus a 45° diagonal closing the figure.
    for x in 20..=80 {
        points.insert(Point::new(x, 20));
    }
    for y in 20..=140 {
        points.insert(Point::new(20, y));
    }
    for y in 20..=80 {
        points.insert(Point::new(80, y));
    }
    line(&mut points, Point::new(20, 140), Point::new(80, 80));

    let mut state = State::new(160, 100, 696408486);
    populate(&mut state, &points);

    let mut actual = find_segments(&mut state, 3, 3, 10, 696408486).expect("run completes");

    let mut expected = vec![
        seg(20, 20, 80, 20),
        seg(20, 20, 20, 140),
        seg(20, 140, 80, 80),
        seg(80, 20, 80, 80),
    ];

    remove_pairs(&mut actual, &mut expected);

    assert!(expected.is_empty(), "sides not detected: {expected:?}");
    assert!(actual.is_empty(), "unexpected segments: {actual:?}");
}

#[test]
fn detection_is_deterministic_for_a_seed() {
    let detect = || {
        let mut points = BTreeSet::new();
        rect_outline(&mut points, 10, 10, 90, 70);
        let mut state = State::new(100, 100, 12345);
        populate(&mut state, &points);
        find_segments(&mut state, 3, 3, 10, 12345).expect("run completes")
    };

    assert_eq!(detect(), detect());
}

#[test]
fn sparse_noise_produces_no_segments() {
    let mut state = State::new(100, 100, 5);
    // A scatter far too thin for any line hypothesis to survive.
    for (x, y) in [(5, 80), (23, 11), (41, 67), (59, 34), (77, 90), (95, 3)] {
        state.mark_pending(Point::new(x, y));
    }

    let segments = find_segments(&mut state, 3, 3, 10, 5).expect("run completes");
    assert!(segments.is_empty(), "noise produced {segments:?}");
}
