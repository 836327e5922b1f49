#![allow(clippy::clone_on_copy, clippy::float_cmp)]

use super::*;

fn rect(x: f64, y: f64, w: f64, h: f64) -> Bounds {
    Bounds::new(x, y, w, h)
}

fn on_boundary(b: &Bounds, p: Point) -> bool {
    let on_x = (p.x - b.x).abs() < 1e-9 || (p.x - (b.x + b.width)).abs() < 1e-9;
    let on_y = (p.y - b.y).abs() < 1e-9 || (p.y - (b.y + b.height)).abs() < 1e-9;
    let within_x = p.x >= b.x - 1e-9 && p.x <= b.x + b.width + 1e-9;
    let within_y = p.y >= b.y - 1e-9 && p.y <= b.y + b.height + 1e-9;
    (on_x && within_y) || (on_y && within_x)
}

// =============================================================
// Side
// =============================================================

#[test]
fn side_opposites() {
    assert_eq!(Side::Top.opposite(), Side::Bottom);
    assert_eq!(Side::Bottom.opposite(), Side::Top);
    assert_eq!(Side::Left.opposite(), Side::Right);
    assert_eq!(Side::Right.opposite(), Side::Left);
}

#[test]
fn side_serde_lowercase() {
    assert_eq!(serde_json::to_string(&Side::Left).unwrap(), "\"left\"");
    let back: Side = serde_json::from_str("\"bottom\"").unwrap();
    assert_eq!(back, Side::Bottom);
}

// =============================================================
// Bounds geometry
// =============================================================

#[test]
fn center_and_side_midpoints() {
    let b = rect(10.0, 20.0, 100.0, 60.0);
    assert_eq!(b.center(), Point::new(60.0, 50.0));
    assert_eq!(b.side_midpoint(Side::Top), Point::new(60.0, 20.0));
    assert_eq!(b.side_midpoint(Side::Bottom), Point::new(60.0, 80.0));
    assert_eq!(b.side_midpoint(Side::Left), Point::new(10.0, 50.0));
    assert_eq!(b.side_midpoint(Side::Right), Point::new(110.0, 50.0));
}

// =============================================================
// Dominant-axis branch
// =============================================================

#[test]
fn horizontally_aligned_rects_connect_right_to_left() {
    // dx = 300, dy = 0: zero denominator counts as infinite ratio.
    let (src, tgt) = edge_anchors(&rect(0.0, 0.0, 100.0, 100.0), &rect(300.0, 0.0, 100.0, 100.0));
    assert_eq!(src.side, Side::Right);
    assert_eq!(src.point, Point::new(100.0, 50.0));
    assert_eq!(tgt.side, Side::Left);
    assert_eq!(tgt.point, Point::new(300.0, 50.0));
}

#[test]
fn target_to_the_left_connects_left_to_right() {
    let (src, tgt) = edge_anchors(&rect(300.0, 0.0, 100.0, 100.0), &rect(0.0, 0.0, 100.0, 100.0));
    assert_eq!(src.side, Side::Left);
    assert_eq!(tgt.side, Side::Right);
}

#[test]
fn vertically_stacked_rects_connect_bottom_to_top() {
    let (src, tgt) = edge_anchors(&rect(0.0, 0.0, 100.0, 100.0), &rect(0.0, 400.0, 100.0, 100.0));
    assert_eq!(src.side, Side::Bottom);
    assert_eq!(src.point, Point::new(50.0, 100.0));
    assert_eq!(tgt.side, Side::Top);
    assert_eq!(tgt.point, Point::new(50.0, 400.0));
}

#[test]
fn target_above_connects_top_to_bottom() {
    let (src, tgt) = edge_anchors(&rect(0.0, 400.0, 100.0, 100.0), &rect(0.0, 0.0, 100.0, 100.0));
    assert_eq!(src.side, Side::Top);
    assert_eq!(tgt.side, Side::Bottom);
}

#[test]
fn slight_misalignment_still_takes_dominant_branch() {
    // dx = 300, dy = 100: ratio 3.0 > 1.4.
    let (src, tgt) = edge_anchors(&rect(0.0, 0.0, 100.0, 100.0), &rect(300.0, 100.0, 100.0, 100.0));
    assert_eq!(src.side, Side::Right);
    assert_eq!(tgt.side, Side::Left);
}

#[test]
fn ratio_at_threshold_is_not_dominant() {
    // dx = 140, dy = 100: ratio exactly 1.4 is not strictly greater.
    assert_eq!(dominant_side(140.0, 100.0), None);
}

#[test]
fn coincident_centers_are_deterministic() {
    let b = rect(0.0, 0.0, 100.0, 100.0);
    let (src, tgt) = edge_anchors(&b, &b);
    assert_eq!(src.side, Side::Top);
    assert_eq!(tgt.side, Side::Bottom);
}

// =============================================================
// Brute-force branch
// =============================================================

#[test]
fn diagonal_placement_picks_nearest_midpoint_pair() {
    // Perfect diagonal: dx = dy = 200, ratio 1.0. Two pairs tie at the
    // minimum; the fixed side order makes (Bottom, Left) win.
    let (src, tgt) = edge_anchors(&rect(0.0, 0.0, 100.0, 100.0), &rect(200.0, 200.0, 100.0, 100.0));
    assert_eq!(src.side, Side::Bottom);
    assert_eq!(src.point, Point::new(50.0, 100.0));
    assert_eq!(tgt.side, Side::Left);
    assert_eq!(tgt.point, Point::new(200.0, 250.0));
}

#[test]
fn brute_force_result_is_reproducible() {
    let a = rect(12.0, 30.0, 80.0, 40.0);
    let b = rect(150.0, 140.0, 60.0, 120.0);
    let first = edge_anchors(&a, &b);
    for _ in 0..10 {
        assert_eq!(edge_anchors(&a, &b), first);
    }
}

#[test]
fn branches_agree_when_both_well_defined() {
    // Horizontally aligned, unique minimum: the brute-force scoring must
    // land on the same facing pair the dominant branch picks.
    let a = rect(0.0, 0.0, 100.0, 100.0);
    let b = rect(300.0, 10.0, 100.0, 100.0);
    let (src, tgt) = edge_anchors(&a, &b);

    let mut best: Option<(f64, Side, Side)> = None;
    for s in Side::ALL {
        for t in Side::ALL {
            let sp = a.side_midpoint(s);
            let tp = b.side_midpoint(t);
            let d2 = (sp.x - tp.x).powi(2) + (sp.y - tp.y).powi(2);
            if best.is_none_or(|(bd, _, _)| d2 < bd) {
                best = Some((d2, s, t));
            }
        }
    }
    let (_, bs, bt) = best.unwrap();
    assert_eq!(src.side, bs);
    assert_eq!(tgt.side, bt);
}

// =============================================================
// Boundary membership
// =============================================================

#[test]
fn anchors_lie_on_their_rect_boundaries() {
    let cases = [
        (rect(0.0, 0.0, 100.0, 100.0), rect(300.0, 0.0, 100.0, 100.0)),
        (rect(0.0, 0.0, 100.0, 100.0), rect(200.0, 200.0, 100.0, 100.0)),
        (rect(0.0, 0.0, 40.0, 200.0), rect(500.0, 30.0, 80.0, 80.0)),
        (rect(-50.0, -50.0, 30.0, 30.0), rect(10.0, 90.0, 120.0, 10.0)),
        (rect(5.0, 5.0, 1.0, 1.0), rect(6.5, 5.0, 1.0, 1.0)),
    ];
    for (a, b) in cases {
        let (src, tgt) = edge_anchors(&a, &b);
        assert!(on_boundary(&a, src.point), "source anchor off boundary for {a:?} -> {b:?}");
        assert!(on_boundary(&b, tgt.point), "target anchor off boundary for {a:?} -> {b:?}");
    }
}
