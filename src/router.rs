//! Floating-edge geometry: picking boundary attachment points.
//!
//! Given the current bounds of an edge's two endpoint nodes, compute the
//! pair of side-midpoints the edge should attach to. Pure functions with no
//! state — callers re-run this on every render from live node bounds, so
//! dragging a node visibly re-routes all of its edges without any separate
//! edge update.

#[cfg(test)]
#[path = "router_test.rs"]
mod router_test;

use serde::{Deserialize, Serialize};

use crate::camera::Point;
use crate::consts::DOMINANT_AXIS_RATIO;

/// One of a node's four attachment sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    /// All sides, in the fixed order used for deterministic tie-breaks.
    pub const ALL: [Self; 4] = [Self::Top, Self::Bottom, Self::Left, Self::Right];

    /// The geometrically opposite side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Axis-aligned node bounds in document space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Center of the bounds.
    #[must_use]
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Midpoint of one side of the bounds.
    #[must_use]
    pub fn side_midpoint(&self, side: Side) -> Point {
        match side {
            Side::Top => Point::new(self.x + self.width / 2.0, self.y),
            Side::Bottom => Point::new(self.x + self.width / 2.0, self.y + self.height),
            Side::Left => Point::new(self.x, self.y + self.height / 2.0),
            Side::Right => Point::new(self.x + self.width, self.y + self.height / 2.0),
        }
    }
}

/// A chosen attachment point: where on the boundary, and which side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub point: Point,
    pub side: Side,
}

impl Anchor {
    fn at(bounds: &Bounds, side: Side) -> Self {
        Self { point: bounds.side_midpoint(side), side }
    }
}

/// Compute the best pair of boundary attachment points for an edge from
/// `source` to `target`.
///
/// When one center-to-center axis dominates the other by more than
/// [`DOMINANT_AXIS_RATIO`] (a zero cross-axis counts as infinite ratio),
/// the source side directly faces the target along that axis and the
/// target side is its opposite — roughly aligned nodes get clean
/// orthogonal-looking connections. Otherwise all 16 side-midpoint pairs
/// are scored by squared distance and the first minimum wins, iterating
/// sides in [`Side::ALL`] order, so identical inputs always produce the
/// same answer.
#[must_use]
pub fn edge_anchors(source: &Bounds, target: &Bounds) -> (Anchor, Anchor) {
    let sc = source.center();
    let tc = target.center();
    let dx = tc.x - sc.x;
    let dy = tc.y - sc.y;

    if let Some(side) = dominant_side(dx, dy) {
        return (Anchor::at(source, side), Anchor::at(target, side.opposite()));
    }

    let mut best: Option<(f64, Side, Side)> = None;
    for s_side in Side::ALL {
        let s_pt = source.side_midpoint(s_side);
        for t_side in Side::ALL {
            let t_pt = target.side_midpoint(t_side);
            let d2 = dist_squared(s_pt, t_pt);
            if best.is_none_or(|(best_d2, _, _)| d2 < best_d2) {
                best = Some((d2, s_side, t_side));
            }
        }
    }

    // The loops above always run; best is present.
    let (_, s_side, t_side) = best.unwrap_or((0.0, Side::Top, Side::Top));
    (Anchor::at(source, s_side), Anchor::at(target, t_side))
}

/// The source side facing the target along the dominant axis, or `None`
/// when neither axis dominates (diagonal placement) or the centers
/// coincide on the dominant axis check's degenerate input.
fn dominant_side(dx: f64, dy: f64) -> Option<Side> {
    let adx = dx.abs();
    let ady = dy.abs();

    if adx == 0.0 && ady == 0.0 {
        // Coincident centers: degenerate, treated as vertically stacked.
        return Some(Side::Top);
    }

    let (max, min) = if adx >= ady { (adx, ady) } else { (ady, adx) };
    let dominated = min == 0.0 || max / min > DOMINANT_AXIS_RATIO;
    if !dominated {
        return None;
    }

    if adx >= ady {
        Some(if dx > 0.0 { Side::Right } else { Side::Left })
    } else {
        Some(if dy > 0.0 { Side::Bottom } else { Side::Top })
    }
}

fn dist_squared(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}
