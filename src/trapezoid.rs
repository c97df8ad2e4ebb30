//! Trapezoids: the faces of a trapezoidal map.

use crate::{
    dag::NodeIdx,
    geom::{Point, Segment},
};

/// An index into the trapezoids of a [`TrapezoidalMap`](crate::TrapezoidalMap).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct TrapIdx(pub usize);

/// A vector of trapezoids, indexed by [`TrapIdx`].
#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct TrapVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(TrapVec, TrapIdx, "t");

/// A face of the trapezoidal map.
///
/// A trapezoid is bounded above by `top`, below by `bottom`, and on either
/// side by the vertical line through `left_point` or `right_point`. The
/// sides may have zero height, in which case the trapezoid is really a
/// triangle.
///
/// Each trapezoid has up to four neighbors: two across its left wall and two
/// across its right wall. The upper neighbor on either side is the one that
/// shares `top`; the lower neighbor is the one that shares `bottom`. When
/// only one trapezoid is across a wall, it may be both the upper and the
/// lower neighbor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Trapezoid {
    /// The segment bounding this trapezoid from above.
    pub top: Segment,
    /// The segment bounding this trapezoid from below.
    pub bottom: Segment,
    /// The point defining the left wall.
    pub left_point: Point,
    /// The point defining the right wall.
    pub right_point: Point,
    /// The neighbor across the left wall that shares `top`.
    pub upper_left: Option<TrapIdx>,
    /// The neighbor across the right wall that shares `top`.
    pub upper_right: Option<TrapIdx>,
    /// The neighbor across the left wall that shares `bottom`.
    pub lower_left: Option<TrapIdx>,
    /// The neighbor across the right wall that shares `bottom`.
    pub lower_right: Option<TrapIdx>,
    /// The leaf of the search DAG that refers to this trapezoid.
    pub node: NodeIdx,
}

impl Trapezoid {
    /// A trapezoid with the given boundaries and no neighbors.
    ///
    /// Its DAG node is unset; it must be assigned before the trapezoid is
    /// reachable from a map.
    pub(crate) fn new(top: Segment, bottom: Segment, left_point: Point, right_point: Point) -> Self {
        Trapezoid {
            top,
            bottom,
            left_point,
            right_point,
            upper_left: None,
            upper_right: None,
            lower_left: None,
            lower_right: None,
            node: NodeIdx::UNSET,
        }
    }

    /// Do we have the same top and bottom as `other`?
    ///
    /// Two horizontally adjacent trapezoids with the same top and bottom
    /// should have been merged into one.
    pub fn same_boundaries(&self, other: &Trapezoid) -> bool {
        self.top == other.top && self.bottom == other.bottom
    }

    /// The four corners of this trapezoid, in the order top-left, top-right,
    /// bottom-right, bottom-left.
    ///
    /// A corner that coincides with an endpoint of `top` or `bottom` is
    /// reported as that endpoint exactly; the others are computed by
    /// intersecting the wall with the boundary segment.
    pub fn vertices(&self) -> [Point; 4] {
        let corner = |seg: &Segment, wall: &Point, endpoint: &Point| {
            if endpoint == wall {
                *wall
            } else {
                Point::new(wall.x, seg.y_at(wall.x))
            }
        };
        [
            corner(&self.top, &self.left_point, &self.top.p1),
            corner(&self.top, &self.right_point, &self.top.p2),
            corner(&self.bottom, &self.right_point, &self.bottom.p2),
            corner(&self.bottom, &self.left_point, &self.bottom.p1),
        ]
    }

    /// The area of this trapezoid.
    pub fn area(&self) -> f64 {
        let [tl, tr, br, bl] = self.vertices();
        let width = self.right_point.x - self.left_point.x;
        width * ((tl.y - bl.y) + (tr.y - br.y)) / 2.0
    }

    /// Returns a point that is strictly inside this trapezoid, as long as it
    /// has positive area.
    pub fn interior_point(&self) -> Point {
        let [tl, tr, br, bl] = self.vertices();
        Point::new(
            (tl.x + tr.x + br.x + bl.x) / 4.0,
            (tl.y + tr.y + br.y + bl.y) / 4.0,
        )
    }

    /// Is `p` in the closed region bounded by this trapezoid?
    pub fn contains(&self, p: &Point) -> bool {
        self.left_point.x <= p.x
            && p.x <= self.right_point.x
            && !self.top.is_point_at_left(p)
            && !self.bottom.is_point_at_right(p)
    }
}
