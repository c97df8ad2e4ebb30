//! The trapezoidal map: a subdivision of a bounding box into trapezoids by a
//! set of non-crossing segments.

use kurbo::Rect;

use crate::{
    dag::Dag,
    geom::{Point, Segment},
    trapezoid::{TrapIdx, TrapVec, Trapezoid},
    Error,
};

/// An index into the points of a [`TrapezoidalMap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct PointIdx(pub usize);

/// A vector indexed by [`PointIdx`].
#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct PointVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(PointVec, PointIdx, "p");

/// An index into the segments of a [`TrapezoidalMap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct SegIdx(pub usize);

/// A vector indexed by [`SegIdx`].
#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SegVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(SegVec, SegIdx, "s");

/// A trapezoidal map.
///
/// The map owns the inserted points and segments, along with the trapezoids
/// that they cut the bounding box into. It doesn't know how to insert
/// segments by itself: that needs the search [`Dag`], and the two are kept
/// together by [`PointLocator`](crate::PointLocator).
///
/// Trapezoids live in an arena. When two trapezoids are merged during an
/// insertion, one of them is freed; its slot stays in the arena (so indices
/// of other trapezoids don't change) and gets reused by the next insertion.
/// There is at most one freed slot at any time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrapezoidalMap {
    bbox: Rect,
    points: PointVec<Point>,
    segments: SegVec<Segment>,
    traps: TrapVec<Trapezoid>,
    merged: Option<TrapIdx>,
}

impl TrapezoidalMap {
    /// Creates a map with a single trapezoid covering `bbox`.
    ///
    /// Returns an error if `bbox` isn't finite or has no area.
    pub fn new(bbox: Rect) -> Result<Self, Error> {
        // `Rect::abs` silently drops NaNs, so check before normalizing.
        Point::new(bbox.x0, bbox.y0).check_finite()?;
        Point::new(bbox.x1, bbox.y1).check_finite()?;
        let bbox = bbox.abs();
        if bbox.width() <= 0.0 || bbox.height() <= 0.0 {
            return Err(Error::EmptyBoundingBox);
        }

        let mut map = TrapezoidalMap {
            bbox,
            points: PointVec::default(),
            segments: SegVec::default(),
            traps: TrapVec::default(),
            merged: None,
        };
        map.seed();
        Ok(map)
    }

    // The initial trapezoid is the whole bounding box. Its top and bottom
    // aren't registered as segments.
    fn seed(&mut self) {
        let Rect { x0, y0, x1, y1 } = self.bbox;
        let min = Point::new(x0, y0);
        let max = Point::new(x1, y1);
        let top = Segment::new((x0, y1), max);
        let bottom = Segment::new(min, (x1, y0));
        let mut trap = Trapezoid::new(top, bottom, min, max);
        trap.node = Dag::ROOT;
        self.traps.push(trap);
    }

    /// Removes all segments, returning to the state of a freshly created map.
    pub(crate) fn clear(&mut self) {
        self.points.clear();
        self.segments.clear();
        self.traps.clear();
        self.merged = None;
        self.seed();
    }

    /// The bounding box that this map subdivides.
    pub fn bounding_box(&self) -> Rect {
        self.bbox
    }

    /// Checks that `segment` can be inserted, and returns it with its
    /// endpoints in order.
    ///
    /// The segment must be finite, non-vertical, and strictly inside the
    /// bounding box. We don't check whether it crosses any segment that's
    /// already in the map.
    pub fn validate_segment(&self, segment: Segment) -> Result<Segment, Error> {
        segment.p1.check_finite()?;
        segment.p2.check_finite()?;
        if segment.is_vertical() {
            return Err(Error::VerticalSegment(segment));
        }

        let inside = |p: &Point| {
            self.bbox.x0 < p.x && p.x < self.bbox.x1 && self.bbox.y0 < p.y && p.y < self.bbox.y1
        };
        if !inside(&segment.p1) || !inside(&segment.p2) {
            return Err(Error::OutsideBoundingBox(segment));
        }
        Ok(segment.ordered())
    }

    /// The number of registered points, counting duplicates.
    ///
    /// Every inserted segment registers both of its endpoints, even if they
    /// were already registered by an earlier segment.
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// The number of inserted segments.
    pub fn num_segments(&self) -> usize {
        self.segments.len()
    }

    /// The number of trapezoid slots, including the freed one (if any).
    pub fn num_trapezoids(&self) -> usize {
        self.traps.len()
    }

    /// The number of trapezoids that are actually part of the map.
    pub fn num_live_trapezoids(&self) -> usize {
        self.traps.len() - usize::from(self.merged.is_some())
    }

    /// The slot that was freed by the most recent merge, if it hasn't been reused yet.
    pub fn merged_slot(&self) -> Option<TrapIdx> {
        self.merged
    }

    /// Is `idx` a trapezoid of the map (and not the freed slot)?
    pub fn is_live(&self, idx: TrapIdx) -> bool {
        idx.0 < self.traps.len() && self.merged != Some(idx)
    }

    /// The point at `idx`.
    pub fn point(&self, idx: PointIdx) -> &Point {
        &self.points[idx]
    }

    /// The segment at `idx`.
    ///
    /// Segments are stored with their endpoints in order.
    pub fn segment(&self, idx: SegIdx) -> &Segment {
        &self.segments[idx]
    }

    /// Iterates over the registered points.
    pub fn points(&self) -> impl Iterator<Item = (PointIdx, &Point)> + '_ {
        self.points.iter()
    }

    /// Iterates over the inserted segments.
    pub fn segments(&self) -> impl Iterator<Item = (SegIdx, &Segment)> + '_ {
        self.segments.iter()
    }

    /// The trapezoid at `idx`.
    ///
    /// This will happily return the freed slot, which has stale contents.
    pub fn trapezoid(&self, idx: TrapIdx) -> &Trapezoid {
        &self.traps[idx]
    }

    /// Iterates over the trapezoids of the map, skipping the freed slot.
    pub fn live_trapezoids(&self) -> impl Iterator<Item = (TrapIdx, &Trapezoid)> + '_ {
        self.traps
            .iter()
            .filter(move |(idx, _)| self.merged != Some(*idx))
    }

    pub(crate) fn add_point(&mut self, p: Point) -> PointIdx {
        self.points.push(p)
    }

    pub(crate) fn add_segment(&mut self, s: Segment) -> SegIdx {
        self.segments.push(s)
    }

    pub(crate) fn trapezoid_mut(&mut self, idx: TrapIdx) -> &mut Trapezoid {
        &mut self.traps[idx]
    }

    /// Stores `trap` at `idx`, which is either an existing slot or the next new one.
    pub(crate) fn set_trapezoid(&mut self, idx: TrapIdx, trap: Trapezoid) {
        self.traps.set(idx, trap);
    }

    pub(crate) fn next_trapezoid_idx(&self) -> TrapIdx {
        self.traps.next_idx()
    }

    pub(crate) fn set_merged_slot(&mut self, slot: Option<TrapIdx>) {
        self.merged = slot;
    }
}
