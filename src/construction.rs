//! Incremental construction of the trapezoidal map, and point-location
//! queries against its search DAG.
//!
//! Inserting a segment happens in two phases. First we walk the DAG to the
//! trapezoid containing the segment's left endpoint, and then follow
//! right-neighbor links until we reach the trapezoid containing its right
//! endpoint. This phase doesn't modify anything, and it also validates the
//! neighbor links that it walks over; if it fails, the map is untouched.
//!
//! In the second phase, each crossed trapezoid is split into a part above the
//! segment and a part below it, plus (for the first and last crossed
//! trapezoids) a part to the left of the left endpoint and a part to the
//! right of the right endpoint. Where the segment passes a vertical wall,
//! the wall gets cut: on one side of the segment it still separates two
//! trapezoids, but on the other side it doesn't, and the two pieces on that
//! side are merged. The leaf of each crossed trapezoid gets replaced by a
//! small subtree that distinguishes between its pieces.

use arrayvec::ArrayVec;
use log::{debug, trace};

use crate::{
    check::Corruption,
    dag::{Dag, Node, NodeIdx},
    geom::{Point, Segment},
    map::{PointIdx, SegIdx, TrapezoidalMap},
    trapezoid::{TrapIdx, Trapezoid},
    Error,
};

/// Finds the trapezoid containing `point`.
///
/// A point on the boundary between trapezoids goes to one of them,
/// consistently: a point on a segment goes below it, and a point on a wall
/// goes to the left if it's below the wall's defining point and to the right
/// otherwise. Points outside the bounding box go to some trapezoid near the
/// boundary.
pub fn locate_point(map: &TrapezoidalMap, dag: &Dag, point: &Point) -> TrapIdx {
    let mut idx = Dag::ROOT;
    loop {
        match dag[idx] {
            Node::Leaf(trap) => return trap,
            Node::Point {
                point: p,
                left,
                right,
            } => {
                idx = if point < map.point(p) { left } else { right };
            }
            Node::Segment {
                segment,
                left,
                right,
            } => {
                idx = if map.segment(segment).is_point_at_left(point) {
                    left
                } else {
                    right
                };
            }
        }
    }
}

// Finds the trapezoid that contains the beginning of the (ordered) segment `seg`.
//
// This is like `locate_point` on the left endpoint, except for when the left
// endpoint is on an existing segment. That happens when the two segments
// share a left endpoint, and then we want the side of the existing segment
// that the new segment goes into.
fn locate_segment_start(map: &TrapezoidalMap, dag: &Dag, seg: &Segment) -> TrapIdx {
    let p = &seg.p1;
    let mut idx = Dag::ROOT;
    loop {
        match dag[idx] {
            Node::Leaf(trap) => return trap,
            Node::Point { point, left, right } => {
                idx = if p < map.point(point) { left } else { right };
            }
            Node::Segment {
                segment,
                left,
                right,
            } => {
                let other = map.segment(segment);
                let above = if other.is_point_at_left(p) {
                    true
                } else if other.is_point_at_right(p) {
                    false
                } else {
                    seg.slope() > other.slope()
                };
                idx = if above { left } else { right };
            }
        }
    }
}

/// Finds the trapezoids crossed by `segment`, from left to right.
///
/// The segment is validated (and ordered) the same way that [`insert`] does,
/// but it isn't inserted. The trapezoids are those that *would* be split if
/// it were.
pub fn follow_segment(
    map: &TrapezoidalMap,
    dag: &Dag,
    segment: Segment,
) -> Result<Vec<TrapIdx>, Error> {
    let seg = map.validate_segment(segment)?;
    crossed_trapezoids(map, dag, &seg)
}

// The walk behind `follow_segment`, for a segment that's already been validated.
//
// Every step is checked, so that if the neighbor links are broken we bail
// out before starting to modify anything.
fn crossed_trapezoids(
    map: &TrapezoidalMap,
    dag: &Dag,
    seg: &Segment,
) -> Result<Vec<TrapIdx>, Error> {
    let mut cur = locate_segment_start(map, dag, seg);
    let mut ret = vec![cur];

    loop {
        let trap = map.trapezoid(cur);
        if seg.p2 <= trap.right_point {
            return Ok(ret);
        }

        // The segment leaves through the right wall. If the wall's defining
        // point is above the segment, the segment passes below it and we
        // continue along the bottom.
        let r = trap.right_point;
        let along_bottom = seg.is_point_at_left(&r);
        let next = if along_bottom {
            trap.lower_right
        } else {
            trap.upper_right
        };
        let next = next.ok_or(Error::Corrupted(Corruption::MissingNeighbor { trapezoid: cur }))?;
        if !map.is_live(next) {
            return Err(Error::Corrupted(Corruption::FreedNeighbor {
                trapezoid: cur,
                neighbor: next,
            }));
        }

        let next_trap = map.trapezoid(next);
        let shares_boundary = if along_bottom {
            next_trap.bottom == trap.bottom
        } else {
            next_trap.top == trap.top
        };
        if next_trap.left_point != r || !shares_boundary {
            return Err(Error::Corrupted(Corruption::NotAdjacent {
                trapezoid: cur,
                neighbor: next,
            }));
        }

        ret.push(next);
        cur = next;
    }
}

/// Inserts a segment into the map.
///
/// The segment can be given with its endpoints in either order. It must not
/// cross any segment that's already in the map, although it may share
/// endpoints with them. Crossings aren't detected, and they will
/// corrupt the map.
///
/// If this returns an error because the segment was invalid, the map and DAG
/// were not modified.
pub fn insert(map: &mut TrapezoidalMap, dag: &mut Dag, segment: Segment) -> Result<(), Error> {
    let seg = map.validate_segment(segment)?;
    let crossed = crossed_trapezoids(map, dag, &seg)?;
    debug!(
        "inserting {seg:?}, crossing {} trapezoid(s) of {} ({} DAG nodes)",
        crossed.len(),
        map.num_live_trapezoids(),
        dag.len()
    );

    let p = map.add_point(seg.p1);
    let q = map.add_point(seg.p2);
    let s = map.add_segment(seg);
    let mut splitter = Splitter {
        map: &mut *map,
        dag: &mut *dag,
        seg,
        p,
        q,
        s,
    };

    let mut prev = None;
    for &old in &crossed {
        prev = Some(splitter.split(old, prev));
    }

    check_invariants(map, dag);
    Ok(())
}

/// Removes all segments, returning the map and DAG to their initial state.
pub fn reset(map: &mut TrapezoidalMap, dag: &mut Dag) {
    map.clear();
    dag.reset();
}

#[cfg(feature = "slow-asserts")]
fn check_invariants(map: &TrapezoidalMap, dag: &Dag) {
    if let Err(e) = crate::check::check(map, dag) {
        panic!("broken trapezoidal map: {e}\n{map:#?}\n{dag:#?}");
    }
}

#[cfg(not(feature = "slow-asserts"))]
fn check_invariants(_map: &TrapezoidalMap, _dag: &Dag) {}

/// The two new trapezoids on either side of the inserted segment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Row {
    Top,
    Bottom,
}

/// What one split step hands on to the next.
#[derive(Clone, Copy, Debug)]
struct Step {
    /// The trapezoid above the segment, just left of the next wall.
    top: TrapIdx,
    /// The trapezoid below the segment, just left of the next wall.
    bottom: TrapIdx,
    /// The row that carries on past the next wall (because the segment cut
    /// the wall on that side).
    continuing: Row,
}

/// Hands out trapezoid slots for one split step: first the slot of the
/// trapezoid being split, then the freed slot (if any), then new slots at
/// the end of the arena.
struct SlotPool {
    // Popped from the back.
    reusable: ArrayVec<TrapIdx, 2>,
    next_new: TrapIdx,
}

impl SlotPool {
    fn new(split: TrapIdx, freed: Option<TrapIdx>, next_new: TrapIdx) -> Self {
        let mut reusable = ArrayVec::new();
        if let Some(freed) = freed {
            reusable.push(freed);
        }
        reusable.push(split);
        SlotPool { reusable, next_new }
    }

    fn take(&mut self) -> TrapIdx {
        self.reusable.pop().unwrap_or_else(|| {
            let idx = self.next_new;
            self.next_new.0 += 1;
            idx
        })
    }
}

struct Splitter<'a> {
    map: &'a mut TrapezoidalMap,
    dag: &'a mut Dag,
    seg: Segment,
    p: PointIdx,
    q: PointIdx,
    s: SegIdx,
}

impl Splitter<'_> {
    // Makes `left` and `right` each other's neighbors along their common top.
    fn link_upper(&mut self, left: Option<TrapIdx>, right: Option<TrapIdx>) {
        if let Some(l) = left {
            self.map.trapezoid_mut(l).upper_right = right;
        }
        if let Some(r) = right {
            self.map.trapezoid_mut(r).upper_left = left;
        }
    }

    // Makes `left` and `right` each other's neighbors along their common bottom.
    fn link_lower(&mut self, left: Option<TrapIdx>, right: Option<TrapIdx>) {
        if let Some(l) = left {
            self.map.trapezoid_mut(l).lower_right = right;
        }
        if let Some(r) = right {
            self.map.trapezoid_mut(r).lower_left = left;
        }
    }

    fn new_leaf(&mut self, trap: TrapIdx) -> NodeIdx {
        let node = self.dag.push(Node::Leaf(trap));
        self.map.trapezoid_mut(trap).node = node;
        node
    }

    /// Splits the trapezoid at `old_idx`, which is the next one crossed by the segment.
    fn split(&mut self, old_idx: TrapIdx, prev: Option<Step>) -> Step {
        let old = *self.map.trapezoid(old_idx);
        let seg = self.seg;
        let left_exists = old.left_point < seg.p1;
        let right_exists = seg.p2 < old.right_point;
        let is_last = seg.p2 <= old.right_point;

        let mut pool = SlotPool::new(
            old_idx,
            self.map.merged_slot(),
            self.map.next_trapezoid_idx(),
        );
        let top_idx = pool.take();
        let bottom_idx = pool.take();
        let left_idx = left_exists.then(|| pool.take());
        let right_idx = right_exists.then(|| pool.take());
        // The freed slot (if there was one) just went to `bottom_idx`.
        self.map.set_merged_slot(None);
        trace!(
            "splitting {old_idx:?}: top {top_idx:?}, bottom {bottom_idx:?}, left {left_idx:?}, right {right_idx:?}"
        );

        // New trapezoids are written in the order their slots were taken, so
        // that any new slots get appended in order.
        let inner_left = if left_exists { seg.p1 } else { old.left_point };
        let inner_right = if right_exists {
            seg.p2
        } else {
            old.right_point
        };
        self.map.set_trapezoid(
            top_idx,
            Trapezoid::new(old.top, seg, inner_left, inner_right),
        );
        self.map.set_trapezoid(
            bottom_idx,
            Trapezoid::new(seg, old.bottom, inner_left, inner_right),
        );
        if let Some(left) = left_idx {
            self.map.set_trapezoid(
                left,
                Trapezoid::new(old.top, old.bottom, old.left_point, seg.p1),
            );
        }
        if let Some(right) = right_idx {
            self.map.set_trapezoid(
                right,
                Trapezoid::new(old.top, old.bottom, seg.p2, old.right_point),
            );
        }

        // Links across the left wall.
        match (left_idx, prev) {
            (Some(left), _) => {
                self.link_upper(old.upper_left, Some(left));
                self.link_lower(old.lower_left, Some(left));
                self.link_upper(Some(left), Some(top_idx));
                self.link_lower(Some(left), Some(bottom_idx));
            }
            (None, None) => {
                // The segment starts on the left wall.
                self.link_upper(old.upper_left, Some(top_idx));
                self.link_lower(old.lower_left, Some(bottom_idx));
            }
            // The continuing row doesn't get a left wall: it's about to be
            // merged into its left neighbor. The other row starts here.
            (None, Some(prev)) => match prev.continuing {
                Row::Bottom => {
                    self.link_upper(old.upper_left, Some(top_idx));
                    self.link_lower(Some(prev.top), Some(top_idx));
                }
                Row::Top => {
                    self.link_lower(old.lower_left, Some(bottom_idx));
                    self.link_upper(Some(prev.bottom), Some(bottom_idx));
                }
            },
        }

        // Links across the right wall.
        let continuing = if seg.is_point_at_left(&old.right_point) {
            Row::Bottom
        } else {
            Row::Top
        };
        if let Some(right) = right_idx {
            self.link_upper(Some(right), old.upper_right);
            self.link_lower(Some(right), old.lower_right);
            self.link_upper(Some(top_idx), Some(right));
            self.link_lower(Some(bottom_idx), Some(right));
        } else if is_last {
            // The segment ends on the right wall.
            self.link_upper(Some(top_idx), old.upper_right);
            self.link_lower(Some(bottom_idx), old.lower_right);
        } else {
            // The continuing row gets linked up by the next step's merge.
            match continuing {
                Row::Bottom => self.link_upper(Some(top_idx), old.upper_right),
                Row::Top => self.link_lower(Some(bottom_idx), old.lower_right),
            }
        }

        let merged_row = prev.map(|prev| prev.continuing);
        let mut top = top_idx;
        let mut bottom = bottom_idx;
        if let Some(prev) = prev {
            match prev.continuing {
                Row::Top => {
                    self.merge(prev.top, top_idx);
                    top = prev.top;
                }
                Row::Bottom => {
                    self.merge(prev.bottom, bottom_idx);
                    bottom = prev.bottom;
                }
            }
        }

        // The survivor of a merge already has a leaf; everything else is new.
        let top_leaf = if merged_row == Some(Row::Top) {
            self.map.trapezoid(top).node
        } else {
            self.new_leaf(top)
        };
        let bottom_leaf = if merged_row == Some(Row::Bottom) {
            self.map.trapezoid(bottom).node
        } else {
            self.new_leaf(bottom)
        };
        let left_leaf = left_idx.map(|t| self.new_leaf(t));
        let right_leaf = right_idx.map(|t| self.new_leaf(t));

        // Build the replacement subtree from the bottom up. Its root takes
        // over the old leaf's slot, so that every path that led to the old
        // trapezoid now leads here.
        let seg_node = Node::Segment {
            segment: self.s,
            left: top_leaf,
            right: bottom_leaf,
        };
        let subtree = match (left_leaf, right_leaf) {
            (None, None) => seg_node,
            (Some(left), None) => Node::Point {
                point: self.p,
                left,
                right: self.dag.push(seg_node),
            },
            (None, Some(right)) => Node::Point {
                point: self.q,
                left: self.dag.push(seg_node),
                right,
            },
            (Some(left), Some(right)) => {
                let seg_node = self.dag.push(seg_node);
                let q_node = self.dag.push(Node::Point {
                    point: self.q,
                    left: seg_node,
                    right,
                });
                Node::Point {
                    point: self.p,
                    left,
                    right: q_node,
                }
            }
        };
        self.dag.set(old.node, subtree);

        Step {
            top,
            bottom,
            continuing,
        }
    }

    // Merges `later` into `earlier`, its left neighbor, and frees `later`'s slot.
    //
    // Both were cut from the segment and from the boundary that
    // `crossed_trapezoids` checked was shared across the wall, so they always
    // have the same top and bottom.
    fn merge(&mut self, earlier: TrapIdx, later: TrapIdx) {
        let absorbed = *self.map.trapezoid(later);
        let survivor = self.map.trapezoid_mut(earlier);
        debug_assert!(survivor.same_boundaries(&absorbed));
        survivor.right_point = absorbed.right_point;
        self.link_upper(Some(earlier), absorbed.upper_right);
        self.link_lower(Some(earlier), absorbed.lower_right);
        self.map.set_merged_slot(Some(later));
        trace!("merged {later:?} into {earlier:?}");
    }
}

/// Randomized tests that are shared between unit tests and fuzz targets.
#[cfg(any(test, feature = "arbitrary"))]
pub mod arbtests {
    use arbitrary::Unstructured;

    use crate::{arbitrary::non_crossing_segments, PointLocator};

    /// Inserts a non-crossing set of segments, checking the whole structure
    /// after every insertion.
    ///
    /// Panics if anything is wrong.
    pub fn insertion(u: &mut Unstructured<'_>) -> arbitrary::Result<()> {
        let (bbox, segments) = non_crossing_segments(u)?;
        let mut locator = PointLocator::new(bbox).unwrap();

        for seg in segments {
            locator.insert(seg).unwrap();
            if let Err(e) = locator.check() {
                panic!("after inserting {seg:?}: {e}");
            }
        }

        let total: f64 = locator
            .map()
            .live_trapezoids()
            .map(|(_, t)| t.area())
            .sum();
        let expected = bbox.area();
        assert!(
            (total - expected).abs() <= 1e-9 * expected,
            "areas add up to {total}, not {expected}"
        );

        // Since the coordinates are all small integers, every trapezoid with
        // positive width has an interior point far from its boundary.
        for (idx, trap) in locator.map().live_trapezoids() {
            if trap.left_point.x < trap.right_point.x {
                let p = trap.interior_point();
                assert_eq!(locator.locate(p), idx, "locating {p:?}");
            }
        }
        Ok(())
    }
}
