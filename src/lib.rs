#![deny(missing_docs)]

//! Point location in planar subdivisions, using trapezoidal maps.
//!
//! Given a set of non-crossing line segments inside a bounding box, a
//! [`TrapezoidalMap`] divides the box into trapezoids by drawing a vertical
//! line up and down from every segment endpoint until it hits another segment.
//! Alongside the map we build a search [`Dag`] that finds the trapezoid
//! containing any query point in expected logarithmic time, provided the
//! segments were inserted in a random order.
//!
//! [`PointLocator`] keeps the map and the DAG together, and is the main entry
//! point.
//!
//! ```
//! use kurbo::Rect;
//! use rand::SeedableRng;
//! use trapmap::{PointLocator, Segment};
//!
//! let segments = [
//!     Segment::new((2.0, 2.0), (8.0, 8.0)),
//!     Segment::new((2.0, 2.0), (8.0, 3.0)),
//! ];
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let locator = PointLocator::build(Rect::new(0.0, 0.0, 10.0, 10.0), segments, &mut rng)?;
//!
//! let trap = locator.locate_trapezoid((5.0, 4.0));
//! assert_eq!(trap.top, segments[0]);
//! assert_eq!(trap.bottom, segments[1]);
//! # Ok::<(), trapmap::Error>(())
//! ```
//!
//! Segments may share endpoints, and endpoints may share `x` coordinates,
//! but segments may not be vertical and they may not cross.

#[macro_use]
mod typed_vec;

#[cfg(any(test, feature = "arbitrary"))]
pub mod arbitrary;
mod check;
pub mod construction;
mod dag;
mod geom;
mod map;
mod num;
mod trapezoid;

#[cfg(any(test, feature = "generators"))]
pub mod generators;

pub use check::Corruption;
pub use dag::{Dag, Node, NodeCounts, NodeIdx};
pub use geom::{Point, Segment};
pub use map::{PointIdx, SegIdx, TrapezoidalMap};
pub use trapezoid::{TrapIdx, Trapezoid};

use kurbo::Rect;
use log::debug;
use rand::{seq::SliceRandom, Rng};

#[derive(Clone, Copy, Debug, PartialEq)]
/// Something went wrong while building or querying a map.
pub enum Error {
    /// At least one of the inputs was infinite.
    Infinity,
    /// At least one of the inputs was not a number.
    NaN,
    /// A segment was vertical (or had zero length).
    VerticalSegment(Segment),
    /// A segment wasn't strictly inside the bounding box.
    OutsideBoundingBox(Segment),
    /// The bounding box had zero width or height.
    EmptyBoundingBox,
    /// The map's internal structure is broken. This can happen if it was
    /// given crossing segments.
    Corrupted(Corruption),
}

impl From<Corruption> for Error {
    fn from(c: Corruption) -> Self {
        Error::Corrupted(c)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Infinity => write!(f, "one of the inputs was infinite"),
            Error::NaN => write!(f, "one of the inputs had a NaN"),
            Error::VerticalSegment(s) => write!(f, "segment {s:?} is vertical"),
            Error::OutsideBoundingBox(s) => {
                write!(f, "segment {s:?} is not inside the bounding box")
            }
            Error::EmptyBoundingBox => write!(f, "the bounding box is empty"),
            Error::Corrupted(c) => write!(f, "the trapezoidal map is corrupted: {c}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Corrupted(c) => Some(c),
            _ => None,
        }
    }
}

/// A trapezoidal map together with its point-location DAG.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointLocator {
    map: TrapezoidalMap,
    dag: Dag,
}

impl PointLocator {
    /// Creates an empty map of the given bounding box.
    pub fn new(bbox: Rect) -> Result<Self, Error> {
        Ok(PointLocator {
            map: TrapezoidalMap::new(bbox)?,
            dag: Dag::new(),
        })
    }

    /// Builds a map from a collection of non-crossing segments.
    ///
    /// The segments are inserted in a random order, chosen by `rng`. The
    /// expected size of the DAG and the expected query time only hold on
    /// average over these random choices.
    ///
    /// All segments are validated before any of them are inserted.
    pub fn build<R: Rng + ?Sized>(
        bbox: Rect,
        segments: impl IntoIterator<Item = Segment>,
        rng: &mut R,
    ) -> Result<Self, Error> {
        let mut ret = Self::new(bbox)?;
        let mut segments = segments
            .into_iter()
            .map(|s| ret.map.validate_segment(s))
            .collect::<Result<Vec<_>, _>>()?;
        debug!("building a trapezoidal map of {} segments", segments.len());

        segments.shuffle(rng);
        for seg in segments {
            ret.insert(seg)?;
        }
        debug!(
            "built {} trapezoids, {} DAG nodes, DAG depth {}",
            ret.map.num_live_trapezoids(),
            ret.dag.len(),
            ret.dag.depth()
        );
        Ok(ret)
    }

    /// Inserts a single segment.
    ///
    /// See [`construction::insert`].
    pub fn insert(&mut self, segment: Segment) -> Result<(), Error> {
        construction::insert(&mut self.map, &mut self.dag, segment)
    }

    /// Finds the trapezoid containing `point`.
    ///
    /// See [`construction::locate_point`] for what happens to points on
    /// boundaries.
    pub fn locate(&self, point: impl Into<Point>) -> TrapIdx {
        construction::locate_point(&self.map, &self.dag, &point.into())
    }

    /// Finds the trapezoid containing `point`, and returns the trapezoid
    /// instead of its index.
    pub fn locate_trapezoid(&self, point: impl Into<Point>) -> &Trapezoid {
        self.map.trapezoid(self.locate(point))
    }

    /// The trapezoids that `segment` would cross if it were inserted.
    ///
    /// See [`construction::follow_segment`].
    pub fn trapezoids_crossed_by(&self, segment: Segment) -> Result<Vec<TrapIdx>, Error> {
        construction::follow_segment(&self.map, &self.dag, segment)
    }

    /// Removes all segments.
    pub fn reset(&mut self) {
        construction::reset(&mut self.map, &mut self.dag);
    }

    /// The trapezoidal map.
    pub fn map(&self) -> &TrapezoidalMap {
        &self.map
    }

    /// The search DAG.
    pub fn dag(&self) -> &Dag {
        &self.dag
    }

    /// Checks the internal consistency of the map and DAG.
    ///
    /// This is linear in the size of the map.
    pub fn check(&self) -> Result<(), Corruption> {
        check::check(&self.map, &self.dag)
    }

    #[cfg(test)]
    pub(crate) fn parts_mut(&mut self) -> (&mut TrapezoidalMap, &mut Dag) {
        (&mut self.map, &mut self.dag)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn build_validates_first() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let segments = [
            Segment::new((1.0, 1.0), (2.0, 2.0)),
            Segment::new((4.0, 1.0), (4.0, 2.0)),
        ];
        assert_matches!(
            PointLocator::build(Rect::new(0.0, 0.0, 10.0, 10.0), segments, &mut rng),
            Err(Error::VerticalSegment(s)) if s == segments[1]
        );
    }

    #[test]
    fn build_is_reproducible() {
        let (bbox, segments) = generators::star(12);
        let a = PointLocator::build(bbox, segments.clone(), &mut ChaCha8Rng::seed_from_u64(7))
            .unwrap();
        let b = PointLocator::build(bbox, segments, &mut ChaCha8Rng::seed_from_u64(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn error_display() {
        let e = Error::from(Corruption::MissingNeighbor {
            trapezoid: TrapIdx(3),
        });
        assert_eq!(
            e.to_string(),
            "the trapezoidal map is corrupted: t_3 has no neighbor where one was expected"
        );
        assert!(std::error::Error::source(&e).is_some());
        assert!(std::error::Error::source(&Error::NaN).is_none());
    }
}
