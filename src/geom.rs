//! Geometric primitives: points, segments, and the predicates that the
//! trapezoidal map is built on.

use kurbo::Vec2;

use crate::{num::CheapOrderedFloat, Error};

/// A two-dimensional point.
///
/// Points are sorted by `x` and then by `y`. Everywhere the map talks about
/// one point being "to the left of" another, it means this order. For points
/// with different `x` coordinates that's the obvious thing; for points that
/// share an `x` coordinate, the lower one counts as being slightly to the left.
/// This is the usual symbolic shear that lets distinct points on a common
/// vertical line behave as if they were in general position.
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Point {
    /// Horizontal component.
    pub x: f64,
    /// Vertical component.
    ///
    /// Although it isn't important for functionality, the documentation and method naming
    /// assumes that larger values are up.
    pub y: f64,
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            CheapOrderedFloat::from(self.x),
            CheapOrderedFloat::from(self.y),
        )
            .cmp(&(
                CheapOrderedFloat::from(other.x),
                CheapOrderedFloat::from(other.y),
            ))
    }
}

impl PartialOrd for Point {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Eq for Point {}

impl std::fmt::Debug for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?}, {:?})", self.x, self.y)
    }
}

impl Point {
    /// Create a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Converts to a `kurbo` point.
    pub fn to_kurbo(self) -> kurbo::Point {
        kurbo::Point::new(self.x, self.y)
    }

    /// Returns an error if either coordinate is NaN or infinite.
    pub(crate) fn check_finite(&self) -> Result<(), Error> {
        if self.x.is_nan() || self.y.is_nan() {
            Err(Error::NaN)
        } else if self.x.is_infinite() || self.y.is_infinite() {
            Err(Error::Infinity)
        } else {
            Ok(())
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl From<kurbo::Point> for Point {
    fn from(p: kurbo::Point) -> Self {
        Self { x: p.x, y: p.y }
    }
}

/// A line segment.
///
/// A segment that has been inserted into a map is always *ordered*: its
/// first endpoint `p1` is to the left of its second endpoint `p2`. See
/// [`Segment::ordered`].
#[derive(Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Segment {
    /// The first endpoint.
    pub p1: Point,
    /// The second endpoint.
    pub p2: Point,
}

impl std::fmt::Debug for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Segment { p1, p2 } = self;
        write!(f, "{p1:?} -- {p2:?}")
    }
}

impl Segment {
    /// Create a new segment. The endpoints may come in either order.
    pub fn new(p1: impl Into<Point>, p2: impl Into<Point>) -> Self {
        Self {
            p1: p1.into(),
            p2: p2.into(),
        }
    }

    /// Returns this segment with its endpoints ordered left to right.
    ///
    /// Ordering an ordered segment does nothing.
    pub fn ordered(self) -> Self {
        if self.p2 < self.p1 {
            self.reversed()
        } else {
            self
        }
    }

    /// Is `p1` to the left of (or equal to) `p2`?
    pub fn is_ordered(&self) -> bool {
        self.p1 <= self.p2
    }

    /// Returns this segment with its endpoints swapped.
    pub fn reversed(self) -> Self {
        Self {
            p1: self.p2,
            p2: self.p1,
        }
    }

    /// Returns true if both endpoints have the same `x` coordinate.
    ///
    /// This includes segments of length zero.
    pub fn is_vertical(&self) -> bool {
        self.p1.x == self.p2.x
    }

    /// The slope of this segment.
    ///
    /// This is infinite (or NaN) for vertical segments, which the map refuses to store.
    pub fn slope(&self) -> f64 {
        (self.p2.y - self.p1.y) / (self.p2.x - self.p1.x)
    }

    /// The `y` coordinate at which the vertical line through `x` meets the
    /// line containing this segment.
    ///
    /// At `x == p1.x` this returns `p1.y` exactly.
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope() * (x - self.p1.x) + self.p1.y
    }

    // Twice the signed area of the triangle (p1, p2, p): positive if `p` is
    // to the left of the directed line from p1 to p2.
    fn orientation(&self, p: &Point) -> f64 {
        let dir: Vec2 = self.p2.to_kurbo() - self.p1.to_kurbo();
        let to_p: Vec2 = p.to_kurbo() - self.p1.to_kurbo();
        dir.cross(to_p)
    }

    /// Is `p` strictly to the left of the directed line from `p1` to `p2`?
    ///
    /// For an ordered segment, "left" means "above".
    pub fn is_point_at_left(&self, p: &Point) -> bool {
        self.orientation(p) > 0.0
    }

    /// Is `p` strictly to the right of the directed line from `p1` to `p2`?
    ///
    /// For an ordered segment, "right" means "below".
    pub fn is_point_at_right(&self, p: &Point) -> bool {
        self.orientation(p) < 0.0
    }

    /// Converts to a `kurbo` line.
    pub fn to_kurbo(&self) -> kurbo::Line {
        kurbo::Line::new(self.p1.to_kurbo(), self.p2.to_kurbo())
    }
}

impl From<kurbo::Line> for Segment {
    fn from(line: kurbo::Line) -> Self {
        Segment::new(line.p0, line.p1)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::num::tests::Reasonable;
    use proptest::prelude::*;

    impl Reasonable for Point {
        type Strategy = BoxedStrategy<Point>;

        fn reasonable() -> Self::Strategy {
            (f64::reasonable(), f64::reasonable())
                .prop_map(|(x, y)| Point::new(x, y))
                .boxed()
        }
    }

    impl Reasonable for Segment {
        type Strategy = BoxedStrategy<Segment>;

        fn reasonable() -> Self::Strategy {
            (Point::reasonable(), Point::reasonable())
                .prop_map(|(p1, p2)| Segment::new(p1, p2))
                .boxed()
        }
    }

    #[test]
    fn orientation() {
        let s = Segment::new((0.0, 0.0), (4.0, 2.0));
        assert!(s.is_point_at_left(&Point::new(1.0, 3.0)));
        assert!(s.is_point_at_right(&Point::new(3.0, 0.0)));

        let on = Point::new(2.0, 1.0);
        assert!(!s.is_point_at_left(&on));
        assert!(!s.is_point_at_right(&on));

        // Flipping the direction flips the sides.
        let r = s.reversed();
        assert!(r.is_point_at_right(&Point::new(1.0, 3.0)));
    }

    #[test]
    fn lexicographic_order() {
        assert!(Point::new(1.0, 5.0) < Point::new(2.0, 0.0));
        assert!(Point::new(1.0, 0.0) < Point::new(1.0, 5.0));
        assert_eq!(Point::new(0.0, 0.0), Point::new(-0.0, 0.0));
    }

    #[test]
    fn slope_and_intersection() {
        let s = Segment::new((2.0, 2.0), (8.0, 8.0));
        assert_eq!(s.slope(), 1.0);
        assert_eq!(s.y_at(2.0), 2.0);
        assert_eq!(s.y_at(5.0), 5.0);

        let flat = Segment::new((0.0, 3.0), (10.0, 3.0));
        assert_eq!(flat.slope(), 0.0);
        assert_eq!(flat.y_at(7.5), 3.0);
    }

    #[test]
    fn vertical() {
        assert!(Segment::new((1.0, 0.0), (1.0, 5.0)).is_vertical());
        assert!(Segment::new((1.0, 1.0), (1.0, 1.0)).is_vertical());
        assert!(!Segment::new((1.0, 0.0), (1.5, 5.0)).is_vertical());
    }

    #[test]
    fn finiteness() {
        assert!(Point::new(0.0, 1.0).check_finite().is_ok());
        assert_eq!(Point::new(f64::NAN, 1.0).check_finite(), Err(Error::NaN));
        assert_eq!(
            Point::new(0.0, f64::NEG_INFINITY).check_finite(),
            Err(Error::Infinity)
        );
    }

    proptest! {
        #[test]
        fn ordering_is_idempotent(s in Segment::reasonable()) {
            let once = s.ordered();
            prop_assert!(once.is_ordered());
            prop_assert_eq!(once.ordered(), once);
            prop_assert_eq!(s.reversed().ordered().ordered(), once);
        }

        #[test]
        fn ordered_endpoints(p in Point::reasonable(), q in Point::reasonable()) {
            let s = Segment::new(p, q).ordered();
            prop_assert_eq!(s.p1, p.min(q));
            prop_assert_eq!(s.p2, p.max(q));
        }
    }
}
