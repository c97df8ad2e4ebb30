//! Ordering for floating-point coordinates.

/// A wrapper for `f64` that implements `Ord`.
///
/// Unlike the more principled wrappers in the `ordered_float` crate, this
/// one doesn't order NaNs, nor does it guard against them on construction:
/// a NaN compares equal to everything. The map rejects non-finite input
/// before it gets anywhere near a comparison, so we don't pay for the checks.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct CheapOrderedFloat(f64);

impl From<f64> for CheapOrderedFloat {
    fn from(x: f64) -> Self {
        CheapOrderedFloat(x)
    }
}

// Not really: NaN isn't equal to itself.
impl Eq for CheapOrderedFloat {}

impl PartialOrd for CheapOrderedFloat {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CheapOrderedFloat {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.0 < other.0 {
            std::cmp::Ordering::Less
        } else if self.0 > other.0 {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    // A proptest strategy for coordinates small enough that the geometry
    // doesn't lose all its precision.
    pub trait Reasonable {
        type Strategy: Strategy<Value = Self>;
        fn reasonable() -> Self::Strategy;
    }

    impl Reasonable for f64 {
        type Strategy = BoxedStrategy<f64>;

        fn reasonable() -> Self::Strategy {
            (-1e6..1e6).boxed()
        }
    }

    #[test]
    fn zeros_are_equal() {
        assert_eq!(
            CheapOrderedFloat::from(0.0).cmp(&CheapOrderedFloat::from(-0.0)),
            std::cmp::Ordering::Equal
        );
    }

    proptest! {
        #[test]
        fn agrees_with_partial_cmp(x in f64::reasonable(), y in f64::reasonable()) {
            prop_assert_eq!(
                Some(CheapOrderedFloat::from(x).cmp(&CheapOrderedFloat::from(y))),
                x.partial_cmp(&y)
            );
        }
    }
}
