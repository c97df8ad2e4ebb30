//! Utilities for generating examples, benchmarks, and test cases.
//!
//! Everything here produces non-crossing segments together with a bounding
//! box that contains them.

use kurbo::{Rect, Vec2};

use crate::Segment;

/// An `n` by `n` grid of short, parallel, slanted segments.
///
/// Segments in the same column have the same `x` coordinates.
pub fn slanted_grid(n: usize) -> (Rect, Vec<Segment>) {
    let mut ret = Vec::new();
    for i in 0..n {
        let x = 10.0 * i as f64;
        for j in 0..n {
            let y = 10.0 * j as f64;
            ret.push(Segment::new((x + 2.0, y + 2.0), (x + 8.0, y + 5.0)));
        }
    }
    let size = 10.0 * n as f64;
    (Rect::new(0.0, 0.0, size, size), ret)
}

/// An `n` by `n` grid of diamonds (squares standing on a corner).
///
/// Every endpoint is shared by two segments, and each diamond's top and
/// bottom corners have the same `x` coordinate.
pub fn diamonds(n: usize) -> (Rect, Vec<Segment>) {
    let mut ret = Vec::new();
    for i in 0..n {
        let cx = 10.0 * i as f64 + 5.0;
        for j in 0..n {
            let cy = 10.0 * j as f64 + 5.0;
            let corners = [
                (cx, cy + 4.0),
                (cx + 4.0, cy),
                (cx, cy - 4.0),
                (cx - 4.0, cy),
            ];
            for k in 0..4 {
                ret.push(Segment::new(corners[k], corners[(k + 1) % 4]));
            }
        }
    }
    let size = 10.0 * n as f64;
    (Rect::new(0.0, 0.0, size, size), ret)
}

/// A star-shaped polygon with `n` outer points and `n` inner points.
///
/// Any edge that happens to be vertical is left out.
pub fn star(n: usize) -> (Rect, Vec<Segment>) {
    let center = kurbo::Point::new(100.0, 100.0);
    let vertices: Vec<_> = (0..2 * n)
        .map(|k| {
            let r = if k % 2 == 0 { 90.0 } else { 40.0 };
            let theta = 0.1 + std::f64::consts::PI * k as f64 / n as f64;
            center + Vec2::from_angle(theta) * r
        })
        .collect();

    let ret = (0..vertices.len())
        .map(|k| Segment::new(vertices[k], vertices[(k + 1) % vertices.len()]))
        .filter(|s| !s.is_vertical())
        .collect();
    (Rect::new(0.0, 0.0, 200.0, 200.0), ret)
}

/// A long, nearly horizontal spine, with `n` short teeth above it and `n`
/// below it.
///
/// The spine cuts the walls through all of the teeth's endpoints, so
/// inserting it after the teeth causes lots of merges.
pub fn comb(n: usize) -> (Rect, Vec<Segment>) {
    let width = 4.0 * n as f64 + 4.0;
    let mut ret = vec![Segment::new((1.0, 10.0), (width - 1.0, 11.0))];
    for i in 0..n {
        let x = 4.0 * i as f64 + 2.0;
        ret.push(Segment::new((x, 2.0), (x + 2.0, 8.0)));
        ret.push(Segment::new((x + 1.0, 13.0), (x + 3.0, 19.0)));
    }
    (Rect::new(0.0, 0.0, width, 20.0), ret)
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::PointLocator;

    fn build_and_check(bbox: Rect, segments: Vec<Segment>, seed: u64) -> PointLocator {
        let n = segments.len();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let locator = PointLocator::build(bbox, segments, &mut rng).unwrap();
        locator.check().unwrap();
        assert_eq!(locator.map().num_segments(), n);

        let total: f64 = locator
            .map()
            .live_trapezoids()
            .map(|(_, t)| t.area())
            .sum();
        assert!((total - bbox.area()).abs() <= 1e-9 * bbox.area());

        for (idx, trap) in locator.map().live_trapezoids() {
            if trap.left_point.x < trap.right_point.x {
                assert_eq!(locator.locate(trap.interior_point()), idx);
            }
        }
        locator
    }

    #[test]
    fn slanted_grid_count() {
        // Each segment adds three trapezoids: one gets split into four.
        for seed in 0..4 {
            let (bbox, segs) = slanted_grid(5);
            let locator = build_and_check(bbox, segs, seed);
            assert_eq!(locator.map().num_live_trapezoids(), 1 + 3 * 25);
        }
    }

    #[test]
    fn diamonds_all_orders() {
        for seed in 0..8 {
            let (bbox, segs) = diamonds(3);
            build_and_check(bbox, segs, seed);
        }
    }

    #[test]
    fn star_all_orders() {
        for seed in 0..8 {
            let (bbox, segs) = star(7);
            build_and_check(bbox, segs, seed);
        }
    }

    #[test]
    fn comb_spine_last() {
        let (bbox, segs) = comb(6);
        let mut locator = PointLocator::new(bbox).unwrap();
        for seg in segs.iter().skip(1) {
            locator.insert(*seg).unwrap();
        }
        let before = locator.map().num_live_trapezoids();
        let crossed = locator.trapezoids_crossed_by(segs[0]).unwrap().len();

        locator.insert(segs[0]).unwrap();
        locator.check().unwrap();
        assert!(locator.map().merged_slot().is_some());

        // Every crossed trapezoid gets split in two, every wall that the
        // spine cuts merges two of the new pieces, and there's a piece on
        // either end.
        let cut_walls = crossed - 1;
        assert_eq!(
            locator.map().num_live_trapezoids(),
            before + crossed - cut_walls + 2
        );
    }

    #[test]
    fn comb_all_orders() {
        for seed in 0..8 {
            let (bbox, segs) = comb(5);
            build_and_check(bbox, segs, seed);
        }
    }
}
