use assert_matches::assert_matches;
use kurbo::Rect;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use trapmap::{Error, Point, PointLocator, Segment, TrapIdx};

fn unit_box() -> Rect {
    Rect::new(0.0, 0.0, 10.0, 10.0)
}

fn interior_points_are_located(locator: &PointLocator) {
    for (idx, trap) in locator.map().live_trapezoids() {
        if trap.left_point.x < trap.right_point.x {
            assert_eq!(locator.locate(trap.interior_point()), idx);
        }
    }
}

#[test]
fn one_diagonal() {
    let _ = pretty_env_logger::try_init();

    let mut locator = PointLocator::new(unit_box()).unwrap();
    let seg = Segment::new((2.0, 2.0), (8.0, 8.0));
    assert_eq!(locator.trapezoids_crossed_by(seg).unwrap(), vec![TrapIdx(0)]);

    locator.insert(seg).unwrap();
    locator.check().unwrap();
    assert_eq!(locator.map().num_live_trapezoids(), 4);

    let above = locator.locate((3.0, 9.0));
    let below = locator.locate((7.0, 1.0));
    let left = locator.locate((1.0, 9.0));
    let right = locator.locate((9.0, 1.0));
    let mut all = vec![above, below, left, right];
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 4);

    assert_eq!(locator.map().trapezoid(above).bottom, seg);
    assert_eq!(locator.map().trapezoid(below).top, seg);
    assert_eq!(locator.map().trapezoid(left).right_point, seg.p1);
    assert_eq!(locator.map().trapezoid(right).left_point, seg.p2);

    let [tl, tr, br, bl] = locator.map().trapezoid(above).vertices();
    assert_eq!(tl, Point::new(2.0, 10.0));
    assert_eq!(tr, Point::new(8.0, 10.0));
    assert_eq!(br, Point::new(8.0, 8.0));
    assert_eq!(bl, Point::new(2.0, 2.0));
}

#[test]
fn insertion_order_does_not_change_the_tiling() {
    let a = Segment::new((1.0, 1.0), (3.0, 9.0));
    let b = Segment::new((6.0, 1.0), (8.0, 9.0));

    let mut ab = PointLocator::new(unit_box()).unwrap();
    ab.insert(a).unwrap();
    ab.insert(b).unwrap();

    let mut ba = PointLocator::new(unit_box()).unwrap();
    ba.insert(b).unwrap();
    ba.insert(a).unwrap();

    assert_eq!(
        ab.map().num_live_trapezoids(),
        ba.map().num_live_trapezoids()
    );

    // The same regions, possibly in different slots.
    let mut regions_ab: Vec<_> = ab
        .map()
        .live_trapezoids()
        .map(|(_, t)| format!("{:?}", t.vertices()))
        .collect();
    let mut regions_ba: Vec<_> = ba
        .map()
        .live_trapezoids()
        .map(|(_, t)| format!("{:?}", t.vertices()))
        .collect();
    regions_ab.sort();
    regions_ba.sort();
    assert_eq!(regions_ab, regions_ba);
}

#[test]
fn reversed_segments_are_ordered() {
    let mut locator = PointLocator::new(unit_box()).unwrap();
    locator
        .insert(Segment::new((8.0, 3.0), (2.0, 5.0)))
        .unwrap();
    let (_, stored) = locator.map().segments().next().unwrap();
    assert_eq!(*stored, Segment::new((2.0, 5.0), (8.0, 3.0)));
    assert!(stored.is_ordered());
}

#[test]
fn bad_input() {
    let mut locator = PointLocator::new(unit_box()).unwrap();
    assert_matches!(
        locator.insert(Segment::new((5.0, 1.0), (5.0, 3.0))),
        Err(Error::VerticalSegment(_))
    );
    assert_matches!(
        locator.insert(Segment::new((5.0, 1.0), (5.0, 1.0))),
        Err(Error::VerticalSegment(_))
    );
    assert_matches!(
        locator.insert(Segment::new((5.0, 1.0), (f64::INFINITY, 3.0))),
        Err(Error::Infinity)
    );
    assert_matches!(
        locator.insert(Segment::new((5.0, 1.0), (11.0, 3.0))),
        Err(Error::OutsideBoundingBox(_))
    );
    assert_matches!(
        PointLocator::new(Rect::new(0.0, 0.0, 10.0, 0.0)),
        Err(Error::EmptyBoundingBox)
    );
    assert_eq!(locator.map().num_segments(), 0);
    assert_eq!(locator.map().num_points(), 0);
    assert_eq!(locator.map().num_live_trapezoids(), 1);
}

#[test]
fn triangle_with_a_hole() {
    let outer = [(1.0, 1.0), (9.0, 2.0), (4.0, 9.0)];
    let inner = [(3.0, 3.0), (6.0, 3.5), (4.0, 6.0)];
    let mut segments = Vec::new();
    for tri in [outer, inner] {
        for k in 0..3 {
            segments.push(Segment::new(tri[k], tri[(k + 1) % 3]));
        }
    }

    for seed in 0..16 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let locator = PointLocator::build(unit_box(), segments.clone(), &mut rng).unwrap();
        locator.check().unwrap();
        interior_points_are_located(&locator);

        // Inside the hole, the trapezoid is bounded by the inner triangle.
        let t = locator.locate_trapezoid((4.0, 4.0));
        assert!(t.contains(&Point::new(4.0, 4.0)));
        assert_eq!(t.bottom, Segment::new((3.0, 3.0), (6.0, 3.5)));

        // Between the triangles, below the hole.
        let t = locator.locate_trapezoid((4.0, 2.5));
        assert_eq!(t.top, Segment::new((3.0, 3.0), (6.0, 3.5)));
        assert_eq!(t.bottom, Segment::new((1.0, 1.0), (9.0, 2.0)));

        assert_eq!(locator.dag().node_counts().leaves, locator.map().num_live_trapezoids());
    }
}

#[test]
fn reset_and_rebuild() -> anyhow::Result<()> {
    let mut locator = PointLocator::new(unit_box())?;
    locator.insert(Segment::new((1.0, 1.0), (9.0, 2.0)))?;
    locator.insert(Segment::new((1.0, 1.0), (4.0, 9.0)))?;
    locator.reset();

    assert_eq!(locator.map().num_segments(), 0);
    assert_eq!(locator.map().num_trapezoids(), 1);
    assert_eq!(locator.map().merged_slot(), None);
    assert_eq!(locator.dag().len(), 1);
    assert_eq!(locator.locate((5.0, 5.0)), TrapIdx(0));

    locator.insert(Segment::new((2.0, 2.0), (8.0, 8.0)))?;
    locator.check()?;
    assert_eq!(locator.map().num_live_trapezoids(), 4);
    Ok(())
}
