//! Utilities for fuzz and/or property testing using `arbitrary`.
//!
//! The hard part of generating test input for a trapezoidal map is that the
//! segments must not cross. We arrange that by dividing the bounding box into
//! square cells and putting something different in each cell. All coordinates
//! are integers (before scaling by a power of two), so segments that don't
//! touch are never very close to one another.

use arbitrary::Unstructured;
use kurbo::Rect;

use crate::Segment;

// Cell contents are strictly inside `1..CELL`, so cells never touch.
const CELL: i32 = 32;

type IntSegment = ((i32, i32), (i32, i32));

/// Generate a bounding box and a set of non-crossing segments inside it.
///
/// The segments come in an arbitrary order, and each one has its endpoints
/// in an arbitrary order.
pub fn non_crossing_segments(
    u: &mut Unstructured<'_>,
) -> Result<(Rect, Vec<Segment>), arbitrary::Error> {
    let cols: i32 = u.int_in_range(1..=4)?;
    let rows: i32 = u.int_in_range(1..=4)?;
    let mut segs = Vec::new();

    for i in 0..cols {
        for j in 0..rows {
            let start = segs.len();
            match u.int_in_range(0..=5)? {
                0 => {}
                1 => segs.push(single(u)?),
                2 => fan(u, false, &mut segs)?,
                3 => fan(u, true, &mut segs)?,
                4 => monotone_polygon(u, &mut segs)?,
                _ => polyline(u, &mut segs)?,
            }
            for ((x0, y0), (x1, y1)) in &mut segs[start..] {
                *x0 += i * CELL;
                *x1 += i * CELL;
                *y0 += j * CELL;
                *y1 += j * CELL;
            }
        }
    }

    // Long horizontal segments in the gutters between rows. They cut the
    // walls of everything above and below them.
    let width = cols * CELL;
    for j in 1..rows {
        if u.arbitrary()? {
            let x0 = u.int_in_range(1..=width - 2)?;
            let x1 = u.int_in_range(x0 + 1..=width - 1)?;
            segs.push(((x0, j * CELL), (x1, j * CELL)));
        }
    }

    for k in (1..segs.len()).rev() {
        let other = u.int_in_range(0..=k)?;
        segs.swap(k, other);
    }

    let scale = 2.0f64.powi(u.int_in_range(-4..=4)?);
    let mut ret = Vec::with_capacity(segs.len());
    for ((x0, y0), (x1, y1)) in segs {
        let p0 = (x0 as f64 * scale, y0 as f64 * scale);
        let p1 = (x1 as f64 * scale, y1 as f64 * scale);
        if u.arbitrary()? {
            ret.push(Segment::new(p1, p0));
        } else {
            ret.push(Segment::new(p0, p1));
        }
    }

    let bbox = Rect::new(
        0.0,
        0.0,
        (cols * CELL) as f64 * scale,
        (rows * CELL) as f64 * scale,
    );
    Ok((bbox, ret))
}

fn single(u: &mut Unstructured<'_>) -> Result<IntSegment, arbitrary::Error> {
    let x0 = u.int_in_range(1..=CELL - 2)?;
    let x1 = u.int_in_range(x0 + 1..=CELL - 1)?;
    let y0 = u.int_in_range(1..=CELL - 1)?;
    let y1 = u.int_in_range(1..=CELL - 1)?;
    Ok(((x0, y0), (x1, y1)))
}

fn gcd(a: i32, b: i32) -> i32 {
    if b == 0 {
        a.abs()
    } else {
        gcd(b, a % b)
    }
}

// Segments sharing one endpoint, either their left endpoint or (if
// `reversed`) their right endpoint.
fn fan(
    u: &mut Unstructured<'_>,
    reversed: bool,
    out: &mut Vec<IntSegment>,
) -> Result<(), arbitrary::Error> {
    let cx = u.int_in_range(9..=CELL - 9)?;
    let cy = u.int_in_range(9..=CELL - 9)?;
    let count = u.int_in_range(1..=5)?;

    // Directions, reduced to lowest terms so that we can spot repeats.
    let mut dirs: Vec<(i32, i32)> = Vec::new();
    for _ in 0..count {
        let dx: i32 = u.int_in_range(1..=8)?;
        let dy: i32 = u.int_in_range(-8..=8)?;
        let g = gcd(dx, dy);
        let dir = (dx / g, dy / g);
        if !dirs.contains(&dir) {
            dirs.push(dir);
            let sign = if reversed { -1 } else { 1 };
            out.push(((cx, cy), (cx + sign * dx, cy + dy)));
        }
    }
    Ok(())
}

fn chain_xs(
    u: &mut Unstructured<'_>,
    start: i32,
    end: i32,
    max_len: usize,
) -> Result<Vec<i32>, arbitrary::Error> {
    let mut xs = Vec::new();
    let mut x = start;
    while xs.len() < max_len {
        x += u.int_in_range(1..=6)?;
        if x >= end {
            break;
        }
        xs.push(x);
    }
    Ok(xs)
}

// A polygon made of an upper and a lower chain, both monotone in x. All
// the vertices of the upper chain are strictly above the line between the
// polygon's leftmost and rightmost points, and all the vertices of the lower
// chain are strictly below it, so the chains only meet at their ends.
fn monotone_polygon(
    u: &mut Unstructured<'_>,
    out: &mut Vec<IntSegment>,
) -> Result<(), arbitrary::Error> {
    let xl = u.int_in_range(1..=8)?;
    let yl = u.int_in_range(9..=CELL - 9)?;
    let xr = xl + u.int_in_range(4..=22)?;
    let yr = u.int_in_range(9..=CELL - 9)?;
    let line = |x: i32| yl as f64 + (yr - yl) as f64 * (x - xl) as f64 / (xr - xl) as f64;

    let mut upper_xs = chain_xs(u, xl, xr, 4)?;
    let lower_xs = chain_xs(u, xl, xr, 4)?;
    if upper_xs.is_empty() && lower_xs.is_empty() {
        // Otherwise both chains would be the same segment.
        upper_xs.push(xl + 1);
    }

    let mut upper = vec![(xl, yl)];
    for x in upper_xs {
        let above = u.int_in_range(1..=8)?;
        upper.push((x, line(x).floor() as i32 + above));
    }
    upper.push((xr, yr));

    let mut lower = vec![(xl, yl)];
    for x in lower_xs {
        let below = u.int_in_range(1..=8)?;
        lower.push((x, line(x).ceil() as i32 - below));
    }
    lower.push((xr, yr));

    for chain in [upper, lower] {
        out.extend(chain.windows(2).map(|w| (w[0], w[1])));
    }
    Ok(())
}

// An open polyline, monotone in x.
fn polyline(
    u: &mut Unstructured<'_>,
    out: &mut Vec<IntSegment>,
) -> Result<(), arbitrary::Error> {
    let x0 = u.int_in_range(1..=4)?;
    let mut points = vec![(x0, u.int_in_range(1..=CELL - 1)?)];
    for x in chain_xs(u, x0, CELL, 6)? {
        points.push((x, u.int_in_range(1..=CELL - 1)?));
    }
    out.extend(points.windows(2).map(|w| (w[0], w[1])));
    Ok(())
}
