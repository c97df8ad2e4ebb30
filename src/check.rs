//! Structural consistency checks for a map and its DAG.

use crate::{
    dag::{Dag, Node, NodeIdx},
    map::TrapezoidalMap,
    trapezoid::TrapIdx,
};

/// A way in which a trapezoidal map (or its DAG) can be broken.
///
/// Nothing should ever produce one of these, unless the map was built from
/// crossing segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Corruption {
    /// A segment leaves a trapezoid through its right wall, but there's no
    /// neighbor on the other side.
    MissingNeighbor {
        /// The trapezoid with the missing neighbor.
        trapezoid: TrapIdx,
    },
    /// A trapezoid has a neighbor that's the freed slot, or out of bounds.
    FreedNeighbor {
        /// The live trapezoid.
        trapezoid: TrapIdx,
        /// Its dead neighbor.
        neighbor: TrapIdx,
    },
    /// A trapezoid's neighbor doesn't think of it as a neighbor.
    Asymmetric {
        /// The trapezoid.
        trapezoid: TrapIdx,
        /// The neighbor that doesn't point back.
        neighbor: TrapIdx,
    },
    /// A trapezoid's neighbor doesn't meet it at a wall, or doesn't share the
    /// boundary segment that it should.
    NotAdjacent {
        /// The trapezoid.
        trapezoid: TrapIdx,
        /// Its supposed neighbor.
        neighbor: TrapIdx,
    },
    /// Two neighboring trapezoids have the same top and bottom, so they
    /// should have been merged.
    Unmerged {
        /// The trapezoid on the left.
        left: TrapIdx,
        /// The trapezoid on the right.
        right: TrapIdx,
    },
    /// A trapezoid's DAG node isn't a leaf that refers back to it.
    BadBackReference {
        /// The trapezoid.
        trapezoid: TrapIdx,
    },
    /// A live trapezoid is referred to by more than one leaf.
    DuplicateLeaf {
        /// The trapezoid.
        trapezoid: TrapIdx,
    },
    /// A leaf refers to a trapezoid that isn't live.
    StaleLeaf {
        /// The leaf.
        node: NodeIdx,
    },
    /// The freed slot is out of bounds.
    BadFreedSlot {
        /// The freed slot.
        slot: TrapIdx,
    },
}

impl std::fmt::Display for Corruption {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Corruption::MissingNeighbor { trapezoid } => {
                write!(f, "{trapezoid} has no neighbor where one was expected")
            }
            Corruption::FreedNeighbor {
                trapezoid,
                neighbor,
            } => write!(f, "{trapezoid} has a dead neighbor {neighbor}"),
            Corruption::Asymmetric {
                trapezoid,
                neighbor,
            } => write!(f, "{neighbor} doesn't link back to {trapezoid}"),
            Corruption::NotAdjacent {
                trapezoid,
                neighbor,
            } => write!(f, "{trapezoid} and {neighbor} aren't adjacent"),
            Corruption::Unmerged { left, right } => {
                write!(f, "{left} and {right} should have been merged")
            }
            Corruption::BadBackReference { trapezoid } => {
                write!(f, "{trapezoid} doesn't point to its leaf")
            }
            Corruption::DuplicateLeaf { trapezoid } => {
                write!(f, "{trapezoid} has more than one leaf")
            }
            Corruption::StaleLeaf { node } => write!(f, "{node} refers to a dead trapezoid"),
            Corruption::BadFreedSlot { slot } => write!(f, "freed slot {slot} is out of bounds"),
        }
    }
}

impl std::error::Error for Corruption {}

/// Checks that the map and DAG are consistent with one another.
///
/// This checks that
/// - neighbor links are symmetric, point at live trapezoids, and connect
///   trapezoids that really are neighbors,
/// - no two neighbors could be merged,
/// - every live trapezoid has exactly one leaf, and knows where it is,
/// - no leaf refers to a dead trapezoid.
///
/// It's linear in the size of the map, and so it's too slow to run after
/// every insertion unless the `slow-asserts` feature is enabled.
pub fn check(map: &TrapezoidalMap, dag: &Dag) -> Result<(), Corruption> {
    if let Some(slot) = map.merged_slot() {
        if slot.0 >= map.num_trapezoids() {
            return Err(Corruption::BadFreedSlot { slot });
        }
    }

    for (idx, trap) in map.live_trapezoids() {
        if dag.get(trap.node) != Some(&Node::Leaf(idx)) {
            return Err(Corruption::BadBackReference { trapezoid: idx });
        }

        // For each neighbor: the neighbor, whether it's on the right, and
        // whether it shares our top (as opposed to our bottom).
        let neighbors = [
            (trap.upper_left, false, true),
            (trap.lower_left, false, false),
            (trap.upper_right, true, true),
            (trap.lower_right, true, false),
        ];
        for (nbr, on_right, upper) in neighbors {
            let Some(nbr) = nbr else {
                continue;
            };
            if !map.is_live(nbr) {
                return Err(Corruption::FreedNeighbor {
                    trapezoid: idx,
                    neighbor: nbr,
                });
            }
            let other = map.trapezoid(nbr);

            let back = match (on_right, upper) {
                (true, true) => other.upper_left,
                (true, false) => other.lower_left,
                (false, true) => other.upper_right,
                (false, false) => other.lower_right,
            };
            if back != Some(idx) {
                return Err(Corruption::Asymmetric {
                    trapezoid: idx,
                    neighbor: nbr,
                });
            }

            let wall_matches = if on_right {
                other.left_point == trap.right_point
            } else {
                other.right_point == trap.left_point
            };
            let boundary_matches = if upper {
                other.top == trap.top
            } else {
                other.bottom == trap.bottom
            };
            if !wall_matches || !boundary_matches {
                return Err(Corruption::NotAdjacent {
                    trapezoid: idx,
                    neighbor: nbr,
                });
            }

            if on_right && trap.same_boundaries(other) {
                return Err(Corruption::Unmerged {
                    left: idx,
                    right: nbr,
                });
            }
        }
    }

    let mut seen = vec![false; map.num_trapezoids()];
    for (node_idx, node) in dag.nodes() {
        if let Node::Leaf(trap) = *node {
            if !map.is_live(trap) {
                return Err(Corruption::StaleLeaf { node: node_idx });
            }
            if std::mem::replace(&mut seen[trap.0], true) {
                return Err(Corruption::DuplicateLeaf { trapezoid: trap });
            }
        }
    }
    // Every live trapezoid's back-reference was checked above, so every live
    // trapezoid has at least one leaf.

    Ok(())
}
