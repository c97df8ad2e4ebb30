//! The search structure for point location.
//!
//! The DAG has three kinds of nodes: point nodes split the plane by a
//! vertical line through a point, segment nodes split it by the line through
//! a segment, and leaves each refer to a single trapezoid of the map. Every
//! live trapezoid has exactly one leaf, and the trapezoid remembers where that
//! leaf is so that the leaf can be replaced when the trapezoid gets split.

use crate::{
    map::{PointIdx, SegIdx},
    trapezoid::TrapIdx,
};

/// An index into the nodes of a [`Dag`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct NodeIdx(pub usize);

impl NodeIdx {
    /// A placeholder for trapezoids whose leaf hasn't been created yet.
    pub(crate) const UNSET: NodeIdx = NodeIdx(usize::MAX);
}

/// A vector of DAG nodes, indexed by [`NodeIdx`].
#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct NodeVec<T> {
    inner: Vec<T>,
}

impl_typed_vec!(NodeVec, NodeIdx, "n");

/// A node in the search DAG.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Node {
    /// A test against the vertical line through a point.
    Point {
        /// The point that's tested against.
        point: PointIdx,
        /// Where to go if the query is to the left of `point`.
        left: NodeIdx,
        /// Where to go if the query is at `point` or to its right.
        right: NodeIdx,
    },
    /// A test against the line through a segment.
    Segment {
        /// The segment that's tested against.
        segment: SegIdx,
        /// Where to go if the query is above the segment.
        left: NodeIdx,
        /// Where to go if the query is on or below the segment.
        right: NodeIdx,
    },
    /// A trapezoid of the map.
    Leaf(TrapIdx),
}

/// Node counts by kind. See [`Dag::node_counts`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NodeCounts {
    /// The number of point nodes.
    pub points: usize,
    /// The number of segment nodes.
    pub segments: usize,
    /// The number of leaves.
    pub leaves: usize,
}

/// The point-location DAG.
///
/// The root is always at index zero. A new DAG is a single leaf referring to
/// trapezoid zero, which is the bounding box of a fresh map.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Dag {
    nodes: NodeVec<Node>,
}

impl Default for Dag {
    fn default() -> Self {
        Self::new()
    }
}

impl Dag {
    /// The index of the root node.
    pub const ROOT: NodeIdx = NodeIdx(0);

    /// Creates a DAG with a single leaf for the bounding-box trapezoid.
    pub fn new() -> Self {
        let mut nodes = NodeVec::default();
        nodes.push(Node::Leaf(TrapIdx(0)));
        Dag { nodes }
    }

    /// The root node.
    pub fn root(&self) -> &Node {
        &self.nodes[Self::ROOT]
    }

    /// Returns the node at `idx`, if there is one.
    pub fn get(&self, idx: NodeIdx) -> Option<&Node> {
        self.nodes.get(idx)
    }

    /// The number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A DAG always has at least a root, so this is always false.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes and their indices.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIdx, &Node)> + '_ {
        self.nodes.iter()
    }

    pub(crate) fn push(&mut self, node: Node) -> NodeIdx {
        self.nodes.push(node)
    }

    pub(crate) fn set(&mut self, idx: NodeIdx, node: Node) {
        self.nodes.set(idx, node);
    }

    pub(crate) fn reset(&mut self) {
        self.nodes.clear();
        self.nodes.push(Node::Leaf(TrapIdx(0)));
    }

    /// Counts the nodes of each kind.
    pub fn node_counts(&self) -> NodeCounts {
        let mut counts = NodeCounts::default();
        for (_, node) in self.nodes() {
            match node {
                Node::Point { .. } => counts.points += 1,
                Node::Segment { .. } => counts.segments += 1,
                Node::Leaf(_) => counts.leaves += 1,
            }
        }
        counts
    }

    /// The number of edges on the longest path from the root to a leaf.
    ///
    /// This bounds the number of tests that a point-location query can take.
    pub fn depth(&self) -> usize {
        // Depth of the subtree rooted at each node, filled in on the way back up.
        let mut depth: Vec<Option<usize>> = vec![None; self.len()];
        let mut stack = vec![Self::ROOT];

        while let Some(&idx) = stack.last() {
            if depth[idx.0].is_some() {
                stack.pop();
                continue;
            }
            match self.nodes[idx] {
                Node::Leaf(_) => {
                    depth[idx.0] = Some(0);
                    stack.pop();
                }
                Node::Point { left, right, .. } | Node::Segment { left, right, .. } => {
                    match (depth[left.0], depth[right.0]) {
                        (Some(l), Some(r)) => {
                            depth[idx.0] = Some(1 + l.max(r));
                            stack.pop();
                        }
                        (l, r) => {
                            if l.is_none() {
                                stack.push(left);
                            }
                            if r.is_none() {
                                stack.push(right);
                            }
                        }
                    }
                }
            }
        }

        depth[Self::ROOT.0].unwrap_or(0)
    }
}

impl std::ops::Index<NodeIdx> for Dag {
    type Output = Node;

    fn index(&self, index: NodeIdx) -> &Node {
        &self.nodes[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh() {
        let dag = Dag::new();
        assert_eq!(dag.len(), 1);
        assert_eq!(dag.root(), &Node::Leaf(TrapIdx(0)));
        assert_eq!(dag.depth(), 0);
        assert_eq!(
            dag.node_counts(),
            NodeCounts {
                points: 0,
                segments: 0,
                leaves: 1
            }
        );
    }

    #[test]
    fn shared_children() {
        // Two paths of different lengths lead to the same leaf.
        let mut dag = Dag::new();
        let a = dag.push(Node::Leaf(TrapIdx(1)));
        let b = dag.push(Node::Leaf(TrapIdx(2)));
        let seg = dag.push(Node::Segment {
            segment: SegIdx(0),
            left: a,
            right: b,
        });
        dag.set(
            Dag::ROOT,
            Node::Point {
                point: PointIdx(0),
                left: a,
                right: seg,
            },
        );
        assert_eq!(dag.depth(), 2);
        assert_eq!(
            dag.node_counts(),
            NodeCounts {
                points: 1,
                segments: 1,
                leaves: 2
            }
        );

        dag.reset();
        assert_eq!(dag, Dag::new());
    }
}
