//! Search node representation.

use simplex_core::{Constraint, Direction};

/// Terminal classification of a processed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Node is waiting for its relaxation solve.
    Pending,

    /// Relaxation was infeasible, unbounded, iteration-limited, or failed.
    FathomedRelaxation,

    /// Dominated by the incumbent bound.
    FathomedBound,

    /// Fathomed by the depth cap.
    FathomedDepth,

    /// Produced an integer-feasible candidate.
    IntegerFeasible,

    /// Fractional: children were created.
    Branched,
}

/// A node in the branch-and-bound tree.
///
/// A node does not clone the model; it carries only the branch constraints
/// accumulated from the root (its overlay). The relaxation is materialized
/// once, when the node is processed, as base model + overlay.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// Unique node identifier.
    pub id: u64,

    /// Parent node ID (None for root).
    pub parent_id: Option<u64>,

    /// Depth in the tree (0 for root).
    pub depth: usize,

    /// Branch constraints accumulated from the root.
    pub branches: Vec<Constraint>,

    /// The parent relaxation's objective: the most optimistic value any
    /// descendant can reach.
    pub bound: f64,

    /// Processing status.
    pub status: NodeStatus,
}

impl SearchNode {
    /// Create the root node; its bound is the best value expressible for
    /// the direction so it is explored first.
    pub fn root(direction: Direction) -> Self {
        let bound = match direction {
            Direction::Maximize => f64::INFINITY,
            Direction::Minimize => f64::NEG_INFINITY,
        };
        Self {
            id: 0,
            parent_id: None,
            depth: 0,
            branches: Vec::new(),
            bound,
            status: NodeStatus::Pending,
        }
    }

    /// Create a child carrying one extra branch constraint and the parent
    /// relaxation's objective as its bound.
    pub fn child(&self, id: u64, branch: Constraint, bound: f64) -> Self {
        let mut branches = self.branches.clone();
        branches.push(branch);
        Self {
            id,
            parent_id: Some(self.id),
            depth: self.depth + 1,
            branches,
            bound,
            status: NodeStatus::Pending,
        }
    }

    /// Whether this node's bound cannot strictly beat the incumbent.
    pub fn can_prune(&self, incumbent: f64, direction: Direction, tol: f64) -> bool {
        match direction {
            Direction::Maximize => self.bound <= incumbent + tol,
            Direction::Minimize => self.bound >= incumbent - tol,
        }
    }
}
