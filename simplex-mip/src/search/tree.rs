//! Branch-and-bound tree controller.

use std::time::Instant;

use simplex_core::{solve, Model, SolveStatus};

use super::{select_branching, NodeQueue, NodeStatus, SearchNode};
use crate::problem::{IncumbentTracker, MipProblem, MipSolution, MipStatus};
use crate::settings::MipSettings;

/// Branch-and-bound orchestrator.
///
/// Drives a best-first tree of relaxations derived from the shared base
/// model; each node's relaxation is solved through the simplex engine and
/// the node is branched, fathomed, or accepted as a candidate.
pub struct BranchAndBound {
    problem: MipProblem,
    settings: MipSettings,

    queue: NodeQueue,
    incumbent: IncumbentTracker,

    /// Next node ID to assign (0 is the root).
    next_node_id: u64,
    nodes_explored: u64,
    nodes_pruned: u64,

    /// Set when a depth or node cap cut the search short.
    truncated: bool,
}

impl BranchAndBound {
    /// Create a controller for a model.
    pub fn new(model: Model, settings: MipSettings) -> crate::error::MipResult<Self> {
        let problem = MipProblem::new(model)?;
        let direction = problem.base.direction;
        Ok(Self {
            problem,
            settings,
            queue: NodeQueue::new(direction),
            incumbent: IncumbentTracker::new(direction),
            next_node_id: 1,
            nodes_explored: 0,
            nodes_pruned: 0,
            truncated: false,
        })
    }

    /// Run the search to completion.
    pub fn solve(mut self) -> MipSolution {
        let started = Instant::now();
        self.queue.push(SearchNode::root(self.problem.base.direction));

        // The deadline is evaluated once per node.
        while let Some(node) = self.queue.pop() {
            if self.nodes_explored >= self.settings.max_nodes
                || self.deadline_exceeded(started)
            {
                self.truncated = true;
                break;
            }
            self.nodes_explored += 1;
            self.process(node);
            self.log_progress();
        }

        self.finalize()
    }

    fn deadline_exceeded(&self, started: Instant) -> bool {
        self.settings
            .time_limit_ms
            .is_some_and(|limit| started.elapsed().as_millis() as u64 >= limit)
    }

    fn process(&mut self, mut node: SearchNode) {
        let tol = self.settings.improvement_tol;
        let direction = self.problem.base.direction;

        if node.depth > self.settings.max_depth {
            node.status = NodeStatus::FathomedDepth;
            self.truncated = true;
            self.nodes_pruned += 1;
            return;
        }

        // The incumbent may have improved since this node was queued.
        if self.incumbent.has_incumbent()
            && node.can_prune(self.incumbent.objective, direction, tol)
        {
            node.status = NodeStatus::FathomedBound;
            self.nodes_pruned += 1;
            return;
        }

        let relaxation = self.problem.base.with_constraints(&node.branches);
        let result = match solve(&relaxation, &self.settings.relaxation) {
            Ok(result) => result,
            Err(err) => {
                // A broken relaxation fathoms this node only.
                log::warn!("node {}: relaxation solve failed: {err}", node.id);
                node.status = NodeStatus::FathomedRelaxation;
                self.nodes_pruned += 1;
                return;
            }
        };

        match result.status {
            SolveStatus::Infeasible
            | SolveStatus::Unbounded
            | SolveStatus::IterationLimit
            | SolveStatus::Error => {
                node.status = NodeStatus::FathomedRelaxation;
                self.nodes_pruned += 1;
            }
            SolveStatus::Optimal => {
                if self.incumbent.has_incumbent()
                    && !self.incumbent.improves(result.objective, tol)
                {
                    node.status = NodeStatus::FathomedBound;
                    self.nodes_pruned += 1;
                    return;
                }

                match select_branching(&self.problem, &result.assignment, self.settings.int_tol) {
                    None => {
                        // Integer-feasible candidate; fathomed either way.
                        node.status = NodeStatus::IntegerFeasible;
                        if self.incumbent.update(&result.assignment, result.objective, tol) {
                            let pruned =
                                self.queue.prune_by_bound(self.incumbent.objective, tol);
                            self.nodes_pruned += pruned as u64;
                            if self.settings.verbose {
                                log::info!(
                                    "new incumbent: obj={:.6e}, pruned {} nodes",
                                    self.incumbent.objective,
                                    pruned
                                );
                            }
                        }
                    }
                    Some(decision) => {
                        node.status = NodeStatus::Branched;
                        let down_id = self.next_node_id;
                        let up_id = self.next_node_id + 1;
                        self.next_node_id += 2;
                        self.queue
                            .push(node.child(down_id, decision.down, result.objective));
                        self.queue
                            .push(node.child(up_id, decision.up, result.objective));
                    }
                }
            }
        }
    }

    fn finalize(self) -> MipSolution {
        let status = if self.incumbent.has_incumbent() {
            MipStatus::Optimal
        } else if self.truncated {
            // The caps cut the search short before any integer point was
            // found: nothing is proven.
            MipStatus::SearchLimit
        } else {
            MipStatus::Infeasible
        };

        MipSolution {
            status,
            assignment: self.incumbent.solution.clone().unwrap_or_default(),
            objective: if self.incumbent.has_incumbent() {
                self.incumbent.objective
            } else {
                f64::NAN
            },
            nodes_explored: self.nodes_explored,
            cuts_added: 0,
            truncated: self.truncated,
        }
    }

    fn log_progress(&self) {
        if !self.settings.verbose || self.nodes_explored % self.settings.log_freq != 0 {
            return;
        }
        log::info!(
            "nodes: {} ({} open, {} pruned) | incumbent: {:.6e}",
            self.nodes_explored,
            self.queue.len(),
            self.nodes_pruned,
            self.incumbent.objective,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplex_core::{Constraint, Direction, Relation, VarKind};

    fn binary_model(objective: Vec<f64>, weights: Vec<f64>, capacity: f64) -> Model {
        let n = objective.len();
        let mut model = Model::new(
            Direction::Maximize,
            objective,
            vec![Constraint::new(weights, Relation::Le, capacity)],
        );
        model.var_kinds = vec![VarKind::Binary; n];
        model
    }

    #[test]
    fn test_small_knapsack() {
        // max 5a + 4b + 3c s.t. 2a + 3b + c <= 4: optimum {a, c} = 8.
        let model = binary_model(vec![5.0, 4.0, 3.0], vec![2.0, 3.0, 1.0], 4.0);
        let solution = BranchAndBound::new(model, MipSettings::default())
            .unwrap()
            .solve();

        assert_eq!(solution.status, MipStatus::Optimal);
        assert!((solution.objective - 8.0).abs() < 1e-9);
        assert_eq!(solution.assignment, vec![1.0, 0.0, 1.0]);
        assert!(!solution.truncated);
    }

    #[test]
    fn test_integer_branching() {
        // max x + y s.t. 2x + 3y <= 12, x <= 4.4, integers: optimum 5.
        let mut model = Model::new(
            Direction::Maximize,
            vec![1.0, 1.0],
            vec![
                Constraint::new(vec![2.0, 3.0], Relation::Le, 12.0),
                Constraint::new(vec![1.0, 0.0], Relation::Le, 4.4),
            ],
        );
        model.var_kinds = vec![VarKind::Integer, VarKind::Integer];
        let solution = BranchAndBound::new(model, MipSettings::default())
            .unwrap()
            .solve();

        assert_eq!(solution.status, MipStatus::Optimal);
        assert!((solution.objective - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_integer_point_is_proven_infeasible() {
        // 0.4 <= x <= 0.6 with x integer has no feasible point.
        let mut model = Model::new(
            Direction::Maximize,
            vec![1.0],
            vec![
                Constraint::new(vec![1.0], Relation::Ge, 0.4),
                Constraint::new(vec![1.0], Relation::Le, 0.6),
            ],
        );
        model.var_kinds = vec![VarKind::Integer];
        let solution = BranchAndBound::new(model, MipSettings::default())
            .unwrap()
            .solve();

        assert_eq!(solution.status, MipStatus::Infeasible);
        assert!(!solution.truncated);
    }

    #[test]
    fn test_node_cap_reports_search_limit() {
        let model = binary_model(vec![5.0, 4.0, 3.0], vec![2.0, 3.0, 1.0], 4.0);
        let settings = MipSettings::default().with_max_nodes(1);
        let solution = BranchAndBound::new(model, settings).unwrap().solve();

        // One node only explores the fractional root: no incumbent.
        assert_eq!(solution.status, MipStatus::SearchLimit);
        assert!(solution.truncated);
        assert!(solution.objective.is_nan());
    }
}
