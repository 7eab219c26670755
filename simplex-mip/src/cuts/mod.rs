//! Iterative cutting-plane refinement.
//!
//! The orchestrator re-solves a progressively tightened relaxation,
//! injecting one bound cut per round for the most fractional integer
//! variable, with key-based de-duplication and a rounding fallback once
//! no unused cut remains.

mod generate;
mod pool;

pub use generate::{cut_for, Cut, CutKey, CutSide};
pub use pool::CutPool;

use simplex_core::{solve, Model, SolveStatus};

use crate::error::MipResult;
use crate::problem::{MipProblem, MipSolution, MipStatus};
use crate::settings::MipSettings;

/// Cutting-plane orchestrator.
pub struct CuttingPlane {
    problem: MipProblem,
    settings: MipSettings,
    pool: CutPool,
    cuts_added: u64,
}

impl CuttingPlane {
    /// Create an orchestrator for a model.
    pub fn new(model: Model, settings: MipSettings) -> MipResult<Self> {
        Ok(Self {
            problem: MipProblem::new(model)?,
            settings,
            pool: CutPool::new(),
            cuts_added: 0,
        })
    }

    /// Run the refine-and-resolve loop.
    pub fn solve(mut self) -> MipSolution {
        let started = std::time::Instant::now();
        let mut current = self.problem.base.clone();
        let mut rounds: u64 = 0;

        // The deadline is evaluated once per round.
        while rounds < self.settings.max_cut_rounds as u64 {
            if self
                .settings
                .time_limit_ms
                .is_some_and(|limit| started.elapsed().as_millis() as u64 >= limit)
            {
                break;
            }
            rounds += 1;
            let result = match solve(&current, &self.settings.relaxation) {
                Ok(result) => result,
                Err(err) => {
                    log::warn!("round {rounds}: relaxation solve failed: {err}");
                    return self.terminal(MipStatus::Error, rounds);
                }
            };

            match result.status {
                SolveStatus::Infeasible => {
                    return self.terminal(MipStatus::Infeasible, rounds);
                }
                SolveStatus::Unbounded => {
                    return self.terminal(MipStatus::Unbounded, rounds);
                }
                SolveStatus::IterationLimit | SolveStatus::Error => {
                    return self.terminal(MipStatus::Error, rounds);
                }
                SolveStatus::Optimal => {}
            }

            let mut fractional = self
                .problem
                .fractional_vars(&result.assignment, self.settings.int_tol);
            if fractional.is_empty() {
                return MipSolution {
                    status: MipStatus::Optimal,
                    objective: result.objective,
                    assignment: result.assignment,
                    nodes_explored: rounds,
                    cuts_added: self.cuts_added,
                    truncated: false,
                };
            }

            // Most fractional first; the stable sort keeps index order on
            // ties.
            fractional.sort_by(|a, b| b.distance.partial_cmp(&a.distance).unwrap());

            let mut added = false;
            for f in &fractional {
                let cut = cut_for(&self.problem, f.var, f.value);
                if self.pool.try_register(cut.key) {
                    if self.settings.verbose {
                        log::info!(
                            "round {rounds}: cut {} for x{} at {:.4}",
                            cut.constraint.relation,
                            f.var,
                            f.value
                        );
                    }
                    current = current.with_constraints(std::slice::from_ref(&cut.constraint));
                    self.cuts_added += 1;
                    added = true;
                    break;
                }
            }

            if !added {
                return self.fallback_rounding(&result.assignment, rounds);
            }
        }

        // Round cap exhausted with fractional variables left: truncated,
        // nothing proven.
        let mut solution = self.terminal(MipStatus::SearchLimit, rounds);
        solution.truncated = true;
        solution
    }

    /// Last resort once every candidate cut is a duplicate: round the
    /// relaxed point and accept it only if it satisfies every original
    /// constraint.
    fn fallback_rounding(&self, relaxed: &[f64], rounds: u64) -> MipSolution {
        let mut x = relaxed.to_vec();
        self.problem.round_integers(&mut x);

        if self.problem.base.is_feasible(&x, self.settings.relaxation.tolerance) {
            let objective = self.problem.base.objective_at(&x);
            MipSolution {
                status: MipStatus::Optimal,
                objective,
                assignment: x,
                nodes_explored: rounds,
                cuts_added: self.cuts_added,
                truncated: false,
            }
        } else {
            log::debug!("rounded point violates the original constraints");
            self.terminal(MipStatus::Infeasible, rounds)
        }
    }

    fn terminal(&self, status: MipStatus, rounds: u64) -> MipSolution {
        MipSolution {
            nodes_explored: rounds,
            cuts_added: self.cuts_added,
            ..MipSolution::without_solution(status)
        }
    }
}
