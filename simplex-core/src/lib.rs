//! simplex-core: a tableau simplex engine for linear programs.
//!
//! The engine solves one continuous relaxation to optimality,
//! infeasibility or unboundedness given an immutable [`Model`]:
//!
//! - **Two-phase tableau simplex** with Dantzig's entering rule and a
//!   first-row minimum-ratio tie-break ([`solve`]).
//! - **Special-case analysis**: pre-pivot infeasibility checks, a Phase-I
//!   feasibility probe through the same engine, unboundedness-ray
//!   reconstruction, degeneracy and multiple-optima detection
//!   ([`analysis`]).
//! - **Post-optimal sensitivity**: shadow prices, coefficient and
//!   right-hand-side ranges, dual construction against the frozen
//!   tableau snapshot ([`sensitivity`]).
//! - **Text loader** for the line-oriented model format ([`parse`]).
//!
//! Every solving outcome is surfaced through [`SolveStatus`]; only
//! structurally invalid models abort with a [`SolverError`]. The terminal
//! tableau travels inside the [`SolveResult`] as an explicit
//! [`TableauSnapshot`] value — there is no process-wide solver state, so
//! repeated solves of the same model are bit-for-bit identical.
//!
//! # Example
//!
//! ```
//! use simplex_core::{solve_default, Constraint, Direction, Model, Relation, SolveStatus};
//!
//! // max 3x + 2y  s.t.  x + y <= 4,  x <= 2
//! let model = Model::new(
//!     Direction::Maximize,
//!     vec![3.0, 2.0],
//!     vec![
//!         Constraint::new(vec![1.0, 1.0], Relation::Le, 4.0),
//!         Constraint::new(vec![1.0, 0.0], Relation::Le, 2.0),
//!     ],
//! );
//!
//! let result = solve_default(&model).unwrap();
//! assert_eq!(result.status, SolveStatus::Optimal);
//! assert!((result.objective - 10.0).abs() < 1e-9);
//! ```

#![warn(missing_docs)]

pub mod analysis;
mod engine;
mod error;
pub mod parse;
mod problem;
pub mod sensitivity;
mod tableau;

pub use engine::{solve, solve_default};
pub use error::{SolverError, SolverResult};
pub use problem::{
    Constraint, Direction, Model, Relation, SolveResult, SolveStatus, SolverOptions, VarKind,
};
pub use tableau::{RowOrigin, TableauSnapshot};
