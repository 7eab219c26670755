//! Dense simplex tableau and pivot kernel.
//!
//! The tableau holds the constraint rows first and the objective row last;
//! the right-hand-side column is last. A basis maps each constraint row to
//! the column currently basic in it; after every pivot each basic column is
//! a unit vector to within tolerance.

use nalgebra::DMatrix;

use crate::problem::{Direction, Relation};

/// Fixed epsilon for pivot and ratio comparisons, independent of the
/// user-supplied tolerance.
pub const PIVOT_EPS: f64 = 1e-12;

/// Epsilon for near-zero classification outside the pivot loop.
pub const ZERO_EPS: f64 = 1e-9;

/// Placeholder basis entry for a row that has no basic column yet.
pub(crate) const NO_BASIS: usize = usize::MAX;

/// Where a tableau row came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOrigin {
    /// The i-th constraint of the model being solved.
    Constraint(usize),
    /// The implicit `x ≤ 1` row of a binary variable.
    BinaryBound(usize),
}

/// One canonicalized constraint row: sign-lowered coefficients over the
/// structural variables, non-negative right-hand side.
#[derive(Debug, Clone)]
pub(crate) struct CanonRow {
    pub coefs: Vec<f64>,
    pub relation: Relation,
    pub rhs: f64,
    pub origin: RowOrigin,
}

/// Canonical form of a model: rows with non-negative right-hand sides and
/// the objective in minimization form (the uniform pivot-rule convention).
#[derive(Debug, Clone)]
pub(crate) struct CanonicalForm {
    pub rows: Vec<CanonRow>,
    /// Objective in min-form over structural variables: direct coefficients
    /// when minimizing, negated when maximizing.
    pub obj_min: Vec<f64>,
    /// +1/−1 per structural variable (−1 for non-positive lowering).
    pub var_signs: Vec<f64>,
    pub direction: Direction,
    pub num_structural: usize,
}

/// Working tableau.
#[derive(Debug, Clone)]
pub(crate) struct Tableau {
    /// (rows + 1) × (cols + 1) matrix: constraint rows, then the objective
    /// row; the right-hand-side column last.
    pub m: DMatrix<f64>,

    /// Basic column per constraint row.
    pub basis: Vec<usize>,

    pub num_structural: usize,

    /// Slack/surplus column per row (None for equality rows).
    pub slack_cols: Vec<Option<usize>>,

    /// +1 for a slack, −1 for a surplus, 0 for none.
    pub slack_signs: Vec<f64>,

    /// Column range `[start, start + count)` of artificial columns.
    pub artificials: Option<(usize, usize)>,

    pub row_origins: Vec<RowOrigin>,
}

impl Tableau {
    /// Build a tableau from a canonical form.
    ///
    /// Appends a +1 slack column per ≤ row and a −1 surplus column per ≥
    /// row, then seats a starting basis: the slack for ≤ rows, otherwise
    /// any structural column that is a unit vector over the constraint
    /// rows. Rows left without a basic column are returned so the caller
    /// can decide between Phase I and a hard failure.
    pub fn build(form: &CanonicalForm) -> (Self, Vec<usize>) {
        let nrows = form.rows.len();
        let n = form.num_structural;
        let num_slack = form
            .rows
            .iter()
            .filter(|r| r.relation != Relation::Eq)
            .count();
        let ncols = n + num_slack + 1;

        let mut m = DMatrix::zeros(nrows + 1, ncols);
        let mut slack_cols = vec![None; nrows];
        let mut slack_signs = vec![0.0; nrows];

        let mut next_slack = n;
        for (i, row) in form.rows.iter().enumerate() {
            for (j, &a) in row.coefs.iter().enumerate() {
                m[(i, j)] = a;
            }
            match row.relation {
                Relation::Le => {
                    m[(i, next_slack)] = 1.0;
                    slack_cols[i] = Some(next_slack);
                    slack_signs[i] = 1.0;
                    next_slack += 1;
                }
                Relation::Ge => {
                    m[(i, next_slack)] = -1.0;
                    slack_cols[i] = Some(next_slack);
                    slack_signs[i] = -1.0;
                    next_slack += 1;
                }
                Relation::Eq => {}
            }
            m[(i, ncols - 1)] = row.rhs;
        }

        let mut tableau = Self {
            m,
            basis: vec![NO_BASIS; nrows],
            num_structural: n,
            slack_cols,
            slack_signs,
            artificials: None,
            row_origins: form.rows.iter().map(|r| r.origin).collect(),
        };

        for i in 0..nrows {
            if tableau.slack_signs[i] > 0.0 {
                tableau.basis[i] = tableau.slack_cols[i].unwrap();
            } else if let Some(j) = tableau.find_unit_column(i) {
                tableau.basis[i] = j;
            }
        }

        let missing: Vec<usize> = (0..nrows).filter(|&i| tableau.basis[i] == NO_BASIS).collect();
        (tableau, missing)
    }

    /// Find a structural column that is a unit vector with its 1 in row
    /// `row`, not already seated as another row's basis.
    fn find_unit_column(&self, row: usize) -> Option<usize> {
        'cols: for j in 0..self.num_structural {
            if self.basis.contains(&j) {
                continue;
            }
            if (self.m[(row, j)] - 1.0).abs() > ZERO_EPS {
                continue;
            }
            for i in 0..self.num_rows() {
                if i != row && self.m[(i, j)].abs() > PIVOT_EPS {
                    continue 'cols;
                }
            }
            return Some(j);
        }
        None
    }

    /// Number of constraint rows.
    pub fn num_rows(&self) -> usize {
        self.basis.len()
    }

    /// Index of the objective row.
    pub fn obj_row(&self) -> usize {
        self.num_rows()
    }

    /// Index of the right-hand-side column.
    pub fn rhs_col(&self) -> usize {
        self.m.ncols() - 1
    }

    /// Append one artificial unit column per listed row and seat it as
    /// that row's basis. Columns land just before the right-hand side.
    pub fn add_artificials(&mut self, rows: &[usize]) {
        let start = self.rhs_col();
        let count = rows.len();
        let m = std::mem::replace(&mut self.m, DMatrix::zeros(0, 0));
        self.m = m.insert_columns(start, count, 0.0);
        for (k, &i) in rows.iter().enumerate() {
            self.m[(i, start + k)] = 1.0;
            self.basis[i] = start + k;
        }
        self.artificials = Some((start, count));
    }

    /// Drop the artificial column block. Callers must have pivoted every
    /// artificial out of the basis (or dropped its row) first.
    pub fn remove_artificials(&mut self) {
        if let Some((start, count)) = self.artificials.take() {
            debug_assert!(self.basis.iter().all(|&b| b < start || b >= start + count));
            let m = std::mem::replace(&mut self.m, DMatrix::zeros(0, 0));
            self.m = m.remove_columns(start, count);
        }
    }

    /// Drop a redundant constraint row (and its basis entry).
    pub fn remove_row(&mut self, row: usize) {
        let m = std::mem::replace(&mut self.m, DMatrix::zeros(0, 0));
        self.m = m.remove_row(row);
        self.basis.remove(row);
        self.slack_cols.remove(row);
        self.slack_signs.remove(row);
        self.row_origins.remove(row);
    }

    /// Overwrite the objective row with min-form structural costs and a
    /// zero right-hand side, then price out the current basis.
    pub fn install_objective(&mut self, costs_min: &[f64]) {
        let obj = self.obj_row();
        for j in 0..self.m.ncols() {
            self.m[(obj, j)] = 0.0;
        }
        for (j, &c) in costs_min.iter().enumerate() {
            self.m[(obj, j)] = c;
        }
        self.price_out();
    }

    /// Phase-I objective: unit cost on every artificial column.
    pub fn install_phase1_objective(&mut self) {
        let (start, count) = self.artificials.expect("phase 1 without artificials");
        let obj = self.obj_row();
        for j in 0..self.m.ncols() {
            self.m[(obj, j)] = 0.0;
        }
        for j in start..start + count {
            self.m[(obj, j)] = 1.0;
        }
        self.price_out();
    }

    /// Zero the objective-row coefficient of every basic column by
    /// subtracting multiples of the basic rows.
    fn price_out(&mut self) {
        let obj = self.obj_row();
        for i in 0..self.num_rows() {
            let b = self.basis[i];
            let c = self.m[(obj, b)];
            if c.abs() > PIVOT_EPS {
                for j in 0..self.m.ncols() {
                    let v = self.m[(i, j)];
                    self.m[(obj, j)] -= c * v;
                }
            }
        }
    }

    /// Dantzig's rule: the column with the most negative objective-row
    /// coefficient below −ε, ties broken by first column scanned.
    pub fn entering_column(&self) -> Option<usize> {
        let obj = self.obj_row();
        let mut best: Option<(usize, f64)> = None;
        for j in 0..self.rhs_col() {
            let c = self.m[(obj, j)];
            if c < -PIVOT_EPS && best.map_or(true, |(_, bc)| c < bc) {
                best = Some((j, c));
            }
        }
        best.map(|(j, _)| j)
    }

    /// Minimum-ratio test over rows with a strictly positive coefficient
    /// in the entering column, ties broken by first row encountered.
    pub fn leaving_row(&self, entering: usize) -> Option<usize> {
        let rhs = self.rhs_col();
        let mut best: Option<(usize, f64)> = None;
        for i in 0..self.num_rows() {
            let a = self.m[(i, entering)];
            if a > PIVOT_EPS {
                let ratio = self.m[(i, rhs)] / a;
                if best.map_or(true, |(_, br)| ratio < br) {
                    best = Some((i, ratio));
                }
            }
        }
        best.map(|(i, _)| i)
    }

    /// Exchange the basis: normalize the pivot row and eliminate the
    /// entering column from every other row, objective row included.
    pub fn pivot(&mut self, row: usize, col: usize) {
        let p = self.m[(row, col)];
        debug_assert!(p.abs() > PIVOT_EPS, "near-zero pivot element");
        for j in 0..self.m.ncols() {
            self.m[(row, j)] /= p;
        }
        for i in 0..self.m.nrows() {
            if i == row {
                continue;
            }
            let factor = self.m[(i, col)];
            if factor.abs() > PIVOT_EPS {
                for j in 0..self.m.ncols() {
                    let v = self.m[(row, j)];
                    self.m[(i, j)] -= factor * v;
                }
            } else {
                self.m[(i, col)] = 0.0;
            }
        }
        self.basis[row] = col;
    }

    /// Current min-form objective value (negated objective-row RHS).
    pub fn min_objective(&self) -> f64 {
        -self.m[(self.obj_row(), self.rhs_col())]
    }

    /// Freeze the current state for downstream consumers.
    pub fn snapshot(&self, form: &CanonicalForm) -> TableauSnapshot {
        TableauSnapshot {
            matrix: self.m.clone(),
            basis: self.basis.clone(),
            num_structural: self.num_structural,
            row_origins: self.row_origins.clone(),
            slack_cols: self.slack_cols.clone(),
            slack_signs: self.slack_signs.clone(),
            var_signs: form.var_signs.clone(),
            direction: form.direction,
        }
    }
}

/// Frozen tableau + basis, returned inside a [`crate::SolveResult`].
///
/// Downstream layers (sensitivity, special-case analysis) run linear-algebra
/// queries against this snapshot; no further pivoting happens here.
#[derive(Debug, Clone)]
pub struct TableauSnapshot {
    /// Tableau matrix: constraint rows, then the objective row; the
    /// right-hand-side column last.
    pub matrix: DMatrix<f64>,

    /// Basic column per constraint row.
    pub basis: Vec<usize>,

    /// Number of structural columns.
    pub num_structural: usize,

    /// Origin of each surviving row.
    pub row_origins: Vec<RowOrigin>,

    /// Slack/surplus column per row (None for equality rows).
    pub slack_cols: Vec<Option<usize>>,

    /// +1 for a slack, −1 for a surplus, 0 for none.
    pub slack_signs: Vec<f64>,

    /// +1/−1 per structural variable (−1 for non-positive lowering).
    pub var_signs: Vec<f64>,

    /// Objective direction of the solved model.
    pub direction: Direction,
}

impl TableauSnapshot {
    /// Number of constraint rows.
    pub fn num_rows(&self) -> usize {
        self.basis.len()
    }

    /// Objective-row coefficient of a column (the reduced cost, in the
    /// uniform minimization convention).
    pub fn reduced_cost(&self, col: usize) -> f64 {
        self.matrix[(self.num_rows(), col)]
    }

    /// Right-hand side of a constraint row (the basic variable's value).
    pub fn rhs(&self, row: usize) -> f64 {
        self.matrix[(row, self.matrix.ncols() - 1)]
    }

    /// Row in which a column is basic, if any.
    pub fn basic_row(&self, col: usize) -> Option<usize> {
        self.basis.iter().position(|&b| b == col)
    }

    /// Columns eligible for pricing queries (everything but the RHS).
    pub fn num_cols(&self) -> usize {
        self.matrix.ncols() - 1
    }
}
