//! Configuration settings for the MIP layer.

use simplex_core::SolverOptions;

/// MIP solver settings.
///
/// The node, depth and cut-round caps are heuristic safety limits, not
/// derived from problem size.
#[derive(Debug, Clone)]
pub struct MipSettings {
    /// Maximum branch-and-bound nodes to explore.
    pub max_nodes: u64,

    /// Maximum node depth; deeper nodes are fathomed.
    pub max_depth: usize,

    /// Maximum cutting-plane refinement rounds.
    pub max_cut_rounds: usize,

    /// Deadline in milliseconds, checked once per search node or cut
    /// round (None = no limit).
    pub time_limit_ms: Option<u64>,

    /// Integer feasibility tolerance: a value is integral when its
    /// fractional distance is at most this.
    pub int_tol: f64,

    /// Minimum strict improvement for incumbent replacement and the
    /// bound-domination test.
    pub improvement_tol: f64,

    /// Options passed to every relaxation solve.
    pub relaxation: SolverOptions,

    /// Print progress information.
    pub verbose: bool,

    /// Log frequency (print every N nodes).
    pub log_freq: u64,
}

impl Default for MipSettings {
    fn default() -> Self {
        Self {
            max_nodes: 100,
            max_depth: 10,
            max_cut_rounds: 50,
            time_limit_ms: None,
            int_tol: 1e-6,
            improvement_tol: 1e-9,
            relaxation: SolverOptions::default(),
            verbose: false,
            log_freq: 10,
        }
    }
}

impl MipSettings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        let mut s = Self::default();
        s.verbose = true;
        s.log_freq = 1;
        s
    }

    /// Set the node cap.
    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Set the depth cap.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the cut-round cap.
    pub fn with_max_cut_rounds(mut self, rounds: usize) -> Self {
        self.max_cut_rounds = rounds;
        self
    }

    /// Set the deadline in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_ms = Some((seconds * 1000.0) as u64);
        self
    }
}
