//! Fast Approximate Quadratic assignment (FAQ)
//!
//! Graph matching as a quadratic assignment problem:
//!
//! min_{P ∈ Π_n} ‖A − P B Pᵀ‖²_F  ⇔  max_{P ∈ Π_n} Σ_k tr(A_kᵀ P B_k Pᵀ)
//!
//! summed over attribute slices k.
//!
//! ## Algorithm (Vogelstein et al., 2015)
//!
//! 1. Relax Π_n to the Birkhoff polytope D_n of doubly-stochastic matrices
//! 2. Start from the barycenter J = 11ᵀ/n (or a randomized point of D_n)
//! 3. Frank-Wolfe: the gradient ∇ = Σ_k A_k P B_kᵀ + A_kᵀ P B_k is maximized
//!    over D_n by a linear assignment solve, giving a vertex Q
//! 4. Exact line search on the quadratic g(P + α(Q − P)), α ∈ [0, 1]
//! 5. Stop when ‖ΔP‖_F / √n < tolerance or the iteration/time budget is spent
//! 6. Round P to the nearest permutation with one more linear assignment
//!
//! ## Approximation
//!
//! The result is a LOCAL optimum. Different starts (`n_init`, randomized
//! initialization, seeds) may return different permutations and therefore
//! different distances. Running out of budget is not an error: the rounding
//! of the current iterate is returned and `converged` is false.

use super::assignment::{HungarianSolver, LinearAssignment};
use super::{check_compatible, GraphMatcher};
use crate::error::{GraphSpaceError, Result};
use crate::graph::AttributedGraph;
use crate::permutation::Permutation;
use crate::utils::{frobenius_inner, EPS};
use ndarray::{Array2, ArrayView2};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Starting point of the relaxed problem
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FaqInit {
    /// Barycenter J = 11ᵀ/n of the Birkhoff polytope; deterministic
    #[default]
    Barycenter,
    /// (J + K) / 2 with K a random doubly-stochastic matrix
    Randomized,
}

/// Configuration for the FAQ matcher
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqConfig {
    /// Maximum Frank-Wolfe iterations per start
    pub max_iterations: usize,
    /// Stop when ‖ΔP‖_F / √n falls below this
    pub tolerance: f64,
    /// Number of starts; the first uses `init`, later ones are randomized
    pub n_init: usize,
    /// Initialization of the first start
    pub init: FaqInit,
    /// Random seed for randomized starts
    pub seed: Option<u64>,
    /// Wall-clock budget shared by all starts
    pub time_budget: Option<Duration>,
}

impl Default for FaqConfig {
    fn default() -> Self {
        Self {
            max_iterations: 30,
            tolerance: 0.03,
            n_init: 1,
            init: FaqInit::Barycenter,
            seed: None,
            time_budget: None,
        }
    }
}

impl FaqConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum iterations
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Set the number of starts
    pub fn with_n_init(mut self, n_init: usize) -> Self {
        self.n_init = n_init;
        self
    }

    /// Set the initialization of the first start
    pub fn with_init(mut self, init: FaqInit) -> Self {
        self.init = init;
        self
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the wall-clock budget
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.time_budget = Some(budget);
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(GraphSpaceError::invalid_parameter(
                "max_iterations",
                "must be > 0",
            ));
        }
        if !(self.tolerance > 0.0) || !self.tolerance.is_finite() {
            return Err(GraphSpaceError::invalid_parameter(
                "tolerance",
                "must be finite and > 0",
            ));
        }
        if self.n_init == 0 {
            return Err(GraphSpaceError::invalid_parameter("n_init", "must be > 0"));
        }
        Ok(())
    }
}

/// Outcome of an FAQ solve
#[derive(Debug, Clone, PartialEq)]
pub struct FaqSolution {
    /// Permutation of the target's nodes
    pub permutation: Permutation,
    /// Alignment score Σ_k tr(A_kᵀ P B_k Pᵀ) of `permutation` (higher is better)
    pub objective: f64,
    /// Frank-Wolfe iterations spent by the retained start
    pub iterations: usize,
    /// Whether the retained start met the tolerance within its budget
    pub converged: bool,
}

/// FAQ graph matcher
#[derive(Debug, Clone)]
pub struct FaqMatcher<S = HungarianSolver> {
    config: FaqConfig,
    solver: S,
}

impl FaqMatcher<HungarianSolver> {
    /// Create a matcher with default configuration
    pub fn new() -> Self {
        Self {
            config: FaqConfig::default(),
            solver: HungarianSolver,
        }
    }

    /// Create from configuration
    pub fn from_config(config: FaqConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            solver: HungarianSolver,
        })
    }
}

impl Default for FaqMatcher<HungarianSolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: LinearAssignment> FaqMatcher<S> {
    /// Swap the linear assignment backend
    pub fn with_solver<T: LinearAssignment>(self, solver: T) -> FaqMatcher<T> {
        FaqMatcher {
            config: self.config,
            solver,
        }
    }

    /// Set random seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Get configuration
    pub fn config(&self) -> &FaqConfig {
        &self.config
    }

    /// Align `target` to `reference`, reporting solver diagnostics
    pub fn solve(
        &self,
        reference: &AttributedGraph,
        target: &AttributedGraph,
    ) -> Result<FaqSolution> {
        let mut rng = match self.config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        self.solve_with_rng(reference, target, &mut rng)
    }

    /// Like [`solve`](Self::solve), drawing randomized starts from `rng`
    /// instead of the configured seed
    pub fn solve_with_rng<R: Rng + ?Sized>(
        &self,
        reference: &AttributedGraph,
        target: &AttributedGraph,
        rng: &mut R,
    ) -> Result<FaqSolution> {
        let n = check_compatible(reference, target)?;

        if n <= 1 {
            let permutation = Permutation::identity(n);
            let objective = alignment_score(reference, target, &permutation)?;
            return Ok(FaqSolution {
                permutation,
                objective,
                iterations: 0,
                converged: true,
            });
        }

        let a: Vec<ArrayView2<'_, f64>> = (0..reference.depth())
            .map(|k| reference.attribute_slice(k))
            .collect();
        let b: Vec<ArrayView2<'_, f64>> = (0..target.depth())
            .map(|k| target.attribute_slice(k))
            .collect();

        let started = Instant::now();

        let mut best: Option<FaqSolution> = None;
        for start in 0..self.config.n_init {
            let init = if start == 0 {
                self.config.init
            } else {
                FaqInit::Randomized
            };
            let p0 = initial_plan(n, init, rng);
            let (permutation, iterations, converged) = self.frank_wolfe(&a, &b, p0, started)?;
            let objective = alignment_score(reference, target, &permutation)?;

            trace!(start, objective, iterations, converged, "FAQ start finished");

            let improves = best
                .as_ref()
                .map_or(true, |current| objective > current.objective);
            if improves {
                best = Some(FaqSolution {
                    permutation,
                    objective,
                    iterations,
                    converged,
                });
            }

            if self.budget_spent(started) {
                break;
            }
        }

        // n_init >= 1 is validated, so at least one start ran
        let solution = best.ok_or_else(|| GraphSpaceError::invalid_parameter("n_init", "must be > 0"))?;

        debug!(
            n_nodes = n,
            iterations = solution.iterations,
            objective = solution.objective,
            converged = solution.converged,
            "FAQ matching finished"
        );

        Ok(solution)
    }

    fn budget_spent(&self, started: Instant) -> bool {
        self.config
            .time_budget
            .map_or(false, |budget| started.elapsed() >= budget)
    }

    /// Frank-Wolfe descent from `p`, then rounding to a permutation
    fn frank_wolfe(
        &self,
        a: &[ArrayView2<'_, f64>],
        b: &[ArrayView2<'_, f64>],
        mut p: Array2<f64>,
        started: Instant,
    ) -> Result<(Permutation, usize, bool)> {
        let n = p.nrows();
        let sqrt_n = (n as f64).sqrt();
        let mut iterations = 0;
        let mut converged = false;

        for iter in 0..self.config.max_iterations {
            if self.budget_spent(started) {
                debug!(iterations, "FAQ time budget spent, rounding current iterate");
                break;
            }
            iterations = iter + 1;

            let grad = gradient(a, b, &p);
            let vertex = self.solver.solve((-&grad).view())?;
            let direction = &vertex.to_matrix() - &p;

            let (quadratic, linear) = line_coefficients(a, b, &p, &direction);
            let alpha = step_size(quadratic, linear);

            let step = direction * alpha;
            let change = step.iter().map(|&x| x * x).sum::<f64>().sqrt() / sqrt_n;
            p += &step;

            trace!(iteration = iterations, alpha, change, "FAQ iteration");

            if change < self.config.tolerance {
                converged = true;
                break;
            }
        }

        // Nearest permutation: maximize ⟨P, Q⟩
        let permutation = self.solver.solve((-&p).view())?;
        Ok((permutation, iterations, converged))
    }
}

impl<S: LinearAssignment> GraphMatcher for FaqMatcher<S> {
    fn match_graphs(
        &self,
        reference: &AttributedGraph,
        target: &AttributedGraph,
    ) -> Result<Permutation> {
        Ok(self.solve(reference, target)?.permutation)
    }

    fn is_exact(&self) -> bool {
        false
    }
}

/// Σ_k ⟨A_k, σ·B_k⟩ for a candidate permutation
pub(crate) fn alignment_score(
    reference: &AttributedGraph,
    target: &AttributedGraph,
    permutation: &Permutation,
) -> Result<f64> {
    let aligned = target.permuted(permutation)?;
    Ok(reference
        .flat()
        .iter()
        .zip(aligned.flat().iter())
        .map(|(&x, &y)| x * y)
        .sum())
}

/// ∇_P Σ_k tr(A_kᵀ P B_k Pᵀ) = Σ_k A_k P B_kᵀ + A_kᵀ P B_k
fn gradient(a: &[ArrayView2<'_, f64>], b: &[ArrayView2<'_, f64>], p: &Array2<f64>) -> Array2<f64> {
    let n = p.nrows();
    let mut grad = Array2::zeros((n, n));
    for (a_k, b_k) in a.iter().zip(b.iter()) {
        grad += &a_k.dot(p).dot(&b_k.t());
        grad += &a_k.t().dot(p).dot(b_k);
    }
    grad
}

/// Coefficients of g(P + αR) − g(P) = quadratic·α² + linear·α
fn line_coefficients(
    a: &[ArrayView2<'_, f64>],
    b: &[ArrayView2<'_, f64>],
    p: &Array2<f64>,
    r: &Array2<f64>,
) -> (f64, f64) {
    let mut quadratic = 0.0;
    let mut linear = 0.0;
    for (a_k, b_k) in a.iter().zip(b.iter()) {
        let rb = r.dot(b_k);
        let pb = p.dot(b_k);
        quadratic += frobenius_inner(a_k.view(), rb.dot(&r.t()).view());
        let cross = rb.dot(&p.t()) + pb.dot(&r.t());
        linear += frobenius_inner(a_k.view(), cross.view());
    }
    (quadratic, linear)
}

/// Maximizer of quadratic·α² + linear·α over α ∈ [0, 1]
fn step_size(quadratic: f64, linear: f64) -> f64 {
    if quadratic < -EPS {
        let vertex = -linear / (2.0 * quadratic);
        if (0.0..=1.0).contains(&vertex) {
            return vertex;
        }
    }
    if quadratic + linear > 0.0 {
        1.0
    } else {
        0.0
    }
}

/// Starting point in the Birkhoff polytope
fn initial_plan<R: Rng + ?Sized>(n: usize, init: FaqInit, rng: &mut R) -> Array2<f64> {
    let barycenter = Array2::from_elem((n, n), 1.0 / n as f64);
    match init {
        FaqInit::Barycenter => barycenter,
        FaqInit::Randomized => {
            let random = Array2::from_shape_fn((n, n), |_| rng.gen::<f64>() + EPS);
            (barycenter + sinkhorn_balance(random)) * 0.5
        }
    }
}

/// Alternate row/column normalization until doubly stochastic
fn sinkhorn_balance(mut k: Array2<f64>) -> Array2<f64> {
    const MAX_ROUNDS: usize = 1000;
    const TOL: f64 = 1e-9;

    for _ in 0..MAX_ROUNDS {
        for mut row in k.rows_mut() {
            let sum = row.sum();
            row /= sum;
        }
        for mut col in k.columns_mut() {
            let sum = col.sum();
            col /= sum;
        }
        let worst_row = k
            .rows()
            .into_iter()
            .map(|row| (row.sum() - 1.0).abs())
            .fold(0.0, f64::max);
        if worst_row < TOL {
            break;
        }
    }
    k
}
