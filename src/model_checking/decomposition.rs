use ndarray::Array1;

use super::cancel::CancelToken;
use super::combinations::select_tuples;
use super::error::StrategyError;
use super::lp::{BetaProgram, LpError, LpSolver};
use super::polytope::GeneratorSet;

/// Convex weights over a tuple of corners. `generators[i]` indexes the
/// generator set the decomposition was computed against.
#[derive(Debug, Clone, PartialEq)]
pub struct Decomposition {
    pub coefficients: Vec<f64>,
    pub generators: Vec<usize>,
}

impl Decomposition {
    pub fn support(&self) -> usize {
        self.generators.len()
    }

    /// (corner index, β) pairs in tuple order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.generators
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
    }
}

/// Columns are the corners of `tuple`, one row per objective.
pub fn beta_program(bound: &Array1<f64>, generators: &GeneratorSet, tuple: &[usize]) -> BetaProgram {
    let rows = (0..bound.len())
        .map(|k| tuple.iter().map(|i| generators.corner(*i)[k]).collect())
        .collect();
    BetaProgram::single_block(rows, bound.to_vec())
}

/// Searches support sizes 1..=max_support, and the tuples of each size in
/// enumeration order, for β >= 0 with Σβ <= 1 and Σ β_i g_i >= bound.
/// The first feasible tuple is returned.
pub fn decompose<S: LpSolver + ?Sized>(
    solver: &S,
    bound: &Array1<f64>,
    generators: &GeneratorSet,
    max_support: usize,
    cancel: &CancelToken,
) -> Result<Decomposition, StrategyError> {
    for l in 1..=max_support {
        for tuple in select_tuples(generators.len(), l) {
            cancel.check()?;
            let program = beta_program(bound, generators, &tuple);
            match solver.maximise(&program) {
                Ok(beta) => {
                    return Ok(Decomposition {
                        coefficients: beta,
                        generators: tuple,
                    })
                }
                Err(LpError::Infeasible) => continue,
                Err(LpError::NonFinite) => {
                    return Err(StrategyError::NonFinite {
                        bounds: program.bounds,
                        coefficients: program.rows,
                    })
                }
                Err(LpError::Unbounded) => {
                    return Err(StrategyError::Unbounded {
                        bounds: program.bounds,
                        coefficients: program.rows,
                    })
                }
            }
        }
    }
    Err(StrategyError::not_realizable(bound.as_slice().unwrap_or(&[])))
}
