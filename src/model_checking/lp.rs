use std::ops::Range;

use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};
use thiserror::Error;

/// The β linear program shared by the decomposition and successor searches:
///
/// maximise Σ β
/// s.t.     rows[k] · β >= bounds[k]   for every objective k
///          Σ_{i in block} β_i <= 1    for every block
///          β >= 0
#[derive(Debug, Clone, PartialEq)]
pub struct BetaProgram {
    pub rows: Vec<Vec<f64>>,
    pub bounds: Vec<f64>,
    pub blocks: Vec<Range<usize>>,
}

impl BetaProgram {
    pub fn single_block(rows: Vec<Vec<f64>>, bounds: Vec<f64>) -> BetaProgram {
        let num_vars = rows.first().map(|r| r.len()).unwrap_or(0);
        BetaProgram {
            rows,
            bounds,
            blocks: vec![0..num_vars],
        }
    }

    pub fn num_vars(&self) -> usize {
        self.blocks.iter().map(|b| b.end).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LpError {
    #[error("linear program infeasible")]
    Infeasible,
    #[error("linear program unbounded")]
    Unbounded,
    #[error("linear program solution is not finite")]
    NonFinite,
}

/// Rejects NaN or infinite values, clamping round-off below zero.
pub fn finite_solution(values: Vec<f64>) -> Result<Vec<f64>, LpError> {
    if values.iter().any(|v| !v.is_finite()) {
        return Err(LpError::NonFinite);
    }
    Ok(values.into_iter().map(|v| v.max(0.0)).collect())
}

pub trait LpSolver {
    fn maximise(&self, program: &BetaProgram) -> Result<Vec<f64>, LpError>;
}

impl<S: LpSolver + ?Sized> LpSolver for &S {
    fn maximise(&self, program: &BetaProgram) -> Result<Vec<f64>, LpError> {
        (**self).maximise(program)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MinilpSolver;

impl LpSolver for MinilpSolver {
    fn maximise(&self, program: &BetaProgram) -> Result<Vec<f64>, LpError> {
        let mut problem = Problem::new(OptimizationDirection::Maximize);
        let beta: Vec<Variable> = (0..program.num_vars())
            .map(|_| problem.add_var(1.0, (0.0, f64::INFINITY)))
            .collect();

        for (row, bound) in program.rows.iter().zip(program.bounds.iter()) {
            let mut lhs = LinearExpr::empty();
            for (b, coeff) in beta.iter().zip(row.iter()) {
                lhs.add(*b, *coeff);
            }
            problem.add_constraint(lhs, ComparisonOp::Ge, *bound);
        }
        for block in program.blocks.iter() {
            let mut lhs = LinearExpr::empty();
            for b in beta[block.clone()].iter() {
                lhs.add(*b, 1.0);
            }
            problem.add_constraint(lhs, ComparisonOp::Le, 1.0);
        }

        match problem.solve() {
            Ok(solution) => finite_solution(beta.iter().map(|b| solution[*b]).collect()),
            Err(minilp::Error::Unbounded) => Err(LpError::Unbounded),
            Err(_) => Err(LpError::Infeasible),
        }
    }
}
