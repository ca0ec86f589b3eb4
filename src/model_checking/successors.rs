use std::collections::BTreeMap;

use ndarray::Array1;

use super::cancel::CancelToken;
use super::combinations::{pad_tuple, select_multi_tuples, select_tuples};
use super::error::StrategyError;
use super::lp::{BetaProgram, LpError, LpSolver};
use super::polytope::GeneratorSet;

pub type CornerWeights = BTreeMap<usize, f64>;

#[derive(Debug, Clone, Copy)]
pub struct Successor<'a> {
    pub state: usize,
    pub probability: f64,
    pub generators: &'a GeneratorSet,
}

/// Tuples of the largest size up to `block` that the set can supply, each
/// padded to `block` entries by repeating its first corner.
pub fn candidate_tuples(generators: &GeneratorSet, block: usize) -> Vec<Vec<usize>> {
    for l in (1..=block).rev() {
        let tuples: Vec<Vec<usize>> = select_tuples(generators.len(), l).collect();
        if !tuples.is_empty() {
            return tuples.into_iter().map(|t| pad_tuple(t, block)).collect();
        }
    }
    Vec::new()
}

/// Jointly picks corners for every successor so that
/// Σ_w δ(w) Σ_i β^w_i g^w_i >= bound, with each successor's β summing to at
/// most one. The combinations of candidate tuples are tried in odometer order
/// and the first feasible one wins.
pub fn resolve_successors<S: LpSolver + ?Sized>(
    solver: &S,
    bound: &Array1<f64>,
    successors: &[Successor<'_>],
    block: usize,
    cancel: &CancelToken,
) -> Result<Vec<CornerWeights>, StrategyError> {
    let candidates: Vec<Vec<Vec<usize>>> = successors
        .iter()
        .map(|s| candidate_tuples(s.generators, block))
        .collect();
    let blocks = (0..successors.len())
        .map(|w| w * block..(w + 1) * block)
        .collect::<Vec<_>>();

    for (counter, multi_tuple) in select_multi_tuples(&candidates).enumerate() {
        cancel.check()?;
        if counter > 0 && counter % 10_000 == 0 {
            log::trace!("bound {:?}: tried {} multi tuples", bound.to_vec(), counter);
        }

        let mut rows = vec![vec![0.0; successors.len() * block]; bound.len()];
        for (w, (succ, tuple)) in successors.iter().zip(multi_tuple.iter()).enumerate() {
            for (i, corner) in tuple.iter().enumerate() {
                let g = succ.generators.corner(*corner);
                for (k, row) in rows.iter_mut().enumerate() {
                    row[w * block + i] = succ.probability * g[k];
                }
            }
        }
        let program = BetaProgram {
            rows,
            bounds: bound.to_vec(),
            blocks: blocks.clone(),
        };

        match solver.maximise(&program) {
            Ok(beta) => {
                let weights = multi_tuple
                    .iter()
                    .enumerate()
                    .map(|(w, tuple)| {
                        let mut corner_weights = CornerWeights::new();
                        for (i, corner) in tuple.iter().enumerate() {
                            let prob = beta[w * block + i].min(1.0);
                            // padded repeats share one corner
                            *corner_weights.entry(*corner).or_insert(0.0) += prob;
                        }
                        corner_weights
                    })
                    .collect();
                return Ok(weights);
            }
            Err(LpError::Infeasible) => continue,
            Err(LpError::NonFinite) => {
                return Err(StrategyError::NonFinite {
                    bounds: program.bounds,
                    coefficients: program.rows,
                });
            }
            Err(LpError::Unbounded) => {
                log::error!(
                    "unbounded successor program; bounds: {:?}, coefficients: {:?}, blocks: {:?}",
                    program.bounds,
                    program.rows,
                    program.blocks
                );
                return Err(StrategyError::Unbounded {
                    bounds: program.bounds,
                    coefficients: program.rows,
                });
            }
        }
    }
    Err(StrategyError::not_realizable(bound.as_slice().unwrap_or(&[])))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_checking::lp::MinilpSolver;
    use ndarray::arr1;

    fn set(points: &[&[f64]]) -> GeneratorSet {
        GeneratorSet::from_corners(points.iter().map(|p| arr1(p)).collect())
    }

    struct AlwaysUnbounded;

    impl LpSolver for AlwaysUnbounded {
        fn maximise(&self, _program: &BetaProgram) -> Result<Vec<f64>, LpError> {
            Err(LpError::Unbounded)
        }
    }

    #[test]
    fn candidates_fall_back_to_smaller_tuples() {
        let gs = set(&[&[1.0, 0.0], &[0.0, 1.0]]);
        assert_eq!(candidate_tuples(&gs, 3), vec![vec![0, 1, 0]]);
        assert_eq!(candidate_tuples(&gs, 2), vec![vec![0, 1]]);
        assert!(candidate_tuples(&GeneratorSet::default(), 2).is_empty());
    }

    #[test]
    fn joint_solution_meets_bound() {
        let left = set(&[&[1.0, 0.0], &[0.0, 1.0]]);
        let right = set(&[&[0.8, 0.4], &[0.2, 0.9]]);
        let successors = vec![
            Successor { state: 1, probability: 0.5, generators: &left },
            Successor { state: 2, probability: 0.5, generators: &right },
        ];
        let bound = arr1(&[0.5, 0.5]);
        let weights = resolve_successors(&MinilpSolver, &bound, &successors, 2, &CancelToken::new()).unwrap();
        assert_eq!(weights.len(), 2);
        let eps = 1e-6;
        for k in 0..2 {
            let achieved: f64 = successors
                .iter()
                .zip(weights.iter())
                .map(|(s, w)| s.probability * w.iter().map(|(c, b)| b * s.generators.corner(*c)[k]).sum::<f64>())
                .sum();
            assert!(achieved >= bound[k] - eps);
        }
        for w in weights.iter() {
            assert!(w.values().sum::<f64>() <= 1.0 + eps);
        }
    }

    #[test]
    fn padded_corner_weights_are_summed() {
        let only = set(&[&[0.8, 0.8]]);
        let successors = vec![Successor { state: 0, probability: 1.0, generators: &only }];
        let weights =
            resolve_successors(&MinilpSolver, &arr1(&[0.4, 0.4]), &successors, 2, &CancelToken::new()).unwrap();
        assert_eq!(weights[0].len(), 1);
        assert!((weights[0][&0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_successor_not_realizable() {
        let good = set(&[&[1.0]]);
        let empty = GeneratorSet::default();
        let successors = vec![
            Successor { state: 0, probability: 0.5, generators: &good },
            Successor { state: 1, probability: 0.5, generators: &empty },
        ];
        let err = resolve_successors(&MinilpSolver, &arr1(&[0.1]), &successors, 1, &CancelToken::new()).unwrap_err();
        assert!(err.is_not_realizable());
    }

    #[test]
    fn exhausted_search_not_realizable() {
        let low = set(&[&[0.2, 0.2]]);
        let successors = vec![
            Successor { state: 0, probability: 0.5, generators: &low },
            Successor { state: 1, probability: 0.5, generators: &low },
        ];
        let err = resolve_successors(&MinilpSolver, &arr1(&[0.5, 0.5]), &successors, 2, &CancelToken::new())
            .unwrap_err();
        assert!(err.is_not_realizable());
    }

    #[test]
    fn unbounded_stops_the_search() {
        let left = set(&[&[1.0, 0.0], &[0.0, 1.0]]);
        let right = set(&[&[0.5, 0.5]]);
        let successors = vec![
            Successor { state: 1, probability: 0.25, generators: &left },
            Successor { state: 2, probability: 0.75, generators: &right },
        ];
        let err = resolve_successors(&AlwaysUnbounded, &arr1(&[0.5, 0.5]), &successors, 1, &CancelToken::new())
            .unwrap_err();
        match err {
            StrategyError::Unbounded { bounds, coefficients } => {
                assert_eq!(bounds, vec![0.5, 0.5]);
                // first multi tuple only: corner 0 of each successor
                assert_eq!(coefficients, vec![vec![0.25, 0.375], vec![0.0, 0.375]]);
            }
            e => panic!("unexpected error {:?}", e),
        }
    }
}
