use rand::Rng;

use super::config::SynthesisConfig;
use super::error::StrategyError;
use super::multi_mdp::{Distribution, MultiMdp, INITIAL_STATE};

/// Draws a successor by subtracting masses from a uniform sample; the first
/// state that brings the remainder within `tolerance` of zero is taken.
pub fn sample_from_distribution<R: Rng + ?Sized>(
    distribution: &Distribution,
    tolerance: f64,
    rng: &mut R,
) -> Option<usize> {
    let mut r: f64 = rng.gen();
    for (s, p) in distribution.iter() {
        r -= p;
        if r <= tolerance {
            return Some(s);
        }
    }
    None
}

/// Samples `samples` paths of game states. Actions are picked uniformly; a
/// path ends at `max_path_length`, at a state without choices, or at a
/// terminal self-loop. The synthetic initial state is not part of a path.
pub fn simulate<R: Rng + ?Sized>(
    mdp: &MultiMdp,
    samples: usize,
    config: &SynthesisConfig,
    rng: &mut R,
) -> Result<Vec<Vec<usize>>, StrategyError> {
    let mut paths: Vec<Vec<usize>> = Vec::with_capacity(samples);
    for _ in 0..samples {
        config.cancel.check()?;
        let mut path: Vec<usize> = Vec::new();
        let mut current = INITIAL_STATE;
        while path.len() < config.max_path_length {
            let actions = mdp.num_choices(current);
            if actions == 0 {
                break;
            }
            let action = rng.gen_range(0, actions);
            let next = sample_from_distribution(
                &mdp.choice(current, action).distribution,
                config.sampling_tolerance,
                rng,
            )
            .ok_or(StrategyError::SamplingInvalid {
                state: current,
                action,
            })?;
            path.push(mdp.original_state(next).ok_or(StrategyError::UnmappedState(next))?);
            if mdp.num_choices(next) == 0 || mdp.is_terminal(next) {
                break;
            }
            current = next;
        }
        paths.push(path);
    }
    Ok(paths)
}
