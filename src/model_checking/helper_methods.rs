use std::fs::File;
use std::io::{BufReader, Write};
use std::num::ParseFloatError;
use std::path::Path;

use ndarray::{arr1, Array1};
use serde::Serialize;

use super::config::SynthesisConfig;
use super::error::StrategyError;
use super::game::{GameInput, StateReward};

/// Reward accrued in `state`, aligned with the objectives: the leading
/// `num_objectives - rewards.len()` probability objectives accrue nothing.
pub fn reward_vector<R: StateReward>(rewards: &[R], state: usize, num_objectives: usize) -> Array1<f64> {
    let offset = num_objectives.saturating_sub(rewards.len());
    let mut r: Array1<f64> = Array1::zeros(num_objectives);
    for (k, reward) in rewards.iter().enumerate().take(num_objectives - offset) {
        r[offset + k] = reward.state_reward(state);
    }
    r
}

pub fn bound_vector(target: &[f64], accrued: &Array1<f64>) -> Array1<f64> {
    arr1(target) - accrued
}

pub fn parse_vector(input: &str) -> Result<Vec<f64>, ParseFloatError> {
    input
        .split(',')
        .map(|x| x.trim())
        .filter(|x| !x.is_empty())
        .map(|x| x.parse::<f64>())
        .collect()
}

pub fn read_game_json<P: AsRef<Path>>(path: P) -> Result<GameInput, StrategyError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let u = serde_json::from_reader(reader)?;
    Ok(u)
}

pub fn read_config_json<P: AsRef<Path>>(path: P) -> Result<SynthesisConfig, StrategyError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let u = serde_json::from_reader(reader)?;
    Ok(u)
}

#[derive(Debug, Serialize)]
struct PathRecord {
    path: usize,
    step: usize,
    state: usize,
}

/// One CSV row per visited state: `path,step,state`.
pub fn write_paths<W: Write>(writer: W, paths: &[Vec<usize>]) -> Result<(), StrategyError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for (path, states) in paths.iter().enumerate() {
        for (step, state) in states.iter().enumerate() {
            wtr.serialize(PathRecord { path, step, state: *state })?;
        }
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_paths_csv<P: AsRef<Path>>(path: P, paths: &[Vec<usize>]) -> Result<(), StrategyError> {
    let file = File::create(path)?;
    write_paths(file, paths)
}
