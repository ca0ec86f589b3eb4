use serde::Deserialize;

use super::polytope::VertexSystem;

/// Owner of a game state. Controller states are resolved by the synthesised
/// strategy, environment states must be answered for every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Player {
    Controller,
    Environment,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TransitionPair {
    pub s: usize,
    pub p: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub player: Player,
    pub actions: Vec<Vec<TransitionPair>>,
}

/// Turn-based stochastic game. Each action of a state leads into a
/// probabilistic branch over successor states.
#[derive(Debug, Clone, PartialEq)]
pub struct Smg {
    pub initial: usize,
    pub states: Vec<GameState>,
}

impl Smg {
    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_choices(&self, s: usize) -> usize {
        self.states[s].actions.len()
    }

    pub fn transitions(&self, s: usize, u: usize) -> &[TransitionPair] {
        &self.states[s].actions[u][..]
    }

    pub fn player(&self, s: usize) -> Player {
        self.states[s].player
    }
}

pub trait StateReward {
    fn state_reward(&self, state: usize) -> f64;
}

impl StateReward for Vec<f64> {
    fn state_reward(&self, state: usize) -> f64 {
        self.get(state).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ActionInput {
    pub s_prime: Vec<TransitionPair>,
    pub polytope: VertexSystem,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StateInput {
    pub player: Player,
    pub polytope: VertexSystem,
    pub actions: Vec<ActionInput>,
}

/// JSON form of a game together with its precomputed polytopes and rewards.
#[derive(Debug, Deserialize, Clone)]
pub struct GameInput {
    pub initial: usize,
    #[serde(default)]
    pub target: Option<Vec<f64>>,
    #[serde(default)]
    pub rewards: Vec<Vec<f64>>,
    pub states: Vec<StateInput>,
}

impl GameInput {
    pub fn game(&self) -> Smg {
        Smg {
            initial: self.initial,
            states: self
                .states
                .iter()
                .map(|s| GameState {
                    player: s.player,
                    actions: s.actions.iter().map(|a| a.s_prime.to_vec()).collect(),
                })
                .collect(),
        }
    }

    pub fn state_polytopes(&self) -> Vec<VertexSystem> {
        self.states.iter().map(|s| s.polytope.clone()).collect()
    }

    pub fn branch_polytopes(&self) -> Vec<Vec<VertexSystem>> {
        self.states
            .iter()
            .map(|s| s.actions.iter().map(|a| a.polytope.clone()).collect())
            .collect()
    }
}
