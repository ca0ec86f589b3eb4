//! Strategy synthesis for multi-objective goals in turn-based stochastic
//! games.
//!
//! Given precomputed achievability polytopes for every game state (and every
//! state/action branch) the crate builds a memory-augmented MDP whose states
//! pair a game state with a corner of its polytope. Each transition
//! distribution comes from a small linear program expressing a target point as
//! a convex combination of corners reachable from the successors.
pub mod model_checking;

pub use model_checking::cancel::CancelToken;
pub use model_checking::config::SynthesisConfig;
pub use model_checking::decomposition::{decompose, Decomposition};
pub use model_checking::error::StrategyError;
pub use model_checking::game::{GameInput, GameState, Player, Smg, StateReward, TransitionPair};
pub use model_checking::lp::{BetaProgram, LpError, LpSolver, MinilpSolver};
pub use model_checking::multi_mdp::{
    AugmentedState, Choice, Distribution, InitialContext, MultiMdp, Origin, SynthesisInput,
};
pub use model_checking::polytope::{extract_corners, Corner, Generator, GeneratorSet, GeneratorSystem, VertexSystem};
pub use model_checking::simulation::simulate;
pub use model_checking::successors::{resolve_successors, CornerWeights, Successor};
