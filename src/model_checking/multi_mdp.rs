use std::collections::{BTreeMap, HashMap};
use std::fmt;

use ndarray::Array1;
use petgraph::{graph::NodeIndex, Graph};

use super::cancel::CancelToken;
use super::config::SynthesisConfig;
use super::decomposition::decompose;
use super::error::StrategyError;
use super::game::{Player, Smg, StateReward};
use super::helper_methods::{bound_vector, reward_vector};
use super::lp::LpSolver;
use super::polytope::{extract_corners, Corner, GeneratorSet, GeneratorSystem};
use super::successors::{resolve_successors, CornerWeights, Successor};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// The synthetic start state; it has no counterpart in the game.
    Init,
    Game(usize),
}

/// A game state paired with one corner of its generator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AugmentedState {
    pub origin: Origin,
    pub corner: usize,
}

impl fmt::Display for AugmentedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            Origin::Init => write!(f, "(init,{})", self.corner),
            Origin::Game(s) => write!(f, "({},{})", s, self.corner),
        }
    }
}

/// Sparse probability mass over augmented states, kept in index order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Distribution {
    mass: BTreeMap<usize, f64>,
}

impl Distribution {
    pub fn add(&mut self, state: usize, prob: f64) {
        *self.mass.entry(state).or_insert(0.0) += prob;
    }

    pub fn get(&self, state: usize) -> f64 {
        self.mass.get(&state).copied().unwrap_or(0.0)
    }

    pub fn clear(&mut self) {
        self.mass.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.mass.iter().map(|(s, p)| (*s, *p))
    }

    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.mass.keys().copied()
    }

    pub fn sum(&self) -> f64 {
        self.mass.values().sum()
    }

    pub fn len(&self) -> usize {
        self.mass.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mass.is_empty()
    }

    /// Single successor `state` carrying all the mass.
    pub fn is_self_loop(&self, state: usize) -> bool {
        self.mass.len() == 1 && self.mass.contains_key(&state)
    }
}

impl fmt::Display for Distribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (s, p)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", s, p)?;
        }
        write!(f, "}}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub action: usize,
    pub distribution: Distribution,
}

/// Everything needed to solve the initial distribution again for a new
/// target without touching the rest of the MDP.
#[derive(Debug, Clone, PartialEq)]
pub struct InitialContext {
    pub state: usize,
    pub rewards: Array1<f64>,
    pub generators: GeneratorSet,
    pub corner_states: Vec<usize>,
}

impl InitialContext {
    pub fn solve<S: LpSolver + ?Sized>(
        &self,
        solver: &S,
        target: &[f64],
        cancel: &CancelToken,
    ) -> Result<Distribution, StrategyError> {
        if target.len() != self.rewards.len() {
            return Err(StrategyError::DimensionMismatch {
                expected: self.rewards.len(),
                found: target.len(),
            });
        }
        let bound = bound_vector(target, &self.rewards);
        log::info!("computing strategy for initial {:?}", bound.to_vec());
        let decomposition = decompose(solver, &bound, &self.generators, target.len(), cancel)?;
        let mut d_init = Distribution::default();
        for (g, beta) in decomposition.iter() {
            if beta != 0.0 {
                d_init.add(self.corner_states[g], beta);
            }
        }
        log::info!("initial distribution (at {}): {}", self.state, d_init);
        Ok(d_init)
    }
}

/// Inputs of a build, borrowed from the caller. `branch_polytopes[t][u]` is
/// the achievability polytope of action `u` taken in state `t`.
#[derive(Debug)]
pub struct SynthesisInput<'a, P, R> {
    pub game: &'a Smg,
    pub state_polytopes: &'a [P],
    pub branch_polytopes: &'a [Vec<P>],
    pub rewards: &'a [R],
}

// manual impls: derive would require P: Clone and R: Clone
impl<'a, P, R> Clone for SynthesisInput<'a, P, R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, P, R> Copy for SynthesisInput<'a, P, R> {}

/// Memory-augmented MDP realising a target vector. State 0 is the synthetic
/// initial state with a single choice, the initial distribution.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiMdp {
    pub(crate) states: Vec<AugmentedState>,
    pub(crate) choices: Vec<Vec<Choice>>,
    pub(crate) strategy: Vec<Option<usize>>,
    pub(crate) corner_states: Vec<Vec<usize>>,
    pub(crate) initial: InitialContext,
    pub(crate) num_objectives: usize,
}

pub const INITIAL_STATE: usize = 0;

/// Allocates the initial state plus one augmented state per (state, corner),
/// returning the states and, per game state, the index of each corner's state.
pub fn create_states(generator_sets: &[GeneratorSet]) -> (Vec<AugmentedState>, Vec<Vec<usize>>) {
    let mut states = vec![AugmentedState {
        origin: Origin::Init,
        corner: 0,
    }];
    let mut corner_states = Vec::with_capacity(generator_sets.len());
    for (s, gs) in generator_sets.iter().enumerate() {
        let mut indices = Vec::with_capacity(gs.len());
        for corner in 0..gs.len() {
            indices.push(states.len());
            states.push(AugmentedState {
                origin: Origin::Game(s),
                corner,
            });
        }
        corner_states.push(indices);
    }
    (states, corner_states)
}

/// Splits a chosen branch corner over the successors of the action. A lone
/// successor that owns the very same corner takes it whole; otherwise the
/// joint successor program is solved with block sizes `from_block..=max_block`.
fn resolve_branch_corner<S: LpSolver + ?Sized>(
    solver: &S,
    corner: &Corner,
    successors: &[Successor<'_>],
    from_block: usize,
    max_block: usize,
    cancel: &CancelToken,
) -> Result<Vec<CornerWeights>, StrategyError> {
    if let [only] = successors {
        if let Some(j) = only.generators.position(corner) {
            let mut weights = CornerWeights::new();
            weights.insert(j, 1.0);
            return Ok(vec![weights]);
        }
    }
    for block in from_block.max(1)..=max_block {
        match resolve_successors(solver, corner, successors, block, cancel) {
            Ok(weights) => return Ok(weights),
            Err(e) if e.is_not_realizable() => {
                log::debug!("nothing found for block {} (max {})", block, max_block);
                continue;
            }
            Err(e) => return Err(e),
        }
    }
    Err(StrategyError::not_realizable(corner.as_slice().unwrap_or(&[])))
}

fn check_input<P: GeneratorSystem, R>(
    input: &SynthesisInput<'_, P, R>,
    num_objectives: usize,
) -> Result<(), StrategyError> {
    let game = input.game;
    if input.rewards.len() > num_objectives {
        return Err(StrategyError::DimensionMismatch {
            expected: num_objectives,
            found: input.rewards.len(),
        });
    }
    if input.state_polytopes.len() < game.num_states() {
        return Err(StrategyError::MissingPolytope {
            state: input.state_polytopes.len(),
            action: None,
        });
    }
    if game.initial >= game.num_states() {
        return Err(StrategyError::MissingPolytope {
            state: game.initial,
            action: None,
        });
    }
    for t in 0..game.num_states() {
        if let Some(divisor) = input.state_polytopes[t].invalid_divisor() {
            return Err(StrategyError::InvalidGenerator {
                state: t,
                action: None,
                divisor,
            });
        }
        let branches = input.branch_polytopes.get(t).map(|b| b.len()).unwrap_or(0);
        if branches < game.num_choices(t) {
            return Err(StrategyError::MissingPolytope {
                state: t,
                action: Some(branches),
            });
        }
        for u in 0..game.num_choices(t) {
            if let Some(divisor) = input.branch_polytopes[t][u].invalid_divisor() {
                return Err(StrategyError::InvalidGenerator {
                    state: t,
                    action: Some(u),
                    divisor,
                });
            }
            if let Some(tp) = game.transitions(t, u).iter().find(|tp| tp.s >= game.num_states()) {
                return Err(StrategyError::MissingPolytope {
                    state: tp.s,
                    action: None,
                });
            }
        }
    }
    Ok(())
}

impl MultiMdp {
    /// Synthesises the augmented MDP for `target`. Fails if the initial state
    /// cannot realise the target or a chosen branch corner cannot be split
    /// over its successors; corners with no decomposition elsewhere are
    /// skipped and simply get no choice for that action.
    pub fn build<P, R, S>(
        input: &SynthesisInput<'_, P, R>,
        target: &[f64],
        solver: &S,
        config: &SynthesisConfig,
    ) -> Result<MultiMdp, StrategyError>
    where
        P: GeneratorSystem,
        R: StateReward,
        S: LpSolver + ?Sized,
    {
        let n = target.len();
        check_input(input, n)?;
        let game = input.game;
        let cancel = &config.cancel;

        log::info!("-------- CANONICAL ORDER -------------");
        let generator_sets: Vec<GeneratorSet> = input.state_polytopes[..game.num_states()]
            .iter()
            .map(|p| extract_corners(p, n))
            .collect();

        log::info!("-------------- BUILDING STATE SPACE ----------------");
        let (states, corner_states) = create_states(&generator_sets);

        log::info!("-------------- INITIAL DISTRIBUTION ----------------");
        let initial = InitialContext {
            state: game.initial,
            rewards: reward_vector(input.rewards, game.initial, n),
            generators: generator_sets[game.initial].clone(),
            corner_states: corner_states[game.initial].clone(),
        };
        let d_init = initial.solve(solver, target, cancel)?;

        let mut choices: Vec<Vec<Choice>> = vec![Vec::new(); states.len()];
        let mut strategy: Vec<Option<usize>> = vec![None; states.len()];
        choices[INITIAL_STATE].push(Choice {
            action: 0,
            distribution: d_init,
        });

        log::info!("------------- BUILDING TRANSITIONS ----------------");
        for t in 0..game.num_states() {
            let reward_t = reward_vector(input.rewards, t, n);
            for u in 0..game.num_choices(t) {
                let successors: Vec<Successor<'_>> = game
                    .transitions(t, u)
                    .iter()
                    .map(|tp| Successor {
                        state: tp.s,
                        probability: tp.p,
                        generators: &generator_sets[tp.s],
                    })
                    .collect();
                if successors.is_empty() {
                    log::debug!("{} --{}--> has no successors", t, u);
                    continue;
                }
                let branch = extract_corners(&input.branch_polytopes[t][u], n);
                // successor split of each branch corner, shared by all corners of t
                let mut resolved: HashMap<usize, Vec<CornerWeights>> = HashMap::new();

                for p in 0..generator_sets[t].len() {
                    let bound = generator_sets[t].corner(p) - &reward_t;
                    let decomposition = match decompose(solver, &bound, &branch, n, cancel) {
                        Ok(d) => d,
                        Err(e) if e.is_not_realizable() => {
                            log::debug!("{} --{}--> {}: no distribution", t, u, p);
                            continue;
                        }
                        Err(e) => return Err(e),
                    };

                    let mut d = Distribution::default();
                    for (q, beta) in decomposition.iter() {
                        if !resolved.contains_key(&q) {
                            let weights = resolve_branch_corner(
                                solver,
                                branch.corner(q),
                                &successors,
                                decomposition.support(),
                                n,
                                cancel,
                            )?;
                            resolved.insert(q, weights);
                        }
                        let weights = &resolved[&q];
                        for (succ, corner_weights) in successors.iter().zip(weights.iter()) {
                            for (j, c) in corner_weights.iter() {
                                let prob = (beta * c).min(1.0);
                                if prob != 0.0 {
                                    d.add(corner_states[succ.state][*j], prob * succ.probability);
                                }
                            }
                        }
                    }

                    let origin = corner_states[t][p];
                    log::debug!("{} --{}--> {}: {}", t, u, p, d);
                    choices[origin].push(Choice {
                        action: u,
                        distribution: d,
                    });
                    if game.player(t) == Player::Controller && strategy[origin].is_none() {
                        strategy[origin] = Some(u);
                    }
                }
            }
        }

        let mdp = MultiMdp {
            states,
            choices,
            strategy,
            corner_states,
            initial,
            num_objectives: n,
        };
        let (num_states, num_choices) = mdp.statistics();
        log::info!("augmented states: {}, choices: {}", num_states, num_choices);
        Ok(mdp)
    }

    /// Replaces the initial distribution with one realising `target`. Returns
    /// `false`, leaving the old distribution in place, if the target is not
    /// realizable. No other distribution is touched.
    pub fn recompute_initial<S: LpSolver + ?Sized>(
        &mut self,
        target: &[f64],
        solver: &S,
        cancel: &CancelToken,
    ) -> Result<bool, StrategyError> {
        log::info!("-------------- RECOMPUTING INITIAL DISTRIBUTION ----------------");
        match self.initial.solve(solver, target, cancel) {
            Ok(d_init) => {
                let old = &mut self.choices[INITIAL_STATE][0].distribution;
                old.clear();
                for (s, p) in d_init.iter() {
                    old.add(s, p);
                }
                Ok(true)
            }
            Err(e) if e.is_not_realizable() => {
                log::warn!("goal {:?} not realizable, keeping the previous initial distribution", target);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_objectives(&self) -> usize {
        self.num_objectives
    }

    pub fn state(&self, s: usize) -> &AugmentedState {
        &self.states[s]
    }

    pub fn states(&self) -> &[AugmentedState] {
        &self.states[..]
    }

    /// Game state behind an augmented state; `None` for the initial state.
    pub fn original_state(&self, s: usize) -> Option<usize> {
        match self.states.get(s)?.origin {
            Origin::Init => None,
            Origin::Game(t) => Some(t),
        }
    }

    pub fn augmented_state(&self, t: usize, corner: usize) -> Option<usize> {
        self.corner_states.get(t)?.get(corner).copied()
    }

    pub fn choices(&self, s: usize) -> &[Choice] {
        &self.choices[s][..]
    }

    pub fn num_choices(&self, s: usize) -> usize {
        self.choices[s].len()
    }

    pub fn choice(&self, s: usize, i: usize) -> &Choice {
        &self.choices[s][i]
    }

    pub fn initial_distribution(&self) -> &Distribution {
        &self.choices[INITIAL_STATE][0].distribution
    }

    pub fn initial_context(&self) -> &InitialContext {
        &self.initial
    }

    /// For a controller state's corner, the first action that received a
    /// distribution.
    pub fn strategy_choice(&self, s: usize) -> Option<usize> {
        self.strategy.get(s).copied().flatten()
    }

    /// Every choice of `s` keeps all mass on `s` itself.
    pub fn is_terminal(&self, s: usize) -> bool {
        !self.choices[s].is_empty()
            && self.choices[s].iter().all(|c| c.distribution.is_self_loop(s))
    }

    pub fn statistics(&self) -> (usize, usize) {
        (self.states.len(), self.choices.iter().map(|c| c.len()).sum())
    }

    pub fn generate_graph(&self) -> Graph<String, String> {
        let mut g: Graph<String, String> = Graph::new();
        let nodes: Vec<NodeIndex> = self
            .states
            .iter()
            .map(|state| g.add_node(format!("{}", state)))
            .collect();
        for (s, choices) in self.choices.iter().enumerate() {
            for choice in choices.iter() {
                for (sprime, p) in choice.distribution.iter() {
                    g.add_edge(nodes[s], nodes[sprime], format!("{}: {:.4}", choice.action, p));
                }
            }
        }
        g
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model_checking::game::{GameState, TransitionPair};
    use crate::model_checking::lp::MinilpSolver;
    use crate::model_checking::polytope::{Generator, VertexSystem};

    fn unit_corners() -> VertexSystem {
        VertexSystem::from_points(&[&[1, 0], &[0, 1]], 1)
    }

    fn self_loop(s: usize) -> Vec<TransitionPair> {
        vec![TransitionPair { s, p: 1.0 }]
    }

    /// state 0 moves to state 1, which loops forever
    fn two_state_game() -> (Smg, Vec<VertexSystem>, Vec<Vec<VertexSystem>>) {
        let game = Smg {
            initial: 0,
            states: vec![
                GameState {
                    player: Player::Controller,
                    actions: vec![vec![TransitionPair { s: 1, p: 1.0 }]],
                },
                GameState {
                    player: Player::Environment,
                    actions: vec![self_loop(1)],
                },
            ],
        };
        let x = vec![unit_corners(), unit_corners()];
        let y = vec![vec![unit_corners()], vec![unit_corners()]];
        (game, x, y)
    }

    fn no_rewards() -> Vec<Vec<f64>> {
        Vec::new()
    }

    #[test]
    fn states_allocated_per_corner() {
        let sets = vec![
            extract_corners(&unit_corners(), 2),
            GeneratorSet::default(),
            extract_corners(&VertexSystem::from_points(&[&[1, 1]], 1), 2),
        ];
        let (states, corner_states) = create_states(&sets);
        assert_eq!(states.len(), 4);
        assert_eq!(states[0].origin, Origin::Init);
        assert_eq!(corner_states, vec![vec![1, 2], vec![], vec![3]]);
        assert_eq!(states[3], AugmentedState { origin: Origin::Game(2), corner: 0 });
    }

    #[test]
    fn initial_distribution_mixes_corners() {
        let (game, x, y) = two_state_game();
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let mdp = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap();
        let d = mdp.initial_distribution();
        assert_eq!(d.support().collect::<Vec<_>>(), vec![1, 2]);
        assert!((d.get(1) - 0.5).abs() < 1e-9);
        assert!((d.get(2) - 0.5).abs() < 1e-9);
        assert_eq!(mdp.original_state(1), Some(0));
        assert_eq!(mdp.original_state(0), None);
    }

    #[test]
    fn corners_follow_matching_successor_corners() {
        let (game, x, y) = two_state_game();
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let mdp = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap();
        // (0,p) -> (1,p)
        for p in 0..2 {
            let from = mdp.augmented_state(0, p).unwrap();
            let to = mdp.augmented_state(1, p).unwrap();
            assert_eq!(mdp.num_choices(from), 1);
            assert!((mdp.choice(from, 0).distribution.get(to) - 1.0).abs() < 1e-9);
            assert_eq!(mdp.strategy_choice(from), Some(0));
            assert!(mdp.is_terminal(to));
            assert_eq!(mdp.strategy_choice(to), None);
        }
    }

    #[test]
    fn stochastic_branch_splits_over_successors() {
        let game = Smg {
            initial: 0,
            states: vec![
                GameState {
                    player: Player::Controller,
                    actions: vec![vec![TransitionPair { s: 1, p: 0.5 }, TransitionPair { s: 2, p: 0.5 }]],
                },
                GameState { player: Player::Environment, actions: vec![self_loop(1)] },
                GameState { player: Player::Environment, actions: vec![self_loop(2)] },
            ],
        };
        let half = VertexSystem::from_points(&[&[1, 1]], 2);
        let left = VertexSystem::from_points(&[&[1, 0]], 1);
        let right = VertexSystem::from_points(&[&[0, 1]], 1);
        let x = vec![half.clone(), left.clone(), right.clone()];
        let y = vec![vec![half], vec![left], vec![right]];
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let mdp = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap();

        let from = mdp.augmented_state(0, 0).unwrap();
        let d = &mdp.choice(from, 0).distribution;
        assert!((d.get(mdp.augmented_state(1, 0).unwrap()) - 0.5).abs() < 1e-9);
        assert!((d.get(mdp.augmented_state(2, 0).unwrap()) - 0.5).abs() < 1e-9);
        assert!((d.sum() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn unrealizable_initial_target_is_fatal() {
        let game = Smg { initial: 0, states: vec![GameState { player: Player::Controller, actions: vec![self_loop(0)] }] };
        let low = VertexSystem::from_points(&[&[3, 3]], 10);
        let x = vec![low.clone()];
        let y = vec![vec![low]];
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let err = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap_err();
        assert!(err.is_not_realizable());
    }

    #[test]
    fn unrealizable_inner_corner_is_skipped() {
        let (game, x, mut y) = two_state_game();
        y[0][0] = VertexSystem::from_points(&[&[3, 3]], 10);
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let mdp = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap();
        for p in 0..2 {
            let from = mdp.augmented_state(0, p).unwrap();
            assert_eq!(mdp.num_choices(from), 0);
            assert_eq!(mdp.strategy_choice(from), None);
        }
    }

    #[test]
    fn missing_branch_polytope_reported() {
        let (game, x, _) = two_state_game();
        let y: Vec<Vec<VertexSystem>> = vec![vec![unit_corners()], vec![]];
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let err = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap_err();
        assert!(matches!(err, StrategyError::MissingPolytope { state: 1, action: Some(0) }));
    }

    #[test]
    fn recompute_only_touches_initial_distribution() {
        let (game, x, y) = two_state_game();
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let mut mdp = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap();
        let before: Vec<Vec<Choice>> = (1..mdp.num_states()).map(|s| mdp.choices(s).to_vec()).collect();

        assert!(mdp.recompute_initial(&[1.0, 0.0], &MinilpSolver, &CancelToken::new()).unwrap());
        let d = mdp.initial_distribution();
        assert_eq!(d.support().collect::<Vec<_>>(), vec![mdp.augmented_state(0, 0).unwrap()]);
        let after: Vec<Vec<Choice>> = (1..mdp.num_states()).map(|s| mdp.choices(s).to_vec()).collect();
        assert_eq!(before, after);

        let kept = mdp.initial_distribution().clone();
        assert!(!mdp.recompute_initial(&[2.0, 2.0], &MinilpSolver, &CancelToken::new()).unwrap());
        assert_eq!(mdp.initial_distribution(), &kept);
    }

    #[test]
    fn graph_has_edge_per_transition() {
        let (game, x, y) = two_state_game();
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let mdp = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap();
        let g = mdp.generate_graph();
        assert_eq!(g.node_count(), 5);
        // 2 initial edges, 2 from state 0 corners, 2 self loops
        assert_eq!(g.edge_count(), 6);
    }

    #[test]
    fn zero_divisor_rejected_before_solving() {
        let (game, mut x, y) = two_state_game();
        x[0] = VertexSystem::new(vec![Generator::point(vec![1, 0], 0), Generator::point(vec![0, 1], 1)]);
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let err = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap_err();
        assert!(matches!(err, StrategyError::InvalidGenerator { state: 0, action: None, divisor: 0 }));

        let (game, x, mut y) = two_state_game();
        y[1][0] = VertexSystem::from_points(&[&[1, 1]], 0);
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let err = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap_err();
        assert!(matches!(err, StrategyError::InvalidGenerator { state: 1, action: Some(0), divisor: 0 }));
    }

    #[test]
    fn unsplittable_branch_corner_is_fatal() {
        let (game, mut x, mut y) = two_state_game();
        let high = VertexSystem::from_points(&[&[1, 1]], 1);
        let half = VertexSystem::from_points(&[&[1, 1]], 2);
        x[0] = high.clone();
        x[1] = half.clone();
        y[0][0] = high;
        y[1][0] = half;
        let rewards = no_rewards();
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let err = MultiMdp::build(&input, &[0.5, 0.5], &MinilpSolver, &SynthesisConfig::default()).unwrap_err();
        match err {
            StrategyError::GoalNotRealizable { bound } => assert_eq!(bound, vec![1.0, 1.0]),
            e => panic!("unexpected error {:?}", e),
        }
    }

    /// state 0 earns 0.2 in both objectives and splits evenly into two
    /// looping states whose own corners are `left` and `right`
    fn rewarded_split(left: VertexSystem, right: VertexSystem) -> (Smg, Vec<VertexSystem>, Vec<Vec<VertexSystem>>) {
        let game = Smg {
            initial: 0,
            states: vec![
                GameState {
                    player: Player::Controller,
                    actions: vec![vec![TransitionPair { s: 1, p: 0.5 }, TransitionPair { s: 2, p: 0.5 }]],
                },
                GameState { player: Player::Environment, actions: vec![self_loop(1)] },
                GameState { player: Player::Environment, actions: vec![self_loop(2)] },
            ],
        };
        let x = vec![VertexSystem::from_points(&[&[7, 7]], 10), left.clone(), right.clone()];
        let y = vec![vec![VertexSystem::from_points(&[&[1, 1]], 2)], vec![left], vec![right]];
        (game, x, y)
    }

    #[test]
    fn branch_corner_bound_excludes_state_reward() {
        let rewards = vec![vec![0.2, 0.0, 0.0], vec![0.2, 0.0, 0.0]];

        let (game, x, y) = rewarded_split(
            VertexSystem::from_points(&[&[1, 0]], 1),
            VertexSystem::from_points(&[&[0, 1]], 1),
        );
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let mdp = MultiMdp::build(&input, &[0.7, 0.7], &MinilpSolver, &SynthesisConfig::default()).unwrap();
        let d = &mdp.choice(mdp.augmented_state(0, 0).unwrap(), 0).distribution;
        assert!((d.get(mdp.augmented_state(1, 0).unwrap()) - 0.5).abs() < 1e-9);
        assert!((d.get(mdp.augmented_state(2, 0).unwrap()) - 0.5).abs() < 1e-9);

        // branch corner (0.5,0.5) must be met in full by the successors;
        // (0.5,0.5) - reward = (0.3,0.3) would be reachable
        let (game, x, y) = rewarded_split(
            VertexSystem::from_points(&[&[6, 0]], 10),
            VertexSystem::from_points(&[&[0, 6]], 10),
        );
        let input = SynthesisInput { game: &game, state_polytopes: &x, branch_polytopes: &y, rewards: &rewards };
        let err = MultiMdp::build(&input, &[0.7, 0.7], &MinilpSolver, &SynthesisConfig::default()).unwrap_err();
        match err {
            StrategyError::GoalNotRealizable { bound } => assert_eq!(bound, vec![0.5, 0.5]),
            e => panic!("unexpected error {:?}", e),
        }
    }
}
