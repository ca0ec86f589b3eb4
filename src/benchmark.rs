use criterion::{black_box, criterion_group, criterion_main, Criterion};

use polystrat::{GameState, MinilpSolver, MultiMdp, Player, Smg, SynthesisConfig, SynthesisInput, TransitionPair, VertexSystem};

/// Chain of `len` states where every action splits evenly between the next two
/// states; the last two states loop.
fn setup(len: usize) -> (Smg, Vec<VertexSystem>, Vec<Vec<VertexSystem>>) {
    let corners = VertexSystem::from_points(&[&[3, 0, 0], &[0, 3, 0], &[0, 0, 3], &[1, 1, 1]], 3);
    let mut states = Vec::with_capacity(len);
    for s in 0..len {
        let actions = if s + 2 < len {
            vec![
                vec![TransitionPair { s: s + 1, p: 0.5 }, TransitionPair { s: s + 2, p: 0.5 }],
                vec![TransitionPair { s: s + 1, p: 1.0 }],
            ]
        } else {
            vec![vec![TransitionPair { s, p: 1.0 }]]
        };
        let player = if s % 2 == 0 { Player::Controller } else { Player::Environment };
        states.push(GameState { player, actions });
    }
    let game = Smg { initial: 0, states };
    let x = vec![corners.clone(); len];
    let y = game
        .states
        .iter()
        .map(|s| vec![corners.clone(); s.actions.len()])
        .collect();
    (game, x, y)
}

fn build_benchmark(c: &mut Criterion) {
    let rewards: Vec<Vec<f64>> = Vec::new();
    let config = SynthesisConfig::default();
    for len in [5usize, 20].iter() {
        let (game, x, y) = setup(*len);
        let input = SynthesisInput {
            game: &game,
            state_polytopes: &x,
            branch_polytopes: &y,
            rewards: &rewards,
        };
        c.bench_function(&format!("build chain {}", len), |b| {
            b.iter(|| MultiMdp::build(black_box(&input), &[0.3, 0.3, 0.3], &MinilpSolver, &config))
        });
    }
}

criterion_group!(benches, build_benchmark);
criterion_main!(benches);
