use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

use clap::clap_app;
use itertools::Itertools;
use log::LevelFilter;
use petgraph::dot::Dot;

use polystrat::model_checking::helper_methods::{parse_vector, read_config_json, read_game_json, write_paths_csv};
use polystrat::{simulate, MinilpSolver, MultiMdp, SynthesisConfig, SynthesisInput};

fn main() -> Result<(), Box<dyn Error>> {
    let matches = clap_app!(polystrat =>
        (version: "0.1")
        (author: "Thomas Robinson")
        (about: "Strategy synthesis for multi-objective goals in stochastic games from precomputed polytopes")
        (@arg GAME: -g --game <PATH> "Game model, takes a json file of the form
            {
              \"initial\": 0,
              \"target\": [0.5, 0.5],
              \"rewards\": [[0.0, 1.0]],
              \"states\": [{
                  \"player\": \"controller\",
                  \"polytope\": {\"generators\": [{\"point\": {\"numerators\": [1, 0], \"divisor\": 1}}]},
                  \"actions\": [{
                      \"s_prime\": [{\"s\": 1, \"p\": 1.0}],
                      \"polytope\": {\"generators\": [{\"point\": {\"numerators\": [1, 0], \"divisor\": 1}}]}
                  }]
              },...]
            }
           ")
        (@arg TARGET: -t --target [VECTOR] "Target vector, e.g. 0.5,0.5; defaults to the model's target")
        (@arg RECOMPUTE: -r --recompute [VECTOR] "Recompute the initial distribution for another target")
        (@arg SAMPLES: -s --samples [N] default_value("0") "Number of paths to sample")
        (@arg PATHS: -p --paths [CSV] "Write sampled paths to a csv file instead of stdout")
        (@arg GRAPH: --graph [DOT] "Write the augmented MDP as a dot graph")
        (@arg CONFIG: -c --config [JSON] "Synthesis configuration json")
        (@arg VERBOSE: -v --verbose [VERBOSITY] default_value("0") "Level of verbosity \
           0 - warnings
           1 - progress
           2 - per transition results
           3 - LP search tracing
           ")
    ).get_matches();

    let level = match matches.value_of("VERBOSE").unwrap_or("0") {
        "0" => LevelFilter::Warn,
        "1" => LevelFilter::Info,
        "2" => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    env_logger::Builder::new().filter_level(level).init();

    let input = read_game_json(matches.value_of("GAME").ok_or("missing game model")?)?;
    let target = match matches.value_of("TARGET") {
        Some(t) => parse_vector(t)?,
        None => input.target.clone().ok_or("no target vector given")?,
    };
    let config = match matches.value_of("CONFIG") {
        Some(path) => read_config_json(path)?,
        None => SynthesisConfig::default(),
    };

    let game = input.game();
    let state_polytopes = input.state_polytopes();
    let branch_polytopes = input.branch_polytopes();
    let synthesis_input = SynthesisInput {
        game: &game,
        state_polytopes: &state_polytopes,
        branch_polytopes: &branch_polytopes,
        rewards: &input.rewards,
    };

    let start = Instant::now();
    let mut mdp = MultiMdp::build(&synthesis_input, &target, &MinilpSolver, &config)?;
    log::info!("build time: {:?}", start.elapsed());
    let (num_states, num_choices) = mdp.statistics();
    println!("augmented states: {}, choices: {}", num_states, num_choices);
    println!("initial distribution: {}", mdp.initial_distribution());

    if let Some(v) = matches.value_of("RECOMPUTE") {
        let v = parse_vector(v)?;
        if mdp.recompute_initial(&v, &MinilpSolver, &config.cancel)? {
            println!("recomputed initial distribution: {}", mdp.initial_distribution());
        }
    }

    if let Some(path) = matches.value_of("GRAPH") {
        let g = mdp.generate_graph();
        let dot = format!("{}", Dot::new(&g));
        let mut file = File::create(path)?;
        file.write_all(dot.as_bytes())?;
    }

    let samples: usize = matches.value_of("SAMPLES").unwrap_or("0").parse()?;
    if samples > 0 {
        let mut rng = rand::thread_rng();
        let paths = simulate(&mdp, samples, &config, &mut rng)?;
        match matches.value_of("PATHS") {
            Some(csv_path) => write_paths_csv(csv_path, &paths)?,
            None => {
                for path in paths.iter() {
                    println!("{}", path.iter().join(" -> "));
                }
            }
        }
    }
    Ok(())
}
