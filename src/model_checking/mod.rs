pub mod cancel;
pub mod combinations;
pub mod config;
pub mod decomposition;
pub mod error;
pub mod game;
pub mod helper_methods;
pub mod lp;
pub mod multi_mdp;
pub mod polytope;
pub mod simulation;
pub mod successors;
