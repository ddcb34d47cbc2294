#![allow(mixed_script_confusables)]
#![allow(confusable_idents)]

mod macros;

pub mod constants;
pub mod crossover;
pub mod error;
pub mod genome;
pub mod network;
pub mod population;
pub mod random;
pub mod report;
pub mod reproduce;
pub mod scenario;
pub mod specie;
pub mod stats;
pub mod trainer;

pub use error::NeatError;
pub use genome::{BaseTemplate, ConnectionGene, Genome, GenomeId, InnoGen, NodeKind};
pub use network::{activate, Network, NeuralNetwork};
pub use population::Neat;
pub use random::{Happens, Probabilities, WyRng};
pub use report::Snapshot;
pub use scenario::{evolve, EvolutionTarget, Hook, Scenario};
pub use specie::{Specie, SpecieRepr};
pub use stats::{ConfigError, Stats};
pub use trainer::{Context, Trainer, View};
