//! Every failure the controller and phenotype surface to a caller.

use crate::stats::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NeatError {
    /// The [crate::Stats] or controller parameters were rejected at construction.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A fitness-weighted pick found no candidate. Every weight in the sampled set must be
    /// non-negative and their total positive; offset fitnesses before sampling if they aren't.
    #[error("weighted selection exhausted: total weight {total} across {candidates} candidates")]
    SelectionExhausted { total: f64, candidates: usize },

    #[error("population is already initialized")]
    AlreadyInitialized,

    #[error("population is not initialized")]
    NotInitialized,

    /// A batched fitness evaluation must return one score per genome, in order.
    #[error("fitness evaluation returned {got} scores for {expected} genomes")]
    FitnessLength { expected: usize, got: usize },

    #[error("network expects {expected} inputs, got {got}")]
    InputLength { expected: usize, got: usize },
}
