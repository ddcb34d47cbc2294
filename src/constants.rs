//! Centralized defaults for neatgen evolution parameters.
//!
//! All defaults are defined here with the `NEATGEN_` prefix, and are what a [crate::Stats]
//! starts out as before a caller overrides any field.

// ============================================================================
// Speciation Parameters
// ============================================================================

/// Coefficient for excess genes in compatibility distance calculation
pub const NEATGEN_EXCESS_COEFFICIENT: f64 = 1.0;

/// Coefficient for disjoint genes in compatibility distance calculation
pub const NEATGEN_DISJOINT_COEFFICIENT: f64 = 1.0;

/// Coefficient for average weight differences in compatibility distance calculation
pub const NEATGEN_WEIGHT_COEFFICIENT: f64 = 0.4;

/// Genetic distance threshold at or under which two genomes share a specie
pub const NEATGEN_DELTA_THRESHOLD: f64 = 3.0;

/// Genome size under which the distance normalization term is pinned to 1
pub const NEATGEN_NORMALIZATION_THRESHOLD: usize = 20;

// ============================================================================
// Reproduction Parameters
// ============================================================================

/// Fraction of every specie culled before reproduction
pub const NEATGEN_PERCENT_POPULATION_TO_KILL: f64 = 0.5;

/// Fraction of a specie's offspring produced by crossover, the rest are clones
pub const NEATGEN_PERCENT_OFFSPRING_FROM_CROSSOVER: f64 = 0.75;

/// Probability that the second crossover parent is drawn from any specie
pub const NEATGEN_CROSSOVER_INTERSPECIES_PROB: f64 = 0.001;

/// Probability of picking a matching gene from the fitter parent
pub const NEATGEN_CROSSOVER_PICK_FITTER_PROB: f64 = 0.5;

/// Probability that a matching gene disabled in exactly one parent is enabled in the child
pub const NEATGEN_CROSSOVER_ENABLE_PROB: f64 = 0.25;

// ============================================================================
// Mutation Parameters
// ============================================================================

/// Probability that a newly produced offspring is mutated at all
pub const NEATGEN_MUTATION_PROB: f64 = 1.0;

/// Probability of perturbing every connection weight of a genome
pub const NEATGEN_ALTER_ALL_WEIGHTS_PROB: f64 = 0.8;

/// Probability of replacing a weight instead of shifting it
pub const NEATGEN_WEIGHT_RANDOMIZE_PROB: f64 = 0.1;

/// Bound of the uniform draw used when replacing a weight
pub const NEATGEN_WEIGHT_RANDOMIZE_STRENGTH: f64 = 2.0;

/// Bound of the uniform delta used when shifting a weight
pub const NEATGEN_WEIGHT_SHIFT_STRENGTH: f64 = 0.02;

/// Probability of flipping the enabled flag of each connection while altering weights
pub const NEATGEN_TOGGLE_CONNECTION_PROB: f64 = 0.0;

/// Probability of adding a new connection
pub const NEATGEN_ADD_CONNECTION_PROB: f64 = 0.05;

/// Probability of bisecting a connection (adding a node)
pub const NEATGEN_ADD_NODE_PROB: f64 = 0.03;

/// Attempts made by a structural mutation before it gives up
pub const NEATGEN_STRUCTURAL_ATTEMPTS: usize = 100;
