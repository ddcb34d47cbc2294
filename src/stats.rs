//! Tunable knobs of a run. Purely data: a collaborator builds or deserializes one, and the
//! controller validates it once at construction.

use crate::{
    constants::*,
    random::{EvolutionEvent, Probabilities},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A specific field has an out-of-range or non-finite value.
    #[error("field '{field}' has invalid value {value}: {reason}")]
    InvalidField {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },

    #[error("preferred population size must be at least 1")]
    PopulationSize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stats {
    /// excess gene coefficient of the compatibility distance
    pub c1: f64,
    /// disjoint gene coefficient of the compatibility distance
    pub c2: f64,
    /// average weight difference coefficient of the compatibility distance
    pub c3: f64,
    /// two genomes whose distance is at most this share a specie
    pub delta_threshold: f64,

    pub percent_population_to_kill: f64,
    pub percent_offspring_from_crossover: f64,
    pub crossover_interspecies_probability: f64,

    pub weight_shift_strength: f64,
    pub weight_randomize_strength: f64,

    pub mutation_probability: f64,
    pub alter_all_weights_probability: f64,
    pub weight_randomize_probability: f64,
    pub add_connection_probability: f64,
    pub add_node_probability: f64,
    pub toggle_connection_probability: f64,

    /// Generations a specie may go without improving its best fitness before it stops being
    /// allotted offspring. `None` never penalizes stagnation.
    pub stagnation_limit: Option<usize>,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            c1: NEATGEN_EXCESS_COEFFICIENT,
            c2: NEATGEN_DISJOINT_COEFFICIENT,
            c3: NEATGEN_WEIGHT_COEFFICIENT,
            delta_threshold: NEATGEN_DELTA_THRESHOLD,
            percent_population_to_kill: NEATGEN_PERCENT_POPULATION_TO_KILL,
            percent_offspring_from_crossover: NEATGEN_PERCENT_OFFSPRING_FROM_CROSSOVER,
            crossover_interspecies_probability: NEATGEN_CROSSOVER_INTERSPECIES_PROB,
            weight_shift_strength: NEATGEN_WEIGHT_SHIFT_STRENGTH,
            weight_randomize_strength: NEATGEN_WEIGHT_RANDOMIZE_STRENGTH,
            mutation_probability: NEATGEN_MUTATION_PROB,
            alter_all_weights_probability: NEATGEN_ALTER_ALL_WEIGHTS_PROB,
            weight_randomize_probability: NEATGEN_WEIGHT_RANDOMIZE_PROB,
            add_connection_probability: NEATGEN_ADD_CONNECTION_PROB,
            add_node_probability: NEATGEN_ADD_NODE_PROB,
            toggle_connection_probability: NEATGEN_TOGGLE_CONNECTION_PROB,
            stagnation_limit: None,
        }
    }
}

impl Stats {
    /// Reject any knob a run could not sensibly use. Stops at the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("percent_population_to_kill", self.percent_population_to_kill),
            (
                "percent_offspring_from_crossover",
                self.percent_offspring_from_crossover,
            ),
            (
                "crossover_interspecies_probability",
                self.crossover_interspecies_probability,
            ),
            ("mutation_probability", self.mutation_probability),
            (
                "alter_all_weights_probability",
                self.alter_all_weights_probability,
            ),
            (
                "weight_randomize_probability",
                self.weight_randomize_probability,
            ),
            ("add_connection_probability", self.add_connection_probability),
            ("add_node_probability", self.add_node_probability),
            (
                "toggle_connection_probability",
                self.toggle_connection_probability,
            ),
        ] {
            if !(0. ..=1.).contains(&value) {
                return Err(ConfigError::InvalidField {
                    field,
                    value,
                    reason: "must be a probability between 0.0 and 1.0",
                });
            }
        }

        for (field, value) in [
            ("c1", self.c1),
            ("c2", self.c2),
            ("c3", self.c3),
            ("delta_threshold", self.delta_threshold),
            ("weight_shift_strength", self.weight_shift_strength),
            ("weight_randomize_strength", self.weight_randomize_strength),
        ] {
            if !value.is_finite() || value < 0. {
                return Err(ConfigError::InvalidField {
                    field,
                    value,
                    reason: "must be finite and non-negative",
                });
            }
        }

        Ok(())
    }

    /// How many of a specie's `size` sorted members survive culling. Never less than one for a
    /// non-empty specie, and equal to `size / 2 + 1` at the default kill rate.
    pub fn survivors(&self, size: usize) -> usize {
        if size == 0 {
            return 0;
        }
        let kept = (size as f64 * (1. - self.percent_population_to_kill)).floor() as usize + 1;
        kept.min(size)
    }
}

impl Probabilities for Stats {
    fn probability(&self, evt: EvolutionEvent) -> f64 {
        match evt {
            EvolutionEvent::Mutate => self.mutation_probability,
            EvolutionEvent::AlterWeights => self.alter_all_weights_probability,
            EvolutionEvent::RandomizeWeight => self.weight_randomize_probability,
            EvolutionEvent::ToggleConnection => self.toggle_connection_probability,
            EvolutionEvent::AddConnection => self.add_connection_probability,
            EvolutionEvent::AddNode => self.add_node_probability,
            EvolutionEvent::Interspecies => self.crossover_interspecies_probability,
        }
    }
}
