//! Read-only summaries of a finished generation, for archiving or display by a caller.

use crate::{
    genome::{Genome, GenomeId},
    specie::{Specie, SpecieId},
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpecieSummary {
    pub id: SpecieId,
    pub size: usize,
    pub age: usize,
    pub average_fitness: f64,
    pub max_fitness: f64,
    /// generations since the specie's best fitness last improved
    pub stagnation: usize,
}

impl SpecieSummary {
    pub fn new(specie: &Specie, generation: usize) -> Self {
        Self {
            id: specie.id(),
            size: specie.len(),
            age: specie.age(),
            average_fitness: specie.average_fitness(),
            max_fitness: specie.max_fitness(),
            stagnation: specie.stagnation(generation),
        }
    }
}

/// The state of a population after one generation. Nothing is retained between snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub generation: usize,
    pub population: usize,
    pub species: Vec<SpecieSummary>,
    pub mean_fitness: f64,
    pub best_genome: Option<GenomeId>,
    pub best_fitness: f64,
    pub mean_hidden: f64,
    /// structural mutations that found nowhere to apply while producing this generation
    pub stalled_mutations: usize,
}

impl Snapshot {
    pub fn new(generation: usize, species: &[Specie], stalled_mutations: usize) -> Self {
        let members = || species.iter().flat_map(|s| s.members.iter());
        let population = members().count();
        let mean = |f: fn(&Genome) -> f64| {
            if population == 0 {
                0.
            } else {
                members().map(f).sum::<f64>() / population as f64
            }
        };
        let best = members()
            .filter(|g| !g.fitness.is_nan())
            .reduce(|best, g| if g.fitness > best.fitness { g } else { best });

        Self {
            generation,
            population,
            species: species
                .iter()
                .map(|s| SpecieSummary::new(s, generation))
                .collect(),
            mean_fitness: mean(|g| g.fitness),
            best_genome: best.map(|g| g.id()),
            best_fitness: best.map_or(f64::NAN, |g| g.fitness),
            mean_hidden: mean(|g| g.hidden() as f64),
            stalled_mutations,
        }
    }
}
