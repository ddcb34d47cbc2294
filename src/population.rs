//! The population controller: owns every genome of a run, partitioned into species, and drives
//! the generation lifecycle.

use crate::{
    error::NeatError,
    genome::{Genome, GenomeId},
    random::WyRng,
    report::Snapshot,
    reproduce::{offspring_for_specie, population_alloc},
    specie::{Specie, SpecieId},
    stats::ConfigError,
    trainer::{Context, Trainer, View},
    Stats,
};
use fxhash::FxHashMap;
use rand::{RngCore, SeedableRng};
use tracing::{debug, info};

pub struct Neat<T: Trainer, R: RngCore = WyRng> {
    trainer: T,
    ctx: Context<R>,
    preferred: usize,
    species: Vec<Specie>,
    fitnesses: FxHashMap<GenomeId, f64>,
    generation: Option<usize>,
    specie_head: SpecieId,
    stalled: usize,
}

impl<T: Trainer> Neat<T, WyRng> {
    /// A controller whose every random decision follows from `seed`
    pub fn seeded(
        preferred: usize,
        trainer: T,
        stats: Stats,
        seed: u64,
    ) -> Result<Self, NeatError> {
        Self::new(preferred, trainer, stats, WyRng::seed_from_u64(seed))
    }
}

impl<T: Trainer, R: RngCore> Neat<T, R> {
    pub fn new(preferred: usize, trainer: T, stats: Stats, rng: R) -> Result<Self, NeatError> {
        stats.validate()?;
        if preferred == 0 {
            return Err(ConfigError::PopulationSize.into());
        }

        Ok(Self {
            trainer,
            ctx: Context::new(stats, rng),
            preferred,
            species: vec![],
            fitnesses: FxHashMap::default(),
            generation: None,
            specie_head: 0,
            stalled: 0,
        })
    }

    /// Seed, score and speciate the first generation. May only be called once.
    pub fn initialize(&mut self) -> Result<(), NeatError> {
        if self.generation.is_some() {
            return Err(NeatError::AlreadyInitialized);
        }

        let population = (0..self.preferred)
            .map(|_| self.trainer.random_genome(&mut self.ctx))
            .collect();
        let population = self.evaluate(population)?;
        self.speciate(population, 0);
        self.finish(0);
        Ok(())
    }

    /// Breed the next generation from the current one, then score and speciate it.
    ///
    /// Every specie is culled down to its fittest members, and its champion carried over as
    /// is. The rest of the population is apportioned between species by average fitness and
    /// bred from the survivors, and any shortfall is filled with random genomes.
    ///
    /// On error, the current generation is left untouched.
    pub fn run_generation(&mut self) -> Result<(), NeatError> {
        let finished = self.generation.ok_or(NeatError::NotInitialized)?;
        let generation = finished + 1;
        let stats = self.ctx.stats().clone();

        let mut survivors = self.species.clone();
        for specie in survivors.iter_mut() {
            specie.cull(&stats);
        }

        let mut population = survivors
            .iter()
            .filter_map(Specie::champion)
            .cloned()
            .collect::<Vec<_>>();
        debug!(champions = population.len(), "carried over champions");
        if population.len() > self.preferred {
            population.sort_by(|l, r| r.fitness.total_cmp(&l.fitness));
            population.truncate(self.preferred);
        }

        survivors.sort_by(|l, r| r.average_fitness().total_cmp(&l.average_fitness()));
        let best = survivors
            .iter()
            .filter_map(Specie::champion)
            .reduce(|best, g| if g.fitness > best.fitness { g } else { best })
            .map(Genome::id);
        let averages = survivors
            .iter()
            .map(|s| {
                let stagnant = stats
                    .stagnation_limit
                    .is_some_and(|limit| s.stagnation(finished) > limit);
                let holds_best = best.is_some_and(|id| s.members.iter().any(|g| g.id() == id));
                (!stagnant || holds_best).then(|| s.average_fitness())
            })
            .collect::<Vec<_>>();

        let needed = self.preferred.saturating_sub(population.len());
        for (idx, quota) in population_alloc(&averages, needed).into_iter().enumerate() {
            population.extend(offspring_for_specie(
                &self.trainer,
                &mut self.ctx,
                &survivors,
                idx,
                quota,
            )?);
        }

        while population.len() < self.preferred {
            population.push(self.trainer.random_genome(&mut self.ctx));
        }

        for specie in survivors.iter_mut() {
            specie.assign_random_repr(&mut self.ctx.rng);
            specie.members.clear();
        }

        let population = self.evaluate(population)?;
        self.species = survivors;
        self.speciate(population, generation);
        self.finish(generation);
        Ok(())
    }

    /// Score `genomes`, replacing every fitness known so far
    fn evaluate(&mut self, mut genomes: Vec<Genome>) -> Result<Vec<Genome>, NeatError> {
        let view = View {
            generation: self.generation,
            species: &self.species,
        };
        let scores = self.trainer.fitnesses(&genomes, &view);
        if scores.len() != genomes.len() {
            return Err(NeatError::FitnessLength {
                expected: genomes.len(),
                got: scores.len(),
            });
        }

        self.fitnesses.clear();
        for (genome, fitness) in genomes.iter_mut().zip(scores) {
            genome.fitness = fitness;
            self.fitnesses.insert(genome.id(), fitness);
        }
        Ok(genomes)
    }

    /// Place each genome into the first specie it's similar to, or found a new one
    fn speciate(&mut self, genomes: Vec<Genome>, generation: usize) {
        for genome in genomes {
            match self.species.iter_mut().find(|s| {
                self.trainer
                    .similar(s.repr.as_ref(), genome.connections(), self.ctx.stats())
            }) {
                Some(specie) => specie.add(genome, generation),
                None => {
                    let id = self.specie_head;
                    self.specie_head += 1;
                    debug!(specie = id, generation, "new specie");
                    self.species.push(Specie::new(id, genome, generation));
                }
            }
        }

        for specie in self.species.iter_mut() {
            specie.grow_older();
        }

        self.species.retain(|s| {
            if s.is_empty() {
                debug!(specie = s.id(), generation, "specie went extinct");
            }
            !s.is_empty()
        });
    }

    fn finish(&mut self, generation: usize) {
        self.generation = Some(generation);
        self.stalled = self.ctx.stalled_mutations();
        self.ctx.next_generation();

        info!(
            generation,
            species = self.species.len(),
            best = self.fittest().map_or(f64::NAN, |g| g.fitness),
            mean = self.mean_fitness(),
            "generation finished"
        );
    }

    fn mean_fitness(&self) -> f64 {
        match self.size() {
            0 => 0.,
            n => self.population().map(|g| g.fitness).sum::<f64>() / n as f64,
        }
    }

    /// Every genome of the current generation, grouped by specie
    pub fn population(&self) -> impl Iterator<Item = &Genome> {
        self.species.iter().flat_map(|s| s.members.iter())
    }

    #[inline]
    pub fn species(&self) -> &[Specie] {
        &self.species
    }

    /// fitness of a genome of the current generation
    pub fn fitness_of(&self, id: GenomeId) -> Option<f64> {
        self.fitnesses.get(&id).copied()
    }

    pub fn size(&self) -> usize {
        self.species.iter().map(Specie::len).sum()
    }

    pub fn contains(&self, id: GenomeId) -> bool {
        self.population().any(|g| g.id() == id)
    }

    /// last finished generation, `None` before [Neat::initialize]
    #[inline]
    pub fn generation(&self) -> Option<usize> {
        self.generation
    }

    /// The fittest genome of the current generation, the first found on a tie
    pub fn fittest(&self) -> Option<&Genome> {
        self.population()
            .filter(|g| !g.fitness.is_nan())
            .reduce(|best, g| if g.fitness > best.fitness { g } else { best })
    }

    #[inline]
    pub fn preferred_size(&self) -> usize {
        self.preferred
    }

    #[inline]
    pub fn stats(&self) -> &Stats {
        self.ctx.stats()
    }

    #[inline]
    pub fn trainer(&self) -> &T {
        &self.trainer
    }

    /// Summary of the last finished generation
    pub fn snapshot(&self) -> Result<Snapshot, NeatError> {
        let generation = self.generation.ok_or(NeatError::NotInitialized)?;
        Ok(Snapshot::new(generation, &self.species, self.stalled))
    }
}
