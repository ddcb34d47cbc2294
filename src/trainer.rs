//! The strategy a run is parameterized by: how genomes are scored, seeded, mutated and bred.
//! Only [Trainer::template] and [Trainer::fitness] must be provided, every genetic operator has
//! a default.

use crate::{
    crossover::{delta, offspring},
    genome::{BaseTemplate, ConnectionGene, Genome, GenomeId, InnoGen},
    random::{EvolutionEvent, Happens},
    specie::Specie,
    Stats,
};
use rand::RngCore;
use std::sync::Arc;
use tracing::trace;

/// Mutable run state the genetic operators draw from. Owned by the controller, and handed to a
/// [Trainer] for the duration of one operation.
#[derive(Debug)]
pub struct Context<R: RngCore> {
    stats: Stats,
    pub rng: R,
    pub innogen: InnoGen,
    genome_head: GenomeId,
    stalled: usize,
}

impl<R: RngCore> Context<R> {
    pub fn new(stats: Stats, rng: R) -> Self {
        Self {
            stats,
            rng,
            innogen: InnoGen::new(0),
            genome_head: 0,
            stalled: 0,
        }
    }

    #[inline]
    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// A genome id never handed out before by this context
    pub fn next_genome_id(&mut self) -> GenomeId {
        let id = self.genome_head;
        self.genome_head += 1;
        id
    }

    /// innovation id of the path `from -> to` for this generation
    pub fn innovation(&mut self, from: usize, to: usize) -> usize {
        self.innogen.path((from, to))
    }

    /// Roll for `evt` at the odds configured in [Context::stats]
    pub fn happens(&mut self, evt: EvolutionEvent) -> bool {
        self.rng.happens_evt(&self.stats, evt)
    }

    /// Record a structural mutation that found nowhere to apply
    pub fn stall(&mut self, mutation: &'static str) {
        self.stalled += 1;
        trace!(mutation, "structural mutation exhausted its attempts");
    }

    /// structural mutations stalled since the last [Context::next_generation]
    #[inline]
    pub fn stalled_mutations(&self) -> usize {
        self.stalled
    }

    /// Start a new generation, so paths minted from now on get fresh innovation ids
    pub fn next_generation(&mut self) {
        self.innogen.next_generation();
        self.stalled = 0;
    }
}

/// What a [Trainer] sees of the controller while scoring: the last finished generation and its
/// species. Both are empty while the first generation is scored.
#[derive(Debug, Clone, Copy, Default)]
pub struct View<'a> {
    pub generation: Option<usize>,
    pub species: &'a [Specie],
}

pub trait Trainer {
    /// The node layout every random genome is built on
    fn template(&self) -> &Arc<BaseTemplate>;

    /// Score one genome, higher is fitter. Scores should be positive, as offspring are
    /// apportioned by fitness.
    fn fitness(&self, genome: &Genome, view: &View<'_>) -> f64;

    /// Score a whole population, returning one score per genome in the same order
    fn fitnesses(&self, genomes: &[Genome], view: &View<'_>) -> Vec<f64> {
        genomes.iter().map(|g| self.fitness(g, view)).collect()
    }

    /// A minimal genome: the template's nodes, and a single random connection
    fn random_genome<R: RngCore>(&self, ctx: &mut Context<R>) -> Genome {
        let mut genome = Genome::new(ctx.next_genome_id(), self.template().clone());
        self.add_connection(&mut genome, ctx);
        genome.cleanup();
        genome
    }

    /// Perturb weights, then maybe grow a connection, then maybe grow a node
    fn mutate<R: RngCore>(&self, genome: &mut Genome, ctx: &mut Context<R>) {
        if ctx.happens(EvolutionEvent::AlterWeights) {
            genome.mutate_weights(&mut ctx.rng, &ctx.stats);
        }
        if ctx.happens(EvolutionEvent::AddConnection) && !self.add_connection(genome, ctx) {
            ctx.stall("add connection");
        }
        if ctx.happens(EvolutionEvent::AddNode) && !self.add_node(genome, ctx) {
            ctx.stall("add node");
        }
    }

    /// Add a randomly weighted connection along an open path, false if none was found
    fn add_connection<R: RngCore>(&self, genome: &mut Genome, ctx: &mut Context<R>) -> bool {
        let strength = ctx.stats.weight_randomize_strength;
        genome.new_connection(&mut ctx.rng, &mut ctx.innogen, strength)
    }

    /// Split an enabled connection with a new node, false if none was found
    fn add_node<R: RngCore>(&self, genome: &mut Genome, ctx: &mut Context<R>) -> bool {
        genome.bisect_connection(&mut ctx.rng, &mut ctx.innogen)
    }

    /// Breed a new genome, inheriting the structure of `fitter` alone
    fn crossover<R: RngCore>(
        &self,
        fitter: &Genome,
        other: &Genome,
        ctx: &mut Context<R>,
    ) -> Genome {
        let id = ctx.next_genome_id();
        offspring(id, fitter, other, &mut ctx.rng)
    }

    /// Whether two gene lists are close enough to share a specie
    fn similar(&self, l: &[ConnectionGene], r: &[ConnectionGene], stats: &Stats) -> bool {
        delta(l, r, stats.c1, stats.c2, stats.c3) <= stats.delta_threshold
    }
}

/// Score genomes in parallel, keeping their order. Meant to back [Trainer::fitnesses] when
/// scoring is expensive.
#[cfg(feature = "parallel")]
pub fn par_fitnesses<T: Trainer + Sync>(
    trainer: &T,
    genomes: &[Genome],
    view: &View<'_>,
) -> Vec<f64> {
    use rayon::prelude::*;

    genomes.par_iter().map(|g| trainer.fitness(g, view)).collect()
}
