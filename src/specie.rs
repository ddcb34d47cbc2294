//! Species: clusters of genomes compatible with a shared representative.

use crate::{
    genome::{ConnectionGene, Genome, GenomeId},
    Stats,
};
use rand::{seq::IndexedRandom, RngCore};

pub type SpecieId = u64;

/// The member a specie measures compatibility against. Keeps a copy of its genes so the
/// specie can still be matched once the member itself has been discarded.
#[derive(Debug, Clone)]
pub struct SpecieRepr {
    id: GenomeId,
    connections: Vec<ConnectionGene>,
}

impl SpecieRepr {
    pub fn new(genome: &Genome) -> Self {
        Self {
            id: genome.id(),
            connections: genome.connections().to_vec(),
        }
    }

    /// id of the genome this representative was taken from
    #[inline]
    pub fn id(&self) -> GenomeId {
        self.id
    }
}

impl AsRef<[ConnectionGene]> for SpecieRepr {
    fn as_ref(&self) -> &[ConnectionGene] {
        &self.connections
    }
}

/// fitness as ranked within a specie, where an unevaluated genome ranks last
#[inline]
fn rank(fitness: f64) -> f64 {
    if fitness.is_nan() {
        f64::NEG_INFINITY
    } else {
        fitness
    }
}

#[derive(Debug, Clone)]
pub struct Specie {
    id: SpecieId,
    pub repr: SpecieRepr,
    pub members: Vec<Genome>,
    age: usize,
    max_fitness: f64,
    improved_at: usize,
}

impl Specie {
    /// A new specie of a single member, who also represents it
    pub fn new(id: SpecieId, founder: Genome, generation: usize) -> Self {
        Self {
            id,
            repr: SpecieRepr::new(&founder),
            max_fitness: rank(founder.fitness),
            improved_at: generation,
            members: vec![founder],
            age: 0,
        }
    }

    #[inline]
    pub fn id(&self) -> SpecieId {
        self.id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// generations this specie has been speciated into
    #[inline]
    pub fn age(&self) -> usize {
        self.age
    }

    /// best fitness any member has had
    #[inline]
    pub fn max_fitness(&self) -> f64 {
        self.max_fitness
    }

    /// generation where [Specie::max_fitness] was last raised
    #[inline]
    pub fn improved_at(&self) -> usize {
        self.improved_at
    }

    /// generations elapsed since [Specie::max_fitness] was last raised
    #[inline]
    pub fn stagnation(&self, generation: usize) -> usize {
        generation.saturating_sub(self.improved_at)
    }

    /// The representative, if it is still a current member
    pub fn representative(&self) -> Option<&Genome> {
        self.members.iter().find(|g| g.id() == self.repr.id())
    }

    /// Add a member, recording an improvement of the specie's best fitness
    pub fn add(&mut self, genome: Genome, generation: usize) {
        if rank(genome.fitness) > self.max_fitness {
            self.max_fitness = genome.fitness;
            self.improved_at = generation;
        }
        self.members.push(genome);
    }

    pub fn grow_older(&mut self) {
        self.age += 1;
    }

    /// Sort members by descending fitness, keeping the order of equally fit members
    pub fn sort_by_fitness(&mut self) {
        self.members
            .sort_by(|l, r| rank(r.fitness).total_cmp(&rank(l.fitness)));
    }

    /// Sort members, and keep only as many of the fittest as `stats` lets survive
    pub fn cull(&mut self, stats: &Stats) {
        self.sort_by_fitness();
        self.members.truncate(stats.survivors(self.members.len()));
    }

    /// The fittest member, or the first of them on a tie
    pub fn champion(&self) -> Option<&Genome> {
        self.members
            .iter()
            .reduce(|best, g| if rank(g.fitness) > rank(best.fitness) { g } else { best })
    }

    /// Mean member fitness, 0 for an empty specie
    pub fn average_fitness(&self) -> f64 {
        if self.members.is_empty() {
            return 0.;
        }
        self.members.iter().map(|g| g.fitness).sum::<f64>() / self.members.len() as f64
    }

    /// Draw a new representative among the current members. An empty specie keeps its last one.
    pub fn assign_random_repr(&mut self, rng: &mut impl RngCore) {
        if let Some(genome) = self.members.choose(rng) {
            self.repr = SpecieRepr::new(genome);
        }
    }
}
