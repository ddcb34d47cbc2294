//! The genetic encoding of one candidate network: an innovation-ordered list of connection
//! genes over a shared [BaseTemplate].

pub mod connection;
pub mod innogen;
pub mod template;

pub use connection::ConnectionGene;
pub use innogen::InnoGen;
pub use template::BaseTemplate;

use crate::{
    constants::NEATGEN_STRUCTURAL_ATTEMPTS,
    random::{uniform, EvolutionEvent, Happens},
    Stats,
};
use core::{fmt, ops::RangeInclusive};
use rand::{Rng, RngCore};
use std::sync::Arc;

pub type GenomeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Sensory,
    Action,
    Internal,
    Static,
}

impl NodeKind {
    /// Coarse layer index, 0 for sensory and bias nodes, 1 for internal nodes and 2 for actions
    #[inline]
    pub fn layer(&self) -> usize {
        match self {
            Self::Sensory | Self::Static => 0,
            Self::Internal => 1,
            Self::Action => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Genome {
    id: GenomeId,
    template: Arc<BaseTemplate>,
    connections: Vec<ConnectionGene>,
    hidden: usize,
    /// score of the most recent evaluation, NaN until evaluated
    pub fitness: f64,
}

impl Genome {
    /// A genome with no internal nodes and no connections
    pub fn new(id: GenomeId, template: Arc<BaseTemplate>) -> Self {
        Self::with_hidden(id, template, 0)
    }

    pub fn with_hidden(id: GenomeId, template: Arc<BaseTemplate>, hidden: usize) -> Self {
        Self {
            id,
            template,
            connections: vec![],
            hidden,
            fitness: f64::NAN,
        }
    }

    /// A genome holding `connections`, normalized by [Genome::cleanup]
    pub fn from_connections(
        id: GenomeId,
        template: Arc<BaseTemplate>,
        connections: Vec<ConnectionGene>,
    ) -> Self {
        let mut genome = Self {
            id,
            template,
            connections,
            hidden: 0,
            fitness: f64::NAN,
        };
        genome.cleanup();
        genome
    }

    /// A copy of this genome's structure and weights under a new id, not yet evaluated
    pub fn clone_as(&self, id: GenomeId) -> Self {
        Self {
            id,
            template: self.template.clone(),
            connections: self.connections.clone(),
            hidden: self.hidden,
            fitness: f64::NAN,
        }
    }

    #[inline]
    pub fn id(&self) -> GenomeId {
        self.id
    }

    #[inline]
    pub fn template(&self) -> &Arc<BaseTemplate> {
        &self.template
    }

    #[inline]
    pub fn connections(&self) -> &[ConnectionGene] {
        &self.connections
    }

    #[inline]
    pub fn hidden(&self) -> usize {
        self.hidden
    }

    pub fn total_nodes(&self) -> usize {
        self.template.inputs()
            + self.template.outputs()
            + self.hidden
            + usize::from(self.template.has_bias())
    }

    /// Every node id of this genome, empty if it has no nodes at all
    pub fn node_ids(&self) -> RangeInclusive<usize> {
        let first = self.template.first_id();
        let last = self.template.inputs() + self.template.outputs() + self.hidden;
        if last < first {
            #[allow(clippy::reversed_empty_ranges)]
            return 1..=0;
        }
        first..=last
    }

    pub fn kind_of(&self, node: usize) -> NodeKind {
        if node == 0 {
            NodeKind::Static
        } else if node <= self.template.inputs() {
            NodeKind::Sensory
        } else if node <= self.template.inputs() + self.template.outputs() {
            NodeKind::Action
        } else {
            NodeKind::Internal
        }
    }

    #[inline]
    pub fn layer_of(&self, node: usize) -> usize {
        self.kind_of(node).layer()
    }

    pub fn has_connection(&self, from: usize, to: usize) -> bool {
        self.connections
            .iter()
            .any(|c| c.from() == from && c.to() == to)
    }

    /// (internal nodes, connections)
    pub fn complexity(&self) -> (usize, usize) {
        (self.hidden, self.connections.len())
    }

    /// Recount internal nodes from the highest node id any gene references
    pub fn count_hidden(&mut self) {
        let highest = self
            .connections
            .iter()
            .fold(0, |acc, c| acc.max(c.from()).max(c.to()));
        self.hidden =
            highest.saturating_sub(self.template.inputs() + self.template.outputs());
    }

    /// Sort genes by innovation id and recount internal nodes. Must follow any structural edit.
    pub fn cleanup(&mut self) {
        self.connections.sort_by_key(|c| c.inno());
        self.count_hidden();
    }

    /// Insert a gene at its innovation-ordered position
    pub fn insert_gene(&mut self, gene: ConnectionGene) {
        let base = self.template.inputs() + self.template.outputs();
        self.hidden = self
            .hidden
            .max(gene.from().max(gene.to()).saturating_sub(base));
        let at = self.connections.partition_point(|c| c.inno() < gene.inno());
        self.connections.insert(at, gene);
    }

    /// Allocate a new internal node, returning its id
    pub fn add_hidden_node(&mut self) -> usize {
        let id = self.template.internal_start() + self.hidden;
        self.hidden += 1;
        id
    }

    /// Whether `from -> to` may be added: not a self loop, not already present in either
    /// direction, not into the sensory layer, and not backwards into an earlier layer.
    pub fn is_valid_connection(&self, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        if self.has_connection(from, to) || self.has_connection(to, from) {
            return false;
        }
        let (l_from, l_to) = (self.layer_of(from), self.layer_of(to));
        l_to != 0 && l_to >= l_from
    }

    /// Look for an open path, giving up after a fixed number of attempts
    pub fn open_path(&self, rng: &mut impl RngCore) -> Option<(usize, usize)> {
        let ids = self.node_ids();
        if ids.is_empty() {
            return None;
        }
        (0..NEATGEN_STRUCTURAL_ATTEMPTS).find_map(|_| {
            let from = rng.random_range(ids.clone());
            let to = rng.random_range(ids.clone());
            self.is_valid_connection(from, to).then_some((from, to))
        })
    }

    /// Add a connection with a uniform weight in `[-strength, strength]` along some open
    /// path. Returns false, changing nothing, if no open path was found.
    pub fn new_connection(
        &mut self,
        rng: &mut impl RngCore,
        inno: &mut InnoGen,
        strength: f64,
    ) -> bool {
        let Some((from, to)) = self.open_path(rng) else {
            return false;
        };
        let weight = uniform(rng, strength);
        self.insert_gene(ConnectionGene::minted(from, to, weight, inno));
        true
    }

    /// Split a random enabled connection with a new internal node. Returns false, changing
    /// nothing, if no enabled connection was found.
    pub fn bisect_connection(&mut self, rng: &mut impl RngCore, inno: &mut InnoGen) -> bool {
        if self.connections.is_empty() {
            return false;
        }
        let len = self.connections.len();
        let Some(idx) = (0..NEATGEN_STRUCTURAL_ATTEMPTS)
            .map(|_| rng.random_range(0..len))
            .find(|idx| self.connections[*idx].enabled())
        else {
            return false;
        };

        let center = self.add_hidden_node();
        let (l, r) = self.connections[idx].bisect(center, inno);
        self.insert_gene(l);
        self.insert_gene(r);
        true
    }

    /// Perturb every weight of this genome, and maybe toggle each gene
    pub fn mutate_weights(&mut self, rng: &mut impl RngCore, stats: &Stats) {
        for c in self.connections.iter_mut() {
            if rng.happens_evt(stats, EvolutionEvent::RandomizeWeight) {
                c.weight = uniform(rng, stats.weight_randomize_strength);
            } else {
                c.weight += uniform(rng, stats.weight_shift_strength);
            }

            if rng.happens_evt(stats, EvolutionEvent::ToggleConnection) {
                c.toggle();
            }
        }
    }
}

impl fmt::Display for Genome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Genome {}, hidden nodes: {}, connections: {}",
            self.id,
            self.hidden,
            self.connections.len()
        )?;
        writeln!(f, "Fitness: {}", self.fitness)?;
        for c in self.connections.iter() {
            writeln!(
                f,
                "|{:>4} | {:>3} -> {:<3} | {:>+7.2} |{}",
                c.inno(),
                c.from(),
                c.to(),
                c.weight(),
                if c.enabled() { "" } else { " D" }
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{new_t, random::WyRng, test_t};
    use rand::{rngs::StdRng, SeedableRng};

    fn template(bias: bool, inputs: usize, outputs: usize) -> Arc<BaseTemplate> {
        Arc::new(BaseTemplate::new(bias, inputs, outputs))
    }

    fn is_sorted(genome: &Genome) -> bool {
        genome
            .connections()
            .windows(2)
            .all(|w| w[0].inno() <= w[1].inno())
    }

    #[test]
    fn test_genome_creation() {
        let genome = Genome::new(7, template(true, 3, 2));
        assert_eq!(genome.id(), 7);
        assert_eq!(genome.hidden(), 0);
        assert_eq!(genome.total_nodes(), 6);
        assert_eq!(genome.node_ids(), 0..=5);
        assert!(genome.fitness.is_nan());
        assert!(matches!(genome.kind_of(0), NodeKind::Static));
        assert!(matches!(genome.kind_of(3), NodeKind::Sensory));
        assert!(matches!(genome.kind_of(4), NodeKind::Action));
        assert!(matches!(genome.kind_of(6), NodeKind::Internal));

        let genome = Genome::new(0, template(false, 2, 1));
        assert_eq!(genome.total_nodes(), 3);
        assert_eq!(genome.node_ids(), 1..=3);
        assert!(matches!(genome.kind_of(1), NodeKind::Sensory));
    }

    #[test]
    fn test_genome_creation_empty() {
        let genome = Genome::new(0, template(false, 0, 0));
        assert_eq!(genome.total_nodes(), 0);
        assert!(genome.node_ids().is_empty());
        assert_eq!(genome.open_path(&mut WyRng::seeded(0)), None);
    }

    #[test]
    fn test_layers() {
        let genome = Genome::with_hidden(0, template(true, 2, 1), 2);
        assert_eq!(genome.layer_of(0), 0);
        assert_eq!(genome.layer_of(2), 0);
        assert_eq!(genome.layer_of(3), 2);
        assert_eq!(genome.layer_of(4), 1);
        assert_eq!(genome.layer_of(5), 1);
    }

    #[test]
    fn test_cleanup_sorts_and_counts() {
        let genome = Genome::from_connections(
            0,
            template(true, 2, 1),
            vec![
                ConnectionGene::new(4, 5, 3, 1., true),
                ConnectionGene::new(0, 1, 3, 1., true),
                ConnectionGene::new(2, 1, 5, 1., true),
            ],
        );
        assert!(is_sorted(&genome));
        assert_eq!(genome.hidden(), 2);
        assert_eq!(genome.complexity(), (2, 3));
    }

    #[test]
    fn test_count_hidden_without_genes() {
        let mut genome = Genome::with_hidden(0, template(true, 2, 1), 3);
        genome.count_hidden();
        assert_eq!(genome.hidden(), 0);
    }

    #[test]
    fn test_insert_gene_ordered() {
        let mut genome = Genome::new(0, template(true, 2, 2));
        for inno in [5, 1, 3, 0, 4] {
            genome.insert_gene(ConnectionGene::new(inno, 1, 3, 0., true));
        }
        assert!(is_sorted(&genome));
        assert_eq!(
            genome.connections().iter().map(|c| c.inno()).collect::<Vec<_>>(),
            vec![0, 1, 3, 4, 5]
        );
    }

    #[test]
    fn test_add_hidden_node() {
        let mut genome = Genome::new(0, template(true, 2, 1));
        assert_eq!(genome.add_hidden_node(), 4);
        assert_eq!(genome.add_hidden_node(), 5);

        let mut genome = Genome::new(0, template(false, 2, 1));
        assert_eq!(genome.add_hidden_node(), 4);
        assert_eq!(genome.hidden(), 1);
    }

    #[test]
    fn test_valid_connection() {
        let mut genome = Genome::with_hidden(0, template(true, 1, 1), 1);
        genome.insert_gene(ConnectionGene::new(0, 1, 2, 1., true));

        assert!(!genome.is_valid_connection(1, 1), "self loop");
        assert!(!genome.is_valid_connection(1, 2), "duplicate");
        assert!(!genome.is_valid_connection(2, 1), "reverse");
        assert!(!genome.is_valid_connection(3, 0), "into bias");
        assert!(!genome.is_valid_connection(3, 1), "into sensory");
        assert!(!genome.is_valid_connection(2, 3), "action into internal");
        assert!(genome.is_valid_connection(0, 2));
        assert!(genome.is_valid_connection(1, 3));
        assert!(genome.is_valid_connection(3, 2));
    }

    test_t!(
    open_path[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(3);
        let mut genome = Genome::new(0, template(true, 1, 1));

        for _ in 0..100 {
            match genome.open_path(&mut rng) {
                Some((0, 2)) | Some((1, 2)) => {}
                Some(p) => unreachable!("invalid pair {p:?} gen'd"),
                None => unreachable!("no path gen'd"),
            }
        }

        genome.insert_gene(ConnectionGene::new(0, 0, 2, 1., true));
        for _ in 0..100 {
            assert_eq!(genome.open_path(&mut rng), Some((1, 2)));
        }

        genome.insert_gene(ConnectionGene::new(1, 1, 2, 1., true));
        assert_eq!(genome.open_path(&mut rng), None);
    });

    test_t!(
    new_connection[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(4);
        let mut inno = InnoGen::new(0);
        let mut genome = Genome::with_hidden(0, template(true, 4, 4), 0);
        genome.insert_gene(ConnectionGene::minted(1, 5, 1., &mut inno));
        genome.insert_gene(ConnectionGene::minted(2, 6, 1., &mut inno));

        let before = genome.clone();
        assert!(genome.new_connection(&mut rng, &mut inno, 2.));
        assert_eq!(genome.connections().len(), before.connections().len() + 1);

        let added = genome
            .connections()
            .iter()
            .find(|c| !before.connections().contains(c))
            .unwrap();
        assert!(!before.connections().iter().any(|c| c.path() == added.path()));
        assert!((-2. ..=2.).contains(&added.weight()));
        assert!(is_sorted(&genome));
    });

    test_t!(
    new_connection_never_invalid[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(5);
        let mut inno = InnoGen::new(0);
        let mut genome = Genome::new(0, template(true, 3, 2));
        for _ in 0..50 {
            let snapshot = genome.clone();
            if genome.new_connection(&mut rng, &mut inno, 1.) {
                let added = genome
                    .connections()
                    .iter()
                    .find(|c| !snapshot.has_connection(c.from(), c.to()))
                    .unwrap();
                assert!(snapshot.is_valid_connection(added.from(), added.to()));
                assert_ne!(genome.layer_of(added.to()), 0);
            }
            if rng.happens(0.3) {
                genome.bisect_connection(&mut rng, &mut inno);
            }
            assert!(is_sorted(&genome));
        }
    });

    #[test]
    fn test_new_connection_saturated() {
        let mut inno = InnoGen::new(0);
        let mut genome = Genome::new(0, template(false, 1, 1));
        genome.insert_gene(ConnectionGene::minted(1, 2, 1., &mut inno));
        let before = genome.clone();
        assert!(!genome.new_connection(&mut WyRng::seeded(9), &mut inno, 1.));
        assert_eq!(genome.connections(), before.connections());
    }

    #[test]
    fn test_bisect_connection() {
        let mut inno = InnoGen::new(1);
        let mut genome = Genome::new(0, template(false, 0, 1));
        genome.insert_gene(ConnectionGene::new(0, 0, 1, 2., true));

        assert!(genome.bisect_connection(&mut WyRng::seeded(0), &mut inno));

        let c = genome.connections();
        assert_eq!(c.len(), 3);
        assert!(!c[0].enabled());
        assert_eq!(c[0].path(), (0, 1));

        assert_eq!(c[1].path(), (0, 2));
        assert_eq!(c[1].weight(), 1.);
        assert!(c[1].enabled());
        assert_eq!(c[1].inno(), inno.path((0, 2)));

        assert_eq!(c[2].path(), (2, 1));
        assert_eq!(c[2].weight(), 2.);
        assert!(c[2].enabled());
        assert_eq!(c[2].inno(), inno.path((2, 1)));

        assert_eq!(genome.hidden(), 1);
    }

    #[test]
    fn test_bisect_between_actions() {
        let mut inno = InnoGen::new(1);
        let mut genome = Genome::new(0, template(true, 2, 2));
        genome.insert_gene(ConnectionGene::new(0, 3, 4, 1., true));
        assert!(genome.bisect_connection(&mut WyRng::seeded(0), &mut inno));

        // the first half runs from the action layer back to an internal node
        let c = genome.connections();
        assert_eq!(c[1].path(), (3, 5));
        assert_eq!((genome.layer_of(3), genome.layer_of(5)), (2, 1));
        assert_eq!(c[2].path(), (5, 4));
        assert!(c.iter().all(|c| genome.layer_of(c.to()) != 0));
        assert!(genome.network().calculate_inputs(&[1., 1.]).is_ok());
    }

    #[test]
    fn test_bisect_connection_none_enabled() {
        let mut inno = InnoGen::new(0);
        let mut genome = Genome::new(0, template(true, 1, 1));
        assert!(!genome.bisect_connection(&mut WyRng::seeded(0), &mut inno));

        genome.insert_gene(ConnectionGene::new(0, 1, 2, 1., false));
        assert!(!genome.bisect_connection(&mut WyRng::seeded(0), &mut inno));
        assert_eq!(genome.connections().len(), 1);
        assert_eq!(genome.hidden(), 0);
    }

    test_t!(
    mutate_weights[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(6);
        let mut genome = Genome::from_connections(
            0,
            template(true, 2, 1),
            (0..3).map(|i| ConnectionGene::new(i, i as usize, 3, 0., true)).collect(),
        );

        let shift = new_t!(Stats, weight_randomize_probability = 0., weight_shift_strength = 0.1);
        genome.mutate_weights(&mut rng, &shift);
        assert!(genome.connections().iter().all(|c| c.weight().abs() <= 0.1));
        assert!(genome.connections().iter().all(|c| c.enabled()));

        let replace = new_t!(
            Stats,
            weight_randomize_probability = 1.,
            weight_randomize_strength = 5.,
            toggle_connection_probability = 1.
        );
        genome.mutate_weights(&mut rng, &replace);
        assert!(genome.connections().iter().all(|c| c.weight().abs() <= 5.));
        assert!(genome.connections().iter().all(|c| !c.enabled()));
    });

    #[test]
    fn test_display() {
        let genome = Genome::from_connections(
            3,
            template(true, 1, 1),
            vec![ConnectionGene::new(0, 1, 2, 0.5, false)],
        );
        let s = genome.to_string();
        assert!(s.starts_with("Genome 3, hidden nodes: 0, connections: 1"));
        assert!(s.contains(" D"));
    }
}
