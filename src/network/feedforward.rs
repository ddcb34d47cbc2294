use super::{activate::steep_sigmoid, Buffer, InputSource, Network};
use crate::{
    error::NeatError,
    genome::{BaseTemplate, Genome, NodeKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Pending,
    InProgress,
    Done,
}

/// The phenotype of a genome: an arena of nodes indexed by node id, each summing the weighted
/// activations of its enabled incoming connections. Values are computed lazily from the action
/// nodes back, every node at most once per [Network::calculate].
///
/// Evaluation assumes no cycles. A node reached again while it is still being computed
/// contributes 0.
#[derive(Debug, Clone)]
pub struct NeuralNetwork<S: InputSource = Buffer> {
    template: BaseTemplate,
    source: S,
    kinds: Vec<NodeKind>,
    incoming: Vec<Vec<(usize, f64)>>,
    state: Vec<f64>,
    visit: Vec<Visit>,
    output: Vec<f64>,
    σ: fn(f64) -> f64,
}

impl NeuralNetwork<Buffer> {
    pub fn new(genome: &Genome) -> Self {
        let inputs = genome.template().inputs();
        Self::with_source(genome, Buffer(vec![0.; inputs]))
    }

    /// Copy `inputs` into the network's buffer, then [Network::calculate]
    pub fn calculate_inputs(&mut self, inputs: &[f64]) -> Result<&[f64], NeatError> {
        if inputs.len() != self.template.inputs() {
            return Err(NeatError::InputLength {
                expected: self.template.inputs(),
                got: inputs.len(),
            });
        }
        self.source.0.clear();
        self.source.0.extend_from_slice(inputs);
        Ok(self.calculate())
    }
}

impl<S: InputSource> NeuralNetwork<S> {
    pub fn with_source(genome: &Genome, source: S) -> Self {
        let size = genome.template().internal_start() + genome.hidden();
        let mut incoming = vec![vec![]; size];
        for c in genome.connections().iter().filter(|c| c.enabled()) {
            incoming[c.to()].push((c.from(), c.weight()));
        }

        Self {
            template: **genome.template(),
            source,
            kinds: (0..size).map(|id| genome.kind_of(id)).collect(),
            incoming,
            state: vec![0.; size],
            visit: vec![Visit::Pending; size],
            output: vec![0.; genome.template().outputs()],
            σ: steep_sigmoid,
        }
    }

    /// Activate internal and action nodes with `σ` rather than [steep_sigmoid]
    pub fn with_activation(mut self, σ: fn(f64) -> f64) -> Self {
        self.σ = σ;
        self
    }

    #[inline]
    pub fn template(&self) -> &BaseTemplate {
        &self.template
    }

    #[inline]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Value of node `id` as of the last calculation
    pub fn activation(&self, id: usize) -> Option<f64> {
        self.state.get(id).copied()
    }

    pub fn kind_of(&self, id: usize) -> Option<NodeKind> {
        self.kinds.get(id).copied()
    }

    /// Ids of every node of `kind`
    pub fn nodes(&self, kind: NodeKind) -> impl Iterator<Item = usize> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .skip(self.template.first_id())
            .filter(move |(_, k)| **k == kind)
            .map(|(id, _)| id)
    }

    /// Every enabled connection, as (from, to, weight)
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.incoming
            .iter()
            .enumerate()
            .flat_map(|(to, edges)| edges.iter().map(move |(from, w)| (*from, to, *w)))
    }

    fn value(&mut self, id: usize) -> f64 {
        match self.visit[id] {
            Visit::Done => return self.state[id],
            Visit::InProgress => return 0.,
            Visit::Pending => self.visit[id] = Visit::InProgress,
        }

        let value = match self.kinds[id] {
            NodeKind::Static => {
                if self.template.has_bias() {
                    1.
                } else {
                    0.
                }
            }
            NodeKind::Sensory => self.source.input(id - 1),
            NodeKind::Action | NodeKind::Internal => {
                let mut sum = 0.;
                for edge in 0..self.incoming[id].len() {
                    let (from, w) = self.incoming[id][edge];
                    sum += self.value(from) * w;
                }
                (self.σ)(sum)
            }
        };

        self.state[id] = value;
        self.visit[id] = Visit::Done;
        value
    }
}

impl<S: InputSource> Network for NeuralNetwork<S> {
    fn calculate(&mut self) -> &[f64] {
        self.visit.fill(Visit::Pending);
        for (idx, id) in self.template.action().enumerate() {
            self.output[idx] = self.value(id);
        }
        &self.output
    }

    fn output(&self) -> &[f64] {
        &self.output
    }

    fn flush(&mut self) {
        self.state.fill(0.);
        self.visit.fill(Visit::Pending);
        self.output.fill(0.);
    }
}
