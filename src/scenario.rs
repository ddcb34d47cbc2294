//! A driver loop over [Neat], and a way to train on anything that can score a network.

use crate::{
    error::NeatError,
    genome::{BaseTemplate, Genome},
    network::NeuralNetwork,
    population::Neat,
    random::WyRng,
    trainer::{Trainer, View},
};
use core::ops::ControlFlow;
use rand::RngCore;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EvolutionTarget {
    /// stop once any genome scores at least this
    Fitness(f64),
    /// stop once this generation has finished
    Generation(usize),
}

impl EvolutionTarget {
    pub fn satisfied<T: Trainer, R: RngCore>(&self, neat: &Neat<T, R>) -> bool {
        match self {
            Self::Fitness(target) => neat.fittest().is_some_and(|g| g.fitness >= *target),
            Self::Generation(target) => neat.generation().is_some_and(|g| g >= *target),
        }
    }
}

/// Called after every finished generation. Breaking stops the run.
pub type Hook<'a, T, R = WyRng> = Box<dyn FnMut(&Neat<T, R>) -> ControlFlow<()> + 'a>;

/// Initialize `neat` if needed, then run generations until `target` is met or a hook breaks.
/// Returns the last finished generation.
pub fn evolve<T: Trainer, R: RngCore>(
    neat: &mut Neat<T, R>,
    target: EvolutionTarget,
    mut hooks: Vec<Hook<'_, T, R>>,
) -> Result<usize, NeatError> {
    if neat.generation().is_none() {
        neat.initialize()?;
    }

    loop {
        let generation = neat.generation().ok_or(NeatError::NotInitialized)?;
        for hook in hooks.iter_mut() {
            if hook(&*neat).is_break() {
                debug!(generation, "stopped by hook");
                return Ok(generation);
            }
        }
        if target.satisfied(neat) {
            return Ok(generation);
        }
        neat.run_generation()?;
    }
}

/// A problem scored by driving a genome's network directly
pub trait Scenario {
    /// (inputs, outputs) of every network
    fn io() -> (usize, usize);

    fn eval(&self, network: &mut NeuralNetwork) -> f64;
}

/// Trains on a [Scenario], building biased networks of its shape
pub struct Evaluate<S: Scenario> {
    scenario: S,
    template: Arc<BaseTemplate>,
}

impl<S: Scenario> Evaluate<S> {
    pub fn new(scenario: S) -> Self {
        let (inputs, outputs) = S::io();
        Self {
            scenario,
            template: Arc::new(BaseTemplate::biased(inputs, outputs)),
        }
    }

    #[inline]
    pub fn scenario(&self) -> &S {
        &self.scenario
    }
}

impl<S: Scenario> Trainer for Evaluate<S> {
    fn template(&self) -> &Arc<BaseTemplate> {
        &self.template
    }

    fn fitness(&self, genome: &Genome, _: &View<'_>) -> f64 {
        self.scenario.eval(&mut genome.network())
    }
}
