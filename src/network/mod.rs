//! Neural networks constructed from [Genome]s in order to express their behaviour.

pub mod feedforward;

pub use feedforward::NeuralNetwork;

use crate::Genome;

pub mod activate {
    use core::f64::consts::E;

    pub fn sigmoid(x: f64) -> f64 {
        1. / (1. + E.powf(-x))
    }

    /// The sigmoid from the NEAT paper, steepened to be near-linear around 0
    pub fn steep_sigmoid(x: f64) -> f64 {
        1. / (1. + E.powf(-5. * x))
    }

    pub fn relu(x: f64) -> f64 {
        if x < 0. {
            0.
        } else {
            x
        }
    }

    pub fn linear(x: f64) -> f64 {
        x
    }
}

pub mod loss {
    pub fn decay_quadratic(want: f64, x: f64) -> f64 {
        1. - (want - x).abs().powf(2.)
    }

    pub fn decay_linear(want: f64, have: f64) -> f64 {
        if have.is_nan() {
            f64::MIN
        } else {
            want - (want - have).abs()
        }
    }
}

/// Where a network reads its sensory values from, indexed from 0
pub trait InputSource {
    fn input(&self, idx: usize) -> f64;
}

/// Inputs owned by the network itself, written through [NeuralNetwork::calculate_inputs]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Buffer(pub Vec<f64>);

impl InputSource for Buffer {
    fn input(&self, idx: usize) -> f64 {
        self.0.get(idx).copied().unwrap_or(0.)
    }
}

/// Inputs fetched on demand from some external state
#[derive(Debug, Clone)]
pub struct Fetch<F: Fn(usize) -> f64>(pub F);

impl<F: Fn(usize) -> f64> InputSource for Fetch<F> {
    fn input(&self, idx: usize) -> f64 {
        (self.0)(idx)
    }
}

/// The trait for all networks. Right now, only f64 values are used.
pub trait Network {
    /// Evaluate every action node from the current inputs, returning their values
    fn calculate(&mut self) -> &[f64];

    /// The network's most recent output, one value per action node
    fn output(&self) -> &[f64];

    /// Forget every computed value
    fn flush(&mut self);
}

impl Genome {
    /// This genome's phenotype, reading inputs from a buffer of its own
    pub fn network(&self) -> NeuralNetwork {
        NeuralNetwork::new(self)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::assert_f64_approx;

    #[test]
    fn test_activate() {
        assert_f64_approx!(activate::sigmoid(0.), 0.5);
        assert_f64_approx!(activate::steep_sigmoid(0.), 0.5);
        assert_f64_approx!(activate::steep_sigmoid(1.), 1. / (1. + (-5f64).exp()));
        assert!(activate::steep_sigmoid(1.) > activate::sigmoid(1.));
        assert_eq!(activate::relu(-2.), 0.);
        assert_eq!(activate::relu(2.), 2.);
        assert_eq!(activate::linear(-3.5), -3.5);
    }

    #[test]
    fn test_loss() {
        assert_f64_approx!(loss::decay_quadratic(1., 1.), 1.);
        assert_f64_approx!(loss::decay_quadratic(1., 0.5), 0.75);
        assert_f64_approx!(loss::decay_linear(1., 0.25), 0.25);
        assert_eq!(loss::decay_linear(1., f64::NAN), f64::MIN);
    }

    #[test]
    fn test_sources() {
        let buffer = Buffer(vec![0.5, -1.]);
        assert_eq!(buffer.input(1), -1.);
        assert_eq!(buffer.input(2), 0.);

        let fetch = Fetch(|idx: usize| idx as f64 * 2.);
        assert_eq!(fetch.input(3), 6.);
    }
}
