use core::cmp::min;
use rand::{RngCore, SeedableRng};
use rand_distr::{Distribution, Uniform};

/// Every random decision whose odds are configured rather than fixed by the algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvolutionEvent {
    Mutate,
    AlterWeights,
    RandomizeWeight,
    ToggleConnection,
    AddConnection,
    AddNode,
    Interspecies,
}

pub trait Probabilities {
    fn probability(&self, evt: EvolutionEvent) -> f64;
}

pub trait Happens: RngCore {
    /// true with probability `p`, where `p` is clamped into [0, 1]
    fn happens(&mut self, p: f64) -> bool;

    fn happens_evt(&mut self, probabilities: &impl Probabilities, evt: EvolutionEvent) -> bool {
        self.happens(probabilities.probability(evt))
    }
}

impl<T: RngCore + ?Sized> Happens for T {
    fn happens(&mut self, p: f64) -> bool {
        if p <= 0. {
            false
        } else if p >= 1. {
            true
        } else {
            // 53 bits of the roll, the same resolution as an f64 in [0, 1)
            ((self.next_u64() >> 11) as f64 * (1. / (1u64 << 53) as f64)) < p
        }
    }
}

/// A uniform draw in `[-strength, strength]`. A degenerate range yields 0.
pub fn uniform(rng: &mut impl RngCore, strength: f64) -> f64 {
    Uniform::new_inclusive(-strength, strength).map_or(0., |dist| dist.sample(rng))
}

#[derive(Debug, Clone)]
pub struct WyRng {
    state: u64,
}

impl WyRng {
    pub fn seeded(state: u64) -> Self {
        Self { state }
    }
}

impl RngCore for WyRng {
    fn next_u32(&mut self) -> u32 {
        self.next_u64() as u32
    }

    fn next_u64(&mut self) -> u64 {
        const WY_CONST_0: u64 = 0x2d35_8dcc_aa6c_78a5;
        const WY_CONST_1: u64 = 0x8bb8_4b93_962e_acc9;
        self.state = self.state.wrapping_add(WY_CONST_0);
        let t = u128::from(self.state) * u128::from(self.state ^ WY_CONST_1);
        (t as u64) ^ (t >> 64) as u64
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        let mut idx = 0;
        while idx < dst.len() {
            let lim = min(8, dst.len() - idx);
            dst[idx..idx + lim].copy_from_slice(&self.next_u64().to_le_bytes()[..lim]);
            idx += lim;
        }
    }
}

impl SeedableRng for WyRng {
    type Seed = [u8; 8];

    fn from_seed(seed: Self::Seed) -> Self {
        Self::seeded(u64::from_le_bytes(seed))
    }

    fn seed_from_u64(state: u64) -> Self {
        Self::seeded(state)
    }
}

/// A [WyRng] seeded from the thread-local entropy source
pub fn default_rng() -> WyRng {
    WyRng::seeded(rand::rng().next_u64())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_t;
    use core::iter::once;
    use rand::rngs::StdRng;

    fn assert_within_deviation(chance: f64, range: f64, rng: &mut impl RngCore) {
        let samples = 10_000.;
        let expected = chance * samples;
        let max_deviation = expected * range;
        for _ in 0..20 {
            let incidence = once(())
                .cycle()
                .take(samples as usize)
                .filter(|()| rng.happens(chance))
                .count() as f64;
            assert!(
                (expected - incidence).abs() < max_deviation,
                "{incidence} != {expected} ± {max_deviation}"
            );
        }
    }

    test_t!(
    deviation[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(0xfeed);
        for chance in [0.03, 0.05, 0.25, 0.5, 0.8, 0.9] {
            assert_within_deviation(chance, 0.33, &mut rng);
        }
    });

    test_t!(
    happens_bounds[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(1);
        for _ in 0..1000 {
            assert!(!rng.happens(0.));
            assert!(!rng.happens(-1.));
            assert!(rng.happens(1.));
            assert!(rng.happens(2.));
        }
    });

    test_t!(
    uniform_bounds[T: StdRng | WyRng]() {
        let mut rng = T::seed_from_u64(2);
        for _ in 0..1000 {
            let v = uniform(&mut rng, 0.5);
            assert!((-0.5..=0.5).contains(&v));
        }
        assert_eq!(uniform(&mut rng, 0.), 0.);
    });

    #[test]
    fn test_wyrng_seeded_is_reproducible() {
        let mut l = WyRng::seed_from_u64(42);
        let mut r = WyRng::seed_from_u64(42);
        for _ in 0..100 {
            assert_eq!(l.next_u64(), r.next_u64());
        }
    }

    #[test]
    fn test_wyrng_fill_bytes() {
        let mut l = WyRng::seed_from_u64(7);
        let mut r = WyRng::seed_from_u64(7);
        let mut buf = [0u8; 13];
        l.fill_bytes(&mut buf);
        assert_eq!(buf[..8], r.next_u64().to_le_bytes());
        assert_eq!(buf[8..], r.next_u64().to_le_bytes()[..5]);
    }
}
