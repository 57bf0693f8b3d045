use crate::error::{Error, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Bernoulli, Distribution};

/// The chance that a vehicle at a branch point turns down the side street.
pub const TURN_PROBABILITY: f64 = 0.25;

/// Decides whether a vehicle at a branch point diverts onto the side street.
pub trait TurnSampler {
    fn sample(&mut self) -> bool;
}

/// Samples turns from a random number generator with a fixed probability.
#[derive(Clone, Debug)]
pub struct BernoulliSampler<R> {
    distr: Bernoulli,
    rng: R,
}

impl BernoulliSampler<StdRng> {
    /// Creates a sampler seeded from `seed`, or from system entropy if there is none.
    pub fn seeded(probability: f64, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(probability, rng)
    }
}

impl<R: Rng> BernoulliSampler<R> {
    /// Creates a sampler which returns true with the given probability.
    pub fn new(probability: f64, rng: R) -> Result<Self> {
        let distr =
            Bernoulli::new(probability).map_err(|_| Error::InvalidProbability(probability))?;
        Ok(Self { distr, rng })
    }
}

impl<R: Rng> TurnSampler for BernoulliSampler<R> {
    fn sample(&mut self) -> bool {
        self.distr.sample(&mut self.rng)
    }
}

/// A sampler which always gives the same answer.
#[derive(Clone, Copy, Debug)]
pub struct FixedSampler(pub bool);

impl TurnSampler for FixedSampler {
    fn sample(&mut self) -> bool {
        self.0
    }
}

impl<F: FnMut() -> bool> TurnSampler for F {
    fn sample(&mut self) -> bool {
        self()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rejects_bad_probability() {
        assert!(matches!(
            BernoulliSampler::seeded(1.5, Some(0)),
            Err(Error::InvalidProbability(p)) if p == 1.5
        ));
    }

    #[test]
    fn certain_outcomes() {
        let mut never = BernoulliSampler::seeded(0.0, Some(7)).unwrap();
        let mut always = BernoulliSampler::seeded(1.0, Some(7)).unwrap();
        for _ in 0..100 {
            assert!(!never.sample());
            assert!(always.sample());
        }
    }

    #[test]
    fn seeded_samplers_repeat() {
        let mut a = BernoulliSampler::seeded(TURN_PROBABILITY, Some(42)).unwrap();
        let mut b = BernoulliSampler::seeded(TURN_PROBABILITY, Some(42)).unwrap();
        let a: Vec<bool> = (0..64).map(|_| a.sample()).collect();
        let b: Vec<bool> = (0..64).map(|_| b.sample()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn turns_are_the_minority() {
        let mut sampler = BernoulliSampler::seeded(TURN_PROBABILITY, Some(3)).unwrap();
        let turns = (0..10_000).filter(|_| sampler.sample()).count();
        assert!((2_000..3_000).contains(&turns), "{} turns", turns);
    }

    #[test]
    fn closures_sample() {
        let mut answers = vec![true, false].into_iter();
        let mut sampler = move || answers.next().unwrap_or(false);
        assert!(TurnSampler::sample(&mut sampler));
        assert!(!TurnSampler::sample(&mut sampler));
        assert!(!TurnSampler::sample(&mut sampler));
    }
}
