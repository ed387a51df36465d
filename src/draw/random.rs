use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of draw tickets.
///
/// Production wraps a statistically uniform generator; tests plug in a
/// seeded or scripted source to force specific outcomes.
pub trait RandomSource {
    /// A ticket in `[0, bound)`. `bound` is always at least 1.
    fn ticket(&mut self, bound: u64) -> u64;
}

/// Adapts any [`rand::Rng`] into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(pub R);

impl RngSource<StdRng> {
    /// Seeded from OS entropy.
    pub fn from_entropy() -> Self {
        RngSource(StdRng::from_entropy())
    }

    /// Reproducible sequence, for tests and simulations.
    pub fn seeded(seed: u64) -> Self {
        RngSource(StdRng::seed_from_u64(seed))
    }
}

impl Default for RngSource<StdRng> {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn ticket(&mut self, bound: u64) -> u64 {
        self.0.gen_range(0..bound.max(1))
    }
}

/// Replays a fixed list of tickets, cycling when exhausted. Each ticket is
/// reduced modulo the requested bound.
#[derive(Debug, Clone)]
pub struct ScriptedSource {
    tickets: Vec<u64>,
    next: usize,
}

impl ScriptedSource {
    pub fn new(tickets: impl Into<Vec<u64>>) -> Self {
        Self {
            tickets: tickets.into(),
            next: 0,
        }
    }

    /// Always draws ticket 0: the first in-stock candidate with positive weight.
    pub fn first() -> Self {
        Self::new(vec![0])
    }
}

impl RandomSource for ScriptedSource {
    fn ticket(&mut self, bound: u64) -> u64 {
        let bound = bound.max(1);
        let Some(&ticket) = self.tickets.get(self.next % self.tickets.len().max(1)) else {
            return 0;
        };
        self.next = self.next.wrapping_add(1);
        ticket % bound
    }
}
