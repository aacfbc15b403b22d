//! Seeded deterministic RNG owned by `Server`.
//!
//! Every stochastic draw in the core (spawn positions, radii, explosion
//! angles) pulls from this single source in a fixed order, so that given a
//! seed and an identical action stream, traces match bit-for-bit (spec §5,
//! §9 "Global RNG").

use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug)]
pub struct SimRng(StdRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn reseed(&mut self, seed: u64) {
        self.0 = StdRng::seed_from_u64(seed);
    }

    pub fn inner(&mut self) -> &mut StdRng {
        &mut self.0
    }
}

impl Default for SimRng {
    fn default() -> Self {
        Self::new(0)
    }
}
