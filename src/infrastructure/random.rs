//! Random sources for die throws

use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::application::ports::outbound::RandomPort;

/// Thread-local OS-seeded RNG
pub struct ThreadRngAdapter;

impl RandomPort for ThreadRngAdapter {
    fn random_range(&self, min: i32, max: i32) -> i32 {
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Seeded RNG, so a whole session of rolls can be replayed
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomPort for SeededRandom {
    fn random_range(&self, min: i32, max: i32) -> i32 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(min..=max)
    }
}
