//! Random port - source of die throws

/// Uniform random integers, injected so rolls can be replayed in tests
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `min..=max`
    fn random_range(&self, min: i32, max: i32) -> i32;

    /// One throw of a die with `sides` faces
    fn roll_die(&self, sides: u8) -> u8 {
        // random_range stays within 1..=sides, which always fits in u8
        self.random_range(1, i32::from(sides)) as u8
    }
}
