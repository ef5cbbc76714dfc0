use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Uuid;

/// Source of every random choice the engine makes: generated names, user ids
/// and message ids. Seed it to make a whole session reproducible.
pub trait RandomSource {
    /// Uniform index in `0..len`. Panics if `len` is zero.
    fn pick(&mut self, len: usize) -> usize;

    /// Uniform integer in `low..=high`.
    fn number(&mut self, low: u32, high: u32) -> u32;

    /// Random (version 4) UUID.
    fn uuid(&mut self) -> Uuid;
}

impl<R: Rng> RandomSource for R {
    fn pick(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }

    fn number(&mut self, low: u32, high: u32) -> u32 {
        self.random_range(low..=high)
    }

    fn uuid(&mut self) -> Uuid {
        uuid::Builder::from_random_bytes(self.random()).into_uuid()
    }
}

/// Deterministic source for the given seed.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Source seeded from the operating system.
pub fn from_os() -> StdRng {
    StdRng::from_os_rng()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = seeded(7);
        let mut b = seeded(7);
        assert_eq!(a.uuid(), b.uuid());
        assert_eq!(a.pick(10), b.pick(10));
        assert_eq!(a.number(1, 999), b.number(1, 999));
    }

    #[test]
    fn values_stay_in_range() {
        let mut rng = seeded(1);
        for _ in 0..500 {
            assert!(rng.pick(3) < 3);
            let n = rng.number(1, 999);
            assert!((1..=999).contains(&n));
        }
    }

    #[test]
    fn uuids_are_v4() {
        let mut rng = seeded(3);
        assert_eq!(rng.uuid().get_version_num(), 4);
    }
}
