use rand::{rngs::ThreadRng, RngCore};

/// Entropy for the `rand` command, backed by the thread-local generator.
#[derive(Debug)]
pub struct Random {
    rng: ThreadRng,
}

impl Random {
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl arbint_core::Random for Random {
    fn random_u32(&mut self) -> u32 {
        self.rng.next_u32()
    }
}
