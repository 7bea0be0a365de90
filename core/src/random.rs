/// A source of raw random bits.
///
/// `arbint-core` never acquires entropy itself; callers inject whatever
/// generator suits them (a CSPRNG, a seeded test generator, ...).
pub trait Random: std::fmt::Debug {
    /// Generate a uniformly distributed random u32.
    fn random_u32(&mut self) -> u32;
}
