use rand::{rngs::StdRng, Rng, SeedableRng};

pub(crate) fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A random canonical magnitude of exactly `limbs` limbs.
pub(crate) fn random_magnitude(rng: &mut impl Rng, limbs: usize) -> Vec<u32> {
    let mut mag: Vec<u32> = (0..limbs).map(|_| rng.random()).collect();
    if let Some(top) = mag.first_mut() {
        if *top == 0 {
            *top = 1;
        }
    }
    mag
}

/// Magnitudes that tend to hit carry and correction corner cases.
pub(crate) fn structured_magnitudes(limbs: usize) -> Vec<Vec<u32>> {
    let mut top_bit = vec![0; limbs];
    top_bit[0] = 0x8000_0000;
    let mut low_and_high = vec![0; limbs];
    low_and_high[0] = 1;
    low_and_high[limbs - 1] = 1;
    vec![vec![u32::MAX; limbs], top_bit, low_and_high]
}
