use rand_xoshiro::{
    Xoshiro256PlusPlus,
    rand_core::{RngCore, SeedableRng},
};

/// The twenty standard amino acids.
pub const AMINO_ACIDS: &[u8; 20] = b"ACDEFGHIKLMNPQRSTVWY";

/// Generates a reproducible random sequence of `length` symbols drawn
/// uniformly from `alpha`.
///
/// ## Panics
///
/// `alpha` must not be empty.
#[must_use]
pub fn rand_sequence(alpha: &[u8], length: usize, seed: u64) -> Vec<u8> {
    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);

    (1..=length).map(|_| alpha[rng.next_u32() as usize % alpha.len()]).collect()
}

/// Generates `count` reproducible random amino acid sequences with lengths
/// between `min_len` and `max_len` inclusive.
///
/// ## Panics
///
/// `min_len` must not exceed `max_len`.
#[must_use]
pub fn rand_sequences(count: usize, min_len: usize, max_len: usize, seed: u64) -> Vec<Vec<u8>> {
    assert!(min_len <= max_len, "min_len must not exceed max_len");

    let mut rng = Xoshiro256PlusPlus::seed_from_u64(seed);
    let span = max_len - min_len + 1;

    (0..count)
        .map(|_| {
            let length = min_len + rng.next_u64() as usize % span;
            rand_sequence(AMINO_ACIDS, length, rng.next_u64())
        })
        .collect()
}
