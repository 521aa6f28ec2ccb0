//! The seeded pseudorandom stream.
//!
//! A single generator is seeded once per run and handed by `&mut` to every
//! generation function. Output is reproducible for a given seed and a given
//! version of this crate; nothing is promised across other implementations.

use crate::error::GenErrorKind;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The random generator type used by all generators.
pub type GenRng = StdRng;

/// Creates a generator seeded with `seed`.
pub fn seeded(seed: u64) -> GenRng {
    StdRng::seed_from_u64(seed)
}

/// Draws one element of `items` uniformly at random.
///
/// `what` names the choice in the error returned for an empty slice.
pub fn pick<'a, T>(
    rng: &mut GenRng,
    items: &'a [T],
    what: &'static str,
) -> Result<&'a T, GenErrorKind> {
    if items.is_empty() {
        return Err(GenErrorKind::EmptyChoice(what));
    }
    Ok(&items[rng.gen_range(0..items.len())])
}

/// Flips a fair coin.
pub fn coin(rng: &mut GenRng) -> bool {
    rng.gen_bool(0.5)
}
