//! Random selection helpers.
//!
//! Selection is split from entropy: callers draw a number (or pass an `Rng`)
//! and these functions map it to a choice, so tests can pin the outcome.

use rand::seq::SliceRandom;
use rand::Rng;

/// A selection band with an inclusive upper bound on the draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Band<T> {
    pub upper: u32,
    pub value: T,
}

impl<T> Band<T> {
    pub const fn new(upper: u32, value: T) -> Self {
        Self { upper, value }
    }
}

/// Pick the first band whose `upper` is `>= draw`, else `default`.
///
/// Bands are checked in order, so they must be sorted by `upper` for the
/// cumulative-threshold reading to hold.
pub fn pick_weighted<'a, T>(draw: u32, bands: &'a [Band<T>], default: &'a T) -> &'a T {
    bands
        .iter()
        .find(|band| draw <= band.upper)
        .map_or(default, |band| &band.value)
}

/// Uniformly choose one element of `pool`, or `None` when it is empty.
pub fn choose<'a, T, R: Rng + ?Sized>(rng: &mut R, pool: &'a [T]) -> Option<&'a T> {
    pool.choose(rng)
}
