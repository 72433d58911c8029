//! Tower height distribution.
//!
//! Heights are geometrically distributed: a node of height n is promoted to
//! height n+1 with probability `p`. The ceiling grows with the list so small
//! lists don't pay for tall sentinels.

use rand::Rng;

/// The tallest tower worth building for a list currently holding `len`
/// elements: `ceil(log_{1/p}((len + 2) / p))`.
///
/// The `+ 2` keeps the logarithm positive for empty and single element lists.
pub fn max_height(len: usize, probability: f64) -> usize {
    let base = 1.0 / probability;
    let h = ((len as f64 + 2.0) * base).ln() / base.ln();
    (h.ceil() as usize).max(1)
}

/// Sample a height in `[1, max_height]`, consuming one uniform float in
/// `[0, 1)` per coin flip.
pub fn sample_height<R: Rng + ?Sized>(rng: &mut R, max_height: usize, probability: f64) -> usize {
    let mut h = 1;
    while h < max_height && rng.gen::<f64>() < probability {
        h += 1;
    }
    h
}
