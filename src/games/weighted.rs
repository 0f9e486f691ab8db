//! Weighted random selection
//!
//! One primitive backs every weighted choice in the resolver: the outcome
//! classification draw and both winning-symbol draws.

use rand::Rng;

/// Pick a key with probability proportional to its weight.
///
/// Draws `roll = floor(uniform[0, 1) * total)` and returns the first key whose
/// running weight sum exceeds `roll`, scanning left to right. Zero weights are
/// never selected. Returns `None` when the candidates carry no positive weight.
pub fn weighted_draw<R, K>(rng: &mut R, candidates: &[(K, f64)]) -> Option<K>
where
    R: Rng + ?Sized,
    K: Copy,
{
    let total: f64 = candidates.iter().map(|(_, weight)| *weight).sum();
    if total.is_nan() || total <= 0.0 {
        return None;
    }

    let roll = (rng.gen::<f64>() * total).floor();

    let mut running = 0.0;
    for (key, weight) in candidates {
        running += *weight;
        if roll < running {
            return Some(*key);
        }
    }

    // Floating point accumulation can leave `roll` at the very edge of `total`.
    candidates
        .iter()
        .rev()
        .find(|(_, weight)| *weight > 0.0)
        .map(|(key, _)| *key)
}
