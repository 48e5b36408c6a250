use crate::random::GameRng;

/// Single-pass weighted choice over a stream of candidates.
///
/// Offer each candidate once with its weight; after the stream ends, `finish`
/// returns the winner with probability proportional to its weight. No candidate
/// list is materialized and no normalization pass is needed: after `k` offers the
/// held candidate is a valid weighted sample of the first `k`, so replacing it
/// with probability `weight / running_total` keeps the invariant.
///
/// Non-positive weights are skipped; they can never win. An empty stream, or one
/// where every weight was non-positive, finishes with `None`; callers treat that
/// as "no eligible candidate", not as a failure.
#[derive(Debug)]
pub struct WeightedPicker<T> {
    total_weight: f32,
    chosen: Option<T>,
}

impl<T> WeightedPicker<T> {
    pub fn new() -> Self {
        Self {
            total_weight: 0.0,
            chosen: None,
        }
    }

    pub fn offer(&mut self, candidate: T, weight: f32, rng: &mut GameRng) {
        if weight <= 0.0 || !weight.is_finite() {
            return;
        }
        self.total_weight += weight;
        if rng.unit() * self.total_weight <= weight {
            self.chosen = Some(candidate);
        }
    }

    pub fn total_weight(&self) -> f32 {
        self.total_weight
    }

    pub fn finish(self) -> Option<T> {
        self.chosen
    }
}

impl<T> Default for WeightedPicker<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience wrapper: pick one element of an iterator by weight.
pub fn pick_weighted<T, I, W>(candidates: I, weight_of: W, rng: &mut GameRng) -> Option<T>
where
    I: IntoIterator<Item = T>,
    W: Fn(&T) -> f32,
{
    let mut picker = WeightedPicker::new();
    for candidate in candidates {
        let weight = weight_of(&candidate);
        picker.offer(candidate, weight, rng);
    }
    picker.finish()
}
