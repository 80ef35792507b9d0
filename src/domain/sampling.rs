use rand::seq::SliceRandom;
use rand::Rng;

/// `ceil(percent% of eligible)`, computed in integers.
pub fn sample_size(eligible: usize, percent: u32) -> usize {
    let percent = percent.min(100) as usize;
    (eligible * percent + 99) / 100
}

/// Uniform sample without replacement over the eligible ids.
pub fn sample_for_review<R: Rng + ?Sized>(eligible: &[i64], percent: u32, rng: &mut R) -> Vec<i64> {
    let size = sample_size(eligible.len(), percent);
    eligible.choose_multiple(rng, size).copied().collect()
}
