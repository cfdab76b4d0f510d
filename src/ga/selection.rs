//! Parent selection strategies.
//!
//! Selection operates on the population's score vector; lower scores
//! are better throughout. Tournament ties resolve to the earlier
//! index, so runs are deterministic given a fixed seed.

use rand::Rng;

/// Selection strategy for choosing parents.
///
/// # Examples
///
/// ```
/// use u_netroute::ga::Selection;
///
/// // Tournament with size 3 (moderate selection pressure)
/// let sel = Selection::Tournament(3);
///
/// // Score-proportionate (roulette wheel)
/// let sel = Selection::Roulette;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    /// Tournament selection: pick `k` individuals at random, select the
    /// best. Higher `k` = stronger selection pressure.
    Tournament(usize),

    /// Score-proportionate (roulette wheel) selection, using inverse
    /// score transformation since lower scores are better.
    Roulette,

    /// Rank-based selection: probability proportional to rank position
    /// rather than raw score, avoiding super-individual dominance.
    Rank,
}

impl Default for Selection {
    fn default() -> Self {
        Selection::Tournament(3)
    }
}

impl Selection {
    /// Selects a parent index from the population's scores.
    ///
    /// # Panics
    /// Panics if `scores` is empty.
    pub fn select<R: Rng>(&self, scores: &[f64], rng: &mut R) -> usize {
        assert!(!scores.is_empty(), "cannot select from empty population");

        match self {
            Selection::Tournament(k) => tournament(scores, *k, rng),
            Selection::Roulette => roulette(scores, rng),
            Selection::Rank => rank(scores, rng),
        }
    }
}

/// Tournament selection: pick k random individuals, return the best.
/// Equal scores resolve to the lower index.
fn tournament<R: Rng>(scores: &[f64], k: usize, rng: &mut R) -> usize {
    let k = k.max(1);
    let n = scores.len();

    let mut best_idx = rng.random_range(0..n);
    for _ in 1..k {
        let idx = rng.random_range(0..n);
        if scores[idx] < scores[best_idx]
            || (scores[idx] == scores[best_idx] && idx < best_idx)
        {
            best_idx = idx;
        }
    }
    best_idx
}

/// Roulette wheel selection using inverse score transformation:
/// `weight_i = max_score - score_i + epsilon`, so the lowest score gets
/// the highest weight.
fn roulette<R: Rng>(scores: &[f64], rng: &mut R) -> usize {
    let n = scores.len();
    if n == 1 {
        return 0;
    }

    let max_score = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let epsilon = 1e-10;

    let weights: Vec<f64> = scores
        .iter()
        .map(|&s| {
            let w = max_score - s + epsilon;
            if w > 0.0 {
                w
            } else {
                epsilon
            }
        })
        .collect();

    let total: f64 = weights.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if cumulative > threshold {
            return i;
        }
    }

    n - 1 // floating-point fallback
}

/// Rank-based selection using linear ranking: individuals sorted by
/// score (best first), weight `n - rank`.
fn rank<R: Rng>(scores: &[f64], rng: &mut R) -> usize {
    let n = scores.len();
    if n == 1 {
        return 0;
    }

    let mut indexed: Vec<(usize, f64)> = scores.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let total: f64 = (n * (n + 1)) as f64 / 2.0;
    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;

    for (rank, &(original_idx, _)) in indexed.iter().enumerate() {
        let weight = (n - rank) as f64;
        cumulative += weight;
        if cumulative > threshold {
            return original_idx;
        }
    }

    indexed.last().expect("population has n >= 2 elements").0 // fallback
}
