//! All-pairs reference pass and the statistics both detection paths report.

use std::time::{Duration, Instant};

use crate::{
    shapes::Collidable,
    util::{flag_if_overlapping, unordered_pairs},
};

/// Flag every overlapping pair by testing all `n(n-1)/2` pairs directly.
///
/// Leaves the same flags as [`QuadTree::check_collisions`](crate::QuadTree::check_collisions)
/// for items inside the tree's boundary, but the count it returns is exact.
///
/// **Returns** the number of pairs examined
pub fn brute_force<T: Collidable>(items: &mut [T]) -> usize {
    let mut pairs = 0;
    for (a, b) in unordered_pairs(items.len()) {
        flag_if_overlapping(items, a, b);
        pairs += 1;
    }
    pairs
}

/// Cost of one detection pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Pairs examined
    pub pairs: usize,
    /// Wall time spent, including tree construction for the indexed pass
    pub elapsed: Duration,
}

impl PassStats {
    /// Run `pass` and record how long it took alongside the pair count it returns
    pub fn time<F: FnOnce() -> usize>(pass: F) -> Self {
        let start = Instant::now();
        let pairs = pass();
        Self {
            pairs,
            elapsed: start.elapsed(),
        }
    }
}

/// Side by side costs of the indexed and brute-force passes over the same step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    pub tree: PassStats,
    pub brute: PassStats,
}

impl StepReport {
    /// How many times faster the indexed pass was, rounded to the nearest whole number
    ///
    /// **Returns** `None` if the indexed pass took no measurable time
    pub fn speedup(&self) -> Option<u64> {
        let tree = self.tree.elapsed.as_secs_f64();
        if tree <= 0.0 {
            return None;
        }
        Some((self.brute.elapsed.as_secs_f64() / tree).round() as u64)
    }
}
