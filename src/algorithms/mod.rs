pub mod shortest_path;
pub mod spanning;
pub mod tour;

use std::cmp::Ordering;

// Custom wrapper to make f64 implement Ord for the priority queues.
// Weights are finite and non-negative, so total ordering matches numeric ordering.
#[derive(PartialEq, Copy, Clone, Debug)]
pub(crate) struct Weight(pub f64);

impl Eq for Weight {}

impl PartialOrd for Weight {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Weight {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
