//! Bounded best-k selection of samples.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::Sample;

/// Sample ordered by weight; on equal weight the earlier sample ranks higher.
struct Ranked<'a> {
    weight: f64,
    order: usize,
    sample: &'a Sample,
}

impl PartialEq for Ranked<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked<'_> {}

impl PartialOrd for Ranked<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// The `count` candidates with the highest score, best first.
///
/// Uses a bounded min-heap, so only `count` candidates are held at a time.
pub(crate) fn highest<'a, I, F>(candidates: I, count: usize, score: F) -> Vec<&'a Sample>
where
    I: IntoIterator<Item = &'a Sample>,
    F: Fn(&Sample) -> f64,
{
    if count == 0 {
        return Vec::new();
    }
    let mut heap: BinaryHeap<Reverse<Ranked<'a>>> = BinaryHeap::with_capacity(count + 1);
    for (order, sample) in candidates.into_iter().enumerate() {
        heap.push(Reverse(Ranked {
            weight: score(sample),
            order,
            sample,
        }));
        if heap.len() > count {
            heap.pop();
        }
    }
    heap.into_sorted_vec().into_iter().map(|Reverse(r)| r.sample).collect()
}
