//! Budget-constrained Douglas-Peucker fill
//!
//! Instead of a single distance threshold, every gap between retained points offers its
//! largest-deviation candidate to one global max-heap. The globally worst-approximated
//! point is inserted first, its gap is split in two, and the process repeats until the
//! budget is used up or every remaining point lies on its chord.

use crate::utils;
use geo::Coord;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Deviations at or below this distance (meters) count as collinear
pub const COLLINEAR_TOLERANCE_M: f64 = 1e-6;

/// Result of filling the remaining budget
#[derive(Debug, Clone, PartialEq)]
pub struct FillOutcome {
    /// Final sorted indices (retained input plus inserted points)
    pub indices: Vec<usize>,
    /// Number of points inserted by the fill
    pub added: usize,
    /// Largest deviation (meters) still unresolved when the fill stopped; 0 if none
    pub max_unresolved_deviation: f64,
}

impl FillOutcome {
    /// Whether the budget ran out while meaningful deviation remained
    #[inline]
    pub fn budget_starved(&self) -> bool {
        self.max_unresolved_deviation > COLLINEAR_TOLERANCE_M
    }
}

/// Best point to insert inside the gap `(left, right)`
#[derive(Debug, Clone, Copy)]
struct GapCandidate {
    /// Distance in meters from the chord `left`-`right`
    deviation: f64,
    /// |2·index − (left + right)|, smaller is closer to the gap midpoint
    midpoint_offset: usize,
    index: usize,
    left: usize,
    right: usize,
}

impl PartialEq for GapCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GapCandidate {}

impl PartialOrd for GapCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GapCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Larger deviation wins; on ties the candidate nearer its gap midpoint,
        // then the lower index
        self.deviation
            .total_cmp(&other.deviation)
            .then_with(|| other.midpoint_offset.cmp(&self.midpoint_offset))
            .then_with(|| other.index.cmp(&self.index))
    }
}

/// Insert up to `budget` additional points between the `retained` indices
///
/// # Arguments
/// * `coords` - All coordinates of the polyline
/// * `retained` - Sorted indices that are already kept (must include both endpoints)
/// * `budget` - Maximum number of points to add
///
/// # Returns
/// The merged, sorted index list. The output never grows by more than `budget`.
pub fn fill_to_budget(coords: &[Coord<f64>], retained: &[usize], budget: usize) -> FillOutcome {
    #[cfg(feature = "profiling")]
    profiling::scope!("fill::fill_to_budget");

    let mut heap: BinaryHeap<GapCandidate> = retained
        .windows(2)
        .filter_map(|pair| best_in_gap(coords, pair[0], pair[1]))
        .collect();

    let mut added = Vec::new();
    while added.len() < budget {
        let Some(candidate) = heap.pop() else {
            break;
        };
        added.push(candidate.index);

        for (left, right) in [
            (candidate.left, candidate.index),
            (candidate.index, candidate.right),
        ] {
            if let Some(next) = best_in_gap(coords, left, right) {
                heap.push(next);
            }
        }
    }

    let max_unresolved_deviation = heap.peek().map(|c| c.deviation).unwrap_or(0.0);

    tracing::debug!(
        budget,
        added = added.len(),
        max_unresolved_deviation,
        "budgeted fill finished"
    );

    let added_count = added.len();
    let mut indices = retained.to_vec();
    indices.extend(added);
    indices.sort_unstable();

    FillOutcome {
        indices,
        added: added_count,
        max_unresolved_deviation,
    }
}

/// Largest-deviation point strictly inside `(left, right)`, if it is off the chord
fn best_in_gap(coords: &[Coord<f64>], left: usize, right: usize) -> Option<GapCandidate> {
    if right <= left + 1 {
        return None;
    }
    let (start, end) = (coords[left], coords[right]);

    (left + 1..right)
        .map(|index| GapCandidate {
            deviation: utils::segment_distance(coords[index], start, end),
            midpoint_offset: (2 * index).abs_diff(left + right),
            index,
            left,
            right,
        })
        .max()
        .filter(|candidate| candidate.deviation > COLLINEAR_TOLERANCE_M)
}
