//! Critical point set: indices that must survive simplification, pruned to budget

use crate::{DetectedFeatures, Result, SimplifyError, TurnProfile};
use std::cmp::Ordering;
use std::collections::{BTreeMap, BinaryHeap};

/// Why an index is critical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriticalKind {
    /// First or last coordinate; never pruned
    Endpoint,
    /// Detected corner
    Corner,
    /// First or last representative of a curve run
    CurveBoundary,
    /// Representative strictly inside a curve run
    CurveInterior,
}

/// A single critical index with its pruning metadata
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalPoint {
    pub index: usize,
    pub kind: CriticalKind,
    /// Static importance: |bearing change| for corners, run total turning for curve points
    pub priority: f64,
    /// Position of the owning run in `DetectedFeatures::curves`
    pub run: Option<usize>,
}

/// A critical point removed while fitting the budget
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrunedPoint {
    pub index: usize,
    pub kind: CriticalKind,
    /// |bearing change| for corners, turning left between the surviving neighbours for
    /// curve interiors, run total turning otherwise
    pub measure: f64,
}

/// Sorted, duplicate-free set of critical indices
#[derive(Debug, Clone)]
pub struct CriticalPointSet {
    points: BTreeMap<usize, CriticalPoint>,
    /// Size of the set before any pruning
    minimum_coordinates_required: usize,
    /// Removals in pruning order
    removed: Vec<PrunedPoint>,
}

/// A curve representative in the per-run neighbour list used while pruning
#[derive(Debug, Clone)]
struct CurveSlot {
    index: usize,
    boundary: bool,
    left: Option<usize>,
    right: Option<usize>,
    alive: bool,
    version: u32,
}

/// Heap entry for interior curve pruning (lazily invalidated by `version`)
#[derive(Debug, Clone, Copy)]
struct PruneCandidate {
    /// Hidden turning left behind if this point is removed
    cost: f64,
    index: usize,
    slot: usize,
    version: u32,
}

impl PartialEq for PruneCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PruneCandidate {}

impl PartialOrd for PruneCandidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PruneCandidate {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse so the max-heap pops the cheapest removal, lowest index first
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.index.cmp(&self.index))
    }
}

#[cfg_attr(feature = "profiling", profiling::all_functions)]
impl CriticalPointSet {
    /// Merge endpoints, corners and curve representatives into one set
    ///
    /// # Arguments
    /// * `point_count` - Number of coordinates in the polyline (at least 2)
    /// * `features` - Output of feature detection
    pub fn build(point_count: usize, features: &DetectedFeatures) -> Self {
        let mut points = BTreeMap::new();

        for (run_position, run) in features.curves.iter().enumerate() {
            for &index in &run.representatives {
                let kind = if run.is_boundary(index) {
                    CriticalKind::CurveBoundary
                } else {
                    CriticalKind::CurveInterior
                };
                points.insert(
                    index,
                    CriticalPoint {
                        index,
                        kind,
                        priority: run.total_turning,
                        run: Some(run_position),
                    },
                );
            }
        }

        // Corners take precedence over curve membership for the same index
        for corner in &features.corners {
            points.insert(
                corner.index,
                CriticalPoint {
                    index: corner.index,
                    kind: CriticalKind::Corner,
                    priority: corner.priority(),
                    run: None,
                },
            );
        }

        for index in [0, point_count.saturating_sub(1)] {
            points.insert(
                index,
                CriticalPoint {
                    index,
                    kind: CriticalKind::Endpoint,
                    priority: f64::INFINITY,
                    run: None,
                },
            );
        }

        let minimum_coordinates_required = points.len();
        Self {
            points,
            minimum_coordinates_required,
            removed: Vec::new(),
        }
    }

    /// Remove the least important points until the set fits `max_coordinates`
    ///
    /// Order: corners by ascending |bearing change|, then interior curve points by the
    /// hidden turning their removal creates, then curve boundaries by ascending run
    /// turning. Endpoints are never removed.
    ///
    /// # Errors
    /// `InsufficientCoordinates` when `max_coordinates < 2`, since no LineString can be
    /// represented with fewer than its two endpoints.
    pub fn prune_to(&mut self, profile: &TurnProfile, max_coordinates: usize) -> Result<()> {
        if max_coordinates < 2 {
            return Err(SimplifyError::InsufficientCoordinates {
                minimum_required: 2,
                provided_limit: max_coordinates,
            });
        }
        if self.points.len() <= max_coordinates {
            return Ok(());
        }

        self.prune_corners(max_coordinates);
        if self.points.len() > max_coordinates {
            self.prune_curve_interiors(profile, max_coordinates);
        }
        if self.points.len() > max_coordinates {
            self.prune_remaining(max_coordinates);
        }

        tracing::debug!(
            minimum_required = self.minimum_coordinates_required,
            kept = self.points.len(),
            removed_corners = self.removed_corners(),
            removed_curve_points = self.removed_curve_points(),
            "critical points pruned to budget"
        );
        Ok(())
    }

    fn prune_corners(&mut self, max_coordinates: usize) {
        let mut corners: Vec<CriticalPoint> = self
            .points
            .values()
            .filter(|p| p.kind == CriticalKind::Corner)
            .copied()
            .collect();
        corners.sort_by(|a, b| {
            a.priority
                .total_cmp(&b.priority)
                .then_with(|| a.index.cmp(&b.index))
        });

        for corner in corners {
            if self.points.len() <= max_coordinates {
                break;
            }
            self.remove(corner.index, corner.priority);
        }
    }

    fn prune_curve_interiors(&mut self, profile: &TurnProfile, max_coordinates: usize) {
        let mut slots: Vec<CurveSlot> = Vec::new();
        let mut previous: Option<(usize, Option<usize>)> = None; // (slot, run)

        for point in self.points.values() {
            if !matches!(
                point.kind,
                CriticalKind::CurveBoundary | CriticalKind::CurveInterior
            ) {
                continue;
            }
            let slot = slots.len();
            let left = match previous {
                Some((prev_slot, prev_run)) if prev_run == point.run => {
                    slots[prev_slot].right = Some(slot);
                    Some(prev_slot)
                }
                _ => None,
            };
            slots.push(CurveSlot {
                index: point.index,
                boundary: point.kind == CriticalKind::CurveBoundary,
                left,
                right: None,
                alive: true,
                version: 0,
            });
            previous = Some((slot, point.run));
        }

        let cost_of = |slots: &[CurveSlot], slot: usize| -> Option<f64> {
            let s = &slots[slot];
            match (s.left, s.right) {
                (Some(l), Some(r)) if !s.boundary => {
                    Some(profile.turning_between(slots[l].index, slots[r].index))
                }
                _ => None,
            }
        };

        let mut heap = BinaryHeap::new();
        for slot in 0..slots.len() {
            if let Some(cost) = cost_of(&slots, slot) {
                heap.push(PruneCandidate {
                    cost,
                    index: slots[slot].index,
                    slot,
                    version: 0,
                });
            }
        }

        while self.points.len() > max_coordinates {
            let Some(candidate) = heap.pop() else {
                break;
            };
            let slot = &slots[candidate.slot];
            if !slot.alive || slot.version != candidate.version {
                continue;
            }

            let (left, right) = (slot.left, slot.right);
            slots[candidate.slot].alive = false;
            if let Some(l) = left {
                slots[l].right = right;
            }
            if let Some(r) = right {
                slots[r].left = left;
            }
            self.remove(candidate.index, candidate.cost);

            for neighbour in [left, right].into_iter().flatten() {
                slots[neighbour].version += 1;
                if let Some(cost) = cost_of(&slots, neighbour) {
                    heap.push(PruneCandidate {
                        cost,
                        index: slots[neighbour].index,
                        slot: neighbour,
                        version: slots[neighbour].version,
                    });
                }
            }
        }
    }

    /// Curve boundaries (and any curve point left without neighbours), weakest run first
    fn prune_remaining(&mut self, max_coordinates: usize) {
        let mut remaining: Vec<CriticalPoint> = self
            .points
            .values()
            .filter(|p| p.kind != CriticalKind::Endpoint)
            .copied()
            .collect();
        remaining.sort_by(|a, b| {
            let boundary_last = |p: &CriticalPoint| p.kind == CriticalKind::CurveBoundary;
            boundary_last(a)
                .cmp(&boundary_last(b))
                .then_with(|| a.priority.total_cmp(&b.priority))
                .then_with(|| a.index.cmp(&b.index))
        });

        for point in remaining {
            if self.points.len() <= max_coordinates {
                break;
            }
            self.remove(point.index, point.priority);
        }
    }

    fn remove(&mut self, index: usize, measure: f64) {
        if let Some(point) = self.points.remove(&index) {
            tracing::trace!(index, kind = ?point.kind, measure, "pruned critical point");
            self.removed.push(PrunedPoint {
                index,
                kind: point.kind,
                measure,
            });
        }
    }

    /// Sorted critical indices
    pub fn indices(&self) -> Vec<usize> {
        self.points.keys().copied().collect()
    }

    /// All critical points in index order
    pub fn points(&self) -> impl Iterator<Item = &CriticalPoint> {
        self.points.values()
    }

    /// Current number of critical points
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the set is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether `index` is currently critical
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.points.contains_key(&index)
    }

    /// Size of the set before pruning
    #[inline]
    pub fn minimum_coordinates_required(&self) -> usize {
        self.minimum_coordinates_required
    }

    /// Whether any critical point was removed
    #[inline]
    pub fn was_pruned(&self) -> bool {
        !self.removed.is_empty()
    }

    /// Every removed point, in the order pruning removed them
    #[inline]
    pub fn removed(&self) -> &[PrunedPoint] {
        &self.removed
    }

    /// Number of corners removed by pruning
    pub fn removed_corners(&self) -> usize {
        self.removed
            .iter()
            .filter(|p| p.kind == CriticalKind::Corner)
            .count()
    }

    /// Number of curve representatives removed by pruning
    pub fn removed_curve_points(&self) -> usize {
        self.removed.len() - self.removed_corners()
    }

    /// Human-readable warnings describing what pruning removed
    pub fn pruning_warnings(&self, max_coordinates: usize) -> Vec<String> {
        let mut warnings = Vec::new();
        if !self.was_pruned() {
            return warnings;
        }

        warnings.push(format!(
            "The specified max_coordinates ({}) may be insufficient to properly represent this geometry \
             (minimum required: {}). Consider increasing the limit.",
            max_coordinates, self.minimum_coordinates_required
        ));
        for removed in &self.removed {
            warnings.push(match removed.kind {
                CriticalKind::Corner => format!(
                    "Removed corner at index {} (bearing change {:.1}°) to fit max_coordinates ({})",
                    removed.index, removed.measure, max_coordinates
                ),
                CriticalKind::CurveInterior => format!(
                    "Removed curve point at index {} ({:.1}° of turning now between its neighbours) \
                     to fit max_coordinates ({})",
                    removed.index, removed.measure, max_coordinates
                ),
                CriticalKind::CurveBoundary | CriticalKind::Endpoint => format!(
                    "Removed curve boundary at index {} (curve turning {:.1}°) to fit max_coordinates ({})",
                    removed.index, removed.measure, max_coordinates
                ),
            });
        }

        let removed_corners = self.removed_corners();
        if removed_corners > 0 {
            warnings.push(format!(
                "Dropped {} detected corner(s) to fit max_coordinates ({}); the sharpest corners were kept.",
                removed_corners, max_coordinates
            ));
        }
        let removed_curve_points = self.removed_curve_points();
        if removed_curve_points > 0 {
            warnings.push(format!(
                "Dropped {} curve point(s) to fit max_coordinates ({}); curved sections will be flattened.",
                removed_curve_points, max_coordinates
            ));
        }
        warnings
    }
}
