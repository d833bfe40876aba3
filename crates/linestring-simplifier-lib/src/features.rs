//! Corner and curve detection over the bearing sequence of a polyline

use crate::{Polyline, SimplifyOptions, utils};

/// Bearing changes at or below this magnitude count as straight (no turn direction)
const STRAIGHT_TOLERANCE_DEG: f64 = 1e-9;

/// Per-segment lengths plus per-vertex bearing changes, computed once
#[derive(Debug, Clone)]
pub struct TurnProfile {
    /// Great-circle length of segment (i, i+1) in meters
    segment_lengths: Vec<f64>,
    /// Signed bearing change at vertex i; zero at both endpoints
    changes: Vec<f64>,
    /// prefix_turning[i] = sum of |changes[k]| for k < i
    prefix_turning: Vec<f64>,
}

/// A vertex whose bearing change reaches the corner threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Corner {
    pub index: usize,
    /// Signed bearing change at the vertex, degrees in (-180, 180]
    pub bearing_change: f64,
}

/// A maximal run of same-direction turns that adds up to a curve
#[derive(Debug, Clone, PartialEq)]
pub struct CurveRun {
    /// First interior index of the run
    pub start: usize,
    /// Last interior index of the run (inclusive)
    pub end: usize,
    /// Sum of |bearing change| over the run
    pub total_turning: f64,
    /// Sorted indices kept to represent the run (always includes `start` and `end`)
    pub representatives: Vec<usize>,
}

/// Result of running corner and curve detection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectedFeatures {
    pub corners: Vec<Corner>,
    pub curves: Vec<CurveRun>,
}

impl TurnProfile {
    /// Precompute bearings, segment lengths and bearing changes
    pub fn new(polyline: &Polyline) -> Self {
        #[cfg(feature = "profiling")]
        profiling::scope!("features::turn_profile");

        let coords = polyline.coords();
        let n = coords.len();

        // Validated polylines never contain coincident consecutive coordinates,
        // so every segment bearing is defined.
        let bearings: Vec<f64> = coords
            .windows(2)
            .map(|pair| utils::bearing_unchecked(pair[0], pair[1]))
            .collect();
        let segment_lengths: Vec<f64> = coords
            .windows(2)
            .map(|pair| utils::haversine_distance(pair[0], pair[1]))
            .collect();

        let mut changes = vec![0.0; n];
        for i in 1..n.saturating_sub(1) {
            changes[i] = utils::angular_delta(bearings[i - 1], bearings[i]);
        }

        let mut prefix_turning = Vec::with_capacity(n + 1);
        prefix_turning.push(0.0);
        let mut running = 0.0;
        for change in &changes {
            running += change.abs();
            prefix_turning.push(running);
        }

        Self {
            segment_lengths,
            changes,
            prefix_turning,
        }
    }

    /// Number of vertices
    #[inline]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if the profile has no vertices
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Signed bearing change at vertex `index` (zero at endpoints)
    #[inline]
    pub fn change(&self, index: usize) -> f64 {
        self.changes.get(index).copied().unwrap_or(0.0)
    }

    /// Total length of the polyline in meters
    pub fn total_length(&self) -> f64 {
        self.segment_lengths.iter().sum()
    }

    /// Accumulated |bearing change| strictly between vertices `a` and `b` (`a < b`)
    ///
    /// This is the turning that disappears when `a` and `b` become consecutive.
    #[inline]
    pub fn turning_between(&self, a: usize, b: usize) -> f64 {
        if b <= a + 1 || b > self.len() {
            return 0.0;
        }
        self.prefix_turning[b] - self.prefix_turning[a + 1]
    }
}

impl Corner {
    /// Importance when pruning (higher = more important to keep)
    #[inline]
    pub fn priority(&self) -> f64 {
        self.bearing_change.abs()
    }
}

impl CurveRun {
    /// Whether `index` is one of the run's two boundary representatives
    #[inline]
    pub fn is_boundary(&self, index: usize) -> bool {
        index == self.start || index == self.end
    }
}

impl DetectedFeatures {
    /// Run corner and curve detection with the thresholds in `options`
    ///
    /// Detection is a pure function of the profile and the options. Vertices whose turn
    /// reaches the corner threshold always split curve runs, even when corner
    /// preservation is disabled.
    pub fn detect(profile: &TurnProfile, options: &SimplifyOptions) -> Self {
        #[cfg(feature = "profiling")]
        profiling::scope!("features::detect");

        let corners = if options.preserve_corners {
            detect_corners(profile, options.min_angle_for_corners)
        } else {
            Vec::new()
        };

        let curves = if options.preserve_curves {
            detect_curve_runs(
                profile,
                options.min_angle_for_corners,
                options.curve_detection_threshold,
            )
        } else {
            Vec::new()
        };

        tracing::debug!(
            corners = corners.len(),
            curves = curves.len(),
            "feature detection finished"
        );

        Self { corners, curves }
    }

    /// All curve representative indices, run by run
    pub fn curve_representatives(&self) -> impl Iterator<Item = usize> + '_ {
        self.curves
            .iter()
            .flat_map(|run| run.representatives.iter().copied())
    }
}

fn detect_corners(profile: &TurnProfile, min_angle: f64) -> Vec<Corner> {
    (1..profile.len().saturating_sub(1))
        .filter_map(|index| {
            let bearing_change = profile.change(index);
            (bearing_change.abs() >= min_angle).then_some(Corner {
                index,
                bearing_change,
            })
        })
        .collect()
}

fn detect_curve_runs(profile: &TurnProfile, min_angle: f64, threshold: f64) -> Vec<CurveRun> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, usize, f64)> = None; // (start, end, sign)

    let close = |run: Option<(usize, usize, f64)>, runs: &mut Vec<CurveRun>| {
        if let Some((start, end, _)) = run {
            let total_turning = profile.turning_between(start.saturating_sub(1), end + 1);
            if total_turning >= threshold {
                runs.push(CurveRun {
                    start,
                    end,
                    total_turning,
                    representatives: select_representatives(profile, start, end, min_angle),
                });
            }
        }
    };

    for index in 1..profile.len().saturating_sub(1) {
        let change = profile.change(index);
        if change.abs() >= min_angle || change.abs() <= STRAIGHT_TOLERANCE_DEG {
            close(current.take(), &mut runs);
            continue;
        }

        let sign = change.signum();
        current = match current {
            Some((start, end, run_sign)) if run_sign == sign && end + 1 == index => {
                Some((start, index, run_sign))
            }
            other => {
                close(other, &mut runs);
                Some((index, index, sign))
            }
        };
    }
    close(current, &mut runs);

    runs
}

/// Keep the run boundaries, then split the span with the most hidden turning at its
/// sharpest vertex until no two consecutive kept vertices hide a corner-sized turn
fn select_representatives(
    profile: &TurnProfile,
    start: usize,
    end: usize,
    min_angle: f64,
) -> Vec<usize> {
    let mut kept = vec![start];
    if end != start {
        kept.push(end);
    }

    let mut spans = vec![(start, end)];
    while let Some((a, b)) = spans.pop() {
        if profile.turning_between(a, b) < min_angle {
            continue;
        }
        let Some(split) = sharpest_vertex(profile, a, b) else {
            continue;
        };
        kept.push(split);
        spans.push((a, split));
        spans.push((split, b));
    }

    kept.sort_unstable();
    kept
}

/// Vertex strictly between `a` and `b` with the largest |bearing change|;
/// ties go to the vertex nearest the span midpoint, then the lower index
fn sharpest_vertex(profile: &TurnProfile, a: usize, b: usize) -> Option<usize> {
    let doubled_mid = a + b;
    (a + 1..b).max_by(|&i, &j| {
        profile
            .change(i)
            .abs()
            .total_cmp(&profile.change(j).abs())
            .then_with(|| (2 * j).abs_diff(doubled_mid).cmp(&(2 * i).abs_diff(doubled_mid)))
            .then_with(|| j.cmp(&i))
    })
}
