use std::collections::VecDeque;

use ndarray::Array1;

use crate::dbscan::Neighborhoods;

/// The observations whose eps-neighborhood holds at least `min_points` observations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorePoints {
    mask: Vec<bool>,
    indices: Vec<usize>,
}

impl CorePoints {
    /// Classifies every observation from the size of its neighborhood
    pub fn classify(neighborhoods: &Neighborhoods, min_points: usize) -> Self {
        let mask: Vec<bool> = neighborhoods.sizes().map(|n| n >= min_points).collect();
        let indices = mask
            .iter()
            .enumerate()
            .filter_map(|(i, &core)| if core { Some(i) } else { None })
            .collect();
        CorePoints { mask, indices }
    }

    pub fn is_core(&self, idx: usize) -> bool {
        self.mask[idx]
    }

    /// Core points in ascending order
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Progress of a single observation through cluster expansion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointState {
    /// Not reached by any expansion yet
    Unvisited,
    /// Core point labelled with a cluster and waiting in the frontier
    Queued(usize),
    /// Labelled with a cluster and no longer in the frontier
    Assigned(usize),
    /// Not reachable from any core point
    Noise,
}

impl PointState {
    /// The cluster of the observation, if it has one
    pub fn cluster(&self) -> Option<usize> {
        match *self {
            PointState::Queued(id) | PointState::Assigned(id) => Some(id),
            PointState::Unvisited | PointState::Noise => None,
        }
    }
}

/// Sequential state of the cluster expansion
///
/// Owns the per-observation state and the cluster counter. An observation leaves `Unvisited`
/// at most once and keeps its cluster from then on, so a border point reachable from two
/// clusters belongs to whichever expansion reaches it first. Seeds are visited in ascending
/// order and the frontier is a FIFO queue, which makes that choice reproducible.
#[derive(Debug, Clone)]
pub struct ExpansionState {
    states: Vec<PointState>,
    n_clusters: usize,
    frontier: VecDeque<usize>,
}

impl ExpansionState {
    pub fn new(n_samples: usize) -> Self {
        ExpansionState {
            states: vec![PointState::Unvisited; n_samples],
            n_clusters: 0,
            frontier: VecDeque::new(),
        }
    }

    pub fn state(&self, idx: usize) -> PointState {
        self.states[idx]
    }

    /// Number of clusters seeded so far
    pub fn n_clusters(&self) -> usize {
        self.n_clusters
    }

    /// Grows one cluster from every core point that no earlier cluster has reached
    pub fn expand(&mut self, neighborhoods: &Neighborhoods, core_points: &CorePoints) {
        for &seed in core_points.indices() {
            if self.states[seed] != PointState::Unvisited {
                continue;
            }
            let cluster = self.n_clusters;
            self.n_clusters += 1;
            self.grow(seed, cluster, neighborhoods, core_points);
        }
    }

    fn grow(
        &mut self,
        seed: usize,
        cluster: usize,
        neighborhoods: &Neighborhoods,
        core_points: &CorePoints,
    ) {
        self.visit(seed, cluster, true);
        let mut size = 1;

        while let Some(current) = self.frontier.pop_front() {
            self.states[current] = PointState::Assigned(cluster);

            for &neighbor in neighborhoods.of(current) {
                if self.states[neighbor] == PointState::Unvisited {
                    // border points join the cluster but don't extend the frontier
                    self.visit(neighbor, cluster, core_points.is_core(neighbor));
                    size += 1;
                }
            }
        }

        tracing::trace!(cluster, seed, size, "expanded cluster");
    }

    fn visit(&mut self, idx: usize, cluster: usize, core: bool) {
        debug_assert_eq!(self.states[idx], PointState::Unvisited);
        if core {
            self.states[idx] = PointState::Queued(cluster);
            self.frontier.push_back(idx);
        } else {
            self.states[idx] = PointState::Assigned(cluster);
        }
    }

    /// Marks every observation no expansion reached as noise and returns the memberships
    pub fn into_labels(mut self) -> Array1<Option<usize>> {
        for state in self.states.iter_mut() {
            if *state == PointState::Unvisited {
                *state = PointState::Noise;
            }
        }
        self.states.iter().map(PointState::cluster).collect()
    }
}
