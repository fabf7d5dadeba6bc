//! `densa-nn` provides a pure Rust implementation of exact range-query algorithms.
//!
//! ## The big picture
//!
//! Density-based clustering asks one question over and over: which points lie within a given
//! distance of this one? This crate answers it with different spatial indices, all of which
//! return exactly the same set of points for the same query.
//!
//! ## Current state
//!
//! Right now `densa-nn` provides the following range-query algorithms:
//! * [Linear Scan](LinearSearch)
//! * [KD Tree](KdTree)
//!
//! The [`CommonNearestNeighbour`](enum.CommonNearestNeighbour.html) enum should be used to
//! dispatch between the algorithms using a common interface. Linear search works with any
//! [`Distance`](distance::Distance); the KD tree prunes its search with per-coordinate bounds
//! and therefore only supports metrics that grow with every coordinate difference, such as the
//! built-in L1, L2, L-infinite and L-p distances.
use distance::Distance;
use densa::Float;
use ndarray::{ArrayBase, ArrayView1, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};
use thiserror::Error;

pub mod distance;
mod kdtree;
mod linear;

pub use crate::kdtree::*;
pub use linear::*;

pub(crate) type Point<'a, F> = ArrayView1<'a, F>;

/// Error returned when building a range-query index or when making a query
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NnError {
    /// The range-query index was built with a leaf size of zero
    #[error("leaf size is 0")]
    EmptyLeaf,
    /// The index was built on points with zero features
    #[error("points have dimension of 0")]
    ZeroDim,
    /// A point has a different number of features than the points of the index
    #[error("query point has {found} features, the index has {expected}")]
    WrongDimension { expected: usize, found: usize },
    /// A point of the batch has a NaN or infinite coordinate
    #[error("points must have finite coordinates")]
    NonFiniteCoordinate,
    /// The distance metric returned NaN or infinity
    #[error("distance metric returned a non-finite value")]
    NonFiniteDistance,
    /// The metric name is not recognised
    #[error("unsupported metric `{0}`")]
    UnsupportedMetric(String),
}

/// Range-query index built from a batch of points, which can be queried with new points.
/// Implementations must return the same set of points as a linear scan, including points lying
/// exactly at the query distance.
pub trait NearestNeighbourIndex<F: Float>: Send + Sync {
    /// Returns all the points within `range` of `point`, inclusive, along with their positions
    /// in the original batch. The points are not guaranteed to be in any order.
    ///
    /// Returns an error if the provided point has different dimensions than the index's points
    /// or if the distance metric produced a non-finite value.
    #[allow(clippy::type_complexity)]
    fn within_range<'b>(
        &self,
        point: Point<'b, F>,
        range: F,
    ) -> Result<Vec<(Point<'_, F>, usize)>, NnError>;

    /// Number of points in the index
    fn num_points(&self) -> usize;
}

/// Range-query algorithm used to build an index from a batch of points
///
/// ```rust
/// use densa_nn::{distance::L2Dist, CommonNearestNeighbour, NearestNeighbour};
/// use ndarray::{arr1, arr2};
///
/// let points = arr2(&[[0.0, 0.0], [1.0, 0.0], [5.0, 5.0]]);
/// let nn = CommonNearestNeighbour::KdTree
///     .from_batch(&points, L2Dist)
///     .unwrap();
/// let mut close: Vec<_> = nn
///     .within_range(arr1(&[0.0, 0.0]).view(), 1.0)
///     .unwrap()
///     .into_iter()
///     .map(|(_, i)| i)
///     .collect();
/// close.sort_unstable();
/// assert_eq!(close, vec![0, 1]);
/// ```
pub trait NearestNeighbour: std::fmt::Debug + Send + Sync + Clone {
    /// Builds an index using the provided batch of points. The leaf size controls how many
    /// points are stored in a single node of tree-based indices and has no effect on linear
    /// search.
    ///
    /// Returns an error if the points have dimensionality of 0, if the leaf size is 0 or if a
    /// coordinate is not finite.
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, NnError>;

    /// Builds an index using a default leaf size.
    fn from_batch<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, NnError> {
        self.from_batch_with_leaf_size(batch, 2usize.pow(4), dist_fn)
    }
}

/// Enum that dispatches to one of the crate's [`NearestNeighbour`](trait.NearestNeighbour.html)
/// implementations based on value.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum CommonNearestNeighbour {
    /// Linear search
    LinearSearch,
    /// KD Tree
    KdTree,
}

impl NearestNeighbour for CommonNearestNeighbour {
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, NnError> {
        match self {
            Self::LinearSearch => LinearSearch.from_batch_with_leaf_size(batch, leaf_size, dist_fn),
            Self::KdTree => KdTree.from_batch_with_leaf_size(batch, leaf_size, dist_fn),
        }
    }
}

impl std::str::FromStr for CommonNearestNeighbour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "linear" | "brute" | "linear_search" => Ok(Self::LinearSearch),
            "kdtree" | "kd_tree" => Ok(Self::KdTree),
            other => Err(format!("unknown nearest neighbour algorithm `{}`", other)),
        }
    }
}

pub(crate) fn check_batch<F: Float, DT: Data<Elem = F>>(
    batch: &ArrayBase<DT, Ix2>,
    leaf_size: usize,
) -> Result<(), NnError> {
    if leaf_size == 0 {
        Err(NnError::EmptyLeaf)
    } else if batch.ncols() == 0 {
        Err(NnError::ZeroDim)
    } else if batch.iter().any(|x| !x.is_finite()) {
        Err(NnError::NonFiniteCoordinate)
    } else {
        Ok(())
    }
}
