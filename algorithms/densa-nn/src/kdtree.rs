use std::cell::Cell;

use densa::Float;
use kdtree::ErrorKind;
use ndarray::{aview1, ArrayBase, ArrayView2, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{
    check_batch, distance::Distance, NearestNeighbour, NearestNeighbourIndex, NnError, Point,
};

/// Spatial indexing structure created by [`KdTree`](struct.KdTree.html)
pub struct KdTreeIndex<'a, F: Float, D: Distance<F>> {
    tree: kdtree::KdTree<F, usize, Vec<F>>,
    batch: ArrayView2<'a, F>,
    dist_fn: D,
}

fn map_err(err: ErrorKind, expected: usize, found: usize) -> NnError {
    match err {
        ErrorKind::WrongDimension => NnError::WrongDimension { expected, found },
        ErrorKind::NonFiniteCoordinate => NnError::NonFiniteCoordinate,
        ErrorKind::ZeroCapacity => NnError::EmptyLeaf,
    }
}

impl<'a, F: Float, D: Distance<F>> KdTreeIndex<'a, F, D> {
    /// Creates a new `KdTreeIndex`
    pub fn new<DT: Data<Elem = F>>(
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Self, NnError> {
        check_batch(batch, leaf_size)?;

        let n_features = batch.ncols();
        let mut tree = kdtree::KdTree::with_capacity(n_features, leaf_size);
        for (i, point) in batch.rows().into_iter().enumerate() {
            tree.add(point.to_vec(), i)
                .map_err(|e| map_err(e, n_features, point.len()))?;
        }

        Ok(Self {
            tree,
            batch: batch.view(),
            dist_fn,
        })
    }
}

impl<'a, F: Float, D: Distance<F>> NearestNeighbourIndex<F> for KdTreeIndex<'a, F, D> {
    fn within_range<'b>(
        &self,
        point: Point<'b, F>,
        range: F,
    ) -> Result<Vec<(Point<'_, F>, usize)>, NnError> {
        let n_features = self.batch.ncols();
        if point.len() != n_features {
            return Err(NnError::WrongDimension {
                expected: n_features,
                found: point.len(),
            });
        }

        let query = point.to_vec();
        let non_finite = Cell::new(false);
        let dist_fn = |a: &[F], b: &[F]| {
            let rdist = self.dist_fn.rdistance(aview1(a), aview1(b));
            if !rdist.is_finite() {
                non_finite.set(true);
            }
            rdist
        };

        let found = self
            .tree
            .within(&query, self.dist_fn.dist_to_rdist(range), &dist_fn)
            .map_err(|e| map_err(e, n_features, query.len()))?;
        if non_finite.get() {
            return Err(NnError::NonFiniteDistance);
        }

        Ok(found
            .into_iter()
            .map(|(_, &i)| (self.batch.row(i), i))
            .collect())
    }

    fn num_points(&self) -> usize {
        self.tree.size()
    }
}

/// Implementation of [K-D tree](https://en.wikipedia.org/wiki/K-d_tree), a space-partitioning
/// data structure that splits the feature space along one dimension at a time.
///
/// Whole subtrees are discarded when the bounding box of the subtree is further away from the
/// query than the query distance, so the metric has to be monotonic in every coordinate
/// difference. This holds for L1, L2, L-infinite and L-p with `p >= 1`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct KdTree;

impl KdTree {
    /// Creates an instance of `KdTree`
    pub fn new() -> Self {
        Self
    }
}

impl NearestNeighbour for KdTree {
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, NnError> {
        KdTreeIndex::new(batch, leaf_size, dist_fn)
            .map(|v| Box::new(v) as Box<dyn 'a + NearestNeighbourIndex<F>>)
    }
}
