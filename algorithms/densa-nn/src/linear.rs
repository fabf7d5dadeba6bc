use densa::Float;
use ndarray::{ArrayBase, ArrayView2, Data, Ix2};
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::{
    check_batch, distance::Distance, NearestNeighbour, NearestNeighbourIndex, NnError, Point,
};

/// Spatial indexing structure created by [`LinearSearch`](struct.LinearSearch.html)
#[derive(Debug, Clone, PartialEq)]
pub struct LinearSearchIndex<'a, F: Float, D: Distance<F>>(ArrayView2<'a, F>, D);

impl<'a, F: Float, D: Distance<F>> LinearSearchIndex<'a, F, D> {
    /// Creates a new `LinearSearchIndex`
    pub fn new<DT: Data<Elem = F>>(
        batch: &'a ArrayBase<DT, Ix2>,
        dist_fn: D,
    ) -> Result<Self, NnError> {
        check_batch(batch, 1)?;
        Ok(Self(batch.view(), dist_fn))
    }
}

impl<'a, F: Float, D: Distance<F>> NearestNeighbourIndex<F> for LinearSearchIndex<'a, F, D> {
    fn within_range<'b>(
        &self,
        point: Point<'b, F>,
        range: F,
    ) -> Result<Vec<(Point<'_, F>, usize)>, NnError> {
        if self.0.ncols() != point.len() {
            return Err(NnError::WrongDimension {
                expected: self.0.ncols(),
                found: point.len(),
            });
        }

        let range = self.1.dist_to_rdist(range);
        let mut out = Vec::new();
        for (i, pt) in self.0.rows().into_iter().enumerate() {
            let rdist = self.1.rdistance(point.reborrow(), pt.reborrow());
            if !rdist.is_finite() {
                return Err(NnError::NonFiniteDistance);
            }
            if rdist <= range {
                out.push((pt, i));
            }
        }
        Ok(out)
    }

    fn num_points(&self) -> usize {
        self.0.nrows()
    }
}

/// Implementation of linear search, which is the simplest range-query algorithm. It compares
/// the query point to every other point in the batch, so it works with every distance metric.
/// It's suitable for small datasets or for metrics the KD tree can't prune with.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct LinearSearch;

impl LinearSearch {
    /// Creates an instance of `LinearSearch`
    pub fn new() -> Self {
        Self
    }
}

impl NearestNeighbour for LinearSearch {
    fn from_batch_with_leaf_size<'a, F: Float, DT: Data<Elem = F>, D: 'a + Distance<F>>(
        &self,
        batch: &'a ArrayBase<DT, Ix2>,
        leaf_size: usize,
        dist_fn: D,
    ) -> Result<Box<dyn 'a + NearestNeighbourIndex<F>>, NnError> {
        check_batch(batch, leaf_size)?;
        LinearSearchIndex::new(batch, dist_fn)
            .map(|v| Box::new(v) as Box<dyn 'a + NearestNeighbourIndex<F>>)
    }
}
