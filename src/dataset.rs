//! Records and labels
//!
//! Floating point bounds shared by every algorithm, conversion of row-wise records into a
//! feature matrix and helpers for inspecting cluster assignments.
use ndarray::{Array1, Array2, ArrayBase, Data, Ix1, ScalarOperand};
use num_traits::{FromPrimitive, NumAssignOps, NumCast, Signed};

use std::collections::BTreeMap;
use std::fmt;
use std::iter::Sum;

use crate::error::{Error, Result};

/// Floating point numbers
///
/// This trait bound multiplexes to the most common assumption of floating point number and
/// implement them for 32bit and 64bit floating points. They are used in the records of every
/// algorithm in the workspace.
pub trait Float:
    num_traits::Float
    + FromPrimitive
    + PartialOrd
    + Sync
    + Send
    + Default
    + fmt::Display
    + fmt::Debug
    + Signed
    + Sum
    + NumAssignOps
    + ScalarOperand
    + approx::AbsDiffEq
    + 'static
{
    fn cast<T: NumCast>(x: T) -> Self {
        NumCast::from(x).unwrap()
    }
}

impl Float for f32 {}
impl Float for f64 {}

/// Stack row-wise records into an `(n_samples, n_features)` matrix
///
/// Every row has to have the same number of features, otherwise `Error::RaggedRecords` names the
/// first offending row. An empty slice results in a `(0, 0)` matrix.
pub fn rows_to_matrix<F: Float, R: AsRef<[F]>>(rows: &[R]) -> Result<Array2<F>> {
    let n_features = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
    let mut flat = Vec::with_capacity(rows.len() * n_features);
    for (row, record) in rows.iter().enumerate() {
        let record = record.as_ref();
        if record.len() != n_features {
            return Err(Error::RaggedRecords {
                row,
                expected: n_features,
                found: record.len(),
            });
        }
        flat.extend_from_slice(record);
    }

    Ok(Array2::from_shape_vec((rows.len(), n_features), flat)?)
}

/// Cluster memberships as produced by density-based clustering
///
/// Every entry is either `Some(cluster_id)` or `None` for noise. Cluster ids are dense and start
/// at zero.
pub trait ClusterLabels {
    /// Signed labels with `-1` marking noise
    fn to_signed(&self) -> Array1<isize>;

    /// Number of distinct clusters
    fn n_clusters(&self) -> usize;

    /// Number of observations labelled as noise
    fn noise_count(&self) -> usize;

    /// Number of observations per label, ordered with noise first
    fn label_count(&self) -> BTreeMap<Option<usize>, usize>;
}

impl<D: Data<Elem = Option<usize>>> ClusterLabels for ArrayBase<D, Ix1> {
    fn to_signed(&self) -> Array1<isize> {
        self.map(|label| label.map(|id| id as isize).unwrap_or(-1))
    }

    fn n_clusters(&self) -> usize {
        self.iter()
            .filter_map(|label| *label)
            .max()
            .map(|id| id + 1)
            .unwrap_or(0)
    }

    fn noise_count(&self) -> usize {
        self.iter().filter(|label| label.is_none()).count()
    }

    fn label_count(&self) -> BTreeMap<Option<usize>, usize> {
        let mut counts = BTreeMap::new();
        for label in self.iter() {
            *counts.entry(*label).or_insert(0) += 1;
        }
        counts
    }
}
