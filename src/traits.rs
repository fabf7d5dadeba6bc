//! Provide traits for different classes of algorithms
//!

/// Transformation algorithms
///
/// A transformer takes a dataset and transforms it into a different one. It has no concept of
/// state and provides therefore no method to predict new data. A typical example are
/// density-based clustering algorithms like DBSCAN, where the labels only make sense for the
/// observations they were computed on.
pub trait Transformer<R, T> {
    fn transform(&self, x: R) -> T;
}
