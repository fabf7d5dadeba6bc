//! Error types in densa
//!

use thiserror::Error;

use ndarray::ShapeError;
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("record {row} has {found} features, expected {expected}")]
    RaggedRecords {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("invalid ndarray shape {0}")]
    NdShape(#[from] ShapeError),
}
