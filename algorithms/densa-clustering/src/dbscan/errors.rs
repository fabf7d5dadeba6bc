use densa_nn::NnError;
use thiserror::Error;

use crate::dbscan::DbscanParamsError;

/// Problems with the observations handed to DBSCAN
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Row-wise records could not be stacked into a matrix
    #[error(transparent)]
    Records(#[from] densa::Error),
    #[error("observations must have at least one feature")]
    ZeroDimension,
    #[error("observation {row} has a non-finite value in feature {col}")]
    NonFinite { row: usize, col: usize },
    #[error("point has {found} features, expected {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("distance metric returned a non-finite value for observation {row}")]
    NonFiniteDistance { row: usize },
    #[error(transparent)]
    Index(NnError),
}

/// An error when running DBSCAN
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DbscanError {
    /// The hyperparameters failed checking
    #[error("invalid parameter: {0}")]
    InvalidParameter(#[from] DbscanParamsError),
    /// The observations can't be clustered
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    /// The metric is unknown or doesn't behave like a distance
    #[error("unsupported metric: {0}")]
    UnsupportedMetric(String),
}

impl From<densa::Error> for DbscanError {
    fn from(err: densa::Error) -> Self {
        DbscanError::Input(InputError::Records(err))
    }
}

impl From<NnError> for DbscanError {
    fn from(err: NnError) -> Self {
        match err {
            NnError::UnsupportedMetric(name) => DbscanError::UnsupportedMetric(name),
            NnError::ZeroDim => InputError::ZeroDimension.into(),
            NnError::WrongDimension { expected, found } => {
                InputError::DimensionMismatch { expected, found }.into()
            }
            other => InputError::Index(other).into(),
        }
    }
}
