//! `densa` provides the shared building blocks of the `densa` density-based clustering toolkit.
//!
//! ## The big picture
//!
//! The workspace is split the same way most `ndarray`-based ML toolkits are:
//! * `densa` (this crate): the [`Float`] bound, hyperparameter checking via
//!   [`ParamGuard`](param_guard::ParamGuard), the [`Transformer`](traits::Transformer) trait,
//!   label helpers and the error type shared by every algorithm crate
//! * `densa-nn`: distance metrics and exact range-query indices
//! * `densa-clustering`: the DBSCAN algorithm itself
//! * `densa-datasets`: synthetic generators used by tests, benchmarks and examples
//!
//! Algorithm crates configure a set of unchecked hyperparameters with a builder, check them with
//! [`ParamGuard::check`](param_guard::ParamGuard::check) and run them through
//! [`Transformer::transform`](traits::Transformer::transform).

pub mod benchmarks;
pub mod dataset;
pub mod error;
pub mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{ClusterLabels, Float};
pub use error::{Error, Result};
