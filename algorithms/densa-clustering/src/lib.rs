//! `densa-clustering` provides an exact, deterministic implementation of DBSCAN.
//!
//! ## The big picture
//!
//! `densa-clustering` is the algorithm crate of the `densa` workspace. It builds on the shared
//! traits of `densa` and on the range queries of `densa-nn`.
//!
//! ## Current state
//!
//! Right now `densa-clustering` provides:
//! * [DBSCAN](Dbscan), configured through [`DbscanParams`] and run with
//!   [`Transformer::transform`](densa::traits::Transformer::transform)
//! * the [`cluster`] family of functions, returning signed labels with `-1` for noise
//! * the intermediate phases ([`Neighborhoods`], [`CorePoints`], [`ExpansionState`]) for callers
//!   who want to inspect them
//!
//! Implementation choices, algorithmic details and a tutorial can be found in the page dedicated
//! to [`Dbscan`].
mod dbscan;

pub use dbscan::*;
