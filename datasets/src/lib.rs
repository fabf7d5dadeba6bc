//! `densa-datasets` provides synthetic datasets for the tests, benchmarks and examples of the
//! `densa` crates.
//!
//! ## Current State
//!
//! With the `generate` feature enabled the [`generate`] module offers:
//!
//! * `blobs`: isotropic groups of points around given centroids
//! * `moons`: two interleaving half circles, a classic non-convex case for density-based
//!   clustering
//!
//! ## Using a generator
//!
//! ```ignore
//! densa-datasets = { version = "0.1.0", features = ["generate"] }
//! ```
//! and then use it in your example or tests as
//! ```ignore
//! let mut rng = Xoshiro256Plus::seed_from_u64(42);
//! let (points, moon) = densa_datasets::generate::moons(500, 0.1, &mut rng);
//! ```

#[cfg(feature = "generate")]
pub mod generate;
