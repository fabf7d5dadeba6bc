//! Clusters two interleaving half circles with DBSCAN.
//!
//! Run with: cargo run --example moons -- --eps 0.1 --min-samples 5 --output moons.csv
//!
//! Set `RUST_LOG=densa_clustering=debug` to see the phases of the algorithm.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use densa::prelude::*;
use densa_clustering::Dbscan;
use densa_datasets::generate;
use densa_nn::{distance::CommonDistance, CommonNearestNeighbour};
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Cluster a noisy two moons dataset with DBSCAN")]
struct Args {
    /// Neighborhood radius
    #[arg(long, default_value_t = 0.1)]
    eps: f64,

    /// Neighborhood size, the point itself included, from which a point is a core point
    #[arg(long, default_value_t = 5)]
    min_samples: usize,

    /// euclidean, manhattan, chebyshev or minkowski:<p>
    #[arg(long, default_value = "euclidean")]
    metric: CommonDistance<f64>,

    /// Range query algorithm: linear or kdtree
    #[arg(long, default_value = "linear")]
    algorithm: CommonNearestNeighbour,

    #[arg(long, default_value_t = 500)]
    n_samples: usize,

    /// Standard deviation of the gaussian noise added to the points
    #[arg(long, default_value_t = 0.1)]
    noise: f64,

    #[arg(long, default_value_t = 42)]
    random_state: u64,

    /// Write x, y, the cluster label and the true moon of every point to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut rng = Xoshiro256Plus::seed_from_u64(args.random_state);
    let (points, moon) = generate::moons(args.n_samples, args.noise, &mut rng);
    info!(
        n_samples = args.n_samples,
        noise = args.noise,
        "generated two moons"
    );

    let params = Dbscan::params_with(args.min_samples, args.metric, args.algorithm)
        .tolerance(args.eps)
        .check()
        .context("invalid DBSCAN parameters")?;

    let start = Instant::now();
    let labels = params.transform(&points)?;
    let elapsed = start.elapsed();

    info!(
        n_clusters = labels.n_clusters(),
        n_noise = labels.noise_count(),
        elapsed_ms = elapsed.as_secs_f64() * 1e3,
        "clustered"
    );
    for (label, count) in labels.label_count() {
        match label {
            None => println!(" - {} noise points", count),
            Some(i) => println!(" - {} points in cluster {}", count, i),
        }
    }

    if let Some(path) = args.output {
        let mut writer = csv::Writer::from_path(&path)
            .with_context(|| format!("cannot create {}", path.display()))?;
        writer.write_record(&["x", "y", "label", "moon"])?;
        for ((point, label), moon) in points
            .rows()
            .into_iter()
            .zip(labels.to_signed().iter())
            .zip(moon.iter())
        {
            writer.write_record(&[
                point[0].to_string(),
                point[1].to_string(),
                label.to_string(),
                moon.to_string(),
            ])?;
        }
        writer.flush()?;
        info!(path = %path.display(), "wrote labelled points");
    }

    Ok(())
}
