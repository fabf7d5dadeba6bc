//! Utility functions for randomly generating datasets

use ndarray::{s, Array, Array1, Array2, ArrayBase, Axis, Data, Ix1, Ix2};
use ndarray_rand::{
    rand::{seq::SliceRandom, Rng},
    rand_distr::{Distribution, StandardNormal},
    RandomExt,
};
use std::f64::consts::PI;

/// Special case of `blobs_with_distribution` with a standard normal distribution.
pub fn blobs(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    blobs_with_distribution(blob_size, blob_centroids, StandardNormal, rng)
}

/// Given an input matrix `blob_centroids`, with shape `(n_blobs, n_features)`,
/// generate `blob_size` data points (a "blob") around each of the blob centroids.
///
/// More specifically, each blob is formed by `blob_size` points sampled from a distribution
/// centered in the blob centroid. Rows are grouped by blob, in centroid order.
///
/// `blobs` can be used to quickly assemble a synthetic dataset to test or
/// benchmark various clustering algorithms on a best-case scenario input.
pub fn blobs_with_distribution(
    blob_size: usize,
    blob_centroids: &ArrayBase<impl Data<Elem = f64>, Ix2>,
    distribution: impl Distribution<f64> + Clone,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let (n_centroids, n_features) = blob_centroids.dim();
    let mut blobs: Array2<f64> = Array2::zeros((n_centroids * blob_size, n_features));

    for (blob_index, blob_centroid) in blob_centroids.rows().into_iter().enumerate() {
        let blob = make_blob(blob_size, &blob_centroid, distribution.clone(), rng);

        let indexes = s![blob_index * blob_size..(blob_index + 1) * blob_size, ..];
        blobs.slice_mut(indexes).assign(&blob);
    }
    blobs
}

fn make_blob(
    blob_size: usize,
    blob_centroid: &ArrayBase<impl Data<Elem = f64>, Ix1>,
    distribution: impl Distribution<f64>,
    rng: &mut impl Rng,
) -> Array2<f64> {
    let shape = (blob_size, blob_centroid.len());
    let origin_blob: Array2<f64> = Array::random_using(shape, distribution, rng);
    origin_blob + blob_centroid
}

/// Two interleaving half circles in the plane
///
/// The upper moon is a unit half circle centered at the origin, the lower one is the same half
/// circle flipped and shifted to `(1, 0.5)`. Of the `n_samples` points `n_samples / 2` go to the
/// upper moon and the rest to the lower one. Gaussian noise with standard deviation `noise` is
/// added to every coordinate and the rows are shuffled.
///
/// Returns the points with shape `(n_samples, 2)` and the moon every point was drawn from, `0`
/// for the upper and `1` for the lower one.
///
/// ```
/// use densa_datasets::generate::moons;
/// use ndarray_rand::rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256Plus;
///
/// let mut rng = Xoshiro256Plus::seed_from_u64(42);
/// let (points, moon) = moons(100, 0.05, &mut rng);
/// assert_eq!(points.dim(), (100, 2));
/// assert_eq!(moon.iter().filter(|&&m| m == 0).count(), 50);
/// ```
pub fn moons(n_samples: usize, noise: f64, rng: &mut impl Rng) -> (Array2<f64>, Array1<usize>) {
    let n_upper = n_samples / 2;
    let n_lower = n_samples - n_upper;

    let mut points = Array2::zeros((n_samples, 2));
    let mut moon = Array1::zeros(n_samples);

    for (i, angle) in Array1::linspace(0., PI, n_upper).iter().enumerate() {
        points[[i, 0]] = angle.cos();
        points[[i, 1]] = angle.sin();
    }
    for (i, angle) in Array1::linspace(0., PI, n_lower).iter().enumerate() {
        points[[n_upper + i, 0]] = 1. - angle.cos();
        points[[n_upper + i, 1]] = 0.5 - angle.sin();
        moon[n_upper + i] = 1;
    }

    if noise > 0. {
        let jitter: Array2<f64> = Array::random_using((n_samples, 2), StandardNormal, rng);
        points.scaled_add(noise, &jitter);
    }

    let mut order: Vec<usize> = (0..n_samples).collect();
    order.shuffle(rng);

    (points.select(Axis(0), &order), moon.select(Axis(0), &order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::arr2;
    use ndarray_rand::rand::SeedableRng;
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn blobs_are_grouped_by_centroid() {
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let centroids = arr2(&[[0., 0.], [100., 100.]]);
        let data = blobs(20, &centroids, &mut rng);

        assert_eq!(data.dim(), (40, 2));
        assert!(data.slice(s![..20, ..]).iter().all(|x| x.abs() < 10.));
        assert!(data.slice(s![20.., ..]).iter().all(|x| (x - 100.).abs() < 10.));
    }

    #[test]
    fn noiseless_moons_lie_on_half_circles() {
        let mut rng = Xoshiro256Plus::seed_from_u64(42);
        let (points, moon) = moons(101, 0., &mut rng);

        assert_eq!(points.dim(), (101, 2));
        assert_eq!(moon.iter().filter(|&&m| m == 1).count(), 51);

        for (point, &m) in points.rows().into_iter().zip(moon.iter()) {
            let (cx, cy) = if m == 0 { (0., 0.) } else { (1., 0.5) };
            let radius = ((point[0] - cx).powi(2) + (point[1] - cy).powi(2)).sqrt();
            assert_abs_diff_eq!(radius, 1., epsilon = 1e-12);
            if m == 0 {
                assert!(point[1] >= -1e-12);
            } else {
                assert!(point[1] <= 0.5 + 1e-12);
            }
        }
    }

    #[test]
    fn moons_are_reproducible() {
        let (a, la) = moons(50, 0.1, &mut Xoshiro256Plus::seed_from_u64(7));
        let (b, lb) = moons(50, 0.1, &mut Xoshiro256Plus::seed_from_u64(7));
        assert_eq!(a, b);
        assert_eq!(la, lb);
    }

    #[test]
    fn empty_moons() {
        let mut rng = Xoshiro256Plus::seed_from_u64(1);
        let (points, moon) = moons(0, 0.1, &mut rng);
        assert_eq!(points.dim(), (0, 2));
        assert!(moon.is_empty());
    }
}
