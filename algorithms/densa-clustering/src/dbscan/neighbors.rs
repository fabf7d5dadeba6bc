use densa::Float;
use densa_nn::{distance::Distance, NearestNeighbour, NnError};
use ndarray::{ArrayBase, ArrayView2, Data, Ix2};
use rayon::prelude::*;

use crate::dbscan::{DbscanError, InputError};

/// The eps-neighborhood of every observation
///
/// Entry `i` holds the indices of all observations within the tolerance of observation `i`,
/// including `i` itself, in ascending order. The order does not depend on the range-query
/// algorithm that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighborhoods {
    neighbors: Vec<Vec<usize>>,
}

impl Neighborhoods {
    /// Computes the neighborhood of every observation with a range query of radius `eps`.
    ///
    /// The queries only read the observations and the index, so they are run on the rayon
    /// thread pool. All of them complete before this returns.
    pub fn query<F: Float, DT: Data<Elem = F>, D: Distance<F>, N: NearestNeighbour>(
        observations: &ArrayBase<DT, Ix2>,
        eps: F,
        dist_fn: &D,
        nn_algo: &N,
    ) -> Result<Self, DbscanError> {
        let observations: ArrayView2<F> = observations.view();
        let nn = nn_algo.from_batch(&observations, dist_fn.clone())?;

        let neighbors = (0..observations.nrows())
            .into_par_iter()
            .map(|row| -> Result<Vec<usize>, DbscanError> {
                let mut found = nn
                    .within_range(observations.row(row), eps)
                    .map_err(|err| match err {
                        NnError::NonFiniteDistance => {
                            DbscanError::from(InputError::NonFiniteDistance { row })
                        }
                        other => other.into(),
                    })?
                    .into_iter()
                    .map(|(_, idx)| idx)
                    .collect::<Vec<_>>();
                found.sort_unstable();
                Ok(found)
            })
            .collect::<Result<Vec<_>, DbscanError>>()?;

        tracing::trace!(
            n_samples = neighbors.len(),
            n_pairs = neighbors.iter().map(Vec::len).sum::<usize>(),
            "computed eps-neighborhoods"
        );

        Ok(Neighborhoods { neighbors })
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of observation `idx`, itself included
    pub fn of(&self, idx: usize) -> &[usize] {
        &self.neighbors[idx]
    }

    /// Size of every neighborhood, in observation order
    pub fn sizes(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().map(Vec::len)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[usize]> + '_ {
        self.neighbors.iter().map(Vec::as_slice)
    }
}

impl From<Vec<Vec<usize>>> for Neighborhoods {
    fn from(mut neighbors: Vec<Vec<usize>>) -> Self {
        neighbors.iter_mut().for_each(|n| n.sort_unstable());
        Neighborhoods { neighbors }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use densa_nn::{
        distance::{FnDist, L1Dist, L2Dist},
        CommonNearestNeighbour,
    };
    use ndarray::{arr2, Array2, ArrayView1};
    use ndarray_rand::{rand::SeedableRng, rand_distr::Uniform, RandomExt};
    use rand_xoshiro::Xoshiro256Plus;

    #[test]
    fn includes_self_and_boundary() {
        let data = arr2(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [4.0, 0.0]]);
        let hoods =
            Neighborhoods::query(&data, 1.0, &L2Dist, &CommonNearestNeighbour::LinearSearch)
                .unwrap();

        assert_eq!(hoods.len(), 4);
        assert_eq!(hoods.of(0), &[0, 1]);
        assert_eq!(hoods.of(1), &[0, 1, 2]);
        assert_eq!(hoods.of(2), &[1, 2]);
        assert_eq!(hoods.of(3), &[3]);
        assert_eq!(hoods.sizes().collect::<Vec<_>>(), vec![2, 3, 2, 1]);
    }

    #[test]
    fn symmetric() {
        let mut rng = Xoshiro256Plus::seed_from_u64(7);
        let data = Array2::random_using((200, 3), Uniform::new(-5., 5.), &mut rng);
        let hoods =
            Neighborhoods::query(&data, 1.5, &L1Dist, &CommonNearestNeighbour::LinearSearch)
                .unwrap();

        for (i, hood) in hoods.iter().enumerate() {
            assert!(hood.contains(&i));
            for &j in hood {
                assert!(hoods.of(j).contains(&i));
            }
        }
    }

    #[test]
    fn kdtree_matches_linear_search() {
        let mut rng = Xoshiro256Plus::seed_from_u64(40);
        let data = Array2::random_using((500, 2), Uniform::new(-10., 10.), &mut rng);

        let linear =
            Neighborhoods::query(&data, 0.8, &L2Dist, &CommonNearestNeighbour::LinearSearch)
                .unwrap();
        let kdtree =
            Neighborhoods::query(&data, 0.8, &L2Dist, &CommonNearestNeighbour::KdTree).unwrap();
        assert_eq!(linear, kdtree);
    }

    #[test]
    fn non_finite_distance_names_row() {
        let data = arr2(&[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]]);
        let broken = FnDist::new(|a: ArrayView1<f64>, b: ArrayView1<f64>| {
            if a[0] == 2.0 && b[0] == 2.0 {
                f64::INFINITY
            } else {
                (a[0] - b[0]).abs()
            }
        });
        let err = Neighborhoods::query(&data, 1.0, &broken, &CommonNearestNeighbour::LinearSearch)
            .unwrap_err();
        assert_eq!(
            err,
            DbscanError::Input(InputError::NonFiniteDistance { row: 2 })
        );
    }

    #[test]
    fn from_unsorted_lists() {
        let hoods = Neighborhoods::from(vec![vec![1, 0], vec![0, 1], vec![2]]);
        assert_eq!(hoods.of(0), &[0, 1]);
        assert!(!hoods.is_empty());
    }
}
