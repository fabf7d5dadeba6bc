use crate::dbscan::{
    CorePoints, DbscanError, DbscanParams, DbscanValidParams, ExpansionState, InputError,
    Neighborhoods,
};
use densa::{dataset::rows_to_matrix, param_guard::ParamGuard, traits::Transformer};
use densa::{ClusterLabels, Float};
use densa_nn::{
    distance::{CommonDistance, Distance, L2Dist},
    CommonNearestNeighbour, NearestNeighbour,
};
use ndarray::{Array1, ArrayBase, Data, Ix2};

#[derive(Clone, Debug, PartialEq)]
/// DBSCAN (Density-based Spatial Clustering of Applications with Noise)
/// clusters together points which are close together with enough neighbors
/// labelled points which are sparsely neighbored as noise. As points may be
/// part of a cluster or noise the transform method returns
/// `Array1<Option<usize>>`.
///
/// As it groups together points in dense regions the number of clusters is
/// determined by the dataset and distance tolerance not the user.
///
/// We provide an implemention of the standard O(N^2) query-based algorithm
/// of which more details can be found in the next section or
/// [here](https://en.wikipedia.org/wiki/DBSCAN).
///
/// The standard DBSCAN algorithm isn't iterative and therefore there's
/// no fit method provided only transform.
///
/// ## The algorithm
///
/// The algorithm runs in three phases:
/// - Find the neighborhood of every point, i.e. all points within `tolerance`
/// of it (itself included). The range queries run in parallel.
/// - Mark every point whose neighborhood holds at least `min_points` points as
/// a core point
/// - Visit the core points in ascending order. Every core point not yet part of
/// a cluster seeds a new one, which is grown breadth-first: every unlabelled
/// neighbor of a core point in the cluster joins it, and core points among
/// them are queued to be grown in turn.
///
/// Points never reached from a core point are noise. A border point within
/// reach of several clusters joins the one that reaches it first, so the
/// output only depends on the order of the observations.
///
/// ## Tutorial
///
/// Let's do a walkthrough of an example running DBSCAN on some data.
///
/// ```rust
/// use densa::traits::Transformer;
/// use densa_clustering::Dbscan;
/// use ndarray::array;
///
/// let observations = array![
///     [0.0, 0.0], [0.1, 0.0], [0.0, 0.1],
///     [5.0, 5.0], [5.1, 5.0], [5.0, 5.1],
///     [20.0, 0.0],
/// ];
///
/// // Let's configure and run our DBSCAN algorithm
/// // We use the builder pattern to specify the hyperparameters
/// // `min_points` is the only mandatory parameter.
/// // If you don't specify the others (e.g. `tolerance`)
/// // default values will be used.
/// let min_points = 3;
/// let clusters = Dbscan::params(min_points)
///     .tolerance(0.5)
///     .transform(&observations)
///     .unwrap();
/// // Points are `None` if noise `Some(id)` if belonging to a cluster.
/// assert_eq!(clusters[0], Some(0));
/// assert_eq!(clusters[3], Some(1));
/// assert_eq!(clusters[6], None);
/// ```
///
pub struct Dbscan;

impl Dbscan {
    /// Configures the hyperparameters with the minimum number of points required to form a cluster
    ///
    /// Defaults are provided if the optional parameters are not specified:
    /// * `tolerance = 0.5`
    /// * `dist_fn = L2Dist` (Euclidean distance)
    /// * `nn_algo = LinearSearch`
    pub fn params<F: Float>(min_points: usize) -> DbscanParams<F, L2Dist, CommonNearestNeighbour> {
        Self::params_with(min_points, L2Dist, CommonNearestNeighbour::LinearSearch)
    }

    /// Configures the hyperparameters with the minimum number of points, a custom distance metric,
    /// and a custom nearest neighbour algorithm
    pub fn params_with<F: Float, D: Distance<F>, N: NearestNeighbour>(
        min_points: usize,
        dist_fn: D,
        nn_algo: N,
    ) -> DbscanParams<F, D, N> {
        DbscanParams::new(min_points, dist_fn, nn_algo)
    }
}

impl<F: Float, D: Distance<F>, N: NearestNeighbour> DbscanValidParams<F, D, N> {
    /// The eps-neighborhood of every observation
    ///
    /// Fails if the observations have no features or non-finite values, or if the distance
    /// metric doesn't behave like a distance on them.
    pub fn neighborhoods<DT: Data<Elem = F>>(
        &self,
        observations: &ArrayBase<DT, Ix2>,
    ) -> Result<Neighborhoods, DbscanError> {
        if observations.nrows() == 0 {
            return Ok(Neighborhoods::from(Vec::new()));
        }
        validate_observations(observations)?;
        probe_metric(observations, &self.dist_fn)?;

        Neighborhoods::query(observations, self.tolerance, &self.dist_fn, &self.nn_algo)
    }

    /// The core points among the observations
    pub fn core_points<DT: Data<Elem = F>>(
        &self,
        observations: &ArrayBase<DT, Ix2>,
    ) -> Result<CorePoints, DbscanError> {
        let neighborhoods = self.neighborhoods(observations)?;
        Ok(CorePoints::classify(&neighborhoods, self.min_points))
    }
}

impl<F: Float, DT: Data<Elem = F>, D: Distance<F>, N: NearestNeighbour>
    Transformer<&ArrayBase<DT, Ix2>, Result<Array1<Option<usize>>, DbscanError>>
    for DbscanValidParams<F, D, N>
{
    fn transform(
        &self,
        observations: &ArrayBase<DT, Ix2>,
    ) -> Result<Array1<Option<usize>>, DbscanError> {
        let _span = tracing::debug_span!(
            "dbscan",
            n_samples = observations.nrows(),
            n_features = observations.ncols(),
            eps = %self.tolerance,
            min_points = self.min_points
        )
        .entered();

        let neighborhoods = self.neighborhoods(observations)?;
        let core_points = CorePoints::classify(&neighborhoods, self.min_points);
        tracing::debug!(n_core = core_points.len(), "classified core points");

        // expansion mutates a single label array in seed order and stays sequential
        let mut state = ExpansionState::new(neighborhoods.len());
        state.expand(&neighborhoods, &core_points);
        let labels = state.into_labels();

        tracing::debug!(
            n_clusters = labels.n_clusters(),
            n_noise = labels.noise_count(),
            "dbscan finished"
        );
        Ok(labels)
    }
}

impl<F: Float, DT: Data<Elem = F>, D: Distance<F>, N: NearestNeighbour>
    Transformer<&ArrayBase<DT, Ix2>, Result<Array1<Option<usize>>, DbscanError>>
    for DbscanParams<F, D, N>
{
    fn transform(
        &self,
        observations: &ArrayBase<DT, Ix2>,
    ) -> Result<Array1<Option<usize>>, DbscanError> {
        self.check_ref()?.transform(observations)
    }
}

fn validate_observations<F: Float, DT: Data<Elem = F>>(
    observations: &ArrayBase<DT, Ix2>,
) -> Result<(), InputError> {
    if observations.ncols() == 0 {
        return Err(InputError::ZeroDimension);
    }
    match observations.indexed_iter().find(|(_, x)| !x.is_finite()) {
        Some(((row, col), _)) => Err(InputError::NonFinite { row, col }),
        None => Ok(()),
    }
}

/// Evaluates the metric on the first and last observation and rejects it if it isn't zero on
/// identical points, non-negative and symmetric there
fn probe_metric<F: Float, DT: Data<Elem = F>, D: Distance<F>>(
    observations: &ArrayBase<DT, Ix2>,
    dist_fn: &D,
) -> Result<(), DbscanError> {
    let tol = F::epsilon().sqrt();
    let (first, last) = (0, observations.nrows() - 1);
    let (a, b) = (observations.row(first), observations.row(last));

    let self_dist = dist_fn.distance(a.view(), a.view());
    if !self_dist.is_finite() {
        return Err(InputError::NonFiniteDistance { row: first }.into());
    }
    if self_dist.abs() > tol {
        return Err(DbscanError::UnsupportedMetric(format!(
            "distance of observation {} to itself is {}",
            first, self_dist
        )));
    }

    if first == last {
        return Ok(());
    }
    let (ab, ba) = (
        dist_fn.distance(a.view(), b.view()),
        dist_fn.distance(b.view(), a.view()),
    );
    if !ab.is_finite() || !ba.is_finite() {
        return Err(InputError::NonFiniteDistance { row: first }.into());
    }
    if ab < -tol {
        return Err(DbscanError::UnsupportedMetric(format!(
            "negative distance {} between observations {} and {}",
            ab, first, last
        )));
    }
    if (ab - ba).abs() > tol * F::one().max(ab.abs()) {
        return Err(DbscanError::UnsupportedMetric(format!(
            "asymmetric distance between observations {} and {}: {} and {}",
            first, last, ab, ba
        )));
    }
    Ok(())
}

/// Clusters `points` with DBSCAN and returns one label per point, `-1` marking noise
///
/// `eps` is the neighborhood radius (inclusive) and `min_samples` the neighborhood size, the
/// point itself included, from which a point is a core point. Neighborhoods are found with an
/// exact linear scan, so any [`Distance`] works as `metric`.
///
/// ```rust
/// use densa_clustering::cluster;
/// use densa_nn::distance::L1Dist;
/// use ndarray::array;
///
/// let points = array![[0.0, 0.0], [0.5, 0.0], [0.0, 0.5], [10.0, 10.0]];
/// let labels = cluster(&points, 0.6, 2, L1Dist).unwrap();
/// assert_eq!(labels, array![0, 0, 0, -1]);
/// ```
pub fn cluster<F: Float, DT: Data<Elem = F>, D: Distance<F>>(
    points: &ArrayBase<DT, Ix2>,
    eps: F,
    min_samples: usize,
    metric: D,
) -> Result<Array1<isize>, DbscanError> {
    let labels = Dbscan::params_with(min_samples, metric, CommonNearestNeighbour::LinearSearch)
        .tolerance(eps)
        .transform(points)?;
    Ok(labels.to_signed())
}

/// Like [`cluster`], with the metric selected by name, e.g. `"euclidean"` or `"manhattan"`
///
/// Unknown names are rejected with `DbscanError::UnsupportedMetric`.
pub fn cluster_with_metric_name<F: Float, DT: Data<Elem = F>>(
    points: &ArrayBase<DT, Ix2>,
    eps: F,
    min_samples: usize,
    metric: &str,
) -> Result<Array1<isize>, DbscanError> {
    Dbscan::params::<F>(min_samples).tolerance(eps).check()?;
    let metric: CommonDistance<F> = metric.parse()?;
    cluster(points, eps, min_samples, metric)
}

/// Like [`cluster`], for row-wise records which may not all have the same length
pub fn cluster_records<F: Float, R: AsRef<[F]>, D: Distance<F>>(
    records: &[R],
    eps: F,
    min_samples: usize,
    metric: D,
) -> Result<Array1<isize>, DbscanError> {
    Dbscan::params::<F>(min_samples).tolerance(eps).check()?;
    let points = rows_to_matrix(records)?;
    cluster(&points, eps, min_samples, metric)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbscan::DbscanParamsError;
    use densa_nn::distance::FnDist;
    use ndarray::{arr1, arr2, s, Array2, ArrayView1};

    #[test]
    fn nested_clusters() {
        // Create a circuit of points and then a cluster in the centre
        // and ensure they are identified as two separate clusters
        let mut data: Array2<f64> = Array2::zeros((50, 2));
        let rising = Array1::linspace(0.0, 8.0, 10);
        data.column_mut(0).slice_mut(s![0..10]).assign(&rising);
        data.column_mut(0).slice_mut(s![10..20]).assign(&rising);
        data.column_mut(1).slice_mut(s![20..30]).assign(&rising);
        data.column_mut(1).slice_mut(s![30..40]).assign(&rising);

        data.column_mut(1).slice_mut(s![0..10]).fill(0.0);
        data.column_mut(1).slice_mut(s![10..20]).fill(8.0);
        data.column_mut(0).slice_mut(s![20..30]).fill(0.0);
        data.column_mut(0).slice_mut(s![30..40]).fill(8.0);

        data.column_mut(0).slice_mut(s![40..]).fill(5.0);
        data.column_mut(1).slice_mut(s![40..]).fill(5.0);

        let labels = Dbscan::params(2).tolerance(1.0).transform(&data).unwrap();

        assert!(labels.slice(s![..40]).iter().all(|x| x == &Some(0)));
        assert!(labels.slice(s![40..]).iter().all(|x| x == &Some(1)));
    }

    #[test]
    fn non_cluster_points() {
        let mut data: Array2<f64> = Array2::zeros((5, 2));
        data.row_mut(0).assign(&arr1(&[10.0, 10.0]));

        let labels = Dbscan::params(4).transform(&data).unwrap();

        let expected = arr1(&[None, Some(0), Some(0), Some(0), Some(0)]);
        assert_eq!(labels, expected);
    }

    #[test]
    fn border_points() {
        let data: Array2<f64> = arr2(&[
            // Outlier
            [0.0, 2.0],
            // Core point
            [0.0, 0.0],
            // Border points
            [0.0, 1.0],
            [0.0, -1.0],
            [-1.0, 0.0],
            [1.0, 0.0],
        ]);

        let labels = Dbscan::params(5).tolerance(1.1).transform(&data).unwrap();

        assert_eq!(labels[0], None);
        for id in labels.slice(s![1..]).iter() {
            assert_eq!(id, &Some(0));
        }
    }

    #[test]
    fn dataset_too_small() {
        let data: Array2<f64> = Array2::zeros((3, 2));

        let labels = Dbscan::params(4).transform(&data).unwrap();
        assert!(labels.iter().all(|x| x.is_none()));
    }

    #[test]
    fn empty_dataset() {
        let data: Array2<f64> = Array2::zeros((0, 0));
        let labels = Dbscan::params(2).transform(&data).unwrap();
        assert!(labels.is_empty());
    }

    #[test]
    fn invalid_parameters_fail_before_input_checks() {
        let data = arr2(&[[f64::NAN, 0.0]]);
        assert_eq!(
            Dbscan::params(0).transform(&data),
            Err(DbscanError::InvalidParameter(DbscanParamsError::MinPoints))
        );
        assert_eq!(
            Dbscan::params(2).tolerance(-1.0).transform(&data),
            Err(DbscanError::InvalidParameter(DbscanParamsError::Tolerance))
        );
    }

    #[test]
    fn rejects_non_finite_values() {
        let data = arr2(&[[0.0, 0.0], [1.0, f64::INFINITY], [2.0, 2.0]]);
        assert_eq!(
            Dbscan::params(2).transform(&data),
            Err(DbscanError::Input(InputError::NonFinite { row: 1, col: 1 }))
        );
    }

    #[test]
    fn rejects_zero_features() {
        let data: Array2<f64> = Array2::zeros((3, 0));
        assert_eq!(
            Dbscan::params(2).transform(&data),
            Err(DbscanError::Input(InputError::ZeroDimension))
        );
    }

    #[test]
    fn rejects_asymmetric_metric() {
        let data = arr2(&[[0.0], [1.0], [3.0]]);
        let directed = FnDist::new(|a: ArrayView1<f64>, b: ArrayView1<f64>| {
            (b[0] - a[0]).max(0.0) * 2.0 + (a[0] - b[0]).max(0.0)
        });
        let res = Dbscan::params_with(2, directed, CommonNearestNeighbour::LinearSearch)
            .tolerance(1.0)
            .transform(&data);
        assert!(matches!(res, Err(DbscanError::UnsupportedMetric(_))));
    }

    #[test]
    fn rejects_non_zero_self_distance() {
        let data = arr2(&[[0.0], [1.0]]);
        let shifted = FnDist::new(|a: ArrayView1<f64>, b: ArrayView1<f64>| (a[0] - b[0]).abs() + 1.0);
        let res = cluster(&data, 2.0, 1, shifted);
        assert!(matches!(res, Err(DbscanError::UnsupportedMetric(_))));
    }

    #[test]
    fn metric_by_name() {
        let data = arr2(&[[0.0, 0.0], [0.6, 0.6], [5.0, 5.0]]);

        // the pair is 1.2 apart in L1 and ~0.85 in L2
        let l2 = cluster_with_metric_name(&data, 1.0, 2, "euclidean").unwrap();
        assert_eq!(l2, arr1(&[0, 0, -1]));
        let l1 = cluster_with_metric_name(&data, 1.0, 2, "manhattan").unwrap();
        assert_eq!(l1, arr1(&[-1, -1, -1]));

        assert_eq!(
            cluster_with_metric_name(&data, 1.0, 2, "hamming"),
            Err(DbscanError::UnsupportedMetric("hamming".to_string()))
        );
        assert_eq!(
            cluster_with_metric_name(&data, 0.0, 2, "hamming"),
            Err(DbscanError::InvalidParameter(DbscanParamsError::Tolerance))
        );
    }

    #[test]
    fn ragged_records() {
        let records = vec![vec![0.0, 0.0], vec![1.0], vec![2.0, 2.0]];
        let res = cluster_records(&records, 1.0, 2, L2Dist);
        assert_eq!(
            res,
            Err(DbscanError::Input(InputError::Records(
                densa::Error::RaggedRecords {
                    row: 1,
                    expected: 2,
                    found: 1
                }
            )))
        );

        let records = vec![vec![0.0, 0.0], vec![0.5, 0.0], vec![9.0, 9.0]];
        assert_eq!(
            cluster_records(&records, 1.0, 2, L2Dist).unwrap(),
            arr1(&[0, 0, -1])
        );
    }

    #[test]
    fn exposes_intermediate_phases() {
        let data = arr2(&[[0.0], [1.0], [2.0], [10.0]]);
        let params = Dbscan::params(3).tolerance(1.0).check().unwrap();

        let hoods = params.neighborhoods(&data).unwrap();
        assert_eq!(hoods.of(1), &[0, 1, 2]);
        assert_eq!(hoods.of(3), &[3]);

        let core = params.core_points(&data).unwrap();
        assert_eq!(core.indices(), &[1]);
    }
}
