use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use densa::Float;
use ndarray::{ArrayView, Dimension, Ix1, Zip};
use ndarray_stats::DeviationExt;
#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

use crate::NnError;

/// A distance function that can be used in spatial algorithms such as nearest neighbour.
///
/// Implementations must be non-negative and symmetric. Spatial indices other than linear search
/// additionally rely on the triangle inequality, so squared Euclidean is not a valid `distance`.
pub trait Distance<F: Float>: Clone + Send + Sync {
    /// Computes the distance between two points. For most spatial algorithms to work correctly,
    /// **this metric must satisfy the Triangle Inequality.**
    ///
    /// Dimension mismatches and empty inputs yield `NaN` rather than panicking.
    fn distance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F;

    /// A faster version of the distance metric that keeps the order of the distance function.
    /// That is, `dist(a, b) > dist(c, d)` implies `rdist(a, b) > rdist(c, d)`. For most
    /// metrics this is the same as `distance`.
    fn rdistance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        self.distance(a, b)
    }

    /// Converts the result of `rdistance` to `distance`
    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist
    }

    /// Converts the result of `distance` to `rdistance`
    fn dist_to_rdist(&self, dist: F) -> F {
        dist
    }
}

/// L1 or [Manhattan](https://en.wikipedia.org/wiki/Taxicab_geometry) distance
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L1Dist;
impl<F: Float> Distance<F> for L1Dist {
    #[inline]
    fn distance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        a.l1_dist(&b).unwrap_or_else(|_| F::nan())
    }
}

/// L2 or [Euclidean](https://en.wikipedia.org/wiki/Euclidean_distance) distance
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct L2Dist;
impl<F: Float> Distance<F> for L2Dist {
    #[inline]
    fn distance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        self.rdistance(a, b).sqrt()
    }

    #[inline]
    fn rdistance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        a.sq_l2_dist(&b).unwrap_or_else(|_| F::nan())
    }

    #[inline]
    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.sqrt()
    }

    #[inline]
    fn dist_to_rdist(&self, dist: F) -> F {
        dist.powi(2)
    }
}

/// L-infinte or [Chebyshev](https://en.wikipedia.org/wiki/Chebyshev_distance) distance
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LInfDist;
impl<F: Float> Distance<F> for LInfDist {
    #[inline]
    fn distance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        a.linf_dist(&b).unwrap_or_else(|_| F::nan())
    }
}

/// L-p or [Minkowsky](https://en.wikipedia.org/wiki/Minkowski_distance) distance
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LpDist<F: Float>(pub F);
impl<F: Float> LpDist<F> {
    pub fn new(p: F) -> Self {
        LpDist(p)
    }
}
impl<F: Float> Distance<F> for LpDist<F> {
    #[inline]
    fn distance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        self.rdistance(a, b).powf(F::one() / self.0)
    }

    #[inline]
    fn rdistance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        if a.shape() != b.shape() || a.is_empty() {
            return F::nan();
        }
        Zip::from(&a)
            .and(&b)
            .fold(F::zero(), |acc, &a, &b| acc + (a - b).abs().powf(self.0))
    }

    #[inline]
    fn rdist_to_dist(&self, rdist: F) -> F {
        rdist.powf(F::one() / self.0)
    }

    #[inline]
    fn dist_to_rdist(&self, dist: F) -> F {
        dist.powf(self.0)
    }
}

/// The metrics that can be selected by name, e.g. from a command line flag
///
/// Parsing accepts the scikit-learn style identifiers `euclidean`, `manhattan`, `cityblock`,
/// `chebyshev`, `minkowski` (p = 2) and `minkowski:<p>`, as well as `l1`, `l2` and `linf`.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum CommonDistance<F> {
    /// Manhattan distance
    L1Dist,
    /// Euclidean distance
    L2Dist,
    /// Chebyshev distance
    LInfDist,
    /// Minkowski distance
    LpDist(F),
}

impl<F: Float> Distance<F> for CommonDistance<F> {
    fn distance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        match self {
            Self::L1Dist => L1Dist.distance(a, b),
            Self::L2Dist => L2Dist.distance(a, b),
            Self::LInfDist => LInfDist.distance(a, b),
            Self::LpDist(p) => LpDist(*p).distance(a, b),
        }
    }

    fn rdistance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        match self {
            Self::L1Dist => L1Dist.rdistance(a, b),
            Self::L2Dist => L2Dist.rdistance(a, b),
            Self::LInfDist => LInfDist.rdistance(a, b),
            Self::LpDist(p) => LpDist(*p).rdistance(a, b),
        }
    }

    fn rdist_to_dist(&self, rdist: F) -> F {
        match self {
            Self::L1Dist => Distance::<F>::rdist_to_dist(&L1Dist, rdist),
            Self::L2Dist => Distance::<F>::rdist_to_dist(&L2Dist, rdist),
            Self::LInfDist => Distance::<F>::rdist_to_dist(&LInfDist, rdist),
            Self::LpDist(p) => LpDist(*p).rdist_to_dist(rdist),
        }
    }

    fn dist_to_rdist(&self, dist: F) -> F {
        match self {
            Self::L1Dist => Distance::<F>::dist_to_rdist(&L1Dist, dist),
            Self::L2Dist => Distance::<F>::dist_to_rdist(&L2Dist, dist),
            Self::LInfDist => Distance::<F>::dist_to_rdist(&LInfDist, dist),
            Self::LpDist(p) => LpDist(*p).dist_to_rdist(dist),
        }
    }
}

impl<F: Float> FromStr for CommonDistance<F> {
    type Err = NnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let unsupported = || NnError::UnsupportedMetric(s.to_string());

        match name.as_str() {
            "euclidean" | "l2" => Ok(Self::L2Dist),
            "manhattan" | "cityblock" | "l1" => Ok(Self::L1Dist),
            "chebyshev" | "linf" | "infinity" => Ok(Self::LInfDist),
            "minkowski" => Ok(Self::LpDist(F::cast(2.0))),
            other => {
                let p = other
                    .strip_prefix("minkowski:")
                    .and_then(|p| p.parse::<f64>().ok())
                    .ok_or_else(unsupported)?;
                // p < 1 violates the triangle inequality
                if !p.is_finite() || p < 1.0 {
                    return Err(unsupported());
                }
                Ok(Self::LpDist(F::cast(p)))
            }
        }
    }
}

/// A user supplied metric backed by a closure
///
/// The closure is expected to be non-negative and symmetric. It is only ever evaluated on
/// one-dimensional points of equal length.
///
/// ```rust
/// use densa_nn::distance::{Distance, FnDist};
/// use ndarray::{aview1, ArrayView1};
///
/// let cosine = FnDist::new(|a: ArrayView1<f64>, b: ArrayView1<f64>| {
///     let dot = a.dot(&b);
///     1.0 - dot / (a.dot(&a).sqrt() * b.dot(&b).sqrt())
/// });
/// let d = cosine.distance(aview1(&[1.0, 0.0]), aview1(&[0.0, 1.0]));
/// assert!((d - 1.0).abs() < 1e-12);
/// ```
pub struct FnDist<F> {
    func: Arc<dyn Fn(ArrayView<F, Ix1>, ArrayView<F, Ix1>) -> F + Send + Sync>,
}

impl<F: Float> FnDist<F> {
    pub fn new(
        func: impl Fn(ArrayView<F, Ix1>, ArrayView<F, Ix1>) -> F
            + Send
            + Sync
            + 'static,
    ) -> Self {
        FnDist {
            func: Arc::new(func),
        }
    }
}

impl<F> Clone for FnDist<F> {
    fn clone(&self) -> Self {
        FnDist {
            func: Arc::clone(&self.func),
        }
    }
}

impl<F> fmt::Debug for FnDist<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FnDist(..)")
    }
}

impl<F: Float> Distance<F> for FnDist<F> {
    fn distance<D: Dimension>(&self, a: ArrayView<F, D>, b: ArrayView<F, D>) -> F {
        if a.shape() != b.shape() {
            return F::nan();
        }
        match (a.into_dimensionality::<Ix1>(), b.into_dimensionality::<Ix1>()) {
            (Ok(a), Ok(b)) => (self.func)(a, b),
            _ => F::nan(),
        }
    }
}
