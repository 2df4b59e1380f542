//! Neighbour-rank based measures: trustworthiness, continuity and
//! neighbourhood loss.

use std::cmp::Ordering;

use ndarray::{Array2, ArrayView1, ArrayView2};
use rayon::prelude::*;

use super::QualityError;
use crate::distance::pairwise_distances;
use crate::utils::{check_neighbourhood_size, check_point_cloud, check_same_rows};
use crate::FloatOps;

/// k-neighbourhoods and full rank matrix of a point cloud.
///
/// - `neighbours` (n×k): row `i` holds the `k` nearest other points of `i`,
///   closest first. A point never appears in its own neighbourhood.
/// - `ranks` (n×n): entry `(i, j)` is the position of `j` in the distance
///   ordering of `i`, so every row is a permutation of `0..n` with `0` on the
///   diagonal.
///
/// Ties in distance are broken by ascending point index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Neighbourhoods {
    neighbours: Array2<usize>,
    ranks: Array2<usize>,
    k: usize,
}

impl Neighbourhoods {
    /// Builds neighbourhoods and ranks from a precomputed n×n distance matrix.
    ///
    /// # Errors
    /// - [`QualityError::NonSquareDistances`] if the matrix is not n×n
    /// - [`QualityError::InvalidNeighbourhoodSize`] unless `1 <= k <= n - 1`
    /// - [`QualityError::InvalidDistance`] for a NaN, infinite or negative entry
    pub fn from_distances<T: FloatOps>(distances: ArrayView2<T>, k: usize) -> anyhow::Result<Self> {
        let (rows, cols) = distances.dim();
        if rows != cols {
            return Err(QualityError::NonSquareDistances { rows, cols }.into());
        }
        let n = rows;
        check_neighbourhood_size(k, n)?;

        if let Some(((row, col), _)) = distances
            .indexed_iter()
            .find(|(_, d)| !d.is_finite() || **d < T::zero())
        {
            return Err(QualityError::InvalidDistance { row, col }.into());
        }

        let orderings: Vec<Vec<usize>> = (0..n)
            .into_par_iter()
            .map(|i| distance_ordering(distances.row(i), i))
            .collect();

        let mut neighbours = Array2::<usize>::zeros((n, k));
        let mut ranks = Array2::<usize>::zeros((n, n));

        for (i, ordering) in orderings.iter().enumerate() {
            for (position, &j) in ordering.iter().enumerate() {
                ranks[[i, j]] = position;
            }
            for (slot, &j) in ordering[1..=k].iter().enumerate() {
                neighbours[[i, slot]] = j;
            }
        }

        Ok(Self {
            neighbours,
            ranks,
            k,
        })
    }

    pub fn neighbours(&self) -> &Array2<usize> {
        &self.neighbours
    }

    pub fn ranks(&self) -> &Array2<usize> {
        &self.ranks
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Number of points.
    pub fn n(&self) -> usize {
        self.ranks.nrows()
    }

    pub fn into_parts(self) -> (Array2<usize>, Array2<usize>) {
        (self.neighbours, self.ranks)
    }
}

// Point `i` is pinned to the front; all other indices follow in a stable
// ascending sort by distance.
fn distance_ordering<T: FloatOps>(row: ArrayView1<T>, i: usize) -> Vec<usize> {
    let mut ordering: Vec<usize> = Vec::with_capacity(row.len());
    ordering.push(i);
    ordering.extend((0..row.len()).filter(|&j| j != i));
    ordering[1..].sort_by(|&a, &b| compare_distances(row[a], row[b]));
    ordering
}

// Total order on distances: NaN compares equal to NaN and greater than any number.
fn compare_distances<T: FloatOps>(a: T, b: T) -> Ordering {
    a.partial_cmp(&b)
        .unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

/// Computes the k-neighbourhoods and the rank matrix of the point cloud `x`.
///
/// # Errors
/// - [`QualityError::InvalidNeighbourhoodSize`] unless `1 <= k <= n - 1`
/// - [`QualityError::EmptyPointCloud`] / [`QualityError::NonFiniteInput`] on invalid input
/// - [`QualityError::DistanceOverflow`] if the distances exceed the float range
pub fn neighbours_and_ranks<T: FloatOps>(x: ArrayView2<T>, k: usize) -> anyhow::Result<Neighbourhoods> {
    check_point_cloud(x)?;
    check_neighbourhood_size(k, x.nrows())?;

    let distances = pairwise_distances(x);
    if distances.iter().any(|d| !d.is_finite()) {
        return Err(QualityError::DistanceOverflow.into());
    }
    Neighbourhoods::from_distances(distances.view(), k)
}

/// Trustworthiness of the latent space `z` with respect to the data space `x`.
///
/// Penalises points that enter the k-neighbourhood of a point in `z` without
/// being in its k-neighbourhood in `x`, weighted by how far outside the
/// original neighbourhood they rank:
///
/// `1 - 2 / (n k (2n - 3k - 1)) * sum_i sum_{j in N_Z(i) \ N_X(i)} (r_X(i, j) - k)`
///
/// For small `n` relative to `k` the closed-form normalisation can push the
/// value outside `[0, 1]`. Such values are returned unchanged and logged at
/// warn level; use [`super::QualityEvaluator`] to clamp or reject them.
///
/// # Errors
/// - [`QualityError::RowCountMismatch`] if `x` and `z` differ in row count
/// - [`QualityError::InvalidNeighbourhoodSize`] unless `1 <= k <= n - 1`
/// - [`QualityError::DegenerateNormalisation`] if `2n - 3k - 1 == 0`
pub fn trustworthiness<T: FloatOps>(
    x: ArrayView2<T>,
    z: ArrayView2<T>,
    k: usize,
) -> anyhow::Result<f64> {
    let (data, latent) = paired_neighbourhoods(x, z, k)?;
    let value = trustworthiness_from_neighbourhoods(&data, &latent)?;
    warn_outside_unit_interval("trustworthiness", value);
    Ok(value)
}

/// Continuity of the latent space `z` with respect to the data space `x`.
///
/// The mirror image of [`trustworthiness`]: points that leave a
/// neighbourhood when moving from `x` to `z`.
pub fn continuity<T: FloatOps>(x: ArrayView2<T>, z: ArrayView2<T>, k: usize) -> anyhow::Result<f64> {
    trustworthiness(z, x, k)
}

/// Average fraction of each point's k-neighbourhood in `x` that is lost in `z`.
///
/// `0` means all neighbourhoods are preserved, `1` means no overlap at all.
pub fn neighbourhood_loss<T: FloatOps>(
    x: ArrayView2<T>,
    z: ArrayView2<T>,
    k: usize,
) -> anyhow::Result<f64> {
    let (data, latent) = paired_neighbourhoods(x, z, k)?;
    Ok(neighbourhood_loss_from_neighbourhoods(&data, &latent))
}

fn paired_neighbourhoods<T: FloatOps>(
    x: ArrayView2<T>,
    z: ArrayView2<T>,
    k: usize,
) -> anyhow::Result<(Neighbourhoods, Neighbourhoods)> {
    check_same_rows(x, z)?;
    Ok((neighbours_and_ranks(x, k)?, neighbours_and_ranks(z, k)?))
}

pub(crate) fn trustworthiness_from_neighbourhoods(
    data: &Neighbourhoods,
    latent: &Neighbourhoods,
) -> anyhow::Result<f64> {
    let n = data.n();
    let k = data.k();
    debug_assert_eq!(n, latent.n());
    debug_assert_eq!(k, latent.k());

    let normaliser = 2 * n as i64 - 3 * k as i64 - 1;
    if normaliser == 0 {
        return Err(QualityError::DegenerateNormalisation { n, k }.into());
    }

    // Intruders rank at k + 1 or later in the data space, so `rank - k` never underflows.
    let penalty: usize = (0..n)
        .into_par_iter()
        .map(|i| {
            let original = data.neighbours.row(i);
            latent
                .neighbours
                .row(i)
                .iter()
                .filter(|&&j| !original.iter().any(|&m| m == j))
                .map(|&j| data.ranks[[i, j]] - k)
                .sum::<usize>()
        })
        .sum();

    let scale = 2.0 / (n as f64 * k as f64 * normaliser as f64);
    Ok(1.0 - scale * penalty as f64)
}

pub(crate) fn neighbourhood_loss_from_neighbourhoods(
    data: &Neighbourhoods,
    latent: &Neighbourhoods,
) -> f64 {
    let n = data.n();
    let k = data.k();

    let shared: usize = (0..n)
        .into_par_iter()
        .map(|i| {
            let original = data.neighbours.row(i);
            latent
                .neighbours
                .row(i)
                .iter()
                .filter(|&&j| original.iter().any(|&m| m == j))
                .count()
        })
        .sum();

    1.0 - (shared as f64 / k as f64) / n as f64
}

pub(crate) fn warn_outside_unit_interval(measure: &str, value: f64) {
    if !(0.0..=1.0).contains(&value) {
        log::warn!(
            "{} = {} lies outside [0, 1]; n is small relative to k",
            measure,
            value
        );
    }
}
