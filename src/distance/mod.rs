//! # Pairwise Distances
//!
//! Dense Euclidean distance matrices between all rows of a point cloud.

use ndarray::{Array2, ArrayView2, Axis};
use rayon::prelude::*;

use crate::FloatOps;

/// Computes the n×n Euclidean distance matrix between all rows of `x`.
///
/// Each entry is `sqrt(sum((x_i - x_j)^2))`. The result is symmetric with an
/// exactly zero diagonal. Rows are filled in parallel.
pub fn pairwise_distances<T: FloatOps>(x: ArrayView2<T>) -> Array2<T> {
    let n = x.nrows();
    let mut distances = Array2::<T>::zeros((n, n));

    distances
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut row)| {
            let point_i = x.row(i);
            for (j, entry) in row.iter_mut().enumerate() {
                if i == j {
                    continue;
                }
                let squared: T = point_i
                    .iter()
                    .zip(x.row(j).iter())
                    .map(|(&a, &b)| (a - b) * (a - b))
                    .sum();
                *entry = squared.sqrt();
            }
        });

    distances
}
