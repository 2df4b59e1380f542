//! Global distance-preservation measures (stress and RMSE).

use ndarray::ArrayView2;

use super::QualityError;
use crate::distance::pairwise_distances;
use crate::utils::{check_point_cloud, check_same_rows, to_f64};
use crate::FloatOps;

/// Relative distortion between the distance matrices of the data space `x`
/// and the latent space `z`:
///
/// `sqrt(sum((D_X - D_Z)^2) / sum(D_Z^2))`
///
/// # Errors
/// - [`QualityError::RowCountMismatch`] if `x` and `z` differ in row count
/// - [`QualityError::EmptyPointCloud`] / [`QualityError::NonFiniteInput`] on invalid input
/// - [`QualityError::ZeroLatentDistances`] if every latent distance is zero
/// - [`QualityError::DistanceOverflow`] if the distances exceed the float range
pub fn stress<T: FloatOps>(x: ArrayView2<T>, z: ArrayView2<T>) -> anyhow::Result<f64> {
    check_same_rows(x, z)?;
    check_point_cloud(x)?;
    check_point_cloud(z)?;

    let d_x = pairwise_distances(x);
    let d_z = pairwise_distances(z);
    stress_from_distances(d_x.view(), d_z.view())
}

/// Root mean squared difference between the distance matrices of `x` and `z`:
///
/// `sqrt(sum((D_X - D_Z)^2) / n^2)`
pub fn rmse<T: FloatOps>(x: ArrayView2<T>, z: ArrayView2<T>) -> anyhow::Result<f64> {
    check_same_rows(x, z)?;
    check_point_cloud(x)?;
    check_point_cloud(z)?;

    let d_x = pairwise_distances(x);
    let d_z = pairwise_distances(z);
    rmse_from_distances(d_x.view(), d_z.view())
}

pub(crate) fn stress_from_distances<T: FloatOps>(
    d_x: ArrayView2<T>,
    d_z: ArrayView2<T>,
) -> anyhow::Result<f64> {
    let (sum_of_squared_differences, sum_of_squares) = squared_distance_sums(d_x, d_z)?;

    if sum_of_squares == 0.0 {
        return Err(QualityError::ZeroLatentDistances.into());
    }

    Ok((sum_of_squared_differences / sum_of_squares).sqrt())
}

pub(crate) fn rmse_from_distances<T: FloatOps>(
    d_x: ArrayView2<T>,
    d_z: ArrayView2<T>,
) -> anyhow::Result<f64> {
    let n = d_x.nrows();
    if n == 0 {
        return Err(QualityError::EmptyPointCloud.into());
    }

    let (sum_of_squared_differences, _) = squared_distance_sums(d_x, d_z)?;
    let n = n as f64;
    Ok((sum_of_squared_differences / (n * n)).sqrt())
}

/// Returns `(sum((D_X - D_Z)^2), sum(D_Z^2))`, accumulated in `f64`.
///
/// Fails with [`QualityError::DistanceOverflow`] if a distance or either sum
/// is not finite.
fn squared_distance_sums<T: FloatOps>(
    d_x: ArrayView2<T>,
    d_z: ArrayView2<T>,
) -> anyhow::Result<(f64, f64)> {
    let mut sum_of_squared_differences = 0.0f64;
    let mut sum_of_squares = 0.0f64;

    for (&p, &q) in d_x.iter().zip(d_z.iter()) {
        let (p, q) = (to_f64(p)?, to_f64(q)?);
        if !p.is_finite() || !q.is_finite() {
            return Err(QualityError::DistanceOverflow.into());
        }
        sum_of_squared_differences += (p - q) * (p - q);
        sum_of_squares += q * q;
    }

    if !sum_of_squared_differences.is_finite() || !sum_of_squares.is_finite() {
        return Err(QualityError::DistanceOverflow.into());
    }
    Ok((sum_of_squared_differences, sum_of_squares))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::{array, Array2};

    #[test]
    fn test_identical_spaces_have_zero_distortion() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [5.0, 5.0]];

        assert_eq!(stress(x.view(), x.view()).unwrap(), 0.0);
        assert_eq!(rmse(x.view(), x.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_isometry_has_zero_distortion() {
        let x = array![[0.0, 0.0], [1.0, 0.0], [2.0, 0.0]];
        let z = array![[0.0, 0.0], [0.0, 1.0], [0.0, 2.0]];

        assert_abs_diff_eq!(stress(x.view(), z.view()).unwrap(), 0.0);
        assert_abs_diff_eq!(rmse(x.view(), z.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_differing_dimensionality() {
        // Same pairwise distances, embedded in 3 and 1 dimensions
        let x = array![[0.0, 0.0, 0.0], [0.0, 3.0, 4.0]];
        let z = array![[1.0], [6.0]];

        assert_abs_diff_eq!(stress(x.view(), z.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_scaled_embedding() {
        // D_X = 2 * D_Z, so sum((D_X - D_Z)^2) = sum(D_Z^2)
        let x = array![[0.0, 0.0], [2.0, 0.0], [0.0, 2.0]];
        let z = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0]];

        assert_relative_eq!(stress(x.view(), z.view()).unwrap(), 1.0);

        // D_Z entries: 1, 1, sqrt(2), each twice
        let expected_sum = 2.0 * (1.0 + 1.0 + 2.0);
        assert_relative_eq!(
            rmse(x.view(), z.view()).unwrap(),
            (expected_sum / 9.0f64).sqrt()
        );
    }

    #[test]
    fn test_stress_zero_latent_distances() {
        let x = array![[0.0, 0.0], [1.0, 1.0]];
        let z = array![[3.0], [3.0]];

        let err = stress(x.view(), z.view()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<QualityError>(),
            Some(&QualityError::ZeroLatentDistances)
        );

        // RMSE stays defined
        assert_relative_eq!(rmse(x.view(), z.view()).unwrap(), (4.0f64 / 4.0).sqrt());
    }

    #[test]
    fn test_row_count_mismatch() {
        let x = array![[0.0, 0.0], [1.0, 1.0]];
        let z = array![[0.0], [1.0], [2.0]];

        for err in [
            stress(x.view(), z.view()).unwrap_err(),
            rmse(x.view(), z.view()).unwrap_err(),
        ] {
            assert_eq!(
                err.downcast_ref::<QualityError>(),
                Some(&QualityError::RowCountMismatch { data: 2, latent: 3 })
            );
        }
    }

    #[test]
    fn test_overflowing_distances_f32() {
        // 3e20 squared exceeds f32::MAX, so the data distance is infinite
        let x = array![[0.0f32, 0.0], [3e20, 0.0]];
        let z = array![[0.0f32], [2e20]];

        for err in [
            stress(x.view(), z.view()).unwrap_err(),
            rmse(x.view(), z.view()).unwrap_err(),
        ] {
            assert_eq!(
                err.downcast_ref::<QualityError>(),
                Some(&QualityError::DistanceOverflow)
            );
        }
    }

    #[test]
    fn test_large_f32_distances_accumulate_in_f64() {
        // Each squared latent distance fits in f32, their sum does not
        let x = array![[0.0f32], [7.5e18]];
        let z = array![[0.0f32], [1.5e19]];

        assert_relative_eq!(stress(x.view(), z.view()).unwrap(), 0.5);
        assert_relative_eq!(
            rmse(x.view(), z.view()).unwrap(),
            7.5e18 * 0.5f64.sqrt(),
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_overflowing_sums_f64() {
        // Finite f64 distances whose squares overflow
        let x = array![[0.0], [1e160]];
        let z = array![[0.0], [3e160]];

        let err = stress(x.view(), z.view()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<QualityError>(),
            Some(&QualityError::DistanceOverflow)
        );
    }

    #[test]
    fn test_rmse_single_point() {
        let x = array![[1.0, 2.0]];
        let z = array![[4.0]];
        assert_eq!(rmse(x.view(), z.view()).unwrap(), 0.0);
    }

    #[test]
    fn test_rmse_empty() {
        let x = Array2::<f64>::zeros((0, 2));
        let err = rmse(x.view(), x.view()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<QualityError>(),
            Some(&QualityError::EmptyPointCloud)
        );
    }
}
