use std::fmt::Debug;
use std::iter::Sum;

use ndarray::ArrayView2;
use num_traits::{Float, FromPrimitive, ToPrimitive};

use crate::dimred::quality::QualityError;

/// Float types the measures can be computed over (`f32`, `f64`).
pub trait FloatOps:
    Float + FromPrimitive + ToPrimitive + Sum + Send + Sync + Debug + 'static
{
}

impl<T> FloatOps for T where
    T: Float + FromPrimitive + ToPrimitive + Sum + Send + Sync + Debug + 'static
{
}

pub(crate) fn to_f64<T: FloatOps>(value: T) -> anyhow::Result<f64> {
    value
        .to_f64()
        .ok_or_else(|| anyhow::anyhow!("Numeric conversion to f64 failed for {:?}", value))
}

pub(crate) fn check_point_cloud<T: FloatOps>(x: ArrayView2<T>) -> anyhow::Result<()> {
    if x.nrows() == 0 {
        return Err(QualityError::EmptyPointCloud.into());
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(QualityError::NonFiniteInput.into());
    }
    Ok(())
}

pub(crate) fn check_same_rows<T: FloatOps, U: FloatOps>(
    x: ArrayView2<T>,
    z: ArrayView2<U>,
) -> anyhow::Result<()> {
    if x.nrows() != z.nrows() {
        return Err(QualityError::RowCountMismatch {
            data: x.nrows(),
            latent: z.nrows(),
        }
        .into());
    }
    Ok(())
}

pub(crate) fn check_neighbourhood_size(k: usize, n: usize) -> anyhow::Result<()> {
    if k == 0 || k >= n {
        return Err(QualityError::InvalidNeighbourhoodSize { k, n }.into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_check_point_cloud() {
        let x = array![[0.0, 1.0], [2.0, 3.0]];
        assert!(check_point_cloud(x.view()).is_ok());

        let empty = Array2::<f64>::zeros((0, 2));
        let err = check_point_cloud(empty.view()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<QualityError>(),
            Some(&QualityError::EmptyPointCloud)
        );

        let nan = array![[0.0, f64::NAN]];
        let err = check_point_cloud(nan.view()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<QualityError>(),
            Some(&QualityError::NonFiniteInput)
        );
    }

    #[test]
    fn test_check_same_rows() {
        let x = array![[0.0, 1.0], [2.0, 3.0]];
        let z = array![[0.0f32], [1.0], [2.0]];
        let err = check_same_rows(x.view(), z.view()).unwrap_err();
        assert_eq!(
            err.downcast_ref::<QualityError>(),
            Some(&QualityError::RowCountMismatch { data: 2, latent: 3 })
        );
        assert!(check_same_rows(x.view(), x.view()).is_ok());
    }

    #[test]
    fn test_check_neighbourhood_size() {
        assert!(check_neighbourhood_size(1, 2).is_ok());
        assert!(check_neighbourhood_size(3, 4).is_ok());
        assert!(check_neighbourhood_size(0, 4).is_err());
        assert!(check_neighbourhood_size(4, 4).is_err());
        assert!(check_neighbourhood_size(1, 1).is_err());
    }
}
