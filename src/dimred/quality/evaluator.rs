use ndarray::ArrayView2;

use super::global::{rmse_from_distances, stress_from_distances};
use super::neighbourhood::{
    neighbourhood_loss_from_neighbourhoods, trustworthiness_from_neighbourhoods,
    warn_outside_unit_interval, Neighbourhoods,
};
use super::QualityError;
use crate::distance::pairwise_distances;
use crate::utils::{check_neighbourhood_size, check_point_cloud, check_same_rows};
use crate::FloatOps;

/// How trustworthiness and continuity values outside `[0, 1]` are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangePolicy {
    /// Report the closed-form value as is and log a warning.
    #[default]
    PassThrough,
    /// Clamp into `[0, 1]`.
    Clamp,
    /// Fail with [`QualityError::OutOfRange`].
    Error,
}

/// All quality measures of one embedding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityReport {
    /// `None` if every latent distance is zero.
    pub stress: Option<f64>,
    pub rmse: f64,
    pub trustworthiness: f64,
    pub continuity: f64,
    pub neighbourhood_loss: f64,
    /// Neighbourhood size used for the neighbour-rank measures.
    pub k: usize,
}

pub struct QualityEvaluatorBuilder {
    k: usize,
    range_policy: RangePolicy,
}

impl QualityEvaluatorBuilder {
    pub fn new() -> Self {
        QualityEvaluatorBuilder {
            k: 5,
            range_policy: RangePolicy::default(),
        }
    }

    pub fn k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn range_policy(mut self, range_policy: RangePolicy) -> Self {
        self.range_policy = range_policy;
        self
    }

    pub fn build(self) -> QualityEvaluator {
        QualityEvaluator {
            k: self.k,
            range_policy: self.range_policy,
        }
    }
}

impl Default for QualityEvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Computes every quality measure of an embedding in one pass, sharing the
/// distance matrices and neighbourhoods between them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityEvaluator {
    k: usize,
    range_policy: RangePolicy,
}

impl Default for QualityEvaluator {
    fn default() -> Self {
        QualityEvaluatorBuilder::new().build()
    }
}

impl QualityEvaluator {
    pub fn k(&self) -> usize {
        self.k
    }

    pub fn range_policy(&self) -> RangePolicy {
        self.range_policy
    }

    /// Evaluates the latent space `z` against the data space `x`.
    pub fn evaluate<T: FloatOps>(
        &self,
        x: ArrayView2<T>,
        z: ArrayView2<T>,
    ) -> anyhow::Result<QualityReport> {
        check_same_rows(x, z)?;
        check_point_cloud(x)?;
        check_point_cloud(z)?;
        check_neighbourhood_size(self.k, x.nrows())?;

        log::debug!(
            "Evaluating embedding: n = {}, data dim = {}, latent dim = {}, k = {}",
            x.nrows(),
            x.ncols(),
            z.ncols(),
            self.k
        );

        let d_x = pairwise_distances(x);
        let d_z = pairwise_distances(z);

        let stress = match stress_from_distances(d_x.view(), d_z.view()) {
            Ok(value) => Some(value),
            Err(err) if err.downcast_ref::<QualityError>() == Some(&QualityError::ZeroLatentDistances) => {
                log::warn!("Stress undefined: {}", err);
                None
            }
            Err(err) => return Err(err),
        };
        let rmse = rmse_from_distances(d_x.view(), d_z.view())?;

        let data = Neighbourhoods::from_distances(d_x.view(), self.k)?;
        let latent = Neighbourhoods::from_distances(d_z.view(), self.k)?;

        let trustworthiness =
            self.apply_range_policy("trustworthiness", trustworthiness_from_neighbourhoods(&data, &latent)?)?;
        let continuity =
            self.apply_range_policy("continuity", trustworthiness_from_neighbourhoods(&latent, &data)?)?;
        let neighbourhood_loss = neighbourhood_loss_from_neighbourhoods(&data, &latent);

        let report = QualityReport {
            stress,
            rmse,
            trustworthiness,
            continuity,
            neighbourhood_loss,
            k: self.k,
        };
        log::debug!("{:?}", report);

        Ok(report)
    }

    fn apply_range_policy(&self, measure: &'static str, value: f64) -> anyhow::Result<f64> {
        match self.range_policy {
            RangePolicy::PassThrough => {
                warn_outside_unit_interval(measure, value);
                Ok(value)
            }
            RangePolicy::Clamp => Ok(value.clamp(0.0, 1.0)),
            RangePolicy::Error => {
                if (0.0..=1.0).contains(&value) {
                    Ok(value)
                } else {
                    Err(QualityError::OutOfRange { measure, value }.into())
                }
            }
        }
    }
}
