//! # Embedding Quality Measures
//!
//! Measures how faithfully a low-dimensional embedding (latent space `Z`)
//! represents the original data (data space `X`). Both point clouds share
//! the number of rows but may differ in dimensionality.
//!
//! ## Global measures
//! - [`stress`]: relative distortion of all pairwise distances
//! - [`rmse`]: root mean squared difference of all pairwise distances
//!
//! ## Neighbour-rank measures
//! - [`trustworthiness`]: penalises false neighbours introduced by the embedding
//! - [`continuity`]: penalises true neighbours lost by the embedding
//! - [`neighbourhood_loss`]: average fraction of k-neighbourhoods not preserved
//!
//! [`QualityEvaluator`] computes all of them at once and decides how
//! trustworthiness and continuity values outside `[0, 1]` are handled.

mod error;
mod evaluator;
mod global;
mod neighbourhood;

pub use error::QualityError;
pub use evaluator::{QualityEvaluator, QualityEvaluatorBuilder, QualityReport, RangePolicy};
pub use global::{rmse, stress};
pub use neighbourhood::{
    continuity, neighbourhood_loss, neighbours_and_ranks, trustworthiness, Neighbourhoods,
};
