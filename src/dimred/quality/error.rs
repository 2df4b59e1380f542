use thiserror::Error;

/// Failure causes of the embedding quality measures.
///
/// Public functions return `anyhow::Result`; the concrete cause can be
/// recovered with `err.downcast_ref::<QualityError>()`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QualityError {
    #[error("point cloud has no rows")]
    EmptyPointCloud,

    #[error("row count of data space ({data}) does not match row count of latent space ({latent})")]
    RowCountMismatch { data: usize, latent: usize },

    #[error("neighbourhood size k = {k} is invalid for {n} points (expected 1 <= k <= {})", .n.saturating_sub(1))]
    InvalidNeighbourhoodSize { k: usize, n: usize },

    #[error("point cloud contains NaN or infinite coordinates")]
    NonFiniteInput,

    /// Stress is undefined when every latent distance is zero.
    #[error("all pairwise distances in the latent space are zero, stress is undefined")]
    ZeroLatentDistances,

    /// `2n - 3k - 1 == 0`, the trustworthiness normalisation divides by zero.
    #[error("trustworthiness normalisation is undefined for n = {n}, k = {k} (2n - 3k - 1 == 0)")]
    DegenerateNormalisation { n: usize, k: usize },

    #[error("{measure} = {value} lies outside [0, 1]")]
    OutOfRange { measure: &'static str, value: f64 },

    #[error("distance matrix must be square, got {rows}x{cols}")]
    NonSquareDistances { rows: usize, cols: usize },

    #[error("distance matrix entry ({row}, {col}) is NaN, infinite or negative")]
    InvalidDistance { row: usize, col: usize },

    /// Coordinates are finite but their distances exceed the float range.
    #[error("pairwise distances overflow the floating point range")]
    DistanceOverflow,
}
