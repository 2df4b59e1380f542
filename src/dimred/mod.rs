//! # Dimensionality Reduction
//!
//! Tools for assessing low-dimensional embeddings of high-dimensional data.
//!
//! ## Currently Available
//! - **Quality measures** ([`quality`]): stress, RMSE, trustworthiness, continuity
//!   and neighbourhood loss between a data space and its embedding
//!
//! ## Measure Selection Guide
//! - Use **stress** or **RMSE** when global distances should be kept
//! - Use **trustworthiness** and **continuity** for local structure, as in t-SNE or UMAP embeddings
//! - Use **neighbourhood loss** for a direct count of preserved k-neighbourhoods

pub mod quality;
