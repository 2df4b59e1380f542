pub mod dimred;
pub mod distance;
mod utils;

pub use utils::FloatOps;
