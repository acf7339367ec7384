pub mod composite;
pub mod data;
mod dummy;
mod fill;
mod weighted_sum;

pub use dummy::Dummy;
pub use fill::{Fill, GaussianFill};
pub use weighted_sum::WeightedSum;
