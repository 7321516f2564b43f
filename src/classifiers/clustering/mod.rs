mod density_clustering;
pub mod distance;

pub use density_clustering::{Centroid, DensityClustering};
