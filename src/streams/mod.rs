pub mod arff;

pub use arff::ArffDataset;
