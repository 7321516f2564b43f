mod arff_dataset;
mod parser;

pub use arff_dataset::ArffDataset;
