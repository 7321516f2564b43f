mod unpredictable_classifier;

pub use unpredictable_classifier::UnpredictableClassifier;
