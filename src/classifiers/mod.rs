pub mod attribute_class_observers;
pub mod bayes;
pub mod classifier;
pub mod classifier_type;
pub mod clustering;
pub mod config;
pub mod id3;
pub mod model;
pub mod rules;

pub use bayes::NaiveBayes;
pub use classifier::{Classifier, OnlineClassifier};
pub use classifier_type::ClassifierType;
pub use clustering::{Centroid, DensityClustering};
pub use config::{ClassifierConfig, DensityClusteringParameters, NaiveBayesParameters};
pub use id3::{Id3, Id3Node};
pub use model::ClassifierModel;
pub use rules::ZeroR;
