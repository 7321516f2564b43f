pub mod dummies;
pub mod fixtures;
pub mod spies;
pub mod stubs;

pub use dummies::UnpredictableClassifier;
pub use spies::{TrainSpyClassifier, TrainSpyHandle};
pub use stubs::OracleClassifier;
