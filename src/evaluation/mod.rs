mod evaluators;
mod snapshot;

pub use evaluators::{
    ClassificationEvaluator, PerformanceEvaluator, RegressionEvaluator, evaluator_for,
};
pub use snapshot::Snapshot;
