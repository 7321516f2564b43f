mod holdout;
mod prequential_evaluator;

pub use holdout::{evaluate_holdout, split_holdout};
pub use prequential_evaluator::PrequentialEvaluator;
