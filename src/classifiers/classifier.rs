use crate::classifiers::classifier_type::ClassifierType;
use crate::core::errors::Result;
use crate::core::{Instance, Signature, Value};

/// A learner bound for life to one signature and one configuration.
///
/// Batch learners take `&mut self` in `train`, so the borrow checker rules out
/// concurrent training of the same instance.
pub trait Classifier {
    fn classifier_type(&self) -> ClassifierType;

    fn signature(&self) -> &Signature;

    fn train(&mut self, instances: &[Instance]) -> Result<()>;

    fn classify(&self, instance: &Instance) -> Result<Value>;

    fn is_trained(&self) -> bool;

    /// Human-readable dump of the learned state.
    fn classifier_info(&self) -> String;
}

/// A learner that can absorb one labelled instance at a time. Updates go
/// through `&self`; implementors serialize them behind an internal lock.
pub trait OnlineClassifier: Classifier {
    fn update(&self, instance: &Instance) -> Result<()>;

    /// Applies `update` to each instance in turn. An error stops the batch;
    /// instances before it stay applied.
    fn update_batch(&self, instances: &[Instance]) -> Result<()> {
        for instance in instances {
            self.update(instance)?;
        }
        Ok(())
    }
}
