use crate::classifiers::{Classifier, ClassifierType, OnlineClassifier};
use crate::core::errors::{MlError, Result};
use crate::core::{Instance, Signature, Value};
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

pub struct TrainSpyHandle(Arc<AtomicU64>);

impl TrainSpyHandle {
    pub fn count(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Counts updates; always predicts the first class category.
pub struct TrainSpyClassifier {
    signature: Signature,
    count: Arc<AtomicU64>,
}

impl TrainSpyClassifier {
    pub fn new(signature: Signature) -> (Self, TrainSpyHandle) {
        let counter = Arc::new(AtomicU64::new(0));
        (
            Self {
                signature,
                count: counter.clone(),
            },
            TrainSpyHandle(counter),
        )
    }
}

impl Classifier for TrainSpyClassifier {
    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::ZeroR
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn train(&mut self, instances: &[Instance]) -> Result<()> {
        self.update_batch(instances)
    }

    fn classify(&self, _instance: &Instance) -> Result<Value> {
        self.signature
            .nominal_class_feature()?
            .category_of_index(0)
            .map(Value::nominal)
            .ok_or_else(|| MlError::invalid_state("no class categories"))
    }

    fn is_trained(&self) -> bool {
        self.count.load(Ordering::Relaxed) > 0
    }

    fn classifier_info(&self) -> String {
        format!("spy ({} updates)", self.count.load(Ordering::Relaxed))
    }
}

impl OnlineClassifier for TrainSpyClassifier {
    fn update(&self, _instance: &Instance) -> Result<()> {
        self.count.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
