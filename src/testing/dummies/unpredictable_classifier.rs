use crate::classifiers::{Classifier, ClassifierType, OnlineClassifier};
use crate::core::errors::{MlError, Result};
use crate::core::{Instance, Signature, Value};

/// Accepts every update but never has a prediction.
pub struct UnpredictableClassifier {
    signature: Signature,
}

impl UnpredictableClassifier {
    pub fn new(signature: Signature) -> Self {
        Self { signature }
    }
}

impl Classifier for UnpredictableClassifier {
    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::ZeroR
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn train(&mut self, _instances: &[Instance]) -> Result<()> {
        Ok(())
    }

    fn classify(&self, _instance: &Instance) -> Result<Value> {
        Err(MlError::invalid_state("no prediction available"))
    }

    fn is_trained(&self) -> bool {
        false
    }

    fn classifier_info(&self) -> String {
        String::new()
    }
}

impl OnlineClassifier for UnpredictableClassifier {
    fn update(&self, _instance: &Instance) -> Result<()> {
        Ok(())
    }
}
