use crate::classifiers::{Classifier, ClassifierType, OnlineClassifier};
use crate::core::errors::Result;
use crate::core::{Instance, Signature, Value};

/// Answers with a fixed labelling rule and ignores training data.
pub struct OracleClassifier {
    signature: Signature,
    rule: fn(&Instance) -> Value,
}

impl OracleClassifier {
    pub fn new(signature: Signature, rule: fn(&Instance) -> Value) -> Self {
        Self { signature, rule }
    }
}

impl Classifier for OracleClassifier {
    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::ZeroR
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn train(&mut self, _instances: &[Instance]) -> Result<()> {
        Ok(())
    }

    fn classify(&self, instance: &Instance) -> Result<Value> {
        self.signature.ensure_compliance(instance, false)?;
        Ok((self.rule)(instance))
    }

    fn is_trained(&self) -> bool {
        true
    }

    fn classifier_info(&self) -> String {
        "oracle".into()
    }
}

impl OnlineClassifier for OracleClassifier {
    fn update(&self, instance: &Instance) -> Result<()> {
        self.signature.ensure_compliance(instance, true)
    }
}
