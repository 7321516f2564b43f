use crate::classifiers::attribute_class_observers::AttributeClassObserver;
use serde::{Deserialize, Serialize};

/// Stands in for the class slot: observes nothing, contributes a neutral factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NullAttributeClassObserver {}

impl NullAttributeClassObserver {
    pub fn new() -> Self {
        NullAttributeClassObserver {}
    }
}

impl AttributeClassObserver for NullAttributeClassObserver {
    fn observe_attribute_class(&mut self, _att_val: f64, _class_val: usize) {}

    fn probability_of_attribute_value_given_class(
        &self,
        _att_val: f64,
        _class_val: usize,
        _laplace_smoothing: bool,
    ) -> f64 {
        1.0
    }

    fn describe_class(&self, _class_val: usize) -> String {
        String::new()
    }
}
