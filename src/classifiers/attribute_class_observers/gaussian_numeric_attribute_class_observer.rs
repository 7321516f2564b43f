use crate::classifiers::attribute_class_observers::attribute_class_observer::AttributeClassObserver;
use crate::core::estimators::GaussianEstimator;
use serde::{Deserialize, Serialize};

/// One normal estimate per class for a numeric feature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GaussianNumericAttributeClassObserver {
    attribute_value_distribution_per_class: Vec<GaussianEstimator>,
}

impl GaussianNumericAttributeClassObserver {
    pub fn new(num_classes: usize) -> Self {
        GaussianNumericAttributeClassObserver {
            attribute_value_distribution_per_class: vec![GaussianEstimator::new(); num_classes],
        }
    }

    pub fn num_classes(&self) -> usize {
        self.attribute_value_distribution_per_class.len()
    }

    pub fn estimator(&self, class_val: usize) -> Option<&GaussianEstimator> {
        self.attribute_value_distribution_per_class.get(class_val)
    }
}

impl AttributeClassObserver for GaussianNumericAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize) {
        if let Some(est) = self.attribute_value_distribution_per_class.get_mut(class_val) {
            est.add_observation(att_val);
        }
    }

    /// A class with no numeric observations yet contributes a neutral `1`.
    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
        _laplace_smoothing: bool,
    ) -> f64 {
        match self.attribute_value_distribution_per_class.get(class_val) {
            Some(est) if est.count() > 0.0 && !att_val.is_nan() => {
                est.probability_density(att_val)
            }
            _ => 1.0,
        }
    }

    fn describe_class(&self, class_val: usize) -> String {
        self.attribute_value_distribution_per_class
            .get(class_val)
            .map(|est| format!("{},{},{}", est.count(), est.sum(), est.sum_of_squares()))
            .unwrap_or_default()
    }
}
