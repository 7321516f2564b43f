use crate::classifiers::attribute_class_observers::attribute_class_observer::AttributeClassObserver;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NominalAttributeClassObserver {
    /// `[class][category]` occurrence counts.
    attribute_value_distribution_per_class: Vec<Vec<f64>>,
}

impl NominalAttributeClassObserver {
    pub fn new(num_classes: usize, num_categories: usize) -> NominalAttributeClassObserver {
        NominalAttributeClassObserver {
            attribute_value_distribution_per_class: vec![vec![0.0; num_categories]; num_classes],
        }
    }

    pub fn num_classes(&self) -> usize {
        self.attribute_value_distribution_per_class.len()
    }

    pub fn num_categories(&self) -> usize {
        self.attribute_value_distribution_per_class
            .first()
            .map_or(0, Vec::len)
    }

    pub fn total_for_class(&self, class_val: usize) -> f64 {
        self.attribute_value_distribution_per_class
            .get(class_val)
            .map_or(0.0, |row| row.iter().sum())
    }

    pub fn is_rectangular(&self) -> bool {
        let k = self.num_categories();
        self.attribute_value_distribution_per_class
            .iter()
            .all(|row| row.len() == k)
    }
}

impl AttributeClassObserver for NominalAttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize) {
        if att_val.is_nan() || att_val < 0.0 {
            return;
        }
        let att_val_int = att_val as usize;
        if let Some(count) = self
            .attribute_value_distribution_per_class
            .get_mut(class_val)
            .and_then(|row| row.get_mut(att_val_int))
        {
            *count += 1.0;
        }
    }

    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
        laplace_smoothing: bool,
    ) -> f64 {
        if att_val.is_nan() {
            return 1.0;
        }
        let Some(row) = self.attribute_value_distribution_per_class.get(class_val) else {
            return 0.0;
        };
        let count = row.get(att_val as usize).copied().unwrap_or(0.0);
        let total: f64 = row.iter().sum();
        if laplace_smoothing {
            (count + 1.0) / (total + row.len() as f64)
        } else if total > 0.0 {
            count / total
        } else {
            0.0
        }
    }

    fn describe_class(&self, class_val: usize) -> String {
        self.attribute_value_distribution_per_class
            .get(class_val)
            .map(|row| {
                row.iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .unwrap_or_default()
    }
}
