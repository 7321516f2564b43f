use super::{
    AttributeClassObserver, GaussianNumericAttributeClassObserver, NominalAttributeClassObserver,
    NullAttributeClassObserver,
};
use crate::core::Feature;
use serde::{Deserialize, Serialize};

/// Closed set of observers, one per signature position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AttributeObserver {
    Null(NullAttributeClassObserver),
    Nominal(NominalAttributeClassObserver),
    Numeric(GaussianNumericAttributeClassObserver),
}

impl AttributeObserver {
    pub fn for_feature(feature: &Feature, num_classes: usize) -> Self {
        match feature {
            Feature::Nominal(f) => AttributeObserver::Nominal(NominalAttributeClassObserver::new(
                num_classes,
                f.number_of_categories(),
            )),
            Feature::Numeric(_) => {
                AttributeObserver::Numeric(GaussianNumericAttributeClassObserver::new(num_classes))
            }
        }
    }

    pub fn null() -> Self {
        AttributeObserver::Null(NullAttributeClassObserver::new())
    }

    /// Whether the observer's shape fits `feature` with `num_classes` classes.
    pub fn fits(&self, feature: &Feature, num_classes: usize) -> bool {
        match (self, feature) {
            (AttributeObserver::Nominal(obs), Feature::Nominal(f)) => {
                obs.num_classes() == num_classes
                    && obs.is_rectangular()
                    && (num_classes == 0 || obs.num_categories() == f.number_of_categories())
            }
            (AttributeObserver::Numeric(obs), Feature::Numeric(_)) => {
                obs.num_classes() == num_classes
            }
            _ => false,
        }
    }

    fn inner(&self) -> &dyn AttributeClassObserver {
        match self {
            AttributeObserver::Null(o) => o,
            AttributeObserver::Nominal(o) => o,
            AttributeObserver::Numeric(o) => o,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn AttributeClassObserver {
        match self {
            AttributeObserver::Null(o) => o,
            AttributeObserver::Nominal(o) => o,
            AttributeObserver::Numeric(o) => o,
        }
    }
}

impl AttributeClassObserver for AttributeObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize) {
        self.inner_mut().observe_attribute_class(att_val, class_val);
    }

    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
        laplace_smoothing: bool,
    ) -> f64 {
        self.inner()
            .probability_of_attribute_value_given_class(att_val, class_val, laplace_smoothing)
    }

    fn describe_class(&self, class_val: usize) -> String {
        self.inner().describe_class(class_val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_matching_observer() {
        let nominal = Feature::nominal("f", ["a", "b", "c"]).unwrap();
        let numeric = Feature::numeric("x");

        let obs = AttributeObserver::for_feature(&nominal, 2);
        assert!(obs.fits(&nominal, 2));
        assert!(!obs.fits(&numeric, 2));
        assert!(!obs.fits(&nominal, 3));

        let obs = AttributeObserver::for_feature(&numeric, 2);
        assert!(obs.fits(&numeric, 2));
        assert!(!AttributeObserver::null().fits(&numeric, 2));
    }

    #[test]
    fn null_observer_is_neutral() {
        let mut obs = AttributeObserver::null();
        obs.observe_attribute_class(1.0, 0);
        assert_eq!(obs.probability_of_attribute_value_given_class(1.0, 0, true), 1.0);
    }

    #[test]
    fn serde_keeps_the_variant() {
        let obs = AttributeObserver::for_feature(&Feature::numeric("x"), 1);
        let json = serde_json::to_string(&obs).unwrap();
        assert!(json.starts_with(r#"{"kind":"numeric""#));
        let back: AttributeObserver = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }
}
