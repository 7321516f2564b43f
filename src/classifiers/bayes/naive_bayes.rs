use crate::classifiers::attribute_class_observers::{AttributeClassObserver, AttributeObserver};
use crate::classifiers::classifier::{Classifier, OnlineClassifier};
use crate::classifiers::classifier_type::ClassifierType;
use crate::classifiers::config::{ClassifierConfig, NaiveBayesParameters};
use crate::core::errors::{MlError, Result};
use crate::core::{Feature, Instance, Signature, Value};
use log::{debug, trace};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Serialize, Deserialize)]
struct NaiveBayesState {
    observed_class_distribution: Vec<f64>,
    /// One observer per signature position; the class slot holds a null observer.
    attribute_observers: Vec<AttributeObserver>,
    trained: bool,
}

/// Online Naive Bayes over nominal features (category frequencies, optionally
/// Laplace-smoothed) and numeric features (per-class normal estimates).
///
/// All reads and writes of the statistics go through one lock, so a
/// classification never sees a half-applied update.
#[derive(Debug, Serialize, Deserialize)]
pub struct NaiveBayes {
    signature: Signature,
    config: ClassifierConfig,
    laplace_smoothing: bool,
    state: Mutex<NaiveBayesState>,
}

impl NaiveBayes {
    pub fn new(signature: Signature, config: &ClassifierConfig) -> Result<Self> {
        let params = NaiveBayesParameters::from_config(config)?;
        let num_classes = signature.nominal_class_feature()?.number_of_categories();

        let attribute_observers = signature
            .features()
            .iter()
            .enumerate()
            .map(|(i, feature)| {
                if i == signature.class_index() {
                    AttributeObserver::null()
                } else {
                    AttributeObserver::for_feature(feature, num_classes)
                }
            })
            .collect();

        Ok(Self {
            signature,
            config: config.clone(),
            laplace_smoothing: params.laplace_smoothing,
            state: Mutex::new(NaiveBayesState {
                observed_class_distribution: vec![0.0; num_classes],
                attribute_observers,
                trained: false,
            }),
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn laplace_smoothing(&self) -> bool {
        self.laplace_smoothing
    }

    /// Observer input for the value at `feature_index`: the category index of
    /// a nominal value, the number itself for a numeric one, `None` if missing.
    fn observed_value(&self, feature_index: usize, value: &Value) -> Result<Option<f64>> {
        match (value, &self.signature.features()[feature_index]) {
            (Value::Missing, _) => Ok(None),
            (Value::Nominal(category), Feature::Nominal(feature)) => feature
                .index_of_category(category)
                .map(|i| Some(i as f64))
                .ok_or_else(|| {
                    MlError::incompatible_instance(format!(
                        "unknown category '{category}' for feature '{}'",
                        feature.name()
                    ))
                }),
            (Value::Numeric(x), Feature::Numeric(_)) => Ok(Some(*x)),
            (_, feature) => Err(MlError::incompatible_feature_type(format!(
                "value kind {} does not match feature '{}'",
                value.kind(),
                feature.name()
            ))),
        }
    }

    fn observed_values(&self, instance: &Instance, training: bool) -> Result<Vec<(usize, f64)>> {
        let mut observed = Vec::with_capacity(self.signature.size());
        for feature_index in self.signature.attribute_indices() {
            let Some(value) = self.signature.value_of(instance, feature_index, training) else {
                continue;
            };
            if let Some(x) = self.observed_value(feature_index, value)? {
                observed.push((feature_index, x));
            }
        }
        Ok(observed)
    }

    /// Unnormalised class posteriors of an unlabelled instance.
    pub fn distribution(&self, instance: &Instance) -> Result<Vec<f64>> {
        self.signature.ensure_compliance(instance, false)?;
        let observed = self.observed_values(instance, false)?;
        let state = self.state.lock();
        Ok(self.distribution_locked(&state, &observed))
    }

    fn distribution_locked(&self, state: &NaiveBayesState, observed: &[(usize, f64)]) -> Vec<f64> {
        let class_counts = &state.observed_class_distribution;
        let num_classes = class_counts.len();
        let total: f64 = class_counts.iter().sum();

        let mut posteriors: Vec<f64> = class_counts
            .iter()
            .map(|&count| {
                if total == 0.0 {
                    1.0 / num_classes as f64
                } else {
                    count / total
                }
            })
            .collect();
        trace!("class priors: {posteriors:?}");

        for &(feature_index, x) in observed {
            let observer = &state.attribute_observers[feature_index];
            for (class_val, posterior) in posteriors.iter_mut().enumerate() {
                *posterior *= observer.probability_of_attribute_value_given_class(
                    x,
                    class_val,
                    self.laplace_smoothing,
                );
            }
        }
        trace!("class posteriors: {posteriors:?}");
        posteriors
    }

    pub(crate) fn check_consistency(&self) -> Result<()> {
        let params = NaiveBayesParameters::from_config(&self.config)?;
        if params.laplace_smoothing != self.laplace_smoothing {
            return Err(MlError::malformed_data(format!(
                "laplace_smoothing {} disagrees with the configured {}",
                self.laplace_smoothing, params.laplace_smoothing
            )));
        }
        let num_classes = self.signature.nominal_class_feature()?.number_of_categories();
        let state = self.state.lock();
        let fits = state.observed_class_distribution.len() == num_classes
            && state.attribute_observers.len() == self.signature.size()
            && state
                .attribute_observers
                .iter()
                .zip(self.signature.features())
                .enumerate()
                .all(|(i, (obs, feature))| {
                    if i == self.signature.class_index() {
                        matches!(obs, AttributeObserver::Null(_))
                    } else {
                        obs.fits(feature, num_classes)
                    }
                });
        if fits {
            Ok(())
        } else {
            Err(MlError::invalid_state(
                "Naive Bayes statistics do not match the signature",
            ))
        }
    }
}

impl Classifier for NaiveBayes {
    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::NaiveBayes
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn train(&mut self, instances: &[Instance]) -> Result<()> {
        debug!("NaiveBayes: training on {} instances", instances.len());
        self.update_batch(instances)
    }

    fn classify(&self, instance: &Instance) -> Result<Value> {
        let class_feature = self.signature.nominal_class_feature()?;
        self.signature.ensure_compliance(instance, false)?;
        let observed = self.observed_values(instance, false)?;

        let state = self.state.lock();
        let distribution = self.distribution_locked(&state, &observed);

        let mut max_posterior = 0.0;
        let mut max_index = 0;
        for (i, &p) in distribution.iter().enumerate() {
            if p > max_posterior {
                max_posterior = p;
                max_index = i;
            }
        }

        class_feature
            .category_of_index(max_index)
            .map(Value::nominal)
            .ok_or_else(|| MlError::invalid_state("class feature has no categories"))
    }

    fn is_trained(&self) -> bool {
        self.state.lock().trained
    }

    fn classifier_info(&self) -> String {
        let state = self.state.lock();
        let mut out = String::new();
        let _ = writeln!(out, "Classifier type: {}", ClassifierType::NaiveBayes.code());
        let _ = writeln!(out, "Signature: {}", self.signature);
        let Some(class_feature) = self.signature.class_feature().as_nominal() else {
            return out;
        };

        out.push_str("Class feature value counts: ");
        for ((_, category), count) in class_feature
            .enumerate_categories()
            .zip(&state.observed_class_distribution)
        {
            let _ = write!(out, "[{category}:{count}]");
        }
        out.push_str("\nOther feature value counts:\n");
        for feature_index in self.signature.attribute_indices() {
            let observer = &state.attribute_observers[feature_index];
            let _ = write!(out, "{} ", self.signature.features()[feature_index].name());
            for (class_val, category) in class_feature.enumerate_categories() {
                let _ = write!(out, "[{category}:{}],", observer.describe_class(class_val));
            }
            out.push('\n');
        }
        out
    }
}

impl OnlineClassifier for NaiveBayes {
    fn update(&self, instance: &Instance) -> Result<()> {
        self.signature.ensure_compliance(instance, true)?;
        let class_val = self.signature.class_category_index(instance)?;
        let observed = self.observed_values(instance, true)?;

        let mut state = self.state.lock();
        state.observed_class_distribution[class_val] += 1.0;
        for (feature_index, x) in observed {
            state.attribute_observers[feature_index].observe_attribute_class(x, class_val);
        }
        state.trained = true;
        Ok(())
    }
}
