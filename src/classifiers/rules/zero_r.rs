use crate::classifiers::classifier::{Classifier, OnlineClassifier};
use crate::classifiers::classifier_type::ClassifierType;
use crate::classifiers::config::ClassifierConfig;
use crate::core::errors::{MlError, Result};
use crate::core::{Feature, Instance, Signature, Value};
use log::debug;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "lowercase")]
enum ClassStatistics {
    Nominal { class_counts: Vec<f64> },
    Numeric { sum: f64, count: f64 },
}

#[derive(Debug, Serialize, Deserialize)]
struct ZeroRState {
    statistics: ClassStatistics,
    trained: bool,
}

/// Ignores every feature: predicts the most frequent class category, or the
/// mean of a numeric target.
#[derive(Debug, Serialize, Deserialize)]
pub struct ZeroR {
    signature: Signature,
    config: ClassifierConfig,
    state: Mutex<ZeroRState>,
}

impl ZeroR {
    pub fn new(signature: Signature, config: &ClassifierConfig) -> Result<Self> {
        let statistics = match signature.class_feature() {
            Feature::Nominal(class) => ClassStatistics::Nominal {
                class_counts: vec![0.0; class.number_of_categories()],
            },
            Feature::Numeric(_) => ClassStatistics::Numeric { sum: 0.0, count: 0.0 },
        };
        Ok(Self {
            signature,
            config: config.clone(),
            state: Mutex::new(ZeroRState {
                statistics,
                trained: false,
            }),
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub(crate) fn check_consistency(&self) -> Result<()> {
        let state = self.state.lock();
        match (&state.statistics, self.signature.class_feature()) {
            (ClassStatistics::Nominal { class_counts }, Feature::Nominal(class))
                if class_counts.len() == class.number_of_categories() =>
            {
                Ok(())
            }
            (ClassStatistics::Numeric { .. }, Feature::Numeric(_)) => Ok(()),
            _ => Err(MlError::invalid_state(
                "ZeroR statistics do not match the class feature",
            )),
        }
    }
}

impl Classifier for ZeroR {
    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::ZeroR
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn train(&mut self, instances: &[Instance]) -> Result<()> {
        debug!("ZeroR: training on {} instances", instances.len());
        self.update_batch(instances)
    }

    fn classify(&self, instance: &Instance) -> Result<Value> {
        self.signature.ensure_compliance(instance, false)?;
        let state = self.state.lock();
        match &state.statistics {
            ClassStatistics::Nominal { class_counts } => {
                let mut max_count = 0.0;
                let mut max_index = 0;
                for (i, &count) in class_counts.iter().enumerate() {
                    if count > max_count {
                        max_count = count;
                        max_index = i;
                    }
                }
                let class = self.signature.nominal_class_feature()?;
                let label = class.category_of_index(max_index).ok_or_else(|| {
                    MlError::invalid_state(format!("no class category at index {max_index}"))
                })?;
                Ok(Value::nominal(label))
            }
            ClassStatistics::Numeric { sum, count } => {
                if *count == 0.0 {
                    return Err(MlError::invalid_state(
                        "mean of a numeric class is undefined before training",
                    ));
                }
                Ok(Value::numeric(sum / count))
            }
        }
    }

    fn is_trained(&self) -> bool {
        self.state.lock().trained
    }

    fn classifier_info(&self) -> String {
        let state = self.state.lock();
        let mut out = String::new();
        let _ = writeln!(out, "Classifier type: {}", ClassifierType::ZeroR.code());
        let _ = writeln!(out, "Signature: {}", self.signature);
        match (&state.statistics, self.signature.class_feature().as_nominal()) {
            (ClassStatistics::Nominal { class_counts }, Some(class)) => {
                out.push_str("Class counts: ");
                for ((_, category), count) in class.enumerate_categories().zip(class_counts) {
                    let _ = write!(out, "[{category}:{count}]");
                }
                out.push('\n');
            }
            (ClassStatistics::Numeric { sum, count }, _) => {
                let _ = writeln!(out, "Sum: {sum} Count: {count}");
            }
            _ => {}
        }
        out
    }
}

impl OnlineClassifier for ZeroR {
    fn update(&self, instance: &Instance) -> Result<()> {
        self.signature.ensure_compliance(instance, true)?;
        // label is resolved outside the lock
        let observation = match self.signature.class_feature() {
            Feature::Nominal(_) => Observation::Category(self.signature.class_category_index(instance)?),
            Feature::Numeric(_) => match self.signature.class_value(instance) {
                Some(Value::Numeric(x)) => Observation::Number(*x),
                _ => {
                    return Err(MlError::incompatible_instance(
                        "numeric class value is missing",
                    ));
                }
            },
        };

        let mut state = self.state.lock();
        match (&mut state.statistics, observation) {
            (ClassStatistics::Nominal { class_counts }, Observation::Category(i)) => {
                class_counts[i] += 1.0;
            }
            (ClassStatistics::Numeric { sum, count }, Observation::Number(x)) => {
                *sum += x;
                *count += 1.0;
            }
            _ => {
                return Err(MlError::invalid_state(
                    "ZeroR statistics do not match the class feature",
                ));
            }
        }
        state.trained = true;
        Ok(())
    }
}

enum Observation {
    Category(usize),
    Number(f64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance;
    use std::sync::Arc;
    use std::thread;

    fn nominal_signature() -> Signature {
        Signature::with_class_last(vec![
            Feature::numeric("x"),
            Feature::nominal("class", ["A", "B"]).unwrap(),
        ])
        .unwrap()
    }

    fn numeric_signature() -> Signature {
        Signature::with_class_last(vec![Feature::numeric("x"), Feature::numeric("y")]).unwrap()
    }

    #[test]
    fn majority_class_wins() {
        let mut z = ZeroR::new(nominal_signature(), &ClassifierConfig::new()).unwrap();
        z.train(&[
            instance![1.0, "A"],
            instance![2.0, "A"],
            instance![3.0, "A"],
            instance![4.0, "B"],
        ])
        .unwrap();

        assert!(z.is_trained());
        assert_eq!(z.classify(&instance![100.0]).unwrap(), Value::nominal("A"));
        assert_eq!(z.classify(&instance![Value::Missing]).unwrap(), Value::nominal("A"));
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        let z = ZeroR::new(nominal_signature(), &ClassifierConfig::new()).unwrap();
        z.update(&instance![1.0, "B"]).unwrap();
        z.update(&instance![1.0, "A"]).unwrap();
        assert_eq!(z.classify(&instance![0.0]).unwrap(), Value::nominal("A"));
    }

    #[test]
    fn untrained_nominal_returns_first_category() {
        let z = ZeroR::new(nominal_signature(), &ClassifierConfig::new()).unwrap();
        assert!(!z.is_trained());
        assert_eq!(z.classify(&instance![0.0]).unwrap(), Value::nominal("A"));
    }

    #[test]
    fn numeric_target_is_the_mean() {
        let mut z = ZeroR::new(numeric_signature(), &ClassifierConfig::new()).unwrap();
        z.train(&[instance![0.0, 1.0], instance![0.0, 2.0], instance![0.0, 3.0]])
            .unwrap();
        assert_eq!(z.classify(&instance![9.0]).unwrap(), Value::numeric(2.0));
    }

    #[test]
    fn numeric_mean_before_training_is_an_error() {
        let z = ZeroR::new(numeric_signature(), &ClassifierConfig::new()).unwrap();
        assert!(matches!(
            z.classify(&instance![1.0]),
            Err(MlError::InvalidState(_))
        ));
    }

    #[test]
    fn classify_is_idempotent() {
        let mut nominal = ZeroR::new(nominal_signature(), &ClassifierConfig::new()).unwrap();
        nominal
            .train(&[instance![1.0, "B"], instance![2.0, "B"], instance![3.0, "A"]])
            .unwrap();
        let first = nominal.classify(&instance![5.0]).unwrap();
        assert_eq!(first, Value::nominal("B"));
        for _ in 0..3 {
            assert_eq!(nominal.classify(&instance![5.0]).unwrap(), first);
        }

        let mut numeric = ZeroR::new(numeric_signature(), &ClassifierConfig::new()).unwrap();
        numeric.train(&[instance![0.0, 0.1], instance![0.0, 0.2], instance![0.0, 0.7]]).unwrap();
        let first = numeric.classify(&instance![1.0]).unwrap();
        for _ in 0..3 {
            assert_eq!(numeric.classify(&instance![1.0]).unwrap(), first);
        }
        assert!(numeric.is_trained());
    }

    #[test]
    fn incompatible_instances_are_rejected() {
        let z = ZeroR::new(nominal_signature(), &ClassifierConfig::new()).unwrap();
        assert!(matches!(
            z.update(&instance![1.0]),
            Err(MlError::IncompatibleInstance(_))
        ));
        assert!(matches!(
            z.classify(&instance!["a"]),
            Err(MlError::IncompatibleInstance(_))
        ));
        assert!(matches!(
            z.update(&instance![1.0, "C"]),
            Err(MlError::IncompatibleInstance(_))
        ));
        assert!(!z.is_trained());
    }

    #[test]
    fn concurrent_updates_lose_nothing() {
        let z = Arc::new(ZeroR::new(nominal_signature(), &ClassifierConfig::new()).unwrap());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let z = Arc::clone(&z);
                thread::spawn(move || {
                    let label = if t == 0 { "A" } else { "B" };
                    for _ in 0..250 {
                        z.update(&instance![0.0, label]).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        let info = z.classifier_info();
        assert!(info.contains("[A:250]"), "{info}");
        assert!(info.contains("[B:750]"), "{info}");
        assert_eq!(z.classify(&instance![0.0]).unwrap(), Value::nominal("B"));
    }
}
