use crate::core::errors::{MlError, Result};
use crate::core::features::{Feature, NominalFeature};
use crate::core::instance::Instance;
use crate::core::values::{Value, ValueKind};
use log::trace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered feature schema plus the index of the class feature.
///
/// Labelled (training) instances carry one value per feature. Unlabelled
/// instances omit the class slot, so a feature at position `p` lives at
/// instance position `p` before the class and `p - 1` after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SignatureRepr", into = "SignatureRepr")]
pub struct Signature {
    features: Vec<Feature>,
    class_index: usize,
}

#[derive(Serialize, Deserialize)]
struct SignatureRepr {
    features: Vec<Feature>,
    class_index: usize,
}

impl Signature {
    pub fn new(features: Vec<Feature>, class_index: usize) -> Result<Signature> {
        if class_index >= features.len() {
            return Err(MlError::invalid_parameter(format!(
                "class index {class_index} out of range for {} features",
                features.len()
            )));
        }
        Ok(Signature {
            features,
            class_index,
        })
    }

    pub fn with_class_last(features: Vec<Feature>) -> Result<Signature> {
        let class_index = features.len().checked_sub(1).ok_or_else(|| {
            MlError::invalid_parameter("a signature needs at least one feature")
        })?;
        Signature::new(features, class_index)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn size(&self) -> usize {
        self.features.len()
    }

    pub fn class_index(&self) -> usize {
        self.class_index
    }

    pub fn class_feature(&self) -> &Feature {
        &self.features[self.class_index]
    }

    pub fn feature_at_index(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn index_of_feature(&self, name: &str) -> Option<usize> {
        self.features.iter().position(|f| f.name() == name)
    }

    /// The class feature, required to be nominal.
    pub fn nominal_class_feature(&self) -> Result<&NominalFeature> {
        self.class_feature().as_nominal().ok_or_else(|| {
            MlError::incompatible_feature_type(format!(
                "class feature '{}' has to be nominal",
                self.class_feature().name()
            ))
        })
    }

    pub fn number_of_classes(&self) -> usize {
        self.class_feature().as_nominal().map_or(0, |c| c.number_of_categories())
    }

    /// Signature positions of every non-class feature, in order.
    pub fn attribute_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.features.len()).filter(move |&i| i != self.class_index)
    }

    /// Instance position holding the feature at `feature_index`, or `None` for
    /// the class slot of an unlabelled instance.
    pub fn instance_index(&self, feature_index: usize, training: bool) -> Option<usize> {
        if training || feature_index < self.class_index {
            Some(feature_index)
        } else if feature_index == self.class_index {
            None
        } else {
            Some(feature_index - 1)
        }
    }

    /// Feature position described by the value at `instance_index`.
    fn feature_index(&self, instance_index: usize, training: bool) -> usize {
        if training || instance_index < self.class_index {
            instance_index
        } else {
            instance_index + 1
        }
    }

    pub fn value_of<'a>(
        &self,
        instance: &'a Instance,
        feature_index: usize,
        training: bool,
    ) -> Option<&'a Value> {
        self.instance_index(feature_index, training)
            .and_then(|i| instance.value_at(i))
    }

    pub fn class_value<'a>(&self, instance: &'a Instance) -> Option<&'a Value> {
        instance.value_at(self.class_index)
    }

    pub fn check_compliance(&self, instance: &Instance, training: bool) -> bool {
        let expected = if training {
            self.features.len()
        } else {
            self.features.len() - 1
        };
        if instance.len() != expected {
            trace!(
                "expected {expected} values (training={training}), got {}",
                instance.len()
            );
            return false;
        }

        instance.iter().enumerate().all(|(i, value)| {
            let feature = &self.features[self.feature_index(i, training)];
            let ok = value.kind() == ValueKind::Missing || value.kind() == feature.kind().value_kind();
            if !ok {
                trace!(
                    "value kind {} does not match feature '{}' ({})",
                    value.kind(),
                    feature.name(),
                    feature.kind()
                );
            }
            ok
        })
    }

    pub fn ensure_compliance(&self, instance: &Instance, training: bool) -> Result<()> {
        if self.check_compliance(instance, training) {
            Ok(())
        } else {
            Err(MlError::incompatible_instance(
                "instance is not compatible with the signature used for classifier construction",
            ))
        }
    }

    /// Index of a labelled instance's class category.
    pub fn class_category_index(&self, instance: &Instance) -> Result<usize> {
        let class_feature = self.nominal_class_feature()?;
        let category = match self.class_value(instance) {
            Some(Value::Nominal(c)) => c,
            _ => {
                return Err(MlError::incompatible_feature_type(
                    "class value has to be nominal",
                ));
            }
        };
        class_feature.index_of_category(category).ok_or_else(|| {
            MlError::incompatible_instance(format!(
                "unknown class category '{category}' for '{}'",
                class_feature.name()
            ))
        })
    }

    /// Copy of a labelled instance with the class slot removed.
    pub fn unlabelled(&self, instance: &Instance) -> Instance {
        instance
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.class_index)
            .map(|(_, v)| v.clone())
            .collect()
    }
}

impl TryFrom<SignatureRepr> for Signature {
    type Error = MlError;

    fn try_from(repr: SignatureRepr) -> Result<Self> {
        Signature::new(repr.features, repr.class_index)
    }
}

impl From<Signature> for SignatureRepr {
    fn from(s: Signature) -> Self {
        SignatureRepr {
            features: s.features,
            class_index: s.class_index,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, feature) in self.features.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "[{}({})]", feature.name(), feature.kind())?;
        }
        Ok(())
    }
}
