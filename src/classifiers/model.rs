use crate::classifiers::bayes::NaiveBayes;
use crate::classifiers::classifier::{Classifier, OnlineClassifier};
use crate::classifiers::classifier_type::ClassifierType;
use crate::classifiers::clustering::DensityClustering;
use crate::classifiers::config::ClassifierConfig;
use crate::classifiers::id3::Id3;
use crate::classifiers::rules::ZeroR;
use crate::core::errors::{MlError, Result};
use crate::core::{Instance, Signature, Value};
use serde::de::Error as _;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Any of the available classifiers, tagged by its [`ClassifierType`].
///
/// Serialized as `{"type": <code>, "classifier": {...}}`; deserializing
/// dispatches on the code and re-checks the state against its signature.
#[derive(Debug)]
pub enum ClassifierModel {
    ZeroR(ZeroR),
    NaiveBayes(NaiveBayes),
    Id3(Id3),
    DensityClustering(DensityClustering),
}

impl ClassifierModel {
    pub fn new(kind: ClassifierType, signature: Signature, config: &ClassifierConfig) -> Result<Self> {
        Ok(match kind {
            ClassifierType::ZeroR => ClassifierModel::ZeroR(ZeroR::new(signature, config)?),
            ClassifierType::NaiveBayes => {
                ClassifierModel::NaiveBayes(NaiveBayes::new(signature, config)?)
            }
            ClassifierType::Id3 => ClassifierModel::Id3(Id3::new(signature, config)?),
            ClassifierType::DensityClustering => {
                ClassifierModel::DensityClustering(DensityClustering::new(signature, config)?)
            }
            ClassifierType::BayesNet => {
                return Err(MlError::invalid_parameter(format!(
                    "classifier type {} is reserved and cannot be constructed",
                    ClassifierType::BAYES_NET
                )));
            }
        })
    }

    pub fn as_classifier(&self) -> &dyn Classifier {
        match self {
            ClassifierModel::ZeroR(c) => c,
            ClassifierModel::NaiveBayes(c) => c,
            ClassifierModel::Id3(c) => c,
            ClassifierModel::DensityClustering(c) => c,
        }
    }

    pub fn as_classifier_mut(&mut self) -> &mut dyn Classifier {
        match self {
            ClassifierModel::ZeroR(c) => c,
            ClassifierModel::NaiveBayes(c) => c,
            ClassifierModel::Id3(c) => c,
            ClassifierModel::DensityClustering(c) => c,
        }
    }

    pub fn as_online(&self) -> Option<&dyn OnlineClassifier> {
        match self {
            ClassifierModel::ZeroR(c) => Some(c),
            ClassifierModel::NaiveBayes(c) => Some(c),
            ClassifierModel::Id3(_) | ClassifierModel::DensityClustering(_) => None,
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        match self {
            ClassifierModel::ZeroR(c) => c.config(),
            ClassifierModel::NaiveBayes(c) => c.config(),
            ClassifierModel::Id3(c) => c.config(),
            ClassifierModel::DensityClustering(c) => c.config(),
        }
    }

    /// Online update; batch-only variants answer `InvalidState`.
    pub fn update(&self, instance: &Instance) -> Result<()> {
        match self.as_online() {
            Some(online) => online.update(instance),
            None => Err(MlError::invalid_state(format!(
                "{} classifiers cannot be updated online",
                self.classifier_type()
            ))),
        }
    }

    pub(crate) fn check_consistency(&self) -> Result<()> {
        match self {
            ClassifierModel::ZeroR(c) => c.check_consistency(),
            ClassifierModel::NaiveBayes(c) => c.check_consistency(),
            ClassifierModel::Id3(c) => c.check_consistency(),
            ClassifierModel::DensityClustering(c) => c.check_consistency(),
        }
    }
}

impl Classifier for ClassifierModel {
    fn classifier_type(&self) -> ClassifierType {
        self.as_classifier().classifier_type()
    }

    fn signature(&self) -> &Signature {
        self.as_classifier().signature()
    }

    fn train(&mut self, instances: &[Instance]) -> Result<()> {
        self.as_classifier_mut().train(instances)
    }

    fn classify(&self, instance: &Instance) -> Result<Value> {
        self.as_classifier().classify(instance)
    }

    fn is_trained(&self) -> bool {
        self.as_classifier().is_trained()
    }

    fn classifier_info(&self) -> String {
        self.as_classifier().classifier_info()
    }
}

impl From<ZeroR> for ClassifierModel {
    fn from(c: ZeroR) -> Self {
        ClassifierModel::ZeroR(c)
    }
}

impl From<NaiveBayes> for ClassifierModel {
    fn from(c: NaiveBayes) -> Self {
        ClassifierModel::NaiveBayes(c)
    }
}

impl From<Id3> for ClassifierModel {
    fn from(c: Id3) -> Self {
        ClassifierModel::Id3(c)
    }
}

impl From<DensityClustering> for ClassifierModel {
    fn from(c: DensityClustering) -> Self {
        ClassifierModel::DensityClustering(c)
    }
}

impl Serialize for ClassifierModel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("ClassifierModel", 2)?;
        record.serialize_field("type", &self.classifier_type())?;
        match self {
            ClassifierModel::ZeroR(c) => record.serialize_field("classifier", c)?,
            ClassifierModel::NaiveBayes(c) => record.serialize_field("classifier", c)?,
            ClassifierModel::Id3(c) => record.serialize_field("classifier", c)?,
            ClassifierModel::DensityClustering(c) => record.serialize_field("classifier", c)?,
        }
        record.end()
    }
}

#[derive(Deserialize)]
struct ClassifierRecord {
    #[serde(rename = "type")]
    kind: ClassifierType,
    classifier: serde_json::Value,
}

impl<'de> Deserialize<'de> for ClassifierModel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let record = ClassifierRecord::deserialize(deserializer)?;
        let body = record.classifier;
        let model = match record.kind {
            ClassifierType::ZeroR => {
                ClassifierModel::ZeroR(serde_json::from_value(body).map_err(D::Error::custom)?)
            }
            ClassifierType::NaiveBayes => {
                ClassifierModel::NaiveBayes(serde_json::from_value(body).map_err(D::Error::custom)?)
            }
            ClassifierType::Id3 => {
                ClassifierModel::Id3(serde_json::from_value(body).map_err(D::Error::custom)?)
            }
            ClassifierType::DensityClustering => ClassifierModel::DensityClustering(
                serde_json::from_value(body).map_err(D::Error::custom)?,
            ),
            ClassifierType::BayesNet => {
                return Err(D::Error::custom(format!(
                    "classifier type {} is reserved",
                    ClassifierType::BAYES_NET
                )));
            }
        };
        model.check_consistency().map_err(D::Error::custom)?;
        Ok(model)
    }
}
