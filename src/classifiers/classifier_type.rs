use crate::core::errors::{MlError, Result};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumMessage, EnumString, IntoStaticStr};

/// Discriminator identifying a classifier variant in persisted form.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    EnumMessage,
    IntoStaticStr,
)]
#[serde(try_from = "i32", into = "i32")]
#[strum(serialize_all = "kebab-case")]
pub enum ClassifierType {
    #[strum(message = "ZeroR", detailed_message = "Majority class / mean value baseline")]
    ZeroR,
    #[strum(
        message = "Naive Bayes",
        detailed_message = "Online Naive Bayes over nominal and Gaussian numeric features"
    )]
    NaiveBayes,
    #[strum(message = "Bayes Net", detailed_message = "Reserved; not available")]
    BayesNet,
    #[strum(serialize = "id3", message = "ID3", detailed_message = "Batch decision tree over nominal features")]
    Id3,
    #[strum(
        message = "Density Clustering",
        detailed_message = "Outlier-filtered nearest-centroid classifier"
    )]
    DensityClustering,
}

impl ClassifierType {
    pub const ZERO_R: i32 = 1000;
    pub const NAIVE_BAYES: i32 = 1001;
    pub const BAYES_NET: i32 = 1002;
    pub const ID3: i32 = 1003;
    pub const DENSITY_CLUSTERING: i32 = 1004;

    pub fn code(self) -> i32 {
        match self {
            ClassifierType::ZeroR => Self::ZERO_R,
            ClassifierType::NaiveBayes => Self::NAIVE_BAYES,
            ClassifierType::BayesNet => Self::BAYES_NET,
            ClassifierType::Id3 => Self::ID3,
            ClassifierType::DensityClustering => Self::DENSITY_CLUSTERING,
        }
    }

    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            Self::ZERO_R => Ok(ClassifierType::ZeroR),
            Self::NAIVE_BAYES => Ok(ClassifierType::NaiveBayes),
            Self::BAYES_NET => Ok(ClassifierType::BayesNet),
            Self::ID3 => Ok(ClassifierType::Id3),
            Self::DENSITY_CLUSTERING => Ok(ClassifierType::DensityClustering),
            other => Err(MlError::invalid_parameter(format!(
                "unknown classifier type {other}"
            ))),
        }
    }

    pub fn is_online(self) -> bool {
        matches!(self, ClassifierType::ZeroR | ClassifierType::NaiveBayes)
    }
}

impl TryFrom<i32> for ClassifierType {
    type Error = MlError;

    fn try_from(code: i32) -> Result<Self> {
        ClassifierType::from_code(code)
    }
}

impl From<ClassifierType> for i32 {
    fn from(t: ClassifierType) -> Self {
        t.code()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn codes_round_trip() {
        for t in ClassifierType::iter() {
            assert_eq!(ClassifierType::from_code(t.code()).unwrap(), t);
        }
        assert_eq!(ClassifierType::DensityClustering.code(), 1004);
        assert!(matches!(
            ClassifierType::from_code(999),
            Err(MlError::InvalidParameter(_))
        ));
    }

    #[test]
    fn kebab_case_names() {
        assert_eq!(ClassifierType::NaiveBayes.to_string(), "naive-bayes");
        assert_eq!(ClassifierType::from_str("id3").unwrap(), ClassifierType::Id3);
        assert_eq!(
            ClassifierType::from_str("density-clustering").unwrap(),
            ClassifierType::DensityClustering
        );
        assert_eq!(ClassifierType::from_str("zero-r").unwrap(), ClassifierType::ZeroR);
    }

    #[test]
    fn serializes_as_integer() {
        assert_eq!(serde_json::to_string(&ClassifierType::Id3).unwrap(), "1003");
        let t: ClassifierType = serde_json::from_str("1000").unwrap();
        assert_eq!(t, ClassifierType::ZeroR);
        assert!(serde_json::from_str::<ClassifierType>("7").is_err());
    }
}
