use super::{NominalFeature, NumericFeature};
use crate::core::values::ValueKind;
use serde::{Deserialize, Serialize};
use strum_macros::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[strum(serialize_all = "lowercase")]
pub enum FeatureKind {
    Nominal,
    Numeric,
}

impl FeatureKind {
    pub fn value_kind(self) -> ValueKind {
        match self {
            FeatureKind::Nominal => ValueKind::Nominal,
            FeatureKind::Numeric => ValueKind::Numeric,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Feature {
    Nominal(NominalFeature),
    Numeric(NumericFeature),
}

impl Feature {
    pub fn nominal<S, I, C>(name: S, categories: I) -> crate::core::errors::Result<Feature>
    where
        S: Into<String>,
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        NominalFeature::new(name, categories).map(Feature::Nominal)
    }

    pub fn numeric<S: Into<String>>(name: S) -> Feature {
        Feature::Numeric(NumericFeature::new(name))
    }

    pub fn name(&self) -> &str {
        match self {
            Feature::Nominal(f) => f.name(),
            Feature::Numeric(f) => &f.name,
        }
    }

    pub fn kind(&self) -> FeatureKind {
        match self {
            Feature::Nominal(_) => FeatureKind::Nominal,
            Feature::Numeric(_) => FeatureKind::Numeric,
        }
    }

    pub fn as_nominal(&self) -> Option<&NominalFeature> {
        match self {
            Feature::Nominal(f) => Some(f),
            Feature::Numeric(_) => None,
        }
    }

    /// Category count for nominal features; numeric features count as one.
    pub fn number_of_categories(&self) -> usize {
        match self {
            Feature::Nominal(f) => f.number_of_categories(),
            Feature::Numeric(_) => 1,
        }
    }

    pub fn arff_representation(&self) -> String {
        match self {
            Feature::Nominal(f) => f.arff_representation(),
            Feature::Numeric(f) => f.arff_representation(),
        }
    }
}

impl From<NominalFeature> for Feature {
    fn from(f: NominalFeature) -> Self {
        Feature::Nominal(f)
    }
}

impl From<NumericFeature> for Feature {
    fn from(f: NumericFeature) -> Self {
        Feature::Numeric(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_map_to_value_kinds() {
        assert_eq!(FeatureKind::Nominal.value_kind(), ValueKind::Nominal);
        assert_eq!(FeatureKind::Numeric.value_kind(), ValueKind::Numeric);
    }

    #[test]
    fn numeric_features_count_one_category() {
        let f = Feature::numeric("temperature");
        assert_eq!(f.kind(), FeatureKind::Numeric);
        assert_eq!(f.number_of_categories(), 1);
        assert!(f.as_nominal().is_none());
        assert_eq!(f.arff_representation(), "@attribute temperature numeric");
    }

    #[test]
    fn tagged_json_round_trip() {
        let f = Feature::nominal("windy", ["true", "false"]).unwrap();
        let json = serde_json::to_string(&f).unwrap();
        assert!(json.starts_with(r#"{"kind":"nominal""#));
        let back: Feature = serde_json::from_str(&json).unwrap();
        assert_eq!(back, f);
        assert_eq!(back.name(), "windy");
    }
}
