use crate::classifiers::classifier_type::ClassifierType;
use crate::core::errors::{MlError, Result};
use schemars::{JsonSchema, Schema, schema_for};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MAX_CLUSTER_DISTANCE: &str = "maxClusterDistance";
pub const MIN_INCLUSION_PERCENT: &str = "minInclusionPercent";
pub const LAPLACE_SMOOTHING: &str = "laplaceSmoothing";

pub const DEFAULT_MAX_CLUSTER_DISTANCE: f64 = 1.0;
pub const DEFAULT_MIN_INCLUSION_PERCENT: f64 = 50.0;
pub const DEFAULT_LAPLACE_SMOOTHING: bool = true;

fn default_max_cluster_distance() -> f64 {
    DEFAULT_MAX_CLUSTER_DISTANCE
}

fn default_min_inclusion_percent() -> f64 {
    DEFAULT_MIN_INCLUSION_PERCENT
}

fn default_laplace_smoothing() -> bool {
    DEFAULT_LAPLACE_SMOOTHING
}

/// Free-form classifier options keyed by name. Learners read the options
/// they recognise and ignore the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassifierConfig {
    params: Map<String, Value>,
}

impl ClassifierConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.add_param(key, value);
        self
    }

    pub fn add_param<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) {
        self.params.insert(key.into(), value.into());
    }

    pub fn param(&self, key: &str) -> Option<&Value> {
        self.params.get(key)
    }

    pub fn contains_param(&self, key: &str) -> bool {
        self.params.contains_key(key)
    }

    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Deserializes the typed parameter block of one learner.
    pub fn parameters<P: DeserializeOwned>(&self) -> Result<P> {
        serde_json::from_value(Value::Object(self.params.clone()))
            .map_err(|e| MlError::invalid_parameter(e.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NaiveBayesParameters {
    #[serde(default = "default_laplace_smoothing")]
    #[schemars(
        title = "Laplace Smoothing",
        description = "Add one to every nominal count so unseen values keep a non-zero probability",
        default = "default_laplace_smoothing"
    )]
    pub laplace_smoothing: bool,
}

impl Default for NaiveBayesParameters {
    fn default() -> Self {
        Self {
            laplace_smoothing: DEFAULT_LAPLACE_SMOOTHING,
        }
    }
}

impl NaiveBayesParameters {
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        config.parameters()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DensityClusteringParameters {
    #[serde(default = "default_max_cluster_distance")]
    #[schemars(
        title = "Max Cluster Distance",
        description = "Neighbourhood radius; metres when instances are {latitude, longitude} pairs",
        range(min = 0.0),
        default = "default_max_cluster_distance"
    )]
    pub max_cluster_distance: f64,

    #[serde(default = "default_min_inclusion_percent")]
    #[schemars(
        title = "Min Inclusion Percent",
        description = "Share of same-label instances that must lie within the radius (0-100)",
        range(min = 0.0, max = 100.0),
        default = "default_min_inclusion_percent"
    )]
    pub min_inclusion_percent: f64,
}

impl Default for DensityClusteringParameters {
    fn default() -> Self {
        Self {
            max_cluster_distance: DEFAULT_MAX_CLUSTER_DISTANCE,
            min_inclusion_percent: DEFAULT_MIN_INCLUSION_PERCENT,
        }
    }
}

impl DensityClusteringParameters {
    pub fn from_config(config: &ClassifierConfig) -> Result<Self> {
        let params: Self = config.parameters()?;
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.max_cluster_distance >= 0.0) {
            return Err(MlError::invalid_parameter(format!(
                "{MAX_CLUSTER_DISTANCE} must be non-negative, got {}",
                self.max_cluster_distance
            )));
        }
        if !(0.0..=100.0).contains(&self.min_inclusion_percent) {
            return Err(MlError::invalid_parameter(format!(
                "{MIN_INCLUSION_PERCENT} must lie in [0, 100], got {}",
                self.min_inclusion_percent
            )));
        }
        Ok(())
    }
}

/// JSON schema of the options a classifier kind recognises, if any.
pub fn parameters_schema(kind: ClassifierType) -> Option<Schema> {
    match kind {
        ClassifierType::NaiveBayes => Some(schema_for!(NaiveBayesParameters)),
        ClassifierType::DensityClustering => Some(schema_for!(DensityClusteringParameters)),
        ClassifierType::ZeroR | ClassifierType::BayesNet | ClassifierType::Id3 => None,
    }
}
