use crate::classifiers::classifier::Classifier;
use crate::classifiers::classifier_type::ClassifierType;
use crate::classifiers::clustering::distance::distance;
use crate::classifiers::config::{ClassifierConfig, DensityClusteringParameters};
use crate::core::errors::{MlError, Result};
use crate::core::{Feature, Instance, Signature, Value};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Mean position of the training instances of one class that survived
/// outlier removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Centroid {
    pub label: String,
    pub coordinates: Vec<f64>,
    /// Number of surviving instances averaged into `coordinates`.
    pub support: usize,
}

/// Nearest-centroid classifier whose centroids are computed after dropping
/// density outliers.
///
/// An instance is an outlier when fewer than `minInclusionPercent` of the
/// other same-label instances still present lie within `maxClusterDistance`
/// of it. Each instance is tested once, in batch order, against the set as it
/// stands at that moment, so earlier removals change later verdicts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DensityClustering {
    signature: Signature,
    config: ClassifierConfig,
    params: DensityClusteringParameters,
    centroids: Vec<Centroid>,
    trained: bool,
}

struct Point {
    class_val: usize,
    coordinates: Vec<f64>,
}

impl DensityClustering {
    pub fn new(signature: Signature, config: &ClassifierConfig) -> Result<Self> {
        let params = DensityClusteringParameters::from_config(config)?;
        let class = signature.nominal_class_feature()?;
        Self::check_numeric_attributes(&signature)?;

        let dims = signature.size() - 1;
        let centroids = class
            .categories()
            .iter()
            .map(|label| Centroid {
                label: label.clone(),
                coordinates: vec![0.0; dims],
                support: 0,
            })
            .collect();

        Ok(Self {
            signature,
            config: config.clone(),
            params,
            centroids,
            trained: false,
        })
    }

    fn check_numeric_attributes(signature: &Signature) -> Result<()> {
        for i in signature.attribute_indices() {
            let feature = &signature.features()[i];
            if !matches!(feature, Feature::Numeric(_)) {
                return Err(MlError::incompatible_feature_type(format!(
                    "density clustering needs numeric features, '{}' is {}",
                    feature.name(),
                    feature.kind()
                )));
            }
        }
        Ok(())
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn parameters(&self) -> &DensityClusteringParameters {
        &self.params
    }

    /// One centroid per class category, in category order.
    pub fn centroids(&self) -> &[Centroid] {
        &self.centroids
    }

    pub(crate) fn check_consistency(&self) -> Result<()> {
        let configured = DensityClusteringParameters::from_config(&self.config)?;
        if configured != self.params {
            return Err(MlError::malformed_data(format!(
                "parameters {:?} disagree with the configured {:?}",
                self.params, configured
            )));
        }
        let class = self.signature.nominal_class_feature()?;
        Self::check_numeric_attributes(&self.signature)?;
        let dims = self.signature.size() - 1;
        let fits = self.centroids.len() == class.number_of_categories()
            && self
                .centroids
                .iter()
                .zip(class.categories())
                .all(|(c, label)| c.label == *label && c.coordinates.len() == dims);
        if fits {
            Ok(())
        } else {
            Err(MlError::invalid_state(
                "centroids do not match the signature",
            ))
        }
    }

    fn coordinates_of(&self, instance: &Instance, training: bool) -> Result<Vec<f64>> {
        self.signature
            .attribute_indices()
            .map(|i| match self.signature.value_of(instance, i, training) {
                Some(Value::Numeric(x)) => Ok(*x),
                _ => Err(MlError::incompatible_instance(format!(
                    "feature '{}' needs a numeric value",
                    self.signature.features()[i].name()
                ))),
            })
            .collect()
    }

    /// Drops density outliers in one left-to-right pass and returns the
    /// survivors.
    fn remove_outliers(&self, points: Vec<Point>) -> Result<Vec<Point>> {
        let min_ratio = self.params.min_inclusion_percent / 100.0;
        let mut present = vec![true; points.len()];

        for i in 0..points.len() {
            let mut total = 0usize;
            let mut inside = 0usize;
            for (j, other) in points.iter().enumerate() {
                if j == i || !present[j] || other.class_val != points[i].class_val {
                    continue;
                }
                total += 1;
                if distance(&points[i].coordinates, &other.coordinates)?
                    < self.params.max_cluster_distance
                {
                    inside += 1;
                }
            }
            trace!("DensityClustering: point {i} has {inside}/{total} neighbours inside");
            if total > 0 && (inside as f64) / (total as f64) < min_ratio {
                present[i] = false;
            }
        }

        Ok(points
            .into_iter()
            .zip(present)
            .filter_map(|(p, keep)| keep.then_some(p))
            .collect())
    }
}

impl Classifier for DensityClustering {
    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::DensityClustering
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Recomputes every centroid from `instances` alone. Nothing changes if
    /// any instance is rejected.
    fn train(&mut self, instances: &[Instance]) -> Result<()> {
        let points = instances
            .iter()
            .map(|instance| {
                self.signature.ensure_compliance(instance, true)?;
                Ok(Point {
                    class_val: self.signature.class_category_index(instance)?,
                    coordinates: self.coordinates_of(instance, true)?,
                })
            })
            .collect::<Result<Vec<Point>>>()?;

        let survivors = self.remove_outliers(points)?;
        debug!(
            "DensityClustering: {} of {} instances left after outlier removal",
            survivors.len(),
            instances.len()
        );

        for centroid in &mut self.centroids {
            centroid.coordinates.iter_mut().for_each(|c| *c = 0.0);
            centroid.support = 0;
        }
        for point in &survivors {
            let centroid = &mut self.centroids[point.class_val];
            for (c, x) in centroid.coordinates.iter_mut().zip(&point.coordinates) {
                *c += x;
            }
            centroid.support += 1;
        }
        for centroid in &mut self.centroids {
            if centroid.support > 0 {
                let n = centroid.support as f64;
                centroid.coordinates.iter_mut().for_each(|c| *c /= n);
            }
        }

        self.trained = true;
        Ok(())
    }

    fn classify(&self, instance: &Instance) -> Result<Value> {
        self.signature.ensure_compliance(instance, false)?;
        let coordinates = self.coordinates_of(instance, false)?;

        let mut min_distance = f64::MAX;
        let mut nearest = self
            .centroids
            .first()
            .ok_or_else(|| MlError::invalid_state("class feature has no categories"))?;
        for centroid in &self.centroids {
            let d = distance(&coordinates, &centroid.coordinates)?;
            if d < min_distance {
                min_distance = d;
                nearest = centroid;
            }
        }
        Ok(Value::nominal(nearest.label.clone()))
    }

    fn is_trained(&self) -> bool {
        self.trained
    }

    fn classifier_info(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Classifier type: {}", ClassifierType::DensityClustering.code());
        let _ = writeln!(out, "Signature: {}", self.signature);
        let _ = writeln!(
            out,
            "Max cluster distance: {}, min inclusion: {}%",
            self.params.max_cluster_distance, self.params.min_inclusion_percent
        );
        for c in &self.centroids {
            let _ = writeln!(out, "Centroid {} ({} points): {:?}", c.label, c.support, c.coordinates);
        }
        out
    }
}
