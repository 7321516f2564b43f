use crate::classifiers::classifier::Classifier;
use crate::classifiers::classifier_type::ClassifierType;
use crate::classifiers::config::ClassifierConfig;
use crate::classifiers::id3::info_gain_split_criterion::InfoGainSplitCriterion;
use crate::classifiers::id3::node::Id3Node;
use crate::classifiers::id3::split_criterion::SplitCriterion;
use crate::core::errors::{MlError, Result};
use crate::core::{Feature, Instance, Signature, Value};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// A training instance reduced to what the tree needs: its class index and
/// the category index of every nominal feature (`None` when missing, or for
/// numeric features and the class slot).
struct Row {
    class_val: usize,
    categories: Vec<Option<usize>>,
}

/// Batch ID3 decision tree over the nominal features of a signature.
/// Numeric features are carried but never split on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Id3 {
    signature: Signature,
    config: ClassifierConfig,
    root: Option<Id3Node>,
    #[serde(skip)]
    split_criterion: InfoGainSplitCriterion,
}

impl Id3 {
    pub fn new(signature: Signature, config: &ClassifierConfig) -> Result<Self> {
        signature.nominal_class_feature()?;
        Ok(Self {
            signature,
            config: config.clone(),
            root: None,
            split_criterion: InfoGainSplitCriterion::new(),
        })
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    pub fn root(&self) -> Option<&Id3Node> {
        self.root.as_ref()
    }

    pub fn tree_depth(&self) -> Option<usize> {
        self.root.as_ref().map(Id3Node::depth)
    }

    pub fn leaf_count(&self) -> Option<usize> {
        self.root.as_ref().map(Id3Node::leaf_count)
    }

    pub(crate) fn check_consistency(&self) -> Result<()> {
        self.signature.nominal_class_feature()?;
        match &self.root {
            Some(root) => root.check_consistency(&self.signature),
            None => Ok(()),
        }
    }

    fn to_row(&self, instance: &Instance) -> Result<Row> {
        self.signature.ensure_compliance(instance, true)?;
        let class_val = self.signature.class_category_index(instance)?;

        let mut categories = vec![None; self.signature.size()];
        for feature_index in self.signature.attribute_indices() {
            let Feature::Nominal(feature) = &self.signature.features()[feature_index] else {
                continue;
            };
            if let Some(Value::Nominal(category)) = instance.value_at(feature_index) {
                let index = feature.index_of_category(category).ok_or_else(|| {
                    MlError::incompatible_instance(format!(
                        "unknown category '{category}' for feature '{}'",
                        feature.name()
                    ))
                })?;
                categories[feature_index] = Some(index);
            }
        }
        Ok(Row {
            class_val,
            categories,
        })
    }

    fn class_distribution(&self, rows: &[&Row]) -> Vec<f64> {
        let mut dist = vec![0.0; self.signature.number_of_classes()];
        for row in rows {
            dist[row.class_val] += 1.0;
        }
        dist
    }

    fn majority_class(distribution: &[f64]) -> usize {
        let mut max_count = 0.0;
        let mut max_index = 0;
        for (i, &count) in distribution.iter().enumerate() {
            if count > max_count {
                max_count = count;
                max_index = i;
            }
        }
        max_index
    }

    /// Class distributions per category of `feature_index`, plus a trailing
    /// bucket for instances missing that feature.
    fn post_split_distributions(&self, rows: &[&Row], feature_index: usize, arity: usize) -> Vec<Vec<f64>> {
        let num_classes = self.signature.number_of_classes();
        let mut dists = vec![vec![0.0; num_classes]; arity + 1];
        for row in rows {
            let bucket = row.categories[feature_index].unwrap_or(arity);
            dists[bucket][row.class_val] += 1.0;
        }
        dists
    }

    fn build_tree(&self, rows: &[&Row], candidates: &[bool]) -> Id3Node {
        let distribution = self.class_distribution(rows);
        let non_zero: Vec<usize> = (0..distribution.len())
            .filter(|&i| distribution[i] > 0.0)
            .collect();
        if let [only] = non_zero.as_slice() {
            return Id3Node::Leaf { label: *only };
        }
        let majority = Self::majority_class(&distribution);

        let mut best: Option<(usize, usize)> = None;
        let mut best_merit = f64::NEG_INFINITY;
        for (feature_index, feature) in self.signature.features().iter().enumerate() {
            if !candidates[feature_index] {
                continue;
            }
            let Feature::Nominal(nominal) = feature else {
                continue;
            };
            let arity = nominal.number_of_categories();
            let post = self.post_split_distributions(rows, feature_index, arity);
            let merit = self.split_criterion.merit_of_split(&distribution, &post);
            trace!("ID3: gain of '{}' is {merit}", nominal.name());
            if merit > best_merit {
                best_merit = merit;
                best = Some((feature_index, arity));
            }
        }

        let Some((split_index, arity)) = best else {
            return Id3Node::Leaf { label: majority };
        };

        let mut child_candidates = candidates.to_vec();
        child_candidates[split_index] = false;

        let children = (0..arity)
            .map(|category| {
                let subset: Vec<&Row> = rows
                    .iter()
                    .copied()
                    .filter(|row| row.categories[split_index] == Some(category))
                    .collect();
                if subset.is_empty() {
                    Id3Node::Leaf { label: majority }
                } else {
                    self.build_tree(&subset, &child_candidates)
                }
            })
            .collect();

        Id3Node::Split {
            feature_index: split_index,
            children,
        }
    }
}

impl Classifier for Id3 {
    fn classifier_type(&self) -> ClassifierType {
        ClassifierType::Id3
    }

    fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Builds a fresh tree from `instances`, replacing any previous one.
    /// Nothing changes if any instance is rejected.
    fn train(&mut self, instances: &[Instance]) -> Result<()> {
        if instances.is_empty() {
            return Err(MlError::invalid_parameter(
                "ID3 needs at least one training instance",
            ));
        }
        let rows = instances
            .iter()
            .map(|instance| self.to_row(instance))
            .collect::<Result<Vec<Row>>>()?;
        let row_refs: Vec<&Row> = rows.iter().collect();

        let candidates: Vec<bool> = (0..self.signature.size())
            .map(|i| i != self.signature.class_index())
            .collect();

        let root = self.build_tree(&row_refs, &candidates);
        debug!(
            "ID3: built tree from {} instances (depth {}, {} leaves)",
            instances.len(),
            root.depth(),
            root.leaf_count()
        );
        self.root = Some(root);
        Ok(())
    }

    fn classify(&self, instance: &Instance) -> Result<Value> {
        self.signature.ensure_compliance(instance, false)?;
        let root = self
            .root
            .as_ref()
            .ok_or_else(|| MlError::invalid_state("ID3 tree has not been trained"))?;
        let label = root.sort_instance(&self.signature, instance)?;
        self.signature
            .nominal_class_feature()?
            .category_of_index(label)
            .map(Value::nominal)
            .ok_or_else(|| MlError::invalid_state(format!("leaf label {label} out of range")))
    }

    fn is_trained(&self) -> bool {
        self.root.is_some()
    }

    fn classifier_info(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Classifier type: {}", ClassifierType::Id3.code());
        let _ = writeln!(out, "Signature: {}", self.signature);
        match &self.root {
            None => out.push_str("Tree: untrained\n"),
            Some(root) => {
                let _ = writeln!(
                    out,
                    "Tree depth: {}, leaves: {}",
                    root.depth(),
                    root.leaf_count()
                );
                if let Id3Node::Leaf { label } = root {
                    let name = self
                        .signature
                        .class_feature()
                        .as_nominal()
                        .and_then(|c| c.category_of_index(*label))
                        .unwrap_or("?");
                    let _ = writeln!(out, ": {name}");
                } else {
                    root.describe(&self.signature, 0, &mut out);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance;
    use crate::testing::fixtures;

    fn boolean_signature() -> Signature {
        Signature::with_class_last(vec![
            Feature::nominal("a", ["0", "1"]).unwrap(),
            Feature::nominal("b", ["0", "1"]).unwrap(),
            Feature::nominal("class", ["f", "t"]).unwrap(),
        ])
        .unwrap()
    }

    fn truth_table(op: fn(bool, bool) -> bool) -> Vec<Instance> {
        let mut rows = Vec::new();
        for a in [false, true] {
            for b in [false, true] {
                let label = if op(a, b) { "t" } else { "f" };
                rows.push(instance![
                    if a { "1" } else { "0" },
                    if b { "1" } else { "0" },
                    label
                ]);
            }
        }
        rows
    }

    fn assert_fits_training_data(tree: &Id3, data: &[Instance]) {
        for labelled in data {
            let expected = tree.signature().class_value(labelled).unwrap().clone();
            let unlabelled = tree.signature().unlabelled(labelled);
            assert_eq!(tree.classify(&unlabelled).unwrap(), expected);
        }
    }

    #[test]
    fn learns_and_and_or() {
        let ops: [fn(bool, bool) -> bool; 2] = [|a, b| a && b, |a, b| a || b];
        for op in ops {
            let data = truth_table(op);
            let mut tree = Id3::new(boolean_signature(), &ClassifierConfig::new()).unwrap();
            tree.train(&data).unwrap();

            match tree.root().unwrap() {
                Id3Node::Split { feature_index, children } => {
                    assert_eq!(*feature_index, 0);
                    assert_eq!(children.len(), 2);
                }
                leaf => panic!("expected a split at the root, got {leaf:?}"),
            }
            assert_eq!(tree.tree_depth(), Some(2));
            assert_eq!(tree.leaf_count(), Some(3));
            assert_fits_training_data(&tree, &data);
        }
    }

    #[test]
    fn play_tennis_splits_on_outlook() {
        let data = fixtures::play_tennis_instances();
        let mut tree = Id3::new(fixtures::play_tennis_signature(), &ClassifierConfig::new()).unwrap();
        tree.train(&data).unwrap();

        assert!(matches!(
            tree.root(),
            Some(Id3Node::Split { feature_index: 0, .. })
        ));
        assert_fits_training_data(&tree, &data);
        assert_eq!(
            tree.classify(&instance!["overcast", "cool", "high", "TRUE"]).unwrap(),
            Value::nominal("yes")
        );
        assert!(tree.classifier_info().contains("outlook = overcast: yes"));
    }

    #[test]
    fn pure_batch_is_a_single_leaf() {
        let mut tree = Id3::new(boolean_signature(), &ClassifierConfig::new()).unwrap();
        tree.train(&[instance!["0", "1", "t"], instance!["1", "0", "t"]]).unwrap();
        assert_eq!(tree.root(), Some(&Id3Node::Leaf { label: 1 }));
        assert_eq!(tree.classify(&instance!["0", "0"]).unwrap(), Value::nominal("t"));
    }

    #[test]
    fn unseen_branch_gets_the_parent_majority() {
        let s = Signature::with_class_last(vec![
            Feature::nominal("colour", ["red", "green", "blue"]).unwrap(),
            Feature::nominal("class", ["x", "y"]).unwrap(),
        ])
        .unwrap();
        let mut tree = Id3::new(s, &ClassifierConfig::new()).unwrap();
        tree.train(&[
            instance!["red", "y"],
            instance!["red", "y"],
            instance!["green", "x"],
        ])
        .unwrap();

        assert_eq!(tree.classify(&instance!["blue"]).unwrap(), Value::nominal("y"));
        assert_eq!(tree.classify(&instance!["green"]).unwrap(), Value::nominal("x"));
    }

    #[test]
    fn contradictory_data_ends_in_majority_leaves() {
        let mut tree = Id3::new(boolean_signature(), &ClassifierConfig::new()).unwrap();
        tree.train(&[
            instance!["0", "0", "t"],
            instance!["0", "0", "f"],
            instance!["0", "0", "f"],
        ])
        .unwrap();
        assert_eq!(tree.classify(&instance!["0", "0"]).unwrap(), Value::nominal("f"));
    }

    #[test]
    fn numeric_features_are_never_split_on() {
        let s = Signature::with_class_last(vec![
            Feature::numeric("x"),
            Feature::nominal("class", ["lo", "hi"]).unwrap(),
        ])
        .unwrap();
        let mut tree = Id3::new(s, &ClassifierConfig::new()).unwrap();
        tree.train(&[instance![1.0, "lo"], instance![9.0, "hi"], instance![8.0, "hi"]])
            .unwrap();
        assert_eq!(tree.root(), Some(&Id3Node::Leaf { label: 1 }));
    }

    #[test]
    fn rejects_bad_input() {
        let mut tree = Id3::new(boolean_signature(), &ClassifierConfig::new()).unwrap();
        assert!(matches!(tree.train(&[]), Err(MlError::InvalidParameter(_))));
        assert!(matches!(
            tree.classify(&instance!["0", "1"]),
            Err(MlError::InvalidState(_))
        ));
        assert!(matches!(
            tree.train(&[instance!["0", "1", "t"], instance!["0", "1"]]),
            Err(MlError::IncompatibleInstance(_))
        ));
        assert!(matches!(
            tree.train(&[instance!["0", "9", "t"]]),
            Err(MlError::IncompatibleInstance(_))
        ));
        assert!(!tree.is_trained());

        let numeric_class =
            Signature::with_class_last(vec![Feature::numeric("x"), Feature::numeric("y")]).unwrap();
        assert!(matches!(
            Id3::new(numeric_class, &ClassifierConfig::new()),
            Err(MlError::IncompatibleFeatureType(_))
        ));
    }

    #[test]
    fn missing_split_value_cannot_be_classified() {
        let mut tree = Id3::new(boolean_signature(), &ClassifierConfig::new()).unwrap();
        tree.train(&truth_table(|a, b| a && b)).unwrap();
        assert!(matches!(
            tree.classify(&instance![Value::Missing, "1"]),
            Err(MlError::IncompatibleInstance(_))
        ));
    }

    #[test]
    fn retraining_replaces_the_tree() {
        let mut tree = Id3::new(boolean_signature(), &ClassifierConfig::new()).unwrap();
        tree.train(&truth_table(|a, b| a && b)).unwrap();
        tree.train(&[instance!["1", "1", "f"]]).unwrap();
        assert_eq!(tree.root(), Some(&Id3Node::Leaf { label: 0 }));
    }

    #[test]
    fn classify_is_idempotent() {
        let untrained = Id3::new(boolean_signature(), &ClassifierConfig::new()).unwrap();
        for _ in 0..3 {
            assert!(matches!(
                untrained.classify(&instance!["1", "0"]),
                Err(MlError::InvalidState(_))
            ));
        }
        assert!(untrained.root().is_none());

        let mut tree = Id3::new(fixtures::play_tennis_signature(), &ClassifierConfig::new()).unwrap();
        tree.train(&fixtures::play_tennis_instances()).unwrap();
        let before = tree.root().cloned();
        let query = instance!["sunny", "mild", "normal", "FALSE"];
        let first = tree.classify(&query).unwrap();
        for _ in 0..3 {
            assert_eq!(tree.classify(&query).unwrap(), first);
        }
        assert_eq!(tree.root().cloned(), before);
    }
}
