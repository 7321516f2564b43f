use crate::core::errors::{MlError, Result};
use crate::core::{Feature, Instance, Signature, Value};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// A node of an ID3 tree. `label` is a class category index; a split has
/// one child per category of its feature, in category order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum Id3Node {
    Leaf {
        label: usize,
    },
    Split {
        feature_index: usize,
        children: Vec<Id3Node>,
    },
}

impl Id3Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Id3Node::Leaf { .. })
    }

    /// Number of split levels on the longest path; a lone leaf has depth 0.
    pub fn depth(&self) -> usize {
        match self {
            Id3Node::Leaf { .. } => 0,
            Id3Node::Split { children, .. } => {
                1 + children.iter().map(Id3Node::depth).max().unwrap_or(0)
            }
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            Id3Node::Leaf { .. } => 1,
            Id3Node::Split { children, .. } => children.iter().map(Id3Node::leaf_count).sum(),
        }
    }

    /// Walks an unlabelled instance down to a leaf and returns its label.
    pub fn sort_instance(&self, signature: &Signature, instance: &Instance) -> Result<usize> {
        let mut node = self;
        loop {
            match node {
                Id3Node::Leaf { label } => return Ok(*label),
                Id3Node::Split {
                    feature_index,
                    children,
                } => {
                    let branch = Self::branch_for_instance(signature, *feature_index, instance)?;
                    node = children.get(branch).ok_or_else(|| {
                        MlError::invalid_state(format!("split has no child for branch {branch}"))
                    })?;
                }
            }
        }
    }

    fn branch_for_instance(
        signature: &Signature,
        feature_index: usize,
        instance: &Instance,
    ) -> Result<usize> {
        let feature = signature
            .feature_at_index(feature_index)
            .and_then(Feature::as_nominal)
            .ok_or_else(|| {
                MlError::invalid_state(format!("split feature {feature_index} is not nominal"))
            })?;
        match signature.value_of(instance, feature_index, false) {
            Some(Value::Nominal(category)) => feature.index_of_category(category).ok_or_else(|| {
                MlError::incompatible_instance(format!(
                    "unknown category '{category}' for feature '{}'",
                    feature.name()
                ))
            }),
            _ => Err(MlError::incompatible_instance(format!(
                "no value for split feature '{}'",
                feature.name()
            ))),
        }
    }

    /// Checks that every index in the subtree is valid for `signature`.
    pub fn check_consistency(&self, signature: &Signature) -> Result<()> {
        match self {
            Id3Node::Leaf { label } => {
                if *label < signature.number_of_classes() {
                    Ok(())
                } else {
                    Err(MlError::invalid_state(format!("leaf label {label} out of range")))
                }
            }
            Id3Node::Split {
                feature_index,
                children,
            } => {
                let arity = signature
                    .feature_at_index(*feature_index)
                    .filter(|_| *feature_index != signature.class_index())
                    .and_then(Feature::as_nominal)
                    .map(|f| f.number_of_categories());
                if arity != Some(children.len()) {
                    return Err(MlError::invalid_state(format!(
                        "split on feature {feature_index} does not match the signature"
                    )));
                }
                children
                    .iter()
                    .try_for_each(|child| child.check_consistency(signature))
            }
        }
    }

    pub(crate) fn describe(&self, signature: &Signature, indent: usize, out: &mut String) {
        let Id3Node::Split {
            feature_index,
            children,
        } = self
        else {
            return;
        };
        let Some(feature) = signature.feature_at_index(*feature_index).and_then(Feature::as_nominal)
        else {
            return;
        };
        let class = signature.class_feature().as_nominal();

        for ((_, category), child) in feature.enumerate_categories().zip(children) {
            let _ = write!(out, "{}{} = {}", "|  ".repeat(indent), feature.name(), category);
            match child {
                Id3Node::Leaf { label } => {
                    let name = class
                        .and_then(|c| c.category_of_index(*label))
                        .unwrap_or("?");
                    let _ = writeln!(out, ": {name}");
                }
                Id3Node::Split { .. } => {
                    out.push('\n');
                    child.describe(signature, indent + 1, out);
                }
            }
        }
    }
}
