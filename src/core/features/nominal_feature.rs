use crate::core::errors::{MlError, Result};
use crate::utils::file_parsing::quote_if_needed;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A categorical feature with a fixed, ordered set of unique categories.
///
/// The category list never changes after construction; the inverse map is
/// rebuilt from it on deserialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "NominalFeatureRepr", into = "NominalFeatureRepr")]
pub struct NominalFeature {
    name: String,
    categories: Vec<String>,
    category_to_index: HashMap<String, usize>,
}

#[derive(Serialize, Deserialize)]
struct NominalFeatureRepr {
    name: String,
    categories: Vec<String>,
}

impl NominalFeature {
    pub fn new<S, I, C>(name: S, categories: I) -> Result<NominalFeature>
    where
        S: Into<String>,
        I: IntoIterator<Item = C>,
        C: Into<String>,
    {
        let name = name.into();
        let categories: Vec<String> = categories.into_iter().map(Into::into).collect();
        if categories.is_empty() {
            return Err(MlError::invalid_parameter(format!(
                "nominal feature '{name}' needs at least one category"
            )));
        }

        let mut category_to_index = HashMap::with_capacity(categories.len());
        for (i, c) in categories.iter().enumerate() {
            if category_to_index.insert(c.clone(), i).is_some() {
                return Err(MlError::invalid_parameter(format!(
                    "nominal feature '{name}' lists category '{c}' twice"
                )));
            }
        }

        Ok(NominalFeature {
            name,
            categories,
            category_to_index,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    pub fn number_of_categories(&self) -> usize {
        self.categories.len()
    }

    pub fn index_of_category(&self, category: &str) -> Option<usize> {
        self.category_to_index.get(category).copied()
    }

    pub fn category_of_index(&self, index: usize) -> Option<&str> {
        self.categories.get(index).map(String::as_str)
    }

    pub fn enumerate_categories(&self) -> impl Iterator<Item = (usize, &String)> {
        self.categories.iter().enumerate()
    }

    pub fn arff_representation(&self) -> String {
        let categories: Vec<_> = self.categories.iter().map(|c| quote_if_needed(c)).collect();
        format!("@attribute {} {{{}}}", quote_if_needed(&self.name), categories.join(","))
    }
}

impl PartialEq for NominalFeature {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.categories == other.categories
    }
}

impl TryFrom<NominalFeatureRepr> for NominalFeature {
    type Error = MlError;

    fn try_from(repr: NominalFeatureRepr) -> Result<Self> {
        NominalFeature::new(repr.name, repr.categories)
    }
}

impl From<NominalFeature> for NominalFeatureRepr {
    fn from(feature: NominalFeature) -> Self {
        NominalFeatureRepr {
            name: feature.name,
            categories: feature.categories,
        }
    }
}
