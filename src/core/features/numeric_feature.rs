use crate::utils::file_parsing::quote_if_needed;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericFeature {
    pub name: String,
}

impl NumericFeature {
    pub fn new<S: Into<String>>(name: S) -> NumericFeature {
        NumericFeature { name: name.into() }
    }

    pub fn arff_representation(&self) -> String {
        format!("@attribute {} numeric", quote_if_needed(&self.name))
    }
}
