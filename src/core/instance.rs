use crate::core::values::Value;
use serde::{Deserialize, Serialize};

/// One data point. Its meaning is defined by the signature it is used with:
/// a labelled instance carries a value for every feature, an unlabelled one
/// omits the class slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Instance {
    values: Vec<Value>,
}

impl Instance {
    pub fn new(values: Vec<Value>) -> Instance {
        Instance { values }
    }

    pub fn with_capacity(n: usize) -> Instance {
        Instance {
            values: Vec::with_capacity(n),
        }
    }

    pub fn push(&mut self, value: Value) {
        self.values.push(value);
    }

    pub fn value_at(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn set_value_at(&mut self, index: usize, value: Value) -> Option<Value> {
        let slot = self.values.get_mut(index)?;
        Some(std::mem::replace(slot, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }
}

impl From<Vec<Value>> for Instance {
    fn from(values: Vec<Value>) -> Self {
        Instance { values }
    }
}

impl FromIterator<Value> for Instance {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Instance {
            values: iter.into_iter().collect(),
        }
    }
}

/// Builds an instance from a list of heterogeneous values.
#[macro_export]
macro_rules! instance {
    ($($v:expr),* $(,)?) => {
        $crate::core::Instance::new(vec![$($crate::core::Value::from($v)),*])
    };
}
