use crate::classifiers::{ClassifierConfig, ClassifierModel, ClassifierType};
use crate::core::errors::{MlError, Result};
use crate::core::Signature;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Named classifiers owned by the caller.
///
/// Persisted as a JSON object mapping each name to its tagged
/// `{"type": <code>, "classifier": {...}}` record.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassifierRegistry {
    classifiers: BTreeMap<String, ClassifierModel>,
}

impl ClassifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the classifier registered as `name`, creating it first when the
    /// name is free. An existing entry is returned untouched even if `kind`,
    /// `signature` or `config` differ.
    pub fn add_classifier(
        &mut self,
        kind: ClassifierType,
        signature: Signature,
        config: &ClassifierConfig,
        name: &str,
    ) -> Result<&mut ClassifierModel> {
        match self.classifiers.entry(name.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let model = ClassifierModel::new(kind, signature, config)?;
                debug!("registry: created {kind} classifier '{name}'");
                Ok(entry.insert(model))
            }
        }
    }

    pub fn insert<M: Into<ClassifierModel>>(&mut self, name: &str, model: M) -> Result<()> {
        match self.classifiers.entry(name.to_string()) {
            Entry::Occupied(_) => Err(MlError::ClassifierExists(name.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(model.into());
                Ok(())
            }
        }
    }

    pub fn get_classifier(&self, name: &str) -> Option<&ClassifierModel> {
        self.classifiers.get(name)
    }

    pub fn get_classifier_mut(&mut self, name: &str) -> Option<&mut ClassifierModel> {
        self.classifiers.get_mut(name)
    }

    pub fn remove_classifier(&mut self, name: &str) -> Option<ClassifierModel> {
        self.classifiers.remove(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classifiers.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.classifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classifiers.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?)?;
        debug!("registry: saved {} classifiers to {}", self.len(), path.display());
        Ok(())
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MlError::FileNotFound(path.to_path_buf()),
            _ => MlError::Io(e),
        })?;
        let registry = Self::from_json(&json)?;
        debug!("registry: loaded {} classifiers from {}", registry.len(), path.display());
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::{Classifier, ZeroR};
    use crate::core::Value;
    use crate::instance;
    use crate::testing::fixtures;
    use tempfile::tempdir;

    #[test]
    fn add_is_get_or_create() {
        let mut registry = ClassifierRegistry::new();
        let cfg = ClassifierConfig::new();

        registry
            .add_classifier(ClassifierType::ZeroR, fixtures::play_tennis_signature(), &cfg, "base")
            .unwrap()
            .train(&fixtures::play_tennis_instances())
            .unwrap();

        // a second add with another kind hands back the trained ZeroR
        let again = registry
            .add_classifier(ClassifierType::Id3, fixtures::play_tennis_signature(), &cfg, "base")
            .unwrap();
        assert_eq!(again.classifier_type(), ClassifierType::ZeroR);
        assert!(again.is_trained());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn failed_creation_leaves_no_entry() {
        let mut registry = ClassifierRegistry::new();
        let result = registry.add_classifier(
            ClassifierType::BayesNet,
            fixtures::play_tennis_signature(),
            &ClassifierConfig::new(),
            "net",
        );
        assert!(matches!(result, Err(MlError::InvalidParameter(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn insert_refuses_duplicates() {
        let mut registry = ClassifierRegistry::new();
        let zero_r = ZeroR::new(fixtures::play_tennis_signature(), &ClassifierConfig::new()).unwrap();
        registry.insert("a", zero_r).unwrap();

        let other = ZeroR::new(fixtures::play_tennis_signature(), &ClassifierConfig::new()).unwrap();
        let err = registry.insert("a", other).unwrap_err();
        assert!(matches!(err, MlError::ClassifierExists(ref n) if n == "a"));
        assert_eq!(err.code(), 200);

        assert!(registry.remove_classifier("a").is_some());
        assert!(registry.get_classifier("a").is_none());
    }

    #[test]
    fn survives_a_trip_through_a_file() {
        let dir = tempdir().expect("tempdir");
        let path = dir.path().join("registry.json");

        let mut registry = ClassifierRegistry::new();
        let cfg = ClassifierConfig::new();
        for (kind, name) in [
            (ClassifierType::NaiveBayes, "nb"),
            (ClassifierType::Id3, "tree"),
        ] {
            registry
                .add_classifier(kind, fixtures::play_tennis_signature(), &cfg, name)
                .unwrap()
                .train(&fixtures::play_tennis_instances())
                .unwrap();
        }
        registry.save_to_path(&path).unwrap();

        let loaded = ClassifierRegistry::load_from_path(&path).unwrap();
        assert_eq!(loaded.names().collect::<Vec<_>>(), vec!["nb", "tree"]);

        let query = instance!["overcast", "cool", "high", "TRUE"];
        let tree = loaded.get_classifier("tree").unwrap();
        assert_eq!(tree.classify(&query).unwrap(), Value::nominal("yes"));
        assert_eq!(
            loaded.get_classifier("nb").unwrap().classify(&query).unwrap(),
            registry.get_classifier("nb").unwrap().classify(&query).unwrap()
        );
    }

    #[test]
    fn load_errors_are_classified() {
        let dir = tempdir().expect("tempdir");
        assert!(matches!(
            ClassifierRegistry::load_from_path(dir.path().join("absent.json")),
            Err(MlError::FileNotFound(_))
        ));

        let bad = dir.path().join("bad.json");
        fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            ClassifierRegistry::load_from_path(&bad),
            Err(MlError::Serialization(_))
        ));

        assert!(matches!(
            ClassifierRegistry::from_json(r#"{"x": {"type": 1002, "classifier": {}}}"#),
            Err(MlError::Serialization(_))
        ));
    }
}
