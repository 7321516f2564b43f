use crate::core::errors::{MlError, Result};
use crate::core::{Instance, Signature, Value};
use crate::streams::arff::parser::{is_comment_or_empty, parse_header, parse_instance_values};
use crate::utils::file_parsing::quote_if_needed;
use log::debug;
use std::fmt::Write;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

/// A fully loaded ARFF file: its signature and labelled instances.
#[derive(Debug, Clone)]
pub struct ArffDataset {
    relation: String,
    signature: Signature,
    instances: Vec<Instance>,
}

impl ArffDataset {
    /// Loads `path`. The class feature is the one at `class_index`, or the
    /// last declared attribute when `None`.
    pub fn from_path<P: AsRef<Path>>(path: P, class_index: Option<usize>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MlError::FileNotFound(path.to_path_buf()),
            _ => MlError::Io(e),
        })?;
        let dataset = Self::from_reader(BufReader::new(file), class_index)?;
        debug!(
            "loaded {} instances of '{}' from {}",
            dataset.len(),
            dataset.relation,
            path.display()
        );
        Ok(dataset)
    }

    pub fn from_reader<R: BufRead>(mut reader: R, class_index: Option<usize>) -> Result<Self> {
        let header = parse_header(&mut reader)?;
        let class_index = class_index.unwrap_or(header.features.len() - 1);
        let signature = Signature::new(header.features, class_index)
            .map_err(|e| MlError::malformed_data(e.to_string()))?;

        let mut instances = Vec::new();
        let mut line_no = header.lines_read;
        for line in reader.lines() {
            let line = line?;
            line_no += 1;
            if is_comment_or_empty(&line) {
                continue;
            }
            let instance = parse_instance_values(signature.features(), line.trim())
                .map_err(|e| MlError::malformed_data(format!("line {line_no}: {e}")))?;
            instances.push(instance);
        }

        Ok(Self {
            relation: header.relation,
            signature,
            instances,
        })
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    pub fn instances(&self) -> &[Instance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Every instance with its class slot removed, ready for `classify`.
    pub fn unlabelled_instances(&self) -> Vec<Instance> {
        self.instances
            .iter()
            .map(|i| self.signature.unlabelled(i))
            .collect()
    }

    pub fn into_parts(self) -> (Signature, Vec<Instance>) {
        (self.signature, self.instances)
    }

    pub fn to_arff_string(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "@relation {}", quote_if_needed(&self.relation));
        for feature in self.signature.features() {
            let _ = writeln!(out, "{}", feature.arff_representation());
        }
        out.push_str("@data\n");
        for instance in &self.instances {
            let row: Vec<String> = instance
                .iter()
                .map(|v| match v {
                    Value::Nominal(category) => quote_if_needed(category).into_owned(),
                    other => other.to_string(),
                })
                .collect();
            let _ = writeln!(out, "{}", row.join(","));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Feature, Value};
    use std::io::{Cursor, Write as _};
    use tempfile::NamedTempFile;

    const WEATHER: &str = r#"%
@relation weather
@attribute outlook {sunny, overcast, rainy}
@attribute temperature numeric
@attribute humidity numeric
@attribute windy {TRUE, FALSE}
@attribute play {yes, no}

@data
sunny,85,85,FALSE,no
sunny,80,90,TRUE,no
% a comment between rows
overcast,83,86,FALSE,yes
rainy,70,96,FALSE,yes
?,75,?,TRUE,yes
"#;

    fn write_arff(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().expect("tempfile");
        f.write_all(contents.as_bytes()).unwrap();
        f.flush().unwrap();
        f
    }

    #[test]
    fn loads_header_and_rows() {
        let tf = write_arff(WEATHER);
        let ds = ArffDataset::from_path(tf.path(), None).unwrap();
        assert_eq!(ds.relation(), "weather");
        assert_eq!(ds.signature().size(), 5);
        assert_eq!(ds.signature().class_index(), 4);
        assert_eq!(ds.len(), 5);

        assert_eq!(
            ds.instances()[0].values(),
            &[
                Value::nominal("sunny"),
                Value::numeric(85.0),
                Value::numeric(85.0),
                Value::nominal("FALSE"),
                Value::nominal("no"),
            ]
        );
        let last = &ds.instances()[4];
        assert!(last.value_at(0).unwrap().is_missing());
        assert!(last.value_at(2).unwrap().is_missing());
        assert!(ds.instances().iter().all(|i| ds.signature().check_compliance(i, true)));
    }

    #[test]
    fn explicit_class_index() {
        let ds = ArffDataset::from_reader(Cursor::new(WEATHER), Some(0)).unwrap();
        assert_eq!(ds.signature().class_feature().name(), "outlook");
        assert_eq!(ds.unlabelled_instances()[0].len(), 4);

        assert!(matches!(
            ArffDataset::from_reader(Cursor::new(WEATHER), Some(5)),
            Err(MlError::MalformedData(_))
        ));
    }

    #[test]
    fn missing_file_is_reported() {
        assert!(matches!(
            ArffDataset::from_path("no/such/file.arff", None),
            Err(MlError::FileNotFound(_))
        ));
    }

    #[test]
    fn bad_rows_name_their_line() {
        let text = "@relation r\n@attribute a numeric\n@attribute b numeric\n@data\n1,2\n1\n";
        match ArffDataset::from_reader(Cursor::new(text), None) {
            Err(MlError::MalformedData(msg)) => assert!(msg.contains("line 6"), "{msg}"),
            other => panic!("expected malformed data, got {other:?}"),
        }
    }

    #[test]
    fn header_errors_propagate() {
        let tf = write_arff("@relation r\n@attribute outlook {sunny, rainy\n@data\nsunny\n");
        assert!(matches!(
            ArffDataset::from_path(tf.path(), None),
            Err(MlError::MalformedData(_))
        ));
    }

    #[test]
    fn written_form_reloads_identically() {
        let ds = ArffDataset::from_reader(Cursor::new(WEATHER), None).unwrap();
        let text = ds.to_arff_string();
        assert!(text.contains("@attribute outlook {sunny,overcast,rainy}"));
        assert!(text.contains("@attribute temperature numeric"));

        let again = ArffDataset::from_reader(Cursor::new(text), None).unwrap();
        assert_eq!(again.signature(), ds.signature());
        assert_eq!(again.instances(), ds.instances());
        assert_eq!(
            again.signature().feature_at_index(3),
            Some(&Feature::nominal("windy", ["TRUE", "FALSE"]).unwrap())
        );
    }

    #[test]
    fn quoted_names_and_values_survive_a_rewrite() {
        let text = r"@relation 'my data'
@attribute 'wind speed' numeric
@attribute 'sky\'s colour' {blue,'light grey'}
@attribute c {'a b','x,y'}
@data
3.5,'light grey','x,y'
?,blue,'a b'
";
        let ds = ArffDataset::from_reader(Cursor::new(text), None).unwrap();
        assert_eq!(ds.relation(), "my data");
        assert_eq!(ds.signature().features()[0].name(), "wind speed");
        assert_eq!(ds.signature().features()[1].name(), "sky's colour");
        assert_eq!(
            ds.signature().features()[2],
            Feature::nominal("c", ["a b", "x,y"]).unwrap()
        );

        let written = ds.to_arff_string();
        assert!(written.starts_with("@relation 'my data'\n"), "{written}");
        assert!(written.contains("@attribute 'wind speed' numeric"), "{written}");
        assert!(written.contains("@attribute c {'a b','x,y'}"), "{written}");
        assert!(written.contains("3.5,'light grey','x,y'"), "{written}");

        let again = ArffDataset::from_reader(Cursor::new(written), None).unwrap();
        assert_eq!(again.relation(), ds.relation());
        assert_eq!(again.signature(), ds.signature());
        assert_eq!(again.instances(), ds.instances());
        assert_eq!(again.instances()[0].values()[2], Value::nominal("x,y"));
        assert_eq!(again.instances()[1].values()[0], Value::Missing);
    }
}
