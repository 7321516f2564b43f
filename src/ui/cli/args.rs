use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueHint};
use serde_json::Value;

use crate::classifiers::{ClassifierConfig, ClassifierType};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Train, evaluate and apply mltoolkit classifiers on ARFF data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train a classifier and report its performance
    Evaluate(EvaluateArgs),
    /// Label instances with a classifier from a saved registry
    Predict(PredictArgs),
    /// List classifier kinds with their codes and parameter schemas
    Describe(DescribeArgs),
}

#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Classifier kind (e.g. zero-r, naive-bayes, id3, density-clustering, 1003)
    #[arg(long, value_name = "KIND")]
    pub classifier: String,

    /// ARFF file with the training data
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub train: PathBuf,

    /// ARFF file with separate test data
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath, conflicts_with = "holdout")]
    pub test: Option<PathBuf>,

    /// Fraction of the training data held out for testing
    #[arg(long, value_name = "FRACTION")]
    pub holdout: Option<f64>,

    /// Seed for the holdout shuffle
    #[arg(long, default_value_t = 1, value_name = "N")]
    pub seed: u64,

    /// Index of the class attribute (default: last)
    #[arg(long, value_name = "N")]
    pub class_index: Option<usize>,

    /// Test-then-train over the training data (online kinds only)
    #[arg(long, conflicts_with_all = ["test", "holdout"])]
    pub prequential: bool,

    /// Report prequential metrics every N instances
    #[arg(
        long,
        default_value_t = 100,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub sample_frequency: u64,

    /// Classifier parameter (e.g. maxClusterDistance=250)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub params: Vec<KeyValue>,

    /// Registry file to store the trained classifier in
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath, requires = "name")]
    pub save: Option<PathBuf>,

    /// Name of the classifier inside the registry
    #[arg(long, value_name = "NAME", requires = "save")]
    pub name: Option<String>,

    /// Print the learned model
    #[arg(long)]
    pub info: bool,
}

#[derive(Debug, Args)]
pub struct PredictArgs {
    /// Registry file written by `evaluate --save`
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub registry: PathBuf,

    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// ARFF file whose rows are labelled; class column values are ignored
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub data: PathBuf,

    #[arg(long, value_name = "N")]
    pub class_index: Option<usize>,
}

#[derive(Debug, Args)]
pub struct DescribeArgs {
    /// Only describe this kind
    #[arg(long, value_name = "KIND")]
    pub classifier: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    pub key: String,
    pub value: Value,
}

impl EvaluateArgs {
    pub fn classifier_type(&self) -> Result<ClassifierType> {
        parse_classifier_type(&self.classifier)
    }

    pub fn config(&self) -> ClassifierConfig {
        let mut config = ClassifierConfig::new();
        for kv in &self.params {
            config.add_param(kv.key.clone(), kv.value.clone());
        }
        config
    }
}

impl DescribeArgs {
    pub fn classifier_type(&self) -> Result<Option<ClassifierType>> {
        self.classifier.as_deref().map(parse_classifier_type).transpose()
    }
}

/// Accepts kebab-case names, CamelCase, snake_case or the numeric code.
pub fn parse_classifier_type(raw: &str) -> Result<ClassifierType> {
    if let Ok(code) = raw.trim().parse::<i32>() {
        return ClassifierType::from_code(code).with_context(|| format!("invalid classifier '{raw}'"));
    }
    for cand in candidate_spellings(raw) {
        if let Ok(parsed) = cand.parse::<ClassifierType>() {
            return Ok(parsed);
        }
    }
    Err(anyhow!("unknown classifier '{raw}'"))
}

fn candidate_spellings(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return out;
    }

    out.push(trimmed.to_string());
    out.push(trimmed.to_lowercase());
    out.push(kebab_from_token(trimmed));
    out.push(trimmed.to_lowercase().replace('_', "-"));
    out.sort();
    out.dedup();
    out
}

fn kebab_from_token(token: &str) -> String {
    let mut buf = String::new();
    let mut prev_lower = false;
    for ch in token.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                buf.push('-');
            }
            buf.extend(ch.to_lowercase());
            prev_lower = false;
        } else if ch == '_' {
            buf.push('-');
            prev_lower = false;
        } else {
            buf.push(ch);
            prev_lower = ch.is_lowercase();
        }
    }
    buf
}

fn parse_key_value(raw: &str) -> Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    Ok(KeyValue {
        key: key.to_string(),
        value: parse_literal(value.trim()),
    })
}

/// JSON literal when it parses as one, plain string otherwise.
fn parse_literal(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
