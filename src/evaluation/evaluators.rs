use crate::core::errors::{MlError, Result};
use crate::core::{Feature, NominalFeature, Signature, Value};
use crate::evaluation::Snapshot;
use std::collections::BTreeMap;

/// Accumulates (true class, predicted class) pairs.
pub trait PerformanceEvaluator {
    /// Records one prediction. Pairs whose true class is missing are skipped.
    fn add_result(&mut self, truth: &Value, predicted: &Value) -> Result<()>;

    fn instances_seen(&self) -> u64;

    fn snapshot(&self, seconds: f64) -> Snapshot;
}

/// Evaluator matching the kind of the signature's class feature.
pub fn evaluator_for(signature: &Signature) -> Box<dyn PerformanceEvaluator> {
    match signature.class_feature() {
        Feature::Nominal(class) => Box::new(ClassificationEvaluator::new(class.clone())),
        Feature::Numeric(_) => Box::new(RegressionEvaluator::new()),
    }
}

/// Accuracy and Cohen's kappa from a confusion matrix.
#[derive(Debug, Clone)]
pub struct ClassificationEvaluator {
    class: NominalFeature,
    /// `[true][predicted]` counts.
    confusion: Vec<Vec<u64>>,
    seen: u64,
    correct: u64,
}

impl ClassificationEvaluator {
    pub fn new(class: NominalFeature) -> Self {
        let k = class.number_of_categories();
        Self {
            class,
            confusion: vec![vec![0; k]; k],
            seen: 0,
            correct: 0,
        }
    }

    fn category_index(&self, value: &Value) -> Result<usize> {
        value
            .as_nominal()
            .and_then(|c| self.class.index_of_category(c))
            .ok_or_else(|| {
                MlError::incompatible_instance(format!(
                    "'{value}' is not a category of '{}'",
                    self.class.name()
                ))
            })
    }

    pub fn confusion_matrix(&self) -> &[Vec<u64>] {
        &self.confusion
    }

    pub fn accuracy(&self) -> f64 {
        if self.seen == 0 {
            f64::NAN
        } else {
            self.correct as f64 / self.seen as f64
        }
    }

    /// `(p0 - pc) / (1 - pc)`; zero when nothing was seen or chance
    /// agreement is already perfect.
    pub fn kappa(&self) -> f64 {
        if self.seen == 0 {
            return 0.0;
        }
        let n = self.seen as f64;
        let k = self.confusion.len();
        let mut pc = 0.0;
        for i in 0..k {
            let row: u64 = self.confusion[i].iter().sum();
            let col: u64 = self.confusion.iter().map(|r| r[i]).sum();
            pc += (row as f64 / n) * (col as f64 / n);
        }
        if pc >= 1.0 {
            return 0.0;
        }
        (self.accuracy() - pc) / (1.0 - pc)
    }
}

impl PerformanceEvaluator for ClassificationEvaluator {
    fn add_result(&mut self, truth: &Value, predicted: &Value) -> Result<()> {
        if truth.is_missing() {
            return Ok(());
        }
        let t = self.category_index(truth)?;
        let p = self.category_index(predicted)?;
        self.confusion[t][p] += 1;
        self.seen += 1;
        if t == p {
            self.correct += 1;
        }
        Ok(())
    }

    fn instances_seen(&self) -> u64 {
        self.seen
    }

    fn snapshot(&self, seconds: f64) -> Snapshot {
        Snapshot {
            instances_seen: self.seen,
            accuracy: self.accuracy(),
            kappa: self.kappa(),
            seconds,
            extras: BTreeMap::new(),
        }
    }
}

/// Mean absolute and root mean squared error of numeric predictions.
#[derive(Debug, Clone, Default)]
pub struct RegressionEvaluator {
    seen: u64,
    sum_abs_error: f64,
    sum_sq_error: f64,
}

impl RegressionEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mean_absolute_error(&self) -> f64 {
        if self.seen == 0 {
            f64::NAN
        } else {
            self.sum_abs_error / self.seen as f64
        }
    }

    pub fn root_mean_squared_error(&self) -> f64 {
        if self.seen == 0 {
            f64::NAN
        } else {
            (self.sum_sq_error / self.seen as f64).sqrt()
        }
    }
}

impl PerformanceEvaluator for RegressionEvaluator {
    fn add_result(&mut self, truth: &Value, predicted: &Value) -> Result<()> {
        let Some(t) = truth.as_numeric() else {
            if truth.is_missing() {
                return Ok(());
            }
            return Err(MlError::incompatible_instance(format!(
                "numeric class value expected, got '{truth}'"
            )));
        };
        let p = predicted.as_numeric().ok_or_else(|| {
            MlError::incompatible_instance(format!("numeric prediction expected, got '{predicted}'"))
        })?;
        let e = t - p;
        self.sum_abs_error += e.abs();
        self.sum_sq_error += e * e;
        self.seen += 1;
        Ok(())
    }

    fn instances_seen(&self) -> u64 {
        self.seen
    }

    fn snapshot(&self, seconds: f64) -> Snapshot {
        let mut extras = BTreeMap::new();
        extras.insert("mae".to_string(), self.mean_absolute_error());
        extras.insert("rmse".to_string(), self.root_mean_squared_error());
        Snapshot {
            instances_seen: self.seen,
            accuracy: f64::NAN,
            kappa: f64::NAN,
            seconds,
            extras,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yes_no() -> NominalFeature {
        NominalFeature::new("play", ["yes", "no"]).unwrap()
    }

    fn v(s: &str) -> Value {
        Value::nominal(s)
    }

    #[test]
    fn empty_classification_metrics() {
        let e = ClassificationEvaluator::new(yes_no());
        assert!(e.accuracy().is_nan());
        assert_eq!(e.kappa(), 0.0);
        assert_eq!(e.instances_seen(), 0);
    }

    #[test]
    fn accuracy_and_kappa() {
        let mut e = ClassificationEvaluator::new(yes_no());
        for (t, p) in [("yes", "yes"), ("yes", "no"), ("no", "no"), ("no", "no")] {
            e.add_result(&v(t), &v(p)).unwrap();
        }
        assert_eq!(e.accuracy(), 0.75);
        // pc = 0.5 * 0.25 + 0.5 * 0.75 = 0.5
        assert!((e.kappa() - 0.5).abs() < 1e-12);
        assert_eq!(e.confusion_matrix(), &[vec![1u64, 1], vec![0u64, 2]]);
    }

    #[test]
    fn perfect_agreement_on_one_class_has_zero_kappa() {
        let mut e = ClassificationEvaluator::new(yes_no());
        e.add_result(&v("yes"), &v("yes")).unwrap();
        e.add_result(&v("yes"), &v("yes")).unwrap();
        assert_eq!(e.accuracy(), 1.0);
        assert_eq!(e.kappa(), 0.0);
    }

    #[test]
    fn missing_truth_is_skipped_unknown_labels_fail() {
        let mut e = ClassificationEvaluator::new(yes_no());
        e.add_result(&Value::Missing, &v("yes")).unwrap();
        assert_eq!(e.instances_seen(), 0);
        assert!(matches!(
            e.add_result(&v("maybe"), &v("yes")),
            Err(MlError::IncompatibleInstance(_))
        ));
    }

    #[test]
    fn regression_errors() {
        let mut e = RegressionEvaluator::new();
        e.add_result(&Value::numeric(1.0), &Value::numeric(2.0)).unwrap();
        e.add_result(&Value::numeric(3.0), &Value::numeric(0.0)).unwrap();
        e.add_result(&Value::Missing, &Value::numeric(0.0)).unwrap();
        let s = e.snapshot(0.0);
        assert_eq!(s.instances_seen, 2);
        assert_eq!(s.extra("mae"), Some(2.0));
        assert!((s.extra("rmse").unwrap() - 5.0f64.sqrt()).abs() < 1e-12);
        assert!(s.accuracy.is_nan());
    }

    #[test]
    fn evaluator_follows_class_kind() {
        let nominal = Signature::with_class_last(vec![Feature::Nominal(yes_no())]).unwrap();
        let mut e = evaluator_for(&nominal);
        e.add_result(&v("yes"), &v("yes")).unwrap();
        assert_eq!(e.snapshot(0.0).accuracy, 1.0);

        let numeric = Signature::with_class_last(vec![Feature::numeric("y")]).unwrap();
        let mut e = evaluator_for(&numeric);
        e.add_result(&Value::numeric(1.0), &Value::numeric(1.5)).unwrap();
        assert_eq!(e.snapshot(0.0).extra("mae"), Some(0.5));
    }
}
