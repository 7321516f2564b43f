use crate::classifiers::Classifier;
use crate::core::errors::{MlError, Result};
use crate::core::{Instance, Value};
use crate::evaluation::{Snapshot, evaluator_for};
use cpu_time::ThreadTime;
use log::debug;
use rand::prelude::*;

/// Shuffles `instances` with a seeded generator and splits off the last
/// `test_fraction` of them as a test set.
pub fn split_holdout(
    instances: &[Instance],
    test_fraction: f64,
    seed: u64,
) -> Result<(Vec<Instance>, Vec<Instance>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(MlError::invalid_parameter(format!(
            "holdout fraction must lie in (0, 1), got {test_fraction}"
        )));
    }
    let mut shuffled = instances.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let test_len = ((shuffled.len() as f64) * test_fraction).round() as usize;
    let test = shuffled.split_off(shuffled.len() - test_len.min(shuffled.len()));
    Ok((shuffled, test))
}

/// Trains `learner` on `train`, then scores it on every labelled instance of
/// `test`. `seconds` covers both phases in CPU time.
pub fn evaluate_holdout(
    learner: &mut dyn Classifier,
    train: &[Instance],
    test: &[Instance],
) -> Result<Snapshot> {
    let start = ThreadTime::now();
    learner.train(train)?;
    debug!("holdout: trained on {} instances", train.len());

    let signature = learner.signature().clone();
    let mut evaluator = evaluator_for(&signature);
    for labelled in test {
        signature.ensure_compliance(labelled, true)?;
        let truth = signature.class_value(labelled).cloned().unwrap_or(Value::Missing);
        let predicted = learner.classify(&signature.unlabelled(labelled))?;
        evaluator.add_result(&truth, &predicted)?;
    }
    Ok(evaluator.snapshot(start.elapsed().as_secs_f64()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifiers::{ClassifierConfig, Id3, ZeroR};
    use crate::instance;
    use crate::testing::fixtures;
    use crate::testing::stubs::OracleClassifier;

    #[test]
    fn split_is_deterministic_and_complete() {
        let data = fixtures::play_tennis_instances();
        let (train_a, test_a) = split_holdout(&data, 0.3, 7).unwrap();
        let (train_b, test_b) = split_holdout(&data, 0.3, 7).unwrap();
        assert_eq!(train_a, train_b);
        assert_eq!(test_a, test_b);
        assert_eq!(test_a.len(), 4);
        assert_eq!(train_a.len() + test_a.len(), data.len());
    }

    #[test]
    fn split_rejects_bad_fractions() {
        let data = fixtures::play_tennis_instances();
        for f in [0.0, 1.0, -0.5, f64::NAN] {
            assert!(matches!(
                split_holdout(&data, f, 1),
                Err(MlError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn oracle_scores_perfectly() {
        let data = fixtures::play_tennis_instances();
        let mut oracle = OracleClassifier::new(fixtures::play_tennis_signature(), fixtures::play_tennis_rule);
        let s = evaluate_holdout(&mut oracle, &[], &data).unwrap();
        assert_eq!(s.instances_seen, 14);
        assert_eq!(s.accuracy, 1.0);
        assert!(s.kappa > 0.99);
    }

    #[test]
    fn training_set_accuracy_of_a_tree() {
        let data = fixtures::play_tennis_instances();
        let mut tree = Id3::new(fixtures::play_tennis_signature(), &ClassifierConfig::new()).unwrap();
        let s = evaluate_holdout(&mut tree, &data, &data).unwrap();
        assert_eq!(s.accuracy, 1.0);
        assert!(s.seconds >= 0.0);
    }

    #[test]
    fn numeric_targets_report_errors() {
        let data = fixtures::numeric_target_instances();
        let mut zero_r = ZeroR::new(fixtures::numeric_target_signature(), &ClassifierConfig::new()).unwrap();
        let s = evaluate_holdout(&mut zero_r, &data, &[instance![0.0, 4.0]]).unwrap();
        assert_eq!(s.extra("mae"), Some(2.0));
        assert!(s.accuracy.is_nan());
    }
}
