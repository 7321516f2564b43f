use crate::classifiers::OnlineClassifier;
use crate::core::errors::{MlError, Result};
use crate::core::{Instance, Value};
use crate::evaluation::{PerformanceEvaluator, Snapshot, evaluator_for};
use cpu_time::ThreadTime;
use log::{debug, trace};

/// Test-then-train evaluation of an online classifier: every instance is
/// first classified, scored, and only then used for an update.
pub struct PrequentialEvaluator<'a> {
    learner: &'a dyn OnlineClassifier,
    evaluator: Box<dyn PerformanceEvaluator>,

    curve: Vec<Snapshot>,

    max_instances: Option<u64>,
    sample_frequency: u64,

    processed: u64,
    start_cpu: ThreadTime,
}

impl<'a> PrequentialEvaluator<'a> {
    pub fn new(
        learner: &'a dyn OnlineClassifier,
        max_instances: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self> {
        if sample_frequency == 0 {
            return Err(MlError::invalid_parameter("sample_frequency must be > 0"));
        }
        Ok(Self {
            learner,
            evaluator: evaluator_for(learner.signature()),
            curve: Vec::new(),
            max_instances,
            sample_frequency,
            processed: 0,
            start_cpu: ThreadTime::now(),
        })
    }

    pub fn run(&mut self, instances: &[Instance]) -> Result<()> {
        self.start_cpu = ThreadTime::now();
        let signature = self.learner.signature().clone();

        for labelled in instances {
            if self.max_instances.is_some_and(|n| self.processed >= n) {
                break;
            }
            signature.ensure_compliance(labelled, true)?;
            self.processed += 1;

            let truth = signature.class_value(labelled).cloned().unwrap_or(Value::Missing);
            match self.learner.classify(&signature.unlabelled(labelled)) {
                Ok(predicted) => self.evaluator.add_result(&truth, &predicted)?,
                // nothing to predict from yet
                Err(MlError::InvalidState(msg)) => trace!("prequential: no prediction ({msg})"),
                Err(e) => return Err(e),
            }
            self.learner.update(labelled)?;

            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        self.push_snapshot();
        debug!(
            "prequential: {} instances, {} snapshots",
            self.processed,
            self.curve.len()
        );
        Ok(())
    }

    pub fn curve(&self) -> &[Snapshot] {
        &self.curve
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.curve.last()
    }

    fn push_snapshot(&mut self) {
        let mut snapshot = self.evaluator.snapshot(self.start_cpu.elapsed().as_secs_f64());
        // count every processed instance, scored or not
        snapshot.instances_seen = self.processed;
        self.curve.push(snapshot);
    }
}
