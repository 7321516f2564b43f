use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Performance of a classifier after `instances_seen` predictions.
/// Metrics that do not apply to the class kind are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub instances_seen: u64,
    pub accuracy: f64,
    pub kappa: f64,
    /// CPU seconds spent by the evaluating thread.
    pub seconds: f64,
    pub extras: BTreeMap<String, f64>,
}

impl Snapshot {
    #[inline]
    fn fmtv(v: f64) -> String {
        if v.is_nan() {
            "NaN".into()
        } else {
            format!("{:.6}", v)
        }
    }

    pub fn extra(&self, key: &str) -> Option<f64> {
        self.extras.get(key).copied()
    }
}

impl Display for Snapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "seen={}", self.instances_seen)?;
        if !self.accuracy.is_nan() || !self.kappa.is_nan() {
            write!(
                f,
                ", acc={}, kappa={}",
                Self::fmtv(self.accuracy),
                Self::fmtv(self.kappa)
            )?;
        }

        const ORDER: &[&str] = &["mae", "rmse"];
        for key in ORDER {
            if let Some(v) = self.extras.get(*key) {
                write!(f, ", {}={}", key, Self::fmtv(*v))?;
            }
        }
        for (k, v) in self.extras.iter() {
            if ORDER.contains(&k.as_str()) {
                continue;
            }
            write!(f, ", {}={}", k, Self::fmtv(*v))?;
        }

        write!(f, ", t={:.6}s", self.seconds)
    }
}
