use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Running normal estimate of a numeric feature: count, mean and the sum
/// of squared deviations (`m2`), updated with Welford's recurrence.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GaussianEstimator {
    count: f64,
    mean: f64,
    m2: f64,
}

impl GaussianEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_observation(&mut self, value: f64) {
        if value.is_infinite() || value.is_nan() {
            return;
        }
        self.count += 1.0;
        let delta = value - self.mean;
        self.mean += delta / self.count;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> f64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.mean * self.count
    }

    pub fn sum_of_squares(&self) -> f64 {
        self.m2 + self.count * self.mean * self.mean
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Population variance.
    pub fn variance(&self) -> f64 {
        if self.count > 0.0 {
            (self.m2 / self.count).max(0.0)
        } else {
            0.0
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Spread below which the estimate counts as a single point.
    fn degenerate_tolerance(&self) -> f64 {
        f64::EPSILON * self.mean.abs().max(1.0)
    }

    /// Normal density at `value`. A degenerate (zero-spread) estimate is a
    /// spike whose density is capped to `1` at the mean and is `0` elsewhere.
    pub fn probability_density(&self, value: f64) -> f64 {
        if self.count <= 0.0 {
            return 0.0;
        }
        let std_dev = self.std_dev();
        let diff = value - self.mean;
        let tolerance = self.degenerate_tolerance();
        if std_dev <= tolerance {
            return if diff.abs() <= tolerance { 1.0 } else { 0.0 };
        }
        (1.0 / ((2.0 * PI).sqrt() * std_dev)) * ((-diff * diff) / (2.0 * std_dev * std_dev)).exp()
    }
}
