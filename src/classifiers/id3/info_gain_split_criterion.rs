use crate::classifiers::id3::split_criterion::SplitCriterion;

/// Information gain with natural-log entropy.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoGainSplitCriterion;

impl InfoGainSplitCriterion {
    pub fn new() -> Self {
        Self
    }

    pub fn compute_entropy(&self, distribution: &[f64]) -> f64 {
        let total: f64 = distribution.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let mut entropy = 0.0;
        for &count in distribution {
            if count > 0.0 {
                let p = count / total;
                entropy -= p * p.ln();
            }
        }
        entropy
    }
}

impl SplitCriterion for InfoGainSplitCriterion {
    fn merit_of_split(&self, pre_split_distribution: &[f64], post_split_dists: &[Vec<f64>]) -> f64 {
        let total_weight: f64 = pre_split_distribution.iter().sum();
        if total_weight <= 0.0 {
            return 0.0;
        }

        let mut remainder = 0.0;
        for dist in post_split_dists {
            let weight: f64 = dist.iter().sum();
            if weight > 0.0 {
                remainder += (weight / total_weight) * self.compute_entropy(dist);
            }
        }
        self.compute_entropy(pre_split_distribution) - remainder
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-12
    }

    #[test]
    fn entropy_of_pure_and_even_distributions() {
        let c = InfoGainSplitCriterion::new();
        assert!(approx_eq(c.compute_entropy(&[4.0, 0.0]), 0.0));
        assert!(approx_eq(c.compute_entropy(&[2.0, 2.0]), std::f64::consts::LN_2));
        assert!(approx_eq(c.compute_entropy(&[0.0, 0.0]), 0.0));
    }

    #[test]
    fn perfect_split_gains_the_full_entropy() {
        let c = InfoGainSplitCriterion::new();
        let gain = c.merit_of_split(&[2.0, 2.0], &[vec![2.0, 0.0], vec![0.0, 2.0]]);
        assert!(approx_eq(gain, std::f64::consts::LN_2));
    }

    #[test]
    fn uninformative_split_gains_nothing() {
        let c = InfoGainSplitCriterion::new();
        let gain = c.merit_of_split(&[2.0, 2.0], &[vec![1.0, 1.0], vec![1.0, 1.0]]);
        assert!(approx_eq(gain, 0.0));
    }

    #[test]
    fn play_tennis_outlook_gain() {
        // 9 yes / 5 no; sunny 2/3, overcast 4/0, rainy 3/2
        let c = InfoGainSplitCriterion::new();
        let gain = c.merit_of_split(
            &[9.0, 5.0],
            &[vec![2.0, 3.0], vec![4.0, 0.0], vec![3.0, 2.0]],
        );
        // 0.2467 bits expressed in nats
        assert!((gain - 0.246_749_819 * std::f64::consts::LN_2).abs() < 1e-6);
    }
}
