/// Scores a candidate partition of a node's class distribution.
pub trait SplitCriterion {
    /// `post_split_dists` holds one class distribution per branch; their
    /// weights add up to the weight of `pre_split_distribution`.
    fn merit_of_split(&self, pre_split_distribution: &[f64], post_split_dists: &[Vec<f64>]) -> f64;
}
