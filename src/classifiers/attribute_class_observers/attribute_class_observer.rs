/// Per-class statistics of one feature, as kept by Naive Bayes.
///
/// Nominal observers receive the category index as `att_val`; numeric
/// observers receive the raw value. Missing values never reach an observer.
pub trait AttributeClassObserver {
    fn observe_attribute_class(&mut self, att_val: f64, class_val: usize);

    /// Likelihood factor of `att_val` under `class_val`.
    fn probability_of_attribute_value_given_class(
        &self,
        att_val: f64,
        class_val: usize,
        laplace_smoothing: bool,
    ) -> f64;

    /// Statistics of one class rendered as a comma-separated list.
    fn describe_class(&self, class_val: usize) -> String;
}
