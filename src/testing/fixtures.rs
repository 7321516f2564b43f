//! Small datasets shared by unit tests.

use crate::core::{Feature, Instance, Signature, Value};
use crate::instance;

/// Quinlan's weather data: outlook, temperature, humidity, windy -> play.
pub fn play_tennis_signature() -> Signature {
    Signature::with_class_last(vec![
        nominal("outlook", &["sunny", "overcast", "rainy"]),
        nominal("temperature", &["hot", "mild", "cool"]),
        nominal("humidity", &["high", "normal"]),
        nominal("windy", &["TRUE", "FALSE"]),
        nominal("play", &["yes", "no"]),
    ])
    .expect("valid signature")
}

pub fn play_tennis_instances() -> Vec<Instance> {
    vec![
        instance!["sunny", "hot", "high", "FALSE", "no"],
        instance!["sunny", "hot", "high", "TRUE", "no"],
        instance!["overcast", "hot", "high", "FALSE", "yes"],
        instance!["rainy", "mild", "high", "FALSE", "yes"],
        instance!["rainy", "cool", "normal", "FALSE", "yes"],
        instance!["rainy", "cool", "normal", "TRUE", "no"],
        instance!["overcast", "cool", "normal", "TRUE", "yes"],
        instance!["sunny", "mild", "high", "FALSE", "no"],
        instance!["sunny", "cool", "normal", "FALSE", "yes"],
        instance!["rainy", "mild", "normal", "FALSE", "yes"],
        instance!["sunny", "mild", "normal", "TRUE", "yes"],
        instance!["overcast", "mild", "high", "TRUE", "yes"],
        instance!["overcast", "hot", "normal", "FALSE", "yes"],
        instance!["rainy", "mild", "high", "TRUE", "no"],
    ]
}

/// The concept behind the weather data, applied to an unlabelled instance.
pub fn play_tennis_rule(instance: &Instance) -> Value {
    let at = |i: usize| instance.value_at(i).and_then(Value::as_nominal);
    let play = match at(0) {
        Some("overcast") => true,
        Some("sunny") => at(2) == Some("normal"),
        _ => at(3) == Some("FALSE"),
    };
    Value::nominal(if play { "yes" } else { "no" })
}

/// A numeric counter `n` labelled by its parity.
pub fn parity_signature() -> Signature {
    Signature::with_class_last(vec![Feature::numeric("n"), nominal("parity", &["even", "odd"])])
        .expect("valid signature")
}

pub fn parity_instance(n: usize) -> Instance {
    instance![n as f64, if n % 2 == 0 { "even" } else { "odd" }]
}

pub fn parity_rule(instance: &Instance) -> Value {
    let n = instance.value_at(0).and_then(Value::as_numeric).unwrap_or(0.0) as i64;
    Value::nominal(if n % 2 == 0 { "even" } else { "odd" })
}

/// `x` is ignored; `y` is the numeric target 1, 2, 3.
pub fn numeric_target_signature() -> Signature {
    Signature::with_class_last(vec![Feature::numeric("x"), Feature::numeric("y")])
        .expect("valid signature")
}

pub fn numeric_target_instances() -> Vec<Instance> {
    vec![instance![0.0, 1.0], instance![0.0, 2.0], instance![0.0, 3.0]]
}

fn nominal(name: &str, categories: &[&str]) -> Feature {
    Feature::nominal(name, categories.iter().copied()).expect("valid nominal feature")
}
