pub mod classifiers;
pub mod core;
pub mod evaluation;
pub mod registry;
pub mod streams;
pub mod tasks;
pub mod ui;
pub mod utils;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
