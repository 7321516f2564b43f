mod classifier_registry;

pub use classifier_registry::ClassifierRegistry;
