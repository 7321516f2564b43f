mod attribute_class_observer;
mod attribute_observer;
mod gaussian_numeric_attribute_class_observer;
mod nominal_attribute_class_observer;
mod null_attribute_class_observer;

pub use attribute_class_observer::AttributeClassObserver;
pub use attribute_observer::AttributeObserver;
pub use gaussian_numeric_attribute_class_observer::GaussianNumericAttributeClassObserver;
pub use nominal_attribute_class_observer::NominalAttributeClassObserver;
pub use null_attribute_class_observer::NullAttributeClassObserver;
