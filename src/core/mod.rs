pub mod errors;
pub mod estimators;
pub mod features;
pub mod instance;
pub mod signature;
pub mod values;

pub use errors::{MlError, Result};
pub use features::{Feature, FeatureKind, NominalFeature, NumericFeature};
pub use instance::Instance;
pub use signature::Signature;
pub use values::{Payload, Value, ValueKind};
