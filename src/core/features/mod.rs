mod feature;
mod nominal_feature;
mod numeric_feature;

pub use feature::{Feature, FeatureKind};
pub use nominal_feature::NominalFeature;
pub use numeric_feature::NumericFeature;
