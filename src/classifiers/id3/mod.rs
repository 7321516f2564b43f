mod id3;
mod info_gain_split_criterion;
mod node;
mod split_criterion;

pub use id3::Id3;
pub use info_gain_split_criterion::InfoGainSplitCriterion;
pub use node::Id3Node;
pub use split_criterion::SplitCriterion;
