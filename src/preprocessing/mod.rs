//! Feature preparation: categorical encoding and train/test splitting

mod encoder;
mod split;

pub use encoder::OneHotEncoder;
pub use split::{split_features_target, train_test_split, FeatureMatrix, TrainTestSplit};
