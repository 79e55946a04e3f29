pub mod classifier;
pub mod merger;

pub use classifier::BucketClassifier;
pub use merger::RecordMerger;
