pub mod config;
pub mod group;
pub mod grouper;
pub mod normalize;
pub mod ordering;
pub mod similarity;

pub use config::ThreadingConfig;
pub use group::{GroupingOutcome, RecordError, ThreadGroup};
pub use grouper::group_readings;
pub use normalize::{clean_question_text, normalize_question, NormalizedQuestion};
pub use ordering::order_groups;
pub use similarity::jaccard_similarity;
