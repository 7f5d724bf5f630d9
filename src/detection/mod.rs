pub mod correlation;
pub mod matcher;
pub mod region;

pub use correlation::{best_match, CorrelationPeak};
pub use matcher::{accepts, MatchResult, TemplateMatcher, MATCH_THRESHOLD};
pub use region::{SearchRegion, SEARCH_MARGIN};
