pub mod geodesic;
pub mod grader;
pub mod map_provider;
pub mod rules;

pub use crate::domain::model::{Coordinate, GradeReport, GradedAnswer, Outcome, Submission};
pub use crate::domain::ports::{ConfigProvider, GradingPipeline, RuleEvaluator, Storage};
pub use crate::utils::error::Result;
