use crate::core::map_provider::MapProvider;
use crate::core::rules::{AnswerGroup, Rule};
use crate::domain::model::{Coordinate, GradeReport, Submission};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn rule_set_name(&self) -> &str;
    fn input_path(&self) -> &str;
    fn input_format(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn map_provider(&self) -> MapProvider;
    fn answer_groups(&self) -> Result<Vec<AnswerGroup>>;
}

/// Decides whether a single rule holds for an answer.
pub trait RuleEvaluator: Send + Sync {
    fn evaluate(&self, rule: &Rule, answer: &Coordinate) -> Result<bool>;
}

#[async_trait]
pub trait GradingPipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<Submission>>;
    async fn grade(&self, submissions: Vec<Submission>) -> Result<GradeReport>;
    async fn load(&self, report: GradeReport) -> Result<String>;
}
