use crate::core::geodesic::GeodesicRuleEvaluator;
use crate::core::rules::classify;
use crate::core::{ConfigProvider, GradeReport, GradingPipeline, Storage, Submission};
use crate::domain::model::GradeSummary;
use crate::utils::error::{GradeError, Result};
use serde::Deserialize;
use std::path::Path;

pub const CSV_REPORT: &str = "grades.csv";
pub const JSON_REPORT: &str = "grades.json";

#[derive(Debug, Deserialize)]
struct CsvSubmission {
    learner_id: String,
    latitude: String,
    longitude: String,
}

/// Reads learner submissions, grades them against the configured answer
/// groups and writes the report in every configured format.
pub struct BatchGradingPipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) evaluator: GeodesicRuleEvaluator,
}

impl<S: Storage, C: ConfigProvider> BatchGradingPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            evaluator: GeodesicRuleEvaluator::new(),
        }
    }

    fn report_path(&self, file_name: &str) -> String {
        Path::new(self.config.output_path())
            .join(file_name)
            .to_string_lossy()
            .into_owned()
    }
}

// Numeric cells become JSON numbers; anything else stays a string so that
// decoding reports it as an invalid answer.
fn cell_to_value(cell: &str) -> serde_json::Value {
    cell.trim()
        .parse::<f64>()
        .ok()
        .and_then(serde_json::Number::from_f64)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| serde_json::Value::String(cell.to_string()))
}

pub fn parse_csv_submissions(data: &[u8]) -> Result<Vec<Submission>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut submissions = Vec::new();
    for row in reader.deserialize::<CsvSubmission>() {
        let row = row?;
        submissions.push(Submission {
            learner_id: row.learner_id,
            answer: serde_json::Value::Array(vec![
                cell_to_value(&row.latitude),
                cell_to_value(&row.longitude),
            ]),
        });
    }
    Ok(submissions)
}

pub fn parse_json_submissions(data: &[u8]) -> Result<Vec<Submission>> {
    Ok(serde_json::from_slice(data)?)
}

pub fn render_csv_report(report: &GradeReport) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "learner_id",
        "latitude",
        "longitude",
        "display",
        "status",
        "group_id",
        "feedback",
        "distance_km",
        "reason",
    ])?;

    for graded in &report.answers {
        let (group_id, feedback, reason) = match &graded.outcome {
            crate::core::Outcome::Matched { group_id, feedback } => (
                group_id.clone(),
                feedback.clone().unwrap_or_default(),
                String::new(),
            ),
            crate::core::Outcome::Default => (String::new(), String::new(), String::new()),
            crate::core::Outcome::Invalid { reason } => {
                (String::new(), String::new(), reason.clone())
            }
        };

        writer.write_record([
            graded.learner_id.clone(),
            graded
                .answer
                .map(|c| c.latitude().to_string())
                .unwrap_or_default(),
            graded
                .answer
                .map(|c| c.longitude().to_string())
                .unwrap_or_default(),
            graded.display.clone().unwrap_or_default(),
            graded.outcome.status().to_string(),
            group_id,
            feedback,
            graded
                .distance_km
                .map(|d| format!("{:.3}", d))
                .unwrap_or_default(),
            reason,
        ])?;
    }

    writer
        .into_inner()
        .map_err(|e| GradeError::IoError(e.into_error()))
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> GradingPipeline for BatchGradingPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Submission>> {
        let path = self.config.input_path();
        tracing::debug!("Reading submissions from: {}", path);
        let data = self.storage.read_file(path).await?;

        // answers are stored as [lat, lng] whichever provider captured them
        match self.config.input_format() {
            "json" => parse_json_submissions(&data),
            "csv" => parse_csv_submissions(&data),
            other => Err(GradeError::InvalidConfigValueError {
                field: "input.format".to_string(),
                value: other.to_string(),
                reason: "Unsupported input format".to_string(),
            }),
        }
    }

    async fn grade(&self, submissions: Vec<Submission>) -> Result<GradeReport> {
        let groups = self.config.answer_groups()?;
        tracing::debug!("Grading against {} answer groups", groups.len());

        let provider = self.config.map_provider();
        let mut summary = GradeSummary::default();
        let answers: Vec<_> = submissions
            .iter()
            .map(|submission| {
                let mut graded = classify(&self.evaluator, &groups, submission);
                graded.marker = graded.answer.map(|c| provider.to_provider_pair(&c));
                summary.record(&graded.outcome);
                graded
            })
            .collect();

        Ok(GradeReport {
            rule_set: self.config.rule_set_name().to_string(),
            graded_at: chrono::Utc::now(),
            answers,
            summary,
        })
    }

    async fn load(&self, report: GradeReport) -> Result<String> {
        for format in self.config.output_formats() {
            let (file_name, data) = match format.as_str() {
                "csv" => (CSV_REPORT, render_csv_report(&report)?),
                "json" => (JSON_REPORT, serde_json::to_vec_pretty(&report)?),
                other => {
                    tracing::warn!("Skipping unsupported output format: {}", other);
                    continue;
                }
            };

            let path = self.report_path(file_name);
            tracing::debug!("Writing {} ({} bytes)", path, data.len());
            self.storage.write_file(&path, &data).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
