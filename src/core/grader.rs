use crate::core::GradingPipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct GradingEngine<P: GradingPipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: GradingPipeline> GradingEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting grading run");

        let submissions = self.pipeline.extract().await?;
        tracing::info!("📥 Read {} submissions", submissions.len());
        self.monitor.log_stats("extract");

        let report = self.pipeline.grade(submissions).await?;
        let summary = &report.summary;
        tracing::info!(
            total = summary.total,
            matched = summary.matched,
            default = summary.default,
            invalid = summary.invalid,
            "📝 Graded {} answers",
            summary.total
        );
        if summary.invalid > 0 {
            tracing::warn!("{} answers could not be graded", summary.invalid);
        }
        self.monitor.log_stats("grade");

        let output_path = self.pipeline.load(report).await?;
        tracing::info!("📁 Report saved to: {}", output_path);
        self.monitor.log_stats("load");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
