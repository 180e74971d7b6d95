pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "geo-grader")]
#[command(about = "Grade map-click answers against geodesic containment rules")]
pub struct CliConfig {
    /// Path to the TOML rule set
    #[arg(short, long, default_value = "rules.toml")]
    pub config: String,

    /// Override the report directory from the rule set
    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log memory usage after each phase")]
    pub monitor: bool,

    /// Validate the rule set and show it without grading anything
    #[arg(long)]
    pub dry_run: bool,
}
