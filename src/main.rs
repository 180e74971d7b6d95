use clap::Parser;
use geo_grader::core::ConfigProvider;
use geo_grader::utils::error::ErrorSeverity;
use geo_grader::utils::logger::{self, LogFormat};
use geo_grader::utils::validation::Validate;
use geo_grader::{BatchGradingPipeline, CliConfig, GradingEngine, LocalStorage, TomlConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliConfig::parse();

    let format = if args.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, args.verbose);

    tracing::info!("🚀 Starting geo-grader");
    tracing::info!("📁 Loading rule set from: {}", args.config);

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load rule set '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    if let Some(output_path) = &args.output_path {
        config.output.path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Rule set validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Rule set loaded and validated");
    display_rule_set_summary(&config);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no answers will be graded");
        return Ok(());
    }

    if args.monitor {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(".");
    let pipeline = BatchGradingPipeline::new(storage, config);
    let engine = GradingEngine::new_with_monitoring(pipeline, args.monitor);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Grading completed successfully!");
            println!("✅ Grading completed successfully!");
            println!("📁 Report saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Grading failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_rule_set_summary(config: &TomlConfig) {
    let view = config.map_view();
    tracing::info!("📋 Rule set: {}", config.grader.name);
    if let Some(description) = &config.grader.description {
        tracing::info!("   {}", description);
    }
    tracing::info!(
        "🗺️  Map: {:?}, centered on {} at zoom {}",
        config.map_provider(),
        view.center.short_response(),
        view.zoom
    );
    for group in &config.groups {
        tracing::info!(
            "   • {}: {} {} km of [{}, {}]",
            group.id,
            group.rule,
            group.d,
            group.p[0],
            group.p[1]
        );
    }
    tracing::info!(
        "📥 Input: {} ({})",
        config.input_path(),
        config.input_format()
    );
    tracing::info!(
        "📤 Output: {} ({})",
        config.output_path(),
        config.output_formats().join(", ")
    );
}
