use anyhow::Context;
use clap::Parser;
use geo_grader::utils::logger::{self, LogFormat};
use geo_grader::{Coordinate, GeodesicRuleEvaluator};

#[derive(Parser)]
#[command(name = "geo-distance")]
#[command(about = "Great-circle distance between two points, with optional Within/NotWithin check")]
struct Args {
    /// Latitude of the reference point
    #[arg(allow_negative_numbers = true)]
    lat1: f64,
    /// Longitude of the reference point
    #[arg(allow_negative_numbers = true)]
    lng1: f64,
    /// Latitude of the candidate point
    #[arg(allow_negative_numbers = true)]
    lat2: f64,
    /// Longitude of the candidate point
    #[arg(allow_negative_numbers = true)]
    lng2: f64,

    /// Radius in kilometers to check the candidate against
    #[arg(short, long)]
    radius: Option<f64>,

    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logger::init_logger(LogFormat::Compact, args.verbose);

    let reference = Coordinate::new(args.lat1, args.lng1).context("invalid reference point")?;
    let candidate = Coordinate::new(args.lat2, args.lng2).context("invalid candidate point")?;
    tracing::debug!("reference = {}, candidate = {}", reference, candidate);

    let evaluator = GeodesicRuleEvaluator::new();
    let distance = evaluator.distance_km(&reference, &candidate);
    println!(
        "{} → {}: {:.3} km",
        reference.short_response(),
        candidate.short_response(),
        distance
    );

    if let Some(radius) = args.radius {
        let within = evaluator
            .within(&candidate, &reference, radius)
            .context("invalid radius")?;
        let not_within = evaluator
            .not_within(&candidate, &reference, radius)
            .context("invalid radius")?;
        println!("Within {} km: {}", radius, within);
        println!("NotWithin {} km: {}", radius, not_within);
    }

    Ok(())
}
