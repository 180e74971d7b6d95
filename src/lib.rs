pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::cli::LocalStorage;

pub use crate::app::pipelines::BatchGradingPipeline;
pub use crate::config::toml_config::TomlConfig;
pub use crate::core::geodesic::{distance_km, distance_km_between, GeodesicRuleEvaluator, EARTH_RADIUS_KM};
pub use crate::core::grader::GradingEngine;
pub use crate::core::map_provider::{MapProvider, MapView};
pub use crate::core::rules::{classify, AnswerGroup, Rule, RuleKind};
pub use crate::domain::model::{ContainmentQuery, Coordinate};
pub use crate::utils::error::{GradeError, Result};
