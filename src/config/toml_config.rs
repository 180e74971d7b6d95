use crate::core::map_provider::{MapProvider, MapView};
use crate::core::rules::{AnswerGroup, Rule};
use crate::core::ConfigProvider;
use crate::domain::model::Coordinate;
use crate::utils::error::{GradeError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_range, validate_unique,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const INPUT_FORMATS: [&str; 2] = ["csv", "json"];
pub const OUTPUT_FORMATS: [&str; 2] = ["csv", "json"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub grader: GraderConfig,
    pub map: Option<MapConfig>,
    #[serde(default)]
    pub groups: Vec<GroupConfig>,
    pub input: InputConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraderConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    pub provider: Option<MapProvider>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub zoom: Option<String>,
}

/// One authored answer group: `rule` is checked with reference point `p`
/// (`[lat, lng]`) and radius `d` in kilometers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupConfig {
    pub id: String,
    pub rule: String,
    pub p: [f64; 2],
    pub d: f64,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
    pub format: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
}

impl GroupConfig {
    pub fn to_answer_group(&self) -> Result<AnswerGroup> {
        let p = Coordinate::try_from(self.p)?;
        Ok(AnswerGroup {
            id: self.id.clone(),
            rule: Rule::from_name(&self.rule, p, self.d)?,
            feedback: self.feedback.clone(),
        })
    }
}

impl TomlConfig {
    /// Load a rule set from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GradeError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GradeError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replace `${VAR}` with the variable's value; unset variables are left as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GradeError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_non_empty_string("grader.name", &self.grader.name)?;

        if let Some(map) = &self.map {
            if let Some(lat) = map.latitude {
                validate_range("map.latitude", lat, -90.0, 90.0)?;
            }
            if let Some(lng) = map.longitude {
                validate_range("map.longitude", lng, -180.0, 180.0)?;
            }
        }

        if self.groups.is_empty() {
            return Err(GradeError::MissingConfigError {
                field: "groups".to_string(),
            });
        }
        for group in &self.groups {
            validate_non_empty_string("groups.id", &group.id)?;
            group.to_answer_group()?;
        }
        validate_unique("groups.id", self.groups.iter().map(|g| g.id.as_str()))?;

        validate_path("input.path", &self.input.path)?;
        validate_one_of("input.format", self.input_format(), &INPUT_FORMATS)?;

        validate_path("output.path", &self.output.path)?;
        if self.output.formats.is_empty() {
            return Err(GradeError::MissingConfigError {
                field: "output.formats".to_string(),
            });
        }
        for format in &self.output.formats {
            validate_one_of("output.formats", format, &OUTPUT_FORMATS)?;
        }

        Ok(())
    }

    pub fn input_format(&self) -> &str {
        self.input.format.as_deref().unwrap_or("csv")
    }

    pub fn map_provider(&self) -> MapProvider {
        self.map
            .as_ref()
            .and_then(|m| m.provider)
            .unwrap_or_default()
    }

    pub fn map_view(&self) -> MapView {
        match &self.map {
            Some(map) => MapView::from_args(map.latitude, map.longitude, map.zoom.as_deref()),
            None => MapView::default(),
        }
    }
}

impl ConfigProvider for TomlConfig {
    fn rule_set_name(&self) -> &str {
        &self.grader.name
    }

    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn input_format(&self) -> &str {
        self.input_format()
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn map_provider(&self) -> MapProvider {
        self.map_provider()
    }

    fn answer_groups(&self) -> Result<Vec<AnswerGroup>> {
        self.groups.iter().map(GroupConfig::to_answer_group).collect()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
