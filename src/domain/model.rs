use crate::utils::error::{GradeError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// A point on the Earth's surface in decimal degrees.
///
/// A `Coordinate` can only be built through validation, so every value in
/// circulation has a finite latitude in `[-90, 90]` and a finite longitude
/// in `[-180, 180]`. It serializes as the `[latitude, longitude]` pair used
/// for persisted answers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let value = format!("[{}, {}]", latitude, longitude);

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(GradeError::invalid_coordinate(value, "components must be finite"));
        }
        if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
            return Err(GradeError::invalid_coordinate(
                value,
                format!("latitude must be between {} and {}", MIN_LATITUDE, MAX_LATITUDE),
            ));
        }
        if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            return Err(GradeError::invalid_coordinate(
                value,
                format!("longitude must be between {} and {}", MIN_LONGITUDE, MAX_LONGITUDE),
            ));
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Decode a persisted answer, which must be a list of exactly two numbers.
    pub fn from_answer(answer: &serde_json::Value) -> Result<Self> {
        let pair = answer
            .as_array()
            .ok_or_else(|| GradeError::invalid_coordinate(answer.to_string(), "expected a list"))?;

        match pair.as_slice() {
            [lat, lng] => match (lat.as_f64(), lng.as_f64()) {
                (Some(lat), Some(lng)) => Self::new(lat, lng),
                _ => Err(GradeError::invalid_coordinate(
                    answer.to_string(),
                    "components must be numbers",
                )),
            },
            _ => Err(GradeError::invalid_coordinate(
                answer.to_string(),
                format!("expected 2 components, found {}", pair.len()),
            )),
        }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Short form shown next to a learner's answer, e.g. `51.507° N, 0.128° W`.
    pub fn short_response(&self) -> String {
        format!(
            "{:.3}° {}, {:.3}° {}",
            self.latitude.abs(),
            if self.latitude >= 0.0 { 'N' } else { 'S' },
            self.longitude.abs(),
            if self.longitude >= 0.0 { 'E' } else { 'W' },
        )
    }
}

impl Default for Coordinate {
    /// The value a freshly created rule starts from.
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

impl TryFrom<[f64; 2]> for Coordinate {
    type Error = GradeError;

    fn try_from(pair: [f64; 2]) -> Result<Self> {
        Self::new(pair[0], pair[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(coord: Coordinate) -> Self {
        [coord.latitude, coord.longitude]
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Validates a containment radius in kilometers.
pub fn validate_radius(radius_km: f64) -> Result<f64> {
    if radius_km.is_finite() && radius_km >= 0.0 {
        Ok(radius_km)
    } else {
        Err(GradeError::InvalidRadius { radius: radius_km })
    }
}

/// One evaluation: is `candidate` within `radius_km` of `reference`?
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainmentQuery {
    pub reference: Coordinate,
    pub radius_km: f64,
    pub candidate: Coordinate,
}

impl ContainmentQuery {
    pub fn new(reference: Coordinate, radius_km: f64, candidate: Coordinate) -> Result<Self> {
        Ok(Self {
            reference,
            radius_km: validate_radius(radius_km)?,
            candidate,
        })
    }
}

/// A learner's answer as it arrives from persistence, before decoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub learner_id: String,
    pub answer: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Matched {
        group_id: String,
        feedback: Option<String>,
    },
    Default,
    Invalid {
        reason: String,
    },
}

impl Outcome {
    pub fn status(&self) -> &'static str {
        match self {
            Outcome::Matched { .. } => "matched",
            Outcome::Default => "default",
            Outcome::Invalid { .. } => "invalid",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradedAnswer {
    pub learner_id: String,
    pub answer: Option<Coordinate>,
    pub display: Option<String>,
    #[serde(flatten)]
    pub outcome: Outcome,
    /// Distance to the reference point of the matched group.
    pub distance_km: Option<f64>,
    /// Answer position in the map provider's axis order, for placing a marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<[f64; 2]>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeSummary {
    pub total: usize,
    pub matched: usize,
    pub default: usize,
    pub invalid: usize,
}

impl GradeSummary {
    pub fn record(&mut self, outcome: &Outcome) {
        self.total += 1;
        match outcome {
            Outcome::Matched { .. } => self.matched += 1,
            Outcome::Default => self.default += 1,
            Outcome::Invalid { .. } => self.invalid += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradeReport {
    pub rule_set: String,
    pub graded_at: DateTime<Utc>,
    pub answers: Vec<GradedAnswer>,
    pub summary: GradeSummary,
}
