use crate::domain::model::{Coordinate, GradedAnswer, Outcome, Submission};
use crate::domain::ports::RuleEvaluator;
use crate::core::geodesic::distance_km;
use crate::utils::error::{GradeError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RuleKind {
    Within,
    NotWithin,
}

impl RuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Within => "Within",
            RuleKind::NotWithin => "NotWithin",
        }
    }
}

impl FromStr for RuleKind {
    type Err = GradeError;

    fn from_str(name: &str) -> Result<Self> {
        match name {
            "Within" => Ok(RuleKind::Within),
            "NotWithin" => Ok(RuleKind::NotWithin),
            other => Err(GradeError::UnknownRule {
                name: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for RuleKind {
    type Error = GradeError;

    fn try_from(name: String) -> Result<Self> {
        name.parse()
    }
}

impl From<RuleKind> for String {
    fn from(kind: RuleKind) -> Self {
        kind.name().to_string()
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reference point `p` and radius `d` (km) a containment rule is checked against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleInputs {
    pub p: Coordinate,
    pub d: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    kind: RuleKind,
    inputs: RuleInputs,
}

impl Rule {
    pub fn new(kind: RuleKind, p: Coordinate, d: f64) -> Result<Self> {
        let d = crate::domain::model::validate_radius(d)?;
        Ok(Self {
            kind,
            inputs: RuleInputs { p, d },
        })
    }

    /// Build a rule from its name as authored, e.g. `"NotWithin"`.
    pub fn from_name(name: &str, p: Coordinate, d: f64) -> Result<Self> {
        Self::new(name.parse()?, p, d)
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    pub fn inputs(&self) -> &RuleInputs {
        &self.inputs
    }
}

/// An authored rule with the feedback shown when it matches.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerGroup {
    pub id: String,
    pub rule: Rule,
    pub feedback: Option<String>,
}

/// Grade one submission against answer groups in authoring order.
///
/// The first group whose rule holds classifies the answer. An answer that
/// cannot be decoded, or whose evaluation fails, is reported as invalid
/// rather than as a pass or a fail.
pub fn classify<E: RuleEvaluator + ?Sized>(
    evaluator: &E,
    groups: &[AnswerGroup],
    submission: &Submission,
) -> GradedAnswer {
    let answer = match Coordinate::from_answer(&submission.answer) {
        Ok(answer) => answer,
        Err(e) => {
            tracing::debug!(learner = %submission.learner_id, "Answer rejected: {}", e);
            return GradedAnswer {
                learner_id: submission.learner_id.clone(),
                answer: None,
                display: None,
                outcome: Outcome::Invalid {
                    reason: e.to_string(),
                },
                distance_km: None,
                marker: None,
            };
        }
    };

    let mut graded = GradedAnswer {
        learner_id: submission.learner_id.clone(),
        answer: Some(answer),
        display: Some(answer.short_response()),
        outcome: Outcome::Default,
        distance_km: None,
        marker: None,
    };

    for group in groups {
        match evaluator.evaluate(&group.rule, &answer) {
            Ok(true) => {
                graded.outcome = Outcome::Matched {
                    group_id: group.id.clone(),
                    feedback: group.feedback.clone(),
                };
                graded.distance_km = Some(distance_km(&group.rule.inputs().p, &answer));
                return graded;
            }
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(group = %group.id, "Rule evaluation failed: {}", e);
                graded.outcome = Outcome::Invalid {
                    reason: e.to_string(),
                };
                return graded;
            }
        }
    }

    graded
}
