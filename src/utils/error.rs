use thiserror::Error;

#[derive(Error, Debug)]
pub enum GradeError {
    #[error("Invalid coordinate {value}: {reason}")]
    InvalidCoordinate { value: String, reason: String },

    #[error("Invalid radius {radius}: must be a finite, non-negative number of kilometers")]
    InvalidRadius { radius: f64 },

    #[error("Unknown rule: {name}")]
    UnknownRule { name: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Io,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    High,
    Critical,
}

impl GradeError {
    pub fn invalid_coordinate(value: impl Into<String>, reason: impl Into<String>) -> Self {
        GradeError::InvalidCoordinate {
            value: value.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            GradeError::InvalidCoordinate { .. }
            | GradeError::InvalidRadius { .. }
            | GradeError::UnknownRule { .. } => ErrorCategory::Input,
            GradeError::ConfigValidationError { .. }
            | GradeError::InvalidConfigValueError { .. }
            | GradeError::MissingConfigError { .. } => ErrorCategory::Configuration,
            GradeError::IoError(_) => ErrorCategory::Io,
            GradeError::CsvError(_) | GradeError::SerializationError(_) => ErrorCategory::Data,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // A bad answer is graded as invalid, the run itself goes on.
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            GradeError::InvalidCoordinate { .. } => {
                "Latitude must be within [-90, 90] and longitude within [-180, 180]"
            }
            GradeError::InvalidRadius { .. } => "Use a radius of zero or more kilometers",
            GradeError::UnknownRule { .. } => "Supported rules are 'Within' and 'NotWithin'",
            GradeError::CsvError(_) => {
                "Check that the CSV header is 'learner_id,latitude,longitude'"
            }
            GradeError::SerializationError(_) => {
                "Check that the JSON input is a list of {\"learner_id\", \"answer\"} objects"
            }
            GradeError::IoError(_) => "Check that the file exists and is readable",
            GradeError::ConfigValidationError { .. }
            | GradeError::InvalidConfigValueError { .. }
            | GradeError::MissingConfigError { .. } => "Fix the rule set file and run again",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Answer could not be graded: {}", self),
            ErrorCategory::Configuration => format!("Rule set is not valid: {}", self),
            ErrorCategory::Io => format!("File access failed: {}", self),
            ErrorCategory::Data => format!("Input data could not be read: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GradeError>;
