use thiserror::Error;

#[derive(Error, Debug)]
pub enum TeamError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Registrant source error ({source_name}): {message}")]
    SourceError {
        source_name: String,
        message: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Suggestion contract violated: {message}")]
    ContractViolation { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Processing,
    Output,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TeamError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            TeamError::ConfigError { .. }
            | TeamError::MissingConfigError { .. }
            | TeamError::InvalidConfigValueError { .. }
            | TeamError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            TeamError::ApiError(_) | TeamError::SourceError { .. } | TeamError::CsvError(_) => {
                ErrorCategory::Source
            }
            TeamError::ProcessingError { .. }
            | TeamError::ValidationError { .. }
            | TeamError::ContractViolation { .. } => ErrorCategory::Processing,
            TeamError::ZipError(_) | TeamError::SerializationError(_) => ErrorCategory::Output,
            TeamError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            TeamError::ApiError(_) | TeamError::SourceError { .. } => ErrorSeverity::Medium,
            TeamError::ContractViolation { .. } => ErrorSeverity::Critical,
            TeamError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            TeamError::ApiError(_) | TeamError::SourceError { .. } => {
                "Check that the registrant endpoint is reachable and returns a JSON list of golfers"
                    .to_string()
            }
            TeamError::CsvError(_) => {
                "Make sure the registrant CSV has a header row with at least an 'id' column"
                    .to_string()
            }
            TeamError::ConfigError { .. }
            | TeamError::MissingConfigError { .. }
            | TeamError::InvalidConfigValueError { .. }
            | TeamError::ConfigValidationError { .. } => {
                "Review the command line arguments or the TOML configuration file".to_string()
            }
            TeamError::IoError(_) => {
                "Check file paths and permissions for the input and output locations".to_string()
            }
            TeamError::ZipError(_) | TeamError::SerializationError(_) => {
                "Try writing uncompressed output or a different output directory".to_string()
            }
            TeamError::ProcessingError { .. } | TeamError::ValidationError { .. } => {
                "Inspect the registrant data for duplicated or malformed records".to_string()
            }
            TeamError::ContractViolation { .. } => {
                "This is a bug in team generation; please report it with the input data"
                    .to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Source => format!("Could not load registrants: {}", self),
            ErrorCategory::Processing => format!("Could not build team suggestions: {}", self),
            ErrorCategory::Output => format!("Could not write suggestions: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }

    /// Exit code used by the binaries; low severity counts as success.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// Logs the failure with its classification and prints the message and
    /// recovery hint to stderr.
    pub fn report(&self, context: &str) {
        tracing::error!(
            "❌ {}: {} (Category: {:?}, Severity: {:?})",
            context,
            self,
            self.category(),
            self.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", self.recovery_suggestion());

        eprintln!("❌ {}", self.user_friendly_message());
        eprintln!("💡 {}", self.recovery_suggestion());
    }
}

pub type Result<T> = std::result::Result<T, TeamError>;
