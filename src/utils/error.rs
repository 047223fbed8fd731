use thiserror::Error;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("Invalid input for {field}: {value} ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("{kind} record not found: {id}")]
    RecordNotFound { kind: String, id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Config,
    Data,
    Store,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl BillingError {
    pub fn invalid_input(field: &str, value: impl ToString, reason: &str) -> Self {
        BillingError::InvalidInput {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            BillingError::InvalidInput { .. } => ErrorCategory::Input,
            BillingError::ConfigError { .. }
            | BillingError::InvalidConfigValueError { .. }
            | BillingError::MissingConfigError { .. } => ErrorCategory::Config,
            BillingError::CsvError(_)
            | BillingError::SerializationError(_)
            | BillingError::ProcessingError { .. } => ErrorCategory::Data,
            BillingError::RecordNotFound { .. } => ErrorCategory::Store,
            BillingError::ZipError(_) | BillingError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Config | ErrorCategory::Data => {
                ErrorSeverity::High
            }
            ErrorCategory::Store => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            BillingError::InvalidInput { field, .. } => format!(
                "Check the '{}' column of the input records; quantities and unit prices must not be negative",
                field
            ),
            BillingError::ConfigError { .. } => {
                "Check the configuration file syntax and required sections".to_string()
            }
            BillingError::InvalidConfigValueError { field, .. } => {
                format!("Fix the '{}' setting in the configuration", field)
            }
            BillingError::MissingConfigError { field } => {
                format!("Add the required '{}' setting to the configuration", field)
            }
            BillingError::CsvError(_) => {
                "Verify the input file has the expected header and column count".to_string()
            }
            BillingError::SerializationError(_) => {
                "Verify the input JSON matches the quotation item shape".to_string()
            }
            BillingError::ProcessingError { .. } => {
                "Inspect the offending record in the log output".to_string()
            }
            BillingError::RecordNotFound { kind, .. } => {
                format!("Make sure the referenced {} exists in the store", kind)
            }
            BillingError::ZipError(_) | BillingError::IoError(_) => {
                "Check the output path exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            BillingError::InvalidInput { field, value, .. } => {
                format!("Billing line rejected: {} = {}", field, value)
            }
            BillingError::ConfigError { message } => format!("Configuration problem: {}", message),
            BillingError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration problem with '{}': {}", field, reason)
            }
            BillingError::MissingConfigError { field } => {
                format!("Configuration is missing '{}'", field)
            }
            BillingError::RecordNotFound { kind, id } => {
                format!("Could not find {} '{}'", kind, id)
            }
            other => format!("Billing run failed: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, BillingError>;
