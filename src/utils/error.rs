use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Duplicate column caption: {caption}")]
    DuplicateColumn { caption: String },

    #[error("Row {row}: '{value}' in column '{caption}' is not a valid amount")]
    InvalidOrderValue {
        row: usize,
        caption: String,
        value: String,
    },

    #[error("Run cancelled after {completed} invoice(s)")]
    Cancelled { completed: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Io,
    Rendering,
    Interrupted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InvoiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InvoiceError::ConfigError { .. }
            | InvoiceError::ConfigValidationError { .. }
            | InvoiceError::InvalidConfigValueError { .. }
            | InvoiceError::MissingConfigError { .. } => ErrorCategory::Configuration,
            InvoiceError::CsvError(_)
            | InvoiceError::DuplicateColumn { .. }
            | InvoiceError::InvalidOrderValue { .. } => ErrorCategory::Data,
            InvoiceError::IoError(_) => ErrorCategory::Io,
            InvoiceError::SerializationError(_) => ErrorCategory::Rendering,
            InvoiceError::Cancelled { .. } => ErrorCategory::Interrupted,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Interrupted => ErrorSeverity::Low,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Rendering => ErrorSeverity::High,
            ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            InvoiceError::CsvError(_) => {
                "Check that the input is a valid CSV file with a header row"
            }
            InvoiceError::DuplicateColumn { .. } => {
                "Rename the duplicated header so every column caption is unique"
            }
            InvoiceError::InvalidOrderValue { .. } => {
                "Fix the order value in the sheet; it must be a plain number such as 1499.50"
            }
            InvoiceError::IoError(_) => {
                "Make sure the input file exists and the output folder is writable"
            }
            InvoiceError::ConfigError { .. }
            | InvoiceError::ConfigValidationError { .. }
            | InvoiceError::InvalidConfigValueError { .. }
            | InvoiceError::MissingConfigError { .. } => {
                "Review the settings file and fill in every required value"
            }
            InvoiceError::SerializationError(_) => {
                "Try a different output format or re-run the generation"
            }
            InvoiceError::Cancelled { .. } => {
                "Re-run the generation; invoices already written are kept"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            InvoiceError::InvalidOrderValue { row, value, .. } => format!(
                "Error in generating invoice: row {} has an invalid order value '{}'",
                row, value
            ),
            InvoiceError::Cancelled { completed } => {
                format!("Generation stopped after {} invoice(s)", completed)
            }
            other => format!("Error in generating invoice: {}", other),
        }
    }
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
