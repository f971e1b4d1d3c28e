use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("Workbook read failed: {0}")]
    WorkbookError(#[from] calamine::Error),

    #[error("Workbook write failed: {0}")]
    XlsxWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern compilation error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// 錯誤分類，用於日誌與結束碼
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Output,
    Configuration,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 程序結束碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::WorkbookError(_) => ErrorCategory::Input,
            EtlError::XlsxWriteError(_)
            | EtlError::ZipError(_)
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_) => ErrorCategory::Output,
            EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::RegexError(_) => ErrorCategory::Configuration,
            EtlError::ProcessingError { .. } => ErrorCategory::Processing,
            EtlError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            EtlError::WorkbookError(_) | EtlError::ProcessingError { .. } => ErrorSeverity::Medium,
            EtlError::XlsxWriteError(_)
            | EtlError::ZipError(_)
            | EtlError::CsvError(_)
            | EtlError::SerializationError(_)
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            EtlError::IoError(_) | EtlError::RegexError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            EtlError::WorkbookError(_) => {
                "Check that the input is a valid .xlsx/.xls/.ods workbook and is not password protected".to_string()
            }
            EtlError::XlsxWriteError(_) | EtlError::CsvError(_) | EtlError::SerializationError(_) => {
                "Check the output directory and try a different output format".to_string()
            }
            EtlError::ZipError(_) => "Disable compression or check free disk space".to_string(),
            EtlError::IoError(e) => match e.kind() {
                std::io::ErrorKind::NotFound => "Check that the input file path exists".to_string(),
                std::io::ErrorKind::PermissionDenied => {
                    "Check read/write permissions of the input and output paths".to_string()
                }
                _ => "Check the file system and retry".to_string(),
            },
            EtlError::RegexError(_) => "Report this as a bug: a built-in pattern failed to compile".to_string(),
            EtlError::ConfigValidationError { .. } => {
                "Review the configuration file syntax and values".to_string()
            }
            EtlError::InvalidConfigValueError { field, .. } => {
                format!("Correct the value of '{}'", field)
            }
            EtlError::ProcessingError { .. } => {
                "Check that the workbook contains at least one sheet with test data".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read the input workbook: {}", self),
            ErrorCategory::Output => format!("Could not write the output: {}", self),
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Processing => format!("Processing failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
