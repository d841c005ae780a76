use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PaymentError>;

#[derive(Error, Diagnostic, Debug)]
pub enum PaymentError {
    #[error("Invalid amount: {0}")]
    #[diagnostic(code(paysplit::invalid_amount))]
    InvalidAmount(String),
    #[error("Invalid rate: {0}")]
    #[diagnostic(code(paysplit::invalid_rate))]
    InvalidRate(String),
    #[error("Arithmetic overflow while computing settlement")]
    #[diagnostic(code(paysplit::overflow))]
    ArithmeticOverflow,
    #[error("Validation error: {0}")]
    #[diagnostic(code(paysplit::validation))]
    ValidationError(String),
    #[error("Processor error: {0}")]
    #[diagnostic(code(paysplit::processor))]
    ProcessorError(String),
    #[error("Configuration error: {0}")]
    #[diagnostic(code(paysplit::config))]
    ConfigError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
