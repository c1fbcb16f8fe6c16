use thiserror::Error;

#[derive(Error, Debug)]
pub enum DuesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Missing column in statement: {0}")]
    MissingColumn(String),

    #[error("No credit transactions found in statement")]
    NoCreditTransactions,

    #[error("Unknown member: {0}")]
    UnknownMember(String),

    #[error("Member already exists: {0}")]
    DuplicateMember(String),

    #[error("Unknown membership class: {0}")]
    UnknownClass(String),

    #[error("Mapping already exists for: {0}")]
    DuplicateMapping(String),

    #[error("Invalid batch row {row}: {reason}")]
    BadBatchRow { row: usize, reason: String },

    #[error("{0}")]
    Validation(#[from] crate::reconciler::ValidationError),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, DuesError>;
