use thiserror::Error;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// The requested read model is not registered. Never cached.
    #[error("schema '{0}' is not registered")]
    NotFound(String),

    /// A registry document could not be parsed.
    #[error("invalid schema document '{file}': {message}")]
    InvalidDocument { file: String, message: String },
}

impl CompileError {
    pub fn invalid_document(file: impl Into<String>, message: impl ToString) -> Self {
        Self::InvalidDocument {
            file: file.into(),
            message: message.to_string(),
        }
    }
}
