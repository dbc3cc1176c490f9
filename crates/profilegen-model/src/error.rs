use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("IO error ({kind}): {message}")]
    IoError {
        kind: std::io::ErrorKind,
        message: String,
    },

    #[error("Generator-specific error in {context}: {details}")]
    GeneratorSpecific {
        context: &'static str,
        details: String,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid {field} pattern '{pattern}': {details}")]
pub struct ProfileMatchError {
    pub field: &'static str,
    pub pattern: String,
    pub details: String,
}

impl GeneratorError {
    pub fn generator_specific(context: &'static str, details: impl Into<String>) -> Self {
        Self::GeneratorSpecific {
            context,
            details: details.into(),
        }
    }
}

impl From<std::io::Error> for GeneratorError {
    fn from(err: std::io::Error) -> Self {
        GeneratorError::IoError {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
