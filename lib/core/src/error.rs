use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole invocation.
///
/// Per-row numerical edge cases are not errors: they surface as `NaN` in the
/// affected metric field.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Degenerate input: {0}")]
    DegenerateInput(String),

    #[error("Invalid matrix shape: expected {expected} values, got {actual}")]
    InvalidShape { expected: usize, actual: usize },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true for errors caused by the caller's request rather than by
    /// the environment.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Error::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidConfiguration("unknown kernel 'cosine'".to_string());
        assert_eq!(err.to_string(), "Invalid configuration: unknown kernel 'cosine'");

        let err = Error::InvalidShape { expected: 6, actual: 5 };
        assert_eq!(err.to_string(), "Invalid matrix shape: expected 6 values, got 5");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(Error::DegenerateInput("empty".into()).is_client_error());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        assert!(!Error::from(io).is_client_error());
    }
}
