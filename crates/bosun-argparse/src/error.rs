use thiserror::Error;

/// Failure of a registration or a `.parse()` call.
///
/// `Config` means the element registry itself is wrong (raised by the
/// builders) or a `--long` token matches nothing in it. `InvalidInput` means
/// the user supplied arguments that do not satisfy the registry. Both print
/// the bare message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{0}")]
    Config(String),
    #[error("{0}")]
    InvalidInput(String),
}

impl ParseError {
    pub fn message(&self) -> &str {
        match self {
            Self::Config(msg) | Self::InvalidInput(msg) => msg.as_str(),
        }
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

pub type ParseResult<T> = Result<T, ParseError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_the_bare_message() {
        let err = ParseError::config("Flag '--nope' is unknown");
        assert_eq!(err.message(), "Flag '--nope' is unknown");
        assert_eq!(err.to_string(), "Flag '--nope' is unknown");
        assert!(err.is_config());

        let err = ParseError::invalid("Invalid extra params supplied: -h");
        assert_eq!(err.to_string(), "Invalid extra params supplied: -h");
        assert!(err.is_invalid_input());
    }
}
