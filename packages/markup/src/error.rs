use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Unexpected token at {pos}: expected {expected}, found {found}")]
    UnexpectedToken {
        pos: usize,
        expected: String,
        found: String,
    },

    #[error("Unexpected end of input at {pos}")]
    UnexpectedEof { pos: usize },

    #[error("Unknown element type at {pos}: {type_name}")]
    UnknownType { pos: usize, type_name: String },

    #[error("Mismatched closing tag at {pos}: opened {opened}, closed {closed}")]
    MismatchedClose {
        pos: usize,
        opened: String,
        closed: String,
    },

    #[error("Trailing content after the root element at {pos}")]
    TrailingContent { pos: usize },
}

impl ParseError {
    pub fn unexpected_token(
        pos: usize,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::UnexpectedToken {
            pos,
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn unexpected_eof(pos: usize) -> Self {
        Self::UnexpectedEof { pos }
    }

    pub fn unknown_type(pos: usize, type_name: impl Into<String>) -> Self {
        Self::UnknownType {
            pos,
            type_name: type_name.into(),
        }
    }

    pub fn mismatched_close(pos: usize, opened: impl Into<String>, closed: impl Into<String>) -> Self {
        Self::MismatchedClose {
            pos,
            opened: opened.into(),
            closed: closed.into(),
        }
    }
}
