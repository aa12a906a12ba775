use std::fmt;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ParseErrorType {
    DecodeError,
    EmptyPath,
    PathFormat,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ParseError {
    pub kind: ParseErrorType,
    pub msg: String,
}

impl ParseError {
    pub fn new(kind: ParseErrorType, msg: String) -> Self {
        Self { kind, msg }
    }

    pub fn decode(msg: String) -> Self {
        Self {
            kind: ParseErrorType::DecodeError,
            msg,
        }
    }

    pub fn empty_path() -> Self {
        Self {
            kind: ParseErrorType::EmptyPath,
            msg: String::from("empty path is given, path must have 1-4 segments"),
        }
    }

    pub fn path(msg: String) -> Self {
        Self {
            kind: ParseErrorType::PathFormat,
            msg,
        }
    }
}

impl std::error::Error for ParseError {}

impl fmt::Display for ParseErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorType::DecodeError => f.write_str("decode error"),
            ParseErrorType::EmptyPath | ParseErrorType::PathFormat => f.write_str("path error"),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}
