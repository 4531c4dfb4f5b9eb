//! Error handling and diagnostics for the Quill language
//!
//! Every stage of the pipeline reports through [`QuillError`]. Each variant
//! carries a stage-specific kind, the offending lexeme (or variable name) and
//! the location of the token that triggered it.

use std::fmt;

use thiserror::Error;

pub mod diagnostic;

pub use diagnostic::{Diagnostic, Severity};

/// Result type alias for Quill operations
pub type QuillResult<T> = Result<T, QuillError>;

/// Source location information for error reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
    /// Optional filename
    pub filename: Option<String>,
}

impl SourceLocation {
    /// Create a new source location
    pub fn new(line: usize, column: usize, filename: Option<String>) -> Self {
        Self {
            line,
            column,
            filename,
        }
    }

    /// Create a source location without a filename
    pub fn at(line: usize, column: usize) -> Self {
        Self::new(line, column, None)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref filename) = self.filename {
            write!(f, "{}:{}:{}", filename, self.line, self.column)
        } else {
            write!(f, "{}:{}", self.line, self.column)
        }
    }
}

/// Lexical error kinds, carried by error tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum LexErrorKind {
    #[error("invalid character")]
    InvalidChar,
    #[error("invalid number")]
    InvalidNumber,
    #[error("consecutive operators")]
    ConsecutiveOperators,
    #[error("unterminated string")]
    UnterminatedString,
    #[error("invalid identifier")]
    InvalidIdentifier,
    #[error("unterminated comment")]
    UnterminatedComment,
    #[error("string buffer overflow")]
    StringBufferOverflow,
}

impl LexErrorKind {
    /// Full message for this error, mentioning the offending text
    pub fn describe(&self, lexeme: &str) -> String {
        match self {
            Self::InvalidChar => format!("Invalid character '{}'", lexeme),
            Self::InvalidNumber => format!("Invalid number format '{}'", lexeme),
            Self::ConsecutiveOperators => {
                format!("Consecutive operators '{}' not allowed", lexeme)
            }
            Self::UnterminatedString => format!("Unterminated string starting with {}", lexeme),
            Self::InvalidIdentifier => format!("Invalid identifier format '{}'", lexeme),
            Self::UnterminatedComment => {
                format!("Unterminated multi-line comment starting with '{}'", lexeme)
            }
            Self::StringBufferOverflow => format!(
                "String too long, buffer overflow reached in {}...; make it shorter or split it",
                lexeme
            ),
        }
    }
}

/// Structural errors reported by the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum ParseErrorKind {
    #[error("unexpected token")]
    UnexpectedToken,
    #[error("missing semicolon")]
    MissingSemicolon,
    #[error("missing identifier")]
    MissingIdentifier,
    #[error("missing '='")]
    MissingEquals,
    #[error("invalid expression")]
    InvalidExpression,
    #[error("missing '('")]
    MissingLeftParen,
    #[error("missing ')'")]
    MissingRightParen,
    #[error("missing condition")]
    MissingCondition,
    /// Blocks are only entered on '{', so the grammar never produces this
    #[error("missing '{{'")]
    MissingLeftBrace,
    #[error("missing '}}'")]
    MissingRightBrace,
    #[error("invalid operator")]
    InvalidOperator,
    #[error("invalid function argument")]
    FunctionCallInvalidArgument,
    #[error("nesting too deep")]
    NestingTooDeep,
}

impl ParseErrorKind {
    /// Full message for this error, naming the token that was found instead
    pub fn describe(&self, lexeme: &str) -> String {
        match self {
            Self::UnexpectedToken => format!("Unexpected token '{}'", lexeme),
            Self::MissingSemicolon => format!("Missing semicolon before '{}'", lexeme),
            Self::MissingIdentifier => format!("Expected identifier, found '{}'", lexeme),
            Self::MissingEquals => format!("Expected '=', found '{}'", lexeme),
            Self::InvalidExpression => format!("Invalid expression at '{}'", lexeme),
            Self::MissingLeftParen => format!("Missing opening parenthesis before '{}'", lexeme),
            Self::MissingRightParen => format!("Missing closing parenthesis before '{}'", lexeme),
            Self::MissingCondition => format!("Missing condition before '{}'", lexeme),
            Self::MissingLeftBrace => format!("Missing opening brace '{{' before '{}'", lexeme),
            Self::MissingRightBrace => format!("Missing closing brace '}}' before '{}'", lexeme),
            Self::InvalidOperator => format!("Invalid operator '{}' where an operand was expected", lexeme),
            Self::FunctionCallInvalidArgument => {
                format!("Invalid argument in function call at '{}'", lexeme)
            }
            Self::NestingTooDeep => format!("Nesting too deep at '{}'", lexeme),
        }
    }
}

/// Declaration and type errors reported by the semantic analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum SemanticErrorKind {
    #[error("undeclared variable")]
    UndeclaredVariable,
    #[error("redeclared variable")]
    RedeclaredVariable,
    #[error("type mismatch")]
    TypeMismatch,
    #[error("uninitialized variable")]
    UninitializedVariable,
    #[error("invalid operation")]
    InvalidOperation,
    #[error("invalid argument")]
    InvalidArgument,
    #[error("missing function argument")]
    FunctionCallNoArguments,
    #[error("too many function arguments")]
    FunctionCallTooManyArguments,
}

impl SemanticErrorKind {
    /// Full message for this error about `name`
    pub fn describe(&self, name: &str) -> String {
        match self {
            Self::UndeclaredVariable => format!("Undeclared variable '{}'", name),
            Self::RedeclaredVariable => {
                format!("Variable '{}' already declared in this scope", name)
            }
            Self::TypeMismatch => format!("Type mismatch involving '{}'", name),
            Self::UninitializedVariable => format!("Variable '{}' may be used uninitialized", name),
            Self::InvalidOperation => format!("Invalid operation involving '{}'", name),
            Self::InvalidArgument => format!("Invalid argument for function '{}'", name),
            Self::FunctionCallNoArguments => format!(
                "Function '{}' call requires one argument, but none provided",
                name
            ),
            Self::FunctionCallTooManyArguments => {
                format!("Function '{}' call has too many arguments", name)
            }
        }
    }
}

/// Main error type for the Quill language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuillError {
    /// Tokenizer error, surfaced once the parser meets the error token
    Lexical {
        kind: LexErrorKind,
        lexeme: String,
        location: SourceLocation,
    },
    /// Parsing error
    Parse {
        kind: ParseErrorKind,
        lexeme: String,
        location: SourceLocation,
    },
    /// Semantic analysis error
    Semantic {
        kind: SemanticErrorKind,
        name: String,
        location: SourceLocation,
    },
}

impl QuillError {
    /// Create a new lexical error
    pub fn lexical(kind: LexErrorKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self::Lexical {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// Create a new parse error
    pub fn parse(kind: ParseErrorKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self::Parse {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// Create a new semantic error
    pub fn semantic(
        kind: SemanticErrorKind,
        name: impl Into<String>,
        location: SourceLocation,
    ) -> Self {
        Self::Semantic {
            kind,
            name: name.into(),
            location,
        }
    }

    /// Pipeline stage that raised the error
    pub fn category(&self) -> &'static str {
        match self {
            Self::Lexical { .. } => "Lexical",
            Self::Parse { .. } => "Parse",
            Self::Semantic { .. } => "Semantic",
        }
    }

    /// Get the error kind as a string
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Lexical { .. } => "Lexical Error",
            Self::Parse { .. } => "Parse Error",
            Self::Semantic { .. } => "Semantic Error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::Lexical { kind, lexeme, .. } => kind.describe(lexeme),
            Self::Parse { kind, lexeme, .. } => kind.describe(lexeme),
            Self::Semantic { kind, name, .. } => kind.describe(name),
        }
    }

    /// Get the source location
    pub fn location(&self) -> &SourceLocation {
        match self {
            Self::Lexical { location, .. }
            | Self::Parse { location, .. }
            | Self::Semantic { location, .. } => location,
        }
    }
}

impl fmt::Display for QuillError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let location = self.location();
        write!(
            f,
            "{} at line {}, column {}: {}",
            self.kind(),
            location.line,
            location.column,
            self.message()
        )
    }
}

impl std::error::Error for QuillError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_location_display() {
        let loc = SourceLocation::at(10, 5);
        assert_eq!(loc.to_string(), "10:5");

        let loc_with_file = SourceLocation::new(10, 5, Some("test.ql".to_string()));
        assert_eq!(loc_with_file.to_string(), "test.ql:10:5");
    }

    #[test]
    fn test_error_creation() {
        let loc = SourceLocation::at(1, 1);
        let err = QuillError::lexical(LexErrorKind::InvalidChar, "@", loc.clone());

        assert_eq!(err.kind(), "Lexical Error");
        assert_eq!(err.category(), "Lexical");
        assert_eq!(err.message(), "Invalid character '@'");
        assert_eq!(err.location(), &loc);
    }

    #[test]
    fn test_error_display() {
        let loc = SourceLocation::at(5, 10);
        let err = QuillError::parse(ParseErrorKind::MissingSemicolon, "print", loc);

        assert_eq!(
            err.to_string(),
            "Parse Error at line 5, column 10: Missing semicolon before 'print'"
        );
    }

    #[test]
    fn test_semantic_display_names_variable() {
        let err = QuillError::semantic(
            SemanticErrorKind::UndeclaredVariable,
            "count",
            SourceLocation::at(3, 1),
        );

        assert_eq!(
            err.to_string(),
            "Semantic Error at line 3, column 1: Undeclared variable 'count'"
        );
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(LexErrorKind::ConsecutiveOperators.to_string(), "consecutive operators");
        assert_eq!(ParseErrorKind::MissingLeftBrace.to_string(), "missing '{'");
        assert_eq!(
            SemanticErrorKind::FunctionCallTooManyArguments.to_string(),
            "too many function arguments"
        );
    }
}
