//! # Quill Programming Language
//!
//! Front end for a small teaching language with:
//! - integer variables declared with `int`
//! - `if`, `while` and `repeat ... until` control flow
//! - `print` and a single built-in function, `factorial`
//!
//! ## Architecture
//!
//! The implementation is organized into several modules:
//! - `lexer`: Tokenization of source code
//! - `parser`: Parsing tokens into an Abstract Syntax Tree (AST)
//! - `types`: The (single) value type
//! - `semantic`: Scoping, declaration and call validation
//! - `error`: Error handling and diagnostics
//!
//! Lexing and parsing stop at the first problem; semantic analysis collects
//! every finding.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod semantic;
pub mod types;

// Re-export commonly used types
pub use error::{Diagnostic, QuillError, QuillResult, Severity, SourceLocation};
pub use lexer::{Lexer, Token, TokenType};
pub use parser::{Expr, Parser, Program, Stmt};
pub use semantic::{Analysis, AnalyzerOptions, SemanticAnalyzer, SemanticDiagnostic};

/// Version of the Quill language
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Parse a program from source code
///
/// # Arguments
///
/// * `source` - The source code to parse
/// * `filename` - Optional filename for error reporting
///
/// Returns the first lexical or parse error encountered, if any.
pub fn parse(source: &str, filename: Option<&str>) -> QuillResult<Program> {
    Parser::new(source, filename).parse()
}

/// Parse and semantically check a program
///
/// Lexical and parse failures are returned as `Err`. Otherwise the program is
/// returned along with every semantic diagnostic; use
/// [`Analysis::is_valid`] to tell whether any of them was an error.
pub fn check(
    source: &str,
    filename: Option<&str>,
    options: AnalyzerOptions,
) -> QuillResult<Analysis> {
    let program = parse(source, filename)?;

    let mut analyzer = SemanticAnalyzer::with_options(options);
    analyzer.analyze(&program);

    Ok(Analysis {
        program,
        diagnostics: analyzer.into_diagnostics(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_check_reports_parse_errors() {
        let err = check("int x", Some("main.ql"), AnalyzerOptions::default()).unwrap_err();
        assert_eq!(err.category(), "Parse");
        assert_eq!(err.location().filename.as_deref(), Some("main.ql"));
    }

    #[test]
    fn test_check_valid_program() {
        let analysis = check("int x; x = 2; print factorial(x);", None, AnalyzerOptions::default())
            .unwrap();
        assert!(analysis.is_valid());
        assert_eq!(analysis.program.statements.len(), 3);
    }
}
