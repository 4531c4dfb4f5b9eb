//! Semantic analysis module
//!
//! This module handles semantic validation of the AST: scoping, declarations,
//! initialization and the built-in function rules.

pub mod analyzer;
pub mod symbol_table;

pub use analyzer::{Analysis, AnalyzerOptions, SemanticAnalyzer, SemanticDiagnostic};
pub use symbol_table::{Symbol, SymbolTable};
