//! Semantic analyzer
//!
//! Walks a parsed program with a scoped symbol table, checking declarations,
//! initialization, operand types and calls to the built-in `factorial`.
//! Unlike parsing, analysis never stops early: every statement is checked and
//! all findings are collected as diagnostics.

use std::fmt;

use tracing::{debug, trace};

use crate::error::{QuillError, SemanticErrorKind, Severity, SourceLocation};
use crate::lexer::Token;
use crate::parser::{Expr, Program, Stmt, FACTORIAL};
use crate::types::Type;

use super::symbol_table::SymbolTable;

/// Knobs for the analyzer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// Treat reads of never-assigned variables as errors instead of warnings
    pub strict_initialization: bool,
}

/// A finding reported by the analyzer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SemanticDiagnostic {
    pub severity: Severity,
    pub kind: SemanticErrorKind,
    /// Variable or function the finding is about
    pub name: String,
    pub location: SourceLocation,
}

impl SemanticDiagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    /// The same finding as a `QuillError`, for rendering
    pub fn to_error(&self) -> QuillError {
        QuillError::semantic(self.kind, self.name.clone(), self.location.clone())
    }
}

impl fmt::Display for SemanticDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.severity {
            Severity::Error => "Error",
            Severity::Warning => "Warning",
        };
        write!(
            f,
            "Semantic {} at line {}, column {}: {}",
            label,
            self.location.line,
            self.location.column,
            self.kind.describe(&self.name)
        )
    }
}

/// A parsed program together with everything the analyzer found in it
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub program: Program,
    pub diagnostics: Vec<SemanticDiagnostic>,
}

impl Analysis {
    /// True when no error-severity diagnostic was raised
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(SemanticDiagnostic::is_error)
    }

    pub fn errors(&self) -> impl Iterator<Item = &SemanticDiagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &SemanticDiagnostic> {
        self.diagnostics.iter().filter(|d| !d.is_error())
    }
}

/// Semantic analyzer for validating programs
pub struct SemanticAnalyzer {
    symbols: SymbolTable,
    diagnostics: Vec<SemanticDiagnostic>,
    options: AnalyzerOptions,
}

impl SemanticAnalyzer {
    pub fn new() -> Self {
        Self::with_options(AnalyzerOptions::default())
    }

    pub fn with_options(options: AnalyzerOptions) -> Self {
        Self {
            symbols: SymbolTable::new(),
            diagnostics: Vec::new(),
            options,
        }
    }

    /// Check a whole program. Returns true iff no error was reported.
    ///
    /// State from a previous call is discarded first.
    pub fn analyze(&mut self, program: &Program) -> bool {
        self.symbols = SymbolTable::new();
        self.diagnostics.clear();

        for stmt in &program.statements {
            self.check_statement(stmt);
        }

        let valid = !self.diagnostics.iter().any(SemanticDiagnostic::is_error);
        debug!(
            valid,
            diagnostics = self.diagnostics.len(),
            "semantic analysis finished"
        );
        valid
    }

    pub fn diagnostics(&self) -> &[SemanticDiagnostic] {
        &self.diagnostics
    }

    /// Symbols left in scope after the last run
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn into_diagnostics(self) -> Vec<SemanticDiagnostic> {
        self.diagnostics
    }

    fn check_statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl { name } => self.check_declaration(name),
            Stmt::Assign { target, value } => self.check_assignment(target, value),
            Stmt::Print { value, .. } => {
                self.check_expression(value);
            }
            Stmt::Expression { expr } => {
                self.check_expression(expr);
            }
            Stmt::If {
                condition, body, ..
            }
            | Stmt::While {
                condition, body, ..
            } => {
                self.check_condition(condition);
                self.check_scoped(body);
            }
            Stmt::RepeatUntil {
                body, condition, ..
            } => {
                self.check_scoped(body);
                self.check_condition(condition);
            }
            Stmt::Block { statements, .. } => {
                self.symbols.enter_scope();
                for stmt in statements {
                    self.check_statement(stmt);
                }
                self.symbols.exit_scope();
            }
        }
    }

    /// Check a loop or branch body inside a scope of its own
    fn check_scoped(&mut self, body: &Stmt) {
        self.symbols.enter_scope();
        self.check_statement(body);
        self.symbols.exit_scope();
    }

    fn check_declaration(&mut self, name: &Token) {
        let redeclared = self
            .symbols
            .declare(&name.lexeme, Type::Int, name.location.line)
            .is_err();

        if redeclared {
            self.error(SemanticErrorKind::RedeclaredVariable, name);
        } else {
            debug!(
                variable = %name.lexeme,
                scope = self.symbols.current_scope(),
                "declared variable"
            );
        }
    }

    fn check_assignment(&mut self, target: &Token, value: &Expr) {
        let declared = match self.symbols.lookup(&target.lexeme) {
            Some(symbol) => symbol.ty,
            None => {
                self.error(SemanticErrorKind::UndeclaredVariable, target);
                return;
            }
        };

        let Some(ty) = self.check_expression(value) else {
            return;
        };

        if ty != declared {
            self.error(SemanticErrorKind::TypeMismatch, target);
            return;
        }

        if let Some(symbol) = self.symbols.lookup_mut(&target.lexeme) {
            symbol.initialized = true;
        }
    }

    fn check_condition(&mut self, condition: &Expr) {
        if let Some(ty) = self.check_expression(condition) {
            if ty != Type::Int {
                self.report(
                    Severity::Error,
                    SemanticErrorKind::TypeMismatch,
                    "condition",
                    condition.location(),
                );
            }
        }
    }

    /// Type of `expr`, or `None` once an error has been reported inside it
    fn check_expression(&mut self, expr: &Expr) -> Option<Type> {
        match expr {
            Expr::Number { .. } => Some(Type::Int),

            Expr::Identifier { token } => self.check_identifier(token),

            Expr::BinaryOp {
                token, left, right, ..
            }
            | Expr::Comparison {
                token, left, right, ..
            } => {
                // Both sides first, so independent errors are all reported
                let left = self.check_expression(left);
                let right = self.check_expression(right);
                let (left, right) = (left?, right?);

                if left != right {
                    self.error(SemanticErrorKind::TypeMismatch, token);
                    return None;
                }
                // Comparisons yield an integer truth value
                Some(Type::Int)
            }

            Expr::Negate { token, operand } => {
                let ty = self.check_expression(operand)?;
                if ty != Type::Int {
                    self.error(SemanticErrorKind::InvalidOperation, token);
                    return None;
                }
                Some(ty)
            }

            Expr::FunctionCall { name, arguments } => self.check_call(name, arguments),
        }
    }

    fn check_identifier(&mut self, token: &Token) -> Option<Type> {
        let (ty, initialized) = match self.symbols.lookup(&token.lexeme) {
            Some(symbol) => (symbol.ty, symbol.initialized),
            None => {
                self.error(SemanticErrorKind::UndeclaredVariable, token);
                return None;
            }
        };

        if initialized {
            return Some(ty);
        }

        if self.options.strict_initialization {
            self.error(SemanticErrorKind::UninitializedVariable, token);
            None
        } else {
            self.report(
                Severity::Warning,
                SemanticErrorKind::UninitializedVariable,
                &token.lexeme,
                &token.location,
            );
            Some(ty)
        }
    }

    fn check_call(&mut self, name: &Token, arguments: &[Expr]) -> Option<Type> {
        if name.lexeme != FACTORIAL {
            self.error(SemanticErrorKind::InvalidOperation, name);
            return None;
        }

        let argument = match arguments {
            [] => {
                self.error(SemanticErrorKind::FunctionCallNoArguments, name);
                return None;
            }
            [argument] => argument,
            _ => {
                self.error(SemanticErrorKind::FunctionCallTooManyArguments, name);
                return None;
            }
        };

        let mut valid = self.check_expression(argument).is_some();

        if let Expr::Number { value, .. } = argument {
            if *value < 0 {
                self.error(SemanticErrorKind::InvalidArgument, name);
                valid = false;
            }
        }

        valid.then_some(Type::Int)
    }

    fn error(&mut self, kind: SemanticErrorKind, token: &Token) {
        self.report(Severity::Error, kind, &token.lexeme, &token.location);
    }

    fn report(
        &mut self,
        severity: Severity,
        kind: SemanticErrorKind,
        name: &str,
        location: &SourceLocation,
    ) {
        trace!(?severity, ?kind, symbol = name, line = location.line, "semantic finding");
        self.diagnostics.push(SemanticDiagnostic {
            severity,
            kind,
            name: name.to_string(),
            location: location.clone(),
        });
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
