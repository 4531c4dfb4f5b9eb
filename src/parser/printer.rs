//! Indented text dump of a program tree, for debugging and tests

use std::fmt::{self, Write};

use super::ast::{Expr, Program, Stmt};

/// Render a program one node per line, children indented two spaces deeper
pub fn render(program: &Program) -> String {
    program.to_string()
}

fn write_program(out: &mut impl Write, program: &Program) -> fmt::Result {
    writeln!(out, "Program")?;
    for stmt in &program.statements {
        write_stmt(out, stmt, 1)?;
    }
    Ok(())
}

fn write_stmt(out: &mut impl Write, stmt: &Stmt, level: usize) -> fmt::Result {
    indent(out, level)?;

    match stmt {
        Stmt::VarDecl { name } => writeln!(out, "VarDecl: {}", name.lexeme),
        Stmt::Assign { target, value } => {
            writeln!(out, "Assign: {}", target.lexeme)?;
            write_expr(out, value, level + 1)
        }
        Stmt::Print { value, .. } => {
            writeln!(out, "Print")?;
            write_expr(out, value, level + 1)
        }
        Stmt::Expression { expr } => {
            writeln!(out, "ExprStmt")?;
            write_expr(out, expr, level + 1)
        }
        Stmt::If { condition, body, .. } => {
            writeln!(out, "If")?;
            write_expr(out, condition, level + 1)?;
            write_stmt(out, body, level + 1)
        }
        Stmt::While { condition, body, .. } => {
            writeln!(out, "While")?;
            write_expr(out, condition, level + 1)?;
            write_stmt(out, body, level + 1)
        }
        Stmt::RepeatUntil { body, condition, .. } => {
            writeln!(out, "RepeatUntil")?;
            write_stmt(out, body, level + 1)?;
            write_expr(out, condition, level + 1)
        }
        Stmt::Block { statements, .. } => {
            writeln!(out, "Block")?;
            for stmt in statements {
                write_stmt(out, stmt, level + 1)?;
            }
            Ok(())
        }
    }
}

fn write_expr(out: &mut impl Write, expr: &Expr, level: usize) -> fmt::Result {
    indent(out, level)?;

    match expr {
        Expr::Number { value, .. } => writeln!(out, "Number: {}", value),
        Expr::Identifier { token } => writeln!(out, "Identifier: {}", token.lexeme),
        Expr::FunctionCall { name, arguments } => {
            writeln!(out, "FunctionCall: {}", name.lexeme)?;
            for argument in arguments {
                write_expr(out, argument, level + 1)?;
            }
            Ok(())
        }
        Expr::BinaryOp { operator, left, right, .. } => {
            writeln!(out, "BinaryOp: {}", operator.as_str())?;
            write_expr(out, left, level + 1)?;
            write_expr(out, right, level + 1)
        }
        Expr::Comparison { operator, left, right, .. } => {
            writeln!(out, "Comparison: {}", operator.as_str())?;
            write_expr(out, left, level + 1)?;
            write_expr(out, right, level + 1)
        }
        Expr::Negate { operand, .. } => {
            writeln!(out, "Negate")?;
            write_expr(out, operand, level + 1)
        }
    }
}

fn indent(out: &mut impl Write, level: usize) -> fmt::Result {
    write!(out, "{:width$}", "", width = level * 2)
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_program(f, self)
    }
}
