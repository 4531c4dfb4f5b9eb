//! Parser implementation
//!
//! Statements are parsed by recursive descent and expressions by precedence
//! climbing. The parser pulls tokens from its [`Lexer`] one at a time and
//! stops at the first error it meets.

use tracing::debug;

use crate::error::{LexErrorKind, ParseErrorKind, QuillError, QuillResult};
use crate::lexer::{Delimiter, Keyword, Lexer, Operator, Token, TokenType};
use super::ast::*;

/// Lowest binding strength in the operator table
const MIN_PRECEDENCE: u8 = 1;

/// Deepest statement or operand nesting accepted before giving up
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parser for Quill source code
pub struct Parser {
    lexer: Lexer,
    current: Token,
    depth: usize,
}

impl Parser {
    /// Create a parser over source text
    pub fn new(source: &str, filename: Option<&str>) -> Self {
        Self::from_lexer(Lexer::new(source, filename))
    }

    /// Create a parser that pulls tokens from an existing lexer
    pub fn from_lexer(mut lexer: Lexer) -> Self {
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            depth: 0,
        }
    }

    /// Parse the whole input into a program
    pub fn parse(&mut self) -> QuillResult<Program> {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            statements.push(self.statement()?);
        }

        debug!(statements = statements.len(), "parsed program");
        Ok(Program { statements })
    }

    // ===== Statements =====

    fn statement(&mut self) -> QuillResult<Stmt> {
        self.nested(Self::dispatch_statement)
    }

    fn dispatch_statement(&mut self) -> QuillResult<Stmt> {
        debug!(line = self.current.location.line, lexeme = %self.current.lexeme, "parsing statement");

        match self.current.token_type {
            TokenType::Keyword(Keyword::Int) => self.var_declaration(),
            TokenType::Keyword(Keyword::If) => self.if_statement(),
            TokenType::Keyword(Keyword::While) => self.while_statement(),
            TokenType::Keyword(Keyword::Repeat) => self.repeat_statement(),
            TokenType::Keyword(Keyword::Print) => self.print_statement(),
            TokenType::Identifier => self.assignment_or_call(),
            TokenType::Delimiter(Delimiter::LeftBrace) => self.block(),
            _ => Err(self.error(ParseErrorKind::UnexpectedToken)),
        }
    }

    fn var_declaration(&mut self) -> QuillResult<Stmt> {
        self.advance(); // 'int'

        if self.current.token_type != TokenType::Identifier {
            return Err(self.error(ParseErrorKind::MissingIdentifier));
        }
        let name = self.advance();

        self.consume(Delimiter::Semicolon, ParseErrorKind::MissingSemicolon)?;
        Ok(Stmt::VarDecl { name })
    }

    fn assignment_or_call(&mut self) -> QuillResult<Stmt> {
        let target = self.advance();

        if self.check(Delimiter::LeftParen) {
            let expr = self.finish_call(target)?;
            self.consume(Delimiter::Semicolon, ParseErrorKind::MissingSemicolon)?;
            return Ok(Stmt::Expression { expr });
        }

        if target.lexeme == FACTORIAL {
            return Err(self.error(ParseErrorKind::MissingLeftParen));
        }

        if self.current.token_type != TokenType::Assign {
            return Err(self.error(ParseErrorKind::MissingEquals));
        }
        self.advance();

        let value = self.expression()?;
        self.consume(Delimiter::Semicolon, ParseErrorKind::MissingSemicolon)?;

        Ok(Stmt::Assign { target, value })
    }

    fn block(&mut self) -> QuillResult<Stmt> {
        let token = self.consume(Delimiter::LeftBrace, ParseErrorKind::MissingLeftBrace)?;
        let mut statements = Vec::new();

        while !self.check(Delimiter::RightBrace) && !self.is_at_end() {
            statements.push(self.statement()?);
        }

        self.consume(Delimiter::RightBrace, ParseErrorKind::MissingRightBrace)?;
        Ok(Stmt::Block { token, statements })
    }

    fn if_statement(&mut self) -> QuillResult<Stmt> {
        let token = self.advance();
        let condition = self.condition()?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::If {
            token,
            condition,
            body,
        })
    }

    fn while_statement(&mut self) -> QuillResult<Stmt> {
        let token = self.advance();
        let condition = self.condition()?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While {
            token,
            condition,
            body,
        })
    }

    fn repeat_statement(&mut self) -> QuillResult<Stmt> {
        let token = self.advance();
        let body = Box::new(self.statement()?);

        if self.current.token_type != TokenType::Keyword(Keyword::Until) {
            return Err(self.error(ParseErrorKind::UnexpectedToken));
        }
        self.advance();

        let condition = self.condition()?;

        Ok(Stmt::RepeatUntil {
            token,
            body,
            condition,
        })
    }

    fn print_statement(&mut self) -> QuillResult<Stmt> {
        let token = self.advance();
        let value = self.expression()?;
        self.consume(Delimiter::Semicolon, ParseErrorKind::MissingSemicolon)?;

        Ok(Stmt::Print { token, value })
    }

    /// Parenthesized loop or branch condition: '(' expression ')'
    fn condition(&mut self) -> QuillResult<Expr> {
        self.consume(Delimiter::LeftParen, ParseErrorKind::MissingLeftParen)?;

        if self.check(Delimiter::RightParen) {
            return Err(self.error(ParseErrorKind::MissingCondition));
        }

        let condition = self.expression()?;
        self.consume(Delimiter::RightParen, ParseErrorKind::MissingRightParen)?;
        Ok(condition)
    }

    // ===== Expressions =====

    fn expression(&mut self) -> QuillResult<Expr> {
        self.binary_expression(MIN_PRECEDENCE)
    }

    /// Precedence climbing: fold every operator binding at least as tightly
    /// as `min_precedence` into the left operand.
    fn binary_expression(&mut self, min_precedence: u8) -> QuillResult<Expr> {
        let mut left = self.operand()?;

        while let TokenType::Operator(operator) = self.current.token_type {
            let precedence = operator.precedence();
            if precedence < min_precedence {
                break;
            }

            let token = self.advance();
            let right = self.binary_expression(precedence + 1)?;
            left = Expr::binary(operator, token, left, right);
        }

        Ok(left)
    }

    fn operand(&mut self) -> QuillResult<Expr> {
        self.nested(Self::primary)
    }

    fn primary(&mut self) -> QuillResult<Expr> {
        match self.current.token_type {
            TokenType::Number => {
                let token = self.advance();
                Self::number(token)
            }

            TokenType::Identifier => {
                let token = self.advance();
                if self.check(Delimiter::LeftParen) {
                    self.finish_call(token)
                } else if token.lexeme == FACTORIAL {
                    Err(self.error(ParseErrorKind::MissingLeftParen))
                } else {
                    Ok(Expr::Identifier { token })
                }
            }

            TokenType::Delimiter(Delimiter::LeftParen) => {
                self.advance();
                if self.check(Delimiter::RightParen) {
                    return Err(self.error(ParseErrorKind::InvalidExpression));
                }
                let expr = self.expression()?;
                self.consume(Delimiter::RightParen, ParseErrorKind::MissingRightParen)?;
                Ok(expr)
            }

            TokenType::Operator(Operator::Minus) => {
                let minus = self.advance();

                // A minus glued to a literal is part of the literal
                if self.current.token_type == TokenType::Number {
                    let digits = self.advance();
                    let lexeme = format!("-{}", digits.lexeme);
                    return Self::number(Token::new(TokenType::Number, lexeme, minus.location));
                }

                let operand = Box::new(self.operand()?);
                Ok(Expr::Negate {
                    token: minus,
                    operand,
                })
            }

            TokenType::Operator(_) => Err(self.error(ParseErrorKind::InvalidOperator)),

            _ => Err(self.error(ParseErrorKind::InvalidExpression)),
        }
    }

    /// Parse an argument list; the callee name is already consumed
    fn finish_call(&mut self, name: Token) -> QuillResult<Expr> {
        self.advance(); // '('
        let mut arguments = Vec::new();

        if !self.check(Delimiter::RightParen) {
            loop {
                if self.check(Delimiter::Comma) || self.check(Delimiter::RightParen) {
                    return Err(self.error(ParseErrorKind::FunctionCallInvalidArgument));
                }
                arguments.push(self.expression()?);

                if !self.check(Delimiter::Comma) {
                    break;
                }
                self.advance();
            }
        }

        self.consume(Delimiter::RightParen, ParseErrorKind::MissingRightParen)?;

        Ok(Expr::FunctionCall { name, arguments })
    }

    fn number(token: Token) -> QuillResult<Expr> {
        match token.lexeme.parse::<i64>() {
            Ok(value) => Ok(Expr::Number { token, value }),
            Err(_) => Err(QuillError::lexical(
                LexErrorKind::InvalidNumber,
                token.lexeme,
                token.location,
            )),
        }
    }

    // ===== Helper Methods =====

    /// Hand back the current token and pull the next one
    fn advance(&mut self) -> Token {
        let next = self.lexer.next_token();
        std::mem::replace(&mut self.current, next)
    }

    fn check(&self, delimiter: Delimiter) -> bool {
        self.current.token_type == TokenType::Delimiter(delimiter)
    }

    fn consume(&mut self, delimiter: Delimiter, kind: ParseErrorKind) -> QuillResult<Token> {
        if self.check(delimiter) {
            Ok(self.advance())
        } else {
            Err(self.error(kind))
        }
    }

    /// Run `parse` one level deeper, refusing input nested past
    /// `MAX_NESTING_DEPTH`
    fn nested<T>(&mut self, parse: fn(&mut Self) -> QuillResult<T>) -> QuillResult<T> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(self.error(ParseErrorKind::NestingTooDeep));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn is_at_end(&self) -> bool {
        self.current.is_eof()
    }

    /// Error at the current token. A lexical error token reports its own
    /// problem rather than the structural one.
    fn error(&self, kind: ParseErrorKind) -> QuillError {
        let token = &self.current;
        match token.error() {
            Some(lex_kind) => {
                QuillError::lexical(lex_kind, token.lexeme.clone(), token.location.clone())
            }
            None => QuillError::parse(kind, token.lexeme.clone(), token.location.clone()),
        }
    }
}
