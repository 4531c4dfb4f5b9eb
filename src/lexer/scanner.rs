//! Lexer/Scanner implementation for the Quill language
//!
//! Tokens are produced on demand: [`Lexer::next_token`] scans exactly one
//! token from the current position. Lexical problems never abort scanning;
//! they come back as error tokens and the caller decides what to do.

use tracing::trace;

use crate::error::{LexErrorKind, SourceLocation};
use super::token::{Delimiter, Keyword, Operator, Token, TokenType};

/// Longest lexeme the scanner will hold for a single token
pub const MAX_LEXEME_LEN: usize = 99;

/// Lexer for Quill source code
pub struct Lexer {
    source: Vec<char>,
    start: usize,
    current: usize,
    line: usize,
    column: usize,
    filename: Option<String>,
    finished: bool,
}

impl Lexer {
    /// Create a new lexer
    pub fn new(source: &str, filename: Option<&str>) -> Self {
        Self {
            source: source.chars().collect(),
            start: 0,
            current: 0,
            line: 1,
            column: 1,
            filename: filename.map(|s| s.to_string()),
            finished: false,
        }
    }

    /// Tokenize the whole source, error tokens included, ending with EOF
    pub fn tokenize(&mut self) -> Vec<Token> {
        self.by_ref().collect()
    }

    /// Scan the next token. Keeps returning EOF once the input is exhausted.
    pub fn next_token(&mut self) -> Token {
        loop {
            self.skip_whitespace();

            if self.is_at_end() {
                return Token::new(TokenType::Eof, "EOF".to_string(), self.current_location());
            }

            self.start = self.current;
            let location = self.current_location();

            if self.peek() == '/' && self.peek_next() == '/' {
                self.skip_line_comment();
                continue;
            }

            if self.peek() == '/' && self.peek_next() == '*' {
                if self.skip_block_comment() {
                    continue;
                }
                return Token::new(
                    TokenType::Error(LexErrorKind::UnterminatedComment),
                    "/*".to_string(),
                    location,
                );
            }

            let token = self.scan_token(location);
            trace!(kind = %token.token_type, lexeme = %token.lexeme, line = token.location.line, "scanned token");
            return token;
        }
    }

    /// Scan a single token starting at `self.start`
    fn scan_token(&mut self, location: SourceLocation) -> Token {
        let c = self.advance();

        match c {
            c if c.is_ascii_digit() => self.scan_number(location),
            c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(location),
            '"' => self.scan_string(location),

            '+' | '-' | '*' | '/' | '%' => {
                if self.match_char(c) {
                    return self.make_token(TokenType::Error(LexErrorKind::ConsecutiveOperators), location);
                }
                let operator = match c {
                    '+' => Operator::Plus,
                    '-' => Operator::Minus,
                    '*' => Operator::Star,
                    '/' => Operator::Slash,
                    _ => Operator::Percent,
                };
                self.make_token(TokenType::Operator(operator), location)
            }

            '<' => self.make_token(TokenType::Operator(Operator::Less), location),
            '>' => self.make_token(TokenType::Operator(Operator::Greater), location),

            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenType::Operator(Operator::EqualEqual), location)
                } else {
                    self.make_token(TokenType::Assign, location)
                }
            }

            c => match Delimiter::from_char(c) {
                Some(delimiter) => self.make_token(TokenType::Delimiter(delimiter), location),
                None => self.make_token(TokenType::Error(LexErrorKind::InvalidChar), location),
            },
        }
    }

    /// Scan a run of digits
    fn scan_number(&mut self, location: SourceLocation) -> Token {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.current - self.start > MAX_LEXEME_LEN {
            return self.make_token(TokenType::Error(LexErrorKind::InvalidNumber), location);
        }
        self.make_token(TokenType::Number, location)
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self, location: SourceLocation) -> Token {
        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            self.advance();
        }

        if self.current - self.start > MAX_LEXEME_LEN {
            return self.make_token(TokenType::Error(LexErrorKind::InvalidIdentifier), location);
        }

        let lexeme = self.lexeme();
        let token_type = match Keyword::from_str(&lexeme) {
            Some(keyword) => TokenType::Keyword(keyword),
            None => TokenType::Identifier,
        };

        Token::new(token_type, lexeme, location)
    }

    /// Scan a string literal; the opening quote is already consumed
    fn scan_string(&mut self, location: SourceLocation) -> Token {
        loop {
            if self.is_at_end() {
                return self.make_token(TokenType::Error(LexErrorKind::UnterminatedString), location);
            }

            if self.current - self.start >= MAX_LEXEME_LEN {
                let truncated = self.lexeme();
                return self.recover_long_string(truncated, location);
            }

            match self.advance() {
                '"' => return self.make_token(TokenType::String, location),
                // A backslash carries the next character along with it
                '\\' if !self.is_at_end() => {
                    if self.current - self.start >= MAX_LEXEME_LEN {
                        let truncated = self.lexeme();
                        self.advance();
                        return self.recover_long_string(truncated, location);
                    }
                    self.advance();
                }
                _ => {}
            }
        }
    }

    /// The string filled the lexeme buffer before closing. Skip past the next
    /// unescaped quote so scanning resumes after the string.
    fn recover_long_string(&mut self, truncated: String, location: SourceLocation) -> Token {
        while !self.is_at_end() {
            match self.advance() {
                '"' => {
                    return Token::new(
                        TokenType::Error(LexErrorKind::StringBufferOverflow),
                        truncated,
                        location,
                    )
                }
                '\\' if !self.is_at_end() => {
                    self.advance();
                }
                _ => {}
            }
        }

        Token::new(
            TokenType::Error(LexErrorKind::UnterminatedString),
            truncated,
            location,
        )
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\r' | '\n') && !self.is_at_end() {
            self.advance();
        }
    }

    fn skip_line_comment(&mut self) {
        while self.peek() != '\n' && !self.is_at_end() {
            self.advance();
        }
    }

    /// Skip a `/* ... */` comment. Returns false if it never closes, leaving
    /// the cursor at the end of the input.
    fn skip_block_comment(&mut self) -> bool {
        self.advance();
        self.advance();

        while !self.is_at_end() {
            if self.peek() == '*' && self.peek_next() == '/' {
                self.advance();
                self.advance();
                return true;
            }
            self.advance();
        }

        false
    }

    fn make_token(&self, token_type: TokenType, location: SourceLocation) -> Token {
        Token::new(token_type, self.lexeme(), location)
    }

    fn lexeme(&self) -> String {
        self.source[self.start..self.current].iter().collect()
    }

    /// Advance to the next character, tracking line and column
    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        c
    }

    /// Check if the next character matches and consume it if so
    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            false
        } else {
            self.advance();
            true
        }
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> char {
        if self.is_at_end() {
            '\0'
        } else {
            self.source[self.current]
        }
    }

    /// Peek at the next character without consuming it
    fn peek_next(&self) -> char {
        if self.current + 1 >= self.source.len() {
            '\0'
        } else {
            self.source[self.current + 1]
        }
    }

    /// Check if we've reached the end of the source
    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    /// Get the current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.filename.clone())
    }
}

impl Iterator for Lexer {
    type Item = Token;

    /// Yields every token up to and including EOF, then stops
    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.finished = true;
        }
        Some(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokenize_source(source: &str) -> Vec<Token> {
        Lexer::new(source, None).tokenize()
    }

    fn kinds(source: &str) -> Vec<TokenType> {
        tokenize_source(source).into_iter().map(|t| t.token_type).collect()
    }

    fn lexemes(source: &str) -> Vec<String> {
        tokenize_source(source).into_iter().map(|t| t.lexeme).collect()
    }

    #[test]
    fn test_empty_source() {
        let tokens = tokenize_source("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].token_type, TokenType::Eof);
    }

    #[test]
    fn test_only_whitespace_and_comments() {
        for source in [
            "   \n\t  ",
            "// just a comment",
            "/* block */",
            "  /* a */ // b\n /* multi\nline */  \n",
        ] {
            assert_eq!(kinds(source), vec![TokenType::Eof], "source: {:?}", source);
        }
    }

    #[test]
    fn test_arithmetic_sequence() {
        let tokens = tokenize_source("123 + 456 - 789");
        assert_eq!(
            tokens.iter().map(|t| t.token_type).collect::<Vec<_>>(),
            vec![
                TokenType::Number,
                TokenType::Operator(Operator::Plus),
                TokenType::Number,
                TokenType::Operator(Operator::Minus),
                TokenType::Number,
                TokenType::Eof,
            ]
        );
        assert_eq!(tokens[0].lexeme, "123");
        assert_eq!(tokens[2].lexeme, "456");
        assert_eq!(tokens[4].lexeme, "789");
        assert!(tokens.iter().all(|t| t.error().is_none()));
    }

    #[test]
    fn test_consecutive_operators() {
        let tokens = tokenize_source("123 ++ 456");
        assert_eq!(tokens[0].token_type, TokenType::Number);
        assert_eq!(tokens[1].error(), Some(LexErrorKind::ConsecutiveOperators));
        assert_eq!(tokens[1].lexeme, "++");
        assert_eq!(tokens[2].token_type, TokenType::Number);
        assert_eq!(tokens[2].lexeme, "456");
        assert_eq!(tokens[3].token_type, TokenType::Eof);
    }

    #[test]
    fn test_doubled_operators_of_each_kind() {
        for source in ["--", "**", "%%"] {
            let tokens = tokenize_source(source);
            assert_eq!(tokens.len(), 2);
            assert_eq!(tokens[0].error(), Some(LexErrorKind::ConsecutiveOperators));
        }
        // `//` is a comment, never an operator pair
        assert_eq!(kinds("//"), vec![TokenType::Eof]);
    }

    #[test]
    fn test_assign_versus_equality() {
        assert_eq!(
            kinds("= == ="),
            vec![
                TokenType::Assign,
                TokenType::Operator(Operator::EqualEqual),
                TokenType::Assign,
                TokenType::Eof,
            ]
        );
        assert_eq!(lexemes("==")[0], "==");
    }

    #[test]
    fn test_relational_operators() {
        assert_eq!(
            kinds("a < b > c"),
            vec![
                TokenType::Identifier,
                TokenType::Operator(Operator::Less),
                TokenType::Identifier,
                TokenType::Operator(Operator::Greater),
                TokenType::Identifier,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_division_is_not_a_comment() {
        assert_eq!(
            kinds("8 / 2"),
            vec![
                TokenType::Number,
                TokenType::Operator(Operator::Slash),
                TokenType::Number,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_delimiters() {
        assert_eq!(
            kinds(";(){},"),
            vec![
                TokenType::Delimiter(Delimiter::Semicolon),
                TokenType::Delimiter(Delimiter::LeftParen),
                TokenType::Delimiter(Delimiter::RightParen),
                TokenType::Delimiter(Delimiter::LeftBrace),
                TokenType::Delimiter(Delimiter::RightBrace),
                TokenType::Delimiter(Delimiter::Comma),
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        assert_eq!(
            kinds("if int repeat until while print"),
            vec![
                TokenType::Keyword(Keyword::If),
                TokenType::Keyword(Keyword::Int),
                TokenType::Keyword(Keyword::Repeat),
                TokenType::Keyword(Keyword::Until),
                TokenType::Keyword(Keyword::While),
                TokenType::Keyword(Keyword::Print),
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn test_identifiers() {
        let tokens = tokenize_source("foo bar_baz _private myVar123 integer factorial");
        assert!(tokens[..6].iter().all(|t| t.token_type == TokenType::Identifier));
        assert_eq!(tokens[1].lexeme, "bar_baz");
        assert_eq!(tokens[4].lexeme, "integer");
    }

    #[test]
    fn test_declaration_statement() {
        assert_eq!(
            lexemes("int x = 42; y = x + 10;"),
            vec!["int", "x", "=", "42", ";", "y", "=", "x", "+", "10", ";", "EOF"]
        );
    }

    #[test]
    fn test_invalid_character() {
        let tokens = tokenize_source("x@ = 10;");
        assert_eq!(tokens[0].token_type, TokenType::Identifier);
        assert_eq!(tokens[1].error(), Some(LexErrorKind::InvalidChar));
        assert_eq!(tokens[1].lexeme, "@");
        assert_eq!(tokens[2].token_type, TokenType::Assign);
        assert_eq!(tokens[3].lexeme, "10");
    }

    #[test]
    fn test_string_literal() {
        let tokens = tokenize_source(r#""Hello""#);
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].lexeme, "\"Hello\"");
        assert_eq!(tokens[1].token_type, TokenType::Eof);
    }

    #[test]
    fn test_string_with_escaped_quotes() {
        let source = r#""String with \"quotes\"""#;
        let tokens = tokenize_source(source);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].lexeme, source);
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = tokenize_source("\"abc");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].error(), Some(LexErrorKind::UnterminatedString));
        assert_eq!(tokens[1].token_type, TokenType::Eof);
    }

    #[test]
    fn test_string_buffer_overflow_resynchronizes() {
        let long = "a".repeat(MAX_LEXEME_LEN + 20);
        let source = format!("\"{}\" x", long);
        let tokens = tokenize_source(&source);

        assert_eq!(tokens[0].error(), Some(LexErrorKind::StringBufferOverflow));
        assert_eq!(tokens[0].lexeme.chars().count(), MAX_LEXEME_LEN);
        assert_eq!(tokens[1].token_type, TokenType::Identifier);
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[2].token_type, TokenType::Eof);
    }

    #[test]
    fn test_escape_at_buffer_limit_stays_within_cap() {
        // The backslash is the last character that fits
        let source = format!("\"{}\\q{}\" x", "a".repeat(MAX_LEXEME_LEN - 2), "z".repeat(10));
        let tokens = tokenize_source(&source);

        assert_eq!(tokens[0].error(), Some(LexErrorKind::StringBufferOverflow));
        assert_eq!(tokens[0].lexeme.chars().count(), MAX_LEXEME_LEN);
        assert!(tokens[0].lexeme.ends_with('\\'));
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[2].token_type, TokenType::Eof);
    }

    #[test]
    fn test_escaped_quote_after_overflow_does_not_close() {
        let source = format!("\"{}\\\"still inside\" y", "c".repeat(MAX_LEXEME_LEN + 5));
        let tokens = tokenize_source(&source);

        assert_eq!(tokens[0].error(), Some(LexErrorKind::StringBufferOverflow));
        assert_eq!(tokens[1].lexeme, "y");
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn test_string_spanning_lines() {
        let tokens = tokenize_source("\"a\nb\" x");

        assert_eq!(tokens[0].token_type, TokenType::String);
        assert_eq!(tokens[0].lexeme, "\"a\nb\"");
        assert_eq!(tokens[0].location.line, 1);
        assert_eq!(tokens[1].lexeme, "x");
        assert_eq!(tokens[1].location.line, 2);
    }

    #[test]
    fn test_long_string_without_closing_quote() {
        let source = format!("\"{}", "b".repeat(MAX_LEXEME_LEN * 2));
        let tokens = tokenize_source(&source);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].error(), Some(LexErrorKind::UnterminatedString));
    }

    #[test]
    fn test_unterminated_comment() {
        let tokens = tokenize_source("x /* Unterminated comment\n");
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].token_type, TokenType::Identifier);
        assert_eq!(tokens[1].error(), Some(LexErrorKind::UnterminatedComment));
        assert_eq!(tokens[1].location.column, 3);
        assert_eq!(tokens[2].token_type, TokenType::Eof);
    }

    #[test]
    fn test_comments_between_tokens() {
        assert_eq!(
            lexemes("/* comment */ x = 10; // line"),
            vec!["x", "=", "10", ";", "EOF"]
        );
    }

    #[test]
    fn test_overlong_number_and_identifier() {
        let number = "9".repeat(MAX_LEXEME_LEN + 1);
        let tokens = tokenize_source(&number);
        assert_eq!(tokens[0].error(), Some(LexErrorKind::InvalidNumber));
        assert_eq!(tokens[1].token_type, TokenType::Eof);

        let name = "n".repeat(MAX_LEXEME_LEN + 1);
        let tokens = tokenize_source(&name);
        assert_eq!(tokens[0].error(), Some(LexErrorKind::InvalidIdentifier));

        let fits = "n".repeat(MAX_LEXEME_LEN);
        assert_eq!(kinds(&fits)[0], TokenType::Identifier);
    }

    #[test]
    fn test_source_location() {
        let tokens = tokenize_source("int x;\n  x = 1;\n/* a\nb */ print x;");
        assert_eq!((tokens[0].location.line, tokens[0].location.column), (1, 1));
        assert_eq!((tokens[1].location.line, tokens[1].location.column), (1, 5));
        assert_eq!((tokens[3].location.line, tokens[3].location.column), (2, 3));
        assert_eq!((tokens[5].location.line, tokens[5].location.column), (2, 7));
        // print comes after a comment spanning two lines
        assert_eq!(tokens[7].lexeme, "print");
        assert_eq!((tokens[7].location.line, tokens[7].location.column), (4, 6));
    }

    #[test]
    fn test_line_counting_across_errors() {
        let tokens = tokenize_source("1 ++ 2\n@\n3");
        assert_eq!(tokens[1].location.line, 1);
        assert_eq!(tokens[3].error(), Some(LexErrorKind::InvalidChar));
        assert_eq!(tokens[3].location.line, 2);
        assert_eq!(tokens[4].location.line, 3);
    }

    #[test]
    fn test_next_token_after_eof_keeps_returning_eof() {
        let mut lexer = Lexer::new("x", None);
        assert_eq!(lexer.next_token().token_type, TokenType::Identifier);
        assert!(lexer.next_token().is_eof());
        assert!(lexer.next_token().is_eof());
    }

    #[test]
    fn test_filename_in_location() {
        let tokens = Lexer::new("x", Some("demo.ql")).tokenize();
        assert_eq!(tokens[0].location.filename.as_deref(), Some("demo.ql"));
    }
}
