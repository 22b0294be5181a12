// Turns source text into a flat token stream for the parser. Single pass,
// maximal-munch matching, errors accumulated rather than fail-fast so a
// script with two typos gets both reported in one run.

use std::collections::HashMap;
use std::sync::OnceLock;

use log::trace;

use crate::error::ErrorReporter;
use crate::token::{LiteralValue, Token, TokenType};

fn keywords() -> &'static HashMap<&'static str, TokenType> {
    static KEYWORDS: OnceLock<HashMap<&'static str, TokenType>> = OnceLock::new();
    KEYWORDS.get_or_init(|| {
        HashMap::from([
            ("and", TokenType::And),
            ("class", TokenType::Class),
            ("else", TokenType::Else),
            ("false", TokenType::False),
            ("for", TokenType::For),
            ("fun", TokenType::Fun),
            ("if", TokenType::If),
            ("nil", TokenType::Nil),
            ("or", TokenType::Or),
            ("print", TokenType::Print),
            ("return", TokenType::Return),
            ("super", TokenType::Super),
            ("this", TokenType::This),
            ("true", TokenType::True),
            ("var", TokenType::Var),
            ("while", TokenType::While),
        ])
    })
}

pub struct Scanner<'a> {
    source: Vec<char>,
    tokens: Vec<Token>,
    start: usize,
    current: usize,
    line: usize,
    error_reporter: &'a mut ErrorReporter,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &str, error_reporter: &'a mut ErrorReporter) -> Self {
        Self {
            source: source.chars().collect(),
            tokens: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
            error_reporter,
        }
    }

    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens
            .push(Token::new(TokenType::Eof, String::new(), None, self.line));
        trace!("scanned {} tokens", self.tokens.len());
        self.tokens
    }

    fn scan_token(&mut self) {
        let c = self.advance();
        match c {
            '(' => self.add_token(TokenType::LeftParen),
            ')' => self.add_token(TokenType::RightParen),
            '{' => self.add_token(TokenType::LeftBrace),
            '}' => self.add_token(TokenType::RightBrace),
            ',' => self.add_token(TokenType::Comma),
            '.' => self.add_token(TokenType::Dot),
            '-' => self.add_token(TokenType::Minus),
            '+' => self.add_token(TokenType::Plus),
            ';' => self.add_token(TokenType::Semicolon),
            '*' => self.add_token(TokenType::Star),
            '!' => {
                let t = if self.match_char('=') { TokenType::BangEqual } else { TokenType::Bang };
                self.add_token(t);
            }
            '=' => {
                let t = if self.match_char('=') { TokenType::EqualEqual } else { TokenType::Equal };
                self.add_token(t);
            }
            '<' => {
                let t = if self.match_char('=') { TokenType::LessEqual } else { TokenType::Less };
                self.add_token(t);
            }
            '>' => {
                let t = if self.match_char('=') { TokenType::GreaterEqual } else { TokenType::Greater };
                self.add_token(t);
            }
            '/' => {
                if self.match_char('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(TokenType::Slash);
                }
            }
            ' ' | '\r' | '\t' => {}
            '\n' => self.line += 1,
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if is_alpha(c) => self.identifier(),
            _ => self.error_reporter.error(self.line, "Unexpected character."),
        }
    }

    fn string(&mut self) {
        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.error_reporter.error(self.line, "Unterminated string.");
            return;
        }

        self.advance(); // the closing "
        let value: String = self.source[self.start + 1..self.current - 1].iter().collect();
        self.add_token_with_literal(TokenType::String, LiteralValue::String(value));
    }

    fn number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let value: f64 = text.parse().expect("scanner only collects digits and one dot");
        self.add_token_with_literal(TokenType::Number, LiteralValue::Number(value));
    }

    fn identifier(&mut self) {
        while is_alphanumeric(self.peek()) {
            self.advance();
        }

        let text: String = self.source[self.start..self.current].iter().collect();
        let token_type = keywords().get(text.as_str()).cloned().unwrap_or(TokenType::Identifier);
        match token_type {
            TokenType::True => self.add_token_with_literal(token_type, LiteralValue::Boolean(true)),
            TokenType::False => self.add_token_with_literal(token_type, LiteralValue::Boolean(false)),
            TokenType::Nil => self.add_token_with_literal(token_type, LiteralValue::Nil),
            _ => self.add_token(token_type),
        }
    }

    fn advance(&mut self) -> char {
        let c = self.source[self.current];
        self.current += 1;
        c
    }

    fn match_char(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.source[self.current] != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> char {
        *self.source.get(self.current).unwrap_or(&'\0')
    }

    fn peek_next(&self) -> char {
        *self.source.get(self.current + 1).unwrap_or(&'\0')
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn add_token(&mut self, token_type: TokenType) {
        self.add_token_optional_literal(token_type, None);
    }

    fn add_token_with_literal(&mut self, token_type: TokenType, literal: LiteralValue) {
        self.add_token_optional_literal(token_type, Some(literal));
    }

    fn add_token_optional_literal(&mut self, token_type: TokenType, literal: Option<LiteralValue>) {
        let lexeme: String = self.source[self.start..self.current].iter().collect();
        self.tokens.push(Token::new(token_type, lexeme, literal, self.line));
    }
}

fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_alphanumeric(c: char) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        let mut reporter = ErrorReporter::new();
        let tokens = Scanner::new(source, &mut reporter).scan_tokens();
        assert!(!reporter.had_error(), "unexpected scan error for {source:?}");
        tokens
    }

    #[test]
    fn scans_punctuation_and_operators() {
        let tokens = scan("(){}==!=<=>=");
        let types: Vec<_> = tokens.iter().map(|t| t.token_type.clone()).collect();
        assert_eq!(
            types,
            vec![
                TokenType::LeftParen,
                TokenType::RightParen,
                TokenType::LeftBrace,
                TokenType::RightBrace,
                TokenType::EqualEqual,
                TokenType::BangEqual,
                TokenType::LessEqual,
                TokenType::GreaterEqual,
                TokenType::Eof,
            ]
        );
    }

    #[test]
    fn scans_string_and_number_literals() {
        let tokens = scan("\"hi\" 12.5");
        assert_eq!(tokens[0].literal, Some(LiteralValue::String("hi".to_string())));
        assert_eq!(tokens[1].literal, Some(LiteralValue::Number(12.5)));
    }

    #[test]
    fn keywords_are_not_identifiers() {
        let tokens = scan("var x = nil;");
        assert_eq!(tokens[0].token_type, TokenType::Var);
        assert_eq!(tokens[3].token_type, TokenType::Nil);
    }

    #[test]
    fn skips_line_comments() {
        let tokens = scan("1 // a comment\n+ 2");
        let types: Vec<_> = tokens.iter().map(|t| t.token_type.clone()).collect();
        assert_eq!(types, vec![TokenType::Number, TokenType::Plus, TokenType::Number, TokenType::Eof]);
    }

    #[test]
    fn reports_unterminated_string() {
        let mut reporter = ErrorReporter::new();
        Scanner::new("\"unterminated", &mut reporter).scan_tokens();
        assert!(reporter.had_error());
    }
}
