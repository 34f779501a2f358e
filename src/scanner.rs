use std::str::Chars;

use peekmore::{PeekMore, PeekMoreIterator};

use crate::error::{Error, Host, ScanError};
use crate::literal::Literal;
use crate::token::{Token, Type};

/// Converts source text into a flat token list. Never fails fast: a bad
/// character is reported to the `Host` and scanning resumes at the next
/// character, so a single run can surface every lexical error in a file at
/// once.
pub struct Scanner<'a> {
    source: PeekMoreIterator<Chars<'a>>,
    tokens: Vec<Token>,
    line: usize,
    host: &'a Host,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, host: &'a Host) -> Scanner<'a> {
        Scanner {
            source: source.chars().peekmore(),
            tokens: Vec::new(),
            line: 1,
            host,
        }
    }

    pub fn scan_tokens(mut self) -> Vec<Token> {
        while !self.is_at_end() {
            self.scan_token();
        }

        self.tokens.push(Token::new(Type::EOF, String::new(), None, self.line));
        self.tokens
    }

    fn is_at_end(&mut self) -> bool {
        self.source.peek().is_none()
    }

    fn advance(&mut self) -> char {
        self.source.next().expect("advance called past end of source")
    }

    /// Returns the next character, or `'\0'` at end of source.
    fn peek(&mut self) -> char {
        *self.source.peek().unwrap_or(&'\0')
    }

    /// Returns the character after next, or `'\0'` at end of source.
    fn peek_next(&mut self) -> char {
        *self.source.peek_next().unwrap_or(&'\0')
    }

    fn advance_if(&mut self, expected: char) -> bool {
        if self.peek() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn add_token(&mut self, r#type: Type, lexeme: String, literal: Option<Literal>) {
        self.tokens.push(Token::new(r#type, lexeme, literal, self.line));
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            '(' => self.add_token(Type::LeftParen, c.to_string(), None),
            ')' => self.add_token(Type::RightParen, c.to_string(), None),
            '{' => self.add_token(Type::LeftBrace, c.to_string(), None),
            '}' => self.add_token(Type::RightBrace, c.to_string(), None),
            ',' => self.add_token(Type::Comma, c.to_string(), None),
            '.' => self.add_token(Type::Dot, c.to_string(), None),
            '-' => self.add_token(Type::Minus, c.to_string(), None),
            '+' => self.add_token(Type::Plus, c.to_string(), None),
            ';' => self.add_token(Type::Semicolon, c.to_string(), None),
            '*' => self.add_token(Type::Star, c.to_string(), None),

            '!' => {
                if self.advance_if('=') {
                    self.add_token(Type::BangEqual, "!=".to_string(), None);
                } else {
                    self.add_token(Type::Bang, "!".to_string(), None);
                }
            },
            '=' => {
                if self.advance_if('=') {
                    self.add_token(Type::EqualEqual, "==".to_string(), None);
                } else {
                    self.add_token(Type::Equal, "=".to_string(), None);
                }
            },
            '<' => {
                if self.advance_if('=') {
                    self.add_token(Type::LessEqual, "<=".to_string(), None);
                } else {
                    self.add_token(Type::Less, "<".to_string(), None);
                }
            },
            '>' => {
                if self.advance_if('=') {
                    self.add_token(Type::GreaterEqual, ">=".to_string(), None);
                } else {
                    self.add_token(Type::Greater, ">".to_string(), None);
                }
            },
            '/' => {
                if self.advance_if('/') {
                    while self.peek() != '\n' && !self.is_at_end() {
                        self.advance();
                    }
                } else {
                    self.add_token(Type::Slash, "/".to_string(), None);
                }
            },

            ' ' | '\r' | '\t' => {},

            '\n' => {
                self.line += 1;
            },

            '"' => self.string(),

            c if c.is_ascii_digit() => self.number(c),

            c if c.is_ascii_alphabetic() || c == '_' => self.identifier(c),

            _ => {
                ScanError {
                    line: self.line,
                    message: "Unexpected character.".to_string(),
                }.throw(self.host);
            },
        }
    }

    fn string(&mut self) {
        let start_line = self.line;
        let mut value = String::new();

        while self.peek() != '"' && !self.is_at_end() {
            if self.peek() == '\n' {
                self.line += 1;
            }
            value.push(self.advance());
        }

        if self.is_at_end() {
            ScanError {
                line: start_line,
                message: "Unterminated string.".to_string(),
            }.throw(self.host);
            return;
        }

        self.advance(); // closing quote

        self.add_token(Type::String, value.clone(), Some(Literal::String(value)));
    }

    fn number(&mut self, first: char) {
        let mut lexeme = String::from(first);

        while self.peek().is_ascii_digit() {
            lexeme.push(self.advance());
        }

        if self.peek() == '.' && self.peek_next().is_ascii_digit() {
            lexeme.push(self.advance()); // the '.'
            while self.peek().is_ascii_digit() {
                lexeme.push(self.advance());
            }
        }

        let value: f64 = lexeme.parse().expect("scanned number lexeme to be valid");
        self.add_token(Type::Number, lexeme, Some(Literal::Number(value)));
    }

    fn identifier(&mut self, first: char) {
        let mut lexeme = String::from(first);

        while self.peek().is_ascii_alphanumeric() || self.peek() == '_' {
            lexeme.push(self.advance());
        }

        let r#type = match lexeme.as_str() {
            "and" => Type::And,
            "class" => Type::Class,
            "else" => Type::Else,
            "false" => Type::False,
            "for" => Type::For,
            "fun" => Type::Fun,
            "if" => Type::If,
            "nil" => Type::Nil,
            "or" => Type::Or,
            "print" => Type::Print,
            "return" => Type::Return,
            "super" => Type::Super,
            "this" => Type::This,
            "true" => Type::True,
            "var" => Type::Var,
            "while" => Type::While,
            _ => Type::Identifier,
        };

        self.add_token(r#type, lexeme, None);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn scan(source: &str) -> Vec<Token> {
        let host = Host::new();
        Scanner::new(source, &host).scan_tokens()
    }

    #[test]
    fn empty_source_yields_eof_on_line_one() {
        let tokens = scan("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].r#type, Type::EOF);
        assert_eq!(tokens[0].line, 1);
    }

    #[test]
    fn braces_and_eof() {
        let tokens = scan("{}");
        let kinds: Vec<Type> = tokens.iter().map(|t| t.r#type).collect();
        assert_eq!(kinds, vec![Type::LeftBrace, Type::RightBrace, Type::EOF]);
    }

    #[test]
    fn final_line_tracks_embedded_newlines() {
        let tokens = scan("1;\n2;\n3;");
        assert_eq!(tokens.last().unwrap().line, 3);
    }

    #[test]
    fn number_is_always_a_double() {
        let tokens = scan("42");
        assert_eq!(tokens[0].literal, Some(Literal::Number(42.0)));
    }

    #[test]
    fn string_literal_strips_quotes() {
        let tokens = scan("\"hi\"");
        assert_eq!(tokens[0].literal, Some(Literal::String("hi".to_string())));
    }

    #[test]
    fn unterminated_string_sets_error_and_emits_no_token() {
        let host = Host::new();
        let tokens = Scanner::new("\"oops", &host).scan_tokens();
        assert!(host.had_error());
        assert_eq!(tokens.len(), 1); // just EOF
    }

    #[test]
    fn unexpected_character_continues_scanning() {
        let host = Host::new();
        let tokens = Scanner::new("@1", &host).scan_tokens();
        assert!(host.had_error());
        assert_eq!(tokens[0].r#type, Type::Number);
    }

    #[test]
    fn keywords_are_recognized() {
        let tokens = scan("and nil while");
        let kinds: Vec<Type> = tokens.iter().map(|t| t.r#type).collect();
        assert_eq!(kinds, vec![Type::And, Type::Nil, Type::While, Type::EOF]);
    }

    #[test]
    fn reserved_class_words_still_scan_as_keywords() {
        let tokens = scan("class this super");
        let kinds: Vec<Type> = tokens.iter().map(|t| t.r#type).collect();
        assert_eq!(kinds, vec![Type::Class, Type::This, Type::Super, Type::EOF]);
    }

    #[test]
    fn line_comment_is_skipped() {
        let tokens = scan("// comment\n1;");
        assert_eq!(tokens[0].r#type, Type::Number);
        assert_eq!(tokens[0].line, 2);
    }
}
