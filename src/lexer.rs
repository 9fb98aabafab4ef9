//! Lexical analyzer.

use crate::token::{Token, TokenKind};

const KEYWORDS: [(&str, TokenKind); 16] = [
    ("metin", TokenKind::TypeString),
    ("sayi", TokenKind::TypeNumber),
    ("doğruluk", TokenKind::TypeBool),
    ("doğru", TokenKind::True),
    ("yanlış", TokenKind::False),
    ("eğer", TokenKind::If),
    ("yoksa", TokenKind::Else),
    ("döngü", TokenKind::Loop),
    ("deg", TokenKind::Var),
    ("sbt", TokenKind::Const),
    ("fonk", TokenKind::Function),
    ("dön", TokenKind::Return),
    ("eşle", TokenKind::Switch),
    ("kır", TokenKind::Break),
    ("devam", TokenKind::Continue),
    ("yaz", TokenKind::Print),
];

fn keyword(lexeme: &str) -> Option<TokenKind> {
    KEYWORDS
        .iter()
        .find(|(name, _)| *name == lexeme)
        .map(|(_, kind)| *kind)
}

/// Turn a source buffer into a sequence of tokens.
///
/// The lexer is a pure function of the buffer: it owns a cursor (byte
/// offset, line, column) and nothing else. The returned sequence always
/// ends with exactly one [`TokenKind::Eof`] token. Malformed input
/// never aborts the scan; it yields [`TokenKind::Error`] tokens whose
/// lexeme is the diagnostic message.
pub struct Lexer<'a> {
    source: &'a str,
    file: &'a str,
    start: usize,
    current: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, file: &'a str) -> Lexer<'a> {
        Lexer {
            source,
            file,
            start: 0,
            current: 0,
            line: 1,
            column: 0,
        }
    }

    /// Scan the whole buffer.
    pub fn scan(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.scan_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    fn scan_token(&mut self) -> Token<'a> {
        self.skip_whitespace();

        self.start = self.current;

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }

        let c = self.advance();
        match c {
            '+' => {
                if self.is_match('+') {
                    self.make_token(TokenKind::PlusPlus)
                } else if self.is_match('=') {
                    self.make_token(TokenKind::PlusEqual)
                } else {
                    self.make_token(TokenKind::Plus)
                }
            }
            '-' => {
                if self.is_match('-') {
                    self.make_token(TokenKind::MinusMinus)
                } else if self.is_match('=') {
                    self.make_token(TokenKind::MinusEqual)
                } else {
                    self.make_token(TokenKind::Minus)
                }
            }
            '*' => {
                if self.is_match('*') {
                    self.make_token(TokenKind::StarStar)
                } else if self.is_match('=') {
                    self.make_token(TokenKind::StarEqual)
                } else {
                    self.make_token(TokenKind::Star)
                }
            }
            '/' => {
                if self.is_match('=') {
                    self.make_token(TokenKind::SlashEqual)
                } else {
                    self.make_token(TokenKind::Slash)
                }
            }
            '%' => {
                if self.is_match('=') {
                    self.make_token(TokenKind::PercentEqual)
                } else {
                    self.make_token(TokenKind::Percent)
                }
            }
            '(' => self.make_token(TokenKind::LeftParen),
            ')' => self.make_token(TokenKind::RightParen),
            '{' => self.make_token(TokenKind::LeftCurly),
            '}' => self.make_token(TokenKind::RightCurly),
            '[' => self.make_token(TokenKind::LeftBracket),
            ']' => self.make_token(TokenKind::RightBracket),
            '.' => self.make_token(TokenKind::Dot),
            ',' => self.make_token(TokenKind::Comma),
            ':' => self.make_token(TokenKind::Colon),
            ';' => self.make_token(TokenKind::Semicolon),
            '<' => {
                if self.is_match('=') {
                    self.make_token(TokenKind::LessEqual)
                } else {
                    self.make_token(TokenKind::Less)
                }
            }
            '>' => {
                if self.is_match('=') {
                    self.make_token(TokenKind::GreaterEqual)
                } else {
                    self.make_token(TokenKind::Greater)
                }
            }
            '!' => {
                if self.is_match('=') {
                    self.make_token(TokenKind::BangEqual)
                } else {
                    self.make_token(TokenKind::Bang)
                }
            }
            '=' => {
                if self.is_match('=') {
                    self.make_token(TokenKind::EqualEqual)
                } else if self.is_match('>') {
                    self.make_token(TokenKind::Arrow)
                } else {
                    self.make_token(TokenKind::Equal)
                }
            }
            '&' => {
                if self.is_match('&') {
                    self.make_token(TokenKind::AmpAmp)
                } else {
                    self.error_token("Tamamlanmamış '&&' operatörü")
                }
            }
            '|' => {
                if self.is_match('|') {
                    self.make_token(TokenKind::PipePipe)
                } else {
                    self.error_token("Tamamlanmamış '||' operatörü")
                }
            }
            '"' => self.string_literal(),
            c if is_alpha(c) => self.identifier(),
            c if c.is_ascii_digit() => self.number_literal(),
            _ => self.error_token("Bilinmeyen karakter"),
        }
    }

    fn make_token(&self, kind: TokenKind) -> Token<'a> {
        Token {
            kind,
            lexeme: &self.source[self.start..self.current],
            file: self.file,
            line: self.line,
            column: self.column,
        }
    }

    fn error_token(&self, message: &'static str) -> Token<'a> {
        Token {
            kind: TokenKind::Error,
            lexeme: message,
            file: self.file,
            line: self.line,
            column: self.column,
        }
    }

    fn string_literal(&mut self) -> Token<'a> {
        while !self.is_at_end() && self.peek() != '"' {
            self.advance();
        }

        if self.is_at_end() {
            return self.error_token("Sonlandırılmayan metinsel ifade");
        }

        self.advance();
        // Lexeme keeps both quotes; they are stripped at render time.
        self.make_token(TokenKind::StringLiteral)
    }

    fn identifier(&mut self) -> Token<'a> {
        while is_alpha(self.peek()) || self.peek().is_ascii_digit() {
            self.advance();
        }

        let lexeme = &self.source[self.start..self.current];
        match keyword(lexeme) {
            Some(kind) => self.make_token(kind),
            None => self.make_token(TokenKind::Identifier),
        }
    }

    fn number_literal(&mut self) -> Token<'a> {
        while !self.is_at_end() && self.peek().is_ascii_digit() {
            self.advance();
        }

        if self.is_match('.') {
            while !self.is_at_end() && self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        self.make_token(TokenKind::NumberLiteral)
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                ' ' | '\t' | '\r' => {
                    self.advance();
                }
                '\n' => {
                    self.line += 1;
                    self.column = 0;
                    self.advance();
                }
                '/' => {
                    if self.peek_next() == '/' {
                        while self.peek() != '\n' && !self.is_at_end() {
                            self.advance();
                        }
                    } else if self.peek_next() == '*' {
                        while !(self.peek() == '*' && self.peek_next() == '/') && !self.is_at_end()
                        {
                            if self.advance() == '\n' {
                                self.line += 1;
                            }
                        }
                        if !self.is_at_end() {
                            // Skip over "*/"; both are single-byte.
                            self.current += 2;
                        }
                    } else {
                        return;
                    }
                }
                _ => return,
            }
        }
    }

    fn advance(&mut self) -> char {
        let c = self.peek();
        if c != '\0' {
            self.current += c.len_utf8();
            self.column += 1;
        }
        c
    }

    fn peek(&self) -> char {
        self.source[self.current..].chars().next().unwrap_or('\0')
    }

    fn peek_next(&self) -> char {
        let mut chars = self.source[self.current..].chars();
        chars.next();
        chars.next().unwrap_or('\0')
    }

    fn is_match(&mut self, expected: char) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.advance();
        true
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }
}

fn is_alpha(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}
