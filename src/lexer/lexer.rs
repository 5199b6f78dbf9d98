use crate::error::{CompileError, CompileResult};

use super::{token::keyword, Token, TokenKind};

/// Forward-only scanner over the source text.
///
/// The source is read as if a single `'\n'` were appended to it, and every
/// offset past that newline reads as `'\0'`, which scans as `Eof`.
#[derive(Debug)]
pub struct Lexer<'a> {
    source: &'a str,
    pos: usize,
    current: char,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut lexer = Self {
            source,
            pos: 0,
            current: '\0',
        };
        lexer.current = lexer.char_at(0);
        lexer
    }

    /// Scan the whole input, `Eof` included.
    pub fn tokenize(source: &'a str) -> CompileResult<Vec<Token<'a>>> {
        let mut lexer = Lexer::new(source);
        let mut tokens = vec![];
        loop {
            let token = lexer.next_token()?;
            tokens.push(token);
            if token.kind == TokenKind::Eof {
                return Ok(tokens);
            }
        }
    }

    pub fn next_token(&mut self) -> CompileResult<Token<'a>> {
        self.skip_whitespace();
        self.skip_comment();

        match self.current {
            '+' => Ok(self.single(TokenKind::Plus)),
            '-' => Ok(self.single(TokenKind::Minus)),
            '*' => Ok(self.single(TokenKind::Star)),
            '/' => Ok(self.single(TokenKind::Slash)),
            '\n' => Ok(self.single(TokenKind::Newline)),
            '\0' if self.pos > self.source.len() => {
                Ok(Token::new("", TokenKind::Eof, self.pos))
            }
            '=' => Ok(self.maybe_double(TokenKind::Assign, TokenKind::Equal)),
            '>' => Ok(self.maybe_double(TokenKind::Greater, TokenKind::GreaterEqual)),
            '<' => Ok(self.maybe_double(TokenKind::Less, TokenKind::LessEqual)),
            '!' => {
                if self.peek() == '=' {
                    Ok(self.double(TokenKind::NotEqual))
                } else {
                    Err(CompileError::lexical(
                        self.pos,
                        format!(
                            "expected a two-character not-equal operator '!=', got '!{}'",
                            self.peek().escape_debug()
                        ),
                    ))
                }
            }
            '"' => self.string(),
            c if c.is_ascii_digit() => self.number(),
            c if c.is_ascii_alphabetic() => Ok(self.identifier()),
            c => Err(CompileError::lexical(
                self.pos,
                format!("unknown character: {:?}", c),
            )),
        }
    }

    fn char_at(&self, pos: usize) -> char {
        if pos < self.source.len() {
            self.source[pos..].chars().next().unwrap_or('\0')
        } else if pos == self.source.len() {
            '\n'
        } else {
            '\0'
        }
    }

    fn width(&self) -> usize {
        if self.pos < self.source.len() {
            self.current.len_utf8()
        } else {
            1
        }
    }

    fn next_char(&mut self) {
        if self.pos > self.source.len() {
            return;
        }
        self.pos += self.width();
        self.current = self.char_at(self.pos);
    }

    fn peek(&self) -> char {
        self.char_at(self.pos + self.width())
    }

    fn text(&self, start: usize) -> &'a str {
        &self.source[start..self.pos.min(self.source.len())]
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.current, ' ' | '\t' | '\r') {
            self.next_char();
        }
    }

    fn skip_comment(&mut self) {
        if self.current != '#' {
            return;
        }
        while self.current != '\n' && self.pos <= self.source.len() {
            self.next_char();
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.pos;
        self.next_char();
        let text = if start < self.source.len() {
            self.text(start)
        } else {
            "\n"
        };
        Token::new(text, kind, start)
    }

    fn double(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.pos;
        self.next_char();
        self.next_char();
        Token::new(self.text(start), kind, start)
    }

    fn maybe_double(&mut self, single: TokenKind, double: TokenKind) -> Token<'a> {
        if self.peek() == '=' {
            self.double(double)
        } else {
            self.single(single)
        }
    }

    fn string(&mut self) -> CompileResult<Token<'a>> {
        let start = self.pos;
        self.next_char();
        let content = self.pos;

        loop {
            match self.current {
                '"' => break,
                '\n' | '\0' if self.pos >= self.source.len() => {
                    return Err(CompileError::lexical(self.pos, "unterminated string"));
                }
                c @ ('\r' | '\n' | '\t' | '\\' | '%' | '\0') => {
                    return Err(CompileError::lexical(
                        self.pos,
                        format!("illegal character in string: {:?}", c),
                    ));
                }
                _ => self.next_char(),
            }
        }

        let text = self.text(content);
        self.next_char();
        Ok(Token::new(text, TokenKind::Str, start))
    }

    fn number(&mut self) -> CompileResult<Token<'a>> {
        let start = self.pos;
        while self.current.is_ascii_digit() {
            self.next_char();
        }

        if self.current == '.' {
            let dot = self.pos;
            self.next_char();
            if !self.current.is_ascii_digit() {
                return Err(CompileError::lexical(dot, "expected a digit after '.'"));
            }
            while self.current.is_ascii_digit() {
                self.next_char();
            }
        }

        Ok(Token::new(self.text(start), TokenKind::Number, start))
    }

    fn identifier(&mut self) -> Token<'a> {
        let start = self.pos;
        while self.current.is_ascii_alphanumeric() {
            self.next_char();
        }

        let text = self.text(start);
        Token::new(text, keyword(text).unwrap_or(TokenKind::Ident), start)
    }
}
