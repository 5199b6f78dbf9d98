use phf::phf_map;

pub(super) static KEYWORDS: phf::Map<&str, TokenKind> = phf_map! {
    "LABEL" => TokenKind::Label,
    "GOTO" => TokenKind::Goto,
    "PRINT" => TokenKind::Print,
    "INPUT" => TokenKind::Input,
    "LET" => TokenKind::Let,
    "IF" => TokenKind::If,
    "THEN" => TokenKind::Then,
    "ENDIF" => TokenKind::EndIf,
    "WHILE" => TokenKind::While,
    "REPEAT" => TokenKind::Repeat,
    "ENDWHILE" => TokenKind::EndWhile,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Eof,
    Newline,
    Number,
    Ident,
    Str,

    Label,
    Goto,
    Print,
    Input,
    Let,
    If,
    Then,
    EndIf,
    While,
    Repeat,
    EndWhile,

    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
}

impl TokenKind {
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual
        )
    }
}

/// A lexeme borrowed from the source. `position` is the byte offset of its
/// first character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
    pub position: usize,
}

impl<'a> Token<'a> {
    pub fn new(text: &'a str, kind: TokenKind, position: usize) -> Self {
        Self {
            text,
            kind,
            position,
        }
    }
}

pub fn keyword(text: &str) -> Option<TokenKind> {
    KEYWORDS.get(text).copied()
}
