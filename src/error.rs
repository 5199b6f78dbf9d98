//! Errors shared by the lexer and the parser.
//!
//! Every failure is fatal to the compilation run, so there is exactly one
//! error value per failed run. It carries a message and the byte offset of
//! the offending input.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CompileError {
    #[snafu(display("{message}"))]
    Lexical { message: String, position: usize },

    /// Syntax errors and the semantic checks performed while parsing.
    #[snafu(display("{message}"))]
    Syntax { message: String, position: usize },
}

impl CompileError {
    pub fn lexical(position: usize, message: impl Into<String>) -> Self {
        LexicalSnafu {
            message: message.into(),
            position,
        }
        .build()
    }

    pub fn syntax(position: usize, message: impl Into<String>) -> Self {
        SyntaxSnafu {
            message: message.into(),
            position,
        }
        .build()
    }

    pub fn message(&self) -> &str {
        match self {
            CompileError::Lexical { message, .. } | CompileError::Syntax { message, .. } => {
                message
            }
        }
    }

    pub fn position(&self) -> usize {
        match self {
            CompileError::Lexical { position, .. } | CompileError::Syntax { position, .. } => {
                *position
            }
        }
    }

    /// `<path>:<position>: error: <message>`
    pub fn render(&self, path: &str) -> String {
        format!("{}:{}: error: {}", path, self.position(), self.message())
    }

    /// The source line holding the error with a caret under the offending byte.
    pub fn snippet(&self, source: &str) -> String {
        let loc = self.position().min(source.len());
        let start = source[..loc].rfind('\n').map(|i| i + 1).unwrap_or(0);
        let end = source[loc..]
            .find('\n')
            .map(|i| loc + i)
            .unwrap_or(source.len());
        let column = source[start..loc].chars().count();
        format!("{}\n{}^", &source[start..end], " ".repeat(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_uses_path_position_message() {
        let err = CompileError::syntax(12, "label already exists: loop");
        assert_eq!(
            err.render("prog.tb"),
            "prog.tb:12: error: label already exists: loop"
        );
    }

    #[test]
    fn snippet_points_at_offending_byte() {
        let source = "LET a = 1\nPRINT b\n";
        let err = CompileError::syntax(16, "undefined reference to variable: b");
        assert_eq!(err.snippet(source), "PRINT b\n      ^");
    }

    #[test]
    fn snippet_clamps_past_the_end() {
        let err = CompileError::lexical(100, "unterminated string");
        assert_eq!(err.snippet("PRINT \"a"), "PRINT \"a\n        ^");
    }
}
