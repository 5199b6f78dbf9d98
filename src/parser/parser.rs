use crate::codegen::Emitter;
use crate::error::{CompileError, CompileResult};
use crate::lexer::{Lexer, Token, TokenKind};

use super::symbols::Symbols;

/// Parse the whole token stream, emitting C into `emitter` as each rule is
/// recognized. Stops at the first error.
pub fn run(lexer: Lexer<'_>, emitter: &mut Emitter) -> CompileResult<()> {
    Parser::new(lexer, emitter)?.parse()
}

/// Same as [`run`], tracing each production on stderr when `verbose` is set.
pub fn run_traced(
    lexer: Lexer<'_>,
    emitter: &mut Emitter,
    verbose: bool,
) -> CompileResult<()> {
    Parser::new(lexer, emitter)?.verbose(verbose).parse()
}

#[derive(Debug)]
pub struct Parser<'a, 'e> {
    lexer: Lexer<'a>,
    emitter: &'e mut Emitter,
    current: Token<'a>,
    peek: Token<'a>,
    symbols: Symbols,
    consumed: usize,
    verbose: bool,
}

/// program    = nl? stmt*
/// stmt       = ("PRINT" (string | expr)
///              | "IF" comparison "THEN" nl stmt* "ENDIF"
///              | "WHILE" comparison "REPEAT" nl stmt* "ENDWHILE"
///              | "LABEL" ident
///              | "GOTO" ident
///              | "LET" ident "=" expr
///              | "INPUT" ident) nl
/// comparison = expr (("==" | "!=" | "<" | "<=" | ">" | ">=") expr)+
/// expr       = term (("+" | "-") term)*
/// term       = unary (("*" | "/") unary)*
/// unary      = ("+" | "-") unary | primary
/// primary    = number | ident
/// nl         = "\n"+
impl<'a, 'e> Parser<'a, 'e> {
    pub fn new(mut lexer: Lexer<'a>, emitter: &'e mut Emitter) -> CompileResult<Self> {
        let current = lexer.next_token()?;
        let peek = lexer.next_token()?;
        Ok(Self {
            lexer,
            emitter,
            current,
            peek,
            symbols: Symbols::new(),
            consumed: 0,
            verbose: false,
        })
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn parse(mut self) -> CompileResult<()> {
        self.parse_program()
    }

    fn trace(&self, production: &str) {
        if self.verbose {
            eprintln!("parser: {production} at {}", self.current.position);
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn advance(&mut self) -> CompileResult<()> {
        self.current = self.peek;
        self.consumed += 1;
        self.peek = self.lexer.next_token()?;
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<()> {
        if !self.check(kind) {
            return Err(CompileError::syntax(
                self.current.position,
                format!("expected {:?}, got {:?}", kind, self.current.kind),
            ));
        }
        self.advance()
    }

    fn expect_ident(&mut self) -> CompileResult<Token<'a>> {
        let token = self.current;
        self.expect(TokenKind::Ident)?;
        Ok(token)
    }

    /// Copy the current token into the body and move past it. A sign that
    /// would touch another sign gets a space so C never reads `--` or `++`.
    fn emit_token(&mut self) -> CompileResult<()> {
        let token = self.current;
        if matches!(token.kind, TokenKind::Plus | TokenKind::Minus)
            && self.emitter.body().ends_with(|c: char| c == '+' || c == '-')
        {
            self.emitter.emit(" ");
        }
        self.emitter.emit(token.text);
        self.advance()
    }

    fn declare_var(&mut self, name: Token<'a>) {
        if self.symbols.declare_var(name.text) {
            if self.verbose {
                eprintln!("parser: declare {} at {}", name.text, name.position);
            }
            self.emitter.header_line(&format!("float {};", name.text));
        }
    }

    fn parse_program(&mut self) -> CompileResult<()> {
        self.trace("PROGRAM");
        self.emitter.header_line("#include <stdio.h>");
        self.emitter.header_line("int main(void){");

        while self.check(TokenKind::Newline) {
            self.advance()?;
        }
        while !self.check(TokenKind::Eof) {
            self.parse_stmt()?;
        }

        self.emitter.emit_line("return 0;");
        self.emitter.emit_line("}");

        if let Some((label, position)) = self.symbols.first_unresolved_label() {
            return Err(CompileError::syntax(
                position,
                format!("attempting to GOTO undeclared label: {label}"),
            ));
        }

        if self.verbose {
            eprintln!(
                "parser: done, {} tokens, {} variables, {} labels",
                self.consumed,
                self.symbols.var_count(),
                self.symbols.label_count()
            );
        }
        Ok(())
    }

    fn parse_stmt(&mut self) -> CompileResult<()> {
        match self.current.kind {
            TokenKind::Print => {
                self.trace("STATEMENT-PRINT");
                self.advance()?;

                if self.check(TokenKind::Str) {
                    let line = format!("printf(\"{}\\n\");", self.current.text);
                    self.emitter.emit_line(&line);
                    self.advance()?;
                } else {
                    self.emitter.emit("printf(\"%.2f\\n\", (float)(");
                    self.parse_expr()?;
                    self.emitter.emit_line("));");
                }
            }
            TokenKind::If => {
                self.trace("STATEMENT-IF");
                self.advance()?;
                self.emitter.emit("if(");
                self.parse_comparison()?;

                self.expect(TokenKind::Then)?;
                self.nl()?;
                self.emitter.emit_line("){");

                while !self.check(TokenKind::EndIf) {
                    self.parse_stmt()?;
                }
                self.expect(TokenKind::EndIf)?;
                self.emitter.emit_line("}");
            }
            TokenKind::While => {
                self.trace("STATEMENT-WHILE");
                self.advance()?;
                self.emitter.emit("while(");
                self.parse_comparison()?;

                self.expect(TokenKind::Repeat)?;
                self.nl()?;
                self.emitter.emit_line("){");

                while !self.check(TokenKind::EndWhile) {
                    self.parse_stmt()?;
                }
                self.expect(TokenKind::EndWhile)?;
                self.emitter.emit_line("}");
            }
            TokenKind::Label => {
                self.trace("STATEMENT-LABEL");
                self.advance()?;
                let name = self.expect_ident()?;
                if !self.symbols.declare_label(name.text) {
                    return Err(CompileError::syntax(
                        name.position,
                        format!("label already exists: {}", name.text),
                    ));
                }
                self.emitter.emit_line(&format!("{}:", name.text));
            }
            TokenKind::Goto => {
                self.trace("STATEMENT-GOTO");
                self.advance()?;
                let name = self.expect_ident()?;
                self.symbols.reference_label(name.text, name.position);
                self.emitter.emit_line(&format!("goto {};", name.text));
            }
            TokenKind::Let => {
                self.trace("STATEMENT-LET");
                self.advance()?;
                let name = self.expect_ident()?;
                self.declare_var(name);

                self.emitter.emit(&format!("{} = ", name.text));
                self.expect(TokenKind::Assign)?;
                self.parse_expr()?;
                self.emitter.emit_line(";");
            }
            TokenKind::Input => {
                self.trace("STATEMENT-INPUT");
                self.advance()?;
                let name = self.expect_ident()?;
                self.declare_var(name);

                self.emitter
                    .emit_line(&format!("if(0 == scanf(\"%f\", &{})) {{", name.text));
                self.emitter.emit_line(&format!("{} = 0;", name.text));
                self.emitter.emit_line("scanf(\"%*s\");");
                self.emitter.emit_line("}");
            }
            kind => {
                return Err(CompileError::syntax(
                    self.current.position,
                    format!("unexpected {:?} at start of statement", kind),
                ));
            }
        }

        self.nl()
    }

    fn parse_comparison(&mut self) -> CompileResult<()> {
        self.trace("COMPARISON");
        self.parse_expr()?;

        if !self.current.kind.is_comparison() {
            return Err(CompileError::syntax(
                self.current.position,
                format!("expected comparison operator, got {:?}", self.current.kind),
            ));
        }
        while self.current.kind.is_comparison() {
            self.emit_token()?;
            self.parse_expr()?;
        }
        Ok(())
    }

    fn parse_expr(&mut self) -> CompileResult<()> {
        self.trace("EXPRESSION");
        self.parse_term()?;

        while matches!(self.current.kind, TokenKind::Plus | TokenKind::Minus) {
            self.emit_token()?;
            self.parse_term()?;
        }
        Ok(())
    }

    fn parse_term(&mut self) -> CompileResult<()> {
        self.trace("TERM");
        self.parse_unary()?;

        while matches!(self.current.kind, TokenKind::Star | TokenKind::Slash) {
            self.emit_token()?;
            self.parse_unary()?;
        }
        Ok(())
    }

    fn parse_unary(&mut self) -> CompileResult<()> {
        self.trace("UNARY");
        // Any number of leading signs.
        while matches!(self.current.kind, TokenKind::Plus | TokenKind::Minus) {
            self.emit_token()?;
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> CompileResult<()> {
        self.trace("PRIMARY");
        match self.current.kind {
            TokenKind::Number => self.emit_token(),
            TokenKind::Ident => {
                if !self.symbols.is_declared(self.current.text) {
                    return Err(CompileError::syntax(
                        self.current.position,
                        format!("undefined reference to variable: {}", self.current.text),
                    ));
                }
                self.emit_token()
            }
            kind => Err(CompileError::syntax(
                self.current.position,
                format!("unexpected {:?} in expression", kind),
            )),
        }
    }

    fn nl(&mut self) -> CompileResult<()> {
        self.trace("NEWLINE");
        self.expect(TokenKind::Newline)?;
        while self.check(TokenKind::Newline) {
            self.advance()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(source: &str) -> String {
        let mut emitter = Emitter::new();
        run(Lexer::new(source), &mut emitter).unwrap();
        emitter.body().to_string()
    }

    fn error(source: &str) -> CompileError {
        let mut emitter = Emitter::new();
        run(Lexer::new(source), &mut emitter).unwrap_err()
    }

    #[test]
    fn repeated_signs_stay_apart() {
        assert_eq!(body("LET a = - -5\n"), "a = - -5;\nreturn 0;\n}\n");
        assert_eq!(body("LET a = 3 - -2\n"), "a = 3- -2;\nreturn 0;\n}\n");
        assert_eq!(body("LET a = +-+1\n"), "a = + - +1;\nreturn 0;\n}\n");
    }

    #[test]
    fn single_sign_is_not_padded() {
        assert_eq!(body("LET a = -5 * 2\n"), "a = -5*2;\nreturn 0;\n}\n");
    }

    #[test]
    fn input_emits_guarded_read() {
        assert_eq!(
            body("INPUT n\n"),
            "if(0 == scanf(\"%f\", &n)) {\nn = 0;\nscanf(\"%*s\");\n}\nreturn 0;\n}\n"
        );
    }

    #[test]
    fn let_declares_before_the_expression() {
        assert_eq!(body("LET a = a + 1\n"), "a = a+1;\nreturn 0;\n}\n");
    }

    #[test]
    fn variables_declared_once_in_header() {
        let mut emitter = Emitter::new();
        run(
            Lexer::new("LET b = 1\nINPUT a\nLET b = 2\nINPUT a\n"),
            &mut emitter,
        )
        .unwrap();
        assert_eq!(
            emitter.header(),
            "#include <stdio.h>\nint main(void){\nfloat b;\nfloat a;\n"
        );
    }

    #[test]
    fn statement_must_end_with_newline() {
        let err = error("PRINT 1 PRINT 2\n");
        assert_eq!(err.message(), "expected Newline, got Print");
        assert_eq!(err.position(), 8);
    }

    #[test]
    fn unterminated_block() {
        let err = error("IF 1 < 2 THEN\nPRINT 1\n");
        assert_eq!(err.message(), "unexpected Eof at start of statement");
    }

    #[test]
    fn missing_operand() {
        let err = error("LET a = 1 +\n");
        assert_eq!(err.message(), "unexpected Newline in expression");
        assert_eq!(err.position(), 11);
    }

    #[test]
    fn lexical_error_in_lookahead_aborts() {
        let err = error("LET a = 1\nPRINT a ? 1\n");
        assert!(matches!(err, CompileError::Lexical { .. }));
        assert_eq!(err.position(), 18);
    }
}
