pub mod codegen;
pub mod error;
pub mod lexer;
pub mod log;
pub mod parser;

use codegen::Emitter;
use lexer::Lexer;

pub use error::{CompileError, CompileResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct CompileOptions {
    /// Trace every recognized production on stderr.
    pub verbose: bool,
}

/// Translate a program into C source text.
pub fn compile(source: &str) -> CompileResult<String> {
    compile_with(source, CompileOptions::default())
}

pub fn compile_with(source: &str, options: CompileOptions) -> CompileResult<String> {
    let lexer = Lexer::new(source);
    let mut emitter = Emitter::new();
    parser::run_traced(lexer, &mut emitter, options.verbose)?;

    let output = emitter.finalize();
    if options.verbose {
        eprintln!(
            "compile: {} bytes in, {} bytes out",
            source.len(),
            output.len()
        );
    }
    Ok(output)
}
