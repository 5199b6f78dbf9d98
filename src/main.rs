use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use clap_stdin::FileOrStdin;
use tinybc::lexer::Lexer;
use tinybc::{compile_with, CompileOptions};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// C source
    C,
    /// The token stream, one token per line
    Tokens,
}

/// Compile a tiny BASIC program to C.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file, or `-` for stdin
    input: FileOrStdin,

    /// Output file, or `-` for stdout [default: out.c, or stdout with --emit tokens]
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = Emit::C)]
    emit: Emit,

    /// Trace the compiler on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match execute(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

impl Cli {
    fn output_path(&self) -> PathBuf {
        match (&self.output, self.emit) {
            (Some(path), _) => path.clone(),
            (None, Emit::C) => PathBuf::from("out.c"),
            (None, Emit::Tokens) => PathBuf::from("-"),
        }
    }
}

/// Returns `Ok(false)` when the program does not compile; nothing is written then.
fn execute(cli: Cli) -> Result<bool> {
    tinybc::log::set_verbose(cli.verbose);
    let output_path = cli.output_path();
    let path = if cli.input.is_stdin() {
        "<stdin>".to_string()
    } else {
        cli.input.filename().to_string()
    };
    let source = cli
        .input
        .contents()
        .with_context(|| format!("failed to read input {path}"))?;

    if tinybc::log::is_verbose() {
        eprintln!("tinybc {}", env!("CARGO_PKG_VERSION"));
    }

    let output = match cli.emit {
        Emit::Tokens => dump_tokens(&source),
        Emit::C => compile_with(
            &source,
            CompileOptions {
                verbose: cli.verbose,
            },
        ),
    };

    match output {
        Ok(text) => {
            write_output(&output_path, &text)?;
            eprintln!("Compiling completed.");
            Ok(true)
        }
        Err(err) => {
            eprintln!("{}", err.render(&path));
            if tinybc::log::is_verbose() {
                eprintln!("{}", err.snippet(&source));
            }
            Ok(false)
        }
    }
}

fn dump_tokens(source: &str) -> tinybc::CompileResult<String> {
    let tokens = Lexer::tokenize(source)?;
    Ok(tokens
        .iter()
        .map(|t| format!("{}\t{:?}\t{:?}\n", t.position, t.kind, t.text))
        .collect())
}

fn write_output(path: &Path, text: &str) -> Result<()> {
    if path.as_os_str() == "-" {
        return io::stdout()
            .write_all(text.as_bytes())
            .context("failed to write to stdout");
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {parent:?}"))?;
        }
    }
    fs::write(path, text).with_context(|| format!("failed to write output file {path:?}"))
}
