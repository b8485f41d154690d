use std::path::PathBuf;

use clap::Parser;

/// Translate a program to C, then compile and run it.
///
/// The stage flags stop the pipeline early: `--lex` prints the tokens,
/// `--parse` prints the tree, `--codegen` prints the generated C and
/// `--emit-c` writes it to a `.c` file instead of compiling it.
#[derive(Parser, Debug)]
#[command(name = "toyc", version, about, long_about = None)]
pub struct Args {
    /// Path to the source file
    pub input_path: PathBuf,

    /// Run the lexer only
    #[arg(short, long)]
    pub lex: bool,

    /// Run the lexer and parser only
    #[arg(short, long)]
    pub parse: bool,

    /// Run lexer, parser and code generation, printing the C source
    #[arg(short, long)]
    pub codegen: bool,

    /// Write the generated C to a file but do not compile it
    #[arg(short = 'S', long)]
    pub emit_c: bool,

    /// Run the program with the built-in evaluator instead of a C compiler
    #[arg(short, long, conflicts_with_all = ["lex", "parse", "codegen", "emit_c"])]
    pub interpret: bool,

    /// Where to keep the compiled executable (or the C file with --emit-c)
    #[arg(short, long, conflicts_with_all = ["lex", "parse", "codegen", "interpret"])]
    pub output: Option<PathBuf>,

    /// C compiler used to build the generated source
    #[arg(long, env = "CC", default_value = "cc")]
    pub cc: String,

    /// Seconds allowed for compiling and for running the program
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,
}
