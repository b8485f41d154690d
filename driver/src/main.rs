use std::env;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use codegen::DIVISION_BY_ZERO_STATUS;
use driver::cli::Args;
use driver::toolchain::{CcToolchain, Toolchain};
use evaluator::{EvalError, Evaluator};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

// --lex: only lex
// --parse: lex and parse
// --codegen: lex, parse and generate C, printed to stdout
// --emit-c: generate C and write it next to the input (or to --output)
// --interpret: run the tree with the evaluator
// no option: generate C, compile it with --cc and run it

fn main() -> anyhow::Result<()> {
    initialize_logging()?;

    let args = Args::parse();
    let source = std::fs::read_to_string(&args.input_path)
        .with_context(|| format!("failed to read {}", args.input_path.display()))?;
    debug!(path = %args.input_path.display(), len = source.len(), "Read input file");

    let tokens = lexer::lex(&source)?;
    if args.lex {
        for token in &tokens {
            println!("{token}");
        }
        return Ok(());
    }

    let program = parser::parse_tokens(&tokens)?;
    if args.parse {
        println!("{program}");
        return Ok(());
    }

    if args.interpret {
        return interpret(&program);
    }

    let c_source = codegen::generate(&program)?;
    if args.codegen {
        print!("{c_source}");
        return Ok(());
    }

    if args.emit_c {
        let c_path = args.output.clone().unwrap_or_else(|| args.input_path.with_extension("c"));
        std::fs::write(&c_path, &c_source).with_context(|| format!("failed to write {}", c_path.display()))?;
        info!(path = %c_path.display(), "Wrote generated C");
        return Ok(());
    }

    let toolchain = CcToolchain::new(args.cc, Duration::from_secs(args.timeout));
    let unit = toolchain.compile(&c_source)?;
    if let Some(output) = &args.output {
        unit.persist(output)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(path = %output.display(), "Kept compiled executable");
    }

    let result = toolchain.run(&unit)?;
    print!("{}", result.stdout);
    io::stdout().flush()?;
    if result.success() {
        return Ok(());
    }
    match result.status {
        Some(code) => std::process::exit(code),
        None => anyhow::bail!("program was terminated by a signal"),
    }
}

fn interpret(program: &model::Node) -> anyhow::Result<()> {
    let stdout = io::stdout().lock();
    match Evaluator::new().run_to(program, stdout) {
        Ok(()) => Ok(()),
        // Same observable behavior as the compiled program.
        Err(EvalError::DivisionByZero) => {
            eprintln!("runtime error: division by zero");
            std::process::exit(DIVISION_BY_ZERO_STATUS);
        }
        Err(err) => Err(err.into()),
    }
}

fn initialize_logging() -> anyhow::Result<()> {
    let env_filter = env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(io::stderr)
                .with_filter(EnvFilter::from_str(&env_filter)?),
        )
        .init();
    Ok(())
}
