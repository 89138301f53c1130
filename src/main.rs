use std::{
    fs,
    io::{self, Write},
    process::ExitCode,
};

use clap::Parser;
use ktinterp::{
    RunOptions, analyze, error::KtError, init_tracing, interpreter::parser::parse, run_source,
    tokenize_named,
};

/// ktinterp runs programs written in a small, statically scoped subset of
/// Kotlin.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells ktinterp to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Print the token stream before running.
    #[arg(long)]
    tokens: bool,

    /// Print the parsed program back as source before running.
    #[arg(long)]
    ast: bool,

    /// Print the symbol table before running.
    #[arg(long)]
    symbols: bool,

    /// Run the program even if semantic errors were reported.
    #[arg(long)]
    no_check: bool,

    contents: String,
}

fn main() -> ExitCode {
    init_tracing();
    let args = Args::parse();

    let (script, filename) = if args.file {
        match fs::read_to_string(&args.contents) {
            Ok(script) => (script, Some(args.contents.clone())),
            Err(_) => {
                eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                          &args.contents);
                return ExitCode::FAILURE;
            },
        }
    } else {
        (args.contents.clone(), None)
    };

    if let Err(e) = dump_stages(&args, &script, filename.as_deref()) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let options = RunOptions { check_semantics: !args.no_check,
                               filename };
    let stdout = io::stdout();
    let result = run_source(&script, &options, stdout.lock());
    // Output written by `print` has no trailing newline.
    let flushed = io::stdout().flush();

    let code = match result {
        Ok(outcome) => {
            if !outcome.diagnostics.all().is_empty() {
                eprintln!("{}", outcome.diagnostics);
            }
            ExitCode::SUCCESS
        },
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        },
    };

    if let Err(e) = flushed {
        eprintln!("Failed to write program output: {e}");
        return ExitCode::FAILURE;
    }
    code
}

/// Prints the intermediate artifacts requested on the command line.
fn dump_stages(args: &Args, script: &str, filename: Option<&str>) -> Result<(), KtError> {
    if !(args.tokens || args.ast || args.symbols) {
        return Ok(());
    }

    let tokens = tokenize_named(script, filename)?;
    if args.tokens {
        for token in &tokens {
            println!("{token}");
        }
    }

    let program = parse(&tokens)?;
    if args.ast {
        println!("{program}");
    }
    if args.symbols {
        let (table, _) = analyze(&program);
        println!("{table}");
    }
    Ok(())
}
