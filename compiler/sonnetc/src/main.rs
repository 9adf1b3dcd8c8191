//! Sonnet CLI
//!
//! Evaluates Jsonnet and prints the resulting JSON.

use std::process::ExitCode;
use std::sync::Once;

use rayon::prelude::*;
use sonnetc::cli::{parse_args, Command, Input, USAGE};
use sonnetc::{evaluate_file, evaluate_snippet, EvalConfig, EvalFailure};

static TRACING_INIT: Once = Once::new();

/// Enable with `RUST_LOG=sonnet_eval=debug` (or `trace`).
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.is_empty() {
        eprintln!("{USAGE}");
        return ExitCode::FAILURE;
    }

    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(message) => {
            eprintln!("error: {message}");
            eprintln!();
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    match command {
        Command::Help => {
            println!("{USAGE}");
            ExitCode::SUCCESS
        }
        Command::Eval { config, input } => {
            let result = match input {
                Input::File(path) => evaluate_file(&path, &config),
                Input::Snippet(code) => evaluate_snippet("<cmdline>", &code, &config),
            };
            report(result)
        }
        Command::Batch { config, files } => run_batch(&config, &files),
    }
}

fn report(result: Result<String, EvalFailure>) -> ExitCode {
    match result {
        Ok(json) => {
            print!("{json}");
            ExitCode::SUCCESS
        }
        Err(failure) => {
            eprintln!("{failure}");
            ExitCode::FAILURE
        }
    }
}

/// Each file gets its own interpreter; output keeps argument order.
fn run_batch(config: &EvalConfig, files: &[std::path::PathBuf]) -> ExitCode {
    let results: Vec<Result<String, EvalFailure>> = files
        .par_iter()
        .map(|path| evaluate_file(path, config))
        .collect();

    let mut failed = 0usize;
    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(json) => {
                println!("// {}", path.display());
                print!("{json}");
            }
            Err(failure) => {
                failed += 1;
                eprintln!("{failure}");
            }
        }
    }

    if failed > 0 {
        eprintln!("{failed} of {} files failed", files.len());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
