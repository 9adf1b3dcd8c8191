//! Command-line parsing for the `sonnet` binary.

use std::path::PathBuf;

use crate::EvalConfig;

pub const USAGE: &str = "\
Usage: sonnet [options] <file>
       sonnet [options] -e <code>
       sonnet batch [options] <file>...

Options:
  --max-stack <n>          Maximum stack depth (default 500)
  --gc-min-objects <n>     Do not collect below this many objects (default 1000)
  --gc-growth-trigger <f>  Collect after the heap grows by this factor (default 2.0)
  --max-trace <n>          Trace lines shown on errors, 0 for all (default 20)
  --debug-ast              Print the lowered tree instead of evaluating
  -V, --ext-str <n>=<v>    Define an external variable
  -J, --jpath <dir>        Add a library search directory
  --strict                 Reject unbound variables before evaluation
  -e, --exec               Treat the argument as code rather than a path
  -h, --help               Show this message";

/// What to evaluate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    File(PathBuf),
    Snippet(String),
}

/// A parsed command line.
#[derive(Clone, Debug)]
pub enum Command {
    Help,
    Eval { config: EvalConfig, input: Input },
    Batch { config: EvalConfig, files: Vec<PathBuf> },
}

/// Parse arguments, excluding the program name.
pub fn parse_args(args: &[String]) -> Result<Command, String> {
    let (batch, args) = match args.first().map(String::as_str) {
        Some("batch") => (true, &args[1..]),
        _ => (false, args),
    };

    let mut config = EvalConfig::default();
    let mut exec = false;
    let mut positional: Vec<String> = Vec::new();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {flag}"))
        };
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--max-stack" => config.max_stack = parse_number(arg, &value(arg)?)?,
            "--gc-min-objects" => config.gc_min_objects = parse_number(arg, &value(arg)?)?,
            "--gc-growth-trigger" => {
                let text = value(arg)?;
                config.gc_growth_trigger = text
                    .parse::<f64>()
                    .ok()
                    .filter(|f| *f >= 1.0)
                    .ok_or_else(|| format!("{arg} expects a number >= 1.0, got '{text}'"))?;
            }
            "--max-trace" => config.max_trace = parse_number(arg, &value(arg)?)?,
            "--debug-ast" => config.debug_ast = true,
            "--strict" => config.strict_variables = true,
            "-e" | "--exec" => exec = true,
            "-V" | "--ext-str" => {
                let binding = value(arg)?;
                let (name, text) = match binding.split_once('=') {
                    Some((name, text)) => (name.to_string(), text.to_string()),
                    // `-V name` reads the value from the environment.
                    None => {
                        let text = std::env::var(&binding)
                            .map_err(|_| format!("environment variable {binding} is not set"))?;
                        (binding, text)
                    }
                };
                config.external_vars.insert(name, text);
            }
            "-J" | "--jpath" => config.jpath.push(PathBuf::from(value(arg)?)),
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return Err(format!("unknown option '{flag}'"));
            }
            _ => positional.push(arg.clone()),
        }
    }

    if batch {
        if exec {
            return Err("-e cannot be combined with batch".to_string());
        }
        if positional.is_empty() {
            return Err("batch needs at least one file".to_string());
        }
        let files = positional.into_iter().map(PathBuf::from).collect();
        return Ok(Command::Batch { config, files });
    }

    let mut positional = positional.into_iter();
    let (Some(target), None) = (positional.next(), positional.next()) else {
        return Err("expected exactly one file or snippet".to_string());
    };
    let input = if exec {
        Input::Snippet(target)
    } else {
        Input::File(PathBuf::from(target))
    };
    Ok(Command::Eval { config, input })
}

fn parse_number(flag: &str, text: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|_| format!("{flag} expects a non-negative integer, got '{text}'"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn single_file_with_options() {
        let command = parse_args(&args(&[
            "--max-stack", "10", "-J", "lib", "-V", "env=prod", "--strict", "main.jsonnet",
        ]))
        .unwrap();
        let Command::Eval { config, input } = command else {
            panic!("expected eval, got {command:?}");
        };
        assert_eq!(input, Input::File(PathBuf::from("main.jsonnet")));
        assert_eq!(config.max_stack, 10);
        assert_eq!(config.jpath, vec![PathBuf::from("lib")]);
        assert_eq!(config.external_vars.get("env").map(String::as_str), Some("prod"));
        assert!(config.strict_variables);
    }

    #[test]
    fn snippet() {
        let command = parse_args(&args(&["-e", "1 + 1"])).unwrap();
        assert!(matches!(
            command,
            Command::Eval { input: Input::Snippet(ref code), .. } if code == "1 + 1"
        ));
    }

    #[test]
    fn batch() {
        let command = parse_args(&args(&["batch", "--max-trace", "0", "a.jsonnet", "b.jsonnet"])).unwrap();
        let Command::Batch { config, files } = command else {
            panic!("expected batch, got {command:?}");
        };
        assert_eq!(config.max_trace, 0);
        assert_eq!(files, vec![PathBuf::from("a.jsonnet"), PathBuf::from("b.jsonnet")]);
    }

    #[test]
    fn errors() {
        assert!(parse_args(&args(&["--max-stack"])).unwrap_err().contains("missing value"));
        assert!(parse_args(&args(&["--max-stack", "x", "a"])).unwrap_err().contains("integer"));
        assert!(parse_args(&args(&["--gc-growth-trigger", "0.5", "a"])).unwrap_err().contains(">= 1.0"));
        assert!(parse_args(&args(&["--bogus", "a"])).unwrap_err().contains("unknown option"));
        assert!(parse_args(&args(&["a", "b"])).unwrap_err().contains("exactly one"));
        assert!(parse_args(&args(&["batch"])).unwrap_err().contains("at least one"));
        assert!(matches!(parse_args(&args(&["-h"])).unwrap(), Command::Help));
    }
}
