use brewco::error::BrewError;
use brewco::lexer::tokenize_with_positions;
use brewco::parser::parse_program;
use brewco::Interpreter;

use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Once;

static TRACING_INIT: Once = Once::new();

const USAGE: &str = "\
Usage: brewco [run] <file>
       brewco tokens <file>
       brewco ast <file>

Options:
  -h, --help       print this message
  -V, --version    print the version

Environment:
  BREWCO_LOG       log filter, e.g. `brewco=debug` (falls back to RUST_LOG)
  NO_COLOR         disable coloured diagnostics";

/// Installs the log subscriber once, and only when a filter was asked for.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};

        let filter = match std::env::var("BREWCO_LOG") {
            Ok(directives) => EnvFilter::new(directives),
            Err(_) if std::env::var_os("RUST_LOG").is_some() => EnvFilter::from_default_env(),
            Err(_) => return,
        };

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    });
}

#[derive(Debug, PartialEq)]
enum Command {
    Run(String),
    Tokens(String),
    Ast(String),
    Help,
    Version,
}

fn parse_args(args: &[String]) -> Result<Command, String> {
    let mut args = args.iter().map(String::as_str);
    let command = match args.next() {
        None => return Err("no input file".to_string()),
        Some("-h" | "--help") => return Ok(Command::Help),
        Some("-V" | "--version") => return Ok(Command::Version),
        Some("run") => Command::Run(take_file(args.next())?),
        Some("tokens") => Command::Tokens(take_file(args.next())?),
        Some("ast") => Command::Ast(take_file(args.next())?),
        Some(flag) if flag.starts_with('-') => return Err(format!("unknown option '{}'", flag)),
        Some(file) => Command::Run(file.to_string()),
    };
    match args.next() {
        Some(extra) => Err(format!("unexpected argument '{}'", extra)),
        None => Ok(command),
    }
}

fn take_file(arg: Option<&str>) -> Result<String, String> {
    arg.map(str::to_string).ok_or_else(|| "no input file".to_string())
}

fn read_source(file: &str) -> Option<String> {
    match fs::read_to_string(file) {
        Ok(source) => Some(source),
        Err(err) => {
            eprintln!("error: could not read '{}': {}", file, err);
            None
        }
    }
}

fn report(err: &BrewError, file: &str, source: &str) -> ExitCode {
    if err.eprint(file, source).is_err() {
        eprintln!("{}: {} at {}", err.kind(), err.message(), err.position());
    }
    ExitCode::FAILURE
}

fn run(file: &str) -> ExitCode {
    let Some(source) = read_source(file) else {
        return ExitCode::FAILURE;
    };
    let mut interpreter = Interpreter::new();
    match interpreter.run_source(&source, Some(Path::new(file))) {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => report(&err, file, &source),
    }
}

fn dump_tokens(file: &str) -> ExitCode {
    let Some(source) = read_source(file) else {
        return ExitCode::FAILURE;
    };
    match tokenize_with_positions(&source) {
        Ok(tokens) => {
            for (token, position) in tokens {
                println!("{:>8}  {}", position.to_string(), token);
            }
            ExitCode::SUCCESS
        }
        Err(err) => report(&BrewError::from(err), file, &source),
    }
}

fn dump_ast(file: &str) -> ExitCode {
    let Some(source) = read_source(file) else {
        return ExitCode::FAILURE;
    };
    match parse_program(&source) {
        Ok(program) => {
            println!("{:#?}", program);
            ExitCode::SUCCESS
        }
        Err(err) => report(&err, file, &source),
    }
}

fn main() -> ExitCode {
    if std::env::var_os("NO_COLOR").is_some() {
        yansi::disable();
    }
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = match parse_args(&args) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("error: {}\n\n{}", msg, USAGE);
            return ExitCode::from(2);
        }
    };

    match command {
        Command::Help => {
            println!("{}", USAGE);
            ExitCode::SUCCESS
        }
        Command::Version => {
            println!("brewco {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Command::Run(file) => run(&file),
        Command::Tokens(file) => dump_tokens(&file),
        Command::Ast(file) => dump_ast(&file),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|arg| arg.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        assert_eq!(parse_args(&args(&["cafe.brewco"])), Ok(Command::Run("cafe.brewco".into())));
        assert_eq!(parse_args(&args(&["run", "cafe.brewco"])), Ok(Command::Run("cafe.brewco".into())));
        assert_eq!(parse_args(&args(&["tokens", "a.coffee"])), Ok(Command::Tokens("a.coffee".into())));
        assert_eq!(parse_args(&args(&["ast", "a.coffee"])), Ok(Command::Ast("a.coffee".into())));
        assert_eq!(parse_args(&args(&["--version"])), Ok(Command::Version));
        assert_eq!(parse_args(&args(&["-h"])), Ok(Command::Help));
    }

    #[test]
    fn test_parse_args_errors() {
        assert_eq!(parse_args(&args(&[])), Err("no input file".to_string()));
        assert_eq!(parse_args(&args(&["ast"])), Err("no input file".to_string()));
        assert_eq!(parse_args(&args(&["--fast"])), Err("unknown option '--fast'".to_string()));
        assert_eq!(
            parse_args(&args(&["a.brewco", "b.brewco"])),
            Err("unexpected argument 'b.brewco'".to_string())
        );
    }
}
