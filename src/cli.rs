//! Command-line argument parsing.

use std::env;
use std::path::PathBuf;

use crate::optimizer::Objective;

/// What the binary should do with the loaded scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Command {
    /// Evaluate the scenario's `[sizing]`.
    #[default]
    Evaluate,
    /// Grid-search the scenario's `[search]` space.
    Optimize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub command: Command,
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    /// Overrides `search.objective`.
    pub objective: Option<Objective>,
    /// Forces a parallel search regardless of `search.parallel`.
    pub parallel: bool,
    pub cash_flow_out: Option<PathBuf>,
    pub candidates_out: Option<PathBuf>,
    pub verbose: bool,
    #[cfg(feature = "api")]
    pub serve: bool,
    #[cfg(feature = "api")]
    pub port: u16,
}

/// Outcome of parsing: either options to run with, or a request for help.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedArgs {
    Run(CliOptions),
    Help,
}

/// Default REST API port.
#[cfg(feature = "api")]
pub const DEFAULT_PORT: u16 = 3000;

pub fn parse_args() -> Result<ParsedArgs, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

/// Parses arguments without the program name.
///
/// # Errors
///
/// Returns a message for unknown flags, missing or malformed values,
/// repeated flags, and conflicting scenario sources.
pub fn parse_args_from(args: Vec<String>) -> Result<ParsedArgs, String> {
    if args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(ParsedArgs::Help);
    }
    parse_options(&args).map(ParsedArgs::Run)
}

fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut rest = args;
    let command = match rest.first().map(String::as_str) {
        Some("evaluate") => {
            rest = &rest[1..];
            Command::Evaluate
        }
        Some("optimize") => {
            rest = &rest[1..];
            Command::Optimize
        }
        _ => Command::Evaluate,
    };

    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut objective = None;
    let mut parallel = false;
    let mut cash_flow_out = None;
    let mut candidates_out = None;
    let mut verbose = false;
    #[cfg(feature = "api")]
    let mut serve = false;
    #[cfg(feature = "api")]
    let mut port = None;

    while i < rest.len() {
        match rest[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = rest.next_or_err(i, "missing value for --scenario (expected a TOML file path)")?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = rest.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--objective" => {
                i += 1;
                let value = rest.next_or_err(i, "missing value for --objective (expected irr, payback or npv)")?;
                if objective.replace(value.parse::<Objective>()?).is_some() {
                    return Err("--objective provided more than once".to_string());
                }
            }
            "--parallel" => parallel = true,
            "--cash-flow-out" => {
                i += 1;
                let path = rest.next_or_err(i, "missing value for --cash-flow-out (expected a file path)")?;
                if cash_flow_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--cash-flow-out provided more than once".to_string());
                }
            }
            "--candidates-out" => {
                i += 1;
                let path = rest.next_or_err(i, "missing value for --candidates-out (expected a file path)")?;
                if candidates_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--candidates-out provided more than once".to_string());
                }
            }
            "--verbose" | "-v" => verbose = true,
            #[cfg(feature = "api")]
            "--serve" => serve = true,
            #[cfg(feature = "api")]
            "--port" => {
                i += 1;
                let value = rest.next_or_err(i, "missing value for --port (expected a u16)")?;
                let parsed = value
                    .parse::<u16>()
                    .map_err(|_| format!("--port value \"{value}\" is not a valid u16"))?;
                if port.replace(parsed).is_some() {
                    return Err("--port provided more than once".to_string());
                }
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if scenario.is_none() && preset.is_none() {
        preset = Some("industrial_park".to_string());
    }

    if command == Command::Evaluate && (objective.is_some() || candidates_out.is_some()) {
        return Err("`--objective` and `--candidates-out` only apply to `optimize`".to_string());
    }

    Ok(CliOptions {
        command,
        scenario,
        preset,
        objective,
        parallel,
        cash_flow_out,
        candidates_out,
        verbose,
        #[cfg(feature = "api")]
        serve,
        #[cfg(feature = "api")]
        port: port.unwrap_or(DEFAULT_PORT),
    })
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }
}

pub fn print_usage() {
    eprintln!("efinops: sizing and investment appraisal for mixed energy supply systems");
    eprintln!();
    eprintln!("Usage: efinops [evaluate|optimize] [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (industrial_park, solar_rich, arbitrage)");
    eprintln!("  --objective <name>       optimize only: irr, payback or npv");
    eprintln!("  --parallel               Evaluate candidates on all cores");
    eprintln!("  --cash-flow-out <path>   Export the cash-flow table to CSV");
    eprintln!("  --candidates-out <path>  optimize only: export every candidate to CSV");
    eprintln!("  --verbose, -v            Log at debug level");
    #[cfg(feature = "api")]
    {
        eprintln!("  --serve                  Start REST API server after the run");
        eprintln!("  --port <u16>             API server port (default: {DEFAULT_PORT})");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the industrial_park preset is used.");
}
