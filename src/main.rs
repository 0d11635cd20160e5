//! efinops entry point: CLI wiring, scenario loading, and report output.

use std::path::Path;
use std::process;

use tracing::{Level, info, warn};

use efinops::cli::{self, CliOptions, Command, ParsedArgs};
use efinops::config::ScenarioConfig;
use efinops::io::export::{export_candidates_csv, export_cash_flow_csv};
use efinops::model::engine::evaluate;
use efinops::optimizer::{SearchOptions, optimize_with};

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = tracing_subscriber::fmt::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("warning: failed to install tracing subscriber: {e}");
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn load_scenario(cli: &CliOptions) -> ScenarioConfig {
    let loaded = if let Some(ref path) = cli.scenario {
        ScenarioConfig::from_toml_file(path)
    } else {
        ScenarioConfig::from_preset(cli.preset.as_deref().unwrap_or("industrial_park"))
    };
    let scenario = loaded.unwrap_or_else(|e| fail(e));

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }
    for warning in scenario.warnings() {
        warn!("{warning}");
    }
    scenario
}

fn main() {
    let cli = match cli::parse_args() {
        Ok(ParsedArgs::Run(opts)) => opts,
        Ok(ParsedArgs::Help) => {
            cli::print_usage();
            process::exit(0);
        }
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    init_tracing(cli.verbose);

    let scenario = load_scenario(&cli);
    let config = scenario.configuration();
    info!(
        static_price = config.tariff.static_price,
        blended_price = config.tariff.blended_price(),
        "scenario loaded"
    );

    let evaluation = match cli.command {
        Command::Evaluate => {
            let evaluation = evaluate(&config, &scenario.sizing).unwrap_or_else(|e| fail(e));
            println!("{evaluation}");
            evaluation
        }
        Command::Optimize => {
            let objective = cli.objective.unwrap_or(scenario.search.objective);
            let options = SearchOptions {
                parallel: cli.parallel || scenario.search.parallel,
                cancel: None,
            };
            let outcome = optimize_with(&config, objective, &scenario.search.axes, &options)
                .unwrap_or_else(|e| fail(e));
            println!("{outcome}");

            if let Some(ref path) = cli.candidates_out {
                if let Err(e) = export_candidates_csv(&outcome.candidates, path) {
                    fail(format!("failed to write CSV: {e}"));
                }
                info!(path = %path.display(), "candidate trace written");
            }
            outcome.evaluation
        }
    };

    if let Some(ref path) = cli.cash_flow_out {
        if let Err(e) = export_cash_flow_csv(&evaluation, &config.economics, Path::new(path)) {
            fail(format!("failed to write CSV: {e}"));
        }
        info!(path = %path.display(), "cash-flow table written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(efinops::api::AppState {
            config,
            space: scenario.search.axes.clone(),
        });
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(efinops::api::serve(state, addr)) {
            fail(format!("API server failed: {e}"));
        }
    }
}
