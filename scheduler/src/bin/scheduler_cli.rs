use std::fs;
use std::process::ExitCode;

use scheduler::config::Settings;
use scheduler::request::{SolveError, SolveRequest};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scheduler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(path) = std::env::args().nth(1) else {
        eprintln!("usage: scheduler_cli <solve-request.json>");
        return ExitCode::FAILURE;
    };

    match run(&path) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(json) => {
            eprintln!("{json}");
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str) -> Result<String, String> {
    let body = fs::read_to_string(path).map_err(|e| format!("reading {path}: {e}"))?;
    let request: SolveRequest = serde_json::from_str(&body).map_err(|e| format!("parsing {path}: {e}"))?;

    let settings = Settings::new().map_err(|e| format!("loading configuration: {e}"))?;

    match scheduler::solve(&request, &settings) {
        Ok(response) => serde_json::to_string_pretty(&response).map_err(|e| e.to_string()),
        Err(err) => {
            let solve_error: SolveError = err.into();
            serde_json::to_string_pretty(&solve_error).map_err(|e| e.to_string())
        }
    }
}
