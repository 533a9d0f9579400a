use clap::{Parser, Subcommand};
use serde::Serialize;

use wealthpath::config::{InputArgs, build_inputs};
use wealthpath::core::{
    RetirementAgeSearch, SearchRange, WealthSimulationResult, find_optimal_retirement_age,
    simulate,
};
use wealthpath::logging::init_logging;

#[derive(Parser, Debug)]
#[command(
    name = "wealthpath",
    about = "Phase-based net-worth projection (debt payoff, emergency fund, retirement)"
)]
struct Cli {
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Project the ledger year by year and print the result as JSON.
    Simulate {
        #[command(flatten)]
        inputs: InputArgs,
    },
    /// Find the earliest sustainable retirement age.
    Optimize {
        #[command(flatten)]
        inputs: InputArgs,
        #[arg(long)]
        earliest: Option<u32>,
        #[arg(long)]
        latest: Option<u32>,
    },
    /// Serve the JSON API.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

async fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Simulate { inputs } => {
            let inputs = build_inputs(&inputs)?;
            let result = simulate(&inputs).map_err(|e| e.to_string())?;
            print_json(&result)
        }
        Command::Optimize {
            inputs,
            earliest,
            latest,
        } => {
            let inputs = build_inputs(&inputs)?;
            let range = SearchRange::with_overrides(&inputs, earliest, latest);
            let search = find_optimal_retirement_age(&inputs, range).map_err(|e| e.to_string())?;
            match search.retirement_age() {
                Some(age) => eprintln!("Earliest sustainable retirement age: {age}"),
                None => eprintln!("No sustainable retirement age in range"),
            }
            print_json(&OptimizeOutput::from(&search))
        }
        Command::Serve { port } => wealthpath::api::run_http_server(port)
            .await
            .map_err(|e| format!("Server error: {e}")),
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum OptimizeOutput<'a> {
    #[serde(rename_all = "camelCase")]
    Found {
        retirement_age: u32,
        candidates_evaluated: u32,
        result: &'a WealthSimulationResult,
    },
    #[serde(rename_all = "camelCase")]
    Infeasible { earliest_age: u32, latest_age: u32 },
}

impl<'a> From<&'a RetirementAgeSearch> for OptimizeOutput<'a> {
    fn from(search: &'a RetirementAgeSearch) -> Self {
        match search {
            RetirementAgeSearch::Found {
                retirement_age,
                candidates_evaluated,
                result,
            } => OptimizeOutput::Found {
                retirement_age: *retirement_age,
                candidates_evaluated: *candidates_evaluated,
                result,
            },
            RetirementAgeSearch::Infeasible { earliest, latest } => OptimizeOutput::Infeasible {
                earliest_age: *earliest,
                latest_age: *latest,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = init_logging(&cli.log_level) {
        eprintln!("{e}");
    }

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
