use anyhow::{anyhow, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use std::{fs, path::PathBuf, process::ExitCode, time::Instant};
use tsp_algorithms::nearest_neighbor;
use tsp_challenges::{load_cities, Challenge};
use tsp_master::{
    Directory, HttpDirectory, InMemoryDirectory, Orchestrator, RunReport, StaticDirectory,
};
use tsp_structs::{config::MasterConfig, core::*, error::TspError};
use tsp_utils::{dejsonify, seed_from_str};

fn cli() -> Command {
    Command::new("tsp-master")
        .about("Distributed exhaustive travelling salesman solver")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("solve")
                .about("Finds the shortest tour by farming sub-problems out to workers")
                .arg(
                    Arg::new("FILE")
                        .help("Cities file with one `name,x,y` per line")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("registry")
                        .long("registry")
                        .help("(Optional) Registry url to discover workers from")
                        .default_value("http://127.0.0.1:1099")
                        .value_parser(value_parser!(String)),
                )
                .arg(
                    Arg::new("workers-file")
                        .long("workers-file")
                        .help("(Optional) JSON file mapping worker names to urls")
                        .conflicts_with("local")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("local")
                        .long("local")
                        .help("(Optional) Run this many workers in-process instead")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("(Optional) JSON file with master settings")
                        .value_parser(value_parser!(PathBuf)),
                )
                .arg(
                    Arg::new("prefix")
                        .long("prefix")
                        .help("(Optional) Worker name prefix")
                        .value_parser(value_parser!(String)),
                )
                .arg(
                    Arg::new("max-cities")
                        .long("max-cities")
                        .help("(Optional) Largest instance to attempt")
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .help("(Optional) Deadline per sub-problem call in milliseconds")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("attempts")
                        .long("attempts")
                        .help("(Optional) Attempts per sub-problem, 1 disables retries")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("backoff")
                        .long("backoff")
                        .help("(Optional) Base delay between attempts in milliseconds")
                        .value_parser(value_parser!(u64)),
                )
                .arg(
                    Arg::new("local-fallback")
                        .long("local-fallback")
                        .help("(Optional) Solve failed sub-problems in-process")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("nearest-neighbor")
                .about("Builds a greedy tour without any workers")
                .arg(
                    Arg::new("FILE")
                        .help("Cities file with one `name,x,y` per line")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("generate")
                .about("Writes a random instance as a cities file")
                .arg(
                    Arg::new("NUM_CITIES")
                        .help("Number of cities")
                        .required(true)
                        .value_parser(value_parser!(usize)),
                )
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .help("(Optional) String the instance is derived from")
                        .default_value("tsp")
                        .value_parser(value_parser!(String)),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .help("(Optional) Write to this file instead of stdout")
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
    let matches = cli().get_matches();
    let outcome = match matches.subcommand() {
        Some(("solve", sub_m)) => solve(sub_m).await,
        Some(("nearest-neighbor", sub_m)) => nearest(sub_m),
        Some(("generate", sub_m)) => generate(sub_m),
        _ => Err(anyhow!("Invalid subcommand")),
    };
    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(matches: &ArgMatches) -> Result<MasterConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
            dejsonify::<MasterConfig>(&json)
                .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?
        }
        None => MasterConfig::default(),
    };
    if let Some(prefix) = matches.get_one::<String>("prefix") {
        config.worker_prefix = prefix.clone();
    }
    if let Some(max_cities) = matches.get_one::<usize>("max-cities") {
        config.max_cities = *max_cities;
    }
    if let Some(timeout) = matches.get_one::<u64>("timeout") {
        config.call_timeout_ms = *timeout;
    }
    if let Some(attempts) = matches.get_one::<u32>("attempts") {
        config.max_attempts = *attempts;
    }
    if let Some(backoff) = matches.get_one::<u64>("backoff") {
        config.backoff_ms = *backoff;
    }
    if matches.get_flag("local-fallback") {
        config.local_fallback = true;
    }
    Ok(config)
}

async fn solve(matches: &ArgMatches) -> Result<bool> {
    let path = matches.get_one::<PathBuf>("FILE").unwrap();
    let cities = load_cities(path)?;
    let config = load_config(matches)?;
    info!("[master] loaded {} cities from {}", cities.len(), path.display());

    let report = if let Some(num_workers) = matches.get_one::<usize>("local") {
        let directory = InMemoryDirectory::with_local_workers(&config.worker_prefix, *num_workers);
        run(directory, config, cities).await
    } else if let Some(workers_file) = matches.get_one::<PathBuf>("workers-file") {
        run(StaticDirectory::from_file(workers_file)?, config, cities).await
    } else {
        let registry = matches.get_one::<String>("registry").unwrap().clone();
        run(HttpDirectory::new(registry), config, cities).await
    };
    print_report(&report);
    Ok(report.is_done())
}

async fn run<D: Directory>(directory: D, config: MasterConfig, cities: Vec<City>) -> RunReport {
    Orchestrator::new(directory, config).run(cities).await
}

fn format_route(result: &TspResult) -> Option<String> {
    result.route_names().map(|names| names.join(" -> "))
}

fn print_report(report: &RunReport) {
    match report.error() {
        None => {
            if let Some(route) = format_route(&report.result) {
                println!("Route: {}", route);
            }
            println!("Distance: {:.2}", report.result.distance);
        }
        Some(TspError::InfeasibleSize {
            num_cities,
            max_cities,
        }) => println!(
            "Aborted: {} cities exceeds the exhaustive search limit of {}",
            num_cities, max_cities
        ),
        Some(TspError::NoWorkers) => println!("No workers available"),
        Some(TspError::NoSolution) => println!("No solution was found."),
        Some(TspError::InsufficientCities { num_cities }) => {
            println!("No solution was found. ({} cities given)", num_cities)
        }
        Some(e) => println!("Failed: {}", e),
    }
    for failure in report.failures.iter() {
        println!(
            "Sub-problem {} ({} second) failed: {}",
            failure.index,
            failure.fixed_second,
            failure
                .last_error()
                .map(|e| e.to_string())
                .unwrap_or_default()
        );
    }
    println!(
        "Workers: {}, sub-problems: {}, elapsed: {}ms",
        report.num_workers,
        report.num_sub_problems,
        report.elapsed.as_millis()
    );
}

fn nearest(matches: &ArgMatches) -> Result<bool> {
    let path = matches.get_one::<PathBuf>("FILE").unwrap();
    let cities = load_cities(path)?;
    let start = Instant::now();
    let result = nearest_neighbor::solve(&cities);
    let elapsed = start.elapsed();
    let found = match format_route(&result) {
        Some(route) => {
            println!("Route: {}", route);
            println!("Distance: {:.2}", result.distance);
            true
        }
        None => {
            println!("No solution was found.");
            false
        }
    };
    println!("Elapsed: {}ms", elapsed.as_millis());
    Ok(found)
}

fn generate(matches: &ArgMatches) -> Result<bool> {
    let num_cities = *matches.get_one::<usize>("NUM_CITIES").unwrap();
    let seed = matches.get_one::<String>("seed").unwrap();
    let challenge = Challenge::generate_instance(&seed_from_str(seed), num_cities)?;
    let text: String = challenge
        .cities
        .iter()
        .map(|c| format!("{},{},{}\n", c.name, c.x, c.y))
        .collect();
    match matches.get_one::<PathBuf>("output") {
        Some(path) => {
            fs::write(path, text)
                .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;
            info!("[master] wrote {} cities to {}", num_cities, path.display());
        }
        None => print!("{}", text),
    }
    Ok(true)
}
