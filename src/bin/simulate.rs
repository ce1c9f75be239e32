//! Balance simulator CLI.
//!
//! Run Monte Carlo simulations to analyze progression balance.
//!
//! Usage:
//!   cargo run --bin simulate -- [OPTIONS]
//!
//! Examples:
//!   cargo run --bin simulate                      # Default: 200 runs over 180 days
//!   cargo run --bin simulate -- -n 100 -d 365     # 100 runs over a year
//!   cargo run --bin simulate -- --seed 42         # Reproducible run
//!   cargo run --bin simulate -- --config game.toml

use std::env;
use std::path::PathBuf;

use pilgrimage::character::Stance;
use pilgrimage::core::GameConfig;
use pilgrimage::simulator::{run_simulation, SimConfig};
use tracing_subscriber::EnvFilter;

struct Options {
    sim: SimConfig,
    game_config: Option<PathBuf>,
    show_level_curve: bool,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();
    let options = parse_args(&args);
    let config = &options.sim;

    let game = match &options.game_config {
        Some(path) => match GameConfig::load(path) {
            Ok(game) => game,
            Err(err) => {
                eprintln!("Failed to load {}: {}", path.display(), err);
                std::process::exit(1);
            }
        },
        None => GameConfig::default(),
    };

    println!("╔═══════════════════════════════════════════════════════════════╗");
    println!("║              PILGRIMAGE BALANCE SIMULATOR                     ║");
    println!("╚═══════════════════════════════════════════════════════════════╝");
    println!();
    println!("Configuration:");
    println!("  Runs:           {}", config.num_runs);
    println!("  Days:           {}", config.days);
    println!("  Zones:          {} (step {})", config.zone_count, config.zone_level_step);
    println!("  Stance:         {:?}", config.stance);
    println!("  Encounters:     {} per quest", config.encounters_per_quest);
    if config.simulate_ascension {
        println!("  Ascension:      enabled");
    }
    if let Some(seed) = config.seed {
        println!("  Seed:           {}", seed);
    }
    println!();
    println!("Running simulation...");
    println!();

    let report = run_simulation(config, &game);

    println!("{}", report.to_text());

    if options.show_level_curve {
        println!("{}", report.level_curve_text());
    }

    if options.json {
        let filename = format!("sim_report_{}.json", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
        let written = report
            .to_json()
            .map_err(|e| e.to_string())
            .and_then(|json| std::fs::write(&filename, json).map_err(|e| e.to_string()));
        match written {
            Ok(()) => println!("JSON report saved to: {}", filename),
            Err(err) => {
                eprintln!("Failed to write JSON report: {}", err);
                std::process::exit(1);
            }
        }
    }
}

fn parse_stance(value: &str) -> Option<Stance> {
    match value.to_ascii_lowercase().as_str() {
        "balanced" => Some(Stance::Balanced),
        "safe" => Some(Stance::Safe),
        "reckless" => Some(Stance::Reckless),
        _ => None,
    }
}

fn parse_args(args: &[String]) -> Options {
    let mut options = Options {
        sim: SimConfig::default(),
        game_config: None,
        show_level_curve: false,
        json: false,
    };

    let mut i = 1;
    while i < args.len() {
        let next = args.get(i + 1);
        match args[i].as_str() {
            "-n" | "--runs" => {
                if let Some(value) = next {
                    options.sim.num_runs = value.parse().unwrap_or(200);
                    i += 1;
                }
            }
            "-d" | "--days" => {
                if let Some(value) = next {
                    options.sim.days = value.parse().unwrap_or(180);
                    i += 1;
                }
            }
            "-s" | "--seed" => {
                if let Some(value) = next {
                    options.sim.seed = value.parse().ok();
                    i += 1;
                }
            }
            "-e" | "--encounters" => {
                if let Some(value) = next {
                    options.sim.encounters_per_quest = value.parse().unwrap_or(1);
                    i += 1;
                }
            }
            "--stance" => {
                if let Some(stance) = next.and_then(|v| parse_stance(v)) {
                    options.sim.stance = stance;
                    i += 1;
                }
            }
            "-c" | "--config" => {
                if let Some(value) = next {
                    options.game_config = Some(PathBuf::from(value));
                    i += 1;
                }
            }
            "--ascend" => {
                options.sim.simulate_ascension = true;
            }
            "--level-curve" => {
                options.show_level_curve = true;
            }
            "--json" => {
                options.json = true;
            }
            "-v" | "--verbose" => {
                options.sim.verbosity = 2;
            }
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "--quick" => {
                options.sim = SimConfig::quick();
            }
            "--full" => {
                options.sim = SimConfig::full_progression();
            }
            _ => {}
        }
        i += 1;
    }

    options
}

fn print_help() {
    println!("Pilgrimage Balance Simulator");
    println!();
    println!("USAGE:");
    println!("    cargo run --bin simulate -- [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -n, --runs <N>        Number of simulated players (default: 200)");
    println!("    -d, --days <D>        In-game days per run (default: 180)");
    println!("    -s, --seed <S>        Random seed for reproducibility");
    println!("    -e, --encounters <E>  Encounters per quest (default: 1)");
    println!("    --stance <STANCE>     balanced, safe or reckless");
    println!("    -c, --config <FILE>   Game config TOML");
    println!("    --ascend              Ascend whenever eligible");
    println!("    --level-curve         Show level-up pacing");
    println!("    -v, --verbose         Log every run (set RUST_LOG=info)");
    println!("    --json                Save JSON report");
    println!("    --quick               Quick test (50 runs over 60 days)");
    println!("    --full                Full test (50 runs over two years, with ascension)");
    println!("    -h, --help            Show this help");
}
