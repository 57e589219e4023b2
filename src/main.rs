//! Foliage - Rust Implementation
//!
//! CLI commands:
//! - list: List configured grammars
//! - generate: Expand a grammar and print the run summary
//! - render: Write a PNG snapshot of a run
//! - view: Launch the native GUI viewer

mod gui;
mod snapshot;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use foliage::config::{Config, Env, RunOverrides};
use foliage::{generate_events, generate_with_symbols};

#[derive(Parser)]
#[command(name = "foliage")]
#[command(about = "Stochastic L-system foliage generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to grammars.yaml config
    #[arg(short, long, default_value = "grammars.yaml")]
    config: PathBuf,
}

/// Options shared by every command that runs a generation
#[derive(clap::Args)]
struct RunArgs {
    /// Grammar ID (defaults to the first configured grammar)
    #[arg(short, long)]
    grammar: Option<String>,

    /// Rewrite iterations
    #[arg(short, long, allow_negative_numbers = true)]
    iterations: Option<i64>,

    /// Seed string for the random stream
    #[arg(short, long)]
    seed: Option<String>,
}

impl From<RunArgs> for RunOverrides {
    fn from(args: RunArgs) -> Self {
        RunOverrides {
            grammar: args.grammar,
            iterations: args.iterations,
            seed: args.seed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List configured grammars
    List,

    /// Expand a grammar and print the run summary
    Generate {
        #[command(flatten)]
        run: RunArgs,

        /// Print the expanded symbol string
        #[arg(long)]
        symbols: bool,

        /// Print every draw event as a JSON line
        #[arg(long)]
        events: bool,
    },

    /// Render a run to a PNG image
    Render {
        #[command(flatten)]
        run: RunArgs,

        /// Output file
        #[arg(short, long, default_value = "foliage.png")]
        output: PathBuf,

        /// Image width and height in pixels
        #[arg(long, default_value = "800", value_parser = clap::value_parser!(u32).range(1..=8192))]
        size: u32,
    },

    /// Launch native GUI viewer
    View {
        /// Seed string for the random stream
        #[arg(short, long)]
        seed: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load .env overrides, then logging (guard flushes the log file on exit)
    let env = Env::load();
    let _guard = foliage::logging::init_logging(&env.log_dir)?;
    tracing::info!("Foliage starting up");
    tracing::debug!("CLI args parsed: config={:?}", cli.config);

    let config = load_config(&cli.config)?;
    tracing::info!("Config loaded: {} grammars", config.grammars.len());

    match cli.command {
        Commands::List => {
            list_grammars(&config);
        }

        Commands::Generate { run, symbols, events } => {
            let (entry, params) = config.resolve_run(&run.into(), &env)?;
            let generation = generate_with_symbols(&entry.grammar, &params)?;

            println!("{} [{}] seed={} iterations={}", entry.name, entry.id, params.seed, params.iterations);
            println!("{}", serde_json::to_string_pretty(&generation.report)?);

            if symbols {
                println!("{}", generation.symbols);
            }
            if events {
                for event in &generation.events {
                    println!("{}", serde_json::to_string(event)?);
                }
            }
        }

        Commands::Render { run, output, size } => {
            let (entry, params) = config.resolve_run(&run.into(), &env)?;
            let events = generate_events(&entry.grammar, &params)?;
            snapshot::save(&events, &output, size, snapshot::Layers::default())?;
            println!("{} -> {:?} ({} events)", entry.name, output, events.len());
        }

        Commands::View { seed } => {
            tracing::info!("Launching native GUI viewer");
            gui::run_viewer(config, seed.or(env.seed))?;
        }
    }

    Ok(())
}

/// Config from file, or the built-in grammars when the file is missing
fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        tracing::info!("Loading config from {:?}", path);
        Config::load(path)
    } else {
        tracing::warn!("Config file not found: {:?}, using built-in grammars", path);
        Ok(Config::builtin())
    }
}

/// List configured grammars
fn list_grammars(config: &Config) {
    println!("Available grammars ({}):", config.grammars.len());
    println!();

    for entry in &config.grammars {
        println!("  - {} [{}] axiom={}", entry.name, entry.id, entry.grammar.axiom());
        for rule in entry.grammar.rules() {
            println!("      {} -> {} ({})", rule.input, rule.output, rule.probability);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_size_bounds() {
        assert!(Cli::try_parse_from(["foliage", "render", "--size", "0"]).is_err());
        assert!(Cli::try_parse_from(["foliage", "render", "--size", "100000"]).is_err());
        assert!(Cli::try_parse_from(["foliage", "render", "--size", "8192"]).is_ok());
    }

    #[test]
    fn test_negative_iterations_reach_validation() {
        let cli = Cli::try_parse_from(["foliage", "generate", "--iterations", "-3"]).unwrap();
        let Commands::Generate { run, .. } = cli.command else {
            panic!("expected generate");
        };
        let overrides: RunOverrides = run.into();
        assert_eq!(overrides.iterations, Some(-3));
    }
}
