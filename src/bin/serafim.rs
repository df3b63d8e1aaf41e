//! serafim CLI: compile JSON filter documents from the command line.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use serafim::ast::{Order, Search};
use serafim::{Compiler, CompilerConfig, encode_order};

#[derive(Parser)]
#[command(name = "serafim")]
#[command(version)]
#[command(about = "Compile declarative AND/OR filters into nested predicates")]
struct Cli {
    /// Compiler config file (defaults to <config dir>/serafim/config.toml)
    #[arg(short, long, env = "SERAFIM_CONFIG")]
    config: Option<PathBuf>,

    /// Override the maximum expression depth
    #[arg(long)]
    max_depth: Option<usize>,

    /// Pretty-print JSON output
    #[arg(short, long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a filter expression into its `where` shape
    Compile {
        /// JSON file, or `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Compile a filter and print the relations it joins through
    Relations {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Encode a list of sort keys
    Order {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Build find options (`where`, `relations`, `order`) from a search document
    Search {
        #[arg(default_value = "-")]
        input: PathBuf,
    },
    /// Compile a filter and print each terminal as a rendered fragment
    Render {
        #[arg(default_value = "-")]
        input: PathBuf,
        /// Prefix prepended to every field path
        #[arg(short, long, default_value = "")]
        alias: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => CompilerConfig::load(path)?,
        None => CompilerConfig::discover()?,
    };
    if let Some(depth) = cli.max_depth {
        config.max_depth = depth;
    }
    let compiler = Compiler::new(config);

    match &cli.command {
        Commands::Compile { input } => {
            let compiled = compiler.compile_json(&read_json(input)?)?;
            print_json(&compiled, cli.pretty)
        }
        Commands::Relations { input } => {
            let compiled = compiler.compile_json(&read_json(input)?)?;
            print_json(&compiled.relations(), cli.pretty)
        }
        Commands::Order { input } => {
            let json = read_json(input)?;
            let orders: Vec<Order> = if json.is_array() {
                serde_json::from_value(json)?
            } else {
                vec![serde_json::from_value(json)?]
            };
            print_json(&encode_order(&orders), cli.pretty)
        }
        Commands::Search { input } => {
            let search: Search = serde_json::from_value(read_json(input)?)
                .context("invalid search document")?;
            print_json(&compiler.find_options(&search)?, cli.pretty)
        }
        Commands::Render { input, alias } => {
            let compiled = compiler.compile_json(&read_json(input)?)?;
            render(&compiled, alias);
            Ok(())
        }
    }
}

fn read_json(input: &Path) -> Result<serde_json::Value> {
    let raw = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?
    };
    serde_json::from_str(&raw).context("input is not valid JSON")
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

fn render(compiled: &serafim::Compiled, alias: &str) {
    let alternatives = compiled.alternatives();
    for (i, predicate) in alternatives.iter().enumerate() {
        if alternatives.len() > 1 {
            println!("{}", format!("-- alternative {}", i + 1).dimmed());
        }
        if predicate.is_empty() {
            println!("  {}", "(unconstrained)".yellow());
        }
        for (path, terminal) in predicate.leaves() {
            let column = if alias.is_empty() {
                path
            } else {
                format!("{}.{}", alias, path)
            };
            println!("  {}", terminal.render(&column).cyan());
        }
    }
}
