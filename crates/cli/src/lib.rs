pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use procura_core::config::{AppConfig, ConfigOverrides, LoadOptions, LogFormat};
use tracing::Level;

use commands::vendors::FilterArgs;

#[derive(Debug, Parser)]
#[command(
    name = "procura",
    about = "Procura vendor discovery CLI",
    long_about = "Search the catalog, shortlist vendors, estimate switching savings and map spend by country.",
    after_help = "Examples:\n  procura search ethyl\n  procura vendors \"ethyl acetate\" --source EXT --min-suitability 80\n  procura analyze \"ethyl acetate\" --quantity 1000\n  procura globe \"ethyl acetate\" --offline"
)]
pub struct Cli {
    #[arg(long, global = true, value_name = "PATH", help = "Config file (default: procura.toml)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "JSON vendor feed to load")]
    feed: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH", help = "Country alias table (TOML)")]
    aliases: Option<PathBuf>,
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    #[arg(long, global = true, value_name = "compact|pretty|json")]
    log_format: Option<LogFormat>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Search the product catalog by name or CAS number")]
    Search { query: String },
    #[command(about = "List filtered vendors for a buyer query, best candidates first")]
    Vendors {
        query: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    #[command(about = "Estimate savings from switching away from the incumbent vendor")]
    Analyze {
        query: String,
        #[arg(long, value_name = "UNITS")]
        quantity: Option<u32>,
    },
    #[command(about = "Compare selected vendors side by side")]
    Compare {
        query: String,
        #[arg(long = "vendor", value_name = "ID", required = true)]
        vendors: Vec<u32>,
        #[arg(long, value_name = "UNITS")]
        quantity: Option<u32>,
    },
    #[command(about = "Aggregate vendor spend by country for the choropleth view")]
    Globe {
        query: String,
        #[arg(long, help = "Skip fetching country polygons")]
        offline: bool,
    },
    #[command(about = "Show network dashboard statistics")]
    Dashboard,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

impl Cli {
    fn load_options(&self) -> LoadOptions {
        LoadOptions {
            config_path: self.config.clone(),
            require_file: self.config.is_some(),
            overrides: ConfigOverrides {
                feed_path: self.feed.clone(),
                alias_table_path: self.aliases.clone(),
                default_quantity: None,
                log_level: self.log_level.clone(),
                log_format: self.log_format,
            },
        }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let options = cli.load_options();

    if let Err(error) = init_logging(&options) {
        eprintln!("procura: logging disabled: {error:#}");
    }

    let result = match cli.command {
        Command::Search { query } => commands::search::run(&options, &query),
        Command::Vendors { query, filters } => commands::vendors::run(&options, &query, filters),
        Command::Analyze { query, quantity } => commands::analyze::run(&options, &query, quantity),
        Command::Compare { query, vendors, quantity } => {
            commands::compare::run(&options, &query, &vendors, quantity)
        }
        Command::Globe { query, offline } => commands::globe::run(&options, &query, offline),
        Command::Dashboard => commands::dashboard::run(&options),
        Command::Config => commands::config::run(&options),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

/// Logs go to stderr so stdout carries only the command's JSON document.
fn init_logging(options: &LoadOptions) -> anyhow::Result<()> {
    let config = AppConfig::load(options.clone()).context("loading logging configuration")?;
    let level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .with_writer(std::io::stderr);

    let installed = match config.logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|error| anyhow!(error)).context("installing tracing subscriber")
}
