//! lit-graph CLI - a headless host for the layout, analytics and filter engines.
//!
//! Every command reads a graph JSON document (`{"nodes": [...], "edges": [...]}`).

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::fmt::format::FmtSpan;

mod commands;
mod config;

use commands::{config as config_cmd, filter, layout, presets, stats};
use config::Config;

/// lit-graph CLI - lay out, measure and filter literary exploration graphs.
#[derive(Parser, Debug)]
#[command(
    name = "lg",
    author,
    version,
    about = "lit-graph: layout, statistics and filtering for literary graphs",
    long_about = None
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Compute graph statistics.
    Stats {
        /// Graph JSON file.
        graph: PathBuf,

        /// Output format: text, json or csv.
        #[arg(short, long, default_value = "text")]
        format: String,

        /// Write to a file instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Compute over the view selected by a saved filter preset.
        #[arg(long)]
        preset: Option<String>,
    },

    /// Run the force simulation and write positions back into the graph.
    Layout {
        /// Graph JSON file.
        graph: PathBuf,

        /// Maximum simulation steps (defaults to `max-ticks` from config).
        #[arg(short, long)]
        ticks: Option<usize>,

        /// Canvas width.
        #[arg(long)]
        width: Option<f64>,

        /// Canvas height.
        #[arg(long)]
        height: Option<f64>,

        /// Pull nodes of the same type toward a shared anchor.
        #[arg(long)]
        cluster_by_type: bool,

        /// Write the laid-out graph here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Filter a graph and emit the visible subgraph.
    Filter {
        /// Graph JSON file.
        graph: PathBuf,

        #[command(flatten)]
        criteria: FilterArgs,

        /// Save the criteria as a named preset.
        #[arg(long)]
        save_preset: Option<String>,

        /// Description stored with `--save-preset`.
        #[arg(long, default_value = "")]
        description: String,

        /// Write the filtered graph here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage saved filter presets.
    #[command(subcommand)]
    Presets(PresetCommands),

    /// Manage CLI configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

/// Filter criteria flags. Each flag given adds one criterion; all are ANDed.
#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Keep nodes of these types (repeatable).
    #[arg(long = "type", value_name = "TYPE")]
    pub types: Vec<String>,

    /// Keep nodes published in or after this year.
    #[arg(long)]
    pub year_min: Option<i32>,

    /// Keep nodes published in or before this year.
    #[arg(long)]
    pub year_max: Option<i32>,

    /// Keep nodes published strictly before this year.
    #[arg(long)]
    pub year_before: Option<i32>,

    /// Keep nodes published strictly after this year.
    #[arg(long)]
    pub year_after: Option<i32>,

    /// Keep nodes published in exactly this year.
    #[arg(long)]
    pub year_exact: Option<i32>,

    /// Keep nodes in these series (repeatable).
    #[arg(long)]
    pub series_include: Vec<String>,

    /// Drop nodes in these series (repeatable).
    #[arg(long)]
    pub series_exclude: Vec<String>,

    /// Keep nodes whose description mentions a keyword (repeatable).
    #[arg(short, long)]
    pub keyword: Vec<String>,

    /// Require every keyword instead of any.
    #[arg(long)]
    pub all_keywords: bool,

    /// Match keywords case-sensitively.
    #[arg(long)]
    pub case_sensitive: bool,
}

/// Preset subcommands.
#[derive(Subcommand, Debug)]
enum PresetCommands {
    /// List saved presets.
    List,

    /// Show a preset's criteria as JSON.
    Show {
        /// Preset name or id.
        preset: String,
    },

    /// Delete a preset.
    Delete {
        /// Preset name or id.
        preset: String,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration.
    Show,

    /// Set a configuration value.
    Set {
        /// Configuration key.
        key: String,
        /// Configuration value.
        value: String,
    },

    /// Get a configuration value.
    Get {
        /// Configuration key.
        key: String,
    },

    /// Reset configuration to defaults.
    Reset,

    /// Show path to config file.
    Path,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };

    // Logs go to stderr so stdout stays parseable.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load()?;

    match cli.command {
        Commands::Stats {
            graph,
            format,
            output,
            preset,
        } => {
            let format: stats::OutputFormat = format.parse()?;
            stats::execute(&config, &graph, format, output, preset.as_deref())?;
        }

        Commands::Layout {
            graph,
            ticks,
            width,
            height,
            cluster_by_type,
            output,
        } => {
            let options = layout::LayoutOptions {
                ticks,
                width,
                height,
                cluster_by_type,
            };
            layout::execute(&config, &graph, options, output)?;
        }

        Commands::Filter {
            graph,
            criteria,
            save_preset,
            description,
            output,
        } => {
            let criteria = filter::build_criteria(&criteria)?;
            filter::execute(
                &config,
                &graph,
                criteria,
                save_preset.as_deref(),
                &description,
                output,
            )?;
        }

        Commands::Presets(preset_cmd) => match preset_cmd {
            PresetCommands::List => presets::list(&config)?,
            PresetCommands::Show { preset } => presets::show(&config, &preset)?,
            PresetCommands::Delete { preset } => presets::delete(&config, &preset)?,
        },

        Commands::Config(config_cmd_inner) => {
            let mut config = config;
            match config_cmd_inner {
                ConfigCommands::Show => config_cmd::show(&config)?,
                ConfigCommands::Set { key, value } => config_cmd::set(&mut config, &key, &value)?,
                ConfigCommands::Get { key } => config_cmd::get(&config, &key)?,
                ConfigCommands::Reset => config_cmd::reset()?,
                ConfigCommands::Path => {
                    if let Some(path) = Config::config_file_path() {
                        println!("{}", path.display());
                    } else {
                        println!("(no config file path available)");
                    }
                }
            }
        }
    }

    Ok(())
}
