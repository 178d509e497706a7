//! crag-tools — CRAG search tools for RL agents.
//!
//! Usage:
//!   crag-tools prepare --local_dir ~/data/crag   Build parquet training files
//!   crag-tools tools --env crag_web_search        Print tool definitions
//!   crag-tools batch --env crag_api_search in.json  Run a batch of tool calls
//!   crag-tools init                               Write a default config file

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crag_tools::config::{self, ToolsConfig};
use crag_tools::dataset::{self, PrepareOptions};
use crag_tools::tools::{self, ToolEnv};

// ---------------------------------------------------------------------------
// CLI definition
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(name = "crag-tools")]
#[command(version = "0.1.0")]
#[command(about = "CRAG search tools and dataset preparation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the TOML config file (default: ~/.crag-tools/config.toml).
    #[arg(long)]
    config: Option<String>,

    /// Log level (debug, info, warn, error). Overrides the config file.
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build train/validation parquet files from the CRAG JSON splits.
    Prepare {
        /// Directory holding the raw splits; outputs land here too.
        #[arg(long = "local_dir", visible_alias = "local-dir", default_value = "~/data/crag")]
        local_dir: String,

        /// Optional copy target (hdfs:// URL or local path).
        #[arg(long = "hdfs_dir", visible_alias = "hdfs-dir")]
        hdfs_dir: Option<String>,

        /// Number of training samples to use.
        #[arg(long = "train_size", visible_alias = "train-size", default_value_t = 1280)]
        train_size: usize,

        /// Number of validation samples to use.
        #[arg(long = "val_size", visible_alias = "val-size", default_value_t = 128)]
        val_size: usize,

        /// Seed for reproducible sampling.
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print the tool definitions of an environment as JSON.
    Tools {
        #[arg(long, default_value = "crag_web_search")]
        env: String,
    },

    /// Run a JSON array of tool calls through an environment's tool.
    Batch {
        #[arg(long)]
        env: String,

        /// Tool name, when the environment has more than one.
        #[arg(long)]
        tool: Option<String>,

        /// File holding a JSON array of argument objects.
        input: PathBuf,
    },

    /// Write a config file populated with defaults.
    Init,
}

#[derive(Debug, Serialize)]
struct BatchOutput {
    result: String,
    reward: f64,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_deref()
        .map(|p| PathBuf::from(shellexpand::tilde(p).into_owned()))
        .unwrap_or_else(config::default_config_path);
    let cfg = config::load_config(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    // Initialize logging
    let level = cli.log_level.as_deref().unwrap_or(&cfg.log_level);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Prepare {
            local_dir,
            hdfs_dir,
            train_size,
            val_size,
            seed,
        } => {
            let opts = PrepareOptions {
                local_dir: PathBuf::from(shellexpand::tilde(&local_dir).into_owned()),
                hdfs_dir,
                train_size: Some(train_size),
                val_size: Some(val_size),
                seed,
            };
            cmd_prepare(&opts)
        }
        Commands::Tools { env } => cmd_tools(&env, &cfg),
        Commands::Batch { env, tool, input } => cmd_batch(&env, tool.as_deref(), &input, &cfg).await,
        Commands::Init => cmd_init(&config_path),
    }
}

// ---------------------------------------------------------------------------
// Command implementations
// ---------------------------------------------------------------------------

fn cmd_prepare(opts: &PrepareOptions) -> Result<()> {
    let summary = dataset::prepare(opts)?;
    eprintln!(
        "{} {} train / {} validation records in {}",
        ">>>".green().bold(),
        summary.train_rows,
        summary.validation_rows,
        opts.local_dir.display()
    );
    Ok(())
}

fn cmd_tools(env: &str, cfg: &ToolsConfig) -> Result<()> {
    let env: ToolEnv = env.parse()?;
    let toolset = tools::default_tools(env, cfg)?;
    let defs = tools::tool_definitions(&toolset);
    println!("{}", serde_json::to_string_pretty(&defs)?);
    Ok(())
}

async fn cmd_batch(env: &str, tool: Option<&str>, input: &Path, cfg: &ToolsConfig) -> Result<()> {
    let env: ToolEnv = env.parse()?;
    let toolset = tools::default_tools(env, cfg)?;
    let tool = match tool {
        Some(name) => toolset
            .iter()
            .find(|t| t.name() == name)
            .with_context(|| format!("Environment {} has no tool named {}", env, name))?,
        None => toolset
            .first()
            .with_context(|| format!("Environment {} has no tools", env))?,
    };

    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let args_list: Vec<serde_json::Value> =
        serde_json::from_str(&contents).context("Batch input must be a JSON array")?;

    info!("Running {} calls through {}", args_list.len(), tool.name());
    let results = tool.batch_execute(&args_list).await?;

    let outputs: Vec<BatchOutput> = args_list
        .iter()
        .zip(results)
        .map(|(args, result)| BatchOutput {
            reward: tool.calculate_reward(args, &result),
            result,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&outputs)?);
    Ok(())
}

fn cmd_init(config_path: &Path) -> Result<()> {
    if config_path.exists() {
        eprintln!(
            "{} Config already exists at {}",
            "Note:".yellow().bold(),
            config_path.display()
        );
        return Ok(());
    }
    config::save_config(&ToolsConfig::default(), config_path)?;
    eprintln!(
        "{} Wrote default config to {}",
        ">>>".green().bold(),
        config_path.display()
    );
    Ok(())
}
