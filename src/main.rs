//! w3push - chunked file uploader for on-chain storage
//!
//! Usage:
//!   w3push init                    - Write a default config file
//!   w3push plan <file>             - Show the chunk and cost plan for a file
//!   w3push hash <file>             - Print the Keccak-256 digest of a file
//!   w3push url <name> --account A  - Resolve the public gateway URL

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, Level};
use tracing_subscriber::FmtSubscriber;
use w3push::{
    chunk, codec,
    config::Config,
    gateway,
};

#[derive(Parser)]
#[command(name = "w3push")]
#[command(author = "w3push Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Chunked file uploader for on-chain web3 storage")]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "w3push.json")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the chunk and cost plan for a file without uploading
    Plan {
        /// File to plan
        file: PathBuf,
    },

    /// Print the Keccak-256 digest of a file
    Hash {
        /// File to hash
        file: PathBuf,
    },

    /// Resolve the public gateway URL for an uploaded file
    Url {
        /// File name as uploaded
        name: String,

        /// Uploading account address
        #[arg(long)]
        account: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("failed to install tracing subscriber");

    if let Err(e) = run(cli).await {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Init { force } => init(&cli.config, force),
        Commands::Plan { file } => plan(&cli.config, &file),
        Commands::Hash { file } => hash(&file),
        Commands::Url { name, account } => url(&cli.config, &name, &account),
    }
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        Ok(Config::load(path)?)
    } else {
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }
}

fn init(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        bail!(
            "config file {} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Config::default().save(path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn plan(config_path: &Path, file: &Path) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let content = std::fs::read(file)
        .with_context(|| format!("failed to read {}", file.display()))?;

    let target = chunk::target_chunk_count(content.len(), config.chunking.max_chunk_bytes as usize);
    let chunks = chunk::split(&bytes::Bytes::from(content), target);

    println!("{} -> {} chunk(s)", file.display(), chunks.len());
    let mut total_tokens = 0u64;
    for chunk in &chunks {
        let tokens = config.pricing.quote(chunk.len() as u64);
        total_tokens += tokens;
        println!(
            "  chunk {:>3}  {:>9} bytes  {:>4} token(s)  {}",
            chunk.index,
            chunk.len(),
            tokens,
            codec::to_hex(chunk.digest().as_slice()),
        );
    }
    println!("total cost: {} token(s)", total_tokens);
    Ok(())
}

fn hash(file: &Path) -> anyhow::Result<()> {
    let content = std::fs::read(file)
        .with_context(|| format!("failed to read {}", file.display()))?;
    println!("{}", codec::to_hex(codec::keccak256(&content).as_slice()));
    Ok(())
}

fn url(config_path: &Path, name: &str, account: &str) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    if config.contracts.file == alloy_primitives::Address::ZERO {
        bail!("contracts.file is not configured (run `w3push init` and edit the config)");
    }
    let account: alloy_primitives::Address = account
        .parse()
        .map_err(|_| anyhow::anyhow!("invalid account address: {}", account))?;

    println!(
        "{}",
        gateway::file_url(&config.gateway.domain, config.contracts.file, account, name)
    );
    Ok(())
}
