//! # Main — CLI Entry Point
//!
//! Thin wrapper around the keyreach library: acquires an entropy batch,
//! runs the generation pipeline, and prints the result. Key material goes
//! to stdout; all diagnostics go to stderr via `tracing`.
//!
//! ## Subcommands
//!
//! - `fetch` — query the randomness provider and print the decoded
//!   candidate integers, one decimal per line.
//! - `generate` — produce an RSA key pair from the provider (`--url`) or
//!   from a local candidate file (`--input`), as text or JSON.
//!
//! ## Global Options
//!
//! - `--url` / `ENTROPY_URL`: the provider's integer endpoint.
//! - `--entropy-config`: TOML file overriding the provider query defaults.
//! - `LOG_FORMAT=json`: switch stderr diagnostics to JSON.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use rug::rand::RandState;
use tracing::info;

use keyreach::entropy::{self, EntropyConfig};
use keyreach::keygen::{self, KeygenConfig};
use keyreach::CandidatePool;

#[derive(Parser)]
#[command(name = "keyreach", about = "Generate RSA key pairs from an external randomness provider")]
struct Cli {
    /// Randomness provider integer endpoint (random.org-style)
    #[arg(long, env = "ENTROPY_URL", default_value = "https://www.random.org/integers")]
    url: String,

    /// TOML file overriding the provider query parameters
    #[arg(long)]
    entropy_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a batch from the provider and print the decoded integers
    Fetch,
    /// Generate an RSA key pair
    Generate {
        /// Read candidates from a file (one decimal integer per line)
        /// instead of the provider
        #[arg(long)]
        input: Option<PathBuf>,

        /// Minimum acceptable prime bit length
        #[arg(long, default_value_t = 512)]
        min_bits: u32,

        /// Maximum acceptable prime bit length
        #[arg(long, default_value_t = 1024)]
        max_bits: u32,

        /// Miller-Rabin rounds per candidate (higher = more certain but slower)
        #[arg(long, default_value_t = 10)]
        mr_rounds: u32,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,

        /// Also print the prime factors (verification/debugging only)
        #[arg(long)]
        show_primes: bool,
    },
}

fn main() -> Result<()> {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();

    let entropy_config = match &cli.entropy_config {
        Some(path) => entropy::load_config(path)?,
        None => EntropyConfig::default(),
    };

    match cli.command {
        Commands::Fetch => {
            let batch = entropy::fetch(&cli.url, &entropy_config)?;
            for n in &batch {
                println!("{}", n);
            }
            Ok(())
        }
        Commands::Generate {
            input,
            min_bits,
            max_bits,
            mr_rounds,
            format,
            show_primes,
        } => {
            if min_bits == 0 || min_bits > max_bits {
                bail!("invalid bit range: --min-bits {} --max-bits {}", min_bits, max_bits);
            }

            let batch = match &input {
                Some(path) => entropy::read_integers_file(path)?,
                None => entropy::fetch(&cli.url, &entropy_config)?,
            };
            info!(candidates = batch.len(), "candidate pool populated");

            let mut pool = CandidatePool::from_integers(batch);
            let config = KeygenConfig {
                min_bits,
                max_bits,
                mr_rounds,
            };
            let mut rng = RandState::new();
            let material = keygen::generate(&mut pool, &config, &mut rng)
                .context("key generation failed")?;
            info!(
                p_bits = material.p.significant_bits(),
                q_bits = material.q.significant_bits(),
                remaining = pool.remaining(),
                "key pair generated"
            );

            match format.as_str() {
                "json" => {
                    let pair = material.clone().into_key_pair();
                    let mut value = serde_json::to_value(&pair)?;
                    if show_primes {
                        value["primes"] = serde_json::json!({
                            "p": material.p.to_string(),
                            "q": material.q.to_string(),
                        });
                    }
                    println!("{}", serde_json::to_string_pretty(&value)?);
                }
                "text" => {
                    println!("public:");
                    println!("  n = {}", material.n);
                    println!("  e = {}", material.e);
                    println!("private:");
                    println!("  n = {}", material.n);
                    println!("  d = {}", material.d);
                    if show_primes {
                        println!("primes:");
                        println!("  p = {}", material.p);
                        println!("  q = {}", material.q);
                    }
                }
                other => bail!("unknown output format {:?} (expected text or json)", other),
            }
            Ok(())
        }
    }
}
