//! Command-line front end for the light-client verifier (spec §6.4).

mod config;
mod report;
mod trust_root_file;

use clap::{Parser, Subcommand};
use config::{Config, ConfigError};
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use verity_layers::l4::TrustRoot;
use verity_orchestrator::{Orchestrator, OrchestratorConfig};
use verity_rpc::{RpcConfig, RpcDataSource};

#[derive(Parser)]
#[command(name = "verity")]
#[command(about = "Trustless light-client verifier for an Accumulate-style chain of chains")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full four-layer pipeline against one account and print a
    /// trust report.
    Verify {
        /// Account URL to verify.
        #[arg(long)]
        account: String,

        #[arg(long)]
        api_endpoint: Option<String>,

        #[arg(long)]
        consensus_endpoint: Option<String>,

        /// Path to a persisted genesis trust root (see `init-trust-root`).
        /// Falls back to the config file's `genesis_hash`/`genesis_validators`
        /// when omitted.
        #[arg(long)]
        trust_root: Option<PathBuf>,

        #[arg(long)]
        max_height_skew: Option<u64>,

        /// Emit detailed per-layer evidence. Never changes the verified
        /// outcome (spec §6.3).
        #[arg(long)]
        debug: bool,
    },

    /// Write the persisted L4 trust root (spec §4.6's "written once at
    /// initialization" state) to the path given by `--out`.
    InitTrustRoot {
        #[arg(long)]
        genesis_hash: String,

        /// Path to a JSON file describing the genesis validator set.
        #[arg(long)]
        validators: PathBuf,

        #[arg(long)]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let exit_code = run(cli).await;
    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> i32 {
    match cli.command {
        Commands::Verify {
            account,
            api_endpoint,
            consensus_endpoint,
            trust_root,
            max_height_skew,
            debug,
        } => {
            if debug && std::env::var("RUST_LOG").is_err() {
                // SAFETY: single-threaded at this point, before any subscriber
                // or other thread reads the environment.
                unsafe { std::env::set_var("RUST_LOG", "debug") };
            }
            tracing_subscriber::fmt::init();

            let config = match Config::load(
                cli.config.as_deref(),
                api_endpoint,
                consensus_endpoint,
                None,
                None,
                max_height_skew,
                debug,
            ) {
                Ok(c) => c,
                Err(err) => return config_error(&err),
            };

            if config.api_endpoint.is_empty() {
                eprintln!("config error: api_endpoint is required (set it via --api-endpoint or the config file)");
                return report::EXIT_CONFIG_ERROR;
            }

            let trust_root = match resolve_trust_root(trust_root.as_deref(), &config) {
                Ok(root) => root,
                Err(err) => {
                    eprintln!("config error: {err}");
                    return report::EXIT_CONFIG_ERROR;
                }
            };

            let data_source = RpcDataSource::new(RpcConfig {
                api_endpoint: config.api_endpoint,
                consensus_endpoint: config.consensus_endpoint,
            });
            let orchestrator = Orchestrator::new(
                Arc::new(data_source),
                trust_root,
                OrchestratorConfig {
                    max_height_skew: config.max_height_skew,
                },
            );

            match orchestrator
                .verify_account(&account, CancellationToken::new())
                .await
            {
                Ok(result) => {
                    report::print_report(&result);
                    report::exit_code(&result)
                }
                Err(verity_types::VerifyError::Cancelled) => report::EXIT_CANCELLED,
                Err(err) => {
                    eprintln!("verification error: {err}");
                    report::EXIT_VERIFICATION_ERROR
                }
            }
        }

        Commands::InitTrustRoot {
            genesis_hash,
            validators,
            out,
        } => match build_trust_root(&genesis_hash, &validators) {
            Ok(root) => match trust_root_file::save(&out, &root) {
                Ok(()) => {
                    println!("trust root written to {}", out.display());
                    report::EXIT_FULLY_VERIFIED
                }
                Err(err) => {
                    eprintln!("config error: {err}");
                    report::EXIT_CONFIG_ERROR
                }
            },
            Err(err) => {
                eprintln!("config error: {err}");
                report::EXIT_CONFIG_ERROR
            }
        },
    }
}

/// Resolve the trust root from `--trust-root`, or from the config file's
/// `genesis_hash`/`genesis_validators` when no file path was given.
fn resolve_trust_root(trust_root_path: Option<&std::path::Path>, config: &Config) -> Result<TrustRoot, String> {
    if let Some(path) = trust_root_path {
        return trust_root_file::load(path);
    }
    let genesis_hash = config
        .genesis_hash
        .as_deref()
        .ok_or("no --trust-root given and config has no genesis_hash")?;
    let validators_path = config
        .genesis_validators_path
        .as_deref()
        .ok_or("no --trust-root given and config has no genesis_validators")?;
    build_trust_root(genesis_hash, &PathBuf::from(validators_path))
}

fn build_trust_root(genesis_hash: &str, validators_path: &PathBuf) -> Result<TrustRoot, String> {
    let hash = verity_types::Hash::from_hex(genesis_hash).map_err(|e| e.to_string())?;
    let validators = trust_root_file::load_validator_set(validators_path)?;
    if validators.merkle_root() != hash {
        return Err(
            "genesis_hash does not match the merkle root of the supplied validator set".into(),
        );
    }
    Ok(TrustRoot {
        genesis_hash: hash,
        genesis_validators: validators,
    })
}

fn config_error(err: &ConfigError) -> i32 {
    eprintln!("config error: {err}");
    report::EXIT_CONFIG_ERROR
}
