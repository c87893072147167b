//! Storechain CLI - Key, receipt and deployment tools.
//!
//! # Usage
//!
//! ```bash
//! # Generate a signing key
//! sc-cli keygen --out signer.key
//!
//! # Show the configured signer's address
//! sc-cli address
//!
//! # Check a transaction the gateway reported as unconfirmed
//! sc-cli receipt 0x5c50... --wait
//!
//! # Deploy the storefront contract
//! sc-cli deploy --artifact out/Storefront.json
//! ```
//!
//! # Commands
//!
//! - `keygen` - Write a fresh private key to a file
//! - `address` - Print the address of `SIGNER_PRIVATE_KEY`
//! - `receipt` - Look up (or wait for) a transaction receipt
//! - `deploy` - Deploy a compiled contract from the signing account

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use alloy::primitives::TxHash;
use clap::{Parser, Subcommand};
use url::Url;

mod commands;

#[derive(Parser)]
#[command(name = "sc-cli")]
#[command(author, version, about = "Storechain CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new signing key
    Keygen {
        /// File to write the key to (must not exist)
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Print the configured signer's address
    Address,
    /// Look up a transaction receipt
    Receipt {
        /// Transaction hash
        tx_hash: TxHash,

        /// Poll until the receipt appears or the budget runs out
        #[arg(short, long)]
        wait: bool,

        /// JSON-RPC endpoint of the chain node
        #[arg(long, env = "CHAIN_RPC_URL")]
        rpc_url: Url,
    },
    /// Deploy a compiled contract
    Deploy {
        /// Compiler artifact JSON with a `bytecode` field
        #[arg(short, long)]
        artifact: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Keygen { out } => commands::keys::keygen(&out)?,
        Commands::Address => commands::keys::address()?,
        Commands::Receipt {
            tx_hash,
            wait,
            rpc_url,
        } => commands::receipt::show(rpc_url, tx_hash, wait).await?,
        Commands::Deploy { artifact } => commands::deploy::deploy(&artifact).await?,
    }
    Ok(())
}
