use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// GlobalP2P wallet adapter CLI (library-facing definitions)
#[derive(Debug, Parser)]
#[command(name = "wallet-adapter", about = "Provision custodial wallets through the GlobalP2P registry")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Path to the TOML config (defaults to $CONFIG_PATH or globalp2p.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Deploy a wallet for a user and print its address
    Create {
        #[arg(long = "user-id")]
        user_id: String,
    },
    /// Print the wallet registered for a user
    Lookup {
        #[arg(long = "user-id")]
        user_id: String,
    },
    /// Estimate the gas a deployWallet call would use
    Estimate {
        #[arg(long = "user-id")]
        user_id: String,
    },
    /// Print the operator address and chain
    Signer,
}
