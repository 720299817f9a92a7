// src/main.rs
//! Command-line entry point for the GlobalP2P wallet adapter.
use anyhow::Result;
use clap::Parser;
use ethers::{abi::Token, utils::to_checksum};
use globalp2p_wallet::{
    blockchain::client::network_name,
    cli::{Cli, Commands},
    core::abi::DEPLOY_WALLET,
    WalletAdapter, WalletOptions,
};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    init_logging()?;

    info!("Starting wallet-adapter v{}", env!("CARGO_PKG_VERSION"));

    let options = WalletOptions::load(args.config.as_deref())?;
    let adapter = WalletAdapter::connect(options).await?;

    match args.command {
        Commands::Create { user_id } => {
            let address = adapter.create_wallet(&user_id).await?;
            println!("{}", address);
        }
        Commands::Lookup { user_id } => {
            let address = adapter.wallet_address_for(&user_id).await?;
            println!("{}", address);
        }
        Commands::Estimate { user_id } => {
            let gas = adapter
                .estimate_gas_usage(DEPLOY_WALLET, &[Token::String(user_id)])
                .await?;
            println!("{}", gas);
        }
        Commands::Signer => {
            println!(
                "{} on {} (chain id {})",
                to_checksum(&adapter.operator_address(), None),
                network_name(adapter.chain_id()),
                adapter.chain_id()
            );
        }
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=info,h2=info"));

    // Logs go to stderr so stdout carries only the command result.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
