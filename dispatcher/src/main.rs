//! Command line entry point of the dispatcher.
use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use eyre::WrapErr;
use nft_client::{Account, Erc721Contract};
use nft_dispatcher::{addresses::load_destinations, dispatch};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::opts::Args;

mod opts;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(err) = run(args).await {
        error!("dispatch aborted: {err:?}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> eyre::Result<()> {
    let config = args.dispatch_config()?;

    let destinations = load_destinations(&args.addresses)?;
    info!(
        count = destinations.len(),
        file = %args.addresses.display(),
        "loaded destination addresses"
    );

    // WARNING: Prefer the `PRIVATE_KEY` environment variable over the flag,
    // command lines end up in shell history.
    let signer = args
        .private_key
        .parse::<PrivateKeySigner>()
        .wrap_err("should parse the private key")?;
    let account = Account::connect(args.rpc_url, signer).await?;
    let balance = account.balance().await?;
    info!(
        wallet = %account.address(),
        rpc_url = %account.url(),
        chain_id = account.chain_id(),
        %balance,
        "using wallet"
    );

    let contract = Erc721Contract::new(args.contract, account.wallet.clone());
    let tally =
        dispatch(&contract, account.address(), &destinations, &config).await?;

    println!();
    println!("{tally}");

    Ok(())
}
