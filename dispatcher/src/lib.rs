//! Send one ERC-721 token to each address of a list.
//!
//! A run is a single linear flow: optionally approve an operator, find out
//! how the wallet's tokens can be enumerated ([`discovery`]), then transfer
//! them one by one ([`transfer`]) and tally the outcome ([`report`]).
//!
//! ```no_run
//! # async fn run() -> eyre::Result<()> {
//! use nft_client::{Account, Erc721Contract};
//! use nft_dispatcher::{addresses, config::DispatchConfig, dispatch};
//!
//! let signer = "0x...".parse()?;
//! let account = Account::connect("http://localhost:8545".parse()?, signer).await?;
//! let contract = Erc721Contract::new(
//!     nft_dispatcher::config::DEFAULT_CONTRACT,
//!     account.wallet.clone(),
//! );
//! let destinations = addresses::load_destinations("addresses.txt")?;
//!
//! let tally = dispatch(
//!     &contract,
//!     account.address(),
//!     &destinations,
//!     &DispatchConfig::default(),
//! )
//! .await?;
//! println!("{tally}");
//! # Ok(())
//! # }
//! ```
use alloy::primitives::Address;
use nft_client::Erc721;
use tracing::info;

pub mod addresses;
pub mod approval;
pub mod config;
pub mod discovery;
pub mod report;
pub mod transfer;

#[cfg(test)]
mod test_utils;

use crate::{
    config::{Approval, DispatchConfig},
    report::Tally,
    transfer::Dispatcher,
};

/// Sends one of `owner`'s tokens to each of `destinations`.
///
/// Per-destination failures end up in the returned [`Tally`]; only the steps
/// before the first transfer can fail the whole run.
///
/// # Errors
///
/// May fail if the operator approval cannot be checked or granted.
pub async fn dispatch<C: Erc721 + ?Sized>(
    client: &C,
    owner: Address,
    destinations: &[String],
    config: &DispatchConfig,
) -> eyre::Result<Tally> {
    info!(%owner, destinations = destinations.len(), "starting dispatch");

    if let Approval::Operator(operator) = config.approval {
        approval::ensure_approval(client, owner, operator).await?;
    }

    let inventory = discovery::discover(
        client,
        owner,
        destinations.len(),
        config.scan_range.clone(),
    )
    .await;

    let tally =
        Dispatcher::new(client, owner, config).run(destinations, inventory).await;
    info!(
        succeeded = tally.succeeded(),
        failed = tally.failed(),
        total = tally.total(),
        "dispatch finished"
    );
    Ok(tally)
}
