//! Sequential transfer loop.
use std::str::FromStr;

use alloy::primitives::{Address, TxHash, U256};
use nft_client::Erc721;
use tracing::{error, info};

use crate::{config::DispatchConfig, discovery::Inventory, report::Tally};

/// Why a destination did not receive a token.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    /// The scanned inventory has no token left for this position.
    #[error("no token left for {destination}")]
    NoTokenAvailable {
        /// Destination as read from the address file.
        destination: String,
    },
    /// `tokenOfOwnerByIndex` failed.
    #[error("failed to fetch the wallet's token at index {index}: {reason:#}")]
    IndexLookup {
        /// Index into the wallet's token list.
        index: U256,
        /// Underlying failure.
        reason: eyre::Report,
    },
    /// The destination is not a hex-encoded address.
    #[error("invalid destination address {destination:?}: {reason}")]
    InvalidAddress {
        /// Destination as read from the address file.
        destination: String,
        /// Parsing failure.
        reason: <Address as FromStr>::Err,
    },
    /// The resolved token belongs to someone else.
    #[error("token {token_id} is owned by {owner}, not by the wallet")]
    NotOwner {
        /// Token that was about to be sent.
        token_id: U256,
        /// Current owner of the token.
        owner: Address,
    },
    /// `ownerOf` failed for the resolved token.
    #[error("failed to check the owner of token {token_id}: {reason:#}")]
    OwnerLookup {
        /// Token that was about to be sent.
        token_id: U256,
        /// Underlying failure.
        reason: eyre::Report,
    },
    /// The transfer transaction failed or reverted.
    #[error("failed to transfer token {token_id} to {to}: {reason:#}")]
    Transaction {
        /// Token that was sent.
        token_id: U256,
        /// Recipient of the transfer.
        to: Address,
        /// Underlying failure.
        reason: eyre::Report,
    },
}

impl TransferError {
    /// Whether a transfer transaction was attempted before failing.
    #[must_use]
    pub fn attempted_transfer(&self) -> bool {
        matches!(self, TransferError::Transaction { .. })
    }
}

/// Hands out token ids to destinations.
enum TokenSource {
    /// The i-th destination gets the i-th id.
    Listed(Vec<U256>),
    /// Ids are read from the wallet's enumeration, starting at `cursor`.
    ///
    /// Slots below `cursor` hold tokens that were handed out but stayed in
    /// the wallet. A confirmed transfer removes the token from the
    /// enumeration, so the slot at `cursor` then holds an untried token.
    Enumerated { cursor: U256 },
}

impl From<Inventory> for TokenSource {
    fn from(inventory: Inventory) -> Self {
        match inventory {
            Inventory::Enumerable { .. } => {
                TokenSource::Enumerated { cursor: U256::ZERO }
            }
            Inventory::Scanned(ids) => TokenSource::Listed(ids),
        }
    }
}

impl TokenSource {
    async fn resolve<C: Erc721 + ?Sized>(
        &self,
        client: &C,
        owner: Address,
        position: usize,
        destination: &str,
    ) -> Result<U256, TransferError> {
        match self {
            TokenSource::Listed(ids) => {
                ids.get(position).copied().ok_or_else(|| {
                    TransferError::NoTokenAvailable {
                        destination: destination.to_owned(),
                    }
                })
            }
            TokenSource::Enumerated { cursor } => client
                .token_of_owner_by_index(owner, *cursor)
                .await
                .map_err(|reason| TransferError::IndexLookup {
                    index: *cursor,
                    reason,
                }),
        }
    }

    /// Marks the last resolved token as still held by the wallet.
    fn skip(&mut self) {
        if let TokenSource::Enumerated { cursor } = self {
            *cursor += U256::from(1);
        }
    }
}

/// Sends one token to each destination, one transaction at a time.
pub struct Dispatcher<'a, C: ?Sized> {
    client: &'a C,
    owner: Address,
    config: &'a DispatchConfig,
}

impl<'a, C: Erc721 + ?Sized> Dispatcher<'a, C> {
    /// Dispatcher sending `owner`'s tokens through `client`.
    pub fn new(client: &'a C, owner: Address, config: &'a DispatchConfig) -> Self {
        Self { client, owner, config }
    }

    /// Walks `destinations` in order and sends each of them a token taken
    /// from `inventory`.
    ///
    /// A failing destination is logged and counted, then the loop moves on.
    /// After each submitted transaction but the last, the loop pauses for
    /// the configured delay.
    pub async fn run(&self, destinations: &[String], inventory: Inventory) -> Tally {
        let total = destinations.len();
        let mut tally = Tally::new(total);
        let mut tokens = TokenSource::from(inventory);

        for (position, destination) in destinations.iter().enumerate() {
            let result =
                self.send_one(&mut tokens, position, total, destination).await;

            let submitted = match &result {
                Ok(tx_hash) => {
                    info!(%tx_hash, destination = %destination, "transfer confirmed");
                    true
                }
                Err(err) => {
                    error!(destination = %destination, error = %err, "transfer failed");
                    err.attempted_transfer()
                }
            };
            tally.record(destination.as_str(), result);

            if submitted && position + 1 < total {
                tokio::time::sleep(self.config.delay).await;
            }
        }

        tally
    }

    async fn send_one(
        &self,
        tokens: &mut TokenSource,
        position: usize,
        total: usize,
        destination: &str,
    ) -> Result<TxHash, TransferError> {
        let to = Address::from_str(destination).map_err(|reason| {
            TransferError::InvalidAddress {
                destination: destination.to_owned(),
                reason,
            }
        })?;
        let token_id =
            tokens.resolve(self.client, self.owner, position, destination).await?;

        info!(position = position + 1, total, %token_id, %to, "transferring token");
        let result = self.transfer(token_id, to).await;
        if result.is_err() {
            tokens.skip();
        }
        result
    }

    async fn transfer(
        &self,
        token_id: U256,
        to: Address,
    ) -> Result<TxHash, TransferError> {
        let owner = self
            .client
            .owner_of(token_id)
            .await
            .map_err(|reason| TransferError::OwnerLookup { token_id, reason })?;
        if owner != self.owner {
            return Err(TransferError::NotOwner { token_id, owner });
        }

        self.client
            .transfer(self.owner, to, token_id, &self.config.tx)
            .await
            .map_err(|reason| TransferError::Transaction { token_id, to, reason })
    }
}
