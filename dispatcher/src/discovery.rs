//! Finding the tokens the wallet can send.
use std::ops::RangeInclusive;

use alloy::primitives::{Address, U256};
use nft_client::Erc721;
use tracing::{info, trace, warn};

/// Where the dispatcher takes token ids from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Inventory {
    /// The collection reported a balance; ids are fetched one by one with
    /// `tokenOfOwnerByIndex`.
    Enumerable {
        /// Balance reported by `balanceOf`.
        balance: U256,
    },
    /// The collection could not report a balance; ids were found by probing
    /// `ownerOf` over a fixed range, in ascending order.
    Scanned(Vec<U256>),
}

/// Determines how token ids will be resolved for `wanted` destinations.
///
/// Uses the enumerable path when `balanceOf(owner)` succeeds, and scans
/// `scan_range` otherwise. A balance lower than `wanted` is only reported.
pub async fn discover<C: Erc721 + ?Sized>(
    client: &C,
    owner: Address,
    wanted: usize,
    scan_range: RangeInclusive<u64>,
) -> Inventory {
    match client.balance_of(owner).await {
        Ok(balance) => {
            info!(%balance, "NFT balance of the wallet");
            if balance < U256::from(wanted) {
                warn!(
                    %balance,
                    destinations = wanted,
                    "wallet holds fewer tokens than there are destinations"
                );
            }
            Inventory::Enumerable { balance }
        }
        Err(err) => {
            warn!(
                error = %err,
                "failed to fetch the NFT balance, the contract may not implement ERC721Enumerable"
            );
            Inventory::Scanned(scan(client, owner, wanted, scan_range).await)
        }
    }
}

/// Probes `ownerOf` for every id of `range` and collects the ids held by
/// `owner`.
///
/// Stops as soon as `wanted` ids are found. A failing `ownerOf` (nonexistent
/// token, transport error) counts as "not owned".
pub async fn scan<C: Erc721 + ?Sized>(
    client: &C,
    owner: Address,
    wanted: usize,
    range: RangeInclusive<u64>,
) -> Vec<U256> {
    let mut found = Vec::with_capacity(wanted);
    if wanted == 0 {
        return found;
    }

    info!(from = range.start(), to = range.end(), "scanning token ids");
    for id in range {
        let token_id = U256::from(id);
        match client.owner_of(token_id).await {
            Ok(holder) if holder == owner => {
                info!(%token_id, "found a token owned by the wallet");
                found.push(token_id);
                if found.len() >= wanted {
                    break;
                }
            }
            Ok(_) => {}
            Err(err) => trace!(%token_id, error = %err, "ownerOf failed"),
        }
    }

    info!(found = found.len(), "token scan finished");
    found
}
