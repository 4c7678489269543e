//! Run configuration shared by the library and the command line.
use std::{ops::RangeInclusive, time::Duration};

use alloy::primitives::{address, Address};
use nft_client::TxSettings;

/// Node the dispatcher talks to when none is configured.
pub const DEFAULT_RPC_URL: &str = "https://testnet-rpc.monad.xyz";

/// Collection whose tokens are sent when none is configured.
pub const DEFAULT_CONTRACT: Address =
    address!("5A21b0F4a4f9B54e16282b6ed5AD014B3C77186F");

/// File the destinations are read from when none is configured.
pub const DEFAULT_ADDRESSES_FILE: &str = "addresses.txt";

/// Pause between two submitted transfers, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 2_000;

/// Pause between two submitted transfers.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(DEFAULT_DELAY_MS);

/// Token ids probed with `ownerOf` when the collection cannot report a
/// balance.
pub const DEFAULT_SCAN_RANGE: RangeInclusive<u64> = 1..=1_000;

/// Operator approval performed before the first transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Approval {
    /// Do not check or grant any approval.
    Skip,
    /// Grant `setApprovalForAll` to the operator unless already granted.
    Operator(Address),
}

/// Everything [`crate::dispatch`] needs besides the client and the wallet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchConfig {
    /// Gas parameters and transfer function.
    pub tx: TxSettings,
    /// Pause after each submitted transfer.
    pub delay: Duration,
    /// Candidate token ids for the ownership scan.
    pub scan_range: RangeInclusive<u64>,
    /// Approval step.
    pub approval: Approval,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tx: TxSettings::default(),
            delay: DEFAULT_DELAY,
            scan_range: DEFAULT_SCAN_RANGE,
            approval: Approval::Operator(DEFAULT_CONTRACT),
        }
    }
}
