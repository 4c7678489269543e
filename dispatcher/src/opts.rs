use std::{path::PathBuf, time::Duration};

use alloy::{
    primitives::{
        utils::{parse_units, ParseUnits},
        Address,
    },
    transports::http::reqwest::Url,
};
use clap::Parser;
use eyre::bail;
use nft_client::{TransferMethod, TxSettings, DEFAULT_GAS_LIMIT};
use nft_dispatcher::config::{
    Approval, DispatchConfig, DEFAULT_ADDRESSES_FILE, DEFAULT_CONTRACT,
    DEFAULT_DELAY_MS, DEFAULT_RPC_URL, DEFAULT_SCAN_RANGE,
};

/// Send one ERC-721 token to each address listed in a file.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub(crate) struct Args {
    /// RPC endpoint of the node.
    #[arg(long, env = "RPC_URL", default_value = DEFAULT_RPC_URL)]
    pub(crate) rpc_url: Url,

    /// Private key of the wallet holding the tokens.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub(crate) private_key: String,

    /// Address of the ERC-721 collection.
    #[arg(long, env = "NFT_CONTRACT_ADDRESS", default_value_t = DEFAULT_CONTRACT)]
    pub(crate) contract: Address,

    /// File listing one destination per line. Blank lines and lines starting
    /// with `#` are ignored.
    #[arg(long, env = "ADDRESSES_FILE", default_value = DEFAULT_ADDRESSES_FILE)]
    pub(crate) addresses: PathBuf,

    /// Gas limit of each transfer.
    #[arg(long, env = "GAS_LIMIT", default_value_t = DEFAULT_GAS_LIMIT)]
    gas_limit: u64,

    /// Gas price of each transfer, in gwei.
    #[arg(long, env = "GAS_PRICE_GWEI", default_value = "50", value_parser = parse_gwei)]
    gas_price: u128,

    /// Pause after each submitted transfer, in milliseconds.
    #[arg(long, env = "TRANSFER_DELAY_MS", default_value_t = DEFAULT_DELAY_MS)]
    delay_ms: u64,

    /// First token id probed when the collection cannot report a balance.
    #[arg(long, default_value_t = *DEFAULT_SCAN_RANGE.start())]
    scan_from: u64,

    /// Last token id probed when the collection cannot report a balance.
    #[arg(long, default_value_t = *DEFAULT_SCAN_RANGE.end())]
    scan_to: u64,

    /// Operator to approve for all the wallet's tokens [default: the
    /// collection address].
    #[arg(long, conflicts_with = "skip_approval")]
    operator: Option<Address>,

    /// Do not check or grant operator approval.
    #[arg(long)]
    skip_approval: bool,

    /// Send tokens with `safeTransferFrom` instead of `transferFrom`.
    #[arg(long)]
    safe: bool,
}

impl Args {
    /// Settings of the run, validated.
    pub(crate) fn dispatch_config(&self) -> eyre::Result<DispatchConfig> {
        if self.scan_from > self.scan_to {
            bail!(
                "scan range is empty: --scan-from {} is above --scan-to {}",
                self.scan_from,
                self.scan_to
            );
        }

        let method = if self.safe {
            TransferMethod::SafeTransferFrom
        } else {
            TransferMethod::TransferFrom
        };
        let approval = if self.skip_approval {
            Approval::Skip
        } else {
            Approval::Operator(self.operator.unwrap_or(self.contract))
        };

        Ok(DispatchConfig {
            tx: TxSettings {
                gas_limit: self.gas_limit,
                gas_price: self.gas_price,
                method,
            },
            delay: Duration::from_millis(self.delay_ms),
            scan_range: self.scan_from..=self.scan_to,
            approval,
        })
    }
}

/// Parses a decimal amount of gwei into wei.
fn parse_gwei(value: &str) -> Result<u128, String> {
    match parse_units(value, "gwei").map_err(|e| e.to_string())? {
        ParseUnits::U256(wei) => u128::try_from(wei)
            .map_err(|_| format!("{value} gwei does not fit a gas price")),
        ParseUnits::I256(_) => Err("gas price must not be negative".to_owned()),
    }
}
