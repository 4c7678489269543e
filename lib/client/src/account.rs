use std::fmt;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::{DynProvider, Provider, ProviderBuilder},
    signers::local::PrivateKeySigner,
    transports::http::reqwest::Url,
};
use eyre::WrapErr;
use tracing::debug;

/// Type that corresponds to the sending wallet.
#[derive(Clone)]
pub struct Account {
    /// The account's local private key wrapper.
    pub signer: PrivateKeySigner,
    /// The account's wallet -- an `alloy` provider with a `WalletFiller`.
    pub wallet: DynProvider,
    url: Url,
    chain_id: u64,
}

impl Account {
    /// Connect `signer` to the node listening at `rpc_url`.
    ///
    /// The provider fills nonce, chain id and any gas field a transaction
    /// leaves empty.
    ///
    /// # Errors
    ///
    /// May fail if the node does not answer the chain id query.
    pub async fn connect(
        rpc_url: Url,
        signer: PrivateKeySigner,
    ) -> eyre::Result<Self> {
        let wallet = ProviderBuilder::new()
            .wallet(EthereumWallet::from(signer.clone()))
            .connect_http(rpc_url.clone())
            .erased();

        let chain_id = wallet
            .get_chain_id()
            .await
            .wrap_err_with(|| format!("failed to reach node at {rpc_url}"))?;
        debug!(%rpc_url, chain_id, "connected to node");

        Ok(Self { signer, wallet, url: rpc_url, chain_id })
    }

    /// Retrieve this account's address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// The rpc endpoint this account's provider is connected to.
    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Chain id reported by the node when connecting.
    #[must_use]
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Get gas token balance.
    ///
    /// # Errors
    ///
    /// May fail if the balance query fails.
    pub async fn balance(&self) -> eyre::Result<U256> {
        self.wallet
            .get_balance(self.address())
            .await
            .wrap_err("should get balance")
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("address", &self.address())
            .field("url", &self.url.as_str())
            .field("chain_id", &self.chain_id)
            .finish_non_exhaustive()
    }
}
