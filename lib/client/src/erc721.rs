//! ERC-721 bindings and the client trait the dispatcher is written against.
use alloy::{
    network::Ethereum,
    primitives::{Address, TxHash, U256},
    providers::{DynProvider, PendingTransactionBuilder},
    sol,
};
use async_trait::async_trait;
use eyre::WrapErr;
use tracing::debug;

use crate::{receipt::Ext, revert::RevertExt};

sol!(
    #[sol(rpc, all_derives)]
    interface IErc721 {
        function balanceOf(address owner) external view returns (uint256 balance);
        function ownerOf(uint256 tokenId) external view returns (address owner);
        function transferFrom(address from, address to, uint256 tokenId) external;
        function safeTransferFrom(address from, address to, uint256 tokenId) external;
        function setApprovalForAll(address operator, bool approved) external;
        function isApprovedForAll(address owner, address operator) external view returns (bool approved);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256 tokenId);

        error ERC721InvalidOwner(address owner);
        error ERC721NonexistentToken(uint256 tokenId);
        error ERC721IncorrectOwner(address sender, uint256 tokenId, address owner);
        error ERC721InvalidSender(address sender);
        error ERC721InvalidReceiver(address receiver);
        error ERC721InsufficientApproval(address operator, uint256 tokenId);
        error ERC721InvalidApprover(address approver);
        error ERC721InvalidOperator(address operator);
        error ERC721OutOfBoundsIndex(address owner, uint256 index);
    }
);

/// Gas limit attached to every transfer.
pub const DEFAULT_GAS_LIMIT: u64 = 300_000;

/// Legacy gas price attached to every transfer, 50 gwei.
pub const DEFAULT_GAS_PRICE: u128 = 50_000_000_000;

/// Contract function used to move a token.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransferMethod {
    /// `transferFrom(address,address,uint256)`.
    #[default]
    TransferFrom,
    /// `safeTransferFrom(address,address,uint256)`, which makes the token
    /// contract check that contract recipients accept ERC-721 tokens.
    SafeTransferFrom,
}

impl TransferMethod {
    /// Name of the contract function.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            TransferMethod::TransferFrom => "transferFrom",
            TransferMethod::SafeTransferFrom => "safeTransferFrom",
        }
    }
}

/// Fixed transaction parameters applied to every transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxSettings {
    /// Gas limit of each transfer transaction.
    pub gas_limit: u64,
    /// Legacy gas price in wei.
    pub gas_price: u128,
    /// Contract function used to move tokens.
    pub method: TransferMethod,
}

impl Default for TxSettings {
    fn default() -> Self {
        Self {
            gas_limit: DEFAULT_GAS_LIMIT,
            gas_price: DEFAULT_GAS_PRICE,
            method: TransferMethod::default(),
        }
    }
}

/// The subset of ERC-721 (and its `Enumerable` extension) the dispatcher
/// needs.
///
/// Mutating methods resolve once the transaction is mined, and fail if it
/// reverted.
#[async_trait]
pub trait Erc721: Send + Sync {
    /// Returns the number of tokens in `owner`'s account.
    async fn balance_of(&self, owner: Address) -> eyre::Result<U256>;

    /// Returns the owner of the `token_id` token.
    async fn owner_of(&self, token_id: U256) -> eyre::Result<Address>;

    /// Returns the token id owned by `owner` at `index` of its token list.
    ///
    /// Only available on contracts implementing `ERC721Enumerable`.
    async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> eyre::Result<U256>;

    /// Returns whether `operator` may manage all of `owner`'s assets.
    async fn is_approved_for_all(
        &self,
        owner: Address,
        operator: Address,
    ) -> eyre::Result<bool>;

    /// Approves or removes `operator` for all of the caller's tokens.
    async fn set_approval_for_all(
        &self,
        operator: Address,
        approved: bool,
    ) -> eyre::Result<TxHash>;

    /// Transfers `token_id` from `from` to `to` using `settings`.
    async fn transfer(
        &self,
        from: Address,
        to: Address,
        token_id: U256,
        settings: &TxSettings,
    ) -> eyre::Result<TxHash>;
}

/// [`Erc721`] implementation backed by a deployed contract.
#[derive(Clone)]
pub struct Erc721Contract {
    contract: IErc721::IErc721Instance<DynProvider>,
}

impl Erc721Contract {
    /// Binds the contract deployed at `address` to `provider`.
    #[must_use]
    pub fn new(address: Address, provider: DynProvider) -> Self {
        Self { contract: IErc721::new(address, provider) }
    }

    /// Address of the bound contract.
    #[must_use]
    pub fn address(&self) -> Address {
        *self.contract.address()
    }
}

/// Wraps `err` with the function name and, for reverts, the decoded reason.
fn context(err: alloy::contract::Error, function: &str) -> eyre::Report {
    match err.erc721_error() {
        Some(reason) => {
            eyre::Report::new(err)
                .wrap_err(format!("{function} reverted with {reason:?}"))
        }
        None => eyre::Report::new(err).wrap_err(format!("call {function}")),
    }
}

/// Waits for `pending` to be mined and checks its status.
async fn confirm(
    pending: PendingTransactionBuilder<Ethereum>,
) -> eyre::Result<TxHash> {
    let tx_hash = *pending.tx_hash();
    debug!(%tx_hash, "waiting for receipt");
    let receipt = pending
        .get_receipt()
        .await
        .wrap_err_with(|| format!("transaction {tx_hash} was not confirmed"))?;
    receipt.ensure_success()
}

#[async_trait]
impl Erc721 for Erc721Contract {
    async fn balance_of(&self, owner: Address) -> eyre::Result<U256> {
        self.contract
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| context(e, "balanceOf"))
    }

    async fn owner_of(&self, token_id: U256) -> eyre::Result<Address> {
        self.contract
            .ownerOf(token_id)
            .call()
            .await
            .map_err(|e| context(e, "ownerOf"))
    }

    async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> eyre::Result<U256> {
        self.contract
            .tokenOfOwnerByIndex(owner, index)
            .call()
            .await
            .map_err(|e| context(e, "tokenOfOwnerByIndex"))
    }

    async fn is_approved_for_all(
        &self,
        owner: Address,
        operator: Address,
    ) -> eyre::Result<bool> {
        self.contract
            .isApprovedForAll(owner, operator)
            .call()
            .await
            .map_err(|e| context(e, "isApprovedForAll"))
    }

    async fn set_approval_for_all(
        &self,
        operator: Address,
        approved: bool,
    ) -> eyre::Result<TxHash> {
        let pending = self
            .contract
            .setApprovalForAll(operator, approved)
            .send()
            .await
            .map_err(|e| context(e, "setApprovalForAll"))?;
        confirm(pending).await
    }

    async fn transfer(
        &self,
        from: Address,
        to: Address,
        token_id: U256,
        settings: &TxSettings,
    ) -> eyre::Result<TxHash> {
        let sent = match settings.method {
            TransferMethod::TransferFrom => {
                self.contract
                    .transferFrom(from, to, token_id)
                    .gas(settings.gas_limit)
                    .gas_price(settings.gas_price)
                    .send()
                    .await
            }
            TransferMethod::SafeTransferFrom => {
                self.contract
                    .safeTransferFrom(from, to, token_id)
                    .gas(settings.gas_limit)
                    .gas_price(settings.gas_price)
                    .send()
                    .await
            }
        };
        let pending = sent.map_err(|e| context(e, settings.method.name()))?;
        confirm(pending).await
    }
}
