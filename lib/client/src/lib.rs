//! Typed ERC-721 client for sending batches of NFT transfers over JSON-RPC.
//!
//! The dispatcher is written against the [`Erc721`] trait; [`Erc721Contract`]
//! implements it on top of an `alloy` provider owned by an [`Account`].
mod account;
mod erc721;
mod receipt;
mod revert;

pub use account::Account;
pub use erc721::{
    Erc721, Erc721Contract, IErc721, TransferMethod, TxSettings,
    DEFAULT_GAS_LIMIT, DEFAULT_GAS_PRICE,
};
pub use receipt::Ext as ReceiptExt;
pub use revert::RevertExt;
