use alloy::{primitives::TxHash, rpc::types::TransactionReceipt};
use eyre::bail;

/// Extension trait to check that a mined transaction did not revert.
pub trait Ext {
    /// Returns the hash of the transaction from the [`TransactionReceipt`].
    ///
    /// # Errors
    ///
    /// May fail if the receipt reports a reverted status.
    fn ensure_success(&self) -> eyre::Result<TxHash>;
}

impl Ext for TransactionReceipt {
    fn ensure_success(&self) -> eyre::Result<TxHash> {
        if !self.status() {
            bail!(
                "transaction {} reverted in block {:?}",
                self.transaction_hash,
                self.block_number
            );
        }
        Ok(self.transaction_hash)
    }
}
