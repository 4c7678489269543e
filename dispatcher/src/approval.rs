//! Operator approval performed before the transfers.
use alloy::primitives::Address;
use eyre::WrapErr;
use nft_client::Erc721;
use tracing::{debug, info};

/// Grants `operator` approval over all of `owner`'s tokens, unless it is
/// already granted.
///
/// Returns whether an approval transaction was sent.
///
/// # Errors
///
/// May fail if the approval query fails or the approval transaction is not
/// confirmed.
pub async fn ensure_approval<C: Erc721 + ?Sized>(
    client: &C,
    owner: Address,
    operator: Address,
) -> eyre::Result<bool> {
    let approved = client
        .is_approved_for_all(owner, operator)
        .await
        .wrap_err("failed to check operator approval")?;
    if approved {
        debug!(%operator, "operator already approved");
        return Ok(false);
    }

    info!(%operator, "approving operator for transfers");
    let tx_hash = client
        .set_approval_for_all(operator, true)
        .await
        .wrap_err_with(|| format!("failed to approve operator {operator}"))?;
    info!(%operator, %tx_hash, "operator approved");

    Ok(true)
}
