use alloy::{hex, sol_types::SolInterface};

use crate::IErc721::IErc721Errors;

/// Extension trait to recover the typed ERC-721 error behind a revert.
pub trait RevertExt {
    /// Decodes the revert data carried by `self` into one of the standard
    /// ERC-721 errors.
    ///
    /// Returns `None` when `self` is not a revert, or when the revert data
    /// does not match any known error.
    fn erc721_error(&self) -> Option<IErc721Errors>;
}

impl RevertExt for alloy::contract::Error {
    fn erc721_error(&self) -> Option<IErc721Errors> {
        let Self::TransportError(e) = self else {
            return None;
        };

        //  ErrorResp(
        //      ErrorPayload {
        //          code: 3,
        //          message: "execution reverted",
        //          data: Some(RawValue("0x...")),
        //      },
        //  )
        let data = e.as_error_resp()?.data.as_ref()?;
        decode(data.get())
    }
}

/// Decodes a JSON-encoded hex string of revert data.
fn decode(raw: &str) -> Option<IErc721Errors> {
    let data = hex::decode(raw.trim_matches('"')).ok()?;
    IErc721Errors::abi_decode(&data).ok()
}

#[cfg(test)]
mod tests {
    use alloy::{
        primitives::{uint, Address},
        sol_types::SolError,
    };

    use super::*;
    use crate::IErc721;

    fn json_hex(data: &[u8]) -> String {
        format!("\"{}\"", hex::encode_prefixed(data))
    }

    #[test]
    fn decodes_nonexistent_token() {
        let token_id = uint!(42_U256);
        let err = IErc721::ERC721NonexistentToken { tokenId: token_id };

        let decoded = decode(&json_hex(&err.abi_encode()));

        assert_eq!(
            decoded,
            Some(IErc721Errors::ERC721NonexistentToken(err))
        );
    }

    #[test]
    fn decodes_incorrect_owner() {
        let err = IErc721::ERC721IncorrectOwner {
            sender: Address::repeat_byte(1),
            tokenId: uint!(7_U256),
            owner: Address::repeat_byte(2),
        };

        let decoded = decode(&json_hex(&err.abi_encode()));

        assert!(matches!(
            decoded,
            Some(IErc721Errors::ERC721IncorrectOwner(IErc721::ERC721IncorrectOwner {
                tokenId,
                ..
            })) if tokenId == uint!(7_U256)
        ));
    }

    #[test]
    fn ignores_unknown_selector() {
        assert_eq!(decode("\"0xdeadbeef\""), None);
    }

    #[test]
    fn ignores_malformed_hex() {
        assert_eq!(decode("\"not hex\""), None);
    }
}
