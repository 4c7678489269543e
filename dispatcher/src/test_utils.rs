//! Unit-testing utilities for the dispatcher.
use std::{
    collections::{HashMap, HashSet},
    sync::{Mutex, MutexGuard},
};

use alloy::primitives::{Address, TxHash, B256, U256};
use async_trait::async_trait;
use eyre::{bail, eyre};
use nft_client::{Erc721, TxSettings};

/// A call observed by [`MockErc721`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Call {
    BalanceOf(Address),
    OwnerOf(U256),
    TokenOfOwnerByIndex(Address, U256),
    IsApprovedForAll(Address, Address),
    SetApprovalForAll(Address, bool),
    Transfer { from: Address, to: Address, token_id: U256, settings: TxSettings },
}

#[derive(Default)]
struct State {
    caller: Address,
    enumerable: bool,
    owners: HashMap<U256, Address>,
    /// Per-owner token list, kept in the order an `ERC721Enumerable`
    /// contract reports it.
    owned: HashMap<Address, Vec<U256>>,
    operators: HashSet<(Address, Address)>,
    failing_ids: HashSet<U256>,
    rejecting_receivers: HashSet<Address>,
    calls: Vec<Call>,
    mined: u64,
}

/// In-memory ERC-721 collection acting on behalf of a single caller.
pub(crate) struct MockErc721 {
    state: Mutex<State>,
}

impl MockErc721 {
    /// Enumerable collection whose transactions are sent by `caller`.
    pub(crate) fn new(caller: Address) -> Self {
        let state = State { caller, enumerable: true, ..State::default() };
        Self { state: Mutex::new(state) }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Collection without `balanceOf`/`tokenOfOwnerByIndex` support.
    pub(crate) fn non_enumerable(self) -> Self {
        self.state().enumerable = false;
        self
    }

    /// Mints `ids` to `owner`.
    pub(crate) fn with_tokens(
        self,
        owner: Address,
        ids: impl IntoIterator<Item = u64>,
    ) -> Self {
        {
            let mut state = self.state();
            for id in ids {
                let token_id = U256::from(id);
                state.owners.insert(token_id, owner);
                state.owned.entry(owner).or_default().push(token_id);
            }
        }
        self
    }

    /// Makes `ownerOf(id)` fail.
    pub(crate) fn with_failing_owner_of(self, id: u64) -> Self {
        self.state().failing_ids.insert(U256::from(id));
        self
    }

    /// Makes every transfer to `receiver` revert.
    pub(crate) fn rejecting(self, receiver: Address) -> Self {
        self.state().rejecting_receivers.insert(receiver);
        self
    }

    /// Pre-approves `operator` for `owner`.
    pub(crate) fn with_operator(self, owner: Address, operator: Address) -> Self {
        self.state().operators.insert((owner, operator));
        self
    }

    /// Moves `id` to `new_owner` outside of the dispatcher.
    pub(crate) fn steal(&self, id: u64, new_owner: Address) {
        let mut state = self.state();
        let token_id = U256::from(id);
        state.move_token(token_id, new_owner);
    }

    pub(crate) fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    /// `(to, token_id)` of every transfer attempt, in order.
    pub(crate) fn transfer_attempts(&self) -> Vec<(Address, U256)> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::Transfer { to, token_id, .. } => Some((*to, *token_id)),
                _ => None,
            })
            .collect()
    }

    /// Token ids probed with `ownerOf`, in order.
    pub(crate) fn owner_of_queries(&self) -> Vec<U256> {
        self.state()
            .calls
            .iter()
            .filter_map(|call| match call {
                Call::OwnerOf(token_id) => Some(*token_id),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn owner(&self, id: u64) -> Option<Address> {
        self.state().owners.get(&U256::from(id)).copied()
    }
}

impl State {
    fn move_token(&mut self, token_id: U256, to: Address) {
        if let Some(from) = self.owners.insert(token_id, to) {
            let tokens = self.owned.entry(from).or_default();
            // Swap and pop, as `ERC721Enumerable` does.
            if let Some(index) = tokens.iter().position(|id| *id == token_id) {
                tokens.swap_remove(index);
            }
        }
        self.owned.entry(to).or_default().push(token_id);
    }

    fn mine(&mut self) -> TxHash {
        self.mined += 1;
        B256::left_padding_from(&self.mined.to_be_bytes())
    }
}

#[async_trait]
impl Erc721 for MockErc721 {
    async fn balance_of(&self, owner: Address) -> eyre::Result<U256> {
        let mut state = self.state();
        state.calls.push(Call::BalanceOf(owner));
        if !state.enumerable {
            bail!("call balanceOf: execution reverted");
        }
        let balance = state.owned.get(&owner).map_or(0, Vec::len);
        Ok(U256::from(balance))
    }

    async fn owner_of(&self, token_id: U256) -> eyre::Result<Address> {
        let mut state = self.state();
        state.calls.push(Call::OwnerOf(token_id));
        if state.failing_ids.contains(&token_id) {
            bail!("call ownerOf: connection reset");
        }
        state.owners.get(&token_id).copied().ok_or_else(|| {
            eyre!("ownerOf reverted with ERC721NonexistentToken({token_id})")
        })
    }

    async fn token_of_owner_by_index(
        &self,
        owner: Address,
        index: U256,
    ) -> eyre::Result<U256> {
        let mut state = self.state();
        state.calls.push(Call::TokenOfOwnerByIndex(owner, index));
        if !state.enumerable {
            bail!("call tokenOfOwnerByIndex: execution reverted");
        }
        let tokens = state.owned.get(&owner).cloned().unwrap_or_default();
        usize::try_from(index)
            .ok()
            .and_then(|index| tokens.get(index).copied())
            .ok_or_else(|| {
                eyre!("tokenOfOwnerByIndex reverted with ERC721OutOfBoundsIndex({owner}, {index})")
            })
    }

    async fn is_approved_for_all(
        &self,
        owner: Address,
        operator: Address,
    ) -> eyre::Result<bool> {
        let mut state = self.state();
        state.calls.push(Call::IsApprovedForAll(owner, operator));
        Ok(state.operators.contains(&(owner, operator)))
    }

    async fn set_approval_for_all(
        &self,
        operator: Address,
        approved: bool,
    ) -> eyre::Result<TxHash> {
        let mut state = self.state();
        state.calls.push(Call::SetApprovalForAll(operator, approved));
        let caller = state.caller;
        if operator == caller {
            bail!("setApprovalForAll reverted with ERC721InvalidOperator({operator})");
        }
        if approved {
            state.operators.insert((caller, operator));
        } else {
            state.operators.remove(&(caller, operator));
        }
        Ok(state.mine())
    }

    async fn transfer(
        &self,
        from: Address,
        to: Address,
        token_id: U256,
        settings: &TxSettings,
    ) -> eyre::Result<TxHash> {
        let mut state = self.state();
        state.calls.push(Call::Transfer {
            from,
            to,
            token_id,
            settings: *settings,
        });
        if state.rejecting_receivers.contains(&to) {
            bail!("transaction reverted: ERC721InvalidReceiver({to})");
        }
        match state.owners.get(&token_id) {
            Some(owner) if *owner == from => {}
            _ => bail!("transferFrom reverted with ERC721IncorrectOwner"),
        }
        state.move_token(token_id, to);
        Ok(state.mine())
    }
}
