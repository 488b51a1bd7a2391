//! Event handlers.
//!
//! Every handler is safe to re-run for the same transition: a block that
//! failed halfway is replayed from its first event.

use shadow_store::{IndexerStore, LeafRecord, ProposalRecord, StoreError};
use shadow_types::{AccountId, ProposalId};
use tracing::{debug, info};

use crate::metrics::gauge_value;
use crate::{IndexerContext, IndexerError, ProgramEvent};

/// Apply one event observed in `transition_id` at block `height`.
pub fn apply<S: IndexerStore>(
    ctx: &mut IndexerContext<S>,
    event: ProgramEvent,
    transition_id: &str,
    height: u64,
) -> Result<(), IndexerError> {
    match event {
        ProgramEvent::BalanceChanged {
            account,
            balance,
            salt,
            encrypted_salt,
        } => apply_balance(ctx, account, balance, salt, encrypted_salt),
        ProgramEvent::ProposalCreated {
            description,
            options,
            end_block,
            quorum,
            admin,
        } => {
            if let Some(existing) = ctx.store.proposal_by_transition(transition_id)? {
                debug!(id = %existing.id, transition_id, "proposal already indexed");
                return Ok(());
            }
            let record = ProposalRecord {
                id: ctx.store.next_proposal_id()?,
                description,
                options,
                end_block,
                quorum,
                admin,
                is_active: true,
                is_finalized: false,
                source_transition: transition_id.to_string(),
                created_height: height,
            };
            ctx.store.insert_proposal(&record)?;
            info!(id = %record.id, end_block, quorum, "proposal created");
            Ok(())
        }
        // Cancel and close only deactivate; a tallied proposal stays finalized.
        ProgramEvent::ProposalCancelled(id) | ProgramEvent::ProposalClosed(id) => {
            set_flags(ctx, id, false, None)
        }
        ProgramEvent::ProposalTallied(id) => set_flags(ctx, id, false, Some(true)),
    }
}

fn apply_balance<S: IndexerStore>(
    ctx: &mut IndexerContext<S>,
    account: AccountId,
    balance: u64,
    salt: shadow_crypto::FieldElement,
    encrypted_salt: String,
) -> Result<(), IndexerError> {
    let index = ctx.tree.insert_or_update(&account, balance, salt)?;
    if !encrypted_salt.is_empty() {
        ctx.tree.set_encrypted_salt(&account, encrypted_salt)?;
    }

    // The tree is the source of the stored ciphertext so an event without
    // one keeps the previous value.
    let stored_ciphertext = ctx
        .tree
        .leaf(&account)
        .map(|leaf| leaf.encrypted_salt.clone())
        .unwrap_or_default();
    ctx.store.upsert_leaf(&LeafRecord {
        account: account.clone(),
        balance,
        salt,
        encrypted_salt: stored_ciphertext,
        index,
    })?;

    ctx.metrics
        .leaf_count
        .set(gauge_value(ctx.tree.leaf_count() as u64));
    info!(%account, index, balance, root = %ctx.tree.root(), "balance leaf updated");
    Ok(())
}

fn set_flags<S: IndexerStore>(
    ctx: &mut IndexerContext<S>,
    id: ProposalId,
    is_active: bool,
    is_finalized: Option<bool>,
) -> Result<(), IndexerError> {
    match ctx.store.set_proposal_flags(id, is_active, is_finalized) {
        Ok(()) => {
            info!(%id, is_active, ?is_finalized, "proposal flags updated");
            Ok(())
        }
        Err(StoreError::NotFound(_)) => Err(IndexerError::UnknownProposal(id)),
        Err(e) => Err(e.into()),
    }
}
