//! Transaction assembly for the CKB inscription protocol.
//!
//! The entry point is [`TxAssembler`], one method per protocol operation:
//! deploy, mint, close, rebase-info, rebase-mint, transfer, merge, destroy
//! and native capacity transfer. Every draft it returns satisfies the
//! conservation laws exactly (capacity in equals capacity out plus fee,
//! token amounts conserved wherever the protocol demands it); signing and
//! submission stay with the caller.

mod capacity;
mod fee;
mod script;
mod supply;
mod tx;
mod witness;

pub use capacity::{info_cell_capacity, min_change_capacity, token_cell_capacity};
pub use fee::{estimate_fee, DEFAULT_FEE_RATE, WITNESS_SIZE_MARGIN};
pub use script::{inscription_id, info_type_script, rebased_token_type, token_type_script};
pub use supply::{rebase_amount, total_supply};
pub use tx::{
    CapacityTransferOutcome, CloseOutcome, DeployOutcome, DeployParams, DestroyOutcome,
    MergeOutcome, MintOutcome, RebaseInfoOutcome, RebaseMintOutcome, TransferOutcome, TxAssembler,
};
pub use witness::{DelegatedProofService, UnlockContext, WitnessSet};
