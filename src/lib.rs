//! Transaction-assembly engine for the CKB inscription protocol.
//!
//! This crate is a facade over the workspace members; most callers only need
//! [`TxAssembler`] plus an implementation of [`CellSource`] backed by their
//! indexer.
//!
//! ```no_run
//! use ckb_inscription::{DeployParams, Network, TokenKind, TxAssembler};
//! # use ckb_inscription::{CellQuery, CellSource, Error, LiveCell};
//! # struct Indexer;
//! # impl CellSource for Indexer {
//! #     fn live_cells(&self, _: &CellQuery) -> Result<Vec<LiveCell>, Error> { Ok(vec![]) }
//! # }
//! # fn lock() -> ckb_inscription::packed::Script { Default::default() }
//! let source = Indexer;
//! let assembler = TxAssembler::new(&source, Network::Testnet, TokenKind::Xudt, lock());
//! let outcome = assembler.deploy(&DeployParams {
//!     decimal: 8,
//!     name: "CKB Fist Inscription".into(),
//!     symbol: "CKBI".into(),
//!     max_supply: 21_000_000,
//!     mint_limit: 1_000,
//! })?;
//! # Ok::<(), Error>(())
//! ```

pub use ckb_inscription_builder::{
    estimate_fee, info_cell_capacity, info_type_script, inscription_id, min_change_capacity,
    rebase_amount, rebased_token_type, token_cell_capacity, token_type_script, total_supply,
    CapacityTransferOutcome, CloseOutcome, DelegatedProofService, DeployOutcome, DeployParams,
    DestroyOutcome, MergeOutcome, MintOutcome, RebaseInfoOutcome, RebaseMintOutcome,
    TransferOutcome, TxAssembler, UnlockContext, WitnessSet, DEFAULT_FEE_RATE,
    WITNESS_SIZE_MARGIN,
};
pub use ckb_inscription_collector::{
    collect_all_inputs, collect_all_token_inputs, collect_inputs, collect_token_inputs, CellQuery,
    CellSource, CollectedCapacity, CollectedTokens,
};
pub use ckb_inscription_constant::{Network, TokenKind};
pub use ckb_inscription_types::{
    encode_token_amount, unit_factor, Error, InscriptionInfo, LiveCell, MintStatus,
};

pub use ckb_types::packed;
