//! The per-operation transaction builders.
//!
//! [`TxAssembler`] is the engine's facade: it borrows a cell source and the
//! owner lock, carries the network and token-kind configuration, and exposes
//! one method per protocol operation. It holds no state across invocations;
//! every build is a pure function of its inputs and the ledger snapshot the
//! source returns.

use ckb_inscription_collector::{collect_inputs, require_cells, CellQuery, CellSource};
use ckb_inscription_constant::{Network, TokenKind};
use ckb_inscription_types::{Error, InscriptionInfo, LiveCell};
use ckb_logger::debug;
use ckb_types::{
    core::{Capacity, DepType, FeeRate},
    packed,
    prelude::*,
    H256,
};

use crate::capacity::min_change_capacity;
use crate::fee::DEFAULT_FEE_RATE;
use crate::script;
use crate::supply::total_supply;
use crate::witness::{resolve_unlock, UnlockContext};

mod deploy;
mod destroy;
mod info;
mod merge;
mod mint;
mod native;
mod rebase;
mod transfer;

pub use deploy::{DeployOutcome, DeployParams};
pub use destroy::DestroyOutcome;
pub use info::{CloseOutcome, RebaseInfoOutcome};
pub use merge::MergeOutcome;
pub use mint::MintOutcome;
pub use native::CapacityTransferOutcome;
pub use rebase::RebaseMintOutcome;
pub use transfer::TransferOutcome;

/// Assembles protocol transactions for one owner lock over a cell source.
pub struct TxAssembler<'a, S: CellSource> {
    source: &'a S,
    network: Network,
    kind: TokenKind,
    lock: packed::Script,
    fee_rate: FeeRate,
    extra_cell_deps: Vec<packed::CellDep>,
    unlock: UnlockContext<'a>,
}

/// An info cell resolved from a deployment id, with its decoded payload.
pub(crate) struct InfoContext {
    pub(crate) cell: LiveCell,
    pub(crate) info: InscriptionInfo,
    pub(crate) info_type: packed::Script,
}

impl<'a, S: CellSource> TxAssembler<'a, S> {
    pub fn new(source: &'a S, network: Network, kind: TokenKind, lock: packed::Script) -> Self {
        TxAssembler {
            source,
            network,
            kind,
            lock,
            fee_rate: DEFAULT_FEE_RATE,
            extra_cell_deps: Vec::new(),
            unlock: UnlockContext::MainKey,
        }
    }

    pub fn fee_rate(mut self, fee_rate: FeeRate) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    pub fn unlock(mut self, unlock: UnlockContext<'a>) -> Self {
        self.unlock = unlock;
        self
    }

    /// Appends a caller-supplied dep, e.g. the owner lock's code cell.
    pub fn cell_dep(mut self, dep: packed::CellDep) -> Self {
        self.extra_cell_deps.push(dep);
        self
    }

    /// Live supply of a deployment's pre-rebase token cells across all
    /// owners, as the rebase operations observe it.
    pub fn actual_supply(&self, inscription_id: &H256) -> Result<u128, Error> {
        let info_type = script::info_type_script(self.network, inscription_id);
        let token_type = script::token_type_script(self.kind, self.network, &info_type);
        let cells = require_cells(
            self.source.live_cells(&CellQuery::by_type(token_type))?,
            Error::NoTokenCells,
        )?;
        total_supply(&cells)
    }

    /// The owner's bare cells, the only ones eligible to pay capacity and
    /// fee.
    pub(crate) fn fee_cells(&self) -> Result<Vec<LiveCell>, Error> {
        let cells = self
            .source
            .live_cells(&CellQuery::by_lock(self.lock.clone()))?;
        let cells: Vec<_> = cells.into_iter().filter(LiveCell::is_bare).collect();
        require_cells(cells, Error::NoLiveCell)
    }

    /// Resolves a deployment id to its live info cell and decoded payload,
    /// whoever holds it. Suits the reading operations that only reference
    /// the cell as a dep.
    pub(crate) fn info_context(&self, inscription_id: &H256) -> Result<InfoContext, Error> {
        let info_type = script::info_type_script(self.network, inscription_id);
        let query = CellQuery::by_type(info_type.clone());
        self.resolve_info(info_type, &query)
    }

    /// Like [`Self::info_context`] but restricted to the builder's own lock.
    /// The mutating operations spend the cell and must be able to sign for
    /// it; a deployment held under a foreign lock resolves to nothing.
    pub(crate) fn owned_info_context(&self, inscription_id: &H256) -> Result<InfoContext, Error> {
        let info_type = script::info_type_script(self.network, inscription_id);
        let query = CellQuery::by_lock_and_type(self.lock.clone(), info_type.clone());
        self.resolve_info(info_type, &query)
    }

    fn resolve_info(
        &self,
        info_type: packed::Script,
        query: &CellQuery,
    ) -> Result<InfoContext, Error> {
        let mut cells = self.source.live_cells(query)?;
        if cells.is_empty() {
            return Err(Error::MissingInfoCell);
        }
        let cell = cells.swap_remove(0);
        let info = InscriptionInfo::from_slice(&cell.output_data)?;
        Ok(InfoContext {
            cell,
            info,
            info_type,
        })
    }

    /// The owner's token cells of the given type.
    pub(crate) fn owned_token_cells(
        &self,
        token_type: &packed::Script,
    ) -> Result<Vec<LiveCell>, Error> {
        let cells = self.source.live_cells(&CellQuery::by_lock_and_type(
            self.lock.clone(),
            token_type.clone(),
        ))?;
        require_cells(cells, Error::NoTokenCells)
    }

    pub(crate) fn min_change(&self) -> Result<Capacity, Error> {
        min_change_capacity(&self.lock)
    }

    /// Zero-capacity change stand-in used only for fee sizing.
    pub(crate) fn change_placeholder(&self) -> packed::CellOutput {
        packed::CellOutput::new_builder()
            .lock(self.lock.clone())
            .build()
    }

    /// The change output for `leftover`: none when exactly zero, an error
    /// when positive but below the minimum, a bare cell otherwise.
    pub(crate) fn change_output(
        &self,
        leftover: Capacity,
    ) -> Result<Option<packed::CellOutput>, Error> {
        if leftover == Capacity::zero() {
            return Ok(None);
        }
        let min_change = self.min_change()?;
        if leftover < min_change {
            return Err(Error::InsufficientCapacity {
                required: min_change.as_u64(),
                available: leftover.as_u64(),
            });
        }
        Ok(Some(
            packed::CellOutput::new_builder()
                .capacity(leftover.pack())
                .lock(self.lock.clone())
                .build(),
        ))
    }

    pub(crate) fn resolve_unlock(
        &self,
    ) -> Result<(packed::WitnessArgs, Option<packed::CellDep>), Error> {
        resolve_unlock(self.unlock, self.source, self.network, &self.lock)
    }

    /// Final dep list: the delegate registry dep first when present, then
    /// the operation's own deps, then caller extras.
    pub(crate) fn assemble_deps(
        &self,
        base: Vec<packed::CellDep>,
        delegate: Option<packed::CellDep>,
    ) -> Vec<packed::CellDep> {
        let mut deps = Vec::with_capacity(base.len() + self.extra_cell_deps.len() + 1);
        deps.extend(delegate);
        deps.extend(base);
        deps.extend(self.extra_cell_deps.iter().cloned());
        deps
    }

    /// Covers `required` from `total_in`, pulling bare cells when the fixed
    /// inputs fall short or would strand a sub-minimum leftover. The fee is
    /// already folded into `required` and is not passed down again, so the
    /// second selection round never double-counts it.
    pub(crate) fn top_up(
        &self,
        total_in: Capacity,
        required: Capacity,
    ) -> Result<(Vec<packed::CellInput>, Capacity), Error> {
        let min_change = self.min_change()?;
        if total_in >= required {
            let leftover = total_in.safe_sub(required)?;
            if leftover == Capacity::zero() || leftover >= min_change {
                return Ok((Vec::new(), total_in));
            }
        }
        let shortfall = if total_in < required {
            required.safe_sub(total_in)?
        } else {
            required.safe_add(min_change)?.safe_sub(total_in)?
        };
        let cells = self.fee_cells()?;
        let collected = collect_inputs(&cells, shortfall, min_change, Capacity::zero())?;
        debug!(
            "topped up {} inputs carrying {} for a shortfall of {}",
            collected.inputs.len(),
            collected.capacity,
            shortfall
        );
        Ok((collected.inputs, total_in.safe_add(collected.capacity)?))
    }
}

/// A live cell referenced read-only, e.g. the info cell a mint validates
/// against.
pub(crate) fn cell_as_dep(cell: &LiveCell) -> packed::CellDep {
    packed::CellDep::new_builder()
        .out_point(cell.out_point.clone())
        .dep_type(DepType::Code.into())
        .build()
}
