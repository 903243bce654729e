//! The two in-place info cell mutations: close and rebase-info.
//!
//! Both consume the live info cell and re-emit it with the same identity and
//! capacity but new data; the capacity reserve provisioned at deploy time
//! guarantees the grown rebase payload still fits.

use ckb_inscription_collector::{require_cells, CellQuery, CellSource};
use ckb_inscription_constant::inscription_info_dep;
use ckb_inscription_types::{Error, LiveCell};
use ckb_logger::debug;
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, TransactionBuilder, TransactionView},
    packed,
    prelude::*,
    H256,
};

use crate::fee::estimate_fee;
use crate::script;
use crate::supply::total_supply;
use crate::witness::WitnessSet;

use super::TxAssembler;

/// A close draft.
#[derive(Debug)]
pub struct CloseOutcome {
    pub tx: TransactionView,
    pub fee: Capacity,
}

/// A rebase-info draft and the rebased identity it stamped.
#[derive(Debug)]
pub struct RebaseInfoOutcome {
    pub tx: TransactionView,
    /// Type script rebased token cells will carry.
    pub rebased_type: packed::Script,
    /// Its hash, now embedded in the info payload.
    pub rebase_hash: H256,
    /// The observed supply the rebased identity was derived from.
    pub actual_supply: u128,
    pub fee: Capacity,
}

impl<'a, S: CellSource> TxAssembler<'a, S> {
    /// Builds the close: flips the deployment's mint status to Closed.
    pub fn close(&self, inscription_id: &H256) -> Result<CloseOutcome, Error> {
        let ctx = self.owned_info_context(inscription_id)?;
        let mut info = ctx.info;
        info.set_closed()?;
        let (tx, fee) = self.rewrite_info(&ctx.cell, info.to_bytes()?)?;
        debug!("closed {:#x} at fee {}", inscription_id, fee);
        Ok(CloseOutcome { tx, fee })
    }

    /// Builds the rebase-info: observes the actual minted supply, derives the
    /// rebased token identity from it and stamps its hash into the payload.
    pub fn rebase_info(&self, inscription_id: &H256) -> Result<RebaseInfoOutcome, Error> {
        let ctx = self.owned_info_context(inscription_id)?;
        let mut info = ctx.info;

        let token_type = script::token_type_script(self.kind, self.network, &ctx.info_type);
        let pre_token_hash = token_type.calc_script_hash();
        let token_cells = require_cells(
            self.source.live_cells(&CellQuery::by_type(token_type))?,
            Error::NoTokenCells,
        )?;
        let actual_supply = total_supply(&token_cells)?;

        let rebased_type =
            script::rebased_token_type(self.network, &ctx.info_type, &pre_token_hash, actual_supply);
        let rebase_hash: H256 = rebased_type.calc_script_hash().unpack();
        info.set_rebased(rebase_hash.clone())?;

        let (tx, fee) = self.rewrite_info(&ctx.cell, info.to_bytes()?)?;
        debug!(
            "stamped rebase hash {:#x} over supply {} at fee {}",
            rebase_hash, actual_supply, fee
        );
        Ok(RebaseInfoOutcome {
            tx,
            rebased_type,
            rebase_hash,
            actual_supply,
            fee,
        })
    }

    /// Shared body of the info mutations: consume the cell, re-emit it with
    /// `data`, pay the fee from bare cells.
    fn rewrite_info(
        &self,
        cell: &LiveCell,
        data: Bytes,
    ) -> Result<(TransactionView, Capacity), Error> {
        let info_capacity = cell.capacity();
        let (lock_proof, delegate_dep) = self.resolve_unlock()?;
        let cell_deps =
            self.assemble_deps(vec![inscription_info_dep(self.network)], delegate_dep);
        let witnesses = WitnessSet::new(lock_proof).into_witnesses();

        let provisional = TransactionBuilder::default()
            .input(cell.input())
            .output(cell.output.clone())
            .output_data(data.pack())
            .output(self.change_placeholder())
            .output_data(Default::default())
            .cell_deps(cell_deps.clone())
            .witnesses(witnesses.clone())
            .build();
        let fee = estimate_fee(&provisional, self.fee_rate);

        let required = info_capacity.safe_add(fee)?;
        let (extra_inputs, total_in) = self.top_up(info_capacity, required)?;
        let leftover = total_in.safe_sub(required)?;
        let change = self.change_output(leftover)?;

        let mut builder = TransactionBuilder::default()
            .input(cell.input())
            .inputs(extra_inputs)
            .output(cell.output.clone())
            .output_data(data.pack());
        if let Some(change) = change {
            builder = builder.output(change).output_data(Default::default());
        }
        Ok((
            builder.cell_deps(cell_deps).witnesses(witnesses).build(),
            fee,
        ))
    }
}
