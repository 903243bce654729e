use ckb_inscription_collector::{collect_all_token_inputs, CellSource};
use ckb_inscription_types::Error;
use ckb_logger::debug;
use ckb_types::{
    core::{Capacity, TransactionBuilder, TransactionView},
    prelude::*,
    H256,
};

use crate::fee::estimate_fee;
use crate::script;
use crate::witness::WitnessSet;

use super::TxAssembler;

/// A destroy draft: the owner's token cells burned, capacity reclaimed.
#[derive(Debug)]
pub struct DestroyOutcome {
    pub tx: TransactionView,
    /// Token units removed from circulation.
    pub destroyed_amount: u128,
    /// How many token cells were consumed.
    pub cell_count: usize,
    /// Capacity returned to the owner after the fee.
    pub freed_capacity: Capacity,
    pub fee: Capacity,
}

impl<'a, S: CellSource> TxAssembler<'a, S> {
    /// Builds a destroy: consumes the owner's token cells of the deployment
    /// and emits only change, burning the tokens. `cell_count` caps how many
    /// cells one transaction burns; `None` burns them all.
    pub fn destroy(
        &self,
        inscription_id: &H256,
        cell_count: Option<usize>,
    ) -> Result<DestroyOutcome, Error> {
        let info_type = script::info_type_script(self.network, inscription_id);
        let token_type = script::token_type_script(self.kind, self.network, &info_type);
        let mut cells = self.owned_token_cells(&token_type)?;
        if let Some(limit) = cell_count {
            if limit == 0 {
                return Err(Error::NoTokenCells);
            }
            cells.truncate(limit);
        }
        let collected = collect_all_token_inputs(&cells)?;

        let (lock_proof, delegate_dep) = self.resolve_unlock()?;
        let cell_deps =
            self.assemble_deps(vec![self.kind.cell_dep(self.network)], delegate_dep);
        let witnesses = WitnessSet::new(lock_proof).into_witnesses();

        let provisional = TransactionBuilder::default()
            .inputs(collected.inputs.clone())
            .output(self.change_placeholder())
            .output_data(Default::default())
            .cell_deps(cell_deps.clone())
            .witnesses(witnesses.clone())
            .build();
        let fee = estimate_fee(&provisional, self.fee_rate);

        let (extra_inputs, total_in) = self.top_up(collected.capacity, fee)?;
        let freed_capacity = total_in.safe_sub(fee)?;
        let change = self.change_output(freed_capacity)?;

        let mut builder = TransactionBuilder::default()
            .inputs(collected.inputs)
            .inputs(extra_inputs);
        if let Some(change) = change {
            builder = builder.output(change).output_data(Default::default());
        }
        let tx = builder.cell_deps(cell_deps).witnesses(witnesses).build();
        debug!(
            "destroyed {} units of {:#x} across {} cells, freeing {}",
            collected.amount,
            inscription_id,
            cells.len(),
            freed_capacity
        );
        Ok(DestroyOutcome {
            tx,
            destroyed_amount: collected.amount,
            cell_count: cells.len(),
            freed_capacity,
            fee,
        })
    }
}
