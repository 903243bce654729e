use ckb_inscription_collector::{collect_all_token_inputs, CellSource};
use ckb_inscription_types::{encode_token_amount, Error};
use ckb_logger::debug;
use ckb_types::{
    core::{Capacity, TransactionBuilder, TransactionView},
    packed,
    prelude::*,
    H256,
};

use crate::capacity::token_cell_capacity;
use crate::fee::estimate_fee;
use crate::script;
use crate::witness::WitnessSet;

use super::TxAssembler;

/// A merge draft: every owned token cell consolidated into one.
pub struct MergeOutcome {
    pub tx: TransactionView,
    /// Token units carried by the consolidated cell, the exact sum of the
    /// consumed cells.
    pub amount: u128,
    /// Capacity released back to the owner as change.
    pub freed_capacity: Capacity,
    pub fee: Capacity,
}

impl<'a, S: CellSource> TxAssembler<'a, S> {
    /// Builds a merge of all the owner's token cells of a deployment.
    pub fn merge(&self, inscription_id: &H256) -> Result<MergeOutcome, Error> {
        let info_type = script::info_type_script(self.network, inscription_id);
        let token_type = script::token_type_script(self.kind, self.network, &info_type);
        let cells = self.owned_token_cells(&token_type)?;
        let collected = collect_all_token_inputs(&cells)?;

        let merged_capacity = token_cell_capacity(&self.lock, &token_type)?;
        let merged_output = packed::CellOutput::new_builder()
            .capacity(merged_capacity.pack())
            .lock(self.lock.clone())
            .type_(Some(token_type).pack())
            .build();
        let merged_data = encode_token_amount(collected.amount);

        let (lock_proof, delegate_dep) = self.resolve_unlock()?;
        let cell_deps =
            self.assemble_deps(vec![self.kind.cell_dep(self.network)], delegate_dep);
        let witnesses = WitnessSet::new(lock_proof).into_witnesses();

        let provisional = TransactionBuilder::default()
            .inputs(collected.inputs.clone())
            .output(self.change_placeholder())
            .output_data(Default::default())
            .output(merged_output.clone())
            .output_data(merged_data.pack())
            .cell_deps(cell_deps.clone())
            .witnesses(witnesses.clone())
            .build();
        let fee = estimate_fee(&provisional, self.fee_rate);

        let required = merged_capacity.safe_add(fee)?;
        let (extra_inputs, total_in) = self.top_up(collected.capacity, required)?;
        let freed_capacity = total_in.safe_sub(required)?;
        let change = self.change_output(freed_capacity)?;

        let mut builder = TransactionBuilder::default()
            .inputs(collected.inputs)
            .inputs(extra_inputs);
        if let Some(change) = change {
            builder = builder.output(change).output_data(Default::default());
        }
        let tx = builder
            .output(merged_output)
            .output_data(merged_data.pack())
            .cell_deps(cell_deps)
            .witnesses(witnesses)
            .build();
        debug!(
            "merged {} cells of {:#x} into {} units, freeing {}",
            cells.len(),
            inscription_id,
            collected.amount,
            freed_capacity
        );
        Ok(MergeOutcome {
            tx,
            amount: collected.amount,
            freed_capacity,
            fee,
        })
    }
}
