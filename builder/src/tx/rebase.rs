use ckb_inscription_collector::{collect_all_token_inputs, CellSource};
use ckb_inscription_constant::rebase_dep;
use ckb_inscription_types::{encode_token_amount, Error};
use ckb_logger::debug;
use ckb_types::{
    bytes::Bytes,
    core::{Capacity, TransactionBuilder, TransactionView},
    packed,
    prelude::*,
    H256,
};

use crate::capacity::token_cell_capacity;
use crate::fee::estimate_fee;
use crate::script;
use crate::supply::rebase_amount;
use crate::witness::WitnessSet;

use super::{cell_as_dep, TxAssembler};

/// A rebase-mint draft: the owner's pre-rebase cells converted in one go.
#[derive(Debug)]
pub struct RebaseMintOutcome {
    pub tx: TransactionView,
    pub rebased_type: packed::Script,
    /// Token units the rebased cell carries.
    pub amount: u128,
    pub fee: Capacity,
}

impl<'a, S: CellSource> TxAssembler<'a, S> {
    /// Builds a rebase-mint: consumes the owner's pre-rebase token cells and
    /// emits one rebased cell scaled by the observed supply. `cell_count`
    /// caps how many cells one transaction converts, so a large holding can
    /// be worked through in batches; `None` converts them all.
    ///
    /// `actual_supply` must be the supply the rebase-info stamp was derived
    /// from (see [`TxAssembler::actual_supply`]); a mismatching value would
    /// derive a different identity than the stamped one and is rejected.
    pub fn rebase_mint(
        &self,
        inscription_id: &H256,
        actual_supply: u128,
        cell_count: Option<usize>,
    ) -> Result<RebaseMintOutcome, Error> {
        let ctx = self.info_context(inscription_id)?;
        let token_type = script::token_type_script(self.kind, self.network, &ctx.info_type);
        let pre_token_hash = token_type.calc_script_hash();
        let rebased_type =
            script::rebased_token_type(self.network, &ctx.info_type, &pre_token_hash, actual_supply);
        let stamped = ctx
            .info
            .rebase_hash
            .as_ref()
            .ok_or(Error::InvalidStateTransition("deployment is not rebased"))?;
        let rebase_hash: H256 = rebased_type.calc_script_hash().unpack();
        if &rebase_hash != stamped {
            return Err(Error::InvalidStateTransition(
                "supply does not match the stamped rebase hash",
            ));
        }

        let mut cells = self.owned_token_cells(&token_type)?;
        if let Some(limit) = cell_count {
            if limit == 0 {
                return Err(Error::NoTokenCells);
            }
            cells.truncate(limit);
        }
        let collected = collect_all_token_inputs(&cells)?;
        let amount = rebase_amount(
            collected.amount,
            ctx.info.max_supply,
            ctx.info.decimal,
            actual_supply,
        )?;

        let rebased_capacity = token_cell_capacity(&self.lock, &rebased_type)?;
        let rebased_output = packed::CellOutput::new_builder()
            .capacity(rebased_capacity.pack())
            .lock(self.lock.clone())
            .type_(Some(rebased_type.clone()).pack())
            .build();
        let rebased_data = encode_token_amount(amount);

        let (lock_proof, delegate_dep) = self.resolve_unlock()?;
        let cell_deps = self.assemble_deps(
            vec![
                rebase_dep(self.network),
                self.kind.cell_dep(self.network),
                cell_as_dep(&ctx.cell),
            ],
            delegate_dep,
        );
        let mut annotation = Vec::with_capacity(48);
        annotation.extend_from_slice(pre_token_hash.as_slice());
        annotation.extend_from_slice(&actual_supply.to_le_bytes());
        let witnesses = WitnessSet::new(lock_proof)
            .annotate(Bytes::from(annotation))
            .into_witnesses();

        let provisional = TransactionBuilder::default()
            .inputs(collected.inputs.clone())
            .output(self.change_placeholder())
            .output_data(Default::default())
            .output(rebased_output.clone())
            .output_data(rebased_data.pack())
            .cell_deps(cell_deps.clone())
            .witnesses(witnesses.clone())
            .build();
        let fee = estimate_fee(&provisional, self.fee_rate);

        let required = rebased_capacity.safe_add(fee)?;
        let (extra_inputs, total_in) = self.top_up(collected.capacity, required)?;
        let leftover = total_in.safe_sub(required)?;
        let change = self.change_output(leftover)?;

        let mut builder = TransactionBuilder::default()
            .inputs(collected.inputs)
            .inputs(extra_inputs);
        if let Some(change) = change {
            builder = builder.output(change).output_data(Default::default());
        }
        let tx = builder
            .output(rebased_output)
            .output_data(rebased_data.pack())
            .cell_deps(cell_deps)
            .witnesses(witnesses)
            .build();
        debug!(
            "rebased {} pre-units into {} units of {:#x} at fee {}",
            collected.amount, amount, inscription_id, fee
        );
        Ok(RebaseMintOutcome {
            tx,
            rebased_type,
            amount,
            fee,
        })
    }
}
