//! Witness assembly and the sub-key unlock path.

use ckb_inscription_collector::{CellQuery, CellSource};
use ckb_inscription_constant::{delegate_registry_script, Network};
use ckb_inscription_types::Error;
use ckb_types::{bytes::Bytes, core::DepType, packed, prelude::*, H160};

/// External service producing delegated unlock proofs for sub-keys.
pub trait DelegatedProofService {
    /// A membership proof unlocking `lock` with the sub-key identified by
    /// `pubkey_hash` and `alg_index`.
    fn unlock_proof(
        &self,
        lock: &packed::Script,
        pubkey_hash: &H160,
        alg_index: u16,
    ) -> Result<Bytes, Error>;
}

/// How the owner lock will be unlocked once the draft is signed.
#[derive(Clone, Copy)]
pub enum UnlockContext<'a> {
    /// A direct signature, filled in by the external signer.
    MainKey,
    /// A delegated proof fetched from the proof service. Requires a live
    /// delegate registry cell owned by the same lock.
    SubKey {
        service: &'a dyn DelegatedProofService,
        pubkey_hash: &'a H160,
        alg_index: u16,
    },
}

/// The witness column of a draft, assembled once with named slots instead of
/// patched in place.
///
/// Slot zero is the lock proof: an empty `WitnessArgs` placeholder for the
/// signer, or one carrying the delegated proof in `output_type`. Slot one is
/// the optional operation annotation an on-chain validator reads back.
pub struct WitnessSet {
    lock_proof: packed::WitnessArgs,
    annotation: Option<packed::Bytes>,
    input_count: usize,
}

impl WitnessSet {
    pub fn new(lock_proof: packed::WitnessArgs) -> Self {
        WitnessSet {
            lock_proof,
            annotation: None,
            input_count: 1,
        }
    }

    /// Sets the annotation witness at slot one: a serialized `WitnessArgs`
    /// carrying `payload` in `output_type`, the shape on-chain validators
    /// parse the slot as.
    pub fn annotate(mut self, payload: Bytes) -> Self {
        let args = packed::WitnessArgs::new_builder()
            .output_type(Some(payload).pack())
            .build();
        self.annotation = Some(args.as_bytes().pack());
        self
    }

    /// Reserves slot one with an empty witness, keeping later slots aligned.
    pub fn annotate_empty(mut self) -> Self {
        self.annotation = Some(packed::Bytes::default());
        self
    }

    /// Pads the set with empty witnesses up to `input_count` entries.
    pub fn pad_to(mut self, input_count: usize) -> Self {
        self.input_count = input_count;
        self
    }

    pub fn into_witnesses(self) -> Vec<packed::Bytes> {
        let mut witnesses = vec![self.lock_proof.as_bytes().pack()];
        if let Some(annotation) = self.annotation {
            witnesses.push(annotation);
        }
        while witnesses.len() < self.input_count {
            witnesses.push(packed::Bytes::default());
        }
        witnesses
    }
}

/// Resolves the unlock context into the slot-zero witness and, for sub-keys,
/// the delegate registry dep to prepend to `cell_deps`.
pub(crate) fn resolve_unlock<S: CellSource>(
    unlock: UnlockContext<'_>,
    source: &S,
    network: Network,
    lock: &packed::Script,
) -> Result<(packed::WitnessArgs, Option<packed::CellDep>), Error> {
    match unlock {
        UnlockContext::MainKey => Ok((packed::WitnessArgs::default(), None)),
        UnlockContext::SubKey {
            service,
            pubkey_hash,
            alg_index,
        } => {
            let registry = source.live_cells(&CellQuery::by_lock_and_type(
                lock.clone(),
                delegate_registry_script(network),
            ))?;
            let registry_cell = registry.first().ok_or(Error::NoDelegateCell)?;
            let proof = service.unlock_proof(lock, pubkey_hash, alg_index)?;
            let witness = packed::WitnessArgs::new_builder()
                .output_type(Some(proof).pack())
                .build();
            let dep = packed::CellDep::new_builder()
                .out_point(registry_cell.out_point.clone())
                .dep_type(DepType::Code.into())
                .build();
            Ok((witness, Some(dep)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn witnesses_keep_their_slot_order() {
        let set = WitnessSet::new(packed::WitnessArgs::default())
            .annotate(Bytes::from_static(b"annotation"))
            .pad_to(4);
        let witnesses = set.into_witnesses();
        assert_eq!(witnesses.len(), 4);
        assert_eq!(
            witnesses[0].raw_data(),
            packed::WitnessArgs::default().as_bytes()
        );
        let annotation = packed::WitnessArgs::from_slice(&witnesses[1].raw_data()).unwrap();
        assert_eq!(
            annotation.output_type().to_opt().unwrap().raw_data(),
            Bytes::from_static(b"annotation")
        );
        assert!(witnesses[2].raw_data().is_empty());
    }

    #[test]
    fn empty_annotation_reserves_its_slot() {
        let witnesses = WitnessSet::new(packed::WitnessArgs::default())
            .annotate_empty()
            .into_witnesses();
        assert_eq!(witnesses.len(), 2);
        assert!(witnesses[1].raw_data().is_empty());
    }

    #[test]
    fn padding_never_shrinks_the_set() {
        let witnesses = WitnessSet::new(packed::WitnessArgs::default())
            .annotate_empty()
            .pad_to(1)
            .into_witnesses();
        assert_eq!(witnesses.len(), 2);
    }
}
