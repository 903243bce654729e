//! Deterministic type-script identities for inscription cells.
//!
//! Every script in the protocol is content-derived: the deployment id from
//! the deploy transaction's first input, the token type from the info type
//! hash, the rebased token type from the pre-rebase hash and the observed
//! supply. Nothing here is random and nothing talks to the network.

use ckb_hash::new_blake2b;
use ckb_inscription_constant::{inscription_info_script, rebased_code_script, Network, TokenKind};
use ckb_types::{bytes::Bytes, packed, prelude::*, H256};

/// The deployment id: blake2b-256 of the serialized first input followed by
/// the u64 LE index of the info output. Unique as long as the first input is,
/// which the ledger guarantees.
pub fn inscription_id(first_input: &packed::CellInput, output_index: u64) -> H256 {
    let mut blake2b = new_blake2b();
    blake2b.update(first_input.as_slice());
    blake2b.update(&output_index.to_le_bytes());
    let mut ret = [0u8; 32];
    blake2b.finalize(&mut ret);
    H256(ret)
}

/// Type script of a deployment's info cell, args = the deployment id.
pub fn info_type_script(network: Network, inscription_id: &H256) -> packed::Script {
    inscription_info_script(network)
        .as_builder()
        .args(Bytes::from(inscription_id.as_bytes().to_vec()).pack())
        .build()
}

/// Type script of a deployment's pre-rebase token cells, args = the info
/// type script hash.
pub fn token_type_script(
    kind: TokenKind,
    network: Network,
    info_type: &packed::Script,
) -> packed::Script {
    let args = info_type.calc_script_hash().as_bytes();
    kind.code_script(network)
        .as_builder()
        .args(args.pack())
        .build()
}

/// Type script of a deployment's rebased token cells. The args digest binds
/// the info type hash, the pre-rebase token type hash and the observed
/// supply, so each distinct supply value yields a distinct identity.
pub fn rebased_token_type(
    network: Network,
    info_type: &packed::Script,
    pre_token_hash: &packed::Byte32,
    actual_supply: u128,
) -> packed::Script {
    let mut blake2b = new_blake2b();
    blake2b.update(info_type.calc_script_hash().as_slice());
    blake2b.update(pre_token_hash.as_slice());
    blake2b.update(&actual_supply.to_le_bytes());
    let mut args = [0u8; 32];
    blake2b.finalize(&mut args);
    rebased_code_script(network)
        .as_builder()
        .args(Bytes::from(args.to_vec()).pack())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_input() -> packed::CellInput {
        packed::CellInput::new(packed::OutPoint::new(packed::Byte32::zero(), 7), 0)
    }

    #[test]
    fn inscription_id_is_deterministic_and_index_sensitive() {
        let input = first_input();
        assert_eq!(inscription_id(&input, 0), inscription_id(&input, 0));
        assert_ne!(inscription_id(&input, 0), inscription_id(&input, 1));
    }

    #[test]
    fn derived_scripts_chain_through_their_hashes() {
        let id = inscription_id(&first_input(), 0);
        let info_type = info_type_script(Network::Testnet, &id);
        assert_eq!(info_type.args().raw_data(), id.as_bytes());

        let token = token_type_script(TokenKind::Xudt, Network::Testnet, &info_type);
        assert_eq!(
            token.args().raw_data(),
            info_type.calc_script_hash().as_bytes()
        );
    }

    #[test]
    fn rebased_identity_varies_with_observed_supply() {
        let id = inscription_id(&first_input(), 0);
        let info_type = info_type_script(Network::Testnet, &id);
        let pre_hash = token_type_script(TokenKind::Xudt, Network::Testnet, &info_type)
            .calc_script_hash();
        let a = rebased_token_type(Network::Testnet, &info_type, &pre_hash, 1_000);
        let b = rebased_token_type(Network::Testnet, &info_type, &pre_hash, 1_001);
        assert_ne!(a.as_slice(), b.as_slice());
        assert_eq!(
            a.as_slice(),
            rebased_token_type(Network::Testnet, &info_type, &pre_hash, 1_000).as_slice()
        );
    }
}
