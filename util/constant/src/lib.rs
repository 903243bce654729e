//! Per-network deployment constants for the inscription protocol.
//!
//! Code hashes identify the on-chain validator scripts; dep out-points name
//! the cells carrying their binaries. The inscription info type, the token
//! code per kind, the rebase code and the delegate (CoTA) registry type are
//! distinct deployments on mainnet and testnet.

use ckb_types::{
    core::{DepType, ScriptHashType},
    h256, packed,
    prelude::*,
    H256,
};

/// The CKB network transactions are assembled for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Network {
    /// Mirana, the CKB mainnet.
    Mainnet,
    /// Pudge, the CKB testnet.
    Testnet,
}

/// The token machinery backing a deployment.
///
/// The two kinds are structurally identical; they differ only in the code
/// script minted cells carry and the dep cell that ships it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// Tokens backed by the xUDT script.
    Xudt,
    /// Tokens backed by the xins script.
    Xins,
}

const INSCRIPTION_INFO_CODE_HASH_MAINNET: H256 =
    h256!("0x5daf07af1d1e1ca5b7e9d1cea5c6a687e3aa8b4ed9cbb2b26e6b732b903b2ae2");
const INSCRIPTION_INFO_CODE_HASH_TESTNET: H256 =
    h256!("0x50fdea2d0030a8d0b3d69f883b471cab2a29cae6f01923f19cecac0f27fdaaa6");

const INSCRIPTION_CODE_HASH_MAINNET: H256 =
    h256!("0x7490970e6af9b9fe63fc19fc523a12b2ec69027e6ae484edffb97334f74e8c97");
const INSCRIPTION_CODE_HASH_TESTNET: H256 =
    h256!("0x3a241ceceede72a5f55c8fb985652690f09a517d6c9070f0df0d3572fa03fb70");

const XUDT_CODE_HASH_MAINNET: H256 =
    h256!("0x50bd8d6680b8b9cf98b73f3c08faf8b2a21914311954118ad6609be6e78a1b95");
const XUDT_CODE_HASH_TESTNET: H256 =
    h256!("0x25c29dc317811a6f6f3985a7a9ebc4838bd388d19d0feeecf0bcd60f6c0975bb");

const XINS_CODE_HASH_MAINNET: H256 =
    h256!("0x9d65b614b0c76e2defc33d70bdf6ea0a04b71258b6b02eba64ad3a4f0b2b5785");
const XINS_CODE_HASH_TESTNET: H256 =
    h256!("0xda8fbf9b8497c0a34fad89377026e51128817c60167a2b7673b27c1a3f2a331f");

const REBASE_CODE_HASH_MAINNET: H256 =
    h256!("0xda9a124b4a8e9d5fdbbfe27d6a3b646c0d0a5d1c392b0851b0b959b0bb5bd2b3");
const REBASE_CODE_HASH_TESTNET: H256 =
    h256!("0x93043b66bb20797caad0deacaadbada5e58f0893d770ecdddb8806aff8877e29");

const COTA_CODE_HASH_MAINNET: H256 =
    h256!("0x1122a4fb54697cf2e6e3a96c9d80fd398a936559b90954c6e88eb7ba0cf652df");
const COTA_CODE_HASH_TESTNET: H256 =
    h256!("0x89cd8003a0eaf8e65e0c31525b7d1d5c1becefd2ea75bb4cff87810ae37764d8");

const INSCRIPTION_INFO_DEP_TX_MAINNET: H256 =
    h256!("0xd8f9afaf5cdb8b8ebc6a82a7e52d3c6d6f6408e92c5e88de600d1ba6b2ad4a9e");
const INSCRIPTION_INFO_DEP_TX_TESTNET: H256 =
    h256!("0x8bb0413cff3827d4f43e026596e830b09a1efc101cd9d0fa843dd474ff621569");

const INSCRIPTION_DEP_TX_MAINNET: H256 =
    h256!("0xf9e4a0f1bbd76a17ee0d1a409d43601c9f4a7bf5746f014e2ebd8c4b1b3a71ff");
const INSCRIPTION_DEP_TX_TESTNET: H256 =
    h256!("0x2b42320f8e015bcf0fbb0b5d4bbeab0b47e28d5c1b9fc7f8f24a9fb27171d1af");

const XUDT_DEP_TX_MAINNET: H256 =
    h256!("0xc07844ce21b38e4b071dd0e1ee3b0e27afd8d7532491327f39b786343f558ab7");
const XUDT_DEP_TX_TESTNET: H256 =
    h256!("0xbf6fb538763efec2a70a6a3dcb7242787087e1030c4e7d86585bc63a9d337f5f");

const XINS_DEP_TX_MAINNET: H256 =
    h256!("0x7b1ad2a0c98b195b30a3f5f01ac68d2a33ea4b27fa4ca2b6b388b2f6d70e1da9");
const XINS_DEP_TX_TESTNET: H256 =
    h256!("0x9101c1d106e660b6b0a87d10f4c35a0a3dd612ebaa27d394eb0be2a7c1367bd2");

const REBASE_DEP_TX_MAINNET: H256 =
    h256!("0x28edf01efd64b7a8bb3b9ac0bd8d3b2f96dcb93e0a7cf419a254c439b2bd1c33");
const REBASE_DEP_TX_TESTNET: H256 =
    h256!("0x0a6b28fca5bea5e2b3d94e3ca5b2b40d1a1e4f7f99f1a26d1f9ad64f6a343c73");

fn code_script(code_hash: &H256) -> packed::Script {
    packed::Script::new_builder()
        .code_hash(code_hash.pack())
        .hash_type(ScriptHashType::Type.into())
        .build()
}

fn code_dep(tx_hash: &H256, index: u32) -> packed::CellDep {
    packed::CellDep::new_builder()
        .out_point(packed::OutPoint::new(tx_hash.pack(), index))
        .dep_type(DepType::Code.into())
        .build()
}

/// Type script of inscription info cells, with empty args; the deployment id
/// goes into the args.
pub fn inscription_info_script(network: Network) -> packed::Script {
    match network {
        Network::Mainnet => code_script(&INSCRIPTION_INFO_CODE_HASH_MAINNET),
        Network::Testnet => code_script(&INSCRIPTION_INFO_CODE_HASH_TESTNET),
    }
}

/// Dep cell carrying the inscription info validator.
pub fn inscription_info_dep(network: Network) -> packed::CellDep {
    match network {
        Network::Mainnet => code_dep(&INSCRIPTION_INFO_DEP_TX_MAINNET, 0),
        Network::Testnet => code_dep(&INSCRIPTION_INFO_DEP_TX_TESTNET, 0),
    }
}

/// Dep cell carrying the inscription mint validator.
pub fn inscription_dep(network: Network) -> packed::CellDep {
    match network {
        Network::Mainnet => code_dep(&INSCRIPTION_DEP_TX_MAINNET, 0),
        Network::Testnet => code_dep(&INSCRIPTION_DEP_TX_TESTNET, 0),
    }
}

/// Code script of rebased token cells, with empty args.
pub fn rebased_code_script(network: Network) -> packed::Script {
    match network {
        Network::Mainnet => code_script(&REBASE_CODE_HASH_MAINNET),
        Network::Testnet => code_script(&REBASE_CODE_HASH_TESTNET),
    }
}

/// Dep cell carrying the rebase validator.
pub fn rebase_dep(network: Network) -> packed::CellDep {
    match network {
        Network::Mainnet => code_dep(&REBASE_DEP_TX_MAINNET, 0),
        Network::Testnet => code_dep(&REBASE_DEP_TX_TESTNET, 0),
    }
}

/// Type script of the delegate (CoTA) registry cells referenced by sub-key
/// unlocks, with empty args.
pub fn delegate_registry_script(network: Network) -> packed::Script {
    match network {
        Network::Mainnet => code_script(&COTA_CODE_HASH_MAINNET),
        Network::Testnet => code_script(&COTA_CODE_HASH_TESTNET),
    }
}

impl TokenKind {
    /// Code script minted token cells carry, with empty args.
    pub fn code_script(self, network: Network) -> packed::Script {
        match (self, network) {
            (TokenKind::Xudt, Network::Mainnet) => code_script(&XUDT_CODE_HASH_MAINNET),
            (TokenKind::Xudt, Network::Testnet) => code_script(&XUDT_CODE_HASH_TESTNET),
            (TokenKind::Xins, Network::Mainnet) => code_script(&XINS_CODE_HASH_MAINNET),
            (TokenKind::Xins, Network::Testnet) => code_script(&XINS_CODE_HASH_TESTNET),
        }
    }

    /// Dep cell carrying the kind's token validator.
    pub fn cell_dep(self, network: Network) -> packed::CellDep {
        match (self, network) {
            (TokenKind::Xudt, Network::Mainnet) => code_dep(&XUDT_DEP_TX_MAINNET, 0),
            (TokenKind::Xudt, Network::Testnet) => code_dep(&XUDT_DEP_TX_TESTNET, 0),
            (TokenKind::Xins, Network::Mainnet) => code_dep(&XINS_DEP_TX_MAINNET, 0),
            (TokenKind::Xins, Network::Testnet) => code_dep(&XINS_DEP_TX_TESTNET, 0),
        }
    }
}
