//! Essential types shared by the inscription transaction engine.
//!
//! Nothing in this crate touches the network; it is the pure data model:
//! live cells, the inscription info payload carried in info cells, and the
//! error taxonomy every fallible path in the engine reports through.

mod cell;
mod error;
mod info;

pub use cell::{encode_token_amount, LiveCell};
pub use error::Error;
pub use info::{unit_factor, InscriptionInfo, MintStatus};
