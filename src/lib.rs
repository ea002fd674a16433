mod attack;
mod cbc;
mod config;
mod corpus;
mod error;
mod oracle;
mod pkcs7;

pub const BLOCK_SIZE: usize = 16;
pub type Block = [u8; BLOCK_SIZE];

pub use attack::block::recover_block;
pub use attack::byte::{recover_byte, RecoveredByte};
pub use attack::message::{recover_plaintext, recover_plaintext_with};
pub use attack::padding_length::detect_padding_length;
pub use cbc::Aes128Cbc;
pub use config::{RecoveryConfig, Schedule};
pub use corpus::{Challenge, Sample, PLAINTEXTS};
pub use error::RecoveryError;
pub use oracle::{CbcPaddingOracle, PaddingOracle, QueryCounter};
pub use pkcs7::{pkcs7_pad, pkcs7_padding_len, pkcs7_unpad, PaddingError};
