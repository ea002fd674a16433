use crate::{PaddingError, BLOCK_SIZE};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecoveryError {
    #[error("ciphertext length {len} is not a non-zero multiple of {}", BLOCK_SIZE)]
    InvalidCiphertextLength { len: usize },
    /// No candidate byte produced valid padding. `block` is 1-indexed with the
    /// IV as block 0; `position` counts from the end of the block, starting at 1.
    #[error("oracle accepted no candidate for position {position} of block {block}")]
    OracleInconsistency { block: usize, position: usize },
    #[error("recovered plaintext failed padding validation: {0}")]
    PaddingValidation(#[from] PaddingError),
    #[error("could not build recovery thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
