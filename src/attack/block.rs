use crate::attack::byte::{recover_byte, RecoveredByte};
use crate::{Block, PaddingOracle, RecoveryConfig, RecoveryError, BLOCK_SIZE};

use log::{debug, error, trace};

use std::sync::atomic::{AtomicBool, Ordering};

/// What is known about one block part way through its recovery.
#[derive(Debug, Clone, Copy)]
struct BlockState {
    // Intermediate bytes in recovery order, i.e. last byte of the block first.
    known: [u8; BLOCK_SIZE],
    plaintext: Block,
    recovered: usize,
}

impl BlockState {
    fn new() -> Self {
        Self {
            known: [0u8; BLOCK_SIZE],
            plaintext: [0u8; BLOCK_SIZE],
            recovered: 0,
        }
    }

    fn known(&self) -> &[u8] {
        &self.known[..self.recovered]
    }

    fn with_byte(mut self, byte: RecoveredByte) -> Self {
        self.known[self.recovered] = byte.intermediate;
        self.plaintext[BLOCK_SIZE - 1 - self.recovered] = byte.plaintext;
        self.recovered += 1;
        self
    }
}

/// Recover the plaintext of `c_target`, the block that follows `c_prev` in
/// the ciphertext. `block_index` is only used for diagnostics.
///
/// The returned block still contains any padding.
pub fn recover_block<O: PaddingOracle>(
    oracle: &O,
    c_prev: &Block,
    c_target: &Block,
    block_index: usize,
    config: &RecoveryConfig,
) -> Result<Block, RecoveryError> {
    let never_cancelled = AtomicBool::new(false);
    let block =
        recover_block_until_cancelled(oracle, c_prev, c_target, block_index, config, &never_cancelled)?;
    Ok(block.unwrap_or_default())
}

/// As [`recover_block`], but gives up with `Ok(None)` once `cancelled` is set.
/// The flag is checked before each byte position.
pub(crate) fn recover_block_until_cancelled<O: PaddingOracle>(
    oracle: &O,
    c_prev: &Block,
    c_target: &Block,
    block_index: usize,
    config: &RecoveryConfig,
    cancelled: &AtomicBool,
) -> Result<Option<Block>, RecoveryError> {
    debug!("recovering block {block_index}");
    let mut state = BlockState::new();
    while state.recovered < BLOCK_SIZE {
        if cancelled.load(Ordering::Relaxed) {
            debug!("recovery of block {block_index} cancelled");
            return Ok(None);
        }
        let position = state.recovered + 1;
        let byte = recover_byte(oracle, c_prev, c_target, state.known(), config.candidates)
            .ok_or_else(|| {
                error!("no candidate accepted at position {position} of block {block_index}");
                RecoveryError::OracleInconsistency {
                    block: block_index,
                    position,
                }
            })?;
        trace!(
            "block {block_index} position {position}: intermediate {:#04x} plaintext {:#04x}",
            byte.intermediate,
            byte.plaintext
        );
        state = state.with_byte(byte);
    }
    Ok(Some(state.plaintext))
}
