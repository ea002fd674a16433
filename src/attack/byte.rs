// Recovering a single byte of a block with a CBC padding oracle.
//
// CBC decrypts each block as
//
//                 P_k = D(C_k) ⊕ C_{k-1}.
//
// Call I = D(C_k) the intermediate block. If we send the oracle our own block
// X in front of C_k, the block it checks the padding of is P' = I ⊕ X. We
// control X completely, so we can walk a single byte of X through all 256
// values and wait for the oracle to say the padding is valid.
//
// For the last byte, valid padding means P'[15] = 0x01, so
//
//                 I[15] = X[15] ⊕ 0x01,
//                 P_k[15] = I[15] ⊕ C_{k-1}[15].
//
// For the byte at `position` (counting from the end, starting at 1) we want
// the padding `position` repeated `position` times. Every trailing byte we
// already know the intermediate value of is set to `I[i] ⊕ position` so it
// decrypts to the padding value, and the one unknown byte is brute forced.
//
// The last byte is special: P' ending in 0x01 is not the only way to get
// valid padding. If I[14] happens to be 0x02, a guess making P'[15] = 0x02 is
// also accepted. We check any hit at position 1 by also changing X[14]; real
// 0x01 padding doesn't care about that byte, longer padding does.
use crate::{Block, PaddingOracle, Schedule, BLOCK_SIZE};

use log::debug;
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecoveredByte {
    pub intermediate: u8,
    pub plaintext: u8,
}

/// Recover the next unknown byte of `c_target`.
///
/// `known` holds the intermediate bytes already recovered for this block,
/// starting from the last byte and working inwards, so the byte recovered
/// here is at position `known.len() + 1` from the end. Returns `None` if no
/// guess produces valid padding.
pub fn recover_byte<O: PaddingOracle>(
    oracle: &O,
    c_prev: &Block,
    c_target: &Block,
    known: &[u8],
    candidates: Schedule,
) -> Option<RecoveredByte> {
    let position = known.len() + 1;
    assert!(position <= BLOCK_SIZE, "block already fully recovered");
    let pad_byte = position as u8;
    let index = BLOCK_SIZE - position;
    let probe = make_probe(known, pad_byte);

    let accepts = |guess: u8| {
        let mut probe = probe;
        probe[index] = guess;
        padding_valid(oracle, &probe, c_target)
            && (position > 1 || confirm_single_byte_padding(oracle, probe, c_target))
    };
    let guess = match candidates {
        Schedule::Sequential => (0..=255u8).find(|&guess| accepts(guess)),
        Schedule::Parallel => (0..=255u8).into_par_iter().find_first(|&guess| accepts(guess)),
    }?;

    let intermediate = guess ^ pad_byte;
    Some(RecoveredByte {
        intermediate,
        plaintext: intermediate ^ c_prev[index],
    })
}

fn make_probe(known: &[u8], pad_byte: u8) -> Block {
    let mut probe = [0u8; BLOCK_SIZE];
    for (i, intermediate) in known.iter().enumerate() {
        probe[BLOCK_SIZE - 1 - i] = intermediate ^ pad_byte;
    }
    probe
}

fn padding_valid<O: PaddingOracle>(oracle: &O, probe: &Block, c_target: &Block) -> bool {
    let mut query = [0u8; 2 * BLOCK_SIZE];
    query[..BLOCK_SIZE].copy_from_slice(probe);
    query[BLOCK_SIZE..].copy_from_slice(c_target);
    oracle.is_valid(&query)
}

fn confirm_single_byte_padding<O: PaddingOracle>(
    oracle: &O,
    mut probe: Block,
    c_target: &Block,
) -> bool {
    probe[BLOCK_SIZE - 2] ^= 0xFF;
    let confirmed = padding_valid(oracle, &probe, c_target);
    if !confirmed {
        debug!(
            "rejected candidate {:#04x}: padding was longer than one byte",
            probe[BLOCK_SIZE - 1]
        );
    }
    confirmed
}
