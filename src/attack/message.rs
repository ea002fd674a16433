use crate::attack::block::recover_block_until_cancelled;
use crate::{
    pkcs7_unpad, Block, PaddingOracle, QueryCounter, RecoveryConfig, RecoveryError, Schedule,
    BLOCK_SIZE,
};

use log::info;
use rayon::prelude::*;

use std::sync::atomic::{AtomicBool, Ordering};

/// Recover the plaintext of `ciphertext` using only a padding oracle.
///
/// The IV acts as block 0, so every block of the ciphertext is recovered. The
/// result has its padding removed.
pub fn recover_plaintext<O: PaddingOracle>(
    ciphertext: &[u8],
    iv: &Block,
    oracle: &O,
) -> Result<Vec<u8>, RecoveryError> {
    recover_plaintext_with(ciphertext, iv, oracle, &RecoveryConfig::default())
}

pub fn recover_plaintext_with<O: PaddingOracle>(
    ciphertext: &[u8],
    iv: &Block,
    oracle: &O,
    config: &RecoveryConfig,
) -> Result<Vec<u8>, RecoveryError> {
    let blocks = split_blocks(ciphertext, iv)?;
    let oracle = QueryCounter::new(oracle);
    info!(
        "recovering {} blocks with {:?} blocks and {:?} candidates",
        blocks.len() - 1,
        config.blocks,
        config.candidates
    );

    let mut plaintext = match config.threads {
        Some(n_threads) if config.is_parallel() => rayon::ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .build()?
            .install(|| recover_blocks(&blocks, &oracle, config))?,
        _ => recover_blocks(&blocks, &oracle, config)?,
    };
    pkcs7_unpad(&mut plaintext, BLOCK_SIZE)?;

    info!(
        "recovered {} plaintext bytes using {} oracle queries",
        plaintext.len(),
        oracle.queries()
    );
    Ok(plaintext)
}

/// Split the ciphertext into blocks, with the IV in front.
pub(crate) fn split_blocks(ciphertext: &[u8], iv: &Block) -> Result<Vec<Block>, RecoveryError> {
    if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
        return Err(RecoveryError::InvalidCiphertextLength {
            len: ciphertext.len(),
        });
    }
    let blocks = std::iter::once(*iv)
        .chain(ciphertext.chunks_exact(BLOCK_SIZE).map(|chunk| {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            block
        }))
        .collect();
    Ok(blocks)
}

fn recover_blocks<O: PaddingOracle>(
    blocks: &[Block],
    oracle: &O,
    config: &RecoveryConfig,
) -> Result<Vec<u8>, RecoveryError> {
    match config.blocks {
        Schedule::Sequential => recover_blocks_in_order(blocks, oracle, config),
        Schedule::Parallel => recover_blocks_in_parallel(blocks, oracle, config),
    }
}

struct MessageState {
    next_block: usize,
    assembled: Vec<u8>,
}

fn recover_blocks_in_order<O: PaddingOracle>(
    blocks: &[Block],
    oracle: &O,
    config: &RecoveryConfig,
) -> Result<Vec<u8>, RecoveryError> {
    let never_cancelled = AtomicBool::new(false);
    let mut state = MessageState {
        next_block: 1,
        assembled: Vec::with_capacity((blocks.len() - 1) * BLOCK_SIZE),
    };
    while state.next_block < blocks.len() {
        let block_index = state.next_block;
        let c_prev = &blocks[block_index - 1];
        let c_target = &blocks[block_index];
        if let Some(block) = recover_block_until_cancelled(
            oracle,
            c_prev,
            c_target,
            block_index,
            config,
            &never_cancelled,
        )? {
            state.assembled.extend_from_slice(&block);
        }
        state.next_block += 1;
    }
    Ok(state.assembled)
}

fn recover_blocks_in_parallel<O: PaddingOracle>(
    blocks: &[Block],
    oracle: &O,
    config: &RecoveryConfig,
) -> Result<Vec<u8>, RecoveryError> {
    let cancelled = AtomicBool::new(false);
    let results: Vec<_> = blocks
        .par_windows(2)
        .enumerate()
        .map(|(i, pair)| {
            let result =
                recover_block_until_cancelled(oracle, &pair[0], &pair[1], i + 1, config, &cancelled);
            if result.is_err() {
                cancelled.store(true, Ordering::Relaxed);
            }
            result
        })
        .collect();

    // A cancelled block always has a failed block somewhere, so the first
    // error in block order among the blocks that ran is the one reported.
    let mut assembled = Vec::with_capacity(results.len() * BLOCK_SIZE);
    let mut recovered_all = true;
    for result in results {
        match result? {
            Some(block) => assembled.extend_from_slice(&block),
            None => recovered_all = false,
        }
    }
    debug_assert!(recovered_all, "block recovery cancelled without a failure");
    Ok(assembled)
}
