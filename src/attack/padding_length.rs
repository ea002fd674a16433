// Finding the padding length of a message without recovering it.
//
// Changing byte i of the block in front of the final block changes byte i of
// the final plaintext block. If byte i is part of the padding the oracle will
// reject the result; if it's part of the message it won't notice. Walking i
// from the start of the block, the first rejection marks where padding begins.
use crate::attack::message::split_blocks;
use crate::{Block, PaddingOracle, RecoveryError, BLOCK_SIZE};

use log::debug;

pub fn detect_padding_length<O: PaddingOracle>(
    ciphertext: &[u8],
    iv: &Block,
    oracle: &O,
) -> Result<usize, RecoveryError> {
    let blocks = split_blocks(ciphertext, iv)?;
    let last = blocks.len() - 1;
    let (c_prev, c_target) = (&blocks[last - 1], &blocks[last]);

    let mut query = [0u8; 2 * BLOCK_SIZE];
    query[BLOCK_SIZE..].copy_from_slice(c_target);
    for i in 0..BLOCK_SIZE {
        query[..BLOCK_SIZE].copy_from_slice(c_prev);
        query[i] ^= 0x01;
        if !oracle.is_valid(&query) {
            let padding_len = BLOCK_SIZE - i;
            debug!("final block {last} has {padding_len} bytes of padding");
            return Ok(padding_len);
        }
    }
    Err(RecoveryError::OracleInconsistency {
        block: last,
        position: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::CbcPaddingOracle;

    use rstest::rstest;

    #[rstest]
    #[case(b"YELLOW SUBMARINE", 16)]
    #[case(b"YELLOW SUBMARIN", 1)]
    #[case(b"YELLOW", 10)]
    #[case(b"000008ollin' in my five point oh", 16)]
    #[case(b"000001With the bass kicked in and the Vega's are pumpin'", 8)]
    fn detect_padding_length_finds_padding(#[case] message: &[u8], #[case] expected: usize) {
        let oracle = CbcPaddingOracle::new(*b"0f40cc1380ee2f11");
        let iv = [0x5Au8; 16];
        let ciphertext = oracle.encrypt(message, &iv);

        let padding_len = detect_padding_length(&ciphertext, &iv, &oracle).unwrap();

        assert_eq!(padding_len, expected);
    }

    #[test]
    fn detect_padding_length_returns_err_given_oracle_that_always_accepts() {
        let oracle = |_: &[u8]| true;

        let result = detect_padding_length(&[0u8; 32], &[0u8; 16], &oracle);

        assert!(matches!(
            result,
            Err(RecoveryError::OracleInconsistency {
                block: 2,
                position: 1
            })
        ));
    }

    #[test]
    fn detect_padding_length_returns_err_given_misaligned_ciphertext() {
        let oracle = |_: &[u8]| true;

        let result = detect_padding_length(&[0u8; 20], &[0u8; 16], &oracle);

        assert!(matches!(
            result,
            Err(RecoveryError::InvalidCiphertextLength { len: 20 })
        ));
    }
}
