pub mod block;
pub mod byte;
pub mod message;
pub mod padding_length;

/// An oracle for a target block whose intermediate value `D(C_target)` is
/// fixed, so padding validity depends only on the probe block in front of it.
#[cfg(test)]
pub(crate) fn intermediate_oracle(intermediate: crate::Block) -> impl Fn(&[u8]) -> bool + Sync {
    use crate::BLOCK_SIZE;

    move |ciphertext: &[u8]| {
        let probe = &ciphertext[(ciphertext.len() - 2 * BLOCK_SIZE)..][..BLOCK_SIZE];
        let decrypted: Vec<u8> = probe
            .iter()
            .zip(intermediate)
            .map(|(p, i)| p ^ i)
            .collect();
        crate::pkcs7_padding_len(&decrypted, BLOCK_SIZE).is_ok()
    }
}
