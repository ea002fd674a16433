/// AES-128 in CBC mode
use crate::{pkcs7_pad, pkcs7_unpad, Block, PaddingError, BLOCK_SIZE};

use aes::cipher::{generic_array::GenericArray, BlockDecrypt, BlockEncrypt, KeyInit};
use aes::Aes128;

#[derive(Clone)]
pub struct Aes128Cbc {
    cipher: Aes128,
}

impl Aes128Cbc {
    pub fn new(key: &[u8; 16]) -> Self {
        Self {
            cipher: Aes128::new(GenericArray::from_slice(key)),
        }
    }

    pub fn encrypt(&self, plaintext: &[u8], iv: &Block) -> Vec<u8> {
        let padded = pkcs7_pad(plaintext, BLOCK_SIZE);
        let mut ciphertext = Vec::with_capacity(padded.len());

        let mut last_block = *iv;
        for plaintext_block in padded.chunks_exact(BLOCK_SIZE) {
            let mut buf = aes::Block::clone_from_slice(plaintext_block);
            buf.iter_mut().zip(last_block).for_each(|(b, c)| *b ^= c);
            self.cipher.encrypt_block(&mut buf);
            last_block.copy_from_slice(&buf);
            ciphertext.extend_from_slice(&last_block);
        }
        ciphertext
    }

    /// CBC-decrypt whole blocks, leaving any padding in place.
    ///
    /// Trailing bytes that do not fill a block are ignored.
    pub fn decrypt_unpadded(&self, ciphertext: &[u8], iv: &Block) -> Vec<u8> {
        let mut message = Vec::with_capacity(ciphertext.len());

        let mut last_block: &[u8] = iv;
        for ciphertext_block in ciphertext.chunks_exact(BLOCK_SIZE) {
            let mut buf = aes::Block::clone_from_slice(ciphertext_block);
            self.cipher.decrypt_block(&mut buf);
            message.extend(buf.iter().zip(last_block).map(|(m, c)| m ^ c));
            last_block = ciphertext_block;
        }
        message
    }

    pub fn decrypt(&self, ciphertext: &[u8], iv: &Block) -> Result<Vec<u8>, PaddingError> {
        let mut message = self.decrypt_unpadded(ciphertext, iv);
        pkcs7_unpad(&mut message, BLOCK_SIZE)?;
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // NIST SP 800-38A, F.2.1 CBC-AES128.Encrypt
    const NIST_KEY: [u8; 16] = [
        0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf, 0x4f,
        0x3c,
    ];
    const NIST_IV: Block = [
        0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e,
        0x0f,
    ];
    const NIST_PLAINTEXT: Block = [
        0x6b, 0xc1, 0xbe, 0xe2, 0x2e, 0x40, 0x9f, 0x96, 0xe9, 0x3d, 0x7e, 0x11, 0x73, 0x93, 0x17,
        0x2a,
    ];
    const NIST_CIPHERTEXT: Block = [
        0x76, 0x49, 0xab, 0xac, 0x81, 0x19, 0xb2, 0x46, 0xce, 0xe9, 0x8e, 0x9b, 0x12, 0xe9, 0x19,
        0x7d,
    ];

    #[test]
    fn encrypt_matches_nist_vector() {
        let cbc = Aes128Cbc::new(&NIST_KEY);

        let ciphertext = cbc.encrypt(&NIST_PLAINTEXT, &NIST_IV);

        // The second block is the full block of padding.
        assert_eq!(ciphertext.len(), 32);
        assert_eq!(ciphertext[..16], NIST_CIPHERTEXT);
    }

    #[test]
    fn decrypt_unpadded_matches_nist_vector() {
        let cbc = Aes128Cbc::new(&NIST_KEY);

        let plaintext = cbc.decrypt_unpadded(&NIST_CIPHERTEXT, &NIST_IV);

        assert_eq!(plaintext, NIST_PLAINTEXT);
    }

    #[test]
    fn decrypt_then_encrypt_returns_original_ciphertext() {
        let cbc = Aes128Cbc::new(b"YELLOW SUBMARINE");
        let iv = [7u8; 16];
        let ciphertext = cbc.encrypt(b"I'm back and I'm ringin' the bell", &iv);

        let plaintext = cbc.decrypt(&ciphertext, &iv).unwrap();
        let new_ciphertext = cbc.encrypt(&plaintext, &iv);

        assert_eq!(plaintext, b"I'm back and I'm ringin' the bell");
        assert_eq!(new_ciphertext, ciphertext);
    }

    #[test]
    fn decrypt_returns_err_given_tampered_padding() {
        let cbc = Aes128Cbc::new(b"YELLOW SUBMARINE");
        let iv = [0u8; 16];
        let mut ciphertext = cbc.encrypt(b"YELLOW SUBMARINE", &iv);
        // The final block decrypts to 0x10 * 16, flipping a bit in the first
        // byte of the preceding block turns the leading 0x10 into 0x11.
        ciphertext[0] ^= 0x01;

        let plaintext = cbc.decrypt(&ciphertext, &iv);

        assert_eq!(plaintext, Err(PaddingError::Inconsistent(0x10)));
    }
}
