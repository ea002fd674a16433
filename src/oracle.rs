// The padding oracle: the only thing an attacker gets to ask about a
// ciphertext is whether it decrypts to something with valid PKCS#7 padding.
use crate::{pkcs7_padding_len, Aes128Cbc, Block, BLOCK_SIZE};

use std::sync::atomic::{AtomicUsize, Ordering};

/// Reports whether `ciphertext` decrypts to a message with valid padding.
///
/// The first block of `ciphertext` is used as the IV of the remainder, so a
/// query is at least two blocks long. Oracles are shared between recovery
/// threads and must give the same answer for the same input.
pub trait PaddingOracle: Sync {
    fn is_valid(&self, ciphertext: &[u8]) -> bool;
}

impl<F> PaddingOracle for F
where
    F: Fn(&[u8]) -> bool + Sync,
{
    fn is_valid(&self, ciphertext: &[u8]) -> bool {
        self(ciphertext)
    }
}

/// An oracle that holds the secret key and leaks padding validity.
#[derive(Clone)]
pub struct CbcPaddingOracle {
    cbc: Aes128Cbc,
}

impl CbcPaddingOracle {
    pub fn new(key: [u8; 16]) -> Self {
        Self {
            cbc: Aes128Cbc::new(&key),
        }
    }

    pub fn encrypt(&self, plaintext: &[u8], iv: &Block) -> Vec<u8> {
        self.cbc.encrypt(plaintext, iv)
    }

    pub fn ciphertext_padding_valid(&self, iv: &Block, ciphertext: &[u8]) -> bool {
        if ciphertext.is_empty() || ciphertext.len() % BLOCK_SIZE != 0 {
            return false;
        }
        let plaintext = self.cbc.decrypt_unpadded(ciphertext, iv);
        pkcs7_padding_len(&plaintext, BLOCK_SIZE).is_ok()
    }
}

impl PaddingOracle for CbcPaddingOracle {
    fn is_valid(&self, ciphertext: &[u8]) -> bool {
        if ciphertext.len() < 2 * BLOCK_SIZE {
            return false;
        }
        let (iv, rest) = ciphertext.split_at(BLOCK_SIZE);
        let mut iv_block = [0u8; BLOCK_SIZE];
        iv_block.copy_from_slice(iv);
        self.ciphertext_padding_valid(&iv_block, rest)
    }
}

/// Wraps an oracle and counts the queries made through it.
pub struct QueryCounter<'a, O> {
    inner: &'a O,
    queries: AtomicUsize,
}

impl<'a, O: PaddingOracle> QueryCounter<'a, O> {
    pub fn new(inner: &'a O) -> Self {
        Self {
            inner,
            queries: AtomicUsize::new(0),
        }
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::Relaxed)
    }
}

impl<O: PaddingOracle> PaddingOracle for QueryCounter<'_, O> {
    fn is_valid(&self, ciphertext: &[u8]) -> bool {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.inner.is_valid(ciphertext)
    }
}
