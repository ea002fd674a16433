// A padding oracle challenge: a hidden key, a fixed set of secret messages and
// an oracle that only says whether a ciphertext's padding is valid.
use crate::{Block, CbcPaddingOracle};

use base64::{engine::general_purpose::STANDARD, DecodeError, Engine};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub const PLAINTEXTS: [&str; 10] = [
    "MDAwMDAwTm93IHRoYXQgdGhlIHBhcnR5IGlzIGp1bXBpbmc=",
    "MDAwMDAxV2l0aCB0aGUgYmFzcyBraWNrZWQgaW4gYW5kIHRoZSBWZWdhJ3MgYXJlIHB1bXBpbic=",
    "MDAwMDAyUXVpY2sgdG8gdGhlIHBvaW50LCB0byB0aGUgcG9pbnQsIG5vIGZha2luZw==",
    "MDAwMDAzQ29va2luZyBNQydzIGxpa2UgYSBwb3VuZCBvZiBiYWNvbg==",
    "MDAwMDA0QnVybmluZyAnZW0sIGlmIHlvdSBhaW4ndCBxdWljayBhbmQgbmltYmxl",
    "MDAwMDA1SSBnbyBjcmF6eSB3aGVuIEkgaGVhciBhIGN5bWJhbA==",
    "MDAwMDA2QW5kIGEgaGlnaCBoYXQgd2l0aCBhIHNvdXBlZCB1cCB0ZW1wbw==",
    "MDAwMDA3SSdtIG9uIGEgcm9sbCwgaXQncyB0aW1lIHRvIGdvIHNvbG8=",
    "MDAwMDA4b2xsaW4nIGluIG15IGZpdmUgcG9pbnQgb2g=",
    "MDAwMDA5aXRoIG15IHJhZy10b3AgZG93biBzbyBteSBoYWlyIGNhbiBibG93",
];

/// A ciphertext handed to the attacker. `index` identifies which corpus
/// message it encrypts, for checking the attack's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub iv: Block,
    pub ciphertext: Vec<u8>,
    pub index: usize,
}

pub struct Challenge {
    oracle: CbcPaddingOracle,
    plaintexts: Vec<Vec<u8>>,
    rng: StdRng,
}

impl Challenge {
    /// Create a challenge with a random key. The same seed always gives the
    /// same key and the same sequence of samples.
    pub fn new(seed: u64) -> Result<Self, DecodeError> {
        let plaintexts = PLAINTEXTS
            .iter()
            .map(|encoded| STANDARD.decode(encoded))
            .collect::<Result<Vec<_>, _>>()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let key: [u8; 16] = rng.gen();
        Ok(Self {
            oracle: CbcPaddingOracle::new(key),
            plaintexts,
            rng,
        })
    }

    pub fn encrypt_random_plaintext(&mut self) -> Sample {
        let index = self.rng.gen_range(0..self.plaintexts.len());
        let iv: Block = self.rng.gen();
        let ciphertext = self.oracle.encrypt(&self.plaintexts[index], &iv);
        Sample {
            iv,
            ciphertext,
            index,
        }
    }

    pub fn oracle(&self) -> &CbcPaddingOracle {
        &self.oracle
    }

    pub fn plaintext(&self, index: usize) -> Option<&[u8]> {
        self.plaintexts.get(index).map(Vec::as_slice)
    }
}
