//! AES-128 in counter mode used as a cryptographically secure PRG.

use aes::Aes128;
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use rand_core::{impls, CryptoRng, Error, RngCore, SeedableRng};

/// An AES-CTR based random number generator, seedable with 128 bits.
pub struct AesRng {
    aes: Aes128,
    counter: u128,
    buf: [u8; 16],
    used: usize,
}

impl AesRng {
    /// New rng with a seed drawn from system entropy.
    pub fn new() -> Self {
        Self::from_seed(rand::random::<[u8; 16]>())
    }

    fn refill(&mut self) {
        let mut blk = GenericArray::from(self.counter.to_le_bytes());
        self.aes.encrypt_block(&mut blk);
        self.buf.copy_from_slice(blk.as_slice());
        self.counter = self.counter.wrapping_add(1);
        self.used = 0;
    }
}

impl Default for AesRng {
    fn default() -> Self {
        Self::new()
    }
}

impl SeedableRng for AesRng {
    type Seed = [u8; 16];

    fn from_seed(seed: Self::Seed) -> Self {
        AesRng {
            aes: Aes128::new(&GenericArray::from(seed)),
            counter: 0,
            buf: [0u8; 16],
            used: 16,
        }
    }
}

impl RngCore for AesRng {
    #[inline]
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        let mut i = 0;
        while i < dest.len() {
            if self.used == 16 {
                self.refill();
            }
            let n = (16 - self.used).min(dest.len() - i);
            dest[i..i + n].copy_from_slice(&self.buf[self.used..self.used + n]);
            self.used += n;
            i += n;
        }
    }

    #[inline]
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

impl CryptoRng for AesRng {}
