//! AES-256 keyed by a wire label, used as the gate encryption oracle.

use aes::Aes256;
use cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};

use crate::{Block, Label};

/// AES-256 with a fixed key schedule derived from a 256-bit label.
pub struct LabelCipher {
    aes: Aes256,
}

impl LabelCipher {
    /// Initialize the cipher using `key`.
    #[inline]
    pub fn new(key: &Label) -> Self {
        let key = GenericArray::from(key.to_bytes());
        LabelCipher {
            aes: Aes256::new(&key),
        }
    }

    /// Encrypt a single block.
    #[inline]
    pub fn encrypt_block(&self, blk: Block) -> Block {
        let mut buf = GenericArray::from(blk.to_le_bytes());
        self.aes.encrypt_block(&mut buf);
        let mut out = [0u8; 16];
        out.copy_from_slice(buf.as_slice());
        Block::from_le_bytes(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aes256_fips197() {
        // FIPS-197 appendix C.3.
        let mut key = [0u8; 32];
        hex::decode_to_slice(
            "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f",
            &mut key,
        )
        .unwrap();
        let mut pt = [0u8; 16];
        hex::decode_to_slice("00112233445566778899aabbccddeeff", &mut pt).unwrap();
        let mut ct = [0u8; 16];
        hex::decode_to_slice("8ea2b7ca516745bfeafc49904b496089", &mut ct).unwrap();

        let cipher = LabelCipher::new(&Label::from_bytes(&key));
        let out = cipher.encrypt_block(Block::from_le_bytes(pt));
        assert_eq!(out.to_le_bytes(), ct);
    }

    #[test]
    fn test_deterministic() {
        let key = rand::random::<Label>();
        let blk = rand::random::<Block>();
        let c1 = LabelCipher::new(&key).encrypt_block(blk);
        let c2 = LabelCipher::new(&key).encrypt_block(blk);
        assert_eq!(c1, c2);
        assert_ne!(c1, blk);
    }
}
