//! Defines a 128-bit block and the operations on it.

use core::fmt;
use core::ops::{BitAnd, BitAndAssign, BitXor, BitXorAssign, Not};

use rand::distributions::{Distribution, Standard};
use rand::Rng;

/// A 128-bit chunk.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Block(u128);

impl Block {
    /// Return the least significant bit.
    #[inline]
    pub fn lsb(&self) -> bool {
        (self.0 & 1) == 1
    }

    /// Set the least significant bit.
    #[inline]
    pub fn set_lsb(&mut self, b: bool) {
        self.0 = (self.0 & !1) | (b as u128);
    }

    /// Flip all the bits.
    #[inline]
    pub fn flip(&self) -> Self {
        Block(!self.0)
    }

    #[inline]
    pub fn to_le_bytes(&self) -> [u8; 16] {
        self.0.to_le_bytes()
    }

    #[inline]
    pub fn from_le_bytes(bytes: [u8; 16]) -> Self {
        Block(u128::from_le_bytes(bytes))
    }

    #[inline]
    pub fn to_be_bytes(&self) -> [u8; 16] {
        self.0.to_be_bytes()
    }

    #[inline]
    pub fn from_be_bytes(bytes: [u8; 16]) -> Self {
        Block(u128::from_be_bytes(bytes))
    }
}

impl From<u128> for Block {
    #[inline]
    fn from(x: u128) -> Self {
        Block(x)
    }
}

impl From<Block> for u128 {
    #[inline]
    fn from(blk: Block) -> Self {
        blk.0
    }
}

impl BitXor for Block {
    type Output = Block;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Block(self.0 ^ rhs.0)
    }
}

impl BitXorAssign for Block {
    #[inline]
    fn bitxor_assign(&mut self, rhs: Self) {
        self.0 ^= rhs.0;
    }
}

impl BitAnd for Block {
    type Output = Block;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Block(self.0 & rhs.0)
    }
}

impl BitAndAssign for Block {
    #[inline]
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl Not for Block {
    type Output = Block;
    #[inline]
    fn not(self) -> Self {
        Block(!self.0)
    }
}

impl Distribution<Block> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Block {
        Block(rng.gen::<u128>())
    }
}

impl fmt::Debug for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:032x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_ops() {
        let x = rand::random::<Block>();
        let y = rand::random::<Block>();

        assert_eq!(x ^ y ^ y, x);
        assert_eq!(x ^ x.flip(), Block::from(u128::MAX));
        assert_eq!(x & Block::from(u128::MAX), x);
        assert_eq!(x & Block::from(0u128), Block::from(0u128));
        assert_eq!(!x, x.flip());
    }

    #[test]
    fn test_lsb() {
        let mut x = Block::from(0u128);
        assert!(!x.lsb());
        x.set_lsb(true);
        assert!(x.lsb());
        assert_eq!(x, Block::from(1u128));
        x.set_lsb(false);
        assert_eq!(x, Block::from(0u128));
    }

    #[test]
    fn test_byte_conversion() {
        let x = rand::random::<Block>();
        assert_eq!(Block::from_le_bytes(x.to_le_bytes()), x);
        assert_eq!(Block::from_be_bytes(x.to_be_bytes()), x);

        let x = Block::from(1u128);
        assert_eq!(x.to_le_bytes()[0], 1);
        assert_eq!(x.to_be_bytes()[15], 1);
    }
}
