//! 256-bit wire labels for garbled circuits.

use core::fmt;
use core::ops::{BitAnd, BitXor, Not};

use rand::distributions::{Distribution, Standard};
use rand::Rng;

use crate::Block;

/// A 256-bit wire label, split into two 128-bit halves.
///
/// The all-zero and all-one labels are reserved: they carry the public
/// constants 0 and 1 on wires whose value both parties know.
/// `is_public` recognizes exactly these two patterns.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct Label {
    pub hi: Block,
    pub lo: Block,
}

impl Label {
    #[inline]
    pub fn new(hi: Block, lo: Block) -> Self {
        Label { hi, lo }
    }

    /// The reserved label carrying a public 0.
    #[inline]
    pub fn zero() -> Self {
        Label {
            hi: Block::from(0u128),
            lo: Block::from(0u128),
        }
    }

    /// The reserved label carrying a public 1.
    #[inline]
    pub fn one() -> Self {
        Label {
            hi: Block::from(u128::MAX),
            lo: Block::from(u128::MAX),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        *self == Self::one()
    }

    #[inline]
    pub fn is_public(&self) -> bool {
        self.is_zero() || self.is_one()
    }

    /// The color bit used for point-and-permute.
    #[inline]
    pub fn color(&self) -> bool {
        self.lo.lsb()
    }

    #[inline]
    pub fn set_color(&mut self, b: bool) {
        self.lo.set_lsb(b);
    }

    /// Serialize as 32 big-endian bytes, high half first.
    #[inline]
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&self.hi.to_be_bytes());
        bytes[16..].copy_from_slice(&self.lo.to_be_bytes());
        bytes
    }

    #[inline]
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let mut hi = [0u8; 16];
        let mut lo = [0u8; 16];
        hi.copy_from_slice(&bytes[..16]);
        lo.copy_from_slice(&bytes[16..]);
        Label {
            hi: Block::from_be_bytes(hi),
            lo: Block::from_be_bytes(lo),
        }
    }
}

impl BitXor for Label {
    type Output = Label;
    #[inline]
    fn bitxor(self, rhs: Self) -> Self {
        Label {
            hi: self.hi ^ rhs.hi,
            lo: self.lo ^ rhs.lo,
        }
    }
}

impl BitAnd for Label {
    type Output = Label;
    #[inline]
    fn bitand(self, rhs: Self) -> Self {
        Label {
            hi: self.hi & rhs.hi,
            lo: self.lo & rhs.lo,
        }
    }
}

impl Not for Label {
    type Output = Label;
    #[inline]
    fn not(self) -> Self {
        Label {
            hi: !self.hi,
            lo: !self.lo,
        }
    }
}

impl Distribution<Label> for Standard {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Label {
        Label {
            hi: rng.gen::<Block>(),
            lo: rng.gen::<Block>(),
        }
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}{:?}", self.hi, self.lo)
    }
}
