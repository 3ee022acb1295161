//! BFV parameter sets and slot geometry for the oblivious transfer.

use std::sync::Arc;

use fhe::bfv::{BfvParameters, BfvParametersBuilder};

use super::errors::OtError;

/// Statistical hiding margin: flooding noise has `89 - P` bits for a
/// plaintext modulus of `P` bits.
const FLOOD_BUDGET_BITS: usize = 89;

/// The two supported parameter sets, keyed by the bit length of the
/// plaintext modulus. Each message bit costs one plaintext bit of headroom,
/// so `P - 1` payload bits fit per slot.
pub struct OtParams {
    pub plain_modulus_bitlen: usize,
    pub degree: usize,
    pub par: Arc<BfvParameters>,
    /// Bits of uniform noise added to each ciphertext component.
    pub flood_bits: usize,
    /// Modulus switches performed before flooding; also the level the
    /// ciphertext sits at when the flooding noise is added.
    pub mod_switches_before_flood: usize,
}

impl OtParams {
    pub fn new(plain_modulus_bitlen: usize) -> Result<Self, OtError> {
        let (plain_modulus, degree, moduli_sizes, pre_switches): (u64, usize, &[usize], usize) =
            match plain_modulus_bitlen {
                17 => (65_537, 8192, &[60, 40], 0),
                33 => (7_400_521_729, 16384, &[50, 50, 50], 1),
                p => return Err(OtError::InvalidModulusBitlen(p)),
            };

        let par = BfvParametersBuilder::new()
            .set_degree(degree)
            .set_plaintext_modulus(plain_modulus)
            .set_moduli_sizes(moduli_sizes)
            .build_arc()?;

        Ok(Self {
            plain_modulus_bitlen,
            degree,
            par,
            flood_bits: FLOOD_BUDGET_BITS - plain_modulus_bitlen,
            mod_switches_before_flood: pre_switches,
        })
    }

    /// Payload bits per SIMD slot.
    pub fn slot_bits(&self) -> usize {
        self.plain_modulus_bitlen - 1
    }

    /// Slots needed for one message of `bitlen` bits.
    pub fn slots_per_msg(&self, bitlen: usize) -> usize {
        (bitlen + self.slot_bits() - 1) / self.slot_bits()
    }

    /// Whole messages of `bitlen` bits packed into one ciphertext.
    pub fn msgs_per_ctxt(&self, bitlen: usize) -> usize {
        self.degree / self.slots_per_msg(bitlen)
    }
}
