//! Noise flooding: add wide uniform noise to both ciphertext components so
//! the sender's computation pattern is statistically hidden from the
//! receiver after decryption.

use std::sync::Arc;

use fhe::bfv::{BfvParameters, Ciphertext};
use fhe_math::rq::{traits::TryConvertFrom, Poly, Representation};
use rand09::{CryptoRng, Rng};

use super::errors::OtError;

// Noise coefficients are built as `lo + 2^39 * hi` so both halves stay
// below every RNS modulus in use.
const SPLIT_BITS: usize = 39;

fn uniform_poly<R: Rng + CryptoRng>(
    par: &Arc<BfvParameters>,
    level: usize,
    noise_bits: usize,
    rng: &mut R,
) -> Result<Poly, OtError> {
    let ctx = par.context_at_level(level)?;
    let degree = par.degree();

    let lo_mask = (1u64 << SPLIT_BITS) - 1;
    let hi_mask = (1u64 << (noise_bits - SPLIT_BITS)) - 1;
    let lo: Vec<u64> = (0..degree).map(|_| rng.random::<u64>() & lo_mask).collect();
    let hi: Vec<u64> = (0..degree).map(|_| rng.random::<u64>() & hi_mask).collect();

    let mut lo = Poly::try_convert_from(&lo[..], ctx, false, Representation::PowerBasis)?;
    let mut hi = Poly::try_convert_from(&hi[..], ctx, false, Representation::PowerBasis)?;
    lo.change_representation(Representation::Ntt);
    hi.change_representation(Representation::Ntt);

    // Constant polynomial 2^39, used to shift `hi` into place.
    let mut shift = vec![0u64; degree];
    shift[0] = 1u64 << SPLIT_BITS;
    let mut shift = Poly::try_convert_from(&shift[..], ctx, false, Representation::PowerBasis)?;
    shift.change_representation(Representation::Ntt);

    Ok(&(&hi * &shift) + &lo)
}

/// Add independent uniform noise of `noise_bits` bits to each component of
/// `ct`, which must sit at `level`.
pub fn flood_ciphertext<R: Rng + CryptoRng>(
    ct: &mut Ciphertext,
    par: &Arc<BfvParameters>,
    level: usize,
    noise_bits: usize,
    rng: &mut R,
) -> Result<(), OtError> {
    let e0 = uniform_poly(par, level, noise_bits, rng)?;
    let e1 = uniform_poly(par, level, noise_bits, rng)?;
    let noise = Ciphertext::new(vec![e0, e1], par)?;
    *ct = &*ct + &noise;
    Ok(())
}
