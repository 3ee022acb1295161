//! Batch partitioning and message/slot packing.

use num_bigint::BigUint;
use num_traits::{One, ToPrimitive, Zero};

/// Split `total` transfers over `num_threads` workers, keeping whole
/// ciphertexts (`mult` messages each) together. Full chunks are dealt out
/// round-robin from worker 0; the worker after the last one to get an extra
/// chunk also picks up the sub-chunk remainder.
pub fn divide_iterations(total: usize, num_threads: usize, mult: usize) -> Vec<usize> {
    let num_chunks = total / mult;
    let per_thread = (num_chunks / num_threads) * mult;
    let mut iters = vec![per_thread; num_threads];
    let chunks_left = num_chunks % num_threads;
    for it in iters.iter_mut().take(chunks_left) {
        *it += mult;
    }
    iters[chunks_left] += total - num_chunks * mult;
    iters
}

/// Split a message into slot values, most significant chunk first.
pub fn msg_to_slots(msg: &BigUint, bitlen: usize, slot_bits: usize) -> Vec<u64> {
    let nslots = (bitlen + slot_bits - 1) / slot_bits;
    let mask = (BigUint::one() << slot_bits) - BigUint::one();
    (0..nslots)
        .map(|i| {
            let shift = slot_bits * (nslots - 1 - i);
            ((msg >> shift) & &mask).to_u64().unwrap()
        })
        .collect()
}

/// Reassemble a message from its slot values.
pub fn slots_to_msg(slots: &[u64], slot_bits: usize) -> BigUint {
    let mut msg = BigUint::zero();
    for &slot in slots.iter() {
        msg = (msg << slot_bits) | BigUint::from(slot);
    }
    msg
}
