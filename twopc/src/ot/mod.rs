//! Post-quantum 1-out-of-2 oblivious transfer over BFV homomorphic
//! encryption.
//!
//! The receiver owns the key pair and encrypts its choice bits, replicated
//! across the SIMD slots a message occupies. The sender homomorphically
//! computes `m0 * (1 - cb) + m1 * cb`, floods both ciphertext components
//! with wide uniform noise so nothing beyond the selected message leaks
//! through the decryption, and switches down to the last modulus before
//! replying. Large batches are split over worker threads; worker `i`
//! exchanges its frames on mux channel `i`, and the key travels on channel
//! 0 in a dedicated session.

pub mod errors;

mod flood;
mod pack;
mod params;

pub use errors::OtError;
pub use pack::divide_iterations;
pub use params::OtParams;

use std::thread;

use crypto_core::AbstractChannel;
use fhe::bfv::{Ciphertext, Encoding, Plaintext, PublicKey, SecretKey};
use fhe_traits::{
    DeserializeParametrized, FheDecoder, FheDecrypter, FheEncoder, FheEncrypter, Serialize,
};
use num_bigint::BigUint;
use tracing::debug;

use crate::mux::{ChannelMux, MuxSession};
use flood::flood_ciphertext;
use pack::{msg_to_slots, slots_to_msg};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OtRole {
    Sender,
    Receiver,
}

/// The receiver holds both halves of the key pair, the sender only the
/// public half.
pub struct OtKeys {
    public: PublicKey,
    secret: Option<SecretKey>,
}

/// A batched, threaded oblivious transfer endpoint.
pub struct PqOt<C> {
    role: OtRole,
    num_threads: usize,
    params: OtParams,
    mux: ChannelMux<C>,
    keys: Option<OtKeys>,
}

impl<C: AbstractChannel + Clone + Send + 'static> PqOt<C> {
    pub fn new(
        role: OtRole,
        channel: C,
        num_threads: usize,
        plain_modulus_bitlen: usize,
    ) -> Result<Self, OtError> {
        if num_threads == 0 || num_threads > 254 {
            return Err(OtError::InvalidThreadCount(num_threads));
        }
        let params = OtParams::new(plain_modulus_bitlen)?;
        let mux = ChannelMux::new(channel, num_threads)?;
        Ok(Self {
            role,
            num_threads,
            params,
            mux,
            keys: None,
        })
    }

    pub fn role(&self) -> OtRole {
        self.role
    }

    /// Generate (receiver) or install (sender) the BFV key pair. Must run
    /// on both endpoints, in its own mux session, before any transfer.
    pub fn keygen(&mut self) -> Result<(), OtError> {
        let session = self.mux.start();
        let keys = match self.role {
            OtRole::Receiver => {
                let mut rng = rand09::rng();
                let sk = SecretKey::random(&self.params.par, &mut rng);
                let pk = PublicKey::new(&sk, &mut rng);
                session.send(0, pk.to_bytes())?;
                OtKeys {
                    public: pk,
                    secret: Some(sk),
                }
            }
            OtRole::Sender => {
                let bytes = session.recv(0)?;
                let pk = PublicKey::from_bytes(&bytes, &self.params.par)?;
                OtKeys {
                    public: pk,
                    secret: None,
                }
            }
        };
        session.shutdown()?;
        self.keys = Some(keys);
        debug!(role = ?self.role, "ot keygen done");
        Ok(())
    }

    /// Sender side: obliviously transfer one of each `(m0, m1)` pair, as
    /// messages of `bitlen` bits.
    pub fn send_ot(&self, inputs: &[(BigUint, BigUint)], bitlen: usize) -> Result<(), OtError> {
        if self.keys.is_none() {
            return Err(OtError::MissingKey);
        }
        let msgs_per_ctxt = self.params.msgs_per_ctxt(bitlen);
        let iters = divide_iterations(inputs.len(), self.num_threads, msgs_per_ctxt);
        debug!(
            total = inputs.len(),
            threads = self.num_threads,
            msgs_per_ctxt,
            "ot send batch"
        );

        let session = self.mux.start();
        let result = thread::scope(|s| {
            let mut handles = Vec::with_capacity(self.num_threads);
            let mut offset = 0;
            for (i, &count) in iters.iter().enumerate() {
                let chunk = &inputs[offset..offset + count];
                offset += count;
                let session = &session;
                let params = &self.params;
                handles.push(s.spawn(move || sender_worker(i as u8, chunk, bitlen, params, session)));
            }
            let mut result = Ok(());
            for handle in handles {
                match handle.join() {
                    Ok(res) => result = result.and(res),
                    Err(_) => result = result.and(Err(OtError::ThreadPanic)),
                }
            }
            result
        });
        session.shutdown()?;
        result
    }

    /// Receiver side: obtain `m0` or `m1` per choice bit.
    pub fn recv_ot(&self, choices: &[bool], bitlen: usize) -> Result<Vec<BigUint>, OtError> {
        let keys = self.keys.as_ref().ok_or(OtError::MissingKey)?;
        let sk = keys.secret.as_ref().ok_or(OtError::NotReceiver)?;
        let msgs_per_ctxt = self.params.msgs_per_ctxt(bitlen);
        let iters = divide_iterations(choices.len(), self.num_threads, msgs_per_ctxt);
        debug!(
            total = choices.len(),
            threads = self.num_threads,
            msgs_per_ctxt,
            "ot recv batch"
        );

        let session = self.mux.start();
        let result = thread::scope(|s| {
            let mut handles = Vec::with_capacity(self.num_threads);
            let mut offset = 0;
            for (i, &count) in iters.iter().enumerate() {
                let chunk = &choices[offset..offset + count];
                offset += count;
                let session = &session;
                let params = &self.params;
                let pk = keys.public.clone();
                let sk = sk.clone();
                handles.push(
                    s.spawn(move || receiver_worker(i as u8, chunk, bitlen, params, pk, sk, session)),
                );
            }
            let mut out = Vec::with_capacity(choices.len());
            let mut err = None;
            for handle in handles {
                match handle.join() {
                    Ok(Ok(mut msgs)) => out.append(&mut msgs),
                    Ok(Err(e)) => err = err.or(Some(e)),
                    Err(_) => err = err.or(Some(OtError::ThreadPanic)),
                }
            }
            match err {
                Some(e) => Err(e),
                None => Ok(out),
            }
        });
        session.shutdown()?;
        result
    }

    /// Test-support check: disclose all pairs to the receiver so it can
    /// confirm the transfer. Never call this in a real protocol run.
    pub fn verify_send(&self, inputs: &[(BigUint, BigUint)]) -> Result<(), OtError> {
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = inputs
            .iter()
            .map(|(m0, m1)| (m0.to_bytes_be(), m1.to_bytes_be()))
            .collect();
        let session = self.mux.start();
        session.send(0, bincode::serialize(&pairs)?)?;
        session.shutdown()?;
        Ok(())
    }

    /// Counterpart of `verify_send`: compare every received message against
    /// the disclosed pair selected by the choice bit.
    pub fn verify_recv(&self, choices: &[bool], received: &[BigUint]) -> Result<bool, OtError> {
        let session = self.mux.start();
        let bytes = session.recv(0)?;
        session.shutdown()?;
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = bincode::deserialize(&bytes)?;

        if pairs.len() != choices.len() || received.len() != choices.len() {
            return Ok(false);
        }
        Ok(choices
            .iter()
            .zip(pairs.iter())
            .zip(received.iter())
            .all(|((&bit, (m0, m1)), got)| {
                *got == BigUint::from_bytes_be(if bit { m1 } else { m0 })
            }))
    }
}

fn sender_worker(
    id: u8,
    pairs: &[(BigUint, BigUint)],
    bitlen: usize,
    params: &OtParams,
    session: &MuxSession,
) -> Result<(), OtError> {
    if pairs.is_empty() {
        return Ok(());
    }
    let slots_per_msg = params.slots_per_msg(bitlen);
    let msgs_per_ctxt = params.msgs_per_ctxt(bitlen);
    let slot_bits = params.slot_bits();
    let mut rng = rand09::rng();
    let ones_raw = vec![1u64; params.degree];
    let ones = Plaintext::try_encode(&ones_raw[..], Encoding::simd(), &params.par)?;

    for batch in pairs.chunks(msgs_per_ctxt) {
        let bytes = session.recv(id)?;
        let cb = Ciphertext::from_bytes(&bytes, &params.par)?;

        let mut v0 = vec![0u64; params.degree];
        let mut v1 = vec![0u64; params.degree];
        for (m, (m0, m1)) in batch.iter().enumerate() {
            let base = m * slots_per_msg;
            v0[base..base + slots_per_msg].copy_from_slice(&msg_to_slots(m0, bitlen, slot_bits));
            v1[base..base + slots_per_msg].copy_from_slice(&msg_to_slots(m1, bitlen, slot_bits));
        }
        let pm0 = Plaintext::try_encode(&v0[..], Encoding::simd(), &params.par)?;
        let pm1 = Plaintext::try_encode(&v1[..], Encoding::simd(), &params.par)?;

        // cm = m0 * (1 - cb) + m1 * cb
        let mut cm = -&cb;
        cm = &cm + &ones;
        cm = &cm * &pm0;
        let c1 = &cb * &pm1;
        cm = &cm + &c1;

        for _ in 0..params.mod_switches_before_flood {
            cm.switch_down()?;
        }
        flood_ciphertext(
            &mut cm,
            &params.par,
            params.mod_switches_before_flood,
            params.flood_bits,
            &mut rng,
        )?;
        cm.switch_down()?;

        session.send(id, cm.to_bytes())?;
    }
    Ok(())
}

fn receiver_worker(
    id: u8,
    choices: &[bool],
    bitlen: usize,
    params: &OtParams,
    pk: PublicKey,
    sk: SecretKey,
    session: &MuxSession,
) -> Result<Vec<BigUint>, OtError> {
    if choices.is_empty() {
        return Ok(Vec::new());
    }
    let slots_per_msg = params.slots_per_msg(bitlen);
    let msgs_per_ctxt = params.msgs_per_ctxt(bitlen);
    let slot_bits = params.slot_bits();
    let mut rng = rand09::rng();

    // Send every choice ciphertext up front, then collect the replies.
    for chunk in choices.chunks(msgs_per_ctxt) {
        let mut v = vec![0u64; params.degree];
        for (m, &bit) in chunk.iter().enumerate() {
            if bit {
                let base = m * slots_per_msg;
                v[base..base + slots_per_msg].fill(1);
            }
        }
        let pt = Plaintext::try_encode(&v[..], Encoding::simd(), &params.par)?;
        let ct: Ciphertext = pk.try_encrypt(&pt, &mut rng)?;
        session.send(id, ct.to_bytes())?;
    }

    let mut out = Vec::with_capacity(choices.len());
    for chunk in choices.chunks(msgs_per_ctxt) {
        let bytes = session.recv(id)?;
        let ct = Ciphertext::from_bytes(&bytes, &params.par)?;
        let pt = sk.try_decrypt(&ct)?;
        let v = Vec::<u64>::try_decode(&pt, Encoding::simd())?;
        for m in 0..chunk.len() {
            let base = m * slots_per_msg;
            out.push(slots_to_msg(&v[base..base + slots_per_msg], slot_bits));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crypto_core::local_channel_pair;
    use num_bigint::RandBigInt;

    use super::*;

    fn run_ot(plain_modulus_bitlen: usize, bitlen: usize, count: usize, num_threads: usize) {
        let (left, right) = local_channel_pair();

        let mut rng = rand::thread_rng();
        let inputs: Vec<(BigUint, BigUint)> = (0..count)
            .map(|_| {
                (
                    rng.gen_biguint(bitlen as u64),
                    rng.gen_biguint(bitlen as u64),
                )
            })
            .collect();
        let choices: Vec<bool> = (0..count).map(|_| rand::random::<bool>()).collect();
        let expected: Vec<BigUint> = inputs
            .iter()
            .zip(choices.iter())
            .map(|((m0, m1), &b)| if b { m1.clone() } else { m0.clone() })
            .collect();

        let sender_inputs = inputs.clone();
        let handle = thread::spawn(move || {
            let mut ot = PqOt::new(OtRole::Sender, left, num_threads, plain_modulus_bitlen).unwrap();
            ot.keygen().unwrap();
            ot.send_ot(&sender_inputs, bitlen).unwrap();
            ot.verify_send(&sender_inputs).unwrap();
        });

        let mut ot = PqOt::new(OtRole::Receiver, right, num_threads, plain_modulus_bitlen).unwrap();
        ot.keygen().unwrap();
        let received = ot.recv_ot(&choices, bitlen).unwrap();
        assert_eq!(received, expected);
        assert!(ot.verify_recv(&choices, &received).unwrap());

        handle.join().unwrap();
    }

    #[test]
    fn test_ot_17bit_threaded() {
        run_ot(17, 256, 20, 2);
    }

    #[test]
    fn test_ot_17bit_short_messages() {
        run_ot(17, 1, 9, 3);
    }

    #[test]
    fn test_ot_33bit() {
        run_ot(33, 256, 4, 1);
    }

    #[test]
    fn test_transfer_without_keygen() {
        let (left, _right) = local_channel_pair();
        let ot = PqOt::new(OtRole::Sender, left, 1, 17).unwrap();
        assert!(matches!(
            ot.send_ot(&[], 256),
            Err(OtError::MissingKey)
        ));
    }

    #[test]
    fn test_invalid_thread_count() {
        let (left, _right) = local_channel_pair();
        assert!(matches!(
            PqOt::new(OtRole::Sender, left, 0, 17),
            Err(OtError::InvalidThreadCount(0))
        ));
        let (left, _right) = local_channel_pair();
        assert!(matches!(
            PqOt::new(OtRole::Sender, left, 255, 17),
            Err(OtError::InvalidThreadCount(255))
        ));
    }
}
