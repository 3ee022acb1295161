//! Semi-honest two-party protocol executors: input feeding over oblivious
//! transfer, and output reveal by color bits.

pub mod eva;
pub mod gen;

pub use eva::SemiHonestEva;
pub use gen::SemiHonestGen;

use crypto_core::{AbstractChannel, Label};
use num_bigint::BigUint;

use crate::garble::{GarbleError, GateEva, GateGen};
use crate::ot::{OtError, OtRole, PqOt};

/// Wire labels are transferred as 256-bit messages.
pub const LABEL_BITLEN: usize = 256;

/// Who owns an input, or learns an output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Party {
    Public,
    Generator,
    Evaluator,
}

/// Handle to one fed input, indexing the executor's wire storage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputId(pub usize);

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("protocol io error")]
    IoError(#[from] std::io::Error),
    #[error("oblivious transfer failed")]
    OtError(#[from] OtError),
    #[error("garbling failed")]
    GarbleError(#[from] GarbleError),
    #[error("input batching is disabled for this session")]
    BatchingDisabled,
    #[error("batched oblivious transfer already performed")]
    BatchAlreadyDone,
    #[error("unknown input id {0}")]
    UnknownInput(usize),
}

/// The party-specific protocol surface. Both sides call the same operations
/// in the same order; the wire type differs per side.
pub trait ProtocolExecutor {
    type Wire: Copy;

    /// Feed one input belonging to `party`. The bit values are only
    /// meaningful on the side that owns the input (both sides for
    /// `Public`); the other side passes placeholders of the right length.
    fn feed(&mut self, party: Party, bits: &[bool]) -> Result<InputId, ProtocolError>;

    /// The wires of a fed input.
    fn wires(&self, id: InputId) -> Result<&[Self::Wire], ProtocolError>;

    /// Run the single batched oblivious transfer covering every evaluator
    /// input fed so far. Callable exactly once, and only when the session
    /// was set up with batching; afterwards evaluator inputs transfer
    /// directly.
    fn do_batched_ot(&mut self) -> Result<(), ProtocolError>;

    /// Reveal output wires to `party`. Only color bits travel; the result
    /// is empty on a side that does not learn the output.
    fn reveal(&mut self, party: Party, wires: &[Self::Wire]) -> Result<Vec<bool>, ProtocolError>;
}

/// Set up the generator's pair of executors over `channel`: the garbling
/// engine and the protocol executor sharing it. Runs the key exchange with
/// the evaluator's oblivious transfer endpoint.
///
/// `num_batched_inputs > 0` enables batched-input mode, deferring the
/// transfer of evaluator inputs to one `do_batched_ot` call.
pub fn setup_generator<C: AbstractChannel + Clone + Send + 'static>(
    channel: C,
    num_batched_inputs: usize,
    ot_threads: usize,
    plain_modulus_bitlen: usize,
) -> Result<(GateGen<C>, SemiHonestGen<C>), ProtocolError> {
    let mut ot = PqOt::new(OtRole::Sender, channel.clone(), ot_threads, plain_modulus_bitlen)?;
    ot.keygen()?;
    let exec = SemiHonestGen::new(channel.clone(), ot, num_batched_inputs);
    Ok((GateGen::new(channel), exec))
}

/// Evaluator counterpart of `setup_generator`.
pub fn setup_evaluator<C: AbstractChannel + Clone + Send + 'static>(
    channel: C,
    num_batched_inputs: usize,
    ot_threads: usize,
    plain_modulus_bitlen: usize,
) -> Result<(GateEva<C>, SemiHonestEva<C>), ProtocolError> {
    let mut ot = PqOt::new(
        OtRole::Receiver,
        channel.clone(),
        ot_threads,
        plain_modulus_bitlen,
    )?;
    ot.keygen()?;
    let exec = SemiHonestEva::new(channel.clone(), ot, num_batched_inputs);
    Ok((GateEva::new(channel), exec))
}

pub(crate) fn label_to_biguint(label: &Label) -> BigUint {
    BigUint::from_bytes_be(&label.to_bytes())
}

pub(crate) fn label_from_biguint(msg: &BigUint) -> Label {
    let bytes = msg.to_bytes_be();
    let mut buf = [0u8; 32];
    buf[32 - bytes.len()..].copy_from_slice(&bytes);
    Label::from_bytes(&buf)
}

#[cfg(test)]
mod tests {
    use std::thread;

    use circuit::Circuit;
    use crypto_core::local_channel_pair;

    use crate::garble::compute;

    use super::*;

    #[test]
    fn test_label_biguint_roundtrip() {
        let label = rand::random::<Label>();
        assert_eq!(label_from_biguint(&label_to_biguint(&label)), label);

        // Leading zero bytes shorten the big integer.
        let label = Label::from_bytes(&{
            let mut b = [0u8; 32];
            b[31] = 5;
            b
        });
        assert_eq!(label_from_biguint(&label_to_biguint(&label)), label);
    }

    fn to_bits(x: u64, n: usize) -> Vec<bool> {
        (0..n).map(|i| (x >> i) & 1 == 1).collect()
    }

    fn from_bits(bits: &[bool]) -> u64 {
        bits.iter()
            .enumerate()
            .map(|(i, b)| (*b as u64) << i)
            .sum()
    }

    /// Run a whole two-party computation on `path`, revealing the output to
    /// both parties, and return (generator view, evaluator view) as decimal
    /// strings.
    fn run_protocol(
        path: &'static str,
        gen_val: u64,
        eva_val: u64,
        batched: bool,
    ) -> (String, String) {
        let (gen_channel, eva_channel) = local_channel_pair();
        let circ = Circuit::load(path).unwrap();
        let n_gen = circ.ngen_wires;
        let n_eva = circ.neva_wires;

        let handle = thread::spawn(move || {
            let circ = Circuit::load(path).unwrap();
            let batch_size = if batched { n_eva } else { 0 };
            let (mut gc, mut exec) = setup_generator(gen_channel, batch_size, 2, 17).unwrap();

            let a = exec.feed(Party::Generator, &to_bits(gen_val, n_gen)).unwrap();
            let b = exec.feed(Party::Evaluator, &vec![false; n_eva]).unwrap();
            if batched {
                exec.do_batched_ot().unwrap();
            }

            let a_wires = exec.wires(a).unwrap().to_vec();
            let b_wires = exec.wires(b).unwrap().to_vec();
            let out = compute(&mut gc, &circ, &a_wires, &b_wires).unwrap();
            let bits = exec.reveal(Party::Public, &out).unwrap();
            from_bits(&bits).to_string()
        });

        let circ = Circuit::load(path).unwrap();
        let batch_size = if batched { n_eva } else { 0 };
        let (mut gc, mut exec) = setup_evaluator(eva_channel, batch_size, 2, 17).unwrap();

        let a = exec.feed(Party::Generator, &vec![false; n_gen]).unwrap();
        let b = exec.feed(Party::Evaluator, &to_bits(eva_val, n_eva)).unwrap();
        if batched {
            exec.do_batched_ot().unwrap();
        }

        let a_wires = exec.wires(a).unwrap().to_vec();
        let b_wires = exec.wires(b).unwrap().to_vec();
        let out = compute(&mut gc, &circ, &a_wires, &b_wires).unwrap();
        let bits = exec.reveal(Party::Public, &out).unwrap();
        let eva_view = from_bits(&bits).to_string();

        (handle.join().unwrap(), eva_view)
    }

    #[test]
    fn test_adder_32bit_batched() {
        let (gen_view, eva_view) = run_protocol(
            "../circuit/circuit_files/bristol/adder_32bit.txt",
            16807,
            282475249,
            true,
        );
        assert_eq!(gen_view, "282492056");
        assert_eq!(eva_view, "282492056");
    }

    #[test]
    fn test_mult_32bit_batched() {
        let (gen_view, eva_view) = run_protocol(
            "../circuit/circuit_files/bristol/mult_32bit.txt",
            16807,
            282475249,
            true,
        );
        assert_eq!(gen_view, "4747561509943");
        assert_eq!(eva_view, "4747561509943");
    }

    #[test]
    fn test_nand_32bit_direct() {
        let (gen_view, eva_view) = run_protocol(
            "../circuit/circuit_files/bristol/nand_32bit.txt",
            16807,
            282475249,
            false,
        );
        assert_eq!(gen_view, "4294967134");
        assert_eq!(eva_view, "4294967134");
    }

    #[test]
    fn test_reveal_to_one_party() {
        let (gen_channel, eva_channel) = local_channel_pair();
        let path = "../circuit/circuit_files/bristol/adder_32bit.txt";

        let handle = thread::spawn(move || {
            let circ = Circuit::load(path).unwrap();
            let (mut gc, mut exec) = setup_generator(gen_channel, 32, 1, 17).unwrap();
            let a = exec.feed(Party::Generator, &to_bits(100, 32)).unwrap();
            let b = exec.feed(Party::Evaluator, &vec![false; 32]).unwrap();
            exec.do_batched_ot().unwrap();
            let out = compute(
                &mut gc,
                &circ,
                &exec.wires(a).unwrap().to_vec(),
                &exec.wires(b).unwrap().to_vec(),
            )
            .unwrap();
            // The generator learns nothing when revealing to the evaluator.
            let hidden = exec.reveal(Party::Evaluator, &out).unwrap();
            assert!(hidden.is_empty());
            let mine = exec.reveal(Party::Generator, &out).unwrap();
            from_bits(&mine)
        });

        let circ = Circuit::load(path).unwrap();
        let (mut gc, mut exec) = setup_evaluator(eva_channel, 32, 1, 17).unwrap();
        let a = exec.feed(Party::Generator, &vec![false; 32]).unwrap();
        let b = exec.feed(Party::Evaluator, &to_bits(23, 32)).unwrap();
        exec.do_batched_ot().unwrap();
        let out = compute(
            &mut gc,
            &circ,
            &exec.wires(a).unwrap().to_vec(),
            &exec.wires(b).unwrap().to_vec(),
        )
        .unwrap();
        let mine = exec.reveal(Party::Evaluator, &out).unwrap();
        assert_eq!(from_bits(&mine), 123);
        let hidden = exec.reveal(Party::Generator, &out).unwrap();
        assert!(hidden.is_empty());

        assert_eq!(handle.join().unwrap(), 123);
    }

    #[test]
    fn test_reveal_public_wires_no_traffic() {
        let (gen_channel, eva_channel) = local_channel_pair();
        let gen_counter = gen_channel.clone();
        let eva_counter = eva_channel.clone();

        let handle = thread::spawn(move || {
            let (_gc, mut exec) = setup_generator(gen_channel, 0, 1, 17).unwrap();
            let id = exec.feed(Party::Public, &to_bits(0b1011, 4)).unwrap();
            let wires = exec.wires(id).unwrap().to_vec();

            // Public constants resolve locally; no color bits move.
            let before = (gen_counter.write_count(), gen_counter.read_count());
            let bits = exec.reveal(Party::Public, &wires).unwrap();
            assert_eq!(from_bits(&bits), 0b1011);
            assert_eq!(gen_counter.write_count(), before.0);
            assert_eq!(gen_counter.read_count(), before.1);

            // A mixed reveal only spends bits on the non-public wires.
            let secret = exec.feed(Party::Generator, &to_bits(0b10, 2)).unwrap();
            let mut mixed = exec.wires(secret).unwrap().to_vec();
            mixed.extend_from_slice(&wires);
            let before = gen_counter.write_count();
            let bits = exec.reveal(Party::Public, &mixed).unwrap();
            assert_eq!(from_bits(&bits), 0b1011_10);
            assert_eq!(gen_counter.write_count(), before + 2);
        });

        let (_gc, mut exec) = setup_evaluator(eva_channel, 0, 1, 17).unwrap();
        let id = exec.feed(Party::Public, &to_bits(0b1011, 4)).unwrap();
        let wires = exec.wires(id).unwrap().to_vec();

        let before = (eva_counter.write_count(), eva_counter.read_count());
        let bits = exec.reveal(Party::Public, &wires).unwrap();
        assert_eq!(from_bits(&bits), 0b1011);
        assert_eq!(eva_counter.write_count(), before.0);
        assert_eq!(eva_counter.read_count(), before.1);

        let secret = exec.feed(Party::Generator, &vec![false; 2]).unwrap();
        let mut mixed = exec.wires(secret).unwrap().to_vec();
        mixed.extend_from_slice(&wires);
        let before = eva_counter.write_count();
        let bits = exec.reveal(Party::Public, &mixed).unwrap();
        assert_eq!(from_bits(&bits), 0b1011_10);
        assert_eq!(eva_counter.write_count(), before + 2);

        handle.join().unwrap();
    }

    #[test]
    fn test_batched_ot_usage_errors() {
        let (gen_channel, eva_channel) = local_channel_pair();

        let handle = thread::spawn(move || {
            let (_gc, mut exec) = setup_generator(gen_channel, 8, 1, 17).unwrap();
            let _ = exec.feed(Party::Evaluator, &vec![false; 8]).unwrap();
            exec.do_batched_ot().unwrap();
            assert!(matches!(
                exec.do_batched_ot(),
                Err(ProtocolError::BatchAlreadyDone)
            ));
        });

        let (_gc, mut exec) = setup_evaluator(eva_channel, 8, 1, 17).unwrap();
        let _ = exec.feed(Party::Evaluator, &vec![true; 8]).unwrap();
        exec.do_batched_ot().unwrap();
        assert!(matches!(
            exec.do_batched_ot(),
            Err(ProtocolError::BatchAlreadyDone)
        ));
        handle.join().unwrap();
    }

    #[test]
    fn test_batched_ot_requires_batching() {
        let (gen_channel, eva_channel) = local_channel_pair();

        let handle = thread::spawn(move || {
            let (_gc, mut exec) = setup_generator(gen_channel, 0, 1, 17).unwrap();
            assert!(matches!(
                exec.do_batched_ot(),
                Err(ProtocolError::BatchingDisabled)
            ));
        });

        let (_gc, mut exec) = setup_evaluator(eva_channel, 0, 1, 17).unwrap();
        assert!(matches!(
            exec.do_batched_ot(),
            Err(ProtocolError::BatchingDisabled)
        ));
        handle.join().unwrap();
    }
}
