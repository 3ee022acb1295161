//! The evaluator's side of the garbling engine.

use crypto_core::{AbstractChannel, Label};

use super::gates::garble_eval_gate;
use super::{CircuitExecutor, GarbleError};

/// Holds one live label per wire and decrypts streamed garbled tables.
pub struct GateEva<C> {
    channel: C,
    gid: usize,
}

impl<C: AbstractChannel> GateEva<C> {
    pub fn new(channel: C) -> Self {
        Self { channel, gid: 0 }
    }

    fn tabled_gate(&mut self, a: &Label, b: &Label) -> Result<Label, GarbleError> {
        let mut table = [Label::zero(); 4];
        for entry in table.iter_mut() {
            *entry = self.channel.read_label()?;
        }
        let out = garble_eval_gate(a, b, self.gid, &table);
        self.gid += 1;
        Ok(out)
    }
}

impl<C: AbstractChannel> CircuitExecutor for GateEva<C> {
    type Wire = Label;

    fn public_wire(&self, value: bool) -> Label {
        if value {
            Label::one()
        } else {
            Label::zero()
        }
    }

    fn and_gate(&mut self, a: &Label, b: &Label) -> Result<Label, GarbleError> {
        if a.is_public() || b.is_public() {
            Ok(*a & *b)
        } else {
            self.tabled_gate(a, b)
        }
    }

    fn xor_gate(&mut self, a: &Label, b: &Label) -> Result<Label, GarbleError> {
        if a.is_public() {
            if a.is_one() {
                self.not_gate(b)
            } else {
                Ok(*b)
            }
        } else if b.is_public() {
            if b.is_one() {
                self.not_gate(a)
            } else {
                Ok(*a)
            }
        } else {
            self.tabled_gate(a, b)
        }
    }

    fn not_gate(&mut self, a: &Label) -> Result<Label, GarbleError> {
        if a.is_public() {
            Ok(if a.is_one() {
                Label::zero()
            } else {
                Label::one()
            })
        } else {
            // The generator swapped the pair, the live label stays put.
            Ok(*a)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use circuit::Circuit;
    use crypto_core::local_channel_pair;

    use crate::garble::{compute, GateGen};

    use super::*;

    /// Garble and evaluate one circuit with both inputs known to the test,
    /// sending the live input labels directly over the channel. Exercises
    /// the garbling without the oblivious transfer layer.
    fn run_two_party(path: &'static str, gen_val: u64, eva_val: u64) -> Vec<bool> {
        let (gen_channel, eva_channel) = local_channel_pair();
        let circ = Circuit::load(path).unwrap();
        let n_gen = circ.ngen_wires;
        let n_eva = circ.neva_wires;

        let gen_handle = thread::spawn(move || {
            let circ = Circuit::load(path).unwrap();
            let mut channel = gen_channel.clone();
            let mut gen = GateGen::new(gen_channel);

            let gen_pairs: Vec<_> = (0..n_gen).map(|_| gen.input_pair()).collect();
            let eva_pairs: Vec<_> = (0..n_eva).map(|_| gen.input_pair()).collect();
            for (i, pair) in gen_pairs.iter().enumerate() {
                channel.write_label(&pair.select((gen_val >> i) & 1 == 1)).unwrap();
            }
            for (i, pair) in eva_pairs.iter().enumerate() {
                channel.write_label(&pair.select((eva_val >> i) & 1 == 1)).unwrap();
            }
            channel.flush().unwrap();

            compute(&mut gen, &circ, &gen_pairs, &eva_pairs).unwrap()
        });

        let mut channel = eva_channel.clone();
        let mut eva = GateEva::new(eva_channel);
        let gen_wires: Vec<_> = (0..n_gen).map(|_| channel.read_label().unwrap()).collect();
        let eva_wires: Vec<_> = (0..n_eva).map(|_| channel.read_label().unwrap()).collect();
        let out = compute(&mut eva, &circ, &gen_wires, &eva_wires).unwrap();

        let out_pairs = gen_handle.join().unwrap();
        out.iter()
            .zip(out_pairs.iter())
            .map(|(label, pair)| {
                assert!(*label == pair.zero || *label == pair.one);
                *label == pair.one
            })
            .collect()
    }

    fn from_bits(bits: &[bool]) -> u64 {
        bits.iter()
            .enumerate()
            .map(|(i, b)| (*b as u64) << i)
            .sum()
    }

    #[test]
    fn test_garble_adder_32bit() {
        let out = run_two_party(
            "../circuit/circuit_files/bristol/adder_32bit.txt",
            16807,
            282475249,
        );
        assert_eq!(from_bits(&out), 16807 + 282475249);
    }

    #[test]
    fn test_garble_nand_32bit() {
        let out = run_two_party(
            "../circuit/circuit_files/bristol/nand_32bit.txt",
            16807,
            282475249,
        );
        assert_eq!(from_bits(&out), !(16807u64 & 282475249) & 0xFFFF_FFFF);
    }

    #[test]
    fn test_public_shortcuts() {
        let (gen_channel, eva_channel) = local_channel_pair();
        let gen_counter = gen_channel.clone();
        let eva_counter = eva_channel.clone();

        // Pure public-value computation never touches the channel.
        let mut gen = GateGen::new(gen_channel);
        let mut eva = GateEva::new(eva_channel);

        for a in [false, true] {
            for b in [false, true] {
                let ga = gen.public_wire(a);
                let gb = gen.public_wire(b);
                let ea = eva.public_wire(a);
                let eb = eva.public_wire(b);

                let g_and = gen.and_gate(&ga, &gb).unwrap();
                let e_and = eva.and_gate(&ea, &eb).unwrap();
                assert_eq!(g_and.zero.is_one(), a && b);
                assert_eq!(e_and.is_one(), a && b);

                let g_xor = gen.xor_gate(&ga, &gb).unwrap();
                let e_xor = eva.xor_gate(&ea, &eb).unwrap();
                assert_eq!(g_xor.zero.is_one(), a != b);
                assert_eq!(e_xor.is_one(), a != b);
            }
            let ga = gen.public_wire(a);
            let ea = eva.public_wire(a);
            assert_eq!(gen.not_gate(&ga).unwrap().zero.is_one(), !a);
            assert_eq!(eva.not_gate(&ea).unwrap().is_one(), !a);
        }

        assert_eq!(gen_counter.write_count(), 0);
        assert_eq!(eva_counter.read_count(), 0);
    }
}
