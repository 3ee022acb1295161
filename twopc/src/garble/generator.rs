//! The generator's side of the garbling engine.

use crypto_core::{AbstractChannel, AesRng, Label};

use super::gates::{garble_gen_gate, GateKind, LabelPair};
use super::{CircuitExecutor, GarbleError};

/// Garbles gates one at a time and streams the tables to the evaluator.
///
/// The gate id only advances for gates that produce a table, so both sides
/// stay in lockstep as long as they walk the same circuit. A wire whose
/// value is public is carried as a pair of two equal reserved labels and
/// never consumes a gate id.
pub struct GateGen<C> {
    channel: C,
    rng: AesRng,
    gid: usize,
}

impl<C: AbstractChannel> GateGen<C> {
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            rng: AesRng::new(),
            gid: 0,
        }
    }

    /// Sample a fresh input pair.
    pub fn input_pair(&mut self) -> LabelPair {
        LabelPair::random(&mut self.rng)
    }

    fn public_pair(value: bool) -> LabelPair {
        let label = if value { Label::one() } else { Label::zero() };
        LabelPair {
            zero: label,
            one: label,
        }
    }

    fn is_public(pair: &LabelPair) -> bool {
        pair.zero.is_public() && pair.zero == pair.one
    }

    fn public_value(pair: &LabelPair) -> bool {
        pair.zero.is_one()
    }

    fn tabled_gate(&mut self, a: &LabelPair, b: &LabelPair, kind: GateKind) -> Result<LabelPair, GarbleError> {
        let (out, table) = garble_gen_gate(&mut self.rng, a, b, self.gid, kind);
        for entry in table.iter() {
            self.channel.write_label(entry)?;
        }
        self.channel.flush()?;
        self.gid += 1;
        Ok(out)
    }
}

impl<C: AbstractChannel> CircuitExecutor for GateGen<C> {
    type Wire = LabelPair;

    fn public_wire(&self, value: bool) -> LabelPair {
        Self::public_pair(value)
    }

    fn and_gate(&mut self, a: &LabelPair, b: &LabelPair) -> Result<LabelPair, GarbleError> {
        if Self::is_public(a) || Self::is_public(b) {
            // A public 1 passes the other wire through, a public 0 wins.
            Ok(LabelPair {
                zero: a.zero & b.zero,
                one: a.one & b.one,
            })
        } else {
            self.tabled_gate(a, b, GateKind::And)
        }
    }

    fn xor_gate(&mut self, a: &LabelPair, b: &LabelPair) -> Result<LabelPair, GarbleError> {
        if Self::is_public(a) {
            if Self::public_value(a) {
                self.not_gate(b)
            } else {
                Ok(*b)
            }
        } else if Self::is_public(b) {
            if Self::public_value(b) {
                self.not_gate(a)
            } else {
                Ok(*a)
            }
        } else {
            self.tabled_gate(a, b, GateKind::Xor)
        }
    }

    fn not_gate(&mut self, a: &LabelPair) -> Result<LabelPair, GarbleError> {
        if Self::is_public(a) {
            Ok(Self::public_pair(!Self::public_value(a)))
        } else {
            // Free inversion: swap the roles of the two labels.
            Ok(LabelPair {
                zero: a.one,
                one: a.zero,
            })
        }
    }
}
