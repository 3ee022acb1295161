//! Generator-side protocol executor.

use crypto_core::{AbstractChannel, AesRng, Label};
use num_bigint::BigUint;

use crate::garble::LabelPair;
use crate::ot::PqOt;

use super::{label_to_biguint, InputId, Party, ProtocolError, ProtocolExecutor, LABEL_BITLEN};

/// Feeds inputs as label pairs: own inputs by sending the live label,
/// evaluator inputs through oblivious transfer, public inputs as reserved
/// labels. Reveals outputs by exchanging color bits.
pub struct SemiHonestGen<C> {
    channel: C,
    ot: PqOt<C>,
    rng: AesRng,
    inputs: Vec<Vec<LabelPair>>,
    batch: Option<Vec<(BigUint, BigUint)>>,
    batching_enabled: bool,
}

impl<C: AbstractChannel + Clone + Send + 'static> SemiHonestGen<C> {
    /// `num_batched_inputs > 0` defers evaluator-input transfers into one
    /// batched oblivious transfer of that capacity.
    pub fn new(channel: C, ot: PqOt<C>, num_batched_inputs: usize) -> Self {
        let batching_enabled = num_batched_inputs > 0;
        Self {
            channel,
            ot,
            rng: AesRng::new(),
            inputs: Vec::new(),
            batch: if batching_enabled {
                Some(Vec::with_capacity(num_batched_inputs))
            } else {
                None
            },
            batching_enabled,
        }
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

    fn push(&mut self, pairs: Vec<LabelPair>) -> InputId {
        self.inputs.push(pairs);
        InputId(self.inputs.len() - 1)
    }
}

impl<C: AbstractChannel + Clone + Send + 'static> ProtocolExecutor for SemiHonestGen<C> {
    type Wire = LabelPair;

    fn feed(&mut self, party: Party, bits: &[bool]) -> Result<InputId, ProtocolError> {
        match party {
            Party::Public => {
                let pairs = bits.iter().map(|&b| Self::public_pair(b)).collect();
                Ok(self.push(pairs))
            }
            Party::Generator => {
                let pairs: Vec<LabelPair> =
                    (0..bits.len()).map(|_| LabelPair::random(&mut self.rng)).collect();
                for (pair, &b) in pairs.iter().zip(bits.iter()) {
                    self.channel.write_label(&pair.select(b))?;
                }
                self.channel.flush()?;
                Ok(self.push(pairs))
            }
            Party::Evaluator => {
                let pairs: Vec<LabelPair> =
                    (0..bits.len()).map(|_| LabelPair::random(&mut self.rng)).collect();
                let msgs: Vec<(BigUint, BigUint)> = pairs
                    .iter()
                    .map(|p| (label_to_biguint(&p.zero), label_to_biguint(&p.one)))
                    .collect();
                match self.batch {
                    Some(ref mut batch) => batch.extend(msgs),
                    None => self.ot.send_ot(&msgs, LABEL_BITLEN)?,
                }
                Ok(self.push(pairs))
            }
        }
    }

    fn wires(&self, id: InputId) -> Result<&[LabelPair], ProtocolError> {
        self.inputs
            .get(id.0)
            .map(|v| v.as_slice())
            .ok_or(ProtocolError::UnknownInput(id.0))
    }

    fn do_batched_ot(&mut self) -> Result<(), ProtocolError> {
        if !self.batching_enabled {
            return Err(ProtocolError::BatchingDisabled);
        }
        let batch = self.batch.take().ok_or(ProtocolError::BatchAlreadyDone)?;
        self.ot.send_ot(&batch, LABEL_BITLEN)?;
        Ok(())
    }

    fn reveal(&mut self, party: Party, wires: &[LabelPair]) -> Result<Vec<bool>, ProtocolError> {
        // Public wires carry the same reserved labels on both sides and
        // resolve locally; only non-public wires exchange a color bit.
        if matches!(party, Party::Evaluator | Party::Public) {
            for w in wires.iter().filter(|w| !Self::is_public(w)) {
                self.channel.write_bool(w.zero.color())?;
            }
            self.channel.flush()?;
        }
        if matches!(party, Party::Generator | Party::Public) {
            let mut bits = Vec::with_capacity(wires.len());
            for w in wires.iter() {
                let bit = if Self::is_public(w) {
                    w.zero.is_one()
                } else {
                    self.channel.read_bool()? != w.zero.color()
                };
                bits.push(bit);
            }
            Ok(bits)
        } else {
            Ok(Vec::new())
        }
    }
}
