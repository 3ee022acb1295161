//! Evaluator-side protocol executor.

use crypto_core::{AbstractChannel, Label};

use crate::ot::PqOt;

use super::{label_from_biguint, InputId, Party, ProtocolError, ProtocolExecutor, LABEL_BITLEN};

/// Pending batched choice bits, with the wire slots they will fill once the
/// transfer runs.
struct BatchState {
    choices: Vec<bool>,
    slots: Vec<(usize, usize)>,
}

/// Holds one live label per input wire: generator inputs arrive directly
/// over the channel, own inputs through oblivious transfer.
pub struct SemiHonestEva<C> {
    channel: C,
    ot: PqOt<C>,
    inputs: Vec<Vec<Label>>,
    batch: Option<BatchState>,
    batching_enabled: bool,
}

impl<C: AbstractChannel + Clone + Send + 'static> SemiHonestEva<C> {
    pub fn new(channel: C, ot: PqOt<C>, num_batched_inputs: usize) -> Self {
        let batching_enabled = num_batched_inputs > 0;
        Self {
            channel,
            ot,
            inputs: Vec::new(),
            batch: if batching_enabled {
                Some(BatchState {
                    choices: Vec::with_capacity(num_batched_inputs),
                    slots: Vec::with_capacity(num_batched_inputs),
                })
            } else {
                None
            },
            batching_enabled,
        }
    }

    fn push(&mut self, labels: Vec<Label>) -> InputId {
        self.inputs.push(labels);
        InputId(self.inputs.len() - 1)
    }
}

impl<C: AbstractChannel + Clone + Send + 'static> ProtocolExecutor for SemiHonestEva<C> {
    type Wire = Label;

    fn feed(&mut self, party: Party, bits: &[bool]) -> Result<InputId, ProtocolError> {
        match party {
            Party::Public => {
                let labels = bits
                    .iter()
                    .map(|&b| if b { Label::one() } else { Label::zero() })
                    .collect();
                Ok(self.push(labels))
            }
            Party::Generator => {
                let mut labels = Vec::with_capacity(bits.len());
                for _ in 0..bits.len() {
                    labels.push(self.channel.read_label()?);
                }
                Ok(self.push(labels))
            }
            Party::Evaluator => match self.batch {
                Some(ref mut batch) => {
                    // Placeholders get patched in when the batch runs.
                    let input_idx = self.inputs.len();
                    for (i, &b) in bits.iter().enumerate() {
                        batch.choices.push(b);
                        batch.slots.push((input_idx, i));
                    }
                    Ok(self.push(vec![Label::zero(); bits.len()]))
                }
                None => {
                    let msgs = self.ot.recv_ot(bits, LABEL_BITLEN)?;
                    let labels = msgs.iter().map(label_from_biguint).collect();
                    Ok(self.push(labels))
                }
            },
        }
    }

    fn wires(&self, id: InputId) -> Result<&[Label], ProtocolError> {
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
        let msgs = self.ot.recv_ot(&batch.choices, LABEL_BITLEN)?;
        for (&(input_idx, wire_idx), msg) in batch.slots.iter().zip(msgs.iter()) {
            self.inputs[input_idx][wire_idx] = label_from_biguint(msg);
        }
        Ok(())
    }

    fn reveal(&mut self, party: Party, wires: &[Label]) -> Result<Vec<bool>, ProtocolError> {
        // A public live label matches the generator's reserved pair, so both
        // sides agree on which wires skip the exchange.
        if matches!(party, Party::Generator | Party::Public) {
            for w in wires.iter().filter(|w| !w.is_public()) {
                self.channel.write_bool(w.color())?;
            }
            self.channel.flush()?;
        }
        if matches!(party, Party::Evaluator | Party::Public) {
            let mut bits = Vec::with_capacity(wires.len());
            for w in wires.iter() {
                let bit = if w.is_public() {
                    w.is_one()
                } else {
                    self.channel.read_bool()? != w.color()
                };
                bits.push(bit);
            }
            Ok(bits)
        } else {
            Ok(Vec::new())
        }
    }
}
