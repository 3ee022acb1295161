//! Garbled circuit engine with 256-bit labels, point-and-permute and
//! public-value shortcut gates.

pub mod evaluator;
pub mod gates;
pub mod generator;

pub use evaluator::GateEva;
pub use gates::{
    encrypt_label, garble_eval_gate, garble_gen_gate, GateKind, LabelPair,
};
pub use generator::GateGen;

use circuit::{Circuit, Gate};

#[derive(Debug, thiserror::Error)]
pub enum GarbleError {
    #[error("garble io error")]
    IoError(#[from] std::io::Error),
    #[error("uninitialized wire {0}")]
    UninitializedWire(usize),
}

/// The two parties run a circuit through the same interface: the generator
/// over label pairs, the evaluator over single labels.
pub trait CircuitExecutor {
    type Wire: Copy;

    /// The wire carrying a public constant.
    fn public_wire(&self, value: bool) -> Self::Wire;

    fn and_gate(&mut self, a: &Self::Wire, b: &Self::Wire) -> Result<Self::Wire, GarbleError>;
    fn xor_gate(&mut self, a: &Self::Wire, b: &Self::Wire) -> Result<Self::Wire, GarbleError>;
    fn not_gate(&mut self, a: &Self::Wire) -> Result<Self::Wire, GarbleError>;
}

/// Walk `circ` in file order over `exec`, starting from the two parties'
/// input wires. Returns the output wires, in file order.
///
/// Both parties must call this with the same circuit: the garbled tables
/// for non-shortcut gates travel over the channel in lockstep.
pub fn compute<E: CircuitExecutor>(
    exec: &mut E,
    circ: &Circuit,
    gen_wires: &[E::Wire],
    eva_wires: &[E::Wire],
) -> Result<Vec<E::Wire>, GarbleError> {
    let mut wires: Vec<Option<E::Wire>> = vec![None; circ.nwires];
    for (i, w) in gen_wires.iter().enumerate() {
        wires[i] = Some(*w);
    }
    for (i, w) in eva_wires.iter().enumerate() {
        wires[circ.ngen_wires + i] = Some(*w);
    }

    for gate in circ.gates.iter() {
        let (out_id, w) = match *gate {
            Gate::And {
                lin_id,
                rin_id,
                out_id,
                ..
            } => {
                let x = wires[lin_id].ok_or(GarbleError::UninitializedWire(lin_id))?;
                let y = wires[rin_id].ok_or(GarbleError::UninitializedWire(rin_id))?;
                (out_id, exec.and_gate(&x, &y)?)
            }
            Gate::Xor {
                lin_id,
                rin_id,
                out_id,
                ..
            } => {
                let x = wires[lin_id].ok_or(GarbleError::UninitializedWire(lin_id))?;
                let y = wires[rin_id].ok_or(GarbleError::UninitializedWire(rin_id))?;
                (out_id, exec.xor_gate(&x, &y)?)
            }
            Gate::Inv { lin_id, out_id, .. } => {
                let x = wires[lin_id].ok_or(GarbleError::UninitializedWire(lin_id))?;
                (out_id, exec.not_gate(&x)?)
            }
        };
        wires[out_id] = Some(w);
    }

    wires[(circ.nwires - circ.noutput_wires)..]
        .iter()
        .enumerate()
        .map(|(i, w)| {
            w.ok_or(GarbleError::UninitializedWire(
                circ.nwires - circ.noutput_wires + i,
            ))
        })
        .collect()
}
