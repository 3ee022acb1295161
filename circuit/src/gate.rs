//! Define the structure of gates and circuits.

use crate::errors::CircuitEvalError;

/// `gate_id`: the gate id.
/// `lin_id`, `rin_id` are the wire ids of two fan-in gate inputs.
/// `out_id` is the wire id of the gate output.
#[derive(Clone, Debug, PartialEq)]
pub enum Gate {
    Xor {
        gate_id: usize,
        lin_id: usize,
        rin_id: usize,
        out_id: usize,
    },
    And {
        gate_id: usize,
        lin_id: usize,
        rin_id: usize,
        out_id: usize,
    },
    Inv {
        gate_id: usize,
        lin_id: usize,
        out_id: usize,
    },
}

/// Define a circuit.
///
/// Wires `0..ngen_wires` hold the generator's input, the next `neva_wires`
/// hold the evaluator's input, and the last `noutput_wires` wires hold the
/// output, in file order.
pub struct Circuit {
    /// Number of gates
    pub ngates: usize,
    /// Number of wires
    pub nwires: usize,
    /// Number of generator input wires
    pub ngen_wires: usize,
    /// Number of evaluator input wires
    pub neva_wires: usize,
    /// Number of output wires
    pub noutput_wires: usize,
    /// All gates in the circuit
    pub gates: Vec<Gate>,
    /// Number of AND gates
    pub nand: usize,
    /// Number of XOR gates
    pub nxor: usize,
    /// Number of INV gates
    pub ninv: usize,
}

impl Circuit {
    pub fn new(
        ngates: usize,
        nwires: usize,
        ngen_wires: usize,
        neva_wires: usize,
        noutput_wires: usize,
    ) -> Self {
        Circuit {
            ngates,
            nwires,
            ngen_wires,
            neva_wires,
            noutput_wires,
            gates: Vec::with_capacity(ngates),
            nand: 0,
            nxor: 0,
            ninv: 0,
        }
    }

    /// Evaluate the circuit in plaintext with the provided input bits.
    pub fn eval(
        &self,
        gen_inputs: &[bool],
        eva_inputs: &[bool],
    ) -> Result<Vec<bool>, CircuitEvalError> {
        if gen_inputs.len() != self.ngen_wires {
            return Err(CircuitEvalError::InvalidInputLength {
                expected: self.ngen_wires,
                got: gen_inputs.len(),
            });
        }
        if eva_inputs.len() != self.neva_wires {
            return Err(CircuitEvalError::InvalidInputLength {
                expected: self.neva_wires,
                got: eva_inputs.len(),
            });
        }

        let mut wires: Vec<Option<bool>> = vec![None; self.nwires];
        for (i, b) in gen_inputs.iter().enumerate() {
            wires[i] = Some(*b);
        }
        for (i, b) in eva_inputs.iter().enumerate() {
            wires[self.ngen_wires + i] = Some(*b);
        }

        for gate in self.gates.iter() {
            let (out_id, val) = match *gate {
                Gate::Xor {
                    lin_id,
                    rin_id,
                    out_id,
                    ..
                } => {
                    let x = wires[lin_id].ok_or(CircuitEvalError::UninitializedValue(lin_id))?;
                    let y = wires[rin_id].ok_or(CircuitEvalError::UninitializedValue(rin_id))?;
                    (out_id, x != y)
                }
                Gate::And {
                    lin_id,
                    rin_id,
                    out_id,
                    ..
                } => {
                    let x = wires[lin_id].ok_or(CircuitEvalError::UninitializedValue(lin_id))?;
                    let y = wires[rin_id].ok_or(CircuitEvalError::UninitializedValue(rin_id))?;
                    (out_id, x && y)
                }
                Gate::Inv { lin_id, out_id, .. } => {
                    let x = wires[lin_id].ok_or(CircuitEvalError::UninitializedValue(lin_id))?;
                    (out_id, !x)
                }
            };
            wires[out_id] = Some(val);
        }

        // The last `noutput_wires` slots store the output bits.
        wires[(self.nwires - self.noutput_wires)..]
            .iter()
            .enumerate()
            .map(|(i, w)| {
                w.ok_or(CircuitEvalError::UninitializedValue(
                    self.nwires - self.noutput_wires + i,
                ))
            })
            .collect()
    }
}
