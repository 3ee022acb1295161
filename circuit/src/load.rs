//! Load old-style Bristol format circuits from files.

use anyhow::{anyhow, Context};
use regex::Regex;
use std::{
    fs::File,
    io::{BufRead, BufReader},
};

use crate::errors::CircuitLoadError;
use crate::gate::{Circuit, Gate};

/// Parse captures into a Vec
fn parse_to_vec<'a>(re: &Regex, line: &'a str) -> Result<Vec<&'a str>, CircuitLoadError> {
    let v: Vec<&'a str> = re
        .captures_iter(line)
        .map(|cap| {
            let s = cap.get(1).unwrap().as_str();
            s
        })
        .collect();
    Ok(v)
}

impl Circuit {
    /// Load and parse a circuit file in the old Bristol format:
    /// the first line is `ngates nwires`, the second is the wire counts of
    /// the generator input, the evaluator input and the output, then one
    /// gate per line (`2 1 a b c AND|XOR` or `1 1 a c INV`).
    pub fn load(filename: &str) -> Result<Self, CircuitLoadError> {
        let f = File::open(filename)
            .with_context(|| format!("Failed to read circuit from {}", filename))?;
        let mut reader = BufReader::new(f);

        // Parse first line: ngates nwires\n
        let mut line = String::new();
        let _ = reader.read_line(&mut line).context("Failed to read line")?;
        let re = Regex::new(r"(\d+)").context("Failed to compile regex")?;
        let line_1 = parse_to_vec(&re, &line)?;

        // Check first line has 2 values: ngates, nwires
        if line_1.len() != 2 {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Expecting line to be ngates, nwires: {}",
                line
            )));
        }

        let ngates: usize = line_1[0]
            .parse()
            .with_context(|| format!("Failed to parse ngates: {}", line_1[0]))?;
        let nwires: usize = line_1[1]
            .parse()
            .with_context(|| format!("Failed to parse nwires: {}", line_1[1]))?;

        // Parse second line: ngen_wires neva_wires noutput_wires\n
        let mut line = String::new();
        let _ = reader.read_line(&mut line).context("Failed to read line")?;
        let re = Regex::new(r"(\d+)\s*").context("Failed to compile regex")?;
        let line_2 = parse_to_vec(&re, &line)?;

        if line_2.len() != 3 {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Expecting line to be input and output wire counts: {}",
                line
            )));
        }

        let ngen_wires: usize = line_2[0]
            .parse()
            .with_context(|| format!("Failed to parse ngen_wires: {}", line_2[0]))?;
        let neva_wires: usize = line_2[1]
            .parse()
            .with_context(|| format!("Failed to parse neva_wires: {}", line_2[1]))?;
        let noutput_wires: usize = line_2[2]
            .parse()
            .with_context(|| format!("Failed to parse noutput_wires: {}", line_2[2]))?;

        let mut circ = Self::new(ngates, nwires, ngen_wires, neva_wires, noutput_wires);

        let re = Regex::new(r"(\d+|\S+)\s*").context("Failed to compile regex")?;

        let mut gate_id = 0;

        // Process gates
        for line in reader.lines() {
            let line = line.context("Failed to read line")?;
            if line.is_empty() {
                continue;
            }
            let gate_info = parse_to_vec(&re, &line)?;
            let gate_type = gate_info.last().unwrap();
            let gate = match *gate_type {
                "INV" => {
                    let lin_id: usize = gate_info[2].parse().context("Failed to parse gate")?;
                    let out_id: usize = gate_info[3].parse().context("Failed to parse gate")?;
                    circ.ninv += 1;
                    Gate::Inv {
                        gate_id,
                        lin_id,
                        out_id,
                    }
                }
                "AND" => {
                    let lin_id: usize = gate_info[2].parse().context("Failed to parse gate")?;
                    let rin_id: usize = gate_info[3].parse().context("Failed to parse gate")?;
                    let out_id: usize = gate_info[4].parse().context("Failed to parse gate")?;
                    circ.nand += 1;
                    Gate::And {
                        gate_id,
                        lin_id,
                        rin_id,
                        out_id,
                    }
                }
                "XOR" => {
                    let lin_id: usize = gate_info[2].parse().context("Failed to parse gate")?;
                    let rin_id: usize = gate_info[3].parse().context("Failed to parse gate")?;
                    let out_id: usize = gate_info[4].parse().context("Failed to parse gate")?;
                    circ.nxor += 1;
                    Gate::Xor {
                        gate_id,
                        lin_id,
                        rin_id,
                        out_id,
                    }
                }
                _ => {
                    return Err(CircuitLoadError::ParsingError(anyhow!(
                        "Encountered unsupported gate type: {}",
                        gate_type
                    )));
                }
            };
            circ.gates.push(gate);
            gate_id += 1;
        }
        if gate_id != ngates {
            return Err(CircuitLoadError::ParsingError(anyhow!(
                "Expecting {ngates} gates, parsed {gate_id}"
            )));
        }
        Ok(circ)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Bits of `x`, least significant first.
    fn to_bits(x: u64, n: usize) -> Vec<bool> {
        (0..n).map(|i| (x >> i) & 1 == 1).collect()
    }

    fn from_bits(bits: &[bool]) -> u64 {
        bits.iter()
            .enumerate()
            .map(|(i, b)| (*b as u64) << i)
            .sum()
    }

    #[test]
    fn test_parse_adder_32bit() {
        let circ = Circuit::load("circuit_files/bristol/adder_32bit.txt").unwrap();

        assert_eq!(circ.ngates, 157);
        assert_eq!(circ.nwires, 221);
        assert_eq!(circ.ngen_wires, 32);
        assert_eq!(circ.neva_wires, 32);
        assert_eq!(circ.noutput_wires, 33);
        assert_eq!(circ.nand, 63);
        assert_eq!(circ.nxor, 94);
        assert_eq!(circ.ninv, 0);

        let output = circ
            .eval(&to_bits(16807, 32), &to_bits(282475249, 32))
            .unwrap();
        assert_eq!(from_bits(&output), 16807 + 282475249);

        // Carry out of the top bit.
        let output = circ
            .eval(&to_bits(u32::MAX as u64, 32), &to_bits(1, 32))
            .unwrap();
        assert_eq!(from_bits(&output), 1u64 << 32);
    }

    #[test]
    fn test_parse_mult_32bit() {
        let circ = Circuit::load("circuit_files/bristol/mult_32bit.txt").unwrap();

        assert_eq!(circ.ngates, 5888);
        assert_eq!(circ.nwires, 5952);
        assert_eq!(circ.ngen_wires, 32);
        assert_eq!(circ.neva_wires, 32);
        assert_eq!(circ.noutput_wires, 64);
        assert_eq!(circ.nand, 2976);
        assert_eq!(circ.nxor, 2912);
        assert_eq!(circ.ninv, 0);

        let output = circ
            .eval(&to_bits(16807, 32), &to_bits(282475249, 32))
            .unwrap();
        assert_eq!(from_bits(&output), 16807 * 282475249);

        let output = circ
            .eval(&to_bits(u32::MAX as u64, 32), &to_bits(u32::MAX as u64, 32))
            .unwrap();
        assert_eq!(from_bits(&output), (u32::MAX as u64) * (u32::MAX as u64));
    }

    #[test]
    fn test_parse_nand_32bit() {
        let circ = Circuit::load("circuit_files/bristol/nand_32bit.txt").unwrap();

        assert_eq!(circ.ngates, 64);
        assert_eq!(circ.nwires, 128);
        assert_eq!(circ.ngen_wires, 32);
        assert_eq!(circ.neva_wires, 32);
        assert_eq!(circ.noutput_wires, 32);
        assert_eq!(circ.nand, 32);
        assert_eq!(circ.nxor, 0);
        assert_eq!(circ.ninv, 32);

        let output = circ
            .eval(&to_bits(16807, 32), &to_bits(282475249, 32))
            .unwrap();
        assert_eq!(from_bits(&output), !(16807u64 & 282475249) & 0xFFFF_FFFF);
    }

    #[test]
    fn test_wrong_input_length() {
        let circ = Circuit::load("circuit_files/bristol/adder_32bit.txt").unwrap();
        assert!(circ.eval(&to_bits(0, 16), &to_bits(0, 32)).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(Circuit::load("circuit_files/bristol/no_such_circuit.txt").is_err());
    }
}
