//! Reversible circuits over a fixed number of lines.
//!
//! Line `i` corresponds to bit `i` of a packed state, so simulating a
//! circuit on the integer `x` runs it on the assignment whose line `i` is
//! `(x >> i) & 1`.

use std::fmt::{Display, Formatter};

use crate::error::{Result, RevError};
use crate::gate::Gate;

/// Per-line annotations carried along with the gates.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct LineInfo {
    pub input: String,
    pub output: String,
    /// Value the line must start with, if it is an ancilla.
    pub constant: Option<bool>,
    /// Whether the line's final value is of no interest.
    pub garbage: bool,
}

impl LineInfo {
    pub fn plain(line: usize) -> Self {
        Self {
            input: format!("x{}", line),
            output: format!("y{}", line),
            constant: None,
            garbage: false,
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Circuit {
    lines: Vec<LineInfo>,
    gates: Vec<Gate>,
}

impl Circuit {
    pub fn new(lines: usize) -> Self {
        Self {
            lines: (0..lines).map(LineInfo::plain).collect(),
            gates: Vec::new(),
        }
    }

    pub fn from_gates(lines: usize, gates: impl IntoIterator<Item = Gate>) -> Result<Self> {
        let mut circuit = Self::new(lines);
        for gate in gates {
            circuit.push(gate)?;
        }
        Ok(circuit)
    }

    pub fn lines(&self) -> usize {
        self.lines.len()
    }

    pub fn line_info(&self) -> &[LineInfo] {
        &self.lines
    }

    pub fn line_info_mut(&mut self) -> &mut [LineInfo] {
        &mut self.lines
    }

    /// Copy line annotations from another circuit of the same width.
    pub fn set_line_info(&mut self, info: Vec<LineInfo>) -> Result<()> {
        if info.len() != self.lines() {
            return Err(RevError::DimensionMismatch {
                expected: self.lines(),
                found: info.len(),
            });
        }
        self.lines = info;
        Ok(())
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    fn check_gate(&self, gate: &Gate) -> Result<()> {
        if gate.max_line() >= self.lines() {
            return Err(RevError::malformed(format!(
                "gate {} touches line {} of a {}-line circuit",
                gate,
                gate.max_line(),
                self.lines()
            )));
        }
        Ok(())
    }

    pub fn push(&mut self, gate: Gate) -> Result<()> {
        self.check_gate(&gate)?;
        self.gates.push(gate);
        Ok(())
    }

    pub fn insert(&mut self, index: usize, gate: Gate) -> Result<()> {
        self.check_gate(&gate)?;
        if index > self.gates.len() {
            return Err(RevError::malformed(format!(
                "gate position {} is out of range",
                index
            )));
        }
        self.gates.insert(index, gate);
        Ok(())
    }

    /// Same gates in the opposite order. Since every gate is self-inverse,
    /// this is the inverse circuit.
    pub fn reverse(&self) -> Circuit {
        let mut lines = self.lines.clone();
        for info in lines.iter_mut() {
            std::mem::swap(&mut info.input, &mut info.output);
        }
        Circuit {
            lines,
            gates: self.gates.iter().rev().cloned().collect(),
        }
    }

    /// `self` followed by `other`.
    pub fn concat(&self, other: &Circuit) -> Result<Circuit> {
        if self.lines() != other.lines() {
            return Err(RevError::DimensionMismatch {
                expected: self.lines(),
                found: other.lines(),
            });
        }
        let mut lines = self.lines.clone();
        for (info, tail) in lines.iter_mut().zip(other.lines.iter()) {
            info.output = tail.output.clone();
            info.garbage = tail.garbage;
        }
        Ok(Circuit {
            lines,
            gates: self.gates.iter().chain(other.gates.iter()).cloned().collect(),
        })
    }

    /// Run the circuit on a packed state.
    ///
    /// # Panics
    ///
    /// Panics if the circuit has more than 64 lines.
    pub fn simulate(&self, input: u64) -> u64 {
        assert!(self.lines() <= 64, "Packed simulation supports at most 64 lines");
        self.gates.iter().fold(input, |state, gate| gate.apply(state))
    }

    /// Run the circuit on a state of arbitrary width.
    pub fn simulate_bits(&self, input: &[bool]) -> Result<Vec<bool>> {
        if input.len() != self.lines() {
            return Err(RevError::DimensionMismatch {
                expected: self.lines(),
                found: input.len(),
            });
        }
        let mut state = input.to_vec();
        for gate in &self.gates {
            gate.apply_bits(&mut state);
        }
        Ok(state)
    }
}

// Costs
impl Circuit {
    /// Number of gate layers when gates on disjoint lines run in parallel.
    pub fn depth(&self) -> usize {
        let mut level = vec![0usize; self.lines()];
        let mut depth = 0;
        for gate in &self.gates {
            let touched = || {
                gate.controls()
                    .iter()
                    .map(|c| c.line)
                    .chain(std::iter::once(gate.target()))
            };
            let l = touched().map(|i| level[i]).max().unwrap_or(0) + 1;
            for i in touched() {
                level[i] = l;
            }
            depth = depth.max(l);
        }
        depth
    }

    /// NCV quantum cost.
    pub fn quantum_cost(&self) -> u64 {
        self.gates
            .iter()
            .map(|g| ncv_cost(g, self.lines()))
            .sum()
    }

    /// Number of T gates in a Clifford+T mapping.
    pub fn t_count(&self) -> u64 {
        self.gates
            .iter()
            .map(|g| 7 * toffoli_gates(g.controls().len(), self.lines()))
            .sum()
    }

    pub fn stats(&self) -> CircuitStats {
        CircuitStats {
            lines: self.lines(),
            gates: self.num_gates(),
            depth: self.depth(),
            quantum_cost: self.quantum_cost(),
            t_count: self.t_count(),
        }
    }
}

/// Number of Toffoli gates an MCT gate with `controls` controls decomposes into.
fn toffoli_gates(controls: usize, lines: usize) -> u64 {
    let enough_lines = (lines + 1) / 2 >= controls;
    match controls {
        0 | 1 => 0,
        2 => 1,
        3 => 4,
        4 => {
            if enough_lines {
                8
            } else {
                10
            }
        }
        c => {
            if enough_lines {
                4 * (c as u64 - 2)
            } else {
                8 * (c as u64 - 3)
            }
        }
    }
}

fn ncv_cost(gate: &Gate, lines: usize) -> u64 {
    let controls = gate.controls().len();
    if controls < 2 {
        return 1;
    }
    let all_negative = if gate.controls().iter().all(|c| !c.polarity) {
        if (lines + 1) / 2 >= controls {
            2
        } else {
            4
        }
    } else {
        0
    };
    5 * toffoli_gates(controls, lines) + all_negative
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CircuitStats {
    pub lines: usize,
    pub gates: usize,
    pub depth: usize,
    pub quantum_cost: u64,
    pub t_count: u64,
}

impl Display for CircuitStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lines: {}, gates: {}, depth: {}, quantum cost: {}, T-count: {}",
            self.lines, self.gates, self.depth, self.quantum_cost, self.t_count
        )
    }
}

impl Display for Circuit {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "circuit with {} lines", self.lines())?;
        for (i, info) in self.lines.iter().enumerate() {
            write!(f, "  {}: {} -> {}", i, info.input, info.output)?;
            if let Some(value) = info.constant {
                write!(f, " (constant {})", value as u8)?;
            }
            if info.garbage {
                write!(f, " (garbage)")?;
            }
            writeln!(f)?;
        }
        for gate in &self.gates {
            writeln!(f, "  {}", gate)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Control;

    fn sample() -> Circuit {
        Circuit::from_gates(
            3,
            [
                Gate::not(0),
                Gate::cnot(0, 1).unwrap(),
                Gate::toffoli(0, 1, 2).unwrap(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_push_rejects_out_of_range_line() {
        let mut c = Circuit::new(2);
        assert!(c.push(Gate::cnot(0, 2).unwrap()).is_err());
        assert!(c.is_empty());
    }

    #[test]
    fn test_simulate() {
        let c = sample();
        // 000 -> NOT x0 -> 001 -> CNOT -> 011 -> TOF -> 111
        assert_eq!(c.simulate(0b000), 0b111);
        assert_eq!(
            c.simulate_bits(&[false, false, false]).unwrap(),
            vec![true, true, true]
        );
        assert!(c.simulate_bits(&[false]).is_err());
    }

    #[test]
    fn test_reverse_is_inverse() {
        let c = sample();
        let r = c.reverse();
        for x in 0..8 {
            assert_eq!(r.simulate(c.simulate(x)), x);
        }
    }

    #[test]
    fn test_concat() {
        let c = sample();
        let cc = c.concat(&c.reverse()).unwrap();
        assert_eq!(cc.num_gates(), 6);
        for x in 0..8 {
            assert_eq!(cc.simulate(x), x);
        }

        let err = c.concat(&Circuit::new(4)).unwrap_err();
        assert_eq!(
            err,
            RevError::DimensionMismatch {
                expected: 3,
                found: 4
            }
        );
    }

    #[test]
    fn test_depth() {
        let c = Circuit::from_gates(
            4,
            [
                Gate::cnot(0, 1).unwrap(),
                Gate::cnot(2, 3).unwrap(),
                Gate::toffoli(1, 3, 0).unwrap(),
            ],
        )
        .unwrap();
        assert_eq!(c.depth(), 2);
        assert_eq!(Circuit::new(3).depth(), 0);
    }

    #[test]
    fn test_quantum_cost() {
        assert_eq!(sample().quantum_cost(), 1 + 1 + 5);

        let neg = Gate::new(2, [Control::negative(0), Control::negative(1)]).unwrap();
        let c = Circuit::from_gates(3, [neg]).unwrap();
        assert_eq!(c.quantum_cost(), 5 + 2);

        let mct = Gate::from_mask(0b1111, 4).unwrap();
        let c = Circuit::from_gates(5, [mct]).unwrap();
        assert_eq!(c.quantum_cost(), 5 * 10);
        assert_eq!(c.t_count(), 70);
    }
}
