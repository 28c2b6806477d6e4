//! Transformation-based synthesis on an explicit truth table.
//!
//! Rows are visited in ascending order. Whenever row `i` does not yet map to
//! itself, Toffoli gates are added until it does, without disturbing any
//! smaller row. Gates either act on the output side of the remaining table
//! (they end up at the back of the circuit) or, in bidirectional mode, on the
//! input side (they end up at the front).

use log::debug;

use crate::circuit::Circuit;
use crate::error::Result;
use crate::gate::Gate;
use crate::permutation::TruthTable;
use crate::utils::bits;

use super::Synthesizer;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct TbsOptions {
    /// Also consider fixing a row from the input side when that needs fewer
    /// bit flips. Without it, the first row is handled by NOT gates.
    pub bidirectional: bool,
}

impl Default for TbsOptions {
    fn default() -> Self {
        Self {
            bidirectional: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Tbs {
    pub options: TbsOptions,
}

impl Tbs {
    pub fn new(options: TbsOptions) -> Self {
        Self { options }
    }

    pub fn unidirectional() -> Self {
        Self::new(TbsOptions {
            bidirectional: false,
        })
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Direction {
    /// Gates act on the outputs of the table.
    Back,
    /// Gates act on the inputs of the table.
    Front,
}

/// Working state: `perm[x]` is the current image of input `x`.
struct Worktable {
    perm: Vec<u64>,
    front: Vec<Gate>,
    back: Vec<Gate>,
}

impl Worktable {
    fn apply(&mut self, gate: Gate, dir: Direction) {
        match dir {
            Direction::Back => {
                for y in self.perm.iter_mut() {
                    *y = gate.apply(*y);
                }
                self.back.push(gate);
            }
            Direction::Front => {
                // perm := perm ∘ gate, gate being an involution
                let old = self.perm.clone();
                for (x, y) in self.perm.iter_mut().enumerate() {
                    *y = old[gate.apply(x as u64) as usize];
                }
                self.front.push(gate);
            }
        }
    }

    /// Add gates turning `input` into `output` on the side given by `dir`.
    fn adjust_line(&mut self, input: u64, output: u64, dir: Direction) -> Result<()> {
        let diff = input ^ output;
        let (p, q, mut mask) = match dir {
            Direction::Back => (diff & input, diff & output, output),
            Direction::Front => (diff & output, diff & input, input),
        };

        // 0 -> 1
        for bit in bits(p) {
            self.apply(Gate::from_mask(mask, bit)?, dir);
            mask |= 1 << bit;
        }
        // 1 -> 0
        for bit in bits(q) {
            mask &= !(1 << bit);
            self.apply(Gate::from_mask(mask, bit)?, dir);
        }
        Ok(())
    }

    fn into_circuit(self, lines: usize) -> Result<Circuit> {
        let gates = self.front.into_iter().chain(self.back.into_iter().rev());
        Circuit::from_gates(lines, gates)
    }
}

impl Synthesizer<TruthTable> for Tbs {
    fn synthesize(&self, spec: &TruthTable) -> Result<Circuit> {
        let bidirectional = self.options.bidirectional;
        debug!(
            "tbs: {} lines, bidirectional = {}",
            spec.lines(),
            bidirectional
        );

        let mut table = Worktable {
            perm: spec.images().to_vec(),
            front: Vec::new(),
            back: Vec::new(),
        };

        let start = if bidirectional {
            0
        } else {
            for bit in bits(table.perm[0]) {
                table.apply(Gate::not(bit), Direction::Back);
            }
            1
        };

        for i in start..table.perm.len() {
            let row = i as u64;
            let image = table.perm[i];
            if image == row {
                continue;
            }

            let mut step = (row, image, Direction::Back);
            if bidirectional {
                // Rows below `i` are fixed, so the preimage of `i` lies above it.
                if let Some(other) = table.perm.iter().position(|&y| y == row) {
                    let other = other as u64;
                    if (other ^ row).count_ones() < (row ^ image).count_ones() {
                        step = (other, row, Direction::Front);
                    }
                }
            }

            let (input, output, dir) = step;
            debug!("tbs: row {}: {} -> {} ({:?})", i, input, output, dir);
            table.adjust_line(input, output, dir)?;
        }

        let circuit = table.into_circuit(spec.lines())?;
        debug!("tbs: {} gates", circuit.num_gates());
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    fn check(tbs: &Tbs, spec: &TruthTable) -> Circuit {
        let circuit = tbs.synthesize(spec).unwrap();
        assert_eq!(circuit.lines(), spec.lines());
        for x in 0..spec.len() as u64 {
            assert_eq!(circuit.simulate(x), spec.image(x), "row {}", x);
        }
        circuit
    }

    /// All permutations of `0..n`, in no particular order.
    fn permutations(n: u64) -> Vec<Vec<u64>> {
        if n == 0 {
            return vec![vec![]];
        }
        let mut result = Vec::new();
        for p in permutations(n - 1) {
            for pos in 0..=p.len() {
                let mut q = p.clone();
                q.insert(pos, n - 1);
                result.push(q);
            }
        }
        result
    }

    #[test]
    fn test_swap_of_two_rows() {
        let spec: TruthTable = "0 1 2 4 3 5 6 7".parse().unwrap();
        check(&Tbs::default(), &spec);
        check(&Tbs::unidirectional(), &spec);
    }

    #[test]
    fn test_identity_gives_empty_circuit() {
        let spec = TruthTable::identity(3);
        assert!(check(&Tbs::default(), &spec).is_empty());
        assert!(check(&Tbs::unidirectional(), &spec).is_empty());
    }

    #[test]
    fn test_all_two_line_functions() {
        for images in permutations(4) {
            let spec = TruthTable::new(images).unwrap();
            check(&Tbs::default(), &spec);
            check(&Tbs::unidirectional(), &spec);
        }
    }

    #[test]
    fn test_first_step_uses_not_gates() {
        let spec: TruthTable = "3 2 1 0".parse().unwrap();
        let circuit = check(&Tbs::unidirectional(), &spec);
        assert_eq!(circuit.gates(), &[Gate::not(1), Gate::not(0)]);
    }

    #[test]
    fn test_front_gates_come_first() {
        // Row 1 is reached from input 3 with a single flip, while 1 -> 2
        // needs two.
        let spec: TruthTable = "0 2 3 1".parse().unwrap();
        let circuit = check(&Tbs::default(), &spec);
        assert_eq!(circuit.num_gates(), 2);
        assert_eq!(circuit.gates()[0], Gate::cnot(0, 1).unwrap());
    }

    #[test]
    fn test_three_line_samples() {
        for s in ["7 2 3 6 1 4 5 0", "1 0 3 2 5 7 4 6", "0 6 5 3 4 2 1 7"] {
            let spec: TruthTable = s.parse().unwrap();
            check(&Tbs::default(), &spec);
            check(&Tbs::unidirectional(), &spec);
        }
    }
}
