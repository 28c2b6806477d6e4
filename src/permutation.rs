//! Explicit reversible specifications.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::circuit::Circuit;
use crate::error::{Result, RevError};

/// Largest line count for which a table is ever materialized.
pub const MAX_EXPLICIT_LINES: usize = 24;

/// A permutation of `0..2^n`, read as the truth table of an `n`-line
/// reversible function: row `x` maps to `image(x)`.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct TruthTable {
    lines: usize,
    images: Vec<u64>,
}

impl TruthTable {
    /// Validate and wrap an image list.
    pub fn new(images: Vec<u64>) -> Result<Self> {
        let len = images.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(RevError::malformed(format!(
                "permutation length {} is not a power of two",
                len
            )));
        }
        let lines = len.trailing_zeros() as usize;
        if lines > MAX_EXPLICIT_LINES {
            return Err(RevError::malformed(format!(
                "{} lines are too many for an explicit table",
                lines
            )));
        }

        let mut seen = vec![false; len];
        for (x, &y) in images.iter().enumerate() {
            if y as usize >= len {
                return Err(RevError::NotReversible(format!(
                    "row {} maps to {}, outside 0..{}",
                    x, y, len
                )));
            }
            if seen[y as usize] {
                return Err(RevError::NotReversible(format!(
                    "value {} is the image of more than one row",
                    y
                )));
            }
            seen[y as usize] = true;
        }

        Ok(Self { lines, images })
    }

    pub fn identity(lines: usize) -> Self {
        Self {
            lines,
            images: (0..1u64 << lines).collect(),
        }
    }

    /// Tabulate a circuit by simulating every input.
    pub fn from_circuit(circuit: &Circuit) -> Result<Self> {
        let lines = circuit.lines();
        if lines > MAX_EXPLICIT_LINES {
            return Err(RevError::malformed(format!(
                "{} lines are too many for an explicit table",
                lines
            )));
        }
        let images = (0..1u64 << lines).map(|x| circuit.simulate(x)).collect();
        Ok(Self { lines, images })
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    /// Number of rows, `2^lines`.
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn image(&self, x: u64) -> u64 {
        self.images[x as usize]
    }

    pub fn images(&self) -> &[u64] {
        &self.images
    }

    pub fn inverse(&self) -> TruthTable {
        let mut images = vec![0; self.len()];
        for (x, &y) in self.images.iter().enumerate() {
            images[y as usize] = x as u64;
        }
        TruthTable {
            lines: self.lines,
            images,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.images.iter().enumerate().all(|(x, &y)| x as u64 == y)
    }

    /// Non-trivial cycles, each starting at its smallest element.
    pub fn cycles(&self) -> Vec<Vec<u64>> {
        let mut visited = vec![false; self.len()];
        let mut cycles = Vec::new();
        for start in 0..self.len() {
            if visited[start] {
                continue;
            }
            let mut cycle = Vec::new();
            let mut x = start;
            while !visited[x] {
                visited[x] = true;
                cycle.push(x as u64);
                x = self.images[x] as usize;
            }
            if cycle.len() > 1 {
                cycles.push(cycle);
            }
        }
        cycles
    }

    /// Rows as `input -> output` bit strings, line 0 rightmost.
    pub fn to_table_string(&self) -> String {
        let mut out = String::new();
        for (x, &y) in self.images.iter().enumerate() {
            out.push_str(&format!(
                "{:0w$b} -> {:0w$b}\n",
                x,
                y,
                w = self.lines.max(1)
            ));
        }
        out
    }
}

impl FromStr for TruthTable {
    type Err = RevError;

    /// Parse a whitespace-separated image list, e.g. `"0 1 2 4 3 5 6 7"`.
    fn from_str(s: &str) -> Result<Self> {
        let images = s
            .split_whitespace()
            .map(|token| {
                token
                    .parse::<u64>()
                    .map_err(|_| RevError::malformed(format!("`{}` is not a number", token)))
            })
            .collect::<Result<Vec<_>>>()?;
        TruthTable::new(images)
    }
}

impl Display for TruthTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, y) in self.images.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", y)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Gate;

    #[test]
    fn test_parse() {
        let tt: TruthTable = "0 1 2 4 3 5 6 7".parse().unwrap();
        assert_eq!(tt.lines(), 3);
        assert_eq!(tt.image(3), 4);
        assert_eq!(tt.image(4), 3);
        assert_eq!(tt.to_string(), "0 1 2 4 3 5 6 7");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "0 1 x 3".parse::<TruthTable>(),
            Err(RevError::MalformedInput(_))
        ));
        assert!(matches!(
            "0 1 2".parse::<TruthTable>(),
            Err(RevError::MalformedInput(_))
        ));
        assert!(matches!(
            "".parse::<TruthTable>(),
            Err(RevError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_non_bijection_is_rejected() {
        assert!(matches!(
            "0 1 1 3".parse::<TruthTable>(),
            Err(RevError::NotReversible(_))
        ));
        assert!(matches!(
            "0 1 2 4".parse::<TruthTable>(),
            Err(RevError::NotReversible(_))
        ));
    }

    #[test]
    fn test_inverse_and_cycles() {
        let tt: TruthTable = "1 2 0 3".parse().unwrap();
        assert_eq!(tt.inverse().images(), &[2, 0, 1, 3]);
        assert_eq!(tt.cycles(), vec![vec![0, 1, 2]]);
        assert!(!tt.is_identity());
        assert!(TruthTable::identity(2).is_identity());
        assert!(TruthTable::identity(2).cycles().is_empty());
    }

    #[test]
    fn test_from_circuit() {
        let c = Circuit::from_gates(2, [Gate::cnot(0, 1).unwrap()]).unwrap();
        let tt = TruthTable::from_circuit(&c).unwrap();
        assert_eq!(tt.images(), &[0, 3, 2, 1]);
    }

    #[test]
    fn test_table_string() {
        let tt: TruthTable = "1 0".parse().unwrap();
        assert_eq!(tt.to_table_string(), "0 -> 1\n1 -> 0\n");
    }
}
