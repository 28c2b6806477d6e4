use std::fmt::{Display, Formatter};

use crate::error::{Result, RevError};

/// A control line together with the value it has to carry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Control {
    pub line: usize,
    pub polarity: bool,
}

impl Control {
    pub const fn positive(line: usize) -> Self {
        Self {
            line,
            polarity: true,
        }
    }

    pub const fn negative(line: usize) -> Self {
        Self {
            line,
            polarity: false,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum GateKind {
    Not,
    Cnot,
    Toffoli,
    Mct,
}

/// Mixed-polarity multiple-controlled Toffoli gate.
///
/// Flips `target` iff every control line carries its polarity. Controls are
/// kept sorted by line and never contain the target, so two gates are equal
/// iff they compute the same function.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct Gate {
    target: usize,
    controls: Vec<Control>,
}

// Constructors
impl Gate {
    pub fn new(target: usize, controls: impl IntoIterator<Item = Control>) -> Result<Self> {
        let mut controls: Vec<Control> = controls.into_iter().collect();
        controls.sort();
        if controls.iter().any(|c| c.line == target) {
            return Err(RevError::malformed(format!(
                "target line {} is also a control line",
                target
            )));
        }
        if controls.windows(2).any(|w| w[0].line == w[1].line) {
            return Err(RevError::malformed("duplicate control line"));
        }
        Ok(Self { target, controls })
    }

    pub fn not(target: usize) -> Self {
        Self {
            target,
            controls: Vec::new(),
        }
    }

    pub fn cnot(control: usize, target: usize) -> Result<Self> {
        Self::new(target, [Control::positive(control)])
    }

    pub fn toffoli(c1: usize, c2: usize, target: usize) -> Result<Self> {
        Self::new(target, [Control::positive(c1), Control::positive(c2)])
    }

    /// Gate with positive controls on every set bit of `mask`.
    pub fn from_mask(mask: u64, target: usize) -> Result<Self> {
        Self::new(target, crate::utils::bits(mask).map(Control::positive))
    }
}

// Getters
impl Gate {
    pub fn target(&self) -> usize {
        self.target
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn kind(&self) -> GateKind {
        match self.controls.len() {
            0 => GateKind::Not,
            1 => GateKind::Cnot,
            2 => GateKind::Toffoli,
            _ => GateKind::Mct,
        }
    }

    /// Largest line index touched by the gate.
    pub fn max_line(&self) -> usize {
        self.controls
            .iter()
            .map(|c| c.line)
            .chain(std::iter::once(self.target))
            .max()
            .unwrap_or(self.target)
    }

    /// `(lines, values)` masks: the gate fires on `x` iff `x & lines == values`.
    pub fn control_masks(&self) -> (u64, u64) {
        self.controls.iter().fold((0, 0), |(cs, ps), c| {
            let bit = 1u64 << c.line;
            (cs | bit, if c.polarity { ps | bit } else { ps })
        })
    }
}

// Simulation
impl Gate {
    /// Apply the gate to a state packed into a word (line `i` is bit `i`).
    pub fn apply(&self, state: u64) -> u64 {
        let (cs, ps) = self.control_masks();
        if state & cs == ps {
            state ^ (1 << self.target)
        } else {
            state
        }
    }

    /// Apply the gate to a state of arbitrary width.
    pub fn apply_bits(&self, state: &mut [bool]) {
        if self.controls.iter().all(|c| state[c.line] == c.polarity) {
            state[self.target] = !state[self.target];
        }
    }
}

impl Display for Gate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, c) in self.controls.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if !c.polarity {
                write!(f, "!")?;
            }
            write!(f, "{}", c.line)?;
        }
        write!(f, "] -> {}", self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_in_controls_is_rejected() {
        let res = Gate::new(1, [Control::positive(0), Control::negative(1)]);
        assert!(matches!(res, Err(RevError::MalformedInput(_))));
        assert!(Gate::cnot(2, 2).is_err());
    }

    #[test]
    fn test_duplicate_controls_are_rejected() {
        let res = Gate::new(2, [Control::positive(0), Control::negative(0)]);
        assert!(res.is_err());
    }

    #[test]
    fn test_controls_are_sorted() {
        let a = Gate::new(0, [Control::positive(3), Control::negative(1)]).unwrap();
        let b = Gate::new(0, [Control::negative(1), Control::positive(3)]).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "[!1 3] -> 0");
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Gate::not(0).kind(), GateKind::Not);
        assert_eq!(Gate::cnot(0, 1).unwrap().kind(), GateKind::Cnot);
        assert_eq!(Gate::toffoli(0, 1, 2).unwrap().kind(), GateKind::Toffoli);
        assert_eq!(Gate::from_mask(0b0111, 3).unwrap().kind(), GateKind::Mct);
    }

    #[test]
    fn test_apply() {
        let g = Gate::new(2, [Control::positive(0), Control::negative(1)]).unwrap();
        assert_eq!(g.apply(0b001), 0b101);
        assert_eq!(g.apply(0b011), 0b011);
        assert_eq!(g.apply(0b000), 0b000);

        let mut state = [true, false, false];
        g.apply_bits(&mut state);
        assert_eq!(state, [true, false, true]);
    }

    #[test]
    fn test_self_inverse() {
        let g = Gate::toffoli(0, 1, 2).unwrap();
        for x in 0..8 {
            assert_eq!(g.apply(g.apply(x)), x);
        }
    }
}
