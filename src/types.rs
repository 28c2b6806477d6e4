//! Literals over 1-indexed BDD variables.
use std::fmt;

/// A variable together with a polarity.
///
/// # Invariants
///
/// - Variable IDs are >= 1 (0 is reserved for terminals)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Lit {
    var: u32,
    negated: bool,
}

impl Lit {
    /// Positive literal of `var`.
    ///
    /// # Panics
    ///
    /// Panics if `var == 0`.
    pub fn pos(var: u32) -> Self {
        assert_ne!(var, 0, "Variable IDs must be >= 1");
        Lit { var, negated: false }
    }

    /// Negative literal of `var`.
    pub fn neg(var: u32) -> Self {
        assert_ne!(var, 0, "Variable IDs must be >= 1");
        Lit { var, negated: true }
    }

    pub fn from_dimacs(lit: i32) -> Self {
        if lit < 0 {
            Lit::neg(lit.unsigned_abs())
        } else {
            Lit::pos(lit as u32)
        }
    }

    pub fn to_dimacs(self) -> i32 {
        if self.negated {
            -(self.var as i32)
        } else {
            self.var as i32
        }
    }

    pub fn var(self) -> u32 {
        self.var
    }

    pub fn is_positive(self) -> bool {
        !self.negated
    }

    pub fn is_negative(self) -> bool {
        self.negated
    }
}

impl From<i32> for Lit {
    fn from(lit: i32) -> Self {
        Lit::from_dimacs(lit)
    }
}

impl std::ops::Not for Lit {
    type Output = Lit;

    fn not(self) -> Self::Output {
        Lit {
            var: self.var,
            negated: !self.negated,
        }
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "~")?;
        }
        write!(f, "x{}", self.var)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lit_dimacs() {
        assert_eq!(Lit::from(3).to_dimacs(), 3);
        assert_eq!(Lit::from(-3).to_dimacs(), -3);
        assert_eq!(!Lit::pos(3), Lit::neg(3));
        assert!(Lit::neg(2).is_negative());
        assert_eq!(Lit::neg(2).var(), 2);
        assert_eq!(Lit::neg(2).to_string(), "~x2");
    }

    #[test]
    #[should_panic(expected = "Variable IDs must be >= 1")]
    fn test_var_zero_panics() {
        Lit::pos(0);
    }
}
