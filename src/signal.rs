use std::fmt::{Debug, Display, Formatter};
use std::ops::Not;

/// Possibly complemented edge of an And-Inverter Graph.
///
/// The lowest bit is the complement flag. The remaining bits hold either 0
/// (constant false), an AND node index plus one, or the bitwise complement of
/// an input index (marked by the top bit).
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Signal(u32);

const MAGIC: u32 = 1 << 31; // 0x8000_0000

// Constructors
impl Signal {
    pub const fn zero() -> Self {
        Self(0)
    }

    pub const fn one() -> Self {
        Self(1)
    }

    const fn from_index(index: u32) -> Self {
        // Note: index 0 is reserved for constant 0.
        Self(index << 1)
    }

    /// Output of the AND node `node`.
    pub const fn from_node(node: u32) -> Self {
        Self::from_index(node + 1)
    }

    /// Primary input `input`.
    pub const fn from_input(input: u32) -> Self {
        Self::from_index(!input)
    }
}

// Getters
impl Signal {
    const fn index(&self) -> u32 {
        self.0 >> 1
    }

    pub const fn node(&self) -> u32 {
        assert!(self.is_node());
        self.index() - 1
    }

    pub const fn input(&self) -> u32 {
        assert!(self.is_input());
        !self.index() & !MAGIC
    }

    /// The same signal without the complement flag.
    pub const fn regular(self) -> Self {
        Self(self.0 & !1)
    }
}

// Checks
impl Signal {
    pub const fn is_const(&self) -> bool {
        self.index() == 0
    }

    pub const fn is_input(&self) -> bool {
        self.0 & MAGIC != 0
    }

    pub const fn is_node(&self) -> bool {
        !self.is_input() && !self.is_const()
    }

    pub const fn is_negated(&self) -> bool {
        // False for inputs, nodes, zero.
        // True for complement, one.
        self.0 & 1 != 0
    }
}

impl From<bool> for Signal {
    fn from(b: bool) -> Self {
        if b {
            Self::one()
        } else {
            Self::zero()
        }
    }
}

impl Not for Signal {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(self.0 ^ 1)
    }
}

impl Display for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_const() {
            let x = self.0 & 1;
            write!(f, "{}", x)
        } else {
            if self.is_negated() {
                write!(f, "!")?;
            }
            if self.is_input() {
                write!(f, "i{}", self.input())
            } else {
                write!(f, "n{}", self.node())
            }
        }
    }
}

impl Debug for Signal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}
