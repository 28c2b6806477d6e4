//! Synthesis algorithms.
//!
//! Every algorithm is a small options struct implementing [`Synthesizer`] for
//! the input representation it understands. The caller picks the algorithm
//! statically:
//!
//! ```
//! use rev_rs::permutation::TruthTable;
//! use rev_rs::synthesis::{Synthesizer, Tbs};
//!
//! let spec: TruthTable = "0 1 2 4 3 5 6 7".parse().unwrap();
//! let circuit = Tbs::default().synthesize(&spec).unwrap();
//! assert_eq!(circuit.simulate(3), 4);
//! assert_eq!(circuit.simulate(4), 3);
//! ```

use crate::circuit::Circuit;
use crate::error::Result;

pub mod cbs;
pub mod dbs;
pub mod exs;
pub mod symbolic;
pub mod tbs;

pub use cbs::Cbs;
pub use dbs::Dbs;
pub use exs::Exs;
pub use symbolic::SymbolicTbs;
pub use tbs::Tbs;

/// Produce a circuit realizing `input`.
///
/// Implementations borrow the input and never modify it.
pub trait Synthesizer<Input: ?Sized> {
    fn synthesize(&self, input: &Input) -> Result<Circuit>;
}
