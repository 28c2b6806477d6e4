//! # rev-rs: Reversible logic synthesis on top of BDDs
//!
//! **`rev-rs`** turns Boolean function descriptions into reversible circuits of
//! mixed-polarity multiple-controlled Toffoli (MCT) gates.
//!
//! ## What is a reversible circuit?
//!
//! A reversible circuit computes a bijection on `n` bits. Every gate flips one
//! **target** line when all of its **control** lines carry the required values,
//! so every gate is its own inverse and a circuit is undone by running it
//! backwards. Irreversible functions are first **embedded** into a bijection
//! using constant-0 input lines and garbage output lines.
//!
//! ## Key Features
//!
//! - **Several synthesis algorithms** behind one [`Synthesizer`][crate::synthesis::Synthesizer] trait:
//!   transformation-based (TBS), decomposition-based (DBS), SAT-based exact (EXS),
//!   symbolic TBS on a characteristic BDD, and circuit-based (CBS) from an AIG.
//! - **Shared BDD manager**: functions and characteristic relations live in a
//!   [`Bdd`][crate::bdd::Bdd] with complement edges and an operation cache.
//! - **Typed object store**: the [`Store`][crate::store::Store] keeps every specification,
//!   function and circuit in its own indexed slot with a current entry.
//! - **Circuit algebra**: simulation, reversal, concatenation, equivalence
//!   checking, peephole simplification and cost metrics.
//!
//! ## Basic Usage
//!
//! ```rust
//! use rev_rs::equivalence::equivalent;
//! use rev_rs::permutation::TruthTable;
//! use rev_rs::synthesis::{Dbs, Synthesizer, Tbs};
//!
//! // 1. A reversible specification: swap rows 3 and 4
//! let spec: TruthTable = "0 1 2 4 3 5 6 7".parse().unwrap();
//!
//! // 2. Synthesize it with two different algorithms
//! let a = Tbs::default().synthesize(&spec).unwrap();
//! let b = Dbs::default().synthesize(&spec).unwrap();
//!
//! // 3. Both realize the specification
//! assert_eq!(a.simulate(3), 4);
//! assert!(equivalent(&a, &b).unwrap());
//! ```
//!
//! ## Core Components
//!
//! - **[`synthesis`]**: The synthesis algorithms.
//! - **[`circuit`]** and **[`gate`]**: The circuit model.
//! - **[`embed`]** and **[`rcbdd`]**: Embedding of irreversible functions into characteristic BDDs.
//! - **[`commands`]**: Shell-level commands operating on a [`Store`][crate::store::Store].

pub mod aig;
pub mod bdd;
pub mod cache;
pub mod circuit;
pub mod commands;
pub mod embed;
pub mod equivalence;
pub mod error;
pub mod function;
pub mod gate;
pub mod node;
pub mod paths;
pub mod permutation;
pub mod random;
pub mod rcbdd;
pub mod reference;
pub mod sat;
pub mod signal;
pub mod simplify;
pub mod store;
pub mod synthesis;
pub mod table;
pub mod types;
pub mod utils;
