//! Functional equivalence of reversible circuits.
//!
//! Small circuits are simulated on every input. Wider ones are simulated on
//! BDDs: every line carries its output as a function of the input variables,
//! and the circuit is the identity iff line `i` ends up as variable `i + 1`.

use log::debug;

use crate::bdd::Bdd;
use crate::circuit::Circuit;
use crate::error::{Result, RevError};
use crate::permutation::MAX_EXPLICIT_LINES;
use crate::reference::Ref;

/// Whether `circuit` maps every input to itself.
pub fn is_identity(circuit: &Circuit) -> Result<bool> {
    if circuit.is_empty() {
        return Ok(true);
    }
    let lines = circuit.lines();
    if lines <= MAX_EXPLICIT_LINES {
        debug!("is_identity: simulating {} rows", 1u64 << lines);
        Ok((0..1u64 << lines).all(|x| circuit.simulate(x) == x))
    } else {
        debug!("is_identity: {} lines, checking symbolically", lines);
        let bdd = Bdd::default();
        let outputs = simulate_symbolic(&bdd, circuit)?;
        Ok(outputs
            .iter()
            .enumerate()
            .all(|(i, &f)| f == bdd.mk_var(i as u32 + 1)))
    }
}

/// Output of every line over the inputs, line `i` being variable `i + 1`.
fn simulate_symbolic(bdd: &Bdd, circuit: &Circuit) -> Result<Vec<Ref>> {
    let mut lines: Vec<Ref> = (0..circuit.lines())
        .map(|i| bdd.mk_var(i as u32 + 1))
        .collect();
    for gate in circuit.gates() {
        if bdd.is_crowded() {
            bdd.collect_garbage(&lines);
            if bdd.is_crowded() {
                return Err(RevError::CapacityExceeded(format!(
                    "{} live nodes of {}",
                    bdd.num_nodes(),
                    bdd.capacity()
                )));
            }
        }
        let fires = bdd.apply_and_many(gate.controls().iter().map(|c| {
            if c.polarity {
                lines[c.line]
            } else {
                -lines[c.line]
            }
        }));
        let t = gate.target();
        lines[t] = bdd.apply_xor(lines[t], fires);
    }
    Ok(lines)
}

/// Whether `a` and `b` compute the same permutation.
pub fn equivalent(a: &Circuit, b: &Circuit) -> Result<bool> {
    if a.lines() != b.lines() {
        return Err(RevError::DimensionMismatch {
            expected: a.lines(),
            found: b.lines(),
        });
    }
    is_identity(&a.concat(&b.reverse())?)
}
