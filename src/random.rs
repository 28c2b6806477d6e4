//! Seeded random circuits.

use log::debug;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;

use crate::circuit::Circuit;
use crate::error::{Result, RevError};
use crate::gate::{Control, Gate};

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct RandomCircuitOptions {
    pub lines: usize,
    pub gates: usize,
    pub seed: u64,
    /// Draw control polarities at random instead of always positive.
    pub negative_controls: bool,
}

impl Default for RandomCircuitOptions {
    fn default() -> Self {
        Self {
            lines: 6,
            gates: 16,
            seed: 0,
            negative_controls: false,
        }
    }
}

struct GateSource {
    rng: Pcg64,
    negative_controls: bool,
}

impl GateSource {
    fn new(seed: u64, negative_controls: bool) -> Self {
        Self {
            rng: Pcg64::seed_from_u64(seed),
            negative_controls,
        }
    }

    /// Uniform target; every other line is a control with probability 1/2.
    fn gate(&mut self, lines: usize) -> Result<Gate> {
        let target = self.rng.gen_range(0..lines);
        let mut controls = Vec::new();
        for line in (0..lines).filter(|&l| l != target) {
            if self.rng.gen_bool(0.5) {
                let polarity = !self.negative_controls || self.rng.gen_bool(0.5);
                controls.push(Control { line, polarity });
            }
        }
        Gate::new(target, controls)
    }
}

/// Same options, same circuit.
pub fn random_circuit(options: &RandomCircuitOptions) -> Result<Circuit> {
    if options.lines == 0 && options.gates > 0 {
        return Err(RevError::malformed("random gates need at least one line"));
    }
    let mut source = GateSource::new(options.seed, options.negative_controls);
    let mut circuit = Circuit::new(options.lines);
    for _ in 0..options.gates {
        circuit.push(source.gate(options.lines)?)?;
    }
    debug!(
        "random circuit: {} lines, {} gates, seed {}",
        options.lines, options.gates, options.seed
    );
    Ok(circuit)
}

/// A copy of `circuit` with one random gate at a random position.
pub fn insert_random_gate(circuit: &Circuit, seed: u64, negative_controls: bool) -> Result<Circuit> {
    if circuit.lines() == 0 {
        return Err(RevError::malformed("random gates need at least one line"));
    }
    let mut source = GateSource::new(seed, negative_controls);
    let position = source.rng.gen_range(0..=circuit.num_gates());
    let gate = source.gate(circuit.lines())?;
    debug!("random gate {} inserted at {}", gate, position);
    let mut result = circuit.clone();
    result.insert(position, gate)?;
    Ok(result)
}
