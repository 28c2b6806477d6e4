//! SAT-based exact synthesis.
//!
//! For `k = 0, 1, 2, ...` the question "is there a cascade of `k` Toffoli
//! gates realizing the table?" is encoded into CNF and handed to `varisat`.
//! The first satisfiable `k` yields a circuit with the minimum number of
//! gates.

use std::collections::HashSet;

use log::{debug, info};
use varisat::{ExtendFormula, Lit, Solver};

use crate::circuit::Circuit;
use crate::error::{Result, RevError};
use crate::gate::{Control, Gate};
use crate::permutation::TruthTable;

use super::Synthesizer;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct ExsOptions {
    /// Largest gate count that is tried before giving up.
    pub max_gates: usize,
    /// Allow controls on the value 0 as well as on 1.
    pub negative_controls: bool,
    /// Forbid two identical adjacent gates.
    pub symmetry_breaking: bool,
}

impl Default for ExsOptions {
    fn default() -> Self {
        Self {
            max_gates: 20,
            negative_controls: false,
            symmetry_breaking: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Exs {
    pub options: ExsOptions,
}

impl Exs {
    pub fn new(options: ExsOptions) -> Self {
        Self { options }
    }
}

// x <=> a AND b
fn add_and(solver: &mut impl ExtendFormula, a: Lit, b: Lit, x: Lit) {
    solver.add_clause(&[!a, !b, x]);
    solver.add_clause(&[a, !x]);
    solver.add_clause(&[b, !x]);
}

// x <=> a OR b
fn add_or(solver: &mut impl ExtendFormula, a: Lit, b: Lit, x: Lit) {
    solver.add_clause(&[a, b, !x]);
    solver.add_clause(&[!a, x]);
    solver.add_clause(&[!b, x]);
}

// x <=> a XOR b
fn add_xor(solver: &mut impl ExtendFormula, a: Lit, b: Lit, x: Lit) {
    solver.add_clause(&[!a, !b, !x]);
    solver.add_clause(&[a, b, !x]);
    solver.add_clause(&[a, !b, x]);
    solver.add_clause(&[!a, b, x]);
}

// x <=> AND(xs)
fn add_and_many(solver: &mut impl ExtendFormula, xs: &[Lit], x: Lit) {
    let mut clause: Vec<Lit> = xs.iter().map(|&l| !l).collect();
    clause.push(x);
    solver.add_clause(&clause);
    for &l in xs {
        solver.add_clause(&[l, !x]);
    }
}

/// Fixed literal for a constant.
fn add_unit(solver: &mut impl ExtendFormula, x: Lit, value: bool) {
    solver.add_clause(&[if value { x } else { !x }]);
}

/// Variables describing one gate of the cascade.
struct GateVars {
    target: Vec<Lit>,
    control: Vec<Lit>,
    /// Polarity of each control; absent when only positive controls are allowed.
    polarity: Option<Vec<Lit>>,
}

impl GateVars {
    fn new(solver: &mut Solver<'_>, lines: usize, negative_controls: bool) -> Self {
        let target: Vec<Lit> = (0..lines).map(|_| solver.new_lit()).collect();
        let control: Vec<Lit> = (0..lines).map(|_| solver.new_lit()).collect();
        let polarity = negative_controls.then(|| {
            (0..lines)
                .map(|_| solver.new_lit())
                .collect::<Vec<Lit>>()
        });

        // Exactly one target.
        solver.add_clause(&target);
        for i in 0..lines {
            for j in (i + 1)..lines {
                solver.add_clause(&[!target[i], !target[j]]);
            }
        }
        // The target is never a control.
        for l in 0..lines {
            solver.add_clause(&[!target[l], !control[l]]);
        }
        // Unused lines carry a positive polarity.
        if let Some(polarity) = &polarity {
            for l in 0..lines {
                solver.add_clause(&[control[l], polarity[l]]);
            }
        }

        Self {
            target,
            control,
            polarity,
        }
    }

    fn all(&self) -> impl Iterator<Item = Lit> + '_ {
        self.target
            .iter()
            .chain(self.control.iter())
            .chain(self.polarity.iter().flatten())
            .copied()
    }

    fn decode(&self, model: &HashSet<Lit>) -> Result<Gate> {
        let target = self
            .target
            .iter()
            .position(|l| model.contains(l))
            .ok_or_else(|| RevError::Solver("model without a gate target".to_string()))?;
        let controls = (0..self.control.len())
            .filter(|&l| model.contains(&self.control[l]))
            .map(|l| Control {
                line: l,
                polarity: match &self.polarity {
                    Some(polarity) => model.contains(&polarity[l]),
                    None => true,
                },
            });
        Gate::new(target, controls)
    }
}

impl Exs {
    /// Encode "`gates` gates realize `spec`" and solve it.
    fn try_gates(&self, spec: &TruthTable, gates: usize) -> Result<Option<Circuit>> {
        let lines = spec.lines();
        let mut solver = Solver::new();

        let cascade: Vec<GateVars> = (0..gates)
            .map(|_| GateVars::new(&mut solver, lines, self.options.negative_controls))
            .collect();

        if self.options.symmetry_breaking {
            for pair in cascade.windows(2) {
                let diffs: Vec<Lit> = pair[0]
                    .all()
                    .zip(pair[1].all())
                    .map(|(a, b)| {
                        let d = solver.new_lit();
                        add_xor(&mut solver, a, b, d);
                        d
                    })
                    .collect();
                solver.add_clause(&diffs);
            }
        }

        for (row, &image) in spec.images().iter().enumerate() {
            let row = row as u64;
            let mut state: Vec<Lit> = (0..lines).map(|_| solver.new_lit()).collect();
            for (l, &s) in state.iter().enumerate() {
                add_unit(&mut solver, s, row >> l & 1 == 1);
            }

            for gate in &cascade {
                // Whether control line `l` lets the gate fire.
                let satisfied: Vec<Lit> = (0..lines)
                    .map(|l| {
                        let matches = match &gate.polarity {
                            Some(polarity) => {
                                let differ = solver.new_lit();
                                add_xor(&mut solver, state[l], polarity[l], differ);
                                !differ
                            }
                            None => state[l],
                        };
                        let u = solver.new_lit();
                        add_or(&mut solver, !gate.control[l], matches, u);
                        u
                    })
                    .collect();

                let fires = solver.new_lit();
                add_and_many(&mut solver, &satisfied, fires);

                state = (0..lines)
                    .map(|l| {
                        let flip = solver.new_lit();
                        add_and(&mut solver, gate.target[l], fires, flip);
                        let next = solver.new_lit();
                        add_xor(&mut solver, state[l], flip, next);
                        next
                    })
                    .collect();
            }

            for (l, &s) in state.iter().enumerate() {
                add_unit(&mut solver, s, image >> l & 1 == 1);
            }
        }

        let sat = solver
            .solve()
            .map_err(|e| RevError::Solver(format!("{:?}", e)))?;
        if !sat {
            return Ok(None);
        }

        let model: HashSet<Lit> = solver
            .model()
            .ok_or_else(|| RevError::Solver("satisfiable without a model".to_string()))?
            .into_iter()
            .collect();
        let gates = cascade
            .iter()
            .map(|g| g.decode(&model))
            .collect::<Result<Vec<_>>>()?;
        Circuit::from_gates(lines, gates).map(Some)
    }
}

impl Synthesizer<TruthTable> for Exs {
    fn synthesize(&self, spec: &TruthTable) -> Result<Circuit> {
        for gates in 0..=self.options.max_gates {
            if gates == 0 {
                if spec.is_identity() {
                    return Ok(Circuit::new(spec.lines()));
                }
                continue;
            }
            debug!("exs: trying {} gates", gates);
            if let Some(circuit) = self.try_gates(spec, gates)? {
                info!("exs: found a circuit with {} gates", gates);
                return Ok(circuit);
            }
        }
        Err(RevError::Unsynthesizable {
            bound: self.options.max_gates,
        })
    }
}
