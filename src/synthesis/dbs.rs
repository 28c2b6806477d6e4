//! Decomposition-based synthesis.
//!
//! Every line except the last is fixed by a pair of single-target gates, one
//! in front of the remaining function and one behind it. Once all other lines
//! map to themselves, the last line is a single-target gate on its own. The
//! control function of each single-target gate is built as a BDD, and every
//! path of that BDD becomes one Toffoli gate; the paths are disjoint cubes,
//! so the cascade computes exactly the control function.

use log::debug;

use crate::bdd::Bdd;
use crate::circuit::Circuit;
use crate::error::{Result, RevError};
use crate::gate::{Control, Gate};
use crate::permutation::TruthTable;

use super::Synthesizer;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct DbsOptions {
    /// Order in which lines are fixed. Defaults to `0, 1, ..., n-1`.
    pub line_order: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Default)]
pub struct Dbs {
    pub options: DbsOptions,
}

impl Dbs {
    pub fn new(options: DbsOptions) -> Self {
        Self { options }
    }

    fn line_order(&self, lines: usize) -> Result<Vec<usize>> {
        let Some(order) = &self.options.line_order else {
            return Ok((0..lines).collect());
        };
        let mut seen = vec![false; lines];
        for &line in order {
            if line >= lines || seen[line] {
                return Err(RevError::malformed(format!(
                    "line order {:?} is not a permutation of 0..{}",
                    order, lines
                )));
            }
            seen[line] = true;
        }
        if order.len() != lines {
            return Err(RevError::malformed(format!(
                "line order {:?} is not a permutation of 0..{}",
                order, lines
            )));
        }
        Ok(order.clone())
    }
}

/// Single-target gate on `target` with control function `control`, given on
/// states whose `target` bit is zero.
struct SingleTarget<F> {
    target: usize,
    control: F,
}

impl<F: Fn(u64) -> bool> SingleTarget<F> {
    fn apply(&self, state: u64) -> u64 {
        let e = 1 << self.target;
        if (self.control)(state & !e) {
            state ^ e
        } else {
            state
        }
    }

    /// Expand into a Toffoli cascade, one gate per path of the control BDD.
    fn to_gates(&self, bdd: &Bdd, lines: usize) -> Result<Vec<Gate>> {
        let others: Vec<usize> = (0..lines).filter(|&i| i != self.target).collect();
        let vars: Vec<u32> = others.iter().map(|&i| i as u32 + 1).collect();

        let f = bdd.from_fn(&vars, |index| {
            let state = others
                .iter()
                .enumerate()
                .filter(|&(k, _)| index >> k & 1 == 1)
                .fold(0u64, |acc, (_, &line)| acc | 1 << line);
            (self.control)(state)
        });

        bdd.paths(f)
            .map(|path| {
                let controls = path.iter().map(|lit| Control {
                    line: lit.var() as usize - 1,
                    polarity: lit.is_positive(),
                });
                Gate::new(self.target, controls)
            })
            .collect()
    }
}

impl Synthesizer<TruthTable> for Dbs {
    fn synthesize(&self, spec: &TruthTable) -> Result<Circuit> {
        let lines = spec.lines();
        let order = self.line_order(lines)?;
        debug!("dbs: {} lines, order {:?}", lines, order);

        let Some((&last, rest)) = order.split_last() else {
            return Ok(Circuit::new(0));
        };

        let bdd = Bdd::new(lines.clamp(10, 24));
        let mut perm = spec.images().to_vec();
        let mut front = Vec::new();
        let mut back = Vec::new();

        for &line in rest {
            let e = 1u64 << line;
            let color = two_color(&perm, e);

            let mut inverse = vec![0u64; perm.len()];
            for (x, &y) in perm.iter().enumerate() {
                inverse[y as usize] = x as u64;
            }

            let r = SingleTarget {
                target: line,
                control: |a: u64| color[a as usize],
            };
            let l = SingleTarget {
                target: line,
                control: |b: u64| color[inverse[b as usize] as usize],
            };

            let next: Vec<u64> = (0..perm.len() as u64)
                .map(|y| l.apply(perm[r.apply(y) as usize]))
                .collect();
            debug_assert!(next
                .iter()
                .enumerate()
                .all(|(y, &z)| (y as u64 ^ z) & e == 0));

            front.extend(r.to_gates(&bdd, lines)?);
            back.push(l.to_gates(&bdd, lines)?);
            debug!("dbs: fixed line {}", line);

            perm = next;
            bdd.collect_garbage(&[]);
        }

        let m = SingleTarget {
            target: last,
            control: |a: u64| perm[a as usize] >> last & 1 == 1,
        };
        front.extend(m.to_gates(&bdd, lines)?);

        let gates = front.into_iter().chain(back.into_iter().rev().flatten());
        let circuit = Circuit::from_gates(lines, gates)?;
        debug!("dbs: {} gates", circuit.num_gates());
        Ok(circuit)
    }
}

/// Assign each state the value its `e` bit must take after the front gate.
///
/// The two states of an input pair `{x, x^e}` get different colors, and so
/// do the preimages of an output pair `{z, z^e}`. Both relations are perfect
/// matchings, so their union consists of even cycles and a proper coloring
/// always exists.
fn two_color(perm: &[u64], e: u64) -> Vec<bool> {
    let mut inverse = vec![0u64; perm.len()];
    for (x, &y) in perm.iter().enumerate() {
        inverse[y as usize] = x as u64;
    }

    let mut color: Vec<Option<bool>> = vec![None; perm.len()];
    for start in 0..perm.len() as u64 {
        if color[start as usize].is_some() {
            continue;
        }
        // `start` is the smaller state of its pair, so rows that already
        // keep their `e` bit get no gate.
        let mut x = start;
        while color[x as usize].is_none() {
            color[x as usize] = Some(false);
            color[(x ^ e) as usize] = Some(true);
            x = inverse[(perm[(x ^ e) as usize] ^ e) as usize];
        }
    }
    color.into_iter().map(|c| c.unwrap_or(false)).collect()
}
