//! Peephole simplification of MCT circuits.
//!
//! Two local rewrites are alternated until the gate count stops shrinking:
//! uncontrolled NOT gates are pushed to the end of the circuit by flipping the
//! polarity of every control they pass, and neighbouring gates on the same
//! target are cancelled or merged. Both rewrites are also run on the reversed
//! gate list, which moves NOT gates towards the front instead.

use log::debug;

use crate::circuit::Circuit;
use crate::error::Result;
use crate::gate::{Control, Gate, GateKind};

/// Remove redundant gates without changing the computed permutation.
pub fn simplify(circuit: &Circuit) -> Result<Circuit> {
    let mut gates = circuit.gates().to_vec();
    loop {
        let before = gates.len();
        for _ in 0..2 {
            gates = simplify_adjacent(simplify_not_gates(&gates)?)?;
            gates.reverse();
        }
        debug!("simplify: {} -> {} gates", before, gates.len());
        if gates.len() >= before {
            break;
        }
    }

    let mut result = Circuit::from_gates(circuit.lines(), gates)?;
    result.set_line_info(circuit.line_info().to_vec())?;
    Ok(result)
}

/// Move every NOT gate to the end, absorbing it into a CNOT on the same line
/// where possible.
pub fn simplify_not_gates(gates: &[Gate]) -> Result<Vec<Gate>> {
    let lines = gates.iter().map(|g| g.max_line() + 1).max().unwrap_or(0);
    let mut pending = vec![false; lines];
    let mut result = Vec::with_capacity(gates.len());

    for gate in gates {
        let target = gate.target();
        if gate.kind() == GateKind::Not {
            pending[target] = !pending[target];
            continue;
        }
        let controls: Vec<Control> = gate
            .controls()
            .iter()
            .map(|c| Control {
                line: c.line,
                polarity: c.polarity ^ pending[c.line],
            })
            .collect();
        if gate.kind() == GateKind::Cnot && pending[target] {
            // x ⊕ 1 ⊕ [c = p] is x ⊕ [c = ¬p].
            pending[target] = false;
            let c = controls[0];
            result.push(Gate::new(
                target,
                [Control {
                    line: c.line,
                    polarity: !c.polarity,
                }],
            )?);
        } else {
            result.push(Gate::new(target, controls)?);
        }
    }

    for (line, _) in pending.iter().enumerate().filter(|&(_, &p)| p) {
        result.push(Gate::not(line));
    }
    Ok(result)
}

/// Cancel or merge neighbouring gates with the same target.
pub fn simplify_adjacent(gates: Vec<Gate>) -> Result<Vec<Gate>> {
    let mut result: Vec<Gate> = Vec::with_capacity(gates.len());
    for gate in gates {
        let mut current = Some(gate);
        while let Some(gate) = current.take() {
            match result.last().map(|last| merge(last, &gate)) {
                Some(Merge::Cancel) => {
                    result.pop();
                }
                Some(Merge::Into(merged)) => {
                    result.pop();
                    current = Some(merged?);
                }
                Some(Merge::None) | None => result.push(gate),
            }
        }
    }
    Ok(result)
}

enum Merge {
    None,
    Cancel,
    Into(Result<Gate>),
}

/// The single gate (if any) computing `a` followed by `b`.
fn merge(a: &Gate, b: &Gate) -> Merge {
    if a.target() != b.target() {
        return Merge::None;
    }
    if a == b {
        return Merge::Cancel;
    }
    let (long, short) = if a.controls().len() >= b.controls().len() {
        (a, b)
    } else {
        (b, a)
    };
    let (lc, sc) = (long.controls(), short.controls());

    if lc.len() == sc.len() {
        // Same lines, exactly one polarity differs: that control is redundant.
        let same_lines = lc.iter().zip(sc).all(|(x, y)| x.line == y.line);
        let differing: Vec<usize> = lc
            .iter()
            .zip(sc)
            .enumerate()
            .filter(|(_, (x, y))| x.polarity != y.polarity)
            .map(|(k, _)| k)
            .collect();
        if same_lines && differing.len() == 1 {
            let controls = lc
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != differing[0])
                .map(|(_, &c)| c);
            return Merge::Into(Gate::new(long.target(), controls));
        }
    } else if lc.len() == sc.len() + 1 {
        // The short gate's controls are a subset: the extra control flips.
        let extra: Vec<&Control> = lc.iter().filter(|c| !sc.contains(c)).collect();
        if extra.len() == 1 {
            let flipped = Control {
                line: extra[0].line,
                polarity: !extra[0].polarity,
            };
            let controls = sc.iter().copied().chain(std::iter::once(flipped));
            return Merge::Into(Gate::new(long.target(), controls));
        }
    }
    Merge::None
}
