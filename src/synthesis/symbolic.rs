//! Transformation-based synthesis on a characteristic BDD.
//!
//! Runs the unidirectional algorithm of [`Tbs`][super::Tbs] without ever
//! tabulating the function: the next row to fix is the smallest `x` with
//! `χ(x, y) ∧ x ≠ y`, and each gate is applied to `χ` by composition. The
//! resulting gate list is the same as for the tabulated function.

use log::debug;

use crate::circuit::Circuit;
use crate::error::Result;
use crate::gate::Gate;
use crate::rcbdd::Rcbdd;
use crate::reference::Ref;
use crate::utils::bits;

use super::Synthesizer;

#[derive(Debug, Clone, Default)]
pub struct SymbolicTbs;

impl Synthesizer<Rcbdd> for SymbolicTbs {
    fn synthesize(&self, rc: &Rcbdd) -> Result<Circuit> {
        let bdd = rc.bdd();
        let diff = rc.diff();
        let mut chi = rc.chi();
        let mut gates: Vec<Gate> = Vec::new();

        let mut apply = |chi: &mut Ref, gate: Gate| -> Result<()> {
            rc.reclaim(&[*chi, diff])?;
            *chi = rc.apply_gate(*chi, &gate);
            gates.push(gate);
            Ok(())
        };

        let first = rc.image(0)?;
        for bit in bits(first) {
            apply(&mut chi, Gate::not(bit))?;
        }

        while let Some(path) = bdd.min_sat(bdd.apply_and(chi, diff)) {
            let x = rc.decode_x(&path);
            let y = rc.image_in(chi, x)?;
            debug!("symbolic tbs: row {} maps to {}", x, y);

            let d = x ^ y;
            let (p, q) = (d & x, d & y);
            let mut mask = y;
            for bit in bits(p) {
                apply(&mut chi, Gate::from_mask(mask, bit)?)?;
                mask |= 1 << bit;
            }
            for bit in bits(q) {
                mask &= !(1 << bit);
                apply(&mut chi, Gate::from_mask(mask, bit)?)?;
            }
        }

        gates.reverse();
        let mut circuit = Circuit::from_gates(rc.lines(), gates)?;
        circuit.set_line_info(rc.line_info().to_vec())?;
        debug!("symbolic tbs: {} gates", circuit.num_gates());
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use test_log::test;

    use super::*;
    use crate::bdd::Bdd;
    use crate::embed::{embed, EmbedOptions};
    use crate::equivalence::equivalent;
    use crate::function::BddFunction;
    use crate::permutation::TruthTable;
    use crate::synthesis::Tbs;

    fn same_as_explicit(table: &TruthTable) {
        let rc = Rcbdd::from_truth_table(Rc::new(Bdd::default()), table);
        let symbolic = SymbolicTbs.synthesize(&rc).unwrap();
        let explicit = Tbs::unidirectional().synthesize(table).unwrap();
        assert_eq!(symbolic.gates(), explicit.gates());
    }

    #[test]
    fn test_matches_explicit_tbs() {
        for s in [
            "0 1 2 4 3 5 6 7",
            "7 2 3 6 1 4 5 0",
            "1 0 3 2 5 7 4 6",
            "3 2 1 0",
        ] {
            same_as_explicit(&s.parse().unwrap());
        }
    }

    #[test]
    fn test_identity() {
        let rc = Rcbdd::identity(Rc::new(Bdd::default()), 4);
        assert!(SymbolicTbs.synthesize(&rc).unwrap().is_empty());
    }

    #[test]
    fn test_wide_relation_in_small_manager() {
        let gates = [(0, 1, 2), (3, 4, 5), (6, 7, 8), (9, 10, 11)]
            .map(|(a, b, t)| Gate::toffoli(a, b, t).unwrap());
        let circuit = Circuit::from_gates(13, gates).unwrap();
        let bdd = Rc::new(Bdd::new(17));
        let rc = Rcbdd::from_circuit(bdd.clone(), &circuit).unwrap();

        let synthesized = SymbolicTbs.synthesize(&rc).unwrap();
        assert_eq!(synthesized.num_gates(), 4);
        assert!(equivalent(&circuit, &synthesized).unwrap());
        // The input relation survives the collections.
        assert_eq!(rc.image(0b11).unwrap(), 0b111);
    }

    #[test]
    fn test_embedded_function() {
        // 2-bit adder with carry out: (a, b) -> a + b
        let f = BddFunction::from_fn(4, 3, |x| (x & 3) + (x >> 2)).unwrap();
        let rc = embed(&f, &EmbedOptions::default()).unwrap();
        let circuit = SymbolicTbs.synthesize(&rc).unwrap();

        let table = rc.to_truth_table().unwrap();
        for x in 0..table.len() as u64 {
            assert_eq!(circuit.simulate(x), table.image(x));
        }
        assert_eq!(circuit.line_info(), rc.line_info());
        same_as_explicit(&table);
    }
}
