//! Reversible functions as characteristic BDDs.
//!
//! An [`Rcbdd`] on `r` lines stores `χ(x, y)`, which is 1 exactly when `y` is
//! the image of `x`. Input line `i` is variable `r - i` and output line `i` is
//! variable `2r - i`: all input variables lie above all output variables and
//! the most significant line is topmost on each side. Walking the low edges
//! first therefore visits inputs in ascending numeric order.

use std::fmt::{Debug, Formatter};
use std::rc::Rc;

use log::debug;
use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::circuit::{Circuit, LineInfo};
use crate::error::{Result, RevError};
use crate::gate::Gate;
use crate::permutation::{TruthTable, MAX_EXPLICIT_LINES};
use crate::reference::Ref;
use crate::types::Lit;

pub struct Rcbdd {
    bdd: Rc<Bdd>,
    lines: usize,
    chi: Ref,
    line_info: Vec<LineInfo>,
}

impl Rcbdd {
    /// Wrap `chi`, which must be the characteristic function of a bijection.
    pub fn new(bdd: Rc<Bdd>, lines: usize, chi: Ref, line_info: Vec<LineInfo>) -> Result<Self> {
        if line_info.len() != lines {
            return Err(RevError::DimensionMismatch {
                expected: lines,
                found: line_info.len(),
            });
        }
        // Every input has an image and every output a preimage.
        let xs: Vec<u32> = (0..lines).map(|i| x_var(lines, i)).collect();
        let ys: Vec<u32> = (0..lines).map(|i| y_var(lines, i)).collect();
        if !bdd.is_one(bdd.exists(chi, &ys)) || !bdd.is_one(bdd.exists(chi, &xs)) {
            return Err(RevError::NotReversible(
                "relation is not a bijection".to_string(),
            ));
        }
        // ...and exactly one image.
        if bdd.sat_count(chi, 2 * lines) != BigUint::from(1u32) << lines {
            return Err(RevError::NotReversible(
                "relation is not a function".to_string(),
            ));
        }
        Ok(Self::from_parts(bdd, lines, chi, line_info))
    }

    fn from_parts(bdd: Rc<Bdd>, lines: usize, chi: Ref, line_info: Vec<LineInfo>) -> Self {
        bdd.protect(chi);
        Self {
            bdd,
            lines,
            chi,
            line_info,
        }
    }

    /// The identity on `lines` lines.
    pub fn identity(bdd: Rc<Bdd>, lines: usize) -> Self {
        let eqs: Vec<Ref> = (0..lines)
            .map(|i| {
                let x = bdd.mk_var(x_var(lines, i));
                let y = bdd.mk_var(y_var(lines, i));
                bdd.apply_eq(x, y)
            })
            .collect();
        let chi = bdd.apply_and_many(eqs);
        let line_info = (0..lines).map(LineInfo::plain).collect();
        Self::from_parts(bdd, lines, chi, line_info)
    }

    pub fn from_truth_table(bdd: Rc<Bdd>, table: &TruthTable) -> Self {
        let r = table.lines();
        // Bit `k` of a truth-vector index is variable `k + 1`, i.e. line `r - 1 - k`.
        let vars: Vec<u32> = (1..=r as u32).collect();
        let to_state = |index: u64| {
            (0..r)
                .filter(|&k| index >> k & 1 == 1)
                .fold(0u64, |acc, k| acc | 1 << (r - 1 - k))
        };

        let eqs: Vec<Ref> = (0..r)
            .map(|i| {
                let g = bdd.from_fn(&vars, |index| table.image(to_state(index)) >> i & 1 == 1);
                bdd.apply_eq(bdd.mk_var(y_var(r, i)), g)
            })
            .collect();
        let chi = bdd.apply_and_many(eqs);
        let line_info = (0..r).map(LineInfo::plain).collect();
        Self::from_parts(bdd, r, chi, line_info)
    }

    pub fn from_circuit(bdd: Rc<Bdd>, circuit: &Circuit) -> Result<Self> {
        let identity = Self::identity(bdd, circuit.lines());
        let mut chi = identity.chi;
        for gate in circuit.gates() {
            identity.reclaim(&[chi])?;
            chi = identity.apply_gate(chi, gate);
        }
        Ok(Self::from_parts(
            identity.bdd.clone(),
            identity.lines,
            chi,
            circuit.line_info().to_vec(),
        ))
    }
}

impl Clone for Rcbdd {
    fn clone(&self) -> Self {
        Self::from_parts(
            self.bdd.clone(),
            self.lines,
            self.chi,
            self.line_info.clone(),
        )
    }
}

impl Drop for Rcbdd {
    fn drop(&mut self) {
        self.bdd.unprotect(self.chi);
    }
}

pub(crate) fn x_var(lines: usize, line: usize) -> u32 {
    (lines - line) as u32
}

pub(crate) fn y_var(lines: usize, line: usize) -> u32 {
    (2 * lines - line) as u32
}

impl Rcbdd {
    pub fn bdd(&self) -> &Rc<Bdd> {
        &self.bdd
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn chi(&self) -> Ref {
        self.chi
    }

    pub fn line_info(&self) -> &[LineInfo] {
        &self.line_info
    }

    pub fn x_var(&self, line: usize) -> u32 {
        x_var(self.lines, line)
    }

    pub fn y_var(&self, line: usize) -> u32 {
        y_var(self.lines, line)
    }

    /// Literals fixing the input side to `x`.
    pub fn x_cube(&self, x: u64) -> Vec<i32> {
        (0..self.lines)
            .map(|i| {
                let v = self.x_var(i) as i32;
                if x >> i & 1 == 1 {
                    v
                } else {
                    -v
                }
            })
            .collect()
    }

    /// Packed input read off a path, unset variables taken as 0.
    pub fn decode_x(&self, path: &[Lit]) -> u64 {
        self.decode(path, |v| v <= self.lines as u32, |v| self.lines - v as usize)
    }

    /// Packed output read off a path, unset variables taken as 0.
    pub fn decode_y(&self, path: &[Lit]) -> u64 {
        self.decode(
            path,
            |v| v > self.lines as u32,
            |v| 2 * self.lines - v as usize,
        )
    }

    fn decode(
        &self,
        path: &[Lit],
        side: impl Fn(u32) -> bool,
        line: impl Fn(u32) -> usize,
    ) -> u64 {
        path.iter()
            .filter(|lit| lit.is_positive() && side(lit.var()))
            .fold(0, |acc, lit| acc | 1 << line(lit.var()))
    }

    /// `x_0 ≠ y_0 ∨ ... ∨ x_{r-1} ≠ y_{r-1}`.
    pub fn diff(&self) -> Ref {
        let bdd = &self.bdd;
        let xors: Vec<Ref> = (0..self.lines)
            .map(|i| bdd.apply_xor(bdd.mk_var(self.x_var(i)), bdd.mk_var(self.y_var(i))))
            .collect();
        bdd.apply_or_many(xors)
    }

    /// Image of `x`, found by cofactoring the input side.
    pub fn image(&self, x: u64) -> Result<u64> {
        self.image_in(self.chi, x)
    }

    /// Image of `x` under another relation over the same lines.
    pub fn image_in(&self, chi: Ref, x: u64) -> Result<u64> {
        let outputs = self.bdd.cofactor_cube(chi, &self.x_cube(x));
        let path = self.bdd.one_sat(outputs).ok_or_else(|| {
            RevError::NotReversible(format!("input {} has no image", x))
        })?;
        Ok(self.decode_y(&path))
    }

    /// `χ'(x, y) = χ(x, g(y))`, i.e. `gate` appended on the output side.
    pub fn apply_gate(&self, chi: Ref, gate: &Gate) -> Ref {
        let bdd = &self.bdd;
        let controls: Vec<i32> = gate
            .controls()
            .iter()
            .map(|c| {
                let v = self.y_var(c.line) as i32;
                if c.polarity {
                    v
                } else {
                    -v
                }
            })
            .collect();
        let fires = bdd.cube(controls);
        let target = self.y_var(gate.target());
        let flipped = bdd.apply_xor(bdd.mk_var(target), fires);
        bdd.compose(chi, target, flipped)
    }

    /// Collect garbage once the manager is crowded, keeping `roots` and
    /// every protected relation.
    pub fn reclaim(&self, roots: &[Ref]) -> Result<()> {
        let bdd = &self.bdd;
        if !bdd.is_crowded() {
            return Ok(());
        }
        bdd.collect_garbage(roots);
        debug!("reclaim: {} live nodes", bdd.num_nodes());
        if bdd.is_crowded() {
            return Err(RevError::CapacityExceeded(format!(
                "{} live nodes of {}",
                bdd.num_nodes(),
                bdd.capacity()
            )));
        }
        Ok(())
    }

    /// Tabulate the function.
    pub fn to_truth_table(&self) -> Result<TruthTable> {
        if self.lines > MAX_EXPLICIT_LINES {
            return Err(RevError::malformed(format!(
                "{} lines are too many for an explicit table",
                self.lines
            )));
        }
        let images = (0..1u64 << self.lines)
            .map(|x| self.image(x))
            .collect::<Result<Vec<_>>>()?;
        TruthTable::new(images)
    }
}

impl Debug for Rcbdd {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rcbdd")
            .field("lines", &self.lines)
            .field("chi", &self.chi)
            .field("size", &self.bdd.size(self.chi))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::gate::Control;

    #[test]
    fn test_variable_layout() {
        let rc = Rcbdd::identity(Rc::new(Bdd::default()), 3);
        assert_eq!(rc.x_var(2), 1);
        assert_eq!(rc.x_var(0), 3);
        assert_eq!(rc.y_var(2), 4);
        assert_eq!(rc.y_var(0), 6);
        assert!(rc.to_truth_table().unwrap().is_identity());
    }

    #[test]
    fn test_truth_table_round_trip() {
        let bdd = Rc::new(Bdd::default());
        let table: TruthTable = "7 2 3 6 1 4 5 0".parse().unwrap();
        let rc = Rcbdd::from_truth_table(bdd, &table);
        assert_eq!(rc.image(1).unwrap(), 2);
        assert_eq!(rc.to_truth_table().unwrap(), table);
        assert!(!rc.bdd().is_zero(rc.bdd().apply_and(rc.chi(), rc.diff())));
    }

    #[test]
    fn test_from_circuit_matches_simulation() {
        let circuit = Circuit::from_gates(
            3,
            [
                Gate::not(0),
                Gate::cnot(0, 1).unwrap(),
                Gate::new(2, [Control::negative(0), Control::positive(1)]).unwrap(),
            ],
        )
        .unwrap();
        let rc = Rcbdd::from_circuit(Rc::new(Bdd::default()), &circuit).unwrap();
        assert_eq!(
            rc.to_truth_table().unwrap(),
            TruthTable::from_circuit(&circuit).unwrap()
        );
    }

    #[test]
    fn test_gate_on_both_representations() {
        let bdd = Rc::new(Bdd::default());
        let table: TruthTable = "0 1 2 4 3 5 6 7".parse().unwrap();
        let rc = Rcbdd::from_truth_table(bdd.clone(), &table);
        let gate = Gate::toffoli(0, 1, 2).unwrap();
        let chi = rc.apply_gate(rc.chi(), &gate);
        let rc = Rcbdd::new(bdd, 3, chi, rc.line_info().to_vec()).unwrap();

        // Swapping 3 and 7 after swapping 3 and 4.
        let expected: Vec<u64> = table.images().iter().map(|&y| gate.apply(y)).collect();
        assert_eq!(rc.to_truth_table().unwrap().images(), &expected[..]);
    }

    #[test]
    fn test_rejects_partial_relation() {
        let bdd = Rc::new(Bdd::default());
        let rc = Rcbdd::identity(bdd.clone(), 2);
        // Drop the row x = 00.
        let x = bdd.cube([-(rc.x_var(0) as i32), -(rc.x_var(1) as i32)]);
        let chi = bdd.apply_and(rc.chi(), -x);
        let info = rc.line_info().to_vec();
        assert!(matches!(
            Rcbdd::new(bdd.clone(), 2, chi, info.clone()),
            Err(RevError::NotReversible(_))
        ));
        assert!(Rcbdd::new(bdd, 2, rc.chi(), info).is_ok());
    }

    #[test]
    fn test_rejects_relation_with_several_images() {
        let bdd = Rc::new(Bdd::default());
        let info = vec![LineInfo::plain(0)];
        assert!(matches!(
            Rcbdd::new(bdd.clone(), 1, bdd.one, info.clone()),
            Err(RevError::NotReversible(_))
        ));

        // x = 0 maps to both outputs, x = 1 to 1.
        let rc = Rcbdd::identity(bdd.clone(), 1);
        let extra = bdd.cube([-(rc.x_var(0) as i32), rc.y_var(0) as i32]);
        let chi = bdd.apply_or(rc.chi(), extra);
        assert!(matches!(
            Rcbdd::new(bdd, 1, chi, info),
            Err(RevError::NotReversible(_))
        ));
    }

    #[test]
    fn test_from_circuit_reclaims_nodes() {
        // 13 lines in a manager that cannot hold all intermediate relations.
        let lines = 13;
        let gates: Vec<Gate> = (0..40)
            .map(|k| {
                let target = k % lines;
                let control = (k * 5 + 3) % lines;
                if control == target {
                    Gate::not(target)
                } else {
                    Gate::cnot(control, target).unwrap()
                }
            })
            .collect();
        let circuit = Circuit::from_gates(lines, gates).unwrap();
        let bdd = Rc::new(Bdd::new(17));
        let rc = Rcbdd::from_circuit(bdd.clone(), &circuit).unwrap();
        for x in [0u64, 1, 0x1555, 0x1fff, 4321] {
            assert_eq!(rc.image(x).unwrap(), circuit.simulate(x));
        }
        assert!(!bdd.is_crowded());
    }

    #[test]
    fn test_collection_keeps_live_relations() {
        let bdd = Rc::new(Bdd::default());
        let table: TruthTable = "0 2 4 1 3 5 6 7".parse().unwrap();
        let rc = Rcbdd::from_truth_table(bdd.clone(), &table);
        let copy = rc.clone();
        drop(rc);

        bdd.collect_garbage(&[]);
        let _noise = bdd.apply_xor_many((1..=6).map(|v| bdd.mk_var(v)));
        assert_eq!(copy.to_truth_table().unwrap(), table);
    }

    #[test]
    fn test_diff() {
        let rc = Rcbdd::identity(Rc::new(Bdd::default()), 2);
        let diff = rc.diff();
        let bdd = rc.bdd();
        let (x0, x1) = (rc.x_var(0) as i32, rc.x_var(1) as i32);
        let (y0, y1) = (rc.y_var(0) as i32, rc.y_var(1) as i32);

        // x = 01, y = 01
        let same = bdd.cofactor_cube(diff, &[x0, -x1, y0, -y1]);
        assert!(bdd.is_zero(same));
        // x = 01, y = 00
        let other = bdd.cofactor_cube(diff, &[x0, -x1, -y0, -y1]);
        assert!(bdd.is_one(other));
    }
}
