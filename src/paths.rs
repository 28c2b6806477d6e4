//! Iterator over the paths to the one-terminal of a BDD.
//!
//! Distinct paths fix at least one variable to opposite values, so the cubes
//! they describe are pairwise disjoint. A sum of path cubes is therefore also
//! an exclusive sum, which is what lets a control function be expanded into a
//! cascade of Toffoli gates one cube at a time.
//!
//! ```
//! use rev_rs::bdd::Bdd;
//!
//! let bdd = Bdd::default();
//! let x = bdd.mk_var(1);
//! let y = bdd.mk_var(2);
//! let f = bdd.apply_or(x, y);
//!
//! // x=1, and x=0 & y=1
//! assert_eq!(bdd.paths(f).count(), 2);
//! ```

use crate::bdd::Bdd;
use crate::reference::Ref;
use crate::types::Lit;

impl Bdd {
    /// Iterate over all paths from `f` to the one-terminal.
    ///
    /// Literals in a path follow the variable order. High edges are visited
    /// before low edges.
    pub fn paths(&self, f: Ref) -> BddPaths<'_> {
        BddPaths::new(self, f)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Branch {
    High,
    Low,
    Done,
}

#[derive(Debug)]
struct Frame {
    node: Ref,
    next: Branch,
}

/// Depth-first path enumeration.
///
/// Created by [`Bdd::paths()`]. The current path is kept in a single vector
/// that grows and shrinks with the stack.
pub struct BddPaths<'a> {
    bdd: &'a Bdd,
    stack: Vec<Frame>,
    path: Vec<Lit>,
}

impl<'a> BddPaths<'a> {
    pub fn new(bdd: &'a Bdd, f: Ref) -> Self {
        BddPaths {
            bdd,
            stack: vec![Frame {
                node: f,
                next: Branch::High,
            }],
            path: Vec::new(),
        }
    }

    fn backtrack(&mut self) {
        self.stack.pop();
        if !self.stack.is_empty() {
            self.path.pop();
        }
    }
}

impl Iterator for BddPaths<'_> {
    type Item = Vec<Lit>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let node = frame.node;

            if self.bdd.is_one(node) {
                let result = self.path.clone();
                self.backtrack();
                return Some(result);
            }
            if self.bdd.is_zero(node) {
                self.backtrack();
                continue;
            }

            let var = self.bdd.variable(node.index());
            match frame.next {
                Branch::High => {
                    frame.next = Branch::Low;
                    self.path.push(Lit::pos(var));
                    self.stack.push(Frame {
                        node: self.bdd.high_node(node),
                        next: Branch::High,
                    });
                }
                Branch::Low => {
                    frame.next = Branch::Done;
                    self.path.push(Lit::neg(var));
                    self.stack.push(Frame {
                        node: self.bdd.low_node(node),
                        next: Branch::High,
                    });
                }
                Branch::Done => self.backtrack(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_path(lits: impl IntoIterator<Item = i32>) -> Vec<Lit> {
        lits.into_iter().map(Lit::from).collect()
    }

    #[test]
    fn test_paths_single_cube() {
        let bdd = Bdd::default();
        let f = bdd.cube([1, -2, 3]);

        let paths: Vec<_> = bdd.paths(f).collect();
        assert_eq!(paths, vec![mk_path([1, -2, 3])]);
    }

    #[test]
    fn test_paths_constants() {
        let bdd = Bdd::default();

        let paths: Vec<_> = bdd.paths(bdd.one).collect();
        assert_eq!(paths, vec![Vec::<Lit>::new()]);
        assert_eq!(bdd.paths(bdd.zero).count(), 0);
    }

    #[test]
    fn test_paths_xor_in_order() {
        let bdd = Bdd::default();
        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let xor = bdd.apply_xor(x, y);

        let paths: Vec<_> = bdd.paths(xor).collect();
        assert_eq!(paths, vec![mk_path([1, -2]), mk_path([-1, 2])]);
    }

    #[test]
    fn test_paths_negated_function() {
        let bdd = Bdd::default();
        let f = bdd.cube([-1, -2, -3]);

        assert_eq!(bdd.paths(f).count(), 1);
        // NOT f = x1 | x2 | x3 has three paths, not seven models.
        assert_eq!(bdd.paths(-f).count(), 3);
    }

    #[test]
    fn test_paths_are_disjoint_cover() {
        let bdd = Bdd::default();
        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);
        let f = bdd.apply_or(bdd.apply_and(x1, x2), bdd.apply_xor(x2, x3));

        let cubes: Vec<Ref> = bdd
            .paths(f)
            .map(|path| bdd.cube(path.iter().map(|lit| lit.to_dimacs())))
            .collect();
        assert_eq!(bdd.apply_xor_many(cubes.iter().copied()), f);
        assert_eq!(bdd.apply_or_many(cubes.iter().copied()), f);
    }
}
