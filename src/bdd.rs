//! Shared BDD manager with complement edges.
//!
//! All functions built by a [`Bdd`] live in one unique table, so equal
//! functions are equal [`Ref`]s. Variables are 1-indexed; a smaller variable
//! sits closer to the root.
//!
//! ```
//! use rev_rs::bdd::Bdd;
//!
//! let bdd = Bdd::default();
//! let x1 = bdd.mk_var(1);
//! let x2 = bdd.mk_var(2);
//! let f = bdd.apply_and(x1, -x2);
//! assert!(bdd.evaluate(f, |v| v == 1));
//! assert!(!bdd.evaluate(f, |_| true));
//! ```

use std::cell::RefCell;
use std::cmp::{min, Ordering};
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt::Debug;

use log::debug;

use crate::cache::Cache;
use crate::node::Node;
use crate::reference::Ref;
use crate::table::Table;
use crate::utils::{pairing2, pairing3, MyHash};

type Storage = Table<Node>;

#[derive(Debug, Eq, PartialEq, Clone)]
pub enum OpKey {
    Ite(Ref, Ref, Ref),
    Compose(Ref, u32, Ref),
}

impl MyHash for OpKey {
    fn hash(&self) -> u64 {
        match self {
            OpKey::Ite(f, g, h) => pairing3(
                f.unsigned() as u64,
                g.unsigned() as u64,
                h.unsigned() as u64,
            ),
            OpKey::Compose(f, v, g) => pairing2(
                pairing3(f.unsigned() as u64, *v as u64, g.unsigned() as u64),
                1,
            ),
        }
    }
}

pub struct Bdd {
    storage: RefCell<Storage>,
    cache: RefCell<Cache<OpKey, Ref>>,
    size_cache: RefCell<Cache<Ref, u64>>,
    /// Node index -> number of holders; kept alive by every collection.
    protected: RefCell<HashMap<u32, usize>>,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    pub fn new(storage_bits: usize) -> Self {
        assert!(
            storage_bits <= 31,
            "Storage bits should be in the range 0..=31"
        );

        let cache_bits = min(storage_bits, 16);

        let mut storage = Storage::new(storage_bits);

        // Allocate the terminal node:
        let one = storage.alloc();
        assert_eq!(one, 1);
        let one = Ref::positive(one as u32);

        Self {
            storage: RefCell::new(storage),
            cache: RefCell::new(Cache::new(cache_bits)),
            size_cache: RefCell::new(Cache::new(cache_bits)),
            protected: RefCell::new(HashMap::new()),
            zero: -one,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(20)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let storage = self.storage.borrow();
        f.debug_struct("Bdd")
            .field("capacity", &storage.capacity())
            .field("size", &storage.size())
            .field("real_size", &storage.real_size())
            .field("protected", &self.protected.borrow().len())
            .field("cache_hits", &self.cache.borrow().hits())
            .field("cache_misses", &self.cache.borrow().misses())
            .finish()
    }
}

impl Bdd {
    /// Number of live nodes (terminal included).
    pub fn num_nodes(&self) -> usize {
        self.storage.borrow().real_size()
    }

    pub fn variable(&self, index: u32) -> u32 {
        self.storage.borrow().value(index as usize).variable
    }
    pub fn low(&self, index: u32) -> Ref {
        self.storage.borrow().value(index as usize).low
    }
    pub fn high(&self, index: u32) -> Ref {
        self.storage.borrow().value(index as usize).high
    }

    pub fn low_node(&self, node: Ref) -> Ref {
        let low = self.low(node.index());
        if node.is_negated() {
            -low
        } else {
            low
        }
    }
    pub fn high_node(&self, node: Ref) -> Ref {
        let high = self.high(node.index());
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        self.is_zero(node) || self.is_one(node)
    }

    pub fn constant(&self, value: bool) -> Ref {
        if value {
            self.one
        } else {
            self.zero
        }
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        assert_ne!(v, 0, "Variable index should not be zero");

        // Handle canonicity
        if high.is_negated() {
            debug!("mk: restoring canonicity");
            return -self.mk_node(v, -low, -high);
        }

        // Handle duplicates
        if low == high {
            debug!("mk: duplicates {} == {}", low, high);
            return low;
        }

        let i = self.storage.borrow_mut().put(Node {
            variable: v,
            low,
            high,
        });
        Ref::positive(i as u32)
    }

    pub fn mk_var(&self, v: u32) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");
        self.mk_node(v, self.zero, self.one)
    }

    /// Conjunction of DIMACS-style literals.
    pub fn cube(&self, literals: impl IntoIterator<Item = i32>) -> Ref {
        let mut literals = literals.into_iter().collect::<Vec<_>>();
        literals.sort_by_key(|&v| std::cmp::Reverse(v.abs()));
        debug!("cube(literals = {:?})", literals);
        let mut current = self.one;
        for lit in literals {
            assert_ne!(lit, 0, "Variable index should not be zero");
            current = if lit < 0 {
                self.mk_node(lit.unsigned_abs(), current, self.zero)
            } else {
                self.mk_node(lit as u32, self.zero, current)
            };
        }
        current
    }

    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        assert_ne!(v, 0, "Variable index should not be zero");

        let i = node.index();
        if self.is_terminal(node) || v < self.variable(i) {
            return (node, node);
        }
        assert_eq!(v, self.variable(i));
        (self.low_node(node), self.high_node(node))
    }

    /// Apply the ITE operation to the arguments.
    ///
    /// ```text
    /// ITE(x, y, z) = (x ∧ y) ∨ (¬x ∧ z)
    /// ```
    ///
    /// # Examples
    ///
    /// ```
    /// use rev_rs::bdd::Bdd;
    ///
    /// let bdd = Bdd::default();
    /// let x = bdd.mk_var(1);
    /// let y = bdd.mk_var(2);
    /// let z = bdd.mk_var(3);
    /// let f = bdd.apply_ite(x, y, z);
    /// assert_eq!(f, bdd.mk_node(1, z, y));
    /// ```
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        debug!("apply_ite(f = {}, g = {}, h = {})", f, g, h);

        // Base cases:
        //   ite(1,G,H) => G
        //   ite(0,G,H) => H
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }

        // More base cases:
        //   ite(F,G,G) => G
        //   ite(F,1,0) => F
        //   ite(F,0,1) => ~F
        //   ite(F,1,~F) => 1
        //   ite(F,F,1) => 1
        //   ite(F,~F,0) => 0
        //   ite(F,0,F) => F
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }
        if self.is_one(g) && h == -f {
            return self.one;
        }
        if g == f && self.is_one(h) {
            return self.one;
        }
        if g == -f && self.is_zero(h) {
            return self.zero;
        }
        if self.is_zero(g) && h == f {
            return f;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, self.one, h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero);
        }
        if g == -f {
            return self.apply_ite(f, self.zero, h);
        }
        if h == -f {
            return self.apply_ite(f, g, self.one);
        }

        let i = self.variable(f.index());
        let j = self.variable(g.index());
        let k = self.variable(h.index());
        assert_ne!(i, 0);

        // Equivalent pairs (choose the one with the lowest variable):
        //   ite(F,1,H) == ite(H,1,F) == F ∨ H
        //   ite(F,G,0) == ite(G,F,0) == F ∧ G
        //   ite(F,G,1) == ite(~G,~F,1) == F -> G
        //   ite(F,0,H) == ite(~H,0,~F) == ~F ∧ H
        //   ite(F,G,~G) == ite(G,F,~F)
        if self.is_one(g) && k < i {
            return self.apply_ite(h, self.one, f);
        }
        if self.is_zero(h) && j < i {
            return self.apply_ite(g, f, self.zero);
        }
        if self.is_one(h) && j < i {
            return self.apply_ite(-g, -f, self.one);
        }
        if self.is_zero(g) && k < i {
            return self.apply_ite(-h, self.zero, -f);
        }
        if g == -h && j < i {
            return self.apply_ite(g, f, -f);
        }

        // Make sure the first two pointers (f and g) are regular (not negated)
        let (mut f, mut g, mut h) = (f, g, h);

        // ite(~F,G,H) => ite(F,H,G)
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }

        // ite(F,~G,H) => ~ite(F,G,~H)
        let mut n = false;
        if g.is_negated() {
            n = true;
            g = -g;
            h = -h;
        }

        let key = OpKey::Ite(f, g, h);
        if let Some(&res) = self.cache.borrow().get(&key) {
            debug!("cache: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
            return if n { -res } else { res };
        }

        // Determine the top variable:
        let mut m = i;
        if j != 0 {
            m = m.min(j);
        }
        if k != 0 {
            m = m.min(k);
        }

        let (f0, f1) = self.top_cofactors(f, m);
        let (g0, g1) = self.top_cofactors(g, m);
        let (h0, h1) = self.top_cofactors(h, m);

        let e = self.apply_ite(f0, g0, h0);
        let t = self.apply_ite(f1, g1, h1);

        let res = self.mk_node(m, e, t);
        debug!("computed: apply_ite(f = {}, g = {}, h = {}) -> {}", f, g, h, res);
        self.cache.borrow_mut().insert(key, res);

        if n {
            -res
        } else {
            res
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, -v)
    }

    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.one;
        for node in nodes.into_iter() {
            res = self.apply_and(res, node);
        }
        res
    }

    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.zero;
        for node in nodes.into_iter() {
            res = self.apply_or(res, node);
        }
        res
    }

    pub fn apply_xor_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.zero;
        for node in nodes.into_iter() {
            res = self.apply_xor(res, node);
        }
        res
    }

    /// Existential quantification over all variables in `vars`.
    pub fn exists(&self, f: Ref, vars: &[u32]) -> Ref {
        vars.iter().fold(f, |acc, &v| {
            let v = v as i32;
            let low = self.cofactor_cube(acc, &[-v]);
            let high = self.cofactor_cube(acc, &[v]);
            self.apply_or(low, high)
        })
    }

    // f|v<-g
    pub fn compose(&self, f: Ref, v: u32, g: Ref) -> Ref {
        debug!("compose(f = {}, v = {}, g = {})", f, v, g);
        assert_ne!(v, 0, "Variable index should not be zero");

        if self.is_terminal(f) {
            return f;
        }

        let i = self.variable(f.index());
        if v < i {
            // 'f' does not depend on 'v'
            return f;
        }

        let key = OpKey::Compose(f, v, g);
        if let Some(&res) = self.cache.borrow().get(&key) {
            return res;
        }

        let res = if v == i {
            self.apply_ite(g, self.high_node(f), self.low_node(f))
        } else {
            let m = if self.is_terminal(g) {
                i
            } else {
                min(i, self.variable(g.index()))
            };

            let (f0, f1) = self.top_cofactors(f, m);
            let (g0, g1) = self.top_cofactors(g, m);
            let h0 = self.compose(f0, v, g0);
            let h1 = self.compose(f1, v, g1);

            // `g` may reach below `v`, so rebuild with ITE rather than `mk_node`.
            let x = self.mk_var(m);
            self.apply_ite(x, h1, h0)
        };
        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Rename every variable `v` of `f` to `map(v)`.
    ///
    /// `map` need not preserve the variable order.
    pub fn rename(&self, f: Ref, map: impl Fn(u32) -> u32) -> Ref {
        let mut cache = HashMap::new();
        self.rename_(f, &map, &mut cache)
    }

    fn rename_(&self, f: Ref, map: &impl Fn(u32) -> u32, cache: &mut HashMap<Ref, Ref>) -> Ref {
        if self.is_terminal(f) {
            return f;
        }
        if let Some(&res) = cache.get(&f) {
            return res;
        }

        let v = self.variable(f.index());
        let low = self.rename_(self.low_node(f), map, cache);
        let high = self.rename_(self.high_node(f), map, cache);
        let res = self.apply_ite(self.mk_var(map(v)), high, low);
        cache.insert(f, res);
        res
    }

    /// Cofactor with respect to a (not necessarily sorted) cube of DIMACS literals.
    pub fn cofactor_cube(&self, f: Ref, cube: &[i32]) -> Ref {
        let mut cube = cube.to_vec();
        cube.sort_by_key(|lit| lit.unsigned_abs());
        self.cofactor_cube_(f, &cube)
    }

    fn cofactor_cube_(&self, f: Ref, cube: &[i32]) -> Ref {
        if cube.is_empty() || self.is_terminal(f) {
            return f;
        }

        let t = self.variable(f.index());
        let xu = cube[0];
        let u = xu.unsigned_abs();

        match t.cmp(&u) {
            Ordering::Greater => self.cofactor_cube_(f, &cube[1..]),
            Ordering::Equal => {
                let (f0, f1) = self.top_cofactors(f, u);
                if xu > 0 {
                    self.cofactor_cube_(f1, &cube[1..])
                } else {
                    self.cofactor_cube_(f0, &cube[1..])
                }
            }
            Ordering::Less => {
                let (f0, f1) = self.top_cofactors(f, t);
                let low = self.cofactor_cube_(f0, cube);
                let high = self.cofactor_cube_(f1, cube);
                self.mk_node(t, low, high)
            }
        }
    }

    /// Build a function over `vars` from its truth vector.
    ///
    /// `vars` must be strictly ascending. Bit `k` of the argument passed to
    /// `value` is the value of `vars[k]`.
    pub fn from_fn(&self, vars: &[u32], value: impl Fn(u64) -> bool) -> Ref {
        assert!(vars.len() < 64, "Too many variables for a truth vector");
        assert!(
            vars.windows(2).all(|w| w[0] < w[1]),
            "Variables should be strictly ascending"
        );
        self.from_fn_(vars, 0, 0, &value)
    }

    fn from_fn_(&self, vars: &[u32], level: usize, prefix: u64, value: &impl Fn(u64) -> bool) -> Ref {
        if level == vars.len() {
            return self.constant(value(prefix));
        }
        let low = self.from_fn_(vars, level + 1, prefix, value);
        let high = self.from_fn_(vars, level + 1, prefix | (1 << level), value);
        self.mk_node(vars[level], low, high)
    }

    /// Evaluate `f` under the assignment given by `value(var)`.
    pub fn evaluate(&self, f: Ref, value: impl Fn(u32) -> bool) -> bool {
        let mut current = f;
        while !self.is_terminal(current) {
            let v = self.variable(current.index());
            current = if value(v) {
                self.high_node(current)
            } else {
                self.low_node(current)
            };
        }
        self.is_one(current)
    }

    /// Variables `f` depends on, in ascending order.
    pub fn support(&self, f: Ref) -> Vec<u32> {
        let mut vars: Vec<u32> = self
            .descendants([f])
            .into_iter()
            .map(|i| self.variable(i))
            .filter(|&v| v != 0)
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        vars.sort_unstable();
        vars
    }

    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<u32> {
        let mut visited = HashSet::new();
        visited.insert(self.one.index());
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            let i = node.index();
            if visited.insert(i) {
                queue.push_back(self.low(i));
                queue.push_back(self.high(i));
            }
        }

        visited
    }

    pub fn size(&self, f: Ref) -> u64 {
        if let Some(&size) = self.size_cache.borrow().get(&f) {
            return size;
        }
        let size = self.descendants([f]).len() as u64;
        debug!("computed: size({}) -> {}", f, size);
        self.size_cache.borrow_mut().insert(f, size);
        size
    }

    /// Keep `f` alive across collections until a matching [`Bdd::unprotect`].
    pub fn protect(&self, f: Ref) {
        *self.protected.borrow_mut().entry(f.index()).or_insert(0) += 1;
    }

    pub fn unprotect(&self, f: Ref) {
        let mut protected = self.protected.borrow_mut();
        if let Some(count) = protected.get_mut(&f.index()) {
            *count -= 1;
            if *count == 0 {
                protected.remove(&f.index());
            }
        }
    }

    pub fn capacity(&self) -> usize {
        self.storage.borrow().capacity()
    }

    /// More than half of the storage is in use.
    pub fn is_crowded(&self) -> bool {
        2 * self.num_nodes() > self.capacity()
    }

    /// Drop every node reachable neither from `roots` nor from a protected root.
    ///
    /// Any other [`Ref`] is invalid afterwards.
    pub fn collect_garbage(&self, roots: &[Ref]) {
        self.cache.borrow_mut().clear();
        self.size_cache.borrow_mut().clear();

        let protected: Vec<Ref> = self
            .protected
            .borrow()
            .keys()
            .map(|&i| Ref::positive(i))
            .collect();
        let alive = self.descendants(roots.iter().copied().chain(protected));
        let before = self.num_nodes();
        self.storage
            .borrow_mut()
            .retain(|index| alive.contains(&(index as u32)));
        debug!(
            "collect_garbage: {} -> {} nodes",
            before,
            self.num_nodes()
        );
    }

}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_var() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);

        assert_eq!(bdd.variable(x.index()), 1);
        assert_eq!(bdd.high_node(x), bdd.one);
        assert_eq!(bdd.low_node(x), bdd.zero);
        assert_eq!(bdd.high_node(-x), bdd.zero);
        assert_eq!(bdd.low_node(-x), bdd.one);
    }

    #[test]
    fn test_terminal() {
        let bdd = Bdd::default();

        assert!(bdd.is_terminal(bdd.zero));
        assert!(bdd.is_zero(bdd.zero));
        assert!(!bdd.is_one(bdd.zero));
        assert!(bdd.is_one(bdd.one));
        assert_eq!(bdd.variable(bdd.one.index()), 0);
    }

    #[test]
    fn test_cube() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_and_many([x1, -x2, -x3]);
        assert_eq!(f, bdd.cube([-3, 1, -2]));
        assert_eq!(bdd.cube([]), bdd.one);
    }

    #[test]
    fn test_de_morgan() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);

        assert_eq!(-bdd.apply_and(x, y), bdd.apply_or(-x, -y));
        assert_eq!(-bdd.apply_or(x, y), bdd.apply_and(-x, -y));
    }

    #[test]
    fn test_xor() {
        let bdd = Bdd::default();

        let x = bdd.mk_var(1);
        let y = bdd.mk_var(2);
        let f = bdd.apply_and(x, y);

        assert_eq!(bdd.apply_xor(f, f), bdd.zero);
        assert_eq!(bdd.apply_xor(f, -f), bdd.one);
        assert_eq!(bdd.apply_xor(x, -y), -bdd.apply_xor(x, y));
        assert_eq!(bdd.apply_xor_many([x, y, x]), y);
    }

    #[test]
    fn test_apply_ite() {
        let bdd = Bdd::default();

        let g = bdd.mk_var(2);
        let h = bdd.mk_var(3);
        assert_eq!(bdd.apply_ite(bdd.one, g, h), g);
        assert_eq!(bdd.apply_ite(bdd.zero, g, h), h);

        let f = bdd.mk_node(1, bdd.one, h);
        assert_eq!(bdd.apply_ite(f, f, h), bdd.apply_or(f, h));
        assert_eq!(bdd.apply_ite(f, g, f), bdd.apply_and(f, g));
        assert_eq!(bdd.apply_ite(f, -g, bdd.one), -bdd.apply_and(f, g));

        let f = bdd.mk_var(6);
        let g = bdd.mk_var(7);
        let h = bdd.mk_var(8);
        let result = bdd.mk_node(6, -g, -h);
        assert_eq!(bdd.apply_ite(-f, -g, -h), result);
    }

    #[test]
    fn test_cofactor_cube() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_and(x1, x2);
        assert_eq!(bdd.cofactor_cube(f, &[1, 2]), bdd.one);
        assert_eq!(bdd.cofactor_cube(f, &[2, -1]), bdd.zero);
        assert_eq!(bdd.cofactor_cube(f, &[1]), x2);
        assert_eq!(bdd.cofactor_cube(bdd.one, &[1]), bdd.one);

        let g = bdd.apply_or(bdd.apply_and(x1, x3), x2);
        assert_eq!(bdd.cofactor_cube(g, &[-2]), bdd.apply_and(x1, x3));
    }

    #[test]
    fn test_exists() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_and_many([x1, -x2, x3]);
        assert_eq!(bdd.exists(f, &[2]), bdd.apply_and(x1, x3));
        assert_eq!(bdd.exists(f, &[1, 2, 3]), bdd.one);
    }

    #[test]
    fn test_compose() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        let f = bdd.apply_and(bdd.apply_eq(x1, x2), x3);
        let g = -bdd.apply_eq(x1, x2);
        let h = bdd.compose(f, 3, g);
        assert!(bdd.is_zero(h));
    }

    #[test]
    fn test_compose_with_lower_function() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);

        // f = x1 & x2, substitute x1 := x2 ^ x3
        let f = bdd.apply_and(x1, x2);
        let g = bdd.apply_xor(x2, x3);
        let h = bdd.compose(f, 1, g);
        assert_eq!(h, bdd.apply_and(x2, -x3));
    }

    #[test]
    fn test_rename() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x5 = bdd.mk_var(5);
        let x6 = bdd.mk_var(6);

        // Reversing the order of the two variables.
        let f = bdd.apply_and(x1, -x2);
        let g = bdd.rename(f, |v| 7 - v);
        assert_eq!(g, bdd.apply_and(x6, -x5));
        assert_eq!(bdd.rename(-f, |v| 7 - v), -g);
    }

    #[test]
    fn test_evaluate() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let f = bdd.apply_xor(x1, x2);

        assert!(!bdd.evaluate(f, |_| false));
        assert!(bdd.evaluate(f, |v| v == 2));
        assert!(!bdd.evaluate(f, |_| true));
        assert!(bdd.evaluate(-f, |_| true));
    }

    #[test]
    fn test_from_fn() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x3 = bdd.mk_var(3);

        // bit 0 is x1, bit 1 is x3
        let f = bdd.from_fn(&[1, 3], |a| a == 0b01 || a == 0b10);
        assert_eq!(f, bdd.apply_xor(x1, x3));
        assert_eq!(bdd.from_fn(&[], |_| true), bdd.one);
        assert_eq!(bdd.from_fn(&[2, 4], |_| false), bdd.zero);
    }

    #[test]
    fn test_support() {
        let bdd = Bdd::default();

        let x1 = bdd.mk_var(1);
        let x3 = bdd.mk_var(3);
        let f = bdd.apply_or(x1, -x3);
        assert_eq!(bdd.support(f), vec![1, 3]);
        assert_eq!(bdd.support(bdd.one), Vec::<u32>::new());
    }

    #[test]
    fn test_collect_garbage() {
        let bdd = Bdd::new(10);

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);
        let keep = bdd.apply_and(x1, x2);
        let _drop = bdd.apply_xor(bdd.apply_xor(x1, x2), x3);

        let before = bdd.num_nodes();
        bdd.collect_garbage(&[keep]);
        assert!(bdd.num_nodes() < before);
        assert_eq!(bdd.size(keep), 3);

        // The kept function is still canonical.
        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        assert_eq!(bdd.apply_and(x1, x2), keep);
    }

    #[test]
    fn test_collect_garbage_keeps_protected() {
        let bdd = Bdd::new(10);

        let x1 = bdd.mk_var(1);
        let x2 = bdd.mk_var(2);
        let x3 = bdd.mk_var(3);
        let f = bdd.apply_xor_many([x1, x2, x3]);
        bdd.protect(f);
        bdd.protect(f);

        bdd.collect_garbage(&[]);
        assert_eq!(bdd.size(f), 4);
        assert!(bdd.evaluate(f, |v| v == 2));

        // Still held once.
        bdd.unprotect(f);
        bdd.collect_garbage(&[]);
        assert_eq!(bdd.size(f), 4);

        bdd.unprotect(f);
        bdd.collect_garbage(&[]);
        assert_eq!(bdd.num_nodes(), 1);
    }
}
