use std::collections::HashMap;

use num_bigint::BigUint;

use crate::bdd::Bdd;
use crate::reference::Ref;
use crate::types::Lit;

impl Bdd {
    /// Returns one satisfying assignment for the BDD, if any exists.
    ///
    /// The assignment is a path, so variables skipped by the path are
    /// don't-cares and do not appear in the result.
    pub fn one_sat(&self, node: Ref) -> Option<Vec<Lit>> {
        self.walk_sat(node, true)
    }

    /// Returns the satisfying path that is smallest in the variable order,
    /// reading a variable closer to the root as more significant.
    ///
    /// Setting every skipped variable to false turns the result into the
    /// lexicographically smallest model.
    pub fn min_sat(&self, node: Ref) -> Option<Vec<Lit>> {
        self.walk_sat(node, false)
    }

    fn walk_sat(&self, node: Ref, prefer_high: bool) -> Option<Vec<Lit>> {
        if self.is_zero(node) {
            return None;
        }

        let mut path = Vec::new();
        let mut current = node;

        // In a reduced BDD every non-zero node has a non-zero child.
        while !self.is_one(current) {
            let var = self.variable(current.index());
            let high = self.high_node(current);
            let low = self.low_node(current);

            let take_high = if prefer_high {
                !self.is_zero(high)
            } else {
                self.is_zero(low)
            };
            if take_high {
                path.push(Lit::pos(var));
                current = high;
            } else {
                path.push(Lit::neg(var));
                current = low;
            }
        }

        Some(path)
    }

    /// Number of models of `node` over variables `1..=num_vars`.
    pub fn sat_count(&self, node: Ref, num_vars: usize) -> BigUint {
        let mut cache = HashMap::new();
        let max = BigUint::from(1u32) << num_vars;
        self.sat_count_(node, &max, &mut cache)
    }

    fn sat_count_(&self, node: Ref, max: &BigUint, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return max.clone();
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let low = self.low(node.index());
        let high = self.high(node.index());

        let count_low = self.sat_count_(low, max, cache);
        let count_high = self.sat_count_(high, max, cache);

        let count: BigUint = (count_low + count_high) >> 1;
        let count = if node.is_negated() { max - count } else { count };

        cache.insert(node, count.clone());
        count
    }
}
