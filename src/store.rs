//! Typed object store with a current entry per kind.
//!
//! The store replaces the global "current object" of a synthesis shell:
//! commands receive it explicitly, read their input from one slot and write
//! their result into another.
//!
//! ```
//! use rev_rs::permutation::TruthTable;
//! use rev_rs::store::{Kind, Store};
//!
//! let mut store = Store::default();
//! let i = store.put(TruthTable::identity(2));
//! assert_eq!(i, 0);
//! assert_eq!(store.get::<TruthTable>(None).unwrap().lines(), 2);
//! assert_eq!(store.len(Kind::Spec), 1);
//! assert!(store.get::<TruthTable>(Some(3)).is_err());
//! ```

use std::fmt::{Display, Formatter};

use log::debug;

use crate::aig::Aig;
use crate::circuit::Circuit;
use crate::error::{Result, RevError};
use crate::function::BddFunction;
use crate::permutation::TruthTable;
use crate::rcbdd::Rcbdd;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Kind {
    Spec,
    Bdd,
    Rcbdd,
    Aig,
    Circuit,
}

impl Kind {
    pub const ALL: [Kind; 5] = [Kind::Spec, Kind::Bdd, Kind::Rcbdd, Kind::Aig, Kind::Circuit];
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Kind::Spec => "spec",
            Kind::Bdd => "bdd",
            Kind::Rcbdd => "rcbdd",
            Kind::Aig => "aig",
            Kind::Circuit => "circuit",
        };
        write!(f, "{}", name)
    }
}

/// Where a command puts its result.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum Placement {
    /// Append a new entry and make it current.
    #[default]
    Append,
    /// Overwrite the current entry, or append if there is none.
    ReplaceCurrent,
}

/// Homogeneous list of entries plus the current pointer.
#[derive(Debug)]
pub struct Slot<T> {
    items: Vec<T>,
    current: Option<usize>,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            current: None,
        }
    }
}

impl<T> Slot<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    fn push(&mut self, value: T) -> usize {
        self.items.push(value);
        let index = self.items.len() - 1;
        self.current = Some(index);
        index
    }

    fn replace_current(&mut self, value: T) -> usize {
        match self.current {
            Some(index) => {
                self.items[index] = value;
                index
            }
            None => self.push(value),
        }
    }

    fn resolve(&self, index: Option<usize>) -> Option<usize> {
        match index {
            Some(i) if i < self.items.len() => Some(i),
            Some(_) => None,
            None => self.current,
        }
    }

    fn remove(&mut self, index: usize) -> T {
        let value = self.items.remove(index);
        self.current = match self.current {
            Some(c) if c == index => self.items.len().checked_sub(1),
            Some(c) if c > index => Some(c - 1),
            other => other,
        };
        value
    }

    fn clear(&mut self) {
        self.items.clear();
        self.current = None;
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }
}

/// Types that have a slot in the [`Store`].
pub trait StoreItem: Sized {
    const KIND: Kind;

    fn slot(store: &Store) -> &Slot<Self>;
    fn slot_mut(store: &mut Store) -> &mut Slot<Self>;
}

macro_rules! store_item {
    ($ty:ty, $kind:expr, $field:ident) => {
        impl StoreItem for $ty {
            const KIND: Kind = $kind;

            fn slot(store: &Store) -> &Slot<Self> {
                &store.$field
            }
            fn slot_mut(store: &mut Store) -> &mut Slot<Self> {
                &mut store.$field
            }
        }
    };
}

#[derive(Debug, Default)]
pub struct Store {
    specs: Slot<TruthTable>,
    bdds: Slot<BddFunction>,
    rcbdds: Slot<Rcbdd>,
    aigs: Slot<Aig>,
    circuits: Slot<Circuit>,
}

store_item!(TruthTable, Kind::Spec, specs);
store_item!(BddFunction, Kind::Bdd, bdds);
store_item!(Rcbdd, Kind::Rcbdd, rcbdds);
store_item!(Aig, Kind::Aig, aigs);
store_item!(Circuit, Kind::Circuit, circuits);

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` and make it current.
    pub fn put<T: StoreItem>(&mut self, value: T) -> usize {
        let index = T::slot_mut(self).push(value);
        debug!("store: put {} at {}", T::KIND, index);
        index
    }

    /// Overwrite the current entry of the kind, appending if there is none.
    pub fn replace_current<T: StoreItem>(&mut self, value: T) -> usize {
        let index = T::slot_mut(self).replace_current(value);
        debug!("store: replaced {} at {}", T::KIND, index);
        index
    }

    pub fn place<T: StoreItem>(&mut self, value: T, placement: Placement) -> usize {
        match placement {
            Placement::Append => self.put(value),
            Placement::ReplaceCurrent => self.replace_current(value),
        }
    }

    /// Entry at `index`, or the current entry when `index` is `None`.
    pub fn get<T: StoreItem>(&self, index: Option<usize>) -> Result<&T> {
        let slot = T::slot(self);
        slot.resolve(index)
            .map(|i| &slot.items[i])
            .ok_or(RevError::NotFound {
                kind: T::KIND,
                index,
            })
    }

    /// Make the entry at `index` current.
    pub fn select<T: StoreItem>(&mut self, index: usize) -> Result<()> {
        let slot = T::slot_mut(self);
        if index >= slot.len() {
            return Err(RevError::NotFound {
                kind: T::KIND,
                index: Some(index),
            });
        }
        slot.current = Some(index);
        Ok(())
    }

    /// Remove the entry at `index`. Later entries shift down by one.
    pub fn remove<T: StoreItem>(&mut self, index: usize) -> Result<T> {
        let slot = T::slot_mut(self);
        if index >= slot.len() {
            return Err(RevError::NotFound {
                kind: T::KIND,
                index: Some(index),
            });
        }
        Ok(slot.remove(index))
    }

    pub fn slot<T: StoreItem>(&self) -> &Slot<T> {
        T::slot(self)
    }

    pub fn current(&self, kind: Kind) -> Option<usize> {
        match kind {
            Kind::Spec => self.specs.current(),
            Kind::Bdd => self.bdds.current(),
            Kind::Rcbdd => self.rcbdds.current(),
            Kind::Aig => self.aigs.current(),
            Kind::Circuit => self.circuits.current(),
        }
    }

    pub fn len(&self, kind: Kind) -> usize {
        match kind {
            Kind::Spec => self.specs.len(),
            Kind::Bdd => self.bdds.len(),
            Kind::Rcbdd => self.rcbdds.len(),
            Kind::Aig => self.aigs.len(),
            Kind::Circuit => self.circuits.len(),
        }
    }

    pub fn is_empty(&self, kind: Kind) -> bool {
        self.len(kind) == 0
    }

    /// Empty the given kinds and reset their current pointers.
    pub fn clear(&mut self, kinds: &[Kind]) {
        for &kind in kinds {
            debug!("store: clear {}", kind);
            match kind {
                Kind::Spec => self.specs.clear(),
                Kind::Bdd => self.bdds.clear(),
                Kind::Rcbdd => self.rcbdds.clear(),
                Kind::Aig => self.aigs.clear(),
                Kind::Circuit => self.circuits.clear(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_on_empty_kind() {
        let store = Store::new();
        assert_eq!(
            store.get::<Circuit>(None).unwrap_err(),
            RevError::NotFound {
                kind: Kind::Circuit,
                index: None
            }
        );
        assert_eq!(
            store.get::<Circuit>(Some(0)).unwrap_err().to_string(),
            "no circuit entry at index 0"
        );
    }

    #[test]
    fn test_put_makes_current() {
        let mut store = Store::new();
        assert_eq!(store.put(Circuit::new(1)), 0);
        assert_eq!(store.put(Circuit::new(2)), 1);
        assert_eq!(store.current(Kind::Circuit), Some(1));
        assert_eq!(store.get::<Circuit>(None).unwrap().lines(), 2);
        assert_eq!(store.get::<Circuit>(Some(0)).unwrap().lines(), 1);
    }

    #[test]
    fn test_kinds_do_not_share_indices() {
        let mut store = Store::new();
        store.put(Circuit::new(1));
        assert_eq!(store.put(TruthTable::identity(1)), 0);
        assert_eq!(store.len(Kind::Circuit), 1);
        assert_eq!(store.len(Kind::Spec), 1);
    }

    #[test]
    fn test_replace_current() {
        let mut store = Store::new();
        assert_eq!(store.replace_current(Circuit::new(1)), 0);
        store.put(Circuit::new(2));
        store.select::<Circuit>(0).unwrap();
        assert_eq!(store.place(Circuit::new(3), Placement::ReplaceCurrent), 0);
        assert_eq!(store.len(Kind::Circuit), 2);
        assert_eq!(store.get::<Circuit>(None).unwrap().lines(), 3);
        assert!(store.select::<Circuit>(2).is_err());
    }

    #[test]
    fn test_remove_shifts_current() {
        let mut store = Store::new();
        for lines in 1..=3 {
            store.put(Circuit::new(lines));
        }
        let removed = store.remove::<Circuit>(0).unwrap();
        assert_eq!(removed.lines(), 1);
        assert_eq!(store.current(Kind::Circuit), Some(1));
        assert_eq!(store.get::<Circuit>(None).unwrap().lines(), 3);

        store.remove::<Circuit>(1).unwrap();
        assert_eq!(store.current(Kind::Circuit), Some(0));
        store.remove::<Circuit>(0).unwrap();
        assert_eq!(store.current(Kind::Circuit), None);
        assert!(store.remove::<Circuit>(0).is_err());
    }

    #[test]
    fn test_clear_only_named_kinds() {
        let mut store = Store::new();
        store.put(Circuit::new(1));
        store.put(TruthTable::identity(1));
        store.clear(&[Kind::Circuit]);
        assert!(store.is_empty(Kind::Circuit));
        assert_eq!(store.current(Kind::Circuit), None);
        assert_eq!(store.len(Kind::Spec), 1);
        assert_eq!(store.current(Kind::Spec), Some(0));
    }
}
