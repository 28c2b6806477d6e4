use std::cmp::min;
use std::ops::Index;

use crate::utils::MyHash;

#[derive(Clone, Default)]
struct Entry<T> {
    value: T,
    next: usize,
    occupied: bool,
}

/// Hash-consing table with chained buckets.
///
/// Cell 0 is a sentry and is never handed out, so index 0 doubles as the
/// "end of chain" marker.
pub struct Table<T> {
    data: Vec<Entry<T>>,

    buckets: Vec<usize>,
    bitmask: u64,

    /// Index of the first *possibly* free (non-occupied) cell.
    min_free: usize,
    /// Index of the last occupied cell.
    last_index: usize,
    /// Number of occupied cells.
    real_size: usize,
}

impl<T> Table<T>
where
    T: Default,
{
    /// Create a new table of size `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let capacity = 1 << bits;
        let mut data: Vec<Entry<T>> = Vec::with_capacity(capacity);
        data.resize_with(capacity, Entry::default);
        data[0].occupied = true;

        let buckets_size = 1 << min(bits, 16);

        Self {
            data,
            buckets: vec![0; buckets_size],
            bitmask: (buckets_size - 1) as u64,
            min_free: 1,
            last_index: 0,
            real_size: 0,
        }
    }
}

impl<T> Table<T> {
    pub fn capacity(&self) -> usize {
        self.data.len()
    }
    /// Index of the last occupied cell.
    pub fn size(&self) -> usize {
        self.last_index
    }
    /// Number of occupied cells.
    pub fn real_size(&self) -> usize {
        self.real_size
    }

    pub fn value(&self, index: usize) -> &T {
        assert_ne!(index, 0, "Index is 0");
        &self.data[index].value
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].occupied
    }
    pub fn next(&self, index: usize) -> usize {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next
    }
    fn set_next(&mut self, index: usize, next: usize) {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].next = next;
    }

    /// Allocate a new cell in the table and return its index.
    pub(crate) fn alloc(&mut self) -> usize {
        let index = (self.min_free..=self.last_index)
            .find(|&i| !self.is_occupied(i))
            .unwrap_or_else(|| {
                self.last_index += 1;
                self.last_index
            });

        if index >= self.capacity() {
            panic!("Storage is full");
        }

        self.data[index].occupied = true;
        self.min_free = index + 1;
        self.real_size += 1;

        index
    }

    fn free(&mut self, index: usize) {
        assert_ne!(index, 0, "Index is 0");
        self.data[index].occupied = false;
        self.min_free = min(self.min_free, index);
        self.real_size -= 1;
    }

    /// Add a new (unlinked) value to the table and return its index.
    pub fn add(&mut self, value: T) -> usize {
        let index = self.alloc();
        self.data[index].value = value;
        self.data[index].next = 0;
        index
    }

    /// Drop every chained cell for which `keep` returns false.
    ///
    /// Cells allocated via [`Table::alloc`] outside of any bucket are left alone.
    pub fn retain(&mut self, mut keep: impl FnMut(usize) -> bool) {
        for b in 0..self.buckets.len() {
            let mut kept = Vec::new();
            let mut index = self.buckets[b];
            while index != 0 {
                let next = self.next(index);
                if keep(index) {
                    kept.push(index);
                } else {
                    self.free(index);
                }
                index = next;
            }
            self.buckets[b] = kept.first().copied().unwrap_or(0);
            for w in kept.windows(2) {
                self.set_next(w[0], w[1]);
            }
            if let Some(&last) = kept.last() {
                self.set_next(last, 0);
            }
        }
    }
}

impl<T> Table<T>
where
    T: MyHash + Eq,
{
    fn bucket_index(&self, value: &T) -> usize {
        (value.hash() & self.bitmask) as usize
    }

    /// Return the index of `value`, inserting it if it is not present yet.
    pub fn put(&mut self, value: T) -> usize {
        let bucket_index = self.bucket_index(&value);
        let mut index = self.buckets[bucket_index];

        if index == 0 {
            let i = self.add(value);
            self.buckets[bucket_index] = i;
            return i;
        }

        loop {
            if &value == self.value(index) {
                return index;
            }

            let next = self.next(index);
            if next == 0 {
                let i = self.add(value);
                self.set_next(index, i);
                return i;
            }
            index = next;
        }
    }
}

impl<T> Index<usize> for Table<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.value(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
    struct Item(i32);

    impl MyHash for Item {
        fn hash(&self) -> u64 {
            self.0.unsigned_abs() as u64
        }
    }

    #[test]
    fn test_alloc() {
        let mut table = Table::<()>::new(2);
        assert_eq!(table.alloc(), 1);
        assert_eq!(table.alloc(), 2);
        assert_eq!(table.alloc(), 3);
    }

    #[test]
    #[should_panic(expected = "Storage is full")]
    fn test_alloc_too_much() {
        let mut table = Table::<()>::new(2);
        table.alloc();
        table.alloc();
        table.alloc();
        table.alloc();
    }

    #[test]
    fn test_put_chains_collisions() {
        let mut table = Table::new(2);
        let index1 = table.put(Item(5));
        let index2 = table.put(Item(-5));
        assert_ne!(index1, index2);
        assert_eq!(table[index1], Item(5));
        assert_eq!(table[index2], Item(-5));
        assert_eq!(table.next(index1), index2);
        assert_eq!(table.put(Item(-5)), index2);
    }

    #[test]
    fn test_retain_relinks_and_reuses() {
        let mut table = Table::new(3);
        let a = table.put(Item(1));
        let b = table.put(Item(-1));
        let c = table.put(Item(9));
        assert_eq!(table.real_size(), 3);

        table.retain(|i| i != a);
        assert_eq!(table.real_size(), 2);
        assert!(!table.is_occupied(a));
        assert_eq!(table.put(Item(-1)), b);
        assert_eq!(table.put(Item(9)), c);

        // The freed cell is handed out again.
        assert_eq!(table.put(Item(2)), a);
    }
}
