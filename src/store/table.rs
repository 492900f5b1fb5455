//! A single keyed relation with its own id sequence.

use std::collections::BTreeMap;
use std::collections::btree_map::{Values, ValuesMut};

/// Rows keyed by a surrogate integer id, handed out in increasing order.
///
/// Ids are never reused, even after a row is removed.
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    /// Allocates the next id, builds the row from it, and stores it.
    pub fn insert_with(&mut self, build: impl FnOnce(i64) -> T) -> &T {
        self.last_id += 1;
        let id = self.last_id;
        self.rows.entry(id).or_insert(build(id))
    }

    /// Looks up a row by id.
    pub fn get(&self, id: i64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// Looks up a row by id for modification.
    pub fn get_mut(&mut self, id: i64) -> Option<&mut T> {
        self.rows.get_mut(&id)
    }

    /// Removes a row, returning it if it existed.
    pub fn remove(&mut self, id: i64) -> Option<T> {
        self.rows.remove(&id)
    }

    /// Removes every row matching `predicate`, returning how many went.
    pub fn remove_where(&mut self, mut predicate: impl FnMut(&T) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|_, row| !predicate(row));
        before - self.rows.len()
    }

    /// Iterates rows in id order.
    pub fn values(&self) -> Values<'_, i64, T> {
        self.rows.values()
    }

    /// Iterates rows in id order for modification.
    pub fn values_mut(&mut self) -> ValuesMut<'_, i64, T> {
        self.rows.values_mut()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
