//! In-memory versioned table shared by the post and comment repositories.
//!
//! Rows are keyed by a store-assigned id. Every write bumps `version`; an
//! update whose version no longer matches the stored row is rejected with
//! `Conflict` instead of overwriting a concurrent change.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::errors::{BlogError, BlogResult};

pub(crate) trait Record: Clone {
    const TABLE: &'static str;

    fn id(&self) -> u64;
    fn set_id(&mut self, id: u64);
    fn version(&self) -> u64;
    fn set_version(&mut self, version: u64);
}

#[derive(Debug)]
struct TableState<T> {
    rows: BTreeMap<u64, T>,
    last_id: u64,
}

#[derive(Debug)]
pub(crate) struct VersionedTable<T> {
    state: RwLock<TableState<T>>,
}

impl<T> Default for VersionedTable<T> {
    fn default() -> Self {
        Self {
            state: RwLock::new(TableState {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }
}

fn poisoned() -> BlogError {
    BlogError::Storage("Lock poisoned".to_string())
}

impl<T: Record> VersionedTable<T> {
    pub fn get(&self, id: u64) -> BlogResult<Option<T>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.rows.get(&id).cloned())
    }

    pub fn scan(&self, pred: impl Fn(&T) -> bool) -> BlogResult<Vec<T>> {
        let state = self.state.read().map_err(|_| poisoned())?;
        Ok(state.rows.values().filter(|r| pred(r)).cloned().collect())
    }

    /// Assign the next id and version 1
    pub fn insert(&self, mut row: T) -> BlogResult<T> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        state.last_id += 1;
        row.set_id(state.last_id);
        row.set_version(1);
        state.rows.insert(row.id(), row.clone());

        Ok(row)
    }

    /// Replace a row if its version still matches the stored one
    pub fn update(&self, row: &T) -> BlogResult<T> {
        let mut state = self.state.write().map_err(|_| poisoned())?;

        let stored = state
            .rows
            .get_mut(&row.id())
            .ok_or_else(|| BlogError::not_found(T::TABLE, row.id()))?;

        if stored.version() != row.version() {
            return Err(BlogError::Conflict {
                kind: T::TABLE,
                id: row.id(),
            });
        }

        let mut next = row.clone();
        next.set_version(row.version() + 1);
        *stored = next.clone();

        Ok(next)
    }

    pub fn remove(&self, id: u64) -> BlogResult<T> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        state
            .rows
            .remove(&id)
            .ok_or_else(|| BlogError::not_found(T::TABLE, id))
    }

    pub fn remove_where(&self, pred: impl Fn(&T) -> bool) -> BlogResult<usize> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let before = state.rows.len();
        state.rows.retain(|_, r| !pred(r));
        Ok(before - state.rows.len())
    }
}
