//! # Result Sets
//!
//! The sorted collection a search fills in.
//!
//! A [`ResultSet`] keeps the options that produced it and holds its results
//! in canonical order at all times: each insertion goes to its sorted
//! position with a binary search, so iteration order never depends on the
//! order the search discovered shapes in.

use std::cmp::Ordering;
use std::ops::Index;

/// Total order used to keep a result set sorted
pub trait CanonicalOrder {
    fn canonical_cmp(&self, other: &Self) -> Ordering;
}

/// Results of one search, always in canonical order
#[derive(Debug, Clone)]
pub struct ResultSet<O, R> {
    options: O,
    results: Vec<R>,
}

impl<O, R: CanonicalOrder> ResultSet<O, R> {
    pub(crate) fn new(options: O) -> Self {
        Self {
            options,
            results: Vec::new(),
        }
    }

    /// Insert at the sorted position.
    pub(crate) fn insert(&mut self, result: R) {
        let index = self
            .results
            .partition_point(|r| r.canonical_cmp(&result) == Ordering::Less);
        self.results.insert(index, result);
    }

    /// The options the search ran with.
    pub fn options(&self) -> &O {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.results.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.results.iter()
    }

    pub fn as_slice(&self) -> &[R] {
        &self.results
    }
}

impl<O, R> Index<usize> for ResultSet<O, R> {
    type Output = R;

    fn index(&self, index: usize) -> &R {
        &self.results[index]
    }
}

impl<'a, O, R: CanonicalOrder> IntoIterator for &'a ResultSet<O, R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
