//! Double-ended ordered collection backing every Chip sequence value.
//!
//! Elements live in two runs split around a logical zero point: `left` holds the
//! elements before zero in reverse order, `right` the rest in forward order. Pushing or
//! popping at either end touches only one run, indexed access resolves to one run
//! directly. Removing from an empty run first redistributes all elements evenly
//! between the two runs, so one-sided draining stays amortized O(1).

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::iter::{Chain, Rev};

mod sets;
mod sort;

pub use sort::SortDirection;

pub type Iter<'a, T> = Chain<Rev<std::slice::Iter<'a, T>>, std::slice::Iter<'a, T>>;
pub type IntoIter<T> = Chain<Rev<std::vec::IntoIter<T>>, std::vec::IntoIter<T>>;

#[derive(Clone)]
pub struct Sequence<T> {
    left: Vec<T>,
    right: Vec<T>,
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sequence<T> {
    pub fn new() -> Self {
        Sequence {
            left: Vec::new(),
            right: Vec::new(),
        }
    }

    /// Build a balanced sequence from the items of `items`, in order.
    pub fn from_vec(mut items: Vec<T>) -> Self {
        let right = items.split_off(items.len() / 2);
        items.reverse();
        Sequence { left: items, right }
    }

    pub fn len(&self) -> usize {
        self.left.len() + self.right.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }

    /// Number of elements stored before and after the logical zero point.
    pub fn run_lengths(&self) -> (usize, usize) {
        (self.left.len(), self.right.len())
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        let offset = self.left.len();
        if index < offset {
            self.left.get(offset - 1 - index)
        } else {
            self.right.get(index - offset)
        }
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        let offset = self.left.len();
        if index < offset {
            self.left.get_mut(offset - 1 - index)
        } else {
            self.right.get_mut(index - offset)
        }
    }

    /// Resolve a possibly negative index; negative values count from the end.
    pub fn resolve_index(&self, index: isize) -> Option<usize> {
        let len = self.len() as isize;
        let resolved = if index < 0 { len + index } else { index };
        (0..len).contains(&resolved).then_some(resolved as usize)
    }

    pub fn at(&self, index: isize) -> Option<&T> {
        self.resolve_index(index).and_then(|i| self.get(i))
    }

    pub fn first(&self) -> Option<&T> {
        self.get(0)
    }

    pub fn last(&self) -> Option<&T> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Whether `|index|` addresses an element.
    pub fn is_in_bounds(&self, index: isize) -> bool {
        index.unsigned_abs() < self.len()
    }

    /// Add to the end, returning the new length.
    pub fn push(&mut self, item: T) -> usize {
        self.right.push(item);
        self.len()
    }

    /// Add to the front, returning the new length.
    pub fn unshift(&mut self, item: T) -> usize {
        self.left.push(item);
        self.len()
    }

    /// Remove from the end.
    pub fn pop(&mut self) -> Option<T> {
        if self.right.is_empty() {
            if self.left.len() <= 1 {
                return self.left.pop();
            }
            self.balance();
        }
        self.right.pop()
    }

    /// Remove from the front.
    pub fn shift(&mut self) -> Option<T> {
        if self.left.is_empty() {
            if self.right.len() <= 1 {
                return self.right.pop();
            }
            self.balance();
        }
        self.left.pop()
    }

    pub fn append(&mut self, item: T) -> &mut Self {
        self.push(item);
        self
    }

    pub fn prepend(&mut self, item: T) -> &mut Self {
        self.unshift(item);
        self
    }

    /// Remove and return the last element.
    pub fn cut(&mut self) -> Option<T> {
        self.pop()
    }

    /// Remove and return the first element.
    pub fn chop(&mut self) -> Option<T> {
        self.shift()
    }

    /// Drop the last element.
    pub fn head(&mut self) -> &mut Self {
        self.pop();
        self
    }

    /// Drop the first element.
    pub fn tail(&mut self) -> &mut Self {
        self.shift();
        self
    }

    /// Replace the element at `index`, returning the previous one. Out of range
    /// indexes leave the sequence untouched and hand the item back.
    pub fn set(&mut self, index: usize, item: T) -> Result<T, T> {
        match self.get_mut(index) {
            Some(slot) => Ok(std::mem::replace(slot, item)),
            None => Err(item),
        }
    }

    pub fn swap(&mut self, a: usize, b: usize) {
        if a == b || a >= self.len() || b >= self.len() {
            return;
        }
        let offset = self.left.len();
        match (a < offset, b < offset) {
            (true, true) => self.left.swap(offset - 1 - a, offset - 1 - b),
            (false, false) => self.right.swap(a - offset, b - offset),
            (true, false) => std::mem::swap(
                &mut self.left[offset - 1 - a],
                &mut self.right[b - offset],
            ),
            (false, true) => std::mem::swap(
                &mut self.left[offset - 1 - b],
                &mut self.right[a - offset],
            ),
        }
    }

    pub fn clear(&mut self) -> &mut Self {
        self.left.clear();
        self.right.clear();
        self
    }

    /// Redistribute the elements evenly around the zero point.
    pub fn balance(&mut self) -> &mut Self {
        let mut items = std::mem::take(self).into_vec();
        let right = items.split_off(items.len() / 2);
        items.reverse();
        self.left = items;
        self.right = right;
        self
    }

    /// Reversal swaps the two runs.
    pub fn reverse(&mut self) -> &mut Self {
        std::mem::swap(&mut self.left, &mut self.right);
        self
    }

    /// Move the first `n` elements to the end.
    pub fn rotate_left(&mut self, n: usize) -> &mut Self {
        if self.is_empty() {
            return self;
        }
        for _ in 0..n % self.len() {
            if let Some(item) = self.shift() {
                self.push(item);
            }
        }
        self
    }

    /// Move the last `n` elements to the front.
    pub fn rotate_right(&mut self, n: usize) -> &mut Self {
        if self.is_empty() {
            return self;
        }
        for _ in 0..n % self.len() {
            if let Some(item) = self.pop() {
                self.unshift(item);
            }
        }
        self
    }

    /// Remove `delete_count` elements starting at `start` and insert `items` in their
    /// place. Returns the removed elements.
    pub fn splice(
        &mut self,
        start: usize,
        delete_count: usize,
        items: impl IntoIterator<Item = T>,
    ) -> Sequence<T> {
        let mut all = std::mem::take(self).into_vec();
        let start = start.min(all.len());
        let end = start.saturating_add(delete_count).min(all.len());
        let removed: Vec<T> = all.splice(start..end, items).collect();
        *self = Sequence::from_vec(all);
        Sequence::from_vec(removed)
    }

    /// Insert `items` so the first of them lands at `index`.
    pub fn add_at(&mut self, index: usize, items: impl IntoIterator<Item = T>) -> &mut Self {
        self.splice(index, 0, items);
        self
    }

    /// Remove up to `amount` elements starting at `index`.
    pub fn remove_from(&mut self, index: usize, amount: usize) -> &mut Self {
        self.splice(index, amount, std::iter::empty());
        self
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.left.iter().rev().chain(self.right.iter())
    }

    pub fn into_vec(self) -> Vec<T> {
        let mut items = self.left;
        items.reverse();
        items.extend(self.right);
        items
    }

    /// Map every element through a fallible callback receiving the element and its index.
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(&T, usize) -> Result<U, E>,
    ) -> Result<Sequence<U>, E> {
        self.iter().enumerate().map(|(i, item)| f(item, i)).collect()
    }

    /// Build the `depth`-levels-deep matrix described by `dimensions`.
    ///
    /// The LAST dimension is consumed first: it is the element count of the outermost
    /// level, and the remaining list is passed down to build each element. An empty
    /// list produces a `leaf`. `matrix([2, 3])` is 3 rows of 2 leaves.
    pub fn matrix<F, W>(mut dimensions: Vec<usize>, leaf: &F, wrap: &W) -> T
    where
        F: Fn() -> T,
        W: Fn(Sequence<T>) -> T,
    {
        let Some(count) = dimensions.pop() else {
            return leaf();
        };
        let level = (0..count)
            .map(|_| Self::matrix(dimensions.clone(), leaf, wrap))
            .collect();
        wrap(level)
    }
}

impl<T: Clone> Sequence<T> {
    /// Copy of `[start, end)`; negative bounds count from the end, bounds are clamped.
    pub fn slice(&self, start: isize, end: Option<isize>) -> Sequence<T> {
        let len = self.len() as isize;
        let clamp = |i: isize| if i < 0 { (len + i).max(0) } else { i.min(len) };
        let start = clamp(start) as usize;
        let end = clamp(end.unwrap_or(len)) as usize;
        self.iter()
            .skip(start)
            .take(end.saturating_sub(start))
            .cloned()
            .collect()
    }

    pub fn take(&self, n: usize) -> Sequence<T> {
        self.iter().take(n).cloned().collect()
    }

    pub fn take_right(&self, n: usize) -> Sequence<T> {
        self.iter()
            .skip(self.len().saturating_sub(n))
            .cloned()
            .collect()
    }

    pub fn copy(&self) -> Sequence<T> {
        self.iter().cloned().collect()
    }

    pub fn concat(&self, other: &Sequence<T>) -> Sequence<T> {
        self.iter().chain(other.iter()).cloned().collect()
    }

    /// Elements for which the fallible predicate holds.
    pub fn try_filter<E>(
        &self,
        mut keep: impl FnMut(&T, usize) -> Result<bool, E>,
    ) -> Result<Sequence<T>, E> {
        let mut out = Sequence::new();
        for (i, item) in self.iter().enumerate() {
            if keep(item, i)? {
                out.push(item.clone());
            }
        }
        Ok(out)
    }

    /// Consecutive chunks of `size` elements; the last chunk may be shorter.
    pub fn partition(&self, size: usize) -> Sequence<Sequence<T>> {
        let size = size.max(1);
        let items: Vec<T> = self.iter().cloned().collect();
        items
            .chunks(size)
            .map(|chunk| Sequence::from_vec(chunk.to_vec()))
            .collect()
    }

    /// Flatten nested elements up to `depth` levels. `children` returns the items of
    /// an element that is itself a collection.
    pub fn flat_with<F>(&self, depth: usize, children: &F) -> Sequence<T>
    where
        F: Fn(&T) -> Option<Sequence<T>>,
    {
        let mut out = Sequence::new();
        for item in self.iter() {
            match children(item) {
                Some(nested) if depth > 0 => {
                    for inner in nested.flat_with(depth - 1, children).into_iter() {
                        out.push(inner);
                    }
                }
                _ => {
                    out.push(item.clone());
                }
            }
        }
        out
    }

    /// Group elements by a fallible key, keeping groups in order of first appearance.
    pub fn try_group_by<K, E>(
        &self,
        mut key: impl FnMut(&T, usize) -> Result<K, E>,
    ) -> Result<Vec<(K, Sequence<T>)>, E>
    where
        K: Eq + Hash + Clone,
    {
        let mut positions: HashMap<K, usize> = HashMap::new();
        let mut groups: Vec<(K, Sequence<T>)> = Vec::new();
        for (i, item) in self.iter().enumerate() {
            let k = key(item, i)?;
            match positions.get(&k) {
                Some(&slot) => {
                    groups[slot].1.push(item.clone());
                }
                None => {
                    positions.insert(k.clone(), groups.len());
                    groups.push((k, Sequence::from_vec(vec![item.clone()])));
                }
            }
        }
        Ok(groups)
    }
}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Sequence::from_vec(iter.into_iter().collect())
    }
}

impl<T> Extend<T> for Sequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.right.extend(iter);
    }
}

impl<T> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.left.into_iter().rev().chain(self.right)
    }
}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> From<Vec<T>> for Sequence<T> {
    fn from(items: Vec<T>) -> Self {
        Sequence::from_vec(items)
    }
}

/// Logical equality: same length and pairwise equal elements, whatever the run layout.
impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}
