//! Set algebra over sequences. Membership is decided by a caller-supplied key, so
//! element types choose their own notion of scalar identity.

use super::Sequence;
use std::collections::HashSet;
use std::hash::Hash;

impl<T: Clone> Sequence<T> {
    fn key_set<K: Eq + Hash>(&self, key: &impl Fn(&T) -> K) -> HashSet<K> {
        self.iter().map(key).collect()
    }

    /// Distinct elements of `self`, then distinct elements of `other` not in `self`.
    pub fn union_by<K: Eq + Hash>(&self, other: &Sequence<T>, key: impl Fn(&T) -> K) -> Sequence<T> {
        let mut seen = HashSet::new();
        self.iter()
            .chain(other.iter())
            .filter(|item| seen.insert(key(item)))
            .cloned()
            .collect()
    }

    /// Distinct elements of `self` also present in `other`, in `self` order.
    pub fn intersection_by<K: Eq + Hash>(
        &self,
        other: &Sequence<T>,
        key: impl Fn(&T) -> K,
    ) -> Sequence<T> {
        let theirs = other.key_set(&key);
        let mut seen = HashSet::new();
        self.iter()
            .filter(|item| {
                let k = key(item);
                theirs.contains(&k) && seen.insert(k)
            })
            .cloned()
            .collect()
    }

    /// Distinct elements of `self` absent from `other`, in `self` order.
    pub fn difference_by<K: Eq + Hash>(
        &self,
        other: &Sequence<T>,
        key: impl Fn(&T) -> K,
    ) -> Sequence<T> {
        let theirs = other.key_set(&key);
        let mut seen = HashSet::new();
        self.iter()
            .filter(|item| {
                let k = key(item);
                !theirs.contains(&k) && seen.insert(k)
            })
            .cloned()
            .collect()
    }

    /// Elements in exactly one of the two: `self`-only first, then `other`-only.
    pub fn xor_by<K: Eq + Hash>(&self, other: &Sequence<T>, key: impl Fn(&T) -> K) -> Sequence<T> {
        let mut out = self.difference_by(other, &key);
        out.extend(other.difference_by(self, &key));
        out
    }

    /// First occurrence of every distinct element.
    pub fn unique_by<K: Eq + Hash>(&self, key: impl Fn(&T) -> K) -> Sequence<T> {
        let mut seen = HashSet::new();
        self.iter()
            .filter(|item| seen.insert(key(item)))
            .cloned()
            .collect()
    }

    /// Every element that occurs more than once, listed once, in order of its second
    /// occurrence.
    pub fn duplicates_by<K: Eq + Hash>(&self, key: impl Fn(&T) -> K) -> Sequence<T> {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut out = Sequence::new();
        for item in self.iter() {
            let k = key(item);
            if seen.contains(&k) {
                if reported.insert(k) {
                    out.push(item.clone());
                }
            } else {
                seen.insert(k);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(items: &[i32]) -> Sequence<i32> {
        Sequence::from_vec(items.to_vec())
    }

    fn id(n: &i32) -> i32 {
        *n
    }

    #[test]
    fn test_union_keeps_left_order_then_right_extras() {
        let out = seq(&[3, 1, 3]).union_by(&seq(&[2, 1, 4]), id);
        assert_eq!(out.into_vec(), vec![3, 1, 2, 4]);
    }

    #[test]
    fn test_intersection_and_difference_follow_left_order() {
        let a = seq(&[5, 1, 2, 1]);
        let b = seq(&[1, 5, 9]);
        assert_eq!(a.intersection_by(&b, id).into_vec(), vec![5, 1]);
        assert_eq!(a.difference_by(&b, id).into_vec(), vec![2]);
    }

    #[test]
    fn test_xor_left_only_then_right_only() {
        let out = seq(&[1, 2, 3]).xor_by(&seq(&[3, 4, 1, 5]), id);
        assert_eq!(out.into_vec(), vec![2, 4, 5]);
    }

    #[test]
    fn test_unique_and_duplicates() {
        let s = seq(&[1, 2, 1, 3, 2, 2]);
        assert_eq!(s.unique_by(id).into_vec(), vec![1, 2, 3]);
        assert_eq!(s.duplicates_by(id).into_vec(), vec![1, 2]);
    }
}
