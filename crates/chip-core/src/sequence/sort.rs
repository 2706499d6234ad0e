use super::Sequence;
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// `1` is ascending, `-1` descending; anything else is not a direction.
    pub fn from_sign(sign: f64) -> Option<Self> {
        if sign == 1.0 {
            Some(SortDirection::Ascending)
        } else if sign == -1.0 {
            Some(SortDirection::Descending)
        } else {
            None
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

impl<T: Clone> Sequence<T> {
    /// In-place quicksort with a middle-element pivot. Not stable.
    pub fn quick_sort_by<E>(
        &mut self,
        direction: SortDirection,
        mut compare: impl FnMut(&T, &T) -> Result<Ordering, E>,
    ) -> Result<&mut Self, E> {
        if self.len() > 1 {
            let high = self.len() as isize - 1;
            self.quick_sort_range(0, high, &mut |a, b| {
                compare(a, b).map(|ordering| direction.apply(ordering))
            })?;
        }
        Ok(self)
    }

    fn quick_sort_range<E>(
        &mut self,
        low: isize,
        high: isize,
        compare: &mut impl FnMut(&T, &T) -> Result<Ordering, E>,
    ) -> Result<(), E> {
        let index = self.partition_range(low, high, compare)?;
        if low < index - 1 {
            self.quick_sort_range(low, index - 1, compare)?;
        }
        if index < high {
            self.quick_sort_range(index, high, compare)?;
        }
        Ok(())
    }

    /// Hoare partition around the middle element; returns the split point.
    fn partition_range<E>(
        &mut self,
        low: isize,
        high: isize,
        compare: &mut impl FnMut(&T, &T) -> Result<Ordering, E>,
    ) -> Result<isize, E> {
        let Some(pivot) = self.get(((low + high) / 2) as usize).cloned() else {
            return Ok(low);
        };
        let (mut i, mut j) = (low, high);
        while i <= j {
            while let Some(item) = self.get(i as usize) {
                if compare(item, &pivot)? != Ordering::Less {
                    break;
                }
                i += 1;
            }
            while j >= 0 {
                let Some(item) = self.get(j as usize) else {
                    break;
                };
                if compare(item, &pivot)? != Ordering::Greater {
                    break;
                }
                j -= 1;
            }
            if i <= j {
                self.swap(i as usize, j as usize);
                i += 1;
                j -= 1;
            }
        }
        Ok(i)
    }

    /// Stable out-of-place merge sort. Halves are merged from their tails, prepending
    /// the larger element to the output, so ties keep their input order.
    pub fn merge_sort_by<E>(
        &self,
        mut compare: impl FnMut(&T, &T) -> Result<Ordering, E>,
    ) -> Result<Sequence<T>, E> {
        merge_sort(self.copy(), &mut compare)
    }
}

fn merge_sort<T, E>(
    items: Sequence<T>,
    compare: &mut impl FnMut(&T, &T) -> Result<Ordering, E>,
) -> Result<Sequence<T>, E> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let mut front = items.into_vec();
    let back = front.split_off(front.len() / 2);
    let mut left = merge_sort(Sequence::from_vec(front), compare)?;
    let mut right = merge_sort(Sequence::from_vec(back), compare)?;

    let mut out = Sequence::new();
    while let (Some(l), Some(r)) = (left.last(), right.last()) {
        let taken = if compare(l, r)? == Ordering::Greater {
            left.cut()
        } else {
            right.cut()
        };
        if let Some(item) = taken {
            out.prepend(item);
        }
    }
    while let Some(item) = right.cut() {
        out.prepend(item);
    }
    while let Some(item) = left.cut() {
        out.prepend(item);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(items: &[i32]) -> Sequence<i32> {
        Sequence::from_vec(items.to_vec())
    }

    #[test]
    fn test_quick_sort_both_directions() {
        let mut s = numbers(&[5, 3, 9, 1, 5, 0, -2]);
        s.quick_sort_by(SortDirection::Ascending, |a, b| Ok::<_, ()>(a.cmp(b)))
            .unwrap();
        assert_eq!(s.clone().into_vec(), vec![-2, 0, 1, 3, 5, 5, 9]);
        s.quick_sort_by(SortDirection::Descending, |a, b| Ok::<_, ()>(a.cmp(b)))
            .unwrap();
        assert_eq!(s.into_vec(), vec![9, 5, 5, 3, 1, 0, -2]);
    }

    #[test]
    fn test_quick_sort_propagates_comparison_error() {
        let mut s = numbers(&[2, 1]);
        let result = s.quick_sort_by(SortDirection::Ascending, |_, _| Err::<Ordering, _>("boom"));
        assert_eq!(result.err(), Some("boom"));
    }

    #[test]
    fn test_merge_sort_is_stable_and_out_of_place() {
        let input = Sequence::from_vec(vec![(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (0, 'e')]);
        let sorted = input
            .merge_sort_by(|a, b| Ok::<_, ()>(a.0.cmp(&b.0)))
            .unwrap();
        assert_eq!(
            sorted.into_vec(),
            vec![(0, 'e'), (1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]
        );
        assert_eq!(input.get(0), Some(&(2, 'a')));
    }

    #[test]
    fn test_direction_from_sign() {
        assert_eq!(SortDirection::from_sign(1.0), Some(SortDirection::Ascending));
        assert_eq!(SortDirection::from_sign(-1.0), Some(SortDirection::Descending));
        assert_eq!(SortDirection::from_sign(0.0), None);
    }
}
