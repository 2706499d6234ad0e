use chip_core::sequence::{Sequence, SortDirection};
use proptest::prelude::*;
use std::cmp::Ordering;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
enum Op {
    Push(i32),
    Unshift(i32),
    Pop,
    Shift,
    Balance,
    Reverse,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        any::<i32>().prop_map(Op::Push),
        any::<i32>().prop_map(Op::Unshift),
        Just(Op::Pop),
        Just(Op::Shift),
        Just(Op::Balance),
        Just(Op::Reverse),
    ]
}

fn ascending(a: &i32, b: &i32) -> Result<Ordering, ()> {
    Ok(a.cmp(b))
}

proptest! {
    /// Any interleaving of end operations behaves like a double-ended queue.
    #[test]
    fn sequence_matches_deque_model(ops in prop::collection::vec(op(), 0..200)) {
        let mut seq = Sequence::new();
        let mut model = VecDeque::new();
        for op in ops {
            match op {
                Op::Push(x) => {
                    model.push_back(x);
                    prop_assert_eq!(seq.push(x), model.len());
                }
                Op::Unshift(x) => {
                    model.push_front(x);
                    prop_assert_eq!(seq.unshift(x), model.len());
                }
                Op::Pop => prop_assert_eq!(seq.pop(), model.pop_back()),
                Op::Shift => prop_assert_eq!(seq.shift(), model.pop_front()),
                Op::Balance => {
                    seq.balance();
                }
                Op::Reverse => {
                    seq.reverse();
                    model = model.into_iter().rev().collect();
                }
            }
            prop_assert_eq!(seq.len(), model.len());
            prop_assert_eq!(seq.first(), model.front());
            prop_assert_eq!(seq.last(), model.back());
        }
        let items: Vec<i32> = seq.iter().copied().collect();
        let expected: Vec<i32> = model.into_iter().collect();
        prop_assert_eq!(items, expected);
    }

    /// Indexed reads agree with the model from both ends.
    #[test]
    fn indexing_matches_model(front in prop::collection::vec(any::<i32>(), 0..50),
                              back in prop::collection::vec(any::<i32>(), 0..50)) {
        let mut seq = Sequence::new();
        let mut model = VecDeque::new();
        for &x in &front {
            seq.unshift(x);
            model.push_front(x);
        }
        for &x in &back {
            seq.push(x);
            model.push_back(x);
        }
        for i in 0..model.len() {
            prop_assert_eq!(seq.get(i), model.get(i));
            let from_end = -(i as isize) - 1;
            prop_assert_eq!(seq.at(from_end), model.get(model.len() - 1 - i));
        }
        prop_assert_eq!(seq.get(model.len()), None);
    }

    #[test]
    fn quick_sort_orders_and_preserves_items(items in prop::collection::vec(-1000i32..1000, 0..100),
                                             descending in any::<bool>()) {
        let direction = if descending { SortDirection::Descending } else { SortDirection::Ascending };
        let mut seq = Sequence::from_vec(items.clone());
        seq.quick_sort_by(direction, ascending).unwrap();

        let mut expected = items;
        expected.sort();
        if descending {
            expected.reverse();
        }
        prop_assert_eq!(seq.into_vec(), expected);
    }

    /// Tagged duplicates keep their original relative order.
    #[test]
    fn merge_sort_is_stable(keys in prop::collection::vec(0u8..5, 0..100)) {
        let tagged: Vec<(u8, usize)> = keys.iter().copied().zip(0..).collect();
        let seq = Sequence::from_vec(tagged.clone());
        let sorted = seq
            .merge_sort_by(|a: &(u8, usize), b: &(u8, usize)| Ok::<_, ()>(a.0.cmp(&b.0)))
            .unwrap();

        let mut expected = tagged;
        expected.sort_by_key(|(key, _)| *key);
        prop_assert_eq!(sorted.into_vec(), expected);
        prop_assert_eq!(seq.len(), keys.len());
    }
}
