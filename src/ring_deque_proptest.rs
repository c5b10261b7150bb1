#![cfg(test)]

// Property tests for RingDeque kept inside the crate so they can check the
// private ring links after every step.

use crate::ring_deque::{DequeError, RingDeque};
use proptest::prelude::*;
use std::collections::VecDeque;

#[derive(Clone, Debug)]
enum Op {
    PushFront(i32),
    PushBack(i32),
    PopFront,
    PopBack,
    Front,
    Back,
    Reverse,
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::PushFront),
        4 => any::<i32>().prop_map(Op::PushBack),
        3 => Just(Op::PopFront),
        3 => Just(Op::PopBack),
        1 => Just(Op::Front),
        1 => Just(Op::Back),
        1 => Just(Op::Reverse),
        1 => Just(Op::Clear),
    ]
}

fn empty_or<T>(model: Option<T>) -> Result<T, DequeError> {
    model.ok_or(DequeError::Empty)
}

// Property: State-machine equivalence against std::collections::VecDeque.
// Invariants exercised across random operation sequences:
// - `len` equals pushes minus successful pops; `is_empty` parity.
// - `front`/`back` track the model's ends; empty ends are `DequeError::Empty`.
// - `reverse` matches reversing the model.
// - The ring stays doubly consistent and returns to the sentinel in `len`
//   steps in both directions.
proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in proptest::collection::vec(arb_op(), 1..80)) {
        let mut sut: RingDeque<i32> = RingDeque::new();
        let mut model: VecDeque<i32> = VecDeque::new();

        for op in ops {
            match op {
                Op::PushFront(v) => { sut.push_front(v); model.push_front(v); }
                Op::PushBack(v) => { sut.push_back(v); model.push_back(v); }
                Op::PopFront => prop_assert_eq!(sut.pop_front(), empty_or(model.pop_front())),
                Op::PopBack => prop_assert_eq!(sut.pop_back(), empty_or(model.pop_back())),
                Op::Front => prop_assert_eq!(sut.front(), empty_or(model.front())),
                Op::Back => prop_assert_eq!(sut.back(), empty_or(model.back())),
                Op::Reverse => {
                    sut.reverse();
                    model = model.into_iter().rev().collect();
                }
                Op::Clear => { sut.clear(); model.clear(); }
            }

            prop_assert!(sut.ring_is_consistent());
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
        }

        let forward: Vec<i32> = sut.iter().copied().collect();
        let expected: Vec<i32> = model.iter().copied().collect();
        prop_assert_eq!(forward, expected);
        let backward: Vec<i32> = sut.iter().rev().copied().collect();
        let expected_rev: Vec<i32> = model.iter().rev().copied().collect();
        prop_assert_eq!(backward, expected_rev);
    }
}

// Property: reversing twice restores the original order.
proptest! {
    #[test]
    fn prop_reverse_is_involution(values in proptest::collection::vec(any::<i32>(), 0..64)) {
        let mut d: RingDeque<i32> = values.iter().copied().collect();
        d.reverse();
        prop_assert!(d.ring_is_consistent());
        let once: Vec<i32> = d.iter().copied().collect();
        let mut rev = values.clone();
        rev.reverse();
        prop_assert_eq!(once, rev);

        d.reverse();
        prop_assert!(d.ring_is_consistent());
        let twice: Vec<i32> = d.iter().copied().collect();
        prop_assert_eq!(twice, values);
    }
}
