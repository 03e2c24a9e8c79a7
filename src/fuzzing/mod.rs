//! Module for testing using fuzzing (quickcheck)

use std::fmt::Debug;

use crate::*;
use quickcheck::Arbitrary;

#[derive(Debug, PartialEq, Clone, Copy)]
enum Operation<P> {
    Add(P),
    Remove(P),
}

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 10000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = quickcheck::Gen::new(gen_size);

    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        if !f(input.clone()) {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        if !f(i.clone()) {
            shrink_failure(f, i)
        }
    }
    // all shrunken inputs work, so `input` is the minimal one.
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

// after `qc!`, which is only visible to code below its definition.
mod basic;

/// Apply the operations both to the trie and to a plain set of prefixes.
fn apply(
    ops: Vec<Operation<Ipv4Prefix>>,
) -> (PrefixTrie, std::collections::HashSet<Ipv4Prefix>) {
    let mut trie = PrefixTrie::new();
    let mut set = std::collections::HashSet::new();
    for op in ops {
        match op {
            Operation::Add(p) => {
                let new = trie.insert(p).unwrap();
                assert_eq!(new, set.insert(p), "insert {p} reported the wrong result");
            }
            Operation::Remove(p) => {
                let removed = trie.remove(&p);
                assert_eq!(removed, set.remove(&p), "remove {p} reported the wrong result");
            }
        }
    }
    (trie, set)
}

impl Arbitrary for PrefixTrie {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        <Vec<Ipv4Prefix> as Arbitrary>::arbitrary(g)
            .into_iter()
            .collect()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let elems = self.iter().collect::<Vec<_>>();
        Box::new(elems.shrink().map(PrefixTrie::from_iter))
    }
}

impl<P: Arbitrary> Arbitrary for Operation<P> {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let p = P::arbitrary(g);
        if g.choose(&[
            true, true, true, true, true, true, true, false, false, false,
        ])
        .copied()
        .unwrap_or_default()
        {
            Self::Add(p)
        } else {
            Self::Remove(p)
        }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        match self {
            Operation::Add(p) => Box::new(p.shrink().map(Operation::Add)),
            Operation::Remove(p) => Box::new(p.shrink().map(Operation::Remove)),
        }
    }
}

impl Arbitrary for Ipv4Prefix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // short prefixes overlap a lot, which exercises splitting and merging.
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0,
                1, 1,
                2, 2, 2,
                3, 3, 3, 3,
                4, 4, 4, 4, 4,
                5, 5, 5, 5, 5, 5,
                6, 6, 6, 6, 6, 6, 6,
                7, 7, 7, 7, 7, 7, 7, 7,
                8, 8, 8, 8, 8, 8, 8, 8, 8,
                9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
                12, 16, 20, 24, 24, 28, 31, 32, 32,
            ])
            .unwrap();
        Self::truncating(u32::arbitrary(g), len)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.prefix_len() == 0 {
            quickcheck::empty_shrinker()
        } else {
            let len = self.prefix_len() - 1;
            quickcheck::single_shrinker(Self::truncating(self.base(), len))
        }
    }
}
