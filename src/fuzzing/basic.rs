use std::collections::HashSet;

use super::*;
use crate::test::check_invariants;
use itertools::Itertools;

/// Longest-prefix match by scanning all prefixes.
fn brute_force(set: &HashSet<Ipv4Prefix>, ip: u32) -> Option<u8> {
    set.iter()
        .filter(|p| p.contains(ip))
        .map(|p| p.prefix_len())
        .max()
}

qc!(new, _new);
fn _new(list: Vec<Ipv4Prefix>) -> bool {
    let mut trie = PrefixTrie::new();
    let mut set = HashSet::new();

    for p in list {
        trie.insert(p).unwrap();
        set.insert(p);
    }

    trie.len() == set.len() && trie.iter().eq(set.into_iter().sorted())
}

qc!(new_mods, _new_mods);
fn _new_mods(list: Vec<Operation<Ipv4Prefix>>) -> bool {
    let (trie, set) = apply(list);
    trie.len() == set.len() && trie.iter().eq(set.into_iter().sorted())
}

qc!(invariants, _invariants);
fn _invariants(list: Vec<Operation<Ipv4Prefix>>) -> bool {
    let (trie, _) = apply(list);
    check_invariants(&trie);
    true
}

qc!(lookup, _lookup);
fn _lookup((list, ips): (Vec<Operation<Ipv4Prefix>>, Vec<u32>)) -> bool {
    let (trie, set) = apply(list);
    // probe the stored prefixes themselves, their last address, and random addresses.
    set.iter()
        .flat_map(|p| [p.base(), p.base() | !p.mask()])
        .chain(ips)
        .all(|ip| trie.lookup(ip) == brute_force(&set, ip))
}

qc!(lookup_prefix, _lookup_prefix);
fn _lookup_prefix((list, ips): (Vec<Operation<Ipv4Prefix>>, Vec<u32>)) -> bool {
    let (trie, set) = apply(list);
    ips.into_iter().all(|ip| match trie.lookup_prefix(ip) {
        Some(p) => p.contains(ip) && set.contains(&p),
        None => brute_force(&set, ip).is_none(),
    })
}

qc!(canonical, _canonical);
fn _canonical(list: Vec<Operation<Ipv4Prefix>>) -> bool {
    // the structure only depends on the stored prefixes, not on the history.
    let (trie, set) = apply(list);
    let fresh: PrefixTrie = set.into_iter().collect();
    format!("{trie:?}") == format!("{fresh:?}")
}

qc!(remove_all, _remove_all);
fn _remove_all((list, order): (Vec<Ipv4Prefix>, Vec<usize>)) -> bool {
    let mut trie: PrefixTrie = list.iter().copied().collect();
    let mut prefixes = list.into_iter().unique().collect::<Vec<_>>();
    // remove in some permutation of the insertion order.
    for (i, j) in order.into_iter().enumerate() {
        if !prefixes.is_empty() {
            let n = prefixes.len();
            prefixes.swap(i % n, j % n);
        }
    }
    for p in &prefixes {
        if !trie.remove(p) {
            return false;
        }
    }
    trie.is_empty() && trie.node_count() == 1 && format!("{trie:?}") == "0.0.0.0/0"
}

qc!(equality, _equality);
fn _equality(list: Vec<Operation<Ipv4Prefix>>) -> bool {
    let (trie, _) = apply(list);
    let clone = trie.iter().collect::<PrefixTrie>();
    trie == clone && trie == trie.clone()
}

qc!(table_commands, _table_commands);
fn _table_commands((list, ips): (Vec<Operation<Ipv4Prefix>>, Vec<u32>)) -> bool {
    let mut table = PrefixMgmt::new();
    table.init().unwrap();
    let mut set = HashSet::new();
    for op in list {
        match op {
            Operation::Add(p) => {
                table.add(p.base(), p.prefix_len() as i8).unwrap();
                set.insert(p);
            }
            Operation::Remove(p) => {
                table.del(p.base(), p.prefix_len() as i8).unwrap();
                set.remove(&p);
            }
        }
    }
    ips.into_iter()
        .all(|ip| table.check(ip) == brute_force(&set, ip))
}

qc!(collected, _collected);
fn _collected(trie: PrefixTrie) -> bool {
    check_invariants(&trie);
    trie.iter().all(|p| trie.lookup(p.base()) >= Some(p.prefix_len()))
}
