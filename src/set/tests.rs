use alloc::vec::Vec;
use core::hash::{BuildHasherDefault, Hash, Hasher};

use fnv::FnvBuildHasher;
use itertools::Itertools;
use quickcheck::quickcheck;

use super::{LinkSet, MutableElements};
use crate::linked::{Link, Linked, Links};
use crate::{Keyed, linkset};

/// Hashes to the exact key value, making home slots predictable.
#[derive(Default)]
struct TransparentHasher(u64);

impl Hasher for TransparentHasher {
    fn finish(&self) -> u64 {
        self.0
    }
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = (self.0 << 8) | u64::from(byte);
        }
    }
    fn write_u64(&mut self, key: u64) {
        self.0 = key;
    }
}

type Transparent = BuildHasherDefault<TransparentHasher>;

fn values<S>(set: &LinkSet<Keyed<u64>, S>) -> Vec<u64> {
    set.iter().map(|e| **e).collect()
}

#[test]
fn insert_is_idempotent_and_ordered() {
    let mut set = LinkSet::new();
    assert!(set.insert(Keyed::new(1)));
    assert!(set.insert(Keyed::new(2)));
    assert!(!set.insert(Keyed::new(1)));
    assert_eq!(set.len(), 2);
    assert!(set.iter().map(|e| **e).eq([1, 2]));
}

#[test]
fn slot_counts_from_construction() {
    let set: LinkSet<Keyed<u32>> = LinkSet::new();
    assert_eq!(set.num_slots(), 5);
    let set: LinkSet<Keyed<u32>> = LinkSet::with_capacity(5);
    assert_eq!(set.num_slots(), 11);
}

#[test]
fn get_take_and_reinsert() {
    let mut set = LinkSet::new();
    set.insert(Keyed::new("fetch"));
    assert_eq!(set.get(&"fetch").map(|e| **e), Some("fetch"));

    let element = set.take(&"fetch").unwrap();
    assert!(!element.links().is_linked());
    assert!(!set.contains(&"fetch"));
    assert!(set.is_empty());

    assert!(set.insert(element));
    assert!(set.contains(&"fetch"));
}

#[test]
fn insert_rejects_still_linked_elements() {
    let mut set = LinkSet::new();
    let mut stray = Keyed::new(5u32);
    stray.links_mut().next = Link::Head;
    assert!(!set.insert(stray));
    assert!(set.is_empty());
}

#[test]
#[should_panic(expected = "LinkSet: refused to insert")]
fn must_insert_panics_on_duplicates() {
    let mut set = LinkSet::new();
    set.must_insert(Keyed::new(11));
    set.must_insert(Keyed::new(11));
}

#[test]
fn removal_rehomes_displaced_elements() {
    let mut set: LinkSet<Keyed<u64>, Transparent> =
        LinkSet::with_capacity_and_hasher(6, Transparent::default());
    assert_eq!(set.num_slots(), 13);
    // 3, 16, and 29 all home at slot 3; 4 and 5 end up displaced.
    for key in [3, 16, 29, 4, 5, 9] {
        assert!(set.insert(Keyed::new(key)));
    }

    assert!(set.remove(&3u64));
    for key in [16u64, 29, 4, 5, 9] {
        assert!(set.contains(&key), "lost key {key} after re-homing");
    }
    assert_eq!(values(&set), [16, 29, 4, 5, 9]);
}

#[test]
fn removal_rehomes_across_the_wraparound() {
    let mut set: LinkSet<Keyed<u64>, Transparent> = LinkSet::with_hasher(Transparent::default());
    assert_eq!(set.num_slots(), 5);
    for key in [3, 8, 13] {
        assert!(set.insert(Keyed::new(key)));
    }
    assert!(set.remove(&3u64));
    assert!(set.contains(&8u64));
    assert!(set.contains(&13u64));
    assert_eq!(values(&set), [8, 13]);
}

#[test]
fn cursor_removes_the_second_element() {
    let mut set: LinkSet<_> = [1, 2, 3, 4].map(Keyed::new).into();
    let mut cursor = set.cursor_mut();
    cursor.move_next();
    cursor.move_next();
    let removed = cursor.remove_current().unwrap();
    assert_eq!(*removed, 2);
    assert!(!removed.links().is_linked());
    assert_eq!(cursor.current().map(|e| **e), Some(3));
    assert!(set.iter().map(|e| **e).eq([1, 3, 4]));
}

#[test]
fn cursor_tracks_elements_shifted_by_its_own_removal() {
    let mut set: LinkSet<Keyed<u64>, Transparent> =
        LinkSet::with_capacity_and_hasher(5, Transparent::default());
    // A full collision chain: removing the first shifts both survivors.
    for key in [5, 16, 27] {
        assert!(set.insert(Keyed::new(key)));
    }
    let mut cursor = set.cursor_mut();
    cursor.move_next();
    assert_eq!(cursor.current().map(|e| **e), Some(5));
    assert_eq!(cursor.remove_current().map(|e| *e), Some(5));
    // 16 moved into the hole, and the cursor followed it there.
    assert_eq!(cursor.current().map(|e| **e), Some(16));
    cursor.move_next();
    assert_eq!(cursor.current().map(|e| **e), Some(27));
    cursor.move_next();
    assert!(cursor.current().is_none());
}

#[test]
fn cursor_on_an_empty_set() {
    let mut set: LinkSet<Keyed<u32>> = LinkSet::new();
    let mut cursor = set.cursor_mut();
    assert!(cursor.current().is_none());
    cursor.move_next();
    assert!(cursor.current().is_none());
    assert!(cursor.remove_current().is_none());
}

#[test]
fn retain_keeps_relative_order() {
    let mut set: LinkSet<_> = (0..10).map(Keyed::new).collect();
    set.retain(|e| **e % 2 == 0);
    assert!(set.iter().map(|e| **e).eq([0, 2, 4, 6, 8]));
}

#[test]
fn growth_preserves_insertion_order() {
    let mut set = LinkSet::new();
    let initial_slots = set.num_slots();
    for key in 0..100 {
        assert!(set.insert(Keyed::new(key)));
    }
    assert!(set.num_slots() > initial_slots);
    assert!(set.iter().map(|e| **e).eq(0..100));
    for key in 0..100 {
        assert!(set.contains(&key));
    }
}

#[test]
fn pops_and_ends() {
    let mut set: LinkSet<_> = [1, 2, 3].map(Keyed::new).into();
    assert_eq!(set.first().map(|e| **e), Some(1));
    assert_eq!(set.last().map(|e| **e), Some(3));

    let front = set.pop_front().unwrap();
    assert_eq!(*front, 1);
    assert!(!front.links().is_linked());
    assert_eq!(set.pop_back().map(|e| *e), Some(3));
    assert_eq!(set.len(), 1);
    assert_eq!(set.first().map(|e| **e), Some(2));
}

#[test]
fn clear_keeps_the_slot_array() {
    let mut set: LinkSet<_> = (0..20).map(Keyed::new).collect();
    let slots = set.num_slots();
    set.clear();
    assert!(set.is_empty());
    assert_eq!(set.num_slots(), slots);
    assert!(set.insert(Keyed::new(7)));
    assert!(set.iter().map(|e| **e).eq([7]));
}

#[test]
fn iteration_is_double_ended_and_exact() {
    let set: LinkSet<_> = [1, 2, 3, 4].map(Keyed::new).into();
    assert_eq!(set.iter().len(), 4);
    assert!(set.iter().rev().map(|e| **e).eq([4, 3, 2, 1]));

    let mut iter = set.iter();
    assert_eq!(iter.next().map(|e| **e), Some(1));
    assert_eq!(iter.next_back().map(|e| **e), Some(4));
    assert_eq!(iter.len(), 2);
    assert!(iter.map(|e| **e).eq([2, 3]));
}

#[test]
fn into_iter_unlinks_every_element() {
    let set: LinkSet<_> = [1, 2, 3].map(Keyed::new).into();
    let elements: Vec<_> = set.into_iter().collect();
    assert!(elements.iter().all(|e| !e.links().is_linked()));
    assert!(elements.iter().map(|e| **e).eq([1, 2, 3]));

    // The handed-back elements are immediately insertable again.
    let set: LinkSet<_> = elements.into_iter().collect();
    assert_eq!(set.len(), 3);
}

#[test]
fn clone_is_independent() {
    let mut set: LinkSet<_> = [1, 2, 3].map(Keyed::new).into();
    let clone = set.clone();
    assert_eq!(set, clone);

    set.remove(&2);
    assert_eq!(set.len(), 2);
    assert_eq!(clone.len(), 3);
    assert!(clone.iter().map(|e| **e).eq([1, 2, 3]));
}

#[test]
fn equality_is_order_sensitive() {
    let a: LinkSet<_> = [1, 2].map(Keyed::new).into();
    let b: LinkSet<_> = [2, 1].map(Keyed::new).into();
    assert_ne!(a, b);

    let fnv: LinkSet<Keyed<i32>, FnvBuildHasher> =
        [1, 2].map(Keyed::new).into_iter().collect();
    assert_eq!(a, fnv);
}

#[test]
fn subset_relations() {
    let small: LinkSet<_> = [1, 2].map(Keyed::new).into();
    let big: LinkSet<_> = [2, 1, 3].map(Keyed::new).into();
    let other: LinkSet<_> = [8, 9].map(Keyed::new).into();

    assert!(small.is_subset(&big));
    assert!(big.is_superset(&small));
    assert!(!big.is_subset(&small));
    assert!(small.is_disjoint(&other));
    assert!(!small.is_disjoint(&big));
}

#[test]
fn mutable_access_keeps_lookups_intact() {
    struct Session {
        id: u32,
        hits: u32,
        links: Links,
    }

    impl Session {
        fn new(id: u32) -> Self {
            Session {
                id,
                hits: 0,
                links: Links::new(),
            }
        }
    }

    impl Linked for Session {
        fn links(&self) -> &Links {
            &self.links
        }
        fn links_mut(&mut self) -> &mut Links {
            &mut self.links
        }
    }

    impl PartialEq for Session {
        fn eq(&self, other: &Self) -> bool {
            self.id == other.id
        }
    }
    impl Eq for Session {}

    impl Hash for Session {
        fn hash<H: Hasher>(&self, state: &mut H) {
            self.id.hash(state);
        }
    }

    impl crate::Equivalent<Session> for u32 {
        fn equivalent(&self, session: &Session) -> bool {
            *self == session.id
        }
    }

    let mut set: LinkSet<Session> = (0..4).map(Session::new).collect();
    set.get_mut2(&2u32).unwrap().hits += 1;
    set.get_mut2(&2u32).unwrap().hits += 1;
    assert_eq!(set.get(&2u32).map(|s| s.hits), Some(2));

    set.retain2(|session| {
        session.hits += 1;
        session.id != 3
    });
    assert!(set.iter().map(|s| s.id).eq([0, 1, 2]));
    assert_eq!(set.get(&0u32).map(|s| s.hits), Some(1));
}

#[test]
fn extreme_hash_values_are_total() {
    let mut set: LinkSet<Keyed<u64>, Transparent> = LinkSet::with_hasher(Transparent::default());
    for key in [0, u64::MAX, i64::MIN as u64] {
        assert!(set.insert(Keyed::new(key)));
    }
    for key in [0, u64::MAX, i64::MIN as u64] {
        assert!(set.contains(&key));
    }
    assert!(set.remove(&u64::MAX));
    assert!(set.contains(&0u64));
    assert!(set.contains(&(i64::MIN as u64)));
}

#[test]
fn macro_builds_in_order() {
    let set = linkset! {
        Keyed::new(10),
        Keyed::new(20),
        Keyed::new(10),
    };
    assert_eq!(set.len(), 2);
    assert!(set.iter().map(|e| **e).eq([10, 20]));
}

#[test]
fn randomized_trace_matches_a_vec_model() {
    let mut rng = fastrand::Rng::with_seed(0x1d05_e7a8);
    let mut set: LinkSet<Keyed<u32>, FnvBuildHasher> =
        LinkSet::with_hasher(FnvBuildHasher::default());
    let mut model: Vec<u32> = Vec::new();
    let mut next_key = 0u32;

    for _ in 0..1000 {
        match rng.u8(0..4) {
            // Fresh key: must always be accepted.
            0 | 1 => {
                set.must_insert(Keyed::new(next_key));
                model.push(next_key);
                next_key += 1;
            }
            // Keyed removal of a random survivor.
            2 if !model.is_empty() => {
                let index = rng.usize(0..model.len());
                let key = model.remove(index);
                let removed = set.take(&key).unwrap();
                assert!(!removed.links().is_linked());
            }
            // Cursor removal at a random list position.
            3 if !model.is_empty() => {
                let index = rng.usize(0..model.len());
                let expected = model.remove(index);
                let mut cursor = set.cursor_mut();
                for _ in 0..=index {
                    cursor.move_next();
                }
                assert_eq!(cursor.remove_current().map(|e| *e), Some(expected));
            }
            _ => {
                // Re-inserting a surviving key is a no-op rejection.
                if let Some(&key) = model.first() {
                    assert!(!set.insert(Keyed::new(key)));
                }
            }
        }
        itertools::assert_equal(set.iter().map(|e| **e), model.iter().copied());
        assert_eq!(set.len(), model.len());
    }
}

quickcheck! {
    fn matches_a_vec_model(ops: Vec<(u8, u8)>) -> bool {
        let mut set: LinkSet<Keyed<u8>, FnvBuildHasher> =
            LinkSet::with_hasher(FnvBuildHasher::default());
        let mut model: Vec<u8> = Vec::new();
        for &(op, key) in &ops {
            match op % 3 {
                0 => {
                    let inserted = set.insert(Keyed::new(key));
                    if inserted != !model.contains(&key) {
                        return false;
                    }
                    if inserted {
                        model.push(key);
                    }
                }
                1 => {
                    let position = model.iter().position(|&k| k == key);
                    if set.remove(&key) != position.is_some() {
                        return false;
                    }
                    if let Some(position) = position {
                        model.remove(position);
                    }
                }
                _ => {
                    if set.contains(&key) != model.contains(&key) {
                        return false;
                    }
                }
            }
        }
        set.iter().map(|e| **e).eq(model.iter().copied())
    }

    fn collected_sets_deduplicate_in_order(keys: Vec<u8>) -> bool {
        let set: LinkSet<Keyed<u8>, FnvBuildHasher> =
            keys.iter().copied().map(Keyed::new).collect();
        let expected: Vec<u8> = keys.iter().copied().unique().collect();
        set.len() == expected.len() && set.iter().map(|e| **e).eq(expected)
    }
}
