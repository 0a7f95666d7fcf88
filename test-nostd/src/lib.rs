#![no_std]

use core::hash::BuildHasherDefault;
use core::hash::Hasher;

use linkset::Keyed;
use linkset::LinkMultiSet;
use linkset::LinkSet;

#[derive(Default)]
struct BadHasher(u64);

impl Hasher for BadHasher {
    fn finish(&self) -> u64 {
        self.0
    }
    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 += byte as u64
        }
    }
}

type Set<E> = LinkSet<E, BuildHasherDefault<BadHasher>>;
type MultiSet<E> = LinkMultiSet<E, BuildHasherDefault<BadHasher>>;

pub fn test_compile() {
    let mut set = Set::default();
    set.insert(Keyed::new(1));
    set.insert(Keyed::new(2));
    for _ in set.iter() {}

    let _set2 = Set::from_iter(Some(Keyed::new(1)));

    let mut multi = MultiSet::default();
    multi.insert(Keyed::new("a"));
    multi.insert(Keyed::new("a"));
    for _ in multi.get_all(&"a") {}
}
