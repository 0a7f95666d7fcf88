//! The shared storage engine: an open-addressed slot table with an
//! intrusive insertion-order list threaded through the elements.
//!
//! [`LinkSet`][crate::LinkSet] and [`LinkMultiSet`][crate::LinkMultiSet]
//! are thin policy layers over [`SlotTable`]; the iterator and cursor
//! types defined here are shared by both and re-exported from their
//! modules.
//!
//! Slot positions double as list tokens. An element's *home* slot is
//! `hash % num_slots`; it is stored on the linear probe run from home,
//! never separated from home by an empty slot. Deletion restores that
//! invariant by backward-shifting: every occupant behind the hole that
//! could now be reached earlier is moved into the hole, and its list
//! neighbours are re-pointed at the new slot.

use alloc::vec::Vec;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::iter::FusedIterator;
use core::mem;

use crate::linked::{Link, Linked, Links};
use crate::Equivalent;

/// Slot arrays are never smaller than this, so probing always has slack.
const MIN_NUM_SLOTS: usize = 5;

const EMPTY_SLOT: &str = "linkset: order list references an empty slot";

fn occupied<E>(slots: &[Option<E>], slot: usize) -> &E {
    slots[slot].as_ref().expect(EMPTY_SLOT)
}

fn occupied_mut<E>(slots: &mut [Option<E>], slot: usize) -> &mut E {
    slots[slot].as_mut().expect(EMPTY_SLOT)
}

fn new_slots<E>(num_slots: usize) -> Vec<Option<E>> {
    let mut slots = Vec::with_capacity(num_slots);
    slots.resize_with(num_slots, || None);
    slots
}

pub(crate) struct SlotTable<E, S> {
    slots: Vec<Option<E>>,
    /// The inline list head: `head.next` is the first element in insertion
    /// order, `head.prev` the last. No phantom element is allocated.
    head: Links,
    len: usize,
    hash_builder: S,
}

impl<E, S> SlotTable<E, S> {
    /// Slot count for an expected number of elements: `2n + 1` rounded up
    /// to the minimum, which keeps the load factor at most 1/2 right
    /// after construction.
    fn num_slots_for(expected: usize) -> usize {
        expected
            .checked_mul(2)
            .and_then(|n| n.checked_add(1))
            .expect("linkset: number of slots overflows usize")
            .max(MIN_NUM_SLOTS)
    }

    pub(crate) fn with_capacity_and_hasher(expected: usize, hash_builder: S) -> Self {
        Self::with_raw_slots(Self::num_slots_for(expected), hash_builder)
    }

    fn with_raw_slots(num_slots: usize, hash_builder: S) -> Self {
        SlotTable {
            slots: new_slots(num_slots),
            head: Links::empty_head(),
            len: 0,
            hash_builder,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn num_slots(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hash_builder
    }

    pub(crate) fn clear(&mut self) {
        for slot in &mut self.slots {
            *slot = None;
        }
        self.head = Links::empty_head();
        self.len = 0;
    }

    pub(crate) fn iter(&self) -> Iter<'_, E> {
        Iter {
            slots: &self.slots,
            next: self.head.next,
            next_back: self.head.prev,
            remaining: self.len,
        }
    }

    pub(crate) fn first(&self) -> Option<&E> {
        match self.head.next {
            Link::Slot(slot) => Some(occupied(&self.slots, slot)),
            _ => None,
        }
    }

    pub(crate) fn last(&self) -> Option<&E> {
        match self.head.prev {
            Link::Slot(slot) => Some(occupied(&self.slots, slot)),
            _ => None,
        }
    }

    pub(crate) fn cursor_mut(&mut self) -> CursorMut<'_, E, S> {
        CursorMut {
            at: Link::Head,
            table: self,
        }
    }

    pub(crate) fn into_elements(self) -> IntoIter<E> {
        IntoIter {
            next: self.head.next,
            next_back: self.head.prev,
            remaining: self.len,
            slots: self.slots,
        }
    }
}

impl<E: Linked, S> SlotTable<E, S> {
    fn set_next(&mut self, at: Link, next: Link) {
        match at {
            Link::Head => self.head.next = next,
            Link::Slot(slot) => occupied_mut(&mut self.slots, slot).links_mut().next = next,
            Link::Unlinked => unreachable!("linkset: unlinked element in the order list"),
        }
    }

    fn set_prev(&mut self, at: Link, prev: Link) {
        match at {
            Link::Head => self.head.prev = prev,
            Link::Slot(slot) => occupied_mut(&mut self.slots, slot).links_mut().prev = prev,
            Link::Unlinked => unreachable!("linkset: unlinked element in the order list"),
        }
    }

    /// Append the element stored at `slot` to the list tail.
    fn splice_tail(&mut self, slot: usize) {
        let tail = self.head.prev;
        {
            let links = occupied_mut(&mut self.slots, slot).links_mut();
            links.prev = tail;
            links.next = Link::Head;
        }
        self.set_next(tail, Link::Slot(slot));
        self.head.prev = Link::Slot(slot);
    }

    /// Detach the element stored at `slot` from the list and reset its
    /// header to the unlinked state. The slot itself is left occupied.
    fn unlink(&mut self, slot: usize) {
        let Links { prev, next } = *occupied(&self.slots, slot).links();
        self.set_next(prev, next);
        self.set_prev(next, prev);
        occupied_mut(&mut self.slots, slot).links_mut().unlink();
    }

    /// Move the occupant of `source` into the empty slot `dest`, keeping
    /// the list consistent: both neighbours are re-pointed at `dest`.
    fn shift_into(&mut self, dest: usize, source: usize) {
        let element = self.slots[source].take().expect(EMPTY_SLOT);
        let Links { prev, next } = *element.links();
        self.slots[dest] = Some(element);
        self.set_next(prev, Link::Slot(dest));
        self.set_prev(next, Link::Slot(dest));
    }

    fn place(&mut self, slot: usize, element: E) {
        self.slots[slot] = Some(element);
        self.splice_tail(slot);
        self.len += 1;
    }
}

impl<E, S> SlotTable<E, S>
where
    E: Linked + Hash,
    S: BuildHasher,
{
    fn home_slot(&self, hash: u64) -> usize {
        (hash % self.slots.len() as u64) as usize
    }

    fn next_slot(&self, slot: usize) -> usize {
        if slot + 1 == self.slots.len() { 0 } else { slot + 1 }
    }

    /// Cyclic distance from `from` to `to` in probing direction.
    fn probe_distance(&self, from: usize, to: usize) -> usize {
        let num_slots = self.slots.len();
        (to + num_slots - from) % num_slots
    }

    /// The slot of the first element equivalent to `key` on its probe run,
    /// which for equal elements is also the earliest-inserted one.
    pub(crate) fn find_slot<Q>(&self, key: &Q) -> Option<usize>
    where
        Q: ?Sized + Hash + Equivalent<E>,
    {
        if self.len == 0 {
            return None;
        }
        let mut slot = self.home_slot(self.hash_builder.hash_one(key));
        for _ in 0..self.slots.len() {
            match &self.slots[slot] {
                None => return None,
                Some(element) if key.equivalent(element) => return Some(slot),
                Some(_) => {}
            }
            slot = self.next_slot(slot);
        }
        None
    }

    pub(crate) fn get<Q>(&self, key: &Q) -> Option<&E>
    where
        Q: ?Sized + Hash + Equivalent<E>,
    {
        self.find_slot(key).map(|slot| occupied(&self.slots, slot))
    }

    pub(crate) fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut E>
    where
        Q: ?Sized + Hash + Equivalent<E>,
    {
        self.find_slot(key)
            .map(|slot| occupied_mut(&mut self.slots, slot))
    }

    /// Insert under the unique-element policy: the first equal occupant on
    /// the probe run rejects the insertion.
    pub(crate) fn insert_unique(&mut self, element: E) -> bool
    where
        E: Eq,
    {
        if element.links().is_linked() {
            return false;
        }
        self.reserve_one();
        let mut slot = self.home_slot(self.hash_builder.hash_one(&element));
        for _ in 0..self.slots.len() {
            match &self.slots[slot] {
                None => {
                    self.place(slot, element);
                    return true;
                }
                Some(occupant) if *occupant == element => return false,
                Some(_) => {}
            }
            slot = self.next_slot(slot);
        }
        false
    }

    /// Insert under the duplicate-admitting policy: probing skips equal
    /// occupants, so a new duplicate lands behind every earlier one.
    pub(crate) fn insert_multi(&mut self, element: E) -> bool {
        if element.links().is_linked() {
            return false;
        }
        self.reserve_one();
        let mut slot = self.home_slot(self.hash_builder.hash_one(&element));
        for _ in 0..self.slots.len() {
            if self.slots[slot].is_none() {
                self.place(slot, element);
                return true;
            }
            slot = self.next_slot(slot);
        }
        false
    }

    /// Grow before the incoming element would push the load factor
    /// over 3/4.
    fn reserve_one(&mut self) {
        if 4 * (self.len + 1) > 3 * self.slots.len() {
            self.grow(Self::num_slots_for(self.slots.len()));
        }
    }

    /// Rehash into `new_num_slots` slots. Walking the old list in order
    /// and re-appending keeps the iteration order unchanged.
    fn grow(&mut self, new_num_slots: usize) {
        let mut old_slots = mem::replace(&mut self.slots, new_slots(new_num_slots));
        let mut cursor = self.head.next;
        self.head = Links::empty_head();
        self.len = 0;
        while let Link::Slot(old_slot) = cursor {
            let mut element = old_slots[old_slot].take().expect(EMPTY_SLOT);
            cursor = element.links().next;
            element.links_mut().unlink();
            let mut slot = self.home_slot(self.hash_builder.hash_one(&element));
            while self.slots[slot].is_some() {
                slot = self.next_slot(slot);
            }
            self.place(slot, element);
        }
    }

    /// Remove the occupant of `slot`: detach it from the list, empty the
    /// slot, and backward-shift the rest of the probe run. `track` is a
    /// list token that is kept pointing at the same element while the
    /// shift moves occupants between slots.
    pub(crate) fn remove_at(&mut self, slot: usize, track: &mut Link) -> E {
        self.unlink(slot);
        let element = self.slots[slot].take().expect(EMPTY_SLOT);
        self.len -= 1;
        self.backshift(slot, track);
        element
    }

    /// Backward-shift deletion. An occupant of `slot` whose home is `home`
    /// may move into the hole exactly when the hole is closer to its home
    /// than its current slot, accounting for wrap-around; the hole then
    /// advances to the vacated slot. The run ends at the first empty slot.
    fn backshift(&mut self, mut hole: usize, track: &mut Link) {
        let mut slot = self.next_slot(hole);
        for _ in 0..self.slots.len() {
            let home = match &self.slots[slot] {
                None => return,
                Some(element) => self.home_slot(self.hash_builder.hash_one(element)),
            };
            if self.probe_distance(home, hole) < self.probe_distance(home, slot) {
                self.shift_into(hole, slot);
                if *track == Link::Slot(slot) {
                    *track = Link::Slot(hole);
                }
                hole = slot;
            }
            slot = self.next_slot(slot);
        }
    }

    /// Remove the first element equivalent to `key` on its probe run; for
    /// the duplicate-admitting policy this is the earliest-inserted equal
    /// instance.
    pub(crate) fn take_one<Q>(&mut self, key: &Q) -> Option<E>
    where
        Q: ?Sized + Hash + Equivalent<E>,
    {
        let slot = self.find_slot(key)?;
        Some(self.remove_at(slot, &mut Link::Unlinked))
    }

    pub(crate) fn pop_front(&mut self) -> Option<E> {
        match self.head.next {
            Link::Slot(slot) => Some(self.remove_at(slot, &mut Link::Unlinked)),
            _ => None,
        }
    }

    pub(crate) fn pop_back(&mut self) -> Option<E> {
        match self.head.prev {
            Link::Slot(slot) => Some(self.remove_at(slot, &mut Link::Unlinked)),
            _ => None,
        }
    }

    pub(crate) fn retain_mut<F>(&mut self, mut keep: F)
    where
        F: FnMut(&mut E) -> bool,
    {
        let mut at = self.head.next;
        while let Link::Slot(slot) = at {
            if keep(occupied_mut(&mut self.slots, slot)) {
                at = occupied(&self.slots, slot).links().next;
            } else {
                let mut next = occupied(&self.slots, slot).links().next;
                self.remove_at(slot, &mut next);
                at = next;
            }
        }
    }

    /// Lazy probe-run traversal for the duplicate-admitting policy.
    pub(crate) fn get_all<'a, Q>(&'a self, key: &'a Q) -> GetAll<'a, E, Q>
    where
        Q: ?Sized + Hash,
    {
        GetAll {
            slots: &self.slots,
            key,
            slot: self.home_slot(self.hash_builder.hash_one(key)),
            seen: 0,
        }
    }
}

impl<E, S> SlotTable<E, S>
where
    E: Linked + Hash + Clone,
    S: BuildHasher + Clone,
{
    /// Clone by re-inserting payload clones in list order. Element clones
    /// are given fresh headers first; the slot count is carried over, so
    /// no growth can occur mid-rebuild.
    pub(crate) fn clone_rebuilt(&self) -> Self {
        let mut table = Self::with_raw_slots(self.slots.len(), self.hash_builder.clone());
        table.extend_cloned(self);
        table
    }

    pub(crate) fn clone_from_rebuilt(&mut self, source: &Self) {
        if self.slots.len() == source.slots.len() {
            self.clear();
            self.hash_builder = source.hash_builder.clone();
        } else {
            *self = Self::with_raw_slots(source.slots.len(), source.hash_builder.clone());
        }
        self.extend_cloned(source);
    }

    fn extend_cloned(&mut self, source: &Self) {
        for element in source.iter() {
            let mut clone = element.clone();
            clone.links_mut().unlink();
            self.insert_multi(clone);
        }
    }
}

/// A forward iterator over the elements in insertion order.
///
/// Returned by [`LinkSet::iter`][crate::LinkSet::iter] and
/// [`LinkMultiSet::iter`][crate::LinkMultiSet::iter].
pub struct Iter<'a, E> {
    slots: &'a [Option<E>],
    next: Link,
    next_back: Link,
    remaining: usize,
}

impl<'a, E: Linked> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        if self.remaining == 0 {
            return None;
        }
        let Link::Slot(slot) = self.next else {
            return None;
        };
        let element = occupied(self.slots, slot);
        self.next = element.links().next;
        self.remaining -= 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, E: Linked> DoubleEndedIterator for Iter<'a, E> {
    fn next_back(&mut self) -> Option<&'a E> {
        if self.remaining == 0 {
            return None;
        }
        let Link::Slot(slot) = self.next_back else {
            return None;
        };
        let element = occupied(self.slots, slot);
        self.next_back = element.links().prev;
        self.remaining -= 1;
        Some(element)
    }
}

impl<E: Linked> ExactSizeIterator for Iter<'_, E> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<E: Linked> FusedIterator for Iter<'_, E> {}

impl<E> Clone for Iter<'_, E> {
    fn clone(&self) -> Self {
        Iter {
            slots: self.slots,
            next: self.next,
            next_back: self.next_back,
            remaining: self.remaining,
        }
    }
}

impl<E: Linked + fmt::Debug> fmt::Debug for Iter<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator, yielding elements in insertion order with their
/// headers reset to the unlinked state.
///
/// Returned by the `IntoIterator` impls of
/// [`LinkSet`][crate::LinkSet] and [`LinkMultiSet`][crate::LinkMultiSet].
pub struct IntoIter<E> {
    slots: Vec<Option<E>>,
    next: Link,
    next_back: Link,
    remaining: usize,
}

impl<E: Linked> Iterator for IntoIter<E> {
    type Item = E;

    fn next(&mut self) -> Option<E> {
        if self.remaining == 0 {
            return None;
        }
        let Link::Slot(slot) = self.next else {
            return None;
        };
        let mut element = self.slots[slot].take().expect(EMPTY_SLOT);
        self.next = element.links().next;
        element.links_mut().unlink();
        self.remaining -= 1;
        Some(element)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<E: Linked> DoubleEndedIterator for IntoIter<E> {
    fn next_back(&mut self) -> Option<E> {
        if self.remaining == 0 {
            return None;
        }
        let Link::Slot(slot) = self.next_back else {
            return None;
        };
        let mut element = self.slots[slot].take().expect(EMPTY_SLOT);
        self.next_back = element.links().prev;
        element.links_mut().unlink();
        self.remaining -= 1;
        Some(element)
    }
}

impl<E: Linked> ExactSizeIterator for IntoIter<E> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<E: Linked> FusedIterator for IntoIter<E> {}

impl<E: Linked + fmt::Debug> fmt::Debug for IntoIter<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let iter = Iter {
            slots: &self.slots,
            next: self.next,
            next_back: self.next_back,
            remaining: self.remaining,
        };
        f.debug_list().entries(iter).finish()
    }
}

/// A cursor with exclusive access to a container, able to remove the
/// element it is parked on.
///
/// The cursor starts parked on the head sentinel, before the first
/// element; [`move_next`][CursorMut::move_next] steps through the list in
/// insertion order and wraps back to the sentinel after the last element.
/// Because the cursor holds the container's only mutable borrow, no other
/// mutation can interleave with a traversal.
///
/// Returned by [`LinkSet::cursor_mut`][crate::LinkSet::cursor_mut] and
/// [`LinkMultiSet::cursor_mut`][crate::LinkMultiSet::cursor_mut].
pub struct CursorMut<'a, E, S> {
    table: &'a mut SlotTable<E, S>,
    at: Link,
}

impl<E: Linked, S> CursorMut<'_, E, S> {
    /// The element the cursor is parked on, or `None` on the sentinel.
    pub fn current(&self) -> Option<&E> {
        match self.at {
            Link::Slot(slot) => Some(occupied(&self.table.slots, slot)),
            _ => None,
        }
    }

    /// Step to the next element in insertion order.
    pub fn move_next(&mut self) {
        self.at = match self.at {
            Link::Head => self.table.head.next,
            Link::Slot(slot) => occupied(&self.table.slots, slot).links().next,
            Link::Unlinked => unreachable!("linkset: cursor parked on an unlinked element"),
        };
    }

    /// Step to the previous element in insertion order.
    pub fn move_prev(&mut self) {
        self.at = match self.at {
            Link::Head => self.table.head.prev,
            Link::Slot(slot) => occupied(&self.table.slots, slot).links().prev,
            Link::Unlinked => unreachable!("linkset: cursor parked on an unlinked element"),
        };
    }
}

impl<E, S> CursorMut<'_, E, S>
where
    E: Linked + Hash,
    S: BuildHasher,
{
    /// Remove and return the element the cursor is parked on, leaving the
    /// cursor on the next element in insertion order.
    ///
    /// Returns `None` on the sentinel. The returned element's header is
    /// reset, so it may be re-inserted.
    pub fn remove_current(&mut self) -> Option<E> {
        let Link::Slot(slot) = self.at else {
            return None;
        };
        let mut next = occupied(&self.table.slots, slot).links().next;
        let element = self.table.remove_at(slot, &mut next);
        self.at = next;
        Some(element)
    }
}

/// A lazy iterator over every stored element equivalent to a key, in
/// insertion order.
///
/// Produced by walking the key's probe run: the traversal ends at the
/// first empty slot, and equal elements sit on the run in insertion order
/// because inserts probe past them and deletion shifts preserve their
/// relative order.
///
/// Returned by [`LinkMultiSet::get_all`][crate::LinkMultiSet::get_all].
pub struct GetAll<'a, E, Q: ?Sized> {
    slots: &'a [Option<E>],
    key: &'a Q,
    slot: usize,
    seen: usize,
}

impl<'a, E, Q> Iterator for GetAll<'a, E, Q>
where
    Q: ?Sized + Equivalent<E>,
{
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        while self.seen < self.slots.len() {
            let element = self.slots[self.slot].as_ref()?;
            self.seen += 1;
            self.slot = if self.slot + 1 == self.slots.len() {
                0
            } else {
                self.slot + 1
            };
            if self.key.equivalent(element) {
                return Some(element);
            }
        }
        None
    }
}

impl<E, Q> FusedIterator for GetAll<'_, E, Q> where Q: ?Sized + Equivalent<E> {}

impl<E, Q: ?Sized> Clone for GetAll<'_, E, Q> {
    fn clone(&self) -> Self {
        GetAll {
            slots: self.slots,
            key: self.key,
            slot: self.slot,
            seen: self.seen,
        }
    }
}
