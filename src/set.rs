//! [`LinkSet`] is an intrusive hash set where the iteration order of the
//! elements is independent of their hash values.
//!
//! Elements carry their own [`Links`][crate::Links] header (see
//! [`Linked`]); the set stores them in an open-addressed slot array and
//! threads its insertion-order list through the headers, so membership
//! costs no allocation per element.

mod iter;
mod mutable;

#[cfg(test)]
mod tests;

pub use self::mutable::MutableElements;
pub use crate::table::{CursorMut, IntoIter, Iter};

use core::cmp::Ordering;
use core::fmt;
use core::hash::{BuildHasher, Hash, Hasher};

#[cfg(feature = "std")]
use std::collections::hash_map::RandomState;

use crate::linked::Linked;
use crate::table::SlotTable;
use crate::Equivalent;

/// An intrusive hash set where the iteration order of the elements is
/// independent of their hash values.
///
/// The interface resembles the standard
/// [`HashSet`][std::collections::HashSet], with two differences: elements
/// implement [`Linked`] (embedding the container's order-list header), and
/// all iterators traverse the set in insertion order.
///
/// # Order
///
/// The elements have a consistent order that is determined by the sequence
/// of insertion and removal calls on the set. The order does not depend on
/// the elements or the hash function at all. Note that insertion order and
/// element are not affected if a re-insertion is attempted once an element
/// is already present; removal re-homes displaced table entries but never
/// reorders the survivors.
///
/// # Membership and ownership
///
/// The set owns its elements. [`insert`][Self::insert] moves an element
/// in; [`take`][Self::take], the pops, [`CursorMut::remove_current`], and
/// consuming iteration move elements out with their header reset, ready
/// for re-insertion. An element whose header is still linked (such as a
/// payload-preserving clone of a resident element) is refused by
/// `insert`, which returns `false`.
///
/// # Errors
///
/// Rejections that a correct caller can provoke (duplicate or
/// still-linked input) are reported by `bool` returns. Contract
/// violations, like a failing [`must_insert`][Self::must_insert] or
/// capacity arithmetic overflowing the platform's integer, ***panic***.
///
/// # Examples
///
/// ```
/// use linkset::{Keyed, LinkSet};
///
/// // Collects which letters appear in a sentence.
/// let letters: LinkSet<_> = "a short treatise on fungi"
///     .chars()
///     .map(Keyed::new)
///     .collect();
///
/// assert!(letters.contains(&'s'));
/// assert!(letters.contains(&'t'));
/// assert!(letters.contains(&'u'));
/// assert!(!letters.contains(&'y'));
/// assert_eq!(letters.iter().next().map(|e| **e), Some('a'));
/// ```
#[cfg(feature = "std")]
pub struct LinkSet<E, S = RandomState> {
    pub(crate) inner: SlotTable<E, S>,
}
#[cfg(not(feature = "std"))]
pub struct LinkSet<E, S> {
    pub(crate) inner: SlotTable<E, S>,
}

impl<E, S> Clone for LinkSet<E, S>
where
    E: Linked + Hash + Clone,
    S: BuildHasher + Clone,
{
    /// Clone the set by re-inserting payload clones in insertion order.
    ///
    /// Every cloned element receives a fresh, unlinked header, so the
    /// clone is fully independent of the original.
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone_rebuilt(),
        }
    }

    fn clone_from(&mut self, other: &Self) {
        self.inner.clone_from_rebuilt(&other.inner);
    }
}

impl<E, S> fmt::Debug for LinkSet<E, S>
where
    E: Linked + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<E> LinkSet<E> {
    /// Create a new set with the minimum slot array (five slots).
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create a new set with capacity for `n` elements before growing.
    ///
    /// The slot array is sized `max(5, 2n + 1)`, so the load factor is at
    /// most 1/2 right after construction.
    ///
    /// Computes in **O(n)** time.
    pub fn with_capacity(n: usize) -> Self {
        Self::with_capacity_and_hasher(n, RandomState::default())
    }
}

impl<E, S> LinkSet<E, S> {
    /// Create a new set with capacity for `n` elements before growing,
    /// using `hash_builder` to hash the elements.
    ///
    /// Computes in **O(n)** time.
    pub fn with_capacity_and_hasher(n: usize, hash_builder: S) -> Self {
        Self {
            inner: SlotTable::with_capacity_and_hasher(n, hash_builder),
        }
    }

    /// Create a new set with the minimum slot array, using `hash_builder`
    /// to hash the elements.
    pub fn with_hasher(hash_builder: S) -> Self {
        Self::with_capacity_and_hasher(0, hash_builder)
    }

    /// Return the number of slots in the table.
    ///
    /// This is the raw slot-array length, an upper bound on
    /// [`len`][Self::len]; growth triggers once the load factor would
    /// exceed 3/4 of it.
    ///
    /// Computes in **O(1)** time.
    pub fn num_slots(&self) -> usize {
        self.inner.num_slots()
    }

    /// Return a reference to the set's `BuildHasher`.
    pub fn hasher(&self) -> &S {
        self.inner.hasher()
    }

    /// Return the number of elements in the set.
    ///
    /// Computes in **O(1)** time.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if the set contains no elements.
    ///
    /// Computes in **O(1)** time.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Return an iterator over the elements of the set, in insertion
    /// order.
    pub fn iter(&self) -> Iter<'_, E> {
        self.inner.iter()
    }

    /// Get the first element, in insertion order.
    ///
    /// Computes in **O(1)** time.
    pub fn first(&self) -> Option<&E> {
        self.inner.first()
    }

    /// Get the last element, in insertion order.
    ///
    /// Computes in **O(1)** time.
    pub fn last(&self) -> Option<&E> {
        self.inner.last()
    }

    /// Remove all elements in the set, while preserving its slot array.
    ///
    /// Computes in **O(n)** time.
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    /// Return a cursor parked before the first element.
    ///
    /// The cursor borrows the set mutably, so the borrow checker rules
    /// out any other mutation for as long as it lives; traversal and
    /// removal through the cursor itself are always consistent.
    ///
    /// # Examples
    ///
    /// ```
    /// use linkset::{Keyed, LinkSet};
    ///
    /// let mut set: LinkSet<_> = [1, 2, 3, 4].map(Keyed::new).into();
    /// let mut cursor = set.cursor_mut();
    /// cursor.move_next();
    /// cursor.move_next();
    /// let removed = cursor.remove_current().map(Keyed::into_inner);
    /// assert_eq!(removed, Some(2));
    /// assert!(set.iter().map(|e| **e).eq([1, 3, 4]));
    /// ```
    pub fn cursor_mut(&mut self) -> CursorMut<'_, E, S> {
        self.inner.cursor_mut()
    }
}

impl<E, S> LinkSet<E, S>
where
    E: Linked + Hash + Eq,
    S: BuildHasher,
{
    /// Insert the element into the set.
    ///
    /// Returns `false`, leaving the set unchanged and dropping `element`,
    /// if an equal element is already present or if `element`'s header is
    /// still linked. Otherwise the element is appended to the insertion
    /// order and `true` is returned.
    ///
    /// Computes in **O(1)** time (amortized average).
    pub fn insert(&mut self, element: E) -> bool {
        self.inner.insert_unique(element)
    }

    /// Insert the element into the set, treating rejection as a
    /// programmer error.
    ///
    /// ***Panics*** if an equal element is already present or `element`'s
    /// header is still linked.
    ///
    /// Computes in **O(1)** time (amortized average).
    pub fn must_insert(&mut self, element: E) {
        assert!(
            self.inner.insert_unique(element),
            "LinkSet: refused to insert an equal or still-linked element"
        );
    }
}

impl<E, S> LinkSet<E, S>
where
    E: Linked + Hash,
    S: BuildHasher,
{
    /// Return `true` if an element equivalent to `key` exists in the set.
    ///
    /// The key may be any borrowed form of the element type, with the
    /// caveat that `Hash` and `Equivalent<E>` on the key must match the
    /// element's own hash and equality.
    ///
    /// Computes in **O(1)** time (average).
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<E>,
    {
        self.inner.find_slot(key).is_some()
    }

    /// Return a reference to the element equivalent to `key`, if it is
    /// present, else `None`.
    ///
    /// Computes in **O(1)** time (average).
    pub fn get<Q>(&self, key: &Q) -> Option<&E>
    where
        Q: ?Sized + Hash + Equivalent<E>,
    {
        self.inner.get(key)
    }

    /// Remove the element equivalent to `key`, and return `true` if it
    /// was present.
    ///
    /// The insertion order of the remaining elements is preserved;
    /// displaced table entries are re-homed so every survivor stays
    /// reachable from its home slot.
    ///
    /// Computes in **O(1)** time (average).
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<E>,
    {
        self.take(key).is_some()
    }

    /// Remove and return the element equivalent to `key`, with its header
    /// reset to the unlinked state.
    ///
    /// Return `None` if no equivalent element was present.
    ///
    /// Computes in **O(1)** time (average).
    pub fn take<Q>(&mut self, key: &Q) -> Option<E>
    where
        Q: ?Sized + Hash + Equivalent<E>,
    {
        self.inner.take_one(key)
    }

    /// Remove and return the first element, in insertion order.
    ///
    /// Computes in **O(1)** time (average).
    pub fn pop_front(&mut self) -> Option<E> {
        self.inner.pop_front()
    }

    /// Remove and return the last element, in insertion order.
    ///
    /// Computes in **O(1)** time (average).
    pub fn pop_back(&mut self) -> Option<E> {
        self.inner.pop_back()
    }

    /// Scan through each element in the set and keep those where the
    /// closure `keep` returns `true`.
    ///
    /// The elements are visited in order, and remaining elements keep
    /// their order.
    ///
    /// Computes in **O(n)** time (average).
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&E) -> bool,
    {
        self.inner.retain_mut(|element| keep(element));
    }
}

impl<E, S> LinkSet<E, S>
where
    E: Linked + Hash + Eq,
    S: BuildHasher,
{
    /// Returns `true` if `self` has no elements in common with `other`.
    pub fn is_disjoint<S2>(&self, other: &LinkSet<E, S2>) -> bool
    where
        S2: BuildHasher,
    {
        if self.len() <= other.len() {
            self.iter().all(|e| !other.contains(e))
        } else {
            other.iter().all(|e| !self.contains(e))
        }
    }

    /// Returns `true` if all elements of `self` are contained in `other`.
    pub fn is_subset<S2>(&self, other: &LinkSet<E, S2>) -> bool
    where
        S2: BuildHasher,
    {
        self.len() <= other.len() && self.iter().all(|e| other.contains(e))
    }

    /// Returns `true` if all elements of `other` are contained in `self`.
    pub fn is_superset<S2>(&self, other: &LinkSet<E, S2>) -> bool
    where
        S2: BuildHasher,
    {
        other.is_subset(self)
    }
}

impl<E, S> FromIterator<E> for LinkSet<E, S>
where
    E: Linked + Hash + Eq,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = E>>(iterable: I) -> Self {
        let iter = iterable.into_iter();
        let mut set = Self::with_capacity_and_hasher(iter.size_hint().0, S::default());
        set.extend(iter);
        set
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl<E, const N: usize> From<[E; N]> for LinkSet<E, RandomState>
where
    E: Linked + Hash + Eq,
{
    /// # Examples
    ///
    /// ```
    /// use linkset::{Keyed, LinkSet};
    ///
    /// let set1 = LinkSet::from([1, 2, 3, 4].map(Keyed::new));
    /// let set2: LinkSet<_> = [1, 2, 3, 4].map(Keyed::new).into();
    /// assert_eq!(set1, set2);
    /// ```
    fn from(arr: [E; N]) -> Self {
        Self::from_iter(arr)
    }
}

impl<E, S> Extend<E> for LinkSet<E, S>
where
    E: Linked + Hash + Eq,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = E>>(&mut self, iterable: I) {
        for element in iterable {
            self.insert(element);
        }
    }
}

impl<E, S> Default for LinkSet<E, S>
where
    S: Default,
{
    /// Return an empty [`LinkSet`] with the minimum slot array.
    fn default() -> Self {
        Self::with_capacity_and_hasher(0, S::default())
    }
}

impl<E, S1, S2> PartialEq<LinkSet<E, S2>> for LinkSet<E, S1>
where
    E: Linked + PartialEq,
{
    /// Compare elements pairwise in insertion order, like a sequence.
    fn eq(&self, other: &LinkSet<E, S2>) -> bool {
        self.len() == other.len() && self.iter().eq(other)
    }
}

impl<E, S> Eq for LinkSet<E, S> where E: Linked + Eq {}

impl<E, S1, S2> PartialOrd<LinkSet<E, S2>> for LinkSet<E, S1>
where
    E: Linked + PartialOrd,
{
    fn partial_cmp(&self, other: &LinkSet<E, S2>) -> Option<Ordering> {
        self.iter().partial_cmp(other)
    }
}

impl<E, S> Ord for LinkSet<E, S>
where
    E: Linked + Ord,
{
    fn cmp(&self, other: &Self) -> Ordering {
        self.iter().cmp(other)
    }
}

impl<E, S> Hash for LinkSet<E, S>
where
    E: Linked + Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for element in self {
            element.hash(state);
        }
    }
}
