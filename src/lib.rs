#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![no_std]

//! [`LinkSet`] is an intrusive hash set that iterates its elements in
//! insertion order, independent of their hash values.
//!
//! [`LinkMultiSet`] is the corresponding multi-set using the same storage
//! engine: it admits several equal elements and still iterates them in
//! insertion order.
//!
//! ### Highlights
//!
//! - **Intrusive storage.** Elements embed their own [`Links`] header and
//!   expose it through the [`Linked`] trait, so the containers allocate
//!   nothing per element beyond the open-addressed slot array. The
//!   ready-made [`Keyed`] wrapper turns any hashable payload into an
//!   element.
//! - The ordering semantics (see the type documentation for details).
//! - The [`Equivalent`] trait, which offers more flexible equality
//!   definitions between borrowed and owned versions of keys.
//! - [`CursorMut`][set::CursorMut], a remove-capable traversal that makes
//!   "iterate and delete" a compile-time-checked operation.
//! - [`LinkMultiSet::get_all`], a lazy view of every element equal to a
//!   key, in insertion order.
//!
//! ### Element lifecycle
//!
//! An element is created by the caller in the unlinked state, moved into a
//! container by `insert`, and owned by the container while it is a member.
//! Every removal path (`take`, `pop_front`/`pop_back`, cursor removal,
//! consuming iteration) resets the element's header before handing it
//! back, after which it may be inserted again, into the same container
//! or another one. `insert` refuses an element whose header is still
//! linked (for example, a payload-preserving clone of a resident element)
//! and reports the rejection with `false`.
//!
//! ### Feature Flags
//!
//! To reduce the amount of compiled code in the crate by default, certain
//! features are gated behind [feature flags]. These allow you to opt in to
//! (or out of) functionality. Below is a list of the features available in
//! this crate.
//!
//! * `std`: Enables features which require the Rust standard library. For
//!   more information see the section on [`no_std`].
//! * `arbitrary`: Adds implementations for the [`arbitrary::Arbitrary`]
//!   trait to [`LinkSet`], [`LinkMultiSet`], and [`Keyed`].
//! * `quickcheck`: Adds implementations for the [`quickcheck::Arbitrary`]
//!   trait to [`LinkSet`], [`LinkMultiSet`], and [`Keyed`].
//!
//! _Note: only the `std` feature is enabled by default._
//!
//! [feature flags]: https://doc.rust-lang.org/cargo/reference/manifest.html#the-features-section
//! [`no_std`]: #no-standard-library-targets
//! [`arbitrary::Arbitrary`]: `::arbitrary::Arbitrary`
//! [`quickcheck::Arbitrary`]: `::quickcheck::Arbitrary`
//!
//! ### Alternate Hashers
//!
//! [`LinkSet`] and [`LinkMultiSet`] have a default hasher type
//! [`S = RandomState`][std::collections::hash_map::RandomState],
//! just like the standard `HashSet`, which is resistant to HashDoS attacks
//! but not the most performant. Type aliases can make it easier to use
//! alternate hashers:
//!
//! ```
//! use fnv::FnvBuildHasher;
//! use linkset::{Keyed, LinkMultiSet, LinkSet};
//!
//! type FnvLinkSet<E> = LinkSet<E, FnvBuildHasher>;
//! type FnvLinkMultiSet<E> = LinkMultiSet<E, FnvBuildHasher>;
//!
//! let std: LinkSet<Keyed<i32>> = (0..100).map(Keyed::new).collect();
//! let fnv: FnvLinkSet<Keyed<i32>> = (0..100).map(Keyed::new).collect();
//! assert_eq!(std, fnv);
//!
//! let multi: FnvLinkMultiSet<Keyed<i32>> = (0..3).chain(0..3).map(Keyed::new).collect();
//! assert_eq!(multi.len(), 6);
//! ```
//!
//! ### Rust Version
//!
//! This version of linkset requires Rust 1.85 or later.
//!
//! ## No Standard Library Targets
//!
//! This crate supports being built without `std`, requiring `alloc`
//! instead. This is chosen by disabling the default "std" cargo feature,
//! by adding `default-features = false` to your dependency specification.
//!
//! - Creating sets using [`new`][LinkSet::new] and
//!   [`with_capacity`][LinkSet::with_capacity] is unavailable without
//!   `std`. Use methods [`LinkSet::default`],
//!   [`with_hasher`][LinkSet::with_hasher], or
//!   [`with_capacity_and_hasher`][LinkSet::with_capacity_and_hasher]
//!   instead. A no-std compatible hasher will be needed as well, for
//!   example from the crate `twox-hash`.
//! - Macros [`linkset!`] and [`linkmultiset!`] are unavailable without
//!   `std`.

#![cfg_attr(docsrs, feature(doc_cfg))]

extern crate alloc;

#[cfg(feature = "std")]
#[cfg_attr(test, macro_use)]
extern crate std;

mod arbitrary;
mod linked;
#[macro_use]
mod macros;
mod table;

pub mod multiset;
pub mod set;

pub use crate::linked::{Keyed, Linked, Links};
pub use crate::multiset::LinkMultiSet;
pub use crate::set::LinkSet;
pub use equivalent::Equivalent;
