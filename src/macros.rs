#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[macro_export]
/// Create a [`LinkSet`][crate::LinkSet] from a list of elements
///
/// ## Example
///
/// ```
/// use linkset::{linkset, Keyed};
///
/// let set = linkset! {
///     Keyed::new("a"),
///     Keyed::new("b"),
/// };
/// assert!(set.contains(&"a"));
/// assert!(set.contains(&"b"));
/// assert!(!set.contains(&"c"));
///
/// // "a" is the first element
/// assert_eq!(set.iter().next().map(|e| **e), Some("a"));
/// ```
macro_rules! linkset {
    ($($element:expr,)+) => { $crate::linkset!($($element),+) };
    ($($element:expr),*) => {
        {
            // Note: `stringify!($element)` is just here to consume the repetition,
            // but we throw away that string literal during constant evaluation.
            const CAP: usize = <[()]>::len(&[$({ stringify!($element); }),*]);
            let mut set = $crate::LinkSet::with_capacity(CAP);
            $(
                set.insert($element);
            )*
            set
        }
    };
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
#[macro_export]
/// Create a [`LinkMultiSet`][crate::LinkMultiSet] from a list of elements
///
/// ## Example
///
/// ```
/// use linkset::{linkmultiset, Keyed};
///
/// let set = linkmultiset! {
///     Keyed::new("a"),
///     Keyed::new("b"),
///     Keyed::new("a"),
/// };
/// assert_eq!(set.len(), 3);
/// assert_eq!(set.get_all(&"a").count(), 2);
///
/// // "a" is the first element
/// assert_eq!(set.iter().next().map(|e| **e), Some("a"));
/// ```
macro_rules! linkmultiset {
    ($($element:expr,)+) => { $crate::linkmultiset!($($element),+) };
    ($($element:expr),*) => {
        {
            // Note: `stringify!($element)` is just here to consume the repetition,
            // but we throw away that string literal during constant evaluation.
            const CAP: usize = <[()]>::len(&[$({ stringify!($element); }),*]);
            let mut set = $crate::LinkMultiSet::with_capacity(CAP);
            $(
                set.insert($element);
            )*
            set
        }
    };
}
