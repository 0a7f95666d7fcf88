use super::LinkSet;
use crate::linked::Linked;
use crate::table::{IntoIter, Iter};

impl<'a, E: Linked, S> IntoIterator for &'a LinkSet<E, S> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl<E: Linked, S> IntoIterator for LinkSet<E, S> {
    type Item = E;
    type IntoIter = IntoIter<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_elements()
    }
}
