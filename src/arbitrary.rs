#[cfg(feature = "arbitrary")]
#[cfg_attr(docsrs, doc(cfg(feature = "arbitrary")))]
mod impl_arbitrary {
    use crate::{Keyed, LinkMultiSet, LinkSet, Linked};
    use arbitrary::{Arbitrary, Result, Unstructured};
    use core::hash::{BuildHasher, Hash};

    impl<'a, T> Arbitrary<'a> for Keyed<T>
    where
        T: Arbitrary<'a>,
    {
        fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
            T::arbitrary(u).map(Keyed::new)
        }
    }

    impl<'a, E, S> Arbitrary<'a> for LinkSet<E, S>
    where
        E: Arbitrary<'a> + Linked + Hash + Eq,
        S: BuildHasher + Default,
    {
        fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
            u.arbitrary_iter()?.collect()
        }

        fn arbitrary_take_rest(u: Unstructured<'a>) -> Result<Self> {
            u.arbitrary_take_rest_iter()?.collect()
        }
    }

    impl<'a, E, S> Arbitrary<'a> for LinkMultiSet<E, S>
    where
        E: Arbitrary<'a> + Linked + Hash,
        S: BuildHasher + Default,
    {
        fn arbitrary(u: &mut Unstructured<'a>) -> Result<Self> {
            u.arbitrary_iter()?.collect()
        }

        fn arbitrary_take_rest(u: Unstructured<'a>) -> Result<Self> {
            u.arbitrary_take_rest_iter()?.collect()
        }
    }
}

#[cfg(feature = "quickcheck")]
#[cfg_attr(docsrs, doc(cfg(feature = "quickcheck")))]
mod impl_quickcheck {
    use crate::{Keyed, LinkMultiSet, LinkSet, Linked};
    use alloc::boxed::Box;
    use alloc::vec::Vec;
    use core::hash::{BuildHasher, Hash};
    use quickcheck::{Arbitrary, Gen};

    impl<T> Arbitrary for Keyed<T>
    where
        T: Arbitrary,
    {
        fn arbitrary(g: &mut Gen) -> Self {
            Keyed::new(T::arbitrary(g))
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            Box::new((**self).shrink().map(Keyed::new))
        }
    }

    /// Clone the elements out with fresh headers; a clone that kept the
    /// resident header would be refused on re-insertion.
    fn unlinked_elements<E>(iter: impl Iterator<Item = E>) -> Vec<E>
    where
        E: Linked + Clone,
    {
        iter.map(|mut element| {
            element.links_mut().unlink();
            element
        })
        .collect()
    }

    impl<E, S> Arbitrary for LinkSet<E, S>
    where
        E: Arbitrary + Linked + Hash + Eq,
        S: BuildHasher + Default + Clone + 'static,
    {
        fn arbitrary(g: &mut Gen) -> Self {
            Vec::<E>::arbitrary(g).into_iter().collect()
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            let elements = unlinked_elements(self.iter().cloned());
            Box::new(elements.shrink().map(|v| v.into_iter().collect()))
        }
    }

    impl<E, S> Arbitrary for LinkMultiSet<E, S>
    where
        E: Arbitrary + Linked + Hash,
        S: BuildHasher + Default + Clone + 'static,
    {
        fn arbitrary(g: &mut Gen) -> Self {
            Vec::<E>::arbitrary(g).into_iter().collect()
        }

        fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
            let elements = unlinked_elements(self.iter().cloned());
            Box::new(elements.shrink().map(|v| v.into_iter().collect()))
        }
    }
}
