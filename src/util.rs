pub use remainder::{remaining, Remaining};

mod remainder {
    use std::marker::PhantomData;

    /// A view over a slice that excludes one already-borrowed index.
    pub struct Remaining<'a, T> {
        used_index: usize,
        data: *mut T,
        len: usize,
        _marker: PhantomData<&'a mut ()>,
    }

    impl<T> Remaining<'_, T> {
        pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
            // SAFETY: `i != used_index` guarantees this doesn't alias the
            // `&mut T` handed out by `remaining` below, and `i < self.len`
            // keeps it in bounds of the original slice.
            unsafe {
                if self.used_index != i && i < self.len {
                    Some(&mut *self.data.add(i))
                } else {
                    None
                }
            }
        }

        pub fn get(&self, i: usize) -> Option<&T> {
            unsafe {
                if self.used_index != i && i < self.len {
                    Some(&*self.data.add(i))
                } else {
                    None
                }
            }
        }
    }

    /// Borrow `slice[i]` mutably, while returning a [`Remaining`] that can
    /// still index every other element of `slice`.
    pub fn remaining<T>(slice: &mut [T], i: usize) -> Option<(&mut T, Remaining<'_, T>)> {
        let len = slice.len();
        if i >= len {
            return None;
        }

        // SAFETY: `ptr.add(i)` and the `Remaining` handle never overlap: the
        // latter refuses to hand out index `i` again.
        unsafe {
            let ptr = slice.as_mut_ptr();
            let value = &mut *ptr.add(i);
            let remaining = Remaining {
                used_index: i,
                data: ptr,
                len,
                _marker: PhantomData,
            };
            Some((value, remaining))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn remaining_excludes_used_index() {
            let mut data = vec![1, 2, 3, 4];

            let (val, mut remaining) = remaining(&mut data, 2).unwrap();
            assert_eq!(*val, 3);

            assert_eq!(*remaining.get(0).unwrap(), 1);
            assert_eq!(*remaining.get(1).unwrap(), 2);
            assert!(remaining.get(2).is_none());
            assert_eq!(*remaining.get(3).unwrap(), 4);
            assert!(remaining.get(4).is_none());

            *remaining.get_mut(0).unwrap() = 100;
            assert_eq!(data[0], 100);
        }
    }
}
