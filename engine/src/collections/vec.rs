// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::{
    fmt::Debug,
    mem::{needs_drop, transmute, MaybeUninit},
    ops::{Deref, DerefMut},
};

use bytemuck::{fill_zeroes, Zeroable};

use crate::allocators::LinearAllocator;

/// A fixed-capacity contiguous array, allocated from a [`LinearAllocator`].
///
/// Named like Vec since it's used similarly, but this type does *not* grow.
/// The capacity is picked at creation time, and the backing memory stays
/// uninitialized until it's pushed to. The asset registry uses these for its
/// record table, and the atlas packer for its tiles and pixels, so every
/// capacity limit in those systems is a limit of some [`FixedVec`].
pub struct FixedVec<'a, T> {
    uninit_slice: &'a mut [MaybeUninit<T>],
    initialized_len: usize,
}

impl<T> FixedVec<'_, T> {
    /// Creates a new [`FixedVec`] with enough space for `capacity` elements of
    /// type `T`. Returns None if the allocator does not have enough free space.
    pub fn new<'a>(allocator: &'a LinearAllocator, capacity: usize) -> Option<FixedVec<'a, T>> {
        let uninit_slice = allocator.try_alloc_uninit_slice::<T>(capacity)?;
        Some(FixedVec {
            uninit_slice,
            initialized_len: 0,
        })
    }

    /// Appends the value to the back of the array. If there's no capacity left,
    /// returns the given value back wrapped in a [`Result::Err`].
    pub fn push(&mut self, value: T) -> Result<(), T> {
        let i = self.initialized_len;
        let Some(uninit_at_i) = self.uninit_slice.get_mut(i) else {
            return Err(value);
        };
        // The slot at `i` is uninitialized: it was either never written, or
        // its previous value was moved out or dropped by pop/truncate. So
        // overwriting without dropping doesn't leak anything.
        uninit_at_i.write(value);
        self.initialized_len = i + 1;
        Ok(())
    }

    /// If non-empty, returns the final element and shortens the array by one.
    pub fn pop(&mut self) -> Option<T> {
        let i = self.initialized_len.checked_sub(1)?;
        // Safety: i < initialized_len, so the value is initialized. The length
        // is decremented right after, so it won't be read again.
        let value = unsafe { self.uninit_slice[i].assume_init_read() };
        self.initialized_len = i;
        Some(value)
    }

    /// Empties out the array, dropping the currently contained values.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Shortens the array to be the given length if it's currently longer. Any
    /// values past the new length are dropped.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.initialized_len {
            return;
        }
        if needs_drop::<T>() {
            for initialized_value in &mut self.uninit_slice[new_len..self.initialized_len] {
                // Safety: everything below `initialized_len` is initialized.
                unsafe { initialized_value.assume_init_drop() };
            }
        }
        self.initialized_len = new_len;
    }

    /// Returns the total amount of elements this array can hold.
    pub fn capacity(&self) -> usize {
        self.uninit_slice.len()
    }

    /// Returns `true` if there's no more capacity for additional elements.
    pub fn is_full(&self) -> bool {
        self.initialized_len == self.uninit_slice.len()
    }
}

impl<T: Copy> FixedVec<'_, T> {
    /// Appends all of `values` to the back of the array, or nothing at all if
    /// they wouldn't all fit. Returns `false` in the latter case.
    pub fn extend_from_slice(&mut self, values: &[T]) -> bool {
        let start = self.initialized_len;
        let Some(dst) = self.uninit_slice.get_mut(start..start + values.len()) else {
            return false;
        };
        for (dst, src) in dst.iter_mut().zip(values) {
            dst.write(*src);
        }
        self.initialized_len = start + values.len();
        true
    }
}

impl<T: Zeroable> FixedVec<'_, T> {
    /// Fills out the rest of the array's capacity with zeroed values.
    pub fn fill_with_zeroes(&mut self) {
        fill_zeroes(&mut self.uninit_slice[self.initialized_len..]);
        // Safety: everything before `initialized_len` was already initialized,
        // and the rest is now zeroed, which is a valid T since T: Zeroable.
        self.initialized_len = self.uninit_slice.len();
    }
}

impl<T> Drop for FixedVec<'_, T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Deref for FixedVec<'_, T> {
    type Target = [T];

    fn deref<'a>(&'a self) -> &'a Self::Target {
        let initialized_slice = &self.uninit_slice[..self.initialized_len];
        // Safety: `MaybeUninit<T>` has the same layout as `T`, and all values
        // up to `initialized_len` are initialized.
        unsafe { transmute::<&'a [MaybeUninit<T>], &'a [T]>(initialized_slice) }
    }
}

impl<T> DerefMut for FixedVec<'_, T> {
    fn deref_mut<'a>(&'a mut self) -> &'a mut Self::Target {
        let initialized_slice = &mut self.uninit_slice[..self.initialized_len];
        // Safety: see Deref.
        unsafe { transmute::<&'a mut [MaybeUninit<T>], &'a mut [T]>(initialized_slice) }
    }
}

impl<T: Debug> Debug for FixedVec<'_, T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let slice: &[T] = self;
        f.debug_list().entries(slice).finish()
    }
}
