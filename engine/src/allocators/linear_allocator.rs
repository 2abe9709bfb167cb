// SPDX-FileCopyrightText: 2024 Jens Pitkänen <jens.pitkanen@helsinki.fi>
//
// SPDX-License-Identifier: GPL-3.0-or-later

use core::{cell::Cell, ffi::c_void, fmt::Debug, mem::MaybeUninit, slice};

use platform_abstraction_layer::Pal;

/// A linear allocator with a constant capacity. Can allocate memory regions
/// with any size or alignment (within the capacity) very fast, but individual
/// allocations can't be freed to make more space while there's still other
/// allocations in use.
///
/// The backing memory is allocated once in [`LinearAllocator::new`] and never
/// moved, so everything allocated from here keeps its address for as long as
/// the allocator lives. The asset registry relies on this for handing out
/// long-lived borrows to its records.
pub struct LinearAllocator<'platform> {
    backing_mem_ptr: *mut c_void,
    backing_mem_size: usize,
    platform: &'platform dyn Pal,
    /// The amount of bytes allocated starting from `backing_mem_ptr`. Can
    /// overflow `backing_mem_size` when the allocator reaches capacity, but in
    /// such a case, we don't even create a reference to the out-of-bounds area
    /// of memory.
    allocated: Cell<usize>,
}

impl Debug for LinearAllocator<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LinearAllocator")
            .field("backing_mem_ptr", &self.backing_mem_ptr)
            .field("backing_mem_size", &self.backing_mem_size)
            .field("allocated", &self.allocated)
            .finish_non_exhaustive()
    }
}

impl Drop for LinearAllocator<'_> {
    fn drop(&mut self) {
        self.reset();
        // Safety: since we have an exclusive borrow of self, there's no
        // borrows of the allocations anymore (they can't outlive the immutable
        // borrow they were allocated through), so nobody points to the backing
        // memory. The pointer and size are the ones we got from malloc.
        unsafe {
            self.platform
                .free(self.backing_mem_ptr, self.backing_mem_size)
        };
    }
}

impl LinearAllocator<'_> {
    /// Creates a new [`LinearAllocator`] with `capacity` bytes of backing
    /// memory. Returns None if allocating the memory fails or if `capacity`
    /// overflows `isize`.
    pub fn new(platform: &dyn Pal, capacity: usize) -> Option<LinearAllocator> {
        if capacity > isize::MAX as usize {
            // Practically never happens, but asserting this here helps avoid a
            // safety check later.
            return None;
        }

        let backing_mem_ptr = platform.malloc(capacity);
        if backing_mem_ptr.is_null() {
            return None;
        }

        Some(LinearAllocator {
            backing_mem_ptr,
            backing_mem_size: capacity,
            platform,
            allocated: Cell::new(0),
        })
    }

    /// Returns the amount of allocated memory currently, in bytes.
    pub fn allocated(&self) -> usize {
        self.allocated.get().min(self.backing_mem_size)
    }

    /// Returns the total (free and allocated) amount of memory owned by this
    /// allocator, in bytes.
    pub fn total(&self) -> usize {
        self.backing_mem_size
    }

    /// Allocates memory for a slice of `MaybeUninit<T>`, leaving the contents
    /// of the slice uninitialized, returning None if there's not enough free
    /// memory.
    ///
    /// Note regardless of if the allocation is successful, `len` elements are
    /// "allocated" from the allocation offset. This means that once this
    /// returns `None`, subsequent allocations will always fail until
    /// [`LinearAllocator::reset`].
    pub fn try_alloc_uninit_slice<'a, T>(&'a self, len: usize) -> Option<&'a mut [MaybeUninit<T>]> {
        let reserved_bytes = len
            .checked_mul(size_of::<T>())?
            .checked_add(align_of::<T>() - 1)?;
        let allocation_unaligned_offset = self.allocated.get();
        self.allocated
            .set(allocation_unaligned_offset.saturating_add(reserved_bytes));

        // Make sure the entire allocation fits in the backing memory.
        if allocation_unaligned_offset.saturating_add(reserved_bytes) > self.backing_mem_size {
            return None;
        }

        // Safety: due to the check above, the offset is less than
        // `self.backing_mem_size`, which in turn is clamped to `isize::MAX` in
        // the constructor, and the offset pointer stays within the allocated
        // object.
        let unaligned_allocation_ptr =
            unsafe { self.backing_mem_ptr.byte_add(allocation_unaligned_offset) };

        let extra_offset_for_alignment = unaligned_allocation_ptr.align_offset(align_of::<T>());
        if extra_offset_for_alignment >= align_of::<T>() {
            return None;
        }

        // Safety: the alignment padding is less than `align_of::<T>()`, which
        // was included in `reserved_bytes`, so this is still in bounds.
        let aligned_allocation_ptr =
            unsafe { unaligned_allocation_ptr.byte_add(extra_offset_for_alignment) };

        let uninit_t_ptr = aligned_allocation_ptr as *mut MaybeUninit<T>;

        // Safety:
        // - `uninit_t_ptr` is non-null, aligned, and the whole `len *
        //   size_of::<T>()` bytes after it are inside the malloc'd memory.
        // - Uninitialized values are valid for `MaybeUninit<T>`.
        // - The memory is not accessed through any other pointer during 'a,
        //   since `self.allocated` has been bumped past the bounds of this
        //   slice, and is not reset until self is mutably borrowable again
        //   (i.e. after this slice has been dropped).
        // - The total size is not larger than `isize::MAX`, because it is not
        //   larger than `self.backing_mem_size`.
        let uninit_t_slice: &'a mut [MaybeUninit<T>] =
            unsafe { slice::from_raw_parts_mut(uninit_t_ptr, len) };

        Some(uninit_t_slice)
    }

    /// Resets the linear allocator, reclaiming all of the backing memory for
    /// future allocations.
    pub fn reset(&mut self) {
        // Safety: though this is not an unsafe operation, pretty much all the
        // unsafety in this file relies on `self.backing_mem_ptr +
        // self.allocated` to not point into memory which is already being
        // borrowed. We have a mutable borrow of self, so there's no other
        // borrows of self, so there's no borrows of the backing memory either.
        self.allocated.set(0);
    }
}

#[cfg(test)]
mod tests {
    use crate::test_platform::TestPlatform;

    use super::LinearAllocator;

    #[test]
    fn allocations_are_aligned_and_disjoint() {
        let platform = TestPlatform::new();
        let alloc = LinearAllocator::new(&platform, 1024).unwrap();

        let bytes = alloc.try_alloc_uninit_slice::<u8>(3).unwrap();
        let words = alloc.try_alloc_uninit_slice::<u64>(4).unwrap();
        assert_eq!(0, words.as_ptr() as usize % align_of::<u64>());

        let bytes_end = bytes.as_ptr() as usize + bytes.len();
        assert!(bytes_end <= words.as_ptr() as usize);
    }

    #[test]
    fn running_out_of_memory_returns_none() {
        let platform = TestPlatform::new();
        let mut alloc = LinearAllocator::new(&platform, 64).unwrap();

        assert!(alloc.try_alloc_uninit_slice::<u8>(48).is_some());
        assert!(alloc.try_alloc_uninit_slice::<u8>(32).is_none());
        assert!(alloc.try_alloc_uninit_slice::<u8>(1).is_none());

        alloc.reset();
        assert_eq!(0, alloc.allocated());
        assert!(alloc.try_alloc_uninit_slice::<u8>(64).is_some());
    }
}
