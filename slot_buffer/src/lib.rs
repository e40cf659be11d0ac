use std::alloc::{alloc, dealloc, handle_alloc_error, realloc, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot index {index} out of bounds for length {len}")]
    OutOfBounds { index: usize, len: usize },
    #[error("slot buffer capacity must be at least 1")]
    ZeroCapacity,
    #[error("zero-sized element types are not supported")]
    ZeroSizedType,
    #[error("capacity overflow while sizing {requested} slots")]
    CapacityOverflow { requested: usize },
    #[error("allocation failed")]
    AllocFailed,
}

/// An exclusively owned block of `capacity` slots whose first `len` slots hold live values.
///
/// Growth always doubles the capacity. Relocation moves the owned values bitwise into the
/// new block, so a value's own heap data (a `String`'s bytes, for instance) is never copied
/// or freed by a resize. Slots past `len` are uninitialized and never read.
pub struct SlotBuffer<T> {
    ptr: NonNull<T>,
    cap: usize,
    len: usize,
    _marker: PhantomData<T>,
}

// SAFETY: the buffer owns its values, so moving it moves them.
unsafe impl<T: Send> Send for SlotBuffer<T> {}
// SAFETY: shared access only hands out `&T`.
unsafe impl<T: Sync> Sync for SlotBuffer<T> {}

impl<T> SlotBuffer<T> {
    /// Allocates a buffer with exactly `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Result<Self, SlotError> {
        let layout = Self::layout_for(capacity)?;
        Ok(Self {
            ptr: Self::allocate(layout),
            cap: capacity,
            len: 0,
            _marker: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.len == self.cap
    }

    /// Appends `elem`, doubling the capacity first if every slot is taken.
    pub fn push(&mut self, elem: T) -> Result<(), SlotError> {
        self.insert(self.len, elem)
    }

    /// Inserts `elem` at `index`, shifting the tail one slot to the right.
    ///
    /// Bounds are checked before any growth, so a rejected insert leaves the buffer untouched.
    pub fn insert(&mut self, index: usize, elem: T) -> Result<(), SlotError> {
        if index > self.len {
            return Err(SlotError::OutOfBounds { index, len: self.len });
        }
        if self.is_full() {
            self.grow()?;
        }

        unsafe {
            // SAFETY: len < cap after the growth check, so slot `len` exists and the
            // tail [index, len) can move up by one without leaving the allocation.
            let p = self.ptr.as_ptr().add(index);
            ptr::copy(p, p.add(1), self.len - index);
            ptr::write(p, elem);
        }
        // Only count the value once it has been written.
        self.len += 1;
        Ok(())
    }

    /// Removes the value at `index` and hands ownership to the caller.
    pub fn remove(&mut self, index: usize) -> Result<T, SlotError> {
        if index >= self.len {
            return Err(SlotError::OutOfBounds { index, len: self.len });
        }

        unsafe {
            self.len -= 1;
            // SAFETY: index was a live slot. After the read the slot is logically
            // uninitialized and the tail moves down over it.
            let p = self.ptr.as_ptr().add(index);
            let result = ptr::read(p);
            ptr::copy(p.add(1), p, self.len - index);
            Ok(result)
        }
    }

    /// Drops every live value, releases the block, and allocates a fresh one of `capacity` slots.
    pub fn reset(&mut self, capacity: usize) -> Result<(), SlotError> {
        let new_layout = Self::layout_for(capacity)?;
        self.drop_live();
        unsafe {
            // SAFETY: the block was allocated with the current layout and holds no live values.
            dealloc(self.ptr.as_ptr() as *mut u8, self.current_layout());
        }
        self.ptr = Self::allocate(new_layout);
        self.cap = capacity;
        Ok(())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.deref().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.deref_mut().iter_mut()
    }

    fn grow(&mut self) -> Result<(), SlotError> {
        let new_cap = self
            .cap
            .checked_mul(2)
            .ok_or(SlotError::CapacityOverflow { requested: usize::MAX })?;
        let new_layout = Self::layout_for(new_cap)?;

        // realloc moves the live handles as raw bytes; nothing they point to is touched.
        let new_ptr = unsafe {
            realloc(
                self.ptr.as_ptr() as *mut u8,
                self.current_layout(),
                new_layout.size(),
            )
        };
        // On failure the old block is still valid and still ours.
        self.ptr = NonNull::new(new_ptr as *mut T).ok_or(SlotError::AllocFailed)?;
        self.cap = new_cap;
        Ok(())
    }

    fn drop_live(&mut self) {
        let live = self.len;
        // Zero the length first so a panicking destructor cannot cause a double drop.
        self.len = 0;
        unsafe {
            // SAFETY: the first `live` slots were initialized.
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.ptr.as_ptr(), live));
        }
    }

    fn layout_for(capacity: usize) -> Result<Layout, SlotError> {
        if mem::size_of::<T>() == 0 {
            return Err(SlotError::ZeroSizedType);
        }
        if capacity == 0 {
            return Err(SlotError::ZeroCapacity);
        }
        let layout = Layout::array::<T>(capacity)
            .map_err(|_| SlotError::CapacityOverflow { requested: capacity })?;
        Ok(layout)
    }

    fn current_layout(&self) -> Layout {
        // SAFETY: `cap` was validated by `layout_for` when the block was allocated.
        unsafe {
            Layout::from_size_align_unchecked(mem::size_of::<T>() * self.cap, mem::align_of::<T>())
        }
    }

    fn allocate(layout: Layout) -> NonNull<T> {
        let raw = unsafe { alloc(layout) };
        match NonNull::new(raw as *mut T) {
            Some(p) => p,
            None => handle_alloc_error(layout),
        }
    }
}

impl<T> Drop for SlotBuffer<T> {
    fn drop(&mut self) {
        // 1. drop every live value
        self.drop_live();
        // 2. release the block
        unsafe {
            dealloc(self.ptr.as_ptr() as *mut u8, self.current_layout());
        }
    }
}

impl<T: Clone> Clone for SlotBuffer<T> {
    /// Deep copy with the same capacity and length.
    fn clone(&self) -> Self {
        let mut out = Self {
            ptr: Self::allocate(self.current_layout()),
            cap: self.cap,
            len: 0,
            _marker: PhantomData,
        };
        for elem in self.iter() {
            unsafe {
                // SAFETY: out.len < out.cap because out.cap == self.cap >= self.len.
                ptr::write(out.ptr.as_ptr().add(out.len), elem.clone());
            }
            out.len += 1;
        }
        out
    }
}

impl<T> Deref for SlotBuffer<T> {
    type Target = [T];
    fn deref(&self) -> &[T] {
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for SlotBuffer<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for SlotBuffer<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Owning iterator; drops whatever it did not yield and then frees the block.
pub struct IntoIter<T> {
    ptr: NonNull<T>,
    cap: usize,
    start: *const T,
    end: *const T,
    _marker: PhantomData<T>,
}

impl<T> IntoIterator for SlotBuffer<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let ptr = self.ptr;
        let cap = self.cap;
        let len = self.len;

        // The iterator takes over both the values and the block.
        mem::forget(self);

        let start = ptr.as_ptr() as *const T;
        let end = unsafe { start.add(len) };

        IntoIter {
            ptr,
            cap,
            start,
            end,
            _marker: PhantomData,
        }
    }
}

impl<T> IntoIter<T> {
    fn remaining(&self) -> usize {
        (self.end as usize - self.start as usize) / mem::size_of::<T>()
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            None
        } else {
            unsafe {
                let result = ptr::read(self.start);
                self.start = self.start.add(1);
                Some(result)
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining();
        (len, Some(len))
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        unsafe {
            let remaining = self.remaining();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.start as *mut T, remaining));

            let layout = Layout::from_size_align_unchecked(
                mem::size_of::<T>() * self.cap,
                mem::align_of::<T>(),
            );
            dealloc(self.ptr.as_ptr() as *mut u8, layout);
        }
    }
}

impl<'a, T> IntoIterator for &'a SlotBuffer<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut SlotBuffer<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests;
