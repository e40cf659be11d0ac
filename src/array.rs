use std::fmt;

use slot_buffer::{IntoIter, SlotBuffer};
use tracing::{debug, trace};

use crate::error::{ArrayError, ArrayResult};

/// A growable array that owns a private copy of every string stored in it.
///
/// Values go in as `&str` and are copied; nothing the caller holds is ever aliased.
/// When every slot is taken the backing storage doubles, moving the existing strings
/// without copying their contents.
///
/// ```
/// use string_array::StringArray;
///
/// let mut arr = StringArray::new(1)?;
/// arr.insert("STRING1", 0)?;
/// arr.append("STRING4")?;
/// arr.insert("STRING2", 0)?;
/// arr.insert("STRING3", 1)?;
/// assert_eq!(arr.to_string(), "[STRING2,STRING3,STRING1,STRING4]");
/// assert_eq!(arr.capacity(), 4);
///
/// arr.remove("STRING3");
/// assert_eq!(arr.to_string(), "[STRING2,STRING1,STRING4]");
/// # Ok::<(), string_array::ArrayError>(())
/// ```
#[derive(Clone)]
pub struct StringArray {
    slots: SlotBuffer<String>,
    initial_capacity: usize,
}

impl StringArray {
    /// Creates an empty array with room for `capacity` strings.
    ///
    /// A capacity of zero is rejected with [`ArrayError::InvalidCapacity`].
    pub fn new(capacity: usize) -> ArrayResult<Self> {
        if capacity == 0 {
            return Err(ArrayError::InvalidCapacity { requested: 0 });
        }
        Ok(Self {
            slots: SlotBuffer::with_capacity(capacity)?,
            initial_capacity: capacity,
        })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Borrows the string at `index` without giving up ownership.
    pub fn read(&self, index: usize) -> ArrayResult<&str> {
        self.slots
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.out_of_range(index))
    }

    /// Stores a copy of `value` at `index`, shifting later elements one place right.
    ///
    /// `index == len()` appends. Anything past that is rejected before the array grows.
    pub fn insert(&mut self, value: &str, index: usize) -> ArrayResult<()> {
        if index > self.len() {
            return Err(self.out_of_range(index));
        }

        let grows = self.slots.is_full();
        let from = self.capacity();
        self.slots.insert(index, value.to_owned())?;
        if grows {
            debug!(from, to = self.capacity(), count = self.len(), "string array grew");
        }
        Ok(())
    }

    pub fn append(&mut self, value: &str) -> ArrayResult<()> {
        self.insert(value, self.len())
    }

    /// Removes the first element equal to `value`.
    ///
    /// Returns whether anything was removed; a missing value is not an error.
    pub fn remove(&mut self, value: &str) -> bool {
        let Some(index) = self.index_of(value) else {
            return false;
        };
        trace!(index, "removing by value");
        self.slots.remove(index).is_ok()
    }

    /// Position of the first element equal to `value`.
    pub fn index_of(&self, value: &str) -> Option<usize> {
        self.slots.iter().position(|elem| elem.as_str() == value)
    }

    /// Removes the element at `index` and returns it to the caller.
    ///
    /// Negative indices count from the end, so `-1` is the last element.
    pub fn pop(&mut self, index: isize) -> ArrayResult<String> {
        let count = self.len();
        let resolved =
            resolve_pop_index(index, count).ok_or(ArrayError::IndexOutOfRange { index, count })?;
        trace!(index, resolved, "popping");
        Ok(self.slots.remove(resolved)?)
    }

    /// Releases every element and the storage, then starts over with the capacity the
    /// array was created with.
    pub fn clear(&mut self) -> ArrayResult<()> {
        let released = self.len();
        self.slots.reset(self.initial_capacity)?;
        debug!(released, capacity = self.initial_capacity, "string array cleared");
        Ok(())
    }

    /// Deep copy with the same capacity and contents.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Appends a copy of each element of `other`, in order.
    pub fn extend(&mut self, other: &StringArray) -> ArrayResult<()> {
        for value in other.iter() {
            self.append(value)?;
        }
        Ok(())
    }

    /// Reverses the order of the elements.
    ///
    /// Every position is refilled with a fresh copy taken from a snapshot, so no slot is
    /// read after it has been overwritten.
    pub fn reverse(&mut self) {
        let snapshot = self.copy();
        let count = self.len();
        for (i, slot) in self.slots.iter_mut().enumerate() {
            *slot = snapshot.slots[count - 1 - i].clone();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.slots.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.slots
    }

    fn out_of_range(&self, index: usize) -> ArrayError {
        ArrayError::IndexOutOfRange {
            index: isize::try_from(index).unwrap_or(isize::MAX),
            count: self.len(),
        }
    }
}

/// Maps a possibly negative pop index onto a slot.
///
/// The bound check runs on the index as given: `index >= count` or `-index > count`
/// is out of range. Only then is a negative index resolved to `count + index`.
fn resolve_pop_index(index: isize, count: usize) -> Option<usize> {
    let (index, count) = (index as i128, count as i128);
    if index >= count || -index > count {
        return None;
    }
    let resolved = if index >= 0 { index } else { count + index };
    Some(resolved as usize)
}

impl fmt::Display for StringArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, elem) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(elem)?;
        }
        f.write_str("]")
    }
}

impl fmt::Debug for StringArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringArray")
            .field("count", &self.len())
            .field("capacity", &self.capacity())
            .field("elements", &self.slots)
            .finish()
    }
}

/// Arrays are equal when they hold the same strings in the same order; capacity is ignored.
impl PartialEq for StringArray {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl Eq for StringArray {}

impl IntoIterator for StringArray {
    type Item = String;
    type IntoIter = IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.into_iter()
    }
}

impl<'a> IntoIterator for &'a StringArray {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
