//! Byte buffers with explicit ownership and mutability, and strided typed
//! views into them.
//!
//! [`BufferData`] is the storage handle the mesh and material containers
//! hold their raw bytes through: it either owns an allocation or borrows
//! caller memory, and tracks whether writes are permitted. [`StridedSlice`]
//! presents a sub-range of such a buffer as evenly spaced typed elements,
//! with the stride free to exceed the element size for interleaved layouts.

use std::fmt;
use std::marker::PhantomData;
use std::mem::size_of;

use bitflags::bitflags;
use bytemuck::Pod;

bitflags! {
    /// Ownership and mutability of a data buffer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DataFlags: u8 {
        /// The buffer owns its allocation and frees it on drop.
        const OWNED = 1 << 0;
        /// Writes through mutable accessors are permitted.
        const MUTABLE = 1 << 1;
    }
}

/// Raw byte storage that is either owned or borrowed.
///
/// The variant decides both axes of [`DataFlags`]: owned data is always
/// writable by its holder, borrowed data is writable only when borrowed
/// mutably. Containers report the flags through `*_data_flags()` accessors
/// and gate their mutable views on [`DataFlags::MUTABLE`].
pub enum BufferData<'a> {
    /// Heap allocation owned by the container.
    Owned(Vec<u8>),
    /// Read-only view of caller memory.
    Borrowed(&'a [u8]),
    /// Mutable view of caller memory.
    BorrowedMut(&'a mut [u8]),
}

impl<'a> BufferData<'a> {
    /// Get the ownership and mutability flags for this buffer.
    pub fn flags(&self) -> DataFlags {
        match self {
            BufferData::Owned(_) => DataFlags::OWNED | DataFlags::MUTABLE,
            BufferData::Borrowed(_) => DataFlags::empty(),
            BufferData::BorrowedMut(_) => DataFlags::MUTABLE,
        }
    }

    /// Get the bytes.
    pub fn as_slice(&self) -> &[u8] {
        match self {
            BufferData::Owned(data) => data,
            BufferData::Borrowed(data) => data,
            BufferData::BorrowedMut(data) => data,
        }
    }

    /// Get the bytes mutably.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is borrowed immutably.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            BufferData::Owned(data) => data,
            BufferData::Borrowed(_) => panic!("the data is not mutable"),
            BufferData::BorrowedMut(data) => data,
        }
    }

    /// Get the buffer length in bytes.
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Check if writes through this buffer are permitted.
    pub fn is_mutable(&self) -> bool {
        self.flags().contains(DataFlags::MUTABLE)
    }
}

impl Default for BufferData<'_> {
    fn default() -> Self {
        BufferData::Owned(Vec::new())
    }
}

impl From<Vec<u8>> for BufferData<'static> {
    fn from(data: Vec<u8>) -> Self {
        BufferData::Owned(data)
    }
}

impl<'a> From<&'a [u8]> for BufferData<'a> {
    fn from(data: &'a [u8]) -> Self {
        BufferData::Borrowed(data)
    }
}

impl<'a> From<&'a mut [u8]> for BufferData<'a> {
    fn from(data: &'a mut [u8]) -> Self {
        BufferData::BorrowedMut(data)
    }
}

impl fmt::Debug for BufferData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BufferData::Owned(data) => write!(f, "Owned({} bytes)", data.len()),
            BufferData::Borrowed(data) => write!(f, "Borrowed({} bytes)", data.len()),
            BufferData::BorrowedMut(data) => write!(f, "BorrowedMut({} bytes)", data.len()),
        }
    }
}

fn check_extent<T: Pod>(bytes: &[u8], count: usize, stride: usize) {
    assert!(
        count <= 1 || stride >= size_of::<T>(),
        "stride {} is smaller than the {}-byte element size",
        stride,
        size_of::<T>()
    );
    if count > 0 {
        let end = (count - 1)
            .checked_mul(stride)
            .and_then(|end| end.checked_add(size_of::<T>()))
            .unwrap_or(usize::MAX);
        assert!(
            end <= bytes.len(),
            "{} elements with stride {} exceed the {}-byte window",
            count,
            stride,
            bytes.len()
        );
    }
}

fn element_range<T: Pod>(index: usize, count: usize, stride: usize) -> std::ops::Range<usize> {
    assert!(
        index < count,
        "index {} out of range for {} elements",
        index,
        count
    );
    let begin = index * stride;
    begin..begin + size_of::<T>()
}

/// Read-only view of evenly spaced typed elements in a byte window.
///
/// The stride may exceed `size_of::<T>()`, which is how interleaved vertex
/// layouts are addressed. Elements are read with unaligned loads, so any
/// byte offset is valid. The view never owns memory; [`as_bytes`](Self::as_bytes)
/// exposes the underlying window it aliases.
#[derive(Clone, Copy)]
pub struct StridedSlice<'a, T: Pod> {
    bytes: &'a [u8],
    count: usize,
    stride: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Pod> StridedSlice<'a, T> {
    /// Create a view of `count` elements spaced `stride` bytes apart.
    ///
    /// # Panics
    ///
    /// Panics if the stride is smaller than the element size (for more
    /// than one element) or if the last element does not fit in `bytes`.
    pub fn new(bytes: &'a [u8], count: usize, stride: usize) -> Self {
        check_extent::<T>(bytes, count, stride);
        Self {
            bytes,
            count,
            stride,
            _marker: PhantomData,
        }
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the view has no elements.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the byte stride between elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Read the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn get(&self, index: usize) -> T {
        let range = element_range::<T>(index, self.count, self.stride);
        bytemuck::pod_read_unaligned(&self.bytes[range])
    }

    /// Iterate over all elements by value.
    pub fn iter(&self) -> impl Iterator<Item = T> + 'a {
        let view = *self;
        (0..view.count).map(move |index| view.get(index))
    }

    /// Get the underlying byte window this view aliases.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<T: Pod + fmt::Debug> fmt::Debug for StridedSlice<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Mutable view of evenly spaced typed elements in a byte window.
///
/// Counterpart of [`StridedSlice`] for write access; elements are written
/// with unaligned stores.
pub struct StridedSliceMut<'a, T: Pod> {
    bytes: &'a mut [u8],
    count: usize,
    stride: usize,
    _marker: PhantomData<T>,
}

impl<'a, T: Pod> StridedSliceMut<'a, T> {
    /// Create a mutable view of `count` elements spaced `stride` bytes apart.
    ///
    /// # Panics
    ///
    /// Panics if the stride is smaller than the element size (for more
    /// than one element) or if the last element does not fit in `bytes`.
    pub fn new(bytes: &'a mut [u8], count: usize, stride: usize) -> Self {
        check_extent::<T>(bytes, count, stride);
        Self {
            bytes,
            count,
            stride,
            _marker: PhantomData,
        }
    }

    /// Get the number of elements.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if the view has no elements.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Read the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn get(&self, index: usize) -> T {
        let range = element_range::<T>(index, self.count, self.stride);
        bytemuck::pod_read_unaligned(&self.bytes[range])
    }

    /// Write the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn set(&mut self, index: usize, value: T) {
        let range = element_range::<T>(index, self.count, self.stride);
        self.bytes[range].copy_from_slice(bytemuck::bytes_of(&value));
    }
}
