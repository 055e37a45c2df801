// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Typed memory regions shared between a caller and its tasks.
//!
//! A [`Buffer`] carries an explicit [`ElementType`] and a fixed length, so a
//! task never reinterprets raw bytes: typed access with the wrong element
//! type fails with [`BufferError::TypeMismatch`]. The caller keeps its own
//! [`SharedBuffer`] handle and reads results back after post-processing.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::BufferError;

/// Element type tag of a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementType {
    U8,
    I32,
    U32,
    F32,
    F64,
}

impl ElementType {
    /// Size of one element in bytes.
    pub const fn size_bytes(&self) -> usize {
        match self {
            Self::U8 => 1,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Storage of a region, one variant per element type.
#[derive(Debug, Clone, PartialEq)]
pub enum BufferData {
    U8(Vec<u8>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl BufferData {
    pub fn element_type(&self) -> ElementType {
        match self {
            Self::U8(_) => ElementType::U8,
            Self::I32(_) => ElementType::I32,
            Self::U32(_) => ElementType::U32,
            Self::F32(_) => ElementType::F32,
            Self::F64(_) => ElementType::F64,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Feed the little-endian byte image of every element into `hasher`.
    fn hash_into(&self, hasher: &mut crc32fast::Hasher) {
        match self {
            Self::U8(v) => hasher.update(v),
            Self::I32(v) => v.iter().for_each(|x| hasher.update(&x.to_le_bytes())),
            Self::U32(v) => v.iter().for_each(|x| hasher.update(&x.to_le_bytes())),
            Self::F32(v) => v.iter().for_each(|x| hasher.update(&x.to_le_bytes())),
            Self::F64(v) => v.iter().for_each(|x| hasher.update(&x.to_le_bytes())),
        }
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Scalar types a [`Buffer`] can hold.
pub trait Element: sealed::Sealed + Copy + Default + Send + Sync + 'static {
    const ELEMENT_TYPE: ElementType;

    fn wrap(values: Vec<Self>) -> BufferData;
    fn slice(data: &BufferData) -> Option<&[Self]>;
    fn slice_mut(data: &mut BufferData) -> Option<&mut [Self]>;
}

macro_rules! impl_element {
    ($ty:ty, $variant:ident) => {
        impl sealed::Sealed for $ty {}

        impl Element for $ty {
            const ELEMENT_TYPE: ElementType = ElementType::$variant;

            fn wrap(values: Vec<Self>) -> BufferData {
                BufferData::$variant(values)
            }

            fn slice(data: &BufferData) -> Option<&[Self]> {
                match data {
                    BufferData::$variant(v) => Some(v),
                    _ => None,
                }
            }

            fn slice_mut(data: &mut BufferData) -> Option<&mut [Self]> {
                match data {
                    BufferData::$variant(v) => Some(v),
                    _ => None,
                }
            }
        }
    };
}

impl_element!(u8, U8);
impl_element!(i32, I32);
impl_element!(u32, U32);
impl_element!(f32, F32);
impl_element!(f64, F64);

/// A typed, fixed-length memory region.
///
/// Element type and length are fixed at creation. Contents may be read and
/// written through shared handles; a single writer is assumed.
#[derive(Debug)]
pub struct Buffer {
    element_type: ElementType,
    len: usize,
    data: RwLock<BufferData>,
}

/// Shared handle to a buffer, held by both caller and task data.
pub type SharedBuffer = Arc<Buffer>;

impl Buffer {
    /// Wrap an existing vector.
    pub fn from_vec<T: Element>(values: Vec<T>) -> SharedBuffer {
        let len = values.len();
        Arc::new(Self {
            element_type: T::ELEMENT_TYPE,
            len,
            data: RwLock::new(T::wrap(values)),
        })
    }

    /// Allocate a region of `len` default-valued elements.
    pub fn zeroed<T: Element>(len: usize) -> SharedBuffer {
        Self::from_vec(vec![T::default(); len])
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Size of the region in bytes.
    pub fn size_bytes(&self) -> usize {
        self.len * self.element_type.size_bytes()
    }

    fn check_type<T: Element>(&self) -> Result<(), BufferError> {
        if T::ELEMENT_TYPE != self.element_type {
            return Err(BufferError::TypeMismatch {
                expected: T::ELEMENT_TYPE,
                actual: self.element_type,
            });
        }
        Ok(())
    }

    /// Borrow the contents as a typed slice.
    pub fn with<T: Element, R>(&self, f: impl FnOnce(&[T]) -> R) -> Result<R, BufferError> {
        self.check_type::<T>()?;
        let guard = self.data.read().map_err(|_| BufferError::Poisoned)?;
        let slice = T::slice(&guard).ok_or(BufferError::TypeMismatch {
            expected: T::ELEMENT_TYPE,
            actual: guard.element_type(),
        })?;
        Ok(f(slice))
    }

    /// Borrow the contents as a mutable typed slice.
    pub fn with_mut<T: Element, R>(
        &self,
        f: impl FnOnce(&mut [T]) -> R,
    ) -> Result<R, BufferError> {
        self.check_type::<T>()?;
        let mut guard = self.data.write().map_err(|_| BufferError::Poisoned)?;
        let actual = guard.element_type();
        let slice = T::slice_mut(&mut guard).ok_or(BufferError::TypeMismatch {
            expected: T::ELEMENT_TYPE,
            actual,
        })?;
        Ok(f(slice))
    }

    /// Copy the contents out.
    pub fn read<T: Element>(&self) -> Result<Vec<T>, BufferError> {
        self.with(|values: &[T]| values.to_vec())
    }

    /// CRC32 of the little-endian byte image of the region.
    pub fn checksum(&self) -> Result<u32, BufferError> {
        let guard = self.data.read().map_err(|_| BufferError::Poisoned)?;
        let mut hasher = crc32fast::Hasher::new();
        guard.hash_into(&mut hasher);
        Ok(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_vec_tags_type() {
        let buf = Buffer::from_vec(vec![1.0f64, 2.0, 3.0]);
        assert_eq!(buf.element_type(), ElementType::F64);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.size_bytes(), 24);
    }

    #[test]
    fn test_type_mismatch() {
        let buf = Buffer::from_vec(vec![1i32, 2, 3]);
        let err = buf.read::<f64>().unwrap_err();
        assert!(matches!(
            err,
            BufferError::TypeMismatch {
                expected: ElementType::F64,
                actual: ElementType::I32
            }
        ));
    }

    #[test]
    fn test_with_mut_writes_through_shared_handle() {
        let buf = Buffer::zeroed::<i32>(4);
        let handle = Arc::clone(&buf);
        handle
            .with_mut(|values: &mut [i32]| values.copy_from_slice(&[4, 3, 2, 1]))
            .unwrap();
        assert_eq!(buf.read::<i32>().unwrap(), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_checksum_tracks_contents() {
        let a = Buffer::from_vec(vec![1.5f64, -2.0]);
        let b = Buffer::from_vec(vec![1.5f64, -2.0]);
        let c = Buffer::from_vec(vec![1.5f64, -2.5]);
        assert_eq!(a.checksum().unwrap(), b.checksum().unwrap());
        assert_ne!(a.checksum().unwrap(), c.checksum().unwrap());
    }

    #[test]
    fn test_checksum_matches_byte_image() {
        let buf = Buffer::from_vec(vec![0x0102_0304u32]);
        assert_eq!(
            buf.checksum().unwrap(),
            crc32fast::hash(&[0x04, 0x03, 0x02, 0x01])
        );
    }
}
