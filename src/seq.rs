//! # Sequences
//!
//! Fixed-length sequences backing chromosomes, genotypes and evolution
//! results.
//!
//! - [`Seq`] is the read-only view: indexed access, search and iteration.
//! - [`MSeq`] owns its storage and allows positional writes.
//! - [`ISeq`] is the sealed, immutable view. It is cheap to clone and its
//!   sub-sequences share the same storage.
//!
//! Sealing is a one-way transition. [`MSeq::seal`] consumes the mutable
//! sequence and moves its storage into the immutable one without copying, so
//! no handle that could write to sealed storage can survive the call:
//!
//! ```rust,compile_fail
//! use evostream::seq::{MSeq, Seq};
//!
//! let mut values = MSeq::from_vec(vec![1, 2, 3]);
//! let sealed = values.seal();
//! values.set(0, 10).unwrap(); // `values` was moved by `seal`
//! assert_eq!(sealed.get(0).unwrap(), &1);
//! ```
//!
//! Going the other way always copies:
//!
//! ```rust
//! use evostream::seq::{MSeq, Seq};
//!
//! let sealed = MSeq::from_vec(vec![1, 2, 3]).seal();
//! let mut copy = sealed.copy();
//! copy.set(0, 10).unwrap();
//!
//! assert_eq!(sealed.get(0).unwrap(), &1);
//! assert_eq!(copy.get(0).unwrap(), &10);
//! ```

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rand::seq::SliceRandom;

use crate::error::{GeneticError, Result};
use crate::rng::RandomNumberGenerator;

fn check_index(index: usize, length: usize) -> Result<()> {
    if index >= length {
        return Err(GeneticError::IndexOutOfRange { index, length });
    }
    Ok(())
}

fn check_range(start: usize, end: usize, length: usize) -> Result<()> {
    if start > end || end > length {
        return Err(GeneticError::InvalidRange { start, end, length });
    }
    Ok(())
}

/// Read-only access to an ordered, fixed-length sequence.
pub trait Seq<T> {
    /// Returns the elements as a slice.
    fn as_slice(&self) -> &[T];

    /// Returns the number of elements.
    fn length(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if the sequence has no elements.
    fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Returns the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not in `[0, length)`.
    fn get(&self, index: usize) -> Result<&T> {
        let values = self.as_slice();
        check_index(index, values.len())?;
        Ok(&values[index])
    }

    /// Returns an iterator over the elements.
    fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns the index of the first element matching `predicate`.
    fn index_where<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.as_slice().iter().position(|value| predicate(value))
    }

    /// Returns the index of the last element matching `predicate`.
    fn last_index_where<P>(&self, mut predicate: P) -> Option<usize>
    where
        P: FnMut(&T) -> bool,
    {
        self.as_slice().iter().rposition(|value| predicate(value))
    }

    /// Returns the index of the first element equal to `value`.
    fn index_of(&self, value: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.index_where(|v| v == value)
    }

    /// Returns `true` if any element equals `value`.
    fn contains(&self, value: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_of(value).is_some()
    }

    /// Returns `true` if every element matches `predicate`.
    fn for_all<P>(&self, predicate: P) -> bool
    where
        P: FnMut(&T) -> bool,
    {
        self.as_slice().iter().all(predicate)
    }

    /// Copies the elements into a new vector.
    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }
}

/// A mutable, fixed-length sequence owning its storage.
#[derive(Clone, Default)]
pub struct MSeq<T> {
    values: Vec<T>,
}

impl<T> MSeq<T> {
    /// Creates a sequence from the given values.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self { values }
    }

    /// Creates a sequence of `length` elements produced by `factory`.
    pub fn filled<F>(length: usize, factory: F) -> Self
    where
        F: FnMut() -> T,
    {
        let mut values = Vec::with_capacity(length);
        values.resize_with(length, factory);
        Self { values }
    }

    /// Replaces the element at `index`.
    ///
    /// # Errors
    ///
    /// Returns `IndexOutOfRange` if `index` is not in `[0, length)`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        check_index(index, self.values.len())?;
        self.values[index] = value;
        Ok(())
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn get_mut(&mut self, index: usize) -> Result<&mut T> {
        check_index(index, self.values.len())?;
        Ok(&mut self.values[index])
    }

    /// Swaps the elements at `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) -> Result<()> {
        check_index(i, self.values.len())?;
        check_index(j, self.values.len())?;
        self.values.swap(i, j);
        Ok(())
    }

    /// Returns the elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.values
    }

    /// Returns a writable view of `[start, end)`.
    ///
    /// Writes through the view land in this sequence at offset `start`.
    pub fn sub_seq_mut(&mut self, start: usize, end: usize) -> Result<MSeqSlice<'_, T>> {
        check_range(start, end, self.values.len())?;
        Ok(MSeqSlice {
            values: &mut self.values[start..end],
        })
    }

    /// Returns a read-only view of `[start, end)`.
    pub fn sub_seq(&self, start: usize, end: usize) -> Result<&[T]> {
        check_range(start, end, self.values.len())?;
        Ok(&self.values[start..end])
    }

    /// Randomly permutes the elements.
    pub fn shuffle(&mut self, rng: &mut RandomNumberGenerator) {
        self.values.shuffle(&mut rng.rng);
    }

    /// Sorts the elements with the given comparator.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        self.values.sort_by(compare);
    }

    /// Seals this sequence, moving its storage into an [`ISeq`].
    ///
    /// The storage is not copied. Since `self` is consumed, no writable
    /// handle to the sealed storage remains.
    pub fn seal(self) -> ISeq<T> {
        let end = self.values.len();
        ISeq {
            values: Arc::new(self.values),
            start: 0,
            end,
        }
    }

    /// Returns the underlying vector.
    pub fn into_vec(self) -> Vec<T> {
        self.values
    }
}

impl<T> Seq<T> for MSeq<T> {
    fn as_slice(&self) -> &[T] {
        &self.values
    }
}

impl<T> From<Vec<T>> for MSeq<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T> FromIterator<T> for MSeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a MSeq<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// A writable window into an [`MSeq`].
pub struct MSeqSlice<'a, T> {
    values: &'a mut [T],
}

impl<T> MSeqSlice<'_, T> {
    /// Replaces the element at `index`, relative to the start of the view.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        check_index(index, self.values.len())?;
        self.values[index] = value;
        Ok(())
    }

    /// Returns a narrower writable view of `[start, end)`.
    pub fn sub_seq_mut(&mut self, start: usize, end: usize) -> Result<MSeqSlice<'_, T>> {
        check_range(start, end, self.values.len())?;
        Ok(MSeqSlice {
            values: &mut self.values[start..end],
        })
    }
}

impl<T> Seq<T> for MSeqSlice<'_, T> {
    fn as_slice(&self) -> &[T] {
        self.values
    }
}

/// A sealed, immutable sequence.
///
/// Clones and sub-sequences share storage; equality and hashing are
/// element-wise.
pub struct ISeq<T> {
    values: Arc<Vec<T>>,
    start: usize,
    end: usize,
}

impl<T> ISeq<T> {
    /// Creates an empty sequence.
    pub fn empty() -> Self {
        MSeq::from_vec(Vec::new()).seal()
    }

    /// Creates a sealed sequence from the given values.
    pub fn from_vec(values: Vec<T>) -> Self {
        MSeq::from_vec(values).seal()
    }

    /// Returns the zero-copy sub-sequence `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidRange` if `start > end` or `end > length`.
    pub fn sub_seq(&self, start: usize, end: usize) -> Result<ISeq<T>> {
        check_range(start, end, self.end - self.start)?;
        Ok(ISeq {
            values: Arc::clone(&self.values),
            start: self.start + start,
            end: self.start + end,
        })
    }

    /// Sealing an already sealed sequence is a no-op.
    pub fn seal(self) -> ISeq<T> {
        self
    }

    /// Returns `true` if both sequences are views of the same storage.
    pub fn shares_storage(&self, other: &ISeq<T>) -> bool {
        Arc::ptr_eq(&self.values, &other.values)
    }

    /// Copies the elements into a new, independent mutable sequence.
    pub fn copy(&self) -> MSeq<T>
    where
        T: Clone,
    {
        MSeq::from_vec(self.as_slice().to_vec())
    }

    /// Applies `mapper` to every element, sealing the result.
    pub fn map<B, F>(&self, mapper: F) -> ISeq<B>
    where
        F: FnMut(&T) -> B,
    {
        ISeq::from_vec(self.as_slice().iter().map(mapper).collect())
    }
}

impl<T> Seq<T> for ISeq<T> {
    fn as_slice(&self) -> &[T] {
        &self.values[self.start..self.end]
    }
}

impl<T> Clone for ISeq<T> {
    fn clone(&self) -> Self {
        Self {
            values: Arc::clone(&self.values),
            start: self.start,
            end: self.end,
        }
    }
}

impl<T> Default for ISeq<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<Vec<T>> for ISeq<T> {
    fn from(values: Vec<T>) -> Self {
        Self::from_vec(values)
    }
}

impl<T> FromIterator<T> for ISeq<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a ISeq<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

macro_rules! structural_traits {
    ($seq:ident) => {
        impl<T: PartialEq> PartialEq for $seq<T> {
            fn eq(&self, other: &Self) -> bool {
                self.as_slice() == other.as_slice()
            }
        }

        impl<T: Eq> Eq for $seq<T> {}

        impl<T: Hash> Hash for $seq<T> {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.as_slice().hash(state);
            }
        }

        impl<T: fmt::Debug> fmt::Debug for $seq<T> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_list().entries(self.as_slice()).finish()
            }
        }
    };
}

structural_traits!(MSeq);
structural_traits!(ISeq);

impl<T: PartialEq> PartialEq<ISeq<T>> for MSeq<T> {
    fn eq(&self, other: &ISeq<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: PartialEq> PartialEq<MSeq<T>> for ISeq<T> {
    fn eq(&self, other: &MSeq<T>) -> bool {
        self.as_slice() == other.as_slice()
    }
}
