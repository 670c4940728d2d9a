//! Literal values and the append-only constant pool.

use core::{fmt, ops::Index, slice};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::memory::{grow_array, grow_capacity};

/// Values that can live in the constant pool.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Value {
    /// `nil` literal.
    Nil,
    /// Boolean literal.
    Bool(bool),
    /// Double-precision number literal.
    Number(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<f64> for Value { fn from(v: f64) -> Self { Value::Number(v) } }
impl From<bool> for Value { fn from(v: bool) -> Self { Value::Bool(v) } }
impl From<()> for Value { fn from((): ()) -> Self { Value::Nil } }

/// Constant pool with stable, 0-based indices.
///
/// Entries are never removed, updated or reordered, and equal literals are
/// stored once per `write`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ValueArray {
    capacity: usize,
    values: Vec<Value>,
}

impl ValueArray {
    /// Create an empty pool. Does not allocate.
    #[must_use]
    pub const fn new() -> Self { Self { capacity: 0, values: Vec::new() } }

    /// Number of stored constants.
    #[must_use]
    pub fn count(&self) -> usize { self.values.len() }

    /// Alias of [`ValueArray::count`].
    #[must_use]
    pub fn len(&self) -> usize { self.values.len() }

    /// Whether the pool is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    /// Logical capacity (follows [`grow_capacity`]).
    #[must_use]
    pub const fn capacity(&self) -> usize { self.capacity }

    /// Append a value, growing the pool when full.
    pub fn write(&mut self, value: Value) {
        if self.capacity < self.values.len() + 1 {
            let old = self.capacity;
            self.capacity = grow_capacity(old);
            grow_array(&mut self.values, self.capacity);
            #[cfg(feature = "tracing")]
            tracing::trace!(old, new = self.capacity, "constant pool grown");
        }
        self.values.push(value);
    }

    /// Lookup a constant by index.
    #[must_use]
    pub fn get(&self, idx: usize) -> Option<&Value> { self.values.get(idx) }

    /// Contents as a slice, in insertion order.
    #[must_use]
    pub fn as_slice(&self) -> &[Value] { &self.values }

    /// Iterate as `(index, &Value)`.
    pub fn iter(&self) -> ValueIter<'_> { ValueIter { inner: self.values.iter().enumerate() } }

    /// Release the storage and return to the empty state.
    pub fn free(&mut self) { *self = Self::new(); }
}

impl Index<usize> for ValueArray {
    type Output = Value;

    fn index(&self, idx: usize) -> &Value { &self.values[idx] }
}

/// Iterator returned by [`ValueArray::iter`].
pub struct ValueIter<'a> {
    inner: core::iter::Enumerate<slice::Iter<'a, Value>>,
}

impl<'a> Iterator for ValueIter<'a> {
    type Item = (usize, &'a Value);

    fn next(&mut self) -> Option<Self::Item> { self.inner.next() }

    fn size_hint(&self) -> (usize, Option<usize>) { self.inner.size_hint() }
}

impl ExactSizeIterator for ValueIter<'_> {}

impl<'a> IntoIterator for &'a ValueArray {
    type Item = (usize, &'a Value);
    type IntoIter = ValueIter<'a>;

    fn into_iter(self) -> Self::IntoIter { self.iter() }
}
