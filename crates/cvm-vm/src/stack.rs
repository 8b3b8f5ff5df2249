//! Fixed-capacity stack of `i32` values.
//!
//! Indices are absolute, counted from the bottom. Relative (negative)
//! addressing is an engine concern; the stack only validates `0 <= i < len`.

/// Default stack capacity in values.
pub const STACK_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StackError {
    #[error("stack overflow (capacity {capacity})")]
    Overflow { capacity: usize },
    #[error("stack underflow")]
    Underflow,
    #[error("index {index} out of range for stack of size {len}")]
    OutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueStack {
    values: Vec<i32>,
    capacity: usize,
}

impl Default for ValueStack {
    fn default() -> Self {
        Self::new(STACK_CAPACITY)
    }
}

impl ValueStack {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: Vec::new(),
            capacity,
        }
    }

    pub fn push(&mut self, value: i32) -> Result<(), StackError> {
        if self.values.len() == self.capacity {
            return Err(StackError::Overflow {
                capacity: self.capacity,
            });
        }
        self.values.push(value);
        Ok(())
    }

    pub fn pop(&mut self) -> Result<i32, StackError> {
        self.values.pop().ok_or(StackError::Underflow)
    }

    /// Value at `depth` below the top without popping (`0` is the top).
    pub fn peek(&self, depth: usize) -> Result<i32, StackError> {
        self.values
            .len()
            .checked_sub(depth + 1)
            .map(|i| self.values[i])
            .ok_or(StackError::Underflow)
    }

    pub fn get(&self, index: usize) -> Result<i32, StackError> {
        self.values
            .get(index)
            .copied()
            .ok_or(StackError::OutOfRange {
                index,
                len: self.values.len(),
            })
    }

    pub fn set(&mut self, index: usize, value: i32) -> Result<(), StackError> {
        let len = self.values.len();
        let slot = self
            .values
            .get_mut(index)
            .ok_or(StackError::OutOfRange { index, len })?;
        *slot = value;
        Ok(())
    }

    /// Remove the top `n` values.
    pub fn discard(&mut self, n: usize) -> Result<(), StackError> {
        let len = self
            .values
            .len()
            .checked_sub(n)
            .ok_or(StackError::Underflow)?;
        self.values.truncate(len);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Free slots left before `push` overflows.
    pub fn remaining(&self) -> usize {
        self.capacity - self.values.len()
    }

    /// Values from bottom to top.
    pub fn as_slice(&self) -> &[i32] {
        &self.values
    }

    /// Empty the stack, returning its values top first.
    pub fn drain_top_first(&mut self) -> Vec<i32> {
        let mut values = std::mem::take(&mut self.values);
        values.reverse();
        values
    }
}
