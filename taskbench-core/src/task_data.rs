// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Task input/output descriptor.
//!
//! `TaskData` pairs every region with its declared element count. The two
//! sequences can only grow together, so `inputs.len() == inputs_count.len()`
//! and `outputs.len() == outputs_count.len()` hold by construction. Declared
//! counts are checked against the region length when a region is added.

use std::sync::Arc;

use crate::buffer::SharedBuffer;
use crate::error::BufferError;

/// Descriptor of a task's input and output regions.
///
/// Regions are shared with the caller, who keeps ownership of the data and
/// reads outputs back through its own handle.
#[derive(Debug, Default)]
pub struct TaskData {
    inputs: Vec<SharedBuffer>,
    inputs_count: Vec<usize>,
    outputs: Vec<SharedBuffer>,
    outputs_count: Vec<usize>,
}

impl TaskData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input region declaring `count` elements.
    pub fn add_input(&mut self, buffer: SharedBuffer, count: usize) -> Result<(), BufferError> {
        Self::check_count("input", self.inputs.len(), &buffer, count)?;
        self.inputs.push(buffer);
        self.inputs_count.push(count);
        Ok(())
    }

    /// Add an output region declaring `count` elements.
    pub fn add_output(&mut self, buffer: SharedBuffer, count: usize) -> Result<(), BufferError> {
        Self::check_count("output", self.outputs.len(), &buffer, count)?;
        self.outputs.push(buffer);
        self.outputs_count.push(count);
        Ok(())
    }

    /// Builder-style [`add_input`](Self::add_input) declaring the whole region.
    pub fn with_input(mut self, buffer: SharedBuffer) -> Result<Self, BufferError> {
        let count = buffer.len();
        self.add_input(buffer, count)?;
        Ok(self)
    }

    /// Builder-style [`add_output`](Self::add_output) declaring the whole region.
    pub fn with_output(mut self, buffer: SharedBuffer) -> Result<Self, BufferError> {
        let count = buffer.len();
        self.add_output(buffer, count)?;
        Ok(self)
    }

    /// Finish building and share with a task.
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    fn check_count(
        direction: &'static str,
        index: usize,
        buffer: &SharedBuffer,
        count: usize,
    ) -> Result<(), BufferError> {
        if count > buffer.len() {
            return Err(BufferError::CountExceedsLength {
                direction,
                index,
                count,
                len: buffer.len(),
            });
        }
        Ok(())
    }

    pub fn inputs(&self) -> &[SharedBuffer] {
        &self.inputs
    }

    pub fn inputs_count(&self) -> &[usize] {
        &self.inputs_count
    }

    pub fn outputs(&self) -> &[SharedBuffer] {
        &self.outputs
    }

    pub fn outputs_count(&self) -> &[usize] {
        &self.outputs_count
    }

    pub fn input(&self, index: usize) -> Option<&SharedBuffer> {
        self.inputs.get(index)
    }

    pub fn output(&self, index: usize) -> Option<&SharedBuffer> {
        self.outputs.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;

    #[test]
    fn test_counts_stay_parallel() {
        let data = TaskData::new()
            .with_input(Buffer::from_vec(vec![1.0f64; 4]))
            .unwrap()
            .with_input(Buffer::from_vec(vec![2.0f64; 4]))
            .unwrap()
            .with_output(Buffer::zeroed::<f64>(4))
            .unwrap();

        assert_eq!(data.inputs().len(), data.inputs_count().len());
        assert_eq!(data.outputs().len(), data.outputs_count().len());
        assert_eq!(data.inputs_count(), &[4, 4]);
        assert_eq!(data.outputs_count(), &[4]);
    }

    #[test]
    fn test_partial_count_allowed() {
        let mut data = TaskData::new();
        data.add_input(Buffer::zeroed::<i32>(10), 6).unwrap();
        assert_eq!(data.inputs_count(), &[6]);
    }

    #[test]
    fn test_count_exceeding_length_rejected() {
        let mut data = TaskData::new();
        let err = data.add_output(Buffer::zeroed::<i32>(3), 4).unwrap_err();
        assert!(matches!(
            err,
            BufferError::CountExceedsLength {
                direction: "output",
                index: 0,
                count: 4,
                len: 3
            }
        ));
        assert!(data.outputs().is_empty());
        assert!(data.outputs_count().is_empty());
    }

    #[test]
    fn test_caller_handle_sees_task_writes() {
        let out = Buffer::zeroed::<i32>(2);
        let data = TaskData::new()
            .with_output(Arc::clone(&out))
            .unwrap()
            .shared();

        data.output(0)
            .unwrap()
            .with_mut(|v: &mut [i32]| v[1] = 7)
            .unwrap();
        assert_eq!(out.read::<i32>().unwrap(), vec![0, 7]);
    }
}
