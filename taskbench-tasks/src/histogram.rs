// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Linear histogram stretching of an 8-bit grayscale image.
//!
//! Input: one `i32` region of N pixels in `0..=255`.
//! Output: one `i32` region of N pixels.

use std::sync::Arc;

use taskbench_core::{ElementType, TaskData, TaskError, TaskImpl, TaskResult};

/// Largest intensity of an 8-bit pixel.
pub const MAX_INTENSITY: i32 = 255;

/// Map the pixel range `[min, max]` of `input` linearly onto `[0, 255]`.
///
/// A constant image has no range to stretch and is copied unchanged.
/// Arithmetic is done in `i64`, so any `i32` input range is accepted.
///
/// # Panics
/// If `output` is shorter than `input`.
pub fn linear_histogram_stretch(input: &[i32], output: &mut [i32]) {
    let Some((min, max)) = min_max(input) else {
        return;
    };

    if min == max {
        output[..input.len()].copy_from_slice(input);
        return;
    }

    let (min, range) = (i64::from(min), i64::from(max) - i64::from(min));
    for (out, &pixel) in output.iter_mut().zip(input) {
        *out = ((i64::from(pixel) - min) * i64::from(MAX_INTENSITY) / range) as i32;
    }
}

fn min_max(values: &[i32]) -> Option<(i32, i32)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(lo, hi), &v| (lo.min(v), hi.max(v))),
    )
}

/// Histogram stretch lifecycle task.
pub struct HistogramStretch {
    task_data: Arc<TaskData>,
    image_input: Vec<i32>,
    image_output: Vec<i32>,
}

impl HistogramStretch {
    pub fn new(task_data: Arc<TaskData>) -> Self {
        Self {
            task_data,
            image_input: Vec::new(),
            image_output: Vec::new(),
        }
    }
}

impl TaskImpl for HistogramStretch {
    fn task_data(&self) -> &Arc<TaskData> {
        &self.task_data
    }

    fn validation_impl(&mut self) -> TaskResult<()> {
        let data = &self.task_data;

        if data.inputs().len() != 1 || data.outputs().len() != 1 {
            return Err(TaskError::validation(format!(
                "expected 1 input and 1 output, got {} and {}",
                data.inputs().len(),
                data.outputs().len()
            )));
        }

        let (in_count, out_count) = (data.inputs_count()[0], data.outputs_count()[0]);
        if in_count == 0 || in_count != out_count {
            return Err(TaskError::validation(format!(
                "pixel counts must be equal and non-zero, got {} and {}",
                in_count, out_count
            )));
        }

        for buffer in data.inputs().iter().chain(data.outputs()) {
            if buffer.element_type() != ElementType::I32 {
                return Err(TaskError::validation(format!(
                    "pixels must be i32, got {}",
                    buffer.element_type()
                )));
            }
        }

        Ok(())
    }

    fn pre_processing_impl(&mut self) -> TaskResult<()> {
        let count = self.task_data.inputs_count()[0];
        let pixels = self.task_data.inputs()[0].with(|v: &[i32]| v[..count].to_vec())?;

        if let Some(bad) = pixels.iter().find(|p| !(0..=MAX_INTENSITY).contains(*p)) {
            return Err(TaskError::conversion(
                "pre_processing",
                format!("pixel value {} outside 0..=255", bad),
            ));
        }

        self.image_input = pixels;
        self.image_output = vec![0; count];
        Ok(())
    }

    fn run_impl(&mut self) -> TaskResult<()> {
        linear_histogram_stretch(&self.image_input, &mut self.image_output);
        Ok(())
    }

    fn post_processing_impl(&mut self) -> TaskResult<()> {
        let count = self.task_data.outputs_count()[0];
        let result = &self.image_output;
        if result.len() < count {
            return Err(TaskError::conversion(
                "post_processing",
                format!("result holds {} pixels, {} declared", result.len(), count),
            ));
        }
        self.task_data.outputs()[0]
            .with_mut(|v: &mut [i32]| v[..count].copy_from_slice(&result[..count]))?;
        Ok(())
    }
}
