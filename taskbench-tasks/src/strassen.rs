// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Strassen square-matrix multiplication.
//!
//! Inputs: two `f64` regions of n·n elements (row-major A and B).
//! Output: one `f64` region of n·n elements receiving A·B.
//!
//! Sizes that are not a power of two are zero-padded to the next power of
//! two; blocks at or below the leaf size use the classic triple loop.

use std::sync::Arc;

use taskbench_core::{ElementType, TaskData, TaskError, TaskImpl, TaskResult};

/// Default recursion cut-off.
pub const DEFAULT_LEAF_SIZE: usize = 64;

/// Reference O(n³) product of two row-major n×n matrices.
pub fn naive_multiply(a: &[f64], b: &[f64], n: usize) -> Vec<f64> {
    let mut c = vec![0.0; n * n];
    for i in 0..n {
        for k in 0..n {
            let aik = a[i * n + k];
            for j in 0..n {
                c[i * n + j] += aik * b[k * n + j];
            }
        }
    }
    c
}

/// Strassen product of two row-major n×n matrices.
///
/// Recurses while `n` is even and above `leaf_size`.
pub fn strassen_multiply(a: &[f64], b: &[f64], n: usize, leaf_size: usize) -> Vec<f64> {
    if n <= leaf_size.max(1) || n % 2 != 0 {
        return naive_multiply(a, b, n);
    }

    let h = n / 2;
    let [a11, a12, a21, a22] = split(a, n);
    let [b11, b12, b21, b22] = split(b, n);

    let m1 = strassen_multiply(&add(&a11, &a22), &add(&b11, &b22), h, leaf_size);
    let m2 = strassen_multiply(&add(&a21, &a22), &b11, h, leaf_size);
    let m3 = strassen_multiply(&a11, &sub(&b12, &b22), h, leaf_size);
    let m4 = strassen_multiply(&a22, &sub(&b21, &b11), h, leaf_size);
    let m5 = strassen_multiply(&add(&a11, &a12), &b22, h, leaf_size);
    let m6 = strassen_multiply(&sub(&a21, &a11), &add(&b11, &b12), h, leaf_size);
    let m7 = strassen_multiply(&sub(&a12, &a22), &add(&b21, &b22), h, leaf_size);

    let c11 = add(&sub(&add(&m1, &m4), &m5), &m7);
    let c12 = add(&m3, &m5);
    let c21 = add(&m2, &m4);
    let c22 = add(&add(&sub(&m1, &m2), &m3), &m6);

    join([&c11, &c12, &c21, &c22], h)
}

fn add(x: &[f64], y: &[f64]) -> Vec<f64> {
    x.iter().zip(y).map(|(p, q)| p + q).collect()
}

fn sub(x: &[f64], y: &[f64]) -> Vec<f64> {
    x.iter().zip(y).map(|(p, q)| p - q).collect()
}

/// Split an n×n matrix into its four h×h quadrants (row-major order).
fn split(m: &[f64], n: usize) -> [Vec<f64>; 4] {
    let h = n / 2;
    let mut quads: [Vec<f64>; 4] = std::array::from_fn(|_| Vec::with_capacity(h * h));
    for row in 0..n {
        let line = &m[row * n..(row + 1) * n];
        let base = if row < h { 0 } else { 2 };
        quads[base].extend_from_slice(&line[..h]);
        quads[base + 1].extend_from_slice(&line[h..]);
    }
    quads
}

/// Inverse of [`split`].
fn join(quads: [&[f64]; 4], h: usize) -> Vec<f64> {
    let n = h * 2;
    let mut m = Vec::with_capacity(n * n);
    for row in 0..n {
        let (base, r) = if row < h { (0, row) } else { (2, row - h) };
        m.extend_from_slice(&quads[base][r * h..(r + 1) * h]);
        m.extend_from_slice(&quads[base + 1][r * h..(r + 1) * h]);
    }
    m
}

/// Copy an n×n matrix into the top-left corner of a zeroed m×m matrix.
fn pad(src: &[f64], n: usize, m: usize) -> Vec<f64> {
    let mut dst = vec![0.0; m * m];
    for row in 0..n {
        dst[row * m..row * m + n].copy_from_slice(&src[row * n..(row + 1) * n]);
    }
    dst
}

/// Side of a square matrix holding `count` elements, if there is one.
fn square_side(count: usize) -> Option<usize> {
    let n = (count as f64).sqrt().round() as usize;
    (n * n == count).then_some(n)
}

/// Strassen multiplication lifecycle task.
pub struct StrassenMultiply {
    task_data: Arc<TaskData>,
    leaf_size: usize,
    n: usize,
    padded: usize,
    a: Vec<f64>,
    b: Vec<f64>,
    c: Vec<f64>,
}

impl StrassenMultiply {
    pub fn new(task_data: Arc<TaskData>) -> Self {
        Self {
            task_data,
            leaf_size: DEFAULT_LEAF_SIZE,
            n: 0,
            padded: 0,
            a: Vec::new(),
            b: Vec::new(),
            c: Vec::new(),
        }
    }

    /// Set the recursion cut-off (at least 1).
    pub fn with_leaf_size(mut self, leaf_size: usize) -> Self {
        self.leaf_size = leaf_size.max(1);
        self
    }
}

impl TaskImpl for StrassenMultiply {
    fn task_data(&self) -> &Arc<TaskData> {
        &self.task_data
    }

    fn validation_impl(&mut self) -> TaskResult<()> {
        let data = &self.task_data;

        if data.inputs().len() != 2 || data.outputs().len() != 1 {
            return Err(TaskError::validation(format!(
                "expected 2 inputs and 1 output, got {} and {}",
                data.inputs().len(),
                data.outputs().len()
            )));
        }

        let count = data.inputs_count()[0];
        if data.inputs_count()[1] != count || data.outputs_count()[0] != count {
            return Err(TaskError::validation(format!(
                "matrix sizes differ: {:?} -> {:?}",
                data.inputs_count(),
                data.outputs_count()
            )));
        }

        if count == 0 || square_side(count).is_none() {
            return Err(TaskError::validation(format!(
                "{} elements do not form a non-empty square matrix",
                count
            )));
        }

        for buffer in data.inputs().iter().chain(data.outputs()) {
            if buffer.element_type() != ElementType::F64 {
                return Err(TaskError::validation(format!(
                    "matrices must be f64, got {}",
                    buffer.element_type()
                )));
            }
        }

        Ok(())
    }

    fn pre_processing_impl(&mut self) -> TaskResult<()> {
        let count = self.task_data.inputs_count()[0];
        let n = square_side(count).ok_or_else(|| {
            TaskError::conversion("pre_processing", format!("{} is not a square", count))
        })?;
        let padded = n.next_power_of_two();

        let inputs = self.task_data.inputs();
        let a = inputs[0].with(|v: &[f64]| pad(&v[..count], n, padded))?;
        let b = inputs[1].with(|v: &[f64]| pad(&v[..count], n, padded))?;

        tracing::trace!(n, padded, leaf_size = self.leaf_size, "Matrices prepared");

        self.n = n;
        self.padded = padded;
        self.a = a;
        self.b = b;
        self.c.clear();
        Ok(())
    }

    fn run_impl(&mut self) -> TaskResult<()> {
        self.c = strassen_multiply(&self.a, &self.b, self.padded, self.leaf_size);
        Ok(())
    }

    fn post_processing_impl(&mut self) -> TaskResult<()> {
        let (n, padded) = (self.n, self.padded);
        if self.c.len() != padded * padded {
            return Err(TaskError::conversion(
                "post_processing",
                format!("no {}x{} result available", padded, padded),
            ));
        }

        let c = &self.c;
        self.task_data.outputs()[0].with_mut(|out: &mut [f64]| {
            for row in 0..n {
                out[row * n..(row + 1) * n].copy_from_slice(&c[row * padded..row * padded + n]);
            }
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(x: &[f64], y: &[f64]) {
        assert_eq!(x.len(), y.len());
        for (p, q) in x.iter().zip(y) {
            assert!((p - q).abs() < 1e-9, "{} vs {}", p, q);
        }
    }

    #[test]
    fn test_naive_2x2() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        assert_eq!(naive_multiply(&a, &b, 2), vec![19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_strassen_2x2_recurses() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        assert_close(&strassen_multiply(&a, &b, 2, 1), &[19.0, 22.0, 43.0, 50.0]);
    }

    #[test]
    fn test_strassen_identity() {
        let n = 8;
        let a: Vec<f64> = (0..n * n).map(|v| v as f64).collect();
        let mut id = vec![0.0; n * n];
        for i in 0..n {
            id[i * n + i] = 1.0;
        }
        assert_close(&strassen_multiply(&a, &id, n, 1), &a);
    }

    #[test]
    fn test_split_join() {
        let m: Vec<f64> = (0..16).map(|v| v as f64).collect();
        let [q11, q12, q21, q22] = split(&m, 4);
        assert_eq!(q11, vec![0.0, 1.0, 4.0, 5.0]);
        assert_eq!(q22, vec![10.0, 11.0, 14.0, 15.0]);
        assert_eq!(join([&q11, &q12, &q21, &q22], 2), m);
    }

    #[test]
    fn test_pad() {
        let m = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(
            pad(&m, 2, 4),
            vec![1.0, 2.0, 0.0, 0.0, 3.0, 4.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn test_square_side() {
        assert_eq!(square_side(16384), Some(128));
        assert_eq!(square_side(1), Some(1));
        assert_eq!(square_side(10), None);
    }
}
