// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Build ready-to-run tasks from suite configuration.

use std::sync::Arc;

use taskbench_core::{Buffer, BufferError, SharedBuffer, Task, TaskConfig, TaskData, TaskKind};

use crate::generate::{random_image, random_square_matrix, seeded_rng};
use crate::histogram::HistogramStretch;
use crate::strassen::StrassenMultiply;

/// A task bound to freshly generated data.
///
/// The caller keeps these handles to inspect inputs and read the output.
#[derive(Debug)]
pub struct PreparedTask {
    pub task: Task,
    pub inputs: Vec<SharedBuffer>,
    pub output: SharedBuffer,
}

/// Generate data for `config` and bind the matching task to it.
pub fn build_task(config: &TaskConfig) -> Result<PreparedTask, BufferError> {
    let mut rng = seeded_rng(config.seed);

    let (inputs, output) = match config.kind {
        TaskKind::Strassen => {
            let n = config.size;
            let a = random_square_matrix(n, config.min_value, config.max_value, &mut rng);
            let b = random_square_matrix(n, config.min_value, config.max_value, &mut rng);
            (
                vec![Buffer::from_vec(a), Buffer::from_vec(b)],
                Buffer::zeroed::<f64>(n * n),
            )
        }
        TaskKind::HistogramStretch => {
            let (min, max) = (config.min_value.round() as i32, config.max_value.round() as i32);
            let image = random_image(config.size, min, max, &mut rng);
            (vec![Buffer::from_vec(image)], Buffer::zeroed::<i32>(config.size))
        }
    };

    let mut data = TaskData::new();
    for input in &inputs {
        data = data.with_input(Arc::clone(input))?;
    }
    let data = data.with_output(Arc::clone(&output))?.shared();

    let task = match config.kind {
        TaskKind::Strassen => Task::new(
            config.name.clone(),
            StrassenMultiply::new(data).with_leaf_size(config.leaf_size),
        ),
        TaskKind::HistogramStretch => Task::new(config.name.clone(), HistogramStretch::new(data)),
    };

    tracing::debug!(
        task = %config.name,
        kind = %config.kind,
        size = config.size,
        seed = config.seed,
        "Task prepared"
    );

    Ok(PreparedTask {
        task,
        inputs,
        output,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskbench_core::{ElementType, TaskName};

    fn config(kind: TaskKind, size: usize) -> TaskConfig {
        let (min_value, max_value) = kind.default_range();
        TaskConfig {
            name: TaskName::new("factory-test").unwrap(),
            kind,
            size,
            seed: 3,
            min_value,
            max_value,
            leaf_size: 2,
        }
    }

    #[test]
    fn test_build_strassen() {
        let mut prepared = build_task(&config(TaskKind::Strassen, 8)).unwrap();
        assert_eq!(prepared.inputs.len(), 2);
        assert_eq!(prepared.output.len(), 64);
        assert_eq!(prepared.output.element_type(), ElementType::F64);
        assert!(prepared.task.run_lifecycle().is_ok());
    }

    #[test]
    fn test_build_histogram() {
        let mut prepared = build_task(&config(TaskKind::HistogramStretch, 100)).unwrap();
        assert_eq!(prepared.inputs.len(), 1);
        assert_eq!(prepared.output.element_type(), ElementType::I32);
        assert!(prepared.task.run_lifecycle().is_ok());
    }

    #[test]
    fn test_same_seed_same_inputs() {
        let first = build_task(&config(TaskKind::Strassen, 4)).unwrap();
        let second = build_task(&config(TaskKind::Strassen, 4)).unwrap();
        assert_eq!(
            first.inputs[0].checksum().unwrap(),
            second.inputs[0].checksum().unwrap()
        );
    }
}
