// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Scripted task for lifecycle and runner tests.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::error::{TaskError, TaskResult};
use crate::task::TaskImpl;
use crate::task_data::TaskData;

/// Shared record of hook invocations.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Rc<RefCell<Vec<&'static str>>>);

impl CallLog {
    fn record(&self, phase: &'static str) -> usize {
        let mut calls = self.0.borrow_mut();
        calls.push(phase);
        calls.iter().filter(|c| **c == phase).count()
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.0.borrow().clone()
    }

    pub fn count(&self, phase: &str) -> usize {
        self.0.borrow().iter().filter(|c| **c == phase).count()
    }
}

/// Task whose hooks log their calls and fail on a chosen call.
pub struct ScriptedTask {
    data: Arc<TaskData>,
    log: CallLog,
    fail_on: Option<(&'static str, usize)>,
}

impl ScriptedTask {
    pub fn new(log: CallLog) -> Self {
        Self {
            data: TaskData::new().shared(),
            log,
            fail_on: None,
        }
    }

    /// Fail the `nth` (1-based) call of `phase`.
    pub fn fail_on(mut self, phase: &'static str, nth: usize) -> Self {
        self.fail_on = Some((phase, nth));
        self
    }

    fn hook(&mut self, phase: &'static str) -> TaskResult<()> {
        let nth = self.log.record(phase);
        match self.fail_on {
            Some((p, n)) if p == phase && n == nth => Err(if phase == "validation" {
                TaskError::validation("scripted failure")
            } else {
                TaskError::conversion(phase, "scripted failure")
            }),
            _ => Ok(()),
        }
    }
}

impl TaskImpl for ScriptedTask {
    fn task_data(&self) -> &Arc<TaskData> {
        &self.data
    }

    fn validation_impl(&mut self) -> TaskResult<()> {
        self.hook("validation")
    }

    fn pre_processing_impl(&mut self) -> TaskResult<()> {
        self.hook("pre_processing")
    }

    fn run_impl(&mut self) -> TaskResult<()> {
        self.hook("run")
    }

    fn post_processing_impl(&mut self) -> TaskResult<()> {
        self.hook("post_processing")
    }
}
