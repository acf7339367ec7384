#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use theine_core::operation::Operation;
use theine_core::tensor::Tensor;
use theine_dispatch::OpBuilder;

/// Computes nothing; for wiring-only tests.
pub struct Noop;

impl Operation for Noop {
    fn compute_cpu(&self, _add: &[bool]) {}
}

impl OpBuilder for Noop {
    type Param = ();

    fn build(_inputs: Vec<Tensor>, _outputs: Vec<Tensor>, _param: ()) -> Self {
        Noop
    }
}

/// Counts its own firings.
pub struct Counting {
    fired: Arc<AtomicUsize>,
}

impl Operation for Counting {
    fn compute_cpu(&self, _add: &[bool]) {
        self.fired.fetch_add(1, Ordering::SeqCst);
    }
}

impl OpBuilder for Counting {
    type Param = Arc<AtomicUsize>;

    fn build(_inputs: Vec<Tensor>, _outputs: Vec<Tensor>, fired: Arc<AtomicUsize>) -> Self {
        Counting { fired }
    }
}

/// Writes a constant into its first output.
pub struct Stamp {
    outputs: Vec<Tensor>,
    value: f32,
}

impl Operation for Stamp {
    fn compute_cpu(&self, _add: &[bool]) {
        let count = self.outputs[0].size().count();
        let mut data = self.outputs[0].mutable_data();
        for value in &mut data[..count] {
            *value = self.value;
        }
    }
}

impl OpBuilder for Stamp {
    type Param = f32;

    fn build(_inputs: Vec<Tensor>, outputs: Vec<Tensor>, value: f32) -> Self {
        Stamp { outputs, value }
    }
}

/// Copies its first input into its first output.
pub struct CopyData {
    inputs: Vec<Tensor>,
    outputs: Vec<Tensor>,
}

impl Operation for CopyData {
    fn compute_cpu(&self, _add: &[bool]) {
        let count = self.outputs[0].size().count();
        let source: Vec<f32> = self.inputs[0].data()[..count].to_vec();
        let mut data = self.outputs[0].mutable_data();
        data[..count].copy_from_slice(&source);
    }
}

impl OpBuilder for CopyData {
    type Param = ();

    fn build(inputs: Vec<Tensor>, outputs: Vec<Tensor>, _param: ()) -> Self {
        CopyData { inputs, outputs }
    }
}
