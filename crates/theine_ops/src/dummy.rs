use theine_core::{operation::Operation, tensor::Tensor};
use theine_dispatch::op::OpBuilder;

/// Pass-through operation: computes nothing. Used to surface a blob
/// that aliases another node's storage as a distinct graph output.
pub struct Dummy;

impl Operation for Dummy {
    fn compute_cpu(&self, _add: &[bool]) {}

    fn compute_gpu(&self, _add: &[bool]) {}
}

impl OpBuilder for Dummy {
    type Param = ();

    fn build(_inputs: Vec<Tensor>, _outputs: Vec<Tensor>, _param: ()) -> Self {
        Dummy
    }
}
