use theine_core::{operation::Operation, tensor::Tensor};
use theine_dispatch::op::OpBuilder;

/// Element-wise weighted sum of the inputs into a single output,
/// `out = sum_i weights[i] * inputs[i]`.
pub struct WeightedSum {
    inputs: Vec<Tensor>,
    outputs: Vec<Tensor>,
    weights: Vec<f32>,
}

impl OpBuilder for WeightedSum {
    type Param = Vec<f32>;

    fn build(inputs: Vec<Tensor>, outputs: Vec<Tensor>, weights: Vec<f32>) -> Self {
        assert_eq!(
            inputs.len(),
            weights.len(),
            "WeightedSum needs one weight per input"
        );
        assert_eq!(outputs.len(), 1, "WeightedSum produces a single output");
        let size = outputs[0].size();
        for input in &inputs {
            assert_eq!(input.size(), size, "WeightedSum inputs must match the output shape");
        }
        Self { inputs, outputs, weights }
    }
}

impl Operation for WeightedSum {
    fn compute_cpu(&self, add: &[bool]) {
        let count = self.outputs[0].size().count();
        let mut acc = vec![0.0f32; count];
        for (input, &weight) in self.inputs.iter().zip(&self.weights) {
            let data = input.data();
            for (acc, &value) in acc.iter_mut().zip(&data[..count]) {
                *acc += weight * value;
            }
        }
        // All input guards dropped before the output lock is taken,
        // so an input may alias the output.
        let mut out = self.outputs[0].mutable_data();
        for (out, acc) in out[..count].iter_mut().zip(acc) {
            if add[0] {
                *out += acc;
            } else {
                *out = acc;
            }
        }
    }
}
