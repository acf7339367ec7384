use rand_distr::{Distribution, Normal};
use theine_core::{context::with_rng, operation::Operation, tensor::Tensor};
use theine_dispatch::op::OpBuilder;

/// Writes a constant into every output. A source operation: takes no
/// inputs.
pub struct Fill {
    outputs: Vec<Tensor>,
    value: f32,
}

impl OpBuilder for Fill {
    type Param = f32;

    fn build(inputs: Vec<Tensor>, outputs: Vec<Tensor>, value: f32) -> Self {
        assert!(inputs.is_empty(), "Fill takes no inputs");
        assert!(!outputs.is_empty(), "Fill needs at least one output");
        Self { outputs, value }
    }
}

impl Operation for Fill {
    fn compute_cpu(&self, add: &[bool]) {
        for (tensor, &add) in self.outputs.iter().zip(add) {
            let count = tensor.size().count();
            let mut data = tensor.mutable_data();
            for value in &mut data[..count] {
                if add {
                    *value += self.value;
                } else {
                    *value = self.value;
                }
            }
        }
    }
}

/// Fills every output with samples from a normal distribution, drawn
/// from the thread-local RNG.
pub struct GaussianFill {
    outputs: Vec<Tensor>,
    mean: f32,
    std: f32,
}

impl OpBuilder for GaussianFill {
    type Param = (f32, f32);

    fn build(inputs: Vec<Tensor>, outputs: Vec<Tensor>, (mean, std): (f32, f32)) -> Self {
        assert!(inputs.is_empty(), "GaussianFill takes no inputs");
        assert!(!outputs.is_empty(), "GaussianFill needs at least one output");
        Self { outputs, mean, std }
    }
}

impl Operation for GaussianFill {
    fn compute_cpu(&self, add: &[bool]) {
        let normal = Normal::new(self.mean, self.std)
            .unwrap_or_else(|err| panic!("invalid gaussian parameters: {}", err));
        with_rng(|rng| {
            for (tensor, &add) in self.outputs.iter().zip(add) {
                let count = tensor.size().count();
                let mut data = tensor.mutable_data();
                for value in &mut data[..count] {
                    let sample = normal.sample(rng);
                    if add {
                        *value += sample;
                    } else {
                        *value = sample;
                    }
                }
            }
        });
    }
}
