use theine_core::device::Device;
use theine_core::dims::Size;
use theine_core::operation::Operation;
use theine_core::tensor::Tensor;
use theine_dispatch::OpBuilder;
use theine_ops::{Fill, GaussianFill, WeightedSum};

fn tensor(size: Size) -> Tensor {
    Tensor::new(0, Device::Cpu, size)
}

#[test]
fn fill_writes_constant() {
    let out = tensor(Size::new(1, 1, 2, 2));

    let op = Fill::build(vec![], vec![out.clone()], 1.5);
    op.compute_cpu(&[false]);

    assert_eq!(&out.data()[..4], &[1.5; 4]);

    // Accumulating fire adds onto the existing contents.
    op.compute_cpu(&[true]);
    assert_eq!(&out.data()[..4], &[3.0; 4]);
}

#[test]
fn gaussian_fill_matches_distribution() {
    let out = tensor(Size::new(1, 1, 100, 100));

    let op = GaussianFill::build(vec![], vec![out.clone()], (2.0, 1.0));
    op.compute_cpu(&[false]);

    let data = out.data();
    let n = 100.0 * 100.0;
    let mean: f32 = data[..10000].iter().sum::<f32>() / n;
    let var: f32 = data[..10000].iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / n;

    assert!((mean - 2.0).abs() < 0.1, "sample mean {mean}");
    assert!((var - 1.0).abs() < 0.15, "sample variance {var}");
}

#[test]
fn weighted_sum_combines_inputs() {
    let size = Size::new(1, 1, 1, 3);
    let a = tensor(size);
    let b = tensor(size);
    let out = tensor(size);
    a.mutable_data().copy_from_slice(&[1.0, 2.0, 3.0]);
    b.mutable_data().copy_from_slice(&[10.0, 20.0, 30.0]);

    let op = WeightedSum::build(vec![a, b], vec![out.clone()], vec![2.0, 0.5]);
    op.compute_cpu(&[false]);

    assert_eq!(&out.data()[..3], &[7.0, 14.0, 21.0]);

    op.compute_cpu(&[true]);
    assert_eq!(&out.data()[..3], &[14.0, 28.0, 42.0]);
}

#[test]
fn weighted_sum_allows_aliased_output() {
    let size = Size::new(1, 1, 1, 2);
    let a = tensor(size);
    a.mutable_data().copy_from_slice(&[3.0, 4.0]);

    // In-place scaling: the input aliases the output.
    let op = WeightedSum::build(vec![a.clone()], vec![a.clone()], vec![0.5]);
    op.compute_cpu(&[false]);

    assert_eq!(&a.data()[..2], &[1.5, 2.0]);
}

#[test]
#[should_panic(expected = "one weight per input")]
fn weighted_sum_weight_count_mismatch() {
    let size = Size::new(1, 1, 1, 1);
    let a = tensor(size);
    let out = tensor(size);

    WeightedSum::build(vec![a], vec![out], vec![1.0, 2.0]);
}
