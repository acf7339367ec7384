use criterion::{criterion_group, Criterion};
use theine_core::device::Device;
use theine_core::dims::Size;
use theine_dispatch::Runnable;
use theine_ops::{Fill, WeightedSum};

// Chain depths for the dispatch round benchmark
const DEPTHS: [(usize, &str); 3] = [(4, "shallow"), (32, "medium"), (128, "deep")];

/// Builds a linear chain: fill -> blob -> scale -> blob -> ... with
/// `depth` scaling stages.
fn build_chain(depth: usize) -> Runnable {
    let mut runnable = Runnable::new(0, Device::Cpu);
    let size = Size::new(1, 1, 16, 16);

    let fill = runnable.create_op::<Fill>("fill", "", 1.0);
    let mut previous = runnable.create("stage_0", size);
    let _ = fill >> vec![previous.clone()];

    for stage in 1..=depth {
        let scale = runnable.create_op::<WeightedSum>(&format!("scale_{stage}"), "", vec![0.5]);
        let next = runnable.create(&format!("stage_{stage}"), size);
        let _ = vec![previous] >> scale >> vec![next.clone()];
        previous = next;
    }
    runnable
}

pub fn basic(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_round");
    for (depth, label) in DEPTHS {
        let mut runnable = build_chain(depth);
        runnable.prepare_once();
        group.bench_function(format!("chain_{label}"), |b| b.iter(|| runnable.run()));
    }
    group.finish();
}

criterion_group!(benches, basic);
