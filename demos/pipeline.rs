//! A three-stage pipeline: a gaussian source fills a blob, a weighted
//! sum scales it, and the resulting tensors are snapshotted to disk.
//!
//! ```sh
//! cargo run --example pipeline
//! ```

use theine::core::snapshot;
use theine::dispatch::runnable::render;
use theine::prelude::*;

fn main() -> Result<()> {
    Context::init(0, 1);

    let mut runnable = Runnable::new(0, Device::Cpu);
    let size = Size::new(1, 4, 8, 8);

    let source = runnable.create_op::<GaussianFill>("source", "", (0.0, 1.0));
    let data = runnable.create("data", size);
    let _ = source >> vec![data.clone()];

    let scale = runnable.create_op::<WeightedSum>("scale", "", vec![0.5]);
    let scaled = runnable.create("scaled", size);
    let _ = vec![data.clone()] >> scale >> vec![scaled.clone()];

    println!("{}", render(&runnable.print()));

    for round in 0..3 {
        runnable.run();
        let sample = scaled.tensor().data()[0];
        println!("round {round}: scaled[0] = {sample:.4}");
    }

    let path = std::env::temp_dir().join("theine-pipeline.snapshot");
    snapshot::save_to_path(&path, &[data.tensor(), scaled.tensor()])?;
    snapshot::load_from_path(&path, &[data.tensor(), scaled.tensor()])?;
    println!("snapshot round-trip through {}", path.display());

    Ok(())
}
