//! Runs the momentum-SGD update fragment standalone: fixed weight,
//! history, and gradient blobs feed an `Update` composite, and the
//! produced weight and history are read back after each round.
//!
//! ```sh
//! cargo run --example update
//! ```

use theine::prelude::*;

fn main() {
    Context::init(0, 1);

    let mut runnable = Runnable::new(0, Device::Cpu);
    let size = Size::new(1, 1, 2, 2);

    let weight = runnable.create("weight", size);
    let history = runnable.create("history", size);
    let diff = runnable.create("diff", size);

    let init_weight = runnable.create_op::<Fill>("init_weight", "", 1.0);
    let _ = init_weight >> vec![weight.clone()];
    let init_history = runnable.create_op::<Fill>("init_history", "", 0.0);
    let _ = init_history >> vec![history.clone()];
    let init_diff = runnable.create_op::<Fill>("init_diff", "", 1.0);
    let _ = init_diff >> vec![diff.clone()];

    let mut update = Update::new(0.9, 0.1, 0.0);
    let top = update.connect(
        &mut runnable,
        vec![weight.clone(), history.clone(), diff.clone()],
    );

    runnable.run();

    let new_weight = top[0].tensor();
    let new_history = top[1].tensor();
    println!("new_weight[0]  = {:.4}", new_weight.data()[0]);
    println!("new_history[0] = {:.4}", new_history.data()[0]);
}
