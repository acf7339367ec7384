use theine_core::device::Device;
use theine_core::dims::Size;
use theine_dispatch::{Connectable, Runnable};
use theine_ops::composite::Update;
use theine_ops::Fill;

#[test]
fn momentum_sgd_round() {
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
    assert_eq!(top.len(), 2);

    runnable.run();

    // update = 0.9 * 0 + 0.1 * 1 + 0 * 1 = 0.1
    let new_history = top[1].tensor();
    assert!((new_history.data()[0] - 0.1).abs() < 1e-6);

    // new_weight = 1 - 0.1 = 0.9
    let new_weight = top[0].tensor();
    assert!((new_weight.data()[0] - 0.9).abs() < 1e-6);
}

#[test]
fn tops_carry_subgraph_names() {
    let mut runnable = Runnable::new(0, Device::Cpu);
    let size = Size::new(1, 1, 1, 1);

    let weight = runnable.create("weight", size);
    let history = runnable.create("history", size);
    let diff = runnable.create("diff", size);

    let mut update = Update::new(0.9, 0.01, 0.0005);
    let top = update.connect(&mut runnable, vec![weight, history, diff]);
    runnable.prepare_once();

    assert_eq!(top[0].name(), "update::new_weight");
    assert_eq!(top[1].name(), "update::new_history");
}
