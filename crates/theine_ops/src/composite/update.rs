use crate::{Dummy, WeightedSum};
use theine_dispatch::{BlobRef, Connectable, Graph};

/// Momentum SGD parameter update as a graph fragment.
///
/// Bottom blobs, in order: `[weight, history, diff]`. Top blobs, in
/// order: `[new_weight, new_history]`. The fragment computes
///
/// ```text
/// update     = momentum * history + learning_rate * diff
///            + weight_decay * weight
/// new_weight = weight - update
/// new_history = update
/// ```
pub struct Update {
    momentum: f32,
    learning_rate: f32,
    weight_decay: f32,
    bottom: Vec<BlobRef>,
    top: Vec<BlobRef>,
}

impl Update {
    pub fn new(momentum: f32, learning_rate: f32, weight_decay: f32) -> Self {
        Self {
            momentum,
            learning_rate,
            weight_decay,
            bottom: Vec::new(),
            top: Vec::new(),
        }
    }
}

impl Connectable for Update {
    fn bottom(&self) -> &[BlobRef] {
        &self.bottom
    }

    fn top(&self) -> &[BlobRef] {
        &self.top
    }

    fn set_top(&mut self, top: Vec<BlobRef>) {
        self.top = top;
    }

    fn connect(&mut self, graph: &mut Graph, bottom: Vec<BlobRef>) -> Vec<BlobRef> {
        assert_eq!(bottom.len(), 3, "Update expects [weight, history, diff]");
        self.bottom = bottom.clone();
        let size = bottom[0].tensor().size();

        let sub = graph.create_graph("update");
        if self.top.is_empty() {
            let new_weight = sub.create("new_weight", size);
            let new_history = sub.create("new_history", size);
            self.top = vec![new_weight, new_history];
        }
        assert_eq!(self.top.len(), 2, "Update produces [new_weight, new_history]");

        // The update blob shares storage with new_history, so writing
        // it doubles as writing the next round's history.
        let update = sub.create_shared("update", &self.top[1].tensor());

        let compute_update = sub.create_op::<WeightedSum>(
            "compute_update",
            "",
            vec![self.momentum, self.learning_rate, self.weight_decay],
        );
        let _ = vec![bottom[1].clone(), bottom[2].clone(), bottom[0].clone()]
            >> compute_update
            >> vec![update.clone()];

        let apply_update = sub.create_op::<WeightedSum>("apply_update", "", vec![1.0, -1.0]);
        let _ = vec![bottom[0].clone(), update.clone()] >> apply_update >> vec![self.top[0].clone()];

        // new_history aliases update's storage; the dummy edge only
        // orders it after compute_update in the activation flow.
        let publish = sub.create_op::<Dummy>("publish_history", "", ());
        let _ = vec![update] >> publish >> vec![self.top[1].clone()];

        self.top.clone()
    }
}
