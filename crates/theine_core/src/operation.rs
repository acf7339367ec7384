/// Contract between the dispatch core and concrete compute kernels.
///
/// An operation is bound to a fixed list of input and output tensors at
/// construction. `add` carries one flag per output: `true` means the
/// kernel must accumulate into the existing output content instead of
/// overwriting it (gradient accumulation).
pub trait Operation: Send + Sync {
    fn compute_cpu(&self, add: &[bool]);

    fn compute_gpu(&self, add: &[bool]) {
        let _ = add;
        panic!("operation has no GPU compute path");
    }
}
