use theine_core::device::Device;
use theine_core::dims::{Offset, Size, Stride};
use theine_core::tensor::Tensor;

#[test]
fn lazy_allocation() {
    let tensor = Tensor::new(0, Device::Cpu, Size::new(1, 2, 3, 4));

    assert!(!tensor.has_data());
    assert!(tensor.is_contiguous());

    {
        let mut data = tensor.mutable_data();
        data[0] = 7.0;
    }
    assert!(tensor.has_data());
    assert_eq!(tensor.data()[0], 7.0);
    assert_eq!(tensor.data()[1], 0.0);
}

#[test]
fn clone_aliases_storage() {
    let tensor = Tensor::new(0, Device::Cpu, Size::new(1, 1, 2, 2));
    let alias = tensor.clone();

    tensor.mutable_data()[3] = 5.0;

    assert_eq!(alias.data()[3], 5.0);
    assert_eq!(tensor.buffer_id(), alias.buffer_id());
}

#[test]
fn slice_second_num() {
    let base = Tensor::new(0, Device::Cpu, Size::new(4, 3, 32, 32));
    {
        let mut data = base.mutable_data();
        for (i, value) in data[..4 * 3072].iter_mut().enumerate() {
            *value = i as f32;
        }
    }

    let mut slice = Tensor::new(0, Device::Cpu, Size::new(1, 1, 1, 1));
    slice.slice_from(&base, Offset::new(1, 0, 0, 0), Size::new(1, 3, 32, 32));

    assert_eq!(slice.linear_offset(), 3072);
    assert!(slice.is_contiguous());
    let data = slice.data();
    assert_eq!(data[0], 3072.0);
    assert_eq!(data[3071], 6143.0);
}

#[test]
fn share_from_aliases() {
    let base = Tensor::new(0, Device::Cpu, Size::new(1, 1, 4, 4));
    base.mutable_data()[0] = 1.0;

    let mut view = Tensor::new(0, Device::Cpu, Size::new(1, 1, 1, 1));
    view.share_from(&base);

    assert_eq!(view.size(), base.size());
    assert_eq!(view.buffer_id(), base.buffer_id());
    assert_eq!(view.data()[0], 1.0);
}

#[test]
fn swap_memory_exchanges_buffers() {
    let size = Size::new(1, 1, 2, 2);
    let a = Tensor::new(0, Device::Cpu, size);
    let b = Tensor::new(0, Device::Cpu, size);
    a.mutable_data()[0] = 1.0;
    b.mutable_data()[0] = 2.0;
    let a_buffer = a.buffer_id();
    let b_buffer = b.buffer_id();

    a.swap_memory(&b);

    assert_eq!(a.data()[0], 2.0);
    assert_eq!(b.data()[0], 1.0);
    assert_eq!(a.buffer_id(), b_buffer);
    assert_eq!(b.buffer_id(), a_buffer);
}

#[test]
fn swap_memory_self_is_noop() {
    let tensor = Tensor::new(0, Device::Cpu, Size::new(1, 1, 1, 2));
    tensor.mutable_data()[1] = 9.0;

    tensor.swap_memory(&tensor.clone());

    assert_eq!(tensor.data()[1], 9.0);
}

#[test]
fn delete_data_clears_all_views() {
    let tensor = Tensor::new(0, Device::Cpu, Size::new(1, 1, 1, 1));
    let alias = tensor.clone();
    tensor.mutable_data()[0] = 1.0;

    alias.delete_data();

    assert!(!tensor.has_data());
}

#[test]
#[should_panic(expected = "size mismatch")]
fn swap_memory_size_mismatch() {
    let a = Tensor::new(0, Device::Cpu, Size::new(1, 1, 2, 2));
    let b = Tensor::new(0, Device::Cpu, Size::new(1, 1, 2, 3));

    a.swap_memory(&b);
}

#[test]
#[should_panic(expected = "stride mismatch")]
fn swap_memory_stride_mismatch() {
    let size = Size::new(1, 1, 2, 2);
    let a = Tensor::new(0, Device::Cpu, size);
    let b = Tensor::with_view(0, Device::Cpu, size, Offset::zero(), Stride::new(16, 8, 4, 2));

    a.swap_memory(&b);
}

#[test]
#[should_panic(expected = "offset mismatch")]
fn swap_memory_offset_mismatch() {
    let size = Size::new(1, 1, 2, 2);
    let a = Tensor::new(0, Device::Cpu, size);
    let b = Tensor::with_view(
        0,
        Device::Cpu,
        size,
        Offset::new(0, 0, 0, 1),
        Stride::from(size),
    );

    a.swap_memory(&b);
}

#[test]
#[should_panic(expected = "rank-5 tensor from rank 0")]
fn mutable_access_from_wrong_rank() {
    let tensor = Tensor::new(5, Device::Cpu, Size::new(1, 1, 1, 1));

    tensor.mutable_data();
}

#[test]
#[should_panic(expected = "read before allocation")]
fn read_before_allocation() {
    let tensor = Tensor::new(0, Device::Cpu, Size::new(1, 1, 1, 1));

    tensor.data();
}

#[test]
#[should_panic(expected = "contiguous")]
fn lazy_allocation_of_non_contiguous_view() {
    let size = Size::new(1, 1, 2, 2);
    let tensor = Tensor::with_view(
        0,
        Device::Cpu,
        size,
        Offset::zero(),
        Stride::new(16, 8, 4, 2),
    );

    tensor.mutable_data();
}
